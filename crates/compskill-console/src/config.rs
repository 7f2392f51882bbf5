use anyhow::Context;
use compskill_calc::CalcConfig;
use compskill_logging::LoggingConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[logging]
level = "info"  # trace, debug, info, warn, error
json = false

[calculator]
force_reload = false
allow_ineligible_complements = false
tie_break = "source_label"  # or "insertion"

[scene]
path = "scene.json"  # Set via COMPSKILL_SCENE env var
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct SceneConfig {
    pub path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scene.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub calculator: CalcConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Config {
    /// Get the global config path: ~/.compskill/compskill.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".compskill").join("compskill.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.compskill/compskill.toml (auto-created if missing)
    /// 2. Local override: ./compskill.toml (optional)
    /// 3. Environment variables (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("compskill").required(false))
            .add_source(config::Environment::with_prefix("COMPSKILL").separator("__"));

        if let Ok(path) = env::var("COMPSKILL_SCENE") {
            config_builder = config_builder.set_override("scene.path", path)?;
        }

        if let Ok(level) = env::var("COMPSKILL_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config: Self = config_builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
