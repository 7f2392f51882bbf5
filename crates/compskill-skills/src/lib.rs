//! `CompSkill` Skills
//!
//! Extracts usable skill records from a character's nested, loosely
//! structured skill data.
//!
//! ## Pipeline
//!
//! 1. Hydration: refresh the character's derived data once if it is stale
//! 2. Flattening: walk the nested container into an ordered list of leaves
//! 3. Projection: turn each leaf into a `SkillRecord` with safe defaults
//! 4. Ordering: de-duplicate by name and sort by category, then name

#![deny(unsafe_code, unused_imports, unused_variables)]

pub mod extractor;
pub mod flatten;
pub mod ordering;
pub mod skill;
pub mod source;

pub use extractor::{ExtractOptions, Extraction, SkillExtractor};
pub use flatten::{flatten, RawSkillEntry};
pub use ordering::{compare_records, group_by_category, locale_cmp, sort_key, sort_records};
pub use skill::{leadership_ranks, project};
pub use source::{CharacterSource, SheetCharacter};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CharacterSource, ExtractOptions, SheetCharacter, SkillExtractor};
}
