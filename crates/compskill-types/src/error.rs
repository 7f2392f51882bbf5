//! Error taxonomy for extraction and calculation

use crate::{CharacterId, UserId};
use thiserror::Error;

/// Calculator errors
///
/// None of these are fatal: every variant is a refusal the caller reports
/// to the user while keeping its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Submission attempted before a skill was chosen
    #[error("Please select a {what} first.")]
    NoSelection {
        /// Which selection is missing ("Primary Skill", "Task Skill")
        what: &'static str,
    },

    /// A calculator was launched without any selected character
    #[error("Please select at least one token to use the Complementary Skills calculator.")]
    NoParticipantsSelected,

    /// The referenced participant is not registered
    #[error("Participant '{0}' is not part of this calculation")]
    UnknownParticipant(CharacterId),

    /// A user tried to act on a result for a character they do not own
    #[error("User '{user}' may not act for '{actor}'")]
    PermissionDenied {
        /// Acting user
        user: UserId,
        /// Character named in the result
        actor: String,
    },

    /// The result sink failed to deliver a message
    #[error("Failed to publish result: {0}")]
    Publish(String),
}

/// Failure reported by a character's "derive extended data" operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("derive extended data failed: {0}")]
pub struct HydrationError(pub String);

/// Non-fatal diagnostics produced while extracting a character's skills
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractWarning {
    /// The character has no underlying data source
    #[error("{0} has no actor")]
    MissingActor(String),

    /// Stale data could not be refreshed because the source lacks the capability
    #[error("{0} does not support deriving extended data")]
    DeriveUnsupported(String),

    /// Refreshing stale data failed; no skills were extracted
    #[error("deriving extended data failed for {name}: {reason}")]
    DeriveFailed {
        /// Character name
        name: String,
        /// Failure reported by the source
        reason: String,
    },

    /// The skill container was absent or not a sequence/mapping
    #[error("{0} has no usable skill data")]
    MalformedSkillData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_message() {
        let err = CalcError::NoSelection {
            what: "Primary Skill",
        };
        assert_eq!(err.to_string(), "Please select a Primary Skill first.");
    }

    #[test]
    fn test_warning_display() {
        let warning = ExtractWarning::DeriveFailed {
            name: "Brenna".into(),
            reason: "boom".into(),
        };
        assert_eq!(
            warning.to_string(),
            "deriving extended data failed for Brenna: boom"
        );
    }
}
