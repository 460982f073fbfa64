//! Club recruitment records and the application state machine.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One open position inside a recruitment posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    pub count: u32,
    pub filled: u32,
}

impl Position {
    /// Rejects manual edits that would overfill the position.
    pub fn validate(&self) -> Result<(), PositionValidationError> {
        if self.filled > self.count {
            return Err(PositionValidationError::Overfilled {
                name: self.name.clone(),
                filled: self.filled,
                count: self.count,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionValidationError {
    Overfilled {
        name: String,
        filled: u32,
        count: u32,
    },
}

impl Display for PositionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overfilled {
                name,
                filled,
                count,
            } => write!(f, "position `{name}` overfilled: {filled} of {count}"),
        }
    }
}

impl Error for PositionValidationError {}

/// Club recruitment posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recruitment {
    pub id: EntityId,
    pub club: String,
    pub title: String,
    pub description: String,
    pub organizer: String,
    pub urgent: bool,
    pub positions: Vec<Position>,
    pub applications: u32,
    pub time_label: String,
}

impl Recruitment {
    /// Validates every position after a manual edit.
    pub fn validate_positions(&self) -> Result<(), PositionValidationError> {
        for position in &self.positions {
            position.validate()?;
        }
        Ok(())
    }
}

impl Entity for Recruitment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.organizer.as_str())
    }
}

/// Application lifecycle toward one posting or team.
///
/// `NotApplied -> PendingReview -> {Approved | Rejected}`; once past
/// `NotApplied` there is no way back and no re-submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    NotApplied,
    PendingReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// The apply control the UI renders for this state.
    pub fn control(self) -> ApplyControl {
        match self {
            Self::NotApplied => ApplyControl::Enabled,
            Self::PendingReview => ApplyControl::DisabledPending,
            Self::Approved => ApplyControl::DisabledApproved,
            Self::Rejected => ApplyControl::DisabledRejected,
        }
    }

    /// Whether a new application may still be submitted.
    pub fn can_apply(self) -> bool {
        matches!(self, Self::NotApplied)
    }
}

/// Render descriptor for the apply button; every post-apply state is a
/// distinct disabled control that never re-enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyControl {
    Enabled,
    DisabledPending,
    DisabledApproved,
    DisabledRejected,
}

impl ApplyControl {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationStatus, ApplyControl, Position};

    #[test]
    fn position_rejects_overfill() {
        let ok = Position {
            name: "干事".to_string(),
            count: 3,
            filled: 3,
        };
        assert!(ok.validate().is_ok());

        let bad = Position {
            filled: 4,
            ..ok.clone()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn post_apply_states_never_reenable() {
        assert!(ApplicationStatus::NotApplied.control().is_enabled());
        for status in [
            ApplicationStatus::PendingReview,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert!(!status.control().is_enabled());
            assert!(!status.can_apply());
        }
        assert_eq!(
            ApplicationStatus::PendingReview.control(),
            ApplyControl::DisabledPending
        );
    }
}
