//! Per-module mutator services.
//!
//! # Responsibility
//! - Own every collection mutation: create/update/delete, toggles, applies.
//! - Enforce form validation, ownership checks and the two-phase delete.
//!
//! # Invariants
//! - Validation surfaces the first failing field only, as a plain string.
//! - Membership side documents and entity counters change in the same
//!   operation.
//! - Counter decrements clamp at zero on every path.

use crate::model::entity::{EntityId, LocalProfile};
use crate::model::recruitment::PositionValidationError;
use crate::nav::ElementRefError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod academic_service;
pub mod admin_service;
pub mod chat_service;
pub mod feed_service;
pub mod life_service;
pub mod recruitment_service;
pub mod team_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Mutation-layer error shared by every module service.
#[derive(Debug)]
pub enum ServiceError {
    /// First failing form field, as the plain message the UI alerts with.
    Validation(String),
    NotFound(EntityId),
    /// Creator-only operation attempted by someone else.
    NotOwner { id: EntityId, owner: String },
    PositionOverfilled(PositionValidationError),
    /// Trainer or branch already booked for the slot.
    ScheduleConflict { slot_label: String },
    /// Operation not allowed in the current lifecycle state.
    InvalidTransition(&'static str),
    /// `confirm_delete` without a preceding `request_delete`.
    NoPendingDelete,
    Navigation(ElementRefError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => f.write_str(message),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
            Self::NotOwner { id, owner } => {
                write!(f, "only the creator `{owner}` may modify entity {id}")
            }
            Self::PositionOverfilled(err) => write!(f, "{err}"),
            Self::ScheduleConflict { slot_label } => {
                write!(f, "slot `{slot_label}` is already booked")
            }
            Self::InvalidTransition(details) => write!(f, "invalid transition: {details}"),
            Self::NoPendingDelete => f.write_str("no delete is pending confirmation"),
            Self::Navigation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PositionOverfilled(err) => Some(err),
            Self::Navigation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<PositionValidationError> for ServiceError {
    fn from(value: PositionValidationError) -> Self {
        Self::PositionOverfilled(value)
    }
}

impl From<ElementRefError> for ServiceError {
    fn from(value: ElementRefError) -> Self {
        Self::Navigation(value)
    }
}

/// Checks required fields in order and reports the first blank one.
pub(crate) fn validate_required(fields: &[(&str, &str)]) -> ServiceResult<()> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ServiceError::Validation(format!("{name} is required")));
        }
    }
    Ok(())
}

/// Creator-only gate: plain string comparison against the local profile.
pub(crate) fn ensure_owner(
    owner: Option<&str>,
    profile: &LocalProfile,
    id: EntityId,
) -> ServiceResult<()> {
    match owner {
        Some(owner) if owner == profile.display_name => Ok(()),
        Some(owner) => Err(ServiceError::NotOwner {
            id,
            owner: owner.to_string(),
        }),
        None => Ok(()),
    }
}

/// Two-phase delete state: `request` arms, `confirm` fires, `cancel` clears.
#[derive(Debug, Default)]
pub struct PendingDelete {
    pending: Option<EntityId>,
}

impl PendingDelete {
    pub fn request(&mut self, id: EntityId) {
        self.pending = Some(id);
    }

    pub fn pending(&self) -> Option<EntityId> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Takes the armed id, failing when nothing is pending.
    pub fn confirm(&mut self) -> ServiceResult<EntityId> {
        self.pending.take().ok_or(ServiceError::NoPendingDelete)
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_required, PendingDelete, ServiceError};

    #[test]
    fn validation_stops_at_first_blank_field() {
        let err = validate_required(&[("title", "  "), ("content", "")]).unwrap_err();
        match err {
            ServiceError::Validation(message) => assert_eq!(message, "title is required"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pending_delete_is_two_phase() {
        let mut pending = PendingDelete::default();
        assert!(matches!(
            pending.confirm(),
            Err(ServiceError::NoPendingDelete)
        ));

        pending.request(4);
        assert_eq!(pending.pending(), Some(4));
        pending.cancel();
        assert!(matches!(
            pending.confirm(),
            Err(ServiceError::NoPendingDelete)
        ));

        pending.request(9);
        assert_eq!(pending.confirm().unwrap(), 9);
        assert_eq!(pending.pending(), None);
    }
}
