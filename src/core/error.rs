use thiserror::Error;

use super::types::{FieldId, GroupId};

#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Field {0} not found")]
    FieldNotFound(FieldId),

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Value rejected for field {field_id} of group {group_id}: {reason}")]
    Rejected {
        field_id: FieldId,
        group_id: GroupId,
        reason: String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl FieldsError {
    pub fn rejected(field_id: FieldId, group_id: GroupId, reason: impl Into<String>) -> Self {
        Self::Rejected {
            field_id,
            group_id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldsError>;

impl<T> From<std::sync::PoisonError<T>> for FieldsError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
