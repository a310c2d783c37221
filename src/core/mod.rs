pub mod error;
pub mod types;

pub use error::{FieldsError, Result};
pub use types::{FieldId, Group, GroupId, GroupStatus, Severity, UserId, UserMessage};
