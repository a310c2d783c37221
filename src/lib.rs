// ============================================================================
// Group Profile Fields Library
// ============================================================================

pub mod access;
pub mod config;
pub mod core;
pub mod events;
pub mod extension;
pub mod fields;
pub mod groups;
pub mod messages;
pub mod orchestrator;
pub mod prelude;
pub mod render;
pub mod submission;
pub mod web;

// Re-export main types for convenience
pub use access::{AccessContext, RequestAccess};
pub use config::{AppConfig, ExtensionConfig};
pub use crate::core::{
    FieldId, FieldsError, Group, GroupId, GroupStatus, Result, Severity, UserId, UserMessage,
};
pub use events::{BroadcastNotifier, FieldUpdated, NotificationBus};
pub use extension::{GroupExtension, ProfileFieldsExtension};
pub use fields::{FieldDefinition, FieldKind, FieldStore, InMemoryFieldStore};
pub use groups::GroupDirectory;
pub use orchestrator::{GroupFieldsSaveOrchestrator, SaveOutcome, SaveResult};
pub use render::{HtmlRenderer, TemplateRenderer};
pub use submission::{FieldSubmission, SubmittedFields};
