//! Everything a host needs to mount the profile tab.
//!
//! `host` wires the tab into a router; `seams` holds the collaborator traits
//! a host implements when it brings its own storage, events or templates.

pub mod host {
    //! Wiring surface for hosts using the bundled in-memory collaborators.
    pub use crate::{
        BroadcastNotifier, ExtensionConfig, Group, GroupDirectory, HtmlRenderer,
        InMemoryFieldStore, ProfileFieldsExtension,
        web::{AppState, build_router},
    };
}

pub mod seams {
    //! Collaborator traits called by the save pass and the screens.
    pub use crate::{
        AccessContext, FieldStore, GroupExtension, NotificationBus, TemplateRenderer,
        messages::MessageQueue,
    };
}
