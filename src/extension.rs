//! The profile tab as the host's group router sees it.
//!
//! The host calls into a [`GroupExtension`] at its screen extension points:
//! display, the edit screen and its save, the creation step and its save.

use crate::access::AccessContext;
use crate::config::ExtensionConfig;
use crate::core::{Group, GroupStatus, Result, UserMessage};
use crate::events::NotificationBus;
use crate::fields::FieldStore;
use crate::messages::MessageQueue;
use crate::orchestrator::{GroupFieldsSaveOrchestrator, SaveResult};
use crate::render::{RenderContext, RenderedField, Template, TemplateRenderer, error_notice};
use crate::submission::SubmittedFields;
use std::sync::Arc;
use tracing::error;

pub const INSTALLATION_FAILED: &str =
    "Something went wrong, please contact the administrator of this site.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSettings {
    pub enabled: bool,
    pub position: Option<u32>,
}

impl ScreenSettings {
    fn disabled() -> Self {
        Self {
            enabled: false,
            position: None,
        }
    }

    fn enabled_at(position: Option<u32>) -> Self {
        Self {
            enabled: true,
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screens {
    pub admin: ScreenSettings,
    pub create: ScreenSettings,
    pub edit: ScreenSettings,
}

/// Registration of the tab for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSettings {
    pub slug: String,
    pub name: String,
    pub visibility: Visibility,
    pub nav_item_position: u32,
    pub enable_nav_item: bool,
    pub screens: Screens,
}

pub trait GroupExtension: Send + Sync {
    fn settings(&self, group: &Group) -> ExtensionSettings;

    /// Public profile screen
    fn on_display(&self, group: &Group) -> Result<String>;

    /// Edit form posting back to `form_action`
    fn on_edit(&self, group: &Group, form_action: &str, messages: &[UserMessage])
    -> Result<String>;

    /// Creation step form; the same form as editing
    fn on_create(
        &self,
        group: &Group,
        form_action: &str,
        messages: &[UserMessage],
    ) -> Result<String> {
        self.on_edit(group, form_action, messages)
    }

    fn on_save(
        &self,
        group: &Group,
        submission: &SubmittedFields,
        access: &dyn AccessContext,
        messages: &mut dyn MessageQueue,
    ) -> SaveResult;

    /// Creation step save; the access context carries the creation flow
    fn on_create_save(
        &self,
        group: &Group,
        submission: &SubmittedFields,
        access: &dyn AccessContext,
        messages: &mut dyn MessageQueue,
    ) -> SaveResult {
        self.on_save(group, submission, access, messages)
    }
}

/// Group profile fields tab backed by a [`FieldStore`]
pub struct ProfileFieldsExtension {
    store: Arc<dyn FieldStore>,
    renderer: Arc<dyn TemplateRenderer>,
    orchestrator: GroupFieldsSaveOrchestrator,
}

impl ProfileFieldsExtension {
    pub fn new(
        store: Arc<dyn FieldStore>,
        bus: Arc<dyn NotificationBus>,
        renderer: Arc<dyn TemplateRenderer>,
        config: ExtensionConfig,
    ) -> Self {
        let orchestrator = GroupFieldsSaveOrchestrator::new(store.clone(), bus, config);
        Self {
            store,
            renderer,
            orchestrator,
        }
    }

    pub fn config(&self) -> &ExtensionConfig {
        self.orchestrator.config()
    }

    /// Error notice to show instead of any screen while the profile field
    /// group is not installed
    pub fn installation_failed(&self) -> Result<Option<String>> {
        if self.store.fields_group()?.is_some() {
            return Ok(None);
        }
        error!("group profile field group is not installed");
        Ok(Some(error_notice(INSTALLATION_FAILED)))
    }

    fn rendered_fields(&self, group: &Group) -> Result<Vec<RenderedField>> {
        self.store
            .fields()?
            .into_iter()
            .map(|definition| -> Result<RenderedField> {
                let value = self.store.field_value(definition.id, group.id)?;
                Ok(RenderedField { definition, value })
            })
            .collect()
    }

    fn render(
        &self,
        template: Template,
        group: &Group,
        form_action: Option<&str>,
        messages: &[UserMessage],
    ) -> Result<String> {
        if let Some(notice) = self.installation_failed()? {
            return Ok(notice);
        }

        let context = RenderContext {
            group,
            title: &self.config().name,
            fields: self.rendered_fields(group)?,
            form_action: form_action.map(str::to_string),
            messages,
        };
        self.renderer.render(template, &context)
    }
}

impl GroupExtension for ProfileFieldsExtension {
    fn settings(&self, group: &Group) -> ExtensionSettings {
        let config = self.config();
        let visibility = match group.status {
            GroupStatus::Public => Visibility::Public,
            GroupStatus::Private | GroupStatus::Hidden => Visibility::Private,
        };

        ExtensionSettings {
            slug: config.slug.clone(),
            name: config.name.clone(),
            visibility,
            nav_item_position: config.nav_item_position,
            enable_nav_item: true,
            screens: Screens {
                admin: ScreenSettings::disabled(),
                create: ScreenSettings::enabled_at(Some(config.create_step_position)),
                edit: ScreenSettings::enabled_at(None),
            },
        }
    }

    fn on_display(&self, group: &Group) -> Result<String> {
        self.render(Template::Display, group, None, &[])
    }

    fn on_edit(
        &self,
        group: &Group,
        form_action: &str,
        messages: &[UserMessage],
    ) -> Result<String> {
        self.render(Template::Edit, group, Some(form_action), messages)
    }

    fn on_save(
        &self,
        group: &Group,
        submission: &SubmittedFields,
        access: &dyn AccessContext,
        messages: &mut dyn MessageQueue,
    ) -> SaveResult {
        self.orchestrator.save(group, submission, access, messages)
    }
}
