//! One save pass over a submitted group profile form.
//!
//! The pass runs in two strictly ordered stages. Every submitted field is
//! checked for required-ness first; only when none is missing does anything
//! reach the store. Store failures are counted per field and never stop the
//! loop, and nothing already written is rolled back.

use crate::access::AccessContext;
use crate::config::ExtensionConfig;
use crate::core::{Group, Severity};
use crate::events::{FIELD_UPDATED, FieldUpdated, NotificationBus};
use crate::fields::FieldStore;
use crate::messages::{MISSING_REQUIRED, MessageQueue, UPDATE_FAILED, UPDATE_SUCCEEDED};
use crate::submission::SubmittedFields;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the caller must do once the pass is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    /// Nothing submitted or caller not allowed; no side effects happened
    Unchanged,
    /// Required fields missing while editing; show the edit screen again
    Rerender,
    /// Send the user to this URL
    Redirect(String),
    /// Creation wizard saved cleanly; let it advance to its next step
    Continue,
}

impl SaveResult {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            SaveResult::Redirect(target) => Some(target.as_str()),
            _ => None,
        }
    }
}

/// Aggregate of one pass, decided once per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub any_required_missing: bool,
    pub any_persist_failure: bool,
    pub is_creation_flow: bool,
}

pub struct GroupFieldsSaveOrchestrator {
    store: Arc<dyn FieldStore>,
    bus: Arc<dyn NotificationBus>,
    config: ExtensionConfig,
}

impl GroupFieldsSaveOrchestrator {
    pub fn new(
        store: Arc<dyn FieldStore>,
        bus: Arc<dyn NotificationBus>,
        config: ExtensionConfig,
    ) -> Self {
        Self { store, bus, config }
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Validates then persists the submitted fields of `group`.
    ///
    /// Queues at most one message and never fails; every problem ends up in
    /// the returned [`SaveResult`] and the queued message.
    pub fn save(
        &self,
        group: &Group,
        submission: &SubmittedFields,
        access: &dyn AccessContext,
        messages: &mut dyn MessageQueue,
    ) -> SaveResult {
        if submission.is_empty() || !access.may_save() {
            debug!(group_id = %group.id, fields = submission.len(), "nothing to save");
            return SaveResult::Unchanged;
        }

        let mut outcome = SaveOutcome {
            is_creation_flow: access.is_group_creation_flow(),
            ..SaveOutcome::default()
        };

        let required: Vec<bool> = submission
            .iter()
            .map(|field| self.store.is_required(field.field_id))
            .collect();

        outcome.any_required_missing = submission
            .iter()
            .zip(&required)
            .any(|(field, &is_required)| is_required && field.is_blank());

        if outcome.any_required_missing {
            info!(group_id = %group.id, "required profile fields missing, nothing saved");
            messages.add_user_message(MISSING_REQUIRED, Severity::Error);

            if outcome.is_creation_flow {
                let step = access.current_create_step().unwrap_or(self.config.slug.as_str());
                return SaveResult::Redirect(self.config.create_step_url(step));
            }
            return SaveResult::Rerender;
        }

        for (field, &is_required) in submission.iter().zip(&required) {
            let value = field.value();
            match self
                .store
                .set_field_value(field.field_id, group.id, value, is_required)
            {
                Ok(()) => self.bus.emit(
                    FIELD_UPDATED,
                    &FieldUpdated {
                        group_id: group.id,
                        field_id: field.field_id,
                        value: value.to_string(),
                    },
                ),
                Err(err) => {
                    warn!(
                        group_id = %group.id,
                        field_id = %field.field_id,
                        error = %err,
                        "failed to save profile field"
                    );
                    outcome.any_persist_failure = true;
                }
            }
        }

        self.finish(group, outcome, messages)
    }

    fn finish(
        &self,
        group: &Group,
        outcome: SaveOutcome,
        messages: &mut dyn MessageQueue,
    ) -> SaveResult {
        if outcome.any_persist_failure {
            messages.add_user_message(UPDATE_FAILED, Severity::Error);
        } else if outcome.is_creation_flow {
            debug!(group_id = %group.id, "profile fields saved during creation");
            return SaveResult::Continue;
        } else {
            info!(group_id = %group.id, "profile fields updated");
            messages.add_user_message(UPDATE_SUCCEEDED, Severity::Success);
        }

        SaveResult::Redirect(self.config.group_admin_url(group))
    }
}
