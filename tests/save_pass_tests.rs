/// Save pass tests against the in-memory field store
///
/// Run with: cargo test --test save_pass_tests

use std::sync::Arc;

use group_profile_fields::{
    BroadcastNotifier, ExtensionConfig, FieldDefinition, FieldId, FieldKind, FieldStore,
    FieldUpdated, Group, GroupFieldsSaveOrchestrator, InMemoryFieldStore, RequestAccess,
    SaveResult, Severity, SubmittedFields, UserMessage,
    messages::{MISSING_REQUIRED, UPDATE_FAILED, UPDATE_SUCCEEDED},
};
use tokio::sync::broadcast::Receiver;

struct Fixture {
    store: Arc<InMemoryFieldStore>,
    orchestrator: GroupFieldsSaveOrchestrator,
    events: Receiver<FieldUpdated>,
    group: Group,
}

/// Field 101 is a required city, 102 an optional note, 103 a required
/// member count.
fn fixture() -> Fixture {
    let store = InMemoryFieldStore::new();
    store
        .register_field(FieldDefinition::new(101, "City", FieldKind::TextBox).required())
        .unwrap();
    store
        .register_field(FieldDefinition::new(102, "Note", FieldKind::TextArea))
        .unwrap();
    store
        .register_field(FieldDefinition::new(103, "Members", FieldKind::Number).required())
        .unwrap();
    let store = Arc::new(store);

    let bus = BroadcastNotifier::new(16);
    let events = bus.subscribe();
    let orchestrator = GroupFieldsSaveOrchestrator::new(
        store.clone(),
        Arc::new(bus),
        ExtensionConfig::new("https://example.org/groups"),
    );

    Fixture {
        store,
        orchestrator,
        events,
        group: Group::new(12, "city-walkers", "City walkers"),
    }
}

impl Fixture {
    fn save(&self, submission: &SubmittedFields, access: &RequestAccess) -> (SaveResult, Vec<UserMessage>) {
        let mut messages = Vec::new();
        let result = self
            .orchestrator
            .save(&self.group, submission, access, &mut messages);
        (result, messages)
    }

    fn drain_events(&mut self) -> Vec<FieldUpdated> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn value(&self, field: u64) -> Option<String> {
        self.store.field_value(FieldId(field), self.group.id).unwrap()
    }
}

const ADMIN_URL: &str = "https://example.org/groups/city-walkers/admin/group-profile";

#[test]
fn required_and_optional_fields_are_saved() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(102u64, Some(""));

    let (result, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(result, SaveResult::Redirect(ADMIN_URL.to_string()));
    assert_eq!(messages, vec![UserMessage::new(UPDATE_SUCCEEDED, Severity::Success)]);
    assert_eq!(f.value(101).as_deref(), Some("Paris"));
    assert_eq!(f.value(102), None);

    let events = f.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].field_id, FieldId(101));
    assert_eq!(events[0].value, "Paris");
    assert_eq!(events[1].field_id, FieldId(102));
}

#[test]
fn one_missing_required_field_blocks_all_writes() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(102u64, Some("bring water"))
        .with(101u64, Some("Lyon"))
        .with(103u64, None);

    let (result, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(result, SaveResult::Rerender);
    assert_eq!(messages, vec![UserMessage::new(MISSING_REQUIRED, Severity::Error)]);
    assert_eq!(f.value(101), None);
    assert_eq!(f.value(102), None);
    assert!(f.drain_events().is_empty());
}

#[test]
fn zero_counts_as_missing_for_a_required_field() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(103u64, Some("0"));

    let (result, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(result, SaveResult::Rerender);
    assert_eq!(messages, vec![UserMessage::new(MISSING_REQUIRED, Severity::Error)]);
    assert_eq!(f.value(101), None);
    assert!(f.drain_events().is_empty());
}

#[test]
fn whitespace_on_a_required_field_is_left_to_the_store() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("   "))
        .with(103u64, Some("12"));

    let (result, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(result, SaveResult::Redirect(ADMIN_URL.to_string()));
    assert_eq!(messages, vec![UserMessage::new(UPDATE_FAILED, Severity::Error)]);
    assert_eq!(f.value(101), None);
    assert_eq!(f.value(103).as_deref(), Some("12"));
    assert_eq!(f.drain_events().len(), 1);
}

#[test]
fn creation_flow_missing_required_returns_to_current_step() {
    let f = fixture();
    let submission = SubmittedFields::new().with(101u64, Some(""));

    let (result, messages) = f.save(&submission, &RequestAccess::creation("group-profile"));

    assert_eq!(
        result.redirect_target(),
        Some("https://example.org/groups/create/step/group-profile/")
    );
    assert_eq!(messages[0].text, MISSING_REQUIRED);
    assert_eq!(f.value(101), None);
}

#[test]
fn store_rejection_is_a_persist_failure_not_a_validation_failure() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(103u64, Some("a dozen"));

    let (result, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(result, SaveResult::Redirect(ADMIN_URL.to_string()));
    assert_eq!(messages, vec![UserMessage::new(UPDATE_FAILED, Severity::Error)]);
    // Earlier writes stay.
    assert_eq!(f.value(101).as_deref(), Some("Paris"));
    assert_eq!(f.value(103), None);

    let events = f.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field_id, FieldId(101));
}

#[test]
fn unknown_field_fails_only_its_own_write() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(999u64, Some("ghost"))
        .with(102u64, Some("kept"));

    let (_, messages) = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(messages[0].text, UPDATE_FAILED);
    assert_eq!(f.value(102).as_deref(), Some("kept"));
    assert_eq!(f.drain_events().len(), 1);
}

#[test]
fn clean_creation_step_continues_without_message() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(103u64, Some("12"));

    let (result, messages) = f.save(&submission, &RequestAccess::creation("group-profile"));

    assert_eq!(result, SaveResult::Continue);
    assert_eq!(result.redirect_target(), None);
    assert!(messages.is_empty());
    assert_eq!(f.drain_events().len(), 2);
}

#[test]
fn unauthorized_save_touches_nothing() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(102u64, None);

    let (result, messages) = f.save(&submission, &RequestAccess::edit(false));

    assert_eq!(result, SaveResult::Unchanged);
    assert!(messages.is_empty());
    assert_eq!(f.value(101), None);
    assert!(f.drain_events().is_empty());
}

#[test]
fn repeated_save_is_stable() {
    let mut f = fixture();
    let submission = SubmittedFields::new()
        .with(101u64, Some("Paris"))
        .with(103u64, Some("12"));

    let first = f.save(&submission, &RequestAccess::edit(true));
    let second = f.save(&submission, &RequestAccess::edit(true));

    assert_eq!(first, second);
    assert_eq!(f.value(101).as_deref(), Some("Paris"));
    assert_eq!(f.value(103).as_deref(), Some("12"));
    assert_eq!(f.drain_events().len(), 4);
}
