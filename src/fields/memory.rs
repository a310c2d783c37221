use super::{FieldDefinition, FieldGroup, FieldKind, FieldStore};
use crate::core::{FieldId, FieldsError, GroupId, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::debug;

/// Field store kept entirely in process memory.
///
/// Each write takes the value lock on its own; two writers on the same
/// field and group resolve as last-writer-wins.
#[derive(Debug, Default)]
pub struct InMemoryFieldStore {
    group: RwLock<Option<FieldGroup>>,
    definitions: RwLock<BTreeMap<FieldId, FieldDefinition>>,
    values: RwLock<HashMap<(FieldId, GroupId), String>>,
}

impl InMemoryFieldStore {
    /// Creates an empty store with no field group installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the field group installed and a starter set of
    /// fields
    pub fn with_default_fields() -> Result<Self> {
        let store = Self::new();
        store.install(FieldGroup {
            id: 1,
            name: "Group profile".to_string(),
        })?;
        store.register_field(
            FieldDefinition::new(1, "Description", FieldKind::TextArea)
                .description("What this group is about")
                .required()
                .order(0),
        )?;
        store.register_field(FieldDefinition::new(2, "Website", FieldKind::Url).order(1))?;
        store.register_field(FieldDefinition::new(3, "Contact", FieldKind::TextBox).order(2))?;
        store.register_field(FieldDefinition::new(4, "Founded", FieldKind::DateBox).order(3))?;
        Ok(store)
    }

    pub fn install(&self, group: FieldGroup) -> Result<()> {
        *self.group.write()? = Some(group);
        Ok(())
    }

    pub fn uninstall(&self) -> Result<()> {
        *self.group.write()? = None;
        Ok(())
    }

    /// Adds or replaces a field definition
    pub fn register_field(&self, definition: FieldDefinition) -> Result<()> {
        debug!(field_id = %definition.id, name = %definition.name, "registering profile field");
        self.definitions.write()?.insert(definition.id, definition);
        Ok(())
    }
}

impl FieldStore for InMemoryFieldStore {
    fn fields_group(&self) -> Result<Option<FieldGroup>> {
        Ok(self.group.read()?.clone())
    }

    fn fields(&self) -> Result<Vec<FieldDefinition>> {
        let mut fields: Vec<FieldDefinition> = self.definitions.read()?.values().cloned().collect();
        fields.sort_by_key(|field| (field.order, field.id));
        Ok(fields)
    }

    fn field(&self, field_id: FieldId) -> Result<Option<FieldDefinition>> {
        Ok(self.definitions.read()?.get(&field_id).cloned())
    }

    fn field_value(&self, field_id: FieldId, group_id: GroupId) -> Result<Option<String>> {
        Ok(self.values.read()?.get(&(field_id, group_id)).cloned())
    }

    fn set_field_value(
        &self,
        field_id: FieldId,
        group_id: GroupId,
        value: &str,
        is_required: bool,
    ) -> Result<()> {
        let definition = self
            .field(field_id)?
            .ok_or(FieldsError::FieldNotFound(field_id))?;

        if value.trim().is_empty() {
            if is_required {
                return Err(FieldsError::rejected(
                    field_id,
                    group_id,
                    "a value is required",
                ));
            }
            self.values.write()?.remove(&(field_id, group_id));
            debug!(%field_id, %group_id, "cleared profile field value");
            return Ok(());
        }

        let stored = definition
            .kind
            .normalize(value)
            .map_err(|reason| FieldsError::rejected(field_id, group_id, reason))?;

        self.values.write()?.insert((field_id, group_id), stored);
        debug!(%field_id, %group_id, "stored profile field value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryFieldStore {
        InMemoryFieldStore::with_default_fields().unwrap()
    }

    #[test]
    fn default_fields_are_installed_in_order() {
        let store = store();
        assert!(store.fields_group().unwrap().is_some());

        let names: Vec<String> = store.fields().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Description", "Website", "Contact", "Founded"]);
        assert!(store.is_required(FieldId(1)));
        assert!(!store.is_required(FieldId(2)));
        assert!(!store.is_required(FieldId(999)));
    }

    #[test]
    fn set_and_read_value() {
        let store = store();
        store
            .set_field_value(FieldId(1), GroupId(7), "A reading club", true)
            .unwrap();
        assert_eq!(
            store.field_value(FieldId(1), GroupId(7)).unwrap().as_deref(),
            Some("A reading club")
        );
        assert_eq!(store.field_value(FieldId(1), GroupId(8)).unwrap(), None);
    }

    #[test]
    fn writing_twice_keeps_the_same_value() {
        let store = store();
        store.set_field_value(FieldId(3), GroupId(1), "desk", false).unwrap();
        store.set_field_value(FieldId(3), GroupId(1), "desk", false).unwrap();
        assert_eq!(
            store.field_value(FieldId(3), GroupId(1)).unwrap().as_deref(),
            Some("desk")
        );
    }

    #[test]
    fn blank_required_value_is_rejected() {
        let store = store();
        let err = store
            .set_field_value(FieldId(1), GroupId(1), "  ", true)
            .unwrap_err();
        assert!(matches!(err, FieldsError::Rejected { .. }));
    }

    #[test]
    fn blank_optional_value_clears_the_field() {
        let store = store();
        store
            .set_field_value(FieldId(2), GroupId(1), "https://example.org", false)
            .unwrap();
        store.set_field_value(FieldId(2), GroupId(1), "", false).unwrap();
        assert_eq!(store.field_value(FieldId(2), GroupId(1)).unwrap(), None);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let store = store();
        let err = store
            .set_field_value(FieldId(42), GroupId(1), "x", false)
            .unwrap_err();
        assert!(matches!(err, FieldsError::FieldNotFound(FieldId(42))));
    }

    #[test]
    fn kind_rules_apply_on_write() {
        let store = store();
        assert!(store
            .set_field_value(FieldId(2), GroupId(1), "not a url", false)
            .is_err());
        assert_eq!(store.field_value(FieldId(2), GroupId(1)).unwrap(), None);
    }

    #[test]
    fn uninstall_removes_field_group() {
        let store = store();
        store.uninstall().unwrap();
        assert!(store.fields_group().unwrap().is_none());
    }
}
