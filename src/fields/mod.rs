//! Profile field registry and storage
//!
//! The save pass only ever talks to a [`FieldStore`]. The store owns field
//! definitions, required-ness and the per-kind rules a value must satisfy
//! before it is written.

mod memory;

pub use memory::InMemoryFieldStore;

use crate::core::{FieldId, GroupId, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage format of date-box values
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The group of profile fields this tab edits.
///
/// Its absence means installation never completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    TextBox,
    TextArea,
    Url,
    Number,
    DateBox,
    SelectBox(Vec<String>),
}

impl FieldKind {
    /// Checks a non-blank value against the kind and returns the form it is
    /// stored in.
    pub fn normalize(&self, value: &str) -> std::result::Result<String, String> {
        match self {
            FieldKind::TextBox | FieldKind::TextArea => Ok(value.to_string()),
            FieldKind::Url => {
                let trimmed = value.trim();
                if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                    Ok(trimmed.to_string())
                } else {
                    Err(format!("'{}' is not a valid URL", trimmed))
                }
            }
            FieldKind::Number => value
                .trim()
                .parse::<i64>()
                .map(|n| n.to_string())
                .map_err(|_| format!("'{}' is not a number", value.trim())),
            FieldKind::DateBox => parse_date(value.trim())
                .map(|date| date.format(DATE_FORMAT).to_string())
                .ok_or_else(|| format!("'{}' is not a valid date", value.trim())),
            FieldKind::SelectBox(options) => {
                if options.iter().any(|option| option == value) {
                    Ok(value.to_string())
                } else {
                    Err(format!("'{}' is not one of the allowed options", value))
                }
            }
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// A field an administrator defined for group profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order: u32,
}

impl FieldDefinition {
    pub fn new(id: u64, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: FieldId(id),
            name: name.into(),
            description: String::new(),
            kind,
            required: false,
            order: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// Field registry and per-group field data
pub trait FieldStore: Send + Sync {
    /// The installed field group, if any
    fn fields_group(&self) -> Result<Option<FieldGroup>>;

    /// All field definitions in display order
    fn fields(&self) -> Result<Vec<FieldDefinition>>;

    fn field(&self, field_id: FieldId) -> Result<Option<FieldDefinition>>;

    /// Whether a value is mandatory for this field. Unknown fields are optional.
    ///
    /// A failed lookup is logged and read as optional; the write that follows
    /// hits the same store and reports the failure.
    fn is_required(&self, field_id: FieldId) -> bool {
        match self.field(field_id) {
            Ok(definition) => definition.is_some_and(|definition| definition.required),
            Err(err) => {
                warn!(field_id = %field_id, error = %err, "could not read field requiredness");
                false
            }
        }
    }

    fn field_value(&self, field_id: FieldId, group_id: GroupId) -> Result<Option<String>>;

    /// Writes a value for one group. A blank value clears optional fields and
    /// is rejected for required ones.
    fn set_field_value(
        &self,
        field_id: FieldId,
        group_id: GroupId,
        value: &str,
        is_required: bool,
    ) -> Result<()>;
}
