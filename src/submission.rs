//! Typed view of a submitted profile form.
//!
//! Raw form data arrives as string pairs: a `field_ids` list naming the
//! submitted fields and one `field_<id>` entry per value. Date boxes post
//! their parts separately as `field_<id>_day`, `field_<id>_month` and
//! `field_<id>_year`; those are folded into a single value here so the save
//! pass only ever sees one value per field.

use crate::core::FieldId;
use crate::fields::DATE_FORMAT;
use chrono::{Month, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

pub const FIELD_IDS_KEY: &str = "field_ids";

lazy_static! {
    static ref DATE_PART_KEY: Regex = Regex::new(r"^field_(\d+)_(day|month|year)$")
        .expect("date part pattern is valid");
}

/// Form key carrying the value of a field
pub fn field_key(field_id: FieldId) -> String {
    format!("field_{}", field_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSubmission {
    pub field_id: FieldId,
    pub raw_value: Option<String>,
}

impl FieldSubmission {
    /// Value to persist; absent values are written as empty strings
    pub fn value(&self) -> &str {
        self.raw_value.as_deref().unwrap_or("")
    }

    /// Whether the submitted value counts as missing for a required field.
    ///
    /// Absent, `""` and `"0"` are missing. Whitespace is a value here and is
    /// left to the store to judge.
    pub fn is_blank(&self) -> bool {
        matches!(self.raw_value.as_deref(), None | Some("") | Some("0"))
    }
}

/// The ordered set of fields submitted in one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedFields {
    submissions: Vec<FieldSubmission>,
}

impl SubmittedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. A field already present keeps its first position and
    /// value.
    pub fn with(mut self, field_id: impl Into<FieldId>, value: Option<&str>) -> Self {
        let field_id = field_id.into();
        if !self.contains(field_id) {
            self.submissions.push(FieldSubmission {
                field_id,
                raw_value: value.map(str::to_string),
            });
        }
        self
    }

    /// Builds the submission from decoded form pairs.
    ///
    /// Entries of `field_ids` that are not positive integers are skipped.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let Some(raw_ids) = form.get(FIELD_IDS_KEY) else {
            return Self::new();
        };

        let date_parts = collect_date_parts(form);
        let mut submitted = Self::new();

        for token in raw_ids
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            let field_id = match token.parse::<FieldId>() {
                Ok(field_id) if field_id.0 != 0 => field_id,
                _ => {
                    debug!(token, "skipping malformed field id");
                    continue;
                }
            };

            let value = match form.get(&field_key(field_id)) {
                Some(value) => Some(value.clone()),
                None => date_parts.get(&field_id).and_then(|parts| parts.fold()),
            };
            submitted = submitted.with(field_id, value.as_deref());
        }

        submitted
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn contains(&self, field_id: FieldId) -> bool {
        self.submissions.iter().any(|s| s.field_id == field_id)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.submissions.iter().map(|s| s.field_id)
    }

    pub fn get(&self, field_id: FieldId) -> Option<&FieldSubmission> {
        self.submissions.iter().find(|s| s.field_id == field_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSubmission> {
        self.submissions.iter()
    }
}

impl<'a> IntoIterator for &'a SubmittedFields {
    type Item = &'a FieldSubmission;
    type IntoIter = std::slice::Iter<'a, FieldSubmission>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Default)]
struct DateParts<'a> {
    day: Option<&'a str>,
    month: Option<&'a str>,
    year: Option<&'a str>,
}

impl DateParts<'_> {
    /// All three parts forming a real calendar date, else nothing
    fn fold(&self) -> Option<String> {
        let day = self.day?.trim().parse::<u32>().ok()?;
        let year = self.year?.trim().parse::<i32>().ok()?;
        let month = parse_month(self.month?.trim())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.format(DATE_FORMAT).to_string())
    }
}

fn parse_month(raw: &str) -> Option<u32> {
    match raw.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Some(month),
        Ok(_) => None,
        Err(_) => raw.parse::<Month>().ok().map(|month| month.number_from_month()),
    }
}

fn collect_date_parts(form: &HashMap<String, String>) -> HashMap<FieldId, DateParts<'_>> {
    let mut parts: HashMap<FieldId, DateParts<'_>> = HashMap::new();

    for (key, value) in form {
        let Some(captures) = DATE_PART_KEY.captures(key) else {
            continue;
        };
        let Ok(field_id) = captures[1].parse::<FieldId>() else {
            continue;
        };
        let entry = parts.entry(field_id).or_default();
        match &captures[2] {
            "day" => entry.day = Some(value.as_str()),
            "month" => entry.month = Some(value.as_str()),
            _ => entry.year = Some(value.as_str()),
        }
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_field_ids_is_an_empty_submission() {
        let submitted = SubmittedFields::from_form(&form(&[("field_1", "x")]));
        assert!(submitted.is_empty());
    }

    #[test]
    fn keeps_submission_order_and_drops_duplicates() {
        let submitted = SubmittedFields::from_form(&form(&[
            ("field_ids", "3,1, 3 2"),
            ("field_1", "one"),
            ("field_3", "three"),
        ]));

        let ids: Vec<u64> = submitted.field_ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(submitted.get(FieldId(3)).unwrap().value(), "three");
        assert_eq!(submitted.get(FieldId(2)).unwrap().raw_value, None);
        assert!(submitted.get(FieldId(2)).unwrap().is_blank());
    }

    #[test]
    fn skips_zero_and_non_numeric_ids() {
        let submitted = SubmittedFields::from_form(&form(&[
            ("field_ids", "1,abc,0,-2"),
            ("field_1", "x"),
        ]));

        let ids: Vec<u64> = submitted.field_ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(submitted.get(FieldId(1)).unwrap().value(), "x");

        let submitted = SubmittedFields::from_form(&form(&[("field_ids", "0,zero")]));
        assert!(submitted.is_empty());
    }

    #[test]
    fn zero_and_empty_are_blank_but_whitespace_is_not() {
        let blank = |value: Option<&str>| {
            SubmittedFields::new()
                .with(1u64, value)
                .get(FieldId(1))
                .unwrap()
                .is_blank()
        };

        assert!(blank(None));
        assert!(blank(Some("")));
        assert!(blank(Some("0")));
        assert!(!blank(Some("  ")));
        assert!(!blank(Some("00")));
        assert!(!blank(Some("Paris")));
    }

    #[test]
    fn folds_date_parts() {
        let submitted = SubmittedFields::from_form(&form(&[
            ("field_ids", "4"),
            ("field_4_day", "9"),
            ("field_4_month", "March"),
            ("field_4_year", "2014"),
        ]));
        assert_eq!(
            submitted.get(FieldId(4)).unwrap().value(),
            "2014-03-09 00:00:00"
        );
    }

    #[test]
    fn incomplete_or_invalid_dates_stay_absent() {
        let submitted = SubmittedFields::from_form(&form(&[
            ("field_ids", "4,5"),
            ("field_4_day", "9"),
            ("field_4_year", "2014"),
            ("field_5_day", "31"),
            ("field_5_month", "2"),
            ("field_5_year", "2014"),
        ]));
        assert_eq!(submitted.get(FieldId(4)).unwrap().raw_value, None);
        assert_eq!(submitted.get(FieldId(5)).unwrap().raw_value, None);
    }

    #[test]
    fn explicit_value_wins_over_date_parts() {
        let submitted = SubmittedFields::from_form(&form(&[
            ("field_ids", "4"),
            ("field_4", "2000-01-01 00:00:00"),
            ("field_4_day", "9"),
            ("field_4_month", "3"),
            ("field_4_year", "2014"),
        ]));
        assert_eq!(
            submitted.get(FieldId(4)).unwrap().value(),
            "2000-01-01 00:00:00"
        );
    }
}
