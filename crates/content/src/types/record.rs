//! Data records and their typed accessors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PropertyValue;
use crate::ids::{RecordId, TableId};

/// Epoch seconds of `0001-01-01T00:00:00Z`, the zero time.
pub const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// The time returned for absent or unreadable date values:
/// `0001-01-01T00:00:00Z`.
///
/// It is distinct from the Unix epoch, so a stored `0` stays
/// distinguishable from a missing date.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// One row of a table: a map from property name to an untyped value.
///
/// The accessors implement schema-on-read. A missing property or a value of
/// the wrong kind yields the type's default rather than an error, so records
/// keep working after their table's schema has been edited.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use mddb_content::ids::TableId;
/// use mddb_content::types::{DataRecord, PropertyValue};
///
/// let mut record = DataRecord::new(TableId::new("tasks"));
/// record.set_value("title", "Write docs");
/// record.set_value("tags", vec![
///     PropertyValue::from("a"),
///     PropertyValue::from(1),
///     PropertyValue::from("b"),
/// ]);
///
/// assert_eq!(record.get_string("title"), "Write docs");
/// assert_eq!(record.get_strings("tags"), vec!["a", "b"]);
/// assert_eq!(record.get_number("title"), 0.0);
///
/// let due = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// record.set_time("due", due);
/// assert_eq!(record.get_time("due"), due);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Record ID, unique within its table.
    pub id: RecordId,

    /// The table that contains this record.
    pub table_id: TableId,

    /// Property values keyed by property name.
    #[serde(default)]
    pub data: BTreeMap<String, PropertyValue>,

    /// When the record was created.
    pub created: DateTime<Utc>,

    /// When the record was last modified.
    pub modified: DateTime<Utc>,
}

impl DataRecord {
    /// Creates an empty record with a fresh ID.
    pub fn new(table_id: TableId) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            table_id,
            data: BTreeMap::new(),
            created: now,
            modified: now,
        }
    }

    /// Creates a record holding the given data.
    pub fn with_data(table_id: TableId, data: BTreeMap<String, PropertyValue>) -> Self {
        Self {
            data,
            ..Self::new(table_id)
        }
    }

    /// Returns the string value of a property, or `""`.
    pub fn get_string(&self, name: &str) -> String {
        match self.data.get(name) {
            Some(PropertyValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Returns the numeric value of a property, or `0.0`.
    pub fn get_number(&self, name: &str) -> f64 {
        match self.data.get(name) {
            Some(PropertyValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    /// Returns the boolean value of a property, or `false`.
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.data.get(name), Some(PropertyValue::Bool(true)))
    }

    /// Interprets a numeric property as whole epoch seconds in UTC.
    ///
    /// Returns [`zero_time`] when the property is absent, not a number, or
    /// outside the representable range.
    pub fn get_time(&self, name: &str) -> DateTime<Utc> {
        match self.data.get(name) {
            Some(PropertyValue::Number(n)) if n.is_finite() => {
                DateTime::from_timestamp(n.trunc() as i64, 0).unwrap_or_else(zero_time)
            }
            _ => zero_time(),
        }
    }

    /// Returns a string-list property.
    ///
    /// A mixed list keeps only its string elements. Anything else yields an
    /// empty vector.
    pub fn get_strings(&self, name: &str) -> Vec<String> {
        match self.data.get(name) {
            Some(PropertyValue::Strings(items)) => items.clone(),
            Some(PropertyValue::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    PropertyValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the raw value of a property.
    pub fn get_any(&self, name: &str) -> Option<&PropertyValue> {
        self.data.get(name)
    }

    /// Overwrites a property value.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.data.insert(name.into(), value.into());
    }

    /// Stores a timestamp as whole epoch seconds. Sub-second precision is lost.
    pub fn set_time(&mut self, name: impl Into<String>, time: DateTime<Utc>) {
        self.data
            .insert(name.into(), PropertyValue::Number(time.timestamp() as f64));
    }

    /// Removes a property, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.data.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> DataRecord {
        DataRecord::new(TableId::new("t-1"))
    }

    #[test]
    fn test_absent_properties_default() {
        let r = record();
        assert_eq!(r.get_string("x"), "");
        assert_eq!(r.get_number("x"), 0.0);
        assert!(!r.get_bool("x"));
        assert_eq!(r.get_time("x"), zero_time());
        assert!(r.get_strings("x").is_empty());
        assert!(r.get_any("x").is_none());
    }

    #[test]
    fn test_mismatched_types_default() {
        let mut r = record();
        r.set_value("n", 42);
        r.set_value("s", "hello");
        r.set_value("b", true);

        assert_eq!(r.get_string("n"), "");
        assert_eq!(r.get_number("s"), 0.0);
        assert!(!r.get_bool("s"));
        assert_eq!(r.get_time("b"), zero_time());
        assert!(r.get_strings("s").is_empty());

        assert_eq!(r.get_number("n"), 42.0);
        assert_eq!(r.get_string("s"), "hello");
        assert!(r.get_bool("b"));
    }

    #[test]
    fn test_get_strings_filters_mixed_list() {
        let mut r = record();
        r.set_value(
            "tags",
            vec![
                PropertyValue::from("a"),
                PropertyValue::from(1),
                PropertyValue::from("b"),
            ],
        );
        assert_eq!(r.get_strings("tags"), vec!["a".to_string(), "b".to_string()]);

        r.set_value("labels", vec!["x", "y"]);
        assert_eq!(r.get_strings("labels"), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_set_time_truncates_sub_seconds() {
        let mut r = record();
        let t = Utc.timestamp_opt(1_700_000_000, 987_654_321).unwrap();
        r.set_time("due", t);

        assert_eq!(r.get_any("due"), Some(&PropertyValue::Number(1_700_000_000.0)));
        assert_eq!(r.get_time("due"), Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_get_time_out_of_range_defaults() {
        let mut r = record();
        r.set_value("far", f64::MAX);
        r.set_value("nan", f64::NAN);
        assert_eq!(r.get_time("far"), zero_time());
        assert_eq!(r.get_time("nan"), zero_time());
    }

    #[test]
    fn test_stored_zero_is_epoch_not_zero_time() {
        let mut stored = record();
        stored.set_value("due", 0.0);
        let absent = record();

        assert_eq!(stored.get_time("due"), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(absent.get_time("due"), zero_time());
        assert_ne!(stored.get_time("due"), absent.get_time("due"));
    }

    #[test]
    fn test_zero_time_is_year_one() {
        let zero = zero_time();
        assert_eq!(zero, Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(zero.timestamp(), ZERO_TIME_SECS);
    }

    #[test]
    fn test_set_value_overwrites() {
        let mut r = record();
        r.set_value("status", "open");
        r.set_value("status", 3);
        assert_eq!(r.get_number("status"), 3.0);
        assert_eq!(r.remove("status"), Some(PropertyValue::Number(3.0)));
        assert!(r.get_any("status").is_none());
    }

    #[test]
    fn test_record_json_form() {
        let mut r = record();
        r.set_value("done", false);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["data"]["done"], serde_json::json!(false));
        assert_eq!(json["table_id"], serde_json::json!("t-1"));

        let back: DataRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
