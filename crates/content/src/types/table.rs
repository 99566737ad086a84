//! Tables and their property schemas.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DataRecord, PropertyValue};
use crate::error::{ContentResult, ValidationError};
use crate::ids::{TableId, WorkspaceId};

/// The declared type of a table property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Free text.
    Text,
    /// A floating-point number.
    Number,
    /// A boolean flag.
    Checkbox,
    /// A timestamp stored as whole epoch seconds.
    Date,
    /// A list of strings.
    MultiSelect,
}

impl PropertyType {
    /// Returns the schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Number => "number",
            PropertyType::Checkbox => "checkbox",
            PropertyType::Date => "date",
            PropertyType::MultiSelect => "multi_select",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column in a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name, unique within the table.
    pub name: String,

    /// Declared type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

impl Property {
    /// Creates a property.
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
        }
    }
}

/// A record value viewed through its declared property type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Checkbox value.
    Checkbox(bool),
    /// Date value.
    Date(DateTime<Utc>),
    /// Multi-select value.
    MultiSelect(Vec<String>),
}

/// A named collection of records described by an ordered schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table ID.
    pub id: TableId,

    /// Owning workspace.
    pub workspace_id: WorkspaceId,

    /// Table name.
    pub name: String,

    /// Ordered property schema.
    #[serde(default)]
    pub properties: Vec<Property>,

    /// When the table was created.
    pub created: DateTime<Utc>,

    /// When the table was last modified.
    pub modified: DateTime<Utc>,
}

impl Table {
    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Reads a record value through the declared type of `property`.
    ///
    /// Returns `None` when the property is not part of the schema. A value of
    /// the wrong kind reads as the type's default.
    pub fn typed_value(&self, record: &DataRecord, property: &str) -> Option<TypedValue> {
        let prop = self.property(property)?;
        Some(match prop.property_type {
            PropertyType::Text => TypedValue::Text(record.get_string(property)),
            PropertyType::Number => TypedValue::Number(record.get_number(property)),
            PropertyType::Checkbox => TypedValue::Checkbox(record.get_bool(property)),
            PropertyType::Date => TypedValue::Date(record.get_time(property)),
            PropertyType::MultiSelect => TypedValue::MultiSelect(record.get_strings(property)),
        })
    }

    /// Returns the names of schema properties whose stored value does not
    /// match the declared type. Absent values are not reported.
    pub fn mismatched_properties(&self, record: &DataRecord) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| match record.get_any(&p.name) {
                None => false,
                Some(value) => !value_matches(p.property_type, value),
            })
            .map(|p| p.name.as_str())
            .collect()
    }
}

fn value_matches(property_type: PropertyType, value: &PropertyValue) -> bool {
    match (property_type, value) {
        (PropertyType::Text, PropertyValue::String(_)) => true,
        (PropertyType::Number | PropertyType::Date, PropertyValue::Number(_)) => true,
        (PropertyType::Checkbox, PropertyValue::Bool(_)) => true,
        (PropertyType::MultiSelect, PropertyValue::Strings(_) | PropertyValue::List(_)) => true,
        _ => false,
    }
}

/// Checks that every property has a non-empty, unique name.
pub fn validate_schema(properties: &[Property]) -> ContentResult<()> {
    let mut seen = HashSet::with_capacity(properties.len());
    for prop in properties {
        if prop.name.trim().is_empty() {
            return Err(ValidationError::InvalidSchema {
                message: "property name must not be empty".to_string(),
            }
            .into());
        }
        if !seen.insert(prop.name.as_str()) {
            return Err(ValidationError::InvalidSchema {
                message: format!("duplicate property name '{}'", prop.name),
            }
            .into());
        }
    }
    Ok(())
}

/// Input for creating a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTable {
    /// Table name; must be non-empty.
    pub name: String,

    /// Ordered property schema.
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl NewTable {
    /// Creates input with a name and an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a property to the schema.
    pub fn with_property(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        self.properties.push(Property::new(name, property_type));
        self
    }
}

/// Partial update of a table. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableUpdate {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Replacement schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}
