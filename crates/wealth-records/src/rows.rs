//! Collected Rows
//!
//! Model-level and agent-level rows produced by the data collector.
//! One model row per collected step; one agent row per agent per collected step.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::ReporterValue;

/// Reporter name -> value, kept in the order the reporters were registered.
///
/// Serializes as a JSON object whose keys follow registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterValues(Vec<(String, ReporterValue)>);

impl ReporterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a value; a repeated name replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: ReporterValue) {
        let name = name.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<ReporterValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ReporterValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ReporterValue)> for ReporterValues {
    fn from_iter<I: IntoIterator<Item = (String, ReporterValue)>>(iter: I) -> Self {
        let mut values = ReporterValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

impl Serialize for ReporterValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReporterValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = ReporterValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of reporter names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values = ReporterValues::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, ReporterValue>()? {
                    values.insert(name, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(ValuesVisitor)
    }
}

/// Model-level values for one collected step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    pub step: u64,
    pub values: ReporterValues,
}

/// Agent-level values for one agent at one collected step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRow {
    pub step: u64,
    pub agent_id: u64,
    pub values: ReporterValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_registration_order() {
        let mut values = ReporterValues::new();
        values.insert("Gini", ReporterValue::Float(0.4));
        values.insert("Total_Wealth", ReporterValue::Int(100));
        values.insert("Gini", ReporterValue::Float(0.5));

        let names: Vec<&str> = values.names().collect();
        assert_eq!(names, vec!["Gini", "Total_Wealth"]);
        assert_eq!(values.get("Gini"), Some(ReporterValue::Float(0.5)));
        assert_eq!(values.get("Missing"), None);
    }

    #[test]
    fn test_row_json_preserves_column_order() {
        let mut values = ReporterValues::new();
        values.insert("Wealth", ReporterValue::Int(3));
        values.insert("Steps_Not_Given", ReporterValue::Int(0));

        let row = AgentRow {
            step: 2,
            agent_id: 7,
            values,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"step":2,"agent_id":7,"values":{"Wealth":3,"Steps_Not_Given":0}}"#
        );

        let parsed: AgentRow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, row);
    }
}
