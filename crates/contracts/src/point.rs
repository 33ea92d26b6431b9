//! DataPoint - Flattener output, sink input
//!
//! One measurable fact extracted from a structured message at one leaf path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Ordered tag set: tag name -> tag value
pub type Tags = IndexMap<String, String>;

/// Leaf value of a data point
///
/// Mappings never appear here. `List` is the only composite variant and is
/// kept so sinks that cannot store sequences can filter it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl FieldValue {
    /// Convert a JSON leaf into a field value.
    ///
    /// Returns `None` for `null` and for mappings (an empty mapping is an
    /// explicit no-value leaf).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::UInt(u))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Array(items) => Some(Self::List(items.clone())),
        }
    }

    /// Whether this value is a composite (sequence) rather than a scalar
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => write!(f, "{}", Value::Array(items.clone())),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// One tagged metric point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Ancestor path markers, in traversal order
    pub tags: Tags,
    /// Terminal key name in the source structure
    pub field: String,
    /// Leaf value; `None` for null or empty mappings
    pub value: Option<FieldValue>,
}

impl DataPoint {
    pub fn new(tags: Tags, field: impl Into<String>, value: Option<FieldValue>) -> Self {
        Self {
            tags,
            field: field.into(),
            value,
        }
    }

    /// Whether a backend that only stores scalars can record this point
    pub fn has_scalar_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_composite())
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tags: {:?}, Field: {}, Value: ", self.tags, self.field)?;
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(FieldValue::from_json(&json!(1)), Some(FieldValue::Int(1)));
        assert_eq!(
            FieldValue::from_json(&json!(u64::MAX)),
            Some(FieldValue::UInt(u64::MAX))
        );
        assert_eq!(
            FieldValue::from_json(&json!(1.5)),
            Some(FieldValue::Float(1.5))
        );
        assert_eq!(
            FieldValue::from_json(&json!("bot")),
            Some(FieldValue::Str("bot".into()))
        );
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!({})), None);
    }

    #[test]
    fn test_list_is_composite() {
        let value = FieldValue::from_json(&json!([1, 2])).unwrap();
        assert!(value.is_composite());
        assert_eq!(value.to_string(), "[1,2]");

        let point = DataPoint::new(Tags::new(), "xs", Some(value));
        assert!(!point.has_scalar_value());
    }

    #[test]
    fn test_display() {
        let mut tags = Tags::new();
        tags.insert("pos".into(), "1".into());
        let point = DataPoint::new(tags, "x", Some(FieldValue::Int(1)));
        assert_eq!(point.to_string(), r#"Tags: {"pos": "1"}, Field: x, Value: 1"#);

        let empty = DataPoint::new(Tags::new(), "gone", None);
        assert_eq!(empty.to_string(), "Tags: {}, Field: gone, Value: None");
    }
}
