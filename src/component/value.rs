//! Component payloads.
//!
//! Components attach typed data to an entity under a string key. The
//! payload is an explicit tagged union rather than an open-ended
//! property bag, so the only mutation paths are the map's add/remove
//! entry points.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Data stored for one component on one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentValue {
    /// Tag component, no payload.
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Structured payload for components that need nested data.
    Json(serde_json::Value),
}

impl ComponentValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl Default for ComponentValue {
    fn default() -> Self {
        Self::Unit
    }
}

impl From<()> for ComponentValue {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for ComponentValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ComponentValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for ComponentValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ComponentValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ComponentValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ComponentValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<serde_json::Value> for ComponentValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Optional per-kind initializer, applied to the caller-supplied value
/// on every add. Registered together with the kind name.
pub type ComponentFactory = Arc<dyn Fn(ComponentValue) -> ComponentValue + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(ComponentValue::from(5).as_int(), Some(5));
        assert_eq!(ComponentValue::from(2.5).as_float(), Some(2.5));
        assert_eq!(ComponentValue::from(7).as_float(), Some(7.0));
        assert_eq!(ComponentValue::from("hp").as_text(), Some("hp"));
        assert_eq!(ComponentValue::from(true).as_bool(), Some(true));
        assert!(ComponentValue::Unit.is_unit());
        assert_eq!(ComponentValue::from(5).as_text(), None);
    }

    #[test]
    fn test_json_payload() {
        let value = ComponentValue::from(serde_json::json!({ "x": 1.0, "y": 2.0 }));
        let json = value.as_json().unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["y"], 2.0);
    }

    #[test]
    fn test_factory_wraps_value() {
        let factory: ComponentFactory = Arc::new(|v| match v {
            ComponentValue::Int(n) => ComponentValue::Int(n * 2),
            other => other,
        });
        assert_eq!(factory(ComponentValue::Int(21)), ComponentValue::Int(42));
    }
}
