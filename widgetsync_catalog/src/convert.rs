// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type conversion rules applied to posted option values.
//!
//! A client posts whatever its widget holds; a server property may want a
//! different shape (for example a comma-delimited string that is really a list
//! of integers). Attach a [`Converter`] to an
//! [`OptionDescriptor`](crate::option::OptionDescriptor) and the reconciler runs
//! posted values through it before writing them back.

use core::fmt::Debug;

use serde_json::Value;

use crate::error::ConvertError;
use crate::types::ValueKind;

/// Conversion rule for one property type.
pub trait Converter: Debug + Send + Sync {
    /// Whether [`Converter::convert_from`] accepts values of this shape.
    fn can_convert_from(&self, source: ValueKind) -> bool;

    /// Convert a posted value into the property's shape.
    fn convert_from(&self, value: Value) -> Result<Value, ConvertError>;

    /// Render a property value as text.
    fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError>;
}

/// Converts delimited text or JSON arrays into an array of integers.
///
/// Accepted inputs:
/// - `"1,2,3"` and `"[1,2,3]"` (whitespace around items is ignored, `""` is empty),
/// - `[1, 2, 3]` and `["1", "2", "3"]`.
///
/// ```
/// use serde_json::json;
/// use widgetsync_catalog::convert::{Converter, IntArrayConverter};
///
/// let ints = IntArrayConverter.convert_from(json!("[10, 20]")).unwrap();
/// assert_eq!(ints, json!([10, 20]));
/// assert_eq!(IntArrayConverter.convert_to_string(&ints).unwrap(), "10,20");
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct IntArrayConverter;

impl IntArrayConverter {
    fn parse_item(text: &str) -> Result<i64, ConvertError> {
        let text = text.trim();
        text.parse::<i64>()
            .map_err(|_| ConvertError::InvalidInteger(text.to_owned()))
    }

    fn item_of(value: &Value) -> Result<i64, ConvertError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| ConvertError::InvalidInteger(n.to_string())),
            Value::String(s) => Self::parse_item(s),
            other => Err(ConvertError::UnsupportedSource(ValueKind::of(other))),
        }
    }
}

impl Converter for IntArrayConverter {
    fn can_convert_from(&self, source: ValueKind) -> bool {
        matches!(source, ValueKind::String | ValueKind::Array)
    }

    fn convert_from(&self, value: Value) -> Result<Value, ConvertError> {
        let items: Vec<i64> = match &value {
            Value::String(s) => {
                let inner = s.trim();
                let inner = inner.strip_prefix('[').unwrap_or(inner);
                let inner = inner.strip_suffix(']').unwrap_or(inner);
                if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    inner
                        .split(',')
                        .map(Self::parse_item)
                        .collect::<Result<_, _>>()?
                }
            }
            Value::Array(items) => items.iter().map(Self::item_of).collect::<Result<_, _>>()?,
            other => return Err(ConvertError::UnsupportedSource(ValueKind::of(other))),
        };
        Ok(Value::Array(items.into_iter().map(Value::from).collect()))
    }

    fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError> {
        let Value::Array(items) = value else {
            return Err(ConvertError::UnsupportedSource(ValueKind::of(value)));
        };
        let parts = items
            .iter()
            .map(|v| Self::item_of(v).map(|i| i.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_text_and_arrays_only() {
        let c = IntArrayConverter;
        assert!(c.can_convert_from(ValueKind::String));
        assert!(c.can_convert_from(ValueKind::Array));
        assert!(!c.can_convert_from(ValueKind::Bool));
        assert!(!c.can_convert_from(ValueKind::Null));
    }

    #[test]
    fn delimited_text_with_and_without_brackets() {
        let c = IntArrayConverter;
        assert_eq!(c.convert_from(json!("1,2,3")).unwrap(), json!([1, 2, 3]));
        assert_eq!(c.convert_from(json!("[4, 5]")).unwrap(), json!([4, 5]));
        assert_eq!(c.convert_from(json!(" -7 ")).unwrap(), json!([-7]));
    }

    #[test]
    fn empty_text_is_empty_array() {
        assert_eq!(IntArrayConverter.convert_from(json!("")).unwrap(), json!([]));
        assert_eq!(IntArrayConverter.convert_from(json!("[]")).unwrap(), json!([]));
    }

    #[test]
    fn json_arrays_of_numbers_or_numeric_text() {
        let c = IntArrayConverter;
        assert_eq!(c.convert_from(json!([3, 9])).unwrap(), json!([3, 9]));
        assert_eq!(c.convert_from(json!(["3", "9"])).unwrap(), json!([3, 9]));
    }

    #[test]
    fn rejects_non_integers() {
        let c = IntArrayConverter;
        assert_eq!(
            c.convert_from(json!("1,x")),
            Err(ConvertError::InvalidInteger("x".into()))
        );
        assert_eq!(
            c.convert_from(json!([1.5])),
            Err(ConvertError::InvalidInteger("1.5".into()))
        );
        assert_eq!(
            c.convert_from(json!(false)),
            Err(ConvertError::UnsupportedSource(ValueKind::Bool))
        );
    }

    #[test]
    fn joins_to_text() {
        assert_eq!(
            IntArrayConverter.convert_to_string(&json!([1, 20, 300])).unwrap(),
            "1,20,300"
        );
        assert_eq!(IntArrayConverter.convert_to_string(&json!([])).unwrap(), "");
    }
}
