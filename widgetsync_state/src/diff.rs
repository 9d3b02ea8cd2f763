// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option diffing against declared defaults.
//!
//! ## Overview
//!
//! Only options whose current value differs from the declared default are sent
//! to the client; the client widget already knows its own defaults. Values are
//! compared structurally (see [`values_equal`]), so two arrays holding the same
//! items are equal no matter where they came from.

use serde_json::{Map, Value, json};
use widgetsync_catalog::{Widget, WidgetDescriptors};

use crate::error::StateError;

/// Options of one widget instance that must be sent to the client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionDiff {
    /// Option name → value, for options differing from their default.
    pub options: Map<String, Value>,
    /// Names of every option the client HTML-encodes on post-back.
    pub encoded_options: Vec<String>,
}

impl OptionDiff {
    /// True when no option differs from its default.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Structural equality with numeric comparison for numbers.
///
/// `5` equals `5.0`; arrays compare item by item in order; objects compare key by key.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

/// True if `current` must be sent because it differs from `default`.
pub fn differs_from_default(current: &Value, default: &Value) -> bool {
    match (current.is_null(), default.is_null()) {
        (true, true) => false,
        (true, false) | (false, true) => true,
        (false, false) => !values_equal(current, default),
    }
}

/// Wrap client code so the client evaluates it rather than treating it as data.
pub fn eval_marker(value: Value) -> Value {
    json!({ "eval": true, "on": value })
}

/// Compute the options of `widget` that differ from their defaults.
pub fn compute_options<W: Widget>(descriptors: &WidgetDescriptors<W>, widget: &W) -> OptionDiff {
    let mut diff = OptionDiff::default();
    for option in descriptors.options() {
        let current = option.property().get(widget);
        if differs_from_default(&current, option.default_value()) {
            let value = if option.is_eval() {
                eval_marker(current)
            } else {
                current
            };
            diff.options.insert(option.name().to_owned(), value);
        }
        if option.is_html_encoded() {
            diff.encoded_options.push(option.name().to_owned());
        }
    }
    diff
}

/// Write every option's default onto `widget` where the current value differs.
///
/// Returns the number of properties written.
pub fn apply_defaults<W: Widget>(
    descriptors: &WidgetDescriptors<W>,
    widget: &mut W,
) -> Result<usize, StateError> {
    let mut written = 0;
    for option in descriptors.options() {
        let current = option.property().get(widget);
        if values_equal(&current, option.default_value()) {
            continue;
        }
        option
            .property()
            .set(widget, option.default_value().clone())
            .map_err(|source| StateError::Property {
                option: option.name().to_owned(),
                property: option.property().name(),
                source,
            })?;
        written += 1;
    }
    Ok(written)
}
