// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the catalog: value kinds, property kinds, and descriptor flags.

use serde_json::Value;

/// Runtime shape of a JSON option value.
///
/// Used to decide whether a [`Converter`](crate::convert::Converter) accepts a value
/// and to select a [`PropertyLink`](crate::option::PropertyLink) redirection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool,
    /// Any JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// Declared type of the server-side property backing an option.
///
/// Only [`PropertyKind::Text`] changes reconciliation behavior today: a textual
/// property never receives the client's boolean `false` placeholder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropertyKind {
    /// String-valued property.
    Text,
    /// Boolean property.
    Boolean,
    /// Integral number.
    Integer,
    /// Floating-point number.
    Float,
    /// Sequence of values.
    Array,
    /// Structured value.
    Object,
    /// Untyped; accepts any JSON value.
    Any,
}

impl PropertyKind {
    /// True for [`PropertyKind::Text`].
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

bitflags::bitflags! {
    /// Per-option flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OptionFlags: u8 {
        /// The client HTML-encodes this option's text before posting it back.
        const HTML_ENCODED  = 0b0000_0001;
        /// The value is client code and is emitted wrapped in an eval marker.
        const REQUIRES_EVAL = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Per-event flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// The event submits the form when the widget instance has auto post-back enabled.
        const AUTO_POST_BACK = 0b0000_0001;
        /// The event signals that the widget's bound value changed.
        const DATA_CHANGED   = 0b0000_0010;
    }
}
