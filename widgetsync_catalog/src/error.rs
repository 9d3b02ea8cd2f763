// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for descriptor registration, property writes, and value conversion.

use thiserror::Error;

use crate::types::ValueKind;

/// A widget type's descriptor table is malformed.
///
/// Raised when a type is registered in a [`Catalog`](crate::Catalog). These are
/// setup-time configuration errors and are never recovered.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// An option or event was declared with an empty name.
    #[error("widget type `{widget}` declares an {item} with an empty name")]
    EmptyName {
        /// Rust type name of the widget.
        widget: &'static str,
        /// `"option"` or `"event"`.
        item: &'static str,
    },
    /// Two options share a name.
    #[error("widget type `{widget}` declares option `{option}` more than once")]
    DuplicateOption {
        /// Rust type name of the widget.
        widget: &'static str,
        /// The repeated option name.
        option: String,
    },
    /// More than one event is flagged as the data-changed event.
    #[error("widget type `{widget}` flags both `{first}` and `{second}` as data-changed events")]
    MultipleDataChangedEvents {
        /// Rust type name of the widget.
        widget: &'static str,
        /// First flagged event.
        first: String,
        /// Second flagged event.
        second: String,
    },
    /// An option has two redirection rules for the same value kind.
    #[error("option `{option}` on `{widget}` links {kind:?} values to more than one property")]
    AmbiguousPropertyLink {
        /// Rust type name of the widget.
        widget: &'static str,
        /// Option carrying the links.
        option: String,
        /// Value kind matched by both rules.
        kind: ValueKind,
    },
}

/// Writing a value onto a widget property failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PropertyError {
    /// The value's shape does not fit the property's type.
    #[error("cannot assign a {found:?} value: {message}")]
    TypeMismatch {
        /// Shape of the rejected value.
        found: ValueKind,
        /// Deserializer message.
        message: String,
    },
    /// The value has the right shape but is outside what the property accepts.
    #[error("invalid value: {0}")]
    Invalid(String),
}

impl PropertyError {
    /// True when the failure was a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// A [`Converter`](crate::convert::Converter) rejected its input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// The converter does not accept values of this shape.
    #[error("cannot convert from a {0:?} value")]
    UnsupportedSource(ValueKind),
    /// An item could not be parsed as an integer.
    #[error("`{0}` is not a valid integer")]
    InvalidInteger(String),
}
