// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option descriptors and the typed property accessors behind them.
//!
//! ## Overview
//!
//! An [`OptionDescriptor`] names one client widget option, its default value, and
//! the server-side [`Property`] that holds it. Descriptors are plain values built
//! once per widget type (see [`Widget::describe`](crate::Widget::describe)); they
//! never change afterwards.
//!
//! ## Redirection
//!
//! A posted value can land on a different property depending on its shape. For
//! example a date picker's `minDate` may be text (`"-1w"`) or a day offset (`-7`).
//! Declare one [`PropertyLink`] per alternate shape. At most one link may match a
//! given [`ValueKind`]; the [catalog](crate::Catalog) rejects ambiguous tables.

use core::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::convert::Converter;
use crate::error::PropertyError;
use crate::types::{OptionFlags, PropertyKind, ValueKind};

/// Reads a property from a widget as JSON.
pub type Getter<W> = fn(&W) -> Value;

/// Writes a JSON value onto a widget property.
pub type Setter<W> = fn(&mut W, Value) -> Result<(), PropertyError>;

/// Deserialize a JSON value into a property's field type.
///
/// Intended for [`Setter`] bodies:
///
/// ```
/// use serde_json::json;
/// use widgetsync_catalog::option::coerce;
///
/// let n: i32 = coerce(json!(5)).unwrap();
/// assert_eq!(n, 5);
/// assert!(coerce::<i32>(json!(false)).unwrap_err().is_type_mismatch());
/// ```
pub fn coerce<T: DeserializeOwned>(value: Value) -> Result<T, PropertyError> {
    let found = ValueKind::of(&value);
    serde_json::from_value(value).map_err(|e| PropertyError::TypeMismatch {
        found,
        message: e.to_string(),
    })
}

/// Typed accessor for one widget property.
pub struct Property<W> {
    name: &'static str,
    kind: PropertyKind,
    get: Getter<W>,
    set: Setter<W>,
}

impl<W> Clone for Property<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for Property<W> {}

impl<W> fmt::Debug for Property<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<W> Property<W> {
    /// Create an accessor.
    pub const fn new(name: &'static str, kind: PropertyKind, get: Getter<W>, set: Setter<W>) -> Self {
        Self {
            name,
            kind,
            get,
            set,
        }
    }

    /// Server-side property name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type.
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Read the current value.
    pub fn get(&self, widget: &W) -> Value {
        (self.get)(widget)
    }

    /// Write a value.
    pub fn set(&self, widget: &mut W, value: Value) -> Result<(), PropertyError> {
        (self.set)(widget, value)
    }
}

/// Redirects a posted value of one shape to another property.
pub struct PropertyLink<W> {
    /// Value shape that triggers the redirection.
    pub when: ValueKind,
    /// Property receiving the value.
    pub property: Property<W>,
}

impl<W> Clone for PropertyLink<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for PropertyLink<W> {}

impl<W> fmt::Debug for PropertyLink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyLink")
            .field("when", &self.when)
            .field("property", &self.property.name)
            .finish()
    }
}

/// One client widget option.
pub struct OptionDescriptor<W> {
    name: &'static str,
    default: Value,
    flags: OptionFlags,
    property: Property<W>,
    converter: Option<&'static dyn Converter>,
    links: Vec<PropertyLink<W>>,
}

impl<W> Clone for OptionDescriptor<W> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            default: self.default.clone(),
            flags: self.flags,
            property: self.property,
            converter: self.converter,
            links: self.links.clone(),
        }
    }
}

impl<W> fmt::Debug for OptionDescriptor<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("flags", &self.flags)
            .field("property", &self.property)
            .field("converter", &self.converter)
            .field("links", &self.links)
            .finish()
    }
}

impl<W> OptionDescriptor<W> {
    /// Declare option `name` with `default`, stored in `property`.
    pub fn new(name: &'static str, default: Value, property: Property<W>) -> Self {
        Self {
            name,
            default,
            flags: OptionFlags::empty(),
            property,
            converter: None,
            links: Vec::new(),
        }
    }

    /// Mark the option as HTML-encoded by the client on post-back.
    #[must_use]
    pub fn html_encoded(mut self) -> Self {
        self.flags |= OptionFlags::HTML_ENCODED;
        self
    }

    /// Mark the option's value as client code.
    #[must_use]
    pub fn requires_eval(mut self) -> Self {
        self.flags |= OptionFlags::REQUIRES_EVAL;
        self
    }

    /// Run posted values through `converter` before writing them.
    #[must_use]
    pub fn with_converter(mut self, converter: &'static dyn Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Redirect posted values of shape `when` to `property`.
    #[must_use]
    pub fn link(mut self, when: ValueKind, property: Property<W>) -> Self {
        self.links.push(PropertyLink { when, property });
        self
    }

    /// Client option name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared default.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Flags.
    pub const fn flags(&self) -> OptionFlags {
        self.flags
    }

    /// True if the client HTML-encodes this option.
    pub fn is_html_encoded(&self) -> bool {
        self.flags.contains(OptionFlags::HTML_ENCODED)
    }

    /// True if the value is emitted as client code.
    pub fn is_eval(&self) -> bool {
        self.flags.contains(OptionFlags::REQUIRES_EVAL)
    }

    /// Backing property.
    pub const fn property(&self) -> &Property<W> {
        &self.property
    }

    /// Attached converter, if any.
    pub fn converter(&self) -> Option<&'static dyn Converter> {
        self.converter
    }

    /// Declared redirections.
    pub fn links(&self) -> &[PropertyLink<W>] {
        &self.links
    }

    /// The property a value of shape `kind` should be written to.
    ///
    /// Falls back to [`OptionDescriptor::property`] when no link matches.
    pub fn target_for(&self, kind: ValueKind) -> &Property<W> {
        self.links
            .iter()
            .find(|l| l.when == kind)
            .map_or(&self.property, |l| &l.property)
    }
}

/// The `disabled` option every widget carries (default `false`).
pub fn disabled_option<W>(property: Property<W>) -> OptionDescriptor<W> {
    OptionDescriptor::new("disabled", Value::Bool(false), property)
}
