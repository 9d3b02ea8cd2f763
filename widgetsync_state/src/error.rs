// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while rendering or reconciling widget state.

use thiserror::Error;
use widgetsync_catalog::{CatalogError, ConvertError, PropertyError};

/// Failure of a render or post-back pass.
///
/// None of these are retried. Missing client data is not an error; see
/// [`PostBack`](crate::postback::PostBack).
#[derive(Debug, Error)]
pub enum StateError {
    /// A widget type's descriptor table is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A widget reported an empty identifier.
    #[error("widget `{unique_id}` has an empty {what}")]
    EmptyIdentifier {
        /// Logical name of the offending widget.
        unique_id: String,
        /// Which identifier was empty.
        what: &'static str,
    },
    /// The posted state field is not a JSON bundle.
    #[error("request field `{field}` does not hold a widget state bundle")]
    MalformedBundle {
        /// Request field name.
        field: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A posted value was rejected by the option's converter.
    #[error("posted value for option `{option}` could not be converted")]
    Conversion {
        /// Option name.
        option: String,
        /// Converter error.
        #[source]
        source: ConvertError,
    },
    /// A reconciled value could not be written.
    #[error("option `{option}` could not be written to property `{property}`")]
    Property {
        /// Option name.
        option: String,
        /// Destination property.
        property: &'static str,
        /// Setter error.
        #[source]
        source: PropertyError,
    },
    /// The page payload could not be serialized.
    #[error("page state could not be serialized")]
    Serialize(#[source] serde_json::Error),
    /// Configuration text could not be parsed.
    #[error("configuration could not be parsed")]
    ConfigParse(#[source] serde_json::Error),
    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
