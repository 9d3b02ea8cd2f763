// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=widgetsync_state --heading-base-level=0

//! Widgetsync State: the server side of a client widget round trip.
//!
//! One request/response cycle moves widget options in both directions:
//!
//! - **Render.** A [`PageState`] collects each visible widget's options that
//!   differ from their defaults ([`diff::compute_options`]), then
//!   [`PageState::finish`] emits one JSON payload plus a submit hook through a
//!   [`PageSink`](page::PageSink).
//! - **Post-back.** The submit hook writes every live widget's current options
//!   into one form field. A [`PostBack`] parses it once per request and
//!   [`PostBack::reconcile`] writes the submitted values back onto each widget,
//!   decoding, converting and redirecting them as its option table declares.
//!
//! Both contexts borrow a shared [`Catalog`](widgetsync_catalog::Catalog) and a
//! [`SyncConfig`], and neither outlives its request.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use widgetsync_catalog::option::{coerce, Property};
//! use widgetsync_catalog::{Catalog, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors};
//! use widgetsync_state::{FormRequest, PageOutput, PageState, PostBack, SyncConfig};
//!
//! #[derive(Default)]
//! struct Bar {
//!     value: i32,
//! }
//!
//! impl Widget for Bar {
//!     fn describe() -> WidgetDescriptors<Self> {
//!         WidgetDescriptors::<Self>::new().option(OptionDescriptor::new(
//!             "value",
//!             json!(0),
//!             Property::new(
//!                 "Value",
//!                 PropertyKind::Integer,
//!                 |w| json!(w.value),
//!                 |w, v| { w.value = coerce(v)?; Ok(()) },
//!             ),
//!         ))
//!     }
//!     fn widget_name(&self) -> &str { "progressbar" }
//!     fn target_id(&self) -> &str { "bar" }
//!     fn unique_id(&self) -> &str { "Bar1" }
//! }
//!
//! let catalog = Catalog::new();
//! let config = SyncConfig::default();
//!
//! // Render.
//! let mut page = PageState::new(&catalog, &config);
//! page.render(&Bar { value: 5 }).unwrap();
//! let mut out = PageOutput::new();
//! page.finish(&mut out).unwrap();
//! assert_eq!(out.requires_post_back(), ["Bar1"]);
//!
//! // Post-back: the user moved the bar to 8.
//! let bundle = json!([{ "ControlID": "bar", "WidgetName": "progressbar", "Options": { "value": 8 } }]);
//! let request = FormRequest::post_back().with_field(&config.state_field, bundle.to_string());
//! let postback = PostBack::new(&catalog, &config, &request);
//! let mut bar = Bar { value: 5 };
//! postback.reconcile(&mut bar).unwrap();
//! assert_eq!(bar.value, 8);
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod page;
pub mod postback;
pub mod script;

#[cfg(test)]
mod testing;

pub use config::{DataChangedPolicy, SyncConfig};
pub use diff::{OptionDiff, apply_defaults, compute_options};
pub use error::StateError;
pub use page::{PageOutput, PageSink, PageState, WidgetInstanceState};
pub use postback::{BundleEntry, FormRequest, PostBack, Reconciliation, RequestContext};
