// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=widgetsync_catalog --heading-base-level=0

//! Widgetsync Catalog: static option and event tables for server-described client widgets.
//!
//! A server component describes a client widget with a name, a list of options, and a
//! list of events. This crate holds those declarations:
//!
//! - [`OptionDescriptor`]: option name, default value, flags, and the typed
//!   [`Property`](option::Property) accessor that stores it on the component.
//! - [`EventDescriptor`]: event name and whether it posts back or signals a data change.
//! - [`WidgetDescriptors`]: the ordered table of one widget type, returned by [`Widget::describe`].
//! - [`Catalog`]: a thread-safe registry of validated tables keyed by widget type.
//! - [`Converter`](convert::Converter): conversion rules for posted values, such as
//!   [`IntArrayConverter`](convert::IntArrayConverter).
//!
//! Tables are explicit values built by each widget type, not discovered at runtime.
//! Build the [`Catalog`] at process start and pass it to the page and post-back
//! machinery in `widgetsync_state`.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use widgetsync_catalog::option::{coerce, disabled_option, Property};
//! use widgetsync_catalog::{
//!     Catalog, EventDescriptor, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors,
//! };
//!
//! #[derive(Default)]
//! struct ProgressBar {
//!     id: String,
//!     value: i32,
//!     disabled: bool,
//! }
//!
//! impl Widget for ProgressBar {
//!     fn describe() -> WidgetDescriptors<Self> {
//!         WidgetDescriptors::<Self>::new()
//!             .option(disabled_option(Property::new(
//!                 "Disabled",
//!                 PropertyKind::Boolean,
//!                 |w| json!(w.disabled),
//!                 |w, v| { w.disabled = coerce(v)?; Ok(()) },
//!             )))
//!             .option(OptionDescriptor::new(
//!                 "value",
//!                 json!(0),
//!                 Property::new(
//!                     "Value",
//!                     PropertyKind::Integer,
//!                     |w| json!(w.value),
//!                     |w, v| { w.value = coerce(v)?; Ok(()) },
//!                 ),
//!             ))
//!             .event(EventDescriptor::new("change").auto_post_back().data_changed())
//!     }
//!     fn widget_name(&self) -> &str { "progressbar" }
//!     fn target_id(&self) -> &str { &self.id }
//!     fn unique_id(&self) -> &str { &self.id }
//! }
//!
//! let catalog = Catalog::new();
//! let table = catalog.register::<ProgressBar>().unwrap();
//! assert_eq!(table.options()[1].name(), "value");
//! assert_eq!(table.data_changed_event().unwrap().name(), "change");
//! ```

pub mod catalog;
pub mod convert;
pub mod error;
pub mod event;
pub mod option;
pub mod types;
pub mod widget;

pub use catalog::{Catalog, WidgetDescriptors};
pub use error::{CatalogError, ConvertError, PropertyError};
pub use event::EventDescriptor;
pub use option::OptionDescriptor;
pub use types::{EventFlags, OptionFlags, PropertyKind, ValueKind};
pub use widget::Widget;
