// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hosting component seen from the synchronization engine.

use crate::catalog::WidgetDescriptors;

/// A server-side component that drives one client widget.
///
/// Implementors supply a static descriptor table plus the identity the page
/// needs to address the client element. Everything else (markup, view-state
/// persistence) stays with the host.
///
/// ```
/// use serde_json::json;
/// use widgetsync_catalog::option::{coerce, OptionDescriptor, Property};
/// use widgetsync_catalog::{PropertyKind, Widget, WidgetDescriptors};
///
/// struct Spinner {
///     id: String,
///     step: i32,
/// }
///
/// impl Widget for Spinner {
///     fn describe() -> WidgetDescriptors<Self> {
///         WidgetDescriptors::<Self>::new().option(OptionDescriptor::new(
///             "step",
///             json!(1),
///             Property::new(
///                 "Step",
///                 PropertyKind::Integer,
///                 |w| json!(w.step),
///                 |w, v| {
///                     w.step = coerce(v)?;
///                     Ok(())
///                 },
///             ),
///         ))
///     }
///     fn widget_name(&self) -> &str {
///         "spinner"
///     }
///     fn target_id(&self) -> &str {
///         &self.id
///     }
///     fn unique_id(&self) -> &str {
///         &self.id
///     }
/// }
/// ```
pub trait Widget: Sized + 'static {
    /// Ordered option and event table for this type.
    ///
    /// Called at most a few times per process; the [`Catalog`](crate::Catalog)
    /// caches the result.
    fn describe() -> WidgetDescriptors<Self>;

    /// Client widget name, e.g. `"datepicker"`.
    fn widget_name(&self) -> &str;

    /// DOM id of the element the widget attaches to.
    fn target_id(&self) -> &str;

    /// Stable logical name of the component within the page.
    fn unique_id(&self) -> &str;

    /// Invisible widgets are left out of the page payload.
    fn is_visible(&self) -> bool {
        true
    }

    /// Whether post-back events of this instance submit the form.
    fn auto_post_back(&self) -> bool {
        false
    }
}
