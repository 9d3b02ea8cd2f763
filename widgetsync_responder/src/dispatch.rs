// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raising server-side events for a post-back.
//!
//! ## Overview
//!
//! When the client submits the form because of a widget event, the host calls
//! [`raise_post_back_event`] with the event name it received. The widget is
//! reconciled first so handlers observe the submitted state, then every handler
//! subscribed to the declared event runs in order.
//!
//! An event name the widget type does not declare is not an error. The page may
//! have been rendered with a different configuration than the one handling the
//! submission.

use widgetsync_catalog::Widget;
use widgetsync_state::{PostBack, RequestContext, StateError};

use crate::handlers::EventHandlers;
use crate::types::{Dispatched, EventArgs};

/// Reconcile `widget` from `postback`, then raise its event `name`.
///
/// ```
/// # use serde_json::json;
/// # use widgetsync_catalog::option::{coerce, Property};
/// # use widgetsync_catalog::{Catalog, EventDescriptor, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors};
/// # struct Bar { value: i32 }
/// # impl Widget for Bar {
/// #     fn describe() -> WidgetDescriptors<Self> {
/// #         WidgetDescriptors::<Self>::new()
/// #             .option(OptionDescriptor::new("value", json!(0), Property::new(
/// #                 "Value", PropertyKind::Integer, |w| json!(w.value),
/// #                 |w, v| { w.value = coerce(v)?; Ok(()) })))
/// #             .event(EventDescriptor::new("complete").auto_post_back())
/// #     }
/// #     fn widget_name(&self) -> &str { "progressbar" }
/// #     fn target_id(&self) -> &str { "bar" }
/// #     fn unique_id(&self) -> &str { "bar" }
/// # }
/// use widgetsync_responder::{raise_post_back_event, Dispatched, EventHandlers};
/// use widgetsync_state::{FormRequest, PostBack, SyncConfig};
///
/// let catalog = Catalog::new();
/// let config = SyncConfig::default();
/// let bundle = json!([{ "ControlID": "bar", "WidgetName": "progressbar", "Options": { "value": 100 } }]);
/// let request = FormRequest::post_back().with_field("__widgetStateField", bundle.to_string());
/// let postback = PostBack::new(&catalog, &config, &request);
///
/// let mut handlers = EventHandlers::new();
/// handlers.subscribe("complete", |bar: &mut Bar, _| assert_eq!(bar.value, 100));
///
/// let mut bar = Bar { value: 0 };
/// let outcome = raise_post_back_event(&postback, &mut bar, &mut handlers, "complete").unwrap();
/// assert_eq!(outcome, Dispatched::Invoked(1));
/// ```
pub fn raise_post_back_event<W: Widget, R: RequestContext>(
    postback: &PostBack<'_, R>,
    widget: &mut W,
    handlers: &mut EventHandlers<W>,
    name: &str,
) -> Result<Dispatched, StateError> {
    postback.reconcile(widget)?;

    let descriptors = postback.catalog().descriptors::<W>()?;
    let Some(event) = descriptors.event_named(name) else {
        tracing::debug!(
            widget = widget.unique_id(),
            event = name,
            "ignoring undeclared post-back event"
        );
        return Ok(Dispatched::Unmatched);
    };
    Ok(invoke(widget, handlers, event.name()))
}

/// Raise the data-changed event of `widget`'s type, if it declares one.
///
/// Call after [`PostBack::load_post_data`] reported a change.
pub fn raise_post_data_changed_event<W: Widget, R: RequestContext>(
    postback: &PostBack<'_, R>,
    widget: &mut W,
    handlers: &mut EventHandlers<W>,
) -> Result<Dispatched, StateError> {
    let descriptors = postback.catalog().descriptors::<W>()?;
    let Some(event) = descriptors.data_changed_event() else {
        return Ok(Dispatched::Unmatched);
    };
    Ok(invoke(widget, handlers, event.name()))
}

fn invoke<W: Widget>(widget: &mut W, handlers: &mut EventHandlers<W>, name: &str) -> Dispatched {
    match handlers.invoke(name, widget, &EventArgs) {
        0 => {
            tracing::trace!(widget = widget.unique_id(), event = name, "no subscribers");
            Dispatched::NoSubscribers
        }
        n => {
            tracing::debug!(widget = widget.unique_id(), event = name, handlers = n, "raised event");
            Dispatched::Invoked(n)
        }
    }
}
