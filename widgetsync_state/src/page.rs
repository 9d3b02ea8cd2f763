// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level aggregation of widget state.
//!
//! ## Overview
//!
//! A [`PageState`] is created for one request. Each widget is passed to
//! [`PageState::render`] during the render pass, which computes its option diff
//! and records a [`WidgetInstanceState`]. Once every widget has rendered,
//! [`PageState::finish`] consumes the context, serializes all entries into one
//! JSON payload, and registers it with the host through a [`PageSink`] together
//! with the submit statement and the hidden state field.
//!
//! ## Wire shape
//!
//! The payload is a JSON array with one element per visible widget:
//!
//! ```text
//! { "widgetName": "...", "id": "...", "uniqueId": "...",
//!   "options": { ... }, "encodedOptions": [...],
//!   "events": [...], "postBacks": [{ "name": "...", "dataChangedEvent": false }] }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use widgetsync_catalog::{Catalog, EventDescriptor, EventFlags, Widget, WidgetDescriptors};

use crate::config::SyncConfig;
use crate::diff::compute_options;
use crate::error::StateError;
use crate::script;

/// Render-pass snapshot of one widget.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetInstanceState {
    /// Client widget name.
    pub widget_name: String,
    /// DOM id of the target element.
    pub target_id: String,
    /// Logical name of the component.
    pub unique_id: String,
    /// Options differing from their defaults.
    pub options: Map<String, Value>,
    /// Options the client HTML-encodes on post-back.
    pub encoded_options: Vec<String>,
    /// Events with post-back resolved against the instance.
    pub events: Vec<EventDescriptor>,
}

impl WidgetInstanceState {
    /// Build the snapshot of `widget`.
    pub fn capture<W: Widget>(descriptors: &WidgetDescriptors<W>, widget: &W) -> Self {
        let diff = compute_options(descriptors, widget);
        Self {
            widget_name: widget.widget_name().to_owned(),
            target_id: widget.target_id().to_owned(),
            unique_id: widget.unique_id().to_owned(),
            options: diff.options,
            encoded_options: diff.encoded_options,
            events: resolve_events(descriptors, widget),
        }
    }

    /// Names of events that stay on the client.
    pub fn client_events(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(|e| !e.causes_post_back())
            .map(EventDescriptor::name)
    }

    /// Events that submit the form.
    pub fn post_back_events(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.events.iter().filter(|e| e.causes_post_back())
    }
}

/// Events of `widget` with post-back enabled only when the instance allows it.
pub fn resolve_events<W: Widget>(
    descriptors: &WidgetDescriptors<W>,
    widget: &W,
) -> Vec<EventDescriptor> {
    let auto_post_back = widget.auto_post_back();
    descriptors
        .events()
        .iter()
        .map(|e| {
            let mut flags = e.flags();
            flags.set(EventFlags::AUTO_POST_BACK, auto_post_back && e.causes_post_back());
            EventDescriptor::with_flags(e.name().to_owned(), flags)
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetPayload<'a> {
    widget_name: &'a str,
    id: &'a str,
    unique_id: &'a str,
    options: &'a Map<String, Value>,
    encoded_options: &'a [String],
    events: Vec<&'a str>,
    post_backs: Vec<PostBackPayload<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostBackPayload<'a> {
    name: &'a str,
    data_changed_event: bool,
}

impl<'a> From<&'a WidgetInstanceState> for WidgetPayload<'a> {
    fn from(state: &'a WidgetInstanceState) -> Self {
        Self {
            widget_name: &state.widget_name,
            id: &state.target_id,
            unique_id: &state.unique_id,
            options: &state.options,
            encoded_options: &state.encoded_options,
            events: state.client_events().collect(),
            post_backs: state
                .post_back_events()
                .map(|e| PostBackPayload {
                    name: e.name(),
                    data_changed_event: e.is_data_changed(),
                })
                .collect(),
        }
    }
}

/// Serialize widget snapshots into the client payload.
pub fn payload_json(widgets: &[WidgetInstanceState]) -> Result<String, StateError> {
    let payload: Vec<WidgetPayload<'_>> = widgets.iter().map(WidgetPayload::from).collect();
    serde_json::to_string(&payload).map_err(StateError::Serialize)
}

/// Page output the aggregator writes to.
///
/// Script registrations are keyed; a sink should ignore a second registration
/// under a key it has already seen and return `false`.
pub trait PageSink {
    /// Register a script element to render with the page.
    fn register_script_block(&mut self, key: &str, script: String) -> bool;

    /// Register a statement to run before the form submits.
    fn register_on_submit(&mut self, key: &str, statement: String) -> bool;

    /// Ensure a hidden form field exists.
    fn register_hidden_field(&mut self, name: &str, value: &str);

    /// Route the next post-back's data to the component `unique_id`.
    fn register_requires_post_back(&mut self, unique_id: &str);
}

/// In-memory [`PageSink`] that deduplicates registrations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageOutput {
    script_blocks: Vec<(String, String)>,
    submit_statements: Vec<(String, String)>,
    hidden_fields: Vec<(String, String)>,
    requires_post_back: Vec<String>,
}

impl PageOutput {
    /// An empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered script elements, in registration order.
    pub fn script_blocks(&self) -> impl Iterator<Item = &str> {
        self.script_blocks.iter().map(|(_, s)| s.as_str())
    }

    /// Registered submit statements, in registration order.
    pub fn submit_statements(&self) -> impl Iterator<Item = &str> {
        self.submit_statements.iter().map(|(_, s)| s.as_str())
    }

    /// Registered hidden fields as `(name, value)`.
    pub fn hidden_fields(&self) -> &[(String, String)] {
        &self.hidden_fields
    }

    /// Components that asked for post-back data.
    pub fn requires_post_back(&self) -> &[String] {
        &self.requires_post_back
    }
}

impl PageSink for PageOutput {
    fn register_script_block(&mut self, key: &str, script: String) -> bool {
        if self.script_blocks.iter().any(|(k, _)| k == key) {
            return false;
        }
        self.script_blocks.push((key.to_owned(), script));
        true
    }

    fn register_on_submit(&mut self, key: &str, statement: String) -> bool {
        if self.submit_statements.iter().any(|(k, _)| k == key) {
            return false;
        }
        self.submit_statements.push((key.to_owned(), statement));
        true
    }

    fn register_hidden_field(&mut self, name: &str, value: &str) {
        if !self.hidden_fields.iter().any(|(n, _)| n == name) {
            self.hidden_fields.push((name.to_owned(), value.to_owned()));
        }
    }

    fn register_requires_post_back(&mut self, unique_id: &str) {
        if !self.requires_post_back.iter().any(|id| id == unique_id) {
            self.requires_post_back.push(unique_id.to_owned());
        }
    }
}

/// Per-request aggregation context.
///
/// ```
/// # use serde_json::json;
/// # use widgetsync_catalog::option::{coerce, Property};
/// # use widgetsync_catalog::{Catalog, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors};
/// # struct Bar { value: i32 }
/// # impl Widget for Bar {
/// #     fn describe() -> WidgetDescriptors<Self> {
/// #         WidgetDescriptors::<Self>::new().option(OptionDescriptor::new(
/// #             "value",
/// #             json!(0),
/// #             Property::new("Value", PropertyKind::Integer, |w| json!(w.value),
/// #                 |w, v| { w.value = coerce(v)?; Ok(()) }),
/// #         ))
/// #     }
/// #     fn widget_name(&self) -> &str { "progressbar" }
/// #     fn target_id(&self) -> &str { "bar" }
/// #     fn unique_id(&self) -> &str { "Bar1" }
/// # }
/// use widgetsync_state::config::SyncConfig;
/// use widgetsync_state::page::{PageOutput, PageState};
///
/// let catalog = Catalog::new();
/// let config = SyncConfig::default();
/// let mut page = PageState::new(&catalog, &config);
/// page.render(&Bar { value: 5 }).unwrap();
///
/// let mut out = PageOutput::new();
/// assert!(page.finish(&mut out).unwrap());
/// let block = out.script_blocks().next().unwrap();
/// assert!(block.contains(r#""options":{"value":5}"#));
/// ```
#[derive(Debug)]
pub struct PageState<'a> {
    catalog: &'a Catalog,
    config: &'a SyncConfig,
    widgets: Vec<WidgetInstanceState>,
}

impl<'a> PageState<'a> {
    /// A fresh context for one request.
    pub fn new(catalog: &'a Catalog, config: &'a SyncConfig) -> Self {
        Self {
            catalog,
            config,
            widgets: Vec::new(),
        }
    }

    /// Record `widget` for this render pass.
    ///
    /// Returns `false` when the widget is invisible and was skipped. Rendering
    /// the same widget twice replaces its earlier snapshot in place.
    pub fn render<W: Widget>(&mut self, widget: &W) -> Result<bool, StateError> {
        for (what, id) in [
            ("widget name", widget.widget_name()),
            ("target id", widget.target_id()),
        ] {
            if id.is_empty() {
                return Err(StateError::EmptyIdentifier {
                    unique_id: widget.unique_id().to_owned(),
                    what,
                });
            }
        }
        if !widget.is_visible() {
            tracing::trace!(widget = widget.unique_id(), "skipping invisible widget");
            return Ok(false);
        }

        let descriptors = self.catalog.descriptors::<W>()?;
        let state = WidgetInstanceState::capture(&descriptors, widget);
        tracing::debug!(
            widget = %state.unique_id,
            name = %state.widget_name,
            options = state.options.len(),
            "rendered widget state"
        );

        match self
            .widgets
            .iter_mut()
            .find(|w| w.target_id == state.target_id && w.widget_name == state.widget_name)
        {
            Some(existing) => *existing = state,
            None => self.widgets.push(state),
        }
        Ok(true)
    }

    /// Snapshots recorded so far, in render order.
    pub fn widgets(&self) -> &[WidgetInstanceState] {
        &self.widgets
    }

    /// True if no visible widget has rendered.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// The client payload for the widgets recorded so far.
    pub fn payload_json(&self) -> Result<String, StateError> {
        payload_json(&self.widgets)
    }

    /// Emit the page payload and submit hook into `sink`.
    ///
    /// Returns `false` when nothing was registered, either because no visible
    /// widget rendered or because `sink` already holds this page's scripts.
    pub fn finish(self, sink: &mut impl PageSink) -> Result<bool, StateError> {
        if self.widgets.is_empty() {
            return Ok(false);
        }
        self.config.validate()?;

        let payload = self.payload_json()?;
        let key = &self.config.script_key;
        let registered = sink.register_script_block(key, script::state_block(self.config, &payload));
        if !registered {
            tracing::warn!(key = %key, "page state already registered; ignoring second finish");
            return Ok(false);
        }
        sink.register_on_submit(key, script::submit_statement(self.config));
        sink.register_hidden_field(&self.config.state_field, "");
        for widget in &self.widgets {
            sink.register_requires_post_back(&widget.unique_id);
        }
        tracing::debug!(widgets = self.widgets.len(), bytes = payload.len(), "registered page state");
        Ok(true)
    }
}

/// Merge `widget_name` into a comma-separated `data-ui-widget` attribute value.
///
/// ```
/// use widgetsync_state::page::target_attribute_value;
///
/// assert_eq!(target_attribute_value(None, "tabs"), "tabs");
/// assert_eq!(target_attribute_value(Some("tab"), "tabs"), "tab,tabs");
/// assert_eq!(target_attribute_value(Some("tab,tabs"), "tabs"), "tab,tabs");
/// ```
pub fn target_attribute_value(existing: Option<&str>, widget_name: &str) -> String {
    match existing.map(str::trim).filter(|s| !s.is_empty()) {
        None => widget_name.to_owned(),
        Some(attr) if attr.split(',').any(|n| n.trim() == widget_name) => attr.to_owned(),
        Some(attr) => format!("{attr},{widget_name}"),
    }
}
