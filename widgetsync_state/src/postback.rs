// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-back reconciliation: applying client-submitted options to widgets.
//!
//! ## Overview
//!
//! On submission the client serializes every live widget's current options
//! into one request field:
//!
//! ```text
//! [ { "ControlID": "...", "WidgetName": "...", "Options": { ... } }, ... ]
//! ```
//!
//! A [`PostBack`] wraps one request. It parses that field lazily, at most once,
//! and hands each widget its matching entry in [`PostBack::reconcile`]. Widgets
//! without an entry are left untouched.
//!
//! ## Per-option rules
//!
//! For each declared option, in declaration order:
//!
//! 1. The posted value replaces the current one when the entry carries it.
//! 2. HTML-encoded options are decoded once when the value is text.
//! 3. A value equal to the current one is skipped.
//! 4. The option's converter runs when it accepts the value's shape.
//! 5. The destination is the property linked to the converted value's shape,
//!    or the option's own property.
//! 6. `false` posted for a text property means "client default" and becomes the
//!    option's declared default.
//! 7. If the write fails with a type mismatch, the posted value was `false` and
//!    the default is `null`, `null` is written instead.
//!
//! Any other failure aborts the pass and restores the properties already
//! written, so a widget is never left half reconciled.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use widgetsync_catalog::option::{OptionDescriptor, Property};
use widgetsync_catalog::{Catalog, ValueKind, Widget};

use crate::config::{DataChangedPolicy, SyncConfig};
use crate::diff::values_equal;
use crate::error::StateError;

/// What the reconciler needs from the incoming request.
pub trait RequestContext {
    /// True if this request resubmits the page's form.
    fn is_post_back(&self) -> bool;

    /// Raw value of the form field `name`.
    fn form_value(&self, name: &str) -> Option<&str>;
}

/// In-memory [`RequestContext`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormRequest {
    post_back: bool,
    fields: HashMap<String, String>,
}

impl FormRequest {
    /// A first (non-post-back) request with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// A post-back request with no fields.
    pub fn post_back() -> Self {
        Self {
            post_back: true,
            fields: HashMap::new(),
        }
    }

    /// Add a form field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a form field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}

impl RequestContext for FormRequest {
    fn is_post_back(&self) -> bool {
        self.post_back
    }

    fn form_value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// One widget's options as submitted by the client.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BundleEntry {
    /// DOM id of the widget's target element.
    #[serde(rename = "ControlID")]
    pub control_id: String,
    /// Client widget name.
    #[serde(rename = "WidgetName")]
    pub widget_name: String,
    /// Live option values.
    #[serde(rename = "Options", default, deserialize_with = "null_as_empty")]
    pub options: Map<String, Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Option::<Map<String, Value>>::deserialize(d).map(Option::unwrap_or_default)
}

/// Outcome of reconciling one widget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// True if the bundle held an entry for the widget.
    pub matched: bool,
    /// Options written, in declaration order.
    pub written: Vec<&'static str>,
}

impl Reconciliation {
    /// True if any option was written.
    pub fn changed(&self) -> bool {
        !self.written.is_empty()
    }

    /// Whether `policy` reports this outcome as a data change.
    pub fn data_changed(&self, policy: DataChangedPolicy) -> bool {
        match policy {
            DataChangedPolicy::Never => false,
            DataChangedPolicy::OnWrite => self.changed(),
        }
    }
}

/// Post-back context for one request.
pub struct PostBack<'a, R> {
    catalog: &'a Catalog,
    config: &'a SyncConfig,
    request: &'a R,
    bundle: OnceCell<Vec<BundleEntry>>,
}

impl<R> fmt::Debug for PostBack<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostBack")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .field("bundle", &self.bundle.get())
            .finish_non_exhaustive()
    }
}

impl<'a, R: RequestContext> PostBack<'a, R> {
    /// Wrap `request`.
    pub fn new(catalog: &'a Catalog, config: &'a SyncConfig, request: &'a R) -> Self {
        Self {
            catalog,
            config,
            request,
            bundle: OnceCell::new(),
        }
    }

    /// The catalog widget tables are read from.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Settings for this request.
    pub fn config(&self) -> &'a SyncConfig {
        self.config
    }

    /// The submitted bundle, parsed on first use.
    ///
    /// Empty when the request is not a post-back or the state field is absent
    /// or blank.
    pub fn bundle(&self) -> Result<&[BundleEntry], StateError> {
        if let Some(bundle) = self.bundle.get() {
            return Ok(bundle);
        }
        let parsed = self.parse_bundle()?;
        Ok(self.bundle.get_or_init(|| parsed))
    }

    /// The first entry submitted for `(target_id, widget_name)`.
    pub fn entry_for(
        &self,
        target_id: &str,
        widget_name: &str,
    ) -> Result<Option<&BundleEntry>, StateError> {
        Ok(self
            .bundle()?
            .iter()
            .find(|e| e.control_id == target_id && e.widget_name == widget_name))
    }

    /// Apply the submitted options to `widget`.
    pub fn reconcile<W: Widget>(&self, widget: &mut W) -> Result<Reconciliation, StateError> {
        let Some(entry) = self.entry_for(widget.target_id(), widget.widget_name())? else {
            tracing::trace!(widget = widget.unique_id(), "no posted state");
            return Ok(Reconciliation::default());
        };
        let descriptors = self.catalog.descriptors::<W>()?;

        let mut outcome = Reconciliation {
            matched: true,
            written: Vec::new(),
        };
        let mut undo: Vec<(Property<W>, Value)> = Vec::new();
        for option in descriptors.options() {
            match apply_option(option, entry, widget) {
                Ok(Some(previous)) => {
                    outcome.written.push(option.name());
                    undo.push(previous);
                }
                Ok(None) => {}
                Err(err) => {
                    rollback(widget, undo);
                    return Err(err);
                }
            }
        }
        tracing::debug!(
            widget = widget.unique_id(),
            written = ?outcome.written,
            "reconciled posted state"
        );
        Ok(outcome)
    }

    /// Reconcile `widget` and report whether its data changed.
    ///
    /// The report follows [`SyncConfig::data_changed`].
    pub fn load_post_data<W: Widget>(&self, widget: &mut W) -> Result<bool, StateError> {
        let outcome = self.reconcile(widget)?;
        Ok(outcome.data_changed(self.config.data_changed))
    }

    fn parse_bundle(&self) -> Result<Vec<BundleEntry>, StateError> {
        if !self.request.is_post_back() {
            return Ok(Vec::new());
        }
        let field = &self.config.state_field;
        let Some(raw) = self.request.form_value(field).filter(|s| !s.trim().is_empty()) else {
            tracing::trace!(field = %field, "post-back without widget state");
            return Ok(Vec::new());
        };
        let bundle: Vec<BundleEntry> =
            serde_json::from_str(raw).map_err(|source| StateError::MalformedBundle {
                field: field.clone(),
                source,
            })?;
        tracing::debug!(entries = bundle.len(), "parsed widget state bundle");
        Ok(bundle)
    }
}

/// Apply one option. Returns the written property and its previous value.
fn apply_option<W>(
    option: &OptionDescriptor<W>,
    entry: &BundleEntry,
    widget: &mut W,
) -> Result<Option<(Property<W>, Value)>, StateError> {
    let original = option.property().get(widget);
    let Some(posted) = entry.options.get(option.name()) else {
        return Ok(None);
    };
    let mut value = posted.clone();
    if option.is_html_encoded()
        && let Value::String(text) = &value
    {
        let decoded = html_escape::decode_html_entities(text).into_owned();
        value = Value::String(decoded);
    }
    if values_equal(&value, &original) {
        return Ok(None);
    }

    let converted = match option.converter() {
        Some(converter) if converter.can_convert_from(ValueKind::of(&value)) => converter
            .convert_from(value)
            .map_err(|source| StateError::Conversion {
                option: option.name().to_owned(),
                source,
            })?,
        _ => value,
    };

    let target = *option.target_for(ValueKind::of(&converted));
    let converted = if target.kind().is_text() && converted == Value::Bool(false) {
        option.default_value().clone()
    } else {
        converted
    };
    let previous = target.get(widget);
    if values_equal(&converted, &previous) {
        return Ok(None);
    }

    let written = match target.set(widget, converted) {
        Ok(()) => Ok(None),
        Err(err)
            if err.is_type_mismatch()
                && *posted == Value::Bool(false)
                && option.default_value().is_null() =>
        {
            tracing::trace!(
                option = option.name(),
                property = target.name(),
                "writing null for posted `false`"
            );
            target.set(widget, Value::Null).map(|()| Some(Value::Null))
        }
        Err(err) => Err(err),
    };
    let fallback = written.map_err(|source| StateError::Property {
        option: option.name().to_owned(),
        property: target.name(),
        source,
    })?;
    if fallback.is_some_and(|value| values_equal(&value, &previous)) {
        return Ok(None);
    }
    Ok(Some((target, previous)))
}

fn rollback<W>(widget: &mut W, undo: Vec<(Property<W>, Value)>) {
    for (property, previous) in undo.into_iter().rev() {
        if let Err(err) = property.set(widget, previous) {
            tracing::warn!(property = property.name(), error = %err, "could not restore property");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageState;
    use crate::testing::Slider;
    use serde_json::json;
    use widgetsync_catalog::{PropertyError, WidgetDescriptors};

    fn request(bundle: Value) -> FormRequest {
        FormRequest::post_back().with_field("__widgetStateField", bundle.to_string())
    }

    fn reconcile(slider: &mut Slider, req: &FormRequest) -> Result<Reconciliation, StateError> {
        let catalog = Catalog::new();
        let config = SyncConfig::default();
        PostBack::new(&catalog, &config, req).reconcile(slider)
    }

    fn entry(id: &str, options: Value) -> Value {
        json!({ "ControlID": id, "WidgetName": "slider", "Options": options })
    }

    #[test]
    fn missing_entry_leaves_widget_untouched() {
        let req = request(json!([entry("other", json!({ "value": 9 }))]));
        let mut slider = Slider::new("s");
        slider.value = 4;
        let before = slider.clone();
        let outcome = reconcile(&mut slider, &req).unwrap();
        assert_eq!(outcome, Reconciliation::default());
        assert_eq!(slider, before);

        let catalog = Catalog::new();
        let config = SyncConfig::default();
        assert!(!PostBack::new(&catalog, &config, &req).load_post_data(&mut slider).unwrap());
    }

    #[test]
    fn entry_must_match_widget_name_too() {
        let req = request(json!([
            { "ControlID": "s", "WidgetName": "progressbar", "Options": { "value": 9 } }
        ]));
        let mut slider = Slider::new("s");
        assert!(!reconcile(&mut slider, &req).unwrap().matched);
        assert_eq!(slider.value, 0);
    }

    #[test]
    fn posted_values_are_written() {
        let req = request(json!([entry("s", json!({ "value": 7, "disabled": true }))]));
        let mut slider = Slider::new("s");
        let outcome = reconcile(&mut slider, &req).unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.written, ["disabled", "value"]);
        assert_eq!(slider.value, 7);
        assert!(slider.disabled);
    }

    #[test]
    fn false_for_nullable_number_becomes_null() {
        let req = request(json!([entry("s", json!({ "max": false }))]));
        let mut slider = Slider::new("s");
        slider.max = Some(7);
        reconcile(&mut slider, &req).unwrap();
        assert_eq!(slider.max, None);
    }

    #[test]
    fn false_for_text_becomes_default() {
        let req = request(json!([entry("s", json!({ "label": false }))]));
        let mut slider = Slider::new("s");
        slider.label = "x".into();
        let outcome = reconcile(&mut slider, &req).unwrap();
        assert_eq!(outcome.written, ["label"]);
        assert_eq!(slider.label, "");

        let mut slider = Slider::new("s");
        let outcome = reconcile(&mut slider, &req).unwrap();
        assert!(!outcome.changed());
    }

    #[test]
    fn encoded_text_is_decoded_once() {
        let req = request(json!([entry("s", json!({ "label": "&lt;b&gt;Tom &amp;amp; Jerry&lt;/b&gt;" }))]));
        let mut slider = Slider::new("s");
        reconcile(&mut slider, &req).unwrap();
        assert_eq!(slider.label, "<b>Tom &amp; Jerry</b>");
    }

    #[test]
    fn converter_parses_delimited_text() {
        let req = request(json!([entry("s", json!({ "values": "1, 2,3" }))]));
        let mut slider = Slider::new("s");
        reconcile(&mut slider, &req).unwrap();
        assert_eq!(slider.values, [1, 2, 3]);
    }

    #[test]
    fn linked_property_receives_matching_shape() {
        let mut slider = Slider::new("s");
        reconcile(&mut slider, &request(json!([entry("s", json!({ "start": -7 }))]))).unwrap();
        assert_eq!(slider.start_offset, Some(-7));
        assert_eq!(slider.start, None);

        reconcile(&mut slider, &request(json!([entry("s", json!({ "start": "-1w" }))]))).unwrap();
        assert_eq!(slider.start.as_deref(), Some("-1w"));
    }

    #[test]
    fn failed_write_restores_earlier_options() {
        let req = request(json!([entry("s", json!({ "disabled": true, "value": "abc" }))]));
        let mut slider = Slider::new("s");
        let err = reconcile(&mut slider, &req).unwrap_err();
        assert!(matches!(
            err,
            StateError::Property {
                property: "Value",
                source: PropertyError::TypeMismatch { .. },
                ..
            }
        ));
        assert_eq!(slider, Slider::new("s"));
    }

    #[test]
    fn converter_errors_propagate() {
        let req = request(json!([entry("s", json!({ "values": "1,x" }))]));
        let err = reconcile(&mut Slider::new("s"), &req).unwrap_err();
        assert!(matches!(err, StateError::Conversion { ref option, .. } if option == "values"));
    }

    #[test]
    fn malformed_bundle_is_fatal() {
        let req = FormRequest::post_back().with_field("__widgetStateField", "[{");
        let err = reconcile(&mut Slider::new("s"), &req).unwrap_err();
        assert!(matches!(err, StateError::MalformedBundle { ref field, .. } if field == "__widgetStateField"));
    }

    #[test]
    fn bundle_only_read_on_post_back() {
        let bundle = json!([entry("s", json!({ "value": 3 }))]).to_string();
        let catalog = Catalog::new();
        let config = SyncConfig::default();

        let first = FormRequest::new().with_field("__widgetStateField", bundle);
        assert!(PostBack::new(&catalog, &config, &first).bundle().unwrap().is_empty());

        let blank = FormRequest::post_back().with_field("__widgetStateField", "  ");
        assert!(PostBack::new(&catalog, &config, &blank).bundle().unwrap().is_empty());
    }

    #[test]
    fn bundle_is_parsed_once() {
        let req = request(json!([entry("s", json!({})), entry("s", json!({ "value": 1 }))]));
        let catalog = Catalog::new();
        let config = SyncConfig::default();
        let postback = PostBack::new(&catalog, &config, &req);
        let a = postback.bundle().unwrap().as_ptr();
        let b = postback.bundle().unwrap().as_ptr();
        assert_eq!(a, b);
        // First entry wins.
        let mut slider = Slider::new("s");
        postback.reconcile(&mut slider).unwrap();
        assert_eq!(slider.value, 0);
    }

    #[test]
    fn null_options_are_empty() {
        let req = request(json!([{ "ControlID": "s", "WidgetName": "slider", "Options": null }]));
        let outcome = reconcile(&mut Slider::new("s"), &req).unwrap();
        assert!(outcome.matched);
        assert!(!outcome.changed());
    }

    #[test]
    fn on_write_policy_reports_changes() {
        let req = request(json!([entry("s", json!({ "value": 2 }))]));
        let catalog = Catalog::new();
        let config = SyncConfig {
            data_changed: DataChangedPolicy::OnWrite,
            ..SyncConfig::default()
        };
        let postback = PostBack::new(&catalog, &config, &req);
        let mut slider = Slider::new("s");
        assert!(postback.load_post_data(&mut slider).unwrap());
        assert!(!postback.load_post_data(&mut slider).unwrap());
    }

    #[test]
    fn false_for_null_property_is_not_a_write() {
        let req = request(json!([entry("s", json!({ "max": false }))]));
        let catalog = Catalog::new();
        let config = SyncConfig {
            data_changed: DataChangedPolicy::OnWrite,
            ..SyncConfig::default()
        };
        let postback = PostBack::new(&catalog, &config, &req);

        let mut slider = Slider::new("s");
        let outcome = postback.reconcile(&mut slider).unwrap();
        assert!(outcome.matched);
        assert!(outcome.written.is_empty());
        assert_eq!(slider.max, None);
        assert!(!postback.load_post_data(&mut slider).unwrap());
    }

    #[test]
    fn false_for_array_with_default_propagates() {
        let req = request(json!([entry("s", json!({ "disabled": true, "values": false }))]));
        let mut slider = Slider::new("s");
        let err = reconcile(&mut slider, &req).unwrap_err();
        assert!(matches!(
            err,
            StateError::Property {
                property: "Values",
                source: PropertyError::TypeMismatch {
                    found: ValueKind::Bool,
                    ..
                },
                ..
            }
        ));
        assert_eq!(slider, Slider::new("s"));
    }

    #[test]
    fn named_entities_are_decoded() {
        let req = request(json!([entry("s", json!({ "label": "caf&eacute;&nbsp;&copy; &#39;&#x41;" }))]));
        let mut slider = Slider::new("s");
        reconcile(&mut slider, &req).unwrap();
        assert_eq!(slider.label, "caf\u{e9}\u{a0}\u{a9} 'A");
    }

    /// Build what the client would post back for the rendered payload when the
    /// user changed nothing.
    fn client_bundle(payload: &Value, descriptors: &WidgetDescriptors<Slider>) -> Value {
        let widgets = payload.as_array().unwrap();
        let entries: Vec<Value> = widgets
            .iter()
            .map(|w| {
                let mut live = Map::new();
                for option in descriptors.options() {
                    let value = w["options"]
                        .get(option.name())
                        .cloned()
                        .unwrap_or_else(|| option.default_value().clone());
                    let value = match value {
                        Value::String(s) if option.is_html_encoded() => {
                            Value::String(html_escape::encode_text(&s).into_owned())
                        }
                        v => v,
                    };
                    live.insert(option.name().to_owned(), value);
                }
                json!({ "ControlID": w["id"], "WidgetName": w["widgetName"], "Options": live })
            })
            .collect();
        Value::Array(entries)
    }

    #[test]
    fn unchanged_round_trip_restores_properties() {
        let catalog = Catalog::new();
        let config = SyncConfig::default();

        let mut original = Slider::new("s");
        original.value = 5;
        original.values = vec![3, 4, 5];
        original.label = "<i>R&D</i>".into();
        original.max = Some(100);
        original.disabled = true;

        let mut page = PageState::new(&catalog, &config);
        page.render(&original).unwrap();
        let payload: Value = serde_json::from_str(&page.payload_json().unwrap()).unwrap();

        let descriptors = catalog.descriptors::<Slider>().unwrap();
        let req = request(client_bundle(&payload, &descriptors));
        let mut fresh = Slider::new("s");
        PostBack::new(&catalog, &config, &req).reconcile(&mut fresh).unwrap();
        assert_eq!(fresh, original);
    }
}
