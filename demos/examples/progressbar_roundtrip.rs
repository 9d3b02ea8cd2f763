// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress bar round trip.
//!
//! Renders one progress bar, prints the markup the page would carry, then plays
//! the client's side of a submission and reconciles a fresh instance from it.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p widgetsync_demos --example progressbar_roundtrip`

use serde_json::json;
use widgetsync_catalog::option::{Property, coerce, disabled_option};
use widgetsync_catalog::{
    Catalog, EventDescriptor, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors,
};
use widgetsync_state::{
    DataChangedPolicy, FormRequest, PageOutput, PageState, PostBack, StateError, SyncConfig,
};

#[derive(Debug)]
struct ProgressBar {
    id: String,
    value: i32,
    disabled: bool,
}

impl ProgressBar {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            value: 0,
            disabled: false,
        }
    }
}

impl Widget for ProgressBar {
    fn describe() -> WidgetDescriptors<Self> {
        WidgetDescriptors::<Self>::new()
            .option(disabled_option(Property::new(
                "Disabled",
                PropertyKind::Boolean,
                |w| json!(w.disabled),
                |w, v| {
                    w.disabled = coerce(v)?;
                    Ok(())
                },
            )))
            .option(OptionDescriptor::new(
                "value",
                json!(0),
                Property::new(
                    "Value",
                    PropertyKind::Integer,
                    |w| json!(w.value),
                    |w, v| {
                        w.value = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .event(EventDescriptor::new("create"))
            .event(EventDescriptor::new("change").data_changed())
            .event(EventDescriptor::new("complete"))
    }

    fn widget_name(&self) -> &str {
        "progressbar"
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn unique_id(&self) -> &str {
        &self.id
    }
}

fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let catalog = Catalog::new();
    catalog.register::<ProgressBar>()?;
    let config = SyncConfig {
        data_changed: DataChangedPolicy::OnWrite,
        ..SyncConfig::default()
    };

    // First request: render.
    let mut bar = ProgressBar::new("upload");
    bar.value = 37;
    let mut page = PageState::new(&catalog, &config);
    page.render(&bar)?;
    let mut out = PageOutput::new();
    page.finish(&mut out)?;

    println!("== Script blocks ==");
    for block in out.script_blocks() {
        println!("{block}");
    }
    println!("== Hidden fields ==");
    for (name, value) in out.hidden_fields() {
        println!("{name} = {value:?}");
    }

    // The client moved the bar; its submit hook posts the live options.
    let bundle = json!([{
        "ControlID": "upload",
        "WidgetName": "progressbar",
        "Options": { "disabled": false, "value": 64 }
    }]);
    let request = FormRequest::post_back().with_field(&config.state_field, bundle.to_string());

    // Second request: a fresh instance carrying the server-side state.
    let mut bar = ProgressBar::new("upload");
    bar.value = 37;
    let postback = PostBack::new(&catalog, &config, &request);
    let changed = postback.load_post_data(&mut bar)?;
    println!("== After post-back ==");
    println!("{bar:?} (changed: {changed})");
    Ok(())
}
