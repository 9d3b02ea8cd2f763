// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-back event dispatch.
//!
//! An accordion posts back when a panel opens. The host reconciles it, raises
//! the data-changed event when the active panel moved, then raises the event
//! that submitted the form. An event name left over from an older page is
//! ignored.
//!
//! Run:
//! - `RUST_LOG=widgetsync=debug cargo run -p widgetsync_demos --example postback_events`

use serde_json::json;
use widgetsync_catalog::option::{Property, coerce, disabled_option};
use widgetsync_catalog::{
    Catalog, EventDescriptor, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors,
};
use widgetsync_responder::{EventHandlers, raise_post_back_event, raise_post_data_changed_event};
use widgetsync_state::{DataChangedPolicy, FormRequest, PostBack, StateError, SyncConfig};

struct Accordion {
    id: String,
    active: i32,
    collapsible: bool,
    disabled: bool,
}

impl Widget for Accordion {
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
                "active",
                json!(0),
                Property::new(
                    "Active",
                    PropertyKind::Integer,
                    |w| json!(w.active),
                    |w, v| {
                        w.active = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(OptionDescriptor::new(
                "collapsible",
                json!(false),
                Property::new(
                    "Collapsible",
                    PropertyKind::Boolean,
                    |w| json!(w.collapsible),
                    |w, v| {
                        w.collapsible = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .event(EventDescriptor::new("create"))
            .event(EventDescriptor::new("beforeActivate"))
            .event(EventDescriptor::new("activate").auto_post_back().data_changed())
    }

    fn widget_name(&self) -> &str {
        "accordion"
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn unique_id(&self) -> &str {
        &self.id
    }

    fn auto_post_back(&self) -> bool {
        true
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
    let config = SyncConfig {
        data_changed: DataChangedPolicy::OnWrite,
        ..SyncConfig::default()
    };
    let bundle = json!([{
        "ControlID": "faq",
        "WidgetName": "accordion",
        "Options": { "active": 2, "collapsible": true, "disabled": false }
    }]);
    let request = FormRequest::post_back().with_field(&config.state_field, bundle.to_string());
    let postback = PostBack::new(&catalog, &config, &request);

    let mut accordion = Accordion {
        id: "faq".to_owned(),
        active: 0,
        collapsible: true,
        disabled: false,
    };
    let mut handlers = EventHandlers::new();
    handlers.subscribe("activate", |a: &mut Accordion, _| {
        println!("activate: panel {} is open", a.active);
    });

    if postback.load_post_data(&mut accordion)? {
        let raised = raise_post_data_changed_event(&postback, &mut accordion, &mut handlers)?;
        println!("data changed -> {raised:?}");
    }
    for name in ["activate", "beforeActivate", "select"] {
        let raised = raise_post_back_event(&postback, &mut accordion, &mut handlers, name)?;
        println!("{name} -> {raised:?}");
    }
    Ok(())
}
