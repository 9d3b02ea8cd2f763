// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget fixture shared by the unit tests.

use serde_json::json;
use widgetsync_catalog::convert::IntArrayConverter;
use widgetsync_catalog::option::{Property, coerce, disabled_option};
use widgetsync_catalog::{
    EventDescriptor, OptionDescriptor, PropertyKind, ValueKind, Widget, WidgetDescriptors,
};

/// A slider with one option of every flavor the engine treats specially.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Slider {
    pub(crate) id: String,
    pub(crate) visible: bool,
    pub(crate) auto_post_back: bool,
    pub(crate) disabled: bool,
    pub(crate) value: i32,
    pub(crate) values: Vec<i64>,
    pub(crate) label: String,
    pub(crate) max: Option<i64>,
    pub(crate) formatter: Option<String>,
    pub(crate) start: Option<String>,
    pub(crate) start_offset: Option<i64>,
}

impl Slider {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            visible: true,
            auto_post_back: false,
            disabled: false,
            value: 0,
            values: vec![10, 20],
            label: String::new(),
            max: None,
            formatter: None,
            start: None,
            start_offset: None,
        }
    }
}

impl Widget for Slider {
    fn describe() -> WidgetDescriptors<Self> {
        WidgetDescriptors::<Self>::new()
            .option(disabled_option(Property::new(
                "Disabled",
                PropertyKind::Boolean,
                |w: &Slider| json!(w.disabled),
                |w: &mut Slider, v| {
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
                    |w: &Slider| json!(w.value),
                    |w: &mut Slider, v| {
                        w.value = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(
                OptionDescriptor::new(
                    "values",
                    json!([10, 20]),
                    Property::new(
                        "Values",
                        PropertyKind::Array,
                        |w: &Slider| json!(w.values),
                        |w: &mut Slider, v| {
                            w.values = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .with_converter(&IntArrayConverter),
            )
            .option(
                OptionDescriptor::new(
                    "label",
                    json!(""),
                    Property::new(
                        "Label",
                        PropertyKind::Text,
                        |w: &Slider| json!(w.label),
                        |w: &mut Slider, v| {
                            w.label = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .html_encoded(),
            )
            .option(OptionDescriptor::new(
                "max",
                json!(null),
                Property::new(
                    "Max",
                    PropertyKind::Integer,
                    |w: &Slider| json!(w.max),
                    |w: &mut Slider, v| {
                        w.max = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(
                OptionDescriptor::new(
                    "formatter",
                    json!(null),
                    Property::new(
                        "Formatter",
                        PropertyKind::Text,
                        |w: &Slider| json!(w.formatter),
                        |w: &mut Slider, v| {
                            w.formatter = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .requires_eval(),
            )
            .option(
                OptionDescriptor::new(
                    "start",
                    json!(null),
                    Property::new(
                        "Start",
                        PropertyKind::Text,
                        |w: &Slider| json!(w.start),
                        |w: &mut Slider, v| {
                            w.start = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .link(
                    ValueKind::Number,
                    Property::new(
                        "StartOffset",
                        PropertyKind::Integer,
                        |w: &Slider| json!(w.start_offset),
                        |w: &mut Slider, v| {
                            w.start_offset = coerce(v)?;
                            Ok(())
                        },
                    ),
                ),
            )
            .event(EventDescriptor::new("create"))
            .event(EventDescriptor::new("slide"))
            .event(EventDescriptor::new("change").auto_post_back().data_changed())
            .event(EventDescriptor::new("stop").auto_post_back())
    }

    fn widget_name(&self) -> &str {
        "slider"
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn unique_id(&self) -> &str {
        &self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn auto_post_back(&self) -> bool {
        self.auto_post_back
    }
}
