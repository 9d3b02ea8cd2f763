// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Date picker page payload.
//!
//! Shows the option kinds that need special handling: array defaults, an
//! HTML-encoded caption, client code, and a limit that is either a date
//! expression or a day offset.
//!
//! Run:
//! - `cargo run -p widgetsync_demos --example datepicker_page`

use serde_json::{Value, json};
use widgetsync_catalog::option::{Getter, Property, Setter, coerce, disabled_option};
use widgetsync_catalog::{
    Catalog, EventDescriptor, OptionDescriptor, PropertyKind, ValueKind, Widget,
    WidgetDescriptors,
};
use widgetsync_state::page::target_attribute_value;
use widgetsync_state::{FormRequest, PageState, PostBack, StateError, SyncConfig};

const DAY_NAMES_MIN: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug)]
struct Datepicker {
    id: String,
    disabled: bool,
    button_text: String,
    calculate_week: String,
    date_format: String,
    day_names_min: Vec<String>,
    first_day: i32,
    min_date: Option<String>,
    min_date_days: Option<i64>,
    number_of_months: i32,
}

impl Datepicker {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            disabled: false,
            button_text: "...".to_owned(),
            calculate_week: "$.datepicker.iso8601Week".to_owned(),
            date_format: "mm/dd/yy".to_owned(),
            day_names_min: DAY_NAMES_MIN.map(str::to_owned).to_vec(),
            first_day: 0,
            min_date: None,
            min_date_days: None,
            number_of_months: 1,
        }
    }
}

fn text(
    name: &'static str,
    get: Getter<Datepicker>,
    set: Setter<Datepicker>,
) -> Property<Datepicker> {
    Property::new(name, PropertyKind::Text, get, set)
}

impl Widget for Datepicker {
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
            .option(
                OptionDescriptor::new(
                    "buttonText",
                    json!("..."),
                    text(
                        "ButtonText",
                        |w| json!(w.button_text),
                        |w, v| {
                            w.button_text = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .html_encoded(),
            )
            .option(
                OptionDescriptor::new(
                    "calculateWeek",
                    json!("$.datepicker.iso8601Week"),
                    text(
                        "CalculateWeek",
                        |w| json!(w.calculate_week),
                        |w, v| {
                            w.calculate_week = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .requires_eval(),
            )
            .option(OptionDescriptor::new(
                "dateFormat",
                json!("mm/dd/yy"),
                text(
                    "DateFormat",
                    |w| json!(w.date_format),
                    |w, v| {
                        w.date_format = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(OptionDescriptor::new(
                "dayNamesMin",
                json!(DAY_NAMES_MIN),
                Property::new(
                    "DayNamesMin",
                    PropertyKind::Array,
                    |w| json!(w.day_names_min),
                    |w, v| {
                        w.day_names_min = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(OptionDescriptor::new(
                "firstDay",
                json!(0),
                Property::new(
                    "FirstDay",
                    PropertyKind::Integer,
                    |w| json!(w.first_day),
                    |w, v| {
                        w.first_day = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(
                OptionDescriptor::new(
                    "minDate",
                    Value::Null,
                    text(
                        "MinDate",
                        |w| json!(w.min_date),
                        |w, v| {
                            w.min_date = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .link(
                    ValueKind::Number,
                    Property::new(
                        "MinDateDays",
                        PropertyKind::Integer,
                        |w| json!(w.min_date_days),
                        |w, v| {
                            w.min_date_days = coerce(v)?;
                            Ok(())
                        },
                    ),
                ),
            )
            .option(OptionDescriptor::new(
                "numberOfMonths",
                json!(1),
                Property::new(
                    "NumberOfMonths",
                    PropertyKind::Integer,
                    |w| json!(w.number_of_months),
                    |w, v| {
                        w.number_of_months = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .event(EventDescriptor::new("create"))
            .event(EventDescriptor::new("beforeShow"))
            .event(EventDescriptor::new("onClose"))
            .event(EventDescriptor::new("onSelect").auto_post_back().data_changed())
    }

    fn widget_name(&self) -> &str {
        "datepicker"
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
    let config = SyncConfig::default();

    let mut picker = Datepicker::new("arrival");
    picker.button_text = "<b>Pick</b> a day".to_owned();
    picker.calculate_week = "function (d) { return $.datepicker.iso8601Week(d) + 1; }".to_owned();
    picker.first_day = 1;
    picker.min_date = Some("-1w".to_owned());

    let mut page = PageState::new(&catalog, &config);
    page.render(&picker)?;
    let payload: Value = serde_json::from_str(&page.payload_json()?).map_err(StateError::Serialize)?;
    println!("== Payload ==");
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).map_err(StateError::Serialize)?
    );
    println!(
        "data-ui-widget = {:?}",
        target_attribute_value(Some("mask"), picker.widget_name())
    );

    // The user widened the range to two weeks back, as a day offset.
    let bundle = json!([{
        "ControlID": "arrival",
        "WidgetName": "datepicker",
        "Options": {
            "buttonText": "&lt;b&gt;Pick&lt;/b&gt; a day",
            "firstDay": 1,
            "minDate": -14,
            "numberOfMonths": 2
        }
    }]);
    let request = FormRequest::post_back().with_field(&config.state_field, bundle.to_string());
    let postback = PostBack::new(&catalog, &config, &request);
    let outcome = postback.reconcile(&mut picker)?;
    println!("== Reconciled {:?} ==", outcome.written);
    println!(
        "minDate = {:?}, minDate days = {:?}, months = {}",
        picker.min_date, picker.min_date_days, picker.number_of_months
    );
    Ok(())
}
