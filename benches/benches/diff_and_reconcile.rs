// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use widgetsync_catalog::convert::IntArrayConverter;
use widgetsync_catalog::option::{Property, coerce, disabled_option};
use widgetsync_catalog::{
    Catalog, EventDescriptor, OptionDescriptor, PropertyKind, Widget, WidgetDescriptors,
};
use widgetsync_state::{FormRequest, PageOutput, PageState, PostBack, SyncConfig, compute_options};

#[derive(Clone)]
struct Range {
    id: String,
    disabled: bool,
    min: i64,
    max: i64,
    step: i64,
    values: Vec<i64>,
    label: String,
}

impl Range {
    fn new(id: String) -> Self {
        Self {
            id,
            disabled: false,
            min: 0,
            max: 100,
            step: 1,
            values: vec![0, 100],
            label: String::new(),
        }
    }

    fn touched(id: String, seed: i64) -> Self {
        let mut r = Self::new(id);
        r.min = seed % 10;
        r.values = vec![seed % 10, 50 + seed % 50];
        r.label = format!("<b>range {seed}</b> & more");
        r
    }
}

impl Widget for Range {
    fn describe() -> WidgetDescriptors<Self> {
        WidgetDescriptors::<Self>::new()
            .option(disabled_option(Property::new(
                "Disabled",
                PropertyKind::Boolean,
                |w: &Range| json!(w.disabled),
                |w: &mut Range, v| {
                    w.disabled = coerce(v)?;
                    Ok(())
                },
            )))
            .option(OptionDescriptor::new(
                "min",
                json!(0),
                Property::new(
                    "Min",
                    PropertyKind::Integer,
                    |w: &Range| json!(w.min),
                    |w: &mut Range, v| {
                        w.min = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(OptionDescriptor::new(
                "max",
                json!(100),
                Property::new(
                    "Max",
                    PropertyKind::Integer,
                    |w: &Range| json!(w.max),
                    |w: &mut Range, v| {
                        w.max = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(OptionDescriptor::new(
                "step",
                json!(1),
                Property::new(
                    "Step",
                    PropertyKind::Integer,
                    |w: &Range| json!(w.step),
                    |w: &mut Range, v| {
                        w.step = coerce(v)?;
                        Ok(())
                    },
                ),
            ))
            .option(
                OptionDescriptor::new(
                    "values",
                    json!([0, 100]),
                    Property::new(
                        "Values",
                        PropertyKind::Array,
                        |w: &Range| json!(w.values),
                        |w: &mut Range, v| {
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
                        |w: &Range| json!(w.label),
                        |w: &mut Range, v| {
                            w.label = coerce(v)?;
                            Ok(())
                        },
                    ),
                )
                .html_encoded(),
            )
            .event(EventDescriptor::new("slide"))
            .event(EventDescriptor::new("change").auto_post_back().data_changed())
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
}

fn gen_widgets(n: usize) -> Vec<Range> {
    (0..n)
        .map(|i| Range::touched(format!("range{i}"), i as i64))
        .collect()
}

fn gen_bundle(widgets: &[Range]) -> String {
    let entries: Vec<Value> = widgets
        .iter()
        .map(|w| {
            json!({
                "ControlID": w.id,
                "WidgetName": "slider",
                "Options": {
                    "disabled": false,
                    "min": w.min + 1,
                    "max": w.max,
                    "step": w.step,
                    "values": w.values.iter().map(i64::to_string).collect::<Vec<_>>().join(","),
                    "label": "&lt;i&gt;moved&lt;/i&gt; &amp; dropped",
                }
            })
        })
        .collect();
    Value::Array(entries).to_string()
}

fn bench_diff(c: &mut Criterion) {
    let descriptors = Range::describe();
    descriptors.validate().unwrap();
    let untouched = Range::new("plain".into());
    let touched = Range::touched("busy".into(), 7);

    let mut group = c.benchmark_group("diff");
    group.bench_function("untouched", |b| {
        b.iter(|| black_box(compute_options(&descriptors, black_box(&untouched))));
    });
    group.bench_function("touched", |b| {
        b.iter(|| black_box(compute_options(&descriptors, black_box(&touched))));
    });
    group.finish();
}

fn bench_page(c: &mut Criterion) {
    let catalog = Catalog::new();
    catalog.register::<Range>().unwrap();
    let config = SyncConfig::default();

    let mut group = c.benchmark_group("page");
    for &n in &[10_usize, 100, 1000] {
        let widgets = gen_widgets(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("render_finish_{n}"), |b| {
            b.iter(|| {
                let mut page = PageState::new(&catalog, &config);
                for w in &widgets {
                    page.render(w).unwrap();
                }
                let mut out = PageOutput::new();
                page.finish(&mut out).unwrap();
                black_box(out)
            });
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let catalog = Catalog::new();
    catalog.register::<Range>().unwrap();
    let config = SyncConfig::default();

    let mut group = c.benchmark_group("reconcile");
    for &n in &[10_usize, 100, 1000] {
        let widgets = gen_widgets(n);
        let request = FormRequest::post_back().with_field(&config.state_field, gen_bundle(&widgets));
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("parse_and_apply_{n}"), |b| {
            b.iter_batched(
                || widgets.clone(),
                |mut ws| {
                    let postback = PostBack::new(&catalog, &config, &request);
                    for w in &mut ws {
                        postback.reconcile(w).unwrap();
                    }
                    ws
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff, bench_page, bench_reconcile);
criterion_main!(benches);
