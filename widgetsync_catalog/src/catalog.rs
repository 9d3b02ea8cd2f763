// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type descriptor tables and the registry that caches them.
//!
//! ## Overview
//!
//! [`WidgetDescriptors`] is the ordered option and event table of one widget
//! type, produced by [`Widget::describe`]. [`Catalog`] maps each widget type to
//! its validated table. Populate it at process start with
//! [`Catalog::register`] and share it (it is `Send + Sync`); lookups through
//! [`Catalog::descriptors`] also populate on a miss.
//!
//! Two threads missing the same type at once both build the table; the first
//! stored entry wins and both callers see it. Tables are pure functions of the
//! type, so the duplicated work is harmless.

use core::any::{Any, TypeId, type_name};
use core::fmt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::CatalogError;
use crate::event::EventDescriptor;
use crate::option::OptionDescriptor;
use crate::widget::Widget;

/// Ordered option and event declarations of one widget type.
pub struct WidgetDescriptors<W> {
    options: Vec<OptionDescriptor<W>>,
    events: Vec<EventDescriptor>,
}

impl<W> Default for WidgetDescriptors<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Clone for WidgetDescriptors<W> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            events: self.events.clone(),
        }
    }
}

impl<W> fmt::Debug for WidgetDescriptors<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDescriptors")
            .field("options", &self.options)
            .field("events", &self.events)
            .finish()
    }
}

impl<W> WidgetDescriptors<W> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Append an option.
    #[must_use]
    pub fn option(mut self, option: OptionDescriptor<W>) -> Self {
        self.options.push(option);
        self
    }

    /// Append an event.
    #[must_use]
    pub fn event(mut self, event: EventDescriptor) -> Self {
        self.events.push(event);
        self
    }

    /// Options in declaration order.
    pub fn options(&self) -> &[OptionDescriptor<W>] {
        &self.options
    }

    /// Events in declaration order.
    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// Option named `name`.
    pub fn option_named(&self, name: &str) -> Option<&OptionDescriptor<W>> {
        self.options.iter().find(|o| o.name() == name)
    }

    /// Event named `name`.
    pub fn event_named(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.name() == name)
    }

    /// The event flagged as data-changed, if any.
    pub fn data_changed_event(&self) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.is_data_changed())
    }

    /// Check the table for configuration errors.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let widget = type_name::<W>();
        let mut seen = HashSet::new();
        for option in &self.options {
            if option.name().is_empty() {
                return Err(CatalogError::EmptyName {
                    widget,
                    item: "option",
                });
            }
            if !seen.insert(option.name()) {
                return Err(CatalogError::DuplicateOption {
                    widget,
                    option: option.name().to_owned(),
                });
            }
            let links = option.links();
            for (i, link) in links.iter().enumerate() {
                if links[..i].iter().any(|l| l.when == link.when) {
                    return Err(CatalogError::AmbiguousPropertyLink {
                        widget,
                        option: option.name().to_owned(),
                        kind: link.when,
                    });
                }
            }
        }

        let mut data_changed: Option<&EventDescriptor> = None;
        for event in &self.events {
            if event.name().is_empty() {
                return Err(CatalogError::EmptyName {
                    widget,
                    item: "event",
                });
            }
            if event.is_data_changed() {
                if let Some(first) = data_changed {
                    return Err(CatalogError::MultipleDataChangedEvents {
                        widget,
                        first: first.name().to_owned(),
                        second: event.name().to_owned(),
                    });
                }
                data_changed = Some(event);
            }
        }
        Ok(())
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Registry of descriptor tables keyed by widget type.
///
/// ```
/// # use serde_json::json;
/// # use widgetsync_catalog::option::{coerce, disabled_option, Property};
/// # use widgetsync_catalog::{PropertyKind, Widget, WidgetDescriptors};
/// # struct Toggle { id: String, disabled: bool }
/// # impl Widget for Toggle {
/// #     fn describe() -> WidgetDescriptors<Self> {
/// #         WidgetDescriptors::<Self>::new().option(disabled_option(Property::new(
/// #             "Disabled",
/// #             PropertyKind::Boolean,
/// #             |w| json!(w.disabled),
/// #             |w, v| { w.disabled = coerce(v)?; Ok(()) },
/// #         )))
/// #     }
/// #     fn widget_name(&self) -> &str { "toggle" }
/// #     fn target_id(&self) -> &str { &self.id }
/// #     fn unique_id(&self) -> &str { &self.id }
/// # }
/// use widgetsync_catalog::Catalog;
///
/// let catalog = Catalog::new();
/// catalog.register::<Toggle>().unwrap();
///
/// let a = catalog.descriptors::<Toggle>().unwrap();
/// let b = catalog.descriptors::<Toggle>().unwrap();
/// assert_eq!(a.options().len(), 1);
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct Catalog {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("types", &self.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build, validate, and store the table for `W`.
    ///
    /// Registering a type twice keeps the first table.
    pub fn register<W: Widget>(&self) -> Result<Arc<WidgetDescriptors<W>>, CatalogError> {
        self.descriptors::<W>()
    }

    /// The table for `W`, building it on first use.
    pub fn descriptors<W: Widget>(&self) -> Result<Arc<WidgetDescriptors<W>>, CatalogError> {
        if let Some(found) = self.lookup::<W>() {
            return Ok(found);
        }

        let built = W::describe();
        built.validate()?;
        tracing::debug!(
            widget = type_name::<W>(),
            options = built.options().len(),
            events = built.events().len(),
            "registered widget descriptors"
        );

        let built: Entry = Arc::new(built);
        let stored = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(TypeId::of::<W>()).or_insert(built))
        };
        match stored.downcast::<WidgetDescriptors<W>>() {
            Ok(table) => Ok(table),
            // Keys are `TypeId::of::<W>()`, so the stored table is always `W`'s.
            Err(_) => unreachable!("catalog entry stored under the wrong type id"),
        }
    }

    /// True if `W` has been registered.
    pub fn contains<W: Widget>(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<W>())
    }

    /// Number of registered widget types.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no widget type has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<W: Widget>(&self) -> Option<Arc<WidgetDescriptors<W>>> {
        let entry = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.get(&TypeId::of::<W>())?)
        };
        entry.downcast::<WidgetDescriptors<W>>().ok()
    }
}
