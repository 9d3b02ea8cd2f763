// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance registry of named event handlers.
//!
//! ## Overview
//!
//! [`EventHandlers`] maps an event name to the callbacks subscribed to it.
//! Callbacks run in subscription order and receive the widget mutably, so a
//! handler can react to the state reconciliation just wrote.

use std::collections::HashMap;
use std::fmt;

use crate::types::EventArgs;

/// A subscribed callback.
pub type Handler<W> = Box<dyn FnMut(&mut W, &EventArgs)>;

/// Named handlers for one widget instance.
///
/// ```
/// use widgetsync_responder::handlers::EventHandlers;
/// use widgetsync_responder::types::EventArgs;
///
/// let mut handlers = EventHandlers::<u32>::new();
/// handlers.subscribe("change", |count, _| *count += 1);
/// handlers.subscribe("change", |count, _| *count *= 10);
///
/// let mut count = 0;
/// assert_eq!(handlers.invoke("change", &mut count, &EventArgs), 2);
/// assert_eq!(count, 10);
/// ```
pub struct EventHandlers<W> {
    by_name: HashMap<String, Vec<Handler<W>>>,
}

impl<W> Default for EventHandlers<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for EventHandlers<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, list) in &self.by_name {
            map.entry(name, &list.len());
        }
        map.finish()
    }
}

impl<W> EventHandlers<W> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Add `handler` to the event `name`.
    pub fn subscribe(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&mut W, &EventArgs) + 'static,
    ) {
        self.by_name
            .entry(name.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove every handler of `name`. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, name: &str) -> usize {
        self.by_name.remove(name).map_or(0, |list| list.len())
    }

    /// Number of handlers subscribed to `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    /// True if `name` has at least one handler.
    pub fn has_subscribers(&self, name: &str) -> bool {
        self.subscriber_count(name) > 0
    }

    /// Run every handler of `name` in subscription order.
    ///
    /// Returns the number of handlers run.
    pub fn invoke(&mut self, name: &str, widget: &mut W, args: &EventArgs) -> usize {
        let Some(list) = self.by_name.get_mut(name) else {
            return 0;
        };
        for handler in list.iter_mut() {
            handler(widget, args);
        }
        list.len()
    }
}
