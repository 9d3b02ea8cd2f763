// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event descriptors.

use std::borrow::Cow;

use crate::types::EventFlags;

/// A named client widget event.
///
/// Events without [`EventFlags::AUTO_POST_BACK`] are client-only: the page
/// payload lists them so client script can observe them, but they never submit
/// the form. At most one event per widget type carries
/// [`EventFlags::DATA_CHANGED`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventDescriptor {
    name: Cow<'static, str>,
    flags: EventFlags,
}

impl EventDescriptor {
    /// Declare event `name` with no flags.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            flags: EventFlags::empty(),
        }
    }

    /// Declare event `name` with explicit flags.
    pub fn with_flags(name: impl Into<Cow<'static, str>>, flags: EventFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }

    /// Submit the form when this event fires and auto post-back is on.
    #[must_use]
    pub fn auto_post_back(mut self) -> Self {
        self.flags |= EventFlags::AUTO_POST_BACK;
        self
    }

    /// Designate this event as the data-changed event.
    #[must_use]
    pub fn data_changed(mut self) -> Self {
        self.flags |= EventFlags::DATA_CHANGED;
        self
    }

    /// Client event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flags.
    pub const fn flags(&self) -> EventFlags {
        self.flags
    }

    /// True if the event is declared to post back.
    pub fn causes_post_back(&self) -> bool {
        self.flags.contains(EventFlags::AUTO_POST_BACK)
    }

    /// True if this is the data-changed event.
    pub fn is_data_changed(&self) -> bool {
        self.flags.contains(EventFlags::DATA_CHANGED)
    }
}
