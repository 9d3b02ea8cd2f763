// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for dispatch: event arguments and outcomes.

/// Arguments passed to every server-side event handler.
///
/// Post-back events carry no extra data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EventArgs;

/// Result of raising an event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dispatched {
    /// The event is declared and this many handlers ran.
    Invoked(usize),
    /// The event is declared but nobody subscribed.
    NoSubscribers,
    /// The widget type declares no event of that name.
    Unmatched,
}

impl Dispatched {
    /// Number of handlers that ran.
    pub fn invoked(self) -> usize {
        match self {
            Self::Invoked(n) => n,
            Self::NoSubscribers | Self::Unmatched => 0,
        }
    }
}
