// Copyright 2025 the Widgetsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=widgetsync_responder --heading-base-level=0

//! Widgetsync Responder: server-side handlers for client widget events.
//!
//! ## Overview
//!
//! A widget event declared with post-back enabled submits the form and names
//! the event that fired. This crate turns that name back into handler calls:
//!
//! - [`EventHandlers`] is an explicit per-instance registry from event name to
//!   callbacks. Nothing is looked up by reflection.
//! - [`raise_post_back_event`] reconciles the widget from the submitted state,
//!   then runs the handlers of the matching declared event.
//! - [`raise_post_data_changed_event`] runs the handlers of the type's
//!   data-changed event.
//!
//! Unknown event names resolve to [`Dispatched::Unmatched`] and never fail.
//!
//! ## Request flow
//!
//! 1) Render: widgets record their state into a
//!    [`PageState`](widgetsync_state::PageState).
//! 2) Post-back: build a [`PostBack`](widgetsync_state::PostBack) for the
//!    request and call [`load_post_data`](widgetsync_state::PostBack::load_post_data)
//!    for each widget.
//! 3) Raise: call [`raise_post_data_changed_event`] for widgets that reported a
//!    change, then [`raise_post_back_event`] for the widget whose event
//!    submitted the form.

pub mod dispatch;
pub mod handlers;
pub mod types;

pub use dispatch::{raise_post_back_event, raise_post_data_changed_event};
pub use handlers::EventHandlers;
pub use types::{Dispatched, EventArgs};
