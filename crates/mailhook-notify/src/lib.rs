//! # mailhook-notify
//!
//! Notification model for the `mailhook` push-notification dispatch adaptor.
//!
//! This crate defines:
//! - [`NotificationKind`] - the closed set of mailbox-change events a
//!   subscriber can handle, with the fixed kind-to-handler-name table
//! - [`Notification`] - the opaque, insertion-ordered key/value payload
//!   delivered with each event
//!
//! The dispatch machinery itself lives in `mailhook-dispatch`; this crate is
//! deliberately free of async dependencies so transports can depend on the
//! model alone.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod kind;
mod payload;

pub use kind::NotificationKind;
pub use payload::Notification;

/// Payload field and handler result values are plain JSON values.
pub use serde_json::Value;
