//! # mailhook-dispatch
//!
//! Asynchronous dispatch adaptor bridging mailbox push notifications to a
//! subscriber's handlers.
//!
//! A push transport (webhook listener, Pub/Sub pull loop, IMAP IDLE monitor)
//! receives mailbox-change notifications and hands each one to the
//! [`Dispatcher`] entry point matching its kind. The dispatcher schedules the
//! subscriber's handler on its own task and returns a [`PendingResult`]
//! immediately, so the transport is never blocked by - and never crashed by -
//! subscriber code. Handler failures come back through the same future as a
//! wrapped [`DispatchError`], never as a panic in the transport's context.
//!
//! ## Quick Start
//!
//! ```
//! use mailhook_dispatch::{Dispatcher, ModuleIdentity, Notification, Subscriber};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Register handlers for the notification kinds of interest.
//! let subscriber = Subscriber::new()
//!     .on_new_email(|_notification, _isolated| async move {
//!         Ok(json!({"status": "ok"}))
//!     });
//!
//! // The capability list tells the transport what to subscribe to upstream.
//! assert_eq!(subscriber.handler_names(), vec!["onNewEmail"]);
//!
//! let dispatcher = Dispatcher::new(
//!     subscriber,
//!     ModuleIdentity::new("googleapis", "gmail", "2.0.0"),
//! );
//!
//! // The transport fires and forgets; the handler runs on its own task.
//! let pending = dispatcher.notify_new_email(
//!     Notification::new().with_field("messageId", json!("m-1")),
//! );
//!
//! // Whoever holds the pending result may await the outcome.
//! assert_eq!(pending.await.unwrap(), json!({"status": "ok"}));
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - `dispatch` returns before the handler has necessarily run; the calling
//!   context never blocks on subscriber code.
//! - Each invocation's [`PendingResult`] completes exactly once, on success
//!   or wrapped failure - including when no handler is registered or the
//!   handler task panics.
//! - Concurrent invocations against the same subscriber are independent; no
//!   ordering is imposed across notifications.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod dispatch;
mod error;
mod identity;
mod subscriber;

pub use dispatch::{Dispatcher, PendingResult};
pub use error::{DispatchError, DispatchResult, HandlerError};
pub use identity::ModuleIdentity;
pub use subscriber::{HandlerResult, Subscriber};

pub use mailhook_notify::{Notification, NotificationKind, Value};
