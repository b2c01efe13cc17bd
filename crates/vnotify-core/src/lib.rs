// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-viewport notification overlay: a transient message queue, persistent
//! fix-message slots and the box layout that stacks them in a viewport.
//!
//! The host application is reached only through the traits in [`ports`],
//! so the queue and layout logic run the same against a real viewport, the
//! [`headless`] host or a test fake.

pub mod config;
pub mod error;
pub mod headless;
pub mod layout;
pub mod notification;
pub mod notifier;
pub mod ports;
pub mod queue;
pub mod settings;

pub use error::OverlayError;
pub use notification::{Notification, NotificationId, Severity};
pub use notifier::{Notifier, ReportOptions, DEFAULT_DURATION_SECS};
pub use ports::{DrawSurface, Host, TextMeasure, Viewport};
pub use queue::{EvictionPolicy, ExpiryTicket};
pub use settings::{BasicConfig, ColorConfig, ConfigUpdate, DrawConfig, OverlayConfig, Rgba};
