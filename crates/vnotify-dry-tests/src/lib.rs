// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for vnotify crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory settings store fake for testing without filesystem
//! - [`host`] - Spy host recording frame-hook, timer, redraw and log calls
//! - [`fixtures`] - Common configurations, viewports and notifier builders

pub mod config;
pub mod fixtures;
pub mod host;

pub use config::InMemoryConfigStore;
pub use fixtures::{spy_notifier, tagged_config, test_surface, TEST_VIEWPORT};
pub use host::{HostCall, SpyHost};
