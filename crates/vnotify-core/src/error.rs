// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised by notifier operations.

use thiserror::Error;

/// Error type for notifier mutations.
///
/// Every variant is produced before any state is touched, so a failed call
/// leaves the queue, the fix slots and the configuration exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// An argument failed validation (non-textual message, bad duration,
    /// out-of-bounds draw fractions).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An update targeted a fix-message slot that holds nothing.
    #[error("fix message slot {slot} is not populated")]
    OutOfRange {
        /// The requested slot index.
        slot: u32,
    },
}
