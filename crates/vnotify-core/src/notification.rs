// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Notification records and severity tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::settings::{ColorConfig, OverlayConfig, Rgba};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational note.
    #[default]
    Info,
    /// Something may need attention.
    Warning,
    /// An operation failed.
    Error,
    /// An unexpected failure inside the reporting extension.
    RuntimeError,
}

impl Severity {
    /// All severities, in declaration order.
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::RuntimeError];

    /// Tag prepended to the message when `show_notification_type` is on.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Info => "INFO: ",
            Self::Warning => "WARNING: ",
            Self::Error => "ERROR: ",
            Self::RuntimeError => "<RUNTIME ERROR>: ",
        }
    }

    /// Box color for this severity.
    pub fn color(self, colors: &ColorConfig) -> Rgba {
        match self {
            Self::Info => colors.info,
            Self::Warning => colors.warning,
            Self::Error => colors.error,
            Self::RuntimeError => colors.runtime_error,
        }
    }

    /// Canonical upper-case name (`"RUNTIME_ERROR"` and so on).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::RuntimeError => "RUNTIME_ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "RUNTIME_ERROR" => Ok(Self::RuntimeError),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}

/// Identifier handed out by the notifier, unique per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

/// One message. Immutable once built; display text and color are resolved
/// against the live configuration every time they are asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id: NotificationId,
    raw_text: String,
    severity: Severity,
    module_name: Option<String>,
    text_size: Option<u32>,
}

impl Notification {
    /// Build a notification with no overrides.
    pub fn new(id: NotificationId, raw_text: impl Into<String>, severity: Severity) -> Self {
        Self {
            id,
            raw_text: raw_text.into(),
            severity,
            module_name: None,
            text_size: None,
        }
    }

    /// Use `name` instead of the configured module name.
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Use `size` instead of the configured text size.
    pub fn with_text_size(mut self, size: u32) -> Self {
        self.text_size = Some(size);
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Text as reported, without any prefix.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Module-name override, if any.
    pub fn module_name_override(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Text-size override, if any.
    pub fn text_size_override(&self) -> Option<u32> {
        self.text_size
    }

    /// Module name in effect under `config`.
    pub fn module_name<'a>(&'a self, config: &'a OverlayConfig) -> &'a str {
        self.module_name
            .as_deref()
            .unwrap_or(config.basic.module_name.as_str())
    }

    /// Text size in effect under `config`.
    pub fn text_size(&self, config: &OverlayConfig) -> u32 {
        self.text_size.unwrap_or(config.draw.text_size)
    }

    /// Final text: severity tag first (if enabled), then the module prefix
    /// in front of everything (if enabled and non-empty).
    pub fn display_text(&self, config: &OverlayConfig) -> String {
        let mut text = String::new();
        let module = self.module_name(config);
        if config.basic.use_module_name && !module.is_empty() {
            text.push('(');
            text.push_str(module);
            text.push_str(") ");
        }
        if config.basic.show_notification_type {
            text.push_str(self.severity.prefix());
        }
        text.push_str(&self.raw_text);
        text
    }

    /// Box color under `config`.
    pub fn display_color(&self, config: &OverlayConfig) -> Rgba {
        self.severity.color(&config.colors)
    }

    /// Copy with the given fields replaced; id and overrides are kept.
    pub(crate) fn revised(&self, text: Option<String>, severity: Option<Severity>) -> Self {
        Self {
            raw_text: text.unwrap_or_else(|| self.raw_text.clone()),
            severity: severity.unwrap_or(self.severity),
            ..self.clone()
        }
    }
}
