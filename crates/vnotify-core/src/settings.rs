// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! User-tunable overlay settings (display policy, draw geometry, colors).
//!
//! The on-disk document has three sections, `basic`, `notification_draw`
//! and `colors`. Any missing section or field falls back to its default.
//! Key names used by the first release of the add-on are accepted as
//! aliases so old settings files keep loading.

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// RGBA color with float components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Complete overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OverlayConfig {
    /// Display policy.
    pub basic: BasicConfig,
    /// Box geometry and text size.
    #[serde(rename = "notification_draw")]
    pub draw: DrawConfig,
    /// Per-severity box colors.
    pub colors: ColorConfig,
}

/// Display policy for notification text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    /// Module name shown in front of messages when enabled.
    pub module_name: String,
    /// Prefix messages with `"(<module_name>) "`.
    pub use_module_name: bool,
    /// Prefix messages with their severity tag.
    pub show_notification_type: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            module_name: "My Module".into(),
            use_module_name: false,
            show_notification_type: false,
        }
    }
}

/// Geometry of the notification stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Font size used when a notification carries no override.
    #[serde(alias = "notification_text_size")]
    pub text_size: u32,
    /// Left edge as a fraction of the viewport width.
    #[serde(alias = "notification_x_start_position")]
    pub start_x: f32,
    /// Right edge as a fraction of the viewport width.
    #[serde(alias = "notification_width_percentage")]
    pub end_x: f32,
    /// Vertical gap between consecutive boxes, in pixels.
    #[serde(alias = "notification_spacing")]
    pub spacing: f32,
    /// Offset of the first box from the anchor edge, in pixels.
    #[serde(alias = "notification_first_y_location")]
    pub first_y_location: f32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            text_size: 40,
            start_x: 0.8,
            end_x: 1.0,
            spacing: 5.0,
            first_y_location: 50.0,
        }
    }
}

impl DrawConfig {
    /// Check the horizontal fractions and the text size.
    pub fn validate(&self) -> Result<(), OverlayError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(self.start_x) || !in_unit(self.end_x) {
            return Err(OverlayError::InvalidArgument(format!(
                "start_x ({}) and end_x ({}) must lie in [0, 1]",
                self.start_x, self.end_x
            )));
        }
        if self.start_x > self.end_x {
            return Err(OverlayError::InvalidArgument(format!(
                "start_x ({}) must not exceed end_x ({})",
                self.start_x, self.end_x
            )));
        }
        if self.text_size == 0 {
            return Err(OverlayError::InvalidArgument(
                "text_size must be positive".into(),
            ));
        }
        if !self.spacing.is_finite() || !self.first_y_location.is_finite() {
            return Err(OverlayError::InvalidArgument(
                "spacing and first_y_location must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Box color for each severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// INFO boxes.
    #[serde(alias = "notification_info_color")]
    pub info: Rgba,
    /// WARNING boxes.
    #[serde(alias = "notification_warning_color")]
    pub warning: Rgba,
    /// ERROR boxes.
    #[serde(alias = "notification_error_color")]
    pub error: Rgba,
    /// RUNTIME_ERROR boxes.
    #[serde(alias = "notification_runtime_error_color")]
    pub runtime_error: Rgba,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            info: [0.1, 0.1, 0.1, 0.7],
            warning: [1.0, 0.5, 0.0, 0.3],
            error: [1.0, 0.0, 0.0, 0.15],
            runtime_error: [1.0, 0.0, 0.0, 0.3],
        }
    }
}

/// Partial configuration update; `None` sections keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// Replacement display policy.
    pub basic: Option<BasicConfig>,
    /// Replacement geometry.
    #[serde(rename = "notification_draw", alias = "draw")]
    pub draw: Option<DrawConfig>,
    /// Replacement colors.
    pub colors: Option<ColorConfig>,
}

impl OverlayConfig {
    /// Apply `update` wholesale per section. Validation runs first, so a
    /// rejected update changes nothing.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), OverlayError> {
        if let Some(draw) = &update.draw {
            draw.validate()?;
        }
        if let Some(basic) = update.basic {
            self.basic = basic;
        }
        if let Some(draw) = update.draw {
            self.draw = draw;
        }
        if let Some(colors) = update.colors {
            self.colors = colors;
        }
        Ok(())
    }
}
