// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port traits for the host application: drawing, frame hook, timers,
//! redraw requests and the console log.
//!
//! The notifier never talks to a UI toolkit directly. A host adapter
//! implements these traits; tests use the fakes in `vnotify-dry-tests` and
//! the headless host in [`crate::headless`].

use std::time::Duration;

use serde::Serialize;

use crate::queue::ExpiryTicket;
use crate::settings::Rgba;

/// Geometry of the region being painted, queried fresh on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Width of the region in pixels.
    pub width: f32,
    /// System DPI; 72 corresponds to a scale of 1.
    pub dpi: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            dpi: 72.0,
        }
    }
}

/// Rendered size of a (possibly wrapped) block of text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextExtent {
    /// Widest line, in pixels.
    pub width: f32,
    /// Total block height, in pixels.
    pub height: f32,
}

/// Blend state for filled geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Standard alpha blending.
    Alpha,
}

/// Axis-aligned box drawn as two triangles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledQuad {
    /// Corners: bottom-left, top-left, top-right, bottom-right.
    pub vertices: [[f32; 2]; 4],
    /// Triangle indices into `vertices`.
    pub indices: [[u32; 3]; 2],
    /// Solid fill color.
    pub color: Rgba,
    /// Blend state to draw with.
    pub blend: BlendMode,
}

/// Drop shadow parameters for text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    /// Blur level (host-defined; 0, 3 and 5 are common).
    pub blur: u8,
    /// Shadow color.
    pub color: Rgba,
    /// Offset in pixels, x then y.
    pub offset: [f32; 2],
}

/// One text draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// Text to draw; the surface wraps it at `wrap_width`.
    pub text: String,
    /// Anchor of the first line's baseline, in pixels.
    pub position: [f32; 2],
    /// Font size.
    pub size: u32,
    /// Word-wrap width in pixels.
    pub wrap_width: f32,
    /// Foreground color.
    pub color: Rgba,
    /// Drop shadow.
    pub shadow: Shadow,
}

/// Font metrics query.
pub trait TextMeasure {
    /// Size of `text` drawn at `size` and wrapped at `wrap_width`.
    fn measure(&mut self, text: &str, size: u32, wrap_width: f32) -> TextExtent;
}

/// Paint target handed to [`crate::Notifier::draw`] for one frame.
pub trait DrawSurface: TextMeasure {
    /// Current region geometry.
    fn viewport(&self) -> Viewport;
    /// Draw a filled box.
    fn fill(&mut self, quad: &FilledQuad);
    /// Draw a text run.
    fn text(&mut self, run: &TextRun);
}

/// Token returned by the host for a registered draw handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawHandle(pub u64);

/// Per-frame paint hook.
pub trait FrameHook {
    /// Register the overlay's draw callback; the host calls
    /// [`crate::Notifier::draw`] on every paint until it is removed.
    fn add_draw_handler(&mut self) -> DrawHandle;
    /// Deregister a previously added handler.
    fn remove_draw_handler(&mut self, handle: DrawHandle);
}

/// One-shot timer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    /// Delay before the timer fires.
    pub delay: Duration,
    /// Value to hand back through [`crate::Notifier::on_timer`].
    pub ticket: ExpiryTicket,
    /// Survive document/scene reloads.
    pub persistent: bool,
}

/// Host timer facility. Timers fire exactly once on the UI thread.
pub trait TimerPort {
    /// Schedule `request`; the host must call `on_timer(request.ticket)`
    /// once the delay has elapsed.
    fn schedule(&mut self, request: TimerRequest);
}

/// Minimal redraw port; implementations are expected to be cheap/best-effort
/// and typically just mark the viewport dirty.
pub trait RenderPort {
    /// Request a redraw of the overlay's region.
    fn request_redraw(&self);
}

/// Diagnostic text output (the host console).
pub trait LogSink {
    /// Write one line.
    fn line(&mut self, text: &str);
}

/// Everything the notifier needs from its host between paints.
pub trait Host: FrameHook + TimerPort + RenderPort + LogSink {}

impl<T> Host for T where T: FrameHook + TimerPort + RenderPort + LogSink {}

/// [`LogSink`] that forwards to `tracing` at INFO under the
/// `vnotify::console` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn line(&mut self, text: &str) {
        tracing::info!(target: "vnotify::console", "{text}");
    }
}
