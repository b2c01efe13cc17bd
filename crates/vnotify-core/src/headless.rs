// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless host: virtual-clock timers, a recording draw surface and
//! monospace font metrics. Used by the CLI to preview layouts without a
//! real viewport, and by tests that need a working host rather than a spy.

use std::cell::Cell;
use std::time::Duration;

use serde::Serialize;

use crate::ports::{
    DrawHandle, DrawSurface, FilledQuad, FrameHook, LogSink, RenderPort, TextExtent, TextMeasure,
    TextRun, TimerPort, TimerRequest, TracingLogSink, Viewport,
};
use crate::queue::ExpiryTicket;

/// Fixed-advance font metrics with greedy word wrapping.
///
/// All ratios are fractions of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Horizontal advance of every glyph.
    pub advance: f32,
    /// Height of a single line of glyphs.
    pub glyph_height: f32,
    /// Distance between consecutive baselines.
    pub line_spacing: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            glyph_height: 0.75,
            line_spacing: 1.25,
        }
    }
}

impl MonospaceMetrics {
    /// Maximum glyphs per line at `size` within `wrap_width`; at least one.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn columns(&self, size: u32, wrap_width: f32) -> usize {
        let glyph = self.advance * size as f32;
        if glyph <= 0.0 {
            return usize::MAX;
        }
        ((wrap_width / glyph).floor() as usize).max(1)
    }

    /// Greedy wrap: breaks at whitespace, hard-splits words longer than a
    /// line and honours explicit newlines.
    pub fn wrap(&self, text: &str, size: u32, wrap_width: f32) -> Vec<String> {
        let columns = self.columns(size, wrap_width);
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            let mut line_len = 0usize;
            for word in paragraph.split_whitespace() {
                let mut word: Vec<char> = word.chars().collect();
                let sep = usize::from(line_len > 0);
                if line_len + sep + word.len() <= columns {
                    if sep == 1 {
                        line.push(' ');
                    }
                    line.extend(word.iter());
                    line_len += sep + word.len();
                    continue;
                }
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                while word.len() > columns {
                    let rest = word.split_off(columns);
                    lines.push(word.iter().collect());
                    word = rest;
                }
                line.extend(word.iter());
                line_len = word.len();
            }
            lines.push(line);
        }
        lines
    }
}

impl TextMeasure for MonospaceMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&mut self, text: &str, size: u32, wrap_width: f32) -> TextExtent {
        let lines = self.wrap(text, size, wrap_width);
        let size = size as f32;
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let extra_lines = lines.len().saturating_sub(1) as f32;
        TextExtent {
            width: widest as f32 * self.advance * size,
            height: self.glyph_height * size + extra_lines * self.line_spacing * size,
        }
    }
}

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    /// A filled box.
    Fill(FilledQuad),
    /// A text run.
    Text(TextRun),
}

/// Surface that records every draw call and measures with
/// [`MonospaceMetrics`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    metrics: MonospaceMetrics,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Empty recording for a region of `viewport` size.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_metrics(viewport, MonospaceMetrics::default())
    }

    /// Empty recording with custom metrics.
    pub fn with_metrics(viewport: Viewport, metrics: MonospaceMetrics) -> Self {
        Self {
            viewport,
            metrics,
            ops: Vec::new(),
        }
    }

    /// Change the region size (takes effect on the next draw).
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Recorded calls, in order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the recording empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Text of every recorded text run, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run.text.as_str()),
                DrawOp::Fill(_) => None,
            })
            .collect()
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&mut self, text: &str, size: u32, wrap_width: f32) -> TextExtent {
        self.metrics.measure(text, size, wrap_width)
    }
}

impl DrawSurface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill(&mut self, quad: &FilledQuad) {
        self.ops.push(DrawOp::Fill(quad.clone()));
    }

    fn text(&mut self, run: &TextRun) {
        self.ops.push(DrawOp::Text(run.clone()));
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    ticket: ExpiryTicket,
}

/// Host with a manually advanced clock.
///
/// Timers are kept until [`HeadlessHost::advance_to`] passes their due
/// time; the caller then feeds the returned tickets to
/// [`crate::Notifier::on_timer`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTimer>,
    handler: Option<DrawHandle>,
    next_handle: u64,
    dirty: Cell<bool>,
    console: Vec<String>,
}

impl HeadlessHost {
    /// Host at time zero with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `t` (never backwards) and return the
    /// tickets of every timer now due, earliest first; ties keep
    /// scheduling order.
    pub fn advance_to(&mut self, t: Duration) -> Vec<ExpiryTicket> {
        self.now = self.now.max(t);
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = pending;
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.ticket).collect()
    }

    /// Move the clock forward by `dt`.
    pub fn advance_by(&mut self, dt: Duration) -> Vec<ExpiryTicket> {
        self.advance_to(self.now.saturating_add(dt))
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Number of timers not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    /// Whether a draw handler is registered.
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Read and clear the redraw flag.
    pub fn take_redraw(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Console lines echoed so far.
    pub fn console(&self) -> &[String] {
        &self.console
    }
}

impl FrameHook for HeadlessHost {
    fn add_draw_handler(&mut self) -> DrawHandle {
        self.next_handle += 1;
        let handle = DrawHandle(self.next_handle);
        self.handler = Some(handle);
        handle
    }

    fn remove_draw_handler(&mut self, handle: DrawHandle) {
        if self.handler == Some(handle) {
            self.handler = None;
        }
    }
}

impl TimerPort for HeadlessHost {
    fn schedule(&mut self, request: TimerRequest) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            due: self.now.saturating_add(request.delay),
            seq,
            ticket: request.ticket,
        });
    }
}

impl RenderPort for HeadlessHost {
    fn request_redraw(&self) {
        self.dirty.set(true);
    }
}

impl LogSink for HeadlessHost {
    fn line(&mut self, text: &str) {
        TracingLogSink.line(text);
        self.console.push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::notification::NotificationId;

    #[test]
    fn wrap_breaks_on_whitespace() {
        let m = MonospaceMetrics::default();
        // size 20 -> 10px per glyph; 100px -> 10 columns
        let lines = m.wrap("hello world again", 20, 100.0);
        assert_eq!(lines, vec!["hello", "world", "again"]);
        let lines = m.wrap("ab cd ef", 20, 100.0);
        assert_eq!(lines, vec!["ab cd ef"]);
    }

    #[test]
    fn wrap_splits_long_words_and_keeps_newlines() {
        let m = MonospaceMetrics::default();
        let lines = m.wrap("abcdefghijklmn\nxy", 20, 50.0);
        assert_eq!(lines, vec!["abcde", "fghij", "klmn", "xy"]);
    }

    #[test]
    fn measure_height_grows_per_line() {
        let mut m = MonospaceMetrics::default();
        let one = m.measure("(", 20, 100.0);
        assert!((one.height - 15.0).abs() < 1e-4);
        let three = m.measure("hello world again", 20, 100.0);
        assert!((three.height - (15.0 + 2.0 * 25.0)).abs() < 1e-4);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut host = HeadlessHost::new();
        let t = |id| ExpiryTicket {
            id: NotificationId(id),
        };
        host.schedule(TimerRequest {
            delay: Duration::from_secs(5),
            ticket: t(1),
            persistent: true,
        });
        host.schedule(TimerRequest {
            delay: Duration::from_secs(2),
            ticket: t(2),
            persistent: true,
        });
        assert_eq!(host.next_due(), Some(Duration::from_secs(2)));
        assert!(host.advance_by(Duration::from_secs(1)).is_empty());
        assert_eq!(host.advance_to(Duration::from_secs(6)), vec![t(2), t(1)]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut host = HeadlessHost::new();
        host.advance_to(Duration::from_secs(3));
        host.advance_to(Duration::from_secs(1));
        assert_eq!(host.now(), Duration::from_secs(3));
    }

    #[test]
    fn stale_handle_removal_is_ignored() {
        let mut host = HeadlessHost::new();
        let first = host.add_draw_handler();
        host.remove_draw_handler(first);
        let second = host.add_draw_handler();
        host.remove_draw_handler(first);
        assert!(host.has_handler());
        host.remove_draw_handler(second);
        assert!(!host.has_handler());
    }

    #[test]
    fn far_future_timers_saturate_instead_of_overflowing() {
        let mut n = crate::Notifier::new(HeadlessHost::new());
        n.host_mut().advance_to(Duration::from_secs_f64(1e19));
        n.info("x", crate::ReportOptions::transient(1e19)).unwrap();
        assert_eq!(n.host().next_due(), Some(Duration::MAX));

        assert_eq!(n.host_mut().advance_by(Duration::MAX).len(), 1);
        assert_eq!(n.host().now(), Duration::MAX);
        assert!(n.host_mut().advance_by(Duration::from_secs(1)).is_empty());
    }
}
