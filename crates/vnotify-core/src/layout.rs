// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Box stacking for the notification overlay.
//!
//! [`compute_stack`] is pure: it only reads the entries, the configuration,
//! the viewport and font metrics. [`emit`] turns the result into draw calls.
//! The running y offset restarts at `first_y_location` on every pass.

use serde::Serialize;

use crate::notification::{Notification, NotificationId};
use crate::ports::{BlendMode, DrawSurface, FilledQuad, Shadow, TextMeasure, TextRun, Viewport};
use crate::settings::{OverlayConfig, Rgba};

/// Horizontal text inset from the box's left edge, in pixels.
pub const TEXT_INSET_X: f32 = 20.0;
/// Horizontal padding subtracted from the box width before wrapping, per DPI unit.
pub const WRAP_PADDING_PER_DPI: f32 = 0.3;
/// Vertical padding added to the text height, per DPI unit.
pub const BOX_PADDING_PER_DPI: f32 = 0.2;
/// Blocks taller than this many single lines get their anchor lifted.
pub const MULTILINE_THRESHOLD: f32 = 1.5;
/// Glyph used to measure the height of a single line.
pub const LINE_PROBE: &str = "(";

const TEXT_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];
const TEXT_SHADOW: Shadow = Shadow {
    blur: 5,
    color: [0.0, 0.0, 0.0, 1.0],
    offset: [1.0, -1.0],
};
const QUAD_INDICES: [[u32; 3]; 2] = [[0, 1, 2], [2, 3, 0]];

/// Computed geometry for one notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryLayout {
    /// Which notification this box belongs to.
    pub id: NotificationId,
    /// Background box.
    pub quad: FilledQuad,
    /// Text run drawn over the box.
    pub text: TextRun,
    /// Height of the box in pixels.
    pub box_height: f32,
}

impl EntryLayout {
    /// Bottom edge (the y the box was placed at).
    pub fn y(&self) -> f32 {
        self.quad.vertices[0][1]
    }
}

/// Horizontal extent of every box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
}

impl Columns {
    /// Resolve the configured fractions against `viewport`.
    pub fn resolve(config: &OverlayConfig, viewport: Viewport) -> Self {
        Self {
            left: viewport.width * config.draw.start_x,
            right: viewport.width * config.draw.end_x,
        }
    }
}

/// Word-wrap width for a box column under `dpi`: the right edge's x
/// coordinate less the padding, truncated to whole pixels and clamped at 0.
pub fn wrap_width(columns: Columns, dpi: f32) -> f32 {
    (columns.right - dpi * WRAP_PADDING_PER_DPI).trunc().max(0.0)
}

/// Lay out one notification with its bottom edge at `y`.
pub fn layout_entry<M>(
    notification: &Notification,
    config: &OverlayConfig,
    viewport: Viewport,
    y: f32,
    measure: &mut M,
) -> EntryLayout
where
    M: TextMeasure + ?Sized,
{
    let columns = Columns::resolve(config, viewport);
    let text = notification.display_text(config);
    let size = notification.text_size(config);
    let wrap = wrap_width(columns, viewport.dpi);

    let text_height = measure.measure(&text, size, wrap).height;
    let line_height = measure.measure(LINE_PROBE, size, wrap).height;
    let box_height = text_height + viewport.dpi * BOX_PADDING_PER_DPI;

    let mut text_y = y + box_height / 2.0 - text_height / 2.0;
    if text_height > line_height * MULTILINE_THRESHOLD {
        text_y += text_height - line_height;
    }

    let quad = FilledQuad {
        vertices: [
            [columns.left, y],
            [columns.left, y + box_height],
            [columns.right, y + box_height],
            [columns.right, y],
        ],
        indices: QUAD_INDICES,
        color: notification.display_color(config),
        blend: BlendMode::Alpha,
    };
    let run = TextRun {
        text,
        position: [columns.left + TEXT_INSET_X, text_y],
        size,
        wrap_width: wrap,
        color: TEXT_COLOR,
        shadow: TEXT_SHADOW,
    };

    EntryLayout {
        id: notification.id(),
        quad,
        text: run,
        box_height,
    }
}

/// Stack `entries` in order, starting at `first_y_location`.
pub fn compute_stack<'a, I, M>(
    entries: I,
    config: &OverlayConfig,
    viewport: Viewport,
    measure: &mut M,
) -> Vec<EntryLayout>
where
    I: IntoIterator<Item = &'a Notification>,
    M: TextMeasure + ?Sized,
{
    let mut y = config.draw.first_y_location;
    let mut out = Vec::new();
    for notification in entries {
        let entry = layout_entry(notification, config, viewport, y, measure);
        y += entry.box_height + config.draw.spacing;
        out.push(entry);
    }
    out
}

/// Issue draw calls for a computed stack: box first, then its text.
pub fn emit<S>(layouts: &[EntryLayout], surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    for entry in layouts {
        surface.fill(&entry.quad);
        surface.text(&entry.text);
    }
}
