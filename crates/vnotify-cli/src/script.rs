// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Step scripts for the headless runner.
//!
//! A script is a JSON array of steps, each stamped with a virtual time
//! `at` in seconds. Before a step runs, every timer due at or before its
//! time fires. `frame` steps paint into a recording surface. Everything
//! observable is written as one JSON object per line.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vnotify_core::headless::{DrawOp, HeadlessHost, RecordingSurface};
use vnotify_core::{
    ConfigUpdate, EvictionPolicy, Notifier, NotificationId, OverlayConfig, ReportOptions,
    Severity, Viewport, DEFAULT_DURATION_SECS,
};

/// One scripted step.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Virtual time in seconds.
    #[serde(default)]
    pub at: f64,
    /// What to do at that time.
    #[serde(flatten)]
    pub action: Action,
}

/// Operations a step can perform.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    /// `Notifier::report_value`.
    Report {
        /// Message; anything but a string is rejected.
        text: serde_json::Value,
        /// Defaults to INFO.
        #[serde(default)]
        severity: Severity,
        /// Seconds on screen; zero or less pins it to `fix_slot`.
        #[serde(default = "default_duration")]
        duration: f64,
        /// Echo transient messages to the console.
        #[serde(default = "default_echo")]
        echo: bool,
        /// Fix slot used when `duration <= 0`.
        #[serde(default)]
        fix_slot: u32,
    },
    /// `Notifier::update_fix_message`.
    UpdateFix {
        /// Replacement text.
        #[serde(default)]
        text: Option<String>,
        /// Replacement severity.
        #[serde(default)]
        severity: Option<Severity>,
        /// Slot to revise.
        #[serde(default)]
        fix_slot: u32,
    },
    /// `Notifier::remove_fix_message`.
    RemoveFix {
        /// Slot to drop.
        #[serde(default)]
        fix_slot: u32,
    },
    /// `Notifier::clear_fix_messages`.
    ClearFix,
    /// `Notifier::unregister_all`.
    Unregister,
    /// `Notifier::set_configuration`.
    Configure(ConfigUpdate),
    /// `Notifier::set_eviction_policy`.
    Eviction {
        /// New policy.
        policy: EvictionPolicy,
    },
    /// Paint one frame.
    Frame,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION_SECS
}

const fn default_echo() -> bool {
    true
}

/// A line of runner output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Expired {
        at: f64,
        id: NotificationId,
        text: &'a str,
    },
    Console {
        at: f64,
        line: &'a str,
    },
    Frame {
        at: f64,
        ops: &'a [DrawOp],
    },
}

/// Parse a script document.
pub fn parse(source: &str) -> Result<Vec<Step>> {
    serde_json::from_str(source).context("malformed script")
}

/// Run `steps` against a fresh headless notifier, writing events to `out`.
pub fn run<W: Write>(
    steps: &[Step],
    config: OverlayConfig,
    viewport: Viewport,
    out: &mut W,
) -> Result<()> {
    let mut notifier = Notifier::with_config(HeadlessHost::new(), config);
    let mut surface = RecordingSurface::new(viewport);
    let mut echoed = 0;

    for (index, step) in steps.iter().enumerate() {
        let at = Duration::try_from_secs_f64(step.at)
            .with_context(|| format!("step {index}: invalid time {}", step.at))?;
        for ticket in notifier.host_mut().advance_to(at) {
            if let Some(gone) = notifier.on_timer(ticket) {
                emit(
                    out,
                    &Event::Expired {
                        at: step.at,
                        id: gone.id(),
                        text: gone.raw_text(),
                    },
                )?;
            }
        }

        apply(&mut notifier, &step.action, &mut surface)
            .with_context(|| format!("step {index} failed"))?;

        for line in &notifier.host().console()[echoed..] {
            emit(out, &Event::Console { at: step.at, line })?;
        }
        echoed = notifier.host().console().len();

        if matches!(step.action, Action::Frame) {
            let ops = surface.take_ops();
            emit(out, &Event::Frame { at: step.at, ops: &ops })?;
        }
    }
    Ok(())
}

fn apply(
    notifier: &mut Notifier<HeadlessHost>,
    action: &Action,
    surface: &mut RecordingSurface,
) -> Result<()> {
    match action {
        Action::Report {
            text,
            severity,
            duration,
            echo,
            fix_slot,
        } => {
            let options = ReportOptions {
                duration_secs: *duration,
                echo: *echo,
                fix_slot: *fix_slot,
            };
            notifier.report_value(text, *severity, options)?;
        }
        Action::UpdateFix {
            text,
            severity,
            fix_slot,
        } => notifier.update_fix_message(text.clone(), *severity, *fix_slot)?,
        Action::RemoveFix { fix_slot } => {
            notifier.remove_fix_message(*fix_slot);
        }
        Action::ClearFix => notifier.clear_fix_messages(),
        Action::Unregister => notifier.unregister_all(),
        Action::Configure(update) => notifier.set_configuration(update.clone())?,
        Action::Eviction { policy } => notifier.set_eviction_policy(*policy),
        Action::Frame => {
            notifier.host().take_redraw();
            notifier.draw(surface);
        }
    }
    Ok(())
}

fn emit<W: Write>(out: &mut W, event: &Event<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    Ok(())
}
