// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The notifier: owns the queue, the fix slots, the configuration and the
//! draw-handler registration for one host session.
//!
//! Every call runs on the host's UI thread. Mutators validate first and
//! only then touch state, so a returned error means nothing changed.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::OverlayError;
use crate::layout::{self, EntryLayout};
use crate::notification::{Notification, NotificationId, Severity};
use crate::ports::{DrawHandle, DrawSurface, Host, TimerRequest};
use crate::queue::{EvictionPolicy, ExpiryTicket, FixSlots, TransientQueue};
use crate::settings::{ConfigUpdate, OverlayConfig};

/// Default display duration for transient notifications, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 5.0;

/// Options for [`Notifier::report`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Seconds before the removal timer fires. `<= 0` stores a fix message.
    pub duration_secs: f64,
    /// Write the raw text to the host console (transient messages only).
    pub echo: bool,
    /// Slot used when the message becomes a fix message.
    pub fix_slot: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            echo: true,
            fix_slot: 0,
        }
    }
}

impl ReportOptions {
    /// Transient message shown for `secs` seconds.
    pub fn transient(secs: f64) -> Self {
        Self {
            duration_secs: secs,
            ..Self::default()
        }
    }

    /// Fix message stored at `slot`.
    pub fn fixed(slot: u32) -> Self {
        Self {
            duration_secs: 0.0,
            fix_slot: slot,
            ..Self::default()
        }
    }

    /// Same options with console echo switched on or off.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn is_fix(&self) -> bool {
        self.duration_secs <= 0.0
    }

    fn delay(&self) -> Result<Duration, OverlayError> {
        Duration::try_from_secs_f64(self.duration_secs).map_err(|e| {
            OverlayError::InvalidArgument(format!(
                "display duration {} is not usable: {e}",
                self.duration_secs
            ))
        })
    }
}

/// Notification overlay state for one host session.
#[derive(Debug)]
pub struct Notifier<H> {
    host: H,
    config: OverlayConfig,
    transient: TransientQueue,
    fix: FixSlots,
    handler: Option<DrawHandle>,
    next_id: u64,
}

impl<H: Host> Notifier<H> {
    /// Notifier with default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, OverlayConfig::default())
    }

    /// Notifier seeded with `config` (typically loaded from the settings
    /// document at startup).
    pub fn with_config(host: H, config: OverlayConfig) -> Self {
        Self {
            host,
            config,
            transient: TransientQueue::default(),
            fix: FixSlots::new(),
            handler: None,
            next_id: 1,
        }
    }

    /// Report a message.
    ///
    /// A positive duration queues a transient notification and schedules
    /// its removal timer; zero or negative stores a fix message at
    /// `options.fix_slot`, replacing any occupant.
    pub fn report(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        if options.duration_secs.is_nan() {
            return Err(OverlayError::InvalidArgument(
                "display duration is NaN".into(),
            ));
        }
        let delay = if options.is_fix() {
            None
        } else {
            Some(options.delay()?)
        };

        self.ensure_registered();
        let notification = Notification::new(self.alloc_id(), text, severity);
        let id = notification.id();

        match delay {
            None => {
                debug!(slot = options.fix_slot, %severity, "fix message stored");
                self.fix.insert(options.fix_slot, notification);
                self.host.request_redraw();
            }
            Some(delay) => {
                let echo_line = options.echo.then(|| notification.raw_text().to_owned());
                self.transient.push(notification);
                self.host.schedule(TimerRequest {
                    delay,
                    ticket: ExpiryTicket { id },
                    persistent: true,
                });
                self.host.request_redraw();
                if let Some(line) = echo_line {
                    self.host.line(&line);
                }
            }
        }
        Ok(id)
    }

    /// Report a dynamically typed message, as received from a scripting
    /// bridge or a JSON script. Anything but a JSON string is rejected.
    pub fn report_value(
        &mut self,
        text: &Value,
        severity: Severity,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        match text {
            Value::String(s) => self.report(s.as_str(), severity, options),
            other => Err(OverlayError::InvalidArgument(format!(
                "message text must be a string, got {}",
                json_kind(other)
            ))),
        }
    }

    /// [`Self::report`] with [`Severity::Info`].
    pub fn info(
        &mut self,
        text: impl Into<String>,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        self.report(text, Severity::Info, options)
    }

    /// [`Self::report`] with [`Severity::Warning`].
    pub fn warning(
        &mut self,
        text: impl Into<String>,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        self.report(text, Severity::Warning, options)
    }

    /// [`Self::report`] with [`Severity::Error`].
    pub fn error(
        &mut self,
        text: impl Into<String>,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        self.report(text, Severity::Error, options)
    }

    /// [`Self::report`] with [`Severity::RuntimeError`].
    pub fn runtime_error(
        &mut self,
        text: impl Into<String>,
        options: ReportOptions,
    ) -> Result<NotificationId, OverlayError> {
        self.report(text, Severity::RuntimeError, options)
    }

    /// Change the text and/or severity of the fix message at `slot`.
    ///
    /// Fails with [`OverlayError::OutOfRange`] when the slot is empty.
    /// Fields passed as `None` keep their current value.
    pub fn update_fix_message(
        &mut self,
        new_text: Option<String>,
        new_severity: Option<Severity>,
        slot: u32,
    ) -> Result<(), OverlayError> {
        let Some(current) = self.fix.get(slot) else {
            return Err(OverlayError::OutOfRange { slot });
        };
        let revised = current.revised(new_text, new_severity);

        self.ensure_registered();
        debug!(slot, "fix message updated");
        self.fix.insert(slot, revised);
        self.host.request_redraw();
        Ok(())
    }

    /// Remove the fix message at `slot`. Returns whether one was removed;
    /// a redraw is requested only in that case.
    pub fn remove_fix_message(&mut self, slot: u32) -> bool {
        self.ensure_registered();
        let removed = self.fix.remove(slot).is_some();
        if removed {
            debug!(slot, "fix message removed");
            self.host.request_redraw();
        }
        removed
    }

    /// Remove every fix message.
    pub fn clear_fix_messages(&mut self) {
        self.ensure_registered();
        self.fix.clear();
        self.host.request_redraw();
    }

    /// Deregister the draw handler and drop every notification.
    ///
    /// Does nothing when no handler is registered. Timers already scheduled
    /// still fire later and find an empty queue.
    pub fn unregister_all(&mut self) {
        let Some(handle) = self.handler.take() else {
            return;
        };
        self.host.remove_draw_handler(handle);
        self.transient.clear();
        self.fix.clear();
        debug!("draw handler removed, notifications cleared");
        self.host.request_redraw();
    }

    /// Replace configuration sections. Omitted sections keep their value;
    /// an invalid section rejects the whole update.
    pub fn set_configuration(&mut self, update: ConfigUpdate) -> Result<(), OverlayError> {
        self.config.apply(update)?;
        if self.handler.is_some() {
            self.host.request_redraw();
        }
        Ok(())
    }

    /// Handle a fired removal timer. Evicts per the queue's policy; a fire
    /// against an empty queue is harmless.
    pub fn on_timer(&mut self, ticket: ExpiryTicket) -> Option<Notification> {
        let evicted = self.transient.evict(ticket);
        match &evicted {
            Some(n) => debug!(fired = ticket.id.0, evicted = n.id().0, "transient expired"),
            None => trace!(fired = ticket.id.0, "timer fired on empty queue"),
        }
        self.host.request_redraw();
        evicted
    }

    /// Choose which notification a fired timer evicts.
    pub fn set_eviction_policy(&mut self, policy: EvictionPolicy) {
        self.transient.set_policy(policy);
    }

    /// Paint callback. Lays out the transient queue followed by the fix
    /// messages and issues draw calls; does nothing while unregistered.
    pub fn draw<S>(&self, surface: &mut S)
    where
        S: DrawSurface + ?Sized,
    {
        if self.handler.is_none() {
            return;
        }
        let layouts = self.layout(&mut *surface);
        trace!(boxes = layouts.len(), "drawing notification stack");
        layout::emit(&layouts, surface);
    }

    /// Geometry the next paint would produce on `surface`, without drawing.
    pub fn layout<S>(&self, surface: &mut S) -> Vec<EntryLayout>
    where
        S: DrawSurface + ?Sized,
    {
        let viewport = surface.viewport();
        layout::compute_stack(self.entries(), &self.config, viewport, surface)
    }

    /// Display text of `notification` under the current configuration.
    pub fn display_text(&self, notification: &Notification) -> String {
        notification.display_text(&self.config)
    }

    /// Every active notification in draw order.
    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.transient.iter().chain(self.fix.values())
    }

    /// Transient notifications, oldest first.
    pub fn transient(&self) -> &TransientQueue {
        &self.transient
    }

    /// Fix-message slots.
    pub fn fix_messages(&self) -> &FixSlots {
        &self.fix
    }

    /// Whether the draw handler is registered.
    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    /// Current configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Host adapter.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host adapter, mutably (for driving a headless clock).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the notifier and return the host adapter.
    pub fn into_host(self) -> H {
        self.host
    }

    fn ensure_registered(&mut self) {
        if self.handler.is_none() {
            let handle = self.host.add_draw_handler();
            debug!(handle = handle.0, "draw handler registered");
            self.handler = Some(handle);
        }
    }

    fn alloc_id(&mut self) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::headless::{HeadlessHost, RecordingSurface};
    use crate::ports::Viewport;
    use crate::settings::BasicConfig;

    fn notifier() -> Notifier<HeadlessHost> {
        Notifier::new(HeadlessHost::new())
    }

    fn raw(n: &Notifier<HeadlessHost>) -> Vec<String> {
        n.entries().map(|e| e.raw_text().to_owned()).collect()
    }

    #[test]
    fn first_report_registers_handler() {
        let mut n = notifier();
        assert!(!n.is_registered());
        n.info("hello", ReportOptions::default()).unwrap();
        assert!(n.is_registered());
        assert!(n.host().has_handler());
        assert!(n.host().take_redraw());
        assert_eq!(n.host().pending_timers(), 1);
        assert_eq!(n.host().console(), ["hello"]);
    }

    #[test]
    fn zero_duration_routes_to_fix_slot_without_timer_or_echo() {
        let mut n = notifier();
        n.error("Oops", ReportOptions::fixed(2)).unwrap();
        assert!(n.transient().is_empty());
        assert!(n.fix_messages().contains(2));
        assert_eq!(n.host().pending_timers(), 0);
        assert!(n.host().console().is_empty());
    }

    #[test]
    fn negative_duration_is_a_fix_message() {
        let mut n = notifier();
        n.warning("w", ReportOptions::transient(-1.0)).unwrap();
        assert!(n.fix_messages().contains(0));
    }

    #[test]
    fn echo_can_be_disabled() {
        let mut n = notifier();
        n.info("quiet", ReportOptions::default().echo(false)).unwrap();
        assert!(n.host().console().is_empty());
    }

    #[test]
    fn nan_and_huge_durations_are_rejected_before_mutation() {
        let mut n = notifier();
        let err = n.info("x", ReportOptions::transient(f64::NAN)).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidArgument(_)));
        let err = n.info("x", ReportOptions::transient(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidArgument(_)));
        assert!(!n.is_registered());
        assert_eq!(n.entries().count(), 0);
    }

    #[test]
    fn non_string_value_is_invalid_argument() {
        let mut n = notifier();
        let err = n
            .report_value(&serde_json::json!(42), Severity::Info, ReportOptions::default())
            .unwrap_err();
        assert!(matches!(err, OverlayError::InvalidArgument(_)));
        assert!(!n.is_registered());
        n.report_value(&serde_json::json!("ok"), Severity::Info, ReportOptions::default())
            .unwrap();
        assert_eq!(raw(&n), vec!["ok"]);
    }

    #[test]
    fn update_missing_slot_is_out_of_range() {
        let mut n = notifier();
        let err = n
            .update_fix_message(Some("Retry".into()), None, 1)
            .unwrap_err();
        assert_eq!(err, OverlayError::OutOfRange { slot: 1 });
        assert!(!n.is_registered());
    }

    #[test]
    fn update_sparse_slot_succeeds() {
        let mut n = notifier();
        n.info("five", ReportOptions::fixed(5)).unwrap();
        n.update_fix_message(None, Some(Severity::Error), 5).unwrap();
        let slot = n.fix_messages().get(5).unwrap();
        assert_eq!(slot.raw_text(), "five");
        assert_eq!(slot.severity(), Severity::Error);
    }

    #[test]
    fn remove_absent_slot_does_not_redraw() {
        let mut n = notifier();
        n.info("x", ReportOptions::fixed(0)).unwrap();
        assert!(n.host().take_redraw());
        assert!(!n.remove_fix_message(3));
        assert!(!n.host().take_redraw());
        assert!(n.remove_fix_message(0));
        assert!(n.host().take_redraw());
    }

    #[test]
    fn mutators_other_than_report_also_register() {
        let mut n = notifier();
        n.clear_fix_messages();
        assert!(n.is_registered());
        n.unregister_all();
        n.remove_fix_message(0);
        assert!(n.is_registered());
    }

    #[test]
    fn draw_is_gated_on_registration() {
        let mut n = notifier();
        n.info("a", ReportOptions::default()).unwrap();
        n.warning("b", ReportOptions::fixed(0)).unwrap();
        let mut surface = RecordingSurface::new(Viewport::default());
        n.draw(&mut surface);
        assert_eq!(surface.texts(), vec!["a", "b"]);
        assert_eq!(surface.ops().len(), 4);

        n.unregister_all();
        let mut surface = RecordingSurface::new(Viewport::default());
        n.draw(&mut surface);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn config_change_is_visible_at_next_draw() {
        let mut n = notifier();
        n.info("Saved", ReportOptions::default()).unwrap();
        n.set_configuration(ConfigUpdate {
            basic: Some(BasicConfig {
                module_name: "Core".into(),
                use_module_name: true,
                show_notification_type: true,
            }),
            ..ConfigUpdate::default()
        })
        .unwrap();
        let mut surface = RecordingSurface::new(Viewport::default());
        n.draw(&mut surface);
        assert_eq!(surface.texts(), vec!["(Core) INFO: Saved"]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut n = notifier();
        let a = n.info("a", ReportOptions::default()).unwrap();
        let b = n.info("b", ReportOptions::fixed(0)).unwrap();
        assert!(b > a);
    }
}
