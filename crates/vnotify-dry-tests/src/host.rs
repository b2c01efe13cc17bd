// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Spy host that records every port call the notifier makes.

use std::sync::{Arc, Mutex, MutexGuard};

use vnotify_core::ports::{
    DrawHandle, FrameHook, LogSink, RenderPort, TimerPort, TimerRequest,
};

/// One call made by the notifier into its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `FrameHook::add_draw_handler` returned this handle.
    AddHandler(DrawHandle),
    /// `FrameHook::remove_draw_handler` was called with this handle.
    RemoveHandler(DrawHandle),
    /// `TimerPort::schedule`.
    Schedule(TimerRequest),
    /// `RenderPort::request_redraw`.
    Redraw,
    /// `LogSink::line`.
    Log(String),
}

/// Host fake that never fires timers on its own; tests read the scheduled
/// requests and feed tickets back by hand.
///
/// Clones share the call log, so one clone can be moved into a `Notifier`
/// while the test keeps another for assertions.
#[derive(Debug, Clone, Default)]
pub struct SpyHost {
    inner: Arc<Mutex<SpyState>>,
}

#[derive(Debug, Default)]
struct SpyState {
    calls: Vec<HostCall>,
    next_handle: u64,
    live: Option<DrawHandle>,
}

impl SpyHost {
    /// Fresh spy with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SpyState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Timer requests, in scheduling order.
    pub fn scheduled(&self) -> Vec<TimerRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Schedule(req) => Some(*req),
                _ => None,
            })
            .collect()
    }

    /// Number of redraw requests.
    pub fn redraws(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Redraw))
            .count()
    }

    /// Console lines, in order.
    pub fn log_lines(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Log(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `add_draw_handler` calls.
    pub fn handlers_added(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::AddHandler(_)))
            .count()
    }

    /// Handle currently registered with the fake frame hook.
    pub fn live_handler(&self) -> Option<DrawHandle> {
        self.lock().live
    }

    /// Forget recorded calls (the live handler is kept).
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

impl FrameHook for SpyHost {
    fn add_draw_handler(&mut self) -> DrawHandle {
        let mut state = self.lock();
        state.next_handle += 1;
        let handle = DrawHandle(state.next_handle);
        state.live = Some(handle);
        state.calls.push(HostCall::AddHandler(handle));
        handle
    }

    fn remove_draw_handler(&mut self, handle: DrawHandle) {
        let mut state = self.lock();
        if state.live == Some(handle) {
            state.live = None;
        }
        state.calls.push(HostCall::RemoveHandler(handle));
    }
}

impl TimerPort for SpyHost {
    fn schedule(&mut self, request: TimerRequest) {
        self.lock().calls.push(HostCall::Schedule(request));
    }
}

impl RenderPort for SpyHost {
    fn request_redraw(&self) {
        self.lock().calls.push(HostCall::Redraw);
    }
}

impl LogSink for SpyHost {
    fn line(&mut self, text: &str) {
        self.lock().calls.push(HostCall::Log(text.to_owned()));
    }
}
