// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ready-made configurations, viewports and notifiers.

use vnotify_core::headless::RecordingSurface;
use vnotify_core::{BasicConfig, Notifier, OverlayConfig, Viewport};

use crate::host::SpyHost;

/// Viewport used by most layout tests: 1000px wide at scale 1.
pub const TEST_VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    dpi: 72.0,
};

/// Configuration showing both the module name and the severity tag.
pub fn tagged_config(module_name: &str) -> OverlayConfig {
    OverlayConfig {
        basic: BasicConfig {
            module_name: module_name.to_owned(),
            use_module_name: true,
            show_notification_type: true,
        },
        ..OverlayConfig::default()
    }
}

/// Notifier over a fresh [`SpyHost`]; the returned clone shares its log.
pub fn spy_notifier(config: OverlayConfig) -> (Notifier<SpyHost>, SpyHost) {
    let spy = SpyHost::new();
    (Notifier::with_config(spy.clone(), config), spy)
}

/// Recording surface sized to [`TEST_VIEWPORT`].
pub fn test_surface() -> RecordingSurface {
    RecordingSurface::new(TEST_VIEWPORT)
}
