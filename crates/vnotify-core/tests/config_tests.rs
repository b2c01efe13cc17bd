// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Settings loaded through `ConfigService` drive what the notifier draws.

use vnotify_core::config::{ConfigError, ConfigService};
use vnotify_core::headless::{HeadlessHost, MonospaceMetrics, RecordingSurface};
use vnotify_core::{Notifier, OverlayConfig, ReportOptions, Severity, Viewport};
use vnotify_dry_tests::InMemoryConfigStore;

const LEGACY: &str = r#"{
    "basic": {"module_name": "Bake", "use_module_name": true, "show_notification_type": false},
    "notification_draw": {
        "notification_text_size": 24,
        "notification_x_start_position": 0.5,
        "notification_width_percentage": 0.9,
        "notification_spacing": 8,
        "notification_first_y_location": 10
    },
    "colors": {"notification_error_color": [0.5, 0.0, 0.0, 1.0]}
}"#;

#[test]
fn legacy_settings_document_seeds_the_notifier() {
    let store = InMemoryConfigStore::with_settings(LEGACY);
    let config = ConfigService::new(store.clone()).load_overlay().unwrap();
    assert_eq!(store.load_count(), 1);

    let mut n = Notifier::with_config(HeadlessHost::new(), config);
    n.report("cache ready", Severity::Error, ReportOptions::fixed(0))
        .unwrap();

    let mut surface = RecordingSurface::with_metrics(
        Viewport::default(),
        MonospaceMetrics {
            advance: 0.6,
            ..MonospaceMetrics::default()
        },
    );
    surface.resize(Viewport {
        width: 1000.0,
        dpi: 72.0,
    });
    let stack = n.layout(&mut surface);
    assert_eq!(stack.len(), 1);
    let entry = &stack[0];
    assert_eq!(entry.text.text, "(Bake) cache ready");
    assert_eq!(entry.text.size, 24);
    assert_eq!(entry.quad.color, [0.5, 0.0, 0.0, 1.0]);
    assert!((entry.quad.vertices[0][0] - 500.0).abs() < 1e-3);
    assert!((entry.quad.vertices[2][0] - 900.0).abs() < 1e-3);
    assert!((entry.y() - 10.0).abs() < 1e-3);
}

#[test]
fn saved_settings_reload_identically() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    let mut config = OverlayConfig::default();
    config.draw.spacing = 12.0;
    config.basic.show_notification_type = true;
    service.save_overlay(&config).unwrap();
    assert_eq!(service.load_overlay().unwrap(), config);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn store_failure_surfaces_as_config_error() {
    let store = InMemoryConfigStore::with_settings("{}");
    store.set_fail_on_load(true);
    let err = ConfigService::new(store).load_overlay().unwrap_err();
    assert!(matches!(err, ConfigError::Io(_) | ConfigError::Other(_)));
}

#[test]
fn absent_document_falls_back_to_defaults() {
    let config = ConfigService::new(InMemoryConfigStore::new())
        .load_overlay()
        .unwrap();
    assert_eq!(config, OverlayConfig::default());
}
