//! TypeScript Generation Tests
//!
//! Validates that Stridelog types can be exported to TypeScript when the
//! tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, all types are properly configured for TypeScript export.
    fn assert_type<T: Type>() {}

    // Session types
    assert_type::<stridelog::GpsPoint>();
    assert_type::<stridelog::TrackerStats>();
    assert_type::<stridelog::TrackingState>();
    assert_type::<stridelog::SessionFault>();
    assert_type::<stridelog::TrackingSnapshot>();
    assert_type::<stridelog::Path>();
    assert_type::<stridelog::WatchOptions>();

    // Record types
    assert_type::<stridelog::OutdoorRunActivity>();
    assert_type::<stridelog::ActivitySummary>();
    assert_type::<stridelog::LiveReadout>();
    assert_type::<stridelog::geo::RouteBounds>();
}

#[test]
fn test_serialized_field_names_match_stored_shape() {
    // Exported bindings and stored records share these serde names
    let stats = serde_yaml_ng::to_string(&stridelog::TrackerStats::default()).unwrap();
    for field in ["durationSeconds", "distanceKm", "paceMinPerKm"] {
        assert!(stats.contains(field), "missing {} in {}", field, stats);
    }

    let point = serde_yaml_ng::to_string(&stridelog::GpsPoint::new(1.5, -2.5, 1000)).unwrap();
    for field in ["lat", "lng", "timestamp", "altitude"] {
        assert!(point.contains(field), "missing {} in {}", field, point);
    }

    let state = serde_yaml_ng::to_string(&stridelog::TrackingState::Paused).unwrap();
    assert_eq!(state.trim(), "Paused");
}
