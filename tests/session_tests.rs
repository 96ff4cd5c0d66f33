use ratingscope::scene::{Shape, Surface};
use ratingscope::view::{detail, primary};
use ratingscope::{BucketKey, ChartConfig, Dashboard, Dataset, PointerEvent, RawRecord};

fn scenario() -> Dashboard {
    Dashboard::new(
        Dataset::from_raw(vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2016", "7.8", "300", "B"),
            RawRecord::new("2016", "7.1", "100", "C"),
        ]),
        ChartConfig::default(),
    )
    .unwrap()
}

fn bar_names(d: &Dashboard) -> Vec<String> {
    d.detail_scene()
        .elements(detail::BARS)
        .iter()
        .filter_map(|e| e.attrs.iter().find(|(k, _)| k == "data-name").map(|(_, v)| v.clone()))
        .collect()
}

// --- REFERENCE SCENARIO ---

#[test]
fn test_three_games_one_bucket() {
    let mut d = scenario();
    assert_eq!(d.table().get(2016, 7), Some(3));

    let top = d.top(2016, 7);
    let ranked: Vec<_> = top.iter().map(|r| (r.name.as_str(), r.popularity)).collect();
    assert_eq!(ranked, vec![("A", 500.0), ("B", 300.0), ("C", 100.0)]);

    d.handle(PointerEvent::Enter { year: 2016, bucket: 7 });
    assert_eq!(bar_names(&d), vec!["A", "B", "C"]);
}

#[test]
fn test_empty_dataset_renders_axes_only() {
    for include_empty_years in [false, true] {
        let config = ChartConfig { include_empty_years, ..Default::default() };
        let d = Dashboard::new(Dataset::default(), config).unwrap();

        assert!(d.buckets().is_empty());
        assert_eq!(d.years().len(), if include_empty_years { 5 } else { 0 });
        assert!(d.primary_scene().axis(primary::X_AXIS).is_some());
        assert!(d.primary_scene().axis(primary::Y_AXIS).is_some());
        assert!(d.primary_scene().keys(primary::SERIES).is_empty());
        assert!(d.primary_scene().keys(primary::MARKERS).is_empty());
    }
}

// --- INTERACTION ---

#[test]
fn test_hover_sequence_keeps_one_selection() {
    let mut d = Dashboard::new(
        Dataset::from_raw(vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2017", "7.5", "50", "B"),
            RawRecord::new("2017", "6.5", "5", "C"),
        ]),
        ChartConfig::default(),
    )
    .unwrap();

    let events = [
        PointerEvent::Enter { year: 2016, bucket: 7 },
        PointerEvent::Enter { year: 2017, bucket: 7 },
        PointerEvent::Enter { year: 2017, bucket: 6 },
    ];
    for e in events {
        d.handle(e);
    }

    assert_eq!(d.selection(), Some(BucketKey { year: 2017, bucket: 6 }));
    assert_eq!(bar_names(&d), vec!["C"]);

    let enlarged: Vec<_> = d
        .primary_scene()
        .elements(primary::MARKERS)
        .iter()
        .filter(|e| matches!(e.shape, Shape::Circle { r, .. } if r == 6.0))
        .map(|e| e.key.clone())
        .collect();
    assert_eq!(enlarged, vec![primary::marker_key(2017, 6)]);
}

#[test]
fn test_leave_after_leave_is_stable() {
    let mut d = scenario();
    d.handle(PointerEvent::Enter { year: 2016, bucket: 7 });
    d.handle(PointerEvent::Leave { year: 2016, bucket: 7 });
    let once = d.detail_svg();
    d.handle(PointerEvent::Leave { year: 2016, bucket: 7 });

    assert_eq!(d.detail_svg(), once);
    assert_eq!(d.selection(), None);
}

#[test]
fn test_reentering_same_cell_redraws_identically() {
    let mut d = scenario();
    d.handle(PointerEvent::Enter { year: 2016, bucket: 7 });
    let first = d.detail_svg();
    d.handle(PointerEvent::Leave { year: 2016, bucket: 7 });
    d.handle(PointerEvent::Enter { year: 2016, bucket: 7 });

    assert_eq!(d.detail_svg(), first);
}

#[test]
fn test_marker_lookup_through_surface() {
    let d = scenario();
    let marker = d
        .primary_scene()
        .element(primary::MARKERS, &primary::marker_key(2016, 7))
        .unwrap();
    assert!(marker.attrs.contains(&("data-rating".to_string(), "7".to_string())));
}

#[test]
fn test_late_leave_does_not_clear_newer_selection() {
    let mut d = Dashboard::new(
        Dataset::from_raw(vec![
            RawRecord::new("2016", "7.2", "500", "A"),
            RawRecord::new("2017", "6.5", "5", "C"),
        ]),
        ChartConfig::default(),
    )
    .unwrap();

    d.handle(PointerEvent::Enter { year: 2016, bucket: 7 });
    d.handle(PointerEvent::Enter { year: 2017, bucket: 6 });
    d.handle(PointerEvent::Leave { year: 2016, bucket: 7 });

    assert_eq!(d.selection(), Some(BucketKey { year: 2017, bucket: 6 }));
    assert_eq!(bar_names(&d), vec!["C"]);
    assert_eq!(d.marker_radius(2017, 6), Some(6.0));
    assert_eq!(d.marker_radius(2016, 7), Some(4.0));

    d.handle(PointerEvent::Leave { year: 2017, bucket: 6 });
    assert_eq!(d.selection(), None);
    assert!(bar_names(&d).is_empty());
    assert_eq!(d.marker_radius(2017, 6), Some(4.0));
}
