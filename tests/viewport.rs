use egui::{pos2, vec2, Pos2, Rect};
use livegraph::{ChartKey, SeriesStore, NO_SCROLL};

fn chart_rect() -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(200.0, 50.0))
}

#[test]
fn fitting_series_spreads_over_width() {
    let mut store = SeriesStore::new();
    for i in 0..20 {
        store.add("s", i as f32);
    }
    let chart = store
        .layout(&ChartKey::Series("s".into()), chart_rect(), None)
        .unwrap();
    let s = &chart.series[0];
    assert_eq!(s.step, 10.0);
    assert!(!s.overflow);
    assert_eq!(store.series("s").unwrap().scroll_ratio(), NO_SCROLL);
}

#[test]
fn overflowing_series_shows_latest() {
    let mut store = SeriesStore::new();
    for i in 0..300 {
        store.add("s", i as f32);
    }
    let chart = store
        .layout(&ChartKey::Series("s".into()), chart_rect(), None)
        .unwrap();
    let s = &chart.series[0];
    assert!(s.overflow);
    assert_eq!(s.end - 1, 299);
    assert_eq!(s.bounds, (260.0, 299.0));
    let last = s.points.last().unwrap();
    assert!(last.x <= chart_rect().max.x + 0.001);
}

#[test]
fn scrolling_group_moves_every_member() {
    let mut store = SeriesStore::new();
    for i in 0..1000 {
        store.add_vector3("v", (i as f32, 0.0, -(i as f32)));
    }
    let key = ChartKey::Group("v".into());
    let rect = chart_rect();
    let chart = store.layout(&key, rect, None).unwrap();
    assert_eq!(chart.series.len(), 3);
    assert!(chart.series.iter().all(|s| s.overflow));

    let state = store.scroll(&key, rect, Some(pos2(100.0, 45.0)), -50.0);
    assert!(state.active);
    assert!(state.ratio < 1.0);
    for child in ["vX", "vY", "vZ"] {
        assert_eq!(store.series(child).unwrap().scroll_ratio(), state.ratio);
    }

    let scrolled = store.layout(&key, rect, None).unwrap();
    assert!(scrolled.series[0].end < 1000);
}

#[test]
fn fixed_limits_override_extrema() {
    let mut store = SeriesStore::new();
    store.get("s").set_limits(0.0, 10.0);
    for v in [-50.0, 3.0, 80.0] {
        store.add("s", v);
    }
    let chart = store
        .layout(&ChartKey::Series("s".into()), chart_rect(), None)
        .unwrap();
    assert_eq!(chart.series[0].bounds, (0.0, 10.0));
    let ys: Vec<f32> = chart.series[0].points.iter().map(|p| p.y).collect();
    assert_eq!(ys[0], 50.0);
    assert_eq!(ys[2], 0.0);
}

#[test]
fn hover_carries_raw_value() {
    let mut store = SeriesStore::new();
    for v in [3.0, 1.0, 4.0, 1.0, 5.0] {
        store.add("pi", v);
    }
    let chart = store
        .layout(&ChartKey::Series("pi".into()), chart_rect(), Some(pos2(81.0, 10.0)))
        .unwrap();
    let hover = chart.series[0].hover.unwrap();
    assert_eq!(hover.index, 2);
    assert_eq!(hover.value, 4.0);
    assert_eq!(chart.cursor_x, Some(81.0));
}
