use figure_rs::core::{
    Bounds2, DataPoint, PlotParams, ViewTransform, Viewport, nearest_point_index,
};

fn transform(bounds: Bounds2) -> ViewTransform {
    let params = PlotParams {
        bounds,
        ..PlotParams::default()
    };
    ViewTransform::new(params, Viewport::new(400, 300)).expect("valid transform")
}

#[test]
fn nearest_sample_is_found_in_device_space() {
    let points = [
        DataPoint::new(0.0, 0.0),
        DataPoint::new(100.0, 100.0),
        DataPoint::new(200.0, 0.0),
    ];
    let view = transform(Bounds2::new(0.0, 240.0, 0.0, 200.0));
    assert_eq!(
        nearest_point_index(&points, DataPoint::new(90.0, 95.0), &view),
        Some(1)
    );
    assert_eq!(
        nearest_point_index(&points, DataPoint::new(190.0, -20.0), &view),
        Some(2)
    );
}

#[test]
fn query_on_first_sample_returns_index_zero() {
    let points = [
        DataPoint::new(3.0, 4.0),
        DataPoint::new(50.0, 80.0),
        DataPoint::new(120.0, 10.0),
    ];
    let view = transform(Bounds2::new(0.0, 240.0, 0.0, 200.0));
    assert_eq!(nearest_point_index(&points, points[0], &view), Some(0));
}

#[test]
fn distance_is_measured_in_pixels_not_data_units() {
    // x spans 1000 units and y spans 1 unit over similar pixel extents, so a
    // small y gap dominates a large x gap.
    let points = [DataPoint::new(0.0, 1.0), DataPoint::new(300.0, 0.0)];
    let view = transform(Bounds2::new(0.0, 1000.0, 0.0, 1.0));
    assert_eq!(
        nearest_point_index(&points, DataPoint::new(0.0, 0.0), &view),
        Some(1)
    );
}

#[test]
fn empty_buffer_has_no_nearest_sample() {
    let view = transform(Bounds2::default());
    assert_eq!(
        nearest_point_index(&[], DataPoint::new(0.0, 0.0), &view),
        None
    );
}
