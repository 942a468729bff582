use criterion::{Criterion, criterion_group, criterion_main};
use figure_rs::api::Plot;
use figure_rs::core::{
    Bounds2, DataPoint, PlotParams, ViewTransform, Viewport, nearest_point_index,
};
use figure_rs::render::NullRenderer;
use std::hint::black_box;

fn transform() -> ViewTransform {
    let params = PlotParams {
        bounds: Bounds2::new(0.0, 10_000.0, -2_500.0, 2_500.0),
        ..PlotParams::default()
    };
    ViewTransform::new(params, Viewport::new(1920, 1080)).expect("valid transform")
}

fn samples_10k() -> Vec<DataPoint> {
    (0..10_000)
        .map(|i| {
            let t = f64::from(i);
            DataPoint::new(t, (t * 0.01).sin() * 2_000.0)
        })
        .collect()
}

fn bench_transform_round_trip(c: &mut Criterion) {
    let transform = transform();

    c.bench_function("view_transform_round_trip", |b| {
        b.iter(|| {
            let device = transform.data_to_device(black_box(DataPoint::new(4_321.123, 17.5)));
            let _ = transform.device_to_data(device);
        })
    });
}

fn bench_nearest_point_10k(c: &mut Criterion) {
    let transform = transform();
    let samples = samples_10k();

    c.bench_function("nearest_point_10k", |b| {
        b.iter(|| {
            let _ = nearest_point_index(
                black_box(&samples),
                black_box(DataPoint::new(5_000.5, 250.0)),
                black_box(&transform),
            );
        })
    });
}

fn bench_plot_redraw_10k(c: &mut Criterion) {
    let samples = samples_10k();
    let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(1920, 1080)).expect("plot");
    plot.set_values(&ys).expect("samples");

    c.bench_function("plot_redraw_10k", |b| {
        b.iter(|| {
            plot.redraw().expect("redraw should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_transform_round_trip,
    bench_nearest_point_10k,
    bench_plot_redraw_10k
);
criterion_main!(benches);
