use std::ops::ControlFlow;

use approx::assert_abs_diff_eq;
use figure_rs::FigureError;
use figure_rs::api::Plot;
use figure_rs::core::{DataPoint, MIN_ZOOM_FACTOR, PlotStyle, Viewport};
use figure_rs::interaction::{Key, MouseButton, MouseEvent, ScriptStep, ScriptedEvents};
use figure_rs::render::NullRenderer;

/// 400x300 plot whose samples span exactly the 240x200 plot area, so one
/// data unit is one pixel.
fn unit_plot() -> Plot<NullRenderer> {
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(400, 300)).expect("plot");
    plot.set_xy(&[0.0, 240.0], &[0.0, 200.0]).expect("samples");
    plot
}

#[test]
fn mismatched_xy_lengths_are_rejected() {
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(400, 300)).expect("plot");
    let err = plot
        .set_xy(&[0.0, 1.0], &[1.0])
        .expect_err("length mismatch must fail");
    assert!(matches!(err, FigureError::InvalidData(_)));
    assert!(plot.samples().is_empty());
}

#[test]
fn set_values_uses_sample_index_for_x() {
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(400, 300)).expect("plot");
    plot.set_values(&[5.0, 7.0, 6.0]).expect("values");
    assert_eq!(plot.samples()[2], DataPoint::new(2.0, 6.0));
    let bounds = plot.params().bounds;
    assert_eq!((bounds.min_x, bounds.max_x), (0.0, 2.0));
    assert_eq!((bounds.min_y, bounds.max_y), (5.0, 7.0));
}

#[test]
fn display_moves_first_sample_to_plot_origin_and_quits() {
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(400, 300)).expect("plot");
    plot.set_values(&[5.0, 7.0, 6.0]).expect("values");
    let mut events = ScriptedEvents::keys([Key::Char('q')]);
    plot.display(&mut events).expect("display");

    let origin = plot.transform().data_to_device(DataPoint::new(0.0, 5.0));
    assert_abs_diff_eq!(origin.x, 80.0, epsilon = 1e-9);
    assert_abs_diff_eq!(origin.y, 250.0, epsilon = 1e-9);
    assert_eq!(events.polls(), 1);
    assert!(plot.window().renderer().frames_rendered >= 1);
}

#[test]
fn exhausted_event_stream_closes_the_plot() {
    let mut plot = unit_plot();
    let mut events = ScriptedEvents::new([ScriptStep::Idle, ScriptStep::Idle]);
    plot.display(&mut events).expect("display");
    assert_eq!(events.polls(), 3);
}

#[test]
fn grid_key_toggles_grid() {
    let mut plot = unit_plot();
    assert!(plot.show_grid());
    let flow = plot.handle_key(Key::Char('g')).expect("key");
    assert_eq!(flow, ControlFlow::Continue(()));
    assert!(!plot.show_grid());

    plot.redraw().expect("redraw");
    assert_eq!(plot.window().renderer().last_text_count, 0);
}

#[test]
fn arrow_keys_pan_by_a_tenth_of_the_visible_span() {
    let mut plot = unit_plot();
    assert!(plot.handle_key(Key::Right).expect("right").is_continue());
    assert_abs_diff_eq!(plot.params().x_shift, 24.0, epsilon = 1e-9);
    assert!(plot.handle_key(Key::Left).expect("left").is_continue());
    assert_abs_diff_eq!(plot.params().x_shift, 0.0, epsilon = 1e-9);
    assert!(plot.handle_key(Key::Up).expect("up").is_continue());
    assert_abs_diff_eq!(plot.params().y_shift, 20.0, epsilon = 1e-9);
    assert!(plot.handle_key(Key::Down).expect("down").is_continue());
    assert!(plot.handle_key(Key::Down).expect("down").is_continue());
    assert_abs_diff_eq!(plot.params().y_shift, -20.0, epsilon = 1e-9);
}

#[test]
fn zoom_keys_scale_and_clamp_the_zoom_factor() {
    let mut plot = unit_plot();
    assert!(plot.handle_key(Key::Char('=')).expect("zoom in").is_continue());
    assert_abs_diff_eq!(plot.params().zoom_factor, 0.8, epsilon = 1e-12);
    assert!(plot.handle_key(Key::Char('-')).expect("zoom out").is_continue());
    assert_abs_diff_eq!(plot.params().zoom_factor, 1.0, epsilon = 1e-12);

    for _ in 0..40 {
        assert!(plot.handle_key(Key::Char('=')).expect("zoom in").is_continue());
    }
    assert_eq!(plot.params().zoom_factor, MIN_ZOOM_FACTOR);
}

#[test]
fn zoom_centers_on_sample_nearest_the_cursor() {
    let mut plot = unit_plot();
    plot.window_mut()
        .mouse_mut()
        .on_event(MouseEvent::moved(310, 60));
    plot.handle_mouse().expect("hover");
    plot.zoom(0.5).expect("zoom");

    let at = plot.transform().data_to_device(DataPoint::new(240.0, 200.0));
    assert_abs_diff_eq!(at.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(at.y, 150.0, epsilon = 1e-9);
}

#[test]
fn reset_key_restores_zoom_and_centers_origin() {
    let mut plot = unit_plot();
    assert!(plot.handle_key(Key::Char('=')).expect("zoom in").is_continue());
    assert!(plot.handle_key(Key::Char('0')).expect("reset").is_continue());
    assert_eq!(plot.params().zoom_factor, 1.0);
    let origin = plot.transform().data_to_device(DataPoint::new(0.0, 0.0));
    assert_abs_diff_eq!(origin.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(origin.y, 150.0, epsilon = 1e-9);
}

#[test]
fn quit_and_close_break_the_loop() {
    let mut plot = unit_plot();
    assert!(plot.handle_key(Key::Char('q')).expect("quit").is_break());
    assert!(plot.handle_key(Key::Close).expect("close").is_break());
    assert!(plot.handle_key(Key::Char('x')).expect("unbound").is_continue());
}

#[test]
fn left_click_records_data_coordinate() {
    let mut plot = unit_plot();
    let mut events = ScriptedEvents::new([
        ScriptStep::Mouse(MouseEvent::pressed(MouseButton::Left, 120, 200)),
        ScriptStep::Idle,
        ScriptStep::Key(Key::Char('q')),
    ]);
    plot.display(&mut events).expect("display");

    let click = plot.last_click().expect("click recorded");
    assert_abs_diff_eq!(click.x, 40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(click.y, 50.0, epsilon = 1e-9);
    assert!(plot.window().mouse().pending().is_none());
}

#[test]
fn right_click_centers_on_nearest_sample() {
    let mut plot = unit_plot();
    plot.window_mut()
        .mouse_mut()
        .on_event(MouseEvent::pressed(MouseButton::Right, 310, 60));
    plot.handle_mouse().expect("right click");

    let at = plot.transform().data_to_device(DataPoint::new(240.0, 200.0));
    assert_abs_diff_eq!(at.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(at.y, 150.0, epsilon = 1e-9);
    assert!(plot.last_click().is_none());
}

#[test]
fn hover_keeps_the_move_pending_and_draws_the_shadow() {
    let mut plot = unit_plot();
    plot.redraw().expect("redraw");
    plot.window_mut()
        .mouse_mut()
        .on_event(MouseEvent::moved(100, 100));
    plot.handle_mouse().expect("hover");

    assert!(plot.window().mouse().pending().is_some());
    let texts = &plot.window().frame().texts;
    assert!(
        texts
            .iter()
            .any(|text| text.text.contains("Closest Point 0") || text.text.contains("Closest Point 1"))
    );
}

#[test]
fn style_selects_drawn_decorations() {
    let mut plot = unit_plot();
    assert!(plot.handle_key(Key::Char('g')).expect("grid off").is_continue());

    plot.set_style(PlotStyle::line());
    plot.redraw().expect("redraw");
    assert_eq!(plot.window().renderer().last_line_count, 1);
    assert_eq!(plot.window().renderer().last_circle_count, 0);

    plot.set_style(PlotStyle::stems());
    plot.redraw().expect("redraw");
    assert_eq!(plot.window().renderer().last_line_count, 2);
    assert_eq!(plot.window().renderer().last_circle_count, 2);
}

#[test]
fn empty_plot_displays_and_zooms_around_the_cursor() {
    let mut plot = Plot::new(NullRenderer::default(), Viewport::new(400, 300)).expect("plot");
    assert!(plot.find_closest(0.0, 0.0).is_none());
    plot.zoom(0.5).expect("zoom without samples");
    let mut events = ScriptedEvents::keys([Key::Char('q')]);
    plot.display(&mut events).expect("display");
}
