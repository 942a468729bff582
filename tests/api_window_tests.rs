use figure_rs::api::{FontSpec, TextAnnotation, Window};
use figure_rs::core::{ImageBuffer, Viewport};
use figure_rs::interaction::{MouseButton, MouseEvent};
use figure_rs::render::{Color, NullRenderer};

fn window(width: u32, height: u32) -> Window<NullRenderer> {
    Window::new("window", NullRenderer::default(), Viewport::new(width, height)).expect("window")
}

fn numbered_image(width: u32, height: u32) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height).expect("image");
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            image.set_pixel(x, y, [x as u8, y as u8, 1]);
        }
    }
    image
}

#[test]
fn negative_thickness_fills_shapes() {
    let mut window = window(50, 50);
    window.set_thickness(-1);
    window.draw_rectangle(1.0, 1.0, 10.0, 10.0);
    window.draw_circle(20.0, 20.0, 5.0);
    window.set_thickness(3);
    window.draw_rectangle(1.0, 1.0, 10.0, 10.0);

    let frame = window.frame();
    assert!(frame.rects[0].filled);
    assert!(frame.circles[0].filled);
    assert!(!frame.rects[1].filled);
    assert_eq!(frame.rects[1].stroke_width, 3.0);
}

#[test]
fn polygon_is_closed() {
    let mut window = window(50, 50);
    window.draw_polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    assert_eq!(window.frame().lines.len(), 3);
    let last = window.frame().lines[2];
    assert_eq!((last.x2, last.y2), (0.0, 0.0));
    window.draw_polygon(&[]);
    assert_eq!(window.frame().lines.len(), 3);
}

#[test]
fn text_uses_brush_color_and_font_scale() {
    let mut window = window(50, 50);
    window.set_color_rgb(0, 255, 0);
    window.set_font(FontSpec {
        scale: 2.0,
        thickness: 1.0,
    });
    window.write(3.0, 4.0, "ok");
    window.write(3.0, 4.0, "");
    window.write_number(3.0, 20.0, 12.3456, 2);

    let texts = &window.frame().texts;
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].color, Color::GREEN);
    assert_eq!(texts[0].font_size_px, 24.0);
    assert_eq!(texts[1].text, "12.35");
}

#[test]
fn annotations_keep_their_own_style() {
    let mut window = window(50, 50);
    let annotation = TextAnnotation {
        color: Color::YELLOW,
        font_size: 0.5,
        ..TextAnnotation::new(2, 3, "tag")
    };
    window.write_annotations(&[annotation, TextAnnotation::new(1, 1, "")]);

    let texts = &window.frame().texts;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].color, Color::YELLOW);
    assert_eq!(texts[0].font_size_px, 6.0);
    assert_eq!(window.brush().color, Color::RED);
}

#[test]
fn display_region_is_copied_from_another_window() {
    let mut source = window(32, 32);
    source.set_image(&numbered_image(32, 32));
    source.draw_line(0.0, 12.0, 31.0, 12.0);
    let mut target = window(9, 9);
    target
        .set_display_from(&source, 10, 12, 9)
        .expect("region copy");

    let region = target.frame().background.as_ref().expect("background");
    assert_eq!(region.pixel(4, 4), Some([10, 12, 1]));
    assert_eq!(region.pixel(0, 0), Some([6, 8, 1]));
    assert!(target.frame().lines.is_empty());

    target.reset_display();
    let restored = target.frame().background.as_ref().expect("background");
    assert_eq!(restored.pixel(4, 4), Some([0, 0, 0]));

    target
        .set_original_from(&source, 10, 12, 9)
        .expect("original copy");
    assert_eq!(target.original().pixel(4, 4), Some([10, 12, 1]));
}

#[test]
fn zoom_to_point_crops_around_the_point() {
    let mut window = window(32, 32);
    window.set_image(&numbered_image(32, 32));
    window.zoom_to_point(20, 20, 8).expect("zoom");
    let region = window.frame().background.as_ref().expect("background");
    assert_eq!(region.width(), 8);
    assert_eq!(region.pixel(0, 0), Some([16, 16, 1]));

    window.reset_display();
    window.zoom_to_point(1, 1, 8).expect("zoom at corner");
    let region = window.frame().background.as_ref().expect("background");
    assert_eq!(region.pixel(0, 0), Some([0, 0, 1]));
}

#[test]
fn zoom_to_point_far_outside_the_image_is_black() {
    let mut window = window(32, 32);
    window.set_image(&numbered_image(32, 32));
    window.zoom_to_point(i32::MAX, 0, 8).expect("zoom at limit");
    let region = window.frame().background.as_ref().expect("background");
    assert_eq!(region.width(), 8);
    assert!(region.as_raw().iter().all(|&byte| byte == 0));
}

#[test]
fn mouse_state_is_per_window() {
    let mut first = window(20, 20);
    let second = window(20, 20);
    first
        .mouse_mut()
        .on_event(MouseEvent::pressed(MouseButton::Left, 4, 5));

    assert_eq!(first.mouse_click(MouseButton::Left), Some((4, 5)));
    assert_eq!(first.mouse_click(MouseButton::Right), None);
    assert_eq!(second.mouse_click(MouseButton::Left), None);

    first.reset_mouse();
    assert_eq!(first.mouse_click(MouseButton::Left), None);
}

#[test]
fn show_and_placement_reach_the_renderer() {
    let mut window = window(20, 10);
    window.draw_line(0.0, 0.0, 5.0, 5.0);
    window.show().expect("show");
    window.resize(60, 30).expect("resize");
    window.move_to(100, 0).expect("move");

    let renderer = window.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_line_count, 1);
    let placement = renderer.last_placement.expect("placement");
    assert_eq!(
        (placement.x, placement.y, placement.width, placement.height),
        (100, 0, 60, 30)
    );
    assert_eq!(window.size(), Viewport::new(20, 10));
}
