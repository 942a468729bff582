use std::time::Duration;

use figure_rs::FigureError;
use figure_rs::api::{ImageInspector, InspectorConfig, TextAnnotation};
use figure_rs::core::{ImageBuffer, Viewport};
use figure_rs::interaction::{Key, MouseButton, MouseEvent, ScriptStep, ScriptedEvents};
use figure_rs::render::{NullRenderer, SurfaceFactory};

/// Surface factory remembering which windows were opened.
#[derive(Default)]
struct RecordingSurfaces {
    opened: Vec<(String, Viewport)>,
}

impl SurfaceFactory for RecordingSurfaces {
    type Renderer = NullRenderer;

    fn open(&mut self, name: &str, size: Viewport) -> Result<NullRenderer, FigureError> {
        self.opened.push((name.to_owned(), size));
        Ok(NullRenderer::default())
    }
}

fn inspector() -> ImageInspector<RecordingSurfaces> {
    let image = ImageBuffer::filled(40, 20, [30, 60, 90]).expect("image");
    ImageInspector::new(image, RecordingSurfaces::default(), InspectorConfig::default())
        .expect("inspector")
}

#[test]
fn main_window_keeps_image_aspect() {
    let mut inspector = inspector();
    assert_eq!(inspector.window_size(), Viewport::new(700, 350));
    inspector.create().expect("create");

    let window = inspector.main_window().expect("main window");
    assert_eq!(window.size(), Viewport::new(40, 20));
    let placement = window.renderer().last_placement.expect("placement");
    assert_eq!((placement.x, placement.y), (0, 0));
    assert_eq!((placement.width, placement.height), (700, 350));
}

#[test]
fn overlays_before_create_fail() {
    let mut inspector = inspector();
    let err = inspector
        .draw_mouse_shadow()
        .expect_err("no window yet");
    assert!(matches!(err, FigureError::Backend(_)));
}

#[test]
fn hover_moves_cursor_and_magnifier_follows() {
    let mut inspector = inspector();
    let mut events = ScriptedEvents::new([
        ScriptStep::Mouse(MouseEvent::moved(10, 5)),
        ScriptStep::Idle,
        ScriptStep::Key(Key::Char('z')),
        ScriptStep::Idle,
        ScriptStep::Key(Key::Char('q')),
    ]);
    inspector.run(&mut events).expect("run");

    assert_eq!(inspector.cursor(), (10, 5));
    let zoom = inspector.magnifier().expect("magnifier open");
    assert_eq!(zoom.size(), Viewport::new(101, 101));
    assert_eq!(zoom.frame().rects.len(), 1);
    let region = zoom.frame().background.as_ref().expect("region");
    assert_eq!(region.pixel(50, 50), Some([30, 60, 90]));
    assert_eq!(region.pixel(0, 0), Some([0, 0, 0]));

    let placement = zoom.renderer().last_placement.expect("placement");
    assert_eq!(
        (placement.x, placement.y, placement.width, placement.height),
        (700, 0, 303, 303)
    );

    // Help lines, the coordinate message and the shadow ring.
    let main = inspector.main_window().expect("main").renderer();
    assert_eq!(main.last_text_count, 6);
    assert_eq!(main.last_circle_count, 1);
}

#[test]
fn magnifier_toggles_closed() {
    let mut inspector = inspector();
    inspector.create().expect("create");
    inspector.toggle_magnifier().expect("open");
    assert!(inspector.magnifier().is_some());
    inspector.toggle_magnifier().expect("close");
    assert!(inspector.magnifier().is_none());
}

#[test]
fn left_click_is_recorded() {
    let mut inspector = inspector();
    let mut events = ScriptedEvents::new([
        ScriptStep::Mouse(MouseEvent::pressed(MouseButton::Left, 12, 7)),
        ScriptStep::Idle,
        ScriptStep::Key(Key::Char('q')),
    ]);
    inspector.run(&mut events).expect("run");
    assert_eq!(inspector.last_click(), Some((12, 7)));
    assert_eq!(inspector.cursor(), (12, 7));
}

#[test]
fn toggles_flip_overlay_flags() {
    let mut inspector = inspector();
    inspector.create().expect("create");
    for key in ['b', 'h', 'm'] {
        assert!(inspector.handle_key(Key::Char(key)).expect("key").is_continue());
    }
    assert!(!inspector.hover());
    assert!(!inspector.help());
    assert!(!inspector.shadow());
    assert!(inspector.handle_key(Key::Char('q')).expect("quit").is_break());
}

#[test]
fn disabled_hover_ignores_moves() {
    let mut inspector = inspector();
    let mut events = ScriptedEvents::new([
        ScriptStep::Key(Key::Char('b')),
        ScriptStep::Mouse(MouseEvent::moved(10, 5)),
        ScriptStep::Idle,
        ScriptStep::Key(Key::Char('q')),
    ]);
    inspector.run(&mut events).expect("run");
    assert_eq!(inspector.cursor(), (0, 0));
}

#[test]
fn help_lists_bindings_and_annotations_are_drawn() {
    let mut inspector = inspector();
    inspector.set_annotations(vec![TextAnnotation::new(5, 5, "ROI")]);
    let mut events = ScriptedEvents::new([ScriptStep::Idle, ScriptStep::Key(Key::Char('q'))]);
    inspector.run(&mut events).expect("run");

    let help = inspector.bindings().help_lines();
    assert!(help.contains(&"q: quit".to_owned()));
    assert!(help.contains(&"z: toggle zoom window".to_owned()));
    let main = inspector.main_window().expect("main").renderer();
    assert_eq!(main.last_text_count, help.len() + 2);
}

#[test]
fn display_only_returns_first_key_or_times_out() {
    let mut inspector = inspector();
    let mut events = ScriptedEvents::new([ScriptStep::Idle, ScriptStep::Key(Key::Char('x'))]);
    let key = inspector.display_only(&mut events, None).expect("display");
    assert_eq!(key, Some(Key::Char('x')));

    let mut idle = ScriptedEvents::new([ScriptStep::Idle]);
    let key = inspector
        .display_only(&mut idle, Some(Duration::from_millis(20)))
        .expect("display");
    assert_eq!(key, None);
}
