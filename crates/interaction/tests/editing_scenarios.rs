//! End-to-end editing scenarios driven through `EditorState::apply`.

use cutline_edit_model::crop::{CropRect, MIN_CROP_SIZE};
use cutline_edit_model::filters::FilterParam;
use cutline_interaction::{parse_script, EditorEvent, EditorState, PlayerCommand, TimelineDrag};
use proptest::prelude::*;

fn editor_with(duration: f64, width: u32, height: u32) -> EditorState {
    let mut editor = EditorState::default();
    editor.apply(EditorEvent::LoadMedia {
        duration_secs: duration,
        width,
        height,
    });
    editor
}

#[test]
fn click_at_quarter_width_seeks_to_quarter_duration() {
    let mut editor = editor_with(100.0, 1920, 1080);
    let width = 640.0;
    let commands = editor.apply(EditorEvent::TimelinePointerDown {
        x: 0.25 * width,
        width,
    });
    assert_eq!(commands, vec![PlayerCommand::Seek(25.0)]);
    assert_eq!(editor.playback().current_time, 25.0);
    assert_eq!(editor.timeline().drag(), TimelineDrag::Idle);
}

#[test]
fn dragging_end_before_start_keeps_minimum_gap() {
    let mut editor = editor_with(100.0, 1920, 1080);
    let width = 1000.0;

    // Move start to 10s by grabbing the start handle at x = 0.
    editor.apply(EditorEvent::TimelinePointerDown { x: 2.0, width });
    editor.apply(EditorEvent::TimelinePointerMove { x: 100.0, width });
    editor.apply(EditorEvent::TimelinePointerUp);
    assert!((editor.trim().start - 10.0).abs() < 1e-9);

    // Grab the end handle at x = 1000 and drag it to 5s.
    editor.apply(EditorEvent::TimelinePointerDown { x: 995.0, width });
    assert_eq!(editor.timeline().drag(), TimelineDrag::DraggingEnd);
    editor.apply(EditorEvent::TimelinePointerMove { x: 50.0, width });
    assert!((editor.trim().end - 10.1).abs() < 1e-9);
    editor.apply(EditorEvent::TimelinePointerLeave);
    assert_eq!(editor.timeline().drag(), TimelineDrag::Idle);
}

#[test]
fn trim_handles_on_very_short_clip_stay_inside_clip() {
    let mut editor = editor_with(0.05, 640, 360);
    let width = 1000.0;

    editor.apply(EditorEvent::TimelinePointerDown { x: 0.0, width });
    editor.apply(EditorEvent::TimelinePointerMove { x: 0.0, width });
    editor.apply(EditorEvent::TimelinePointerUp);
    assert!(editor.trim().start >= 0.0);

    editor.apply(EditorEvent::TimelinePointerDown { x: 1000.0, width });
    editor.apply(EditorEvent::TimelinePointerMove { x: 1000.0, width });
    editor.apply(EditorEvent::TimelinePointerUp);
    assert!(editor.trim().start >= 0.0);
    assert!(editor.trim().end <= 0.05);
    assert!(editor.trim().is_exportable());
}

#[test]
fn crop_drag_then_undo_restores_previous_rect() {
    let mut editor = editor_with(30.0, 1920, 1080);
    let (cw, ch) = (960.0, 540.0);

    // Bottom-right handle of the full-frame crop sits at the canvas corner.
    editor.apply(EditorEvent::CropPointerDown {
        x: 958.0,
        y: 538.0,
        canvas_width: cw,
        canvas_height: ch,
    });
    editor.apply(EditorEvent::CropPointerMove {
        x: 480.0,
        y: 270.0,
        canvas_width: cw,
        canvas_height: ch,
    });
    editor.apply(EditorEvent::CropPointerUp);
    assert_eq!(*editor.crop(), CropRect::new(0.0, 0.0, 960.0, 540.0));
    // Seed entry plus the snapshot taken when the drag began.
    assert_eq!(editor.crop_history().len(), 2);

    editor.apply(EditorEvent::KeyDown {
        key: "z".to_string(),
        ctrl: true,
        meta: false,
    });
    assert_eq!(*editor.crop(), CropRect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(editor.crop_history().len(), 1);
}

#[test]
fn dragging_past_opposite_corner_stops_at_minimum_size() {
    let mut editor = editor_with(30.0, 1920, 1080);
    let (cw, ch) = (1920.0, 1080.0);

    editor.apply(EditorEvent::CropPointerDown {
        x: 0.0,
        y: 0.0,
        canvas_width: cw,
        canvas_height: ch,
    });
    editor.apply(EditorEvent::CropPointerMove {
        x: 5000.0,
        y: 5000.0,
        canvas_width: cw,
        canvas_height: ch,
    });
    let crop = *editor.crop();
    assert_eq!(crop.width, MIN_CROP_SIZE);
    assert_eq!(crop.height, MIN_CROP_SIZE);
    assert_eq!(crop.right(), 1920.0);
    assert_eq!(crop.bottom(), 1080.0);
}

#[test]
fn pointer_input_before_media_is_ignored() {
    let mut editor = EditorState::default();
    let commands = editor.apply(EditorEvent::TimelinePointerDown { x: 10.0, width: 500.0 });
    assert!(commands.is_empty());
    editor.apply(EditorEvent::CropPointerDown {
        x: 0.0,
        y: 0.0,
        canvas_width: 640.0,
        canvas_height: 360.0,
    });
    assert!(editor.crop_history().is_empty());
}

#[test]
fn scripted_session_replays() {
    let script = r#"
# one clip, one filter, one volume change
{"type":"load_media","duration_secs":42.0,"width":1280,"height":720}
{"type":"set_filter","param":"brightness","value":0.2}
{"type":"set_filter","param":"blur","value":3}
{"type":"set_volume","volume":0}
{"type":"toggle_play"}
"#;
    let mut editor = EditorState::default();
    let mut commands = Vec::new();
    for event in parse_script(script).unwrap() {
        commands.extend(editor.apply(event));
    }
    assert_eq!(
        editor.filters().to_export_filter_graph().as_deref(),
        Some("eq=brightness=0.2,boxblur=3")
    );
    assert!(editor.filters().is_active(FilterParam::Blur));
    assert!(editor.playback().muted);
    assert!(editor.playback().playing);
    assert_eq!(
        commands,
        vec![
            PlayerCommand::SetVolume(0.0),
            PlayerCommand::SetMuted(true),
            PlayerCommand::Play,
        ]
    );
}

proptest! {
    #[test]
    fn undo_after_any_drag_restores_snapshot_exactly(
        corner_x in prop::sample::select(vec![0.0f64, 1920.0]),
        corner_y in prop::sample::select(vec![0.0f64, 1080.0]),
        to_x in -200.0f64..2200.0,
        to_y in -200.0f64..1300.0,
    ) {
        let mut editor = editor_with(10.0, 1920, 1080);
        let before = *editor.crop();
        editor.apply(EditorEvent::CropPointerDown {
            x: corner_x,
            y: corner_y,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
        });
        editor.apply(EditorEvent::CropPointerMove {
            x: to_x,
            y: to_y,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
        });
        editor.apply(EditorEvent::CropPointerUp);
        editor.apply(EditorEvent::UndoCrop);
        prop_assert_eq!(*editor.crop(), before);
    }
}
