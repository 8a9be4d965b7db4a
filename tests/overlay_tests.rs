// Tests for letterbox geometry and overlay composition: the contain-fit
// transform, box mapping, noise suppression, label clamping, and the
// class color policy.

use framesight::overlay::{self, BoxStyle, DrawCommand, LABEL_HEIGHT};
use framesight::{AnalysisFrame, BoundingBox, DetectedObject, RenderedRect};

fn detection(class: &str, confidence: f64, bbox: BoundingBox) -> DetectedObject {
    let json = serde_json::json!({
        "class": class,
        "confidence": confidence,
        "bbox": [bbox.x1, bbox.y1, bbox.x2, bbox.y2],
    });
    serde_json::from_value(json).unwrap()
}

fn frame_with(objects: Vec<DetectedObject>) -> AnalysisFrame {
    AnalysisFrame {
        frame_id: None,
        timestamp: 0.0,
        text_analysis: String::new(),
        total_objects: objects.len(),
        detected_objects: objects,
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn contain_fit_wide_video_in_square_container() {
    // 1920x1080 in 800x800: width binds, bars top and bottom
    let rect = RenderedRect::contain(1920.0, 1080.0, 800.0, 800.0);

    assert_close(rect.width, 800.0);
    assert_close(rect.height, 450.0);
    assert_close(rect.offset_x, 0.0);
    assert_close(rect.offset_y, 175.0);
}

#[test]
fn contain_fit_tall_video_in_wide_container() {
    // 1080x1920 in 1600x900: height binds, bars left and right
    let rect = RenderedRect::contain(1080.0, 1920.0, 1600.0, 900.0);

    assert_close(rect.height, 900.0);
    assert_close(rect.width, 900.0 * 1080.0 / 1920.0);
    assert_close(rect.offset_y, 0.0);
    assert_close(rect.offset_x, (1600.0 - rect.width) / 2.0);
}

#[test]
fn contain_fit_matching_aspect_fills_container() {
    let rect = RenderedRect::contain(1920.0, 1080.0, 960.0, 540.0);

    assert_close(rect.width, 960.0);
    assert_close(rect.height, 540.0);
    assert_close(rect.offset_x, 0.0);
    assert_close(rect.offset_y, 0.0);
}

#[test]
fn map_bottom_right_quadrant() {
    let rect = RenderedRect::contain(1920.0, 1080.0, 800.0, 800.0);
    let bbox = BoundingBox::new(960.0, 540.0, 1920.0, 1080.0).unwrap();

    let mapped = rect.map(&bbox);
    assert_close(mapped.x1, 400.0);
    assert_close(mapped.y1, 400.0);
    assert_close(mapped.x2, 800.0);
    assert_close(mapped.y2, 625.0);
}

#[test]
fn compose_suppresses_sub_pixel_noise() {
    let rect = RenderedRect::contain(1920.0, 1080.0, 800.0, 800.0);
    // 8x8 source pixels maps to ~3.3x3.3 on screen, below the 5px floor
    let noise = detection("person", 0.9, BoundingBox::new(0.0, 0.0, 8.0, 8.0).unwrap());
    let keeper = detection(
        "car",
        0.8,
        BoundingBox::new(100.0, 100.0, 400.0, 400.0).unwrap(),
    );

    let scene = overlay::compose(&frame_with(vec![noise, keeper]), &rect, overlay::approx_text_width);

    let boxes: Vec<_> = scene
        .iter()
        .filter(|c| matches!(c, DrawCommand::Box { .. }))
        .collect();
    assert_eq!(boxes.len(), 1, "noise box should be suppressed");
}

#[test]
fn compose_pairs_each_box_with_a_label() {
    let rect = RenderedRect::contain(1920.0, 1080.0, 1920.0, 1080.0);
    let frame = frame_with(vec![detection(
        "person",
        0.87,
        BoundingBox::new(100.0, 200.0, 300.0, 500.0).unwrap(),
    )]);

    let scene = overlay::compose(&frame, &rect, overlay::approx_text_width);
    assert_eq!(scene.len(), 2);

    match &scene[1] {
        DrawCommand::Label { text, x, y, .. } => {
            assert_eq!(text, "person 87%");
            assert_close(*x, 100.0);
            assert_close(*y, 200.0 - LABEL_HEIGHT);
        }
        other => panic!("expected label, got {:?}", other),
    }
}

#[test]
fn label_clamps_at_canvas_top_edge() {
    let rect = RenderedRect::contain(1920.0, 1080.0, 1920.0, 1080.0);
    // Box flush with the top of the video: an unclamped label would sit at
    // negative y and be cut off
    let frame = frame_with(vec![detection(
        "car",
        0.5,
        BoundingBox::new(10.0, 4.0, 200.0, 300.0).unwrap(),
    )]);

    let scene = overlay::compose(&frame, &rect, overlay::approx_text_width);
    match &scene[1] {
        DrawCommand::Label { y, .. } => assert_close(*y, 0.0),
        other => panic!("expected label, got {:?}", other),
    }
}

#[test]
fn label_width_follows_measured_text() {
    let rect = RenderedRect::contain(100.0, 100.0, 100.0, 100.0);
    let frame = frame_with(vec![detection(
        "truck",
        1.0,
        BoundingBox::new(10.0, 50.0, 90.0, 90.0).unwrap(),
    )]);

    let scene = overlay::compose(&frame, &rect, |_text| 42.0);
    match &scene[1] {
        DrawCommand::Label { width, .. } => {
            assert_close(*width, 42.0 + 2.0 * overlay::LABEL_PADDING)
        }
        other => panic!("expected label, got {:?}", other),
    }
}

#[test]
fn class_color_policy() {
    for class in ["person", "car", "motorcycle", "bus", "truck"] {
        assert_eq!(BoxStyle::for_class(class), BoxStyle::Critical, "{class}");
    }
    for class in ["bicycle", "traffic light", "stop sign"] {
        assert_eq!(BoxStyle::for_class(class), BoxStyle::Navigation, "{class}");
    }
    for class in ["dog", "chair", "kite"] {
        assert_eq!(BoxStyle::for_class(class), BoxStyle::Default, "{class}");
    }
}
