// Tests for validated deserialization at the wire boundary: malformed
// payloads are rejected before they can reach the geometry transform.

use framesight::{AnalysisFrame, BoundingBox, DetectedObject, ProcessingState, ProcessingStatus, SessionData};

#[test]
fn bbox_rejects_inverted_corners() {
    assert!(BoundingBox::new(100.0, 50.0, 10.0, 80.0).is_err());
    assert!(BoundingBox::new(10.0, 80.0, 100.0, 50.0).is_err());
    assert!(BoundingBox::new(10.0, 10.0, 10.0, 20.0).is_err()); // zero width
}

#[test]
fn bbox_rejects_non_finite_values() {
    assert!(BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0).is_err());
    assert!(BoundingBox::new(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    assert!(BoundingBox::new(-5.0, 0.0, 10.0, 10.0).is_err());
}

#[test]
fn detected_object_parses_wire_format() {
    let json = r#"{"class": "person", "confidence": 0.91, "bbox": [10.0, 20.0, 110.0, 220.0]}"#;
    let object: DetectedObject = serde_json::from_str(json).unwrap();

    assert_eq!(object.class, "person");
    assert_eq!(object.bbox.width(), 100.0);
    assert_eq!(object.bbox.height(), 200.0);
}

#[test]
fn detected_object_rejects_bad_confidence() {
    let json = r#"{"class": "person", "confidence": 1.5, "bbox": [0.0, 0.0, 1.0, 1.0]}"#;
    assert!(serde_json::from_str::<DetectedObject>(json).is_err());
}

#[test]
fn detected_object_rejects_malformed_bbox() {
    let json = r#"{"class": "car", "confidence": 0.5, "bbox": [50.0, 0.0, 10.0, 1.0]}"#;
    assert!(serde_json::from_str::<DetectedObject>(json).is_err());
}

#[test]
fn analysis_frame_accepts_live_field_names() {
    // The live endpoint calls the text "scene_description"
    let json = r#"{
        "timestamp": 3.5,
        "scene_description": "Street scene with 2 people",
        "total_objects": 2,
        "detected_objects": []
    }"#;
    let frame: AnalysisFrame = serde_json::from_str(json).unwrap();

    assert_eq!(frame.text_analysis, "Street scene with 2 people");
    assert_eq!(frame.total_objects, 2);
    assert_eq!(frame.frame_id, None);
}

#[test]
fn analysis_frame_rejects_negative_timestamp() {
    let json = r#"{"timestamp": -1.0, "text_analysis": "", "detected_objects": []}"#;
    assert!(serde_json::from_str::<AnalysisFrame>(json).is_err());
}

#[test]
fn analysis_frame_defaults_count_to_detections() {
    let json = r#"{
        "timestamp": 1.0,
        "text_analysis": "x",
        "detected_objects": [
            {"class": "dog", "confidence": 0.6, "bbox": [0.0, 0.0, 10.0, 10.0]}
        ]
    }"#;
    let frame: AnalysisFrame = serde_json::from_str(json).unwrap();
    assert_eq!(frame.total_objects, 1);
}

#[test]
fn time_formatted_is_minutes_seconds() {
    let json = r#"{"timestamp": 65.4, "text_analysis": "", "detected_objects": []}"#;
    let frame: AnalysisFrame = serde_json::from_str(json).unwrap();
    assert_eq!(frame.time_formatted(), "01:05");
}

#[test]
fn session_data_accepts_backend_result_envelope() {
    // The bulk results endpoint wraps frames as "results" under "video_name"
    let json = r#"{
        "video_name": "ride-01",
        "total_frames": 2,
        "results": [
            {"frame_id": 0, "timestamp": 0.0, "text_analysis": "a", "detected_objects": []},
            {"frame_id": 1, "timestamp": 0.5, "text_analysis": "b", "detected_objects": []}
        ]
    }"#;
    let data: SessionData = serde_json::from_str(json).unwrap();

    assert_eq!(data.video_id, "ride-01");
    assert_eq!(data.frames.len(), 2);
    assert_eq!(data.frames[1].frame_id, Some(1));
}

#[test]
fn processing_status_round_trips_states() {
    let json = r#"{
        "video_id": "abc",
        "filename": "ride.mp4",
        "status": "analyzing",
        "progress": 45.0,
        "current_step": "Analyzing frame 9/20 with AI...",
        "total_frames": 20,
        "processed_frames": 9,
        "elapsed_time": "0:00:12"
    }"#;
    let status: ProcessingStatus = serde_json::from_str(json).unwrap();

    assert_eq!(status.state, ProcessingState::Analyzing);
    assert!(!status.state.is_terminal());
    assert_eq!(status.error_message, None);

    assert!(ProcessingState::Complete.is_terminal());
    assert!(ProcessingState::Error.is_terminal());
    assert!(!ProcessingState::Uploaded.is_terminal());
}
