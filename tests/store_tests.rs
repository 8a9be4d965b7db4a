// Tests for the append-only result store: ordering enforcement, atomic
// bulk loading, and nearest-frame lookup.

use framesight::{AnalysisFrame, ResultStore, StoreError};

fn frame(timestamp: f64) -> AnalysisFrame {
    AnalysisFrame {
        frame_id: None,
        timestamp,
        text_analysis: String::new(),
        detected_objects: Vec::new(),
        total_objects: 0,
    }
}

fn batch_frame(frame_id: u64, timestamp: f64) -> AnalysisFrame {
    AnalysisFrame {
        frame_id: Some(frame_id),
        ..frame(timestamp)
    }
}

#[test]
fn append_keeps_non_decreasing_order() {
    let mut store = ResultStore::new();
    store.append(frame(0.0)).unwrap();
    store.append(frame(0.5)).unwrap();
    store.append(frame(0.5)).unwrap(); // equal timestamps are fine
    store.append(frame(1.0)).unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.latest().unwrap().timestamp, 1.0);
}

#[test]
fn append_rejects_out_of_order_frame() {
    let mut store = ResultStore::new();
    store.append(frame(2.0)).unwrap();

    let err = store.append(frame(1.0)).unwrap_err();
    assert!(matches!(err, StoreError::OutOfOrder { .. }));

    // The offending frame was dropped, not inserted
    assert_eq!(store.len(), 1);
    assert_eq!(store.latest().unwrap().timestamp, 2.0);
}

#[test]
fn append_tolerates_jitter_within_epsilon() {
    let mut store = ResultStore::new();
    store.append(frame(1.0)).unwrap();
    // Half a millisecond behind: float rounding, not reordering
    store.append(frame(0.9995)).unwrap();

    assert_eq!(store.len(), 2);
}

#[test]
fn bulk_load_replaces_contents() {
    let mut store = ResultStore::new();
    store.append(frame(9.0)).unwrap();

    let batch = vec![
        batch_frame(0, 0.0),
        batch_frame(1, 0.5),
        batch_frame(2, 1.0),
    ];
    store.bulk_load(batch).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.frames()[0].timestamp, 0.0);
}

#[test]
fn bulk_load_rejects_unsorted_batch_atomically() {
    let mut store = ResultStore::new();
    store.append(frame(5.0)).unwrap();

    let batch = vec![batch_frame(0, 0.0), batch_frame(1, 2.0), batch_frame(2, 1.0)];
    let err = store.bulk_load(batch).unwrap_err();
    assert!(matches!(err, StoreError::UnsortedBatch(2)));

    // A bad batch leaves the store untouched
    assert_eq!(store.len(), 1);
    assert_eq!(store.latest().unwrap().timestamp, 5.0);
}

#[test]
fn bulk_load_rejects_non_monotonic_frame_ids() {
    let mut store = ResultStore::new();

    let batch = vec![batch_frame(0, 0.0), batch_frame(0, 0.5)];
    let err = store.bulk_load(batch).unwrap_err();
    assert!(matches!(err, StoreError::NonMonotonicFrameId(1)));
    assert!(store.is_empty());
}

#[test]
fn nearest_to_picks_minimum_delta() {
    let mut store = ResultStore::new();
    for t in [0.0, 0.5, 1.0, 1.5] {
        store.append(frame(t)).unwrap();
    }

    let (index, matched) = store.nearest_to(0.6, 0.25).unwrap();
    assert_eq!(index, 1);
    assert_eq!(matched.timestamp, 0.5);
}

#[test]
fn nearest_to_boundary_is_exact() {
    let mut store = ResultStore::new();
    for t in [0.0, 0.5, 1.0, 1.5] {
        store.append(frame(t)).unwrap();
    }

    // Midpoint between 0.5 and 1.0: delta to each is exactly the
    // tolerance, and the window is strictly below it
    assert!(store.nearest_to(0.75, 0.25).is_none());

    // Just inside the window on either side matches
    let (index, _) = store.nearest_to(0.74, 0.25).unwrap();
    assert_eq!(index, 1);
    let (index, _) = store.nearest_to(0.76, 0.25).unwrap();
    assert_eq!(index, 2);
}

#[test]
fn nearest_to_ties_break_to_earlier_timestamp() {
    let mut store = ResultStore::new();
    store.append(frame(0.0)).unwrap();
    store.append(frame(1.0)).unwrap();

    // Equidistant from both; the earlier frame wins
    let (index, matched) = store.nearest_to(0.5, 0.6).unwrap();
    assert_eq!(index, 0);
    assert_eq!(matched.timestamp, 0.0);
}

#[test]
fn nearest_to_empty_store_is_none() {
    let store = ResultStore::new();
    assert!(store.nearest_to(0.0, 1.0).is_none());
}
