use std::sync::Arc;
use tokio::sync::Mutex;

use crate::analysis::AnalysisFrame;
use crate::events::{PlayerEvent, PlayerEventSender};
use crate::overlay::{self, DrawCommand, RenderedRect};
use crate::store::ResultStore;
use crate::sync::{Selection, Synchronizer};

/// The resolve-and-recompose plumbing shared by live and review sessions
///
/// Owns the result store, the synchronizer cursor, the current letterbox
/// geometry, and the last composed overlay scene. The overlay is recomputed
/// only when the current frame changes or the container is resized;
/// redundant re-selection leaves the scene untouched.
pub struct Playback {
    store: Arc<Mutex<ResultStore>>,
    synchronizer: Mutex<Synchronizer>,
    geometry: Mutex<Option<RenderedRect>>,
    scene: Mutex<Vec<DrawCommand>>,
    measure: Box<dyn Fn(&str) -> f64 + Send + Sync>,
    events: PlayerEventSender,
}

impl Playback {
    pub fn new(tolerance: f64, events: PlayerEventSender) -> Self {
        Self {
            store: Arc::new(Mutex::new(ResultStore::new())),
            synchronizer: Mutex::new(Synchronizer::new(tolerance)),
            geometry: Mutex::new(None),
            scene: Mutex::new(Vec::new()),
            measure: Box::new(overlay::approx_text_width),
            events,
        }
    }

    /// Use the drawing surface's own text measurement for label sizing
    pub fn with_text_measure(
        mut self,
        measure: impl Fn(&str) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Shared handle to the result store (the sampler appends through this)
    pub fn store(&self) -> Arc<Mutex<ResultStore>> {
        Arc::clone(&self.store)
    }

    /// The canonical event sender for this session
    pub fn events(&self) -> PlayerEventSender {
        self.events.clone()
    }

    /// Resolve a playback time update against the store
    ///
    /// Emits `FrameChanged`/`SelectionCleared` and recomposes the overlay
    /// only when the selection actually changes.
    pub async fn handle_time_update(&self, t: f64) -> Selection {
        let store = self.store.lock().await;
        let mut synchronizer = self.synchronizer.lock().await;
        let selection = synchronizer.resolve(store.frames(), t);

        match selection {
            Selection::Changed(index) => {
                let frame = store.frames()[index].clone();
                drop(synchronizer);
                drop(store);
                self.recompose(Some(&frame)).await;
                let _ = self.events.send(PlayerEvent::FrameChanged(index));
            }
            Selection::Cleared => {
                drop(synchronizer);
                drop(store);
                self.recompose(None).await;
                let _ = self.events.send(PlayerEvent::SelectionCleared);
            }
            Selection::Unchanged => {}
        }

        selection
    }

    /// Recompute geometry for a new container size and redraw the current
    /// frame against it
    pub async fn handle_resize(
        &self,
        video_w: f64,
        video_h: f64,
        container_w: f64,
        container_h: f64,
    ) {
        {
            let mut geometry = self.geometry.lock().await;
            *geometry = Some(RenderedRect::contain(
                video_w,
                video_h,
                container_w,
                container_h,
            ));
        }

        let frame = self.current_frame().await;
        self.recompose(frame.as_ref()).await;
    }

    /// The last composed overlay scene
    pub async fn scene(&self) -> Vec<DrawCommand> {
        self.scene.lock().await.clone()
    }

    pub async fn current_index(&self) -> Option<usize> {
        self.synchronizer.lock().await.current_index()
    }

    pub async fn current_frame(&self) -> Option<AnalysisFrame> {
        let index = self.current_index().await?;
        let store = self.store.lock().await;
        store.frames().get(index).cloned()
    }

    /// Drop the selection and blank the overlay
    pub async fn reset(&self) {
        self.synchronizer.lock().await.reset();
        self.scene.lock().await.clear();
    }

    async fn recompose(&self, frame: Option<&AnalysisFrame>) {
        let geometry = *self.geometry.lock().await;
        let mut scene = self.scene.lock().await;
        *scene = match (frame, geometry) {
            (Some(frame), Some(geometry)) => overlay::compose(frame, &geometry, &self.measure),
            _ => Vec::new(),
        };
    }
}
