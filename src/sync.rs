use crate::analysis::AnalysisFrame;

/// Default tolerance window: half the 500 ms sampling period
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Entry minimizing |timestamp - t|, accepted only when that minimum delta is
/// strictly below `tolerance`. Equal deltas resolve to the earlier timestamp.
pub fn nearest_to(frames: &[AnalysisFrame], t: f64, tolerance: f64) -> Option<(usize, &AnalysisFrame)> {
    let mut best: Option<(usize, f64)> = None;

    for (i, frame) in frames.iter().enumerate() {
        let delta = (frame.timestamp - t).abs();
        // Strict improvement only: on a tie the earlier (first-seen) frame wins
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((i, delta)),
        }
    }

    best.filter(|(_, delta)| *delta < tolerance)
        .map(|(i, _)| (i, &frames[i]))
}

/// Outcome of resolving a playback time against the frame log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Same entry as before; consumers must not redraw
    Unchanged,
    /// A different entry became current
    Changed(usize),
    /// No entry within tolerance; overlay and text go blank
    Cleared,
}

/// Maps a playback timestamp to the best-matching analysis frame
///
/// Keeps the current selection so that redundant re-selection is a no-op:
/// only `Changed` and `Cleared` trigger overlay recompute and index
/// notifications.
#[derive(Debug)]
pub struct Synchronizer {
    tolerance: f64,
    current: Option<usize>,
}

impl Synchronizer {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            current: None,
        }
    }

    /// Resolve the current playback time against the frame log
    pub fn resolve(&mut self, frames: &[AnalysisFrame], t: f64) -> Selection {
        match nearest_to(frames, t, self.tolerance) {
            Some((index, _)) => {
                if self.current == Some(index) {
                    Selection::Unchanged
                } else {
                    self.current = Some(index);
                    Selection::Changed(index)
                }
            }
            None => {
                if self.current.take().is_some() {
                    Selection::Cleared
                } else {
                    Selection::Unchanged
                }
            }
        }
    }

    /// Index of the current entry, if one is selected
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
