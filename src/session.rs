use crate::audio::buffer::SampleBuffer;
use crate::audio::slice::{self, Segment};
use crate::audio::split;
use crate::error::EngineError;

/// Stable identifier for a split point. Removal goes through ids, never
/// through float equality on timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplitId(u64);

/// A single cut position on an audio asset's timeline.
#[derive(Clone, Copy, Debug)]
pub struct SplitPoint {
    pub id: SplitId,
    pub time_secs: f64,
}

/// A decoded audio asset and its editable split list.
///
/// The list stays strictly ascending with every time in `(0, duration)`.
/// Mutation takes `&mut self`; a single active editor is assumed.
pub struct AudioAsset {
    buffer: SampleBuffer,
    splits: Vec<SplitPoint>,
    next_id: u64,
}

impl AudioAsset {
    pub fn new(buffer: SampleBuffer) -> Self {
        Self {
            buffer,
            splits: Vec::new(),
            next_id: 0,
        }
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    #[allow(dead_code)]
    pub fn splits(&self) -> &[SplitPoint] {
        &self.splits
    }

    pub fn split_times(&self) -> Vec<f64> {
        self.splits.iter().map(|s| s.time_secs).collect()
    }

    fn issue_id(&mut self) -> SplitId {
        let id = SplitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the split list with fresh auto-detections. Any previously
    /// produced segments are invalid once this returns.
    pub fn auto_split(&mut self, max_segment_secs: f64) -> Result<usize, EngineError> {
        let times = split::find_splits(&self.buffer, max_segment_secs)?;
        self.splits.clear();
        for time_secs in times {
            let id = self.issue_id();
            self.splits.push(SplitPoint { id, time_secs });
        }
        Ok(self.splits.len())
    }

    /// Insert a manual split point, keeping the list strictly ascending.
    pub fn add_split(&mut self, time_secs: f64) -> Result<SplitId, EngineError> {
        let duration = self.buffer.duration_secs();
        if time_secs <= 0.0 || time_secs >= duration {
            return Err(EngineError::InvalidRange(format!(
                "split at {time_secs:.3}s falls outside (0, {duration:.3})"
            )));
        }
        if self.splits.iter().any(|s| s.time_secs == time_secs) {
            return Err(EngineError::InvalidRange(format!(
                "split at {time_secs:.3}s already exists"
            )));
        }
        let id = self.issue_id();
        let at = self.splits.partition_point(|s| s.time_secs < time_secs);
        self.splits.insert(at, SplitPoint { id, time_secs });
        Ok(id)
    }

    /// Remove a split point by id. Returns whether anything was removed.
    #[allow(dead_code)]
    pub fn remove_split(&mut self, id: SplitId) -> bool {
        let before = self.splits.len();
        self.splits.retain(|s| s.id != id);
        self.splits.len() != before
    }

    /// Slice the asset at the current split list. Recomputed on every call,
    /// so segments never outlive a change to the list.
    pub fn segments(&self) -> Result<Vec<Segment>, EngineError> {
        slice::slice_all(&self.buffer, &self.split_times())
    }
}

/// Handle for an asset registered with a session.
pub type AssetId = u64;

/// The single shared playback slot: at most one asset plays at a time.
///
/// Components read the active id and render accordingly instead of holding
/// their own booleans.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(AssetId),
}

#[allow(dead_code)]
impl PlaybackState {
    pub fn play(&mut self, id: AssetId) {
        *self = PlaybackState::Playing(id);
    }

    pub fn stop(&mut self) {
        *self = PlaybackState::Idle;
    }

    pub fn on_natural_end(&mut self) {
        *self = PlaybackState::Idle;
    }

    pub fn active(&self) -> Option<AssetId> {
        match self {
            PlaybackState::Playing(id) => Some(*id),
            PlaybackState::Idle => None,
        }
    }
}
