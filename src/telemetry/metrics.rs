use serde::{Deserialize, Serialize};

use super::event::{LatencyEvent, LatencyMetric};
use crate::time::Timestamp;

/// Every timestamp the recorder tracks for one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timestamps {
    pub user_finished_speaking: Option<Timestamp>,
    pub model_generation_start: Option<Timestamp>,
    pub first_audio_chunk_generated: Option<Timestamp>,
    pub first_audio_chunk_played: Option<Timestamp>,

    // Legacy bookkeeping, not part of any derived metric
    pub first_audio_sent: Option<Timestamp>,
    pub last_audio_sent: Option<Timestamp>,
    pub last_audio_received: Option<Timestamp>,
}

impl Timestamps {
    pub fn is_empty(&self) -> bool {
        *self == Timestamps::default()
    }
}

/// `end - start` as an interval event, if `start` was recorded.
pub fn interval(
    metric: LatencyMetric,
    start: Option<Timestamp>,
    end: Timestamp,
) -> Option<LatencyEvent> {
    start.map(|start| LatencyEvent::interval(metric, end.since(start)))
}

/// Elapsed time from end of user speech to first playback, falling back to
/// first generated chunk when playback has not started.
pub fn voice_to_voice(ts: &Timestamps) -> Option<f64> {
    let start = ts.user_finished_speaking?;
    let end = ts.first_audio_chunk_played.or(ts.first_audio_chunk_generated)?;
    Some(end.since(start))
}
