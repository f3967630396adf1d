use super::event::{LatencyEvent, LatencyMetric, Milestone};
use super::metrics::{self, Timestamps};
use super::sink::{LatencySink, TracingSink};
use crate::config::RecorderConfig;
use crate::time::{Clock, MonotonicClock, Timestamp};

/// Milestone bookkeeping for one turn.
///
/// Transitions are pure: each takes the clock reading and returns the
/// events it produced. The enable flag and emission live in
/// [`LatencyRecorder`].
#[derive(Debug, Clone, Default)]
pub struct LatencyState {
    ts: Timestamps,
}

impl LatencyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.ts
    }

    pub fn audio_sent(&mut self, now: Timestamp) -> Vec<LatencyEvent> {
        self.ts.first_audio_sent.get_or_insert(now);
        self.ts.last_audio_sent = Some(now);
        vec![LatencyEvent::milestone(Milestone::AudioSent, now)]
    }

    /// Overwrites on every call. Callers reset between turns.
    pub fn user_finished_speaking(&mut self, now: Timestamp) -> Vec<LatencyEvent> {
        self.ts.user_finished_speaking = Some(now);
        vec![LatencyEvent::milestone(Milestone::UserFinishedSpeaking, now)]
    }

    pub fn model_generation_start(&mut self, now: Timestamp) -> Vec<LatencyEvent> {
        if self.ts.model_generation_start.is_some() {
            return Vec::new();
        }
        self.ts.model_generation_start = Some(now);

        let mut events = vec![LatencyEvent::milestone(Milestone::ModelGenerationStarted, now)];
        events.extend(metrics::interval(
            LatencyMetric::ThinkingTime,
            self.ts.user_finished_speaking,
            now,
        ));
        events
    }

    pub fn audio_chunk_generated(&mut self, now: Timestamp) -> Vec<LatencyEvent> {
        let mut events = Vec::new();

        if self.ts.first_audio_chunk_generated.is_none() {
            self.ts.first_audio_chunk_generated = Some(now);
            events.push(LatencyEvent::milestone(Milestone::FirstAudioChunkGenerated, now));
            events.extend(metrics::interval(
                LatencyMetric::GenerationTime,
                self.ts.model_generation_start,
                now,
            ));
            events.extend(metrics::interval(
                LatencyMetric::TrueLatency,
                self.ts.user_finished_speaking,
                now,
            ));
        }

        // Legacy: runs on every chunk
        self.ts.last_audio_received.get_or_insert(now);
        events.push(LatencyEvent::milestone(Milestone::AudioChunkReceived, now));
        events
    }

    pub fn audio_chunk_played(&mut self, now: Timestamp) -> Vec<LatencyEvent> {
        if self.ts.first_audio_chunk_played.is_some() {
            return Vec::new();
        }
        self.ts.first_audio_chunk_played = Some(now);

        let mut events = vec![LatencyEvent::milestone(Milestone::FirstAudioChunkPlayed, now)];
        events.extend(metrics::interval(
            LatencyMetric::NetworkProcessing,
            self.ts.first_audio_chunk_generated,
            now,
        ));
        events.extend(metrics::interval(
            LatencyMetric::EndToEnd,
            self.ts.user_finished_speaking,
            now,
        ));
        events
    }

    pub fn voice_to_voice(&self) -> Option<f64> {
        metrics::voice_to_voice(&self.ts)
    }

    pub fn clear(&mut self) {
        self.ts = Timestamps::default();
    }
}

/// Latches pipeline milestones for one conversational turn and reports the
/// derived intervals to a [`LatencySink`].
///
/// Single-threaded: every mutating call takes `&mut self`, so callers
/// sharing a recorder across threads must wrap it in their own lock.
#[derive(Debug)]
pub struct LatencyRecorder<C: Clock = MonotonicClock, S: LatencySink = TracingSink> {
    enabled: bool,
    state: LatencyState,
    clock: C,
    sink: S,
}

impl LatencyRecorder {
    /// Enabled recorder on the process monotonic clock, logging via `tracing`.
    pub fn new() -> Self {
        Self::with_parts(MonotonicClock::new(), TracingSink::default())
    }

    pub fn from_config(config: &RecorderConfig) -> Self {
        let mut recorder =
            Self::with_parts(MonotonicClock::new(), TracingSink::new(config.log_format));
        recorder.set_enabled(config.enabled);
        recorder
    }
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, S: LatencySink> LatencyRecorder<C, S> {
    pub fn with_parts(clock: C, sink: S) -> Self {
        Self {
            enabled: true,
            state: LatencyState::new(),
            clock,
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggling leaves recorded timestamps as they are.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn timestamps(&self) -> &Timestamps {
        self.state.timestamps()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn record_audio_sent(&mut self) {
        self.apply(LatencyState::audio_sent);
    }

    pub fn record_user_finished_speaking(&mut self) {
        self.apply(LatencyState::user_finished_speaking);
    }

    pub fn record_model_generation_start(&mut self) {
        self.apply(LatencyState::model_generation_start);
    }

    pub fn record_audio_chunk_generated(&mut self) {
        self.apply(LatencyState::audio_chunk_generated);
    }

    pub fn record_audio_chunk_played(&mut self) {
        self.apply(LatencyState::audio_chunk_played);
    }

    /// Older name for [`Self::record_audio_chunk_generated`].
    pub fn record_audio_received(&mut self) {
        self.record_audio_chunk_generated();
    }

    /// Milliseconds from end of user speech to first playback (or, failing
    /// that, first generated chunk). Recomputed on every call.
    pub fn calculate_voice_to_voice(&mut self) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let millis = self.state.voice_to_voice()?;
        self.sink
            .emit(&LatencyEvent::interval(LatencyMetric::VoiceToVoice, millis));
        Some(millis)
    }

    /// Starts a new measurement cycle. The enable flag is untouched.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    fn apply(&mut self, transition: fn(&mut LatencyState, Timestamp) -> Vec<LatencyEvent>) {
        if !self.enabled {
            return;
        }
        let now = self.clock.now();
        for event in transition(&mut self.state, now) {
            self.sink.emit(&event);
        }
    }
}
