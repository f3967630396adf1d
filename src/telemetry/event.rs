use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::Timestamp;

// Allowed: milestone tags, timestamps, derived durations.
// Forbidden: transcripts, audio payloads.

/// Point events the pipeline reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Legacy: an outgoing microphone chunk was sent.
    AudioSent,
    /// Milestone 1: transcription flagged the user's utterance as finished.
    UserFinishedSpeaking,
    /// Milestone 2: first sign of the model producing a response.
    ModelGenerationStarted,
    /// Milestone 3: first audio chunk of the response arrived.
    FirstAudioChunkGenerated,
    /// Legacy: any response audio chunk arrived.
    AudioChunkReceived,
    /// Milestone 4: playback of the first chunk began.
    FirstAudioChunkPlayed,
}

impl Milestone {
    pub fn label(&self) -> &'static str {
        match self {
            Milestone::AudioSent => "Audio sent",
            Milestone::UserFinishedSpeaking => "User finished speaking",
            Milestone::ModelGenerationStarted => "Model generation started",
            Milestone::FirstAudioChunkGenerated => "First audio chunk generated",
            Milestone::AudioChunkReceived => "Audio chunk received",
            Milestone::FirstAudioChunkPlayed => "First audio chunk played",
        }
    }

    /// Fires per chunk rather than once per turn.
    pub fn is_per_chunk(&self) -> bool {
        matches!(self, Milestone::AudioSent | Milestone::AudioChunkReceived)
    }
}

/// Intervals derived between milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatencyMetric {
    /// User finished -> model starts.
    ThinkingTime,
    /// Model starts -> first audio generated.
    GenerationTime,
    /// User finished -> first audio generated.
    TrueLatency,
    /// First audio generated -> first audio played.
    NetworkProcessing,
    /// User finished -> first audio played.
    EndToEnd,
    /// User finished -> best available end marker.
    VoiceToVoice,
}

impl LatencyMetric {
    pub fn label(&self) -> &'static str {
        match self {
            LatencyMetric::ThinkingTime => "Thinking time (user finished -> model starts)",
            LatencyMetric::GenerationTime => "Generation time (model starts -> first audio)",
            LatencyMetric::TrueLatency => "TRUE LATENCY (user finished -> first audio generated)",
            LatencyMetric::NetworkProcessing => "Network + processing time (generated -> played)",
            LatencyMetric::EndToEnd => "END-TO-END LATENCY (user finished -> audio played)",
            LatencyMetric::VoiceToVoice => "Voice-to-Voice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LatencyEvent {
    Milestone {
        milestone: Milestone,
        at: Timestamp,
    },
    Interval {
        metric: LatencyMetric,
        millis: f64,
    },
}

impl LatencyEvent {
    pub fn milestone(milestone: Milestone, at: Timestamp) -> Self {
        LatencyEvent::Milestone { milestone, at }
    }

    pub fn interval(metric: LatencyMetric, millis: f64) -> Self {
        LatencyEvent::Interval { metric, millis }
    }

    /// Numeric payload in milliseconds.
    pub fn millis(&self) -> f64 {
        match self {
            LatencyEvent::Milestone { at, .. } => at.millis,
            LatencyEvent::Interval { millis, .. } => *millis,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LatencyEvent::Milestone { milestone, .. } => milestone.label(),
            LatencyEvent::Interval { metric, .. } => metric.label(),
        }
    }
}

impl fmt::Display for LatencyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[LATENCY] {}: {:.2}ms", self.label(), self.millis())
    }
}
