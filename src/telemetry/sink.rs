use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::event::LatencyEvent;
use crate::config::LogFormat;

const MAX_EVENTS: usize = 10_000;

/// Receives every event the recorder emits, in order.
pub trait LatencySink {
    fn emit(&mut self, event: &LatencyEvent);
}

/// Writes one log line per event through `tracing`.
///
/// Per-chunk records go out at `debug`, turn milestones and intervals at
/// `info`, all under target `voice_latency`. Text lines round values to two
/// decimals; `LogFormat::Json` carries the full-precision `millis`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    format: LogFormat,
}

impl TracingSink {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }
}

impl LatencySink for TracingSink {
    fn emit(&mut self, event: &LatencyEvent) {
        let per_chunk = matches!(
            event,
            LatencyEvent::Milestone { milestone, .. } if milestone.is_per_chunk()
        );

        match self.format {
            LogFormat::Text => {
                if per_chunk {
                    debug!(target: "voice_latency", "{}", event);
                } else {
                    info!(target: "voice_latency", "{}", event);
                }
            }
            LogFormat::Json => match serde_json::to_string(event) {
                Ok(json) if per_chunk => debug!(target: "voice_latency", event = %json),
                Ok(json) => info!(target: "voice_latency", event = %json),
                Err(e) => warn!(target: "voice_latency", "Failed to encode latency event: {}", e),
            },
        }
    }
}

/// Bounded in-memory buffer; the oldest events are dropped once full.
#[derive(Debug)]
pub struct BufferedSink {
    buffer: VecDeque<LatencyEvent>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
        }
    }

    pub fn events(&self) -> impl Iterator<Item = &LatencyEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Removes and returns everything buffered so far.
    pub fn drain(&mut self) -> Vec<LatencyEvent> {
        self.buffer.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencySink for BufferedSink {
    fn emit(&mut self, event: &LatencyEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(*event);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LatencySink for NullSink {
    fn emit(&mut self, _event: &LatencyEvent) {}
}

impl<S: LatencySink + ?Sized> LatencySink for &mut S {
    fn emit(&mut self, event: &LatencyEvent) {
        (**self).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::event::LatencyMetric;
    use crate::telemetry::recorder::LatencyRecorder;
    use crate::time::ManualClock;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// User finished at 100, one chunk at 400.1234, then voice-to-voice.
    fn capture_turn(format: LogFormat, level: Level) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(level)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let clock = ManualClock::at(100.0);
            let mut rec = LatencyRecorder::with_parts(clock.clone(), TracingSink::new(format));
            rec.record_user_finished_speaking();
            clock.set(400.1234);
            rec.record_audio_chunk_generated();
            assert!(rec.calculate_voice_to_voice().is_some());
        });

        log.contents()
    }

    #[test]
    fn tracing_sink_text_lines_at_info() {
        let out = capture_turn(LogFormat::Text, Level::INFO);

        assert!(out.contains("voice_latency"), "Missing target: {}", out);
        let true_latency = "TRUE LATENCY (user finished -> first audio generated): 300.12ms";
        assert!(
            out.contains(&format!("[LATENCY] {}", true_latency)),
            "Missing true latency line: {}",
            out
        );
        assert!(out.contains("[LATENCY] Voice-to-Voice: 300.12ms"));
        assert!(
            !out.contains("Audio chunk received"),
            "Per-chunk record leaked at info: {}",
            out
        );
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn tracing_sink_per_chunk_records_at_debug() {
        let out = capture_turn(LogFormat::Text, Level::DEBUG);

        let received = out
            .lines()
            .find(|line| line.contains("Audio chunk received"))
            .expect("per-chunk record missing at debug");
        assert!(received.contains("DEBUG"), "Wrong level: {}", received);
        assert!(received.contains("400.12ms"));
    }

    #[test]
    fn tracing_sink_json_carries_structured_event() {
        let out = capture_turn(LogFormat::Json, Level::INFO);

        assert!(
            out.contains(r#"event={"Interval":{"metric":"TrueLatency","millis":300.12"#),
            "Missing JSON event field: {}",
            out
        );
        assert!(out.contains(r#"{"Milestone":{"milestone":"UserFinishedSpeaking""#));
        assert!(!out.contains("[LATENCY]"));
    }

    #[test]
    fn buffered_sink_drops_oldest_when_full() {
        let mut sink = BufferedSink::new();
        for i in 0..(MAX_EVENTS + 5) {
            sink.emit(&LatencyEvent::interval(LatencyMetric::VoiceToVoice, i as f64));
        }
        assert_eq!(sink.len(), MAX_EVENTS);
        assert_eq!(sink.events().next().map(|e| e.millis()), Some(5.0));
    }
}
