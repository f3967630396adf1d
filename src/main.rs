use anyhow::Context;
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use voice_latency::{LatencyRecorder, RecorderConfig};

// Simulated pipeline timings (ms)
const THINKING_MS: u64 = 50;
const GENERATION_MS: u64 = 250;
const PLAYBACK_MS: u64 = 100;
const CHUNK_INTERVAL_MS: u64 = 20;
const TURNS: usize = 3;

// Per-chunk records (audio sent / chunk received) log at debug
const DEFAULT_LOG_FILTER: &str = "info,voice_latency=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = RecorderConfig::from_env().context("reading latency recorder config")?;
    tracing::info!("Latency recorder booting (enabled: {})", config.enabled);

    let mut recorder = LatencyRecorder::from_config(&config);

    for turn in 1..=TURNS {
        run_turn(&mut recorder).await;

        match recorder.calculate_voice_to_voice() {
            Some(ms) => println!("[TURN {}] voice-to-voice: {:.2}ms", turn, ms),
            None => println!("[TURN {}] voice-to-voice: unavailable", turn),
        }
        recorder.reset();
    }

    Ok(())
}

/// Drives one speech-in, audio-out exchange with fixed delays.
async fn run_turn(recorder: &mut LatencyRecorder) {
    // User talking: mic chunks go out
    for _ in 0..5 {
        recorder.record_audio_sent();
        sleep(Duration::from_millis(CHUNK_INTERVAL_MS)).await;
    }
    recorder.record_user_finished_speaking();

    sleep(Duration::from_millis(THINKING_MS)).await;
    recorder.record_model_generation_start();
    // Every model turn message repeats this; only the first counts
    recorder.record_model_generation_start();

    sleep(Duration::from_millis(GENERATION_MS)).await;
    for _ in 0..3 {
        recorder.record_audio_chunk_generated();
        sleep(Duration::from_millis(CHUNK_INTERVAL_MS)).await;
    }

    sleep(Duration::from_millis(PLAYBACK_MS)).await;
    recorder.record_audio_chunk_played();
    recorder.record_audio_chunk_played();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_shows_per_chunk_records() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert!(filter.to_string().contains("voice_latency=debug"));
    }
}
