//! Voice-turn latency instrumentation.
//!
//! # LATCH INVARIANT
//! Model generation start, first chunk generated and first chunk played keep
//! the reading from their **first** occurrence until `reset`. User finished
//! speaking is overwritten on every call.
//!
//! # PRIVACY INVARIANT
//! Events carry milestone tags and millisecond values only, never
//! transcripts or audio.

pub mod event;
pub mod metrics;
pub mod recorder;
pub mod sink;
