//! Tracing for Parley processors.
//!
//! This crate provides:
//! - [`Tracer`] - Records what happens during each processing cycle
//! - [`TraceBuffer`] - Ring buffer of recent trace records
//! - [`HumanFormatter`] / [`JsonFormatter`] - Output formats
//! - [`ObservabilityConfig`] - Presets for the tracer settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod trace;

pub use config::ObservabilityConfig;
pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceBufferStats, TraceEvent, TraceFormatter,
    TraceOutput, TraceRecord, Tracer, TracerConfig,
};
