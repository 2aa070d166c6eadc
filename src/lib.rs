//! Analog TV Demodulator Control Loops
//!
//! This library provides the closed-loop controllers that keep an analog
//! TV demodulator frontend on frequency and in shape: an automatic
//! frequency control (AFC) engine and a periodic signal monitor. It is
//! meant to be embedded in a larger tuner/demodulator stack; the silicon
//! itself is reached only through the two traits in [`frontend`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TUNER / DEMOD STACK                       │
//! │  tune requests  │  status & SNR readout  │  UI surface       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    CONTROL LOOPS (this crate)                │
//! │  AFC Engine (adaptive period)  │  Monitor Service (fixed)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    FRONTEND SEAM                             │
//! │  Demodulator trait (reads + config)  │  Tuner trait (Hz)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Instance state only**: every counter and threshold lives on the
//!   engine structs, so multiple frontends coexist trivially
//! - **Type-driven design**: custom types enforce invariants at compile time
//! - **No unsafe**: the crate is pure control logic
//! - **Advisory failure**: loops never error; terminal conditions are
//!   observable statuses
//! - **Functional core, async shell**: `tick()` is plain synchronous
//!   code; the embassy runner only schedules it

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export scheduling dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Automatic Frequency Control
///
/// Coarse acquisition sweep and fine offset tracking for one channel.
pub mod afc;

/// Control-loop configuration and tuning constants
pub mod config;

/// Frontend hardware seams
///
/// The `Demodulator` and `Tuner` traits the loops are generic over.
pub mod frontend;

/// Signal monitor service
///
/// SNR tracking, audio overmodulation and output-mode management,
/// non-standard-signal detection.
pub mod monitor;

/// Async schedulers driving the loops as periodic tasks
#[cfg(feature = "embedded")]
pub mod runner;

/// Shared types used across the control loops
pub mod types;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::afc::AfcEngine;
    pub use crate::config::{AfcConfig, MonitorConfig};
    pub use crate::frontend::{Demodulator, Tuner};
    pub use crate::monitor::MonitorService;
    pub use crate::types::*;

    #[cfg(feature = "embedded")]
    pub use crate::runner::{AfcController, MonitorController};

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
