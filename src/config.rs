//! Control-loop configuration and tuning constants
//!
//! This module centralizes every threshold, period and debounce count the
//! two control loops use. The named constants are the recognized defaults;
//! [`AfcConfig`] and [`MonitorConfig`] carry per-instance overrides so
//! several frontends can coexist with different tunings.

use crate::types::{AudioStandard, OutputMode};

/// Largest cumulative correction the AFC may hold, in kHz
pub const AFC_LIMIT_KHZ: i32 = 2100;

/// AFC tick period while actively hunting, in milliseconds
pub const AFC_FAST_PERIOD_MS: u64 = 10;

/// AFC tick period once settled or given up, in milliseconds
pub const AFC_SLOW_PERIOD_MS: u64 = 100;

/// Consecutive consistent samples required before acting on a transition
pub const WAVE_DEBOUNCE_TICKS: u32 = 4;

/// Ticks suppressed after enable so the demodulator can settle
pub const INITIAL_DELAY_TICKS: u32 = 100;

/// Consecutive over-limit ticks before the AFC reverts to baseline
pub const NO_SIGNAL_GIVEUP_TICKS: u32 = 20;

/// Residual offset below which the carrier counts as best-locked, in kHz
pub const BEST_LOCK_KHZ: i32 = 50;

/// Monitor service tick period, in milliseconds
pub const MONITOR_PERIOD_MS: u64 = 100;

/// Trial offsets applied during the coarse acquisition sweep, in kHz
///
/// The sweep spirals outward around the requested frequency. Entry 0 is
/// the baseline; the sweep stops at [`CANDIDATE_SWEEP_LIMIT`], so the
/// outermost pair is never tried.
pub const CANDIDATE_OFFSETS_KHZ: [i32; 11] = [
    0, -500, 500, -1000, 1000, -1500, 1500, -2000, 2000, -2500, 2500,
];

/// First candidate index the acquisition sweep refuses to enter
pub const CANDIDATE_SWEEP_LIMIT: usize = 9;

/// Locked tracking ticks between audio overmodulation maintenance calls
pub const AUDIO_MAINTENANCE_INTERVAL: u32 = 10;

/// Depth of the rolling SNR averaging window, in samples
pub const SNR_HISTORY_DEPTH: usize = 8;

/// Monitor ticks between audio overload counter samples
pub const OVERMOD_SAMPLE_INTERVAL: u32 = 5;

/// Monitor ticks per audio overmodulation decision
pub const OVERMOD_DECISION_TICKS: u32 = 15;

/// Averaged overload count above which audio gain compensation engages
pub const OVERMOD_ENTER_THRESHOLD: u32 = 0x1000;

/// Averaged overload count at or below which compensation releases
pub const OVERMOD_EXIT_THRESHOLD: u32 = 0xF00;

/// Monitor ticks accumulated per non-standard-signal decision
pub const NON_STD_WINDOW_TICKS: u32 = 50;

/// Monitor ticks waited after lock before non-standard sampling starts
pub const NON_STD_ENTRY_DELAY_TICKS: u32 = 50;

/// AGC gain spread above which a signal looks non-standard
pub const NON_STD_GAIN_DIFF_HIGH: i32 = 100;

/// AGC gain spread below which a signal looks standard again
pub const NON_STD_GAIN_DIFF_LOW: i32 = 30;

/// AGC error spread above which a signal looks non-standard
pub const NON_STD_ERROR_DIFF_HIGH: i32 = 500;

/// AGC error spread below which a signal looks standard again
pub const NON_STD_ERROR_DIFF_LOW: i32 = 300;

/// Default startup frequency (UHF E21 picture carrier)
pub const DEFAULT_FREQUENCY_HZ: u64 = 471_250_000;

/// AFC engine configuration
///
/// All fields default to the module constants above; `with_*` helpers
/// return an adjusted copy in the immutable-update style.
#[derive(Clone, Copy, Debug)]
pub struct AfcConfig {
    /// Largest cumulative correction the engine may hold, in kHz
    pub afc_limit_khz: i32,
    /// Tick period while hunting, in milliseconds
    pub fast_period_ms: u64,
    /// Tick period once settled, in milliseconds
    pub slow_period_ms: u64,
    /// Debounce window length, in ticks
    pub wave_debounce_ticks: u32,
    /// Post-enable grace period, in ticks
    pub initial_delay_ticks: u32,
    /// Over-limit ticks before reverting to baseline
    pub no_signal_giveup_ticks: u32,
    /// Best-lock residual offset threshold, in kHz
    pub best_lock_khz: i32,
}

impl AfcConfig {
    /// Create a configuration with the recognized defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            afc_limit_khz: AFC_LIMIT_KHZ,
            fast_period_ms: AFC_FAST_PERIOD_MS,
            slow_period_ms: AFC_SLOW_PERIOD_MS,
            wave_debounce_ticks: WAVE_DEBOUNCE_TICKS,
            initial_delay_ticks: INITIAL_DELAY_TICKS,
            no_signal_giveup_ticks: NO_SIGNAL_GIVEUP_TICKS,
            best_lock_khz: BEST_LOCK_KHZ,
        }
    }

    /// Set the correction limit (returns new config)
    #[must_use]
    pub const fn with_afc_limit_khz(self, khz: i32) -> Self {
        Self { afc_limit_khz: khz, ..self }
    }

    /// Set the hunting tick period (returns new config)
    #[must_use]
    pub const fn with_fast_period_ms(self, ms: u64) -> Self {
        Self { fast_period_ms: ms, ..self }
    }

    /// Set the settled tick period (returns new config)
    #[must_use]
    pub const fn with_slow_period_ms(self, ms: u64) -> Self {
        Self { slow_period_ms: ms, ..self }
    }

    /// Set the debounce window length (returns new config)
    #[must_use]
    pub const fn with_wave_debounce_ticks(self, ticks: u32) -> Self {
        Self { wave_debounce_ticks: ticks, ..self }
    }

    /// Set the post-enable grace period (returns new config)
    #[must_use]
    pub const fn with_initial_delay_ticks(self, ticks: u32) -> Self {
        Self { initial_delay_ticks: ticks, ..self }
    }

    /// Set the over-limit give-up count (returns new config)
    #[must_use]
    pub const fn with_no_signal_giveup_ticks(self, ticks: u32) -> Self {
        Self { no_signal_giveup_ticks: ticks, ..self }
    }

    /// Set the best-lock threshold (returns new config)
    #[must_use]
    pub const fn with_best_lock_khz(self, khz: i32) -> Self {
        Self { best_lock_khz: khz, ..self }
    }
}

impl Default for AfcConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Monitor service configuration
///
/// The detector flags are independently toggleable; thresholds default to
/// the module constants. The sum thresholds of the non-standard detector
/// default permissive (high = 0, low = `i32::MAX`) so the spread checks
/// decide on their own unless a platform tightens them.
#[derive(Clone, Copy, Debug)]
pub struct MonitorConfig {
    /// Tick period, in milliseconds
    pub period_ms: u64,
    /// Run SNR estimation and the derived register profiles
    pub snr_tracking: bool,
    /// Run audio overmodulation detection
    pub overmodulation: bool,
    /// Run audio output-mode reselection
    pub output_mode: bool,
    /// Run non-standard-signal detection
    pub non_std_detection: bool,
    /// Non-standard decision window, in ticks
    pub non_std_window: u32,
    /// Ticks waited after lock before non-standard sampling starts
    pub non_std_entry_delay: u32,
    /// AGC gain spread upper decision threshold
    pub gain_diff_high: i32,
    /// AGC gain spread lower decision threshold
    pub gain_diff_low: i32,
    /// AGC error spread upper decision threshold
    pub error_diff_high: i32,
    /// AGC error spread lower decision threshold
    pub error_diff_low: i32,
    /// AGC gain activity sum upper decision threshold
    pub gain_sum_high: i32,
    /// AGC gain activity sum lower decision threshold
    pub gain_sum_low: i32,
    /// AGC error activity sum upper decision threshold
    pub error_sum_high: i32,
    /// AGC error activity sum lower decision threshold
    pub error_sum_low: i32,
    /// Averaged overload count that engages audio compensation
    pub overmod_enter: u32,
    /// Averaged overload count that releases audio compensation
    pub overmod_exit: u32,
    /// Audio standard of the tuned channel
    pub audio_standard: AudioStandard,
    /// Output mode requested by the user
    pub requested_output: OutputMode,
}

impl MonitorConfig {
    /// Create a configuration with the recognized defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            period_ms: MONITOR_PERIOD_MS,
            snr_tracking: true,
            overmodulation: true,
            output_mode: true,
            non_std_detection: true,
            non_std_window: NON_STD_WINDOW_TICKS,
            non_std_entry_delay: NON_STD_ENTRY_DELAY_TICKS,
            gain_diff_high: NON_STD_GAIN_DIFF_HIGH,
            gain_diff_low: NON_STD_GAIN_DIFF_LOW,
            error_diff_high: NON_STD_ERROR_DIFF_HIGH,
            error_diff_low: NON_STD_ERROR_DIFF_LOW,
            gain_sum_high: 0,
            gain_sum_low: i32::MAX,
            error_sum_high: 0,
            error_sum_low: i32::MAX,
            overmod_enter: OVERMOD_ENTER_THRESHOLD,
            overmod_exit: OVERMOD_EXIT_THRESHOLD,
            audio_standard: AudioStandard::Btsc,
            requested_output: OutputMode::Stereo,
        }
    }

    /// Set the tick period (returns new config)
    #[must_use]
    pub const fn with_period_ms(self, ms: u64) -> Self {
        Self { period_ms: ms, ..self }
    }

    /// Toggle SNR tracking (returns new config)
    #[must_use]
    pub const fn with_snr_tracking(self, on: bool) -> Self {
        Self { snr_tracking: on, ..self }
    }

    /// Toggle audio overmodulation detection (returns new config)
    #[must_use]
    pub const fn with_overmodulation(self, on: bool) -> Self {
        Self { overmodulation: on, ..self }
    }

    /// Toggle output-mode reselection (returns new config)
    #[must_use]
    pub const fn with_output_mode(self, on: bool) -> Self {
        Self { output_mode: on, ..self }
    }

    /// Toggle non-standard-signal detection (returns new config)
    #[must_use]
    pub const fn with_non_std_detection(self, on: bool) -> Self {
        Self { non_std_detection: on, ..self }
    }

    /// Set the non-standard decision window (returns new config)
    #[must_use]
    pub const fn with_non_std_window(self, ticks: u32) -> Self {
        Self { non_std_window: ticks, ..self }
    }

    /// Set the non-standard entry delay (returns new config)
    #[must_use]
    pub const fn with_non_std_entry_delay(self, ticks: u32) -> Self {
        Self { non_std_entry_delay: ticks, ..self }
    }

    /// Set the audio standard (returns new config)
    #[must_use]
    pub const fn with_audio_standard(self, standard: AudioStandard) -> Self {
        Self { audio_standard: standard, ..self }
    }

    /// Set the requested output mode (returns new config)
    #[must_use]
    pub const fn with_requested_output(self, mode: OutputMode) -> Self {
        Self { requested_output: mode, ..self }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}
