//! Signal monitor service
//!
//! Periodic auxiliary health checks that never touch tuning: SNR
//! estimation with derived loop-bandwidth profiles, audio
//! overmodulation compensation, audio output-mode reselection and
//! non-standard-signal detection. Each check is independently
//! toggleable; all of them write demodulator configuration only,
//! through the [`Demodulator`] trait.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use heapless::HistoryBuffer;

use crate::config::{
    MonitorConfig, OVERMOD_DECISION_TICKS, OVERMOD_SAMPLE_INTERVAL, SNR_HISTORY_DEPTH,
};
use crate::frontend::Demodulator;
use crate::types::{
    AgcSetpoints, AudioStandard, GainProfile, OutputMode, PilotFlags, SignalProfile, SnrLevel,
    SyncFilter,
};

/// Full-scale value of the raw SNR register
const SNR_FULL_SCALE: u32 = 0xFF_FFFF;

/// Rolling SNR estimate over a fixed window of register reads
pub struct SnrTracker {
    history: HistoryBuffer<u32, SNR_HISTORY_DEPTH>,
    average: u32,
}

impl Default for SnrTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SnrTracker {
    /// Create an empty tracker
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: HistoryBuffer::new(),
            average: 0,
        }
    }

    /// Push a raw SNR sample and refresh the rolling average
    pub fn push(&mut self, raw: u32) {
        self.history.write(raw);
        let len = self.history.len() as u64;
        let sum: u64 = self.history.oldest_ordered().map(|&v| u64::from(v)).sum();
        self.average = (sum / len) as u32;
    }

    /// Get the rolling average of the raw SNR word
    #[must_use]
    pub const fn raw_average(&self) -> u32 {
        self.average
    }

    /// Get the quality bucket for the current average
    #[must_use]
    pub const fn level(&self) -> SnrLevel {
        SnrLevel::from_raw_average(self.average)
    }

    /// Map the current average onto a 0..=100 quality scale
    ///
    /// Piecewise-linear in the raw word, anchored so the bucket
    /// boundaries land on round percentages (80/50/30/15).
    #[must_use]
    pub fn percent(&self) -> u8 {
        let raw = u64::from(self.average);
        let pct: i64 = if raw <= 316 {
            100 - raw as i64 * 20 / 316
        } else if raw <= 31_600 {
            80 - (raw as i64 - 316) * 30 / (31_600 - 316)
        } else if raw <= 158_000 {
            50 - (raw as i64 - 31_600) * 20 / (158_000 - 31_600)
        } else if raw <= 900_000 {
            30 - (raw as i64 - 158_000) * 15 / (900_000 - 158_000)
        } else {
            15 - (raw as i64 - 900_000) * 10 / (i64::from(SNR_FULL_SCALE) - 900_000)
        };
        pct.clamp(0, 100) as u8
    }

    /// Approximate SNR in dB relative to the full-scale noise word
    #[must_use]
    pub fn db(&self) -> f32 {
        let raw = self.average.max(1) as f32;
        10.0 * (SNR_FULL_SCALE as f32 / raw).log10()
    }

    fn reset(&mut self) {
        self.history = HistoryBuffer::new();
        self.average = 0;
    }
}

/// Audio overmodulation detector with enter/exit hysteresis
///
/// Samples the overload counter every few ticks, averages a short burst
/// of samples and toggles the demodulator's gain compensation when the
/// average crosses the thresholds.
#[derive(Debug, Default)]
struct OvermodDetector {
    ticks: u32,
    accum: u32,
    compensated: bool,
}

impl OvermodDetector {
    fn tick<D: Demodulator>(&mut self, demod: &mut D, enter: u32, exit: u32) {
        self.ticks += 1;
        if self.ticks % OVERMOD_SAMPLE_INTERVAL != 0 {
            return;
        }
        self.accum += demod.audio_overload_count();
        if self.ticks < OVERMOD_DECISION_TICKS {
            return;
        }

        let avg = self.accum / (OVERMOD_DECISION_TICKS / OVERMOD_SAMPLE_INTERVAL);
        if self.compensated {
            if avg <= exit {
                self.compensated = false;
                demod.set_audio_compensation(false);
            }
        } else if avg > enter {
            self.compensated = true;
            demod.set_audio_compensation(true);
        }
        self.ticks = 0;
        self.accum = 0;
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.accum = 0;
        self.compensated = false;
    }
}

/// Audio output-mode selector
///
/// Re-derives the effective routing from the pilot flags whenever they
/// change; a steady signal produces no register traffic.
#[derive(Debug, Default)]
struct OutputSelector {
    last_flags: Option<PilotFlags>,
}

impl OutputSelector {
    fn tick<D: Demodulator>(
        &mut self,
        demod: &mut D,
        standard: AudioStandard,
        requested: OutputMode,
    ) {
        let flags = demod.pilot_flags();
        if self.last_flags == Some(flags) {
            return;
        }
        self.last_flags = Some(flags);
        demod.set_output_mode(effective_output(standard, requested, flags));
    }

    fn reset(&mut self) {
        self.last_flags = None;
    }
}

/// Resolve the requested output mode against what the signal carries
///
/// Stereo needs the stereo pilot, SAP needs the SAP subcarrier and the
/// NICAM dual channels need NICAM frame sync; anything unavailable
/// falls back to mono.
#[must_use]
pub fn effective_output(
    standard: AudioStandard,
    requested: OutputMode,
    flags: PilotFlags,
) -> OutputMode {
    match requested {
        OutputMode::Mono => OutputMode::Mono,
        OutputMode::Stereo => {
            let carried = match standard {
                AudioStandard::Nicam => flags.nicam,
                _ => flags.stereo,
            };
            if carried {
                OutputMode::Stereo
            } else {
                OutputMode::Mono
            }
        }
        OutputMode::Sap => {
            if flags.sap {
                OutputMode::Sap
            } else {
                OutputMode::Mono
            }
        }
        OutputMode::DualA | OutputMode::DualB => {
            if standard == AudioStandard::Nicam && !flags.nicam {
                OutputMode::Mono
            } else {
                requested
            }
        }
    }
}

/// Non-standard-signal detector
///
/// Watches the spread and activity of two AGC-derived words over a
/// rolling window. A jumpy AGC on an otherwise locked carrier means the
/// modulation strays from the broadcast standard and the demodulator needs the
/// alternate filter profile. Sampling only runs while both the carrier
/// PLL and line sync hold; any unlock restarts the window and the entry
/// delay.
#[derive(Debug)]
struct NonStdDetector {
    entry_delay: u32,
    entered: bool,
    ticks: u32,
    gain_min: i32,
    gain_max: i32,
    error_min: i32,
    error_max: i32,
    gain_prev: i32,
    error_prev: i32,
    gain_sum: i32,
    error_sum: i32,
    profile: SignalProfile,
}

impl Default for NonStdDetector {
    fn default() -> Self {
        Self {
            entry_delay: 0,
            entered: false,
            ticks: 0,
            gain_min: i32::MAX,
            gain_max: i32::MIN,
            error_min: i32::MAX,
            error_max: i32::MIN,
            gain_prev: 0,
            error_prev: 0,
            gain_sum: 0,
            error_sum: 0,
            profile: SignalProfile::Standard,
        }
    }
}

impl NonStdDetector {
    fn tick<D: Demodulator>(&mut self, demod: &mut D, config: &MonitorConfig) {
        if !(demod.carrier_locked() && demod.line_locked()) {
            self.reset_window();
            return;
        }

        if !self.entered {
            // inclusive gate: sampling starts once the counter has passed
            // the threshold, so a delay of N swallows N+1 ticks
            if self.entry_delay <= config.non_std_entry_delay {
                self.entry_delay += 1;
                return;
            }
            self.entered = true;
            self.entry_delay = 0;
        }

        let readings = demod.agc_readings();
        let gain = i32::from(readings.gain);
        let error = i32::from(readings.error);

        self.gain_min = self.gain_min.min(gain);
        self.gain_max = self.gain_max.max(gain);
        self.error_min = self.error_min.min(error);
        self.error_max = self.error_max.max(error);

        if self.ticks >= config.non_std_window {
            let gain_diff = self.gain_max - self.gain_min;
            let error_diff = self.error_max - self.error_min;

            if gain_diff > config.gain_diff_high
                && error_diff > config.error_diff_high
                && self.gain_sum > config.gain_sum_high
                && self.error_sum > config.error_sum_high
            {
                self.profile = SignalProfile::NonStandard;
                demod.set_signal_profile(SignalProfile::NonStandard);
            } else if gain_diff < config.gain_diff_low
                && error_diff < config.error_diff_low
                && self.gain_sum < config.gain_sum_low
                && self.error_sum < config.error_sum_low
            {
                self.profile = SignalProfile::Standard;
                demod.set_signal_profile(SignalProfile::Standard);
            }

            self.ticks = 0;
            self.gain_min = i32::MAX;
            self.gain_max = i32::MIN;
            self.error_min = i32::MAX;
            self.error_max = i32::MIN;
            self.gain_sum = 0;
            self.error_sum = 0;
        } else {
            self.ticks += 1;
            self.gain_sum += (gain - self.gain_prev).abs();
            self.error_sum += (error - self.error_prev).abs();
        }

        self.gain_prev = gain;
        self.error_prev = error;
    }

    /// Restart the window and the entry delay; the applied profile stays
    fn reset_window(&mut self) {
        let profile = self.profile;
        *self = Self {
            profile,
            ..Self::default()
        };
    }
}

/// Periodic signal health monitor for one tuned channel
///
/// Runs at a fixed cadence, independent of the AFC engine; reads
/// overlapping hardware state but never writes tuning. Ticks must be
/// serialized by the caller.
pub struct MonitorService<D> {
    config: MonitorConfig,
    demod: D,
    enabled: bool,
    /// Advisory cache of the last observed carrier lock flag
    locked: bool,
    snr: SnrTracker,
    overmod: OvermodDetector,
    output: OutputSelector,
    non_std: NonStdDetector,
}

impl<D: Demodulator> MonitorService<D> {
    /// Create a monitor attached to a demodulator
    ///
    /// Performs no hardware access; call [`Self::enable`] to start
    /// accepting ticks.
    #[must_use]
    pub fn new(demod: D, config: MonitorConfig) -> Self {
        Self {
            config,
            demod,
            enabled: false,
            locked: false,
            snr: SnrTracker::new(),
            overmod: OvermodDetector::default(),
            output: OutputSelector::default(),
            non_std: NonStdDetector::default(),
        }
    }

    /// Check if the service is accepting ticks
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the last carrier lock condition the monitor observed
    #[must_use]
    pub const fn carrier_locked(&self) -> bool {
        self.locked
    }

    /// Get the rolling SNR estimate
    #[must_use]
    pub const fn snr(&self) -> &SnrTracker {
        &self.snr
    }

    /// Get the signal profile currently applied by non-standard detection
    #[must_use]
    pub const fn signal_profile(&self) -> SignalProfile {
        self.non_std.profile
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Borrow the demodulator handle
    pub fn demod(&mut self) -> &mut D {
        &mut self.demod
    }

    /// Tick period, in milliseconds
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.config.period_ms
    }

    /// Start accepting ticks, with all detectors reset
    pub fn enable(&mut self) {
        self.snr.reset();
        self.overmod.reset();
        self.output.reset();
        self.non_std = NonStdDetector::default();
        self.locked = false;
        self.enabled = true;
    }

    /// Stop accepting ticks and clear the non-standard accumulator
    pub fn disable(&mut self) {
        self.enabled = false;
        self.non_std.reset_window();
    }

    /// Run one monitor iteration
    ///
    /// The enabled detectors are independent of each other; none of them
    /// alters the tuned frequency.
    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }

        self.locked = self.demod.carrier_locked();

        if self.config.snr_tracking {
            self.update_snr();
        }
        if self.config.overmodulation {
            self.overmod
                .tick(&mut self.demod, self.config.overmod_enter, self.config.overmod_exit);
        }
        if self.config.output_mode {
            self.output.tick(
                &mut self.demod,
                self.config.audio_standard,
                self.config.requested_output,
            );
        }
        if self.config.non_std_detection {
            self.non_std.tick(&mut self.demod, &self.config);
        }
    }

    /// Refresh the SNR estimate and push the derived register profiles
    fn update_snr(&mut self) {
        self.snr.push(self.demod.snr_raw());
        let level = self.snr.level();

        self.demod.apply_gain_profile(&GainProfile::for_level(level));
        if let Some(setpoints) = AgcSetpoints::for_level(level) {
            self.demod.apply_agc_setpoints(setpoints);
        }
        self.demod.set_field_sync_gate(level >= SnrLevel::OkMinus);
        self.demod.set_sync_filter(SyncFilter::for_level(level));
    }
}
