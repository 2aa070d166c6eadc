//! Automatic Frequency Control engine
//!
//! Closed-loop correction of the tuned frequency based on the carrier
//! lock flag and the measured residual offset. The engine alternates
//! between a coarse acquisition sweep over a fixed table of trial
//! offsets and a fine tracking phase that applies the measured offset
//! directly, with debounce windows rejecting transient noise around
//! every retune.
//!
//! The engine holds the invariant that the tuner sits at
//! `requested - cumulative_offset` after every tick, and issues at most
//! one retune per tick. All failure is advisory: the terminal-ish
//! `PreOverRange` / `PostOverRange` / `PostUnlock` statuses are surfaced
//! through [`AfcEngine::status`], never as errors.

use crate::config::{
    AfcConfig, AUDIO_MAINTENANCE_INTERVAL, CANDIDATE_OFFSETS_KHZ, CANDIDATE_SWEEP_LIMIT,
};
use crate::frontend::{Demodulator, Tuner};
use crate::types::{AfcStatus, Frequency};

/// Frequency/lock tracking controller for one tuned channel
///
/// Owns the demodulator and tuner handles for its channel; all state is
/// instance state so several frontends can coexist. Ticks must be
/// serialized by the caller (see the runner module); every method here
/// is plain synchronous code.
#[derive(Debug)]
pub struct AfcEngine<D, T> {
    config: AfcConfig,
    demod: D,
    tuner: T,
    /// Frequency the user asked for; corrections are relative to this
    requested: Frequency,
    status: AfcStatus,
    /// Cumulative correction already applied, in kHz.
    /// The tuner always sits at `requested - offset_khz`.
    offset_khz: i32,
    /// Index into the acquisition trial-offset table
    pre_step: usize,
    pre_lock_count: u32,
    pre_unlock_count: u32,
    no_signal_count: u32,
    wave_cnt: u32,
    maintenance_cnt: u32,
    /// Ticks left in the post-enable grace period
    delay_ticks: u32,
    /// Last carrier lock flag read from hardware
    locked: bool,
    enabled: bool,
}

impl<D: Demodulator, T: Tuner> AfcEngine<D, T> {
    /// Create an engine attached to a tuned channel
    ///
    /// The tuner is assumed to already sit at `requested`; construction
    /// performs no hardware access. Call [`Self::enable`] to start
    /// accepting ticks.
    #[must_use]
    pub fn new(demod: D, tuner: T, requested: Frequency, config: AfcConfig) -> Self {
        Self {
            config,
            demod,
            tuner,
            requested,
            status: AfcStatus::Null,
            offset_khz: 0,
            pre_step: 0,
            pre_lock_count: 0,
            pre_unlock_count: 0,
            no_signal_count: 0,
            wave_cnt: 0,
            maintenance_cnt: 0,
            delay_ticks: 0,
            locked: false,
            enabled: false,
        }
    }

    /// Get the current status
    #[must_use]
    pub const fn status(&self) -> AfcStatus {
        self.status
    }

    /// Get the cumulative correction applied so far, in kHz
    #[must_use]
    pub const fn cumulative_offset_khz(&self) -> i32 {
        self.offset_khz
    }

    /// Get the user-requested frequency
    #[must_use]
    pub const fn requested(&self) -> Frequency {
        self.requested
    }

    /// Get the last carrier lock flag the engine observed
    #[must_use]
    pub const fn carrier_locked(&self) -> bool {
        self.locked
    }

    /// Check if the engine is accepting ticks
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &AfcConfig {
        &self.config
    }

    /// Borrow the demodulator handle
    pub fn demod(&mut self) -> &mut D {
        &mut self.demod
    }

    /// Borrow the tuner handle
    pub fn tuner(&mut self) -> &mut T {
        &mut self.tuner
    }

    /// Tick period appropriate for the current status, in milliseconds
    ///
    /// Settled and given-up states are re-evaluated at the slow cadence;
    /// everything else hunts at the fast one.
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        if self.status.is_stable() {
            self.config.slow_period_ms
        } else {
            self.config.fast_period_ms
        }
    }

    /// Start accepting ticks
    ///
    /// Resets every counter and arms the post-enable grace period so the
    /// demodulator can settle before the first measurement is trusted.
    pub fn enable(&mut self) {
        self.reset_counters();
        self.delay_ticks = self.config.initial_delay_ticks;
        self.enabled = true;
    }

    /// Stop accepting ticks
    ///
    /// Ticks arriving while disabled are ignored; no state changes and
    /// no hardware access happen until re-enabled.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Process a fresh tune request
    ///
    /// Clears the accumulated correction and all bookkeeping, returns
    /// the status to `Null` and commands the tuner to the new baseline.
    /// This is the only path that re-arms the acquisition sweep after a
    /// `PostUnlock` / `PostOverRange`.
    pub fn retune(&mut self, requested: Frequency) {
        self.requested = requested;
        self.offset_khz = 0;
        self.status = AfcStatus::Null;
        self.reset_counters();
        self.delay_ticks = self.config.initial_delay_ticks;
        self.apply_offset();
    }

    /// Read the residual carrier offset for external consumers, in kHz
    ///
    /// Returns `None` unless both the carrier PLL and the line sync are
    /// locked; a numeric offset read without both locks is noise.
    pub fn afc_offset_khz(&mut self) -> Option<i32> {
        if self.demod.carrier_locked() && self.demod.line_locked() {
            Some(self.demod.frequency_offset_khz())
        } else {
            None
        }
    }

    /// Run one control-loop iteration
    ///
    /// Reads the lock flags and offset measurement, advances the state
    /// machine and issues at most one retune. Never blocks and never
    /// fails; terminal conditions are visible through [`Self::status`].
    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        if self.delay_ticks > 0 {
            self.delay_ticks -= 1;
            return;
        }

        let was_locked = self.locked;
        let locked = self.demod.carrier_locked();
        self.locked = locked;

        if self.status.acquiring() {
            self.acquire(locked, was_locked);
        } else {
            self.track(locked);
        }
    }

    /// Coarse acquisition: debounced spiral sweep over the trial offsets
    fn acquire(&mut self, locked: bool, was_locked: bool) {
        if locked {
            self.pre_unlock_count = 0;
            self.pre_lock_count += 1;
            if self.pre_lock_count >= 2 * self.config.wave_debounce_ticks {
                self.pre_lock_count = 0;
                self.status = AfcStatus::PreLock;
            }
            return;
        }

        self.pre_lock_count = 0;
        self.pre_unlock_count = self.pre_unlock_count.saturating_add(1);

        let trial = CANDIDATE_OFFSETS_KHZ[self.pre_step];
        if was_locked && trial != 0 {
            // a trial offset glimpsed lock but lost it again: drop the
            // trial and restart the sweep from the baseline
            self.offset_khz -= trial;
            self.pre_step = 0;
            self.status = AfcStatus::PreUnlock;
            self.pre_unlock_count = 0;
            self.apply_offset();
            return;
        }

        if self.status == AfcStatus::Null {
            // first unlock observation on a fresh tune
            self.status = AfcStatus::PreUnlock;
            self.pre_unlock_count = 0;
            return;
        }

        if self.pre_unlock_count <= self.config.wave_debounce_ticks {
            return;
        }

        // debounce satisfied: move to the next trial offset
        if self.offset_khz == trial {
            self.offset_khz -= trial;
        }
        self.pre_step += 1;
        if self.pre_step < CANDIDATE_SWEEP_LIMIT {
            self.offset_khz += CANDIDATE_OFFSETS_KHZ[self.pre_step];
            self.status = AfcStatus::PreUnlock;
        } else {
            // table exhausted: no carrier anywhere near the request
            self.pre_step = 0;
            self.offset_khz = 0;
            self.status = AfcStatus::PreOverRange;
        }
        self.pre_unlock_count = 0;
        self.apply_offset();
    }

    /// Fine tracking: apply the measured offset, watch for loss and stall
    fn track(&mut self, locked: bool) {
        self.pre_step = 0;

        if locked {
            self.maintenance_cnt += 1;
            if self.maintenance_cnt >= AUDIO_MAINTENANCE_INTERVAL {
                self.maintenance_cnt = 0;
                self.demod.run_audio_overmodulation_check();
            }
        }

        let offset = self.demod.frequency_offset_khz();

        self.wave_cnt = self.wave_cnt.saturating_add(1);
        if self.wave_cnt <= self.config.wave_debounce_ticks {
            // post-retune settling window: measurements not trusted yet
            self.status = AfcStatus::PostProcess;
            return;
        }

        let field = self.demod.field_locked();

        // best lock: carrier and field sync good, residual inside the window
        if locked
            && field
            && offset.abs() < self.config.best_lock_khz
            && self.offset_khz.abs() <= self.config.afc_limit_khz
        {
            self.status = AfcStatus::PostLock;
            self.wave_cnt = 0;
            return;
        }

        // lock lost: revert to the baseline and report
        if !locked || !field {
            if self.offset_khz != 0 {
                self.offset_khz = 0;
                self.apply_offset();
            }
            self.wave_cnt = 0;
            self.pre_lock_count = 0;
            self.status = AfcStatus::PostUnlock;
            return;
        }

        // correction pinned beyond the limit: give up after a full stall
        if self.offset_khz.abs() > self.config.afc_limit_khz {
            self.no_signal_count += 1;
            if self.no_signal_count >= self.config.no_signal_giveup_ticks {
                self.no_signal_count = 0;
                self.offset_khz = 0;
                self.apply_offset();
                self.wave_cnt = 0;
                self.status = AfcStatus::PostOverRange;
            }
            return;
        }

        // fine correction
        self.no_signal_count = 0;
        if offset.abs() >= self.config.best_lock_khz {
            self.offset_khz += offset;
            self.apply_offset();
            self.wave_cnt = 0;
            self.status = AfcStatus::PostProcess;
        }
    }

    /// Command the tuner to `requested - offset`
    fn apply_offset(&mut self) {
        let target = self.requested.as_hz() as i64 - i64::from(self.offset_khz) * 1000;
        self.tuner.set_frequency_hz(target.max(0) as u64);
    }

    fn reset_counters(&mut self) {
        self.pre_step = 0;
        self.pre_lock_count = 0;
        self.pre_unlock_count = 0;
        self.no_signal_count = 0;
        self.wave_cnt = 0;
        self.maintenance_cnt = 0;
        self.locked = false;
    }
}
