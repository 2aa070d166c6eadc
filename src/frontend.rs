//! Frontend hardware seams
//!
//! The control loops talk to the outside world through two narrow traits:
//! [`Demodulator`] for measurement reads and configuration writes, and
//! [`Tuner`] for the absolute-frequency sink. Silicon drivers implement
//! these over their register bus; tests implement them in memory.
//!
//! All operations are synchronous and expected to complete in microseconds
//! (register-bus round trips). A tick never blocks on them.

use crate::types::{
    AgcReadings, AgcSetpoints, GainProfile, OutputMode, PilotFlags, SignalProfile, SyncFilter,
};

/// Measurement source and configuration sink of the demodulator block
///
/// Reads are idempotent and side-effect free; writes are fire-and-forget.
/// Measurement values are only meaningful under the lock conditions
/// documented per method.
pub trait Demodulator {
    /// Read the carrier PLL lock flag
    fn carrier_locked(&mut self) -> bool;

    /// Read the field (frame) sync lock flag
    fn field_locked(&mut self) -> bool;

    /// Read the line sync lock flag
    fn line_locked(&mut self) -> bool;

    /// Read the residual carrier offset in kHz
    ///
    /// Only meaningful while [`Self::carrier_locked`] reports true.
    fn frequency_offset_khz(&mut self) -> i32;

    /// Read the raw SNR estimate word (smaller is cleaner)
    fn snr_raw(&mut self) -> u32;

    /// Read the audio overload event counter
    fn audio_overload_count(&mut self) -> u32;

    /// Read the audio pilot / subcarrier presence flags
    fn pilot_flags(&mut self) -> PilotFlags;

    /// Read the AGC gain and error words watched by the
    /// non-standard-signal detector
    fn agc_readings(&mut self) -> AgcReadings;

    /// Run one round of the audio overmodulation maintenance routine
    ///
    /// Invoked by the AFC engine at a rate-limited cadence while locked;
    /// has no effect on tuning.
    fn run_audio_overmodulation_check(&mut self);

    /// Write a loop-bandwidth and tracking-coefficient profile
    fn apply_gain_profile(&mut self, profile: &GainProfile);

    /// Write the AGC target window
    fn apply_agc_setpoints(&mut self, setpoints: AgcSetpoints);

    /// Gate the field-sync qualifier on or off
    fn set_field_sync_gate(&mut self, enabled: bool);

    /// Select the sync-separator filter
    fn set_sync_filter(&mut self, filter: SyncFilter);

    /// Engage or release the audio overmodulation gain compensation
    fn set_audio_compensation(&mut self, compensated: bool);

    /// Route the audio output
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Switch between the standard and non-standard signal profiles
    fn set_signal_profile(&mut self, profile: SignalProfile);
}

/// Absolute-frequency sink of the tuner block
///
/// Fire-and-forget: the controller does not await confirmation; the next
/// lock reading is the implicit acknowledgement.
pub trait Tuner {
    /// Tune to an absolute frequency in Hz
    fn set_frequency_hz(&mut self, hz: u64);
}
