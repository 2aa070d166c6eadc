//! Shared types used across the demodulator control loops
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Frequency in Hertz with validation
///
/// Represents a valid tuning frequency within the analog TV range.
/// The frequency is stored in Hz for precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u64);

impl Frequency {
    /// Minimum supported frequency (44.25 MHz, VHF low band picture carrier)
    pub const MIN_HZ: u64 = 44_250_000;

    /// Maximum supported frequency (868.25 MHz, top of the UHF cable plan)
    pub const MAX_HZ: u64 = 868_250_000;

    /// Create a new Frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u64) -> Option<Self> {
        if hz >= Self::MIN_HZ && hz <= Self::MAX_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Create a new Frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u64) -> Option<Self> {
        Self::from_hz(khz * 1000)
    }

    /// Create frequency at compile time (panics if out of range)
    #[must_use]
    pub const fn from_hz_const(hz: u64) -> Self {
        match Self::from_hz(hz) {
            Some(f) => f,
            None => panic!("Frequency out of range"),
        }
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u64 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u64 {
        self.0 / 1000
    }

    /// Get the frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz_f32(self) -> f32 {
        self.0 as f32 / 1_000_000.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// AFC engine status
///
/// `Pre*` states belong to the coarse acquisition sweep, `Post*` states
/// to fine tracking. `PreOverRange` and `PostOverRange` mean the carrier
/// could not be found near the requested frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AfcStatus {
    /// No tune attempt processed yet (also the post-retune reset state)
    #[default]
    Null,
    /// Acquisition sweep in progress, carrier not locked
    PreUnlock,
    /// Acquisition succeeded, handing off to tracking
    PreLock,
    /// Acquisition sweep exhausted without a debounced lock
    PreOverRange,
    /// Tracking in progress (debouncing or between corrections)
    PostProcess,
    /// Carrier locked with residual offset inside the best-lock window
    PostLock,
    /// Carrier lost after having been acquired
    PostUnlock,
    /// Cumulative correction pinned beyond the limit, reverted to baseline
    PostOverRange,
}

impl AfcStatus {
    /// Check if the engine is still in the coarse acquisition phase
    #[must_use]
    pub const fn acquiring(self) -> bool {
        matches!(self, Self::Null | Self::PreUnlock | Self::PreOverRange)
    }

    /// Check if the engine is settled or given up (no need for fast ticks)
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::PostLock | Self::PreOverRange | Self::PostOverRange)
    }

    /// Check if a usable carrier is currently being tracked
    #[must_use]
    pub const fn signal_present(self) -> bool {
        matches!(self, Self::PreLock | Self::PostProcess | Self::PostLock)
    }

    /// Check if the engine has declared the channel empty
    #[must_use]
    pub const fn no_signal(self) -> bool {
        matches!(self, Self::PreOverRange | Self::PostOverRange)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AfcStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Null => defmt::write!(f, "NULL"),
            Self::PreUnlock => defmt::write!(f, "PRE-UNLOCK"),
            Self::PreLock => defmt::write!(f, "PRE-LOCK"),
            Self::PreOverRange => defmt::write!(f, "PRE-OVER-RANGE"),
            Self::PostProcess => defmt::write!(f, "POST-PROCESS"),
            Self::PostLock => defmt::write!(f, "POST-LOCK"),
            Self::PostUnlock => defmt::write!(f, "POST-UNLOCK"),
            Self::PostOverRange => defmt::write!(f, "POST-OVER-RANGE"),
        }
    }
}

/// Signal quality bucket derived from the averaged SNR register
///
/// The raw SNR word is inverse to quality: a small value means a clean
/// carrier. Ordering is by quality, so `level >= SnrLevel::OkMinus`
/// reads as "at least watchable".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SnrLevel {
    /// Barely a carrier; widest loop bandwidths, strongest compensation
    VeryLow,
    /// Noisy but trackable
    Low,
    /// Watchable with artifacts
    OkMinus,
    /// Good
    OkPlus,
    /// Clean signal
    High,
}

impl SnrLevel {
    /// Classify an averaged raw SNR word into a quality bucket
    #[must_use]
    pub const fn from_raw_average(avg: u32) -> Self {
        if avg < 316 {
            Self::High
        } else if avg < 31_600 {
            Self::OkPlus
        } else if avg < 158_000 {
            Self::OkMinus
        } else if avg < 700_000 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SnrLevel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::VeryLow => defmt::write!(f, "SNR-VERY-LOW"),
            Self::Low => defmt::write!(f, "SNR-LOW"),
            Self::OkMinus => defmt::write!(f, "SNR-OK-"),
            Self::OkPlus => defmt::write!(f, "SNR-OK+"),
            Self::High => defmt::write!(f, "SNR-HIGH"),
        }
    }
}

/// Broadcast audio standard carried alongside the video carrier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AudioStandard {
    /// BTSC multichannel sound (System M markets)
    #[default]
    Btsc,
    /// A2 / Zweikanalton dual FM carriers
    A2,
    /// EIA-J dual FM carriers (Japan)
    Eiaj,
    /// NICAM digital stereo subcarrier
    Nicam,
}

/// Audio output routing selected on the demodulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Mono main carrier only
    #[default]
    Mono,
    /// Stereo (requires the stereo pilot / NICAM lock)
    Stereo,
    /// Secondary audio program (BTSC)
    Sap,
    /// Dual-language channel A
    DualA,
    /// Dual-language channel B
    DualB,
}

#[cfg(feature = "embedded")]
impl defmt::Format for OutputMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Mono => defmt::write!(f, "MONO"),
            Self::Stereo => defmt::write!(f, "STEREO"),
            Self::Sap => defmt::write!(f, "SAP"),
            Self::DualA => defmt::write!(f, "DUAL-A"),
            Self::DualB => defmt::write!(f, "DUAL-B"),
        }
    }
}

/// Pilot / subcarrier presence flags reported by the audio demodulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PilotFlags {
    /// Stereo pilot detected
    pub stereo: bool,
    /// SAP subcarrier detected
    pub sap: bool,
    /// NICAM frame sync achieved
    pub nicam: bool,
}

/// One sample of the two AGC-derived words watched by the
/// non-standard-signal detector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AgcReadings {
    /// Video AGC gain word (unsigned)
    pub gain: u16,
    /// Video AGC error word (signed)
    pub error: i16,
}

/// Loop-bandwidth and tracking-coefficient set written as one unit
///
/// Two fixed profiles exist: one for a usable carrier and one for a
/// buried carrier that needs the widest loop bandwidths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GainProfile {
    /// Video AGC bandwidth, typical path (two packed bytes)
    pub vagc_bw_typ: u16,
    /// Video AGC bandwidth, fast path
    pub vagc_bw_fast: u8,
    /// Carrier PLL proportional tracking coefficient
    pub pll_kp_track: u8,
    /// Carrier PLL integral tracking coefficient
    pub pll_ki_track: u8,
    /// AGC PLL proportional coefficient
    pub agc_kp: u8,
    /// AGC PLL integral coefficient
    pub agc_ki: u8,
}

impl GainProfile {
    /// Profile for a carrier clean enough to track tightly
    pub const USABLE: Self = Self {
        vagc_bw_typ: 0x1818,
        vagc_bw_fast: 0x10,
        pll_kp_track: 0x05,
        pll_ki_track: 0x0C,
        agc_kp: 0x6,
        agc_ki: 0xC,
    };

    /// Profile for a carrier at the noise floor
    pub const WEAK: Self = Self {
        vagc_bw_typ: 0x6F6F,
        vagc_bw_fast: 0x6F,
        pll_kp_track: 0x06,
        pll_ki_track: 0x0E,
        agc_kp: 0x8,
        agc_ki: 0xF,
    };

    /// Select the profile for a signal quality bucket
    #[must_use]
    pub const fn for_level(level: SnrLevel) -> Self {
        match level {
            SnrLevel::VeryLow => Self::WEAK,
            SnrLevel::Low => Self {
                // the fast path stays one notch wider while still noisy
                vagc_bw_fast: 0x18,
                ..Self::USABLE
            },
            _ => Self::USABLE,
        }
    }
}

/// AGC target window written when the quality bucket moves off-nominal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgcSetpoints {
    /// Upper setpoint
    pub upper: u8,
    /// Lower setpoint
    pub lower: u8,
}

impl AgcSetpoints {
    /// Setpoints for a buried carrier
    pub const WEAK: Self = Self { upper: 25, lower: 15 };

    /// Setpoints for a watchable carrier
    pub const NOMINAL: Self = Self { upper: 38, lower: 30 };

    /// Select setpoints for a quality bucket; `None` means leave the
    /// currently programmed window untouched
    #[must_use]
    pub const fn for_level(level: SnrLevel) -> Option<Self> {
        match level {
            SnrLevel::VeryLow => Some(Self::WEAK),
            SnrLevel::Low => None,
            _ => Some(Self::NOMINAL),
        }
    }
}

/// Sync-separator filter selection driven by signal quality
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncFilter {
    /// Narrowest filter, rides out heavy noise
    Narrow,
    /// Nominal filter
    Nominal,
    /// Widest filter for clean signals
    Wide,
}

impl SyncFilter {
    /// Select the filter for a quality bucket
    #[must_use]
    pub const fn for_level(level: SnrLevel) -> Self {
        match level {
            SnrLevel::VeryLow | SnrLevel::Low => Self::Narrow,
            SnrLevel::OkMinus => Self::Nominal,
            SnrLevel::OkPlus | SnrLevel::High => Self::Wide,
        }
    }

    /// Get the register encoding for this filter
    #[must_use]
    pub const fn register_value(self) -> u8 {
        match self {
            Self::Narrow => 0xF,
            Self::Nominal => 0xE,
            Self::Wide => 0x6,
        }
    }
}

/// Compensation profile for signals that stray from the broadcast standard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SignalProfile {
    /// Conforming signal, nominal filter coefficients
    #[default]
    Standard,
    /// Non-conforming signal, alternate coefficients and clamped carrier gain
    NonStandard,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SignalProfile {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Standard => defmt::write!(f, "STD"),
            Self::NonStandard => defmt::write!(f, "NON-STD"),
        }
    }
}
