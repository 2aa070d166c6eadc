//! Tests for the shared domain types

use atv_control::types::{
    AfcStatus, AgcSetpoints, Frequency, GainProfile, SnrLevel, SyncFilter,
};

// ============================================================================
// Frequency
// ============================================================================

#[test]
fn frequency_accepts_tv_band() {
    let freq = Frequency::from_hz(471_250_000).unwrap();
    assert_eq!(freq.as_hz(), 471_250_000);
    assert_eq!(freq.as_khz(), 471_250);
}

#[test]
fn frequency_rejects_out_of_range() {
    assert!(Frequency::from_hz(Frequency::MIN_HZ - 1).is_none());
    assert!(Frequency::from_hz(Frequency::MAX_HZ + 1).is_none());
    assert!(Frequency::from_hz(Frequency::MIN_HZ).is_some());
    assert!(Frequency::from_hz(Frequency::MAX_HZ).is_some());
}

#[test]
fn frequency_from_khz() {
    let freq = Frequency::from_khz(48_250).unwrap();
    assert_eq!(freq.as_hz(), 48_250_000);
}

#[test]
fn frequency_mhz_view() {
    let freq = Frequency::from_hz(175_250_000).unwrap();
    let mhz = freq.as_mhz_f32();
    assert!((mhz - 175.25).abs() < 0.001);
}

#[test]
fn frequency_const_construction() {
    const FREQ: Frequency = Frequency::from_hz_const(855_250_000);
    assert_eq!(FREQ.as_khz(), 855_250);
}

// ============================================================================
// AfcStatus
// ============================================================================

#[test]
fn afc_status_default_is_null() {
    assert_eq!(AfcStatus::default(), AfcStatus::Null);
}

#[test]
fn afc_status_acquiring_set() {
    assert!(AfcStatus::Null.acquiring());
    assert!(AfcStatus::PreUnlock.acquiring());
    assert!(AfcStatus::PreOverRange.acquiring());

    assert!(!AfcStatus::PreLock.acquiring());
    assert!(!AfcStatus::PostProcess.acquiring());
    assert!(!AfcStatus::PostLock.acquiring());
    assert!(!AfcStatus::PostUnlock.acquiring());
    assert!(!AfcStatus::PostOverRange.acquiring());
}

#[test]
fn afc_status_stable_set() {
    // the states re-evaluated at the slow cadence
    assert!(AfcStatus::PostLock.is_stable());
    assert!(AfcStatus::PreOverRange.is_stable());
    assert!(AfcStatus::PostOverRange.is_stable());

    assert!(!AfcStatus::Null.is_stable());
    assert!(!AfcStatus::PreUnlock.is_stable());
    assert!(!AfcStatus::PreLock.is_stable());
    assert!(!AfcStatus::PostProcess.is_stable());
    assert!(!AfcStatus::PostUnlock.is_stable());
}

#[test]
fn afc_status_signal_sets() {
    assert!(AfcStatus::PostLock.signal_present());
    assert!(AfcStatus::PreLock.signal_present());
    assert!(!AfcStatus::PreOverRange.signal_present());

    assert!(AfcStatus::PreOverRange.no_signal());
    assert!(AfcStatus::PostOverRange.no_signal());
    assert!(!AfcStatus::PostLock.no_signal());
}

// ============================================================================
// SnrLevel
// ============================================================================

#[test]
fn snr_level_classification_boundaries() {
    assert_eq!(SnrLevel::from_raw_average(0), SnrLevel::High);
    assert_eq!(SnrLevel::from_raw_average(315), SnrLevel::High);
    assert_eq!(SnrLevel::from_raw_average(316), SnrLevel::OkPlus);
    assert_eq!(SnrLevel::from_raw_average(31_599), SnrLevel::OkPlus);
    assert_eq!(SnrLevel::from_raw_average(31_600), SnrLevel::OkMinus);
    assert_eq!(SnrLevel::from_raw_average(157_999), SnrLevel::OkMinus);
    assert_eq!(SnrLevel::from_raw_average(158_000), SnrLevel::Low);
    assert_eq!(SnrLevel::from_raw_average(699_999), SnrLevel::Low);
    assert_eq!(SnrLevel::from_raw_average(700_000), SnrLevel::VeryLow);
}

#[test]
fn snr_level_orders_by_quality() {
    assert!(SnrLevel::VeryLow < SnrLevel::Low);
    assert!(SnrLevel::Low < SnrLevel::OkMinus);
    assert!(SnrLevel::OkMinus < SnrLevel::OkPlus);
    assert!(SnrLevel::OkPlus < SnrLevel::High);
    assert!(SnrLevel::OkMinus >= SnrLevel::OkMinus);
}

// ============================================================================
// Register profiles
// ============================================================================

#[test]
fn gain_profile_per_level() {
    assert_eq!(GainProfile::for_level(SnrLevel::VeryLow), GainProfile::WEAK);
    assert_eq!(GainProfile::for_level(SnrLevel::OkMinus), GainProfile::USABLE);
    assert_eq!(GainProfile::for_level(SnrLevel::High), GainProfile::USABLE);

    // Low widens only the fast AGC path
    let low = GainProfile::for_level(SnrLevel::Low);
    assert_eq!(low.vagc_bw_fast, 0x18);
    assert_eq!(low.vagc_bw_typ, GainProfile::USABLE.vagc_bw_typ);
    assert_eq!(low.pll_kp_track, GainProfile::USABLE.pll_kp_track);
}

#[test]
fn agc_setpoints_per_level() {
    assert_eq!(
        AgcSetpoints::for_level(SnrLevel::VeryLow),
        Some(AgcSetpoints::WEAK)
    );
    // Low leaves the programmed window alone
    assert_eq!(AgcSetpoints::for_level(SnrLevel::Low), None);
    assert_eq!(
        AgcSetpoints::for_level(SnrLevel::OkMinus),
        Some(AgcSetpoints::NOMINAL)
    );
    assert_eq!(
        AgcSetpoints::for_level(SnrLevel::High),
        Some(AgcSetpoints::NOMINAL)
    );
}

#[test]
fn sync_filter_per_level() {
    assert_eq!(SyncFilter::for_level(SnrLevel::VeryLow), SyncFilter::Narrow);
    assert_eq!(SyncFilter::for_level(SnrLevel::Low), SyncFilter::Narrow);
    assert_eq!(SyncFilter::for_level(SnrLevel::OkMinus), SyncFilter::Nominal);
    assert_eq!(SyncFilter::for_level(SnrLevel::OkPlus), SyncFilter::Wide);
    assert_eq!(SyncFilter::for_level(SnrLevel::High), SyncFilter::Wide);
}

#[test]
fn sync_filter_register_encodings() {
    assert_eq!(SyncFilter::Narrow.register_value(), 0xF);
    assert_eq!(SyncFilter::Nominal.register_value(), 0xE);
    assert_eq!(SyncFilter::Wide.register_value(), 0x6);
}
