//! Configuration and constants tests
//!
//! Sanity checks that the default thresholds and periods are mutually
//! consistent.

use atv_control::config::*;
use atv_control::types::Frequency;

// ============================================================================
// AFC timing
// ============================================================================

#[test]
fn fast_period_is_faster_than_slow() {
    assert!(AFC_FAST_PERIOD_MS < AFC_SLOW_PERIOD_MS);
}

#[test]
fn initial_delay_covers_demod_settling() {
    // roughly one second of fast ticks before measurements are trusted
    assert_eq!(INITIAL_DELAY_TICKS * AFC_FAST_PERIOD_MS as u32, 1000);
}

#[test]
fn monitor_runs_at_the_slow_cadence() {
    assert_eq!(MONITOR_PERIOD_MS, AFC_SLOW_PERIOD_MS);
}

// ============================================================================
// Acquisition sweep
// ============================================================================

#[test]
fn candidate_table_starts_at_baseline() {
    assert_eq!(CANDIDATE_OFFSETS_KHZ[0], 0);
}

#[test]
fn candidate_table_spirals_in_pairs() {
    // entries pair up as -x/+x with growing magnitude
    for pair in 0..5 {
        let neg = CANDIDATE_OFFSETS_KHZ[1 + 2 * pair];
        let pos = CANDIDATE_OFFSETS_KHZ[2 + 2 * pair];
        assert_eq!(neg, -pos);
        assert_eq!(pos, 500 * (pair as i32 + 1));
    }
}

#[test]
fn sweep_limit_inside_table() {
    assert!(CANDIDATE_SWEEP_LIMIT < CANDIDATE_OFFSETS_KHZ.len());
}

#[test]
fn afc_limit_covers_the_sweep() {
    // every trial offset the sweep can actually apply stays correctable
    let widest = CANDIDATE_OFFSETS_KHZ[..CANDIDATE_SWEEP_LIMIT]
        .iter()
        .map(|khz| khz.abs())
        .max()
        .unwrap();
    assert!(AFC_LIMIT_KHZ > widest);
}

#[test]
fn best_lock_window_below_first_trial() {
    assert!(BEST_LOCK_KHZ < CANDIDATE_OFFSETS_KHZ[2]);
}

// ============================================================================
// Monitor thresholds
// ============================================================================

#[test]
fn overmod_thresholds_form_hysteresis() {
    assert!(OVERMOD_EXIT_THRESHOLD < OVERMOD_ENTER_THRESHOLD);
}

#[test]
fn overmod_decision_aligns_with_sampling() {
    assert_eq!(OVERMOD_DECISION_TICKS % OVERMOD_SAMPLE_INTERVAL, 0);
}

#[test]
fn non_std_thresholds_form_hysteresis() {
    assert!(NON_STD_GAIN_DIFF_LOW < NON_STD_GAIN_DIFF_HIGH);
    assert!(NON_STD_ERROR_DIFF_LOW < NON_STD_ERROR_DIFF_HIGH);
}

#[test]
fn non_std_window_spans_seconds() {
    // 50 ticks at the 100 ms cadence = 5 s observation per decision
    assert_eq!(NON_STD_WINDOW_TICKS as u64 * MONITOR_PERIOD_MS, 5000);
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn default_frequency_is_tunable() {
    assert!(Frequency::from_hz(DEFAULT_FREQUENCY_HZ).is_some());
}

#[test]
fn afc_config_defaults_match_constants() {
    let config = AfcConfig::default();
    assert_eq!(config.afc_limit_khz, AFC_LIMIT_KHZ);
    assert_eq!(config.fast_period_ms, AFC_FAST_PERIOD_MS);
    assert_eq!(config.slow_period_ms, AFC_SLOW_PERIOD_MS);
    assert_eq!(config.wave_debounce_ticks, WAVE_DEBOUNCE_TICKS);
    assert_eq!(config.initial_delay_ticks, INITIAL_DELAY_TICKS);
    assert_eq!(config.no_signal_giveup_ticks, NO_SIGNAL_GIVEUP_TICKS);
    assert_eq!(config.best_lock_khz, BEST_LOCK_KHZ);
}

#[test]
fn monitor_config_defaults_match_constants() {
    let config = MonitorConfig::default();
    assert_eq!(config.period_ms, MONITOR_PERIOD_MS);
    assert_eq!(config.non_std_window, NON_STD_WINDOW_TICKS);
    assert_eq!(config.non_std_entry_delay, NON_STD_ENTRY_DELAY_TICKS);
    assert_eq!(config.overmod_enter, OVERMOD_ENTER_THRESHOLD);
    assert_eq!(config.overmod_exit, OVERMOD_EXIT_THRESHOLD);
    assert!(config.snr_tracking);
    assert!(config.overmodulation);
    assert!(config.output_mode);
    assert!(config.non_std_detection);
}

#[test]
fn monitor_sum_thresholds_default_permissive() {
    // spreads decide alone until a platform tightens the activity sums
    let config = MonitorConfig::default();
    assert_eq!(config.gain_sum_high, 0);
    assert_eq!(config.error_sum_high, 0);
    assert_eq!(config.gain_sum_low, i32::MAX);
    assert_eq!(config.error_sum_low, i32::MAX);
}

#[test]
fn config_builders_override_single_fields() {
    let config = AfcConfig::default()
        .with_afc_limit_khz(1500)
        .with_wave_debounce_ticks(2);
    assert_eq!(config.afc_limit_khz, 1500);
    assert_eq!(config.wave_debounce_ticks, 2);
    // untouched fields keep their defaults
    assert_eq!(config.best_lock_khz, BEST_LOCK_KHZ);

    let config = MonitorConfig::default()
        .with_period_ms(50)
        .with_non_std_window(10);
    assert_eq!(config.period_ms, 50);
    assert_eq!(config.non_std_window, 10);
    assert!(config.snr_tracking);
}
