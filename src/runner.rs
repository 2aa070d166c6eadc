//! Async schedulers for the control loops
//!
//! Each engine runs as a single periodic task: the runner loop takes the
//! engine mutex, ticks, then sleeps for the engine's current period.
//! Holding the same mutex from the lifecycle methods gives synchronous
//! cancellation: once `disable()` returns, no tick is executing and
//! none will start. A `Signal` wakes the loop early on enable and
//! retune edges so a disabled loop parks without polling.

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

use crate::afc::AfcEngine;
use crate::frontend::{Demodulator, Tuner};
use crate::monitor::MonitorService;
use crate::types::{AfcStatus, Frequency};

/// Shared handle driving one [`AfcEngine`] from a dedicated task
///
/// Construct one controller per tuned frontend, keep it in a `static`
/// (e.g. via `static_cell`), spawn a task running [`AfcController::run`]
/// and call the lifecycle methods from anywhere else.
pub struct AfcController<D: Demodulator, T: Tuner> {
    engine: Mutex<CriticalSectionRawMutex, AfcEngine<D, T>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl<D: Demodulator, T: Tuner> AfcController<D, T> {
    /// Wrap an engine for shared task-driven use
    #[must_use]
    pub const fn new(engine: AfcEngine<D, T>) -> Self {
        Self {
            engine: Mutex::new(engine),
            wake: Signal::new(),
        }
    }

    /// Drive the engine forever at its adaptive period
    ///
    /// Ticks are serialized by the engine mutex; the sleep between ticks
    /// is the only suspension. While the engine is disabled the loop
    /// parks on the wake signal instead of re-arming the timer.
    pub async fn run(&self) -> ! {
        loop {
            let period = {
                let mut engine = self.engine.lock().await;
                if engine.is_enabled() {
                    let before = engine.status();
                    engine.tick();
                    let after = engine.status();
                    if before != after {
                        defmt::debug!("afc: {} -> {}", before, after);
                    }
                    Some(engine.period_ms())
                } else {
                    None
                }
            };

            match period {
                Some(ms) => {
                    // wake early if a lifecycle edge arrives mid-sleep
                    select(Timer::after(Duration::from_millis(ms)), self.wake.wait()).await;
                }
                None => self.wake.wait().await,
            }
        }
    }

    /// Enable the engine and wake the runner
    pub async fn enable(&self) {
        self.engine.lock().await.enable();
        self.wake.signal(());
    }

    /// Disable the engine
    ///
    /// Acquiring the engine mutex guarantees no tick is mid-flight when
    /// this returns, and the runner will not start another.
    pub async fn disable(&self) {
        self.engine.lock().await.disable();
    }

    /// Process a fresh tune request and wake the runner
    pub async fn retune(&self, requested: Frequency) {
        self.engine.lock().await.retune(requested);
        self.wake.signal(());
    }

    /// Read the current status
    pub async fn status(&self) -> AfcStatus {
        self.engine.lock().await.status()
    }

    /// Read the cumulative correction, in kHz
    pub async fn cumulative_offset_khz(&self) -> i32 {
        self.engine.lock().await.cumulative_offset_khz()
    }

    /// Read the residual carrier offset, if a usable carrier is present
    pub async fn afc_offset_khz(&self) -> Option<i32> {
        self.engine.lock().await.afc_offset_khz()
    }
}

/// Shared handle driving one [`MonitorService`] from a dedicated task
///
/// Same shape as [`AfcController`] with a fixed tick period.
pub struct MonitorController<D: Demodulator> {
    service: Mutex<CriticalSectionRawMutex, MonitorService<D>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl<D: Demodulator> MonitorController<D> {
    /// Wrap a monitor service for shared task-driven use
    #[must_use]
    pub const fn new(service: MonitorService<D>) -> Self {
        Self {
            service: Mutex::new(service),
            wake: Signal::new(),
        }
    }

    /// Drive the monitor forever at its fixed period
    pub async fn run(&self) -> ! {
        loop {
            let period = {
                let mut service = self.service.lock().await;
                if service.is_enabled() {
                    service.tick();
                    Some(service.period_ms())
                } else {
                    None
                }
            };

            match period {
                Some(ms) => {
                    select(Timer::after(Duration::from_millis(ms)), self.wake.wait()).await;
                }
                None => self.wake.wait().await,
            }
        }
    }

    /// Enable the service and wake the runner
    pub async fn enable(&self) {
        self.service.lock().await.enable();
        self.wake.signal(());
    }

    /// Disable the service
    ///
    /// Synchronous in the same sense as [`AfcController::disable`].
    pub async fn disable(&self) {
        self.service.lock().await.disable();
    }

    /// Read the last observed carrier lock condition
    pub async fn carrier_locked(&self) -> bool {
        self.service.lock().await.carrier_locked()
    }

    /// Read the current SNR quality percentage
    pub async fn snr_percent(&self) -> u8 {
        self.service.lock().await.snr().percent()
    }
}
