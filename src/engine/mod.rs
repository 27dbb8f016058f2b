//! Wall-clock driven simulation loop.
//!
//! A tick bumps the store's counter, publishes `TICK`, then gives every
//! worker on the roster one turn in roster order. Each turn reads the
//! current store state, asks [`agent::think`] for a decision and hands it
//! back to the store. The whole tick runs under the store lock.

mod ticker;

use crate::agent;
use crate::bus::{panic_message, Event, EventBus};
use crate::config::{Settings, MAX_SPEED, MIN_SPEED};
use crate::domain::LogLevel;
use crate::shared::errors::EngineError;
use crate::shared::random::{Dice, ThreadRngDice};
use crate::store::{self, DecisionOutcome, SharedStore};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use ticker::Ticker;

pub const DEFAULT_BASE_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub base_interval: Duration,
    pub speed: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_interval: DEFAULT_BASE_INTERVAL,
            speed: MIN_SPEED,
        }
    }
}

impl From<&Settings> for EngineSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            base_interval: settings.base_interval(),
            speed: settings.speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub tick: u64,
    pub applied: usize,
    pub rejected: usize,
}

struct TickCore {
    store: SharedStore,
    bus: Arc<EventBus>,
    roster: Mutex<Vec<String>>,
    dice: Mutex<Box<dyn Dice>>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TickCore {
    fn tick(&self) -> Result<TickReport, EngineError> {
        let mut store = store::lock(&self.store);
        let mut report = TickReport {
            tick: store.increment_tick(),
            ..TickReport::default()
        };
        self.bus.publish(Event::Tick);

        let roster = relock(&self.roster).clone();
        let mut dice = relock(&self.dice);
        for worker_id in &roster {
            let worker = store
                .worker(worker_id)
                .ok_or_else(|| EngineError::UnknownWorker {
                    worker_id: worker_id.clone(),
                })?;
            let decision = agent::think(worker, &store.state().workflows, &mut **dice);
            match store.apply_decision(worker_id, &decision)? {
                DecisionOutcome::Applied => report.applied += 1,
                DecisionOutcome::Rejected => report.rejected += 1,
            }
        }
        Ok(report)
    }

    // Failures become a CORE warning entry; the timer keeps running.
    fn tick_guarded(&self) -> Option<TickReport> {
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
            Ok(Ok(report)) => return Some(report),
            Ok(Err(err)) => err,
            Err(payload) => EngineError::Panicked(panic_message(payload.as_ref())),
        };
        tracing::error!(error = %failure, "engine tick failed; recovered");
        store::lock(&self.store).add_log_with_context(
            "CORE",
            LogLevel::Warning,
            "Engine loop exception recovered.",
            failure.to_string(),
        );
        None
    }
}

pub struct Engine {
    core: Arc<TickCore>,
    base_interval: Duration,
    speed: u32,
    ticker: Option<Ticker>,
}

impl Engine {
    pub fn new(store: SharedStore, bus: Arc<EventBus>, settings: EngineSettings) -> Self {
        Self::with_dice(store, bus, settings, Box::new(ThreadRngDice))
    }

    pub fn with_dice(
        store: SharedStore,
        bus: Arc<EventBus>,
        settings: EngineSettings,
        dice: Box<dyn Dice>,
    ) -> Self {
        let roster = roster_of(&store);
        let engine = Self {
            core: Arc::new(TickCore {
                store,
                bus,
                roster: Mutex::new(roster),
                dice: Mutex::new(dice),
            }),
            base_interval: settings.base_interval.max(Duration::from_millis(1)),
            speed: clamp_speed(settings.speed),
            ticker: None,
        };
        tracing::debug!(
            base_interval_ms = engine.base_interval.as_millis() as u64,
            speed = engine.speed,
            "engine constructed"
        );
        engine
    }

    pub fn store(&self) -> &SharedStore {
        &self.core.store
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.core.bus
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    pub fn interval(&self) -> Duration {
        self.base_interval / self.speed
    }

    pub fn roster(&self) -> Vec<String> {
        relock(&self.core.roster).clone()
    }

    /// Runs one tick on the calling thread. `None` means the tick failed and was recovered.
    pub fn tick(&self) -> Option<TickReport> {
        self.core.tick_guarded()
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.ticker.is_some() {
            return Ok(());
        }
        self.core.tick_guarded();
        let core = Arc::clone(&self.core);
        let ticker = Ticker::spawn(self.interval(), move || {
            core.tick_guarded();
        })
        .map_err(EngineError::Spawn)?;
        self.ticker = Some(ticker);

        self.core.bus.publish(Event::EngineInitialized);
        store::lock(&self.core.store).add_log(
            "CORE",
            LogLevel::Success,
            "Engine started. Heartbeat active.",
        );
        tracing::info!(
            interval_ms = self.interval().as_millis() as u64,
            speed = self.speed,
            "engine started"
        );
        Ok(())
    }

    pub fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };
        ticker.stop();
        store::lock(&self.core.store).add_log("CORE", LogLevel::Warning, "Engine stopped.");
        tracing::info!("engine stopped");
    }

    /// Applies a speed multiplier, clamped to 1..=10, and returns the one in effect.
    /// A running engine is restarted so exactly one timer runs at the new interval.
    pub fn set_speed(&mut self, speed: u32) -> Result<u32, EngineError> {
        let clamped = clamp_speed(speed);
        if clamped != speed {
            tracing::warn!(requested = speed, applied = clamped, "speed multiplier clamped");
        }
        self.speed = clamped;
        if self.is_running() {
            self.stop();
            self.start()?;
        }
        Ok(clamped)
    }

    /// Re-reads the worker roster from the store, e.g. after a full reset.
    pub fn sync_workers(&self) {
        let roster = roster_of(&self.core.store);
        tracing::debug!(workers = roster.len(), "worker roster synced");
        *relock(&self.core.roster) = roster;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn roster_of(store: &SharedStore) -> Vec<String> {
    store::lock(store)
        .state()
        .workers
        .iter()
        .map(|worker| worker.id.clone())
        .collect()
}

fn clamp_speed(speed: u32) -> u32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}
