use crate::bus::EventBus;
use crate::config::{Settings, StatePaths};
use crate::engine::{Engine, EngineSettings};
use crate::shared::random::Dice;
use crate::store::{FileSlot, MemorySlot, SharedStore, SnapshotSlot, Store};
use std::sync::Arc;

/// Composition root: one bus, one store and one engine wired together.
pub struct HumanCore {
    settings: Settings,
    engine: Engine,
}

impl HumanCore {
    pub fn open(paths: &StatePaths, settings: Settings) -> Self {
        let slot = FileSlot::in_state_root(paths);
        tracing::debug!(path = %slot.path().display(), "opening file-backed state");
        Self::assemble(Box::new(slot), settings, None)
    }

    pub fn in_memory(settings: Settings) -> Self {
        Self::assemble(Box::new(MemorySlot::new()), settings, None)
    }

    pub fn with_slot(
        slot: Box<dyn SnapshotSlot>,
        settings: Settings,
        dice: Option<Box<dyn Dice>>,
    ) -> Self {
        Self::assemble(slot, settings, dice)
    }

    fn assemble(
        slot: Box<dyn SnapshotSlot>,
        settings: Settings,
        dice: Option<Box<dyn Dice>>,
    ) -> Self {
        let bus = Arc::new(EventBus::new());
        let store = Store::open(slot, Arc::clone(&bus), settings.roster()).into_shared();
        let engine_settings = EngineSettings::from(&settings);
        let engine = match dice {
            Some(dice) => Engine::with_dice(store, bus, engine_settings, dice),
            None => Engine::new(store, bus, engine_settings),
        };
        Self { settings, engine }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn store(&self) -> &SharedStore {
        self.engine.store()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        self.engine.bus()
    }
}
