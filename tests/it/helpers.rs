use std::{sync::Arc, time::Duration};

use batepapo::{
    store::{DynStore, MemoryStore, SqliteStore},
    Clock, FixedClock, MessageLog, Reaper, Registry,
};

/// 2023-11-14T22:13:20Z
pub const T0: i64 = 1_700_000_000_000;

/// A room wired to a single store and a hand-driven clock.
pub struct Room {
    pub store: DynStore,
    pub clock: Arc<FixedClock>,
    pub registry: Registry,
    pub log: MessageLog,
}

impl Room {
    pub fn with_store(store: DynStore) -> Self {
        let clock = Arc::new(FixedClock::new(T0));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        Self {
            registry: Registry::new(store.clone(), dyn_clock.clone()),
            log: MessageLog::new(store.clone(), dyn_clock),
            store,
            clock,
        }
    }

    pub fn reaper(&self, timeout: Duration) -> Reaper {
        Reaper::new(self.store.clone(), self.clock.clone(), timeout)
    }

    /// Registers `name` with the clock set to `at`.
    pub async fn join_at(&self, name: &str, at: i64) {
        self.clock.set(at);
        self.registry.register(Some(name)).await.unwrap();
    }
}

pub fn memory_room() -> Room {
    Room::with_store(Arc::new(MemoryStore::new()))
}

pub async fn sqlite_store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:").await.unwrap()
}

pub async fn sqlite_room() -> Room {
    Room::with_store(Arc::new(sqlite_store().await))
}

pub fn draft(to: &str, text: &str, kind: &str) -> batepapo::Draft {
    batepapo::Draft {
        to: Some(to.to_owned()),
        text: Some(text.to_owned()),
        kind: Some(kind.to_owned()),
    }
}
