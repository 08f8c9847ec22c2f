// state.rs - Shared application state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bingo_board::{EventDispatcher, EventFilter, LogSink, TracingSink};
use bingo_store::Store;

use crate::config::DaemonConfig;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    store: Mutex<Store>,
    pub config: DaemonConfig,
    pub events: EventDispatcher,
}

impl AppState {
    /// Wire up the store and the event sinks named in `config`.
    pub fn new(store: Store, config: DaemonConfig) -> Self {
        let mut events = EventDispatcher::new();
        events.add_sink(Box::new(TracingSink));
        if let Some(path) = &config.events.log_path {
            let filter = EventFilter::from_kinds(&config.events.log_kinds);
            events.subscribe(filter, Box::new(LogSink::new(path)));
        }
        Self {
            store: Mutex::new(store),
            config,
            events,
        }
    }

    pub fn shared(store: Store, config: DaemonConfig) -> SharedState {
        Arc::new(Self::new(store, config))
    }

    /// Exclusive access to the store. Never hold the guard across an await.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
