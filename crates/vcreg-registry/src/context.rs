//! Per-message execution context: the store handle for this operation,
//! the host-supplied block info, and the events emitted so far.

use serde::{Deserialize, Serialize};

use vcreg_core::Timestamp;
use vcreg_store::KvStore;

use crate::events::Event;

/// Block data supplied by the host for the current state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block height.
    pub height: u64,
    /// Block time. The only clock the registry reads.
    pub time: Timestamp,
    /// Hash of the transaction carrying the message.
    pub tx_hash: String,
}

/// Execution context of one message.
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    block: BlockInfo,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    /// Context over `store` for a message in `block`.
    pub fn new(store: &'a mut dyn KvStore, block: BlockInfo) -> Self {
        Self {
            store,
            block,
            events: Vec::new(),
        }
    }

    /// Read access to the store.
    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    /// Write access to the store.
    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    /// Current block.
    pub fn block(&self) -> &BlockInfo {
        &self.block
    }

    /// Block time.
    pub fn now(&self) -> Timestamp {
        self.block.time
    }

    /// Record an event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the context, returning its events.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
