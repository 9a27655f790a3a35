use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock},
};

use arc_swap::ArcSwap;

use crate::operation::{names, OperationHandle, TransportOperation};

pub enum Resolution {
    Found(OperationHandle),
    NotFound,
}

/// Named operation slots a [`Client`](crate::Client) dispatches through.
///
/// Reads are lock-free: a call loads the slot's current handle and runs it, so swapping
/// a slot never blocks in-flight or new calls. The set of slots is fixed when the table
/// is built; only the handle stored in each slot can change.
pub struct OperationTable {
    slots: HashMap<&'static str, ArcSwap<OperationHandle>>,
}

static GLOBAL_TABLE: LazyLock<Arc<OperationTable>> =
    LazyLock::new(|| Arc::new(OperationTable::standard()));

impl OperationTable {
    /// The process-wide table shared by every client created with
    /// [`Client::connect`](crate::Client::connect).
    pub fn global() -> Arc<OperationTable> {
        Arc::clone(&GLOBAL_TABLE)
    }

    /// A table with every known operation forwarding to the transport.
    pub fn standard() -> Self {
        Self::builder().with_standard_operations().build()
    }

    pub fn builder() -> OperationTableBuilder {
        OperationTableBuilder::default()
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        match self.slots.get(name) {
            Some(slot) => Resolution::Found(Arc::clone(&**slot.load())),
            None => Resolution::NotFound,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.keys().copied()
    }

    /// Stores `handle` in the slot and returns the previous handle.
    /// Returns `None` without storing anything when the slot does not exist.
    pub fn replace(&self, name: &str, handle: OperationHandle) -> Option<OperationHandle> {
        let slot = self.slots.get(name)?;
        let previous = slot.swap(Arc::new(handle));
        Some(Arc::clone(&*previous))
    }

    /// Stores `handle` only if the slot still holds `expected`.
    pub fn replace_if(
        &self,
        name: &str,
        expected: &OperationHandle,
        handle: OperationHandle,
    ) -> bool {
        let Some(slot) = self.slots.get(name) else {
            return false;
        };

        let current = slot.load_full();
        if !Arc::ptr_eq(&*current, expected) {
            return false;
        }

        let previous = slot.compare_and_swap(&current, Arc::new(handle));
        Arc::ptr_eq(&*previous, &current)
    }
}

impl fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("OperationTable")
            .field("slots", &names)
            .finish()
    }
}

#[derive(Default)]
pub struct OperationTableBuilder {
    slots: HashMap<&'static str, OperationHandle>,
}

impl OperationTableBuilder {
    pub fn with_operation(mut self, name: &'static str, handle: OperationHandle) -> Self {
        self.slots.insert(name, handle);
        self
    }

    pub fn with_standard_operations(mut self) -> Self {
        let forward: OperationHandle = Arc::new(TransportOperation);
        for name in names::ALL {
            self.slots.insert(*name, Arc::clone(&forward));
        }
        self
    }

    /// Drops a slot, producing a table that lacks that entry point.
    pub fn without_operation(mut self, name: &str) -> Self {
        self.slots.remove(name);
        self
    }

    pub fn build(self) -> OperationTable {
        OperationTable {
            slots: self
                .slots
                .into_iter()
                .map(|(name, handle)| (name, ArcSwap::from_pointee(handle)))
                .collect(),
        }
    }
}
