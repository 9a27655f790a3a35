use std::sync::Arc;

use tracing::{debug, warn};
use vector_client::{OperationHandle, OperationTable, Resolution};

use crate::{emitter::Emitter, registry::OperationDescriptor};

/// One slot this manager replaced.
#[derive(Clone)]
pub struct PatchRecord {
    pub target: &'static str,
    pub original: OperationHandle,
    pub wrapped: OperationHandle,
    pub applied: bool,
}

impl std::fmt::Debug for PatchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchRecord")
            .field("target", &self.target)
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

/// Outcome of [`PatchManager::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub patched: Vec<&'static str>,
    /// Already patched by this manager or already holding an instrumented handle.
    pub skipped: Vec<&'static str>,
    /// Not present on the table.
    pub missing: Vec<&'static str>,
}

impl PatchReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Applies and reverts the registry's wrapping on one operation table.
#[derive(Debug)]
pub struct PatchManager {
    table: Arc<OperationTable>,
    records: Vec<PatchRecord>,
}

impl PatchManager {
    pub fn new(table: Arc<OperationTable>) -> Self {
        Self {
            table,
            records: Vec::new(),
        }
    }

    pub fn table(&self) -> &Arc<OperationTable> {
        &self.table
    }

    pub fn records(&self) -> &[PatchRecord] {
        &self.records
    }

    pub fn is_patched(&self, target: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.applied && record.target == target)
    }

    pub fn apply(
        &mut self,
        registry: &'static [OperationDescriptor],
        emitter: &Emitter,
    ) -> PatchReport {
        let mut report = PatchReport::default();

        for descriptor in registry {
            let target = descriptor.qualified_name;
            if self.is_patched(target) {
                report.skipped.push(target);
                continue;
            }

            let original = match self.table.resolve(target) {
                Resolution::Found(handle) => handle,
                Resolution::NotFound => {
                    warn!(operation = target, "operation not found on client, skipping");
                    report.missing.push(target);
                    continue;
                }
            };

            if original.is_instrumented() {
                debug!(operation = target, "operation already instrumented, skipping");
                report.skipped.push(target);
                continue;
            }

            let wrapped = emitter.wrap(Arc::clone(&original), descriptor);
            if !self
                .table
                .replace_if(target, &original, Arc::clone(&wrapped))
            {
                warn!(operation = target, "operation changed while patching, skipping");
                report.skipped.push(target);
                continue;
            }

            debug!(operation = target, "operation patched");
            self.records.push(PatchRecord {
                target,
                original,
                wrapped,
                applied: true,
            });
            report.patched.push(target);
        }

        report
    }

    /// Restores every patched slot that still holds this manager's wrapper and drops all
    /// records. Returns the records as they were when reverted.
    pub fn revert(&mut self) -> Vec<PatchRecord> {
        let mut reverted = Vec::with_capacity(self.records.len());

        for mut record in self.records.drain(..) {
            if !record.applied {
                continue;
            }

            let restored =
                self.table
                    .replace_if(record.target, &record.wrapped, Arc::clone(&record.original));
            if restored {
                debug!(operation = record.target, "operation restored");
            } else {
                warn!(
                    operation = record.target,
                    "operation was replaced by someone else, leaving it in place"
                );
            }

            record.applied = false;
            reverted.push(record);
        }

        reverted
    }
}
