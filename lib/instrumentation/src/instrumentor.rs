use std::sync::{Arc, LazyLock};

use opentelemetry::{global, metrics::Meter, InstrumentationScope};
use parking_lot::Mutex;
use tracing::{debug, info};
use vector_client::OperationTable;
use vector_instrumentation_config::{ConfigError, InstrumentationConfig};

use crate::{
    capture::CaptureConfig,
    emitter::Emitter,
    patch::{PatchManager, PatchReport},
    registry::REGISTRY,
    spans::TARGET_NAME,
};

#[derive(Debug, thiserror::Error)]
pub enum InstrumentationError {
    #[error("failed to load instrumentation configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Options for [`Instrumentor::instrument`]. Without a config the environment (and the
/// optional config file it points to) is read; without a meter the global meter provider
/// is used.
#[derive(Debug, Default, Clone)]
pub struct InstrumentOptions {
    pub config: Option<InstrumentationConfig>,
    pub meter: Option<Meter>,
}

impl InstrumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: InstrumentationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_meter(mut self, meter: Meter) -> Self {
        self.meter = Some(meter);
        self
    }
}

struct Session {
    capture: CaptureConfig,
    patches: PatchManager,
    report: PatchReport,
}

enum State {
    Uninstrumented,
    Instrumented(Session),
}

/// Instruments every registered operation of one [`OperationTable`].
pub struct Instrumentor {
    table: Arc<OperationTable>,
    state: Mutex<State>,
}

static GLOBAL_INSTRUMENTOR: LazyLock<Instrumentor> =
    LazyLock::new(|| Instrumentor::new(OperationTable::global()));

impl Instrumentor {
    pub fn new(table: Arc<OperationTable>) -> Self {
        Self {
            table,
            state: Mutex::new(State::Uninstrumented),
        }
    }

    /// The instrumentor bound to [`OperationTable::global`].
    pub fn global() -> &'static Instrumentor {
        &GLOBAL_INSTRUMENTOR
    }

    pub fn table(&self) -> &Arc<OperationTable> {
        &self.table
    }

    pub fn instrument(&self, options: InstrumentOptions) -> Result<(), InstrumentationError> {
        let mut state = self.state.lock();
        if matches!(*state, State::Instrumented(_)) {
            debug!("already instrumented, ignoring");
            return Ok(());
        }

        let capture = match &options.config {
            Some(config) => CaptureConfig::from_config(config),
            None => CaptureConfig::from_env()?,
        };
        let meter = options.meter.unwrap_or_else(default_meter);

        let emitter = Emitter::new(capture.clone(), Some(&meter));
        let mut patches = PatchManager::new(Arc::clone(&self.table));
        let report = patches.apply(REGISTRY, &emitter);

        info!(
            patched = report.patched.len(),
            missing = report.missing.len(),
            capture_content = capture.capture_content,
            "vector client instrumented"
        );

        *state = State::Instrumented(Session {
            capture,
            patches,
            report,
        });
        Ok(())
    }

    pub fn uninstrument(&self) {
        let mut state = self.state.lock();
        let previous = std::mem::replace(&mut *state, State::Uninstrumented);
        let State::Instrumented(mut session) = previous else {
            debug!("not instrumented, ignoring");
            return;
        };

        let reverted = session.patches.revert();
        info!(reverted = reverted.len(), "vector client uninstrumented");
    }

    pub fn is_instrumented(&self) -> bool {
        matches!(*self.state.lock(), State::Instrumented(_))
    }

    /// The patch outcome of the current session.
    pub fn patch_report(&self) -> Option<PatchReport> {
        match &*self.state.lock() {
            State::Instrumented(session) => Some(session.report.clone()),
            State::Uninstrumented => None,
        }
    }

    /// The capture policy of the current session.
    pub fn capture_config(&self) -> Option<CaptureConfig> {
        match &*self.state.lock() {
            State::Instrumented(session) => Some(session.capture.clone()),
            State::Uninstrumented => None,
        }
    }
}

impl std::fmt::Debug for Instrumentor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrumentor")
            .field("table", &self.table)
            .field("instrumented", &self.is_instrumented())
            .finish()
    }
}

fn default_meter() -> Meter {
    let scope = InstrumentationScope::builder(TARGET_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .build();
    global::meter_with_scope(scope)
}

/// Instruments the process-wide operation table.
pub fn instrument(options: InstrumentOptions) -> Result<(), InstrumentationError> {
    Instrumentor::global().instrument(options)
}

/// Restores the process-wide operation table.
pub fn uninstrument() {
    Instrumentor::global().uninstrument()
}
