//! The engine service object and its start/stop bracket.
//!
//! An [`Engine`] wraps one [`LanguageEngine`] backend. It must be started
//! before any processor can take a lease and cannot be stopped while leases
//! are outstanding. Each engine enforces its own bracket; there is no
//! process-wide state.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_foundation::{Error, LifecycleViolation, Result};

use crate::backend::LanguageEngine;
use crate::pattern::PatternEngine;

/// Running flag and lease count, always read and written together.
#[derive(Default)]
struct Bracket {
    running: bool,
    live: usize,
}

struct EngineInner {
    backend: Box<dyn LanguageEngine>,
    bracket: Mutex<Bracket>,
}

impl EngineInner {
    fn bracket(&self) -> MutexGuard<'_, Bracket> {
        self.bracket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A language engine with an explicit lifecycle.
///
/// Cloning shares the same engine.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Wraps `backend`. The engine starts stopped.
    pub fn new(backend: impl LanguageEngine + 'static) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                backend: Box::new(backend),
                bracket: Mutex::new(Bracket::default()),
            }),
        }
    }

    /// An engine backed by [`PatternEngine`].
    #[must_use]
    pub fn pattern() -> Self {
        Self::new(PatternEngine::new())
    }

    /// Starts the engine.
    pub fn start(&self) -> Result<()> {
        let mut bracket = self.inner.bracket();
        if bracket.running {
            return Err(Error::lifecycle(LifecycleViolation::EngineAlreadyStarted));
        }
        bracket.running = true;
        Ok(())
    }

    /// Stops the engine. Fails while any lease is live, leaving the engine
    /// running.
    pub fn stop(&self) -> Result<()> {
        let mut bracket = self.inner.bracket();
        if !bracket.running {
            return Err(Error::lifecycle(LifecycleViolation::EngineNotRunning));
        }
        if bracket.live > 0 {
            return Err(Error::lifecycle(LifecycleViolation::ProcessorsLive(
                bracket.live,
            )));
        }
        bracket.running = false;
        Ok(())
    }

    /// Returns true between `start` and `stop`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.bracket().running
    }

    /// Number of outstanding leases.
    #[must_use]
    pub fn live_processors(&self) -> usize {
        self.inner.bracket().live
    }

    /// Takes a lease for one processor. Fails unless running.
    pub fn lease(&self) -> Result<EngineLease> {
        let mut bracket = self.inner.bracket();
        if !bracket.running {
            return Err(Error::lifecycle(LifecycleViolation::EngineNotRunning));
        }
        bracket.live += 1;
        Ok(EngineLease {
            inner: Arc::clone(&self.inner),
        })
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("running", &self.is_running())
            .field("live", &self.live_processors())
            .finish_non_exhaustive()
    }
}

/// A processor's hold on a running engine.
///
/// Dropping the lease releases it.
pub struct EngineLease {
    inner: Arc<EngineInner>,
}

impl EngineLease {
    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &dyn LanguageEngine {
        self.inner.backend.as_ref()
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        let mut bracket = self.inner.bracket();
        bracket.live = bracket.live.saturating_sub(1);
    }
}

impl fmt::Debug for EngineLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineLease").finish_non_exhaustive()
    }
}
