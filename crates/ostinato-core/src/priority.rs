//! Best-effort real-time priority elevation for audio threads.
//!
//! A [`RealtimePriority`] holds the requested level and an ordered list of
//! [`PriorityStrategy`] implementations. [`request`](RealtimePriority::request)
//! tries them in order from the thread that wants the boost and stops at the
//! first success. Failing strategies are logged and skipped; running at
//! default priority is never an error for the caller.
//!
//! ```no_run
//! use ostinato_core::{EngineConfig, RealtimePriority};
//!
//! let config = EngineConfig::default();
//! std::thread::spawn(move || {
//!     RealtimePriority::from_config(&config).request();
//!     // ... audio loop ...
//! });
//! ```

use crate::compat::{Box, String, ToString, Vec};
use crate::config::{EngineConfig, MAX_PRIORITY_LEVEL};
use crate::{Error, Result};
use thread_priority::{ThreadPriority, ThreadPriorityValue};

/// One way of raising the calling thread's scheduling priority.
pub trait PriorityStrategy: Send + Sync {
    /// Short name used in logs and in [`PriorityOutcome::Elevated`].
    fn name(&self) -> &'static str;

    /// Raise the calling thread to `level` (already clamped to
    /// `1..=MAX_PRIORITY_LEVEL`).
    fn elevate(&self, level: u8) -> Result<()>;
}

/// What a [`RealtimePriority::request`] ended up doing. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityOutcome {
    /// A strategy succeeded.
    Elevated { strategy: &'static str },
    /// Level 0 was requested; nothing was attempted.
    Skipped,
    /// Every strategy failed; the thread keeps its default priority.
    Unchanged,
}

/// Raises priority through the OS thread scheduler (`thread-priority` crate).
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSchedulingStrategy;

impl PriorityStrategy for ThreadSchedulingStrategy {
    fn name(&self) -> &'static str {
        "thread-scheduler"
    }

    fn elevate(&self, level: u8) -> Result<()> {
        let value = ThreadPriorityValue::try_from(level)
            .map_err(|e| Error::Priority(format!("{:?}", e)))?;
        thread_priority::set_current_thread_priority(ThreadPriority::Crossplatform(value))
            .map_err(|e| Error::Priority(format!("{:?}", e)))
    }
}

/// Ordered list of priority strategies plus the requested level.
pub struct RealtimePriority {
    level: u8,
    strategies: Vec<Box<dyn PriorityStrategy>>,
}

impl RealtimePriority {
    /// Request `level` using the default strategy list.
    pub fn new(level: u8) -> Self {
        Self::empty(level).with_strategy(ThreadSchedulingStrategy)
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.rt_priority_level)
    }

    /// Request `level` with no strategies; add them with [`with_strategy`](Self::with_strategy).
    pub fn empty(level: u8) -> Self {
        Self {
            level,
            strategies: Vec::new(),
        }
    }

    /// Append a fallback strategy, tried after every one already present.
    pub fn with_strategy(mut self, strategy: impl PriorityStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    /// Try each strategy in order for the calling thread.
    pub fn request(&self) -> PriorityOutcome {
        if self.level == 0 {
            return PriorityOutcome::Skipped;
        }
        let level = self.level.clamp(1, MAX_PRIORITY_LEVEL);

        for strategy in &self.strategies {
            tracing::trace!(strategy = strategy.name(), level, "requesting RT priority");
            match strategy.elevate(level) {
                Ok(()) => {
                    tracing::debug!(strategy = strategy.name(), level, "RT priority set");
                    return PriorityOutcome::Elevated {
                        strategy: strategy.name(),
                    };
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), "failed to set RT priority: {}", e);
                }
            }
        }
        PriorityOutcome::Unchanged
    }
}

impl Default for RealtimePriority {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
