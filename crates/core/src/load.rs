use tracing::{debug, info};

use crate::domain::CountryRecord;
use crate::normalize::Normalized;

/// Identifies one dataset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Tracks whether a late fetch result may still be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadGuard {
    generation: u64,
    mounted: bool,
}

impl Default for LoadGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadGuard {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            mounted: true,
        }
    }

    /// Starts a new request. Results of earlier tickets are discarded.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub const fn accepts(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.0 == self.generation
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn teardown(&mut self) {
        self.mounted = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Loading,
    /// Fetch failed. Page-fatal, shown as a single error.
    Failed(String),
    Ready(Normalized),
}

/// The page's dataset plus the guard that protects it from stale results.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSlot {
    guard: LoadGuard,
    state: PageState,
}

impl Default for DatasetSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetSlot {
    pub const fn new() -> Self {
        Self {
            guard: LoadGuard::new(),
            state: PageState::Loading,
        }
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.state = PageState::Loading;
        self.guard.begin()
    }

    /// Applies a finished load. Returns `false` when the result is stale or
    /// the view was torn down.
    pub fn apply(&mut self, ticket: LoadTicket, result: Result<Normalized, String>) -> bool {
        if !self.guard.accepts(ticket) {
            debug!(?ticket, mounted = self.guard.is_mounted(), "discarding stale dataset");
            return false;
        }

        self.state = match result {
            Ok(normalized) => {
                info!(
                    countries = normalized.records.len(),
                    dropped = normalized.dropped.len(),
                    "dataset ready"
                );
                PageState::Ready(normalized)
            }
            Err(message) => PageState::Failed(message),
        };
        true
    }

    pub fn teardown(&mut self) {
        self.guard.teardown();
    }

    pub const fn state(&self) -> &PageState {
        &self.state
    }

    pub const fn is_mounted(&self) -> bool {
        self.guard.is_mounted()
    }

    pub fn records(&self) -> &[CountryRecord] {
        match &self.state {
            PageState::Ready(normalized) => &normalized.records,
            PageState::Loading | PageState::Failed(_) => &[],
        }
    }
}
