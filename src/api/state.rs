//! Application state for the attendance ledger API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::ledger::{AttendanceLedger, Directory, InMemoryBillingLedger};

/// Shared application state.
///
/// Holds the ledger service and the billing ledger it writes to, so billing
/// records can be read back over HTTP.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<AttendanceLedger>,
    billing: Arc<InMemoryBillingLedger>,
}

impl AppState {
    /// Creates the application state from loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let billing = Arc::new(InMemoryBillingLedger::new());
        let directory = Directory::new(config.config());
        Self {
            ledger: Arc::new(AttendanceLedger::new(directory, billing.clone())),
            billing,
        }
    }

    /// Returns the ledger service.
    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    /// Returns the billing ledger.
    pub fn billing(&self) -> &InMemoryBillingLedger {
        &self.billing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
