//! API server state

use std::sync::Arc;

use crate::storage::EmployeeStore;

/// API server state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Store shared by all requests for the life of the process
    pub store: Arc<dyn EmployeeStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store, as reported by `/health`
    pub fn backend(&self) -> &'static str {
        self.store.backend_name()
    }
}
