//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::ConnectionManager;
use crate::hub::HubHandle;
use helpdesk_common::AppConfig;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Queue into the relay hub task
    hub: HubHandle,
    /// Open WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(
        hub: HubHandle,
        connection_manager: Arc<ConnectionManager>,
        config: AppConfig,
    ) -> Self {
        Self {
            hub,
            connection_manager,
            config: Arc::new(config),
        }
    }

    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
