//! Service container for dependency injection
//!
//! Wires settings and the HTTP transport into services.

use std::sync::Arc;

use crate::application::services::ManagementService;
use crate::config::Settings;
use crate::domain::Credentials;
use crate::infrastructure::traits::{HttpTransport, ReqwestTransport};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    transport: Arc<dyn HttpTransport>,

    credentials: Arc<Credentials>,
}

impl ServiceContainer {
    /// Create a new service container with the reqwest transport.
    ///
    /// Fails if the settings do not contain usable credentials.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_deps(settings, Arc::new(transport))
    }

    /// Create a service container with a custom transport (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn HttpTransport>) -> InfraResult<Self> {
        let credentials = Arc::new(settings.credentials()?);
        let settings = Arc::new(settings);

        Ok(Self {
            settings,
            transport,
            credentials,
        })
    }

    pub fn management(&self) -> ManagementService {
        ManagementService::new(Arc::clone(&self.transport), Arc::clone(&self.credentials))
    }
}
