//! Application context shared by the tools and transports.

use std::sync::Arc;

use crate::config::Settings;
use crate::ns::{NsClient, NsConfig, NsError};

/// Shared application state.
///
/// Built once at startup and cloned into every transport; the NS client
/// inside is reused for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    /// NS API client
    pub client: Arc<NsClient>,

    /// Settings the client was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new app state, constructing the NS client from the settings.
    pub fn new(settings: Settings) -> Result<Self, NsError> {
        let client = NsClient::new(NsConfig::from(&settings))?;
        Ok(Self::with_client(client, settings))
    }

    /// Create an app state around an existing client.
    pub fn with_client(client: NsClient, settings: Settings) -> Self {
        Self {
            client: Arc::new(client),
            settings: Arc::new(settings),
        }
    }
}
