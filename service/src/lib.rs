use config::Config;
use sse::StreamSettings;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        Self { config: app_config }
    }

    pub fn service_name(&self) -> &str {
        self.config.service_name()
    }

    pub fn stream_settings(&self) -> StreamSettings {
        self.config.stream_settings()
    }
}
