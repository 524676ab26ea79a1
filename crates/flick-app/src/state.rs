use std::sync::Arc;
use std::time::Duration;

use flick_dal::Pool;
use flick_types::general::Environment;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool, app_config }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Deadline for a single database operation
    pub query_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            environment: Environment::Development,
            query_timeout: Duration::from_secs(3),
        }
    }
}
