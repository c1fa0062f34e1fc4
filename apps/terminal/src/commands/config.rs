//! Configuration commands.

use crate::config::AppConfig;
use crate::state::AppState;

/// Returns the resolved configuration.
pub fn get_config<S>(state: &AppState<S>) -> AppConfig {
    state.config.clone()
}
