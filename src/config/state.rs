// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::i18n::{Catalog, UserTable};

/// Application state
pub struct AppState {
    pub config: Config,
    pub users: UserTable,
    pub catalog: Catalog,
    /// Copy of `logging.access_log`, checked on every request
    pub access_log: bool,
}

impl AppState {
    pub fn new(config: &Config, users: UserTable) -> Self {
        Self {
            config: config.clone(),
            users,
            catalog: Catalog,
            access_log: config.logging.access_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_log_flag_follows_config() {
        let mut config = {
            let _lock = crate::config::lock_env();
            Config::load_from("does-not-exist/i18n-login").expect("defaults load")
        };
        assert!(AppState::new(&config, UserTable::builtin()).access_log);

        config.logging.access_log = false;
        let state = AppState::new(&config, UserTable::builtin());
        assert!(!state.access_log);
        assert_eq!(state.users.len(), 4);
    }
}
