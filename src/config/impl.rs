use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call install_config() first.")
        .load_full()
}

/// Install the global configuration
///
/// Takes an already-resolved configuration (file, environment and CLI
/// overrides applied). Replaces the current value if one was installed.
///
/// # Examples
/// ```no_run
/// use linkmap::config::{StaticConfig, get_config, install_config};
/// install_config(StaticConfig::load());
/// assert_eq!(get_config().store.max_code_length, 9);
/// ```
pub fn install_config(config: StaticConfig) {
    let slot = CONFIG.get_or_init(|| ArcSwap::from_pointee(config.clone()));
    slot.store(Arc::new(config));
}
