use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const MANAGED_VARS: [&str; 3] = ["QDIAG_CONFIG_HOME", "QDIAG_API_BASE", "QDIAG_API_KEY"];

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Holds the process-wide env lock and restores the managed variables on drop.
pub struct QdiagEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl QdiagEnvGuard {
    /// Point the config home at `path` and clear the API overrides.
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = MANAGED_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        let guard = Self {
            previous,
            _lock: lock,
        };
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("QDIAG_CONFIG_HOME", path);
            std::env::remove_var("QDIAG_API_BASE");
            std::env::remove_var("QDIAG_API_KEY");
        }
        guard
    }

    pub fn set(&self, name: &str, value: &str) {
        // SAFETY: the guard holds the global env lock.
        unsafe {
            std::env::set_var(name, value);
        }
    }
}

impl Drop for QdiagEnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}
