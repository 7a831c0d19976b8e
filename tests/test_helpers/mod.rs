//! Scoped `TASKBOARD_*` environment for integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Every variable the client configuration reads.
pub const CONFIG_VARS: [&str; 5] = [
    "TASKBOARD_API_URL",
    "TASKBOARD_TIMEOUT_SECS",
    "TASKBOARD_TOKEN_DIR",
    "TASKBOARD_LOG_FILTER",
    "TASKBOARD_LOG_JSON",
];

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Holds the process environment for one test.
///
/// All configuration variables are unset except the given overrides; the
/// prior values come back on drop.
pub struct EnvVarGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets `overrides` and clears every other configuration variable.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let saved = CONFIG_VARS
            .iter()
            .map(|key| (*key, env::var_os(key)))
            .collect();

        for key in CONFIG_VARS {
            let value = overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| *value);
            unsafe {
                // SAFETY: ENV_LOCK serializes every environment change made by tests.
                match value {
                    Some(found) => env::set_var(key, found),
                    None => env::remove_var(key),
                }
            }
        }

        Self { saved, _lock: lock }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            unsafe {
                // SAFETY: the guard still holds ENV_LOCK while restoring.
                match value {
                    Some(previous) => env::set_var(key, previous),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
