//! Shared test utilities for integration tests
//!
//! Live-server tests run only when `CLOUDANT_TEST_URL` is set, with optional
//! `CLOUDANT_TEST_USERNAME` / `CLOUDANT_TEST_PASSWORD`. Environment-mutating
//! tests serialize through [`with_env`].

use cloudant_link::CloudantClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Variables the config loader and logging setup read; captured and restored
/// around each test.
const ENV_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "CLOUDANT_URL",
    "CLOUDANT_USERNAME",
    "CLOUDANT_PASSWORD",
    "CLOUDANT_CONNECT_TIMEOUT_SECS",
    "CLOUDANT_REQUEST_TIMEOUT_SECS",
    "CLOUDANT_LOGGING__LEVEL",
    "CLOUDANT_LOG",
    "CLOUDANT_LOG_FORMAT",
    "CLOUDANT_LOG_OUTPUT",
];

struct EnvState(Vec<(&'static str, Option<String>)>);

impl EnvState {
    fn capture() -> Self {
        EnvState(
            ENV_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        )
    }

    fn restore(self) {
        for (name, value) in self.0 {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with config-related variables cleared and `XDG_CONFIG_HOME`
/// pointing into `test_dir`, restoring the environment afterwards.
pub fn with_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    for name in ENV_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());
    std::env::set_var("HOME", test_dir.path().join("home"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Client for the live test server, or `None` when none is configured.
pub fn live_client() -> Option<CloudantClient> {
    let url = std::env::var("CLOUDANT_TEST_URL").ok()?;
    let mut builder = CloudantClient::builder().url(url);
    if let (Ok(username), Ok(password)) = (
        std::env::var("CLOUDANT_TEST_USERNAME"),
        std::env::var("CLOUDANT_TEST_PASSWORD"),
    ) {
        builder = builder.credentials(username, password);
    }
    Some(builder.build().expect("failed to build live test client"))
}

/// Database name unique to this test run.
pub fn unique_db_name(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let counter = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}_{}_{}", prefix, nanos, counter)
}
