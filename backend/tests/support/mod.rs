//! Process environment fixtures for the configuration tests.

use parcel_insight::config::CONFIG_PATH_ENV;
use parcel_insight::db::factory::{DATA_DIR_ENV, REPOSITORY_TYPE_ENV};
use parking_lot::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable the server reads at startup.
const PARCEL_VARS: [&str; 5] = [
    "HOST",
    "PORT",
    REPOSITORY_TYPE_ENV,
    DATA_DIR_ENV,
    CONFIG_PATH_ENV,
];

/// Values for the parcel server variables; `None` leaves a variable unset.
#[derive(Debug, Default, Clone)]
pub struct ParcelEnv<'a> {
    pub host: Option<&'a str>,
    pub port: Option<&'a str>,
    pub repository_type: Option<&'a str>,
    pub data_dir: Option<&'a str>,
    pub config: Option<&'a str>,
}

impl<'a> ParcelEnv<'a> {
    fn value(&self, key: &str) -> Option<&'a str> {
        match key {
            "HOST" => self.host,
            "PORT" => self.port,
            k if k == REPOSITORY_TYPE_ENV => self.repository_type,
            k if k == DATA_DIR_ENV => self.data_dir,
            k if k == CONFIG_PATH_ENV => self.config,
            _ => None,
        }
    }
}

/// Runs `f` with exactly the variables in `env` set and the rest of the
/// parcel variables removed, restoring the previous values afterwards
/// (also on unwind). Calls are serialized since the environment is global.
pub fn with_parcel_env<F, R>(env: ParcelEnv<'_>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock();
    let _restore = RestoreOnDrop::capture();
    for key in PARCEL_VARS {
        match env.value(key) {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }
    f()
}

struct RestoreOnDrop(Vec<(&'static str, Option<String>)>);

impl RestoreOnDrop {
    fn capture() -> Self {
        Self(
            PARCEL_VARS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect(),
        )
    }
}

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        for (key, previous) in self.0.drain(..) {
            match previous {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }
    }
}
