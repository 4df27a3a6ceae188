//! Embedded PostgreSQL bootstrap for the integration suites.
//!
//! `pg-embed-setup-unpriv` installs under `/var/tmp` by default. Sandboxed
//! runners cannot write there, so unless both `PG_RUNTIME_DIR` and
//! `PG_DATA_DIR` are already set the bootstrap points them at a fresh
//! directory under the cargo target dir. Bootstraps are serialised because
//! they mutate the process environment.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ATTEMPTS: u32 = 4;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

const TRANSIENT_MARKERS: [&str; 7] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "timeout",
    "temporarily unavailable",
    "dns error",
];

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"))
        .join("pg-embed")
}

fn fresh_dirs() -> std::io::Result<(String, String)> {
    let base = scratch_root().join(format!("todo-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime = base.join("install");
    let data = base.join("data");
    std::fs::create_dir_all(&runtime)?;
    std::fs::create_dir_all(&data)?;
    Ok((
        runtime.to_string_lossy().into_owned(),
        data.to_string_lossy().into_owned(),
    ))
}

fn is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Start an embedded cluster, retrying downloads that fail transiently.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _serial = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let configured =
        std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some();
    let _env = if configured {
        None
    } else {
        let (runtime, data) = fresh_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime)),
            ("PG_DATA_DIR", Some(data)),
        ]))
    };

    let mut attempt = 1;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let message = format!("{err:?}");
                if attempt >= ATTEMPTS || !is_transient(&message) {
                    return Err(message);
                }
                let backoff = BASE_BACKOFF * 2u32.pow(attempt - 1);
                eprintln!("pg-embed: attempt {attempt}/{ATTEMPTS} failed, retrying in {backoff:?}: {message}");
                std::thread::sleep(backoff);
                attempt += 1;
            }
        }
    }
}
