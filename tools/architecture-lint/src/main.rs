//! `cargo run -p architecture-lint`: checks backend layer boundaries.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Nearest ancestor of `start` whose `Cargo.toml` declares a workspace.
fn workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            std::fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}

fn main() -> ExitCode {
    let starts = [
        std::env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    let mut stderr = io::stderr().lock();

    let Some(root) = starts.iter().flatten().find_map(|start| workspace_root(start)) else {
        let _ = writeln!(stderr, "no workspace Cargo.toml found above the current directory");
        return ExitCode::FAILURE;
    };

    match architecture_lint::lint_backend(&root.join("backend")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}
