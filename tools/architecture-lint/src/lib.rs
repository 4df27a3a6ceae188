//! Layer-boundary lint for the todo backend.
//!
//! `backend/src` is split into a `domain` core with ports, `inbound` gRPC
//! adapters and `outbound` persistence adapters. Every source file in those
//! three trees is parsed with `syn`, and each path it mentions is checked
//! against the layer's rules:
//!
//! - `domain` reaches neither adapter tree, nor `server`/`settings`, nor any
//!   transport or storage crate;
//! - `inbound` may use transport crates but never `outbound` or storage;
//! - `outbound` may use storage crates but never `inbound` or transport.
//!
//! Run with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the backend library is imported under from integration code.
const LIBRARY_CRATE: &str = "todo_backend";

/// Crates that speak gRPC/HTTP.
const TRANSPORT_CRATES: &[&str] = &[
    "http",
    "prost",
    "tokio_stream",
    "tonic",
    "tonic_health",
    "tonic_prost",
    "tonic_reflection",
];

/// Crates that talk to PostgreSQL.
const STORAGE_CRATES: &[&str] = &[
    "diesel",
    "diesel_async",
    "diesel_migrations",
    "pg_embedded_setup_unpriv",
    "postgres",
];

/// One import that crosses a forbidden boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Which rule the file broke.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Why a lint run did not pass.
#[derive(Debug)]
pub enum LintError {
    /// Walking or reading the source tree failed.
    Io(io::Error),
    /// A file could not be placed in a layer or did not parse.
    Parse {
        /// File path relative to `backend/src`.
        file: PathBuf,
        /// Parser or classification message.
        message: String,
    },
    /// Boundary violations, sorted by file.
    Violations(Vec<Violation>),
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "reading backend sources failed: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} layer boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for LintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for LintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A source file handed to the lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

impl LintSource {
    /// Build a source from a relative path and its text.
    pub fn new(file: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(relative: &Path) -> Option<Self> {
        let top = relative.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.dir() == top)
    }

    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "server", "settings"],
            Self::Inbound => &["outbound", "server", "settings"],
            Self::Outbound => &["inbound", "server", "settings"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Domain => &[TRANSPORT_CRATES, STORAGE_CRATES],
            Self::Inbound => &[STORAGE_CRATES],
            Self::Outbound => &[TRANSPORT_CRATES],
        }
    }

    fn forbids_module(self, module: &str) -> bool {
        self.forbidden_modules().contains(&module)
    }

    fn forbids_crate(self, name: &str) -> bool {
        self.forbidden_crates()
            .iter()
            .any(|group| group.contains(&name))
    }
}

/// Lint the sources under `backend_dir/src`.
pub fn lint_backend(backend_dir: &Path) -> Result<(), LintError> {
    let src = backend_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src.join(layer.dir());
        if dir.is_dir() {
            collect_rust_files(&src, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint in-memory sources whose paths are relative to `backend/src`.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), LintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| LintError::Parse {
            file: source.file.clone(),
            message: "file is outside domain/, inbound/ and outbound/".to_owned(),
        })?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| LintError::Parse {
            file: source.file.clone(),
            message: err.to_string(),
        })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        return Ok(());
    }
    violations.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.message.cmp(&b.message)));
    Err(LintError::Violations(violations))
}

fn check_file(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut paths = PathCollector::default();
    paths.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &paths.seen {
        match classify(segments) {
            Some(Target::Module(module)) if layer.forbids_module(module) => {
                messages.insert(format!(
                    "{} must not depend on crate::{module}",
                    layer.dir()
                ));
            }
            Some(Target::Crate(name)) if layer.forbids_crate(name) => {
                messages.insert(format!(
                    "{} must not depend on external crate `{name}`",
                    layer.dir()
                ));
            }
            _ => {}
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// What the leading segments of a path point at.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    /// A top-level module of the backend crate.
    Module(&'a str),
    /// Some other crate.
    Crate(&'a str),
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn classify(segments: &[String]) -> Option<Target<'_>> {
    let first = segments.first()?.as_str();
    if is_relative(first) || first == LIBRARY_CRATE {
        let module = segments
            .iter()
            .map(String::as_str)
            .find(|segment| !is_relative(segment) && *segment != LIBRARY_CRATE)?;
        return Some(Target::Module(module));
    }
    if Layer::ALL.iter().any(|layer| layer.dir() == first) {
        return Some(Target::Module(first));
    }
    Some(Target::Crate(first))
}

#[derive(Default)]
struct PathCollector {
    seen: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn walk_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk_use(&path.tree, prefix);
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                prefix.push(ident.to_string());
                self.seen.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.seen.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.walk_use(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.seen.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.walk_use(&node.tree, Vec::new());
    }
}

fn collect_rust_files(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), LintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rust_files(src_root, &path, sources)?;
            continue;
        }
        if path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }
        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| LintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        sources.push(LintSource {
            file: relative,
            contents: fs::read_to_string(&path)?,
        });
    }
    Ok(())
}
