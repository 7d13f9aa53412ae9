use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

mod classify;
mod config;
mod graph;
mod imports;
mod output;
mod scanner;

pub use config::AliasConfig;
pub use graph::{FileRole, Node, ProjectGraph, Stats};
pub use scanner::{ScanResult, scan_project};

use classify::{classify, has_multiple_components};
use config::{load_config, resolve_import};
use graph::{build_reverse_edges, build_tree, normalize_paths};
use imports::extract_imports;
use output::{print_human_report, save_snapshot};

const ELIGIBLE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];
const PRUNED_DIRS: &[&str] = &["node_modules", "build", "dist"];
const CONFIG_FILE_CANDIDATES: &[&str] = &[
    "jsconfig.json",
    "tsconfig.json",
    "webpack.config.js",
    "craco.config.js",
    ".babelrc",
    "babel.config.js",
    "package.json",
];

const STATE_CONTENT_SIGNALS: &[&str] = &[
    "createStore",
    "combineReducers",
    "createSlice",
    "useContext",
    "createContext",
    "Provider",
    "zustand",
    "recoil",
    "jotai",
    "mobx",
];
const STATE_PATH_SIGNALS: &[&str] = &["redux", "store", "state", "reducer", "action"];

static IMPORT_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(?:\{[^}]*\}|\w+)\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});
static COMPONENT_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:function|const|class)\s+\w+\s*[({]").unwrap());
static UPPERCASE_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:function|const|class)\s+[A-Z]\w+\s*[({]").unwrap());
static BASE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"baseUrl\s*:\s*['"]([^'"]+)['"]"#).unwrap());
static ALIAS_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)alias\s*:\s*\{([^}]*)\}").unwrap());
static ALIAS_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"]?([@~]|[@~]?[\w][\w./-]*)['"]?\s*:\s*['"]([^'"]+)['"]"#).unwrap()
});
static TRAILING_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

#[derive(Parser, Debug)]
#[command(name = "reactmap")]
#[command(about = "Map a JS/TS project into a classified component dependency graph")]
struct Cli {
    /// Project root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Print the full graph as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Skip writing the timestamped snapshot file
    #[arg(long)]
    no_save: bool,

    /// Snapshot directory (defaults to ~/.local/reactmap)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let result = scan_project(&cli.root)?;
    let json = serde_json::to_string_pretty(&result.graph)?;

    let mut saved_to = None;
    if !cli.no_save {
        saved_to = Some(save_snapshot(&json, &result.graph, cli.out_dir.as_deref())?);
    }

    if cli.json {
        println!("{json}");
    } else {
        print_human_report(&result, saved_to.as_deref());
    }

    Ok(())
}

/// Scan a project, persist a timestamped snapshot of the graph document,
/// and return the pretty-printed JSON. `out_dir` overrides the default
/// snapshot directory (`~/.local/reactmap`).
pub fn scan_to_json(root: &Path, out_dir: Option<&Path>) -> Result<String> {
    let result = scan_project(root)?;
    let json = serde_json::to_string_pretty(&result.graph)?;
    save_snapshot(&json, &result.graph, out_dir)?;
    Ok(json)
}

fn has_eligible_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ELIGIBLE_EXTENSIONS
                .iter()
                .any(|eligible| ext.eq_ignore_ascii_case(eligible))
        })
        .unwrap_or(false)
}

fn is_pruned_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| PRUNED_DIRS.contains(&name) || name.starts_with('.'))
        .unwrap_or(false)
}

fn to_unix_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically remove `.` and `..` segments without touching the filesystem.
fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}
