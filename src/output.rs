use super::*;
use chrono::Local;

pub(crate) fn print_human_report(result: &ScanResult, saved_to: Option<&Path>) {
    let graph = &result.graph;

    println!("Root: {}", graph.root.path);
    println!("\nSummary:");
    println!("  - Scanned files: {}", graph.files.len());
    println!("  - Registered nodes: {}", graph.stats.total_components);
    println!("  - Component files: {}", graph.stats.component_files);
    println!(
        "  - Files with multiple components: {}",
        graph.stats.multi_comp_files
    );
    println!("  - State files: {}", graph.stats.state_files);
    println!("  - Utility files: {}", graph.stats.util_files);

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }

    if let Some(path) = saved_to {
        println!("\nSnapshot written to {}", path.display());
    }
}

/// Persist one scan's JSON document as `<project>_<YYYYMMDD_HHMMSS>.json`
/// under the snapshot directory, creating it if absent. Timestamped names
/// mean a scan never overwrites an earlier snapshot.
pub(crate) fn save_snapshot(
    json: &str,
    graph: &ProjectGraph,
    out_dir: Option<&Path>,
) -> Result<PathBuf> {
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_snapshot_dir()?,
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;

    let project = Path::new(&graph.root.path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{project}_{timestamp}.json"));

    fs::write(&path, json).with_context(|| format!("Failed to write snapshot {}", path.display()))?;

    Ok(path)
}

fn default_snapshot_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .context("HOME is not set; pass --out-dir to choose a snapshot directory")?;

    Ok(PathBuf::from(home).join(".local").join("reactmap"))
}
