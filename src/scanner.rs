use super::*;
use std::collections::BTreeMap;
use walkdir::WalkDir;

/// Output of one scan: the finished graph plus non-fatal warnings collected
/// along the way.
#[derive(Debug)]
pub struct ScanResult {
    pub graph: ProjectGraph,
    pub warnings: Vec<String>,
}

/// Walk the project tree and assemble the full dependency graph.
///
/// Fails only when the root cannot be accessed or the directory walk itself
/// errors; an unreadable individual file is reported as a warning and its
/// node skipped. The returned graph is a finished snapshot with reverse
/// edges, the directory tree, and forward-slash paths already applied.
pub fn scan_project(root: &Path) -> Result<ScanResult> {
    let root = fs::canonicalize(root)
        .with_context(|| format!("Failed to access project root: {}", root.display()))?;

    let config = load_config(&root);
    let mut warnings = Vec::new();

    let root_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();

    let mut graph = ProjectGraph {
        root: Node::root(root_name.clone(), root.display().to_string()),
        nodes_map: BTreeMap::new(),
        files: Vec::new(),
        stats: Stats::default(),
    };

    for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_pruned_dir(e.path())))
    {
        let entry = entry
            .with_context(|| format!("Failed to walk project tree under {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_eligible_extension(path) {
            continue;
        }

        let rel = path.strip_prefix(&root).unwrap_or(path).to_path_buf();
        graph.files.push(rel.display().to_string());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Skipped unreadable file {}: {err}", rel.display()));
                continue;
            }
        };

        let node = build_file_node(&content, &rel, &root, &root_name, &config);
        if node.name.is_empty() {
            continue;
        }

        graph.stats.record(&node);
        graph.nodes_map.insert(node.id.clone(), node);
    }

    build_reverse_edges(&mut graph.nodes_map);
    build_tree(&graph.nodes_map, &mut graph.root);
    normalize_paths(&mut graph);

    Ok(ScanResult { graph, warnings })
}

fn build_file_node(
    content: &str,
    rel: &Path,
    root: &Path,
    root_name: &str,
    config: &AliasConfig,
) -> Node {
    let file_name = rel.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let rel_str = rel.display().to_string();

    let role = classify(content, file_name, &rel_str);
    let multiple = role == FileRole::Component && has_multiple_components(content);

    let current_dir = root.join(rel.parent().unwrap_or_else(|| Path::new("")));
    let imports = extract_imports(content, &current_dir, root, config);

    Node::file(rel_str, display_name(rel, root_name), role, multiple, imports)
}

/// Display name for a node: the file stem, except index files which take
/// their parent directory's name (`<parent>/index`), or the project folder
/// name when the index sits at the project root.
fn display_name(rel: &Path, root_name: &str) -> String {
    let stem = rel.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem != "index" {
        return stem.to_string();
    }

    match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            let dir = parent
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            format!("{dir}/index")
        }
        _ => root_name.to_string(),
    }
}
