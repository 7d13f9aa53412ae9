use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ROOT_NODE_ID: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Component,
    State,
    Util,
    Root,
    Directory,
}

/// One analyzed source file, or a synthetic root/directory entry in the
/// assembled tree. `id` is the project-relative path and the sole join key
/// between the registry, the forward edges, and the reverse edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub role: FileRole,
    #[serde(rename = "multipleComp")]
    pub multiple_comp: bool,
    pub imports: Vec<String>,
    #[serde(rename = "importedBy")]
    pub imported_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub(crate) fn file(
        id: String,
        name: String,
        role: FileRole,
        multiple_comp: bool,
        imports: Vec<String>,
    ) -> Self {
        Node {
            path: id.clone(),
            id,
            name,
            role,
            multiple_comp,
            imports,
            imported_by: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn root(name: String, path: String) -> Self {
        Node {
            id: ROOT_NODE_ID.to_string(),
            name,
            path,
            role: FileRole::Root,
            multiple_comp: false,
            imports: Vec::new(),
            imported_by: Vec::new(),
            children: Vec::new(),
        }
    }

    fn directory(id: &str) -> Self {
        let name = Path::new(id)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(id)
            .to_string();

        Node {
            id: id.to_string(),
            name,
            path: id.to_string(),
            role: FileRole::Directory,
            multiple_comp: false,
            imports: Vec::new(),
            imported_by: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_components: usize,
    pub multi_comp_files: usize,
    pub component_files: usize,
    pub state_files: usize,
    pub util_files: usize,
}

impl Stats {
    /// `total_components` counts every registered node, not just UI
    /// components. Historic name, kept for output compatibility.
    pub(crate) fn record(&mut self, node: &Node) {
        self.total_components += 1;

        match node.role {
            FileRole::Component => {
                self.component_files += 1;
                if node.multiple_comp {
                    self.multi_comp_files += 1;
                }
            }
            FileRole::State => self.state_files += 1,
            FileRole::Util => self.util_files += 1,
            FileRole::Root | FileRole::Directory => {}
        }
    }
}

/// The aggregate scan result: a synthetic root owning the directory tree, a
/// flat id-to-node registry, the ordered file list, and the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub root: Node,
    #[serde(rename = "nodesMap")]
    pub nodes_map: BTreeMap<String, Node>,
    pub files: Vec<String>,
    pub stats: Stats,
}

/// For every node and every import that joins to a registered node, append
/// the importer to the target's `importedBy` list, once per occurrence.
/// Imports that resolve to nothing stay visible only on the forward side.
pub(crate) fn build_reverse_edges(nodes: &mut BTreeMap<String, Node>) {
    let mut edges = Vec::new();

    for node in nodes.values() {
        for import in &node.imports {
            if nodes.contains_key(import) {
                edges.push((import.clone(), node.id.clone()));
            }
        }
    }

    for (target, importer) in edges {
        if let Some(node) = nodes.get_mut(&target) {
            node.imported_by.push(importer);
        }
    }
}

/// Reconstruct the directory hierarchy from the flat registry. Only
/// directories that contain at least one eligible file appear; each becomes
/// a synthetic `directory` node between the root and its files.
pub(crate) fn build_tree(nodes: &BTreeMap<String, Node>, root: &mut Node) {
    let mut groups: BTreeMap<String, Vec<Node>> = BTreeMap::new();

    for node in nodes.values() {
        let dir = Path::new(&node.id)
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        groups.entry(dir).or_default().push(node.clone());
    }

    attach_children(root, "", &groups);
}

fn attach_children(parent: &mut Node, dir: &str, groups: &BTreeMap<String, Vec<Node>>) {
    if let Some(nodes) = groups.get(dir) {
        parent.children.extend(nodes.iter().cloned());
    }

    let sep = std::path::MAIN_SEPARATOR;
    for key in groups.keys() {
        if key.as_str() == dir {
            continue;
        }

        // Proper single-level descendants only; deeper ones are attached by
        // the recursive call for the intermediate directory.
        let rest = if dir.is_empty() {
            key.as_str()
        } else {
            match key.strip_prefix(dir).and_then(|r| r.strip_prefix(sep)) {
                Some(rest) => rest,
                None => continue,
            }
        };

        if rest.is_empty() || rest.contains(sep) {
            continue;
        }

        let mut subdir = Node::directory(key);
        attach_children(&mut subdir, key, groups);
        parent.children.push(subdir);
    }
}

/// Rewrite every path-like field to forward slashes so the emitted document
/// is identical across host platforms.
pub(crate) fn normalize_paths(graph: &mut ProjectGraph) {
    for file in &mut graph.files {
        *file = to_unix_path(file);
    }

    let nodes = std::mem::take(&mut graph.nodes_map);
    for (id, mut node) in nodes {
        normalize_node(&mut node);
        graph.nodes_map.insert(to_unix_path(&id), node);
    }

    normalize_node(&mut graph.root);
}

fn normalize_node(node: &mut Node) {
    node.id = to_unix_path(&node.id);
    node.path = to_unix_path(&node.path);

    for import in &mut node.imports {
        *import = to_unix_path(import);
    }
    for importer in &mut node.imported_by {
        *importer = to_unix_path(importer);
    }
    for child in &mut node.children {
        normalize_node(child);
    }
}
