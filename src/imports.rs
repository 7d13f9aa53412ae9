use super::*;

/// Extract and resolve the import edges of one file.
///
/// Matches only the literal `import <bindings> from '<specifier>'` shape;
/// side-effect imports, dynamic imports, and re-exports are deliberately
/// ignored. Order of appearance is preserved and duplicates are kept.
pub(crate) fn extract_imports(
    content: &str,
    current_dir: &Path,
    project_root: &Path,
    config: &AliasConfig,
) -> Vec<String> {
    let mut imports = Vec::new();

    for caps in IMPORT_FROM_RE.captures_iter(content) {
        let specifier = &caps[1];
        if is_external_package(specifier, config) {
            continue;
        }

        let resolved = resolve_import(specifier, config, project_root, current_dir);
        let relative = match resolved.strip_prefix(project_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => resolved,
        };

        imports.push(probe_extension(relative, project_root));
    }

    imports
}

/// A specifier without a path separator, or under an npm scope, points at a
/// package unless it matches a configured alias.
fn is_external_package(specifier: &str, config: &AliasConfig) -> bool {
    if specifier.contains('/') && !specifier.starts_with('@') {
        return false;
    }

    if config.is_aliased(specifier) {
        return false;
    }

    !(specifier.starts_with('.') || specifier.starts_with('/'))
}

/// Probe the eligible extensions, then `index.<ext>` below the path,
/// appending the first that exists on disk. Paths that never resolve are
/// kept extension-less; they simply will not join to a node later.
fn probe_extension(relative: PathBuf, project_root: &Path) -> String {
    let has_extension = relative
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.contains('.'))
        .unwrap_or(false);
    if has_extension {
        return relative.display().to_string();
    }

    for ext in ELIGIBLE_EXTENSIONS {
        let candidate = relative.with_extension(ext);
        if project_root.join(&candidate).is_file() {
            return candidate.display().to_string();
        }
    }

    for ext in ELIGIBLE_EXTENSIONS {
        let candidate = relative.join(format!("index.{ext}"));
        if project_root.join(&candidate).is_file() {
            return candidate.display().to_string();
        }
    }

    relative.display().to_string()
}
