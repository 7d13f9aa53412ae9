use super::*;

/// Decide a file's role. Order matters: state signatures are checked first
/// and end the scan, then component signals; everything else is a util.
pub(crate) fn classify(content: &str, file_name: &str, rel_path: &str) -> FileRole {
    if is_state_file(content, rel_path) {
        return FileRole::State;
    }

    if is_component_file(content, file_name) {
        return FileRole::Component;
    }

    FileRole::Util
}

fn is_state_file(content: &str, rel_path: &str) -> bool {
    STATE_CONTENT_SIGNALS
        .iter()
        .any(|signal| content.contains(signal))
        || STATE_PATH_SIGNALS
            .iter()
            .any(|signal| rel_path.contains(signal))
}

fn is_component_file(content: &str, file_name: &str) -> bool {
    // An uppercase file name is a strong signal on its own.
    if file_name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
    {
        return true;
    }

    let has_react_import = content.contains("import React")
        || content.contains("from 'react'")
        || content.contains("from \"react\"");
    if !has_react_import {
        return false;
    }

    let has_jsx_return =
        content.contains("return (") && content.contains('<') && content.contains("/>");
    let has_component_decl = COMPONENT_DECL_RE.is_match(content)
        && (content.contains("render") || content.contains("return"));

    has_jsx_return || has_component_decl
}

/// More than one uppercase-named declaration means the file bundles several
/// components. Only computed for files already classified as components.
pub(crate) fn has_multiple_components(content: &str) -> bool {
    UPPERCASE_DECL_RE.find_iter(content).count() > 1
}
