use super::*;

/// Project import-resolution settings: a `baseUrl` plus an alias table,
/// loaded once per scan and read-only afterwards.
///
/// Aliases are kept sorted longest key first, so when several aliases could
/// prefix-match one specifier the most specific one wins deterministically.
#[derive(Debug, Clone, Default)]
pub struct AliasConfig {
    pub base_url: String,
    aliases: Vec<(String, String)>,
}

impl AliasConfig {
    pub fn insert_alias(&mut self, key: impl Into<String>, target: impl Into<String>) {
        let key = key.into();
        let target = target.into();
        if key.is_empty() || target.is_empty() {
            return;
        }

        if let Some(slot) = self.aliases.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = target;
        } else {
            self.aliases.push((key, target));
        }
    }

    /// The longest alias whose key prefix-matches the specifier.
    pub(crate) fn matching_alias(&self, specifier: &str) -> Option<(&str, &str)> {
        self.aliases
            .iter()
            .find(|(key, _)| specifier.starts_with(key.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the specifier names an alias exactly or under an `alias/`
    /// prefix. Used to exempt single-word aliases from package filtering.
    pub(crate) fn is_aliased(&self, specifier: &str) -> bool {
        self.aliases.iter().any(|(key, _)| {
            specifier == key
                || (specifier.len() > key.len()
                    && specifier.starts_with(key.as_str())
                    && specifier.as_bytes()[key.len()] == b'/')
        })
    }

    fn finish(&mut self) {
        self.aliases
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    }
}

/// Load alias configuration for a project root. Never fails: unreadable or
/// malformed config files are skipped and the defaults stand.
///
/// Candidates are probed in a fixed order; the first JSON-bearing file that
/// parses wins and ends the search. `.js` configs cannot be evaluated, so
/// they only contribute whatever the best-effort regex scrape finds and the
/// search continues past them.
pub(crate) fn load_config(root: &Path) -> AliasConfig {
    let mut config = AliasConfig::default();

    for name in CONFIG_FILE_CANDIDATES {
        let Ok(raw) = fs::read_to_string(root.join(name)) else {
            continue;
        };

        if name.ends_with(".js") {
            scrape_js_config(&raw, &mut config);
            continue;
        }

        if apply_json_config(name, &raw, &mut config) {
            config.finish();
            return config;
        }
    }

    // Common default when nothing is configured explicitly.
    if config.base_url.is_empty() && root.join("src").is_dir() {
        config.base_url = "src".to_string();
    }

    config.finish();
    config
}

fn apply_json_config(name: &str, raw: &str, config: &mut AliasConfig) -> bool {
    let sanitized = sanitize_jsonc(raw);
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&sanitized) else {
        return false;
    };

    if name == "package.json" {
        apply_package_descriptor(&value, config);
    } else {
        apply_compiler_options(&value, config);
    }

    true
}

/// Pull `compilerOptions.baseUrl` and `compilerOptions.paths` out of a
/// tsconfig/jsconfig document, stripping the `/*` wildcard from alias
/// patterns and their first target.
fn apply_compiler_options(value: &serde_json::Value, config: &mut AliasConfig) {
    let Some(compiler) = value.get("compilerOptions") else {
        return;
    };

    if let Some(base_url) = compiler.get("baseUrl").and_then(|v| v.as_str()) {
        config.base_url = base_url.to_string();
    }

    let Some(paths) = compiler.get("paths").and_then(|v| v.as_object()) else {
        return;
    };

    for (pattern, targets) in paths {
        let Some(first) = targets
            .as_array()
            .and_then(|arr| arr.iter().find_map(|v| v.as_str()))
        else {
            continue;
        };

        config.insert_alias(pattern.trim_end_matches("/*"), first.trim_end_matches("/*"));
    }
}

/// Aliases declared directly in package.json, plus the jest
/// `moduleNameMapper` table with its regex keys and `<rootDir>` targets
/// normalized down to plain prefixes.
fn apply_package_descriptor(value: &serde_json::Value, config: &mut AliasConfig) {
    if let Some(alias) = value.get("alias").and_then(|v| v.as_object()) {
        for (key, target) in alias {
            if let Some(target) = target.as_str() {
                config.insert_alias(key.as_str(), target);
            }
        }
    }

    let Some(mapper) = value
        .get("jest")
        .and_then(|v| v.get("moduleNameMapper"))
        .and_then(|v| v.as_object())
    else {
        return;
    };

    for (pattern, target) in mapper {
        let Some(target) = target.as_str() else {
            continue;
        };

        let alias = pattern
            .trim_start_matches('^')
            .trim_end_matches("/(.*)$")
            .trim_end_matches("(.*)$");
        let target = target
            .strip_prefix("<rootDir>/")
            .unwrap_or(target)
            .trim_end_matches("/$1");

        config.insert_alias(alias, target);
    }
}

/// Best-effort scrape of `baseUrl: '…'` and `alias: { … }` blocks from a JS
/// config we cannot evaluate. Inherently lossy; anything the regexes miss is
/// simply not an alias.
fn scrape_js_config(raw: &str, config: &mut AliasConfig) {
    if config.base_url.is_empty() {
        if let Some(caps) = BASE_URL_RE.captures(raw) {
            config.base_url = caps[1].to_string();
        }
    }

    for block in ALIAS_BLOCK_RE.captures_iter(raw) {
        for pair in ALIAS_PAIR_RE.captures_iter(&block[1]) {
            config.insert_alias(&pair[1], &pair[2]);
        }
    }
}

/// Strip `//` and `/* */` comments and trailing commas so tsconfig-style
/// JSONC parses as plain JSON.
fn sanitize_jsonc(input: &str) -> String {
    let mut current = strip_comments(input);

    loop {
        let next = TRAILING_COMMA_RE.replace_all(&current, "$1").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Resolve an import specifier to an absolute candidate path. Total by
/// design: the result is a best guess and may not exist on disk.
pub(crate) fn resolve_import(
    specifier: &str,
    config: &AliasConfig,
    project_root: &Path,
    current_dir: &Path,
) -> PathBuf {
    if specifier.starts_with('.') {
        return clean_path(&current_dir.join(specifier));
    }

    if let Some(rest) = specifier.strip_prefix('/') {
        return clean_path(&project_root.join(rest));
    }

    if let Some((alias, target)) = config.matching_alias(specifier) {
        let rest = specifier[alias.len()..].trim_start_matches('/');
        let target_path = Path::new(target);

        let base = if target_path.is_absolute() {
            target_path.to_path_buf()
        } else if config.base_url.is_empty() {
            project_root.join(target)
        } else {
            project_root.join(&config.base_url).join(target)
        };

        return clean_path(&base.join(rest));
    }

    if config.base_url.is_empty() {
        clean_path(&project_root.join(specifier))
    } else {
        clean_path(&project_root.join(&config.base_url).join(specifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, name: &str, contents: &str) {
        fs::write(root.join(name), contents).unwrap();
    }

    #[test]
    fn tsconfig_paths_become_aliases() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tsconfig.json",
            r#"{
                "compilerOptions": {
                    "baseUrl": "src",
                    "paths": {
                        "@components/*": ["components/*"],
                        "@utils/*": ["utils/*"]
                    }
                }
            }"#,
        );

        let config = load_config(dir.path());
        assert_eq!(config.base_url, "src");
        assert_eq!(config.matching_alias("@components/Button").unwrap().1, "components");
        assert_eq!(config.matching_alias("@utils/format").unwrap().1, "utils");
        assert!(config.matching_alias("react").is_none());
    }

    #[test]
    fn tsconfig_tolerates_jsonc() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tsconfig.json",
            "{\n  // comment\n  \"compilerOptions\": {\n    \"baseUrl\": \"app\", /* inline */\n  },\n}\n",
        );

        let config = load_config(dir.path());
        assert_eq!(config.base_url, "app");
    }

    #[test]
    fn first_parsed_json_config_wins() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "jsconfig.json",
            r#"{"compilerOptions": {"baseUrl": "js-src"}}"#,
        );
        write(
            dir.path(),
            "tsconfig.json",
            r#"{"compilerOptions": {"baseUrl": "ts-src"}}"#,
        );

        let config = load_config(dir.path());
        assert_eq!(config.base_url, "js-src");
    }

    #[test]
    fn malformed_json_config_is_skipped_silently() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "jsconfig.json", "{ not json ");
        write(
            dir.path(),
            "tsconfig.json",
            r#"{"compilerOptions": {"baseUrl": "src"}}"#,
        );

        let config = load_config(dir.path());
        assert_eq!(config.base_url, "src");
    }

    #[test]
    fn package_json_jest_mapper_is_normalized() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "package.json",
            r#"{
                "name": "demo",
                "alias": {"widgets": "src/widgets"},
                "jest": {
                    "moduleNameMapper": {
                        "^components/(.*)$": "<rootDir>/src/components/$1"
                    }
                }
            }"#,
        );

        let config = load_config(dir.path());
        assert_eq!(config.matching_alias("widgets/Card").unwrap().1, "src/widgets");
        assert_eq!(
            config.matching_alias("components/Button").unwrap().1,
            "src/components"
        );
    }

    #[test]
    fn webpack_config_is_scraped_heuristically() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "webpack.config.js",
            r#"
            module.exports = {
                resolve: {
                    alias: {
                        '@comp': 'src/components',
                        'assets': 'src/assets'
                    }
                }
            };
            "#,
        );

        let config = load_config(dir.path());
        assert_eq!(config.matching_alias("@comp/App").unwrap().1, "src/components");
        assert_eq!(config.matching_alias("assets/logo").unwrap().1, "src/assets");
    }

    #[test]
    fn missing_config_infers_src_base_url() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.base_url, "src");

        let empty = TempDir::new().unwrap();
        assert_eq!(load_config(empty.path()).base_url, "");
    }

    #[test]
    fn longest_alias_prefix_wins() {
        let mut config = AliasConfig::default();
        config.insert_alias("@app", "src/app");
        config.insert_alias("@app/ui", "src/design-system");
        config.finish();

        assert_eq!(config.matching_alias("@app/ui/Button").unwrap().1, "src/design-system");
        assert_eq!(config.matching_alias("@app/routes").unwrap().1, "src/app");
    }

    #[test]
    fn resolve_is_pure_and_total() {
        let mut config = AliasConfig::default();
        config.base_url = "src".to_string();
        config.insert_alias("@components", "components");
        config.finish();

        let root = Path::new("/proj");
        let dir = Path::new("/proj/src/pages");

        let relative = resolve_import("../shared/Button", &config, root, dir);
        assert_eq!(relative, PathBuf::from("/proj/src/shared/Button"));

        let rooted = resolve_import("/lib/api", &config, root, dir);
        assert_eq!(rooted, PathBuf::from("/proj/lib/api"));

        let aliased = resolve_import("@components/Button", &config, root, dir);
        assert_eq!(aliased, PathBuf::from("/proj/src/components/Button"));

        let bare = resolve_import("utils/format", &config, root, dir);
        assert_eq!(bare, PathBuf::from("/proj/src/utils/format"));

        // Identical inputs always produce identical output.
        assert_eq!(aliased, resolve_import("@components/Button", &config, root, dir));
    }

    #[test]
    fn resolve_without_base_url_uses_project_root() {
        let config = AliasConfig::default();
        let root = Path::new("/proj");
        let dir = Path::new("/proj/src");

        assert_eq!(
            resolve_import("utils/format", &config, root, dir),
            PathBuf::from("/proj/utils/format")
        );
    }
}
