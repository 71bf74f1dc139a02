//! Phase 2: Profile the project from its root manifests and file mix.
//!
//! Manifests are read straight from the root directory, so a manifest the
//! walk filters out (by extension allow-list, say) still counts. A manifest
//! that cannot be read or parsed is logged and skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;

use crate::config::{DependencyScope, EntryPoint, ExternalDependency, ProjectProfile};
use crate::languages::StrategyRegistry;
use crate::phases::structure::WalkResult;

/// Manifest file names and the project type each one implies, by priority.
const MANIFESTS: &[(&str, &str)] = &[
    ("package.json", "Node.js"),
    ("pyproject.toml", "Python"),
    ("setup.py", "Python"),
    ("requirements.txt", "Python"),
    ("Cargo.toml", "Rust"),
    ("go.mod", "Go"),
    ("pom.xml", "Java (Maven)"),
    ("build.gradle", "Java (Gradle)"),
    ("Gemfile", "Ruby"),
    ("composer.json", "PHP"),
    ("pubspec.yaml", "Dart/Flutter"),
    ("Package.swift", "Swift"),
];

/// Frameworks and the package names that give them away.
const FRAMEWORKS: &[(&str, &[&str])] = &[
    ("react", &["react", "react-dom"]),
    ("vue", &["vue"]),
    ("angular", &["@angular/core"]),
    ("next.js", &["next"]),
    ("nuxt", &["nuxt"]),
    ("express", &["express"]),
    ("fastapi", &["fastapi"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("spring", &["spring-boot"]),
    ("rails", &["rails"]),
    ("laravel", &["laravel/framework"]),
];

/// Conventional entry files, checked in this order.
const COMMON_ENTRY_POINTS: &[(&str, &str)] = &[
    ("src/index.ts", "Main entry (TypeScript)"),
    ("src/index.js", "Main entry (JavaScript)"),
    ("src/main.ts", "Main entry (TypeScript)"),
    ("src/main.js", "Main entry (JavaScript)"),
    ("index.ts", "Root entry (TypeScript)"),
    ("index.js", "Root entry (JavaScript)"),
    ("main.py", "Main entry (Python)"),
    ("app.py", "App entry (Python)"),
    ("src/main.py", "Main entry (Python)"),
    ("src/app.py", "App entry (Python)"),
    ("cmd/main.go", "Main entry (Go)"),
    ("main.go", "Main entry (Go)"),
    ("src/main.rs", "Main entry (Rust)"),
    ("src/lib.rs", "Library entry (Rust)"),
];

static REQUIREMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_-]*)").unwrap());

/// The parts of `package.json` the profile uses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: Option<String>,
    main: Option<String>,
    bin: Option<PackageBin>,
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackageBin {
    Single(String),
    Named(BTreeMap<String, String>),
}

/// Build the project profile for a walked tree.
///
/// `registry` only names languages here; it does not extract anything.
pub fn run_project_phase(walk: &WalkResult, registry: &StrategyRegistry) -> ProjectProfile {
    let root = walk.root.as_path();
    let mut profile = ProjectProfile::default();

    for (file, project_type) in MANIFESTS {
        if root.join(file).is_file() {
            profile.config_files.push(file.to_string());
            profile
                .project_type
                .get_or_insert_with(|| project_type.to_string());
        }
    }

    profile.languages = languages_by_file_count(walk, registry);

    let package = read_package_json(root);
    if let Some(ref package) = package {
        apply_package_json(package, &mut profile);
    }
    if let Some(content) = read_manifest(root, "requirements.txt") {
        profile.package_manager = Some("pip".to_string());
        profile.dependencies.extend(parse_requirements(&content));
    }
    if root.join("pyproject.toml").is_file() {
        profile.package_manager = Some("poetry/pip".to_string());
    }
    profile.frameworks = detect_frameworks(&profile.dependencies);

    profile.entry_points = find_entry_points(root, package.as_ref());

    profile.flutter = read_manifest(root, "pubspec.yaml")
        .is_some_and(|content| declares_flutter_sdk(&content));

    info!(
        "project type {}, {} dependencies, {} entry points{}",
        profile.project_type.as_deref().unwrap_or("unknown"),
        profile.dependencies.len(),
        profile.entry_points.len(),
        if profile.flutter { ", flutter" } else { "" }
    );
    profile
}

fn read_manifest(root: &Path, name: &str) -> Option<String> {
    let path = root.join(name);
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            None
        }
    }
}

fn read_package_json(root: &Path) -> Option<PackageJson> {
    let content = read_manifest(root, "package.json")?;
    match serde_json::from_str(&content) {
        Ok(package) => Some(package),
        Err(e) => {
            warn!("skipping malformed package.json: {e}");
            None
        }
    }
}

fn apply_package_json(package: &PackageJson, profile: &mut ProjectProfile) {
    profile.package_name = package.name.clone();
    profile.package_manager = Some("npm/yarn".to_string());

    let declared = package
        .dependencies
        .iter()
        .map(|dep| (dep, DependencyScope::Production))
        .chain(
            package
                .dev_dependencies
                .iter()
                .map(|dep| (dep, DependencyScope::Development)),
        );
    for ((name, version), scope) in declared {
        profile.dependencies.push(ExternalDependency {
            name: name.clone(),
            version: version_text(version),
            scope,
        });
    }
}

/// Versions are normally strings; anything else is kept as its JSON text.
fn version_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Requirement lines become production dependencies. The version is the
/// whole line, since pip specifiers come in too many shapes to split.
fn parse_requirements(content: &str) -> Vec<ExternalDependency> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let name = REQUIREMENT_NAME.captures(line)?.get(1)?.as_str();
            Some(ExternalDependency {
                name: name.to_string(),
                version: line.to_string(),
                scope: DependencyScope::Production,
            })
        })
        .collect()
}

fn detect_frameworks(dependencies: &[ExternalDependency]) -> Vec<String> {
    let mut frameworks: Vec<String> = Vec::new();
    for dep in dependencies
        .iter()
        .filter(|d| d.scope == DependencyScope::Production)
    {
        for (framework, packages) in FRAMEWORKS {
            if packages.iter().any(|p| p.eq_ignore_ascii_case(&dep.name))
                && !frameworks.iter().any(|f| f == framework)
            {
                debug!("{} suggests {framework}", dep.name);
                frameworks.push(framework.to_string());
            }
        }
    }
    frameworks
}

fn find_entry_points(root: &Path, package: Option<&PackageJson>) -> Vec<EntryPoint> {
    let mut entries: Vec<EntryPoint> = COMMON_ENTRY_POINTS
        .iter()
        .filter(|(path, _)| root.join(path).is_file())
        .map(|(path, description)| EntryPoint {
            path: path.to_string(),
            description: description.to_string(),
        })
        .collect();

    if let Some(package) = package {
        let mut declared = Vec::new();
        if let Some(ref main) = package.main {
            declared.push((main.clone(), "Package main".to_string()));
        }
        match package.bin {
            Some(PackageBin::Single(ref path)) => {
                declared.push((path.clone(), "CLI binary".to_string()));
            }
            Some(PackageBin::Named(ref bins)) => {
                for (name, path) in bins {
                    declared.push((path.clone(), format!("CLI: {name}")));
                }
            }
            None => {}
        }
        for (path, description) in declared {
            let path = path.trim_start_matches("./").to_string();
            if !entries.iter().any(|e| e.path == path) {
                entries.push(EntryPoint { path, description });
            }
        }
    }
    entries
}

/// A pubspec depends on Flutter when it has a `flutter:` section and pulls
/// in the Flutter SDK.
fn declares_flutter_sdk(pubspec: &str) -> bool {
    pubspec.contains("flutter:") && pubspec.contains("sdk: flutter")
}

/// Languages with at least one walked file, most files first.
fn languages_by_file_count(walk: &WalkResult, registry: &StrategyRegistry) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for file in &walk.files {
        if let Some(language) = registry.language_for_extension(&file.extension) {
            *counts.entry(language).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.into_iter().map(|(l, _)| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dep(name: &str, version: &str, scope: DependencyScope) -> ExternalDependency {
        ExternalDependency {
            name: name.to_string(),
            version: version.to_string(),
            scope,
        }
    }

    #[test]
    fn requirements_skip_comments_and_keep_whole_lines() {
        let deps = parse_requirements(
            "# web\nFlask>=2.0\n\n  requests==2.31.0  \n-r other.txt\nuvicorn[standard]\n",
        );
        assert_eq!(
            deps,
            vec![
                dep("Flask", "Flask>=2.0", DependencyScope::Production),
                dep("requests", "requests==2.31.0", DependencyScope::Production),
                dep("uvicorn", "uvicorn[standard]", DependencyScope::Production),
            ]
        );
    }

    #[test]
    fn frameworks_come_from_production_dependencies_once() {
        let deps = vec![
            dep("react", "^18", DependencyScope::Production),
            dep("react-dom", "^18", DependencyScope::Production),
            dep("Django", "Django==5.0", DependencyScope::Production),
            dep("express", "^4", DependencyScope::Development),
        ];
        assert_eq!(detect_frameworks(&deps), vec!["react", "django"]);
    }

    #[test]
    fn package_json_scopes_and_odd_versions() {
        let package: PackageJson = serde_json::from_str(
            r#"{
                "name": "shop",
                "dependencies": {"next": "14.1.0", "local": {"path": "../local"}},
                "devDependencies": {"jest": "^29"}
            }"#,
        )
        .unwrap();
        let mut profile = ProjectProfile::default();
        apply_package_json(&package, &mut profile);
        assert_eq!(profile.package_name.as_deref(), Some("shop"));
        assert_eq!(profile.package_manager.as_deref(), Some("npm/yarn"));
        assert_eq!(
            profile.dependencies,
            vec![
                dep("local", r#"{"path":"../local"}"#, DependencyScope::Production),
                dep("next", "14.1.0", DependencyScope::Production),
                dep("jest", "^29", DependencyScope::Development),
            ]
        );
    }

    #[test]
    fn bin_can_be_a_path_or_a_map() {
        let single: PackageJson = serde_json::from_str(r#"{"bin": "./cli.js"}"#).unwrap();
        assert!(matches!(single.bin, Some(PackageBin::Single(ref p)) if p == "./cli.js"));

        let named: PackageJson =
            serde_json::from_str(r#"{"main": "lib/index.js", "bin": {"shop": "bin/shop.js"}}"#)
                .unwrap();
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            find_entry_points(tmp.path(), Some(&named)),
            vec![
                EntryPoint {
                    path: "lib/index.js".into(),
                    description: "Package main".into(),
                },
                EntryPoint {
                    path: "bin/shop.js".into(),
                    description: "CLI: shop".into(),
                },
            ]
        );
    }

    #[test]
    fn flutter_needs_the_sdk_dependency() {
        assert!(declares_flutter_sdk(
            "name: app\ndependencies:\n  flutter:\n    sdk: flutter\n"
        ));
        assert!(!declares_flutter_sdk("name: tool\ndependencies:\n  args: ^2.0.0\n"));
    }
}
