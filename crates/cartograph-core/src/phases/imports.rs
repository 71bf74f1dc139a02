//! Phase 4: Resolve raw import specifiers to files inside the project.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info};

use crate::config::{AnalysisConfig, ImportEdge};
use crate::languages::{ImportSyntax, StrategyRegistry};
use crate::phases::parsing::FileRecord;
use crate::phases::structure::extension_of;

/// Run the imports phase: resolve every raw import of every record.
///
/// Specifiers that resolve to nothing inside the project are kept as edges
/// without a target. Edges are returned sorted and deduplicated.
pub fn run_imports_phase(
    config: &AnalysisConfig,
    root: &Path,
    records: &[FileRecord],
    registry: &StrategyRegistry,
) -> Vec<ImportEdge> {
    let resolver = ImportResolver::new(
        records.iter().map(|r| r.file.path.clone()),
        &config.source_roots,
        read_go_module(root),
    );

    let mut edges = Vec::new();
    for record in records {
        let ext = extension_of(Path::new(&record.file.path));
        let Some(strategy) = registry.get_by_extension(&ext) else {
            continue;
        };
        for import in &record.imports {
            let targets = resolver.resolve(
                &record.file.path,
                &import.specifier,
                strategy.import_syntax(),
                strategy.resolve_extensions(),
            );
            if targets.is_empty() {
                debug!(
                    "{}:{}: unresolved import {}",
                    record.file.path, import.line, import.specifier
                );
                edges.push(ImportEdge {
                    from_file: record.file.path.clone(),
                    specifier: import.specifier.clone(),
                    to_file: None,
                });
                continue;
            }
            for target in targets {
                if target == record.file.path {
                    continue;
                }
                edges.push(ImportEdge {
                    from_file: record.file.path.clone(),
                    specifier: import.specifier.clone(),
                    to_file: Some(target),
                });
            }
        }
    }

    edges.sort();
    edges.dedup();
    let resolved = edges.iter().filter(|e| e.to_file.is_some()).count();
    info!("resolved {} of {} imports", resolved, edges.len());
    edges
}

/// Read the module path from the root `go.mod`, if there is one.
pub fn read_go_module(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join("go.mod")).ok()?;
    parse_go_module(&content)
}

fn parse_go_module(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("module ")
            .map(|m| m.trim().trim_matches('"').to_string())
    })
}

/// Where relative probing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Anchor {
    /// Only below this directory.
    Only(String),
    /// This directory, then the root, then each source root.
    Search(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageMode {
    /// The specifier names a file.
    No,
    /// A file if one matches, otherwise every file in the directory.
    Fallback,
    /// Always every file in the directory.
    Only,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    anchor: Anchor,
    /// `/`-separated path below the anchor; may be empty.
    path: String,
    /// Retry with trailing segments dropped (`a::b::Item` → `a::b`).
    shorten: bool,
    package: PackageMode,
    index_names: &'static [&'static str],
}

/// Maps specifiers onto the set of project files.
pub struct ImportResolver {
    files: HashSet<String>,
    /// Directory ("" for the root) → files directly inside, sorted.
    dirs: HashMap<String, Vec<String>>,
    source_roots: Vec<String>,
    go_module: Option<String>,
}

impl ImportResolver {
    pub fn new(
        files: impl IntoIterator<Item = String>,
        source_roots: &[String],
        go_module: Option<String>,
    ) -> Self {
        let files: HashSet<String> = files.into_iter().collect();
        let mut dirs: HashMap<String, Vec<String>> = HashMap::new();
        for file in &files {
            dirs.entry(parent_dir(file)).or_default().push(file.clone());
        }
        for list in dirs.values_mut() {
            list.sort();
        }
        let source_roots = source_roots
            .iter()
            .filter_map(|r| normalize_path(r))
            .filter(|r| !r.is_empty())
            .collect();
        Self {
            files,
            dirs,
            source_roots,
            go_module,
        }
    }

    /// Every project file `specifier` refers to, sorted. Empty when external.
    pub fn resolve(
        &self,
        importer: &str,
        specifier: &str,
        syntax: ImportSyntax,
        extensions: &[&str],
    ) -> Vec<String> {
        let importer_dir = parent_dir(importer);
        let target = match syntax {
            ImportSyntax::FilePath => file_path_target(specifier, &importer_dir),
            ImportSyntax::Dotted => dotted_target(specifier, &importer_dir),
            ImportSyntax::ModuleDirectory => module_directory_target(specifier, &importer_dir),
            ImportSyntax::PythonModule => python_target(specifier, &importer_dir),
            ImportSyntax::RustPath => self.rust_target(specifier, importer),
            ImportSyntax::GoPackage => self.go_target(specifier, &importer_dir),
        };
        let resolved = match target {
            Some(target) => self.probe(&target, extensions),
            None => Vec::new(),
        };
        if resolved.is_empty() && syntax == ImportSyntax::PythonModule {
            // `from . import name` may name something defined in the
            // package's `__init__` rather than a submodule.
            if let Some(package) = python_package_of(specifier) {
                return self.resolve(importer, package, syntax, extensions);
            }
        }
        resolved
    }

    fn bases(&self, anchor: &Anchor) -> Vec<String> {
        match anchor {
            Anchor::Only(dir) => vec![dir.clone()],
            Anchor::Search(first) => {
                let mut out = vec![first.clone()];
                for base in std::iter::once(String::new()).chain(self.source_roots.iter().cloned()) {
                    if !out.contains(&base) {
                        out.push(base);
                    }
                }
                out
            }
        }
    }

    fn probe(&self, target: &Target, extensions: &[&str]) -> Vec<String> {
        let segments: Vec<&str> = target.path.split('/').filter(|s| !s.is_empty()).collect();
        let lengths: Vec<usize> = if target.shorten && !segments.is_empty() {
            (1..=segments.len()).rev().collect()
        } else {
            vec![segments.len()]
        };

        for base in self.bases(&target.anchor) {
            for &len in &lengths {
                let Some(candidate) = join_within_root(&base, &segments[..len].join("/")) else {
                    continue;
                };
                let found = self.probe_path(&candidate, target, extensions);
                if !found.is_empty() {
                    return found;
                }
            }
        }
        Vec::new()
    }

    fn probe_path(&self, path: &str, target: &Target, extensions: &[&str]) -> Vec<String> {
        if target.package != PackageMode::Only {
            if !path.is_empty() {
                if self.files.contains(path) {
                    return vec![path.to_string()];
                }
                for ext in extensions {
                    let candidate = format!("{path}.{ext}");
                    if self.files.contains(&candidate) {
                        return vec![candidate];
                    }
                }
            }
            for index in target.index_names {
                for ext in extensions {
                    let candidate = child_path(path, &format!("{index}.{ext}"));
                    if self.files.contains(&candidate) {
                        return vec![candidate];
                    }
                }
            }
        }

        if target.package != PackageMode::No {
            if let Some(list) = self.dirs.get(path) {
                return list
                    .iter()
                    .filter(|f| {
                        let ext = extension_of(Path::new(f.as_str()));
                        extensions.iter().any(|e| *e == ext)
                    })
                    .cloned()
                    .collect();
            }
        }
        Vec::new()
    }

    /// Directory holding the crate root (`lib.rs` or `main.rs`) above `importer`.
    fn rust_crate_root(&self, importer: &str) -> Option<String> {
        let mut dir = parent_dir(importer);
        loop {
            if ["lib.rs", "main.rs"]
                .iter()
                .any(|root| self.files.contains(&child_path(&dir, root)))
            {
                return Some(dir);
            }
            if dir.is_empty() {
                return None;
            }
            dir = parent_dir(&dir);
        }
    }

    fn rust_target(&self, specifier: &str, importer: &str) -> Option<Target> {
        let segments: Vec<&str> = specifier
            .split("::")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let first = *segments.first()?;
        if matches!(first, "std" | "core" | "alloc") {
            return None;
        }

        let module_dir = rust_module_dir(importer);
        let (anchor, rest) = match first {
            "crate" => {
                let anchor = match self.rust_crate_root(importer) {
                    Some(root) => Anchor::Only(root),
                    None => Anchor::Search(parent_dir(importer)),
                };
                (anchor, &segments[1..])
            }
            "self" => (Anchor::Only(module_dir), &segments[1..]),
            "super" => {
                let supers = segments.iter().take_while(|s| **s == "super").count();
                let mut dir = module_dir;
                for _ in 0..supers {
                    if dir.is_empty() {
                        return None;
                    }
                    dir = parent_dir(&dir);
                }
                (Anchor::Only(dir), &segments[supers..])
            }
            // A bare path names a child module first, then anything reachable
            // from the usual roots.
            _ => (Anchor::Search(module_dir), &segments[..]),
        };

        let rest: Vec<&str> = rest
            .iter()
            .copied()
            .filter(|s| *s != "*" && *s != "self")
            .collect();
        if rest.is_empty() {
            return None;
        }
        Some(Target {
            anchor,
            path: rest.join("/"),
            shorten: true,
            package: PackageMode::No,
            index_names: &["mod"],
        })
    }

    fn go_target(&self, specifier: &str, importer_dir: &str) -> Option<Target> {
        let spec = specifier.trim();
        if spec.starts_with("./") || spec.starts_with("../") {
            return Some(Target {
                anchor: Anchor::Only(importer_dir.to_string()),
                path: spec.to_string(),
                shorten: false,
                package: PackageMode::Only,
                index_names: &[],
            });
        }
        let module = self.go_module.as_deref()?;
        let rest = if spec == module {
            ""
        } else {
            spec.strip_prefix(module)?.strip_prefix('/')?
        };
        Some(Target {
            anchor: Anchor::Only(String::new()),
            path: rest.to_string(),
            shorten: false,
            package: PackageMode::Only,
            index_names: &[],
        })
    }
}

fn file_path_target(specifier: &str, importer_dir: &str) -> Option<Target> {
    let spec = specifier.trim().trim_start_matches('\\').replace('\\', "/");
    if spec.is_empty()
        || spec.contains("://")
        || spec.starts_with("dart:")
        || spec.starts_with("node:")
    {
        return None;
    }
    if let Some(rest) = spec.strip_prefix("package:") {
        // package:name/path lives under this project's lib/.
        let (_, path) = rest.split_once('/')?;
        return Some(Target {
            anchor: Anchor::Only("lib".to_string()),
            path: path.to_string(),
            shorten: false,
            package: PackageMode::No,
            index_names: &[],
        });
    }
    if spec.starts_with('/') {
        return None;
    }

    let relative = spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../");
    let anchor = if relative {
        Anchor::Only(importer_dir.to_string())
    } else {
        Anchor::Search(importer_dir.to_string())
    };
    Some(Target {
        anchor,
        path: spec,
        shorten: false,
        package: PackageMode::No,
        index_names: &["index"],
    })
}

fn dotted_target(specifier: &str, importer_dir: &str) -> Option<Target> {
    let spec = specifier.trim();
    let (name, package) = match spec.strip_suffix(".*") {
        Some(name) => (name, PackageMode::Only),
        None => (spec, PackageMode::No),
    };
    if name.is_empty() {
        return None;
    }
    Some(Target {
        anchor: Anchor::Search(importer_dir.to_string()),
        path: name.replace('.', "/"),
        shorten: package == PackageMode::No,
        package,
        index_names: &[],
    })
}

fn module_directory_target(specifier: &str, importer_dir: &str) -> Option<Target> {
    let spec = specifier.trim();
    if spec.is_empty() {
        return None;
    }
    Some(Target {
        anchor: Anchor::Search(importer_dir.to_string()),
        path: spec.replace('.', "/"),
        shorten: false,
        package: PackageMode::Fallback,
        index_names: &[],
    })
}

fn python_target(specifier: &str, importer_dir: &str) -> Option<Target> {
    let spec = specifier.trim();
    let dots = spec.chars().take_while(|c| *c == '.').count();
    let path = spec[dots..].replace('.', "/");

    let anchor = if dots == 0 {
        if path.is_empty() {
            return None;
        }
        Anchor::Search(importer_dir.to_string())
    } else {
        // One dot is the importer's package; each further dot climbs a level.
        let mut dir = importer_dir.to_string();
        for _ in 1..dots {
            if dir.is_empty() {
                return None;
            }
            dir = parent_dir(&dir);
        }
        Anchor::Only(dir)
    };
    Some(Target {
        anchor,
        path,
        shorten: false,
        package: PackageMode::No,
        index_names: &["__init__"],
    })
}

/// The package part of a relative one-name specifier: `..` for `..name`.
fn python_package_of(specifier: &str) -> Option<&str> {
    let spec = specifier.trim();
    let dots = spec.chars().take_while(|c| *c == '.').count();
    let name = &spec[dots..];
    if dots == 0 || name.is_empty() || name.contains('.') {
        return None;
    }
    Some(&spec[..dots])
}

/// Directory holding a Rust file's child modules: `src/a/mod.rs` and
/// `src/lib.rs` own their directory, `src/a/b.rs` owns `src/a/b/`.
fn rust_module_dir(importer: &str) -> String {
    let dir = parent_dir(importer);
    let stem = Path::new(importer)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if matches!(stem.as_str(), "mod" | "lib" | "main") {
        dir
    } else {
        child_path(&dir, &stem)
    }
}

/// Parent directory of a root-relative path; "" for the root.
fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn child_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

fn join_within_root(base: &str, rel: &str) -> Option<String> {
    normalize_path(&child_path(base, rel))
}

/// Normalise separators and resolve `.`/`..`. Returns `None` when the path
/// climbs above the root.
pub fn normalize_path(path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            _ => parts.push(segment),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(files: &[&str]) -> ImportResolver {
        ImportResolver::new(
            files.iter().map(|f| f.to_string()),
            &["src".to_string(), "lib".to_string()],
            Some("github.com/acme/shop".to_string()),
        )
    }

    #[test]
    fn normalize_path_stays_inside_root() {
        assert_eq!(normalize_path("a/./b/../c"), Some("a/c".to_string()));
        assert_eq!(normalize_path("a\\b"), Some("a/b".to_string()));
        assert_eq!(normalize_path("../outside"), None);
        assert_eq!(normalize_path("a/../../outside"), None);
    }

    #[test]
    fn go_module_line() {
        assert_eq!(
            parse_go_module("// comment\nmodule github.com/acme/shop\n\ngo 1.22\n"),
            Some("github.com/acme/shop".to_string())
        );
        assert_eq!(parse_go_module("go 1.22\n"), None);
    }

    #[test]
    fn file_paths_probe_extensions_and_index() {
        let r = resolver(&["web/app.ts", "web/utils.ts", "web/components/index.tsx", "shared/api.ts"]);
        let exts = &["ts", "tsx", "js"];
        assert_eq!(r.resolve("web/app.ts", "./utils", ImportSyntax::FilePath, exts), vec!["web/utils.ts"]);
        assert_eq!(
            r.resolve("web/app.ts", "./components", ImportSyntax::FilePath, exts),
            vec!["web/components/index.tsx"]
        );
        assert_eq!(r.resolve("web/app.ts", "../shared/api", ImportSyntax::FilePath, exts), vec!["shared/api.ts"]);
        assert!(r.resolve("web/app.ts", "react", ImportSyntax::FilePath, exts).is_empty());
        assert!(r.resolve("web/app.ts", "../../escape", ImportSyntax::FilePath, exts).is_empty());
        // Explicitly relative specifiers never fall back to the root.
        assert!(r.resolve("web/app.ts", "./shared/api", ImportSyntax::FilePath, exts).is_empty());
    }

    #[test]
    fn file_paths_fall_back_to_root_and_source_roots() {
        let r = resolver(&["src/util/list.h", "src/main.c", "include.h"]);
        let exts = &["h", "c"];
        assert_eq!(r.resolve("src/main.c", "util/list.h", ImportSyntax::FilePath, exts), vec!["src/util/list.h"]);
        assert_eq!(r.resolve("app/x.c", "util/list.h", ImportSyntax::FilePath, exts), vec!["src/util/list.h"]);
        assert_eq!(r.resolve("src/main.c", "include.h", ImportSyntax::FilePath, exts), vec!["include.h"]);
        assert!(r.resolve("src/main.c", "stdio.h", ImportSyntax::FilePath, exts).is_empty());
    }

    #[test]
    fn dart_and_php_specifiers() {
        let r = resolver(&["lib/models/user.dart", "lib/main.dart", "app/Models/User.php"]);
        assert_eq!(
            r.resolve("lib/main.dart", "package:shop/models/user.dart", ImportSyntax::FilePath, &["dart"]),
            vec!["lib/models/user.dart"]
        );
        assert!(r.resolve("lib/main.dart", "dart:async", ImportSyntax::FilePath, &["dart"]).is_empty());
        assert_eq!(
            r.resolve("index.php", "\\app\\Models\\User", ImportSyntax::FilePath, &["php"]),
            vec!["app/Models/User.php"]
        );
    }

    #[test]
    fn python_modules_and_relative_imports() {
        let r = resolver(&[
            "pkg/__init__.py",
            "pkg/models.py",
            "pkg/sub/__init__.py",
            "pkg/sub/views.py",
            "src/tools/cli.py",
        ]);
        let exts = &["py"];
        assert_eq!(r.resolve("pkg/sub/views.py", "..models", ImportSyntax::PythonModule, exts), vec!["pkg/models.py"]);
        assert_eq!(r.resolve("pkg/sub/views.py", ".", ImportSyntax::PythonModule, exts), vec!["pkg/sub/__init__.py"]);
        assert_eq!(r.resolve("main.py", "pkg.sub", ImportSyntax::PythonModule, exts), vec!["pkg/sub/__init__.py"]);
        assert_eq!(r.resolve("main.py", "tools.cli", ImportSyntax::PythonModule, exts), vec!["src/tools/cli.py"]);
        assert!(r.resolve("main.py", "os.path", ImportSyntax::PythonModule, exts).is_empty());
        assert!(r.resolve("pkg/models.py", "....too_far", ImportSyntax::PythonModule, exts).is_empty());
    }

    #[test]
    fn python_names_from_the_package_fall_back_to_init() {
        let r = resolver(&["pkg/__init__.py", "pkg/models.py", "pkg/sub/views.py"]);
        let exts = &["py"];
        assert_eq!(r.resolve("pkg/models.py", ".helper", ImportSyntax::PythonModule, exts), vec!["pkg/__init__.py"]);
        assert_eq!(r.resolve("pkg/sub/views.py", "..helper", ImportSyntax::PythonModule, exts), vec!["pkg/__init__.py"]);
        assert_eq!(r.resolve("pkg/models.py", ".models", ImportSyntax::PythonModule, exts), vec!["pkg/models.py"]);
        assert!(r.resolve("pkg/models.py", ".missing.deep", ImportSyntax::PythonModule, exts).is_empty());
        assert!(r.resolve("main.py", "helper", ImportSyntax::PythonModule, exts).is_empty());
    }

    #[test]
    fn rust_paths() {
        let r = resolver(&[
            "src/main.rs",
            "src/model.rs",
            "src/service.rs",
            "src/graph/mod.rs",
            "src/graph/cycles.rs",
            "src/service/cache.rs",
        ]);
        let exts = &["rs"];
        assert_eq!(r.resolve("src/main.rs", "model", ImportSyntax::RustPath, exts), vec!["src/model.rs"]);
        assert_eq!(
            r.resolve("src/service.rs", "crate::model::Item", ImportSyntax::RustPath, exts),
            vec!["src/model.rs"]
        );
        assert_eq!(r.resolve("src/service.rs", "cache", ImportSyntax::RustPath, exts), vec!["src/service/cache.rs"]);
        assert_eq!(
            r.resolve("src/graph/mod.rs", "self::cycles::find", ImportSyntax::RustPath, exts),
            vec!["src/graph/cycles.rs"]
        );
        assert_eq!(
            r.resolve("src/graph/cycles.rs", "super::super::model::Item", ImportSyntax::RustPath, exts),
            vec!["src/model.rs"]
        );
        assert_eq!(r.resolve("src/main.rs", "crate::graph", ImportSyntax::RustPath, exts), vec!["src/graph/mod.rs"]);
        assert!(r.resolve("src/main.rs", "std::io::Read", ImportSyntax::RustPath, exts).is_empty());
        assert!(r.resolve("src/main.rs", "serde::Serialize", ImportSyntax::RustPath, exts).is_empty());
    }

    #[test]
    fn dotted_names_and_packages() {
        let r = resolver(&[
            "src/main/java/com/acme/App.java",
            "src/main/java/com/acme/model/User.java",
            "src/main/java/com/acme/model/Order.java",
            "src/main/java/com/acme/util/Strings.java",
        ]);
        let r = ImportResolver {
            source_roots: vec!["src/main/java".to_string()],
            ..r
        };
        let exts = &["java", "kt"];
        let app = "src/main/java/com/acme/App.java";
        assert_eq!(
            r.resolve(app, "com.acme.model.User", ImportSyntax::Dotted, exts),
            vec!["src/main/java/com/acme/model/User.java"]
        );
        assert_eq!(
            r.resolve(app, "com.acme.util.Strings.trim", ImportSyntax::Dotted, exts),
            vec!["src/main/java/com/acme/util/Strings.java"]
        );
        assert_eq!(
            r.resolve(app, "com.acme.model.*", ImportSyntax::Dotted, exts),
            vec![
                "src/main/java/com/acme/model/Order.java",
                "src/main/java/com/acme/model/User.java"
            ]
        );
        assert!(r.resolve(app, "java.util.List", ImportSyntax::Dotted, exts).is_empty());
    }

    #[test]
    fn swift_modules_are_directories() {
        let r = resolver(&["Sources/Core/Store.swift", "Sources/Core/Model.swift", "Sources/App/main.swift"]);
        let r = ImportResolver {
            source_roots: vec!["Sources".to_string()],
            ..r
        };
        assert_eq!(
            r.resolve("Sources/App/main.swift", "Core", ImportSyntax::ModuleDirectory, &["swift"]),
            vec!["Sources/Core/Model.swift", "Sources/Core/Store.swift"]
        );
        assert!(r
            .resolve("Sources/App/main.swift", "Foundation", ImportSyntax::ModuleDirectory, &["swift"])
            .is_empty());
    }

    #[test]
    fn go_packages_strip_the_module_prefix() {
        let r = resolver(&["main.go", "internal/store/store.go", "internal/store/cache.go", "internal/store/README.md"]);
        assert_eq!(
            r.resolve("main.go", "github.com/acme/shop/internal/store", ImportSyntax::GoPackage, &["go"]),
            vec!["internal/store/cache.go", "internal/store/store.go"]
        );
        assert!(r.resolve("main.go", "fmt", ImportSyntax::GoPackage, &["go"]).is_empty());
        assert!(r
            .resolve("main.go", "github.com/other/lib", ImportSyntax::GoPackage, &["go"])
            .is_empty());
    }
}
