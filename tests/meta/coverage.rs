//! Keeps `tests/unit` in step with `src` and every test target compiled
//!
//! Cargo only builds `tests/*.rs` and `tests/<dir>/main.rs`, so a test
//! directory without a `main.rs` declaring each of its modules is silently
//! skipped. These checks make that layout mistake fail loudly.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const TESTS_DIR: &str = "tests";
    const UNIT_DIR: &str = "tests/unit";

    // Root file of a test target living in its own directory
    const HARNESS: &str = "main.rs";
    const MODULE_FILE: &str = "mod.rs";

    // Files in src with no behaviour of their own to mirror
    fn is_organisational(relative: &str) -> bool {
        relative == HARNESS || relative == "lib.rs" || relative.ends_with(MODULE_FILE)
    }

    /// Relative paths of every `.rs` file and directory below `base`
    fn collect_relative_paths(dir: &Path, base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Ok(relative) = path.strip_prefix(base) else {
                return Err(io::Error::other("entry outside base directory"));
            };
            let relative = relative.to_string_lossy().replace('\\', "/");

            if path.is_dir() {
                paths.extend(collect_relative_paths(&path, base)?);
                paths.insert(relative);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                paths.insert(relative);
            }
        }

        Ok(paths)
    }

    fn read_paths(dir: &str) -> BTreeSet<String> {
        let path = Path::new(dir);
        collect_relative_paths(path, path).unwrap_or_else(|error| {
            unreachable!("Failed to scan {dir}: {error}");
        })
    }

    // Tests every behavioural source file has a unit test file at the same path
    // Verified by deleting tests/unit/io/export.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_paths = read_paths(SRC_DIR);
        let test_paths = read_paths(UNIT_DIR);

        let missing: Vec<String> = src_paths
            .iter()
            .filter(|path| !is_organisational(path) && !test_paths.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    // Tests no unit test file outlives its source file
    // Verified by adding tests/unit/io/cli.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_paths = read_paths(SRC_DIR);
        let test_paths = read_paths(UNIT_DIR);

        let orphaned: Vec<String> = test_paths
            .iter()
            .filter(|path| *path != HARNESS && !path.ends_with(MODULE_FILE))
            .filter(|path| !src_paths.contains(*path))
            .map(|path| format!("  - tests/unit/{path} (no src/{path})"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without source counterparts:\n{}",
            orphaned.join("\n")
        );
    }

    // Tests each test directory is a compiled target declaring all its modules
    // Verified by moving tests/unit/main.rs back to tests/unit.rs
    #[test]
    fn test_test_directories_have_harness() {
        let Ok(entries) = fs::read_dir(TESTS_DIR) else {
            unreachable!("Failed to scan {TESTS_DIR}");
        };

        for entry in entries.filter_map(Result::ok) {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }

            let harness = dir.join(HARNESS);
            let Ok(source) = fs::read_to_string(&harness) else {
                unreachable!("{} is not compiled: missing {}", dir.display(), harness.display());
            };

            let Ok(children) = fs::read_dir(&dir) else {
                unreachable!("Failed to scan {}", dir.display());
            };
            for child in children.filter_map(Result::ok) {
                let path = child.path();
                let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                let is_module = path.is_dir() || path.extension().is_some_and(|ext| ext == "rs");
                if !is_module || stem == "main" {
                    continue;
                }

                assert!(
                    source.contains(&format!("mod {stem};")),
                    "{} does not declare `mod {stem};`",
                    harness.display()
                );
            }
        }
    }

    // Tests every test file actually holds tests
    // Verified by emptying tests/unit/math/units.rs
    #[test]
    fn test_all_test_files_contain_tests() {
        let base = Path::new(TESTS_DIR);
        let empty: Vec<String> = read_paths(TESTS_DIR)
            .into_iter()
            .filter(|path| path.ends_with(".rs"))
            .filter(|path| {
                let is_harness =
                    path.ends_with(&format!("/{HARNESS}")) && path.matches('/').count() == 1;
                !is_harness && !path.ends_with(MODULE_FILE)
            })
            .filter(|path| {
                !fs::read_to_string(base.join(path)).is_ok_and(|content| content.contains("#[test]"))
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without any #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
