//! Test directory discovery
//!
//! Resolves the working directory for the Playwright runner by probing a
//! prioritized list of candidates for one of the [`CONFIG_FILES`] markers.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::{CONFIG_FILES, E2E_DIR, REPORT_DIR, RESULTS_DIR};

/// Subdirectories of the working directory probed when nothing explicit
/// matched, in priority order. `.` comes last: a stray config file in an
/// unrelated directory is the likeliest false positive.
const CONVENTIONAL_DIRS: [&str; 4] = [E2E_DIR, "tests", "test", "."];

/// Locates Playwright project directories relative to a working directory
#[derive(Debug, Clone)]
pub struct TestDirLocator {
    cwd: PathBuf,
}

impl TestDirLocator {
    /// Create a locator rooted at `cwd`
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Create a locator rooted at the process working directory
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// The directory relative candidates are resolved against
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the runner's working directory.
    ///
    /// Explicit intent wins over inference: `explicit_dir` (and its `e2e`
    /// child) is tried first, then each search path (and its `e2e` child),
    /// then the conventional directories under the working directory.
    pub fn locate(&self, explicit_dir: Option<&Path>, search_paths: &[PathBuf]) -> Option<PathBuf> {
        explicit_dir
            .into_iter()
            .chain(search_paths.iter().map(PathBuf::as_path))
            .flat_map(|base| {
                let resolved = self.resolve(base);
                let nested = resolved.join(E2E_DIR);
                [resolved, nested]
            })
            .chain(CONVENTIONAL_DIRS.iter().map(|dir| self.resolve(Path::new(dir))))
            .find(|candidate| {
                let found = has_playwright_config(candidate);
                debug!("Probing {} -> {}", candidate.display(), found);
                found
            })
    }

    /// Absolute paths as given; relative ones joined onto cwd without `.` segments
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        path.components()
            .filter(|component| !matches!(component, Component::CurDir))
            .fold(self.cwd.clone(), |acc, component| acc.join(component))
    }
}

/// Whether `dir` is a directory holding one of the recognized config files
pub fn has_playwright_config(dir: &Path) -> bool {
    dir.is_dir() && CONFIG_FILES.iter().any(|name| dir.join(name).is_file())
}

/// `<test_dir>/playwright-report`, if it exists
pub fn find_report_dir(test_dir: &Path) -> Option<PathBuf> {
    existing_dir(test_dir.join(REPORT_DIR))
}

/// `<test_dir>/test-results`, if it exists
pub fn find_results_dir(test_dir: &Path) -> Option<PathBuf> {
    existing_dir(test_dir.join(RESULTS_DIR))
}

fn existing_dir(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use test_case::test_case;

    fn mark(dir: &Path, config: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(config), "export default {}\n").unwrap();
    }

    #[test_case("playwright.config.ts"; "typescript")]
    #[test_case("playwright.config.js"; "javascript")]
    #[test_case("playwright.config.mjs"; "module")]
    fn test_recognizes_every_config_marker(config: &str) {
        let tmp = TempDir::new().unwrap();
        mark(tmp.path(), config);
        assert!(has_playwright_config(tmp.path()));
    }

    #[test]
    fn test_ignores_unrelated_config_names() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("playwright.config.cjs"), "").unwrap();
        fs::write(tmp.path().join("vitest.config.ts"), "").unwrap();
        assert!(!has_playwright_config(tmp.path()));
    }

    #[test]
    fn test_marker_must_be_a_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("playwright.config.ts")).unwrap();
        assert!(!has_playwright_config(tmp.path()));
    }

    #[test]
    fn test_explicit_dir_falls_through_to_e2e_child() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("app");
        mark(&project.join("e2e"), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(locator.locate(Some(project.as_path()), &[]), Some(project.join("e2e")));
    }

    #[test]
    fn test_explicit_dir_wins_over_conventions() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom");
        mark(&explicit, "playwright.config.js");
        mark(&tmp.path().join("e2e"), "playwright.config.ts");
        mark(tmp.path(), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        let search = vec![tmp.path().join("e2e")];
        assert_eq!(locator.locate(Some(explicit.as_path()), &search), Some(explicit));
    }

    #[test]
    fn test_relative_explicit_dir_resolves_against_cwd() {
        let tmp = TempDir::new().unwrap();
        mark(&tmp.path().join("suite"), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(
            locator.locate(Some(Path::new("suite")), &[]),
            Some(tmp.path().join("suite"))
        );
    }

    #[test]
    fn test_search_paths_are_tried_in_order() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        mark(&first.join("e2e"), "playwright.config.ts");
        mark(&second, "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        let found = locator.locate(None, &[first.clone(), second]);
        assert_eq!(found, Some(first.join("e2e")));
    }

    #[test]
    fn test_unmarked_explicit_dir_falls_back_to_search_paths() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("empty");
        fs::create_dir_all(&explicit).unwrap();
        let search = tmp.path().join("elsewhere");
        mark(&search, "playwright.config.mjs");

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(locator.locate(Some(explicit.as_path()), &[search.clone()]), Some(search));
    }

    #[test]
    fn test_conventional_order_prefers_subdirectories() {
        let tmp = TempDir::new().unwrap();
        mark(&tmp.path().join("test"), "playwright.config.ts");
        mark(&tmp.path().join("tests"), "playwright.config.ts");
        mark(tmp.path(), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(locator.locate(None, &[]), Some(tmp.path().join("tests")));
    }

    #[test]
    fn test_bare_cwd_is_last_resort() {
        let tmp = TempDir::new().unwrap();
        mark(tmp.path(), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        let found = locator.locate(None, &[]).unwrap();
        assert_eq!(found, tmp.path());
        assert_eq!(find_report_dir(&found), None);
        assert!(!found.join(REPORT_DIR).to_string_lossy().contains("/./"));
    }

    #[test]
    fn test_explicit_dot_resolves_to_cwd() {
        let tmp = TempDir::new().unwrap();
        mark(tmp.path(), "playwright.config.js");

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(locator.locate(Some(Path::new("./")), &[]), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_not_found_without_any_marker() {
        let tmp = TempDir::new().unwrap();
        for dir in ["e2e", "tests", "test"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }

        let locator = TestDirLocator::new(tmp.path());
        assert_eq!(locator.locate(None, &[]), None);
    }

    #[test]
    fn test_locate_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        mark(&tmp.path().join("e2e"), "playwright.config.ts");

        let locator = TestDirLocator::new(tmp.path());
        let first = locator.locate(None, &[]);
        assert!(first.is_some());
        assert_eq!(first, locator.locate(None, &[]));
    }

    #[test]
    fn test_report_and_results_dirs_need_only_existence() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_report_dir(tmp.path()), None);
        assert_eq!(find_results_dir(tmp.path()), None);

        fs::create_dir_all(tmp.path().join(REPORT_DIR)).unwrap();
        fs::create_dir_all(tmp.path().join(RESULTS_DIR)).unwrap();
        assert_eq!(find_report_dir(tmp.path()), Some(tmp.path().join(REPORT_DIR)));
        assert_eq!(find_results_dir(tmp.path()), Some(tmp.path().join(RESULTS_DIR)));
    }
}
