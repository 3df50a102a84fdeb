//! CLI integration tests for cmakegen.
//!
//! These tests run the binary against copies of the projects under
//! `tests/fixtures/`, with the global config directory redirected to a
//! temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// A fixture project copied into a temporary directory, plus an isolated
/// global config home.
struct Sandbox {
    _tmp: TempDir,
    project: PathBuf,
    home: PathBuf,
}

impl Sandbox {
    fn new(fixture: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(fixture);
        let home = tmp.path().join("home");
        fs::create_dir(&home).unwrap();

        let source = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture);
        copy_dir(&source, &project);

        Sandbox {
            _tmp: tmp,
            project,
            home,
        }
    }

    fn empty() -> Self {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("empty");
        let home = tmp.path().join("home");
        fs::create_dir(&project).unwrap();
        fs::create_dir(&home).unwrap();
        Sandbox {
            _tmp: tmp,
            project,
            home,
        }
    }

    /// The cmakegen binary, run from the project directory.
    fn cmakegen(&self) -> Command {
        let mut cmd = Command::cargo_bin("cmakegen").unwrap();
        cmd.current_dir(&self.project)
            .env("CMAKEGEN_HOME", &self.home)
            .env("NO_COLOR", "1");
        cmd
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.project.join(rel)).unwrap()
    }
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn json_lines(output: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// ============================================================================
// cmakegen scan
// ============================================================================

#[test]
fn test_scan_lists_root_module() {
    let sandbox = Sandbox::new("simple_project");

    sandbox
        .cmakegen()
        .args(["scan", "--name", "simple"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(root)"))
        .stdout(predicate::str::contains("2 sources, 1 headers"))
        .stdout(predicate::str::contains("(main)"));
}

#[test]
fn test_scan_missing_root_fails() {
    let sandbox = Sandbox::empty();

    sandbox
        .cmakegen()
        .args(["scan", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_scan_json_report() {
    let sandbox = Sandbox::new("multi_module");

    let output = sandbox
        .cmakegen()
        .args(["--message-format", "json", "scan", "--name", "calc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines[0]["reason"], "scan-finished");
    assert_eq!(lines[0]["modules"], 3);
    let report = lines.last().unwrap();
    assert_eq!(report["project"], "calc");
    assert_eq!(report["modules"][0]["id"], "src");
}

// ============================================================================
// cmakegen analyze
// ============================================================================

#[test]
fn test_analyze_prints_build_order() {
    let sandbox = Sandbox::new("multi_module");

    sandbox
        .cmakegen()
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/main.cpp"))
        .stdout(predicate::str::contains("-> src/math/calculator.h"))
        .stdout(predicate::str::contains("src -> src/math, src/utils"))
        .stdout(predicate::str::contains(
            "1. src/utils\n  2. src/math\n  3. src\n",
        ));
}

#[test]
fn test_analyze_reports_cycle() {
    let sandbox = Sandbox::new("cyclic");

    let output = sandbox
        .cmakegen()
        .args(["--message-format", "json", "analyze"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert!(lines
        .iter()
        .any(|l| l["reason"] == "warning" && l["detail"]["kind"] == "module-cycle"));
    let report = lines.last().unwrap();
    assert_eq!(report["order"]["status"], "cyclic");
    assert_eq!(report["order"]["order"], serde_json::json!(["x", "y"]));
}

// ============================================================================
// cmakegen generate
// ============================================================================

#[test]
fn test_generate_simple_project() {
    let sandbox = Sandbox::new("simple_project");

    sandbox
        .cmakegen()
        .args(["generate", "--name", "demo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    let doc = sandbox.read("CMakeLists.txt");
    assert!(doc.starts_with("cmake_minimum_required(VERSION 3.10)\n"));
    assert!(doc.contains("project(demo LANGUAGES CXX)"));
    assert!(doc.contains("add_executable(demo\n    main.cpp\n    utils.cpp\n    utils.h\n)"));
    assert!(!doc.contains("target_link_libraries"));
}

#[test]
fn test_generate_multi_module() {
    let sandbox = Sandbox::new("multi_module");

    sandbox
        .cmakegen()
        .args(["generate", "--name", "calc", "--min-version", "3.16"])
        .assert()
        .success();

    let root = sandbox.read("CMakeLists.txt");
    assert!(root.starts_with("cmake_minimum_required(VERSION 3.16)\n"));
    assert!(root.contains(
        "add_subdirectory(src/utils)\nadd_subdirectory(src/math)\nadd_subdirectory(src)\n"
    ));

    let math = sandbox.read("src/math/CMakeLists.txt");
    assert!(math.contains("add_library(math STATIC"));
    assert!(math.contains("target_link_libraries(math PUBLIC\n    utils\n)"));
}

#[test]
fn test_generate_skips_existing_unless_forced() {
    let sandbox = Sandbox::new("simple_project");
    fs::write(sandbox.project.join("CMakeLists.txt"), "# mine\n").unwrap();

    sandbox
        .cmakegen()
        .arg("generate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped"));
    assert_eq!(sandbox.read("CMakeLists.txt"), "# mine\n");

    sandbox
        .cmakegen()
        .args(["generate", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));
    assert!(sandbox.read("CMakeLists.txt").contains("add_executable"));
}

#[test]
fn test_generate_json_events() {
    let sandbox = Sandbox::new("multi_module");

    let output = sandbox
        .cmakegen()
        .args(["--message-format", "json", "generate"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert!(lines.iter().any(|l| l["reason"] == "scan-finished"));
    let documents: Vec<_> = lines.iter().filter(|l| l["reason"] == "document").collect();
    assert_eq!(documents.len(), 4);
    assert!(documents.iter().all(|d| d["status"] == "written"));

    let finished = lines.last().unwrap();
    assert_eq!(finished["reason"], "generate-finished");
    assert_eq!(finished["success"], true);
    assert_eq!(finished["written"], 4);
}

#[test]
fn test_generate_uses_project_config() {
    let sandbox = Sandbox::new("simple_project");

    sandbox
        .cmakegen()
        .args(["config", "set", "project.cpp_standard", "17", "--project", "."])
        .assert()
        .success();
    assert!(sandbox.project.join(".cmakegen/config.toml").exists());

    sandbox.cmakegen().arg("generate").assert().success();
    assert!(sandbox
        .read("CMakeLists.txt")
        .contains("set(CMAKE_CXX_STANDARD 17)"));
}

// ============================================================================
// cmakegen build
// ============================================================================

#[test]
fn test_build_requires_generated_project() {
    let sandbox = Sandbox::new("simple_project");

    sandbox
        .cmakegen()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cmakegen generate"));
}

// ============================================================================
// cmakegen config
// ============================================================================

#[test]
fn test_config_path_uses_home_override() {
    let sandbox = Sandbox::empty();

    sandbox
        .cmakegen()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            sandbox.home.join("config.toml").display().to_string(),
        ));
}

#[test]
fn test_config_init_and_set() {
    let sandbox = Sandbox::empty();

    sandbox
        .cmakegen()
        .args(["config", "init"])
        .assert()
        .success();
    assert!(sandbox.home.join("config.toml").exists());

    sandbox
        .cmakegen()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    sandbox
        .cmakegen()
        .args(["config", "set", "cmake.min_version", "3.20"])
        .assert()
        .success();

    sandbox
        .cmakegen()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min_version = \"3.20\""));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let sandbox = Sandbox::empty();

    sandbox
        .cmakegen()
        .args(["config", "set", "cmake.flavour", "spicy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_set_validates_value() {
    let sandbox = Sandbox::empty();

    sandbox
        .cmakegen()
        .args(["config", "set", "project.library_type", "dynamic"])
        .assert()
        .failure();
    assert!(!sandbox.home.join("config.toml").exists());
}

// ============================================================================
// cmakegen completions
// ============================================================================

#[test]
fn test_completions_bash() {
    Command::cargo_bin("cmakegen")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cmakegen"));
}
