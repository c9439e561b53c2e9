//! Toolkit health checks.
//!
//! The `doctor` command runs discovery and reports what it found, check
//! by check. Only the main shared library is required; every other
//! check degrades to a warning when its subject is missing.
//!
//! ## Usage
//!
//! ```bash
//! gangway doctor           # Quick check
//! gangway doctor --verbose # Detailed output
//! ```
//!
//! ## Checks Performed
//!
//! - Toolkit version (validated release or not)
//! - Query tool (llvm-config) availability
//! - Main shared library (required)
//! - LTO library and its reported API version
//! - Companion tools (llc, lli, opt, llvm-link, clang)
//! - C compiler availability
//! - Enabled backend list

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::bindings::{self, LtoApi};
use crate::core::platform;
use crate::discovery::{self, Installation};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or library (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            version: None,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        DoctorReport {
            checks: Vec::new(),
            total_duration: Duration::ZERO,
            environment: HashMap::new(),
        }
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

impl Default for DoctorReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Include verbose output
    pub verbose: bool,
}

/// Run the doctor command.
pub fn doctor(_options: DoctorOptions) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());

    match discovery::installation() {
        Ok(installation) => {
            collect_environment(&mut report, installation);

            report.add(check_version(installation));
            report.add(check_query_tool(installation));
            report.add(check_main_library(installation));
            report.add(check_lto_library(installation));
            report.add(check_companion_tools(installation));
            report.add(check_c_compiler(installation));
            report.add(check_targets(installation));
        }
        Err(e) => {
            report.add(CheckResult::fail("Discovery", e.to_string()));
        }
    }

    report.total_duration = start.elapsed();
    report
}

/// Record the discovered paths for the verbose environment section.
fn collect_environment(report: &mut DoctorReport, installation: &Installation) {
    if let Some(triple) = &installation.host_triple {
        report
            .environment
            .insert("host".to_string(), triple.clone());
    }
    if let Some(bindir) = &installation.bindir {
        report
            .environment
            .insert("bindir".to_string(), bindir.display().to_string());
    }
    if let Some(libdir) = &installation.libdir {
        report
            .environment
            .insert("libdir".to_string(), libdir.display().to_string());
    }
}

/// Check whether the toolkit version is one this binding was validated
/// against.
fn check_version(installation: &Installation) -> CheckResult {
    match installation.version {
        Some(version) if platform::is_tested(version) => CheckResult::pass(
            "Version",
            format!("LLVM {} is a validated release", version),
        )
        .with_version(version.to_string()),
        Some(version) => CheckResult::fail(
            "Version",
            format!("LLVM {} has not been validated with this binding", version),
        )
        .with_version(version.to_string())
        .optional(),
        None => CheckResult::fail(
            "Version",
            format!(
                "no version reported; assuming LLVM {}",
                installation.effective_version()
            ),
        )
        .optional(),
    }
}

/// Check for the query tool.
fn check_query_tool(installation: &Installation) -> CheckResult {
    match &installation.config_tool {
        Some(tool) => CheckResult::pass(
            "Query Tool",
            format!("{} is available", discovery::CONFIG_TOOL),
        )
        .with_path(tool.path().to_path_buf())
        .optional(),
        None => CheckResult::fail(
            "Query Tool",
            format!(
                "{} was not found; install paths and the backend list are unavailable",
                discovery::CONFIG_TOOL
            ),
        )
        .optional(),
    }
}

/// The main shared library is loaded whenever discovery succeeds.
fn check_main_library(installation: &Installation) -> CheckResult {
    CheckResult::pass(
        "Main Library",
        format!("loaded {}", installation.library.name()),
    )
    .with_path(PathBuf::from(installation.library.name()))
}

/// Check the LTO library and compare its reported API version against
/// the one expected for the toolkit generation.
fn check_lto_library(installation: &Installation) -> CheckResult {
    if installation.lto_library.is_none() {
        return CheckResult::fail(
            "LTO Library",
            "not found next to the main library (used for link-time optimization)",
        )
        .optional();
    }

    match bindings::lto_api() {
        Ok(Some(api)) => {
            let expected = LtoApi::expected_api_version(installation.effective_version());
            if let (Some(runtime), Some(expected)) = (api.runtime_api_version(), expected) {
                if runtime != expected {
                    return CheckResult::fail(
                        "LTO Library",
                        format!(
                            "reports API version {}, expected {} for LLVM {}",
                            runtime,
                            expected,
                            installation.effective_version()
                        ),
                    )
                    .optional();
                }
            }

            let message = match api.runtime_api_version() {
                Some(runtime) => format!("loaded (API version {})", runtime),
                None => "loaded".to_string(),
            };
            let mut result = CheckResult::pass("LTO Library", message).optional();
            if let Some(banner) = api.version_string() {
                result = result.with_version(banner);
            }
            result
        }
        Ok(None) => CheckResult::fail("LTO Library", "not loaded").optional(),
        Err(e) => CheckResult::fail("LTO Library", e.to_string()).optional(),
    }
}

/// Check for the companion executables.
fn check_companion_tools(installation: &Installation) -> CheckResult {
    let tools = &installation.tools;
    let inventory = [
        (discovery::CODE_GENERATOR_TOOL, &tools.code_generator),
        (discovery::INTERPRETER_TOOL, &tools.interpreter),
        (discovery::OPTIMIZER_TOOL, &tools.optimizer),
        (discovery::LINKER_TOOL, &tools.linker),
        (discovery::FRONT_END_TOOL, &tools.front_end),
    ];

    let missing: Vec<&str> = inventory
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        CheckResult::pass(
            "Companion Tools",
            format!("all {} tools are available", inventory.len()),
        )
        .optional()
    } else {
        CheckResult::fail("Companion Tools", format!("missing: {}", missing.join(", ")))
            .optional()
    }
}

/// Check for a C compiler.
fn check_c_compiler(installation: &Installation) -> CheckResult {
    match &installation.c_compiler {
        Some(path) => CheckResult::pass("C Compiler", format!("found {}", file_name_of(path)))
            .with_path(path.clone())
            .optional(),
        None => CheckResult::fail("C Compiler", "no C compiler found (tried clang, gcc, cc)")
            .optional(),
    }
}

/// Check the enabled backend list.
fn check_targets(installation: &Installation) -> CheckResult {
    if installation.targets.is_empty() {
        return CheckResult::fail(
            "Targets",
            "no backend list available (query tool was not found)",
        )
        .optional();
    }

    let unrecognized: Vec<&str> = installation
        .targets
        .iter()
        .map(String::as_str)
        .filter(|name| !platform::is_known_target(name))
        .collect();

    if unrecognized.is_empty() {
        CheckResult::pass(
            "Targets",
            format!("{} backends enabled", installation.targets.len()),
        )
        .optional()
    } else {
        CheckResult::fail(
            "Targets",
            format!("unrecognized backends: {}", unrecognized.join(", ")),
        )
        .optional()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "Gangway Doctor").unwrap();
    writeln!(output, "==============\n").unwrap();

    // Environment
    if verbose {
        writeln!(output, "Environment:").unwrap();
        writeln!(
            output,
            "  OS: {} ({})",
            report
                .environment
                .get("os")
                .unwrap_or(&"unknown".to_string()),
            report
                .environment
                .get("arch")
                .unwrap_or(&"unknown".to_string())
        )
        .unwrap();
        if let Some(host) = report.environment.get("host") {
            writeln!(output, "  Host triple: {}", host).unwrap();
        }
        if let Some(bindir) = report.environment.get("bindir") {
            writeln!(output, "  Binary directory: {}", bindir).unwrap();
        }
        if let Some(libdir) = report.environment.get("libdir") {
            writeln!(output, "  Library directory: {}", libdir).unwrap();
        }
        writeln!(output).unwrap();
    }

    // Checks
    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose {
            writeln!(output, "      {}", check.message).unwrap();
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "      Version: {}", version).unwrap();
            }
        } else if !check.passed {
            writeln!(output, "      {}", check.message).unwrap();
        }
    }

    writeln!(output).unwrap();

    // Summary
    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    writeln!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\nError: no usable toolkit; see the failed checks above."
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed. The toolkit is ready to use.").unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_pass() {
        let result = CheckResult::pass("test", "passed");
        assert!(result.passed);
        assert!(result.required);
    }

    #[test]
    fn test_check_result_optional() {
        let result = CheckResult::pass("test", "passed").optional();
        assert!(result.passed);
        assert!(!result.required);
    }

    #[test]
    fn test_doctor_report_all_passed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("check1", "ok"));
        report.add(CheckResult::pass("check2", "ok"));

        assert!(report.all_required_passed());
        assert_eq!(report.passed_count(), 2);
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_doctor_report_optional_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("required", "ok"));
        report.add(CheckResult::fail("optional", "missing").optional());

        assert!(report.all_required_passed());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.required_failed_count(), 0);
    }

    #[test]
    fn test_doctor_report_required_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("check1", "ok"));
        report.add(CheckResult::fail("check2", "missing"));

        assert!(!report.all_required_passed());
        assert_eq!(report.required_failed_count(), 1);
    }

    #[test]
    fn test_format_report_shows_failure_reasons() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("Main Library", "loaded libLLVM-3.5.so.1"));
        report.add(CheckResult::fail("Query Tool", "llvm-config was not found").optional());

        let text = format_report(&report, false);
        assert!(text.contains("Gangway Doctor"));
        assert!(text.contains("[OK] Main Library"));
        assert!(text.contains("[!!] Query Tool (optional)"));
        assert!(text.contains("llvm-config was not found"));
        assert!(text.contains("All required checks passed"));
    }

    #[test]
    fn test_format_report_verbose_includes_details() {
        let mut report = DoctorReport::new();
        report.environment.insert("os".to_string(), "linux".to_string());
        report
            .environment
            .insert("arch".to_string(), "x86_64".to_string());
        report.add(
            CheckResult::pass("C Compiler", "found clang")
                .with_path(PathBuf::from("/usr/bin/clang"))
                .with_version("clang version 3.5.0")
                .optional(),
        );

        let text = format_report(&report, true);
        assert!(text.contains("OS: linux (x86_64)"));
        assert!(text.contains("Path: /usr/bin/clang"));
        assert!(text.contains("Version: clang version 3.5.0"));
        assert!(text.contains("All checks passed"));
    }
}
