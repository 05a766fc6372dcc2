//! # invoice-toolcheck
//!
//! Verify that the external programs an invoice renderer depends on are
//! installed and runnable, so a failed conversion can be told apart from a
//! broken installation.
//!
//! ## How it works
//!
//! For every [`ToolSpec`]:
//!
//! 1. Runs `<program> --version` (or the spec's own arguments) and waits for it.
//! 2. Exit status 0 → [`ToolStatus::Found`], with the first line of output and
//!    the first dotted version number found in stdout or stderr.
//! 3. Spawn failure or non-zero exit → [`ToolStatus::NotFound`] with the reason.
//!
//! Checks are synchronous and independent of one another. Nothing here is
//! shared with the conversion pipeline.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use invoice_toolcheck::{all_found, check_all, default_tools};
//!
//! let reports = check_all(&default_tools("java"));
//! for r in &reports {
//!     println!("{}: {}", r.spec.name, if r.status.is_found() { "FOUND" } else { "NOT FOUND" });
//! }
//! assert!(all_found(&reports));
//! ```
//!
//! ## Default tools
//!
//! | Tool        | Query                     | Needed for         |
//! |-------------|---------------------------|--------------------|
//! | Java        | `java --version`          | every conversion   |
//! | wkhtmltopdf | `wkhtmltopdf --version`   | PDF mode           |

use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Argument used to query a tool's version when a spec does not override it.
pub const VERSION_FLAG: &str = "--version";

/// Install hint printed when Java is missing.
pub const JAVA_INSTALL_HINT: &str =
    "Please install Java JDK 11+ from https://adoptium.net/ or https://www.oracle.com/java/.";

/// Install hint printed when wkhtmltopdf is missing.
pub const WKHTMLTOPDF_INSTALL_HINT: &str =
    "Please install the appropriate version from https://wkhtmltopdf.org/downloads.html.";

// ── Error type ───────────────────────────────────────────────────────────────

/// Why a tool was reported as missing.
#[derive(Error, Debug)]
pub enum ToolCheckError {
    /// The program could not be started at all (not on PATH, not executable).
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program started but its version query failed.
    #[error("'{program}' exited with {}", describe_exit(.code))]
    NonZeroExit { program: String, code: Option<i32> },
}

// ── Tool descriptions ────────────────────────────────────────────────────────

/// One external program to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Display name, e.g. `Java`.
    pub name: String,
    /// Executable name or path, e.g. `java`.
    pub program: String,
    /// Arguments for the version query. Default: `["--version"]`.
    pub args: Vec<String>,
    /// Shown to the user when the tool is missing.
    pub install_hint: Option<String>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: vec![VERSION_FLAG.to_string()],
            install_hint: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn install_hint(mut self, hint: impl Into<String>) -> Self {
        self.install_hint = Some(hint.into());
        self
    }
}

/// The result of checking one tool.
#[derive(Debug)]
pub enum ToolStatus {
    /// The version query succeeded.
    Found {
        /// First non-empty line the tool printed (stdout preferred).
        version_line: String,
        /// First dotted number in the output, e.g. `17.0.2`.
        version: Option<String>,
    },
    /// The tool is missing or broken.
    NotFound { reason: ToolCheckError },
}

impl ToolStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, ToolStatus::Found { .. })
    }
}

/// A checked tool paired with its spec.
#[derive(Debug)]
pub struct ToolReport {
    pub spec: ToolSpec,
    pub status: ToolStatus,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// The tools a stock renderer installation needs: the Java runtime at
/// `java_bin` and `wkhtmltopdf` on `PATH`.
pub fn default_tools(java_bin: &str) -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("Java", java_bin).install_hint(JAVA_INSTALL_HINT),
        ToolSpec::new("wkhtmltopdf", "wkhtmltopdf").install_hint(WKHTMLTOPDF_INSTALL_HINT),
    ]
}

/// Run the version query for a single tool.
///
/// Blocks until the tool exits. stdin is closed so an interactive program
/// cannot stall the check.
pub fn check_tool(spec: &ToolSpec) -> ToolStatus {
    let output = match Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(o) => o,
        Err(source) => {
            return ToolStatus::NotFound {
                reason: ToolCheckError::Spawn {
                    program: spec.program.clone(),
                    source,
                },
            }
        }
    };

    if !output.status.success() {
        return ToolStatus::NotFound {
            reason: ToolCheckError::NonZeroExit {
                program: spec.program.clone(),
                code: output.status.code(),
            },
        };
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let version_line = first_line(&stdout)
        .or_else(|| first_line(&stderr))
        .unwrap_or_default()
        .to_string();
    let version = extract_version(&stdout).or_else(|| extract_version(&stderr));

    ToolStatus::Found {
        version_line,
        version,
    }
}

/// Check every tool in order.
pub fn check_all(specs: &[ToolSpec]) -> Vec<ToolReport> {
    specs
        .iter()
        .map(|spec| ToolReport {
            spec: spec.clone(),
            status: check_tool(spec),
        })
        .collect()
}

/// `true` when every report is [`ToolStatus::Found`].
pub fn all_found(reports: &[ToolReport]) -> bool {
    reports.iter().all(|r| r.status.is_found())
}

/// First dotted version number in `text`, e.g. `0.12.6` in
/// `wkhtmltopdf 0.12.6 (with patched qt)`.
pub fn extract_version(text: &str) -> Option<String> {
    static RE_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)+").unwrap());
    RE_VERSION.find(text).map(|m| m.as_str().to_string())
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_version_from_banners() {
        assert_eq!(
            extract_version("openjdk 17.0.2 2022-01-18").as_deref(),
            Some("17.0.2")
        );
        assert_eq!(
            extract_version("wkhtmltopdf 0.12.6 (with patched qt)").as_deref(),
            Some("0.12.6")
        );
        assert_eq!(extract_version("no digits here"), None);
        // A bare integer is not a version.
        assert_eq!(extract_version("build 42"), None);
    }

    #[test]
    fn default_tools_cover_java_and_wkhtmltopdf() {
        let tools = default_tools("/opt/jdk/bin/java");
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "Java");
        assert_eq!(tools[0].program, "/opt/jdk/bin/java");
        assert_eq!(tools[0].args, vec!["--version"]);
        assert_eq!(tools[1].program, "wkhtmltopdf");
        assert!(tools.iter().all(|t| t.install_hint.is_some()));
    }

    #[test]
    fn missing_program_is_not_found() {
        let spec = ToolSpec::new("Ghost", "definitely-not-a-real-binary-4f1c");
        let status = check_tool(&spec);
        match status {
            ToolStatus::NotFound {
                reason: ToolCheckError::Spawn { program, .. },
            } => assert_eq!(program, "definitely-not-a-real-binary-4f1c"),
            other => panic!("expected spawn failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_query_reports_version() {
        let spec = ToolSpec::new("Shell", "sh").args(["-c", "echo 'tool 1.2.3 (test build)'"]);
        match check_tool(&spec) {
            ToolStatus::Found {
                version_line,
                version,
            } => {
                assert_eq!(version_line, "tool 1.2.3 (test build)");
                assert_eq!(version.as_deref(), Some("1.2.3"));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn version_on_stderr_is_used() {
        let spec = ToolSpec::new("Java", "sh").args(["-c", "echo 'openjdk version \"11.0.20\"' >&2"]);
        match check_tool(&spec) {
            ToolStatus::Found { version, .. } => assert_eq!(version.as_deref(), Some("11.0.20")),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_not_found() {
        let spec = ToolSpec::new("Broken", "sh").args(["-c", "exit 3"]);
        let status = check_tool(&spec);
        assert!(!status.is_found());
        match status {
            ToolStatus::NotFound { reason } => assert!(reason.to_string().contains("code 3")),
            ToolStatus::Found { .. } => unreachable!(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn all_found_requires_every_tool() {
        let ok = ToolSpec::new("Shell", "sh").args(["-c", "echo 1.0"]);
        let missing = ToolSpec::new("Ghost", "definitely-not-a-real-binary-4f1c");
        assert!(all_found(&check_all(&[ok.clone()])));
        assert!(!all_found(&check_all(&[ok, missing])));
    }
}
