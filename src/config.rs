//! Configuration types for invoice conversion.
//!
//! All renderer behaviour is controlled through [`ConverterConfig`], built
//! via its [`ConverterConfigBuilder`]. The config describes *how to launch*
//! the external renderer; it never describes the document itself.
//!
//! # Launch contract
//!
//! The renderer is a Java program invoked as
//!
//! ```text
//! <java_bin> [jvm_args...] -cp <jar_path><sep><lib_dir>/* <entry_point> <mode> <encoded>
//! ```
//!
//! where `<mode>` is `html` or `pdf` and `<encoded>` is the literal string
//! `true` or `false`. See [`crate::pipeline::launch`].

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default Java launcher, resolved through `PATH`.
pub const DEFAULT_JAVA_BIN: &str = "java";

/// Default renderer jar, relative to the working directory.
pub const DEFAULT_JAR_PATH: &str = "InvoiceConverter.jar";

/// Default directory holding the renderer's dependency jars.
pub const DEFAULT_LIB_DIR: &str = "lib";

/// Default main class of the renderer.
pub const DEFAULT_ENTRY_POINT: &str = "InvoiceConverter";

/// Configuration for launching the external renderer.
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use invoice_convert::ConverterConfig;
/// use std::time::Duration;
///
/// let config = ConverterConfig::builder()
///     .jar_path("/opt/invoice/InvoiceConverter.jar")
///     .lib_dir("/opt/invoice/lib")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Java launcher executable. Default: `java` (looked up on `PATH`).
    pub java_bin: String,

    /// Path to the renderer jar. Default: `InvoiceConverter.jar`.
    pub jar_path: PathBuf,

    /// Directory of dependency jars, added to the classpath as `<dir>/*`.
    /// Default: `lib`. `None` puts only the renderer jar on the classpath.
    pub lib_dir: Option<PathBuf>,

    /// Fully qualified main class. Default: `InvoiceConverter`.
    pub entry_point: String,

    /// Options for the Java runtime itself (e.g. `-Xmx512m`), placed before
    /// `-cp`. Default: empty.
    pub jvm_args: Vec<String>,

    /// Wall-clock limit for one conversion. Default: `None` (unbounded).
    ///
    /// When set and exceeded the renderer is killed and the call fails with
    /// [`ConvertError::Timeout`].
    pub timeout: Option<Duration>,

    /// Maximum renderer processes alive at once in
    /// [`crate::convert::InvoiceConverter::convert_many`]. Default: 4.
    ///
    /// Each renderer is a full JVM, so memory rather than CPU is usually the
    /// limit here.
    pub concurrency: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            java_bin: DEFAULT_JAVA_BIN.to_string(),
            jar_path: PathBuf::from(DEFAULT_JAR_PATH),
            lib_dir: Some(PathBuf::from(DEFAULT_LIB_DIR)),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            jvm_args: Vec::new(),
            timeout: None,
            concurrency: 4,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("java_bin", &self.java_bin)
            .field("classpath", &self.classpath())
            .field("entry_point", &self.entry_point)
            .field("jvm_args", &self.jvm_args)
            .field("timeout", &self.timeout)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// The `-cp` argument: the renderer jar followed by `<lib_dir>/*`,
    /// joined with the platform classpath separator.
    pub fn classpath(&self) -> String {
        let mut entries = vec![self.jar_path.display().to_string()];
        if let Some(ref dir) = self.lib_dir {
            entries.push(dir.join("*").display().to_string());
        }
        entries.join(CLASSPATH_SEPARATOR)
    }
}

/// Separator the Java launcher expects between classpath entries.
#[cfg(windows)]
pub const CLASSPATH_SEPARATOR: &str = ";";
/// Separator the Java launcher expects between classpath entries.
#[cfg(not(windows))]
pub const CLASSPATH_SEPARATOR: &str = ":";

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn java_bin(mut self, bin: impl Into<String>) -> Self {
        self.config.java_bin = bin.into();
        self
    }

    pub fn jar_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.jar_path = path.into();
        self
    }

    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.lib_dir = Some(dir.into());
        self
    }

    pub fn no_lib_dir(mut self) -> Self {
        self.config.lib_dir = None;
        self
    }

    pub fn entry_point(mut self, class: impl Into<String>) -> Self {
        self.config.entry_point = class.into();
        self
    }

    pub fn jvm_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.jvm_args.push(arg.into());
        self
    }

    pub fn jvm_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.jvm_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Convenience for CLI flags: `0` disables the timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, ConvertError> {
        let c = &self.config;
        if c.java_bin.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "Java executable must not be empty".into(),
            ));
        }
        if c.entry_point.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "Entry point class must not be empty".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(ConvertError::InvalidConfig(
                "Concurrency must be at least 1".into(),
            ));
        }
        if c.timeout == Some(Duration::ZERO) {
            return Err(ConvertError::InvalidConfig(
                "Timeout must be greater than zero".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Target format requested from the renderer.
///
/// Passed to the renderer as its `mode` argument and never changed after a
/// request is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// UTF-8 HTML document on stdout. (default)
    #[default]
    Html,
    /// Base64-encoded PDF document on stdout.
    Pdf,
}

impl OutputMode {
    /// The wire value of the renderer's `mode` argument.
    pub fn as_arg(self) -> &'static str {
        match self {
            OutputMode::Html => "html",
            OutputMode::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_installation() {
        let c = ConverterConfig::default();
        assert_eq!(c.java_bin, "java");
        assert_eq!(c.entry_point, "InvoiceConverter");
        assert!(c.timeout.is_none());
        assert!(c.jvm_args.is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn classpath_joins_jar_and_lib_glob() {
        let c = ConverterConfig::builder()
            .jar_path("/opt/inv/InvoiceConverter.jar")
            .lib_dir("/opt/inv/lib")
            .build()
            .unwrap();
        assert_eq!(c.classpath(), "/opt/inv/InvoiceConverter.jar:/opt/inv/lib/*");
    }

    #[test]
    fn classpath_without_lib_dir_is_just_the_jar() {
        let c = ConverterConfig::builder()
            .jar_path("renderer.jar")
            .no_lib_dir()
            .build()
            .unwrap();
        assert_eq!(c.classpath(), "renderer.jar");
    }

    #[test]
    fn timeout_secs_zero_disables() {
        let c = ConverterConfig::builder().timeout_secs(0).build().unwrap();
        assert_eq!(c.timeout, None);
        let c = ConverterConfig::builder().timeout_secs(5).build().unwrap();
        assert_eq!(c.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn build_rejects_empty_java_bin() {
        let err = ConverterConfig::builder().java_bin("  ").build().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_zero_timeout() {
        let err = ConverterConfig::builder()
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Timeout"));
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let c = ConverterConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn build_rejects_zero_concurrency() {
        let builder = ConverterConfigBuilder {
            config: ConverterConfig {
                concurrency: 0,
                ..ConverterConfig::default()
            },
        };
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn output_mode_wire_values() {
        assert_eq!(OutputMode::Html.as_arg(), "html");
        assert_eq!(OutputMode::Pdf.as_arg(), "pdf");
        assert_eq!(OutputMode::Pdf.to_string(), "pdf");
        assert_eq!(serde_json::to_string(&OutputMode::Pdf).unwrap(), "\"pdf\"");
    }
}
