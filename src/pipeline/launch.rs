//! The renderer's launch contract.
//!
//! The renderer and this crate are versioned independently, so the argument
//! order below is a fixed ABI:
//!
//! ```text
//! <java_bin> [jvm_args...] -cp <classpath> <entry_point> <mode> <encoded>
//! ```
//!
//! `<encoded>` crosses the process boundary as the literal string `"true"` or
//! `"false"`; inside the crate it is a `bool`.

use crate::config::{ConverterConfig, OutputMode};
use std::process::Stdio;
use tokio::process::Command;

/// Program and argv for one renderer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// Assemble the invocation for `mode` from `config`.
    pub fn new(config: &ConverterConfig, mode: OutputMode, payload_encoded: bool) -> Self {
        let mut args = config.jvm_args.clone();
        args.push("-cp".to_string());
        args.push(config.classpath());
        args.push(config.entry_point.clone());
        args.push(mode.as_arg().to_string());
        args.push(encoded_flag(payload_encoded).to_string());
        Self {
            program: config.java_bin.clone(),
            args,
        }
    }

    /// A tokio `Command` with all three standard streams piped.
    ///
    /// `kill_on_drop` ensures a renderer never outlives a cancelled
    /// conversion future.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Wire form of the "payload is Base64" flag.
pub fn encoded_flag(encoded: bool) -> &'static str {
    if encoded {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn argv_follows_contract() {
        let config = ConverterConfig::builder()
            .jar_path("/srv/InvoiceConverter.jar")
            .lib_dir("/srv/lib")
            .build()
            .unwrap();
        let spec = LaunchSpec::new(&config, OutputMode::Pdf, false);
        assert_eq!(spec.program, "java");
        assert_eq!(
            spec.args,
            vec![
                "-cp",
                "/srv/InvoiceConverter.jar:/srv/lib/*",
                "InvoiceConverter",
                "pdf",
                "false",
            ]
        );
    }

    #[test]
    fn jvm_args_precede_classpath() {
        let config = ConverterConfig::builder()
            .java_bin("/usr/lib/jvm/bin/java")
            .jvm_args(["-Xmx256m", "-Dfile.encoding=UTF-8"])
            .no_lib_dir()
            .build()
            .unwrap();
        let spec = LaunchSpec::new(&config, OutputMode::Html, true);
        assert_eq!(spec.program, "/usr/lib/jvm/bin/java");
        assert_eq!(&spec.args[..3], ["-Xmx256m", "-Dfile.encoding=UTF-8", "-cp"]);
        assert_eq!(&spec.args[spec.args.len() - 2..], ["html", "true"]);
    }

    #[test]
    fn encoded_flag_is_lowercase_literal() {
        assert_eq!(encoded_flag(true), "true");
        assert_eq!(encoded_flag(false), "false");
    }
}
