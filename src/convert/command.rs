use std::{
    io::ErrorKind,
    path::{self, PathBuf},
    process::{Command, Stdio},
};

use tracing::debug;

use super::{ConversionRequest, Converter};
use crate::{DocgenError, Result};

/// Converts by running an external AsciiDoc backend.
///
/// The program is invoked as
/// `<command> <args...> [-a title=T] [-a revnumber=V] -o <target> <source>`
/// from inside the work directory, which matches the command line of
/// `asciidoctor` and `asciidoctor-pdf`.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// Creates a converter running `program` without extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Sets arguments placed before the generated ones.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Full argument list for `request`, with absolute paths.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::Conversion` if a path cannot be made absolute.
    pub fn arguments(&self, request: &ConversionRequest<'_>) -> Result<Vec<String>> {
        let absolute = |p: &path::Path| -> Result<PathBuf> {
            path::absolute(p).map_err(|e| DocgenError::conversion(e, request.format, request.target))
        };

        let mut args = self.args.clone();
        if let Some(title) = request.title {
            args.push("-a".to_string());
            args.push(format!("title={title}"));
        }
        if let Some(version) = request.version {
            args.push("-a".to_string());
            args.push(format!("revnumber={version}"));
        }
        args.push("-o".to_string());
        args.push(absolute(request.target)?.to_string_lossy().into_owned());
        args.push(absolute(request.source)?.to_string_lossy().into_owned());

        Ok(args)
    }
}

impl Converter for CommandConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<()> {
        let args = self.arguments(request)?;
        debug!(program = %self.program, ?args, "Running converter");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(request.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                let details = if e.kind() == ErrorKind::NotFound {
                    format!("program '{}' not found, is it installed and in your PATH?", self.program)
                } else {
                    format!("failed to run '{}': {e}", self.program)
                };
                DocgenError::conversion(details, request.format, request.target)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocgenError::conversion(
                format!("'{}' failed with {}: {}", self.program, output.status, stderr.trim()),
                request.format,
                request.target,
            ));
        }

        Ok(())
    }
}
