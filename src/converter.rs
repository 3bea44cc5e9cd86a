use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
};

use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConvertError {
    #[error("converter `{program}` not found")]
    NotFound { program: String },
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` {}", describe_status(.status))]
    Failed { program: String, status: ExitStatus },
}

fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

pub(crate) trait Convert {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError>;
}

/// `<program> <input> -o <output>`
#[derive(Debug, Clone)]
pub(crate) struct Pandoc {
    pub program: String,
}

impl Pandoc {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Convert for Pandoc {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        info!("running {} {:?} -o {:?}", self.program, input, output);
        let status = Command::new(&self.program)
            .arg(input)
            .arg("-o")
            .arg(output)
            .status()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ConvertError::NotFound {
                    program: self.program.clone(),
                },
                _ => ConvertError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        if !status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn succeeds_on_zero_exit() {
        let pandoc = Pandoc::new("true");
        assert!(pandoc
            .convert(Path::new("in.md"), Path::new("out.docx"))
            .is_ok());
    }

    #[test]
    fn reports_non_zero_exit() {
        let pandoc = Pandoc::new("false");
        let err = pandoc
            .convert(Path::new("in.md"), Path::new("out.docx"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Failed { .. }));
        assert_eq!(err.to_string(), "`false` exited with status 1");
    }

    #[test]
    fn reports_missing_program() {
        let pandoc = Pandoc::new("noteconv-no-such-converter");
        let err = pandoc
            .convert(Path::new("in.md"), Path::new("out.docx"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "converter `noteconv-no-such-converter` not found"
        );
    }
}
