use std::{ffi::OsString, path::PathBuf};

use anyhow::Context as _;

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub input: PathBuf,
    pub format: String,
    pub out_dir: PathBuf,
    pub converter: String,
    pub dry_run: bool,
}

impl Context {
    pub fn new(
        input: PathBuf,
        format: String,
        out_dir: Option<PathBuf>,
        converter: String,
        dry_run: bool,
    ) -> anyhow::Result<Self> {
        let out_dir = match out_dir {
            Some(dir) => dir,
            None => default_out_dir(std::env::var_os("HOME"))?,
        };
        Ok(Self {
            input,
            format,
            out_dir,
            converter,
            dry_run,
        })
    }
}

/// `~/Dropbox/Pandoc`
fn default_out_dir(home: Option<OsString>) -> anyhow::Result<PathBuf> {
    let home = home
        .filter(|h| !h.is_empty())
        .context("HOME is not set; pass an output directory explicitly")?;
    Ok(PathBuf::from(home).join("Dropbox").join("Pandoc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_out_dir_wins() {
        let ctx = Context::new(
            PathBuf::from("notes"),
            "pdf".to_string(),
            Some(PathBuf::from("/tmp/out")),
            "pandoc".to_string(),
            false,
        )
        .unwrap();
        assert_eq!(ctx.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(ctx.format, "pdf");
    }

    #[test]
    fn default_out_dir_is_under_home() {
        assert_eq!(
            default_out_dir(Some(OsString::from("/home/ada"))).unwrap(),
            PathBuf::from("/home/ada/Dropbox/Pandoc")
        );
        assert!(default_out_dir(None).is_err());
        assert!(default_out_dir(Some(OsString::new())).is_err());
    }
}
