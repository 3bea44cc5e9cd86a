use std::path::PathBuf;

use anyhow::Context as _;
use clap::{command, Arg, ArgAction, ArgMatches, Command};
use context::Context;
use converter::Pandoc;
use log::info;

mod batch;
mod context;
mod converter;
mod filename;
mod metadata;

fn cli() -> Command {
    command!().args(&[
        Arg::new("input")
            .help("Markdown file, or directory whose .md files are all converted")
            .value_parser(clap::value_parser!(PathBuf))
            .default_value("."),
        Arg::new("format")
            .help("Output format, used as the output file extension")
            .default_value("docx"),
        Arg::new("out_dir")
            .help("Directory to write converted files to [default: ~/Dropbox/Pandoc]")
            .value_parser(clap::value_parser!(PathBuf))
            .env("NOTECONV_OUTPUT_DIR"),
        Arg::new("converter")
            .help("Converter program, invoked as `<program> <input> -o <output>`")
            .long("converter")
            .env("NOTECONV_CONVERTER")
            .default_value("pandoc"),
        Arg::new("dry_run")
            .help("Print the planned conversions as JSON lines without converting")
            .long("dry-run")
            .action(ArgAction::SetTrue),
    ])
}

fn context_from(matches: &ArgMatches) -> anyhow::Result<Context> {
    Context::new(
        matches.get_one::<PathBuf>("input").unwrap().to_owned(),
        matches.get_one::<String>("format").unwrap().to_owned(),
        matches.get_one::<PathBuf>("out_dir").cloned(),
        matches.get_one::<String>("converter").unwrap().to_owned(),
        matches.get_flag("dry_run"),
    )
}

fn run() -> anyhow::Result<()> {
    let ctx = context_from(&cli().get_matches())?;
    info!("{ctx:?}");

    if !ctx.dry_run {
        fs_extra::dir::create_all(&ctx.out_dir, false)
            .with_context(|| format!("creating output directory {:?}", ctx.out_dir))?;
    }

    let inputs = batch::collect_inputs(&ctx.input)?;
    let converter = Pandoc::new(ctx.converter.as_str());
    let summary = batch::run(&ctx, &converter, &inputs);
    println!("{summary}");

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        println!("✗ {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Context {
        let matches = cli().try_get_matches_from(args).unwrap();
        context_from(&matches).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    // Every NOTECONV_* variable is touched only here, so parallel tests never
    // observe a half-set environment.
    #[test]
    fn settings_layering() {
        std::env::remove_var("NOTECONV_OUTPUT_DIR");
        std::env::remove_var("NOTECONV_CONVERTER");

        let ctx = parse(&["noteconv", "--dry-run", "notes", "pdf", "/tmp/cli-out"]);
        assert_eq!(ctx.input, PathBuf::from("notes"));
        assert_eq!(ctx.format, "pdf");
        assert_eq!(ctx.out_dir, PathBuf::from("/tmp/cli-out"));
        assert_eq!(ctx.converter, "pandoc");
        assert!(ctx.dry_run);

        if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
            let ctx = parse(&["noteconv"]);
            assert_eq!(ctx.input, PathBuf::from("."));
            assert_eq!(ctx.format, "docx");
            assert_eq!(ctx.out_dir, PathBuf::from(home).join("Dropbox").join("Pandoc"));
            assert!(!ctx.dry_run);
        }

        std::env::set_var("NOTECONV_OUTPUT_DIR", "/tmp/env-out");
        std::env::set_var("NOTECONV_CONVERTER", "my-pandoc");

        let ctx = parse(&["noteconv", "notes"]);
        assert_eq!(ctx.out_dir, PathBuf::from("/tmp/env-out"));
        assert_eq!(ctx.converter, "my-pandoc");

        let ctx = parse(&[
            "noteconv",
            "notes",
            "docx",
            "/tmp/cli-out",
            "--converter",
            "other",
        ]);
        assert_eq!(ctx.out_dir, PathBuf::from("/tmp/cli-out"));
        assert_eq!(ctx.converter, "other");

        std::env::remove_var("NOTECONV_OUTPUT_DIR");
        std::env::remove_var("NOTECONV_CONVERTER");
    }
}
