//! `cssvars` command-line front end.
//!
//! Reads a stylesheet from a file or stdin, inlines its custom properties and
//! writes the result to stdout or a file. Warnings go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use cssvars_rs::log_init::{init_logger, level_for_verbosity};
use cssvars_rs::{TransformOptions, Transformer};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cssvars")]
#[command(about = "Inline CSS custom properties for engines without var() support")]
struct Cli {
    /// Stylesheet to read; stdin when omitted
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Define or override a variable, e.g. `--var primary=#06c`
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    variables: Vec<(String, String)>,

    /// Keep custom properties and add resolved copies of declarations
    #[arg(long)]
    preserve: bool,

    /// Drop rules and declarations that do not involve custom properties
    #[arg(long)]
    only_vars: bool,

    /// Leave nested calc() expressions as they are
    #[arg(long)]
    no_fix_nested_calc: bool,

    /// Text written after every style rule
    #[arg(long, default_value = "")]
    delimiter: String,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_variable(arg: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim();
    if name.trim_start_matches('-').is_empty() {
        return Err(format!("missing variable name in `{arg}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut css = String::new();
            io::stdin()
                .read_to_string(&mut css)
                .context("failed to read stdin")?;
            Ok(css)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.log_file.as_deref(), level_for_verbosity(cli.verbose))
        .context("failed to initialise logging")?;

    let css = read_input(cli.input.as_ref())?;

    let mut options = TransformOptions::new()
        .preserve(cli.preserve)
        .only_vars(cli.only_vars)
        .fix_nested_calc(!cli.no_fix_nested_calc)
        .delimiter(cli.delimiter);
    for (name, value) in cli.variables {
        options = options.variable(name, value);
    }

    let out = Transformer::new(&options)
        .on_warning(|warning| eprintln!("warning: {warning}"))
        .run(&css)
        .with_context(|| match &cli.input {
            Some(path) => format!("failed to transform {}", path.display()),
            None => "failed to transform stdin".to_string(),
        })?;

    match &cli.output {
        Some(path) => fs::write(path, &out.css)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(out.css.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable() {
        assert_eq!(
            parse_variable("primary=#06c").unwrap(),
            ("primary".to_string(), "#06c".to_string())
        );
        assert_eq!(
            parse_variable("--font= a, b ").unwrap(),
            ("--font".to_string(), "a, b".to_string())
        );
        assert!(parse_variable("novalue").is_err());
        assert!(parse_variable("--=1").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "cssvars",
            "in.css",
            "--var",
            "a=1",
            "--var",
            "b=2",
            "--only-vars",
            "--no-fix-nested-calc",
            "-vv",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("in.css")));
        assert_eq!(cli.variables.len(), 2);
        assert!(cli.only_vars);
        assert!(cli.no_fix_nested_calc);
        assert!(!cli.preserve);
        assert_eq!(cli.verbose, 2);
    }
}
