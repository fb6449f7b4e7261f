//! `make_links`: create symlinks in a project that point to our relevant tools.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use linkmirror_fs::{
    DEFAULT_PATTERNS_EXCLUDE, EnumPatternMode, SpecLinkOptions, SpecVerbosity, make_links_with,
};

#[derive(Parser, Debug)]
#[command(
    name = "make_links",
    version,
    about = "Create symlinks in a project that point to our relevant tools."
)]
struct Cli {
    /// Destination root (defaults to the current directory)
    output_dir: Option<PathBuf>,

    /// Source root (defaults to the directory holding this executable)
    #[arg(short = 'i', long = "input_dir")]
    input_dir: Option<PathBuf>,

    /// Don't actually create links, just print what would be done
    #[arg(short = 'd', long = "dry_run")]
    dry_run: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long = "verbosity", action = ArgAction::Count)]
    verbosity: u8,

    /// Only link files whose name matches one of these globs
    #[arg(long = "include", value_name = "GLOB")]
    include: Vec<String>,

    /// Extra globs to exclude, on top of LICENSE, hidden entries and make_link*
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,
}

fn init_logger(verbosity: SpecVerbosity) {
    let mut builder = if verbosity.level() == 0 {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    } else {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(verbosity.level_filter());
        builder
    };
    builder
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(env_logger::Target::Stdout)
        .init();
}

fn resolve_input_dir(input_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input_dir {
        return Ok(path);
    }
    let path_exe = std::env::current_exe().context("Failed to locate the running executable")?;
    path_exe
        .parent()
        .map(PathBuf::from)
        .context("Executable path has no parent directory")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = SpecVerbosity::new(cli.verbosity);
    init_logger(verbosity);

    let path_dir_output = match cli.output_dir {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let path_dir_input = resolve_input_dir(cli.input_dir)?;

    println!(
        "Creating symlinks in {} from {}",
        path_dir_output.display(),
        path_dir_input.display()
    );

    let mut l_exclude: Vec<String> = DEFAULT_PATTERNS_EXCLUDE
        .iter()
        .map(|p| p.to_string())
        .collect();
    l_exclude.extend(cli.exclude);

    let if_dry_run = cli.dry_run;
    let spec_link_options = SpecLinkOptions {
        patterns_include: (!cli.include.is_empty()).then_some(cli.include),
        patterns_exclude: Some(l_exclude),
        rule_pattern: EnumPatternMode::Glob,
        verbosity,
        if_dry_run,
    };

    // Dry-run actions are printed as the walk reaches them, between any log lines.
    let report = make_links_with(
        &path_dir_input,
        &path_dir_output,
        spec_link_options,
        |action| {
            if if_dry_run {
                println!("{action}");
            }
        },
    )
    .with_context(|| {
        format!(
            "Failed to link {} into {}",
            path_dir_input.display(),
            path_dir_output.display()
        )
    })?;

    log::info!("{report}");
    Ok(())
}
