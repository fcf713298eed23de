//! docbind command-line entry point.

use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docbind::cli::{Cli, Command, RenameArgs};
use docbind::config::{ExportConfig, MergeConfig, OverwriteMode};
use docbind::error::{Error, Result};
use docbind::export::Exporter;
use docbind::merge::Merger;
use docbind::registry::FileRegistry;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Merge(args) => args.to_config().and_then(run_merge),
        Command::Export(args) => args.to_config().and_then(run_export),
        Command::Rename(args) => run_rename(&args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run_merge(config: MergeConfig) -> Result<()> {
    let registry = build_registry(&config.inputs, config.should_print())?;

    check_overwrite(&config.output, config.overwrite_mode)?;

    let outcome = Merger::new().merge(&registry.paths(), &config.output)?;

    if config.should_print() {
        println!(
            "Merged {} file(s) into {} ({} page{})",
            outcome.files_merged,
            config.output.display(),
            outcome.total_pages,
            if outcome.total_pages == 1 { "" } else { "s" },
        );
    }
    Ok(())
}

fn run_export(config: ExportConfig) -> Result<()> {
    let registry = build_registry(&config.inputs, config.should_print())?;

    let outcome = Exporter::new()
        .dpi(config.dpi)
        .quality(config.quality)
        .export(&registry.paths(), &config.output_dir)?;

    for failure in &outcome.failures {
        eprintln!("Failed: {failure}");
    }

    if outcome.exported == 0 {
        return Err(Error::other("No JPG files were exported"));
    }

    if config.should_print() {
        println!(
            "Exported {} JPG file(s) to {}",
            outcome.exported,
            config.output_dir.display()
        );
    }
    Ok(())
}

fn run_rename(args: &RenameArgs) -> Result<()> {
    if !args.file.is_file() {
        return Err(Error::other(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    let mut registry = FileRegistry::new();
    if registry.add(vec![args.file.clone()]) == 0 {
        let name = args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.file.display().to_string());
        return Err(Error::unsupported_extension(name));
    }

    let new_path = registry.rename(0, &args.new_name, args.force)?;
    println!("Renamed to {}", new_path.display());
    Ok(())
}

/// Filter the expanded inputs through the registry, reporting the count.
fn build_registry(inputs: &[std::path::PathBuf], print: bool) -> Result<FileRegistry> {
    let mut registry = FileRegistry::new();
    let added = registry.add(inputs.iter().cloned());

    if registry.is_empty() {
        return Err(Error::other(
            "No supported input files found (expected pdf, tif, tiff, jpg, or jpeg)",
        ));
    }
    if print {
        println!("Added {added} file(s)");
    }
    Ok(registry)
}

/// Apply the overwrite policy for an existing output file.
fn check_overwrite(output: &Path, mode: OverwriteMode) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(Error::OutputExists {
            path: output.to_path_buf(),
        }),
        OverwriteMode::Prompt => {
            if confirm_overwrite(output)? {
                Ok(())
            } else {
                Err(Error::OutputExists {
                    path: output.to_path_buf(),
                })
            }
        }
    }
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("Output file {} already exists. Overwrite? [y/N] ", path.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
