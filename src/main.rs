use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use sdimport::analyze::{self, Analysis};
use sdimport::sources::SourceRegistry;
use sdimport::{BufferSize, DatePriority, ImportOptions, NamingMode, Operation, SubfolderMode};

#[derive(Parser)]
#[command(
    name = "sdimport",
    version,
    about = "Copy or move camera-card media into date-organized folders"
)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree and report how file dates would resolve
    Analyze {
        /// Source directory (e.g. a mounted card)
        source: PathBuf,

        /// Date resolution priority
        #[arg(long, value_enum, default_value_t = DatePriority::ExifFirst)]
        date_priority: DatePriority,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Copy or move media into a date-organized destination folder
    Run {
        /// Source directory (e.g. a mounted card)
        source: PathBuf,

        /// Destination root; the batch folder is created under it
        #[arg(short, long)]
        dest: PathBuf,

        /// Source label, e.g. "Living Room Camera (Cam_LR)"
        #[arg(short, long, default_value = "")]
        label: String,

        /// Move files instead of copying
        #[arg(long = "move")]
        move_files: bool,

        /// Date resolution priority
        #[arg(long, value_enum, default_value_t = DatePriority::ExifFirst)]
        date_priority: DatePriority,

        /// Batch folder name format; defaults to the batch's date range
        #[arg(long, value_enum)]
        naming: Option<NamingMode>,

        /// Subfolder layout, recorded in the manifest log
        #[arg(long, value_enum)]
        subfolders: Option<SubfolderMode>,

        /// Append _P/_M/_PM to the batch folder by content
        #[arg(long)]
        suffix: bool,

        /// Write a manifest log into the destination folder
        #[arg(long)]
        log: bool,

        /// Copy buffer preference, recorded in the manifest log
        #[arg(long, value_enum, default_value_t = BufferSize::Dynamic)]
        buffer: BufferSize,
    },

    /// Manage the list of known media sources
    Sources {
        /// Registry file
        #[arg(long, default_value = "source.txt")]
        registry: PathBuf,

        #[command(subcommand)]
        command: SourcesCommand,
    },
}

#[derive(Subcommand)]
enum SourcesCommand {
    /// List registered sources
    List,
    /// Register a new source label with its short code
    Add { label: String, code: String },
    /// Remove a source by its exact registry entry
    Remove { entry: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    match cli.command {
        Commands::Analyze {
            source,
            date_priority,
            json,
        } => {
            let analysis = analyze::analyze_source(&source, date_priority)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }

        Commands::Run {
            source,
            dest,
            label,
            move_files,
            date_priority,
            naming,
            subfolders,
            suffix,
            log,
            buffer,
        } => {
            let options = ImportOptions {
                source,
                dest,
                label,
                operation: if move_files {
                    Operation::Move
                } else {
                    Operation::Copy
                },
                date_priority,
                naming,
                subfolders,
                suffix,
                write_log: log,
                buffer,
            };

            let report = sdimport::run_import(&options)?;

            println!(
                "Transferred {} files ({:.2} MB)",
                report.files.len(),
                report.total_bytes as f64 / (1024.0 * 1024.0)
            );
            println!("Destination: {}", report.dest_folder.display());
            if let Some(log_path) = report.log_path {
                println!("Manifest: {}", log_path.display());
            }
        }

        Commands::Sources { registry, command } => {
            let mut reg = SourceRegistry::load(&registry)?;
            match command {
                SourcesCommand::List => {
                    for entry in reg.entries() {
                        println!("{entry}");
                    }
                }
                SourcesCommand::Add { label, code } => {
                    reg.add(&label, &code)?;
                    println!("Registered: {} ({})", label.trim(), code.trim());
                }
                SourcesCommand::Remove { entry } => {
                    if reg.remove(&entry)? {
                        println!("Removed: {entry}");
                    } else {
                        bail!("no such source: {entry}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_analysis(analysis: &Analysis) {
    println!(
        "Files: {} ({:.2} MB)",
        analysis.total_files,
        analysis.total_bytes as f64 / (1024.0 * 1024.0)
    );
    println!("  EXIF dates:     {}", analysis.exif_dates);
    println!("  filename dates: {}", analysis.filename_dates);
    println!("  creation dates: {}", analysis.creation_dates);
    println!("  unresolved:     {}", analysis.unresolved);

    let dates: Vec<String> = analysis
        .distinct_dates
        .iter()
        .map(|d| d.to_string())
        .collect();
    println!("Distinct dates: {}", dates.join(", "));

    println!("Suggested naming: {}", analysis.recommendation.naming);
    println!("Suggested layout: {}", analysis.recommendation.subfolders);
    println!("Dates mostly from: {}", analysis.recommendation.dominant_source);
}
