use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use course_rigor::classify::{Classifier, CourseRecord};
use course_rigor::config::Config;
use course_rigor::credentials::AuthError;
use course_rigor::fetch::SnapshotMode;
use course_rigor::report::{self, StudentReport};
use course_rigor::scoring::ScoringEngine;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every student and write the report (default if no subcommand)
    Report {
        /// Use the stored enrollment snapshot, never the network
        #[arg(long)]
        offline: bool,
        /// Fetch fresh enrollments even if the snapshot is recent
        #[arg(long, conflicts_with = "offline")]
        refresh: bool,
        /// Print tab-separated rows instead of the table
        #[arg(long)]
        tsv: bool,
        /// Report directory (defaults to output.directory from the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip writing the CSV workbook
        #[arg(long)]
        no_files: bool,
    },
    /// Fetch the roster and enrollments and store a snapshot
    Fetch,
    /// Show how a single course record would be classified
    Explain {
        /// Course title
        title: String,
        /// Block name, e.g. "C Block"
        #[arg(long)]
        block: Option<String>,
        /// Source department, repeatable
        #[arg(long = "dept")]
        departments: Vec<String>,
    },
    /// Open a student's sheet by rank (1-based, as shown in the report table)
    Open {
        index: usize,
        /// Report directory the workbook was written to (defaults to output.directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Verify credentials against the SIS
    Check,
    /// Create a config file interactively
    Init,
    /// Forget the cached access token
    Logout,
}

#[derive(Parser, Debug)]
#[command(name = "course-rigor")]
#[command(about = "Curriculum rigor reports from SIS enrollments", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to config file (defaults to ~/.config/course-rigor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COURSE_RIGOR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Map a failed run to its exit code.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<AuthError>().is_some() {
        EXIT_AUTH
    } else {
        EXIT_NETWORK
    }
}

fn load_validated_config(path: Option<PathBuf>) -> Config {
    let config = match course_rigor::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = course_rigor::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    config
}

fn engines(config: &Config) -> (Classifier, ScoringEngine) {
    (
        Classifier::new(config.classification()),
        ScoringEngine::new(&config.scoring()),
    )
}

fn ranked_reports(config: &Config, snapshot: &course_rigor::sis::EnrollmentSnapshot) -> Vec<StudentReport> {
    let (classifier, engine) = engines(config);
    let mut reports = report::build_reports(&snapshot.students, &classifier, &engine);
    report::rank(&mut reports);
    reports
}

async fn run_report(
    config: &Config,
    mode: SnapshotMode,
    tsv: bool,
    out: Option<PathBuf>,
    write_files: bool,
) -> Result<()> {
    let snapshot_path = course_rigor::sis::get_snapshot_path();
    let snapshot =
        course_rigor::fetch::load_or_fetch_snapshot(config, &snapshot_path, mode).await?;
    let reports = ranked_reports(config, &snapshot);

    let errors = reports
        .iter()
        .flat_map(|r| &r.diagnostics)
        .filter(|d| d.is_error())
        .count();
    let skipped: usize = reports.iter().map(|r| r.skipped.len()).sum();
    tracing::info!(
        students = reports.len(),
        skipped,
        "Skipped {} non-academic course title(s)",
        skipped
    );

    if errors > 0 {
        eprintln!(
            "{} course(s) had inconsistent department data; run with --verbose for details",
            errors
        );
    }

    if write_files {
        let dir = out.unwrap_or_else(|| config.output.directory.clone());
        let mut workbook = report::CsvWorkbook::create(&dir)?;
        report::render_all(&mut workbook, &reports)?;
        eprintln!("Report written to {}", workbook.summary_path().display());
    }

    if tsv {
        println!("{}", course_rigor::output::format_tsv(&reports));
    } else {
        let use_colors = course_rigor::output::should_use_colors();
        let width = course_rigor::output::get_terminal_width();
        println!(
            "{}",
            course_rigor::output::format_ranked_table(&reports, use_colors, width)
        );
    }
    Ok(())
}

fn open_sheet(config: &Config, index: usize, out: Option<PathBuf>) -> Result<Option<String>> {
    let snapshot_path = course_rigor::sis::get_snapshot_path();
    let snapshot = course_rigor::sis::load_snapshot(&snapshot_path)?.with_context(|| {
        format!(
            "No enrollment snapshot at {}. Run `course-rigor report` first",
            snapshot_path.display()
        )
    })?;
    let reports = ranked_reports(config, &snapshot);

    if index < 1 || index > reports.len() {
        eprintln!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            reports.len()
        );
        return Ok(None);
    }

    let selected = &reports[index - 1];
    let dir = out.unwrap_or_else(|| config.output.directory.clone());
    let sheet = report::workbook::student_sheet_path(&dir, selected);
    if !sheet.exists() {
        anyhow::bail!(
            "{} does not exist. Run `course-rigor report` to write the workbook",
            sheet.display()
        );
    }
    course_rigor::browser::open_path(&sheet)?;
    Ok(Some(format!(
        "Opening sheet for {}: {}",
        selected.student.display_name(),
        sheet.display()
    )))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("{}", e);
    }

    // Install rustls crypto provider (required for rustls 0.23+); a second
    // install attempt is harmless
    let _ = rustls::crypto::ring::default_provider().install_default();

    let command = cli.command.unwrap_or(Commands::Report {
        offline: false,
        refresh: false,
        tsv: false,
        out: None,
        no_files: false,
    });
    let start_time = Instant::now();

    let result = match command {
        Commands::Init => course_rigor::config::init::run_init_wizard(cli.config),
        Commands::Logout => course_rigor::credentials::clear_cached_token().map(|_| {
            println!("Cached access token removed.");
        }),
        Commands::Explain {
            title,
            block,
            departments,
        } => {
            // Explain works without a config file, falling back to built-in tables
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(course_rigor::config::get_config_path);
            let classifier = if config_path.exists() {
                Classifier::new(load_validated_config(Some(config_path)).classification())
            } else {
                Classifier::default()
            };
            let classification = classifier.classify(&CourseRecord {
                title: &title,
                block_name: block.as_deref(),
                departments: &departments,
            });
            println!(
                "{}",
                course_rigor::output::format_explanation(
                    &title,
                    &classification,
                    course_rigor::output::should_use_colors()
                )
            );
            Ok(())
        }
        Commands::Open { index, out } => {
            let config = load_validated_config(cli.config);
            match open_sheet(&config, index, out) {
                Ok(Some(message)) => {
                    println!("{}", message);
                    Ok(())
                }
                Ok(None) => std::process::exit(EXIT_CONFIG),
                Err(e) => Err(e),
            }
        }
        Commands::Check => {
            let config = load_validated_config(cli.config);
            check(&config).await
        }
        Commands::Fetch => {
            let config = load_validated_config(cli.config);
            let path = course_rigor::sis::get_snapshot_path();
            course_rigor::fetch::refresh_snapshot(&config, &path)
                .await
                .map(|snapshot| {
                    println!(
                        "Fetched {} enrollments for {} students into {}",
                        snapshot.enrollment_count(),
                        snapshot.students.len(),
                        path.display()
                    );
                })
        }
        Commands::Report {
            offline,
            refresh,
            tsv,
            out,
            no_files,
        } => {
            let config = load_validated_config(cli.config);
            let mode = if offline {
                SnapshotMode::Offline
            } else if refresh {
                SnapshotMode::Refresh
            } else {
                SnapshotMode::Auto
            };
            run_report(&config, mode, tsv, out, !no_files).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    std::process::exit(EXIT_SUCCESS);
}

async fn check(config: &Config) -> Result<()> {
    let token = course_rigor::credentials::obtain_access_token(&config.api).await?;
    let client = course_rigor::sis::SisClient::new(&config.api, &token)?;
    let visible = course_rigor::sis::probe(&client, &config.roster).await?;
    println!(
        "Connected to {} ({} students visible on the first roster page)",
        client.base_url(),
        visible
    );
    Ok(())
}
