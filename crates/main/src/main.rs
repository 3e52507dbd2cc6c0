use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use assessment_report::samples::Sample;
use assessment_report::tier::SectionSet;
use assessment_report::{deliver, DirectorySink, Report, ReportBuilder, ReportSize};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Exports security assessment reports as paginated PDF documents.
#[derive(Parser)]
#[command(author, version, about = "Security assessment PDF export")]
struct Cli {
    /// Log layout decisions (page breaks, sections) at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an assessment JSON file.
    Render {
        /// Path to the assessment JSON.
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render one of the bundled sample assessments.
    Sample {
        /// Sample to render: slack, github or stress.
        #[arg(long, default_value = "slack")]
        name: Sample,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the report size table.
    Tiers,
}

#[derive(Args)]
struct OutputArgs {
    /// Report size: small, medium, full or enterprise.
    #[arg(
        short,
        long,
        env = "ASSESSMENT_REPORT_SIZE",
        default_value = "medium"
    )]
    size: ReportSize,

    /// Directory the PDF is written to.
    #[arg(
        short,
        long,
        env = "ASSESSMENT_REPORT_OUT_DIR",
        default_value = "reports"
    )]
    out_dir: PathBuf,

    /// Generation date shown on the cover (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Add a PDF outline entry for every section.
    #[arg(long)]
    bookmarks: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Render { input, output } => {
            let report = load_report(&input)?;
            export(&report, &output)
        }
        Commands::Sample { name, output } => {
            let report = name.load()?;
            export(&report, &output)
        }
        Commands::Tiers => {
            print_tiers();
            Ok(())
        }
    }
}

fn load_report(path: &Path) -> Result<Report, Box<dyn Error>> {
    let file = File::open(path)
        .map_err(|err| format!("cannot open {}: {err}", path.display()))?;
    Ok(Report::from_reader(BufReader::new(file))?)
}

fn export(report: &Report, output: &OutputArgs) -> Result<(), Box<dyn Error>> {
    let mut builder = ReportBuilder::new(report, output.size);
    if let Some(date) = output.date {
        builder = builder.with_generated_on(date);
    }

    let rendered = if output.bookmarks {
        render_with_bookmarks(&builder)?
    } else {
        builder.render()?
    };

    let mut sink = DirectorySink::new(&output.out_dir);
    deliver(&rendered, &mut sink)?;
    println!(
        "{} ({} pages, {} sections)",
        sink.dir().join(&rendered.file_name).display(),
        rendered.page_count,
        rendered.sections.len()
    );
    Ok(())
}

#[cfg(feature = "bookmarks")]
fn render_with_bookmarks(
    builder: &ReportBuilder<'_>,
) -> Result<assessment_report::RenderedReport, Box<dyn Error>> {
    Ok(builder.render_with_bookmarks()?)
}

#[cfg(not(feature = "bookmarks"))]
fn render_with_bookmarks(
    _: &ReportBuilder<'_>,
) -> Result<assessment_report::RenderedReport, Box<dyn Error>> {
    Err("this build has no bookmark support; rebuild with `--features bookmarks`".into())
}

const TIERS_HEADER: &str = "size         cves incidents versions detailed  sections";

fn print_tiers() {
    println!("{TIERS_HEADER}");
    for size in ReportSize::ALL {
        let config = size.config();
        let sections = match config.sections {
            SectionSet::All => "all".to_string(),
            SectionSet::Only(ids) => ids
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let detailed = if config.show_detailed_metrics {
            "yes"
        } else {
            "no"
        };
        println!(
            "{:<11} {:>5} {:>9} {:>8} {:>8}  {}",
            size.as_str(),
            config.cve_limit.to_string(),
            config.incident_limit.to_string(),
            config.version_history_limit.to_string(),
            detailed,
            sections
        );
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
