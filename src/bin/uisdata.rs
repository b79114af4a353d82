use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use uisdata::config::{ConfigLoader, ResolvedConfig, SubsetRequest};
use uisdata::domain::{DatasetId, GeoMode, SearchKind};
use uisdata::error::{ErrorKind, UisError};
use uisdata::fetch::HttpFetcher;
use uisdata::output::{ArchiveSummary, JsonOutput, OutputMode, TextOutput, export_csv};
use uisdata::{RemoteCatalog, Session, full_subset, search};

#[derive(Parser)]
#[command(name = "uisdata")]
#[command(about = "Download UIS bulk data archives, subset them and merge labels and metadata")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List known dataset names")]
    Datasets,
    #[command(about = "Load an archive and list its tables")]
    Tables(DatasetArgs),
    #[command(about = "Print the README of an archive")]
    Readme(DatasetArgs),
    #[command(about = "Search indicator or region identifiers by regular expression")]
    Search(SearchArgs),
    #[command(about = "Subset national or regional data with labels and metadata")]
    Subset(SubsetArgs),
    #[command(about = "Run every subset listed in the config file")]
    Run,
}

#[derive(Args)]
struct DatasetArgs {
    dataset: DatasetId,
}

#[derive(Args)]
struct SearchArgs {
    dataset: DatasetId,

    #[arg(required = true)]
    patterns: Vec<String>,

    #[arg(long, value_enum, default_value_t = SearchKind::Indicator)]
    kind: SearchKind,
}

#[derive(Args)]
struct SubsetArgs {
    dataset: DatasetId,

    #[arg(long = "year", required = true)]
    years: Vec<i64>,

    #[arg(long = "geo", required = true)]
    geos: Vec<String>,

    #[arg(long = "indicator", required = true)]
    indicators: Vec<String>,

    #[arg(long, value_enum, default_value_t = GeoMode::Country)]
    geo_mode: GeoMode,

    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<UisError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &UisError) -> u8 {
    match error.kind() {
        ErrorKind::NotFound => 2,
        ErrorKind::Network => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    if let Commands::Datasets = cli.command {
        for id in DatasetId::ALL {
            println!("{:<6} {}", id.as_str(), id.description());
        }
        return Ok(());
    }

    let config = match cli.command {
        Commands::Run => ConfigLoader::require(cli.config.as_deref())?,
        _ => ConfigLoader::resolve(cli.config.as_deref())?,
    };
    let fetcher = HttpFetcher::with_timeout(config.timeout)?;

    match cli.command {
        Commands::Datasets => Ok(()),
        Commands::Tables(args) => {
            let mut session = open_session(args.dataset, &config, &fetcher)?;
            session.load(&fetcher)?;
            print_summary(&session, output_mode)
        }
        Commands::Readme(args) => {
            let mut session = open_session(args.dataset, &config, &fetcher)?;
            session.load(&fetcher)?;
            println!("{}", session.readme()?);
            Ok(())
        }
        Commands::Search(args) => {
            let mut session = open_session(args.dataset, &config, &fetcher)?;
            let loaded = session.load(&fetcher)?;
            let matches = search(loaded.tables(), args.patterns.as_slice(), args.kind)?;
            match output_mode {
                OutputMode::Json => JsonOutput::print_matches(&matches).into_diagnostic(),
                OutputMode::Text => TextOutput::print_matches(&matches).into_diagnostic(),
            }
        }
        Commands::Subset(args) => {
            let mut session = open_session(args.dataset, &config, &fetcher)?;
            let loaded = session.load(&fetcher)?;
            let table = full_subset(
                loaded.tables(),
                &args.years,
                args.geos.as_slice(),
                args.indicators.as_slice(),
                args.geo_mode,
            )?;
            export_csv(&table, args.output.as_deref())?;
            Ok(())
        }
        Commands::Run => {
            for request in &config.subsets {
                run_request(request, &config, &fetcher, output_mode)?;
            }
            Ok(())
        }
    }
}

fn open_session(
    dataset: DatasetId,
    config: &ResolvedConfig,
    fetcher: &HttpFetcher,
) -> Result<Session, UisError> {
    let catalog = RemoteCatalog::with_url(fetcher.clone(), config.catalog_url.clone());
    Session::new(dataset, &catalog)
}

fn run_request(
    request: &SubsetRequest,
    config: &ResolvedConfig,
    fetcher: &HttpFetcher,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let mut session = open_session(request.dataset, config, fetcher)?;
    session.load(fetcher)?;
    let Some(filter) = &request.filter else {
        return print_summary(&session, output_mode);
    };
    let table = full_subset(
        session.tables()?,
        &filter.years,
        filter.geos.as_slice(),
        filter.indicators.as_slice(),
        filter.geo_mode,
    )?;
    tracing::info!(dataset = %request.dataset, rows = table.len(), "subset ready");
    export_csv(&table, request.output.as_deref())?;
    Ok(())
}

fn print_summary(session: &Session, output_mode: OutputMode) -> miette::Result<()> {
    let summary = ArchiveSummary::new(session.dataset().as_str(), session.url(), session.tables()?);
    match output_mode {
        OutputMode::Json => JsonOutput::print_summary(&summary).into_diagnostic(),
        OutputMode::Text => TextOutput::print_summary(&summary).into_diagnostic(),
    }
}
