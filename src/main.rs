use std::process;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use syzygy::{
    constants::{AU, DEFAULT_NUM_DAYS, DEFAULT_STEP_HOURS, SOLAR_SYSTEM_BODIES},
    jpl_ephem::{download_jpl_file::EphemFileSource, naif::naif_data::NaifData, PositionOracle},
    output,
    run::{DistanceRun, RunParams},
    series::progress::{LogProgress, ProgressObserver},
    syzygy_errors::SyzygyError,
    time::{format_utc, parse_utc},
};

#[derive(Parser)]
#[command(
    name = "syzygy",
    version,
    about = "Pairwise distances between solar system bodies from a JPL ephemeris"
)]
struct Cli {
    /// More logs (-v: debug, -vv: trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the distance series and write the CSV tables
    Run(RunArgs),
    /// List the segments of an SPK kernel
    Segments {
        /// Path to the SPK kernel (.bsp)
        #[arg(long)]
        kernel: Utf8PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to the SPK kernel (.bsp)
    #[arg(long, conflicts_with = "naif")]
    kernel: Option<Utf8PathBuf>,

    /// NAIF kernel version (e.g. DE440), looked up in the user cache
    #[arg(long, default_value = "DE440")]
    naif: String,

    /// First instant, UTC (YYYY-MM-DDThh:mm:ss)
    #[arg(long, default_value = "1550-01-01T00:00:00")]
    start: String,

    /// Span in days
    #[arg(long, default_value_t = DEFAULT_NUM_DAYS)]
    days: f64,

    /// Sampling step in hours
    #[arg(long, default_value_t = DEFAULT_STEP_HOURS)]
    step_hours: f64,

    /// Comma-separated body identifiers, in output order
    #[arg(long, value_delimiter = ',', default_values_t = SOLAR_SYSTEM_BODIES.map(String::from))]
    bodies: Vec<String>,

    /// Instants between two progress lines (0: a tenth of the grid)
    #[arg(long, default_value_t = 0)]
    progress_every: usize,

    /// Output directory of the CSV tables
    #[arg(long, default_value = "output")]
    out: Utf8PathBuf,
}

impl RunArgs {
    fn source(&self) -> Result<EphemFileSource, SyzygyError> {
        match &self.kernel {
            Some(path) => Ok(EphemFileSource::Path(path.clone())),
            None => EphemFileSource::try_from(format!("naif:{}", self.naif).as_str()),
        }
    }

    fn params(&self) -> Result<RunParams, SyzygyError> {
        RunParams::builder()
            .bodies(self.bodies.iter().map(|b| b.trim().to_string()))
            .start(parse_utc(&self.start)?)
            .duration_days(self.days)
            .step_hours(self.step_hours)
            .progress_every(self.progress_every)
            .build()
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "progress")]
fn observer(verbose: u8) -> Box<dyn ProgressObserver> {
    use syzygy::series::progress::ProgressBarObserver;
    if verbose > 0 {
        Box::new(LogProgress::new())
    } else {
        Box::new(ProgressBarObserver::new(0))
    }
}

#[cfg(not(feature = "progress"))]
fn observer(_verbose: u8) -> Box<dyn ProgressObserver> {
    Box::new(LogProgress::new())
}

#[cfg(feature = "parallel")]
fn assemble<O: PositionOracle + Sync + ?Sized>(
    oracle: &O,
    params: &RunParams,
    observer: &mut dyn ProgressObserver,
) -> Result<DistanceRun, SyzygyError> {
    syzygy::run::run_parallel(oracle, params, observer)
}

#[cfg(not(feature = "parallel"))]
fn assemble<O: PositionOracle + Sync + ?Sized>(
    oracle: &O,
    params: &RunParams,
    observer: &mut dyn ProgressObserver,
) -> Result<DistanceRun, SyzygyError> {
    syzygy::run::run(oracle, params, observer)
}

/// Runs the pipeline. The observer is finished on failure too, so a progress bar
/// is cleared before the error line.
fn compute<O: PositionOracle + Sync + ?Sized>(
    oracle: &O,
    params: &RunParams,
    observer: &mut dyn ProgressObserver,
) -> Result<DistanceRun, SyzygyError> {
    let result = assemble(oracle, params, observer);
    if result.is_err() {
        observer.finish();
    }
    result
}

fn run_command(args: RunArgs, verbose: u8) -> Result<(), SyzygyError> {
    let params = args.params()?;
    let kernel_path = args.source()?.resolve_path()?;
    let kernel = NaifData::read_naif_file(&kernel_path)?;

    info!("{params}");
    let mut observer = observer(verbose);
    let result = compute(&kernel, &params, observer.as_mut())?;

    let bodies = result.bodies();
    if bodies.len() >= 2 {
        info!(
            "Mean {} - {} distance: {:.6} AU",
            bodies[0],
            bodies[1],
            result.mean.distance(0, 1) / AU
        );
    }

    output::write_all(&args.out, &result)?;
    Ok(())
}

fn segments_command(kernel: Utf8PathBuf) -> Result<(), SyzygyError> {
    let kernel = NaifData::read_naif_file(&kernel)?;
    if let Some((start, end)) = kernel.coverage() {
        info!("Coverage: {} to {}", format_utc(&start), format_utc(&end));
    }

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for segment in kernel.segments() {
        wtr.serialize(segment)?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run_command(args, cli.verbose),
        Commands::Segments { kernel } => segments_command(kernel),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
