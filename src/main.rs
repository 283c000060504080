//! tagrange CLI - replay detection recordings and simulate driver control.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use tagrange::source::RecordingSource;
use tagrange::telemetry::{DistanceUnit, LogTelemetry};
use tagrange::teleop::Servo;
use tagrange::{DistanceEstimator, GamepadState, InitLoop, RuntimeConfig, TeleopLoop};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tagrange")]
#[command(about = "Stabilized distance-to-tag estimation and teleop tools for a competition robot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a detection recording through the distance estimator.
    Replay(ReplayArgs),

    /// Print the default runtime configuration as JSON.
    Config,

    /// Simulate the two-button servo loop.
    Teleop {
        /// Comma-separated pressed buttons per cycle, e.g. "a,b,,ab".
        #[arg(long)]
        presses: String,

        /// Runtime config file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Path to the detection recording (CSV).
    #[arg(long)]
    recording: PathBuf,

    /// Runtime config file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the display unit from the config.
    #[arg(long, value_enum)]
    units: Option<CliUnit>,

    /// Include per-tag pose lines in telemetry.
    #[arg(long)]
    show_detections: bool,

    /// Extra cycles to run after the recording ends.
    #[arg(long, default_value = "0")]
    tail: usize,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log telemetry pages and estimator events.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliUnit {
    Meters,
    Feet,
}

impl From<CliUnit> for DistanceUnit {
    fn from(unit: CliUnit) -> Self {
        match unit {
            CliUnit::Meters => DistanceUnit::Meters,
            CliUnit::Feet => DistanceUnit::Feet,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Config => run_config(),
        Commands::Teleop { presses, config } => run_teleop(&presses, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> CliResult<RuntimeConfig> {
    Ok(match path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    })
}

fn run_replay(args: ReplayArgs) -> CliResult<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    tagrange::logger::init(level, args.log_file.as_deref())?;

    let mut config = load_config(args.config.as_ref())?;
    if let Some(units) = args.units {
        config.telemetry.units = units.into();
    }
    config.telemetry.show_detections |= args.show_detections;

    let source = RecordingSource::open(&args.recording)?;
    let cycles = source.num_frames() + args.tail;
    let estimator = DistanceEstimator::new(source, config.estimator.clone())?;
    // Replay runs faster than real time, so every page is published.
    let telemetry = LogTelemetry::new(Duration::ZERO);
    let mut init = InitLoop::new(estimator, telemetry, config.telemetry.clone());

    let unit = config.telemetry.units;
    println!("cycle,distance_{}", unit.suffix());
    for cycle in 1..=cycles {
        let distance = init.run_cycle();
        println!("{},{:.4}", cycle, unit.convert(distance));
    }

    log::logger().flush();
    Ok(())
}

fn run_config() -> CliResult<()> {
    println!("{}", RuntimeConfig::default().to_json_pretty()?);
    Ok(())
}

/// Servo stand-in that remembers its last commanded position.
#[derive(Default)]
struct SimulatedServo {
    position: Option<f64>,
}

impl Servo for SimulatedServo {
    fn set_position(&mut self, position: f64) {
        self.position = Some(position);
    }
}

fn parse_presses(presses: &str) -> CliResult<Vec<GamepadState>> {
    presses
        .split(',')
        .map(|cycle| -> CliResult<GamepadState> {
            let mut state = GamepadState::default();
            for button in cycle.trim().chars() {
                match button.to_ascii_lowercase() {
                    'a' => state.a = true,
                    'b' => state.b = true,
                    other => return Err(format!("unknown button '{}'", other).into()),
                }
            }
            Ok(state)
        })
        .collect()
}

fn run_teleop(presses: &str, config: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config.as_ref())?;
    let teleop = TeleopLoop::new(config.teleop)?;
    let mut servo = SimulatedServo::default();

    println!("cycle,a,b,position");
    for (idx, state) in parse_presses(presses)?.into_iter().enumerate() {
        teleop.run_cycle(state, &mut servo);
        let position = servo
            .position
            .map_or_else(|| "-".to_string(), |p| format!("{:.2}", p));
        println!("{},{},{},{}", idx + 1, state.a, state.b, position);
    }
    Ok(())
}
