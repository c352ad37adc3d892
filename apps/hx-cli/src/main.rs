use clap::{Parser, Subcommand, ValueEnum};
use hx_controls::Mode;
use hx_project::{ProjectError, ScenarioDef};
use hx_sim::{ChartSample, ChartSeries, SimError, SimulationEngine, Snapshot, run_sim};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "hx-cli")]
#[command(about = "Heat exchanger PID loop simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scenario file with default parameters
    Init {
        /// Path of the scenario YAML file to create
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate scenario file syntax and parameter ranges
    Validate {
        /// Path to the scenario file (YAML, or JSON by extension)
        path: PathBuf,
        /// Clamp out-of-range values instead of rejecting them
        #[arg(long)]
        clamp: bool,
    },
    /// Run a fixed number of steps as fast as possible
    Run {
        /// Path to the scenario file (YAML, or JSON by extension)
        path: PathBuf,
        /// Number of 0.1 s steps (scenario dt) to take
        #[arg(long, default_value_t = 1000)]
        steps: u64,
        #[command(flatten)]
        loop_args: LoopArgs,
        /// Override the scenario chart decimation
        #[arg(long)]
        record_every: Option<u64>,
        /// Output CSV file for the chart series
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Drive the loop from the wall clock, one step per elapsed period
    Realtime {
        /// Path to the scenario file (YAML, or JSON by extension)
        path: PathBuf,
        /// Wall-clock duration in seconds
        #[arg(long, default_value_t = 30.0)]
        duration: f64,
        /// Host frame period in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        #[command(flatten)]
        loop_args: LoopArgs,
        /// Leave the loop paused (only Manual mode advances)
        #[arg(long)]
        paused: bool,
    },
}

#[derive(clap::Args)]
struct LoopArgs {
    /// Actuation source
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,
    /// Manual valve opening in percent (0 to 100)
    #[arg(long, default_value_t = 0.0, value_parser = parse_percent)]
    manual_percent: f64,
    /// Clamp out-of-range scenario values instead of rejecting them
    #[arg(long)]
    clamp: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Manual,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => Mode::Automatic,
            ModeArg::Manual => Mode::Manual,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Refusing to overwrite {}; pass --force", .0.display())]
    AlreadyExists(PathBuf),
}

type CliResult<T> = Result<T, CliError>;

fn parse_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 100"))
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { path, clamp } => cmd_validate(&path, clamp),
        Commands::Run {
            path,
            steps,
            loop_args,
            record_every,
            output,
            json,
        } => cmd_run(
            &path,
            steps,
            &loop_args,
            record_every,
            output.as_deref(),
            json,
        ),
        Commands::Realtime {
            path,
            duration,
            frame_ms,
            loop_args,
            paused,
        } => cmd_realtime(&path, duration, frame_ms, &loop_args, paused),
    }
}

fn load(path: &Path, clamp: bool) -> CliResult<ScenarioDef> {
    if !clamp {
        return Ok(hx_project::load_scenario(path)?);
    }
    let mut scenario = hx_project::read_scenario(path)?;
    for adjusted in hx_project::clamp_scenario(&mut scenario) {
        println!("! {adjusted}");
    }
    hx_project::validate_scenario(&scenario).map_err(ProjectError::from)?;
    Ok(scenario)
}

/// Build the engine and apply the command-line loop settings.
fn prepare(scenario: &ScenarioDef, args: &LoopArgs, running: bool) -> CliResult<SimulationEngine> {
    let mut engine = hx_project::build_engine(scenario)?;
    engine.set_mode(args.mode.into());
    engine.set_manual_actuation(args.manual_percent);
    engine.set_running(running);
    Ok(engine)
}

fn cmd_init(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }
    hx_project::save_yaml(path, &ScenarioDef::default())?;
    println!("✓ Wrote default scenario to {}", path.display());
    Ok(())
}

fn cmd_validate(path: &Path, clamp: bool) -> CliResult<()> {
    println!("Validating scenario: {}", path.display());
    let scenario = load(path, clamp)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn cmd_run(
    path: &Path,
    steps: u64,
    args: &LoopArgs,
    record_every: Option<u64>,
    output: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let scenario = load(path, args.clamp)?;
    let mut engine = prepare(&scenario, args, true)?;

    let mut opts = hx_project::sim_options(&scenario, steps);
    if let Some(n) = record_every {
        opts.record_every = n;
    }

    let started = Instant::now();
    let record = run_sim(&mut engine, &opts)?;
    tracing::debug!(elapsed_s = started.elapsed().as_secs_f64(), "run finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&record.final_state)?);
    } else {
        println!("Scenario: {}", scenario.name);
        print_summary(&record.final_state);
        println!("  Chart samples: {}", record.series.len());
    }

    if let Some(path) = output {
        std::fs::write(path, series_csv(record.series.samples()))?;
        if !json {
            println!(
                "✓ Exported {} data points to {}",
                record.series.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn cmd_realtime(
    path: &Path,
    duration: f64,
    frame_ms: u64,
    args: &LoopArgs,
    paused: bool,
) -> CliResult<()> {
    let scenario = load(path, args.clamp)?;
    let mut engine = prepare(&scenario, args, !paused)?;
    if paused && engine.mode() == Mode::Automatic {
        tracing::warn!("automatic mode while paused: the plant will not advance");
    }

    let mut series = ChartSeries::new(scenario.simulation.record_every)?;
    let frame = Duration::from_millis(frame_ms.max(1));
    let start = Instant::now();

    let mut snap = engine.snapshot();
    loop {
        let now = start.elapsed().as_secs_f64();
        if now >= duration {
            break;
        }
        snap = engine.tick(now);
        if series.observe(&snap) {
            render_status(&snap);
        }
        std::thread::sleep(frame);
    }
    clear_status_line();

    print_summary(&snap);
    Ok(())
}

fn series_csv(samples: &[ChartSample]) -> String {
    let mut csv = String::from("time_s,temperature_c,setpoint_c,error_pct,actuation_pct\n");
    for s in samples {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            s.time_s, s.temperature, s.setpoint, s.error_pct, s.actuation_pct
        ));
    }
    csv
}

fn settling_label(snap: &Snapshot) -> String {
    match snap.settling_time {
        Some(t) => format!("{t:.1} s"),
        None => "N/A".to_string(),
    }
}

fn print_summary(snap: &Snapshot) {
    println!("  Mode:          {}", snap.display_mode);
    println!("  Time:          {:.1} s ({} steps)", snap.time, snap.step_count);
    println!("  Temperature:   {:.1} °C", snap.temperature);
    println!("  Setpoint:      {:.1} °C", snap.setpoint);
    println!("  Error:         {:.1} %", snap.signed_error_percent());
    println!("  Valve opening: {:.0} %", snap.actuation_percent);
    println!("  Settling time: {}", settling_label(snap));
}

fn clear_status_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_status(snap: &Snapshot) {
    print!(
        "\r[{:<9}] t={:>7.1}s  T={:>6.1}°C  SP={:>5.1}°C  err={:>6.1}%  valve={:>3.0}%  settle={}",
        snap.display_mode.label(),
        snap.time,
        snap.temperature,
        snap.setpoint,
        snap.signed_error_percent(),
        snap.actuation_percent,
        settling_label(snap)
    );
    let _ = io::stdout().flush();
}
