use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::Context;
use finch_program::{Executor, Instruction, Parameters, Program, RecordingRobot, execute};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, SimulatorConfig};
use crate::console::Console;
use crate::menu::Shell;
use crate::simulator::SimulatedFinch;

mod config;
mod console;
mod menu;
mod simulator;
mod tui;

#[derive(Debug, Parser)]
#[command(author, version, about = "Program and drive a Finch robot from the console")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Menu,
    /// Execute a program script once and print its trace
    Run {
        script: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// Record robot calls instead of driving the simulator
        #[arg(long)]
        dry_run: bool,
    },
    /// Step through a program script in a terminal UI
    Step {
        script: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// List the command vocabulary
    Vocabulary,
    /// Save the console colours
    Theme { foreground: String, background: String },
}

/// Overrides for the configured command parameters.
#[derive(Debug, Args)]
struct ParamArgs {
    #[arg(long, allow_negative_numbers = true)]
    speed: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    wait: Option<f64>,
}

impl ParamArgs {
    fn apply(&self, base: Parameters) -> Parameters {
        Parameters::new(
            self.speed.unwrap_or(base.drive_speed),
            self.brightness.unwrap_or(base.led_brightness),
            self.wait.unwrap_or(base.wait_seconds),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Menu);

    // the terminal UI owns the screen and installs its own hooks
    if !matches!(command, Commands::Step { .. }) {
        color_eyre::install()?;
        init_tracing(cli.verbose);
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;

    match command {
        Commands::Menu => {
            let console = Console::new(io::stdin().lock(), io::stdout().lock(), config.theme.colors()?);
            let robot = SimulatedFinch::new(&config.simulator);
            Shell::new(console, robot, config, Some(config_path)).run()?;
        }
        Commands::Run {
            script,
            params,
            dry_run,
        } => {
            let program = load_script(&script, params.apply(config.parameters))?;
            run_program(&program, dry_run, &config.simulator, &mut io::stdout().lock())?;
        }
        Commands::Step { script, params } => {
            let program = load_script(&script, params.apply(config.parameters))?;
            tui::run(&program, SimulatedFinch::new(&config.simulator))?;
        }
        Commands::Vocabulary => {
            for name in Instruction::vocabulary() {
                println!("{name}");
            }
        }
        Commands::Theme {
            foreground,
            background,
        } => {
            config.theme = menu::theme_from_args(&foreground, &background)?;
            config.save(&config_path)?;
            println!("Saved theme to {}", config_path.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("finch_control=debug,finch_program=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "finch_control=warn,finch_program=warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_script(path: &Path, params: Parameters) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Program::from_script(&text, params).wrap_err_with(|| format!("failed to load {}", path.display()))
}

/// Execute once, writing the trace (and, for dry runs, every robot call) to `out`.
fn run_program(
    program: &Program,
    dry_run: bool,
    simulator: &SimulatorConfig,
    out: &mut impl Write,
) -> Result<()> {
    if dry_run {
        let mut robot = RecordingRobot::with_temperature(simulator.ambient_celsius);
        let trace = execute(program, &mut robot);
        for call in &robot.calls {
            writeln!(out, "call: {call:?}")?;
        }
        for line in trace {
            writeln!(out, "{line}")?;
        }
    } else {
        let mut robot = SimulatedFinch::new(simulator);
        let mut executor = Executor::new(program);
        while let Some(step) = executor.step(&mut robot) {
            if let Some(line) = step.trace {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
