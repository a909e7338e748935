// mapty-cli/src/cli.rs
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log running and cycling workouts on a map", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutKindCli {
    Running,
    Cycling,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a workout at a map position
    Add {
        /// Type of workout
        #[arg(value_enum)]
        kind: WorkoutKindCli,
        /// Latitude of the workout
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the workout
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Distance in km
        #[arg(short, long, allow_hyphen_values = true)]
        distance: f64,
        /// Duration in minutes
        #[arg(short = 't', long, allow_hyphen_values = true)]
        duration: f64,
        /// Cadence in steps/min (running)
        #[arg(short, long, allow_hyphen_values = true, conflicts_with = "elevation")]
        cadence: Option<f64>,
        /// Elevation gain in meters (cycling)
        #[arg(short, long, allow_hyphen_values = true)]
        elevation: Option<f64>,
    },
    /// List logged workouts, newest first
    List {
        /// Show only the last N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Select a workout as if clicked in the sidebar
    Select {
        /// ID of the workout
        id: String,
    },
    /// Delete every logged workout
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the path to the storage file
    StoragePath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
