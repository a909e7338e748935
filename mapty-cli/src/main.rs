//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{stdin, stdout, Write};
use tracing_subscriber::{fmt, EnvFilter};

use mapty_lib::{
    AlertQueue, App, Coords, Environment, FormInput, HeadlessMap, SqliteStorage, StandardColor,
    Workout, WorkoutKind, WorkoutRow,
};

type CliApp = App<SqliteStorage, HeadlessMap, AlertQueue>;

fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    init_logging(cli_args.verbose, cli_args.quiet);

    let env = Environment::initialize().context("Failed to initialize application")?;
    let header_color = mapty_lib::parse_color(&env.config.theme.header_color)
        .map(table_color)
        .unwrap_or(Color::Green);
    let config_path = env.config_path.clone();
    let mut app: CliApp = App::new(env.storage, AlertQueue::new(), env.config.zoom_level);

    let outcome = run_command(&mut app, cli_args.command, header_color, &config_path);

    // Anything the controller wanted to tell the user
    for alert in app.notifier_mut().drain() {
        eprintln!("{alert}");
    }
    outcome
}

fn run_command(
    app: &mut CliApp,
    command: cli::Commands,
    header_color: Color,
    config_path: &std::path::Path,
) -> Result<()> {
    tracing::debug!(?command, "Running command");
    match command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add {
            kind,
            lat,
            lng,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let coords = Coords::new(lat, lng);
            if !coords.is_valid() {
                bail!("Invalid position: {coords}");
            }
            let input = FormInput {
                kind: cli_kind_to_kind(kind),
                distance,
                duration,
                cadence: cadence.unwrap_or(0.0),
                elevation: elevation.unwrap_or(0.0),
            };
            match app.add_workout(coords, input) {
                Ok(id) => {
                    let workout = app
                        .store()
                        .find_by_id(&id)
                        .context("Workout vanished after being added")?;
                    println!("Logged {} (ID: {id})", workout.popup_label());
                    print_workout_table(std::slice::from_ref(workout), header_color);
                }
                Err(e) => bail!("Error adding workout: {e}"),
            }
        }
        cli::Commands::List { limit } => {
            let rows = app.rows();
            if rows.is_empty() {
                println!("No workouts logged yet.");
                return Ok(());
            }
            let shown = limit.unwrap_or(rows.len()).min(rows.len());
            print_row_table(&rows[..shown], header_color);
        }
        cli::Commands::Select { id } => {
            if !app.select_workout(&id) {
                bail!("No workout with ID '{id}'");
            }
            if let Some(workout) = app.store().find_by_id(&id) {
                println!("{}", selection_message(workout));
            }
        }
        cli::Commands::Reset { yes } => {
            if app.workouts().is_empty() {
                println!("Nothing to reset.");
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete all {} workouts?", app.workouts().len()))? {
                println!("Reset cancelled.");
                return Ok(());
            }
            app.reset();
            println!("All workouts deleted.");
        }
        cli::Commands::StoragePath => {
            println!("{}", app.store().storage().path().display());
        }
        cli::Commands::ConfigPath => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

/// Sets up stderr logging; `RUST_LOG` wins over the -v/-q flags.
fn init_logging(verbose: u8, quiet: u8) {
    let level = log_level(verbose, quiet);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mapty={level},mapty_lib={level}")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(matches!(level, "debug" | "trace"))
        .compact()
        .init();
}

fn log_level(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        3..=i16::MAX => "trace",
    }
}

const fn cli_kind_to_kind(kind: cli::WorkoutKindCli) -> WorkoutKind {
    match kind {
        cli::WorkoutKindCli::Running => WorkoutKind::Running,
        cli::WorkoutKindCli::Cycling => WorkoutKind::Cycling,
    }
}

const fn table_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::Red,
        StandardColor::Green => Color::Green,
        StandardColor::Yellow => Color::Yellow,
        StandardColor::Blue => Color::Blue,
        StandardColor::Magenta => Color::Magenta,
        StandardColor::Cyan => Color::Cyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGrey,
        StandardColor::DarkRed => Color::DarkRed,
        StandardColor::DarkGreen => Color::DarkGreen,
        StandardColor::DarkYellow => Color::DarkYellow,
        StandardColor::DarkBlue => Color::DarkBlue,
        StandardColor::DarkMagenta => Color::DarkMagenta,
        StandardColor::DarkCyan => Color::DarkCyan,
        StandardColor::Grey => Color::Grey,
    }
}

fn selection_message(workout: &Workout) -> String {
    format!(
        "Selected '{}' at {} ({} time(s) so far).",
        workout.describe(),
        workout.coords(),
        workout.clicks()
    )
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    stdout().flush().context("Failed to flush prompt")?;
    let mut answer = String::new();
    stdin()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn header(table: &mut Table, titles: &[&str], header_color: Color) {
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(titles.iter().map(|t| Cell::new(t).fg(header_color)));
}

fn print_row_table(rows: &[WorkoutRow], header_color: Color) {
    let mut table = Table::new();
    header(
        &mut table,
        &["ID", "Workout", "Details", "Selected"],
        header_color,
    );
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.id),
            Cell::new(format!("{} {}", row.kind.icon(), row.title)),
            Cell::new(row.summary()),
            Cell::new(row.clicks.to_string()),
        ]);
    }
    println!("{table}");
}

fn print_workout_table(workouts: &[Workout], header_color: Color) {
    let mut table = Table::new();
    header(
        &mut table,
        &["ID", "Logged (Local)", "Position", "Details"],
        header_color,
    );
    for workout in workouts {
        table.add_row(vec![
            Cell::new(workout.id()),
            Cell::new(
                workout
                    .date()
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M"),
            ),
            Cell::new(workout.coords().to_string()),
            Cell::new(WorkoutRow::from(workout).summary()),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapty_lib::KindInput;

    #[test]
    fn log_level_follows_flag_counts() {
        assert_eq!(log_level(0, 0), "warn");
        assert_eq!(log_level(2, 0), "debug");
        assert_eq!(log_level(0, 1), "error");
        assert_eq!(log_level(200, 0), "trace");
        assert_eq!(log_level(0, 200), "error");
        assert_eq!(log_level(u8::MAX, u8::MAX), "warn");
    }

    #[test]
    fn selection_message_reports_the_recorded_click() {
        let mut workout =
            Workout::create(Coords::new(51.5, -0.1), 5.0, 25.0, KindInput::Cadence(180.0))
                .unwrap();
        workout.click();
        let message = selection_message(&workout);
        assert!(message.starts_with(&format!("Selected '{}'", workout.describe())));
        assert!(message.contains("51.50000, -0.10000"));
        assert!(message.ends_with("(1 time(s) so far)."));
        assert!(!message.contains("Centered"));
    }
}
