use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "questline-cli", version, about = "Questline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Workout logging
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Profile, streaks, and achievements
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Rival encounters
    Rival {
        #[command(subcommand)]
        action: commands::rival::RivalAction,
    },
    /// Snapshot synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Rival { action } => commands::rival::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
