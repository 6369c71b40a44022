use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "focusshield-cli", version, about = "Focus Shield CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Blocked-site list management
    Sites {
        #[command(subcommand)]
        action: commands::sites::SitesAction,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Usage statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Check whether a URL is currently blocked
    Check {
        url: String,
        /// Also count a blocked hit, like a real navigation
        #[arg(long)]
        count: bool,
    },
    /// Dispatch a one-shot protocol message and print the response
    Msg { json: String },
    /// Settings and statistics import/export
    Transfer {
        #[command(subcommand)]
        action: commands::transfer::TransferAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Sites { action } => commands::sites::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Check { url, count } => commands::check::run(&url, count),
        Commands::Msg { json } => commands::msg::run(&json),
        Commands::Transfer { action } => commands::transfer::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "focusshield-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
