use clap::{Parser, Subcommand};

#[cfg(feature = "audio")]
mod audio;
mod commands;

#[derive(Parser)]
#[command(name = "phonelock", version, about = "Phone lock-screen simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive lock-screen session
    Run(commands::run::RunArgs),
    /// Notification tooling
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
