use clap::Parser;
use mpm::cli::{Cli, Commands};
use mpm::errors::MpmError;
use tracing_subscriber::EnvFilter;

/// Exit code when the OS random source fails; nothing safe can be done.
const EXIT_NO_RANDOMNESS: i32 = 2;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => mpm::cli::commands::init::execute(&cli),
        Commands::Add {
            ref entry,
            alphabet,
            length,
            force,
        } => mpm::cli::commands::add::execute(&cli, entry, alphabet, length, force),
        Commands::Import { ref entry, force } => {
            mpm::cli::commands::import_cmd::execute(&cli, entry, force)
        }
        Commands::Get { ref entry, print } => mpm::cli::commands::get::execute(&cli, entry, print),
        Commands::Change => mpm::cli::commands::change::execute(&cli),
        Commands::Section { ref name } => mpm::cli::commands::section::execute(&cli, name),
        Commands::List { ref what } => mpm::cli::commands::list::execute(&cli, what),
        Commands::Audit { last, ref since } => {
            mpm::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
    };

    if let Err(e) = result {
        mpm::cli::output::error(&e.to_string());
        let code = match e {
            MpmError::RandomnessUnavailable(_) => EXIT_NO_RANDOMNESS,
            _ => 1,
        };
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr, filtered by `MPM_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MPM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
