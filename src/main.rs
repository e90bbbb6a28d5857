use clap::Parser;
use tracing_subscriber::EnvFilter;
use ui_explorer::cli::commands::{cmd_explore, cmd_inspect, cmd_regenerate};
use ui_explorer::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Explore {
            app_id,
            platform,
            max_depth,
            output_dir,
            settle_ms,
        } => {
            cmd_explore(
                &app_id,
                platform,
                max_depth,
                output_dir.as_deref(),
                settle_ms,
                &config,
                cli.verbose,
            )?;
        }
        Commands::Regenerate { report, output } => {
            cmd_regenerate(&report, output.as_deref())?;
        }
        Commands::Inspect { hierarchy } => {
            cmd_inspect(&hierarchy)?;
        }
    }

    Ok(())
}

/// Progress goes to stderr; RUST_LOG overrides the -v level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
