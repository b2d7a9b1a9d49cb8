use clap::{Parser, Subcommand};
use serde::Serialize;

use dca_sim::api::{self, SimulateArgs};
use dca_sim::log::init_logging;

#[derive(Parser)]
#[command(
    name = "dca-sim",
    about = "Dollar-cost averaging projections: randomized price-path replay plus a closed-form estimate"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Replay a plan over a simulated price path and print the JSON result
    Simulate(SimulateArgs),
    /// Print the closed-form quick estimate only
    Preview(SimulateArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Serve { port } => api::run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
        Command::Simulate(args) => api::build_request(args)
            .and_then(|request| api::simulate(&request))
            .and_then(|response| print_json(&response)),
        Command::Preview(args) => {
            api::build_request(args).and_then(|request| print_json(&api::preview_only(&request)))
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "dca-sim failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
