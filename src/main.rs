use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod session;
mod utils;

use commands::Outcome;
use config::Config;
use session::Session;

const PROMPT: &str = "demand> ";

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["demand_analyzer=debug", "reqwest=warn", "hyper=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    info!("📈 Starting Demand Analyzer v{}", env!("CARGO_PKG_VERSION"));
    info!("  Price/quantity regression with linear and log-log models");
    info!("");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    debug!("Configuration: {:?}", config);

    let mut session = match Session::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create quote client: {}", e);
            return;
        }
    };

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", commands::help::execute());

    loop {
        if stdout.write_all(PROMPT.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        match commands::handle_line(&mut session, &line).await {
            Outcome::Reply(text) => println!("{}\n", text),
            Outcome::Nothing => {}
            Outcome::Quit => break,
        }
    }

    info!("👋 Bye");
}
