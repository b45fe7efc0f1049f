// crates/host/src/main.rs

mod app;
mod commands;
mod log;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use hr_admin_core::session::FileSessionStore;
use hr_admin_core::{ApiConfig, HrApi, HttpApiClient};

use app::{Console, Flow};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides; the prompt stays readable by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ApiConfig::from_env()?;
    let store = FileSessionStore::new(&config.session_path);
    let client = HttpApiClient::new(config)?;
    let api = HrApi::new(Arc::new(client));

    let mut console = Console::new(api, Box::new(store))?;

    println!("\nHR Admin Console");
    match console.user() {
        Some(user) => println!("Logged in as {}.", user.display_name()),
        None => println!("Not logged in. Use 'login <email> <password>'."),
    }
    println!("Type 'help' for commands, 'quit' to exit.\n");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                log::error(e);
                continue;
            }
        };

        match console.run(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => log::error(format!("{e:#}")),
        }
    }

    Ok(())
}
