mod commands;
mod config;

use commands::{Command, HELP};
use config::ConsoleAppConfig;
use console_core::{Console, HttpConsoleApi, Page};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so it does not interleave with the redrawn page
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,console_core=info,console=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Defaults + env + optional TOML overlay
    let cfg = ConsoleAppConfig::load();
    info!(target: "console", page_url = %cfg.console.page_url, "Starting console");

    let api = Arc::new(HttpConsoleApi::from_config(&cfg.console)?);
    let page = Arc::new(Page::standard());
    let mut console = Console::new(cfg.console.clone(), api, Arc::clone(&page));
    console.start()?;

    let mut revisions = page.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    redraw(&page);

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                redraw(&page);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match Command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(cmd)) => commands::apply(&console, cmd),
                        Ok(None) => {}
                        Err(e) => warn!(target: "console", "{e}; {HELP}"),
                    },
                    Ok(None) => {
                        info!(target: "console", "stdin closed; press ctrl-c to exit");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(target: "console", error = %e, "Failed to read stdin");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!(target: "console", "Ctrl-C received");
                break;
            }
        }
    }

    console.shutdown();
    info!(target: "console", "Console stopped");
    Ok(())
}

fn redraw(page: &Page) {
    print!("\x1b[2J\x1b[H");
    println!("{}", page.render_text());
    println!();
    println!("{HELP}");
}
