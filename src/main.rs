mod age;
mod birthday;
mod clock;
mod config;
mod display;
mod driver;
mod input;

use anyhow::{Context, Result};
use clock::SystemClock;
use config::Settings;
use display::{OutputFormat, Theme};
use driver::{LiveRefreshDriver, Snapshot};
use input::{Command, parse_command};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(std::env::args().nth(1))?;
    info!(?settings, "starting birthday clock");

    let mut theme = settings.theme;
    let mut driver = LiveRefreshDriver::new(Arc::new(SystemClock), settings.refresh_interval);
    let mut snapshots = driver.subscribe();

    if let Some(birth_date) = settings.birth_date {
        driver.set_birth_date(birth_date).await;
        driver.submit();
    }

    print_prompt(theme)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    show(&snapshot, theme, settings.output)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Submit(birth_date)) => {
                        driver.set_birth_date(birth_date).await;
                        driver.submit();
                    }
                    Ok(Command::ToggleTheme) => {
                        theme = theme.toggled();
                        info!(?theme, "theme toggled");
                        print_prompt(theme)?;
                    }
                    Ok(Command::Clear) if driver.is_active() => {
                        driver.clear().await;
                        println!("Birth date cleared.");
                    }
                    Ok(Command::Clear) => println!("No birth date set."),
                    Ok(Command::Quit) => break,
                    Err(err) => {
                        warn!(%err, "rejected input");
                        eprintln!("{err}");
                    }
                }
            }
        }
    }

    driver.shutdown().await;
    Ok(())
}

fn print_prompt(theme: Theme) -> Result<()> {
    println!("Age Calculator: enter your date of birth (YYYY-MM-DD).");
    println!("Commands: \"theme\" for {}, \"clear\", \"quit\".", theme.toggle_label());
    std::io::stdout().flush()?;
    Ok(())
}

fn show(snapshot: &Snapshot, theme: Theme, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}", display::render_text(snapshot, theme)),
        OutputFormat::Json => println!(
            "{}",
            display::render_json(snapshot).context("Failed to encode snapshot")?
        ),
    }
    std::io::stdout().flush()?;
    Ok(())
}
