use amcp::{Client, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Usage: `cargo run --example query -- <host> <command>...`
pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set-up the log and traces handler
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".into());
    let command = args.collect::<Vec<_>>().join(" ");
    let command = if command.is_empty() {
        "VERSION"
    } else {
        command.as_str()
    };

    let mut client = Client::new(Config {
        host,
        ..Default::default()
    });

    let response = client.query(command, None)?;

    tracing::info!("{response}");
    if let Some(payload) = response.payload() {
        println!("{payload}");
    }

    Ok(())
}
