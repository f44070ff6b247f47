use anyhow::Result;
use clap::Parser;
use gmail_console::auth::CredentialStore;
use gmail_console::cli::Cli;
use gmail_console::client::GmailRestClient;
use gmail_console::config::Config;
use gmail_console::shell::{self, InteractiveShell};
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: gmail-console --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they interleave cleanly with the shell on stdout
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_console=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_console=info,warn,error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let mut store = CredentialStore::new(config, &cli.token_cache)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    writeln!(output, "Gmail Console")?;
    writeln!(output, "=============")?;

    if !shell::authenticate(&mut store, &mut input, &mut output).await? {
        writeln!(output, "Authentication failed. Exiting.")?;
        return Ok(());
    }

    let token = store
        .access_token()
        .ok_or_else(|| anyhow::anyhow!("No access token installed after authentication"))?
        .to_string();
    let client = GmailRestClient::new(token)?;

    let mut shell =
        InteractiveShell::new(client, input, output).with_display_limit(cli.display_limit);
    shell.run().await?;
    Ok(())
}
