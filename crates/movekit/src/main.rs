//! MoveKit launcher.
//!
//! Default command runs the interactive quote form; `send-test` and `link`
//! are standalone utilities for checking the endpoint and the handoff link
//! without a terminal session.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use movekit::config::MoveKitConfig;
use movekit::submit::log_quote_summary;
use movekit::tui;
use movekit_handoff::{SystemOpener, WhatsappHandoff};
use movekit_logging::{init_logging, LogConfig};
use movekit_protocol::{compact_from_display, FormSource, SheetPayload, SubmissionRecord};
use movekit_sink::SheetSink;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "movekit", about = "Quote-capture desk for a removals business")]
struct Cli {
    /// Config file override (default: ~/.movekit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose console logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive quote form (the default)
    Form {
        /// Form source label: "lead" or "contact"
        #[arg(long, default_value = "lead")]
        source: String,

        /// Never open WhatsApp automatically
        #[arg(long)]
        no_open: bool,
    },
    /// POST a canned submission to the configured endpoint and report the result
    SendTest {
        /// Which endpoint to exercise: "lead" or "contact"
        #[arg(long, default_value = "lead")]
        source: String,
    },
    /// Print the WhatsApp handoff link for the given details
    Link {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        pickup: String,

        #[arg(long, default_value = "")]
        dropoff: String,

        /// Items in display format, e.g. "Bed (x2), Sofa"
        #[arg(long, default_value = "")]
        items: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Form {
        source: "lead".to_string(),
        no_open: false,
    });

    let tui_mode = matches!(command, Commands::Form { .. });
    init_logging(LogConfig {
        verbose: cli.verbose,
        tui_mode,
    })
    .context("Failed to initialize logging")?;

    let config =
        MoveKitConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match command {
        Commands::Form { source, no_open } => {
            let source = FormSource::from_label(&source);
            // --no-open only suppresses the timed open; the W key on the
            // confirmation screen still goes through the system opener.
            let opener = Some(Arc::new(SystemOpener) as Arc<dyn movekit_handoff::HandoffOpener>);
            tui::run(&config, source, opener, !no_open).await
        }
        Commands::SendTest { source } => send_test(&config, &source).await,
        Commands::Link {
            name,
            phone,
            pickup,
            dropoff,
            items,
        } => print_link(&config, name, phone, pickup, dropoff, items),
    }
}

/// Endpoint connectivity check: one canned POST, outcome on stdout.
async fn send_test(config: &MoveKitConfig, source: &str) -> Result<()> {
    let source = FormSource::from_label(source);
    let mut record = SubmissionRecord::empty(source);
    record.name = "MoveKit connectivity check".to_string();
    record.message = format!("sent at {}", record.timestamp.to_rfc3339());
    record.page = "movekit://send-test".to_string();
    log_quote_summary(&record);

    let endpoint = config.endpoints.url_for(source);
    let payload = SheetPayload::from_record(&record);
    match SheetSink::new().send(&payload, endpoint).await {
        Ok(response) => {
            println!("endpoint OK ({endpoint}): {response}");
        }
        Err(err) => {
            println!("endpoint check failed ({endpoint}): {err}");
        }
    }
    Ok(())
}

fn print_link(
    config: &MoveKitConfig,
    name: String,
    phone: String,
    pickup: String,
    dropoff: String,
    items: String,
) -> Result<()> {
    let mut record = SubmissionRecord::empty(FormSource::Lead);
    record.name = name;
    record.phone = phone;
    record.pickup = pickup;
    record.dropoff = dropoff;
    record.items_formatted = compact_from_display(&items);
    record.selected_items = items;

    let handoff = WhatsappHandoff::new(
        config.business.whatsapp_phone.clone(),
        config.business.name.clone(),
    );
    let url = handoff
        .link(&record)
        .context("Failed to build WhatsApp link")?;
    println!("{url}");
    Ok(())
}
