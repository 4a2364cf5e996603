use anyhow::{Context, Result};
use brcode::PixPayload;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;

mod models;
mod repositories;
mod services;
mod settings;
mod utils;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "doula-pix.toml")]
    config: String,
    /// Overrides `server.listen`
    #[arg(short, long)]
    listen: Option<String>,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Print a payload for the configured merchant, with its QR code
    Encode {
        #[arg(short, long)]
        amount: Option<Decimal>,
        #[arg(short, long)]
        tx_id: Option<String>,
        #[arg(long)]
        pix_key: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Print only the payload
        #[arg(long)]
        no_qr: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let mut settings = settings::Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}.", args.config))?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_logging(&args.log4rs)?;
            log::info!("Starting doula-pix service.");

            if let Some(listen) = args.listen {
                settings.server.listen = listen;
            }
            services::start_services(settings).await?;
        }
        Command::Encode {
            amount,
            tx_id,
            pix_key,
            name,
            city,
            no_qr,
        } => {
            let merchant = settings.merchant;
            let payload = PixPayload {
                pix_key: pix_key.unwrap_or(merchant.pix_key),
                beneficiary_name: name.unwrap_or(merchant.beneficiary_name),
                city: city.unwrap_or(merchant.city),
                amount,
                tx_id,
            };
            payload.validate()?;

            let encoded = payload.encode();
            println!("{}", encoded);
            if !no_qr {
                println!("\n{}\n", utils::render_text(&encoded)?);
            }
        }
    }

    Ok(())
}

/// Sets up log4rs from `path`. The file appender writes under `logs/`.
fn init_logging(path: &str) -> Result<()> {
    fs::create_dir_all("logs").context("Could not create logs directory.")?;

    log4rs::init_file(path, Default::default())
        .with_context(|| format!("Could not initialize logging from {}.", path))?;

    log::info!("Logging initialized from {}.", path);
    Ok(())
}
