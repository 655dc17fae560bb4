// src/lib.rs

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod uploader;
pub mod utils;

use crate::{
    auth::Authenticator,
    cli::Cli,
    client::ImgurClient,
    config::{AppConfig, creds::CredentialStore},
    error::{AppError, AppResult},
    models::BatchOutcome,
    uploader::AlbumUploader,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Everything one upload run needs. Assembled once per run; the client is
/// an explicit value living here, not a process-wide singleton.
pub struct UploadJobContext {
    pub config: Arc<AppConfig>,
    pub args: Arc<Cli>,
    pub client: ImgurClient,
    pub interactive: bool,
}

/// Library entry point, called by `main.rs` once arguments are in hand.
pub async fn run_from_cli(args: Arc<Cli>, interactive: bool) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);

    let config = Arc::new(AppConfig::new()?);
    let store = CredentialStore::at_default_location()?;
    debug!("credentials file: {}", store.path().display());

    let mut client = ImgurClient::new(&config)?;
    let mut authenticator = Authenticator::new(&store)?;
    authenticator.establish_client(&mut client).await?;
    if args.anonymous {
        info!("anonymous upload requested, skipping user authorization");
    } else {
        authenticator.establish_user(&mut client).await?;
    }

    let context = UploadJobContext {
        config,
        args: args.clone(),
        client,
        interactive,
    };

    let outcome = AlbumUploader::new(&context).run().await?;
    print_summary(&context, &outcome).await;

    if context.interactive {
        ui::pause();
    }
    Ok(())
}

/// Final report: the album page, the first image page, and what is left of
/// the API quota.
async fn print_summary(context: &UploadJobContext, outcome: &BatchOutcome) {
    println!("\nAlbum: {}{}", constants::ALBUM_PAGE_URL, outcome.album_id);
    if let Some(first) = outcome.image_ids.first() {
        println!("First image: {}{}.png", constants::IMAGE_PAGE_URL, first);
    }
    match context.client.credits().await {
        Ok(credits) => println!("{} {}", *symbols::INFO, credits.summary()),
        Err(e) => {
            // The uploads themselves already went through, so a failed
            // credits lookup only costs the report line.
            warn!("credits lookup after the batch failed: {e}");
            eprintln!(
                "{} Could not fetch the remaining credits: {}",
                *symbols::WARN,
                e
            );
        }
    }
}

/// Zero-argument runs land here: the same fields the flag parser would
/// fill are collected one prompt at a time.
pub fn collect_interactive_args() -> AppResult<Cli> {
    ui::print_header("Imgur Upload");
    println!("Enter upload targets one per line: a URL, a file, or a directory.");
    println!("Finish the list with an empty line; {} aborts.", *symbols::CTRL_C);

    let mut targets = Vec::new();
    loop {
        match ui::prompt("Target", None) {
            Ok(line) if !line.is_empty() => targets.push(line),
            Ok(_) => break,
            Err(_) => return Err(AppError::UserInterrupt),
        }
    }

    let read = |message: &str, default: Option<&str>| {
        ui::prompt(message, default).map_err(|_| AppError::UserInterrupt)
    };
    let title = read("Title", None)?;
    let description = read("Description", None)?;
    // Only a literal "y" selects anonymous mode.
    let anonymous = read("Anonymous (y/n)", Some("n"))? == "y";

    Ok(Cli::from_form(
        targets,
        (!title.is_empty()).then_some(title),
        (!description.is_empty()).then_some(description),
        anonymous,
    ))
}
