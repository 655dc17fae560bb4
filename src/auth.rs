// src/auth.rs

use crate::{
    client::ImgurClient,
    config::creds::{CredentialStore, Credentials},
    constants,
    error::{AppError, AppResult},
    models::TokenSet,
    symbols, ui,
};
use colored::Colorize;
use log::{info, warn};

/// Walks a client through both authorization phases, prompting whenever
/// stored material is missing or rejected. Owns the in-memory credential
/// record and writes it back after each successful change.
pub struct Authenticator<'a> {
    store: &'a CredentialStore,
    creds: Credentials,
    dirty: bool,
}

impl<'a> Authenticator<'a> {
    pub fn new(store: &'a CredentialStore) -> AppResult<Self> {
        let creds = store.load()?;
        Ok(Self {
            store,
            creds,
            dirty: false,
        })
    }

    /// Client-credential phase. Loops until the service accepts a pair:
    /// missing or rejected values fall back to interactive prompts, and the
    /// only exits without valid credentials are an interrupt or a network
    /// failure.
    pub async fn establish_client(&mut self, client: &mut ImgurClient) -> AppResult<()> {
        let mut guide_shown = false;
        loop {
            let pair = self
                .creds
                .client_pair()
                .map(|(id, secret)| (id.to_string(), secret.to_string()));
            let Some((id, secret)) = pair else {
                self.prompt_for_client_pair(&mut guide_shown)?;
                continue;
            };
            client.set_client_credentials(id, secret);

            ui::step("Validating API credentials... ");
            match client.credits().await {
                Ok(_) => {
                    println!("ok.");
                    break;
                }
                Err(AppError::ClientCredentialsRejected) => {
                    println!("rejected.");
                    warn!("stored client credentials were rejected by the API");
                    eprintln!(
                        "{} The service rejected this client id/secret pair.",
                        *symbols::ERROR
                    );
                    self.creds.client_id = None;
                    self.creds.client_secret = None;
                }
                Err(e) => {
                    println!("failed.");
                    return Err(e);
                }
            }
        }
        if self.dirty {
            self.store.save(&self.creds)?;
            self.dirty = false;
        }
        Ok(())
    }

    /// User-authorization phase. Tries the stored token pair first, then a
    /// silent refresh, and only then falls back to the interactive PIN
    /// exchange.
    pub async fn establish_user(&mut self, client: &mut ImgurClient) -> AppResult<()> {
        let stored = self
            .creds
            .token_pair()
            .map(|(access, refresh)| (access.to_string(), refresh.to_string()));
        if let Some((access, refresh)) = stored {
            client.set_user_auth(access, refresh);
            ui::step("Applying stored authorization... ");
            match client.verify_user_auth().await {
                Ok(settings) => {
                    println!("ok.");
                    if let Some(name) = settings.account_url {
                        println!("{} Signed in as {}.", *symbols::OK, name.bold());
                    }
                    return Ok(());
                }
                Err(AppError::AuthRejected) => {
                    println!("expired.");
                    info!("stored access token rejected, attempting a silent refresh");
                    ui::step("Refreshing access token... ");
                    match client.refresh_access_token().await {
                        Ok(tokens) => {
                            println!("ok.");
                            return self.apply_tokens(client, tokens);
                        }
                        Err(AppError::AuthRejected) => {
                            println!("failed.");
                            warn!("refresh token no longer valid, falling back to the PIN flow");
                        }
                        Err(e) => {
                            println!("failed.");
                            return Err(e);
                        }
                    }
                }
                Err(e) => {
                    println!("failed.");
                    return Err(e);
                }
            }
        }
        self.pin_flow(client).await
    }

    fn prompt_for_client_pair(&mut self, guide_shown: &mut bool) -> AppResult<()> {
        if !*guide_shown {
            ui::box_message(
                "Imgur application required",
                constants::HELP_REGISTER_GUIDE
                    .lines()
                    .collect::<Vec<_>>()
                    .as_slice(),
                |s| s.cyan(),
            );
            *guide_shown = true;
        }
        let id = Self::read_prompt(ui::prompt("Client ID", None))?;
        if id.is_empty() {
            println!("{}", "Client ID cannot be empty.".yellow());
            return Ok(());
        }
        let secret = Self::read_prompt(ui::prompt_hidden("Client secret (input hidden)"))?;
        if secret.is_empty() {
            println!("{}", "Client secret cannot be empty.".yellow());
            return Ok(());
        }
        self.creds.client_id = Some(id);
        self.creds.client_secret = Some(secret);
        self.dirty = true;
        Ok(())
    }

    /// PIN exchange. The user approves the application in a browser and
    /// types the displayed PIN back in; wrong PINs re-prompt, and the loop
    /// ends on success or interrupt only.
    async fn pin_flow(&mut self, client: &mut ImgurClient) -> AppResult<()> {
        let auth_url = client.auth_url()?;
        ui::box_message(
            "Account authorization required",
            &[
                "1. A browser window should open on the Imgur authorization page.",
                "2. Approve the application while signed in to your account.",
                "3. Copy the PIN Imgur displays and enter it below.",
            ],
            |s| s.cyan(),
        );
        if webbrowser::open(&auth_url).is_err() {
            warn!("could not launch a browser for the authorization page");
            println!(
                "{} Could not open a browser. Visit this URL manually:",
                *symbols::WARN
            );
            println!("    {}", auth_url);
        }
        loop {
            let pin = Self::read_prompt(ui::prompt("PIN", None))?;
            if pin.is_empty() {
                println!("{}", "PIN cannot be empty.".yellow());
                continue;
            }
            ui::step("Exchanging PIN for tokens... ");
            match client.exchange_pin(&pin).await {
                Ok(tokens) => {
                    println!("ok.");
                    return self.apply_tokens(client, tokens);
                }
                Err(AppError::AuthRejected) => {
                    println!("rejected.");
                    eprintln!(
                        "{} That PIN was not accepted. Check it and try again.",
                        *symbols::ERROR
                    );
                }
                Err(e) => {
                    println!("failed.");
                    return Err(e);
                }
            }
        }
    }

    fn apply_tokens(&mut self, client: &mut ImgurClient, tokens: TokenSet) -> AppResult<()> {
        if let Some(name) = &tokens.account_username {
            println!("{} Authorized as {}.", *symbols::OK, name.bold());
        }
        client.set_user_auth(&tokens.access_token, &tokens.refresh_token);
        self.creds.access_token = Some(tokens.access_token);
        self.creds.refresh_token = Some(tokens.refresh_token);
        self.store.save(&self.creds)?;
        info!("token pair updated and persisted");
        Ok(())
    }

    fn read_prompt(result: std::io::Result<String>) -> AppResult<String> {
        result.map_err(|_| {
            warn!("user interrupted at a credential prompt");
            AppError::UserInterrupt
        })
    }
}
