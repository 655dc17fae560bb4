// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const LOG_FILE_NAME: &str = "imgur-upload.log";
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const CREDS_FILE_NAME: &str = "creds.json";
pub const CREDS_PATH_ENV: &str = "IMGUR_UPLOAD_CREDS";
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const API_BASE_URL: &str = "https://api.imgur.com/";
pub const ALBUM_PAGE_URL: &str = "https://imgur.com/a/";
pub const IMAGE_PAGE_URL: &str = "https://imgur.com/";

pub const HELP_REGISTER_GUIDE: &str = r#"
1. Sign in to Imgur, then open the application registration page:
   https://api.imgur.com/oauth2/addclient
2. Choose "OAuth 2 authorization without a callback URL". This tool uses
   the out-of-band PIN exchange and never receives a redirect.
3. Submit the form. Imgur will display a Client ID and a Client Secret.
4. Enter both values at the prompts. They are stored in creds.json next
   to the executable and validated before anything is uploaded."#;
