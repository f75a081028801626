//! `cw` subcommands.
//!
//! Database commands (`migrate`, `user`, `seed`) talk to Postgres directly;
//! shopper commands (`login`, `cart`, ...) go through the storefront API and
//! keep their state in the client state file.

pub mod account;
pub mod migrate;
pub mod seed;
pub mod shop;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use cartwheel_core::ProductIdError;
use cartwheel_storefront::db::create_pool;

use crate::client::{ApiClient, ClientError};
use crate::config::{ClientConfig, ConfigError};
use crate::state_file::{ClientState, StateFileError};

/// Connection string for the storefront database.
///
/// Reads `STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Connect to the storefront database.
async fn connect() -> Result<PgPool, DatabaseError> {
    let url = database_url().ok_or(DatabaseError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    Ok(create_pool(&url).await?)
}

/// Errors shared by the commands that talk to Postgres.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Errors shared by the commands that go through the storefront API.
#[derive(Debug, Error)]
pub enum ShopperError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    State(#[from] StateFileError),

    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    #[error("Not logged in. Run `cw login` first.")]
    NotLoggedIn,
}

/// API client plus the persisted client state.
pub struct Shopper {
    config: ClientConfig,
    pub client: ApiClient,
    pub state: ClientState,
}

impl Shopper {
    /// Load configuration and the state file.
    ///
    /// # Errors
    ///
    /// Returns `ShopperError` if configuration is invalid or the state file
    /// cannot be read.
    pub async fn open() -> Result<Self, ShopperError> {
        let config = ClientConfig::from_env()?;
        let client = ApiClient::new(&config)?;
        let state = ClientState::load(&config.state_path).await?;
        Ok(Self {
            config,
            client,
            state,
        })
    }

    /// Persist the state file.
    ///
    /// # Errors
    ///
    /// Returns `ShopperError::State` if the file cannot be written.
    pub async fn save(&self) -> Result<(), ShopperError> {
        self.state.save(&self.config.state_path).await?;
        Ok(())
    }
}

/// Print one line for the user. This is the terminal's toast.
#[allow(clippy::print_stdout)]
pub fn notify(message: impl std::fmt::Display) {
    println!("{message}");
}
