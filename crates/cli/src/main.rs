//! Cartwheel CLI - Storefront client and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply the storefront schema
//! cw migrate
//!
//! # Create an administrator and seed some products
//! cw user create -n "Ada" -e ada@example.com -p 555-0100 --password s3cret! -r admin
//! cw seed products crates/cli/fixtures/products.yaml
//!
//! # Shop
//! cw register -n "Grace" -e grace@example.com -p 555-0101 --password hopper1
//! cw login -e grace@example.com --password hopper1
//! cw products list --category groceries
//! cw cart add 1 --quantity 2
//! cw cart dec 1
//! cw wishlist toggle 5
//! cw cart
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Create, list and promote accounts
//! - `seed` - Load products into the local store
//! - `login` / `register` / `logout` / `whoami` - Account session
//! - `products` - Browse the catalog or the local store
//! - `cart` / `wishlist` - Edit the saved cart and wishlist

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cartwheel_core::RegistrationForm;
use cartwheel_core::api::RegisterRequest;

use commands::shop::{LineEdit, Source};

mod client;
mod commands;
mod config;
mod state_file;

#[derive(Parser)]
#[command(name = "cw")]
#[command(author, version, about = "Cartwheel storefront client and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage accounts directly in the database
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a shopper account
    Register(Profile),
    /// Log out and forget the session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show or edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
}

/// Account details shared by `register` and `user create`.
#[derive(Args)]
struct Profile {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Email address
    #[arg(short, long)]
    email: String,

    /// Phone number
    #[arg(short, long)]
    phone: String,

    #[arg(long)]
    password: String,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account with any role
    Create {
        #[command(flatten)]
        profile: Profile,

        /// Account role (`admin`, `customer`)
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
    /// List accounts
    List,
    /// Show one account
    Show { email: String },
    /// Change an account's role
    SetRole { email: String, role: String },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML file, skipping ids already stored
    Products { file: PathBuf },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        #[arg(short, long)]
        category: Option<String>,

        /// Use the local store instead of the public catalog
        #[arg(long)]
        local: bool,
    },
    /// Show one product
    Show {
        id: String,

        #[arg(long)]
        local: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product, replacing any existing line for it
    Add {
        id: String,

        /// Values below 1 are stored as 1
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        #[arg(long)]
        local: bool,
    },
    /// Set a line's quantity (values below 1 are stored as 1)
    Update {
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit
    Inc { id: String },
    /// Remove one unit, stopping at 1
    Dec { id: String },
    /// Remove a line
    Remove { id: String },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add {
        id: String,

        #[arg(long)]
        local: bool,
    },
    /// Forget a saved product
    Remove { id: String },
    /// Save or forget a product
    Toggle {
        id: String,

        #[arg(long)]
        local: bool,
    },
}

impl From<Profile> for RegisterRequest {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            password: profile.password,
        }
    }
}

impl From<Profile> for RegistrationForm {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            password: profile.password,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use commands::{account, migrate, seed, shop, user};

    match cli.command {
        Commands::Migrate => migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { profile, role } => {
                user::create(&profile.into(), &role).await?;
            }
            UserAction::List => user::list().await?,
            UserAction::Show { email } => user::show(&email).await?,
            UserAction::SetRole { email, role } => user::set_role(&email, &role).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                seed::products(&file).await?;
            }
        },
        Commands::Login { email, password } => account::login(email, password).await?,
        Commands::Register(profile) => account::register(profile.into()).await?,
        Commands::Logout => account::logout().await?,
        Commands::Whoami => account::whoami().await?,
        Commands::Products { action } => match action {
            ProductsAction::List { category, local } => {
                shop::list_products(category.as_deref(), Source::from_local_flag(local)).await?;
            }
            ProductsAction::Show { id, local } => {
                shop::show_product(&id, Source::from_local_flag(local)).await?;
            }
        },
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => shop::show_cart().await?,
            CartAction::Add {
                id,
                quantity,
                local,
            } => shop::add_to_cart(&id, quantity, Source::from_local_flag(local)).await?,
            CartAction::Update { id, quantity } => {
                shop::edit_cart_line(&id, LineEdit::Set(quantity)).await?;
            }
            CartAction::Inc { id } => shop::edit_cart_line(&id, LineEdit::Increment).await?,
            CartAction::Dec { id } => shop::edit_cart_line(&id, LineEdit::Decrement).await?,
            CartAction::Remove { id } => shop::edit_cart_line(&id, LineEdit::Remove).await?,
        },
        Commands::Wishlist { action } => match action.unwrap_or(WishlistAction::Show) {
            WishlistAction::Show => shop::show_wishlist().await?,
            WishlistAction::Add { id, local } => {
                shop::add_to_wishlist(&id, Source::from_local_flag(local)).await?;
            }
            WishlistAction::Remove { id } => shop::remove_from_wishlist(&id).await?,
            WishlistAction::Toggle { id, local } => {
                shop::toggle_wishlist(&id, Source::from_local_flag(local)).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_quantity_parses() {
        let cli = Cli::try_parse_from(["cw", "cart", "update", "7", "-3"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: Some(CartAction::Update { quantity: -3, .. })
            })
        ));
    }
}
