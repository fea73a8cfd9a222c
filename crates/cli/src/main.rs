//! Vitrine CLI - manage the local users and products catalog.
//!
//! # Usage
//!
//! ```bash
//! # Show users, loading them from the API on first run
//! vitrine users list
//!
//! # Add a user (validated)
//! vitrine users add --first-name Maria --last-name Oliveira \
//!     --email maria@example.com --age 32
//!
//! # Copy product #0 under a new title
//! vitrine products duplicate 0 --title "iPhone 9 Pro"
//!
//! # Replace the products with a fresh API page
//! vitrine products refresh
//!
//! # Forget everything stored locally
//! vitrine clear all
//! ```
//!
//! # Commands
//!
//! - `users` - list, add, remove, refresh users
//! - `products` - list, add, duplicate, remove, refresh products
//! - `clear` - delete stored snapshots
//!
//! Logs go to stderr (`RUST_LOG` overrides the default filter); lists go to
//! stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

mod commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "vitrine_catalog=info,vitrine_cli=info";

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Local-first users and products catalog")]
struct Cli {
    /// Print lists as HTML fragments instead of plain text
    #[arg(long, global = true)]
    html: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Delete stored snapshots so the next run reloads from the API
    Clear {
        #[arg(value_enum)]
        target: ClearTarget,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Show the users
    List,
    /// Add a user at the top of the list
    Add(UserArgs),
    /// Remove a user by list position or identifier
    Remove(RemoveArgs),
    /// Replace all users with a fresh copy from the API
    Refresh,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Show the products
    List,
    /// Add a product at the end of the list
    Add(ProductArgs),
    /// Add a copy of the product at a position, with optional changes
    Duplicate {
        /// List position of the product to copy
        position: usize,

        #[command(flatten)]
        overrides: ProductOverrides,
    },
    /// Remove a product by list position or identifier
    Remove(RemoveArgs),
    /// Replace all products with a fresh page from the API
    Refresh,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClearTarget {
    Users,
    Products,
    All,
}

/// User form values, validated on submit.
#[derive(Args)]
struct UserArgs {
    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    age: String,

    /// Image URL (optional)
    #[arg(long, default_value = "")]
    image: String,
}

/// Product form values. Nothing is rejected.
#[derive(Args)]
struct ProductArgs {
    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    brand: String,

    #[arg(long, default_value = "")]
    category: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Decimal price; invalid input is stored as zero
    #[arg(long, default_value = "")]
    price: String,

    /// Thumbnail URL; blank uses a placeholder
    #[arg(long, default_value = "")]
    thumbnail: String,
}

/// Fields to change on a duplicated product.
#[derive(Args)]
struct ProductOverrides {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    thumbnail: Option<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["position", "id"])))]
struct RemoveArgs {
    /// List position as shown by `list`
    position: Option<usize>,

    /// Record identifier
    #[arg(long)]
    id: Option<i64>,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = commands::Output::from_html_flag(cli.html);

    match cli.command {
        Commands::Users { action } => {
            let state = commands::load_state()?;
            match action {
                UsersAction::List => commands::users::list(&state, output).await?,
                UsersAction::Add(args) => {
                    commands::users::add(&state, output, args.into_form()).await?;
                }
                UsersAction::Remove(args) => {
                    commands::users::remove(&state, output, args.into_target()?).await?;
                }
                UsersAction::Refresh => commands::users::refresh(&state, output).await?,
            }
        }
        Commands::Products { action } => {
            let state = commands::load_state()?;
            match action {
                ProductsAction::List => commands::products::list(&state, output).await?,
                ProductsAction::Add(args) => {
                    commands::products::add(&state, output, args.into_form()).await?;
                }
                ProductsAction::Duplicate {
                    position,
                    overrides,
                } => {
                    commands::products::duplicate(&state, output, position, |form| {
                        overrides.apply(form);
                    })
                    .await?;
                }
                ProductsAction::Remove(args) => {
                    commands::products::remove(&state, output, args.into_target()?).await?;
                }
                ProductsAction::Refresh => commands::products::refresh(&state, output).await?,
            }
        }
        Commands::Clear { target } => {
            let state = commands::load_state()?;
            match target {
                ClearTarget::Users => commands::clear::users(&state)?,
                ClearTarget::Products => commands::clear::products(&state)?,
                ClearTarget::All => {
                    commands::clear::users(&state)?;
                    commands::clear::products(&state)?;
                }
            }
        }
    }
    Ok(())
}

impl UserArgs {
    fn into_form(self) -> vitrine_catalog::forms::UserForm {
        let mut form = vitrine_catalog::forms::UserForm::new();
        form.first_name = self.first_name;
        form.last_name = self.last_name;
        form.email = self.email;
        form.age = self.age;
        form.image = self.image;
        form
    }
}

impl ProductArgs {
    fn into_form(self) -> vitrine_catalog::forms::ProductForm {
        vitrine_catalog::forms::ProductForm {
            title: self.title,
            brand: self.brand,
            category: self.category,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
        }
    }
}

impl ProductOverrides {
    fn apply(self, form: &mut vitrine_catalog::forms::ProductForm) {
        let fields = [
            (self.title, &mut form.title),
            (self.brand, &mut form.brand),
            (self.category, &mut form.category),
            (self.description, &mut form.description),
            (self.price, &mut form.price),
            (self.thumbnail, &mut form.thumbnail),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

impl RemoveArgs {
    fn into_target(self) -> Result<commands::RemoveTarget, commands::CommandError> {
        match (self.position, self.id) {
            (_, Some(id)) => Ok(commands::RemoveTarget::Id(id)),
            (Some(position), None) => Ok(commands::RemoveTarget::Position(position)),
            (None, None) => Err(commands::CommandError::MissingRemoveTarget),
        }
    }
}
