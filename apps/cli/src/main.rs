//! # Tally CLI
//!
//! Runs one data-access action against the backend named by `DB_DRIVER`.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG, default "info"                  │
//! │  2. args::parse()             action + flags                            │
//! │  3. DbConfig::from_env()      .env + DB_DRIVER + <DRIVER>_*             │
//! │  4. Database::connect()       pool + SELECT 1                           │
//! │  5. Services::new(Storage)    stores for that backend                   │
//! │  6. run(action)               exit code 1 on any error                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! DB_DRIVER=POSTGRES tally migrate
//! DB_DRIVER=POSTGRES tally create --name "Rust Course" --price 80
//! DB_DRIVER=MYSQL tally transaction --client Ignacio --product 2 --product 3
//! ```

mod args;

use std::env;

use anyhow::{Context, Result};
use tally_core::{Invoice, InvoiceHeader, InvoiceItem, Product};
use tally_db::{Database, DbConfig, DbError, Services, Storage};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::args::{Action, InvoiceArgs, ProductArgs};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let argv: Vec<String> = env::args().skip(1).collect();
    let action = args::parse(&argv)?;

    if action == Action::Help {
        print!("{}", args::USAGE);
        return Ok(());
    }

    let config = DbConfig::from_env().context("loading database configuration")?;
    let db = Database::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.driver))?;

    let services = Services::new(&Storage::new(&db));
    let result = run(&services, action).await;

    db.close().await;
    result
}

/// Log output goes to stderr so listings on stdout stay clean.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(services: &Services, action: Action) -> Result<()> {
    match action {
        Action::Migrate => {
            services.migrate_all().await?;
            println!("Tables ready");
        }

        Action::Create(fields) => {
            let mut product = product_from(fields);
            services.products.create(&mut product).await?;
            println!("Created product {}", product.id);
        }

        Action::GetAll => {
            let products = services.products.get_all().await?;
            info!(count = products.len(), "Fetched products");
            for product in &products {
                println!("{product}");
            }
        }

        Action::GetOne(id) => match services.products.get_by_id(id).await {
            Ok(product) => println!("{product}"),
            Err(DbError::NotFound { .. }) => println!("There is no product with id {id}"),
            Err(err) => return Err(err.into()),
        },

        Action::Update(id, fields) => {
            let mut product = product_from(fields);
            product.id = id;
            services.products.update(&mut product).await?;
            println!("Updated product {id}");
        }

        Action::Delete(id) => {
            services.products.delete(id).await?;
            println!("Deleted product {id}");
        }

        Action::Transaction(fields) => {
            let mut invoice = invoice_from(fields);
            services.invoices.create(&mut invoice).await?;
            println!("{}", serde_json::to_string_pretty(&invoice)?);
        }

        Action::Help => print!("{}", args::USAGE),
    }

    Ok(())
}

fn product_from(fields: ProductArgs) -> Product {
    Product::new(fields.name, fields.price).with_observations(fields.observations)
}

fn invoice_from(fields: InvoiceArgs) -> Invoice {
    let items = fields.products.into_iter().map(InvoiceItem::new).collect();
    Invoice::new(InvoiceHeader::new(fields.client), items)
}
