//! Command line parsing.
//!
//! ```text
//! tally <ACTION> [OPTIONS]
//!
//! migrate                       create every table if missing
//! create                        insert a product
//! get-all                       list products
//! get-one <ID>                  show one product
//! update <ID>                   overwrite a product
//! delete <ID>                   remove a product
//! transaction                   insert an invoice header + items atomically
//! ```

use anyhow::{anyhow, bail, Context, Result};
use tally_core::RecordId;

pub const USAGE: &str = "\
Tally - products and invoices over MySQL or PostgreSQL

Usage: tally <ACTION> [OPTIONS]

Actions:
  migrate                Create the tables if they do not exist
  create                 Insert a product
  get-all                List every product
  get-one <ID>           Show one product
  update <ID>            Overwrite a product
  delete <ID>            Delete a product
  transaction            Insert an invoice header and its items atomically

Product options (create, update):
  -n, --name <NAME>              default: Java Course
  -p, --price <PRICE>            default: 56
  -o, --observations <TEXT>      default: On fire

Invoice options (transaction):
  -c, --client <NAME>            default: Ignacio
  --product <ID>                 repeatable, default: 2 and 3

Environment:
  DB_DRIVER=MYSQL|POSTGRES plus <DRIVER>_HOST/_PORT/_USER/_PASSWORD/_DB
  RUST_LOG controls log output (default: info)
";

/// Product fields taken from flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductArgs {
    pub name: String,
    pub price: i32,
    pub observations: String,
}

impl Default for ProductArgs {
    fn default() -> Self {
        ProductArgs {
            name: "Java Course".to_string(),
            price: 56,
            observations: "On fire".to_string(),
        }
    }
}

/// Invoice fields taken from flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceArgs {
    pub client: String,
    pub products: Vec<RecordId>,
}

impl Default for InvoiceArgs {
    fn default() -> Self {
        InvoiceArgs {
            client: "Ignacio".to_string(),
            products: vec![2, 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Migrate,
    Create(ProductArgs),
    GetAll,
    GetOne(RecordId),
    Update(RecordId, ProductArgs),
    Delete(RecordId),
    Transaction(InvoiceArgs),
    Help,
}

/// Parses everything after the program name.
pub fn parse(args: &[String]) -> Result<Action> {
    let Some(action) = args.first() else {
        return Ok(Action::Help);
    };
    let rest = &args[1..];

    match action.as_str() {
        "migrate" => Ok(Action::Migrate),
        "create" => Ok(Action::Create(product_args(rest)?)),
        "get-all" => Ok(Action::GetAll),
        "get-one" => Ok(Action::GetOne(id_arg(rest)?)),
        "update" => Ok(Action::Update(id_arg(rest)?, product_args(&rest[1..])?)),
        "delete" => Ok(Action::Delete(id_arg(rest)?)),
        "transaction" => Ok(Action::Transaction(invoice_args(rest)?)),
        "--help" | "-h" | "help" => Ok(Action::Help),
        other => bail!("unknown action {other:?}, run `tally --help`"),
    }
}

fn id_arg(rest: &[String]) -> Result<RecordId> {
    let raw = rest.first().ok_or_else(|| anyhow!("missing <ID>"))?;
    raw.parse()
        .with_context(|| format!("invalid id {raw:?}"))
}

fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", args[i]))
}

fn product_args(args: &[String]) -> Result<ProductArgs> {
    let mut product = ProductArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" | "-n" => {
                product.name = flag_value(args, i)?.to_string();
                i += 1;
            }
            "--price" | "-p" => {
                let raw = flag_value(args, i)?;
                product.price = raw
                    .parse()
                    .with_context(|| format!("invalid price {raw:?}"))?;
                i += 1;
            }
            "--observations" | "-o" => {
                product.observations = flag_value(args, i)?.to_string();
                i += 1;
            }
            other => bail!("unexpected argument {other:?}"),
        }
        i += 1;
    }

    Ok(product)
}

fn invoice_args(args: &[String]) -> Result<InvoiceArgs> {
    let mut invoice = InvoiceArgs::default();
    let mut products = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--client" | "-c" => {
                invoice.client = flag_value(args, i)?.to_string();
                i += 1;
            }
            "--product" => {
                let raw = flag_value(args, i)?;
                products.push(
                    raw.parse()
                        .with_context(|| format!("invalid product id {raw:?}"))?,
                );
                i += 1;
            }
            other => bail!("unexpected argument {other:?}"),
        }
        i += 1;
    }

    if !products.is_empty() {
        invoice.products = products;
    }
    Ok(invoice)
}
