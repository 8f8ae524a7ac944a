//! Roasterz Admin CLI
//!
//! Command-line dashboard for the Roasterz backend:
//! - Save or clear the admin token
//! - List categories, items and orders
//! - Add categories and items (with image upload)
//! - Move orders between fulfilment states

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use roasterz_admin::config::generate_default_config;
use roasterz_admin::{
    ApiClient, Category, CategoryForm, Config, Dashboard, FileStore, Item, LoggingConfig, Order,
    OrderStatus, Session, Summary,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roasterz-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Catalog and order administration for the Roasterz backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the saved admin token
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },

    /// Show categories, items, orders and a status summary
    Dashboard,

    /// List or add categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// List or add items
    Items {
        #[command(subcommand)]
        action: ItemCommand,
    },

    /// List orders or change their status
    Orders {
        #[command(subcommand)]
        action: OrderCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Save a token for later runs
    Set { token: String },
    /// Remove the saved token
    Clear,
    /// Report whether a token is saved
    Show,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    List,
    Add {
        #[arg(long, default_value = "")]
        name: String,
        /// Icon URL
        #[arg(long, default_value = "")]
        icon: String,
    },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    List,
    /// Add an item. Price, quantity, discount and type default to the
    /// `[catalog]` config values.
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        discount: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum OrderCommand {
    List,
    /// Set an order's status ("Printing and Packing", "ready-to-ship",
    /// "delivered", or any other value the backend accepts)
    SetStatus { order_id: String, status: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_logging(&config.logging);

    let json = cli.format == "json";
    let store = FileStore::new(config.storage.data_dir());

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::Token { action } => run_token(action, Session::new(store))?,

        Commands::Dashboard => {
            let dashboard = open_dashboard(&config, store).await?;
            let state = dashboard.snapshot().await;
            if json {
                let value = serde_json::json!({
                    "categories": state.categories,
                    "items": state.items,
                    "orders": state.orders,
                    "summary": state.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_categories(&state.categories);
                println!();
                print_items(&state.items);
                println!();
                print_orders(&state.orders, &config.api.storefront_url);
                println!();
                print_summary(&state.summary());
            }
        }

        Commands::Categories { action } => {
            let dashboard = open_dashboard(&config, store).await?;
            match action {
                CategoryCommand::List => {
                    let categories = dashboard.categories().await;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&categories)?);
                    } else {
                        print_categories(&categories);
                    }
                }
                CategoryCommand::Add { name, icon } => {
                    dashboard
                        .update_category_form(|form| *form = CategoryForm::new(name, icon))
                        .await;
                    let Some(ack) = dashboard.add_category().await else {
                        bail!("Failed to add category (see log for details)");
                    };
                    println!("{}", ack.message);
                }
            }
        }

        Commands::Items { action } => {
            let dashboard = open_dashboard(&config, store).await?;
            match action {
                ItemCommand::List => {
                    let items = dashboard.items().await;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    } else {
                        print_items(&items);
                    }
                }
                ItemCommand::Add {
                    name,
                    description,
                    price,
                    quantity,
                    discount,
                    kind,
                    image,
                } => {
                    dashboard
                        .update_item_form(|form| {
                            form.name = name;
                            form.description = description;
                            if let Some(price) = price {
                                form.price = price;
                            }
                            if let Some(quantity) = quantity {
                                form.quantity = quantity;
                            }
                            if let Some(discount) = discount {
                                form.discount = discount;
                            }
                            if let Some(kind) = kind {
                                form.kind = kind;
                            }
                            form.image = image;
                        })
                        .await;
                    let Some(ack) = dashboard.add_item().await else {
                        bail!("Failed to add item (see log for details)");
                    };
                    println!("{}", ack.message);
                }
            }
        }

        Commands::Orders { action } => {
            let dashboard = open_dashboard(&config, store).await?;
            match action {
                OrderCommand::List => {
                    let orders = dashboard.orders().await;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&orders)?);
                    } else {
                        print_orders(&orders, &config.api.storefront_url);
                    }
                }
                OrderCommand::SetStatus { order_id, status } => {
                    let status: OrderStatus = status.parse().context("invalid status")?;
                    if !status.is_known() {
                        let known: Vec<&str> =
                            OrderStatus::KNOWN.iter().map(OrderStatus::as_str).collect();
                        tracing::warn!(
                            status = %status,
                            known = %known.join(", "),
                            "Status is not one of the named states"
                        );
                    }
                    let Some(ack) = dashboard.edit_order_status(&order_id, status).await else {
                        bail!("Failed to update order {} (see log for details)", order_id);
                    };
                    println!("{}", ack.message);
                }
            }
        }
    }

    Ok(())
}

/// Build the dashboard and restore the saved token, fetching all collections
async fn open_dashboard(
    config: &Config,
    store: FileStore,
) -> anyhow::Result<Dashboard<ApiClient, FileStore>> {
    let client = ApiClient::new(config.api.client_config())?;
    let dashboard = Dashboard::new(client, store, config.dashboard_config());

    if !dashboard.start().await? {
        bail!("No auth token saved. Run `roasterz-admin token set <TOKEN>` first.");
    }
    Ok(dashboard)
}

fn run_token(action: TokenCommand, mut session: Session<FileStore>) -> anyhow::Result<()> {
    match action {
        TokenCommand::Set { token } => {
            session.set(token);
            if session.save()? {
                println!("Token saved to {:?}", session.store().path());
            } else {
                bail!("Token is empty, nothing saved");
            }
        }
        TokenCommand::Clear => {
            session.clear()?;
            println!("Token removed from {:?}", session.store().path());
        }
        TokenCommand::Show => match session.load()? {
            Some(_) => println!("A token is saved in {:?}", session.store().path()),
            None => println!("No token saved"),
        },
    }
    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roasterz_admin={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_categories(categories: &[Category]) {
    println!("Categories ({})", categories.len());
    if categories.is_empty() {
        println!("  (none)");
        return;
    }

    println!("  {:<26} {:<24} {}", "ID", "Name", "Icon");
    println!("  {}", "-".repeat(70));
    for category in categories {
        println!(
            "  {:<26} {:<24} {}",
            category.id.as_deref().unwrap_or("-"),
            category.name,
            category.icon
        );
    }
}

fn print_items(items: &[Item]) {
    println!("Items ({})", items.len());
    if items.is_empty() {
        println!("  (none)");
        return;
    }

    println!(
        "  {:<26} {:<28} {:>8} {:>6} {:>6}  {}",
        "ID", "Name", "Price", "Qty", "Disc", "Type"
    );
    println!("  {}", "-".repeat(90));
    for item in items {
        println!(
            "  {:<26} {:<28} {:>8} {:>6} {:>6}  {}",
            item.id.as_deref().unwrap_or("-"),
            item.name,
            item.price,
            item.quantity,
            item.discount,
            item.kind
        );
    }
}

fn print_orders(orders: &[Order], storefront_url: &str) {
    println!("Orders ({})", orders.len());
    if orders.is_empty() {
        println!("  (none)");
        return;
    }

    for order in orders {
        let status = order
            .status
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let date = order
            .placed_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .or_else(|| order.date.clone())
            .unwrap_or_else(|| "-".to_string());

        println!("  Order {}  [{}]  {}", order.id, status, date);
        for line in &order.lines {
            let name = match &line.item {
                Some(item) => item.name().unwrap_or(item.id()),
                None => "(removed item)",
            };
            println!(
                "    - {:<28} {} x ${:.2}  {}",
                name,
                line.quantity,
                line.price_per_item,
                line.storefront_url(storefront_url).unwrap_or_default()
            );
        }
        println!("    total ${:.2}", order.total());
    }
}

fn print_summary(summary: &Summary) {
    println!("Summary");
    println!("  Categories: {}", summary.categories);
    println!("  Items:      {}", summary.items);
    println!("  Orders:     {}", summary.orders);
    for (status, count) in &summary.by_status {
        println!("    {:<22} {}", status, count);
    }
}
