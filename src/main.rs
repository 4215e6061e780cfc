//! POS Back Office console
//!
//! Command-line administration for a restaurant point-of-sale API:
//! token status, menu management, revenue analytics and CSV export.
//! Every command verifies the access token first and is gated on the
//! access modules the token carries.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pos_backoffice::core::catalog;
use pos_backoffice::core::export;
use pos_backoffice::models::{
    CategoryPatch, NewCategory, NewProduct, NewTopping, ProductPatch, ProductType, QtyMeasure,
    TaxGroup, ToppingPatch,
};
use pos_backoffice::utils::labels;
use pos_backoffice::{
    AccessModule, AdminConfig, AnalyticsReport, ApiClient, AppError, AuthClient,
    DiagnosticsClient, ErrorReport, MenuClient, OrderExport, OrdersClient, Period, TokenInfo,
};

#[derive(Parser)]
#[command(name = "pos-backoffice", version, about = "Back office console for the POS API")]
struct Cli {
    /// Access token, falls back to POS_API_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the token and show account status
    Status,
    /// Manage menu products
    Products {
        #[command(subcommand)]
        action: ProductCmd,
    },
    /// Manage menu categories and their product assignments
    Categories {
        #[command(subcommand)]
        action: CategoryCmd,
    },
    /// Manage product toppings
    Toppings {
        #[command(subcommand)]
        action: ToppingCmd,
    },
    /// Revenue report for a period
    Analytics {
        /// day, week, month or custom
        #[arg(long, default_value = "day")]
        period: String,
        /// Window start for a custom period (RFC3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Window end for a custom period (RFC3339)
        #[arg(long)]
        till: Option<DateTime<Utc>>,
    },
    /// Export order history as CSV
    Export {
        #[arg(long, default_value = "day")]
        period: String,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        till: Option<DateTime<Utc>>,
        /// Output directory for the report file
        #[arg(long, default_value = "./exports")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProductCmd {
    /// List products
    List {
        #[arg(long)]
        only_active: bool,
    },
    /// Show one product
    Show { id: i64 },
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        /// NORMAL, WATER_MARKED, DAIRY_MARKED, JUICE_MARKED or NOT_ALCOHOL_BEER_MARKED
        #[arg(long = "type", default_value = "NORMAL")]
        product_type: String,
        /// NO_VAT or VAT_18
        #[arg(long, default_value = "VAT_18")]
        tax: String,
        /// PIECES or GRAMS
        #[arg(long, default_value = "PIECES")]
        measure: String,
        /// Price per piece, or per gram for weight goods
        #[arg(long)]
        price: f64,
        #[arg(long)]
        qty_min: Option<u32>,
        #[arg(long)]
        qty_max: Option<u32>,
        #[arg(long)]
        qty_default: Option<u32>,
        /// Create as hidden from the menu
        #[arg(long)]
        inactive: bool,
    },
    /// Update product fields
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a product
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum CategoryCmd {
    /// List categories
    List,
    /// List products assigned to a category
    Products { id: i64 },
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        inactive: bool,
    },
    /// Update category fields
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a category
    Delete { id: i64 },
    /// Assign products to a category
    Assign {
        id: i64,
        /// Product ids to attach
        #[arg(required = true)]
        products: Vec<i64>,
    },
    /// Remove one product from a category
    Unassign {
        id: i64,
        #[arg(long)]
        product: i64,
    },
}

#[derive(Subcommand)]
enum ToppingCmd {
    /// List toppings
    List {
        #[arg(long)]
        product_id: Option<i64>,
        #[arg(long)]
        only_active: bool,
    },
    /// Create a topping for a product
    Create {
        #[arg(long)]
        product_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        qty_min: Option<u32>,
        #[arg(long)]
        qty_max: Option<u32>,
        #[arg(long)]
        qty_default: Option<u32>,
        #[arg(long)]
        inactive: bool,
    },
    /// Update topping fields
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a topping
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = AdminConfig::default();
    if let Some(token) = cli.token.clone() {
        config = config.with_token(token);
    }

    let api = ApiClient::new(config);
    let auth = AuthClient::new(api.clone());
    let diagnostics = DiagnosticsClient::new(api.clone());

    let result = run(&cli.command, &api, &auth).await;

    if let Err(e) = &result {
        eprintln!("❌ {}", e);
        if e.code == pos_backoffice::ErrorCode::AuthInvalidToken {
            eprintln!("   Set a valid token via --token or POS_API_TOKEN");
        } else {
            // Surface the failure on the server side as well
            diagnostics
                .report(ErrorReport::new(e.to_string(), format!("{:?}", e)))
                .await;
        }
        // Give queued reports one more chance before the process dies
        if diagnostics.pending_count() > 0 {
            diagnostics.replay_pending().await;
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: &Commands, api: &ApiClient, auth: &AuthClient) -> Result<(), AppError> {
    let token_info = auth.verify_token().await?;

    match command {
        Commands::Status => status(api, auth, &token_info).await,
        Commands::Products { action } => {
            let menu = MenuClient::new(api.clone());
            run_product_cmd(action, &menu, &token_info).await
        }
        Commands::Categories { action } => {
            let menu = MenuClient::new(api.clone());
            run_category_cmd(action, &menu, &token_info).await
        }
        Commands::Toppings { action } => {
            let menu = MenuClient::new(api.clone());
            run_topping_cmd(action, &menu, &token_info).await
        }
        Commands::Analytics { period, from, till } => {
            require_analytics(&token_info)?;
            let period = parse_period(period, *from, *till)?;
            analytics(api, period).await
        }
        Commands::Export {
            period,
            from,
            till,
            out_dir,
        } => {
            require_analytics(&token_info)?;
            let period = parse_period(period, *from, *till)?;
            export_orders(api, period, out_dir).await
        }
    }
}

// ============================================
// Access gating
// ============================================

fn require_menu_view(token: &TokenInfo) -> Result<(), AppError> {
    if token.can_view_menu() {
        Ok(())
    } else {
        Err(AppError::missing_module(AccessModule::MenuRead.as_str()))
    }
}

fn require_menu_edit(token: &TokenInfo) -> Result<(), AppError> {
    if token.can_edit_menu() {
        Ok(())
    } else {
        Err(AppError::missing_module(AccessModule::MenuWrite.as_str()))
    }
}

fn require_analytics(token: &TokenInfo) -> Result<(), AppError> {
    if token.can_view_analytics() {
        Ok(())
    } else {
        Err(AppError::missing_module(AccessModule::OrderRead.as_str()))
    }
}

// ============================================
// Argument parsing helpers
// ============================================

fn parse_period(
    name: &str,
    from: Option<DateTime<Utc>>,
    till: Option<DateTime<Utc>>,
) -> Result<Period, AppError> {
    match name {
        "day" => Ok(Period::Day),
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "custom" => match (from, till) {
            (Some(from), Some(till)) => Ok(Period::Custom { from, till }),
            _ => Err(AppError::bad_window(
                "Custom period needs both --from and --till",
            )),
        },
        other => Err(AppError::bad_window(format!(
            "Unknown period '{}', expected day, week, month or custom",
            other
        ))),
    }
}

/// Parse a wire-format enum value (e.g. "WATER_MARKED") from a CLI flag
fn parse_wire<T: serde::de::DeserializeOwned>(kind: &str, raw: &str) -> Result<T, AppError> {
    let normalized = raw.trim().to_uppercase();
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| AppError::bad_request(format!("Unknown {} '{}'", kind, raw)))
}

// ============================================
// Commands
// ============================================

async fn status(api: &ApiClient, auth: &AuthClient, token: &TokenInfo) -> Result<(), AppError> {
    let point = auth.client_point().await?;
    let subscription = auth.subscription_days().await;

    println!("🏠 {}", point.name);
    if let Some(address) = &point.address {
        println!("   {}", address);
    }
    println!(
        "🔑 Modules: {}",
        token
            .access_modules
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if subscription.is_active() {
        println!("📅 Subscription: {} days left", subscription.days);
    } else {
        println!("📅 Subscription: inactive");
    }

    if token.can_view_analytics() {
        let orders = OrdersClient::new(api.clone()).completed_today().await?;
        let revenue: f64 = orders.iter().map(|o| o.total_amount).sum();
        println!("🧾 Today: {} orders, {:.0} ₽", orders.len(), revenue);
    }
    Ok(())
}

async fn run_product_cmd(
    cmd: &ProductCmd,
    menu: &MenuClient,
    token: &TokenInfo,
) -> Result<(), AppError> {
    match cmd {
        ProductCmd::List { only_active } => {
            require_menu_view(token)?;
            let products = menu.products(*only_active).await?;
            println!("📊 {} products", products.len());
            for p in &products {
                print_product(p);
            }
        }
        ProductCmd::Show { id } => {
            require_menu_view(token)?;
            print_product(&menu.product(*id).await?);
        }
        ProductCmd::Create {
            name,
            product_type,
            tax,
            measure,
            price,
            qty_min,
            qty_max,
            qty_default,
            inactive,
        } => {
            require_menu_edit(token)?;
            let product_type: ProductType = parse_wire("product type", product_type)?;
            let tax: TaxGroup = parse_wire("tax group", tax)?;
            let measure: QtyMeasure = parse_wire("measure", measure)?;
            let defaults = catalog::product_qty_defaults(product_type, measure);

            let new = NewProduct {
                name: name.clone(),
                product_type,
                tax,
                qty_measure: measure,
                qty_min: qty_min.unwrap_or(defaults.qty_min),
                qty_max: qty_max.unwrap_or(defaults.qty_max),
                qty_default: qty_default.unwrap_or(defaults.qty_default),
                unit_price: *price,
                is_active: !inactive,
            };
            let created = menu.create_product(&new).await?;
            println!("✅ Created product [{}] {}", created.product_id, created.name);
        }
        ProductCmd::Update {
            id,
            name,
            price,
            active,
        } => {
            require_menu_edit(token)?;
            let patch = ProductPatch {
                name: name.clone(),
                unit_price: *price,
                is_active: *active,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(AppError::bad_request("Nothing to update"));
            }
            let updated = menu.update_product(*id, &patch).await?;
            print_product(&updated);
        }
        ProductCmd::Delete { id } => {
            require_menu_edit(token)?;
            menu.delete_product(*id).await?;
            println!("🗑️ Product {} deleted", id);
        }
    }
    Ok(())
}

async fn run_category_cmd(
    cmd: &CategoryCmd,
    menu: &MenuClient,
    token: &TokenInfo,
) -> Result<(), AppError> {
    match cmd {
        CategoryCmd::List => {
            require_menu_view(token)?;
            let categories = menu.categories().await?;
            println!("📊 {} categories", categories.len());
            for c in &categories {
                println!(
                    "  [{}] {} | active: {}",
                    c.menu_category_id,
                    c.name,
                    labels::yes_no(c.is_active),
                );
            }
        }
        CategoryCmd::Products { id } => {
            require_menu_view(token)?;
            let products = menu.category_products(*id).await?;
            println!("📊 {} products in category {}", products.len(), id);
            for p in &products {
                print_product(p);
            }
        }
        CategoryCmd::Create { name, inactive } => {
            require_menu_edit(token)?;
            let created = menu
                .create_category(&NewCategory {
                    name: name.clone(),
                    is_active: !inactive,
                })
                .await?;
            println!("✅ Created category [{}] {}", created.menu_category_id, created.name);
        }
        CategoryCmd::Update { id, name, active } => {
            require_menu_edit(token)?;
            let patch = CategoryPatch {
                name: name.clone(),
                is_active: *active,
            };
            let updated = menu.update_category(*id, &patch).await?;
            println!(
                "✅ Category [{}] {} | active: {}",
                updated.menu_category_id,
                updated.name,
                labels::yes_no(updated.is_active),
            );
        }
        CategoryCmd::Delete { id } => {
            require_menu_edit(token)?;
            menu.delete_category(*id).await?;
            println!("🗑️ Category {} deleted", id);
        }
        CategoryCmd::Assign { id, products } => {
            require_menu_edit(token)?;
            let assigned = menu.assign_products(*id, products).await?;
            println!("✅ Category {} now holds {} products", id, assigned.len());
        }
        CategoryCmd::Unassign { id, product } => {
            require_menu_edit(token)?;
            menu.unassign_product(*id, *product).await?;
            println!("🗑️ Product {} removed from category {}", product, id);
        }
    }
    Ok(())
}

async fn run_topping_cmd(
    cmd: &ToppingCmd,
    menu: &MenuClient,
    token: &TokenInfo,
) -> Result<(), AppError> {
    match cmd {
        ToppingCmd::List {
            product_id,
            only_active,
        } => {
            require_menu_view(token)?;
            let toppings = menu.toppings(*product_id, *only_active).await?;
            println!("📊 {} toppings", toppings.len());
            for t in &toppings {
                println!(
                    "  [{}] {} | for: {} | {} | active: {}",
                    t.product_topping_id,
                    t.name,
                    t.product_name.as_deref().unwrap_or("-"),
                    labels::format_price(t.unit_price, t.qty_measure),
                    labels::yes_no(t.is_active),
                );
            }
        }
        ToppingCmd::Create {
            product_id,
            name,
            price,
            qty_min,
            qty_max,
            qty_default,
            inactive,
        } => {
            require_menu_edit(token)?;
            let defaults = catalog::topping_qty_defaults();
            let new = NewTopping {
                product_id: *product_id,
                name: name.clone(),
                qty_measure: QtyMeasure::Pieces,
                qty_min: qty_min.unwrap_or(defaults.qty_min),
                qty_max: qty_max.unwrap_or(defaults.qty_max),
                qty_default: qty_default.unwrap_or(defaults.qty_default),
                unit_price: *price,
                is_active: !inactive,
            };
            let created = menu.create_topping(&new).await?;
            println!("✅ Created topping [{}] {}", created.product_topping_id, created.name);
        }
        ToppingCmd::Update {
            id,
            name,
            price,
            active,
        } => {
            require_menu_edit(token)?;
            let patch = ToppingPatch {
                name: name.clone(),
                unit_price: *price,
                is_active: *active,
                ..Default::default()
            };
            let updated = menu.update_topping(*id, &patch).await?;
            println!(
                "✅ Topping [{}] {} | {}",
                updated.product_topping_id,
                updated.name,
                labels::format_price(updated.unit_price, updated.qty_measure),
            );
        }
        ToppingCmd::Delete { id } => {
            require_menu_edit(token)?;
            menu.delete_topping(*id).await?;
            println!("🗑️ Topping {} deleted", id);
        }
    }
    Ok(())
}

fn print_product(p: &pos_backoffice::Product) {
    println!(
        "  [{}] {} | {} | {} | {} | {} | active: {}",
        p.product_id,
        p.name,
        labels::product_type_text(p.product_type),
        labels::tax_text(p.tax),
        labels::measure_text(p.qty_measure),
        labels::format_price(p.unit_price, p.qty_measure),
        labels::yes_no(p.is_active),
    );
}

async fn analytics(api: &ApiClient, period: Period) -> Result<(), AppError> {
    let orders_client = OrdersClient::new(api.clone());
    let (window, orders) = orders_client.completed_for_period(period).await?;

    let mut items = Vec::new();
    for per_order in orders_client.items_for(&orders).await? {
        items.extend(per_order);
    }

    let report = AnalyticsReport::build(period, window, &orders, &items);
    println!("{}", report.summary());
    Ok(())
}

async fn export_orders(api: &ApiClient, period: Period, out_dir: &PathBuf) -> Result<(), AppError> {
    let orders_client = OrdersClient::new(api.clone());
    let (window, orders) = orders_client.completed_for_period(period).await?;

    let item_lists = orders_client.items_for(&orders).await?;
    let exports: Vec<OrderExport> = orders
        .into_iter()
        .zip(item_lists)
        .map(|(order, items)| OrderExport { order, items })
        .collect();

    let rows = export::build_report_rows(period.text(), Utc::now(), &exports);
    let csv = export::rows_to_csv(&rows);
    let filename = export::export_filename(period.text(), &window);
    let path = export::write_csv(out_dir, &filename, &csv)?;

    println!("💾 Report written to {}", path.display());
    Ok(())
}
