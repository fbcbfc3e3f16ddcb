//! Pickup kiosk command line
//!
//! A line-oriented front end for the kiosk core. Reads commands from stdin
//! and prints the projected view after each one.
//!
//! # Usage
//!
//! ```bash
//! KIOSK_BACKEND_URL=http://localhost:5000 cargo run --bin kiosk
//! ```

use pickup_core::SystemClock;
use pickup_backend::HttpBackend;
use pickup_kiosk::history::RecentOrders;
use pickup_kiosk::types::{CustomerInput, NoticeLevel};
use pickup_kiosk::{
    bootstrap, build_store, next_tick_notices, FileRepository, KioskAction, KioskConfig, KioskEnvironment, KioskStore,
    KioskView,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  products                          refresh and list products
  add <id>                          add one unit to the cart
  inc <id> | dec <id>               change a cart line by one
  cart                              show the cart
  checkout <phone> <room> <name..>  reserve the cart for pickup
  cancel                            cancel the active reservation
  status                            show the reservation
  orders                            show recent orders
  fav <id>                          toggle a favorite
  theme                             toggle dark mode
  help                              show this help
  quit                              leave";

/// A parsed command line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Products,
    Add(u64),
    Change(u64, i32),
    Cart,
    Checkout(CustomerInput),
    Cancel,
    Status,
    Orders,
    Favorite(u64),
    Theme,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let product_id = |word: Option<&str>| {
        word.and_then(|word| word.parse::<u64>().ok())
            .ok_or_else(|| format!("usage: {command} <product id>"))
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "products" => Command::Products,
        "add" => Command::Add(product_id(words.next())?),
        "inc" => Command::Change(product_id(words.next())?, 1),
        "dec" => Command::Change(product_id(words.next())?, -1),
        "cart" => Command::Cart,
        "checkout" => {
            let phone = words.next().unwrap_or_default().to_string();
            let room = words.next().unwrap_or_default().to_string();
            let name = words.collect::<Vec<_>>().join(" ");
            Command::Checkout(CustomerInput::new(name, phone, room))
        },
        "cancel" => Command::Cancel,
        "status" => Command::Status,
        "orders" => Command::Orders,
        "fav" => Command::Favorite(product_id(words.next())?),
        "theme" => Command::Theme,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = KioskConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| "pickup_kiosk=info,pickup_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = config.settings()?;
    info!(
        backend = %config.backend_url,
        data_dir = %config.data_dir.display(),
        hold_minutes = config.hold_minutes,
        "Configuration loaded"
    );

    let backend = Arc::new(HttpBackend::new(config.backend_url.clone(), config.request_timeout())?);
    let repository = Arc::new(FileRepository::new(config.data_dir.clone())?);
    let env = KioskEnvironment::new(Arc::new(SystemClock), backend, repository).with_settings(settings);
    let store = build_store(env);

    let settle = config.request_timeout() + Duration::from_secs(1);
    if let Err(error) = bootstrap(&store, settle).await {
        warn!(%error, "Startup did not settle, continuing with local state");
    }

    spawn_notice_watcher(&store);

    println!("{HELP}");
    render_products(&project(&store).await);
    flush_notices(&store).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            },
        };

        match command {
            Command::Products => {
                dispatch(&store, KioskAction::RefreshCatalog, settle).await?;
                render_products(&project(&store).await);
            },
            Command::Add(product_id) => {
                dispatch(&store, KioskAction::AddToCart { product_id }, settle).await?;
                render_cart(&project(&store).await);
            },
            Command::Change(product_id, delta) => {
                dispatch(&store, KioskAction::ChangeQuantity { product_id, delta }, settle).await?;
                render_cart(&project(&store).await);
            },
            Command::Cart => render_cart(&project(&store).await),
            Command::Checkout(customer) => {
                dispatch(&store, KioskAction::CreateReservation { customer }, settle).await?;
                render_status(&project(&store).await);
            },
            Command::Cancel => {
                prompt("Cancel your reservation? [y/N] ").await?;
                let answer = lines.next_line().await?.unwrap_or_default();
                let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                dispatch(&store, KioskAction::CancelReservation { confirmed }, settle).await?;
                render_status(&project(&store).await);
            },
            Command::Status => render_status(&project(&store).await),
            Command::Orders => {
                dispatch(&store, KioskAction::LoadRecentOrders, settle).await?;
                render_orders(&project(&store).await);
            },
            Command::Favorite(product_id) => {
                dispatch(&store, KioskAction::ToggleFavorite { product_id }, settle).await?;
            },
            Command::Theme => {
                dispatch(&store, KioskAction::ToggleTheme, settle).await?;
                let mode = if project(&store).await.dark_mode { "dark" } else { "light" };
                println!("Theme: {mode}");
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
        flush_notices(&store).await?;
    }

    info!("Shutting down");
    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}

async fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

async fn dispatch(store: &KioskStore, action: KioskAction, settle: Duration) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    if let Err(error) = handle.wait_with_timeout(settle).await {
        warn!(%error, "Request still pending");
    }
    Ok(())
}

async fn project(store: &KioskStore) -> KioskView {
    let now = store.environment().clock.now();
    store.state(|state| KioskView::project(state, now)).await
}

async fn flush_notices(store: &KioskStore) -> anyhow::Result<()> {
    let view = project(store).await;
    if view.notices.is_empty() {
        return Ok(());
    }
    for notice in &view.notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => " ok ",
            NoticeLevel::Error => "fail",
        };
        println!("[{tag}] {}", notice.message);
    }
    store.send(KioskAction::ClearNotices).await?;
    Ok(())
}

/// Prints notices raised by the countdown between commands
fn spawn_notice_watcher(store: &KioskStore) {
    let store = store.clone();
    let mut actions = store.subscribe_actions();
    tokio::spawn(async move {
        while next_tick_notices(&store, &mut actions).await.is_some() {
            if flush_notices(&store).await.is_err() {
                break;
            }
        }
    });
}

fn render_products(view: &KioskView) {
    if view.products.is_empty() {
        println!("No products available");
        return;
    }
    if view.catalog_stale {
        println!("(showing saved catalog)");
    }
    for row in &view.products {
        let star = if row.favorite { "*" } else { " " };
        let stock = if row.stock == 0 { "out of stock".to_string() } else { format!("{} left", row.stock) };
        let in_cart = if row.in_cart > 0 { format!("  [{} in cart]", row.in_cart) } else { String::new() };
        println!("{star}{:>4}  {:<28} {:>8.2}  {stock}{in_cart}", row.id, row.name, row.price);
    }
}

fn render_cart(view: &KioskView) {
    if view.cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in &view.cart {
        println!("{:>4}  {:<28} {:>3} x {:>8.2} = {:>8.2}", line.product_id, line.name, line.qty, line.price, line.subtotal());
    }
    println!("{} items, total {:.2}", view.cart_count, view.cart_total);
}

fn render_status(view: &KioskView) {
    if let Some(reservation) = &view.reservation {
        println!(
            "Order {} for {} (room {}): {:.2}, pick up within {}",
            reservation.order_id, reservation.customer_name, reservation.room, reservation.total, reservation.countdown
        );
        for item in &reservation.items {
            println!("  {} x {}", item.qty, item.name);
        }
    } else if view.creating {
        println!("Placing order...");
    } else if view.verifying {
        println!("Checking saved reservation...");
    } else {
        println!("No active reservation");
    }
}

fn render_orders(view: &KioskView) {
    match &view.recent_orders {
        RecentOrders::NotLoaded => println!("Recent orders not loaded"),
        RecentOrders::Remote(orders) if orders.is_empty() => println!("No recent orders"),
        RecentOrders::Remote(orders) => {
            for order in orders {
                println!("{}  {:?}  {:.2}", order.order_id, order.status, order.total_amount);
            }
        },
        RecentOrders::Local(sales) if sales.is_empty() => println!("No recent orders"),
        RecentOrders::Local(sales) => {
            for sale in sales {
                println!("{}  {} lines  {:.2}", sale.time.format("%Y-%m-%d %H:%M"), sale.items.len(), sale.total);
            }
        },
    }
}
