use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, past_orders::TABLE_HEADERS, CartEvent, CartStore,
    HttpPizzaApi, OrderError, OrderPhase, OrderScreen, PageStatus, PastOrders, PizzaApi,
    ReadyOrder, Settings,
};
use shared::domain::{PizzaId, PizzaSize};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Order pizzas and browse past orders")]
struct Args {
    /// Overrides the configured API base URL.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the menu with prices per size.
    Menu,
    /// Add pizzas to the cart and optionally check out.
    Order {
        #[arg(long)]
        pizza: String,
        #[arg(long, default_value = "M")]
        size: PizzaSize,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long)]
        checkout: bool,
    },
    /// Show one page of past orders.
    Past {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings =
        load_settings(args.server_url.as_deref()).context("failed to load client settings")?;
    tracing::debug!(
        api_base_url = %settings.api_base_url,
        checkout_policy = ?settings.checkout_policy,
        "pizza_cli: settings loaded"
    );
    let api: Arc<dyn PizzaApi> = Arc::new(HttpPizzaApi::new(settings.api_base_url.clone()));

    match args.command {
        Command::Menu => show_menu(api, &settings).await,
        Command::Order {
            pizza,
            size,
            count,
            checkout,
        } => place_order(api, &settings, PizzaId::new(pizza), size, count, checkout).await,
        Command::Past { page } => show_past_orders(api, &settings, page).await,
    }
}

async fn open_order_screen(api: Arc<dyn PizzaApi>, settings: &Settings) -> Result<OrderScreen> {
    let mut screen =
        OrderScreen::new(api, CartStore::new()).with_checkout_policy(settings.checkout_policy);
    println!("Loading...");
    if screen.load_catalog().await.is_err() {
        if let OrderPhase::Failed(err) = screen.phase() {
            return Err(anyhow!(err.message().to_string()).context(err.summary()));
        }
    }
    Ok(screen)
}

async fn show_menu(api: Arc<dyn PizzaApi>, settings: &Settings) -> Result<()> {
    let screen = open_order_screen(api, settings).await?;
    let ready = screen.ready().ok_or(OrderError::NotReady)?;

    for pizza in ready.pizzas() {
        let prices: Vec<String> = PizzaSize::ALL
            .into_iter()
            .filter_map(|size| {
                pizza
                    .price_for(size)
                    .map(|price| format!("{} {}", size.label(), client_core::format_usd(price)))
            })
            .collect();
        println!("{:<12} {:<28} {}", pizza.id, pizza.name, prices.join("  "));
    }
    Ok(())
}

async fn place_order(
    api: Arc<dyn PizzaApi>,
    settings: &Settings,
    pizza: PizzaId,
    size: PizzaSize,
    count: u32,
    checkout: bool,
) -> Result<()> {
    let mut screen = open_order_screen(api, settings).await?;
    let mut cart_events = screen.cart().subscribe();

    screen.select_type(pizza);
    screen.select_size(size);
    if let Some(ready) = screen.ready() {
        print_selection(ready);
    }

    for _ in 0..count {
        screen.add_to_cart().await?;
    }
    print_cart_events(&mut cart_events);

    let cart = screen.cart().read().await;
    println!("Cart ({} items):", cart.len());
    for item in &cart {
        println!("  {} - {} - {}", item.pizza.name, item.size.label(), item.price);
    }

    if checkout {
        println!("Submitting order...");
        let result = screen.checkout().await;
        match result {
            Ok(()) => println!("Order placed."),
            Err(OrderError::Client(_)) => {
                if let Some(err) = screen.ready().and_then(|ready| ready.checkout_error()) {
                    eprintln!("{}", err.summary());
                }
            }
            Err(err) => return Err(err.into()),
        }
        print_cart_events(&mut cart_events);
    }
    Ok(())
}

fn print_selection(ready: ReadyOrder<'_>) {
    match ready.selected_pizza() {
        Some(pizza) => println!(
            "{} ({}) {}\n  {}",
            pizza.name,
            ready.selection().size.label(),
            ready.price(),
            pizza.description
        ),
        None => println!("'{}' is not on the menu", ready.selection().pizza_type),
    }
}

fn print_cart_events(events: &mut broadcast::Receiver<CartEvent>) {
    loop {
        match events.try_recv() {
            Ok(CartEvent::ItemAdded { position, item }) => {
                println!("+ #{} {} {}", position + 1, item.pizza.name, item.size)
            }
            Ok(CartEvent::Cleared { removed }) => println!("cart cleared ({removed} items)"),
            Err(TryRecvError::Lagged(skipped)) => println!("({skipped} cart updates skipped)"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn show_past_orders(api: Arc<dyn PizzaApi>, settings: &Settings, page: u32) -> Result<()> {
    let mut past = PastOrders::new(api)
        .with_page_size(settings.past_orders_page_size)
        .with_stale_after(settings.past_orders_stale_after);

    if let Err(err) = past.show_page(page).await {
        return match past.status() {
            PageStatus::Failed(shown) => Err(anyhow!(err.to_string()).context(shown.summary())),
            _ => Err(err.into()),
        };
    }

    println!(
        "{:<10} {:<12} {}",
        TABLE_HEADERS[0], TABLE_HEADERS[1], TABLE_HEADERS[2]
    );
    for row in past.rows().unwrap_or_default() {
        println!("{:<10} {:<12} {}", row.order_id, row.date, row.time);
    }

    let enabled = |on: bool| if on { "enabled" } else { "disabled" };
    println!(
        "page {} | previous {} | next {}",
        past.page(),
        enabled(past.has_previous()),
        enabled(past.has_next())
    );
    Ok(())
}
