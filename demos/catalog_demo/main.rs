//! Catalog walkthrough
//!
//! This example demonstrates:
//! - Loading the catalog configuration from YAML
//! - Debounced filter edits and sort toggles
//! - Creating, updating and optimistically deleting toys
//! - Dashboard aggregates, the branch directory and the chat bot
//!
//! Run with `cargo run --example catalog_demo [config.yaml]`.
//! Set `RUST_LOG=mister_toy=debug` to follow the engine.

use mister_toy::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "demos/catalog_demo/catalog.yaml";

fn print_toys(title: &str, toys: &[Toy]) {
    println!("{}", title);
    for toy in toys {
        let labels: Vec<&str> = toy.labels.iter().map(Label::as_str).collect();
        println!(
            "   - {:<32} ${:>6.0}  {:<12} [{}]",
            toy.name,
            toy.price.unwrap_or(0.0),
            if toy.in_stock { "in stock" } else { "sold out" },
            labels.join(", ")
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧸 Mister Toy Catalog Demo");
    println!("==========================\n");

    // Load configuration
    let path = std::env::args().nth(1);
    let config = match path.as_deref() {
        Some(path) => CatalogConfig::from_yaml_file(path)?,
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => {
            CatalogConfig::from_yaml_file(DEFAULT_CONFIG)?
        }
        None => CatalogConfig::default(),
    };
    println!("✅ Backend: {:?}\n", config.backend);

    // Wire the engine
    let notifications = NotificationBus::default();
    let mut inbox = notifications.subscribe();
    tokio::spawn(async move {
        while let Ok(note) = inbox.recv().await {
            let marker = if note.is_error() { "❌" } else { "🔔" };
            println!("{} {}", marker, note.message);
        }
    });

    let catalog = CatalogService::new(config.build_store()?);
    let engine = Arc::new(CatalogEngine::new(catalog).with_notifications(notifications));
    engine.dispatch(Command::Reload).await?;
    print_toys("📋 All toys (by name):", &engine.toys());

    // Sorting
    engine.dispatch(Command::ToggleSort(SortBy::Price)).await?;
    engine.dispatch(Command::ToggleSort(SortBy::Price)).await?;
    print_toys("💰 Most expensive first:", &engine.toys());

    // Debounced filter edits: only the last one reaches the store
    let editor = FilterEditor::spawn(Arc::clone(&engine), config.filter_debounce());
    for txt in ["l", "lo", "lor"] {
        editor.update(|filter| filter.txt = txt.to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    editor.update(|filter| filter.in_stock = Some(true));
    tokio::time::sleep(config.filter_debounce() + Duration::from_millis(config.local.latency_ms * 2))
        .await;
    print_toys("🔎 In stock, name matching \"lor\":", &engine.toys());

    // Back to the full list
    editor.edit(CatalogService::default_filter());
    tokio::time::sleep(config.filter_debounce() + Duration::from_millis(config.local.latency_ms * 2))
        .await;

    // Create and update
    let draft = Toy {
        labels: [Label::Outdoor, Label::OnWheels].into_iter().collect(),
        ..Toy::new("Rocket Scooter", 240.0)
    };
    if let Outcome::Saved(mut created) = engine.dispatch(Command::SaveToy(draft)).await? {
        created.price = Some(199.0);
        engine.dispatch(Command::SaveToy(created)).await?;
    }

    // Invalid input is rejected before it reaches the store
    if let Err(err) = engine.save_toy(Toy::new("X", 0.0)).await {
        println!("   validation: {}\n", err);
    }

    // Optimistic delete
    if let Some(id) = engine.toys().first().and_then(|toy| toy.id.clone()) {
        engine.dispatch(Command::DeleteToy(id)).await?;
    }

    // Dashboard
    let stats = DashboardStats::from_toys(&engine.toys());
    println!("\n📊 Dashboard");
    println!("   {} toys, {} in stock, {} sold out", stats.total, stats.in_stock, stats.out_of_stock);
    for stat in &stats.labels {
        println!(
            "   {:<16} {:>2} toys, avg ${:.0}",
            stat.label.as_str(),
            stat.count,
            stat.average_price
        );
    }
    for bucket in &stats.price_buckets {
        println!("   {:<10} {}", bucket.range, bucket.count);
    }

    // Branches
    println!("\n📍 Branches");
    for branch in Branch::all() {
        println!("   {} ({:.4}, {:.4}) {}", branch.name, branch.lat, branch.lng, branch.address);
    }

    // Chat
    let chat = ChatSession::new(config.chat_reply_delay());
    chat.send("Do you have kites?");
    tokio::time::sleep(config.chat_reply_delay() + Duration::from_millis(50)).await;
    println!("\n💬 Chat");
    for message in chat.messages() {
        println!("   {:?}: {}", message.by, message.txt);
    }

    drop(editor);
    println!("\n👋 Done");
    Ok(())
}
