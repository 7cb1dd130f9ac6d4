use std::env;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use aura_contracts::catalog::{search_products, Catalog, CatalogQuery, SortKey, CATEGORIES};
use aura_contracts::chat::Message;
use aura_contracts::events::EventWriter;
use aura_contracts::favorites::FavoritesSet;
use aura_contracts::sessions::{write_summary, SessionSummary};
use aura_engine::{
    load_photo, RemoteProvider, Sleeper, StudioProvider, StylistSession, SystemSleeper,
    TryOnProvider, TryOnWizard,
};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

const STYLIST_HELP_COMMANDS: &[&str] = &["/favorite", "/favorites", "/reset", "/help", "/quit"];

#[derive(Debug, Parser)]
#[command(name = "aura-rs", version, about = "AURA demo storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Browse(BrowseArgs),
    Stylist(StylistArgs),
    TryOn(TryOnArgs),
}

#[derive(Debug, Parser)]
struct BrowseArgs {
    /// Free-text search over product names, brands, and tags.
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long, default_value = "All")]
    category: String,
    /// featured | price-low | price-high | rating | newest
    #[arg(long, default_value = "featured")]
    sort: String,
}

#[derive(Debug, Parser)]
struct StylistArgs {
    /// Session directory; the journal lands in <out>/events.jsonl.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Parser)]
struct TryOnArgs {
    #[arg(long)]
    photo: PathBuf,
    /// Product ids to try on (repeatable).
    #[arg(long = "select", required = true)]
    select: Vec<String>,
    /// Session directory for events.jsonl and summary.json.
    #[arg(long)]
    out: PathBuf,
    /// Remote generation endpoint base; the local studio stub runs otherwise.
    #[arg(long)]
    api_base: Option<String>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("aura-rs error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Browse(args) => run_browse(args),
        Command::Stylist(args) => run_stylist(args),
        Command::TryOn(args) => run_try_on(args),
    }
}

fn run_browse(args: BrowseArgs) -> Result<i32> {
    if !CATEGORIES.contains(&args.category.as_str()) {
        bail!(
            "unknown category '{}' (expected one of: {})",
            args.category,
            CATEGORIES.join(", ")
        );
    }
    let sort = SortKey::parse(&args.sort).map_err(anyhow::Error::msg)?;
    let catalog = Catalog::new(None);
    let query = CatalogQuery {
        query: args.query.clone(),
        category: args.category.clone(),
        sort,
    };
    let results = search_products(&catalog, &query);

    let mut heading = format!("Showing {} products", results.len());
    if args.category != "All" {
        heading.push_str(&format!(" in {}", args.category));
    }
    if !args.query.trim().is_empty() {
        heading.push_str(&format!(" for \"{}\"", args.query.trim()));
    }
    println!("{heading}");

    for product in &results {
        let price = match product.original_price {
            Some(original) => format!("${} (was ${original})", product.price),
            None => format!("${}", product.price),
        };
        println!(
            "{:>3}  {} | {} | {} | rating {:.1} ({} reviews)",
            product.id, product.brand, product.name, price, product.rating, product.reviews
        );
        println!("     {} | {}", product.category, product.tags.join(", "));
    }
    if results.is_empty() {
        println!("No products found. Try adjusting your search or filters.");
    }
    Ok(0)
}

fn run_stylist(args: StylistArgs) -> Result<i32> {
    let events = EventWriter::new(args.out.join("events.jsonl"), session_id_for(&args.out));
    let sleeper: Arc<dyn Sleeper> = Arc::new(SystemSleeper);
    let mut session = StylistSession::new(Catalog::new(None), sleeper, events);
    let mut favorites = FavoritesSet::new();

    println!("AURA stylist ready. Type /help for commands.");
    if let Some(greeting) = session.conversation().last() {
        print_assistant_message(greeting);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let input = line.trim_end_matches(['\n', '\r']);
        if input.trim().is_empty() {
            continue;
        }

        if let Some(command) = input.trim().strip_prefix('/') {
            let parts = parse_command_args(command);
            let Some((name, rest)) = parts.split_first() else {
                continue;
            };
            match name.as_str() {
                "help" => println!("Commands: {}", STYLIST_HELP_COMMANDS.join(" ")),
                "favorite" => {
                    let Some(id) = rest.first() else {
                        println!("/favorite requires a product id");
                        continue;
                    };
                    if session.catalog().get(id).is_none() {
                        println!("Unknown product id '{id}'");
                        continue;
                    }
                    if favorites.toggle(id) {
                        println!("Added {id} to favorites ({} total)", favorites.len());
                    } else {
                        println!("Removed {id} from favorites ({} total)", favorites.len());
                    }
                }
                "favorites" => {
                    if favorites.is_empty() {
                        println!("No favorites yet.");
                    } else {
                        println!("Favorites: {}", favorites.ids().join(", "));
                    }
                }
                "reset" => {
                    session.reset();
                    println!("Conversation restarted.");
                    if let Some(greeting) = session.conversation().last() {
                        print_assistant_message(greeting);
                    }
                }
                "quit" | "exit" => break,
                other => println!("Unknown command '/{other}' (try /help)"),
            }
            continue;
        }

        if let Some(reply) = session.send(input)? {
            print_assistant_message(reply);
        }
    }

    Ok(0)
}

fn run_try_on(args: TryOnArgs) -> Result<i32> {
    std::fs::create_dir_all(&args.out)?;
    let session_id = session_id_for(&args.out);
    let events = EventWriter::new(args.out.join("events.jsonl"), session_id.clone());
    let sleeper: Arc<dyn Sleeper> = Arc::new(SystemSleeper);

    let api_base = args.api_base.clone().or_else(|| non_empty_env("AURA_API_BASE"));
    let provider: Box<dyn TryOnProvider> = match api_base {
        Some(base) => Box::new(RemoteProvider::new(Some(base))),
        None => Box::new(StudioProvider::new(sleeper.clone())),
    };
    let provider_name = provider.name().to_string();
    let started_at = now_utc_iso();

    let catalog = Catalog::new(None);
    let mut wizard = TryOnWizard::new(provider, sleeper, events)?;

    let photo = load_photo(&args.photo)?;
    println!(
        "Uploaded {} ({}x{})",
        args.photo.display(),
        photo.width,
        photo.height
    );
    if !wizard.upload_photo(photo)? {
        bail!("photo upload was refused");
    }

    for id in &args.select {
        match catalog.get(id) {
            Some(product) => {
                if wizard.toggle_product(product)? {
                    println!("Selected {} ({})", product.name, product.id);
                }
            }
            None => eprintln!("Unknown product id '{id}' (skipped)"),
        }
    }
    if wizard.selected_products().is_empty() {
        bail!("no valid products selected (catalog ids are 1-9)");
    }

    println!(
        "Starting virtual try-on with {} item(s) via {provider_name}...",
        wizard.selected_products().len()
    );
    if !wizard.start_try_on()? {
        bail!("try-on refused to start");
    }

    println!("Results ({}):", wizard.results().len());
    for (idx, image) in wizard.results().iter().enumerate() {
        let marker = if idx == wizard.result_index() { "*" } else { " " };
        println!(" {marker} {}. {image}", idx + 1);
    }

    let summary = SessionSummary {
        session_id,
        started_at,
        finished_at: now_utc_iso(),
        stage_reached: wizard.stage().label().to_string(),
        selected_products: wizard
            .selected_products()
            .iter()
            .map(|product| product.id.clone())
            .collect(),
        generated_images: wizard.results().to_vec(),
        fallback_used: wizard.fallback_used(),
    };
    let mut extra = Map::new();
    extra.insert("provider".to_string(), Value::String(provider_name));
    write_summary(&args.out.join("summary.json"), &summary, Some(&extra))?;
    println!("Session journal written to {}", args.out.display());
    Ok(0)
}

fn print_assistant_message(message: &Message) {
    println!("{}", message.content);
    for product in &message.products {
        println!(
            "  - {} by {} (${})  [id {}]",
            product.name, product.brand, product.price, product.id
        );
    }
    if !message.suggestions.is_empty() {
        println!("Try asking:");
        for suggestion in &message.suggestions {
            println!("  * {suggestion}");
        }
    }
}

fn parse_command_args(raw: &str) -> Vec<String> {
    match shell_words::split(raw) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect(),
        Err(_) => raw
            .split_whitespace()
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .collect(),
    }
}

fn session_id_for(out_dir: &Path) -> String {
    out_dir
        .file_name()
        .and_then(|value| value.to_str())
        .filter(|value| !value.is_empty())
        .unwrap_or("session-rs")
        .to_string()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_command_args, session_id_for};

    #[test]
    fn command_args_split_on_whitespace_and_respect_quotes() {
        assert_eq!(parse_command_args("favorite 4"), vec!["favorite", "4"]);
        assert_eq!(
            parse_command_args("favorite \"4\" extra"),
            vec!["favorite", "4", "extra"]
        );
        assert!(parse_command_args("").is_empty());
    }

    #[test]
    fn unbalanced_quotes_fall_back_to_whitespace_splitting() {
        assert_eq!(
            parse_command_args("favorite \"4 extra"),
            vec!["favorite", "\"4", "extra"]
        );
    }

    #[test]
    fn session_id_comes_from_the_out_directory_name() {
        assert_eq!(session_id_for(Path::new("/tmp/session-9")), "session-9");
        assert_eq!(session_id_for(Path::new("")), "session-rs");
    }
}
