// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::Path;

use donation_ledger::{
    aggregate, format_amount, load_sources, search, AppConfig, CanonicalRecord, Classifier,
    LoadedData, SortState,
};

const DEFAULT_CONFIG: &str = "ledger.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("summary") => {
            let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
            let as_json = args.iter().any(|a| a == "--json");
            run_summary(Path::new(config_path), as_json)?;
        }
        Some("search") => {
            let (Some(config_path), Some(query)) = (args.get(2), args.get(3)) else {
                eprintln!("Usage: donation-ledger search <config.json> <query> [--sort <column>] [--desc]");
                std::process::exit(2);
            };
            let sort_key = args
                .iter()
                .position(|a| a == "--sort")
                .and_then(|i| args.get(i + 1))
                .map(String::as_str);
            let descending = args.iter().any(|a| a == "--desc");
            run_search(Path::new(config_path), query, sort_key, descending)?;
        }
        Some("tui") => {
            let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
            run_ui_mode(Path::new(config_path))?;
        }
        Some(config_path) => run_ui_mode(Path::new(config_path))?,
        None => run_ui_mode(Path::new(DEFAULT_CONFIG))?,
    }

    Ok(())
}

fn load(config_path: &Path) -> Result<(AppConfig, LoadedData)> {
    let config = AppConfig::from_file(config_path)?;
    let loaded = load_sources(&config)?;
    Ok((config, loaded))
}

fn run_summary(config_path: &Path, as_json: bool) -> Result<()> {
    let (config, loaded) = load(config_path)?;
    let classifier = Classifier::new(config.classifier);
    let totals = aggregate(&loaded.records, &classifier);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    println!("💰 Donation totals by party");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for stat in &loaded.report.sources {
        println!("📂 {:<24} {:>8} rows", stat.source.name(), stat.rows);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (bucket, total) in &totals.buckets {
        println!(
            "{:<24} {:>14}  ({} records)",
            bucket.label(),
            format_amount(total.amount()),
            total.records
        );
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<24} {:>14}", "Total", format_amount(totals.grand_total()));
    println!(
        "Not totalled: {} display-only, {} unclassified",
        totals.display_only, totals.unclassified
    );
    println!(
        "Loaded {} records at {}",
        loaded.report.total_rows(),
        loaded.report.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}

/// Search then sort, as the table would show it after the same header clicks
fn find_rows(
    records: &[CanonicalRecord],
    query: &str,
    sort_key: Option<&str>,
    descending: bool,
) -> Result<Vec<CanonicalRecord>> {
    let mut sort = SortState::default();
    if let Some(key) = sort_key {
        sort.click_key(key)?;
        if descending {
            sort.click_key(key)?;
        }
    }
    Ok(sort.apply(&search(records, query)))
}

fn run_search(
    config_path: &Path,
    query: &str,
    sort_key: Option<&str>,
    descending: bool,
) -> Result<()> {
    let (config, loaded) = load(config_path)?;
    let classifier = Classifier::new(config.classifier);
    let rows = find_rows(&loaded.records, query, sort_key, descending)?;

    println!("🔍 {} matches for {:?}", rows.len(), query);
    for record in &rows {
        let bucket = classifier
            .classify(&record.party)
            .map(|b| b.key())
            .unwrap_or("-");
        println!(
            "{:<20} {:<14} {:<18} {:<8} {:<10} {:>12}",
            record.last_name, record.first_name, record.city, bucket, record.date, record.donation
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config_path: &Path) -> Result<()> {
    use donation_ledger::ViewState;

    let (config, loaded) = load(config_path)?;
    log::info!("Starting UI... (Esc to quit)");

    let view = ViewState::new(
        loaded.records,
        Classifier::new(config.classifier),
        config.debounce(),
    );
    let mut app = ui::App::new(view, loaded.report);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print totals: donation-ledger summary <config.json>");
    std::process::exit(1);
}
