use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use media_browser::api::TmdbClient;
use media_browser::config;
use media_browser::db::{self, KeyValueStore};
use media_browser::formatters;
use media_browser::models::{AppConfig, Category, ItemKey};
use media_browser::stores::PreferenceStore;
use media_browser::view::{SortKey, Tab, ViewLayout};
use media_browser::{Browser, Result};

#[derive(Parser)]
#[command(name = "media-browser", version, about = "Browse popular movies and series from TMDB")]
struct Cli {
    /// Directory holding config.json and the preference database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// movie or tv
    #[arg(long, short, global = true, default_value = "movie")]
    category: Category,

    /// Show release date, duration and poster under each title
    #[arg(long, global = true)]
    list: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Popular titles
    Popular {
        #[arg(long, default_value = "popularity")]
        sort: String,
        #[arg(long, default_value = "discover")]
        tab: Tab,
    },
    /// Full search
    Search {
        query: String,
        #[arg(long, default_value = "popularity")]
        sort: String,
    },
    /// Titles in a genre
    Genre {
        id: i64,
        #[arg(long, default_value = "popularity")]
        sort: String,
    },
    /// List genres for the category
    Genres,
    /// Live suggestions for a partial query
    Suggest { query: String },
    /// Toggle a title in favorites
    Favorite { id: i64 },
    /// Toggle a title in the watchlist
    Watchlist { id: i64 },
    /// Rate a title from 1 to 5 stars
    Rate { id: i64, stars: u8 },
    /// Toggle dark mode
    Theme,
    /// Show stored preferences
    Prefs,
}

fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_feed<S: KeyValueStore>(browser: &Browser<TmdbClient, S>, image_base_url: &str) -> ExitCode {
    let state = browser.content().snapshot();
    if let Some(error) = state.error {
        eprintln!("{} Run the command again to retry.", error);
        return ExitCode::FAILURE;
    }

    if let Some(empty) = browser.empty_feed() {
        println!("{}", empty.message());
        return ExitCode::SUCCESS;
    }

    let detailed = browser.view().view_layout == ViewLayout::List;
    let prefs = browser.preferences();
    for item in browser.displayed() {
        let key = item.key();
        let marks = format!(
            "{}{}",
            if prefs.is_favorite(&key) { "♥" } else { " " },
            if prefs.in_watchlist(&key) { "⏲" } else { " " },
        );
        let rating = prefs
            .rating(&key)
            .map(|r| format!("  {}★", r))
            .unwrap_or_default();
        println!(
            "{:>8} {} {} ({})  {:.1}  {}{}",
            item.id,
            marks,
            formatters::display_title(&item),
            formatters::format_year(item.release_date),
            item.vote_average,
            browser.genre_names(&item),
            rating,
        );

        if detailed {
            let duration = formatters::format_duration(&item);
            if duration.is_empty() {
                println!("{:>11}{}", "", formatters::format_release_date(item.release_date));
            } else {
                println!(
                    "{:>11}{}  {}",
                    "",
                    formatters::format_release_date(item.release_date),
                    duration
                );
            }
            if let Some(url) = item.poster_url(image_base_url) {
                println!("{:>11}{}", "", url);
            }
        }
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli, config: AppConfig, data_dir: &Path) -> Result<ExitCode> {
    let mut prefs = PreferenceStore::load(db::open_or_memory(data_dir));
    let category = cli.category;

    // Preference-only commands never touch the network.
    match cli.command {
        Command::Favorite { id } => {
            let key = ItemKey::new(category, id);
            if prefs.toggle_favorite(key) {
                println!("Added {} to favorites", key);
            } else {
                println!("Removed {} from favorites", key);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Watchlist { id } => {
            let key = ItemKey::new(category, id);
            if prefs.toggle_watchlist(key) {
                println!("Added {} to watchlist", key);
            } else {
                println!("Removed {} from watchlist", key);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Rate { id, stars } => {
            let key = ItemKey::new(category, id);
            prefs.set_rating(key, stars)?;
            println!("Rated {} {}★", key, stars);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Theme => {
            let on = !prefs.dark_mode();
            prefs.set_dark_mode(on);
            println!("Dark mode {}", if on { "on" } else { "off" });
            return Ok(ExitCode::SUCCESS);
        }
        Command::Prefs => {
            println!(
                "{} favorites, {} in watchlist, {} rated",
                prefs.favorites().len(),
                prefs.watchlist().len(),
                prefs.state().ratings.len()
            );
            for (key, value) in prefs.storage().entries()? {
                println!("{:<10} {}", key, value);
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let catalog = Arc::new(TmdbClient::new(&config)?);
    let browser = Browser::new(catalog, prefs, &config);
    browser.set_category(category);
    if cli.list {
        browser.set_layout(ViewLayout::List);
    }

    let genres_pending = match cli.command {
        Command::Suggest { .. } => None,
        _ => browser.load_genres(),
    };

    match &cli.command {
        Command::Popular { sort, tab } => {
            browser.set_sort_key(SortKey::parse(sort));
            browser.set_tab(*tab);
            browser.load_popular().await;
        }
        Command::Search { query, sort } => {
            browser.set_sort_key(SortKey::parse(sort));
            browser.search(query).await;
        }
        Command::Genre { id, sort } => {
            browser.set_sort_key(SortKey::parse(sort));
            browser.select_genre(Some(*id)).await;
        }
        Command::Suggest { query } => {
            if let Some(pending) = browser.set_query(query).await {
                let _ = pending.await;
            }
            for s in browser.suggestions() {
                println!(
                    "{:>10}  {} ({})",
                    s.key().to_string(),
                    s.title,
                    formatters::format_year(s.release_date)
                );
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    if let Some(pending) = genres_pending {
        let _ = pending.await;
    }

    if matches!(cli.command, Command::Genres) {
        for genre in browser.genres() {
            println!("{:>6}  {}", genre.id, genre.name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    Ok(print_feed(&browser, &config.image_base_url))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(config::default_data_dir);

    let mut app_config = match config::load_config(&data_dir) {
        Ok((app_config, _)) => app_config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    config::apply_env(&mut app_config);
    init_tracing(app_config.trace_level.as_deref());

    match run(cli, app_config, &data_dir).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
