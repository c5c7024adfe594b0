//! Command-line front end over the tracker core.
//!
//! Deliberately thin: all business rules live in the managers; this module
//! only parses arguments, wires services together, and formats output.

mod backends;
mod config;
mod db_manager;
mod error;
mod normalizer;
mod protocol;
mod search_manager;
mod tracker_manager;

use backends::{
    anilist::AnilistAdapter, google_books::GoogleBooksAdapter, kinopoisk::KinopoiskAdapter,
    CatalogAdapter,
};
use config::Config;
use db_manager::TrackingDb;
use log::info;
use protocol::{CandidateRecord, EntryDraft, MediaType, Status, StatusFilter};
use search_manager::SearchManager;
use tracker_manager::TrackerManager;

fn main() {
    colog::init();
    let config = Config::load_or_default();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        std::process::exit(2);
    };
    if let Err(message) = run(&config, command, &args[1..]) {
        log::error!("{message}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("medialog - personal media tracking list");
    println!();
    println!("usage:");
    println!("  medialog search <keyword>...");
    println!("  medialog list [all|planned|in_progress|finished]");
    println!("  medialog add <title> <type> [key=value]...");
    println!("  medialog edit <title> [key=value]...");
    println!("  medialog remove <title>");
    println!("  medialog artwork <title> <path-or-url>");
    println!();
    println!("types: movie series cartoon anime manga comic manhwa manhua book");
    println!("keys:  status progress rating review artwork (edit also takes type)");
}

fn run(config: &Config, command: &str, args: &[String]) -> Result<(), String> {
    match command {
        "search" => cmd_search(config, args),
        "list" => cmd_list(config, args),
        "add" => cmd_add(config, args),
        "edit" => cmd_edit(config, args),
        "remove" => cmd_remove(config, args),
        "artwork" => cmd_artwork(config, args),
        _ => Err(format!("unknown command: {command}")),
    }
}

fn open_tracker(config: &Config) -> Result<TrackerManager, String> {
    let db = TrackingDb::new(config.database_path()).map_err(|err| err.to_string())?;
    Ok(TrackerManager::new(db))
}

fn build_search(config: &Config) -> SearchManager {
    let adapters: Vec<Box<dyn CatalogAdapter>> = vec![
        Box::new(KinopoiskAdapter::new(
            config.providers.kinopoisk.api_key.clone(),
            &config.search,
        )),
        Box::new(AnilistAdapter::anime(&config.search)),
        Box::new(AnilistAdapter::manga(&config.search)),
        Box::new(GoogleBooksAdapter::new(
            config.providers.google_books.api_key.clone(),
            &config.search,
        )),
    ];
    SearchManager::new(adapters)
}

fn cmd_search(config: &Config, args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("search needs a keyword".into());
    }
    let keyword = args.join(" ");
    let candidates = build_search(config).search(&keyword);
    if candidates.is_empty() {
        println!("no results for '{keyword}'");
        return Ok(());
    }
    for (index, candidate) in candidates.iter().enumerate() {
        print_candidate(index + 1, candidate);
    }
    Ok(())
}

fn print_candidate(position: usize, candidate: &CandidateRecord) {
    println!("[{position}] ({})", candidate.kind.as_str());
    for (name, value) in &candidate.display_fields {
        println!("    {name}: {value}");
    }
    if let Some(url) = &candidate.artwork_url {
        println!("    artwork: {url}");
    }
}

fn cmd_list(config: &Config, args: &[String]) -> Result<(), String> {
    let filter = match args.first() {
        None => StatusFilter::All,
        Some(raw) => {
            StatusFilter::parse(raw).ok_or_else(|| format!("unknown status filter: {raw}"))?
        }
    };
    let tracker = open_tracker(config)?;
    let rows = tracker.list(filter).map_err(|err| err.to_string())?;
    if rows.is_empty() {
        println!("tracking list is empty");
        return Ok(());
    }
    for (entry, artwork) in rows {
        println!(
            "{} [{} / {}]",
            entry.title,
            entry.media_type.as_str(),
            entry.status.as_str()
        );
        if !entry.progress.is_empty() {
            println!("    progress: {}", entry.progress);
        }
        println!("    rating: {}/10", entry.rating);
        if !entry.review.is_empty() {
            println!("    review: {}", entry.review);
        }
        if !artwork.path_or_url.is_empty() {
            println!("    artwork: {}", artwork.path_or_url);
        }
    }
    Ok(())
}

fn apply_pairs(draft: &mut EntryDraft, pairs: &[String]) -> Result<(), String> {
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("expected key=value, got '{pair}'"));
        };
        match key {
            "type" => {
                let media_type =
                    MediaType::parse(value).ok_or_else(|| format!("unknown type: {value}"))?;
                draft.media_type = Some(media_type);
            }
            "status" => {
                draft.status =
                    Status::parse(value).ok_or_else(|| format!("unknown status: {value}"))?;
            }
            "progress" => draft.progress = value.to_string(),
            "rating" => {
                draft.rating = value
                    .parse()
                    .map_err(|_| format!("rating must be a number 0-10, got '{value}'"))?;
            }
            "review" => draft.review = value.to_string(),
            "artwork" => draft.artwork = value.to_string(),
            _ => return Err(format!("unknown key: {key}")),
        }
    }
    Ok(())
}

fn cmd_add(config: &Config, args: &[String]) -> Result<(), String> {
    let [title, media_type, pairs @ ..] = args else {
        return Err("add needs a title and a type".into());
    };
    let media_type =
        MediaType::parse(media_type).ok_or_else(|| format!("unknown type: {media_type}"))?;
    let mut draft = EntryDraft {
        title: title.clone(),
        media_type: Some(media_type),
        ..EntryDraft::default()
    };
    apply_pairs(&mut draft, pairs)?;
    if draft.progress.is_empty() {
        info!(
            "no progress given; {} are counted in {}",
            media_type.as_str(),
            media_type.progress_noun()
        );
    }
    let mut tracker = open_tracker(config)?;
    tracker.create(&draft).map_err(|err| err.to_string())?;
    println!("tracked '{title}'");
    Ok(())
}

fn cmd_edit(config: &Config, args: &[String]) -> Result<(), String> {
    let [title, pairs @ ..] = args else {
        return Err("edit needs a title".into());
    };
    let mut tracker = open_tracker(config)?;
    let mut draft = tracker.draft_for(title).map_err(|err| err.to_string())?;
    apply_pairs(&mut draft, pairs)?;
    tracker.edit(title, &draft).map_err(|err| err.to_string())?;
    println!("updated '{title}'");
    Ok(())
}

fn cmd_remove(config: &Config, args: &[String]) -> Result<(), String> {
    let [title] = args else {
        return Err("remove needs a title".into());
    };
    let mut tracker = open_tracker(config)?;
    tracker.remove(title).map_err(|err| err.to_string())?;
    println!("removed '{title}'");
    Ok(())
}

fn cmd_artwork(config: &Config, args: &[String]) -> Result<(), String> {
    let [title, path_or_url] = args else {
        return Err("artwork needs a title and a path or url".into());
    };
    let mut tracker = open_tracker(config)?;
    tracker
        .set_artwork(title, path_or_url)
        .map_err(|err| err.to_string())?;
    println!("artwork for '{title}' set");
    Ok(())
}
