use accommodation_swipe::card::{CardSurface, SwipeCard, SwipeHandlers};
use accommodation_swipe::config::Config;
use accommodation_swipe::domain::{DecisionRecord, Explanation, FinalScore, Listing};
use accommodation_swipe::game::AccommodationGame;
use accommodation_swipe::gesture::{Point, Release};
use accommodation_swipe::progress::ProgressStore;
use accommodation_swipe::{journal, listings, monitoring};
use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    let cfg = Config::from_env()?;
    monitoring::init_tracing(cfg.log_json);
    info!(?cfg, "boot");

    let store = ProgressStore::new(&cfg.progress_path);
    let first = cfg.scenario_order.first().cloned().unwrap_or_else(|| cfg.scenario.clone());
    let mut book = store.load()?;
    let progress = book.player_mut(&cfg.player, &first);
    if !progress.is_unlocked(&cfg.scenario) {
        return Err(anyhow!("scenario '{}' is still locked", cfg.scenario));
    }

    let listings = listings::load_listings(&cfg.listings_path)?;
    let mut game = AccommodationGame::shuffled(listings, cfg.difficulty);

    let (tx, mut decisions) = mpsc::unbounded_channel::<bool>();
    let mut card = SwipeCard::attach(
        Some(CardSurface { width: cfg.surface_width }),
        cfg.gesture_params(),
        cfg.animation(),
        SwipeHandlers::from_decision(move |accept| {
            let _ = tx.send(accept);
        }),
    );

    println!("a = looks legit (swipe right), r = scam (swipe left), d <dx> = drag, q = quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(listing) = game.current_accommodation() {
        print_listing(listing, game.position() + 1, game.listings().len());

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let committed = match words.next() {
            Some("a") => card.trigger_swipe_right(),
            Some("r") => card.trigger_swipe_left(),
            Some("d") => {
                let dx: f64 = words.next().and_then(|w| w.parse().ok()).unwrap_or(0.0);
                card.pointer_down(Point::new(0.0, 0.0));
                if let Some(t) = card.pointer_move(Point::new(dx, 0.0)) {
                    println!("  card at {:+.0} ({:+.1} deg, opacity {:.2})", t.offset_x, t.rotation_deg, t.opacity);
                }
                matches!(card.pointer_up(), Some(Release::Commit(_)))
            }
            Some("q") => break,
            _ => false,
        };
        if !committed {
            println!("  card returns to center");
            continue;
        }

        let Some(accept) = decisions.recv().await else {
            warn!("card handlers dropped");
            break;
        };
        let record = game.submit_decision(accept)?;
        print_feedback(record);
    }
    card.teardown();

    let summary = game.final_score();
    print_summary(&summary);

    if game.is_complete() {
        journal::append_session_summary(&cfg.journal_path, &cfg.scenario, cfg.difficulty, &summary)?;
        let order: Vec<&str> = cfg.scenario_order.iter().map(String::as_str).collect();
        if let Some(next) = progress.record(&cfg.scenario, cfg.difficulty, &summary, &order) {
            println!("New scenario unlocked: {next}");
        }
        store.save(&book)?;
    }

    Ok(())
}

fn print_listing(listing: &Listing, n: usize, total: usize) {
    println!();
    let title = listing.display_text("title").unwrap_or_else(|| listing.id.clone());
    println!("[{n}/{total}] {title}");
    if let Some(location) = listing.display_text("location") {
        println!("  {location}");
    }
    match (listing.display_text("price"), listing.display_text("deposit")) {
        (Some(price), Some(deposit)) => println!("  {price}/month, deposit {deposit}"),
        (Some(price), None) => println!("  {price}/month"),
        _ => {}
    }
    if let Some(description) = listing.display_text("description") {
        println!("  {description}");
    }
}

fn print_feedback(record: &DecisionRecord) {
    let verdict = if record.is_correct { "Correct!" } else { "Not quite." };
    let kind = match record.explanation {
        Explanation::Scam { .. } => "This was a scam.",
        Explanation::Legitimate { .. } => "This offer was legitimate.",
    };
    println!("{verdict} {kind}");
    for flag in record.explanation.flags() {
        println!("  * {flag}");
    }
    for tip in record.explanation.tips() {
        println!("  tip: {tip}");
    }
}

fn print_summary(summary: &FinalScore) {
    println!();
    println!(
        "Score {} / {} ({}%) - {}",
        summary.score, summary.total, summary.percentage, summary.rating
    );
}
