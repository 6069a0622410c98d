use std::time::Duration;

use accommodation_swipe::card::{CardSurface, SwipeCard, SwipeHandlers};
use accommodation_swipe::domain::{Difficulty, Explanation, Listing, Rating};
use accommodation_swipe::game::{AccommodationGame, GameError};
use accommodation_swipe::gesture::{GestureParams, Point, Release};
use accommodation_swipe::listings::load_listings;
use tokio::sync::mpsc;

fn fixture() -> Vec<Listing> {
    vec![
        Listing::new("scam-1", true, vec!["Deposit before viewing".into()]),
        Listing::new("legit-1", false, vec!["Viewing offered".into()]),
        Listing::new("scam-2", true, vec!["Landlord abroad".into()]),
    ]
}

fn card_with_channel() -> (SwipeCard, mpsc::UnboundedReceiver<bool>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let card = SwipeCard::attach(
        Some(CardSurface { width: 400.0 }),
        GestureParams::default(),
        Duration::from_millis(300),
        SwipeHandlers::from_decision(move |accept| {
            let _ = tx.send(accept);
        }),
    );
    (card, rx)
}

fn swipe(card: &mut SwipeCard, dx: f64) -> Option<Release> {
    card.pointer_down(Point::new(100.0, 100.0));
    card.pointer_move(Point::new(100.0 + dx, 110.0));
    card.pointer_up()
}

#[tokio::test(start_paused = true)]
async fn swiping_right_through_three_listings() {
    let mut game = AccommodationGame::new(fixture(), Difficulty::A1);
    let (mut card, mut decisions) = card_with_channel();

    while !game.is_complete() {
        assert!(matches!(swipe(&mut card, 150.0), Some(Release::Commit(_))));
        let accept = decisions.recv().await.unwrap();
        game.submit_decision(accept).unwrap();
    }

    let correct: Vec<bool> = game.history().iter().map(|r| r.is_correct).collect();
    assert_eq!(correct, vec![false, true, false]);

    let summary = game.final_score();
    assert_eq!((summary.score, summary.total, summary.percentage), (1, 3, 33));
    assert_eq!(summary.rating, Rating::Novice);

    assert_eq!(
        game.submit_decision(true).unwrap_err(),
        GameError::OutOfRange { position: 3, total: 3 }
    );
}

#[tokio::test(start_paused = true)]
async fn cancelled_drag_leaves_listing_in_place() {
    let mut game = AccommodationGame::new(fixture(), Difficulty::B1);
    let (mut card, mut decisions) = card_with_channel();

    assert_eq!(swipe(&mut card, 50.0), Some(Release::Cancel));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(decisions.try_recv().is_err());
    assert_eq!(game.current_accommodation().unwrap().id, "scam-1");

    assert_eq!(swipe(&mut card, -140.0), Some(Release::Commit(accommodation_swipe::SwipeDirection::Left)));
    let accept = decisions.recv().await.unwrap();
    let record = game.submit_decision(accept).unwrap();
    assert!(record.is_correct);
    match &record.explanation {
        Explanation::Scam { flags, tips } => {
            assert_eq!(flags, &vec!["Deposit before viewing".to_string()]);
            assert_eq!(tips.len(), 4);
        }
        other => panic!("expected scam explanation, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn programmatic_triggers_feed_the_engine() {
    let mut game = AccommodationGame::new(fixture(), Difficulty::B2Plus);
    let (mut card, mut decisions) = card_with_channel();

    for reject in [true, false, true] {
        let started = if reject {
            card.trigger_swipe_left()
        } else {
            card.trigger_swipe_right()
        };
        assert!(started);
        game.submit_decision(decisions.recv().await.unwrap()).unwrap();
    }

    let summary = game.final_score();
    assert_eq!(summary.score, 3);
    assert_eq!(summary.percentage, 100);
    assert_eq!(summary.rating, Rating::Expert);
}

#[test]
fn demo_listings_are_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/listings.json");
    let listings = load_listings(path).unwrap();
    assert!(listings.iter().any(|l| l.is_scam));
    assert!(listings.iter().any(|l| !l.is_scam));

    let mut game = AccommodationGame::shuffled(listings.clone(), Difficulty::A2);
    assert_eq!(game.listings().len(), listings.len());
    game.reset();
    assert_eq!(game.position(), 0);
}
