use crate::domain::Difficulty;

// Ordered from simplest to most nuanced.
const SCAM_TIPS: [&str; 5] = [
    "Never pay money before you see the room.",
    "Be careful if the price is much lower than other rooms nearby.",
    "A landlord who is always abroad and cannot meet you is a warning sign.",
    "Ask for a contract and check that the landlord really owns the property.",
    "Pressure to decide quickly or to pay by wire transfer or gift card usually means fraud.",
];

const LEGIT_TIPS: [&str; 5] = [
    "A real landlord lets you visit the room first.",
    "The price is similar to other rooms in the same area.",
    "You get a written contract before you pay anything.",
    "The deposit is paid into a protected scheme or a traceable account.",
    "The landlord answers questions clearly and gives you time to decide.",
];

/// How many catalog entries a player at this level gets.
pub fn tip_count(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::A1 => 2,
        Difficulty::A2 => 3,
        Difficulty::B1 => 4,
        Difficulty::B2Plus => SCAM_TIPS.len(),
    }
}

pub fn scam_tips(difficulty: Difficulty) -> Vec<String> {
    truncate(&SCAM_TIPS, difficulty)
}

pub fn legit_tips(difficulty: Difficulty) -> Vec<String> {
    truncate(&LEGIT_TIPS, difficulty)
}

fn truncate(catalog: &[&str], difficulty: Difficulty) -> Vec<String> {
    catalog
        .iter()
        .take(tip_count(difficulty))
        .map(|s| s.to_string())
        .collect()
}
