// Delivery classification
//
// Pure per-ball decisions: does the ball count as a legal delivery, and how
// much of it is charged to the bowler vs credited to the batter.

use crate::model::Delivery;

/// Extras kind keys as they appear in match documents.
pub const WIDES: &str = "wides";
pub const NOBALLS: &str = "noballs";

/// A delivery is legal iff it was not called wide. No-balls still count
/// toward balls faced and balls bowled.
pub fn is_legal_delivery(delivery: &Delivery) -> bool {
    !delivery.extras.contains_key(WIDES)
}

/// Runs charged to the bowler: batter runs plus wide/no-ball penalty runs.
/// Byes and leg-byes are not charged to the bowler.
pub fn runs_conceded(delivery: &Delivery) -> u64 {
    let penalties: u64 = delivery
        .extras
        .iter()
        .filter(|(kind, _)| kind.as_str() == WIDES || kind.as_str() == NOBALLS)
        .map(|(_, extra)| extra.runs())
        .sum();
    delivery.runs.batter + penalties
}

/// Runs credited to the batter. Extras are never credited to a batter.
pub fn runs_scored(delivery: &Delivery) -> u64 {
    delivery.runs.batter
}
