//! Phase tiers: which matches must be played before which.

use crate::models::{GameMatch, MatchCategory, Tier};

pub const PRELIMINARY: Tier = 0;
pub const KNOCKOUT: Tier = 1;
pub const LOSERS_FINAL: Tier = 2;
pub const PLACEMENT: Tier = 3;
pub const GRAND_FINAL: Tier = 4;

/// Tier of a category: round robin, then semifinals (both brackets), losers final,
/// 3rd place, grand final.
pub fn category_tier(category: MatchCategory) -> Tier {
    match category {
        MatchCategory::RoundRobin => PRELIMINARY,
        MatchCategory::GrandFinal => GRAND_FINAL,
        MatchCategory::ThirdPlace => PLACEMENT,
        MatchCategory::LosersFinal => LOSERS_FINAL,
        MatchCategory::WinnersSemiFinal | MatchCategory::LosersSemiFinal | MatchCategory::Other => {
            KNOCKOUT
        }
    }
}

pub fn tier(game: &GameMatch) -> Tier {
    category_tier(game.category)
}

/// Stable sort by tier; matches of equal tier keep their relative order.
pub fn sort_by_tier(matches: &mut [GameMatch]) {
    matches.sort_by_key(tier);
}
