use rand::Rng;
use sea_orm::DatabaseConnection;

use crate::cards::{by_rarity, stars_for, CardTemplate, RARITY_PRIORITY};
use crate::data::cards::CardInstanceRepository;
use crate::error::AppError;

/// Roll odds per rarity, aligned with [`RARITY_PRIORITY`].
const RARITY_WEIGHTS: [u32; 5] = [40, 30, 15, 10, 5];

/// One candidate offered by the roll dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollCandidate {
    pub template: &'static CardTemplate,
    pub stars: i32,
}

/// Draws the three roll candidates, each with a distinct rarity.
pub fn roll_candidates<R: Rng>(rng: &mut R) -> [RollCandidate; 3] {
    let mut rarities: Vec<usize> = Vec::with_capacity(3);
    while rarities.len() < 3 {
        let pick = weighted_rarity(rng);
        if !rarities.contains(&pick) {
            rarities.push(pick);
        }
    }

    let mut pick_template = |rarity_ix: usize| {
        let pool = by_rarity(RARITY_PRIORITY[rarity_ix]);
        let template = pool[rng.random_range(0..pool.len())];
        RollCandidate {
            template,
            stars: stars_for(template.rarity),
        }
    };

    [
        pick_template(rarities[0]),
        pick_template(rarities[1]),
        pick_template(rarities[2]),
    ]
}

fn weighted_rarity<R: Rng>(rng: &mut R) -> usize {
    let total: u32 = RARITY_WEIGHTS.iter().sum();
    let mut roll = rng.random_range(0..total);
    for (ix, weight) in RARITY_WEIGHTS.iter().enumerate() {
        if roll < *weight {
            return ix;
        }
        roll -= weight;
    }
    RARITY_WEIGHTS.len() - 1
}

/// Index the roll dialog auto-selects on timeout: highest star count,
/// lowest index on ties.
pub fn auto_pick(candidates: &[RollCandidate; 3]) -> usize {
    let mut best = 0;
    for (ix, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.stars > candidates[best].stars {
            best = ix;
        }
    }
    best
}

pub struct CardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CardService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Commits a roll candidate into the member's inventory under a fresh
    /// uid.
    pub async fn claim(
        &self,
        candidate: RollCandidate,
        owner_user_id: i64,
    ) -> Result<entity::card_instance::Model, AppError> {
        let repo = CardInstanceRepository::new(self.db);
        let uid = repo.next_uid().await?;
        let card = repo
            .insert(
                uid,
                candidate.template.card_id,
                owner_user_id,
                candidate.template.rarity,
                candidate.stars,
            )
            .await?;
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn candidates_have_distinct_rarities() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let candidates = roll_candidates(&mut rng);
            let rarities: Vec<&str> = candidates.iter().map(|c| c.template.rarity).collect();
            assert_ne!(rarities[0], rarities[1]);
            assert_ne!(rarities[0], rarities[2]);
            assert_ne!(rarities[1], rarities[2]);
        }
    }

    #[test]
    fn auto_pick_prefers_highest_stars() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = roll_candidates(&mut rng);
        let picked = auto_pick(&candidates);
        for candidate in candidates.iter() {
            assert!(candidates[picked].stars >= candidate.stars);
        }
    }

    #[test]
    fn auto_pick_tie_breaks_on_lowest_index() {
        let template = crate::cards::template(1).unwrap();
        let equal = RollCandidate { template, stars: 3 };
        assert_eq!(auto_pick(&[equal, equal, equal]), 0);
    }
}
