//! Static card catalog and rarity configuration.
//!
//! Card templates are compiled in; only owned instances live in the
//! database. The rarity priority table drives both the roll odds and the
//! by-rarity inventory sort.

/// A catalog card. `*_key` fields are locale keys, not display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTemplate {
    pub card_id: i32,
    pub name_key: &'static str,
    pub description_key: &'static str,
    pub male_key: &'static str,
    pub image_key: &'static str,
    pub rarity: &'static str,
}

/// Rarities in ascending priority order. Index = sort priority.
pub const RARITY_PRIORITY: [&str; 5] = ["common", "uncommon", "rare", "epic", "legendary"];

/// Stars awarded per rarity, used for the roll-timeout auto-pick.
pub fn stars_for(rarity: &str) -> i32 {
    rarity_priority(rarity) as i32 + 1
}

/// Sort priority of a rarity; unknown rarities sort lowest.
pub fn rarity_priority(rarity: &str) -> usize {
    RARITY_PRIORITY
        .iter()
        .position(|r| *r == rarity)
        .unwrap_or(0)
}

/// The compiled-in card catalog.
pub const CATALOG: [CardTemplate; 15] = [
    card(1, "chisato", "common"),
    card(2, "takina", "rare"),
    card(3, "mizuki", "common"),
    card(4, "kurumi", "uncommon"),
    card(5, "mika", "common"),
    card(6, "himegama", "rare"),
    card(7, "fuki", "uncommon"),
    card(8, "sakura", "common"),
    card(9, "erika", "uncommon"),
    card(10, "saori", "rare"),
    card(11, "jin", "epic"),
    card(12, "shinji", "epic"),
    card(13, "yoshimatsu", "rare"),
    card(14, "majima", "legendary"),
    card(15, "alan_chief", "legendary"),
];

const fn card(card_id: i32, slug: &'static str, rarity: &'static str) -> CardTemplate {
    // The stored value is the card slug; callers compose the full locale
    // key as `cards.<slug>.<field>`.
    CardTemplate {
        card_id,
        name_key: slug,
        description_key: slug,
        male_key: slug,
        image_key: slug,
        rarity,
    }
}

/// Looks up a template by catalog id.
pub fn template(card_id: i32) -> Option<&'static CardTemplate> {
    CATALOG.iter().find(|c| c.card_id == card_id)
}

/// Templates of a given rarity.
pub fn by_rarity(rarity: &str) -> Vec<&'static CardTemplate> {
    CATALOG.iter().filter(|c| c.rarity == rarity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for a in CATALOG.iter() {
            assert_eq!(
                CATALOG.iter().filter(|b| b.card_id == a.card_id).count(),
                1,
                "duplicate card id {}",
                a.card_id
            );
        }
    }

    #[test]
    fn every_rarity_is_known() {
        for c in CATALOG.iter() {
            assert!(RARITY_PRIORITY.contains(&c.rarity));
        }
    }

    #[test]
    fn priority_orders_rarities() {
        assert!(rarity_priority("legendary") > rarity_priority("rare"));
        assert!(rarity_priority("rare") > rarity_priority("common"));
        assert_eq!(rarity_priority("unknown"), 0);
    }

    #[test]
    fn stars_scale_with_rarity() {
        assert_eq!(stars_for("common"), 1);
        assert_eq!(stars_for("legendary"), 5);
    }
}
