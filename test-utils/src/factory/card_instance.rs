//! Card instance factory for creating owned card copies.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test card instances with customizable fields.
///
/// Defaults: fresh unique `uid`, catalog card 1, owner 1, common
/// rarity, one star.
pub struct CardInstanceFactory<'a> {
    db: &'a DatabaseConnection,
    uid: i64,
    card_id: i32,
    owner: i64,
    rarity: String,
    stars: i32,
}

impl<'a> CardInstanceFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            uid: next_id() as i64,
            card_id: 1,
            owner: 1,
            rarity: "common".to_string(),
            stars: 1,
        }
    }

    pub fn uid(mut self, uid: i64) -> Self {
        self.uid = uid;
        self
    }

    pub fn card_id(mut self, card_id: i32) -> Self {
        self.card_id = card_id;
        self
    }

    pub fn owner(mut self, owner: i64) -> Self {
        self.owner = owner;
        self
    }

    pub fn rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = rarity.into();
        self
    }

    pub fn stars(mut self, stars: i32) -> Self {
        self.stars = stars;
        self
    }

    /// Builds and inserts the card instance row.
    pub async fn build(self) -> Result<entity::card_instance::Model, DbErr> {
        entity::card_instance::ActiveModel {
            uid: ActiveValue::Set(self.uid),
            card_id: ActiveValue::Set(self.card_id),
            owner_user_id: ActiveValue::Set(self.owner),
            rarity: ActiveValue::Set(self.rarity),
            stars_count: ActiveValue::Set(self.stars),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a card instance owned by `owner` with default values.
pub async fn create_card(
    db: &DatabaseConnection,
    owner: i64,
) -> Result<entity::card_instance::Model, DbErr> {
    CardInstanceFactory::new(db).owner(owner).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_cards_with_unique_uids() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(CardInstance)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let card1 = create_card(db, 1).await?;
        let card2 = create_card(db, 1).await?;

        assert_ne!(card1.uid, card2.uid);

        Ok(())
    }

    #[tokio::test]
    async fn creates_card_with_custom_values() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(CardInstance)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let card = CardInstanceFactory::new(db)
            .owner(42)
            .rarity("legendary")
            .stars(5)
            .build()
            .await?;

        assert_eq!(card.owner_user_id, 42);
        assert_eq!(card.rarity, "legendary");
        assert_eq!(card.stars_count, 5);

        Ok(())
    }
}
