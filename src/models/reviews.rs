use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::is_blank;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// SeaORM entity for the `reviews` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub worker_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::WorkerId",
        to = "super::profiles::Column::UserId"
    )]
    Worker,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ReviewerId",
        to = "super::profiles::Column::UserId"
    )]
    Reviewer,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/workers/{id}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub rating: i32,
    pub comment: String,
}

impl CreateReview {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            ));
        }
        if is_blank(&self.comment) {
            return Err("Review cannot be empty.".to_string());
        }
        Ok(())
    }
}

/// A review joined to its author's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_name: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTimeUtc,
}

impl ReviewResponse {
    pub fn new(m: Model, reviewer_name: Option<String>) -> Self {
        Self {
            id: m.id,
            worker_id: m.worker_id,
            reviewer_id: m.reviewer_id,
            reviewer_name,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in 1..=5 {
            let review = CreateReview { rating, comment: "Great".into() };
            assert!(review.validate().is_ok());
        }
        for rating in [0, 6, -1] {
            let review = CreateReview { rating, comment: "Great".into() };
            assert!(review.validate().is_err());
        }
    }

    #[test]
    fn empty_comment_is_rejected() {
        let review = CreateReview { rating: 4, comment: "   ".into() };
        assert_eq!(review.validate().unwrap_err(), "Review cannot be empty.");
    }
}
