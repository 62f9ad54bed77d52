use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, CreateReview};

/// Insert a review. Reviews are never edited afterwards.
pub async fn insert_review(
    db: &DatabaseConnection,
    worker_id: Uuid,
    reviewer_id: Uuid,
    input: CreateReview,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        worker_id: Set(worker_id),
        reviewer_id: Set(reviewer_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

/// Fetch every review; the directory averages them in memory.
pub async fn get_all_reviews(db: &DatabaseConnection) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find().all(db).await
}

/// Fetch the reviews of one worker, newest first.
pub async fn get_reviews_for_worker(
    db: &DatabaseConnection,
    worker_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::WorkerId.eq(worker_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_review_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find_by_id(id).one(db).await
}

/// Delete a review by ID.
pub async fn delete_review(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    reviews::Entity::delete_by_id(id).exec(db).await
}
