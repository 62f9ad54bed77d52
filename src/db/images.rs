use sea_orm::*;
use uuid::Uuid;

use crate::models::images;

/// Record an uploaded object's public URL.
pub async fn insert_image(
    db: &DatabaseConnection,
    user_id: Uuid,
    url: String,
) -> Result<images::Model, DbErr> {
    let new_image = images::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        url: Set(url),
        created_at: Set(chrono::Utc::now()),
    };

    new_image.insert(db).await
}

/// Fetch a user's images, oldest first (gallery order).
pub async fn get_images_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<images::Model>, DbErr> {
    images::Entity::find()
        .filter(images::Column::UserId.eq(user_id))
        .order_by_asc(images::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_image_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<images::Model>, DbErr> {
    images::Entity::find_by_id(id).one(db).await
}

/// Delete an image row by ID.
pub async fn delete_image(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    images::Entity::delete_by_id(id).exec(db).await
}
