use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::profiles::{self, CreateProfile, Role, UpdateProfile};

/// Insert the profile row right after the hosted auth service created the user.
pub async fn insert_profile(
    db: &DatabaseConnection,
    input: CreateProfile,
) -> Result<profiles::Model, DbErr> {
    let new_profile = profiles::ActiveModel {
        user_id: Set(input.user_id),
        name: Set(input.name),
        email: Set(input.email),
        address: Set(input.address),
        role: Set(input.role),
        job: Set(input.job),
        phone: Set(input.phone),
        description: Set(input.description),
        profile_picture: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_profile.insert(db).await
}

/// Fetch a single profile by its auth user id.
pub async fn get_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(user_id).one(db).await
}

/// Fetch every profile (admin listing).
pub async fn get_all_profiles(db: &DatabaseConnection) -> Result<Vec<profiles::Model>, DbErr> {
    profiles::Entity::find()
        .order_by_desc(profiles::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch every worker-role profile.
pub async fn get_workers(db: &DatabaseConnection) -> Result<Vec<profiles::Model>, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::Role.eq(Role::Worker))
        .order_by_asc(profiles::Column::Name)
        .all(db)
        .await
}

/// Fetch many profiles in one query and return a user_id -> profile map.
pub async fn get_profiles_by_ids(
    db: &DatabaseConnection,
    user_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, profiles::Model>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = profiles::Entity::find()
        .filter(profiles::Column::UserId.is_in(user_ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|p| (p.user_id, p)).collect())
}

/// Apply a profile edit in a single update.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateProfile,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(email) = input.email {
        active.email = Set(Some(email));
    }
    if let Some(address) = input.address {
        active.address = Set(address);
    }
    if let Some(job) = input.job {
        active.job = Set(Some(job));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Point the profile picture at `url`, or clear it with `None`.
pub async fn set_profile_picture(
    db: &DatabaseConnection,
    user_id: Uuid,
    url: Option<String>,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();
    active.profile_picture = Set(url);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
