use crate::errors::ApiError;
use crate::models::images;
use crate::models::profiles::{self, Role};

/// Only admins pass.
pub fn require_admin(profile: &profiles::Model) -> Result<(), ApiError> {
    if profile.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}

/// The target of a review or service request must be a worker.
pub fn require_worker_target(target: Option<profiles::Model>) -> Result<profiles::Model, ApiError> {
    match target {
        Some(p) if p.role == Role::Worker => Ok(p),
        Some(_) => Err(ApiError::BadRequest(
            "The selected user is not a worker".to_string(),
        )),
        None => Err(ApiError::NotFound("Worker not found".to_string())),
    }
}

/// Only the uploader may touch an image.
pub fn require_image_owner(
    image: Option<images::Model>,
    user: &profiles::Model,
) -> Result<images::Model, ApiError> {
    match image {
        Some(img) if img.user_id == user.user_id => Ok(img),
        Some(_) => Err(ApiError::Forbidden(
            "You can only manage your own images".to_string(),
        )),
        None => Err(ApiError::NotFound("Image not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile(role: Role) -> profiles::Model {
        profiles::Model {
            user_id: Uuid::new_v4(),
            name: "Amel".to_string(),
            email: None,
            address: "Nabeul".to_string(),
            role,
            job: None,
            phone: None,
            description: None,
            profile_picture: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn admin_gate() {
        assert!(require_admin(&profile(Role::Admin)).is_ok());
        assert!(require_admin(&profile(Role::Worker)).is_err());
    }

    #[test]
    fn worker_target_gate() {
        assert!(require_worker_target(Some(profile(Role::Worker))).is_ok());
        assert!(matches!(
            require_worker_target(Some(profile(Role::Client))),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(require_worker_target(None), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn image_owner_gate() {
        let owner = profile(Role::Worker);
        let image = images::Model {
            id: Uuid::new_v4(),
            user_id: owner.user_id,
            url: "https://x.supabase.co/storage/v1/object/public/user-images/a/b.png".into(),
            created_at: chrono::Utc::now(),
        };
        assert!(require_image_owner(Some(image.clone()), &owner).is_ok());
        assert!(matches!(
            require_image_owner(Some(image), &profile(Role::Worker)),
            Err(ApiError::Forbidden(_))
        ));
    }
}
