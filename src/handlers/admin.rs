use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles as profile_db;
use crate::errors::ApiError;
use crate::models::profiles::AdminUserRow;

/// GET /api/admin/users
///
/// Every profile, newest first.
pub async fn list_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let rows: Vec<AdminUserRow> = profile_db::get_all_profiles(db.get_ref())
        .await?
        .into_iter()
        .map(AdminUserRow::from)
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}
