use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::is_blank;

/// The `Role` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "worker")]
    Worker,
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// SeaORM entity for the `profiles` table.
///
/// Keyed by the Supabase auth user UUID. `job` and `phone` are only
/// meaningful for workers.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub role: Role,
    pub job: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_picture: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::images::Entity")]
    Images,
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_worker(&self) -> bool {
        self.role == Role::Worker
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ── DTOs ──

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub address: String,
    pub role: Role,
    pub job: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl SignupRequest {
    /// Non-empty checks, plus the role-conditional worker fields.
    ///
    /// Clients never keep a job or phone, even if the form sent one.
    pub fn validate(mut self) -> Result<Self, String> {
        for (field, value) in [
            ("name", &self.name),
            ("address", &self.address),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if is_blank(value) {
                return Err(format!("Field '{field}' is required"));
            }
        }

        match self.role {
            Role::Worker => {
                if self.job.as_deref().is_none_or(is_blank) {
                    return Err("Workers must choose a job".to_string());
                }
                if self.phone.as_deref().is_none_or(is_blank) {
                    return Err("Workers must provide a phone number".to_string());
                }
            }
            Role::Client => {
                self.job = None;
                self.phone = None;
            }
            Role::Admin => {
                return Err("Admin accounts cannot be created through signup".to_string());
            }
        }

        Ok(self)
    }
}

/// Used internally once the hosted auth service has issued a user id.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub role: Role,
    pub job: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl CreateProfile {
    pub fn from_signup(user_id: Uuid, req: SignupRequest) -> Self {
        Self {
            user_id,
            name: req.name,
            email: Some(req.email),
            address: req.address,
            role: req.role,
            job: req.job,
            phone: req.phone,
            description: req.description,
        }
    }
}

/// Body of `PUT /api/profiles/me`: one bulk update of the editable fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub job: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl UpdateProfile {
    /// Rejects blanked-out required fields and drops worker-only fields for
    /// everybody else.
    ///
    /// Workers keep the signup rule: job and phone may be left out of the
    /// update but never cleared.
    pub fn validate_for(mut self, role: Role) -> Result<Self, String> {
        if self.name.as_deref().is_some_and(is_blank) {
            return Err("Name cannot be empty".to_string());
        }
        if self.address.as_deref().is_some_and(is_blank) {
            return Err("Address cannot be empty".to_string());
        }
        if role == Role::Worker {
            if self.job.as_deref().is_some_and(is_blank) {
                return Err("Workers must choose a job".to_string());
            }
            if self.phone.as_deref().is_some_and(is_blank) {
                return Err("Workers must provide a phone number".to_string());
            }
        } else {
            self.job = None;
            self.phone = None;
        }
        Ok(self)
    }
}

/// Body of `PUT /api/profiles/me/picture`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProfilePicture {
    pub image_id: Uuid,
}

/// Row of the admin user listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserRow {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTimeUtc,
}

impl From<Model> for AdminUserRow {
    fn from(m: Model) -> Self {
        Self {
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Minimal worker entry for the service-request form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerOption {
    pub user_id: Uuid,
    pub name: String,
    pub job: Option<String>,
}

impl From<Model> for WorkerOption {
    fn from(m: Model) -> Self {
        Self {
            user_id: m.user_id,
            name: m.name,
            job: m.job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(role: Role) -> SignupRequest {
        SignupRequest {
            email: "sami@example.com".to_string(),
            password: "hunter22".to_string(),
            name: "Sami".to_string(),
            address: "Tunis".to_string(),
            role,
            job: Some("Frigoriste".to_string()),
            phone: Some("+216 20 000 000".to_string()),
            description: None,
        }
    }

    #[test]
    fn worker_signup_requires_job_and_phone() {
        let mut req = signup(Role::Worker);
        req.phone = Some("  ".to_string());
        assert!(req.validate().is_err());

        let mut req = signup(Role::Worker);
        req.job = None;
        assert!(req.validate().is_err());

        assert!(signup(Role::Worker).validate().is_ok());
    }

    #[test]
    fn client_signup_drops_worker_fields() {
        let req = signup(Role::Client).validate().unwrap();
        assert!(req.job.is_none());
        assert!(req.phone.is_none());
    }

    #[test]
    fn admin_cannot_sign_up() {
        assert!(signup(Role::Admin).validate().is_err());
    }

    #[test]
    fn blank_required_field_is_named_in_error() {
        let mut req = signup(Role::Client);
        req.address = String::new();
        assert_eq!(req.validate().unwrap_err(), "Field 'address' is required");
    }

    #[test]
    fn profile_update_ignores_job_for_clients() {
        let update = UpdateProfile {
            job: Some("Plaquiste".to_string()),
            phone: Some("123".to_string()),
            ..Default::default()
        };
        let update = update.validate_for(Role::Client).unwrap();
        assert!(update.job.is_none() && update.phone.is_none());
    }

    #[test]
    fn worker_update_cannot_blank_job_or_phone() {
        let blank_job = UpdateProfile {
            job: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            blank_job.validate_for(Role::Worker).unwrap_err(),
            "Workers must choose a job"
        );

        let blank_phone = UpdateProfile {
            phone: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            blank_phone.validate_for(Role::Worker).unwrap_err(),
            "Workers must provide a phone number"
        );

        let untouched = UpdateProfile {
            name: Some("Sami".to_string()),
            ..Default::default()
        };
        let kept = untouched.validate_for(Role::Worker).unwrap();
        assert!(kept.job.is_none() && kept.phone.is_none());

        let changed = UpdateProfile {
            job: Some("Frigoriste".to_string()),
            phone: Some("+216 20 000 000".to_string()),
            ..Default::default()
        };
        assert!(changed.validate_for(Role::Worker).is_ok());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Worker).unwrap(), "\"worker\"");
    }
}
