//! Supabase Storage client for the image gallery.

use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Storage rejected the request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    supabase_url: String,
    bucket: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(supabase_url: &str, bucket: &str, service_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            supabase_url: supabase_url.to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }

    /// Upload `bytes` to `path` inside the bucket.
    pub async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let response = self
            .client
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.supabase_url, self.bucket, path
            ))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        check(response).await
    }

    /// Public URL of an object in a public bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url, self.bucket, path
        )
    }

    /// Object path inside our bucket for one of our public URLs.
    pub fn path_from_public_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = format!(
            "{}/storage/v1/object/public/{}/",
            self.supabase_url, self.bucket
        );
        url.strip_prefix(prefix.as_str()).filter(|p| !p.is_empty())
    }

    pub async fn remove(&self, path: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(format!(
                "{}/storage/v1/object/{}",
                self.supabase_url, self.bucket
            ))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({ "prefixes": [path] }))
            .send()
            .await?;

        check(response).await
    }
}

async fn check(response: reqwest::Response) -> Result<(), StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(StorageError::Rejected {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    })
}

/// `{user_id}/{millis}-{name}` with the name reduced to a safe charset.
///
/// The timestamp keeps re-uploads of the same file name from colliding.
pub fn object_path(user_id: Uuid, file_name: &str, now_millis: i64) -> Option<String> {
    let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let clean = clean.trim_matches('.');

    if clean.is_empty() {
        return None;
    }
    Some(format!("{user_id}/{now_millis}-{clean}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new("https://abcd.supabase.co", "user-images", "key")
    }

    #[test]
    fn public_url_round_trips_to_path() {
        let storage = client();
        let url = storage.public_url("u1/17-photo.png");
        assert_eq!(
            url,
            "https://abcd.supabase.co/storage/v1/object/public/user-images/u1/17-photo.png"
        );
        assert_eq!(storage.path_from_public_url(&url), Some("u1/17-photo.png"));
    }

    #[test]
    fn foreign_urls_have_no_path() {
        let storage = client();
        assert_eq!(
            storage.path_from_public_url("https://cdn.example.com/u1/photo.png"),
            None
        );
        assert_eq!(
            storage.path_from_public_url(
                "https://abcd.supabase.co/storage/v1/object/public/other-bucket/u1/p.png"
            ),
            None
        );
    }

    #[test]
    fn object_path_strips_directories_and_odd_characters() {
        let user = Uuid::nil();
        assert_eq!(
            object_path(user, "../../etc/my photo (1).jpg", 42).unwrap(),
            format!("{user}/42-my_photo__1_.jpg")
        );
        assert_eq!(object_path(user, "C:\\pics\\a.png", 1).unwrap(), format!("{user}/1-a.png"));
        assert!(object_path(user, "..", 1).is_none());
        assert!(object_path(user, "", 1).is_none());
    }
}
