use tracing::info;

use super::{SupabaseClient, SupabaseError, ensure_success};

pub const DJ_AVATARS_BUCKET: &str = "dj-avatars";
pub const PRODUCER_AVATARS_BUCKET: &str = "producer-avatars";
pub const DJ_MEDIA_BUCKET: &str = "dj-media";
pub const MEDIA_BUCKET: &str = "media";

impl SupabaseClient {
    /// Upload `bytes` to `bucket/path` and return the object's public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let key = self.service_role_key("Storage")?;
        let path = path.trim_start_matches('/');

        let response = self
            .client
            .post(self.url(&format!("/storage/v1/object/{bucket}/{path}")))
            .header("apikey", key)
            .bearer_auth(key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        ensure_success(response).await?;
        info!("Uploaded {bucket}/{path}");

        Ok(self.public_url(bucket, path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }
}

/// File extension of an uploaded file name, lowercased; `bin` when there is none.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

/// `{prefix}_{owner}_{millis}.{ext}`, the naming used for avatar objects.
pub fn avatar_object_path(prefix: &str, owner: &uuid::Uuid, millis: i64, file_name: &str) -> String {
    format!("{prefix}_{owner}_{millis}.{}", file_extension(file_name))
}

/// `payment-receipts/{event}/{dj}/{millis}.{ext}`
pub fn receipt_object_path(
    event_id: &uuid::Uuid,
    dj_id: Option<&uuid::Uuid>,
    millis: i64,
    file_name: &str,
) -> String {
    match dj_id {
        Some(dj) => format!(
            "payment-receipts/{event_id}/{dj}/{millis}.{}",
            file_extension(file_name)
        ),
        None => format!(
            "payment-receipts/{event_id}/{millis}.{}",
            file_extension(file_name)
        ),
    }
}
