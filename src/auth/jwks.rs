use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::Claims;

const JWKS_PATH: &str = "/auth/v1/.well-known/jwks.json";
const KEY_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct JwkSet {
    #[serde(default)]
    keys: Vec<Jwk>,
}

/// The EC fields Supabase publishes for its signing keys.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    alg: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

#[derive(Clone)]
struct JwksKeyData {
    x: String,
    y: String,
    algorithm: Algorithm,
}

impl TryFrom<Jwk> for JwksKeyData {
    type Error = String;

    fn try_from(jwk: Jwk) -> Result<Self, Self::Error> {
        let algorithm = match jwk.alg.as_deref() {
            Some("ES384") => Algorithm::ES384,
            _ => Algorithm::ES256,
        };
        Ok(Self {
            x: jwk.x.ok_or("Missing 'x' in JWK")?,
            y: jwk.y.ok_or("Missing 'y' in JWK")?,
            algorithm,
        })
    }
}

/// Supabase signing keys fetched from the project's JWKS endpoint, cached per `kid`.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(KEY_TTL)
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: format!("{}{JWKS_PATH}", supabase_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwk = self
            .fetch_jwks()
            .await?
            .keys
            .into_iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;
        let key_data = JwksKeyData::try_from(jwk)?;

        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key_data = self.get_key_data(&kid).await?;

        let decoding_key = DecodingKey::from_ec_components(&key_data.x, &key_data.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key_data.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
