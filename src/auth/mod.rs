pub mod authorization;
pub mod jwks;
pub mod jwt;
pub mod middleware;

use crate::config::SupabaseConfig;
use jwks::JwksCache;
use jwt::Claims;

/// How bearer tokens are checked: the project's JWKS keys, or a shared HS256 secret.
#[derive(Clone)]
pub enum TokenVerifier {
    Jwks(JwksCache),
    Hs256(String),
}

impl TokenVerifier {
    pub fn from_config(config: &SupabaseConfig) -> Self {
        match &config.jwt_secret {
            Some(secret) => TokenVerifier::Hs256(secret.clone()),
            None => TokenVerifier::Jwks(JwksCache::new(&config.url, &config.anon_key)),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
            TokenVerifier::Hs256(secret) => jwt::validate_token(token, secret),
        }
    }
}
