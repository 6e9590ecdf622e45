use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::app_error::{AppError, AppResult};
use secrecy::ExposeSecret;

/// Marketplace session claims. Tokens are minted by the account service that
/// shares `JWT_SECRET`; its legacy claim names are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "id", deserialize_with = "user_id_from_number_or_string")]
    pub sub: i64,
    #[serde(alias = "tipo_usuario", default)]
    pub user_type: Option<String>,
    #[serde(alias = "isAdmin", default)]
    pub is_admin: bool,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

fn user_id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Mints a token the way the account service does. Tests only.
#[cfg(test)]
pub fn issue(
    user_id: i64,
    user_type: Option<&str>,
    is_admin: bool,
    secret: &secrecy::SecretString,
    ttl: time::Duration,
) -> AppResult<String> {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use time::OffsetDateTime;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let exp = now + ttl.whole_seconds();
    let claims = Claims {
        sub: user_id,
        user_type: user_type.map(str::to_owned),
        is_admin,
        iat: now,
        exp,
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::InvalidCredentials
    })
}
