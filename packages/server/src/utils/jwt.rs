use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Company session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Company email
    pub cid: i32,    // Company ID
    pub iat: usize,  // Issued-at timestamp
    pub exp: usize,  // Expiration timestamp
}

/// Sign a new session token for a company.
pub fn sign(company_id: i32, email: &str, secret: &str, ttl_days: i64) -> Result<String> {
    let now = Utc::now();
    let expiration = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: email.to_owned(),
        cid: company_id,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a company session token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
