//! Shared bearer-token validation for Mind Stream services
//!
//! Tokens are issued by the authentication service; everything in this crate
//! only *validates* them. Validation is RS256 only, so a service never accepts
//! a symmetric (HS256) token even if one is presented with a forged header.
//!
//! ## Usage
//!
//! Services call `initialize_jwt_validation_only()` once during startup:
//!
//! ```rust,ignore
//! use crypto_core::jwt;
//!
//! let public_key = jwt::load_validation_key()?;
//! jwt::initialize_jwt_validation_only(&public_key)?;
//! let user_id = jwt::get_user_id_from_token(token)?;
//! ```

use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(any(test, feature = "test-support"))]
use jsonwebtoken::{encode, EncodingKey, Header};

// ============================================================================
// Constants
// ============================================================================

/// JWT algorithm accepted by every service
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Environment variable holding the PEM encoded public key
pub const PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY_PEM";

/// Only access tokens authenticate API calls
pub const ACCESS_TOKEN_TYPE: &str = "access";

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure issued by the authentication service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Username at the time of issuance
    pub username: String,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

#[cfg(any(test, feature = "test-support"))]
static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Read the validation key from `JWT_PUBLIC_KEY_PEM`.
///
/// Keys passed through container env files often have their newlines escaped,
/// so literal `\n` sequences are expanded before parsing.
pub fn load_validation_key() -> Result<String> {
    let raw = std::env::var(PUBLIC_KEY_ENV)
        .map_err(|_| anyhow!("{PUBLIC_KEY_ENV} environment variable not set"))?;

    if raw.trim().is_empty() {
        return Err(anyhow!("{PUBLIC_KEY_ENV} is empty"));
    }

    Ok(raw.replace("\\n", "\n"))
}

/// Initialize JWT keys for validation-only services
///
/// Can only be called once per process; a second call returns an error.
pub fn initialize_jwt_validation_only(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

/// Initialize both halves of the key pair (tests only)
#[cfg(any(test, feature = "test-support"))]
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    initialize_jwt_validation_only(public_key_pem)
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_validation_only() during startup.")
    })
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token
///
/// Verifies the RS256 signature and the expiration time. The token must not
/// carry the `Bearer ` prefix.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate an access token and return its claims.
///
/// Refresh tokens are rejected even when their signature is valid.
pub fn validate_access_token(token: &str) -> Result<Claims> {
    let token_data = validate_token(token)?;
    if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
        return Err(anyhow!(
            "Expected an access token, got '{}'",
            token_data.claims.token_type
        ));
    }
    Ok(token_data.claims)
}

/// Extract user ID from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

// ============================================================================
// Token minting for tests
// ============================================================================

/// Mint a token the way the authentication service does (tests only)
#[cfg(any(test, feature = "test-support"))]
pub fn generate_token(
    user_id: Uuid,
    username: &str,
    token_type: &str,
    ttl: chrono::Duration,
) -> Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        token_type: token_type.to_string(),
        username: username.to_string(),
    };

    let encoding_key = JWT_ENCODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT encoding key not initialized"))?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate token: {e}"))
}

/// Mint a one hour access token (tests only)
#[cfg(any(test, feature = "test-support"))]
pub fn generate_access_token(user_id: Uuid, username: &str) -> Result<String> {
    generate_token(user_id, username, ACCESS_TOKEN_TYPE, chrono::Duration::hours(1))
}

// ============================================================================
// Tests
// ============================================================================
