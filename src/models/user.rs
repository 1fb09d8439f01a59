//! User identity, credential claims and session types

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Library roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: Role,
}

/// Login response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Claims carried by the credential token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(rename = "id", alias = "userId", alias = "user_id")]
    pub user_id: String,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl UserClaims {
    /// Read the token payload without checking its signature.
    ///
    /// The backing service verifies the signature on every request; the decoded
    /// claims only drive what the client chooses to display.
    pub fn decode_unverified(token: &str) -> AppResult<Self> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let data = decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| AppError::Decode(e.to_string()))?;
        Ok(data.claims)
    }
}

/// Identity of the logged-in user, derived from the persisted credential.
///
/// Fields are only reachable through accessors so the identity never drifts
/// from the token it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    claims: UserClaims,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        let claims = UserClaims::decode_unverified(&token)?;
        Ok(Self { token, claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &UserClaims {
        &self.claims
    }

    pub fn user_id(&self) -> &str {
        &self.claims.user_id
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn is_admin(&self) -> bool {
        self.claims.role == Role::Admin
    }

    pub fn is_member(&self) -> bool {
        self.claims.role == Role::Member
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.claims.iat.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.exp.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(false, |exp| exp <= now)
    }
}
