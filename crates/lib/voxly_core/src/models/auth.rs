//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! shapes in `voxly_api::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a user relative to the viewing user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[default]
    None,
    Friend,
    Blocked,
    OutgoingRequest,
    IncomingRequest,
    BlockedByOther,
}

impl Relationship {
    /// Stable numeric code used for storage.
    pub fn code(self) -> i16 {
        match self {
            Relationship::None => 0,
            Relationship::Friend => 1,
            Relationship::Blocked => 2,
            Relationship::OutgoingRequest => 3,
            Relationship::IncomingRequest => 4,
            Relationship::BlockedByOther => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Some(match code {
            0 => Relationship::None,
            1 => Relationship::Friend,
            2 => Relationship::Blocked,
            3 => Relationship::OutgoingRequest,
            4 => Relationship::IncomingRequest,
            5 => Relationship::BlockedByOther,
            _ => return None,
        })
    }
}

/// Domain user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt hash. Never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
    pub is_bot: bool,
    pub is_online: bool,
    pub relationship: Relationship,
}

/// JWT claims embedded in bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Not before (unix timestamp).
    pub nbf: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_defaults_to_none() {
        assert_eq!(Relationship::default(), Relationship::None);
    }

    #[test]
    fn relationship_codes_are_stable() {
        for code in 0..=5 {
            let rel = Relationship::from_code(code).expect("known code");
            assert_eq!(rel.code(), code);
        }
        assert!(Relationship::from_code(6).is_none());
        assert!(Relationship::from_code(-1).is_none());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$04$secret".into(),
            registered_at: Utc::now(),
            is_bot: false,
            is_online: false,
            relationship: Relationship::None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"relationship\":\"none\""));
    }

    #[test]
    fn claims_use_user_id_key() {
        let claims = TokenClaims {
            user_id: "u1".into(),
            iat: 1,
            nbf: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["exp"], 2);
    }
}
