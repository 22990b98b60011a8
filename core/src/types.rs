//! Payload records returned by the API and the token request body.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two. Fields the service may omit
//! or send as `null` are `Option` or `#[serde(default)]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node (forum section).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: u64,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub topics: u64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub last_modified: i64,
}

/// A topic as listed under a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_rendered: String,
    #[serde(default)]
    pub syntax: u8,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub last_reply_by: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub last_touched: i64,
}

/// A topic with its author, node and supplements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_rendered: String,
    #[serde(default)]
    pub syntax: u8,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub last_reply_by: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub last_touched: i64,
    pub member: Member,
    pub node: Node,
    #[serde(default)]
    pub supplements: Vec<Supplement>,
}

/// Text appended to a topic after it was posted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplement {
    pub id: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_rendered: String,
    #[serde(default)]
    pub syntax: u8,
    #[serde(default)]
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub id: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_rendered: String,
    #[serde(default)]
    pub created: i64,
    pub member: Member,
}

/// Public view of a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub psn: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub btc: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_mini: Option<String>,
    #[serde(default)]
    pub avatar_normal: Option<String>,
    #[serde(default)]
    pub avatar_large: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub last_modified: i64,
}

/// The authenticated member's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub psn: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub btc: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    #[serde(default)]
    pub member_id: u64,
    #[serde(default)]
    pub for_member_id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub payload_rendered: Option<String>,
    #[serde(default)]
    pub created: i64,
    pub member: NotificationMember,
}

/// The member who triggered a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationMember {
    pub username: String,
}

/// Details of the token used to authenticate the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenInfo {
    pub token: String,
    pub scope: TokenScope,
    pub expiration: u64,
    #[serde(default)]
    pub good_for_days: u64,
    #[serde(default)]
    pub total_used: u64,
    #[serde(default)]
    pub last_used: i64,
    #[serde(default)]
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedToken {
    pub token: String,
}

/// Body of `POST /tokens`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateToken {
    pub scope: TokenScope,
    pub expiration: TokenExpiration,
}

/// Access breadth granted to a generated token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Regular,
    Everything,
}

/// Lifetime of a generated token. Serialized as a number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenExpiration {
    Days30,
    Days60,
    Days90,
    Days180,
}

impl TokenExpiration {
    pub const ALL: [TokenExpiration; 4] = [
        TokenExpiration::Days30,
        TokenExpiration::Days60,
        TokenExpiration::Days90,
        TokenExpiration::Days180,
    ];

    pub fn as_secs(self) -> u64 {
        match self {
            TokenExpiration::Days30 => 2_592_000,
            TokenExpiration::Days60 => 5_184_000,
            TokenExpiration::Days90 => 7_776_000,
            TokenExpiration::Days180 => 15_552_000,
        }
    }

    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_secs() == secs)
    }
}

impl Serialize for TokenExpiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_secs())
    }
}

impl<'de> Deserialize<'de> for TokenExpiration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        TokenExpiration::from_secs(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported token expiration: {secs}s")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_scope_wire_values() {
        assert_eq!(serde_json::to_value(TokenScope::Regular).unwrap(), "regular");
        assert_eq!(serde_json::to_value(TokenScope::Everything).unwrap(), "everything");
        let scope: TokenScope = serde_json::from_str(r#""everything""#).unwrap();
        assert_eq!(scope, TokenScope::Everything);
    }

    #[test]
    fn token_expiration_wire_values() {
        let secs: Vec<u64> = TokenExpiration::ALL.iter().map(|e| e.as_secs()).collect();
        assert_eq!(secs, vec![2592000, 5184000, 7776000, 15552000]);
        assert_eq!(serde_json::to_value(TokenExpiration::Days90).unwrap(), 7776000);
    }

    #[test]
    fn token_expiration_rejects_unknown_seconds() {
        assert!(serde_json::from_str::<TokenExpiration>("86400").is_err());
        assert_eq!(
            serde_json::from_str::<TokenExpiration>("5184000").unwrap(),
            TokenExpiration::Days60
        );
    }

    #[test]
    fn create_token_body_shape() {
        let body = CreateToken {
            scope: TokenScope::Regular,
            expiration: TokenExpiration::Days30,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"scope": "regular", "expiration": 2592000})
        );
    }

    #[test]
    fn node_tolerates_nulls_and_missing_fields() {
        let node: Node = serde_json::from_str(
            r#"{"id":1,"name":"go","title":"Go","topics":100,"header":null,"extra":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(node.id, 1);
        assert_eq!(node.topics, 100);
        assert_eq!(node.header, None);
        assert_eq!(node.url, "");
    }

    #[test]
    fn node_requires_identity_fields() {
        assert!(serde_json::from_str::<Node>(r#"{"title":"Go"}"#).is_err());
    }
}
