use serde::{Deserialize, Serialize};

use crate::utils::object_id::ObjectId;

/// Persisted user record, stored as JSON in the `user` table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identity-provider issued id, also the storage key
    #[serde(rename = "vid")]
    pub id: ObjectId,
    /// Access token issued by the identity provider
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub email: String,
    /// Account tier
    #[serde(default)]
    pub class: i32,
    #[serde(default)]
    pub info: UserInfo,
}

/// Profile fields shown to other users
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub gender: i32,
}

impl UserRecord {
    pub fn new(id: ObjectId, token: String, email: String, info: UserInfo) -> Self {
        Self {
            id,
            token,
            email,
            class: 0,
            info,
        }
    }
}

/// Outward view of a user; never carries the provider token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub class: i32,
    pub info: UserInfo,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            email: record.email,
            class: record.class,
            info: record.info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserRecord {
        UserRecord::new(
            "507f1f77bcf86cd799439011".parse().unwrap(),
            "tok1".to_string(),
            "a@b.com".to_string(),
            UserInfo {
                name: "Alice".to_string(),
                avatar: "http://x/a.png".to_string(),
                bio: "bio".to_string(),
                gender: 1,
            },
        )
    }

    #[test]
    fn test_persisted_field_names() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["vid"], "507f1f77bcf86cd799439011");
        assert_eq!(value["token"], "tok1");
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["class"], 0);
        assert_eq!(value["info"]["name"], "Alice");
        assert_eq!(value["info"]["avatar"], "http://x/a.png");
        assert_eq!(value["info"]["bio"], "bio");
        assert_eq!(value["info"]["gender"], 1);
    }

    #[test]
    fn test_decode_legacy_record_with_missing_fields() {
        let json = r#"{"vid":"507f1f77bcf86cd799439011","token":"t"}"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.token, "t");
        assert_eq!(record.class, 0);
        assert_eq!(record.info, UserInfo::default());
    }

    #[test]
    fn test_view_hides_token() {
        let view = UserView::from(sample());
        let json = serde_json::to_string(&view).unwrap();

        assert_eq!(view.id, "507f1f77bcf86cd799439011");
        assert!(!json.contains("tok1"));
    }
}
