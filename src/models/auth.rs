use serde::{Deserialize, Serialize};

use crate::models::user::{UserInfo, UserRecord, UserView};

#[derive(Debug, Deserialize)]
pub struct LoginUrlRequest {
    pub return_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUrlResponse {
    pub success: bool,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Deserialize)]
pub struct UserGetQuery {
    pub api_key: String,
    pub id: String,
}

#[derive(Deserialize)]
pub struct UserAddQuery {
    pub api_key: String,
    pub id: String,
    pub token: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub gender: i32,
}

#[derive(Deserialize)]
pub struct UserTokenQuery {
    pub api_key: String,
    pub id: String,
    pub token: String,
}

/// Full record including the provider token; admin endpoints only
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecordResponse {
    pub success: bool,
    pub user: UserRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl UserAddQuery {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            gender: self.gender,
        }
    }
}
