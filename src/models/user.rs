use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account type for marketplace users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Farmer,
    Buyer,
}

impl UserType {
    /// Convert from stored string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "farmer" => Ok(UserType::Farmer),
            "buyer" => Ok(UserType::Buyer),
            _ => Err(format!("Invalid user type: {}", s)),
        }
    }

    /// Convert to stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Farmer => "farmer",
            UserType::Buyer => "buyer",
        }
    }
}

impl From<String> for UserType {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(UserType::Farmer)
    }
}

impl From<UserType> for String {
    fn from(user_type: UserType) -> Self {
        user_type.as_str().to_string()
    }
}

/// User model representing a marketplace profile
///
/// Credentials are not stored here; authentication is handled outside
/// the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub user_type: String, // Stored as text, use UserType enum for type safety
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload for a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    pub location: Option<String>,
}

impl User {
    /// Get user type as an enum
    pub fn user_type_enum(&self) -> UserType {
        UserType::from_str(&self.user_type).unwrap_or(UserType::Farmer)
    }

    /// Check if the user is a farmer
    pub fn is_farmer(&self) -> bool {
        self.user_type_enum() == UserType::Farmer
    }
}
