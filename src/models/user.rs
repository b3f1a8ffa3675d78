use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub is_active: bool,
}

/// A row ready for insertion. `user_id` and `is_active` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

impl NewUser {
    pub fn into_user(self, user_id: i32) -> User {
        User {
            user_id,
            username: self.username,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            birthday: self.birthday,
            is_active: false,
        }
    }
}
