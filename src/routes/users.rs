use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::models::{NewUser, User};
use crate::password;
use crate::state::SharedState;
use crate::validation::{self, parse_date, Rule, Validate, ValidationErrors};

/// Missing keys and explicit `null`s deserialize to empty strings so that
/// presence is decided by validation rather than by the JSON decoder.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUser {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub birthday: String,
}

/// Partial update. An empty, `null` or missing field leaves the stored value alone.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUser {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub birthday: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validation::run(&[
            ("username", self.username.as_str(), Rule::Required),
            ("password", self.password.as_str(), Rule::Required),
            ("phone", self.phone.as_str(), Rule::Required),
            ("email", self.email.as_str(), Rule::Required),
            ("email", self.email.as_str(), Rule::Email),
            ("birthday", self.birthday.as_str(), Rule::Date),
        ])
    }
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validation::run(&[
            ("email", self.email.as_str(), Rule::Email),
            ("birthday", self.birthday.as_str(), Rule::Date),
        ])
    }
}

impl UpdateUser {
    /// Copy every non-empty field onto `user`. On error `user` may be partly
    /// modified and must not be persisted.
    fn apply(self, user: &mut User) -> Result<(), AppError> {
        if !self.email.is_empty() {
            user.email = self.email;
        }
        if !self.password.is_empty() {
            user.password_hash = password::hash(&self.password).map_err(AppError::Internal)?;
        }
        if !self.first_name.is_empty() {
            user.first_name = self.first_name;
        }
        if !self.last_name.is_empty() {
            user.last_name = self.last_name;
        }
        if !self.username.is_empty() {
            user.username = self.username;
        }
        if !self.birthday.is_empty() {
            user.birthday = Some(parse_birthday(&self.birthday)?);
        }
        if !self.phone.is_empty() {
            user.phone = self.phone;
        }
        Ok(())
    }
}

fn parse_birthday(raw: &str) -> Result<chrono::NaiveDate, AppError> {
    parse_date(raw).ok_or_else(|| AppError::Internal(format!("Unparseable birthday: {raw}")))
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid user id: {raw}")))
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.list().await?;
    Ok(Json(users))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    let user = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user))
}

pub async fn create(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate()?;

    let password_hash = password::hash(&req.password).map_err(AppError::Internal)?;
    let birthday = match req.birthday.as_str() {
        "" => None,
        raw => Some(parse_birthday(raw)?),
    };

    let user = state
        .store
        .create(NewUser {
            username: req.username,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            email: req.email,
            birthday,
        })
        .await?;

    tracing::info!(user_id = user.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    req.validate()?;

    let mut user = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    req.apply(&mut user)?;

    let user = state.store.update(&user).await?.ok_or(AppError::NotFound)?;

    tracing::info!(user_id = user.user_id, "User updated");
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    let user = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    // A concurrent delete can remove the row between the fetch and here.
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = user.user_id, "User deleted");
    Ok(Json(user))
}
