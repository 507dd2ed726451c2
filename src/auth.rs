use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use crate::constants::*;
use crate::errors::ApiError;
use crate::models::{LoginPayload, PublicUser, RegisterPayload, User};
use crate::storage::{SharedStorage, Storage, load_records, save_records};

async fn load_users(storage: &dyn Storage) -> Vec<User> {
    load_records(storage, REGISTRY_SCOPE, USERS_FILE).await
}

async fn create_user(
    storage: &dyn Storage,
    username: &str,
    password: &str,
) -> Result<PublicUser, ApiError> {
    let mut users = load_users(storage).await;

    if users
        .iter()
        .any(|u| u.username.eq_ignore_ascii_case(username))
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;

    users.push(User {
        id,
        username: username.to_string(),
        password_hash: hash,
    });
    save_records(storage, REGISTRY_SCOPE, USERS_FILE, &users).await?;

    Ok(PublicUser {
        id,
        username: username.to_string(),
    })
}

pub async fn register(
    State(storage): State<SharedStorage>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    // Input validation
    if payload.username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if payload.username.len() < MIN_USERNAME_LENGTH || payload.username.len() > MAX_USERNAME_LENGTH
    {
        return Err(ApiError::BadRequest(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !payload
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }

    let user = create_user(storage.as_ref(), &payload.username, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn login(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    // Input validation
    if payload.username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }

    let users = load_users(storage.as_ref()).await;
    let user = match users.into_iter().find(|u| u.username == payload.username) {
        Some(user) => user,
        None => return Err(ApiError::Unauthorized("Invalid credentials".to_string())),
    };

    let is_valid = verify_password(&payload.password, &user.password_hash)?;
    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    // Set user session
    session
        .insert("user_id", user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store session: {}", e))?;
    session
        .insert("username", user.username.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store session: {}", e))?;

    Ok((
        StatusCode::OK,
        Json(PublicUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

pub async fn get_current_user(session: &Session) -> Result<PublicUser, ApiError> {
    let user_id: Option<i64> = session
        .get("user_id")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read session: {}", e))?;

    let username: Option<String> = session
        .get("username")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read session: {}", e))?;

    match (user_id, username) {
        (Some(id), Some(name)) => Ok(PublicUser { id, username: name }),
        _ => Err(ApiError::Unauthorized(ERR_UNAUTHORIZED.to_string())),
    }
}

pub async fn me(session: Session) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let user = get_current_user(&session).await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn logout(session: Session) -> Result<StatusCode, ApiError> {
    session.clear().await;

    Ok(StatusCode::NO_CONTENT)
}
