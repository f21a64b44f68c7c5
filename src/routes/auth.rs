use crate::{
    auth::{generate_token, hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::{User, UserProfile},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token. Fails with
/// 400 when the username or email is already taken; the password is stored only
/// as a bcrypt hash.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let username = register_data.username.trim().to_string();
    let email = register_data.email.trim().to_lowercase();

    // Explicit pre-check; the unique indexes on users back this against races.
    let existing_user: Option<i32> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&email)
            .bind(&username)
            .fetch_optional(&**pool)
            .await?;

    if existing_user.is_some() {
        return Err(AppError::DuplicateIdentity(
            "User with this email or username already exists".into(),
        ));
    }

    let password_hash = hash_password(&register_data.password)?;

    let user: UserProfile = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)
         RETURNING id, username, email",
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = generate_token(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "User registered successfully".into(),
        token,
        user,
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown emails and
/// wrong passwords produce the same 401 so accounts cannot be enumerated.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let email = login_data.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at, updated_at
         FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&**pool)
    .await?;

    let user = user.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_token(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: user.into(),
    }))
}
