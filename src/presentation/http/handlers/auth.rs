//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};
use crate::application::dto::response::{
    MessageResponse, ProfileResponse, RegisterResponse, TokenResponse,
};
use crate::application::services::{AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::PgUserRepository;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> impl AuthService {
    AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.publisher.clone(),
        state.snowflake.clone(),
        state.settings.jwt.clone(),
    )
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    validate(&body)?;

    let user = auth_service(&state)
        .register(&body.email, &body.name, &body.password)
        .await?;

    let response = RegisterResponse {
        message: "Registration successful. Please check your email to verify your account."
            .to_string(),
        user: ProfileResponse::from(user),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Verify an email address
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate(&body)?;

    auth_service(&state).verify_email(&body.token).await?;

    Ok(Json(MessageResponse::new(
        "Email verified successfully. You can now log in.",
    )))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate(&body)?;

    let token = auth_service(&state)
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Request a password reset
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    validate(&body)?;

    auth_service(&state).forgot_password(&body.email).await?;

    // Same answer whether or not the email is registered.
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "If this email is registered, a reset link has been sent.",
        )),
    ))
}

/// Reset the password with a reset token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate(&body)?;

    auth_service(&state)
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset.")))
}
