//! Handlers for the `/auth` resource.
//!
//! Sign-up, sign-in, refresh and reset-code verification all end in
//! [`create_auth_response`], which writes one session row per issued
//! refresh token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use fleetcheck_core::error::CoreError;
use fleetcheck_core::roles::ROLE_INSPECTOR;
use fleetcheck_core::types::DbId;
use fleetcheck_db::models::profile::Profile;
use fleetcheck_db::models::reset_code::CreateResetCode;
use fleetcheck_db::models::session::CreateSession;
use fleetcheck_db::models::user::{CreateAccount, User};
use fleetcheck_db::repositories::{ProfileRepo, ResetCodeRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::reset_code::{
    generate_reset_code, hash_reset_code, MAX_CODE_ATTEMPTS, RESET_CODE_TTL_MINS,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Consecutive failed sign-ins before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_CODE: &str = "Invalid or expired code";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub username: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Tokens plus the caller's profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub profile: Profile,
}

/// Body of the always-accepted reset request.
#[derive(Debug, Serialize)]
pub struct ResetAccepted {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Self-registration always creates an `inspector`; managers are created
/// through `/admin/users`.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;
    let email = normalize_email(&input.email);
    let full_name = input.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Full name is required".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let (user, profile) = UserRepo::create_with_profile(
        &state.pool,
        &CreateAccount {
            email,
            password_hash,
            full_name,
            role: ROLE_INSPECTOR.to_string(),
            username: non_blank(input.username),
            staff_id: non_blank(input.staff_id),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User signed up");

    let response = create_auth_response(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    ensure_can_sign_in(&user)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed sign-ins");
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let profile = load_profile(&state, user.id).await?;
    tracing::info!(user_id = user.id, "User signed in");

    Ok(Json(create_auth_response(&state, profile).await?))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented session is revoked and a new
/// one is issued. A refresh token is accepted at most once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let profile = load_profile(&state, user.id).await?;
    Ok(Json(create_auth_response(&state, profile).await?))
}

/// POST /api/v1/auth/sign-out
pub async fn sign_out(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/reset-password
///
/// Always answers 202 so the endpoint cannot be used to discover which emails
/// have accounts.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<(StatusCode, Json<ResetAccepted>)> {
    input.validate()?;
    let email = normalize_email(&input.email);

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        let (code, code_hash) = generate_reset_code();
        ResetCodeRepo::replace(
            &state.pool,
            &CreateResetCode {
                user_id: user.id,
                code_hash,
                expires_at: Utc::now() + Duration::minutes(RESET_CODE_TTL_MINS),
            },
        )
        .await?;

        match &state.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send_reset_code(&user.email, &code).await {
                    tracing::error!(user_id = user.id, error = %e, "Failed to send reset code");
                }
            }
            None => {
                tracing::warn!(user_id = user.id, "Reset code issued but SMTP is not configured");
            }
        }
    } else {
        tracing::debug!("Reset requested for unknown email");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ResetAccepted {
            message: "If the account exists, a reset code has been sent",
        }),
    ))
}

/// POST /api/v1/auth/verify-code
///
/// Exchanges a valid, unused reset code for a session. The code is consumed,
/// any sign-in lockout is cleared and existing sessions are revoked. Each
/// guess spends one of the code's [`MAX_CODE_ATTEMPTS`] attempts.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CODE.into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;
    let code = ResetCodeRepo::claim_attempt(&state.pool, user.id, MAX_CODE_ATTEMPTS)
        .await?
        .ok_or_else(invalid)?;
    if code.code_hash != hash_reset_code(&input.code) {
        if code.attempts >= MAX_CODE_ATTEMPTS {
            tracing::warn!(user_id = user.id, "Reset code exhausted by wrong guesses");
        }
        return Err(invalid());
    }
    if !ResetCodeRepo::mark_used(&state.pool, code.id).await? {
        return Err(invalid());
    }
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let profile = load_profile(&state, user.id).await?;
    tracing::info!(user_id = user.id, revoked, "Reset code verified");

    Ok(Json(create_auth_response(&state, profile).await?))
}

/// POST /api/v1/auth/update-password
///
/// Every other session of the caller is revoked; the one that made the
/// request stays valid.
pub async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, auth_user.user_id, &password_hash).await? {
        return Err(AppError::not_found("User", auth_user.user_id));
    }
    let revoked =
        SessionRepo::revoke_all_except(&state.pool, auth_user.user_id, auth_user.session_id)
            .await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "Password updated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_can_sign_in(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }
    Ok(())
}

async fn load_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("User {user_id} has no profile")))
}

/// Persist a new session and issue an access token bound to it.
async fn create_auth_response(state: &AppState, profile: Profile) -> AppResult<AuthResponse> {
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: profile.user_id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    let access_token =
        generate_access_token(profile.user_id, &profile.role, session.id, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_expires_in(),
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ops@Depot.Example "), "ops@depot.example");
    }

    #[test]
    fn blank_optionals_become_none() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" jd ".into())), Some("jd".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn sign_up_validation_catches_bad_email_and_short_password() {
        let req = SignUpRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            full_name: "A".into(),
            username: None,
            staff_id: None,
        };
        let errs = req.validate().unwrap_err();
        let fields = errs.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
