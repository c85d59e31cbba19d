//! JWT session auth for the gateway.
//!
//! Staff log in with their profile id and PIN and receive a bearer token
//! whose subject is the profile's owner identity. The middleware verifies
//! the token on every protected route, resolves the staff profile behind
//! the identity, and injects it into request extensions so handlers know
//! who is acting.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core_types::StaffId;
use crate::error::{TransitError, TransitResult};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, error_codes};
use crate::staff::{StaffDirectory, StaffProfile};

/// Default session lifetime: 12 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 12 * 3600;

/// JWT claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner identity of the staff profile (IdP subject).
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// Staff profile resolved by the auth middleware, available to handlers
/// via `Extension<AuthedStaff>`.
#[derive(Debug, Clone)]
pub struct AuthedStaff(pub StaffProfile);

/// Login request payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Staff profile id (ULID).
    #[schema(value_type = String, example = "01J8ZC3DM2V5W8XQR0YHBFK4TN")]
    pub staff_id: StaffId,
    /// Six digit workflow PIN.
    #[schema(example = "483921")]
    pub pin: String,
}

/// Login response: bearer token plus the authenticated profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffProfile,
}

/// Issues and verifies session tokens.
pub struct AuthService {
    directory: Arc<StaffDirectory>,
    jwt_secret: String,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(directory: Arc<StaffDirectory>, jwt_secret: String, token_ttl_secs: i64) -> Self {
        Self {
            directory,
            jwt_secret,
            token_ttl_secs,
        }
    }

    /// Authenticate a staff member by id + PIN and mint a session token.
    pub async fn login(&self, req: LoginRequest) -> TransitResult<LoginResponse> {
        let staff = self.directory.authenticate(req.staff_id, &req.pin).await?;
        if !staff.active {
            return Err(TransitError::NotAuthorized(
                "staff profile is deactivated".to_string(),
            ));
        }
        let token = self.issue_token(&staff.owner_identity)?;
        tracing::info!(staff_id = %staff.id, role = staff.role.as_str(), "session token issued");
        Ok(LoginResponse { token, staff })
    }

    /// Mint a signed token for an owner identity.
    pub fn issue_token(&self, owner_identity: &str) -> TransitResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: owner_identity.to_string(),
            exp: (now + self.token_ttl_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| TransitError::Storage(format!("jwt encoding failed: {e}")))
    }

    /// Decode and validate a token, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

/// JWT authentication middleware for protected routes.
///
/// Verifies the bearer token, resolves the staff profile behind the
/// token subject, rejects deactivated profiles, and injects both the
/// claims and the resolved [`AuthedStaff`] into request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::MISSING_AUTH,
                    "Missing or malformed Authorization header",
                )),
            ));
        }
    };

    let claims = match state.auth.verify_token(token) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("token verification failed: {e}");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::AUTH_FAILED,
                    "Invalid or expired token",
                )),
            ));
        }
    };

    let staff = match state.directory.get_profile_by_identity(&claims.sub).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!(identity = %claims.sub, "token subject has no staff profile");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::AUTH_FAILED,
                    "No staff profile for this identity",
                )),
            ));
        }
        Err(e) => {
            tracing::error!("staff lookup failed during auth: {e}");
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Staff directory unavailable",
                )),
            ));
        }
    };

    if !staff.active {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(
                error_codes::NOT_AUTHORIZED,
                "Staff profile is deactivated",
            )),
        ));
    }

    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(AuthedStaff(staff));
    Ok(next.run(req).await)
}
