use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::ListingQuery;
use crate::models::{
    LoginRequest, MessageResponse, NewUser, ProfileResponse, ProfileUpdate, ProfileUpdateRequest, RegisterRequest,
    Role, TenantDashboardResponse, TokenResponse, User,
};
use crate::routes::guard::{AuthUser, StaffUser};
use crate::routes::{error_response, internal_error, validation_error, AppState};
use crate::services::JwtService;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Listings shown on the tenant dashboard
pub const TENANT_RECENT_LIMIT: i64 = 6;

/// Configure registration, login and profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
        .route("/auth/profile", web::get().to(get_profile))
        .route("/auth/profile", web::put().to(update_profile))
        .route("/dashboard", web::get().to(dashboard))
        .route("/tenant/dashboard", web::get().to(tenant_dashboard));
}

/// Reason a login is refused even though the password matched
pub fn login_refusal(user: &User, requested: Role) -> Option<&'static str> {
    if !user.is_active {
        return Some("Account is deactivated. Please contact support.");
    }
    match requested {
        Role::Admin if user.role != Role::Admin => Some("Access denied. Admin privileges required."),
        Role::Landlord if !matches!(user.role, Role::Landlord | Role::Admin) => {
            Some("Access denied. Landlord account required.")
        }
        _ => None,
    }
}

/// Dashboard path for a signed-in staff role
pub fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/api/v1/admin/dashboard",
        _ => "/api/v1/landlord/dashboard",
    }
}

/// Register a tenant or landlord account
///
/// POST /api/v1/auth/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }
    if req.password != req.confirm_password {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", "Passwords do not match");
    }
    if req.role == Role::Admin {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", "Invalid account type");
    }

    match state.postgres.find_conflicting_user(&req.username, &req.email).await {
        Ok(Some(existing)) => {
            let message = if existing.username == req.username {
                "Username already exists"
            } else {
                "Email already registered"
            };
            return error_response(StatusCode::CONFLICT, "Conflict", message);
        }
        Ok(None) => {}
        Err(e) => return internal_error("Registration failed", e),
    }

    let password_hash = match state.hasher.hash(&req.password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("Registration failed", e),
    };

    let req = req.into_inner();
    let new_user = NewUser {
        username: req.username,
        email: req.email,
        password_hash,
        full_name: req.full_name,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
        role: req.role,
    };

    match state.postgres.create_user(&new_user).await {
        Ok(_) => HttpResponse::Created().json(MessageResponse::ok("Registration successful! Please log in.")),
        Err(e) => internal_error("Registration failed", e),
    }
}

/// Log in with username or email
///
/// POST /api/v1/auth/login
async fn login(
    state: web::Data<AppState>,
    jwt: web::Data<JwtService>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let user = match state.postgres.find_user_by_login(&req.username).await {
        Ok(Some(user)) if state.hasher.verify(&req.password, &user.password_hash) => user,
        Ok(_) => {
            tracing::info!("Failed login for {}", req.username);
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid username or password");
        }
        Err(e) => return internal_error("Login failed", e),
    };

    if let Some(reason) = login_refusal(&user, req.user_type) {
        tracing::info!("Login refused for {}: {}", user.username, reason);
        return error_response(StatusCode::FORBIDDEN, "Forbidden", reason);
    }

    if let Err(e) = state.postgres.record_login(user.id).await {
        tracing::warn!("Could not record login time for {}: {}", user.username, e);
    }

    let token = match jwt.create_token(user.id, &user.username, user.role) {
        Ok(token) => token,
        Err(e) => return internal_error("Login failed", e),
    };

    tracing::info!("User {} logged in as {}", user.username, user.role);

    HttpResponse::Ok().json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.ttl_secs(),
        role: user.role,
        username: user.username.clone(),
        message: format!("Welcome back, {}!", user.full_name),
    })
}

async fn get_profile(state: web::Data<AppState>, auth: AuthUser) -> impl Responder {
    match state.postgres.get_user(auth.user_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(ProfileResponse { user }),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Not found", "User not found"),
        Err(e) => internal_error("Failed to load profile", e),
    }
}

/// Check a password change and hash the new password
fn new_password_hash(
    state: &AppState,
    user: &User,
    req: &ProfileUpdateRequest,
) -> Result<Option<String>, HttpResponse> {
    if !req.wants_password_change() {
        return Ok(None);
    }

    let current = req.current_password.as_deref().unwrap_or_default();
    let new = req.new_password.as_deref().unwrap_or_default();
    let confirm = req.confirm_password.as_deref().unwrap_or_default();

    if !state.hasher.verify(current, &user.password_hash) {
        return Err(error_response(StatusCode::BAD_REQUEST, "Validation failed", "Current password is incorrect"));
    }
    if new != confirm {
        return Err(error_response(StatusCode::BAD_REQUEST, "Validation failed", "New passwords do not match"));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "New password must be at least 6 characters long",
        ));
    }

    state
        .hasher
        .hash(new)
        .map(Some)
        .map_err(|e| internal_error("Failed to update profile", e))
}

async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<ProfileUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.postgres.email_taken_by_other(&req.email, auth.user_id).await {
        Ok(true) => return error_response(StatusCode::CONFLICT, "Conflict", "Email already in use by another account"),
        Ok(false) => {}
        Err(e) => return internal_error("Failed to update profile", e),
    }

    let user = match state.postgres.get_user(auth.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Not found", "User not found"),
        Err(e) => return internal_error("Failed to update profile", e),
    };

    let password_hash = match new_password_hash(&state, &user, &req) {
        Ok(hash) => hash,
        Err(response) => return response,
    };

    let req = req.into_inner();
    let update = ProfileUpdate {
        email: req.email,
        full_name: req.full_name,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
        password_hash,
    };

    match state.postgres.update_profile(auth.user_id, &update).await {
        Ok(()) => {
            tracing::info!("User {} updated their profile", auth.username);
            HttpResponse::Ok().json(MessageResponse::ok("Profile updated successfully"))
        }
        Err(e) => internal_error("Failed to update profile", e),
    }
}

/// Home page for any signed-in account
async fn tenant_dashboard(auth: AuthUser, state: web::Data<AppState>) -> impl Responder {
    let user = match state.postgres.get_user(auth.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Not found", "User not found"),
        Err(e) => return internal_error("Failed to load dashboard", e),
    };

    let recent_listings = match state
        .postgres
        .find_listings(&ListingQuery::recent(TENANT_RECENT_LIMIT))
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Tenant dashboard for {} without listings: {}", auth.username, e);
            Vec::new()
        }
    };

    HttpResponse::Ok().json(TenantDashboardResponse { user, recent_listings })
}

/// Send staff to the dashboard for their role
async fn dashboard(user: StaffUser) -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, dashboard_path(user.role)))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, is_active: bool) -> User {
        User {
            id: 1,
            username: "abena".to_string(),
            email: "abena@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Abena Mensah".to_string(),
            phone: None,
            role,
            is_active,
            created_at: chrono::Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_tenant_login_allowed_for_everyone_active() {
        for role in [Role::Admin, Role::Landlord, Role::Tenant] {
            assert_eq!(login_refusal(&user(role, true), Role::Tenant), None);
        }
    }

    #[test]
    fn test_admin_login_requires_admin() {
        assert!(login_refusal(&user(Role::Landlord, true), Role::Admin).is_some());
        assert_eq!(login_refusal(&user(Role::Admin, true), Role::Admin), None);
    }

    #[test]
    fn test_landlord_login_allows_admin() {
        assert_eq!(login_refusal(&user(Role::Admin, true), Role::Landlord), None);
        assert!(login_refusal(&user(Role::Tenant, true), Role::Landlord).is_some());
    }

    #[test]
    fn test_inactive_accounts_refused() {
        assert!(login_refusal(&user(Role::Tenant, false), Role::Tenant).is_some());
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(dashboard_path(Role::Admin), "/api/v1/admin/dashboard");
        assert_eq!(dashboard_path(Role::Landlord), "/api/v1/landlord/dashboard");
    }
}
