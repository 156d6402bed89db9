//! Bearer-token extractors for signed-in routes.
//!
//! `AuthUser` accepts any valid token; the role wrappers additionally check the
//! role carried in the token claims.

use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use std::future::{ready, Ready};
use std::ops::Deref;
use thiserror::Error;

use crate::models::{ErrorResponse, Role};
use crate::services::JwtService;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Please log in to access this page")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access denied")]
    Forbidden,

    #[error("Token service not configured")]
    Misconfigured,
}

impl ResponseError for GuardError {
    fn status_code(&self) -> StatusCode {
        match self {
            GuardError::MissingToken | GuardError::InvalidToken => StatusCode::UNAUTHORIZED,
            GuardError::Forbidden => StatusCode::FORBIDDEN,
            GuardError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Identity taken from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, GuardError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or(GuardError::Misconfigured)?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(GuardError::MissingToken)?
        .to_str()
        .map_err(|_| GuardError::InvalidToken)?;

    // Accept both "Bearer <token>" and a raw token
    let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value).trim();
    if token.is_empty() {
        return Err(GuardError::MissingToken);
    }

    let claims = jwt.verify_token(token).map_err(|e| {
        tracing::debug!("Rejected token on {}: {}", req.path(), e);
        GuardError::InvalidToken
    })?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.username,
        role: claims.role,
    })
}

fn authorize(req: &HttpRequest, allowed: &[Role]) -> Result<AuthUser, GuardError> {
    let user = authenticate(req)?;
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        tracing::info!("User {} ({}) denied access to {}", user.username, user.role, req.path());
        Err(GuardError::Forbidden)
    }
}

impl FromRequest for AuthUser {
    type Error = GuardError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

macro_rules! role_guard {
    ($(#[$meta:meta])* $name:ident, [$($role:expr),+]) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequest for $name {
            type Error = GuardError;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(authorize(req, &[$($role),+]).map($name))
            }
        }

        impl Deref for $name {
            type Target = AuthUser;

            fn deref(&self) -> &AuthUser {
                &self.0
            }
        }
    };
}

role_guard!(
    /// Admin accounts only
    AdminUser,
    [Role::Admin]
);
role_guard!(
    /// Landlord accounts only
    LandlordUser,
    [Role::Landlord]
);
role_guard!(
    /// Admins and landlords
    StaffUser,
    [Role::Admin, Role::Landlord]
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn jwt() -> JwtService {
        JwtService::new("guard-secret", "rental-service".to_string(), 1)
    }

    fn request_with(token: Option<String>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(web::Data::new(jwt()));
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
        }
        req.to_http_request()
    }

    #[actix_web::test]
    async fn test_valid_token_is_accepted() {
        let token = jwt().create_token(3, "esi", Role::Tenant).unwrap();
        let req = request_with(Some(token));

        let user = AuthUser::from_request(&req, &mut Payload::None).await.unwrap();
        assert_eq!(user.user_id, 3);
        assert_eq!(user.username, "esi");
        assert_eq!(user.role, Role::Tenant);
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let req = request_with(None);
        let err = AuthUser::from_request(&req, &mut Payload::None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_tampered_token_is_unauthorized() {
        let req = request_with(Some("not.a.token".to_string()));
        let err = AuthUser::from_request(&req, &mut Payload::None).await.unwrap_err();
        assert!(matches!(err, GuardError::InvalidToken));
    }

    #[actix_web::test]
    async fn test_role_guards() {
        let landlord = jwt().create_token(5, "kwame", Role::Landlord).unwrap();
        let req = request_with(Some(landlord));

        let err = AdminUser::from_request(&req, &mut Payload::None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(LandlordUser::from_request(&req, &mut Payload::None).await.is_ok());
        assert!(StaffUser::from_request(&req, &mut Payload::None).await.is_ok());

        let admin = jwt().create_token(1, "root", Role::Admin).unwrap();
        let req = request_with(Some(admin));
        let staff = StaffUser::from_request(&req, &mut Payload::None).await.unwrap();
        assert_eq!(staff.role, Role::Admin);
        assert!(LandlordUser::from_request(&req, &mut Payload::None).await.is_err());
    }

    #[actix_web::test]
    async fn test_missing_service_is_server_error() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        let err = AuthUser::from_request(&req, &mut Payload::None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
