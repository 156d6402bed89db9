use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::ListingQuery;
use crate::models::{
    AdminDashboardResponse, AdminMetrics, ListingCreatedResponse, ListingForm, MessageResponse, UserUpdate,
    UserUpdateRequest,
};
use crate::routes::guard::AdminUser;
use crate::routes::{error_response, internal_error, validation_error, AppState};

/// Configure admin dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/dashboard", web::get().to(dashboard))
        .route("/admin/houses", web::get().to(list_houses))
        .route("/admin/houses", web::post().to(create_house))
        .route("/admin/houses/{id}", web::get().to(get_house))
        .route("/admin/houses/{id}", web::put().to(update_house))
        .route("/admin/houses/{id}", web::delete().to(delete_house))
        .route("/admin/users", web::get().to(list_users))
        .route("/admin/users/{id}", web::get().to(get_user))
        .route("/admin/users/{id}", web::put().to(update_user))
        .route("/admin/users/{id}", web::delete().to(delete_user));
}

fn listing_not_found(id: i64) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "Not found", format!("Property {} not found", id))
}

fn user_not_found(id: i64) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "Not found", format!("User {} not found", id))
}

/// Site metrics; a store failure is logged and answered with zeroed figures
async fn dashboard(state: web::Data<AppState>, admin: AdminUser) -> impl Responder {
    let metrics = match state.postgres.admin_metrics().await {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::error!("Failed to load admin metrics for {}: {}", admin.username, e);
            AdminMetrics::default()
        }
    };

    HttpResponse::Ok().json(AdminDashboardResponse {
        users_count: metrics.total_users,
        metrics,
    })
}

async fn list_houses(state: web::Data<AppState>, _admin: AdminUser) -> impl Responder {
    match state.postgres.find_listings(&ListingQuery::default()).await {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(e) => internal_error("Failed to load properties", e),
    }
}

async fn get_house(state: web::Data<AppState>, _admin: AdminUser, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.postgres.get_listing(id).await {
        Ok(Some(listing)) => HttpResponse::Ok().json(listing),
        Ok(None) => listing_not_found(id),
        Err(e) => internal_error("Failed to load property", e),
    }
}

async fn create_house(
    state: web::Data<AppState>,
    admin: AdminUser,
    form: web::Json<ListingForm>,
) -> impl Responder {
    if let Err(errors) = form.validate() {
        return validation_error(errors);
    }

    let form = form.into_inner();
    let images = form.initial_images();
    let image_count = images.len();
    let is_featured = form.is_featured;
    let listing = form.into_new_listing(is_featured, images);

    match state.postgres.create_listing(&listing, admin.user_id).await {
        Ok(id) => HttpResponse::Created().json(ListingCreatedResponse {
            success: true,
            id,
            image_count,
        }),
        Err(e) => internal_error("Failed to add property", e),
    }
}

async fn update_house(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i64>,
    form: web::Json<ListingForm>,
) -> impl Responder {
    if let Err(errors) = form.validate() {
        return validation_error(errors);
    }

    let id = path.into_inner();
    let current = match state.postgres.get_listing(id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return listing_not_found(id),
        Err(e) => return internal_error("Failed to update property", e),
    };

    let form = form.into_inner();
    let images = form.merged_images(&current.image_paths);
    let is_featured = form.is_featured;
    let listing = form.into_new_listing(is_featured, images);

    match state.postgres.update_listing(id, &listing, None).await {
        Ok(true) => HttpResponse::Ok().json(MessageResponse::ok("Property updated successfully")),
        Ok(false) => listing_not_found(id),
        Err(e) => internal_error("Failed to update property", e),
    }
}

async fn delete_house(state: web::Data<AppState>, admin: AdminUser, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.postgres.delete_listing(id, None).await {
        Ok(true) => {
            tracing::info!("Admin {} deleted property {}", admin.username, id);
            HttpResponse::Ok().json(MessageResponse::ok("Property deleted successfully"))
        }
        Ok(false) => listing_not_found(id),
        Err(e) => internal_error("Failed to delete property", e),
    }
}

async fn list_users(state: web::Data<AppState>, _admin: AdminUser) -> impl Responder {
    match state.postgres.list_users().await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => internal_error("Failed to load users", e),
    }
}

async fn get_user(state: web::Data<AppState>, _admin: AdminUser, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.postgres.get_user(id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => user_not_found(id),
        Err(e) => internal_error("Failed to load user", e),
    }
}

async fn update_user(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<i64>,
    req: web::Json<UserUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let id = path.into_inner();
    match state.postgres.email_taken_by_other(&req.email, id).await {
        Ok(true) => return error_response(StatusCode::CONFLICT, "Conflict", "Email already in use by another account"),
        Ok(false) => {}
        Err(e) => return internal_error("Failed to update user", e),
    }

    let req = req.into_inner();
    let update = UserUpdate {
        email: req.email,
        full_name: req.full_name,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
        role: req.role,
        is_active: req.is_active,
    };

    match state.postgres.update_user(id, &update).await {
        Ok(true) => {
            tracing::info!("Admin {} updated user {}", admin.username, id);
            HttpResponse::Ok().json(MessageResponse::ok("User updated successfully"))
        }
        Ok(false) => user_not_found(id),
        Err(e) => internal_error("Failed to update user", e),
    }
}

async fn delete_user(state: web::Data<AppState>, admin: AdminUser, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    if id == admin.user_id {
        return error_response(StatusCode::BAD_REQUEST, "Bad request", "You cannot delete your own account");
    }

    match state.postgres.delete_user(id).await {
        Ok(true) => {
            tracing::info!("Admin {} deleted user {}", admin.username, id);
            HttpResponse::Ok().json(MessageResponse::ok("User deleted successfully"))
        }
        Ok(false) => user_not_found(id),
        Err(e) => internal_error("Failed to delete user", e),
    }
}
