use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::ListingQuery;
use crate::models::{LandlordDashboardResponse, ListingCreatedResponse, ListingForm, MessageResponse};
use crate::routes::guard::LandlordUser;
use crate::routes::{error_response, internal_error, validation_error, AppState};

/// Configure landlord dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/landlord/dashboard", web::get().to(dashboard))
        .route("/landlord/properties", web::post().to(create_property))
        .route("/landlord/properties/{id}", web::put().to(update_property))
        .route("/landlord/properties/{id}", web::delete().to(delete_property));
}

fn not_owned() -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "Not found", "Property not found or access denied")
}

async fn dashboard(state: web::Data<AppState>, landlord: LandlordUser) -> impl Responder {
    match state.postgres.find_listings(&ListingQuery::owned_by(landlord.user_id)).await {
        Ok(properties) => HttpResponse::Ok().json(LandlordDashboardResponse { properties }),
        Err(e) => internal_error("Failed to load your properties", e),
    }
}

/// New landlord listings are never featured
async fn create_property(
    state: web::Data<AppState>,
    landlord: LandlordUser,
    form: web::Json<ListingForm>,
) -> impl Responder {
    if let Err(errors) = form.validate() {
        return validation_error(errors);
    }

    let form = form.into_inner();
    let images = form.initial_images();
    let image_count = images.len();
    let listing = form.into_new_listing(false, images);

    match state.postgres.create_listing(&listing, landlord.user_id).await {
        Ok(id) => HttpResponse::Created().json(ListingCreatedResponse {
            success: true,
            id,
            image_count,
        }),
        Err(e) => internal_error("Failed to add property", e),
    }
}

/// Edit an owned listing; the stored featured flag is kept
async fn update_property(
    state: web::Data<AppState>,
    landlord: LandlordUser,
    path: web::Path<i64>,
    form: web::Json<ListingForm>,
) -> impl Responder {
    if let Err(errors) = form.validate() {
        return validation_error(errors);
    }

    let id = path.into_inner();
    let current = match state.postgres.get_owned_listing(id, landlord.user_id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return not_owned(),
        Err(e) => return internal_error("Failed to update property", e),
    };

    let form = form.into_inner();
    let images = form.merged_images(&current.image_paths);
    let listing = form.into_new_listing(current.is_featured, images);

    match state.postgres.update_listing(id, &listing, Some(landlord.user_id)).await {
        Ok(true) => HttpResponse::Ok().json(MessageResponse::ok("Property updated successfully")),
        Ok(false) => not_owned(),
        Err(e) => internal_error("Failed to update property", e),
    }
}

async fn delete_property(
    state: web::Data<AppState>,
    landlord: LandlordUser,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match state.postgres.delete_listing(id, Some(landlord.user_id)).await {
        Ok(true) => {
            tracing::info!("Landlord {} deleted property {}", landlord.username, id);
            HttpResponse::Ok().json(MessageResponse::ok("Property deleted successfully"))
        }
        Ok(false) => not_owned(),
        Err(e) => internal_error("Failed to delete property", e),
    }
}
