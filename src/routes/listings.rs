use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};

use crate::core::ListingQuery;
use crate::models::{FeaturedResponse, HealthResponse, ListingFilterParams, PropertyType};
use crate::routes::{error_response, internal_error, AppState};

/// Listings shown on the landing page
pub const FEATURED_LIMIT: i64 = 6;

/// Configure public browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/listings/featured", web::get().to(featured))
        .route("/listings", web::get().to(browse))
        .route("/listings/{id}", web::get().to(get_listing))
        .route("/regions", web::get().to(regions))
        .route("/neighborhoods", web::get().to(neighborhoods));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn featured(state: web::Data<AppState>) -> impl Responder {
    let featured_houses = match state.postgres.find_listings(&ListingQuery::recent(FEATURED_LIMIT)).await {
        Ok(rows) => rows,
        Err(e) => return internal_error("Failed to load listings", e),
    };
    let regions = match state.postgres.list_regions().await {
        Ok(regions) => regions,
        Err(e) => return internal_error("Failed to load regions", e),
    };

    HttpResponse::Ok().json(FeaturedResponse {
        featured_houses,
        regions,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Turn browse parameters into a listing query; empty values are ignored
pub fn browse_query(params: &ListingFilterParams) -> Result<ListingQuery, String> {
    let mut query = ListingQuery::default();

    if let Some(region) = non_empty(&params.region) {
        query.region_id = Some(region.parse().map_err(|_| format!("Invalid region: {}", region))?);
    }
    if let Some(code) = non_empty(&params.property_type) {
        let property_type: PropertyType = code.parse().map_err(|e| format!("{}", e))?;
        query.property_types = vec![property_type];
    }
    if let Some(min) = non_empty(&params.min_price) {
        query.min_price = Some(min.parse().map_err(|_| format!("Invalid minimum price: {}", min))?);
    }
    if let Some(max) = non_empty(&params.max_price) {
        query.max_price = Some(max.parse().map_err(|_| format!("Invalid maximum price: {}", max))?);
    }

    Ok(query)
}

/// Filtered browse
///
/// GET /api/v1/listings?region=1&property_type=2-bedroom&min_price=500&max_price=3000
async fn browse(state: web::Data<AppState>, params: web::Query<ListingFilterParams>) -> impl Responder {
    let query = match browse_query(&params) {
        Ok(query) => query,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, "Invalid filter", message),
    };

    match state.postgres.find_listings(&query).await {
        Ok(listings) => {
            tracing::debug!("Browse returned {} listings", listings.len());
            HttpResponse::Ok().json(listings)
        }
        Err(e) => internal_error("Failed to load listings", e),
    }
}

async fn get_listing(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.postgres.get_listing(id).await {
        Ok(Some(listing)) => HttpResponse::Ok().json(listing),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Not found", format!("Listing {} not found", id)),
        Err(e) => internal_error("Failed to load listing", e),
    }
}

async fn regions(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_regions().await {
        Ok(regions) => HttpResponse::Ok().json(regions),
        Err(e) => internal_error("Failed to load regions", e),
    }
}

async fn neighborhoods(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_neighborhoods().await {
        Ok(neighborhoods) => HttpResponse::Ok().json(neighborhoods),
        Err(e) => internal_error("Failed to load neighborhoods", e),
    }
}
