use serde::{Deserialize, Serialize};
use crate::models::domain::{AdminMetrics, Listing, Region, Role, User};

/// Response body of `POST /chatbot`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotResponse {
    pub response: String,
    pub properties: Vec<Listing>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain acknowledgement for writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Issued after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
    pub username: String,
    pub message: String,
}

/// Home page data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedResponse {
    pub featured_houses: Vec<Listing>,
    pub regions: Vec<Region>,
}

/// Listing created by a dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCreatedResponse {
    pub success: bool,
    pub id: i64,
    pub image_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandlordDashboardResponse {
    pub properties: Vec<Listing>,
}

/// Signed-in home page: the account plus the newest listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantDashboardResponse {
    pub user: User,
    pub recent_listings: Vec<Listing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboardResponse {
    pub users_count: i64,
    pub metrics: AdminMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}
