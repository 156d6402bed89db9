// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    display_name, retention_rate, AdminMetrics, CompletionStatus, Listing, Neighborhood, NewListing, NewUser,
    ProfileUpdate, PropertyType, RecentProperty, Region, Role, TypeCount, UnknownCode, User, UserSummary,
    UserUpdate,
};
pub use requests::{
    ChatRequest, ListingFilterParams, ListingForm, LoginRequest, ProfileUpdateRequest, RegisterRequest,
    UserUpdateRequest, PLACEHOLDER_IMAGE,
};
pub use responses::{
    AdminDashboardResponse, ChatbotResponse, ErrorResponse, FeaturedResponse, HealthResponse,
    LandlordDashboardResponse, ListingCreatedResponse, MessageResponse, ProfileResponse, TenantDashboardResponse,
    TokenResponse,
};
