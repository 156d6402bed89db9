//! Rental listing service
//!
//! Public listing browse, role-gated admin and landlord dashboards, and a
//! keyword-driven chatbot that turns free-text questions into listing filters.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{classify, respond, ChatQuery, ChatResponder, ChatResponse, Intent, ListingLookup, ListingQuery};
pub use crate::models::{ChatRequest, ChatbotResponse, Listing, PropertyType, Region, Role};
