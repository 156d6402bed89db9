use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CompletionStatus, NewListing, PropertyType, Role};

/// Image reference used when a listing has no images of its own
pub const PLACEHOLDER_IMAGE: &str = "house_placeholder.jpg";

/// Chatbot message; a missing `message` is treated as empty input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Account registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Login by username or email; `user_type` selects which dashboard is wanted
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub user_type: Role,
}

/// Self-service profile edit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl ProfileUpdateRequest {
    /// Both the current and the new password were supplied
    pub fn wants_password_change(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.current_password) && filled(&self.new_password)
    }
}

/// Admin edit of another account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
}

/// Listing create/edit form shared by the admin and landlord dashboards
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListingForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region_id: Option<i64>,
    #[serde(default)]
    pub neighborhood_id: Option<i64>,
    #[serde(default)]
    pub exact_location: Option<String>,
    pub property_type: PropertyType,
    #[serde(default)]
    pub completion_status: CompletionStatus,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub months_left: Option<i32>,
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    pub is_featured: bool,
    /// Image references to attach
    #[serde(default)]
    pub image_paths: Vec<String>,
    /// Existing image references to drop on edit
    #[serde(default)]
    pub delete_images: Vec<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl ListingForm {
    /// Images for a brand new listing
    pub fn initial_images(&self) -> Vec<String> {
        self.merged_images(&[])
    }

    /// Keep current images minus `delete_images`, then append the new ones.
    /// An empty result falls back to the placeholder image.
    pub fn merged_images(&self, current: &[String]) -> Vec<String> {
        let mut images: Vec<String> = current
            .iter()
            .filter(|img| !self.delete_images.contains(*img) && img.as_str() != PLACEHOLDER_IMAGE)
            .cloned()
            .collect();
        images.extend(self.image_paths.iter().filter(|p| !p.is_empty()).cloned());

        if images.is_empty() {
            images.push(PLACEHOLDER_IMAGE.to_string());
        }
        images
    }

    /// Build the write model with the given featured flag and image set
    pub fn into_new_listing(self, is_featured: bool, image_paths: Vec<String>) -> NewListing {
        NewListing {
            title: self.title,
            description: self.description,
            region_id: self.region_id,
            neighborhood_id: self.neighborhood_id,
            exact_location: self.exact_location,
            property_type: self.property_type,
            completion_status: self.completion_status,
            months_left: self.months_left,
            price: self.price,
            is_featured,
            image_paths,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
        }
    }
}

/// Query string of the public listings page. Values arrive as strings because
/// the browse form submits empty fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilterParams {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        ListingForm {
            title: "Cosy room".to_string(),
            description: None,
            region_id: Some(1),
            neighborhood_id: None,
            exact_location: None,
            property_type: PropertyType::SingleRoom,
            completion_status: CompletionStatus::Completed,
            months_left: None,
            price: 400,
            is_featured: false,
            image_paths: vec![],
            delete_images: vec![],
            contact_name: None,
            contact_phone: None,
            contact_email: None,
        }
    }

    #[test]
    fn test_new_listing_without_images_gets_placeholder() {
        assert_eq!(form().initial_images(), vec![PLACEHOLDER_IMAGE.to_string()]);
    }

    #[test]
    fn test_merged_images_drops_deleted_and_appends_new() {
        let mut f = form();
        f.delete_images = vec!["house_1/a.jpg".to_string()];
        f.image_paths = vec!["house_1/c.jpg".to_string()];
        let current = vec!["house_1/a.jpg".to_string(), "house_1/b.jpg".to_string()];

        assert_eq!(
            f.merged_images(&current),
            vec!["house_1/b.jpg".to_string(), "house_1/c.jpg".to_string()]
        );
    }

    #[test]
    fn test_deleting_every_image_restores_placeholder() {
        let mut f = form();
        f.delete_images = vec!["house_1/a.jpg".to_string()];
        let current = vec!["house_1/a.jpg".to_string()];

        assert_eq!(f.merged_images(&current), vec![PLACEHOLDER_IMAGE.to_string()]);
    }

    #[test]
    fn test_chat_request_missing_message_is_empty() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            username: "kofi".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            confirm_password: "123".to_string(),
            full_name: "Kofi Mensah".to_string(),
            phone: None,
            role: Role::Tenant,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_password_change_requires_both_fields() {
        let mut req = ProfileUpdateRequest {
            email: "a@b.com".to_string(),
            full_name: "A".to_string(),
            phone: None,
            current_password: Some("old".to_string()),
            new_password: None,
            confirm_password: None,
        };
        assert!(!req.wants_password_change());
        req.new_password = Some("newpass".to_string());
        assert!(req.wants_password_change());
    }
}
