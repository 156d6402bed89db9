use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a stored or submitted code is not part of a closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

/// Closed set of property types a listing can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "single-room")]
    SingleRoom,
    #[serde(rename = "chamber-and-hall")]
    ChamberAndHall,
    #[serde(rename = "self-contained")]
    SelfContained,
    #[serde(rename = "1-bedroom")]
    OneBedroom,
    #[serde(rename = "2-bedroom")]
    TwoBedroom,
    #[serde(rename = "3-bedroom")]
    ThreeBedroom,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::SingleRoom,
        PropertyType::ChamberAndHall,
        PropertyType::SelfContained,
        PropertyType::OneBedroom,
        PropertyType::TwoBedroom,
        PropertyType::ThreeBedroom,
    ];

    /// Canonical code, as stored in `houses.property_type`
    pub fn code(&self) -> &'static str {
        match self {
            PropertyType::SingleRoom => "single-room",
            PropertyType::ChamberAndHall => "chamber-and-hall",
            PropertyType::SelfContained => "self-contained",
            PropertyType::OneBedroom => "1-bedroom",
            PropertyType::TwoBedroom => "2-bedroom",
            PropertyType::ThreeBedroom => "3-bedroom",
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.code())
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PropertyType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|pt| pt.code() == s)
            .ok_or_else(|| UnknownCode {
                kind: "property type",
                value: s.to_string(),
            })
    }
}

/// Build status of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionStatus {
    #[default]
    Completed,
    UnderConstruction,
}

impl CompletionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "completed",
            CompletionStatus::UnderConstruction => "under-construction",
        }
    }
}

impl FromStr for CompletionStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(CompletionStatus::Completed),
            "under-construction" => Ok(CompletionStatus::UnderConstruction),
            other => Err(UnknownCode {
                kind: "completion status",
                value: other.to_string(),
            }),
        }
    }
}

/// Account role, stored as the `user_role` Postgres enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Landlord,
    #[default]
    Tenant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Landlord => "landlord",
            Role::Tenant => "tenant",
        };
        f.write_str(name)
    }
}

/// Turn a code such as `2-bedroom` or `chamber_and_hall` into `2 Bedroom` /
/// `Chamber And Hall`
pub fn display_name(code: &str) -> String {
    code.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A rental listing with its joined region and neighborhood names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub price: i64,
    #[serde(default)]
    pub region_id: Option<i64>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub neighborhood_id: Option<i64>,
    #[serde(default)]
    pub neighborhood_name: Option<String>,
    #[serde(default)]
    pub exact_location: Option<String>,
    #[serde(default)]
    pub completion_status: CompletionStatus,
    #[serde(default)]
    pub months_left: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Listing {
    /// Title-cased property type, e.g. `2 Bedroom`
    pub fn type_display(&self) -> String {
        self.property_type.display_name()
    }
}

/// Write model for creating or replacing a listing
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub region_id: Option<i64>,
    pub neighborhood_id: Option<i64>,
    pub exact_location: Option<String>,
    pub property_type: PropertyType,
    pub completion_status: CompletionStatus,
    pub months_left: Option<i32>,
    pub price: i64,
    pub is_featured: bool,
    pub image_paths: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: i64,
    pub region_id: Option<i64>,
    pub name: String,
}

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

/// Write model for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Admin edit of an account
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

/// Self-service profile edit; `password_hash` is set only on a password change
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

/// Row of the admin "recent signups" table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

/// Row of the admin "recent properties" table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentProperty {
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<String>,
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub property_type: String,
    pub count: i64,
}

/// Admin dashboard metrics; all-zero when the store could not be read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminMetrics {
    pub total_users: i64,
    pub landlords_count: i64,
    pub tenants_count: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub weekly_signups: i64,
    pub monthly_signups: i64,
    pub retention_rate: f64,
    pub total_properties: i64,
    pub featured_properties: i64,
    pub property_types: Vec<TypeCount>,
    pub recent_signups: Vec<UserSummary>,
    pub recent_properties: Vec<RecentProperty>,
}

/// Share of accounts older than 30 days that logged in within the last 30
/// days, as a percentage rounded to one decimal
pub fn retention_rate(retained_users: i64, old_users: i64) -> f64 {
    if old_users <= 0 {
        return 0.0;
    }
    let rate = retained_users as f64 / old_users as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}
