//! Static keyword tables and reply texts used by the chatbot.
//!
//! Every table is matched by plain substring against the lowercased message.
//! Order matters: the first entry whose phrase appears wins.

use crate::models::{display_name, PropertyType};

/// Canonical property-type code recognised in chat messages.
///
/// `Apartment` is not a stored type; it widens to [`APARTMENT_BUCKET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Listed(PropertyType),
    Apartment,
}

/// Stored types an "apartment" request expands to
pub const APARTMENT_BUCKET: [PropertyType; 3] = [
    PropertyType::TwoBedroom,
    PropertyType::ThreeBedroom,
    PropertyType::SelfContained,
];

impl TypeCode {
    pub fn code(&self) -> &'static str {
        match self {
            TypeCode::Listed(pt) => pt.code(),
            TypeCode::Apartment => "apartment",
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.code())
    }

    /// Stored property types this code selects
    pub fn property_types(&self) -> Vec<PropertyType> {
        match self {
            TypeCode::Listed(pt) => vec![*pt],
            TypeCode::Apartment => APARTMENT_BUCKET.to_vec(),
        }
    }
}

/// Canonical region code recognised in chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionCode {
    Accra,
    Kumasi,
    Takoradi,
    CapeCoast,
    Tamale,
    Volta,
    Koforidua,
    Sunyani,
}

impl RegionCode {
    pub fn code(&self) -> &'static str {
        match self {
            RegionCode::Accra => "accra",
            RegionCode::Kumasi => "kumasi",
            RegionCode::Takoradi => "takoradi",
            RegionCode::CapeCoast => "cape-coast",
            RegionCode::Tamale => "tamale",
            RegionCode::Volta => "volta",
            RegionCode::Koforidua => "koforidua",
            RegionCode::Sunyani => "sunyani",
        }
    }

    pub fn display_name(&self) -> String {
        display_name(self.code())
    }

    /// Substring the stored region name must contain.
    ///
    /// Only Accra and Kumasi are mapped; the other codes are recognised but
    /// add no clause.
    pub fn name_filter(&self) -> Option<&'static str> {
        match self {
            RegionCode::Accra => Some("Accra"),
            RegionCode::Kumasi => Some("Ashanti"),
            _ => None,
        }
    }
}

/// Property-type synonyms. Specific bedroom counts precede the generic
/// apartment bucket so "2 bedroom apartment" resolves to `2-bedroom`.
pub static PROPERTY_TYPE_KEYWORDS: &[(TypeCode, &[&str])] = &[
    (
        TypeCode::Listed(PropertyType::SingleRoom),
        &["single room", "single-room", "singleroom"],
    ),
    (
        TypeCode::Listed(PropertyType::ChamberAndHall),
        &["chamber and hall", "chamber & hall", "chamber-and-hall", "chamber hall"],
    ),
    (
        TypeCode::Listed(PropertyType::SelfContained),
        &["self contained", "self-contained", "selfcontained", "self con"],
    ),
    (
        TypeCode::Listed(PropertyType::OneBedroom),
        &["1 bedroom", "1-bedroom", "one bedroom", "1 bed"],
    ),
    (
        TypeCode::Listed(PropertyType::TwoBedroom),
        &["2 bedroom", "2-bedroom", "two bedroom", "2 bed"],
    ),
    (
        TypeCode::Listed(PropertyType::ThreeBedroom),
        &["3 bedroom", "3-bedroom", "three bedroom", "3 bed"],
    ),
    (TypeCode::Apartment, &["apartment", "flat"]),
];

pub static REGION_KEYWORDS: &[(RegionCode, &[&str])] = &[
    (
        RegionCode::Accra,
        &["accra", "east legon", "legon", "osu", "madina", "spintex", "tema", "dansoman"],
    ),
    (RegionCode::Kumasi, &["kumasi", "ashanti", "kejetia", "adum"]),
    (RegionCode::Takoradi, &["takoradi", "sekondi", "western region"]),
    (RegionCode::CapeCoast, &["cape coast", "cape-coast", "central region"]),
    (RegionCode::Tamale, &["tamale", "northern region"]),
    (RegionCode::Volta, &["volta", "hohoe", "keta"]),
    (RegionCode::Koforidua, &["koforidua", "eastern region"]),
    (RegionCode::Sunyani, &["sunyani", "bono"]),
];

pub const GREETING_WORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

pub const SEARCH_TRIGGERS: &[&str] = &[
    "house",
    "home",
    "rent",
    "apartment",
    "flat",
    "room",
    "property",
    "properties",
    "accommodation",
    "self contained",
    "chamber",
    "looking for",
    "find",
    "search",
    "available",
];

pub const AFFIRMATIVE_WORDS: &[&str] = &["yes", "yeah", "sure", "ok", "show me", "please"];

pub const HELP_WORDS: &[&str] = &["help", "what can you do", "how does this work"];

pub const CONTACT_WORDS: &[&str] = &["contact", "landlord", "owner", "phone", "email"];

pub const GRATITUDE_WORDS: &[&str] = &["thank", "thanks", "appreciate"];

/// Budget phrases, checked per threshold in ascending order
pub const BUDGET_PHRASES: &[&str] = &["under", "below", "less than"];

pub const BUDGET_THRESHOLDS: &[i64] = &[1000, 5000, 10000];

pub const GREETING_REPLIES: &[&str] = &[
    "Hello! I can help you find a place to rent. Tell me the type of property, the region and your budget.",
    "Hi there! Looking for a new home? Try something like \"2 bedroom in Accra under 5000\".",
    "Hey! Welcome. What kind of property are you looking for today?",
];

pub const GRATITUDE_REPLIES: &[&str] = &[
    "You're welcome! Let me know if you need anything else.",
    "Happy to help! Good luck with your search.",
    "Anytime! Come back whenever you want to look at more properties.",
];

pub const FALLBACK_REPLIES: &[&str] = &[
    "I'm not sure I understood that. You can ask me things like \"self contained in Kumasi\" or \"apartment under 5000\".",
    "Could you tell me more about what you're looking for? A property type, a region or a budget helps.",
    "I can help you search for rentals. Try mentioning a region, a property type or your budget.",
];

pub const EMPTY_MESSAGE_REPLY: &str = "Please type a message so I can help you.";

pub const TECHNICAL_DIFFICULTIES_REPLY: &str =
    "Sorry, I'm having some technical difficulties right now. Please try again in a moment.";

pub const HELP_REPLY: &str = "Here's what I can do:\n\
- Find properties by type, e.g. \"single room\", \"chamber and hall\", \"self contained\", \"2 bedroom\"\n\
- Search by region, e.g. \"Accra\", \"Kumasi\", \"Takoradi\"\n\
- Filter by budget, e.g. \"under 5000\" or \"3000 cedis\"\n\
- Show the latest listings, just say \"show me\"";

pub const CONTACT_REPLY: &str = "To contact a landlord, open the property's detail page. \
The owner's name, phone number and email are listed there.";

pub const NO_LISTINGS_YET_REPLY: &str =
    "There are no properties listed yet. Please check back soon!";

pub const GENERIC_NO_MATCH_REPLY: &str = "Sorry, I couldn't find any properties matching that. \
Try mentioning a property type, a region or a budget, e.g. \"2 bedroom in Accra under 5000\".";
