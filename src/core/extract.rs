use regex::Regex;
use std::sync::LazyLock;

use crate::core::keywords::{
    RegionCode, TypeCode, BUDGET_PHRASES, BUDGET_THRESHOLDS, PROPERTY_TYPE_KEYWORDS, REGION_KEYWORDS,
};
use crate::core::lookup::ListingQuery;

/// Amount written after a currency marker: "ghs 5000", "gh₵2,500"
static CURRENCY_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:ghs|gh₵|₵)\s*(\d[\d,]*)").unwrap());

/// Any digit run, with whatever unit follows it
static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*)\s*(ghs|gh₵|₵|cedis|cedi|bedrooms|bedroom|beds|bed|rooms|room)?").unwrap()
});

/// Units that mark a number as a room count rather than an amount
const ROOM_UNITS: &[&str] = &["bedrooms", "bedroom", "beds", "bed", "rooms", "room"];

/// First table entry with a phrase that occurs anywhere in `message`
fn first_match<T: Copy>(table: &[(T, &[&str])], message: &str) -> Option<T> {
    table
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| message.contains(phrase)))
        .map(|(code, _)| *code)
}

/// Canonical property-type code mentioned in the message, if any
pub fn detect_property_type(message: &str) -> Option<TypeCode> {
    first_match(PROPERTY_TYPE_KEYWORDS, &message.to_lowercase())
}

/// Canonical region code mentioned in the message, if any
pub fn detect_region(message: &str) -> Option<RegionCode> {
    first_match(REGION_KEYWORDS, &message.to_lowercase())
}

/// Maximum price the message asks for, if any.
///
/// The fixed phrases ("under 1000", "below 5000", "less than 10000", ...) are
/// tried first, threshold by threshold in ascending order. Otherwise the first
/// amount tagged with a currency marker is used, then the first bare number
/// that is not a room count.
pub fn detect_budget(message: &str) -> Option<i64> {
    let message = message.to_lowercase();

    for threshold in BUDGET_THRESHOLDS {
        let hit = BUDGET_PHRASES
            .iter()
            .any(|phrase| message.contains(&format!("{} {}", phrase, threshold)));
        if hit {
            return Some(*threshold);
        }
    }

    if let Some(amount) = CURRENCY_PREFIXED
        .captures_iter(&message)
        .find_map(|caps| parse_amount(&caps[1]))
    {
        return Some(amount);
    }

    NUMBER_WITH_UNIT.captures_iter(&message).find_map(|caps| {
        let unit = caps.get(2).map(|m| m.as_str());
        if unit.is_some_and(|u| ROOM_UNITS.contains(&u)) {
            return None;
        }
        parse_amount(&caps[1])
    })
}

fn parse_amount(digits: &str) -> Option<i64> {
    digits.replace(',', "").parse().ok()
}

/// Filters detected in a single chat message. Built per message, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatQuery {
    pub raw_message: String,
    pub detected_type: Option<TypeCode>,
    pub detected_region: Option<RegionCode>,
    pub detected_budget: Option<i64>,
}

impl ChatQuery {
    /// Run the three extractors over `message`
    pub fn parse(message: &str) -> Self {
        Self {
            raw_message: message.to_string(),
            detected_type: detect_property_type(message),
            detected_region: detect_region(message),
            detected_budget: detect_budget(message),
        }
    }

    /// At least one dimension was detected
    pub fn has_criteria(&self) -> bool {
        self.detected_type.is_some() || self.detected_region.is_some() || self.detected_budget.is_some()
    }

    /// Listing filter for this query, newest first, capped at `limit`
    pub fn to_listing_query(&self, limit: i64) -> ListingQuery {
        ListingQuery {
            region_name_contains: self
                .detected_region
                .and_then(|region| region.name_filter())
                .map(str::to_string),
            property_types: self
                .detected_type
                .map(|t| t.property_types())
                .unwrap_or_default(),
            max_price: self.detected_budget,
            limit: Some(limit),
            ..ListingQuery::default()
        }
    }
}
