// Unit tests for the chatbot keyword extraction

use rental_service::core::keywords::{TypeCode, PROPERTY_TYPE_KEYWORDS, REGION_KEYWORDS};
use rental_service::core::{classify, detect_budget, detect_property_type, detect_region, ChatQuery, Intent};
use rental_service::models::{display_name, PropertyType};

#[test]
fn test_every_type_synonym_resolves_to_its_code() {
    for (code, phrases) in PROPERTY_TYPE_KEYWORDS {
        for phrase in *phrases {
            assert_eq!(detect_property_type(phrase), Some(*code), "phrase {:?}", phrase);
            let sentence = format!("Do you have a {} near the market?", phrase.to_uppercase());
            assert_eq!(detect_property_type(&sentence), Some(*code), "sentence {:?}", sentence);
        }
    }
}

#[test]
fn test_every_region_synonym_resolves_to_its_code() {
    for (code, phrases) in REGION_KEYWORDS {
        for phrase in *phrases {
            assert_eq!(detect_region(phrase), Some(*code), "phrase {:?}", phrase);
        }
    }
}

#[test]
fn test_unrecognised_words_detect_nothing() {
    assert_eq!(detect_property_type("a mansion with a pool"), None);
    assert_eq!(detect_region("somewhere in Lagos"), None);
}

#[test]
fn test_budget_phrases() {
    assert_eq!(detect_budget("under 1000"), Some(1000));
    assert_eq!(detect_budget("below 5000"), Some(5000));
    assert_eq!(detect_budget("less than 5000"), Some(5000));
    assert_eq!(detect_budget("2500 cedis"), Some(2500));
    assert_eq!(detect_budget("nice house please"), None);
}

#[test]
fn test_budget_ignores_room_counts() {
    assert_eq!(detect_budget("2 bedroom in Accra"), None);
    assert_eq!(detect_budget("3 bedrooms for GHS 4,500"), Some(4500));
}

#[test]
fn test_lower_threshold_checked_first() {
    // "under 10000" also contains "under 1000"
    assert_eq!(detect_budget("under 10000"), Some(1000));
}

#[test]
fn test_greeting_beats_search() {
    assert_eq!(classify("Hey, any apartments in Osu?"), Intent::Greeting);
}

#[test]
fn test_query_for_accra_apartment() {
    let query = ChatQuery::parse("flat in East Legon below 5000");
    assert_eq!(query.detected_type, Some(TypeCode::Apartment));

    let filter = query.to_listing_query(5);
    assert_eq!(filter.region_name_contains.as_deref(), Some("Accra"));
    assert_eq!(
        filter.property_types,
        vec![PropertyType::TwoBedroom, PropertyType::ThreeBedroom, PropertyType::SelfContained]
    );
    assert_eq!(filter.max_price, Some(5000));
    assert_eq!(filter.limit, Some(5));
}

#[test]
fn test_type_display_names() {
    for pt in PropertyType::ALL {
        let name = display_name(pt.code());
        assert!(!name.contains('-'));
        assert!(name.chars().next().is_some_and(|c| !c.is_lowercase()));
    }
}
