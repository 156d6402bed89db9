use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::extract::ChatQuery;
use crate::core::intent::{classify, Intent};
use crate::core::keywords::{
    CONTACT_REPLY, EMPTY_MESSAGE_REPLY, FALLBACK_REPLIES, GENERIC_NO_MATCH_REPLY, GRATITUDE_REPLIES,
    GREETING_REPLIES, HELP_REPLY, NO_LISTINGS_YET_REPLY, TECHNICAL_DIFFICULTIES_REPLY,
};
use crate::core::lookup::{ListingLookup, ListingQuery, LookupError};
use crate::core::selector::{pick, ReplySelector};
use crate::models::{ChatbotResponse, Listing};

/// Most listings ever handed back with a reply
pub const MAX_RETURNED_LISTINGS: usize = 3;
/// Rows fetched for a search
pub const SEARCH_LIMIT: i64 = 5;
/// Search results written into the reply text
pub const SEARCH_LINES: usize = 3;
/// Rows fetched for "show me more"
pub const RECENT_LIMIT: i64 = 6;
/// Recent listings written into the reply text
pub const RECENT_LINES: usize = 4;

/// Reply to one chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub text: String,
    /// At most [`MAX_RETURNED_LISTINGS`] entries
    pub listings: Vec<Listing>,
    /// Fetched rows that were not returned
    pub truncated: usize,
}

impl ChatResponse {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            listings: Vec::new(),
            truncated: 0,
        }
    }

    fn with_listings(text: String, mut listings: Vec<Listing>) -> Self {
        let truncated = listings.len().saturating_sub(MAX_RETURNED_LISTINGS);
        listings.truncate(MAX_RETURNED_LISTINGS);
        Self {
            text,
            listings,
            truncated,
        }
    }
}

impl From<ChatResponse> for ChatbotResponse {
    fn from(reply: ChatResponse) -> Self {
        ChatbotResponse {
            response: reply.text,
            properties: reply.listings,
        }
    }
}

/// Answer one message. Never fails: store problems become apologetic text.
pub async fn respond(
    message: &str,
    lookup: &dyn ListingLookup,
    selector: &dyn ReplySelector,
) -> ChatResponse {
    let message = message.trim();
    if message.is_empty() {
        return ChatResponse::text(EMPTY_MESSAGE_REPLY);
    }

    let intent = classify(message);
    debug!("Classified chat message as {:?}", intent);

    match intent {
        Intent::Greeting => ChatResponse::text(pick(selector, GREETING_REPLIES)),
        Intent::Search => search(message, lookup).await,
        Intent::Affirmative => latest(lookup).await,
        Intent::Help => ChatResponse::text(HELP_REPLY),
        Intent::Contact => ChatResponse::text(CONTACT_REPLY),
        Intent::Gratitude => ChatResponse::text(pick(selector, GRATITUDE_REPLIES)),
        Intent::Fallback => ChatResponse::text(pick(selector, FALLBACK_REPLIES)),
    }
}

async fn search(message: &str, lookup: &dyn ListingLookup) -> ChatResponse {
    let query = ChatQuery::parse(message);
    debug!(
        "Chat search filters: type={:?}, region={:?}, budget={:?}",
        query.detected_type, query.detected_region, query.detected_budget
    );

    let Some(rows) = fetch(lookup, &query.to_listing_query(SEARCH_LIMIT)).await else {
        return ChatResponse::text(TECHNICAL_DIFFICULTIES_REPLY);
    };

    if rows.is_empty() {
        return ChatResponse::text(no_match_reply(&query));
    }

    info!("Chat search matched {} listings", rows.len());
    ChatResponse::with_listings(search_reply(&query, &rows), rows)
}

async fn latest(lookup: &dyn ListingLookup) -> ChatResponse {
    let Some(rows) = fetch(lookup, &ListingQuery::recent(RECENT_LIMIT)).await else {
        return ChatResponse::text(TECHNICAL_DIFFICULTIES_REPLY);
    };

    if rows.is_empty() {
        return ChatResponse::text(NO_LISTINGS_YET_REPLY);
    }

    ChatResponse::with_listings(latest_reply(&rows), rows)
}

/// Run the lookup. A failed query reads as "no rows"; `None` means the store
/// could not be reached at all.
async fn fetch(lookup: &dyn ListingLookup, query: &ListingQuery) -> Option<Vec<Listing>> {
    match lookup.find_listings(query).await {
        Ok(rows) => Some(rows),
        Err(LookupError::Query(e)) => {
            warn!("Chat listing query failed, answering with no results: {}", e);
            Some(Vec::new())
        }
        Err(e @ LookupError::Unavailable(_)) => {
            warn!("Chat listing lookup unavailable: {}", e);
            None
        }
    }
}

fn listing_line(listing: &Listing) -> String {
    format!(
        "{} ({}) - GHS {}.",
        listing.title,
        listing.type_display(),
        listing.price
    )
}

/// Reply text for a search with at least one result
pub fn search_reply(query: &ChatQuery, rows: &[Listing]) -> String {
    let mut criteria = Vec::new();
    if let Some(region) = query.detected_region {
        criteria.push(format!("in {}", region.display_name()));
    }
    if let Some(kind) = query.detected_type {
        criteria.push(format!("of type {}", kind.display_name()));
    }
    if let Some(budget) = query.detected_budget {
        criteria.push(format!("under GHS {}", budget));
    }

    let noun = if rows.len() == 1 { "property" } else { "properties" };
    let mut text = if criteria.is_empty() {
        format!("I found {} {} for you:", rows.len(), noun)
    } else {
        format!("I found {} {} {}:", rows.len(), noun, criteria.join(", "))
    };

    for listing in rows.iter().take(SEARCH_LINES) {
        text.push_str("\n- ");
        text.push_str(&listing_line(listing));
    }

    if rows.len() > SEARCH_LINES {
        text.push_str(&format!(
            "\n...and {} more. Browse the listings page to see them all.",
            rows.len() - SEARCH_LINES
        ));
    }
    text
}

/// Reply text when a search found nothing
pub fn no_match_reply(query: &ChatQuery) -> String {
    if !query.has_criteria() {
        return GENERIC_NO_MATCH_REPLY.to_string();
    }

    let mut text = String::from("Sorry, I couldn't find any properties matching your search. You could:");
    if query.detected_type.is_some() {
        text.push_str("\n- Try a different property type");
    }
    if query.detected_region.is_some() {
        text.push_str("\n- Try a different region");
    }
    if query.detected_budget.is_some() {
        text.push_str("\n- Adjust your budget");
    }
    text
}

/// Reply text listing the newest properties
pub fn latest_reply(rows: &[Listing]) -> String {
    let mut text = String::from("Here are the latest properties on the site:");
    for listing in rows.iter().take(RECENT_LINES) {
        text.push_str(&format!(
            "\n- {} ({}) - GHS {} in {}.",
            listing.title,
            listing.type_display(),
            listing.price,
            listing.region_name.as_deref().unwrap_or("an unlisted region")
        ));
    }
    text
}

/// Chatbot bound to a listing store and a reply selector
#[derive(Clone)]
pub struct ChatResponder {
    lookup: Arc<dyn ListingLookup>,
    selector: Arc<dyn ReplySelector>,
}

impl ChatResponder {
    pub fn new(lookup: Arc<dyn ListingLookup>, selector: Arc<dyn ReplySelector>) -> Self {
        Self { lookup, selector }
    }

    pub async fn respond(&self, message: &str) -> ChatResponse {
        respond(message, self.lookup.as_ref(), self.selector.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selector::FixedSelector;
    use crate::models::PropertyType;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned rows and remembers the last query
    struct CannedLookup {
        rows: Vec<Listing>,
        fail: Option<fn() -> LookupError>,
        last_query: Mutex<Option<ListingQuery>>,
    }

    impl CannedLookup {
        fn new(rows: Vec<Listing>) -> Self {
            Self {
                rows,
                fail: None,
                last_query: Mutex::new(None),
            }
        }

        fn failing(fail: fn() -> LookupError) -> Self {
            Self {
                rows: vec![],
                fail: Some(fail),
                last_query: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ListingLookup for CannedLookup {
        async fn find_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, LookupError> {
            *self.last_query.lock().unwrap() = Some(query.clone());
            if let Some(fail) = self.fail {
                return Err(fail());
            }
            Ok(self.rows.clone())
        }
    }

    fn listing(id: i64, title: &str, price: i64) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            description: None,
            property_type: PropertyType::TwoBedroom,
            price,
            region_id: Some(1),
            region_name: Some("Greater Accra".to_string()),
            neighborhood_id: None,
            neighborhood_name: None,
            exact_location: None,
            completion_status: Default::default(),
            months_left: None,
            is_featured: false,
            image_paths: vec![],
            contact_name: None,
            contact_phone: None,
            contact_email: None,
            created_by: None,
            created_by_name: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_whitespace_only_message() {
        let lookup = CannedLookup::new(vec![listing(1, "A", 100)]);
        let reply = tokio_test::block_on(respond("   \n", &lookup, &FixedSelector(0)));
        assert_eq!(reply.text, EMPTY_MESSAGE_REPLY);
        assert!(reply.listings.is_empty());
        assert!(lookup.last_query.lock().unwrap().is_none());
    }

    #[test]
    fn test_search_reply_mentions_overflow() {
        let rows: Vec<_> = (1..=5).map(|i| listing(i, &format!("House {}", i), 1000)).collect();
        let lookup = CannedLookup::new(rows);
        let reply = tokio_test::block_on(respond("find me a house", &lookup, &FixedSelector(0)));

        assert_eq!(reply.listings.len(), 3);
        assert_eq!(reply.truncated, 2);
        assert!(reply.text.contains("...and 2 more"));
        assert!(!reply.text.contains("House 4"));
    }

    #[test]
    fn test_unavailable_store_gives_technical_difficulties() {
        let lookup = CannedLookup::failing(|| LookupError::Unavailable("refused".to_string()));
        let reply = tokio_test::block_on(respond("house in accra", &lookup, &FixedSelector(0)));
        assert_eq!(reply.text, TECHNICAL_DIFFICULTIES_REPLY);
        assert!(reply.listings.is_empty());
    }

    #[test]
    fn test_failed_query_reads_as_no_results() {
        let lookup = CannedLookup::failing(|| LookupError::Query("syntax".to_string()));
        let reply = tokio_test::block_on(respond("house in accra", &lookup, &FixedSelector(0)));
        assert!(reply.text.contains("Try a different region"));
        assert!(reply.listings.is_empty());
    }

    #[test]
    fn test_affirmative_fetches_six_and_writes_four() {
        let rows: Vec<_> = (1..=6).map(|i| listing(i, &format!("Recent {}", i), 700)).collect();
        let lookup = CannedLookup::new(rows);
        let reply = tokio_test::block_on(respond("yes", &lookup, &FixedSelector(0)));

        let query = lookup.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query, ListingQuery::recent(RECENT_LIMIT));
        assert!(reply.text.contains("Recent 4"));
        assert!(!reply.text.contains("Recent 5"));
        assert!(reply.text.contains("in Greater Accra"));
        assert_eq!(reply.listings.len(), 3);
    }

    #[test]
    fn test_affirmative_with_empty_store() {
        let lookup = CannedLookup::new(vec![]);
        let reply = tokio_test::block_on(respond("ok", &lookup, &FixedSelector(0)));
        assert_eq!(reply.text, NO_LISTINGS_YET_REPLY);
    }

    #[test]
    fn test_no_match_without_criteria_is_generic() {
        let query = ChatQuery::parse("any house");
        assert_eq!(no_match_reply(&query), GENERIC_NO_MATCH_REPLY);
    }
}
