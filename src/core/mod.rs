// Chatbot exports
pub mod extract;
pub mod intent;
pub mod keywords;
pub mod lookup;
pub mod responder;
pub mod selector;

pub use extract::{detect_budget, detect_property_type, detect_region, ChatQuery};
pub use intent::{classify, Intent};
pub use keywords::{RegionCode, TypeCode};
pub use lookup::{ListingLookup, ListingQuery, LookupError};
pub use responder::{respond, ChatResponder, ChatResponse};
pub use selector::{FixedSelector, RandomSelector, ReplySelector, SeededSelector};
