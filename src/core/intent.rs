use crate::core::keywords::{
    AFFIRMATIVE_WORDS, CONTACT_WORDS, GRATITUDE_WORDS, GREETING_WORDS, HELP_WORDS, SEARCH_TRIGGERS,
};

/// Purpose of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Search,
    Affirmative,
    Help,
    Contact,
    Gratitude,
    Fallback,
}

/// Trigger sets in precedence order; the first set with a hit decides
const PRECEDENCE: &[(Intent, &[&str])] = &[
    (Intent::Greeting, GREETING_WORDS),
    (Intent::Search, SEARCH_TRIGGERS),
    (Intent::Affirmative, AFFIRMATIVE_WORDS),
    (Intent::Help, HELP_WORDS),
    (Intent::Contact, CONTACT_WORDS),
    (Intent::Gratitude, GRATITUDE_WORDS),
];

/// Classify a message by substring presence of the trigger words
pub fn classify(message: &str) -> Intent {
    let message = message.to_lowercase();
    PRECEDENCE
        .iter()
        .find(|(_, words)| words.iter().any(|word| message.contains(word)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_branch() {
        assert_eq!(classify("Good morning"), Intent::Greeting);
        assert_eq!(classify("looking for a house"), Intent::Search);
        assert_eq!(classify("yes"), Intent::Affirmative);
        assert_eq!(classify("what can you do"), Intent::Help);
        assert_eq!(classify("how do I reach the owner"), Intent::Contact);
        assert_eq!(classify("I appreciate it"), Intent::Gratitude);
        assert_eq!(classify("what's the weather"), Intent::Fallback);
    }

    #[test]
    fn test_search_beats_show_me() {
        assert_eq!(classify("show me apartments"), Intent::Search);
        assert_eq!(classify("show me more"), Intent::Affirmative);
    }

    #[test]
    fn test_affirmative_beats_help() {
        assert_eq!(classify("please help"), Intent::Affirmative);
    }
}
