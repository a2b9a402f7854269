//! Channel identification: detail resolution across the local catalog and
//! YouTube, the identification decision tree, and user suggestions.

pub mod detail;
pub mod pipeline;
pub mod suggestions;

pub use detail::ChannelDetailResolver;
pub use pipeline::{has_existing_suggestion, ChannelIdentifier};
pub use suggestions::SuggestionService;
