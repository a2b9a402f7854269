use crate::models::{ChannelRecord, ClassificationTerm};

/// Check if a channel mentions any guitar term and is therefore a guitar channel.
///
/// Title and description are lower-cased and joined by a single space; a term
/// matches when it occurs anywhere in that text. Matching is plain substring
/// search, so "amp" also matches "camper".
pub fn is_guitar_channel(terms: &[ClassificationTerm], channel: &ChannelRecord) -> bool {
    if channel.title.trim().is_empty() && channel.description.trim().is_empty() {
        return false;
    }

    let body = format!(
        "{} {}",
        channel.title.to_lowercase(),
        channel.description.to_lowercase()
    );

    terms
        .iter()
        .filter(|term| !term.id.is_empty())
        .any(|term| body.contains(term.id.as_str()))
}
