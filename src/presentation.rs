//! Output shaping shared by the CLI and the HTTP API

use serde::{Deserialize, Serialize};

use crate::models::{
    ChannelId, ChannelIdentification, ChannelRecord, PredictionItem, ResolvedChannel,
};

const ELLIPSIS: char = '…';

/// Prediction of a single channel as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPredictionView {
    pub channel_id: ChannelId,
    pub title: String,
    pub gradient: f64,
    pub prediction_items: Vec<PredictionItem>,
}

/// Cut `text` to at most `max_chars` characters, ellipsis included.
///
/// The cut falls on the last whitespace before the limit when there is one,
/// otherwise mid-word. Text within the limit is returned unchanged.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let keep = max_chars - 1;
    let end = text
        .char_indices()
        .nth(keep)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    let head = &text[..end];

    let cut = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => head[..space].trim_end(),
        _ => head,
    };

    format!("{}{}", cut, ELLIPSIS)
}

/// Apply [`truncate_description`] to a listed channel
pub fn truncate_channel(mut channel: ChannelRecord, max_chars: usize) -> ChannelRecord {
    channel.description = truncate_description(&channel.description, max_chars);
    channel
}

/// Apply [`truncate_description`] to the channel of a resolved channel
pub fn truncate_resolved(mut resolved: ResolvedChannel, max_chars: usize) -> ResolvedChannel {
    let record = resolved.detail.record_mut();
    record.description = truncate_description(&record.description, max_chars);
    resolved
}

/// Apply [`truncate_description`] to an identification's channel, if any
pub fn truncate_identification(
    mut identification: ChannelIdentification,
    max_chars: usize,
) -> ChannelIdentification {
    identification.resolved = identification
        .resolved
        .map(|resolved| truncate_resolved(resolved, max_chars));
    identification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelDetail, IdentificationStatus};

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate_description("Blues licks", 300), "Blues licks");
        assert_eq!(truncate_description("", 10), "");
    }

    #[test]
    fn test_cuts_on_word_boundary() {
        let truncated = truncate_description("Learn jazz chords and walking bass lines", 20);
        assert_eq!(truncated, "Learn jazz chords…");
        assert!(truncated.chars().count() <= 20);
    }

    #[test]
    fn test_cuts_long_word() {
        assert_eq!(truncate_description("Supercalifragilistic", 6), "Super…");
    }

    #[test]
    fn test_multibyte_text() {
        let truncated = truncate_description("Guitarra española clásica para todos", 19);
        assert_eq!(truncated, "Guitarra española…");
        assert!(truncated.chars().count() <= 19);
    }

    #[test]
    fn test_truncate_channel_keeps_other_fields() {
        let mut channel = ChannelRecord::new("UC1", "Riffs", "one two three four");
        channel.subscribers = Some(42);

        let truncated = truncate_channel(channel, 10);
        assert_eq!(truncated.description, "one two…");
        assert_eq!(truncated.subscribers, Some(42));
    }

    #[test]
    fn test_truncate_identification() {
        let resolved = ResolvedChannel {
            detail: ChannelDetail::Local(ChannelRecord::new("UC1", "Riffs", "one two three four")),
            is_guitar_channel: true,
        };
        let identification =
            ChannelIdentification::with_channel(IdentificationStatus::AlreadyListed, resolved);

        let truncated = truncate_identification(identification, 10);
        assert_eq!(truncated.channel().unwrap().description, "one two…");

        let not_valid = truncate_identification(ChannelIdentification::not_valid(), 10);
        assert!(not_valid.channel().is_none());
    }
}
