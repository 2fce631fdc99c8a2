// Lexical metadata features — pure text analysis, no I/O.
//
// These run for every content type: title/description shape, punctuation
// counts, link and hashtag presence, and the trending-tag membership test.

use crate::features::FeatureSet;
use crate::models::ContentMetadata;

/// Tags the platform currently treats as discovery bait.
const TRENDING_TAGS: [&str; 4] = ["viral", "trending", "fyp", "foryou"];

pub fn extract_metadata_features(metadata: &ContentMetadata, features: &mut FeatureSet) {
    features.put_num("title_length", metadata.title.chars().count() as f64);
    features.put_num("description_length", metadata.description.chars().count() as f64);
    features.put_num("tag_count", metadata.tags.len() as f64);
    features.put_num("duration", metadata.duration);

    let title = &metadata.title;
    if !title.is_empty() {
        features.put_flag("title_has_caps", title.chars().any(|c| c.is_uppercase()));
        features.put_flag("title_has_numbers", title.chars().any(|c| c.is_ascii_digit()));
        features.put_num("title_word_count", title.split_whitespace().count() as f64);
        features.put_num(
            "title_exclamation_count",
            title.chars().filter(|&c| c == '!').count() as f64,
        );
        features.put_num(
            "title_question_count",
            title.chars().filter(|&c| c == '?').count() as f64,
        );
    }

    let description = &metadata.description;
    if !description.is_empty() {
        features.put_num(
            "description_word_count",
            description.split_whitespace().count() as f64,
        );
        features.put_flag(
            "description_has_links",
            description.to_lowercase().contains("http"),
        );
        features.put_num(
            "description_hashtag_count",
            description.chars().filter(|&c| c == '#').count() as f64,
        );
        features.put_num(
            "description_mention_count",
            description.chars().filter(|&c| c == '@').count() as f64,
        );
    }

    if !metadata.tags.is_empty() {
        let total_len: usize = metadata.tags.iter().map(|t| t.chars().count()).sum();
        features.put_num("avg_tag_length", total_len as f64 / metadata.tags.len() as f64);
        features.put_flag(
            "has_trending_tags",
            metadata
                .tags
                .iter()
                .any(|t| TRENDING_TAGS.contains(&t.to_lowercase().as_str())),
        );
    }
}

/// Richness metrics over the concatenated title + description, used for
/// text content. `text` must be non-empty.
pub fn extract_text_richness(text: &str, features: &mut FeatureSet) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let char_count = text.chars().count();
    let word_count = words.len().max(1);

    features.put_num("total_word_count", words.len() as f64);
    features.put_num("total_char_count", char_count as f64);
    features.put_num(
        "sentence_count",
        text.split('.').filter(|s| !s.trim().is_empty()).count() as f64,
    );
    features.put_num(
        "avg_word_length",
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / word_count as f64,
    );
    features.put_num(
        "capitalization_ratio",
        text.chars().filter(|c| c.is_uppercase()).count() as f64 / char_count.max(1) as f64,
    );
    features.put_num(
        "punctuation_ratio",
        text.chars().filter(|c| ".,!?;:".contains(*c)).count() as f64 / char_count.max(1) as f64,
    );
    features.put_num(
        "emoji_count",
        text.chars().filter(|&c| (c as u32) > 127).count() as f64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentRecord, ContentType};

    fn empty_features() -> FeatureSet {
        let record = ContentRecord {
            content_id: "t".to_string(),
            content_type: ContentType::Text,
            content_url: String::new(),
            metadata: ContentMetadata::default(),
            engagement: None,
        };
        FeatureSet::new(&record)
    }

    #[test]
    fn title_features() {
        let metadata = ContentMetadata {
            title: "Top 5 tips! Really?".to_string(),
            ..ContentMetadata::default()
        };
        let mut features = empty_features();
        extract_metadata_features(&metadata, &mut features);
        assert_eq!(features.num("title_word_count"), Some(4.0));
        assert_eq!(features.num("title_exclamation_count"), Some(1.0));
        assert_eq!(features.num("title_question_count"), Some(1.0));
        assert!(features.flag("title_has_caps"));
        assert!(features.flag("title_has_numbers"));
    }

    #[test]
    fn empty_title_emits_no_title_shape_features() {
        let metadata = ContentMetadata::default();
        let mut features = empty_features();
        extract_metadata_features(&metadata, &mut features);
        assert_eq!(features.num("title_length"), Some(0.0));
        assert_eq!(features.num("title_word_count"), None);
    }

    #[test]
    fn trending_tag_membership_is_case_insensitive() {
        let metadata = ContentMetadata {
            tags: vec!["cooking".to_string(), "FYP".to_string()],
            ..ContentMetadata::default()
        };
        let mut features = empty_features();
        extract_metadata_features(&metadata, &mut features);
        assert!(features.flag("has_trending_tags"));
    }

    #[test]
    fn non_trending_tags_do_not_fire() {
        let metadata = ContentMetadata {
            tags: vec!["cooking".to_string(), "bread".to_string()],
            ..ContentMetadata::default()
        };
        let mut features = empty_features();
        extract_metadata_features(&metadata, &mut features);
        assert!(!features.flag("has_trending_tags"));
        assert_eq!(features.num("avg_tag_length"), Some(6.0));
    }

    #[test]
    fn hashtags_and_mentions_counted() {
        let metadata = ContentMetadata {
            description: "Check https://example.com #one #two @someone".to_string(),
            ..ContentMetadata::default()
        };
        let mut features = empty_features();
        extract_metadata_features(&metadata, &mut features);
        assert!(features.flag("description_has_links"));
        assert_eq!(features.num("description_hashtag_count"), Some(2.0));
        assert_eq!(features.num("description_mention_count"), Some(1.0));
    }

    #[test]
    fn text_richness_counts() {
        let mut features = empty_features();
        extract_text_richness("One two three. Four five!", &mut features);
        assert_eq!(features.num("total_word_count"), Some(5.0));
        assert_eq!(features.num("sentence_count"), Some(2.0));
        assert!(features.num("avg_word_length").unwrap() > 3.0);
        assert_eq!(features.num("emoji_count"), Some(0.0));
    }
}
