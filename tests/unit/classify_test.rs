//! Unit tests for message classification

use chatstats::stats::classify::{
    contains_link, contains_sorry, count_emoji, is_deleted, is_media_placeholder, Classifier,
};
use chatstats::Transcript;

#[test]
fn media_placeholders_match_whole_body_only() {
    assert!(is_media_placeholder("<Media omitted>"));
    assert!(is_media_placeholder("  image omitted "));
    assert!(!is_media_placeholder("look <Media omitted>"));
}

#[test]
fn links_need_scheme_or_www() {
    assert!(contains_link("see https://example.com"));
    assert!(contains_link("WWW.EXAMPLE.ORG"));
    assert!(!contains_link("example.com"));
}

#[test]
fn sorry_is_a_whole_word() {
    assert!(contains_sorry("SORRY!!"));
    assert!(contains_sorry("oh, sorry."));
    assert!(!contains_sorry("sorryyy"));
}

#[test]
fn tombstones_are_detected() {
    assert!(is_deleted("This message was deleted"));
    assert!(is_deleted("You deleted this message"));
    assert!(!is_deleted("This message was deleted by accident, here it is again"));
}

#[test]
fn emoji_repeats_count_each_time() {
    assert_eq!(count_emoji("🎉🎉 party"), 2);
    assert_eq!(count_emoji("plain text"), 0);
}

#[test]
fn custom_words_and_placeholders() {
    let classifier = Classifier::new(
        &["sorry".to_string(), "oops".to_string()],
        &["<attached image>".to_string()],
    )
    .unwrap();
    let text = "[1/1/24, 10:00:00 AM] Alice: Oops\n[1/1/24, 10:01:00 AM] Bob: <attached image>";
    let transcript = Transcript::parse(text).unwrap();
    let annotations: Vec<_> = transcript
        .records()
        .map(|record| classifier.classify(&record))
        .collect();

    assert!(annotations[0].is_sorry);
    assert!(!annotations[0].is_media);
    assert!(annotations[1].is_media);
}
