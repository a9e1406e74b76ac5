// src/content/audit.rs — Profile audit statistics
//
// Derived statistics over a user's recent timeline posts. The timeline
// fetch itself belongs to the external social-platform integration; this
// module only computes over whatever posts it is handed.

use chrono::{Timelike, Utc};
use std::collections::HashMap;

use super::types::{ProfileAudit, TimelinePost, TopPost};

/// Compute a full audit from recent posts. Returns `None` for an empty
/// timeline — there is nothing to fingerprint.
pub fn analyze_posts(posts: &[TimelinePost]) -> Option<ProfileAudit> {
    if posts.is_empty() {
        return None;
    }

    let all_text: String = posts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let tone = detect_tone(&all_text);

    let avg_length =
        (posts.iter().map(|p| p.text.len()).sum::<usize>() / posts.len()) as u32;

    let avg_engagement = posts
        .iter()
        .map(|p| p.likes + p.reposts + p.replies)
        .sum::<u32>()
        / posts.len() as u32;

    let top = posts
        .iter()
        .max_by_key(|p| p.likes + p.reposts)?;

    let topics = extract_topics(&all_text);

    let best_posting_hour = mode(posts.iter().map(|p| p.created_at.hour()))?;

    let recommendations =
        recommendations(&tone, avg_length, avg_engagement, &topics, best_posting_hour);

    Some(ProfileAudit {
        analyzed_at: Utc::now(),
        post_count: posts.len(),
        tone,
        avg_length,
        avg_engagement,
        top_post: TopPost {
            text: top.text.chars().take(100).collect(),
            engagement: top.likes + top.reposts,
        },
        topics,
        best_posting_hour,
        recommendations,
    })
}

/// Coarse tone classification by surface signals, checked in order.
pub fn detect_tone(text: &str) -> String {
    let lower = text.to_lowercase();

    if lower.contains("lol") || lower.contains("haha") {
        return "humorous".into();
    }
    if ["api", "code", "function", "algorithm", "database"]
        .iter()
        .any(|kw| contains_word(&lower, kw))
    {
        return "technical".into();
    }
    if text.matches('!').count() > 2 {
        return "enthusiastic".into();
    }
    if text
        .split(|c: char| !c.is_ascii_uppercase())
        .any(|run| run.len() >= 2)
    {
        return "emphatic".into();
    }

    "casual".into()
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

/// Top-5 keywords by frequency, words longer than 4 chars only.
pub fn extract_topics(text: &str) -> Vec<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 4)
    {
        *freq.entry(word.to_string()).or_default() += 1;
    }

    let mut entries: Vec<(String, usize)> = freq.into_iter().collect();
    // Count descending, word ascending for a stable order
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().take(5).map(|(w, _)| w).collect()
}

/// Most common value; first-seen wins ties.
fn mode<I: IntoIterator<Item = u32>>(values: I) -> Option<u32> {
    let mut freq: Vec<(u32, usize)> = Vec::new();
    for v in values {
        match freq.iter_mut().find(|(val, _)| *val == v) {
            Some((_, count)) => *count += 1,
            None => freq.push((v, 1)),
        }
    }
    let mut best: Option<(u32, usize)> = None;
    for (v, count) in freq {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((v, count)),
        }
    }
    best.map(|(v, _)| v)
}

fn recommendations(
    _tone: &str,
    avg_length: u32,
    avg_engagement: u32,
    topics: &[String],
    best_hour: u32,
) -> Vec<String> {
    let mut recs = Vec::new();

    if avg_length < 100 {
        recs.push("Your posts are concise. Consider adding more context to boost engagement.".into());
    } else if avg_length > 200 {
        recs.push("Your posts are detailed. Try shorter, punchier content for variety.".into());
    }

    if avg_engagement < 10 {
        recs.push("Low engagement detected. Try asking questions or adding media.".into());
    }

    if !topics.is_empty() {
        let top3: Vec<&str> = topics.iter().take(3).map(String::as_str).collect();
        recs.push(format!(
            "Your audience resonates with: {}. Double down on these topics.",
            top3.join(", ")
        ));
    }

    recs.push(format!(
        "Post around {}:00 for optimal engagement based on your history.",
        best_hour
    ));

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(text: &str, likes: u32, hour: u32) -> TimelinePost {
        TimelinePost {
            text: text.into(),
            likes,
            reposts: 1,
            replies: 0,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_timeline() {
        assert!(analyze_posts(&[]).is_none());
    }

    #[test]
    fn test_detect_tone_humorous() {
        assert_eq!(detect_tone("lol that deploy went sideways"), "humorous");
    }

    #[test]
    fn test_detect_tone_technical() {
        assert_eq!(detect_tone("refactored the database layer today"), "technical");
    }

    #[test]
    fn test_detect_tone_enthusiastic() {
        assert_eq!(detect_tone("shipped! so good! finally! done!"), "enthusiastic");
    }

    #[test]
    fn test_detect_tone_casual_default() {
        assert_eq!(detect_tone("quiet day of writing"), "casual");
    }

    #[test]
    fn test_extract_topics_frequency_order() {
        let topics =
            extract_topics("launch launch launch growth growth short tiny words words words words");
        assert_eq!(topics[0], "words");
        assert_eq!(topics[1], "launch");
        assert_eq!(topics[2], "growth");
        // "short"/"tiny" filtered by length or rank below the rest
        assert!(!topics.contains(&"tiny".to_string()));
    }

    #[test]
    fn test_mode_picks_most_common() {
        assert_eq!(mode([9, 14, 9, 21, 9]), Some(9));
        assert_eq!(mode(Vec::new()), None);
    }

    #[test]
    fn test_mode_tie_keeps_first_seen() {
        assert_eq!(mode([14, 9, 14, 9]), Some(14));
        assert_eq!(mode([9, 14, 9, 14]), Some(9));
    }

    #[test]
    fn test_full_audit() {
        let posts = vec![
            post("shipping the launch today, launch week begins", 10, 9),
            post("launch metrics are looking healthy", 30, 9),
            post("small steady progress on the launch", 5, 14),
        ];

        let audit = analyze_posts(&posts).unwrap();
        assert_eq!(audit.post_count, 3);
        assert_eq!(audit.best_posting_hour, 9);
        assert_eq!(audit.top_post.engagement, 31);
        assert!(audit.topics.contains(&"launch".to_string()));
        assert!(!audit.recommendations.is_empty());
    }

    #[test]
    fn test_top_post_text_truncated() {
        let long_text = "a".repeat(300);
        let posts = vec![post(&long_text, 1, 8)];
        let audit = analyze_posts(&posts).unwrap();
        assert_eq!(audit.top_post.text.len(), 100);
    }
}
