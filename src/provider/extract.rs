// src/provider/extract.rs — Post extraction from raw model output
//
// Two-stage parse: a strict structured pass (the prompt asks for
// `{"tweet": "..."}`) and a heuristic cleanup pass for models that answer
// in prose or markdown anyway.

/// Extract the post text from a raw model response.
///
/// Stage 1 scans for the outermost brace pair and parses it as JSON,
/// which tolerates markdown wrappers around an otherwise well-formed
/// object. Stage 2 strips the usual decoration (surrounding quotes,
/// heading markers, code fences) and returns the trimmed text.
pub fn extract_post(raw: &str) -> String {
    if let Some(tweet) = extract_json_tweet(raw) {
        return tweet;
    }
    cleanup_text(raw)
}

/// Stage 1: locate the first `{` and last `}` and parse the slice as an
/// object with a string `tweet` field.
fn extract_json_tweet(raw: &str) -> Option<String> {
    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last <= first {
        return None;
    }

    let candidate = &raw[first..=last];
    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    value.get("tweet")?.as_str().map(str::to_string)
}

/// Stage 2: relaxed cleanup that removes wrappers without destroying the
/// text itself.
fn cleanup_text(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // Code fences, with or without a language tag
    text = text.replace("```json", "").replace("```", "");

    // Line-leading markdown headings. Only a `#` run followed by
    // whitespace counts; a bare `#hashtag` is content, not a heading.
    text = text
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                let after = trimmed.trim_start_matches('#');
                if after.starts_with(char::is_whitespace) {
                    return after.trim_start();
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Surrounding quote characters
    let text = text.trim();
    let text = text
        .strip_prefix('"')
        .or_else(|| text.strip_prefix('\''))
        .unwrap_or(text);
    let text = text
        .strip_suffix('"')
        .or_else(|| text.strip_suffix('\''))
        .unwrap_or(text);

    text.trim().to_string()
}
