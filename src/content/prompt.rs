// src/content/prompt.rs — Generation prompt assembly
//
// Pure with respect to its inputs: the randomly drawn creative angle is a
// parameter, not an internal roll, so callers (and tests) control it.

use rand::Rng;

use super::types::{BoardConfig, LengthPreference, UserProfile};

/// Framing devices injected per call to keep daily outputs from
/// converging on the same shape.
pub const CREATIVE_ANGLES: [&str; 7] = [
    "A controversial opinion",
    "A common mistake beginners make",
    "A sudden realization",
    "A prediction for the future",
    "A counter-intuitive truth",
    "A personal frustration",
    "A celebration of a small win",
];

/// Draw one angle uniformly.
pub fn pick_angle<R: Rng>(rng: &mut R) -> &'static str {
    CREATIVE_ANGLES[rng.gen_range(0..CREATIVE_ANGLES.len())]
}

pub struct PromptContext<'a> {
    pub board: &'a BoardConfig,
    pub user: &'a UserProfile,
    /// Up to 5 prior posts for this board, most recent first. Used only
    /// as negative examples.
    pub history: &'a [String],
    pub length: LengthPreference,
}

/// Assemble the full generation prompt. The output contract is a single
/// JSON object `{"tweet": "..."}` with no conversational wrapper.
pub fn build_prompt(ctx: &PromptContext<'_>, angle: &str) -> String {
    let niche = ctx.board_niche();
    let style = ctx.user.style_fingerprint();

    let tone_tweaks = match &ctx.user.custom_tone {
        Some(tone) => format!("User's specific tone instructions: \"{}\"", tone),
        None => String::new(),
    };
    let board_rules = match &ctx.board.custom_prompt {
        Some(p) => format!("Specific board instructions: \"{}\"", p),
        None => String::new(),
    };

    let history_block = if ctx.history.is_empty() {
        "(no previous posts)".to_string()
    } else {
        ctx.history
            .iter()
            .map(|t| format!("- \"{}\"", t))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let (length_rule, length_instruction, length_monologue, symmetry_ban, task_reminder) =
        match ctx.length {
            LengthPreference::Short => (
                "Keep it short.",
                "Strictly under 280 characters. Be punchy.".to_string(),
                "Keep it punchy. Short sentences. One insight only.",
                "Avoid: Perfectly balanced sentences. (Human thoughts are messy; AI thoughts are symmetrical.)",
                "Start with a \"Pattern Interrupt\": a line that immediately challenges a common belief or states a raw fact.",
            ),
            LengthPreference::Long => (
                "THIS IS A LONG-FORM POST. DO NOT BE BRIEF.",
                [
                    "CRITICAL: Write a LONG-FORM post.",
                    "- MINIMUM 500 characters, MAXIMUM 900 characters.",
                    "- Use multiple paragraphs with line breaks.",
                    "- Go DEEP into the topic with examples or personal anecdotes.",
                    "- Include a list or bullet points if relevant.",
                    "- DO NOT write a short tweet. If your output is under 400 characters, you have FAILED.",
                ]
                .join("\n"),
                "This is a LONG post. Ignore all brevity rules. Expand the idea. Add context, examples, and nuance. Write at least 3-4 paragraphs.",
                "",
                "REMINDER: This MUST be over 500 characters. Count them.",
            ),
        };

    format!(
        r#"<Identity>
You are the "Brain Double" for a practitioner in the {niche} space, for a specific individual on X (Twitter).
Your goal is to write a high-engagement, authentic tweet that sounds 100% human and 0% AI.
</Identity>

<Style_Fingerprint>
- User's unique vibe: {style}
- Specific Tone tweaks: {tone_tweaks}
- Writing Rules: No hashtags. {length_rule}
</Style_Fingerprint>

<Strategic_Intent>
- Niche: {niche}
- Strategy: {strategy}
- Target Topic: {objective}
- Board-Specific Rules: {board_rules}
- **CREATIVE ANGLE FOR THIS TWEET: {angle}** (Strictly focus on this angle)
</Strategic_Intent>

<History_Constraints>
The user has recently posted the following tweets. **DO NOT WRITE ANYTHING SIMILAR TO THESE:**
{history_block}
(Ensure your new tweet is distinct in concept and phrasing from the list above)
</History_Constraints>

<Negative_Constraints>
Do NOT use: delve, unlock, leverage, game-changer, tapestry, realm, vital, pivotal, "the future is," "why it matters," "in today's world."
{symmetry_ban}
</Negative_Constraints>

<Internal_Monologue>
Step 1: Identify one specific, non-obvious frustration or "truth" about {objective} within the {niche} niche.
Step 2: Strip away all the adjectives.
Step 3: Draft the insight as if you just sent it in a private Slack channel to a colleague.
Step 4: {length_monologue}
</Internal_Monologue>

<Task>
Based on the monologue above, write ONE single tweet.
**Length Constraint: {length_instruction}**
{task_reminder}
</Task>

<Output_Format>
Return a single JSON object with the key "tweet".
Example: {{ "tweet": "Your tweet here" }}
DO NOT output conversational text.
</Output_Format>"#,
        niche = niche,
        style = style,
        tone_tweaks = tone_tweaks,
        length_rule = length_rule,
        strategy = ctx.board.strategy,
        objective = ctx.board.objective,
        board_rules = board_rules,
        angle = angle,
        history_block = history_block,
        symmetry_ban = symmetry_ban,
        length_monologue = length_monologue,
        length_instruction = length_instruction,
        task_reminder = task_reminder,
    )
}

impl PromptContext<'_> {
    fn board_niche(&self) -> &str {
        self.user.niche.as_deref().unwrap_or("General")
    }
}
