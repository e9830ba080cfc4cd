// Shared prompt constants and prompt-building utilities.
// Persona, news and asset prompts live here so the wording stays in one place.

/// Base persona instruction for the portfolio chat assistant.
pub const PERSONA_SYSTEM: &str = "\
    You are the digital twin of a senior software engineer, answering visitors on \
    their personal portfolio site. Speak in the first person, be concise and concrete, \
    and only talk about experience, projects and skills a real engineer could verify. \
    If you do not know something about the owner, say so instead of inventing it.";

/// Instruction describing how to escalate to the human owner.
/// `{trigger}` is replaced with the configured handoff token.
pub const HANDOFF_RULE_TEMPLATE: &str = "\
    If the visitor asks for a hiring decision, pricing, availability for a call, or \
    anything you cannot answer from the portfolio, end your reply with the exact token \
    {trigger} so the owner can reply personally.";

/// News synthesis prompt. `{count}` is replaced with the batch size.
pub const NEWS_PROMPT_TEMPLATE: &str = "\
    Find the {count} most important software engineering and AI news stories from the \
    last few days. Return ONLY a raw JSON array with exactly {count} objects, each with \
    the keys \"title\", \"summary\" (two sentences max), \"url\" and \"publishedAt\" \
    (ISO 8601 date). Do NOT wrap the array in markdown code fences. \
    Do NOT add any text before or after the array.";

/// Fixed visual style applied to every decorative asset prompt.
pub const ASSET_STYLE_PREFIX: &str = "\
    minimalist blueprint technical drafting, thin white line art on deep navy paper, \
    engineering annotations, isometric, no text, no people: ";

/// Prompts for the four decorative background panels.
pub const BACKGROUND_PROMPTS: [&str; 4] = [
    "an exploded view of a mechanical keyboard switch",
    "a server rack with cable routing diagrams",
    "a circuit board trace layout around a CPU socket",
    "a satellite dish with signal path annotations",
];

/// Builds the persona system instruction for the given trigger and status instruction.
pub fn persona_system_instruction(trigger: &str, status_instruction: &str) -> String {
    format!(
        "{PERSONA_SYSTEM}\n\n{}\n\n{status_instruction}",
        HANDOFF_RULE_TEMPLATE.replace("{trigger}", trigger)
    )
}

pub fn news_prompt(count: usize) -> String {
    NEWS_PROMPT_TEMPLATE.replace("{count}", &count.to_string())
}

pub fn asset_prompt(prompt: &str) -> String {
    format!("{ASSET_STYLE_PREFIX}{prompt}")
}
