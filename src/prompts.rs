//! Default analysis prompts and the payload diffing rule
//!
//! The backend treats a missing `custom_prompts` field as "use defaults", so
//! the client only transmits prompt text that actually differs from the
//! defaults. Matching text is omitted per field; when both match, the whole
//! field is sent as an explicit null.

use audigest_protocol::CustomPrompts;

pub const DEFAULT_SUMMARY_PROMPT: &str = "Produce a concise, professional key-point summary of the \
audio content. Start with an opening paragraph covering the overall theme, then list the key \
points under bold subheadings, each with an unordered list of supporting details. Do not include \
timestamps. Example layout:\n\n**Key point 1 subheading**\n- Detail 1\n- Detail 2";

pub const DEFAULT_TRANSCRIPT_PROMPT: &str = "Transcribe the audio content verbatim. If multiple \
speakers are present, try to distinguish them (for example: Speaker A, Speaker B). Render proper \
nouns, brand names and personal names in their original form where possible. Keep punctuation \
accurate and break the text into natural paragraphs.";

/// Compare edited prompt text against the defaults and keep only the fields
/// that differ. Comparison is on trimmed text; an empty edit still counts as
/// a deliberate override.
pub fn build_custom_prompts(
    summary: Option<&str>,
    transcript: Option<&str>,
) -> Option<CustomPrompts> {
    let summary_prompt = summary
        .map(str::trim)
        .filter(|text| *text != DEFAULT_SUMMARY_PROMPT)
        .map(String::from);
    let transcript_prompt = transcript
        .map(str::trim)
        .filter(|text| *text != DEFAULT_TRANSCRIPT_PROMPT)
        .map(String::from);

    if summary_prompt.is_none() && transcript_prompt.is_none() {
        None
    } else {
        Some(CustomPrompts {
            summary_prompt,
            transcript_prompt,
        })
    }
}
