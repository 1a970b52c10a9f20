use regex::Regex;
use std::sync::OnceLock;

fn speaker_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^| )((?:[A-Z][a-z]+(?:\s\d+)?)|[A-D]):\s*").expect("valid speaker regex")
    })
}

fn empty_blank() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\s*\)").expect("valid blank regex"))
}

/// Lay out question text for display: dialogue speakers ("A:", "Woman 1:")
/// start on their own line and empty "( )" blanks are widened
pub fn format_question(text: &str) -> String {
    let with_speakers = speaker_label().replace_all(text, |caps: &regex::Captures| {
        let head = if caps[1].is_empty() { "" } else { "\n" };
        format!("{head}{}: ", &caps[2])
    });

    empty_blank()
        .replace_all(&with_speakers, "(     )")
        .into_owned()
}
