//! Prompt construction for the two generative calls of a request.
//!
//! 1. The recommendation prompt asks for a JSON array of titles
//! 2. The explanation prompt asks for a numbered, per-title rationale

use domain::GenreFilter;

/// Number of suggestions requested from the generative service.
///
/// This is only a hint in the prompt: the pipeline accepts any number of
/// titles in the response and never pads or truncates.
pub const TARGET_SUGGESTIONS: usize = 25;

/// Build the prompt that asks for a list of movie titles.
pub fn recommendation_prompt(user_text: &str, genres: &GenreFilter) -> String {
    let mut prompt = String::new();

    if !genres.is_empty() {
        prompt.push_str(&format!("Focus on {} genres. ", genres.join(" and ")));
    }

    prompt.push_str(&format!(
        "Based on this request: \"{}\", provide a comprehensive list of {} movie \
         recommendations that match the following criteria:\n",
        user_text.trim(),
        TARGET_SUGGESTIONS
    ));

    if !genres.is_empty() {
        prompt.push_str(&format!("- Must include {} movies\n", genres.join(" or ")));
    }

    prompt.push_str(&format!(
        "- Should match the user's described preferences\n\
         - Include a mix of both popular and lesser-known films\n\
         - Aim to provide exactly {count} diverse recommendations\n\
         - Include both classic and contemporary options when applicable\n\
         \n\
         Important: Please ensure you provide exactly {count} movie suggestions.\n\
         Format your response as a JSON array with just the movie titles.\n\
         Example: [\"Movie 1\", \"Movie 2\", \"Movie 3\", ...]",
        count = TARGET_SUGGESTIONS
    ));

    prompt
}

/// Build the prompt that asks for a rationale of the picks.
///
/// `titles` are the titles the generative service suggested, before any
/// resolution or genre filtering.
pub fn explanation_prompt(titles: &[String], genres: &GenreFilter, user_text: &str) -> String {
    let mut prompt = format!("I'm recommending these movies: {}.\n", titles.join(", "));

    if !genres.is_empty() {
        prompt.push_str(&format!(
            "I focused specifically on {} genres as requested.\n",
            genres.join(" and ")
        ));
    }

    let scope = if genres.is_empty() {
        String::new()
    } else {
        format!(" in {}", genres.join("/"))
    };

    prompt.push_str(&format!(
        "Based on the user's request: \"{}\"\n\
         \n\
         Format your response like this:\n\
         \n\
         Here are my recommendations based on your preferences{}:\n\
         \n\
         1. **[Movie Title]**\n\
         [Explain how this movie matches their interests and genre preferences]\n\
         \n\
         2. **[Movie Title]**\n\
         [Explanation]\n\
         \n\
         Continue for all movies. Start each number on a new line.\n\
         Be conversational and engaging.",
        user_text.trim(),
        scope
    ));

    prompt
}
