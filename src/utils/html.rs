// src/utils/html.rs

/// Clean HTML content using the ammonia library.
///
/// Question stems, options and explanations are stored as sanitised HTML:
/// safe formatting tags (like <b>, <sup>) survive, while <script>, <iframe>
/// and event-handler attributes are stripped. Bare `<` and `>` come back
/// entity-escaped, so clients must render these fields as HTML.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
