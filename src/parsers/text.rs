use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern is valid")
});

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style pattern is valid")
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Minimum token length (exclusive) for a token to count as a word
pub const MIN_WORD_LEN: usize = 2;

/// Extracts the visible text of an HTML document
///
/// This function:
/// - Removes `<script>` and `<style>` blocks with their contents
/// - Replaces every remaining tag with a space
/// - Collapses runs of whitespace into single spaces
pub fn visible_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");
    let without_tags = ANY_TAG.replace_all(&without_styles, " ");

    normalize_whitespace(&without_tags)
}

/// Counts the words of an HTML document's visible text
pub fn count_words(html: &str) -> usize {
    count_tokens(&visible_text(html))
}

/// Counts space-separated tokens longer than [`MIN_WORD_LEN`] characters
pub fn count_tokens(text: &str) -> usize {
    text.split(' ')
        .filter(|token| token.chars().count() > MIN_WORD_LEN)
        .count()
}

/// Collapses every run of whitespace into a single space and trims both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
