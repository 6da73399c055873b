use crate::parsers::text;

#[cfg(test)]
mod visible_text_tests {
    use super::*;

    #[test]
    fn test_empty_html() {
        assert_eq!(text::visible_text(""), "");
        assert_eq!(text::count_words(""), 0);
    }

    #[test]
    fn test_tags_become_spaces() {
        let html = "<p>Copier<br>rental</p><div>  in\n\tManila </div>";
        assert_eq!(text::visible_text(html), "Copier rental in Manila");
    }

    #[test]
    fn test_script_and_style_are_dropped() {
        let html = r#"<style type="text/css">body { color: red; }</style>
            <SCRIPT>var words = "should not count at all";</SCRIPT>
            <p>Visible words only</p>"#;
        assert_eq!(text::visible_text(html), "Visible words only");
    }

    #[test]
    fn test_multiline_script_is_dropped() {
        let html = "<script>\nfunction a() {\n  return 'hidden text here';\n}\n</script><p>shown</p>";
        assert_eq!(text::visible_text(html), "shown");
    }
}

#[cfg(test)]
mod word_count_tests {
    use super::*;

    #[test]
    fn test_short_tokens_are_ignored() {
        // "a", "an", "is", "to" are too short to count
        assert_eq!(text::count_tokens("a printer is an easy way to print"), 4);
    }

    #[test]
    fn test_count_words_from_html() {
        let html = "<h1>Office Printers</h1><p>Rent a copier today</p>";
        assert_eq!(text::count_words(html), 5);
    }

    #[test]
    fn test_unicode_tokens_use_character_length() {
        // "día" is three characters even though it is four bytes
        assert_eq!(text::count_tokens("día ño"), 1);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(text::normalize_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(text::normalize_whitespace("   "), "");
    }
}
