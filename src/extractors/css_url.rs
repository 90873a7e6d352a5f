//! Tokenizer for `url(...)` references in CSS values
//!
//! Resolved `background-image` values are a comma-separated list of image
//! functions: `url("a.png")`, `url(b.png)`, gradients, `image-set(...)`.
//! This scanner walks the value once and returns each URL argument with
//! quotes and CSS escapes removed, in source order.

use std::iter::Peekable;
use std::str::CharIndices;

/// Extract every `url(...)` argument from a CSS value
///
/// Malformed trailing input (an unterminated string or a missing `)`)
/// ends the scan; URLs found before it are still returned.
#[must_use]
pub fn extract_css_urls(value: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut chars = value.char_indices().peekable();
    let mut previous: Option<char> = None;

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' | '\'' => {
                // Strings outside url() never carry references
                if read_string(&mut chars, ch).is_none() {
                    break;
                }
                previous = Some(ch);
                continue;
            }
            'u' | 'U' if starts_function(value, index, previous) => {
                // consume "rl("
                for _ in 0..3 {
                    chars.next();
                }
                match read_url_argument(&mut chars) {
                    Some(url) if !url.is_empty() => urls.push(url),
                    Some(_) => {}
                    None => break,
                }
                previous = Some(')');
                continue;
            }
            _ => {}
        }
        previous = Some(ch);
    }

    urls
}

/// True when `url(` begins at `index` and is not the tail of a longer name
fn starts_function(value: &str, index: usize, previous: Option<char>) -> bool {
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if previous.is_some_and(is_name_char) {
        return false;
    }
    value
        .get(index..index + 4)
        .is_some_and(|head| head.eq_ignore_ascii_case("url("))
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
        chars.next();
    }
}

/// Read the argument after `url(` through the closing parenthesis
fn read_url_argument(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    skip_whitespace(chars);

    let url = match chars.peek().map(|(_, c)| *c) {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            let url = read_string(chars, quote)?;
            skip_whitespace(chars);
            match chars.next() {
                Some((_, ')')) => url,
                _ => return None,
            }
        }
        Some(_) => read_unquoted(chars)?,
        None => return None,
    };

    Some(url.trim().to_string())
}

/// Read a string body after its opening quote, through the closing quote
fn read_string(chars: &mut Peekable<CharIndices<'_>>, quote: char) -> Option<String> {
    let mut out = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            c if c == quote => return Some(out),
            '\\' => {
                // An escaped newline inside a string is a line continuation
                if chars.peek().is_some_and(|(_, c)| *c == '\n') {
                    chars.next();
                } else if let Some(escaped) = read_escape(chars) {
                    out.push(escaped);
                }
            }
            c => out.push(c),
        }
    }
    None
}

/// Read an unquoted url body through the closing parenthesis
fn read_unquoted(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut out = String::new();
    while let Some((_, ch)) = chars.next() {
        match ch {
            ')' => return Some(out),
            '\\' => {
                if let Some(escaped) = read_escape(chars) {
                    out.push(escaped);
                }
            }
            c if c.is_whitespace() => {
                skip_whitespace(chars);
                return match chars.next() {
                    Some((_, ')')) => Some(out),
                    _ => None,
                };
            }
            c => out.push(c),
        }
    }
    None
}

/// Decode the escape following a backslash
///
/// Up to six hex digits name a code point (one trailing whitespace is part
/// of the escape); any other character stands for itself.
fn read_escape(chars: &mut Peekable<CharIndices<'_>>) -> Option<char> {
    let mut hex = String::new();
    while hex.len() < 6 && chars.peek().is_some_and(|(_, c)| c.is_ascii_hexdigit()) {
        if let Some((_, c)) = chars.next() {
            hex.push(c);
        }
    }

    if hex.is_empty() {
        return chars.next().map(|(_, c)| c);
    }

    if chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
        chars.next();
    }
    let code = u32::from_str_radix(&hex, 16).ok()?;
    Some(char::from_u32(code).filter(|c| *c != '\0').unwrap_or('\u{FFFD}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_and_unquoted() {
        assert_eq!(
            extract_css_urls(r#"url("https://x.test/a.png")"#),
            vec!["https://x.test/a.png"]
        );
        assert_eq!(extract_css_urls("url('b.png')"), vec!["b.png"]);
        assert_eq!(extract_css_urls("url( c.png )"), vec!["c.png"]);
    }

    #[test]
    fn test_layered_value_with_gradient() {
        let value = r#"linear-gradient(rgba(0, 0, 0, 0.5), rgb(255, 0, 0)), url("https://x.test/one.jpg"), URL(two.webp)"#;
        assert_eq!(
            extract_css_urls(value),
            vec!["https://x.test/one.jpg", "two.webp"]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            extract_css_urls(r#"url("it\"s.png")"#),
            vec![r#"it"s.png"#]
        );
        assert_eq!(extract_css_urls(r"url(a\(1\).png)"), vec!["a(1).png"]);
        assert_eq!(extract_css_urls(r"url(caf\e9 .png)"), vec!["café.png"]);
    }

    #[test]
    fn test_image_set_and_names_ending_in_url() {
        assert_eq!(
            extract_css_urls(r#"image-set(url("a.png") 1x, url("a@2x.png") 2x)"#),
            vec!["a.png", "a@2x.png"]
        );
        assert!(extract_css_urls("myurl(x.png)").is_empty());
    }

    #[test]
    fn test_malformed_input_keeps_earlier_urls() {
        assert_eq!(
            extract_css_urls(r#"url(first.png), url("unterminated"#),
            vec!["first.png"]
        );
        assert!(extract_css_urls("url(two words)").is_empty());
        assert!(extract_css_urls(r#"url("")"#).is_empty());
        assert!(extract_css_urls("none").is_empty());
    }
}
