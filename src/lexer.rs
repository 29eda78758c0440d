//! A module implementing lexical analysis (tokenization) for the shell's line syntax.
//!
//! The grammar is tiny: whitespace separates words, and the two operators
//! `>` and `&` always stand alone, even when glued to neighbouring characters.

use crate::command::Token;

/// Characters that always become tokens of their own.
const SPECIAL: [char; 2] = ['>', '&'];

/// Performs lexical analysis on one input line.
///
/// # Arguments
/// * `line` - The raw line, without any particular newline handling required.
///
/// # Returns
/// `None` when the line is empty or contains only whitespace, so the caller can
/// skip it and read the next one. Otherwise the tokens in input order.
pub fn split_into_tokens(line: &str) -> Option<Vec<Token>> {
    let mut out = Vec::new();
    for word in line.split_whitespace() {
        separate_special_chars(word, &mut out);
    }

    if out.is_empty() { None } else { Some(out) }
}

/// Peel `>` and `&` off a whitespace-delimited word.
///
/// The first special character splits the word into the part before it, the
/// character itself and the rest; the rest is peeled again until nothing special
/// is left. Single-character pieces are never split further, and empty pieces
/// are dropped.
fn separate_special_chars(word: &str, out: &mut Vec<Token>) {
    let mut rest = word;
    while rest.len() > 1 {
        let Some(found) = rest.find(SPECIAL) else {
            break;
        };
        let (before, tail) = rest.split_at(found);
        if !before.is_empty() {
            out.push(before.to_string());
        }
        // SPECIAL chars are ASCII, so one byte wide.
        out.push(tail[..1].to_string());
        rest = &tail[1..];
    }

    if !rest.is_empty() {
        out.push(rest.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        split_into_tokens(line).expect("non-blank line")
    }

    #[test]
    fn test_blank_lines_are_signalled() {
        assert_eq!(split_into_tokens(""), None);
        assert_eq!(split_into_tokens("   \t  "), None);
        assert_eq!(split_into_tokens("\n"), None);
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(toks("  ls   -la\t/tmp "), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_spaced_redirect() {
        assert_eq!(toks("ls -la > out.txt"), vec!["ls", "-la", ">", "out.txt"]);
    }

    #[test]
    fn test_glued_operators_are_split() {
        assert_eq!(toks("echo a&echo b"), vec!["echo", "a", "&", "echo", "b"]);
        assert_eq!(toks("a>b"), vec!["a", ">", "b"]);
        assert_eq!(toks("ls >out"), vec!["ls", ">", "out"]);
        assert_eq!(toks("ls> out"), vec!["ls", ">", "out"]);
    }

    #[test]
    fn test_doubled_redirect_is_not_collapsed() {
        assert_eq!(toks("a>>b"), vec!["a", ">", ">", "b"]);
    }

    #[test]
    fn test_lone_operators_pass_through() {
        assert_eq!(toks(">"), vec![">"]);
        assert_eq!(toks("&"), vec!["&"]);
        assert_eq!(toks("sleep 1 &"), vec!["sleep", "1", "&"]);
    }

    #[test]
    fn test_mixed_operators_in_one_word() {
        assert_eq!(
            toks("a>b&c>d&"),
            vec!["a", ">", "b", "&", "c", ">", "d", "&"]
        );
        assert_eq!(toks("&&"), vec!["&", "&"]);
    }

    #[test]
    fn test_non_ascii_words_survive() {
        assert_eq!(toks("échö ünï>fïlé"), vec!["échö", "ünï", ">", "fïlé"]);
    }
}
