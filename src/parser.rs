//! Turns a token stream into a validated [`CommandGroup`].
//!
//! Splitting on `&` and checking `>` placement happen for the whole line before
//! anything runs, so a bad member rejects the group as a whole. The redirect is
//! extracted here, once, so nothing downstream re-derives it from token positions.

use crate::command::{Command, CommandGroup, PARALLEL, REDIRECT, Token};
use crate::error::ParsingError;
use std::path::PathBuf;

/// Build the command group for one line.
///
/// Lines without `&` become a single-member group.
pub fn construct_group(tokens: Vec<Token>) -> Result<CommandGroup, ParsingError> {
    let commands = if tokens.iter().any(|t| t == PARALLEL) {
        split_parallel(tokens)?
    } else {
        vec![tokens]
    };

    for (index, command) in commands.iter().enumerate() {
        validate_redirect(index, command)?;
    }

    Ok(commands.into_iter().map(extract_redirect).collect())
}

/// Split a token stream on `&` into independent commands.
///
/// A leading `&` or two adjacent `&` are errors; a trailing `&` just ends the
/// last command. The trailing `&` is dropped before adjacency is checked, so
/// `a & &` is one command.
pub fn split_parallel(mut tokens: Vec<Token>) -> Result<Vec<Vec<Token>>, ParsingError> {
    if tokens.first().is_some_and(|t| t == PARALLEL) {
        return Err(ParsingError::LeadingSeparator);
    }
    if tokens.last().is_some_and(|t| t == PARALLEL) {
        tokens.pop();
    }
    if tokens.windows(2).any(|w| w[0] == PARALLEL && w[1] == PARALLEL) {
        return Err(ParsingError::EmptyCommand);
    }

    let mut commands = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        if token != PARALLEL {
            current.push(token);
        } else if !current.is_empty() {
            commands.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        commands.push(current);
    }

    Ok(commands)
}

/// Check that a command has at most one `>`, with a program before it and
/// exactly one target after it.
///
/// `index` is the command's position in its group and only feeds the error.
pub fn validate_redirect(index: usize, command: &[Token]) -> Result<(), ParsingError> {
    let mut positions = command
        .iter()
        .enumerate()
        .filter(|(_, t)| *t == REDIRECT)
        .map(|(pos, _)| pos);

    let Some(pos) = positions.next() else {
        return Ok(());
    };
    if positions.next().is_some() {
        return Err(ParsingError::MultipleRedirects(index));
    }
    if pos == 0 || pos + 2 != command.len() {
        return Err(ParsingError::MisplacedRedirect(index));
    }
    Ok(())
}

/// Drop a trailing `> target` pair into [`Command::redirect`].
///
/// Expects a command that already passed [`validate_redirect`].
fn extract_redirect(mut tokens: Vec<Token>) -> Command {
    let has_redirect = tokens.len() >= 2 && tokens[tokens.len() - 2] == REDIRECT;
    let redirect = if has_redirect {
        let target = tokens.pop().map(PathBuf::from);
        tokens.pop();
        target
    } else {
        None
    };

    Command {
        argv: tokens,
        redirect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<Token> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn cmd(argv: &[&str], redirect: Option<&str>) -> Command {
        Command {
            argv: tokens(argv),
            redirect: redirect.map(PathBuf::from),
        }
    }

    #[test]
    fn test_single_command_without_operators() {
        let group = construct_group(tokens(&["ls", "-la"])).unwrap();
        assert_eq!(group, vec![cmd(&["ls", "-la"], None)]);
    }

    #[test]
    fn test_redirect_is_extracted() {
        let group = construct_group(tokens(&["echo", "hi", ">", "/tmp/f.txt"])).unwrap();
        assert_eq!(group, vec![cmd(&["echo", "hi"], Some("/tmp/f.txt"))]);
    }

    #[test]
    fn test_split_with_trailing_separator() {
        let split = split_parallel(tokens(&["a", "&", "b", "&"])).unwrap();
        assert_eq!(split, vec![tokens(&["a"]), tokens(&["b"])]);
    }

    #[test]
    fn test_split_rejects_leading_separator() {
        assert_eq!(
            split_parallel(tokens(&["&", "a"])),
            Err(ParsingError::LeadingSeparator)
        );
        assert_eq!(
            split_parallel(tokens(&["&"])),
            Err(ParsingError::LeadingSeparator)
        );
    }

    #[test]
    fn test_split_rejects_doubled_separator() {
        assert_eq!(
            split_parallel(tokens(&["a", "&", "&", "b"])),
            Err(ParsingError::EmptyCommand)
        );
        assert_eq!(
            split_parallel(tokens(&["a", "&", "&", "&"])),
            Err(ParsingError::EmptyCommand)
        );
    }

    #[test]
    fn test_split_single_command_with_trailing_separator() {
        let split = split_parallel(tokens(&["sleep", "1", "&"])).unwrap();
        assert_eq!(split, vec![tokens(&["sleep", "1"])]);
    }

    #[test]
    fn test_trailing_separator_is_dropped_before_adjacency_check() {
        let split = split_parallel(tokens(&["a", "&", "&"])).unwrap();
        assert_eq!(split, vec![tokens(&["a"])]);
    }

    #[test]
    fn test_validator_accepts_commands_without_redirect() {
        for command in [vec![], tokens(&["ls"]), tokens(&["a", "b", "c", "&"])] {
            assert_eq!(validate_redirect(0, &command), Ok(()));
        }
    }

    #[test]
    fn test_validator_rejects_misplaced_redirect() {
        let cases = [
            tokens(&[">", "out"]),
            tokens(&["ls", ">"]),
            tokens(&["ls", ">", "a", "b"]),
            tokens(&[">"]),
        ];
        for command in cases {
            assert_eq!(
                validate_redirect(3, &command),
                Err(ParsingError::MisplacedRedirect(3)),
                "{command:?}"
            );
        }
    }

    #[test]
    fn test_validator_rejects_multiple_redirects() {
        assert_eq!(
            validate_redirect(0, &tokens(&["ls", ">", ">", "out"])),
            Err(ParsingError::MultipleRedirects(0))
        );
        assert_eq!(
            validate_redirect(1, &tokens(&["ls", ">", "a", ">", "b"])),
            Err(ParsingError::MultipleRedirects(1))
        );
    }

    #[test]
    fn test_group_with_redirects_per_member() {
        let group = construct_group(tokens(&[
            "echo", "a", ">", "x", "&", "echo", "b", "&", "ls", ">", "y",
        ]))
        .unwrap();
        assert_eq!(
            group,
            vec![
                cmd(&["echo", "a"], Some("x")),
                cmd(&["echo", "b"], None),
                cmd(&["ls"], Some("y")),
            ]
        );
    }

    #[test]
    fn test_one_bad_member_rejects_the_group() {
        let err = construct_group(tokens(&["echo", "ok", "&", "ls", ">", "a", "b"])).unwrap_err();
        assert_eq!(err, ParsingError::MisplacedRedirect(1));
    }
}
