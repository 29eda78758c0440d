use crate::command::{CommandGroup, Job};
use crate::error::ShellError;
use nix::unistd::{AccessFlags, access};
use std::path::PathBuf;
use tracing::trace;

/// Resolve a command name against the search path.
///
/// Behavior:
/// - A `/` is prepended to `name` unless it already starts with one.
/// - Each directory is concatenated with the name, in search path order.
/// - The first candidate the caller may execute (`access(2)` with `X_OK`) wins.
/// - No match, including an empty search path, returns `None`.
///
/// Absolute names are not special: `/bin/ls` with `["/bin"]` checks `/bin/bin/ls`.
pub fn find_command_path(search_path: &[String], name: &str) -> Option<PathBuf> {
    let name = if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    };

    search_path.iter().find_map(|dir| {
        let candidate = format!("{dir}{name}");
        let found = access(candidate.as_str(), AccessFlags::X_OK).is_ok();
        trace!(%candidate, found, "checking executable");
        found.then(|| PathBuf::from(candidate))
    })
}

/// Resolve every member of a group before anything is spawned.
///
/// A single unresolvable member fails the whole group.
pub fn resolve_group(search_path: &[String], group: CommandGroup) -> Result<Vec<Job>, ShellError> {
    group
        .into_iter()
        .map(|command| match find_command_path(search_path, command.program()) {
            Some(executable) => Ok(Job {
                command,
                executable,
            }),
            None => Err(ShellError::CommandNotFound(command.program().to_string())),
        })
        .collect()
}
