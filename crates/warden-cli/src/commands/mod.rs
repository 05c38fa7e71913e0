//! Command implementations.

pub(crate) mod config;
pub(crate) mod files;
pub(crate) mod flags;
pub(crate) mod host;
pub(crate) mod init;
pub(crate) mod snapshot;
pub(crate) mod ticket;

/// `content`, or all of stdin when absent.
pub(crate) fn content_or_stdin(content: Option<String>) -> anyhow::Result<String> {
    match content {
        Some(content) => Ok(content),
        None => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}
