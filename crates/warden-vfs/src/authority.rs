//! The interception authority contract.
//!
//! Before touching the tree, every engine operation names itself with an
//! [`Action`] token (`group/verb`) and asks the configured [`Authority`]
//! whether to proceed with the already-normalized path. A `false` answer
//! aborts the operation with no state change.

use std::fmt;
use std::str::FromStr;

use warden_core::VfsPath;

use crate::flags::Flags;

macro_rules! actions {
    ($($variant:ident => $token:literal, $doc:literal;)+) => {
        /// An action token checked against the authority.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Action {
            $(
                #[doc = $doc]
                $variant,
            )+
        }

        impl Action {
            /// Every action token.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The `group/verb` token.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }
    };
}

actions! {
    Exists => "*/exist", "Probe whether any item exists.";
    FileExists => "file/exist", "Probe whether a file exists.";
    FolderExists => "folder/exist", "Probe whether a directory exists.";
    FileMake => "file/make", "Create an empty file.";
    FileRead => "file/read", "Read file content.";
    FileWrite => "file/write", "Write file content.";
    FileAppend => "file/append", "Append to a file.";
    FileCopy => "file/copy", "Copy a file.";
    FileMove => "file/move", "Move a file.";
    FileRemove => "file/remove", "Remove a file.";
    FileRename => "file/rename", "Rename a file.";
    FolderMake => "folder/make", "Create a directory.";
    FolderRead => "folder/read", "List a directory.";
    FolderRemove => "folder/remove", "Remove a directory.";
    FolderRename => "folder/rename", "Rename a directory.";
    FolderHasSubFolders => "folder/has-sub-folders", "Probe for sub-directories.";
    FolderTree => "folder/tree", "Clone a directory subtree.";
    FolderImport => "folder/import", "Import a directory snapshot.";
    FolderExport => "folder/export", "Export a directory snapshot.";
    FolderCwd => "folder/cwd", "Change the current directory.";
    FolderSeparator => "folder/separator", "Change the separator.";
    TableEntryRead => "*/getTableEntry", "Read an item's metadata entry.";
    FlagWrite => "flag/write", "Add flags to an item.";
    FlagRemove => "flag/remove", "Remove flags from an item.";
    FlagHas => "flag/has", "Probe an item's flag.";
    FlagRead => "flag/read", "Read an item's flags.";
    Export => "*/export", "Export the whole store.";
    Import => "*/import", "Replace the whole store from a snapshot.";
    AgentExist => "agent/exist", "Probe whether an authority is attached.";
}

impl Action {
    /// The group part of the token (`file`, `folder`, `flag`, `*`, `agent`).
    #[must_use]
    pub fn group(self) -> &'static str {
        self.as_str().split_once('/').map_or("", |(group, _)| group)
    }

    /// The verb part of the token.
    #[must_use]
    pub fn verb(self) -> &'static str {
        self.as_str().split_once('/').map_or("", |(_, verb)| verb)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown action tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

/// Operation-specific arguments passed alongside the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestExtra<'a> {
    /// No extra argument.
    None,
    /// Second path of a copy, move or rename.
    Destination(&'a VfsPath),
    /// Flags being added or removed.
    Flags(Flags),
    /// Force mode of a folder import.
    Force(bool),
    /// Requested new separator.
    Separator(char),
}

/// A single authorization question.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// The action being attempted.
    pub action: Action,
    /// Normalized target path.
    pub path: &'a VfsPath,
    /// Operation-specific arguments.
    pub extra: RequestExtra<'a>,
}

impl<'a> AccessRequest<'a> {
    /// A request with no extra argument.
    #[must_use]
    pub fn new(action: Action, path: &'a VfsPath) -> Self {
        Self {
            action,
            path,
            extra: RequestExtra::None,
        }
    }

    /// The destination path, for two-path operations.
    #[must_use]
    pub fn destination(&self) -> Option<&'a VfsPath> {
        match self.extra {
            RequestExtra::Destination(dest) => Some(dest),
            _ => None,
        }
    }
}

/// A decision function consulted before each engine operation.
///
/// Implementations are stateless from the engine's point of view.
pub trait Authority: Send + Sync {
    /// Return `true` to let the operation proceed.
    fn check(&self, request: &AccessRequest<'_>) -> bool;
}

impl<F> Authority for F
where
    F: Fn(&AccessRequest<'_>) -> bool + Send + Sync,
{
    fn check(&self, request: &AccessRequest<'_>) -> bool {
        self(request)
    }
}

/// Permits every action; the behavior of an engine with no authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authority for AllowAll {
    fn check(&self, _request: &AccessRequest<'_>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(*action));
        }
        assert!("file/teleport".parse::<Action>().is_err());
    }

    #[test]
    fn test_group_and_verb() {
        assert_eq!(Action::FileWrite.group(), "file");
        assert_eq!(Action::FileWrite.verb(), "write");
        assert_eq!(Action::Export.group(), "*");
        assert_eq!(Action::FolderHasSubFolders.verb(), "has-sub-folders");
    }

    #[test]
    fn test_closure_is_authority() {
        let only_reads = |req: &AccessRequest<'_>| req.action == Action::FileRead;
        let path = VfsPath::parse("/x");
        assert!(only_reads.check(&AccessRequest::new(Action::FileRead, &path)));
        assert!(!only_reads.check(&AccessRequest::new(Action::FileWrite, &path)));
        assert!(AllowAll.check(&AccessRequest::new(Action::FileWrite, &path)));
    }

    #[test]
    fn test_destination_accessor() {
        let src = VfsPath::parse("/a");
        let dst = VfsPath::parse("/b");
        let req = AccessRequest {
            action: Action::FileCopy,
            path: &src,
            extra: RequestExtra::Destination(&dst),
        };
        assert_eq!(req.destination(), Some(&dst));
        assert_eq!(AccessRequest::new(Action::FileCopy, &src).destination(), None);
    }
}
