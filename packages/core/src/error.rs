//! Error types for tree composition, lookup and mounting.

use std::io;
use std::path::PathBuf;

use crate::path::PathError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A malformed name or path was passed to `add`, `mount` or `descend`.
    #[error("{0}")]
    Path(#[from] PathError),

    /// A mount root cannot be re-parented as a plain child.
    #[error("Mounted node ({child}) should be a root: \"{parent}->{child}\"")]
    MountedChild { parent: String, child: String },

    /// The node already lives in another folder's child collections.
    #[error("Node ({child}) is already attached to \"{parent}\"")]
    AlreadyAttached { parent: String, child: String },

    /// Adding the folder would make it its own ancestor.
    #[error("Adding \"{child}\" under \"{parent}\" would create a cycle")]
    Cycle { parent: String, child: String },

    #[error(
        "{folder} has no -> {segment}. Existing folders: [{}]",
        .available.join(", ")
    )]
    FolderNotFound {
        folder: String,
        segment: String,
        available: Vec<String>,
    },

    /// `delete`/`materialized_path` on a node with no mount in its ancestry.
    #[error("Mount base is not specified for {path}. Check that the resource is a mounted folder.")]
    NotMounted { path: String },

    #[error("An I/O error occurred while {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
