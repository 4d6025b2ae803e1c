//! treemount: in-memory file trees that can be mounted onto disk.
//!
//! A tree of [`Folder`]s and [`File`]s is built and queried purely in memory.
//! Mounting a folder writes its subtree to a real directory, and from then
//! on anything added below it is written out as soon as it is added.
//! Unmounting ([`Folder::delete`]) removes the directory again.
//!
//! # Example
//!
//! ```rust
//! use treemount_core::{File, Folder};
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let root = Folder::new("proj");
//! root.add(File::with_content("readme", "hi")).unwrap();
//!
//! let root = root.mount(dir.path().join("proj")).unwrap();
//! root.add(File::with_content("license", "MIT")).unwrap();
//! assert!(dir.path().join("proj/license").is_file());
//!
//! root.delete().unwrap();
//! assert!(!dir.path().join("proj").exists());
//! ```

mod error;
mod folder;
pub mod manifest;
mod mount;
mod node;
mod path;
mod scoped;
mod traverse;

pub use error::Error;
pub use manifest::Entry;
pub use node::{Ancestors, File, Folder, Node, NodeKind};
pub use path::{validate_name, NodePath, PathError};
pub use scoped::{with_mount, MountGuard};
pub use traverse::{Search, Traverse};
