//! Binding a tree to a directory on disk.
//!
//! Mounting a folder records a base path on it and writes the folder and
//! every node below it to disk: folders become directories (created if
//! absent), files become regular files holding their current content
//! (truncated and rewritten if present). While a folder is mounted, every
//! node added anywhere below it is written out immediately.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::node::{Folder, MountPoint, Node};
use crate::path::validate_name;

impl Folder {
    /// Mount this folder at `base` and write the whole subtree to disk.
    ///
    /// A `base` ending in a separator is treated as a parent directory, so
    /// mounting `proj` at `/tmp/x/` materializes it at `/tmp/x/proj`. Any
    /// other `base` is used as the folder's own directory.
    ///
    /// Returns a handle to this folder for chaining.
    pub fn mount(&self, base: impl AsRef<Path>) -> Result<Folder, Error> {
        let name = self.name();
        validate_name(&name)?;

        if let Some(parent) = self.parent() {
            log::warn!(
                "Mounting {} while it is attached to {}; its own mount takes precedence below it",
                self.logical_path(),
                parent.logical_path()
            );
        }

        let mount = MountPoint::new(base.as_ref(), &name);
        let previous = self.inner.borrow().mount.clone();
        if let Some(previous) = previous.filter(|p| p.root_dir != mount.root_dir) {
            log::warn!(
                "Remounting {} at {}; {} is left on disk",
                self.logical_path(),
                mount.root_dir.display(),
                previous.root_dir.display()
            );
        }
        log::info!(
            "Mounting {} at {}",
            self.logical_path(),
            mount.root_dir.display()
        );
        self.inner.borrow_mut().mount = Some(mount);

        Node::Folder(self.clone()).materialize_subtree()?;
        Ok(self.clone())
    }

    /// Unmount: recursively delete the physical directory of this mount root
    /// and forget the mount base.
    ///
    /// Only a folder that was mounted itself can be unmounted; anything else
    /// fails with [`Error::NotMounted`]. The in-memory tree is untouched.
    pub fn delete(&self) -> Result<(), Error> {
        let mount = self.inner.borrow().mount.clone();
        let Some(mount) = mount else {
            return Err(Error::NotMounted {
                path: self.logical_path().to_string(),
            });
        };

        log::info!(
            "Unmounting {} from {}",
            self.logical_path(),
            mount.root_dir.display()
        );
        fs::remove_dir_all(&mount.root_dir)
            .map_err(|e| Error::io("removing", &mount.root_dir, e))?;

        self.inner.borrow_mut().mount = None;
        Ok(())
    }

    /// Rewrite this folder's subtree to disk.
    ///
    /// Content changes made to files after they were written are not
    /// propagated on their own; this brings the disk back in line with the
    /// tree. Fails with [`Error::NotMounted`] when nothing above is mounted.
    pub fn sync(&self) -> Result<(), Error> {
        if !self.is_mounted() {
            return Err(Error::NotMounted {
                path: self.logical_path().to_string(),
            });
        }
        Node::Folder(self.clone()).materialize_subtree()
    }

    /// The base path this folder was mounted with, if it is a mount root.
    pub fn mount_base(&self) -> Option<PathBuf> {
        self.inner.borrow().mount.as_ref().map(|m| m.base.clone())
    }
}

impl Node {
    /// Unmount a node. Files never carry a mount of their own, so this only
    /// succeeds for mounted folders.
    pub fn delete(&self) -> Result<(), Error> {
        match self {
            Node::Folder(folder) => folder.delete(),
            Node::File(file) => Err(Error::NotMounted {
                path: file.logical_path().to_string(),
            }),
        }
    }

    /// Write this node and, for a folder, everything below it.
    pub(crate) fn materialize_subtree(&self) -> Result<(), Error> {
        self.materialize()?;
        if let Node::Folder(folder) = self {
            for (node, _) in folder.traverse() {
                node.materialize()?;
            }
        }
        Ok(())
    }

    fn materialize(&self) -> Result<(), Error> {
        let target = self.materialized_path()?;
        match self {
            Node::Folder(_) => {
                if !target.is_dir() {
                    log::debug!("Creating {}...", target.display());
                    fs::create_dir_all(&target).map_err(|e| Error::io("creating", &target, e))?;
                }
            }
            Node::File(file) => {
                log::debug!("Writing {}...", target.display());
                let content = file.content().unwrap_or_default();
                fs::write(&target, content.as_bytes())
                    .map_err(|e| Error::io("writing", &target, e))?;
            }
        }
        Ok(())
    }
}
