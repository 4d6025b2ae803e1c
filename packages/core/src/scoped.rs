//! Mounts that last exactly as long as a scope.

use std::ops::Deref;
use std::path::Path;

use crate::error::Error;
use crate::node::Folder;

/// A mounted folder that is unmounted when the guard goes away.
///
/// Prefer [`MountGuard::unmount`] to observe unmount errors; dropping the
/// guard (including during a panic) unmounts too, but can only log a failure.
#[must_use = "dropping the guard unmounts the folder immediately"]
pub struct MountGuard {
    folder: Folder,
    armed: bool,
}

impl MountGuard {
    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    /// Unmount now, reporting any failure.
    pub fn unmount(mut self) -> Result<(), Error> {
        self.armed = false;
        self.folder.delete()
    }
}

impl Deref for MountGuard {
    type Target = Folder;

    fn deref(&self) -> &Self::Target {
        &self.folder
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.folder.delete() {
            log::warn!(
                "Failed to unmount {} while dropping its guard: {}",
                self.folder.logical_path(),
                e
            );
        }
    }
}

impl Folder {
    /// Mount this folder at `base` until the returned guard is dropped.
    pub fn mount_scoped(&self, base: impl AsRef<Path>) -> Result<MountGuard, Error> {
        let folder = self.mount(base)?;
        Ok(MountGuard {
            folder,
            armed: true,
        })
    }
}

/// Run `f` with `folder` mounted at `base`, unmounting on every way out.
///
/// An error from `f` wins over an error from the unmount that follows it.
///
/// ```rust
/// use treemount_core::{with_mount, File, Folder};
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let root = Folder::new("proj");
/// root.add(File::with_content("readme", "hi")).unwrap();
///
/// let at = dir.path().join("proj");
/// let body = with_mount(&root, &at, |mounted| {
///     std::fs::read_to_string(mounted.materialized_path()?.join("readme"))
///         .map_err(|e| treemount_core::Error::Io { action: "reading", path: at.clone(), source: e })
/// })
/// .unwrap();
///
/// assert_eq!(body, "hi");
/// assert!(!at.exists());
/// ```
pub fn with_mount<T, E, F>(folder: &Folder, base: impl AsRef<Path>, f: F) -> Result<T, E>
where
    F: FnOnce(&Folder) -> Result<T, E>,
    E: From<Error>,
{
    let guard = folder.mount_scoped(base)?;
    let result = f(&guard);
    let unmounted = guard.unmount();
    let value = result?;
    unmounted?;
    Ok(value)
}
