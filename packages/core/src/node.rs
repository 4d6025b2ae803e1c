//! File and folder nodes and the shared behavior of every node.
//!
//! Nodes are cheap-to-clone handles. A folder owns its children through its
//! child collections; a child only keeps a weak link back to its parent, so
//! dropping a root releases the whole tree.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Local};

use crate::error::Error;
use crate::path::NodePath;

/// The two kinds of node a tree is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Folder => write!(f, "folder"),
        }
    }
}

/// Where a mount root lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MountPoint {
    /// The base path exactly as passed to `mount`.
    pub(crate) base: PathBuf,
    /// The directory the mount root itself materializes at.
    pub(crate) root_dir: PathBuf,
}

impl MountPoint {
    /// A base ending in a separator (or empty) is a parent directory and the
    /// root lands at `base/<name>`; any other base is the root's directory.
    pub(crate) fn new(base: &Path, name: &str) -> Self {
        let raw = base.as_os_str().to_string_lossy();
        let root_dir = if raw.is_empty() || raw.ends_with(std::path::is_separator) {
            base.join(name)
        } else {
            base.to_path_buf()
        };

        MountPoint {
            base: base.to_path_buf(),
            root_dir,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FileInner {
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Local>,
    pub(crate) parent: Weak<RefCell<FolderInner>>,
    pub(crate) content: Option<String>,
}

#[derive(Debug)]
pub(crate) struct FolderInner {
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Local>,
    pub(crate) parent: Weak<RefCell<FolderInner>>,
    pub(crate) folders: Vec<Folder>,
    pub(crate) files: Vec<File>,
    pub(crate) mount: Option<MountPoint>,
}

/// A leaf node with optional text content.
///
/// Changing the content of a file never touches the disk by itself: content
/// is written when the file is added to a mounted folder, when its tree is
/// mounted, or when a mounted tree is re-synced with [`Folder::sync`].
#[derive(Debug, Clone)]
pub struct File {
    pub(crate) inner: Rc<RefCell<FileInner>>,
}

/// A container node holding ordered child folders and child files.
#[derive(Debug, Clone)]
pub struct Folder {
    pub(crate) inner: Rc<RefCell<FolderInner>>,
}

/// Either kind of node.
#[derive(Debug, Clone)]
pub enum Node {
    File(File),
    Folder(Folder),
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    pub fn with_content(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::build(name.into(), Some(content.into()))
    }

    fn build(name: String, content: Option<String>) -> Self {
        File {
            inner: Rc::new(RefCell::new(FileInner {
                name,
                created_at: Local::now(),
                parent: Weak::new(),
                content,
            })),
        }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.inner.borrow().created_at
    }

    pub fn content(&self) -> Option<String> {
        self.inner.borrow().content.clone()
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.inner.borrow_mut().content = Some(content.into());
    }

    pub fn clear_content(&self) {
        self.inner.borrow_mut().content = None;
    }

    pub fn parent(&self) -> Option<Folder> {
        upgrade(&self.inner.borrow().parent)
    }

    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    pub fn logical_path(&self) -> NodePath {
        logical_path(self.name(), self.ancestors())
    }

    pub fn materialized_path(&self) -> Result<PathBuf, Error> {
        materialized_path(self.name(), None, self.ancestors())
            .ok_or_else(|| not_mounted(self.logical_path()))
    }

    pub fn is_mounted(&self) -> bool {
        self.ancestors().any(|folder| folder.is_mount_root())
    }

    /// True when both handles refer to the same file.
    pub fn ptr_eq(&self, other: &File) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            inner: Rc::new(RefCell::new(FolderInner {
                name: name.into(),
                created_at: Local::now(),
                parent: Weak::new(),
                folders: Vec::new(),
                files: Vec::new(),
                mount: None,
            })),
        }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.inner.borrow().created_at
    }

    pub fn parent(&self) -> Option<Folder> {
        upgrade(&self.inner.borrow().parent)
    }

    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    pub fn logical_path(&self) -> NodePath {
        logical_path(self.name(), self.ancestors())
    }

    /// The physical path this folder materializes at.
    ///
    /// Resolved against the nearest mount in the ancestry, this folder's own
    /// mount included. Fails with [`Error::NotMounted`] when there is none.
    pub fn materialized_path(&self) -> Result<PathBuf, Error> {
        let own = self.inner.borrow().mount.clone();
        materialized_path(self.name(), own.as_ref(), self.ancestors())
            .ok_or_else(|| not_mounted(self.logical_path()))
    }

    /// True if this folder or any of its ancestors is a mount root.
    pub fn is_mounted(&self) -> bool {
        self.is_mount_root() || self.ancestors().any(|folder| folder.is_mount_root())
    }

    /// True if this folder carries its own mount base.
    pub fn is_mount_root(&self) -> bool {
        self.inner.borrow().mount.is_some()
    }

    /// True when both handles refer to the same folder.
    pub fn ptr_eq(&self, other: &Folder) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Node {
    pub fn name(&self) -> String {
        match self {
            Node::File(file) => file.name(),
            Node::Folder(folder) => folder.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn created_at(&self) -> DateTime<Local> {
        match self {
            Node::File(file) => file.created_at(),
            Node::Folder(folder) => folder.created_at(),
        }
    }

    pub fn parent(&self) -> Option<Folder> {
        match self {
            Node::File(file) => file.parent(),
            Node::Folder(folder) => folder.parent(),
        }
    }

    /// Ancestors from the parent up to the root, nearest first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// The slash-joined names from the root down to this node.
    pub fn logical_path(&self) -> NodePath {
        match self {
            Node::File(file) => file.logical_path(),
            Node::Folder(folder) => folder.logical_path(),
        }
    }

    pub fn materialized_path(&self) -> Result<PathBuf, Error> {
        match self {
            Node::File(file) => file.materialized_path(),
            Node::Folder(folder) => folder.materialized_path(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        match self {
            Node::File(file) => file.is_mounted(),
            Node::Folder(folder) => folder.is_mounted(),
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::File(_) => None,
            Node::Folder(folder) => Some(folder),
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Node::File(_) => None,
            Node::Folder(folder) => Some(folder),
        }
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::File(a), Node::File(b)) => a.ptr_eq(b),
            (Node::Folder(a), Node::Folder(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Drop the link to the parent, making this node a standalone root.
    pub(crate) fn detach(&self) {
        match self {
            Node::File(file) => file.inner.borrow_mut().parent = Weak::new(),
            Node::Folder(folder) => folder.inner.borrow_mut().parent = Weak::new(),
        }
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.borrow().name)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.borrow().name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::File(file) => fmt::Display::fmt(file, f),
            Node::Folder(folder) => fmt::Display::fmt(folder, f),
        }
    }
}

/// Lazy walk from a node's parent up to its root, nearest first.
pub struct Ancestors {
    next: Option<Folder>,
}

impl Iterator for Ancestors {
    type Item = Folder;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

fn upgrade(parent: &Weak<RefCell<FolderInner>>) -> Option<Folder> {
    parent.upgrade().map(|inner| Folder { inner })
}

fn logical_path(name: String, ancestors: Ancestors) -> NodePath {
    let mut components: Vec<String> = ancestors.map(|folder| folder.name()).collect();
    components.reverse();
    components.push(name);
    NodePath { components }
}

fn materialized_path(
    name: String,
    own: Option<&MountPoint>,
    ancestors: Ancestors,
) -> Option<PathBuf> {
    if let Some(mount) = own {
        return Some(mount.root_dir.clone());
    }

    let mut below = vec![name];
    for folder in ancestors {
        if let Some(mount) = &folder.inner.borrow().mount {
            let mut path = mount.root_dir.clone();
            path.extend(below.iter().rev());
            return Some(path);
        }
        below.push(folder.name());
    }
    None
}

fn not_mounted(path: NodePath) -> Error {
    Error::NotMounted {
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Folder, Folder, File) {
        let root = Folder::new("proj");
        let src = Folder::new("src");
        let main = File::with_content("main.rs", "fn main() {}");
        src.add(main.clone()).unwrap();
        root.add(src.clone()).unwrap();
        (root, src, main)
    }

    #[test]
    fn logical_path_is_root_first() {
        let (root, src, main) = chain();
        assert_eq!(root.logical_path().to_string(), "proj");
        assert_eq!(src.logical_path().to_string(), "proj/src");
        assert_eq!(main.logical_path().to_string(), "proj/src/main.rs");
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let (_root, _src, main) = chain();
        let names: Vec<String> = main.ancestors().map(|f| f.name()).collect();
        assert_eq!(names, vec!["src", "proj"]);
    }

    #[test]
    fn standalone_nodes_have_no_parent() {
        let file = File::new("loose");
        assert!(file.parent().is_none());
        assert_eq!(file.ancestors().count(), 0);
        assert_eq!(file.logical_path().to_string(), "loose");
        assert_eq!(file.content(), None);
    }

    #[test]
    fn materialized_path_requires_a_mount() {
        let (root, _src, main) = chain();
        assert!(matches!(
            main.materialized_path(),
            Err(Error::NotMounted { ref path }) if path == "proj/src/main.rs"
        ));
        assert!(root.materialized_path().is_err());
    }

    #[test]
    fn materialized_path_follows_nearest_mount() {
        let (root, src, main) = chain();
        root.inner.borrow_mut().mount = Some(MountPoint::new(Path::new("/srv/"), "proj"));
        assert_eq!(
            main.materialized_path().unwrap(),
            PathBuf::from("/srv/proj/src/main.rs")
        );

        src.inner.borrow_mut().mount = Some(MountPoint::new(Path::new("/elsewhere"), "src"));
        assert_eq!(
            main.materialized_path().unwrap(),
            PathBuf::from("/elsewhere/main.rs")
        );
    }

    #[test]
    fn mount_point_conventions() {
        let into = MountPoint::new(Path::new("/tmp/x/"), "proj");
        assert_eq!(into.root_dir, PathBuf::from("/tmp/x/proj"));

        let at = MountPoint::new(Path::new("/tmp/root"), "proj");
        assert_eq!(at.root_dir, PathBuf::from("/tmp/root"));

        let cwd = MountPoint::new(Path::new(""), "proj");
        assert_eq!(cwd.root_dir, PathBuf::from("proj"));
    }

    #[test]
    fn file_content_is_mutable() {
        let file = File::new("notes");
        file.set_content("draft");
        assert_eq!(file.content().as_deref(), Some("draft"));
        file.clear_content();
        assert_eq!(file.content(), None);
    }

    #[test]
    fn node_kind_and_display() {
        let file: Node = File::new("a.txt").into();
        let folder: Node = Folder::new("docs").into();
        assert_eq!(file.kind(), NodeKind::File);
        assert_eq!(folder.kind(), NodeKind::Folder);
        assert_eq!(file.to_string(), "a.txt");
        assert_eq!(folder.to_string(), "docs");
        assert_eq!(NodeKind::Folder.to_string(), "folder");
    }

    #[test]
    fn ptr_eq_is_identity() {
        let a = Folder::new("same");
        let b = Folder::new("same");
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert!(!Node::from(a).ptr_eq(&Node::from(File::new("same"))));
    }

    #[test]
    fn created_at_is_fixed() {
        let file = File::new("stamp");
        let first = file.created_at();
        file.set_content("changed");
        assert_eq!(file.created_at(), first);
    }
}
