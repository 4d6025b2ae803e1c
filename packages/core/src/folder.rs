//! Composition and lookup on folders.

use std::rc::Rc;

use crate::error::Error;
use crate::node::{File, Folder, Node};
use crate::path::{validate_name, NodePath};

impl Folder {
    /// Add a file or folder as a direct child of this folder.
    ///
    /// Folders go to the child folder collection and files to the child file
    /// collection, each in insertion order. If this folder is mounted (or has
    /// a mounted ancestor) the new node, and for a folder its whole existing
    /// subtree, is written to disk before returning.
    ///
    /// Rejected without changing the tree:
    /// - a node with an invalid name,
    /// - a folder that is itself a mount root,
    /// - a node that already has a parent,
    /// - this folder or one of its ancestors.
    pub fn add(&self, node: impl Into<Node>) -> Result<(), Error> {
        let node = node.into();
        let child = node.name();
        validate_name(&child)?;

        if let Node::Folder(folder) = &node {
            if folder.is_mount_root() {
                return Err(Error::MountedChild {
                    parent: self.name(),
                    child,
                });
            }
            if folder.ptr_eq(self) || self.ancestors().any(|a| a.ptr_eq(folder)) {
                return Err(Error::Cycle {
                    parent: self.name(),
                    child,
                });
            }
        }

        if let Some(parent) = node.parent() {
            return Err(Error::AlreadyAttached {
                parent: parent.logical_path().to_string(),
                child,
            });
        }

        let parent = Rc::downgrade(&self.inner);
        match &node {
            Node::Folder(folder) => {
                folder.inner.borrow_mut().parent = parent;
                self.inner.borrow_mut().folders.push(folder.clone());
            }
            Node::File(file) => {
                file.inner.borrow_mut().parent = parent;
                self.inner.borrow_mut().files.push(file.clone());
            }
        }

        if self.is_mounted() {
            node.materialize_subtree()?;
        }

        Ok(())
    }

    /// Add several nodes in order, stopping at the first rejected one.
    pub fn add_all<I, N>(&self, nodes: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        for node in nodes {
            self.add(node)?;
        }
        Ok(())
    }

    /// Remove the first direct child named `name`, folders searched first.
    ///
    /// Removing a name that isn't there is not an error; the return value is
    /// `None` in that case. A removed node becomes a standalone root. Nothing
    /// is deleted from disk.
    pub fn remove(&self, name: &str) -> Option<Node> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if let Some(i) = inner.folders.iter().position(|f| f.name() == name) {
                Some(Node::Folder(inner.folders.remove(i)))
            } else {
                inner
                    .files
                    .iter()
                    .position(|f| f.name() == name)
                    .map(|i| Node::File(inner.files.remove(i)))
            }
        };

        match &removed {
            Some(node) => node.detach(),
            None => log::debug!("{} has no child named {}", self.logical_path(), name),
        }
        removed
    }

    /// The direct child named `name`, folders searched first.
    pub fn lookup(&self, name: &str) -> Option<Node> {
        let inner = self.inner.borrow();
        inner
            .folders
            .iter()
            .find(|f| f.name() == name)
            .map(|f| Node::Folder(f.clone()))
            .or_else(|| {
                inner
                    .files
                    .iter()
                    .find(|f| f.name() == name)
                    .map(|f| Node::File(f.clone()))
            })
    }

    /// The direct child folder named `name`.
    pub fn folder(&self, name: &str) -> Result<Folder, Error> {
        let inner = self.inner.borrow();
        inner
            .folders
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .ok_or_else(|| Error::FolderNotFound {
                folder: inner.name.clone(),
                segment: name.to_string(),
                available: inner.folders.iter().map(Folder::name).collect(),
            })
    }

    /// The direct child file named `name`.
    pub fn file(&self, name: &str) -> Option<File> {
        self.inner
            .borrow()
            .files
            .iter()
            .find(|f| f.name() == name)
            .cloned()
    }

    /// Resolve a slash-delimited relative path one subfolder per segment.
    ///
    /// Files are never considered, and the first segment that doesn't name a
    /// child folder fails the whole resolution. The empty path resolves to
    /// this folder.
    pub fn descend(&self, path: &str) -> Result<Folder, Error> {
        let path = NodePath::parse(path)?;
        path.iter()
            .try_fold(self.clone(), |folder, segment| folder.folder(segment))
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.inner.borrow().folders.clone()
    }

    pub fn files(&self) -> Vec<File> {
        self.inner.borrow().files.clone()
    }

    /// Child folders followed by child files, each in insertion order.
    pub fn children(&self) -> Vec<Node> {
        let inner = self.inner.borrow();
        inner
            .folders
            .iter()
            .cloned()
            .map(Node::Folder)
            .chain(inner.files.iter().cloned().map(Node::File))
            .collect()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.borrow();
        inner.folders.len() + inner.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::node::MountPoint;

    fn nested() -> Folder {
        let a = Folder::new("a");
        let b = Folder::new("b");
        let c = Folder::new("c");
        b.add(c).unwrap();
        b.add(File::new("notes")).unwrap();
        a.add(b).unwrap();
        let root = Folder::new("root");
        root.add(a).unwrap();
        root
    }

    #[test]
    fn add_places_nodes_by_kind() {
        let root = Folder::new("root");
        root.add(File::new("f1")).unwrap();
        root.add(Folder::new("sub")).unwrap();
        root.add(File::new("f2")).unwrap();

        let folders: Vec<String> = root.folders().iter().map(Folder::name).collect();
        let files: Vec<String> = root.files().iter().map(File::name).collect();
        assert_eq!(folders, vec!["sub"]);
        assert_eq!(files, vec!["f1", "f2"]);
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn add_sets_parent() {
        let root = Folder::new("root");
        let file = File::new("f");
        root.add(file.clone()).unwrap();
        assert!(file.parent().unwrap().ptr_eq(&root));
    }

    #[test]
    fn children_lists_folders_then_files() {
        let root = Folder::new("root");
        root.add_all(vec![
            Node::from(File::new("z")),
            Node::from(Folder::new("y")),
            Node::from(File::new("x")),
            Node::from(Folder::new("w")),
        ])
        .unwrap();

        let names: Vec<String> = root.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["y", "w", "z", "x"]);
    }

    #[test]
    fn add_rejects_mount_roots() {
        let root = Folder::new("root");
        let data = Folder::new("data");
        data.inner.borrow_mut().mount = Some(MountPoint::new(Path::new("/srv/"), "data"));

        let err = root.add(data.clone()).unwrap_err();
        assert!(matches!(err, Error::MountedChild { .. }));
        assert!(root.is_empty());
        assert!(data.parent().is_none());
    }

    #[test]
    fn add_rejects_attached_nodes() {
        let first = Folder::new("first");
        let second = Folder::new("second");
        let file = File::new("f");
        first.add(file.clone()).unwrap();

        let err = second.add(file.clone()).unwrap_err();
        assert!(matches!(err, Error::AlreadyAttached { ref parent, .. } if parent == "first"));
        assert!(second.is_empty());
        assert!(file.parent().unwrap().ptr_eq(&first));
    }

    #[test]
    fn add_rejects_cycles() {
        let root = Folder::new("root");
        let sub = Folder::new("sub");
        root.add(sub.clone()).unwrap();

        assert!(matches!(root.add(root.clone()), Err(Error::Cycle { .. })));

        let detached_root = Folder::new("root2");
        sub.add(detached_root.clone()).unwrap();
        assert!(matches!(
            detached_root.add(root.clone()),
            Err(Error::Cycle { .. })
        ));
    }

    #[test]
    fn add_rejects_invalid_names() {
        let root = Folder::new("root");
        assert!(matches!(root.add(File::new("a/b")), Err(Error::Path(_))));
        assert!(matches!(root.add(Folder::new("")), Err(Error::Path(_))));
        assert!(root.is_empty());
    }

    #[test]
    fn remove_prefers_folders_and_detaches() {
        let root = Folder::new("root");
        let folder = Folder::new("dup");
        let file = File::new("dup");
        root.add(file.clone()).unwrap();
        root.add(folder.clone()).unwrap();

        let removed = root.remove("dup").unwrap();
        assert!(removed.ptr_eq(&Node::Folder(folder.clone())));
        assert!(folder.parent().is_none());
        assert_eq!(root.len(), 1);

        let removed = root.remove("dup").unwrap();
        assert!(removed.ptr_eq(&Node::File(file)));
        assert!(root.is_empty());
    }

    #[test]
    fn remove_missing_is_a_no_op() {
        let root = nested();
        assert!(root.remove("missing").is_none());
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn removed_node_can_be_re_added() {
        let root = Folder::new("root");
        let other = Folder::new("other");
        root.add(File::new("f")).unwrap();
        let removed = root.remove("f").unwrap();
        other.add(removed).unwrap();
        assert!(other.file("f").is_some());
    }

    #[test]
    fn lookup_finds_direct_children_only() {
        let root = nested();
        assert!(matches!(root.lookup("a"), Some(Node::Folder(_))));
        assert!(root.lookup("b").is_none());

        let b = root.descend("a/b").unwrap();
        assert!(matches!(b.lookup("notes"), Some(Node::File(_))));
        assert!(matches!(b.lookup("c"), Some(Node::Folder(_))));
    }

    #[test]
    fn descend_resolves_nested_folders() {
        let root = nested();
        let c = root.descend("a/b/c").unwrap();
        assert_eq!(c.name(), "c");
        assert_eq!(c.logical_path().to_string(), "root/a/b/c");
        assert!(root.descend("").unwrap().ptr_eq(&root));
        assert!(root.descend("/a//b/").unwrap().ptr_eq(&c.parent().unwrap()));
    }

    #[test]
    fn descend_reports_failing_segment() {
        let root = nested();
        let err = root.descend("a/x").unwrap_err();
        match err {
            Error::FolderNotFound {
                folder,
                segment,
                available,
            } => {
                assert_eq!(folder, "a");
                assert_eq!(segment, "x");
                assert_eq!(available, vec!["b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn descend_never_enters_files() {
        let root = nested();
        let err = root.descend("a/b/notes").unwrap_err();
        assert!(err.to_string().contains("-> notes"));
        assert!(err.to_string().contains("[c]"));
    }

    #[test]
    fn descend_rejects_malformed_paths() {
        let root = nested();
        assert!(matches!(root.descend("a/../a"), Err(Error::Path(_))));
    }

    #[test]
    fn folder_and_file_accessors() {
        let root = nested();
        assert!(root.folder("a").is_ok());
        assert!(root.folder("nope").is_err());
        let b = root.descend("a/b").unwrap();
        assert!(b.file("notes").is_some());
        assert!(b.file("c").is_none());
    }
}
