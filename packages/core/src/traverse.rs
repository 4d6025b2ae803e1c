//! Lazy pre-order traversal and name search over a folder's subtree.

use crate::node::{File, Folder, Node};

/// Pre-order walk yielding `(node, depth)` pairs.
///
/// At every level the direct files come first, then each direct folder
/// immediately followed by its own subtree one level deeper. A folder's child
/// lists are snapshotted when the walk enters it. Call
/// [`Folder::traverse`] again to start over.
pub struct Traverse {
    stack: Vec<Frame>,
}

struct Frame {
    files: std::vec::IntoIter<File>,
    folders: std::vec::IntoIter<Folder>,
    depth: usize,
}

impl Frame {
    fn enter(folder: &Folder, depth: usize) -> Self {
        let inner = folder.inner.borrow();
        Frame {
            files: inner.files.clone().into_iter(),
            folders: inner.folders.clone().into_iter(),
            depth,
        }
    }
}

impl Iterator for Traverse {
    type Item = (Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let depth = frame.depth;

            if let Some(file) = frame.files.next() {
                return Some((Node::File(file), depth));
            }

            if let Some(folder) = frame.folders.next() {
                self.stack.push(Frame::enter(&folder, depth + 1));
                return Some((Node::Folder(folder), depth));
            }

            self.stack.pop();
        }
    }
}

/// Every node of a traversal whose name contains a keyword.
pub struct Search {
    traverse: Traverse,
    keyword: String,
}

impl Iterator for Search {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        for (node, _) in self.traverse.by_ref() {
            if node.name().contains(self.keyword.as_str()) {
                return Some(node);
            }
        }
        None
    }
}

impl Folder {
    /// Walk the subtree below this folder; direct children are at depth 0.
    pub fn traverse(&self) -> Traverse {
        Traverse {
            stack: vec![Frame::enter(self, 0)],
        }
    }

    /// Nodes below this folder whose name contains `keyword`, in traversal
    /// order.
    pub fn search(&self, keyword: impl Into<String>) -> Search {
        Search {
            traverse: self.traverse(),
            keyword: keyword.into(),
        }
    }
}
