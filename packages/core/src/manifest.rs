//! Declarative tree descriptions.
//!
//! A manifest is a serializable description of a tree, one entry per node:
//! ```json
//! {"type": "folder", "name": "proj", "children": [
//!     {"type": "file", "name": "readme", "content": "hi"},
//!     {"type": "folder", "name": "src"}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::node::{File, Folder, Node};
use crate::path::validate_name;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    File {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Folder {
        name: String,
        #[serde(default)]
        children: Vec<Entry>,
    },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::File { name, .. } | Entry::Folder { name, .. } => name,
        }
    }

    /// Build a fresh, unmounted tree from this entry.
    ///
    /// Every child goes through [`Folder::add`], so the same validation
    /// applies as when building by hand.
    pub fn build(&self) -> Result<Node, Error> {
        validate_name(self.name())?;
        match self {
            Entry::File { name, content } => {
                let file = File::new(name.clone());
                if let Some(content) = content {
                    file.set_content(content.clone());
                }
                Ok(Node::File(file))
            }
            Entry::Folder { name, children } => {
                let folder = Folder::new(name.clone());
                for child in children {
                    folder.add(child.build()?)?;
                }
                Ok(Node::Folder(folder))
            }
        }
    }

    /// Describe an existing tree. Children are listed folders first.
    pub fn snapshot(node: &Node) -> Entry {
        match node {
            Node::File(file) => Entry::File {
                name: file.name(),
                content: file.content(),
            },
            Node::Folder(folder) => Entry::Folder {
                name: folder.name(),
                children: folder.children().iter().map(Entry::snapshot).collect(),
            },
        }
    }
}
