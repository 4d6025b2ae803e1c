//! Logical node paths and node name validation.

use std::fmt;

/// Errors related to node names and logical paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A name (or path component) is not usable as a node name.
    InvalidName {
        name: String,
        position: usize,
        message: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidName {
                name,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid name '{}' at position {}: {}",
                    name, position, message
                )
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Check that `name` can be used as the name of a file or folder node.
///
/// Names end up as single physical path components once a tree is mounted,
/// so separators and the relative markers `.`/`..` are refused.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    validate_component(name, 0)
}

fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
    let message = if component.is_empty() {
        "empty name"
    } else if component == "." || component == ".." {
        "relative markers are not names"
    } else if component.contains('/') {
        "contains a path separator"
    } else if component.contains('\0') {
        "contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(PathError::InvalidName {
        name: component.to_string(),
        position,
        message: message.to_string(),
    })
}

/// A logical path inside a tree: the names from a root down to a node.
///
/// Logical paths never touch the disk; they are displayed slash-joined, so
/// the folder `src` inside the root `proj` has the logical path `proj/src`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodePath {
    pub components: Vec<String>,
}

impl NodePath {
    /// Parse a slash-delimited relative path, validating components.
    ///
    /// Empty components are ignored, which normalizes `//`, leading and
    /// trailing slashes:
    ///
    /// ```rust
    /// use treemount_core::NodePath;
    ///
    /// let path = NodePath::parse("src/bin/").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path, NodePath::parse("/src//bin").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let components: Vec<String> = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        for (i, component) in components.iter().enumerate() {
            validate_component(component, i)?;
        }

        Ok(NodePath { components })
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.components.iter()
    }

    pub fn has_prefix(&self, prefix: &NodePath) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }

    /// Strip a prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &NodePath) -> Option<NodePath> {
        if self.has_prefix(prefix) {
            Some(NodePath {
                components: self.components[prefix.components.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

/// Macro for creating logical paths from literals.
///
/// ```rust
/// use treemount_core::path;
///
/// let p = path!("proj/src/main.rs");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::NodePath::parse($s).expect("invalid path literal")
    };
}
