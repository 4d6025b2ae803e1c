//! Console rendering for treemount trees.
//!
//! The tree model only exposes names, node kinds and child order; all
//! presentation (colors, indentation) lives here.

use nu_ansi_term::{Color, Style};
use treemount_core::{Folder, Node, NodeKind};

/// Indentation per depth level in [`tree`].
pub const INDENT: usize = 3;

/// Styles used for each kind of node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub folder: Style,
    pub file: Style,
}

impl Palette {
    /// Folders in yellow, files in blue.
    pub fn colored() -> Self {
        Self {
            folder: Style::new().fg(Color::Yellow),
            file: Style::new().fg(Color::Blue),
        }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self {
            folder: Style::new(),
            file: Style::new(),
        }
    }

    /// `plain()` when `NO_COLOR` is set to anything non-empty, else `colored()`.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(value) if !value.is_empty() => Self::plain(),
            _ => Self::colored(),
        }
    }

    pub fn style(&self, kind: NodeKind) -> Style {
        match kind {
            NodeKind::Folder => self.folder,
            NodeKind::File => self.file,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

/// The node's name styled by its kind.
pub fn label(node: &Node, palette: &Palette) -> String {
    palette.style(node.kind()).paint(node.name()).to_string()
}

/// One label per direct child, folders first.
pub fn listing(folder: &Folder, palette: &Palette) -> Vec<String> {
    folder
        .children()
        .iter()
        .map(|node| label(node, palette))
        .collect()
}

/// One line per node below `folder`, indented by depth.
pub fn tree(folder: &Folder, palette: &Palette) -> String {
    let mut out = String::new();
    for (node, depth) in folder.traverse() {
        out.push_str(&" ".repeat(depth * INDENT));
        out.push_str(&label(&node, palette));
        out.push('\n');
    }
    out
}
