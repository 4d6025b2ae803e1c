//! Command-line front end: build a tree from a JSON manifest, then show,
//! search or mount it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use treemount_core::{Entry, Folder, Node};
use treemount_render::{listing, tree, Palette};

/// treemount - in-memory file trees mounted onto disk
#[derive(Parser, Debug)]
#[command(name = "treemount")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Disable colored output (also honours NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the whole tree described by a manifest
    Show { manifest: PathBuf },
    /// List the direct children of a folder in the tree
    Ls {
        manifest: PathBuf,
        /// Slash-delimited folder path relative to the root
        #[arg(default_value = "")]
        path: String,
    },
    /// Print the logical path of every node whose name contains KEYWORD
    Search { manifest: PathBuf, keyword: String },
    /// Write the tree to disk and leave it there
    Mount {
        manifest: PathBuf,
        /// Parent directory (with a trailing slash) or the root's own directory
        base: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Could not read manifest {}: {source}", .path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not parse manifest {}: {source}", .path.display())]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Manifest root must be a folder, found file \"{name}\"")]
    RootIsFile { name: String },
    #[error("{0}")]
    Tree(#[from] treemount_core::Error),
    #[error("{0}")]
    Output(#[from] io::Error),
}

/// Read a manifest file and build its root folder.
pub fn load_manifest(path: &Path) -> Result<Folder, CliError> {
    log::debug!("Reading manifest {}...", path.display());
    let raw = fs::read_to_string(path).map_err(|source| CliError::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    let entry: Entry = serde_json::from_str(&raw).map_err(|source| CliError::ParseManifest {
        path: path.to_path_buf(),
        source,
    })?;

    entry
        .build()?
        .into_folder()
        .ok_or_else(|| CliError::RootIsFile {
            name: entry.name().to_string(),
        })
}

/// Execute one command, writing its output to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let palette = if args.no_color {
        Palette::plain()
    } else {
        Palette::from_env()
    };

    match &args.command {
        Command::Show { manifest } => {
            let root = load_manifest(manifest)?;
            let label = treemount_render::label(&Node::Folder(root.clone()), &palette);
            writeln!(out, "{}", label)?;
            write!(out, "{}", tree(&root, &palette))?;
        }
        Command::Ls { manifest, path } => {
            let root = load_manifest(manifest)?;
            for line in listing(&root.descend(path)?, &palette) {
                writeln!(out, "{}", line)?;
            }
        }
        Command::Search { manifest, keyword } => {
            let root = load_manifest(manifest)?;
            for node in root.search(keyword.as_str()) {
                writeln!(out, "{}", node.logical_path())?;
            }
        }
        Command::Mount { manifest, base } => {
            let root = load_manifest(manifest)?.mount(base)?;
            writeln!(out, "{}", root.materialized_path()?.display())?;
        }
    }
    Ok(())
}
