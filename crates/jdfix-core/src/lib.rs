use anyhow::Result;
use std::path::Path;
use tracing::info;

pub mod classifier;
pub mod config;
pub mod fixer;
pub mod links;
pub mod node;
pub mod orchestrator;
pub mod registry;
pub mod toc;

pub use classifier::{classify, Classification, IndexPortions};
pub use config::Config;
pub use fixer::{attempt_reindex, fix_index};
pub use node::Node;
pub use orchestrator::{FixReport, Proposal};
pub use registry::{IndexType, Properness};

#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("path error: {message}")]
    Path { message: String },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("cannot classify '{name}': {message}")]
    Classification { name: String, message: String },
    #[error("cannot form a proper index for '{name}': {message}")]
    Unrepresentable { name: String, message: String },
}

/// Repair every index under the root, asking the given callback before each
/// rename. The callback receives the proposal and the node's current
/// siblings; returning `Ok(false)` stops the run.
pub fn fix_tree_interactive<F>(root: &Path, config: &Config, mut confirm: F) -> Result<FixReport>
where
    F: FnMut(&Proposal, &[Node]) -> Result<bool>,
{
    info!("Starting index repair under: {:?}", root);

    let root_node = Node::from_abs_path(root, -1)?;
    let report = orchestrator::run(&root_node, config, &mut confirm)?;

    info!(
        "Index repair complete: {} files scanned, {} renames proposed, {} applied",
        report.files_scanned, report.renames_proposed, report.renames_applied
    );

    Ok(report)
}

/// Repair every index under the root, approving every proposal.
pub fn fix_tree(root: &Path, config: &Config) -> Result<FixReport> {
    fix_tree_interactive(root, config, |_, _| Ok(true))
}

/// Regenerate the `Index of …` files for the root and its areas. Returns
/// the number of index files written.
pub fn generate_index_files(root: &Path, config: &Config) -> Result<usize> {
    info!("Updating index files under: {:?}", root);

    let root_node = Node::from_abs_path(root, -1)?;
    let written = toc::generate_index_files(&root_node, config)?;

    info!("Index files updated: {written} written");

    Ok(written)
}
