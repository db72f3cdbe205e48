use std::fs;

use chrono::Local;
use tracing::{debug, info};

use crate::classifier;
use crate::config::Config;
use crate::fixer;
use crate::node::Node;
use crate::registry::{IndexType, Properness};
use crate::IndexError;

const INDEX_FILE_PREFIX: &str = "Index of ";

/// Write a fresh `Index of <name>.md` into the root and into every proper
/// area directory, replacing any stale index files found there. Returns the
/// number of index files written.
pub fn generate_index_files(root: &Node, config: &Config) -> Result<usize, IndexError> {
    let areas = classifier::areas_in_dir(root)?;
    let mut written = 0;
    for target in std::iter::once(root).chain(areas.iter()) {
        write_index_file(target, config)?;
        written += 1;
    }
    Ok(written)
}

fn write_index_file(target: &Node, config: &Config) -> Result<(), IndexError> {
    let mut contents = format!(
        "> [!info] **Generated on**: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    render_tree(target, target.level, config, &mut contents)?;

    for child in target.children()? {
        if child.name.starts_with(INDEX_FILE_PREFIX) && child.name.ends_with(".md") {
            debug!("Removing stale index file: {}", child.name);
            fs::remove_file(child.abs_path())?;
        }
    }

    let index_file = target.child(format!("{INDEX_FILE_PREFIX}{}.md", target.name));
    fs::write(index_file.abs_path(), contents)?;
    info!("Wrote {}", index_file.name);
    Ok(())
}

fn render_tree(
    parent: &Node,
    base_level: i32,
    config: &Config,
    out: &mut String,
) -> Result<(), IndexError> {
    let mut children: Vec<(fixer::SortKey, Node)> = parent
        .children()?
        .into_iter()
        .map(|child| (fixer::sort_key(&child), child))
        .collect();
    children.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (_, child) in children {
        if hidden_from_index(&child) {
            continue;
        }
        render_line(&child, base_level, config, out);
        if child.is_dir() {
            render_tree(&child, base_level, config, out)?;
        }
    }
    Ok(())
}

// The base directory stays uncluttered: only proper areas are listed at the
// top level, and dot-entries are never listed.
fn hidden_from_index(node: &Node) -> bool {
    if node.level == 0 && !classifier::matches(node, IndexType::Area, Properness::Proper) {
        return true;
    }
    node.name.starts_with('.')
}

fn render_line(node: &Node, base_level: i32, config: &Config, out: &mut String) {
    let indent = "    ".repeat((node.level - base_level - 1).max(0) as usize);
    out.push_str(&format!("{indent}{}. ", node.level));
    if node.is_dir() {
        out.push_str(&format!("**{}** ", node.name));
    } else {
        out.push_str(&format!("[[{}]] ", node.name));
    }
    if !classifier::classify(node).is_proper() && !config.is_excluded(&node.name) {
        out.push_str("**(NOT INDEXED)** ");
    }
    out.push('\n');
}
