use std::time::UNIX_EPOCH;

use crate::classifier::{self, index_prefix};
use crate::config::Config;
use crate::node::Node;
use crate::registry::{self, IndexType, Properness};
use crate::IndexError;

/// Compute the corrected node for one tree entry. Returns `None` when the
/// node is excluded from indexing; otherwise the returned snapshot carries
/// the corrected name, which may equal the current one.
pub fn fix_index(node: &Node, config: &Config) -> Result<Option<Node>, IndexError> {
    if config.is_excluded(&node.name) {
        return Ok(None);
    }
    let parent_index = compute_parent_index(node)?;
    let main_index = compute_main_index(node, config)?;
    let fixed = attempt_reindex(node, &parent_index, &main_index)?;
    Ok(Some(fixed))
}

/// The portion a node inherits from its parent. Areas hand down their
/// single-digit region id, subtopics open a wildcard zone and hand down
/// nothing, and every other properly indexed parent hands down its full
/// index. An unindexed parent means the tree above this node has not been
/// repaired yet, which the breadth-first ordering rules out.
pub fn compute_parent_index(node: &Node) -> Result<String, IndexError> {
    let parent = node.parent();
    if classifier::matches(&parent, IndexType::Area, Properness::Proper) {
        return classifier::main_index(&parent);
    }
    if classifier::matches(&parent, IndexType::Subtopic1, Properness::Proper)
        || classifier::matches(&parent, IndexType::Subtopic2, Properness::Proper)
    {
        return Ok(String::new());
    }
    if classifier::classify(&parent).is_proper() {
        return classifier::full_index(&parent);
    }
    Err(IndexError::Classification {
        name: node.name.clone(),
        message: format!("parent '{}' has no proper index", parent.name),
    })
}

/// The node's new main index: extensions keep their alphabetic code, every
/// other node gets its zero-padded ordinal position among the non-excluded
/// siblings.
fn compute_main_index(node: &Node, config: &Config) -> Result<String, IndexError> {
    // Extension mains are hand-assigned codes, never renumbered.
    if classifier::matches(node, IndexType::Extension, Properness::Improper) {
        return classifier::main_index(node);
    }

    let mut siblings: Vec<(SortKey, Node)> = node
        .siblings()?
        .into_iter()
        .filter(|sibling| !config.is_excluded(&sibling.name))
        .map(|sibling| (sort_key(&sibling), sibling))
        .collect();
    siblings.sort_by(|(a, _), (b, _)| a.cmp(b));

    let position = siblings
        .iter()
        .position(|(_, sibling)| sibling.name == node.name)
        .ok_or_else(|| IndexError::Classification {
            name: node.name.clone(),
            message: "node not found among its siblings".to_string(),
        })?;

    Ok(pad_main_index(node, position, siblings.len()))
}

/// Sibling ordering: nodes whose current main index parses numerically keep
/// their relative numeric order; everything else falls to the tail, ranked
/// by creation time. A numeric index always outranks recency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SortKey {
    main: f64,
    created: u128,
}

impl Eq for SortKey {}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.main
            .total_cmp(&other.main)
            .then_with(|| self.created.cmp(&other.created))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) fn sort_key(node: &Node) -> SortKey {
    let main = classifier::main_index(node)
        .ok()
        .and_then(|main| main.parse::<f64>().ok())
        .unwrap_or(f64::INFINITY);
    let created = node
        .creation_time()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(u128::MAX);
    SortKey { main, created }
}

/// Zero-pad the ordinal so every index in the directory renders at the same
/// width. Topics are special-cased to two digits (`12.01` style) no matter
/// how few of them exist.
fn pad_main_index(node: &Node, position: usize, sibling_count: usize) -> String {
    let width = if classifier::matches(&node.parent(), IndexType::Category, Properness::Proper) {
        2
    } else {
        let largest_ordinal = sibling_count.saturating_sub(1);
        largest_ordinal.to_string().len()
    };
    format!("{position:0width$}")
}

/// Rewrite the node's name around a freshly computed index, without touching
/// the original. Each type spec is tried in registry order: the candidate
/// index is the parent portion joined to the main portion by that spec's
/// separator; a name the spec recognizes has its index prefix replaced,
/// anything else gets the index prepended. A candidate survives only if the
/// same spec still validates the rewritten name and the result classifies as
/// proper. Exhausting every spec means the sibling count or portions cannot
/// be encoded by any grammar.
pub fn attempt_reindex(
    node: &Node,
    parent_index: &str,
    main_index: &str,
) -> Result<Node, IndexError> {
    for spec in registry::specs() {
        let candidate = format!("{parent_index}{}{main_index}", spec.separator);
        let renamed = if classifier::matches(node, spec.kind, Properness::Improper) {
            let current = index_prefix(&node.name).to_string();
            node.with_name(node.name.replacen(&current, &candidate, 1))
        } else {
            node.with_name(format!("{candidate} {}", node.name))
        };
        if !classifier::matches(&renamed, spec.kind, Properness::Improper) {
            continue;
        }
        if classifier::classify(&renamed).is_proper() {
            return Ok(renamed);
        }
    }
    Err(IndexError::Unrepresentable {
        name: node.name.clone(),
        message: format!("no grammar accepts index portions '{parent_index}' + '{main_index}'"),
    })
}
