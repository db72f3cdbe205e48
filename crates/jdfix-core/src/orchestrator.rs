use std::collections::VecDeque;

use anyhow::Result;
use tracing::{debug, info};

use crate::classifier::{self, index_prefix};
use crate::config::Config;
use crate::fixer;
use crate::links;
use crate::node::Node;

/// One corrected name awaiting the operator's approval.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub old: Node,
    pub new: Node,
}

/// Counters for one repair run.
#[derive(Debug, Default)]
pub struct FixReport {
    pub files_scanned: usize,
    pub renames_proposed: usize,
    pub renames_applied: usize,
    pub references_updated: usize,
    pub aborted: bool,
}

/// Breadth-first renumbering over the tree. Each level is fully proposed,
/// sorted by target index, confirmed, and committed before the next level
/// starts, so every node's parent index is final by the time the node's own
/// index is computed. A rejected proposal stops the run; committed renames
/// stay in place.
pub fn run<F>(root: &Node, config: &Config, confirm: &mut F) -> Result<FixReport>
where
    F: FnMut(&Proposal, &[Node]) -> Result<bool>,
{
    let mut queue: VecDeque<Node> = classifier::areas_in_dir(root)?.into();
    let mut report = FixReport::default();

    while !queue.is_empty() {
        let parents: Vec<Node> = queue.drain(..).collect();
        debug!("Processing {} directories at this level", parents.len());

        // Propose the whole level before touching anything.
        let mut children: Vec<Node> = Vec::new();
        let mut proposals: Vec<(usize, Node)> = Vec::new();
        for parent in &parents {
            for child in parent.children()? {
                report.files_scanned += 1;
                if let Some(fixed) = fixer::fix_index(&child, config)? {
                    if fixed.name != child.name {
                        proposals.push((children.len(), fixed));
                    }
                }
                children.push(child);
            }
        }

        // Review order follows the target index, not enumeration order.
        proposals.sort_by(|(_, a), (_, b)| {
            let a_index = index_prefix(&a.name);
            let b_index = index_prefix(&b.name);
            numeric_value(a_index)
                .total_cmp(&numeric_value(b_index))
                .then_with(|| a_index.cmp(b_index))
        });

        for (slot, new) in proposals {
            report.renames_proposed += 1;
            let proposal = Proposal {
                old: children[slot].clone(),
                new,
            };
            let siblings = proposal.old.siblings()?;
            if !confirm(&proposal, &siblings)? {
                info!("Rename of '{}' rejected, stopping", proposal.old.name);
                report.aborted = true;
                return Ok(report);
            }
            proposal.old.rename_to(&proposal.new)?;
            info!("Renamed '{}' to '{}'", proposal.old.name, proposal.new.name);
            if config.update_wiki_links {
                report.references_updated +=
                    links::update_references(root, &proposal.old, &proposal.new, config)?;
            }
            children[slot] = proposal.new;
            report.renames_applied += 1;
        }

        // Descend with the committed names; excluded directories keep their
        // whole subtree out of the run.
        for child in children {
            if child.is_dir() && !config.is_excluded(&child.name) {
                queue.push_back(child);
            }
        }
    }

    Ok(report)
}

fn numeric_value(index: &str) -> f64 {
    index.parse::<f64>().unwrap_or(f64::INFINITY)
}
