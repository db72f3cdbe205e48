use anyhow::Result;
use inquire::Confirm;
use jdfix_core::{Node, Proposal};

/// Show one proposed rename with its surroundings and ask for approval.
/// Declining stops the whole run.
pub fn confirm_rename(proposal: &Proposal, siblings: &[Node]) -> Result<bool> {
    println!("\nParent: {}", proposal.old.parent().name);
    println!("Siblings:");
    for sibling in siblings {
        let marker = if sibling.name == proposal.old.name {
            " ->"
        } else {
            " -"
        };
        println!("{marker} {}", sibling.name);
    }
    println!();
    println!("  \x1b[31m- {}\x1b[0m", proposal.old.name);
    println!("  \x1b[32m+ {}\x1b[0m", proposal.new.name);

    let apply_change = Confirm::new("Apply this rename?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}
