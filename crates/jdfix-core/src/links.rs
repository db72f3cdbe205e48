use std::fs;

use regex::Regex;
use tracing::info;

use crate::config::Config;
use crate::node::Node;
use crate::IndexError;

/// Rewrite wiki-style links after a rename: every `[[old stem]]` under the
/// root becomes `[[new stem]]`, keeping any `#fragment` or `|alias` suffix
/// inside the brackets. Returns the number of documents changed.
pub fn update_references(
    root: &Node,
    old: &Node,
    new: &Node,
    config: &Config,
) -> Result<usize, IndexError> {
    let old_stem = old.name_without_extension();
    let new_stem = new.name_without_extension();
    if old_stem == new_stem {
        return Ok(0);
    }
    let link = Regex::new(&format!(
        r"\[\[{}(?P<suffix>[#|][^\]]*)?\]\]",
        regex::escape(&old_stem)
    ))?;
    let mut updated = 0;
    rewrite_tree(root, &link, &new_stem, config, &mut updated)?;
    Ok(updated)
}

fn rewrite_tree(
    node: &Node,
    link: &Regex,
    new_stem: &str,
    config: &Config,
    updated: &mut usize,
) -> Result<(), IndexError> {
    for child in node.children()? {
        if config.is_excluded(&child.name) {
            continue;
        }
        if child.is_dir() {
            rewrite_tree(&child, link, new_stem, config, updated)?;
        } else if child.is_file() && child.extension() == ".md" {
            rewrite_document(&child, link, new_stem, updated)?;
        }
    }
    Ok(())
}

fn rewrite_document(
    node: &Node,
    link: &Regex,
    new_stem: &str,
    updated: &mut usize,
) -> Result<(), IndexError> {
    let contents = fs::read_to_string(node.abs_path())?;
    if !link.is_match(&contents) {
        return Ok(());
    }
    let rewritten = link.replace_all(&contents, |caps: &regex::Captures| {
        let suffix = caps.name("suffix").map(|m| m.as_str()).unwrap_or("");
        format!("[[{new_stem}{suffix}]]")
    });
    fs::write(node.abs_path(), rewritten.as_ref())?;
    info!("Updated references in: {}", node.name);
    *updated += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn nodes(root: &Path, old_name: &str, new_name: &str) -> (Node, Node, Node) {
        let root_node = Node::from_abs_path(root, -1).unwrap();
        let old = Node::from_name_and_path(old_name, root, 0).unwrap();
        let new = Node::from_name_and_path(new_name, root, 0).unwrap();
        (root_node, old, new)
    }

    #[test]
    fn test_plain_links_are_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("note.md");
        fs::write(&note, "See [[12.01-3 Notes]] for details.").unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        let updated = update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "See [[12.01-4 Notes]] for details."
        );
    }

    #[test]
    fn test_fragments_and_aliases_survive() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("note.md");
        fs::write(
            &note,
            "[[12.01-3 Notes#Heading]] and [[12.01-3 Notes|those notes]]",
        )
        .unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "[[12.01-4 Notes#Heading]] and [[12.01-4 Notes|those notes]]"
        );
    }

    #[test]
    fn test_other_links_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("note.md");
        fs::write(&note, "[[12.01-3 Notes Extra]] stays.").unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        let updated = update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(updated, 0);
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "[[12.01-3 Notes Extra]] stays."
        );
    }

    #[test]
    fn test_excluded_subtrees_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".obsidian");
        fs::create_dir(&hidden).unwrap();
        let cached = hidden.join("cache.md");
        fs::write(&cached, "[[12.01-3 Notes]]").unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        let updated = update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(updated, 0);
        assert_eq!(fs::read_to_string(&cached).unwrap(), "[[12.01-3 Notes]]");
    }

    #[test]
    fn test_non_markdown_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = dir.path().join("board.canvas");
        fs::write(&canvas, "[[12.01-3 Notes]]").unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        let updated = update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_links_in_nested_directories_are_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("10-19 Area").join("12 Category");
        fs::create_dir_all(&nested).unwrap();
        let note = nested.join("12.00 Journal.md");
        fs::write(&note, "today: [[12.01-3 Notes]]").unwrap();

        let (root, old, new) = nodes(dir.path(), "12.01-3 Notes.md", "12.01-4 Notes.md");
        let updated = update_references(&root, &old, &new, &Config::default()).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "today: [[12.01-4 Notes]]"
        );
    }
}
