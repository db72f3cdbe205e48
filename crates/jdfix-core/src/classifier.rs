use crate::node::Node;
use crate::registry::{self, IndexType, Properness, TypeSpec};
use crate::IndexError;

/// The classifier's judgment for one node: which type its name belongs to,
/// and whether the index is canonical or merely eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: IndexType,
    pub properness: Properness,
}

pub const NOT_INDEXED: Classification = Classification {
    kind: IndexType::NotIndexed,
    properness: Properness::Improper,
};

impl Classification {
    pub fn is_proper(&self) -> bool {
        self.kind != IndexType::NotIndexed && self.properness == Properness::Proper
    }

    /// Indexed at the requested grade; a proper index also satisfies the
    /// improper (eligible) grade.
    pub fn is_indexed(&self, properness: Properness) -> bool {
        if self.kind == IndexType::NotIndexed {
            return false;
        }
        match properness {
            Properness::Proper => self.properness == Properness::Proper,
            Properness::Improper => true,
        }
    }
}

/// The index portions parsed out of a matched name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPortions {
    pub parent: Option<String>,
    pub main: String,
    pub sub: Option<String>,
}

/// The index candidate of a name: everything before the first space.
pub fn index_prefix(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}

/// Determine the best (type, properness) judgment for a node, preferring
/// proper matches across all types before falling back to improper ones.
pub fn classify(node: &Node) -> Classification {
    for properness in [Properness::Proper, Properness::Improper] {
        for kind in IndexType::ALL {
            if matches(node, kind, properness) {
                return Classification { kind, properness };
            }
        }
    }
    NOT_INDEXED
}

/// Whether the node validates as the given type at the given grade: its
/// depth is allowed, its parent classifies as a proper member of the
/// allowed parent set, and its index prefix matches the type's grammar.
pub fn matches(node: &Node, kind: IndexType, properness: Properness) -> bool {
    let Some(spec) = registry::spec_for(kind) else {
        return false;
    };
    if !spec.levels.contains(&node.level) {
        return false;
    }
    if !parent_allowed(spec, &classify(&node.parent())) {
        return false;
    }
    let prefix = index_prefix(&node.name);
    spec.patterns(properness)
        .iter()
        .any(|pattern| registry::pattern_matches(pattern, prefix))
}

// Parents must be proper members of the allowed set. NOT_INDEXED (only a
// legal parent for areas) carries no properness of its own, so it is
// matched on type alone.
fn parent_allowed(spec: &TypeSpec, parent: &Classification) -> bool {
    spec.parents.iter().any(|&allowed| match allowed {
        IndexType::NotIndexed => parent.kind == IndexType::NotIndexed,
        other => parent.kind == other && parent.properness == Properness::Proper,
    })
}

/// The node's validated full index string (its prefix), or a classification
/// failure when the name is not indexed.
pub fn full_index(node: &Node) -> Result<String, IndexError> {
    if classify(node).kind == IndexType::NotIndexed {
        return Err(classification_failure(node));
    }
    Ok(index_prefix(&node.name).to_string())
}

/// Parse the parent/main/sub portions out of the node's index, using the
/// grammar of its classified type.
pub fn portions(node: &Node) -> Result<IndexPortions, IndexError> {
    let classification = classify(node);
    if classification.kind == IndexType::NotIndexed {
        return Err(classification_failure(node));
    }
    let spec = registry::spec_for(classification.kind).ok_or_else(|| classification_failure(node))?;
    let prefix = index_prefix(&node.name);
    for pattern in spec.patterns(classification.properness) {
        if !registry::pattern_matches(pattern, prefix) {
            continue;
        }
        if let Some(caps) = pattern.captures(prefix) {
            if let Some(main) = caps.name("main") {
                return Ok(IndexPortions {
                    parent: caps.name("parent").map(|m| m.as_str().to_string()),
                    main: main.as_str().to_string(),
                    sub: caps.name("sub").map(|m| m.as_str().to_string()),
                });
            }
        }
    }
    Err(classification_failure(node))
}

/// The type-local portion distinguishing the node among siblings; improper
/// indexes carry their stray sub-index along (`main.sub`).
pub fn main_index(node: &Node) -> Result<String, IndexError> {
    let portions = portions(node)?;
    Ok(match portions.sub {
        Some(sub) => format!("{}.{}", portions.main, sub),
        None => portions.main,
    })
}

/// The portion the node inherited from its parent, if its grammar has one.
pub fn parent_index(node: &Node) -> Result<Option<String>, IndexError> {
    Ok(portions(node)?.parent)
}

/// The proper area directories directly under the root. An empty result is
/// a configuration error: the tree has no indexed regions to process.
pub fn areas_in_dir(root: &Node) -> Result<Vec<Node>, IndexError> {
    let areas: Vec<Node> = root
        .children()?
        .into_iter()
        .filter(|child| matches(child, IndexType::Area, Properness::Proper))
        .collect();
    if areas.is_empty() {
        return Err(IndexError::Configuration {
            message: format!(
                "no proper area directories found under '{}'",
                root.abs_path().display()
            ),
        });
    }
    Ok(areas)
}

fn classification_failure(node: &Node) -> IndexError {
    IndexError::Classification {
        name: node.name.clone(),
        message: "name does not carry a recognizable index".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixture names mirror a small vault:
    //   /vault/10-19 My Area/12 My Category/12.01 My Topic/...
    const AREA_PATH: &str = "/vault/10-19 My Area";
    const CATEGORY_PATH: &str = "/vault/10-19 My Area/12 My Category";
    const TOPIC_PATH: &str = "/vault/10-19 My Area/12 My Category/12.01 My Topic";
    const EXTENSION_PATH: &str =
        "/vault/10-19 My Area/12 My Category/12.01 My Topic/12.01+EXT My Extension";

    fn area(name: &str) -> Node {
        Node::from_name_and_path(name, "/vault", 0).unwrap()
    }

    fn category(name: &str) -> Node {
        Node::from_name_and_path(name, AREA_PATH, 1).unwrap()
    }

    fn topic(name: &str) -> Node {
        Node::from_name_and_path(name, CATEGORY_PATH, 2).unwrap()
    }

    fn level3(name: &str) -> Node {
        Node::from_name_and_path(name, TOPIC_PATH, 3).unwrap()
    }

    fn level4(name: &str) -> Node {
        Node::from_name_and_path(name, EXTENSION_PATH, 4).unwrap()
    }

    struct Fixtures {
        kind: IndexType,
        proper: Vec<Node>,
        improper_only: Vec<Node>,
        invalid: Vec<Node>,
    }

    fn all_fixtures() -> Vec<Fixtures> {
        vec![
            Fixtures {
                kind: IndexType::Area,
                proper: vec![area("10-19 My Area"), area("40-49 My Area2")],
                improper_only: vec![area("1 Area")],
                invalid: vec![
                    area("1a-19 Wrong Area"),
                    area("12-19 Wrong Area"),
                    area("10-29 Wrong Area"),
                ],
            },
            Fixtures {
                kind: IndexType::Category,
                proper: vec![category("12 My Category"), category("00 My Category")],
                improper_only: vec![
                    category("1 Category"),
                    category("1234567 Category"),
                    // A stray sub-index leaves the name eligible, not proper.
                    category("10.10 Category"),
                ],
                invalid: vec![category("1a Category"), category("10x Category")],
            },
            Fixtures {
                kind: IndexType::Topic,
                proper: vec![topic("12.01 My Topic"), topic("00.00 My Topic")],
                improper_only: vec![topic("1 Topic"), topic("12.01234 Topic")],
                invalid: vec![topic("1a.01 Wrong Topic"), topic("12_01 Wrong Topic")],
            },
            Fixtures {
                kind: IndexType::Extension,
                proper: vec![
                    level3("12.01+EXT My Extension"),
                    level3("12.02+A My Extension"),
                ],
                improper_only: vec![],
                invalid: vec![
                    level3("12.01+ext Wrong Extension"),
                    level3("12.01+123 Wrong Extension"),
                ],
            },
            Fixtures {
                kind: IndexType::Subtopic1,
                proper: vec![
                    level3("12.01-1234 My Subtopic"),
                    level3("12.01-1 My Subtopic"),
                ],
                improper_only: vec![level3("1 Subtopic")],
                invalid: vec![level3("12.01-a Wrong Subtopic")],
            },
            Fixtures {
                kind: IndexType::Subtopic2,
                proper: vec![
                    level4("12.01+EXT-1 My Subtopic"),
                    level4("12.01+EXT-1234 My Subtopic"),
                ],
                improper_only: vec![level4("1 My Subtopic")],
                invalid: vec![level4("12.01+EXT-a My Subtopic")],
            },
        ]
    }

    #[test]
    fn test_proper_names_satisfy_both_grades() {
        for fixtures in all_fixtures() {
            for node in &fixtures.proper {
                assert!(
                    matches(node, fixtures.kind, Properness::Proper),
                    "'{}' should be a proper {}",
                    node.name,
                    fixtures.kind
                );
                assert!(
                    matches(node, fixtures.kind, Properness::Improper),
                    "'{}' should be eligible as {}",
                    node.name,
                    fixtures.kind
                );
            }
        }
    }

    #[test]
    fn test_improper_names_are_eligible_but_not_proper() {
        for fixtures in all_fixtures() {
            for node in &fixtures.improper_only {
                assert!(
                    !matches(node, fixtures.kind, Properness::Proper),
                    "'{}' should not be a proper {}",
                    node.name,
                    fixtures.kind
                );
                assert!(
                    matches(node, fixtures.kind, Properness::Improper),
                    "'{}' should be eligible as {}",
                    node.name,
                    fixtures.kind
                );
            }
        }
    }

    #[test]
    fn test_invalid_names_fail_both_grades() {
        for fixtures in all_fixtures() {
            for node in &fixtures.invalid {
                for properness in [Properness::Proper, Properness::Improper] {
                    assert!(
                        !matches(node, fixtures.kind, properness),
                        "'{}' should not validate as {} ({:?})",
                        node.name,
                        fixtures.kind,
                        properness
                    );
                }
            }
        }
    }

    #[test]
    fn test_types_do_not_claim_each_others_proper_names() {
        for fixtures in all_fixtures() {
            for other in all_fixtures() {
                if other.kind == fixtures.kind {
                    continue;
                }
                for node in &fixtures.proper {
                    assert!(
                        !matches(node, other.kind, Properness::Proper),
                        "'{}' should not be a proper {}",
                        node.name,
                        other.kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_classify_picks_proper_type() {
        let cases = [
            (area("10-19 My Area"), IndexType::Area),
            (category("12 My Category"), IndexType::Category),
            (topic("12.01 My Topic"), IndexType::Topic),
            (level3("12.01+EXT My Extension"), IndexType::Extension),
            (level3("12.01-3 My Subtopic"), IndexType::Subtopic1),
            (level4("12.01+EXT-1 My Subtopic"), IndexType::Subtopic2),
        ];
        for (node, kind) in cases {
            let classification = classify(&node);
            assert_eq!(classification.kind, kind, "for '{}'", node.name);
            assert!(classification.is_proper(), "for '{}'", node.name);
        }
    }

    #[test]
    fn test_classify_reports_improper_for_stray_suffixes() {
        let classification = classify(&topic("12.01.3 My Topic"));
        assert_eq!(classification.kind, IndexType::Topic);
        assert_eq!(classification.properness, Properness::Improper);
    }

    #[test]
    fn test_classify_rejects_orphans() {
        // A category-shaped name cannot classify without a proper area above.
        let orphan = Node::from_name_and_path("12 My Category", "/vault/plain dir", 1).unwrap();
        assert_eq!(classify(&orphan), NOT_INDEXED);
    }

    #[test]
    fn test_classify_unindexed_names() {
        assert_eq!(classify(&category("Notes")), NOT_INDEXED);
        assert_eq!(classify(&area("misc")), NOT_INDEXED);
    }

    #[test]
    fn test_main_index_extraction() {
        assert_eq!(main_index(&area("10-19 My Area")).unwrap(), "1");
        assert_eq!(main_index(&category("12 My Category")).unwrap(), "2");
        assert_eq!(main_index(&topic("12.01 My Topic")).unwrap(), "01");
        assert_eq!(main_index(&level3("12.01+EXT My Extension")).unwrap(), "EXT");
        assert_eq!(main_index(&level3("12.01-3 My Subtopic")).unwrap(), "3");
    }

    #[test]
    fn test_main_index_carries_stray_sub_index() {
        assert_eq!(main_index(&topic("12.01.3 My Topic")).unwrap(), "01.3");
    }

    #[test]
    fn test_parent_index_extraction() {
        assert_eq!(parent_index(&area("10-19 My Area")).unwrap(), None);
        assert_eq!(
            parent_index(&category("12 My Category")).unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            parent_index(&topic("12.01 My Topic")).unwrap(),
            Some("12".to_string())
        );
        assert_eq!(
            parent_index(&level4("12.01+EXT-1 My Subtopic")).unwrap(),
            Some("12.01+EXT".to_string())
        );
    }

    #[test]
    fn test_portions_fail_for_unindexed_names() {
        let result = portions(&category("Notes"));
        assert!(matches!(result, Err(IndexError::Classification { .. })));
    }

    #[test]
    fn test_full_index_is_the_prefix() {
        assert_eq!(full_index(&topic("12.01 My Topic")).unwrap(), "12.01");
    }

    #[test]
    fn test_areas_in_dir_requires_at_least_one_area() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("just a folder")).unwrap();
        let root = Node::from_abs_path(dir.path(), -1).unwrap();
        let result = areas_in_dir(&root);
        assert!(matches!(result, Err(IndexError::Configuration { .. })));
    }

    #[test]
    fn test_areas_in_dir_finds_proper_areas_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("10-19 Admin")).unwrap();
        std::fs::create_dir(dir.path().join("20-29 Work")).unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();
        let root = Node::from_abs_path(dir.path(), -1).unwrap();
        let names: Vec<String> = areas_in_dir(&root)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["10-19 Admin", "20-29 Work"]);
    }
}
