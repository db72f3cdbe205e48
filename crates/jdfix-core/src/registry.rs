use once_cell::sync::Lazy;
use regex::Regex;

/// The hierarchical index types, ordered the way the classifier tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    Area,
    Category,
    Topic,
    Extension,
    Subtopic1,
    Subtopic2,
    TheRest,
    NotIndexed,
}

impl IndexType {
    /// Every classifiable type, in classification order.
    pub const ALL: [IndexType; 7] = [
        IndexType::Area,
        IndexType::Category,
        IndexType::Topic,
        IndexType::Extension,
        IndexType::Subtopic1,
        IndexType::Subtopic2,
        IndexType::TheRest,
    ];
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IndexType::Area => "area",
            IndexType::Category => "category",
            IndexType::Topic => "topic",
            IndexType::Extension => "extension",
            IndexType::Subtopic1 => "subtopic",
            IndexType::Subtopic2 => "extension subtopic",
            IndexType::TheRest => "wildcard",
            IndexType::NotIndexed => "not indexed",
        };
        write!(f, "{label}")
    }
}

/// Whether a name carries the canonical index for its type, or is merely
/// eligible for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Properness {
    Proper,
    Improper,
}

// Index grammars, matched against the prefix of a name up to the first
// space. The regex crate has no backreferences, so the area rule (same
// digit on both sides of `0-…9`) carries a second capture that
// `pattern_matches` checks for equality.
const WILDCARD: &str = r"^(?P<main>[0-9]+)$";
const WILDCARD_IMPROPER: &str = r"^(?P<main>[0-9]+)\.(?P<sub>[0-9]+)$";

const AREA: &str = r"^(?P<main>[0-9])0-(?P<main_end>[0-9])9$";
const AREA_IMPROPER: &str = r"^(?P<main>[0-9])0-(?P<main_end>[0-9])9\.(?P<sub>[0-9]+)$";

const CATEGORY: &str = r"^(?P<parent>[0-9])(?P<main>[0-9])$";
const CATEGORY_IMPROPER: &str = r"^(?P<parent>[0-9])(?P<main>[0-9])\.(?P<sub>[0-9]+)$";

const TOPIC: &str = r"^(?P<parent>[0-9]{2})\.(?P<main>[0-9]{2})$";
const TOPIC_IMPROPER: &str = r"^(?P<parent>[0-9]{2})\.(?P<main>[0-9]{2,})\.(?P<sub>[0-9]+)$";

// Extension mains are alphabetic and never renumbered, so there is no
// improper extension form.
const EXTENSION: &str = r"^(?P<parent>[0-9]{2}\.[0-9]{2})\+(?P<main>[A-Z]+)$";

const SUBTOPIC_1: &str = r"^(?P<parent>[0-9]{2}\.[0-9]{2})-(?P<main>[0-9]+)$";
const SUBTOPIC_1_IMPROPER: &str =
    r"^(?P<parent>[0-9]{2}\.[0-9]{2})-(?P<main>[0-9]+)\.(?P<sub>[0-9]+)$";

const SUBTOPIC_2: &str = r"^(?P<parent>[0-9]{2}\.[0-9]{2}\+[A-Z]+)-(?P<main>[0-9]+)$";
const SUBTOPIC_2_IMPROPER: &str =
    r"^(?P<parent>[0-9]{2}\.[0-9]{2}\+[A-Z]+)-(?P<main>[0-9]+)\.(?P<sub>[0-9]+)$";

/// The shared superset every type (except extensions) accepts as improper:
/// all proper grammars plus their trailing `.<digits>` variants plus the
/// bare wildcard forms.
const IMPROPER_SET: [&str; 12] = [
    AREA,
    AREA_IMPROPER,
    CATEGORY,
    CATEGORY_IMPROPER,
    TOPIC,
    TOPIC_IMPROPER,
    SUBTOPIC_1,
    SUBTOPIC_1_IMPROPER,
    SUBTOPIC_2,
    SUBTOPIC_2_IMPROPER,
    WILDCARD,
    WILDCARD_IMPROPER,
];

/// One registry entry: how a type's index looks, where it may sit in the
/// tree, which parents legitimize it, and the glyph joining a parent index
/// to this type's main index.
pub struct TypeSpec {
    pub kind: IndexType,
    pub levels: &'static [i32],
    pub parents: &'static [IndexType],
    pub separator: &'static str,
    proper: Vec<Regex>,
    improper: Vec<Regex>,
}

impl TypeSpec {
    fn new(
        kind: IndexType,
        levels: &'static [i32],
        parents: &'static [IndexType],
        separator: &'static str,
        proper_sources: &[&str],
        improper_sources: &[&str],
    ) -> TypeSpec {
        let proper: Vec<Regex> = proper_sources.iter().map(|s| compile(s)).collect();
        // Improper grammar is the proper grammar followed by the shared
        // superset, first occurrence of each pattern winning on extraction.
        let mut improper = proper.clone();
        for source in improper_sources {
            if !proper_sources.contains(source) {
                improper.push(compile(source));
            }
        }
        TypeSpec {
            kind,
            levels,
            parents,
            separator,
            proper,
            improper,
        }
    }

    /// The ordered pattern list for the requested properness grade.
    pub fn patterns(&self, properness: Properness) -> &[Regex] {
        match properness {
            Properness::Proper => &self.proper,
            Properness::Improper => &self.improper,
        }
    }
}

fn compile(source: &str) -> Regex {
    // The sources are compile-time constants; a failure here is a defect in
    // this table, not an input condition.
    Regex::new(source).unwrap_or_else(|e| panic!("bad registry pattern '{source}': {e}"))
}

static SPECS: Lazy<Vec<TypeSpec>> = Lazy::new(|| {
    vec![
        TypeSpec::new(
            IndexType::Area,
            &[0],
            &[IndexType::NotIndexed],
            "",
            &[AREA],
            &IMPROPER_SET,
        ),
        TypeSpec::new(
            IndexType::Category,
            &[1],
            &[IndexType::Area],
            "",
            &[CATEGORY],
            &IMPROPER_SET,
        ),
        TypeSpec::new(
            IndexType::Topic,
            &[2],
            &[IndexType::Category],
            ".",
            &[TOPIC],
            &IMPROPER_SET,
        ),
        TypeSpec::new(
            IndexType::Extension,
            &[3],
            &[IndexType::Topic],
            "+",
            &[EXTENSION],
            &[],
        ),
        TypeSpec::new(
            IndexType::Subtopic1,
            &[3],
            &[IndexType::Topic],
            "-",
            &[SUBTOPIC_1],
            &IMPROPER_SET,
        ),
        TypeSpec::new(
            IndexType::Subtopic2,
            &[4],
            &[IndexType::Extension],
            "-",
            &[SUBTOPIC_2],
            &IMPROPER_SET,
        ),
        TypeSpec::new(
            IndexType::TheRest,
            &[4, 5, 6, 7, 8, 9, 10],
            &[IndexType::Subtopic1, IndexType::Subtopic2],
            "",
            &[WILDCARD],
            &IMPROPER_SET,
        ),
    ]
});

/// The full registry, in classification order.
pub fn specs() -> &'static [TypeSpec] {
    &SPECS
}

pub fn spec_for(kind: IndexType) -> Option<&'static TypeSpec> {
    specs().iter().find(|spec| spec.kind == kind)
}

/// Whether the index prefix fully matches the pattern, honoring the area
/// grammar's same-digit rule.
pub fn pattern_matches(pattern: &Regex, index: &str) -> bool {
    match pattern.captures(index) {
        Some(caps) => match (caps.name("main"), caps.name("main_end")) {
            (Some(main), Some(end)) => main.as_str() == end.as_str(),
            _ => true,
        },
        None => false,
    }
}
