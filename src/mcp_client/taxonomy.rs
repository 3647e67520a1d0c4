//! Tool taxonomy: maps a tool's declared name to a display family.
//!
//! Classification is a fixed, ordered rule table; the first matching rule
//! wins and `Other` is the explicit fallback. Adding a tool family is a
//! table change. Names that match nothing (including empty or odd names)
//! are deliberately bucketed as `Other` rather than rejected.

use std::collections::BTreeMap;
use std::fmt;

use super::types::ToolDescriptor;

// ─── ToolFamily ──────────────────────────────────────────────────────────────

/// Display category of a remote tool. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolFamily {
    Container,
    Pipeline,
    Cluster,
    Other,
}

impl ToolFamily {
    /// All families, in display order.
    pub const ALL: [ToolFamily; 4] = [
        ToolFamily::Container,
        ToolFamily::Pipeline,
        ToolFamily::Cluster,
        ToolFamily::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolFamily::Container => "Container",
            ToolFamily::Pipeline => "Pipeline",
            ToolFamily::Cluster => "Cluster",
            ToolFamily::Other => "Other",
        }
    }
}

impl fmt::Display for ToolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Rule Table ──────────────────────────────────────────────────────────────

/// How a rule matches the lowercased tool name.
#[derive(Debug, Clone, Copy)]
enum NameMatch {
    Prefix(&'static str),
    Contains(&'static str),
}

impl NameMatch {
    fn matches(self, name: &str) -> bool {
        match self {
            NameMatch::Prefix(p) => name.starts_with(p),
            NameMatch::Contains(s) => name.contains(s),
        }
    }
}

/// Ordered rules. Repository-lifecycle names are checked before the generic
/// build/push words so `repo_build` lands in `Pipeline`.
const FAMILY_RULES: &[(NameMatch, ToolFamily)] = &[
    (NameMatch::Prefix("container_"), ToolFamily::Container),
    (NameMatch::Prefix("repo_"), ToolFamily::Pipeline),
    (NameMatch::Prefix("git_"), ToolFamily::Pipeline),
    (NameMatch::Prefix("cicd_"), ToolFamily::Pipeline),
    (NameMatch::Contains("pipeline"), ToolFamily::Pipeline),
    (NameMatch::Contains("deploy"), ToolFamily::Pipeline),
    (NameMatch::Contains("application"), ToolFamily::Pipeline),
    (NameMatch::Contains("pod"), ToolFamily::Cluster),
    (NameMatch::Contains("namespace"), ToolFamily::Cluster),
    (NameMatch::Contains("resource"), ToolFamily::Cluster),
    (NameMatch::Contains("event"), ToolFamily::Cluster),
    (NameMatch::Prefix("projects_"), ToolFamily::Cluster),
    (NameMatch::Contains("build"), ToolFamily::Container),
    (NameMatch::Contains("push"), ToolFamily::Container),
    (NameMatch::Contains("inspect"), ToolFamily::Container),
    (NameMatch::Contains("image"), ToolFamily::Container),
    (NameMatch::Prefix("registry_"), ToolFamily::Container),
];

/// Classify a tool name. Total, pure, and case-insensitive.
pub fn classify(tool_name: &str) -> ToolFamily {
    let name = tool_name.trim().to_ascii_lowercase();
    FAMILY_RULES
        .iter()
        .find(|(rule, _)| rule.matches(&name))
        .map(|(_, family)| *family)
        .unwrap_or(ToolFamily::Other)
}

/// Group descriptors by family, each group sorted by tool name.
///
/// Families with no tools are omitted.
pub fn group_by_family(tools: &[ToolDescriptor]) -> BTreeMap<ToolFamily, Vec<&ToolDescriptor>> {
    let mut groups: BTreeMap<ToolFamily, Vec<&ToolDescriptor>> = BTreeMap::new();
    for tool in tools {
        groups.entry(classify(&tool.name)).or_default().push(tool);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

// ─── Tests ───────────────────────────────────────────────────────────────────
