use std::collections::BTreeMap;

/// Named vertex groups of a mesh.
///
/// Each group holds an ordered list of vertex indices. A vertex may belong
/// to several groups, and the order inside a group is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexGroups {
    groups: BTreeMap<String, Vec<usize>>,
}

impl VertexGroups {
    /// Creates an empty group structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the group `name`.
    pub fn insert(&mut self, name: impl Into<String>, members: Vec<usize>) {
        self.groups.insert(name.into(), members);
    }

    /// Returns the ordered members of group `name`.
    #[must_use]
    pub fn members(&self, name: &str) -> Option<&[usize]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Iterates `(name, members)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the mesh has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<usize>)> for VertexGroups {
    fn from_iter<I: IntoIterator<Item = (S, Vec<usize>)>>(iter: I) -> Self {
        Self {
            groups: iter
                .into_iter()
                .map(|(name, members)| (name.into(), members))
                .collect(),
        }
    }
}
