use super::VertexSet;

/// Name of the reference shape key every keyed mesh starts with.
pub const BASIS: &str = "Basis";

/// A named alternative set of positions for a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeKey {
    pub name: String,
    pub positions: VertexSet,
}

/// Ordered shape keys of a mesh with an optional active key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeKeys {
    keys: Vec<ShapeKey>,
    active: Option<usize>,
}

impl ShapeKeys {
    /// Creates an empty key list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has no shape keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of shape keys, `Basis` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Appends a key initialized from `basis` and makes it active.
    ///
    /// Returns the index of the new key.
    pub fn add(&mut self, name: impl Into<String>, basis: &VertexSet) -> usize {
        self.keys.push(ShapeKey {
            name: name.into(),
            positions: basis.clone(),
        });
        let index = self.keys.len() - 1;
        self.active = Some(index);
        index
    }

    /// Returns the index of the active key, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Returns the key named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShapeKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Returns the key at `index`.
    #[must_use]
    pub fn by_index(&self, index: usize) -> Option<&ShapeKey> {
        self.keys.get(index)
    }

    pub(crate) fn by_index_mut(&mut self, index: usize) -> Option<&mut ShapeKey> {
        self.keys.get_mut(index)
    }

    /// Picks the key a morph should be written into, creating keys as needed.
    ///
    /// - no keys: adds `Basis` and a fresh key;
    /// - active key is `Basis` (or no key is active): adds a fresh key;
    /// - otherwise: reuses the active key.
    ///
    /// New keys copy `basis`. Returns the index of the chosen key.
    pub fn morph_target(&mut self, basis: &VertexSet) -> usize {
        if self.keys.is_empty() {
            self.add(BASIS, basis);
        }
        match self.active {
            Some(i) if self.keys.get(i).is_some_and(|k| k.name != BASIS) => i,
            _ => {
                let name = self.next_key_name();
                self.add(name, basis)
            }
        }
    }

    fn next_key_name(&self) -> String {
        (1..)
            .map(|n| format!("Key {n}"))
            .find(|name| self.get(name).is_none())
            .unwrap_or_default()
    }
}
