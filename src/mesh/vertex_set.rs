use crate::error::MeshError;
use crate::math::Point3;

/// Ordered vertex positions of a mesh.
///
/// The index of a position is the identity of that vertex within its mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexSet {
    positions: Vec<Point3>,
}

impl VertexSet {
    /// Creates a vertex set from positions in index order.
    #[must_use]
    pub fn new(positions: Vec<Point3>) -> Self {
        Self { positions }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the set holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All positions in index order.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Returns the position of vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn position(&self, index: usize) -> Result<&Point3, MeshError> {
        self.positions.get(index).ok_or(MeshError::IndexOutOfRange {
            index,
            len: self.positions.len(),
        })
    }

    /// Overwrites the position of vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn set_position(&mut self, index: usize, point: Point3) -> Result<(), MeshError> {
        let len = self.positions.len();
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(MeshError::IndexOutOfRange { index, len })?;
        *slot = point;
        Ok(())
    }

    /// Checks that `index` addresses a vertex of this set.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn check_index(&self, index: usize) -> Result<(), MeshError> {
        if index < self.positions.len() {
            Ok(())
        } else {
            Err(MeshError::IndexOutOfRange {
                index,
                len: self.positions.len(),
            })
        }
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Point3] {
        &mut self.positions
    }
}

impl From<Vec<Point3>> for VertexSet {
    fn from(positions: Vec<Point3>) -> Self {
        Self::new(positions)
    }
}

impl FromIterator<Point3> for VertexSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
