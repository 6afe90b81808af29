use tracing::debug;

use crate::error::{MeshError, OperationError, Result};
use crate::math::Point3;
use crate::mesh::{MeshId, MeshStore, VertexSet};
use crate::operations::correspondence::{Correspondence, SpatialKeyIndex};

/// Which side of a [`Correspondence`] is read and which is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Read through the source-side buckets, write through the target-side buckets.
    Forward,
    /// Read through the target-side buckets, write through the source-side buckets.
    Reverse,
}

/// Position layer of the target mesh that receives a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// The mesh's base positions.
    #[default]
    Base,
    /// The shape key at the given index.
    ShapeKey(usize),
}

/// Copies positions from one mesh to another through a correspondence.
///
/// For every shared key, every write-side index receives the position of
/// every read-side index in turn (a full cross-product), so all coincident
/// duplicates of an unwelded mesh end up at the same new position. When a
/// key has several read-side indices the last one wins.
pub struct TransferShape<'a> {
    correspondence: &'a Correspondence,
    source: MeshId,
    target: MeshId,
    direction: Direction,
    layer: Layer,
}

impl<'a> TransferShape<'a> {
    /// Creates a new `TransferShape` operation writing base positions.
    ///
    /// `source` is read at the indices of the read side of `correspondence`
    /// and `target` is written at the indices of the write side.
    #[must_use]
    pub fn new(
        correspondence: &'a Correspondence,
        source: MeshId,
        target: MeshId,
        direction: Direction,
    ) -> Self {
        Self {
            correspondence,
            source,
            target,
            direction,
            layer: Layer::Base,
        }
    }

    /// Writes into `layer` of the target instead of its base positions.
    #[must_use]
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Executes the transfer, returning the number of position writes.
    ///
    /// Every index is bounds-checked before the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if source and target are the same mesh, either mesh
    /// or the shape key is missing, or an index falls outside its mesh.
    pub fn execute(&self, store: &mut MeshStore) -> Result<usize> {
        if self.source == self.target {
            return Err(OperationError::InvalidInput(
                "transfer source and target must be different meshes".into(),
            )
            .into());
        }

        let (read_side, write_side) = self.sides();
        let source = store.mesh(self.source)?.vertices.clone();
        check_bounds(read_side, &source)?;

        let target = store.mesh_mut(self.target)?;
        let layer = match self.layer {
            Layer::Base => &mut target.vertices,
            Layer::ShapeKey(index) => {
                &mut target
                    .shape_keys
                    .by_index_mut(index)
                    .ok_or_else(|| MeshError::EntityNotFound("shape key".into()))?
                    .positions
            }
        };
        check_bounds(write_side, layer)?;

        let writes = apply(
            self.correspondence,
            self.direction,
            source.positions(),
            layer.positions_mut(),
        );
        debug!(
            keys = self.correspondence.key_count(),
            writes,
            direction = ?self.direction,
            layer = ?self.layer,
            "transferred shape"
        );
        Ok(writes)
    }

    fn sides(&self) -> (&SpatialKeyIndex, &SpatialKeyIndex) {
        match self.direction {
            Direction::Forward => (self.correspondence.source(), self.correspondence.target()),
            Direction::Reverse => (self.correspondence.target(), self.correspondence.source()),
        }
    }
}

fn check_bounds(index: &SpatialKeyIndex, vertices: &VertexSet) -> Result<()> {
    if let Some(max) = index.max_index() {
        vertices.check_index(max)?;
    }
    Ok(())
}

/// Runs the per-key cross-product. Indices must already be in range.
fn apply(
    correspondence: &Correspondence,
    direction: Direction,
    read: &[Point3],
    write: &mut [Point3],
) -> usize {
    let mut writes = 0;
    for (_, source, target) in correspondence.pairs() {
        let (from, to) = match direction {
            Direction::Forward => (source, target),
            Direction::Reverse => (target, source),
        };
        for &r in from {
            for &w in to {
                write[w] = read[r];
                writes += 1;
            }
        }
    }
    writes
}
