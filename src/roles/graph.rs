use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::TransferConfig;
use crate::error::{OperationError, Result, StructureError};
use crate::math::Precision;
use crate::mesh::{MeshId, MeshStore};
use crate::operations::correspondence::{BuildCorrespondence, Correspondence};
use crate::operations::query::compare_structure;
use crate::operations::transfer::{CopySelected, Direction, Layer, SnapToNearest, TransferShape};

use super::{Relation, RelationFlags, Role, RoleTable};

/// Outcome of a role-gated transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReport {
    /// Mesh that received the positions.
    pub target: MeshId,
    /// `true` if the target was created as a duplicate for this call.
    pub created: bool,
    /// Position layer that was written.
    pub layer: Layer,
    /// Number of position writes performed.
    pub writes: usize,
}

/// Role bindings plus the relation flags derived from them.
///
/// Binding a role, or writing to a bound mesh through this graph,
/// recomputes only the relations that depend on that role. Gated
/// operations check their flag before touching any mesh.
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    roles: RoleTable,
    flags: RelationFlags,
    config: TransferConfig,
}

impl RoleGraph {
    /// Creates a graph with no bound roles.
    #[must_use]
    pub fn new(config: TransferConfig) -> Self {
        Self {
            roles: RoleTable::new(),
            flags: RelationFlags::default(),
            config,
        }
    }

    /// Current transfer settings.
    #[must_use]
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Current relation flags.
    #[must_use]
    pub fn flags(&self) -> RelationFlags {
        self.flags
    }

    /// Mesh bound to `role`, if any.
    #[must_use]
    pub fn binding(&self, role: Role) -> Option<MeshId> {
        self.roles.get(role)
    }

    /// Binds `mesh` to `role` (or unbinds it with `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if `mesh` is not in the store.
    pub fn bind_role(
        &mut self,
        store: &MeshStore,
        role: Role,
        mesh: Option<MeshId>,
    ) -> Result<RelationFlags> {
        if let Some(id) = mesh {
            store.mesh(id)?;
        }
        self.roles.set(role, mesh);
        debug!(%role, bound = mesh.is_some(), "role binding changed");
        self.recompute_for(store, role);
        Ok(self.flags)
    }

    /// Changes the precision and recomputes every relation.
    pub fn set_precision(&mut self, store: &MeshStore, precision: Precision) -> RelationFlags {
        self.config.precision = precision;
        self.refresh(store)
    }

    /// Chooses between shape-key and base-position output for [`Self::write_unimesh`].
    pub fn set_as_shape_key(&mut self, as_shape_key: bool) {
        self.config.as_shape_key = as_shape_key;
    }

    /// Recomputes every relation, e.g. after the host edited bound meshes.
    pub fn refresh(&mut self, store: &MeshStore) -> RelationFlags {
        for relation in Relation::ALL {
            self.update(store, relation);
        }
        self.flags
    }

    /// Writes the Morphed shape onto UniMesh through the Original/Zero map.
    ///
    /// Requires `shape_equal` and `struct_equal`. UniMesh is created as a
    /// copy of Original if unbound.
    ///
    /// # Errors
    ///
    /// Returns an error if a required flag is false, the correspondence can
    /// no longer be built, Morphed and UniMesh are the same mesh, or UniMesh
    /// does not match Original's vertex count. UniMesh is left untouched on
    /// every error.
    pub fn write_unimesh(&mut self, store: &mut MeshStore) -> Result<TransferReport> {
        self.require_flag("write_unimesh", Relation::ShapeEqual)?;
        self.require_flag("write_unimesh", Relation::StructEqual)?;

        let original = self.require_role(Role::Original)?;
        let zero = self.require_role(Role::Zero)?;
        let morphed = self.require_role(Role::Morphed)?;
        let correspondence = self.correspondence(store, original, zero)?;
        check_counts(store, zero, morphed)?;
        if self.roles.get(Role::UniMesh) == Some(morphed) {
            return Err(OperationError::InvalidInput(
                "morphed and unimesh must be different meshes".into(),
            )
            .into());
        }

        // Nothing below can fail on indices: Morphed matches Zero, UniMesh
        // matches Original, and new shape keys copy the base positions.
        let (unimesh, created) = self.ensure_role(store, Role::UniMesh, original)?;
        let layer = if self.config.as_shape_key {
            let mesh = store.mesh_mut(unimesh)?;
            let basis = mesh.vertices.clone();
            Layer::ShapeKey(mesh.shape_keys.morph_target(&basis))
        } else {
            Layer::Base
        };

        // Zero-side indices address Morphed, Original-side indices address UniMesh.
        let writes = TransferShape::new(&correspondence, morphed, unimesh, Direction::Reverse)
            .with_layer(layer)
            .execute(store)?;
        self.recompute_for(store, Role::UniMesh);

        info!(writes, created, ?layer, "wrote unimesh");
        Ok(TransferReport {
            target: unimesh,
            created,
            layer,
            writes,
        })
    }

    /// Casts the UniMesh shape back onto Morphed through the Original/Zero map.
    ///
    /// Requires `shape_and_struct_equal`. Morphed is created as a copy of
    /// Zero if unbound.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag is false, the correspondence can no
    /// longer be built, or Morphed does not match Zero's vertex count.
    pub fn cast_mesh(&mut self, store: &mut MeshStore) -> Result<TransferReport> {
        self.require_flag("cast_mesh", Relation::ShapeAndStructEqual)?;

        let original = self.require_role(Role::Original)?;
        let zero = self.require_role(Role::Zero)?;
        let unimesh = self.require_role(Role::UniMesh)?;
        let correspondence = self.correspondence(store, original, zero)?;
        check_counts(store, original, unimesh)?;

        let (morphed, created) = self.ensure_role(store, Role::Morphed, zero)?;
        let writes = TransferShape::new(&correspondence, unimesh, morphed, Direction::Forward)
            .execute(store)?;
        self.recompute_for(store, Role::Morphed);

        info!(writes, created, "cast unimesh onto morphed");
        Ok(TransferReport {
            target: morphed,
            created,
            layer: Layer::Base,
            writes,
        })
    }

    /// Copies the selected vertex positions of `from` onto UniMesh, index for index.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` or UniMesh is unbound, `from` is UniMesh
    /// itself, or a selected index is out of range for either mesh.
    pub fn copy_selected(
        &mut self,
        store: &mut MeshStore,
        from: Role,
        indices: BTreeSet<usize>,
    ) -> Result<usize> {
        if from == Role::UniMesh {
            return Err(OperationError::InvalidInput(
                "selected vertices must come from a mesh other than the unimesh".into(),
            )
            .into());
        }
        let source = self.require_role(from)?;
        let unimesh = self.require_role(Role::UniMesh)?;

        let copied = CopySelected::new(source, unimesh, indices).execute(store)?;
        self.recompute_for(store, Role::UniMesh);
        Ok(copied)
    }

    /// Snaps every Zero vertex onto its nearest Original vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if Original or Zero is unbound, or Original has no
    /// vertices.
    pub fn snap_zero_to_original(&mut self, store: &mut MeshStore) -> Result<usize> {
        let original = self.require_role(Role::Original)?;
        let zero = self.require_role(Role::Zero)?;

        let moved = SnapToNearest::new(original, zero).execute(store)?;
        self.recompute_for(store, Role::Zero);
        info!(moved, shape_equal = self.flags.shape_equal, "snapped zero to original");
        Ok(moved)
    }

    fn require_flag(&self, operation: &'static str, relation: Relation) -> Result<()> {
        if self.flags.get(relation) {
            Ok(())
        } else {
            warn!(operation, %relation, "precondition not met");
            Err(OperationError::PreconditionNotMet {
                operation,
                relation,
            }
            .into())
        }
    }

    fn require_role(&self, role: Role) -> Result<MeshId> {
        self.roles
            .get(role)
            .ok_or_else(|| OperationError::RoleUnbound(role).into())
    }

    /// Returns the mesh bound to `role`, duplicating `template` into it if unbound.
    ///
    /// A bound mesh must match the template's vertex count.
    fn ensure_role(
        &mut self,
        store: &mut MeshStore,
        role: Role,
        template: MeshId,
    ) -> Result<(MeshId, bool)> {
        if let Some(id) = self.roles.get(role) {
            check_counts(store, template, id)?;
            return Ok((id, false));
        }
        let id = store.duplicate(template)?;
        self.roles.set(role, Some(id));
        debug!(%role, "created role mesh from template");
        Ok((id, true))
    }

    fn correspondence(
        &self,
        store: &MeshStore,
        original: MeshId,
        zero: MeshId,
    ) -> Result<Correspondence> {
        BuildCorrespondence::new(original, zero, self.config.precision).execute(store)
    }

    fn recompute_for(&mut self, store: &MeshStore, role: Role) {
        for relation in Relation::ALL {
            if relation.depends_on(role) {
                self.update(store, relation);
            }
        }
    }

    fn update(&mut self, store: &MeshStore, relation: Relation) {
        let value = match relation {
            Relation::ShapeEqual => self.shape_equal(store, Role::Original, Role::Zero),
            Relation::StructEqual => self.struct_equal(store, Role::Zero, Role::Morphed),
            Relation::ShapeAndStructEqual => {
                self.shape_equal(store, Role::Morphed, Role::UniMesh)
                    && self.struct_equal(store, Role::Original, Role::UniMesh)
            }
        };
        self.flags.set(relation, value);
        debug!(%relation, value, "relation updated");
    }

    fn shape_equal(&self, store: &MeshStore, a: Role, b: Role) -> bool {
        let (Some(a), Some(b)) = (self.roles.get(a), self.roles.get(b)) else {
            return false;
        };
        match (store.mesh(a), store.mesh(b)) {
            (Ok(a), Ok(b)) => {
                Correspondence::between(&a.vertices, &b.vertices, self.config.precision).is_ok()
            }
            _ => {
                warn!("bound mesh missing from store");
                false
            }
        }
    }

    fn struct_equal(&self, store: &MeshStore, a: Role, b: Role) -> bool {
        let (Some(a), Some(b)) = (self.roles.get(a), self.roles.get(b)) else {
            return false;
        };
        match (store.mesh(a), store.mesh(b)) {
            (Ok(a), Ok(b)) => compare_structure(a, b).is_ok(),
            _ => {
                warn!("bound mesh missing from store");
                false
            }
        }
    }
}

fn check_counts(store: &MeshStore, expected: MeshId, actual: MeshId) -> Result<()> {
    let left = store.mesh(expected)?.vertex_count();
    let right = store.mesh(actual)?.vertex_count();
    if left == right {
        Ok(())
    } else {
        Err(StructureError::VertexCountMismatch { left, right }.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnimeshError;
    use crate::math::{Point3, Vector3};
    use crate::mesh::MeshData;

    fn square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn unwelded(offset: Vector3) -> Vec<Point3> {
        square()
            .into_iter()
            .chain(square().into_iter().rev())
            .map(|p| p + offset)
            .collect()
    }

    struct Scene {
        store: MeshStore,
        graph: RoleGraph,
        original: MeshId,
        zero: MeshId,
        morphed: MeshId,
    }

    fn scene() -> Scene {
        let mut store = MeshStore::new();
        let original = store.add_mesh(MeshData::new("original", square()));
        let zero = store.add_mesh(MeshData::new("zero", unwelded(Vector3::zeros())));
        let morphed = store.add_mesh(MeshData::new("morphed", unwelded(Vector3::z())));
        let mut graph = RoleGraph::default();
        graph.bind_role(&store, Role::Original, Some(original)).unwrap();
        graph.bind_role(&store, Role::Zero, Some(zero)).unwrap();
        graph.bind_role(&store, Role::Morphed, Some(morphed)).unwrap();
        Scene {
            store,
            graph,
            original,
            zero,
            morphed,
        }
    }

    #[test]
    fn binding_updates_only_dependent_flags() {
        let mut s = scene();
        assert!(s.graph.flags().shape_equal);
        assert!(s.graph.flags().struct_equal);

        // Moving Zero behind the graph's back is only noticed once Zero is rebound.
        s.store
            .mesh_mut(s.zero)
            .unwrap()
            .vertices
            .set_position(0, Point3::new(7.0, 7.0, 7.0))
            .unwrap();
        let flags = s.graph.bind_role(&s.store, Role::Morphed, Some(s.morphed)).unwrap();
        assert!(flags.shape_equal);

        let flags = s.graph.bind_role(&s.store, Role::Zero, Some(s.zero)).unwrap();
        assert!(!flags.shape_equal);
    }

    #[test]
    fn unbinding_clears_flags() {
        let mut s = scene();
        let flags = s.graph.bind_role(&s.store, Role::Zero, None).unwrap();
        assert!(!flags.shape_equal);
        assert!(!flags.struct_equal);
        assert_eq!(s.graph.binding(Role::Zero), None);
    }

    #[test]
    fn binding_a_missing_mesh_fails() {
        let mut s = scene();
        let gone = s.store.add_mesh(MeshData::new("gone", vec![]));
        s.store.remove_mesh(gone);
        let err = s
            .graph
            .bind_role(&s.store, Role::UniMesh, Some(gone))
            .unwrap_err();
        assert!(matches!(err, UnimeshError::Mesh(_)));
        assert_eq!(s.graph.binding(Role::UniMesh), None);
    }

    #[test]
    fn write_unimesh_creates_and_fills_unimesh() {
        let mut s = scene();
        let report = s.graph.write_unimesh(&mut s.store).unwrap();

        assert!(report.created);
        assert_eq!(report.layer, Layer::Base);
        assert_eq!(s.graph.binding(Role::UniMesh), Some(report.target));
        let uni = s.store.mesh(report.target).unwrap();
        for (p, o) in uni.vertices.positions().iter().zip(square()) {
            approx::assert_relative_eq!(*p, o + Vector3::z());
        }
        assert!(s.graph.flags().shape_and_struct_equal);
        // Original is untouched.
        assert_eq!(s.store.mesh(s.original).unwrap().vertices.positions(), &square()[..]);
    }

    #[test]
    fn write_unimesh_requires_struct_equal() {
        let mut s = scene();
        let short = s.store.add_mesh(MeshData::new("short", square()));
        s.graph.bind_role(&s.store, Role::Morphed, Some(short)).unwrap();

        let err = s.graph.write_unimesh(&mut s.store).unwrap_err();
        assert!(matches!(
            err,
            UnimeshError::Operation(OperationError::PreconditionNotMet {
                relation: Relation::StructEqual,
                ..
            })
        ));
        assert_eq!(s.graph.binding(Role::UniMesh), None);
    }

    #[test]
    fn write_unimesh_rejects_mismatched_unimesh() {
        let mut s = scene();
        let wrong = s.store.add_mesh(MeshData::new("wrong", vec![Point3::origin(); 3]));
        s.graph.bind_role(&s.store, Role::UniMesh, Some(wrong)).unwrap();

        let err = s.graph.write_unimesh(&mut s.store).unwrap_err();
        assert!(matches!(
            err,
            UnimeshError::Structure(StructureError::VertexCountMismatch { left: 4, right: 3 })
        ));
        assert!(s
            .store
            .mesh(wrong)
            .unwrap()
            .vertices
            .positions()
            .iter()
            .all(|p| *p == Point3::origin()));
    }

    #[test]
    fn write_unimesh_as_shape_key() {
        let mut s = scene();
        s.graph.set_as_shape_key(true);
        let report = s.graph.write_unimesh(&mut s.store).unwrap();

        let Layer::ShapeKey(key) = report.layer else {
            panic!("expected a shape key layer");
        };
        let uni = s.store.mesh(report.target).unwrap();
        assert_eq!(uni.vertices.positions(), &square()[..]);
        assert_eq!(uni.shape_keys.len(), 2);
        let keyed = &uni.shape_keys.by_index(key).unwrap().positions;
        approx::assert_relative_eq!(keyed.positions()[2], Point3::new(1.0, 1.0, 1.0));

        // A second write reuses the active key.
        let again = s.graph.write_unimesh(&mut s.store).unwrap();
        assert_eq!(again.layer, Layer::ShapeKey(key));
        assert!(!again.created);
    }

    #[test]
    fn write_unimesh_into_morphed_fails_without_adding_keys() {
        let mut store = MeshStore::new();
        let original = store.add_mesh(MeshData::new("original", square()));
        let zero = store.add_mesh(MeshData::new("zero", square()));
        let shared = store.add_mesh(MeshData::new("shared", square()));
        let mut graph = RoleGraph::default();
        graph.bind_role(&store, Role::Original, Some(original)).unwrap();
        graph.bind_role(&store, Role::Zero, Some(zero)).unwrap();
        graph.bind_role(&store, Role::Morphed, Some(shared)).unwrap();
        graph.bind_role(&store, Role::UniMesh, Some(shared)).unwrap();
        graph.set_as_shape_key(true);

        let err = graph.write_unimesh(&mut store).unwrap_err();

        assert!(matches!(
            err,
            UnimeshError::Operation(OperationError::InvalidInput(_))
        ));
        let mesh = store.mesh(shared).unwrap();
        assert!(mesh.shape_keys.is_empty());
        assert_eq!(mesh.vertices.positions(), &square()[..]);
    }

    #[test]
    fn cast_mesh_requires_combined_flag() {
        let mut s = scene();
        let before = s.store.mesh(s.morphed).unwrap().vertices.clone();
        let err = s.graph.cast_mesh(&mut s.store).unwrap_err();
        assert!(matches!(
            err,
            UnimeshError::Operation(OperationError::PreconditionNotMet {
                relation: Relation::ShapeAndStructEqual,
                ..
            })
        ));
        assert_eq!(s.store.mesh(s.morphed).unwrap().vertices, before);
    }

    #[test]
    fn cast_mesh_pushes_unimesh_edits_to_every_duplicate() {
        let mut s = scene();
        let report = s.graph.write_unimesh(&mut s.store).unwrap();
        let lifted = Point3::new(1.0, 1.0, 5.0);
        s.store
            .mesh_mut(report.target)
            .unwrap()
            .vertices
            .set_position(2, lifted)
            .unwrap();

        let cast = s.graph.cast_mesh(&mut s.store).unwrap();

        assert_eq!(cast.target, s.morphed);
        assert_eq!(cast.writes, 8);
        let morphed = s.store.mesh(s.morphed).unwrap().vertices.positions();
        assert_eq!(morphed[2], lifted);
        assert_eq!(morphed[5], lifted);
        approx::assert_relative_eq!(morphed[0], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn copy_selected_writes_unimesh_and_refreshes() {
        let mut s = scene();
        let report = s.graph.write_unimesh(&mut s.store).unwrap();
        assert!(s.graph.flags().shape_and_struct_equal);

        let copied = s
            .graph
            .copy_selected(&mut s.store, Role::Original, BTreeSet::from([0]))
            .unwrap();

        assert_eq!(copied, 1);
        assert_eq!(
            s.store.mesh(report.target).unwrap().vertices.positions()[0],
            Point3::origin()
        );
        assert!(!s.graph.flags().shape_and_struct_equal);
    }

    #[test]
    fn copy_selected_needs_unimesh() {
        let mut s = scene();
        let err = s
            .graph
            .copy_selected(&mut s.store, Role::Original, BTreeSet::from([0]))
            .unwrap_err();
        assert!(matches!(
            err,
            UnimeshError::Operation(OperationError::RoleUnbound(Role::UniMesh))
        ));
    }

    #[test]
    fn snap_restores_shape_equality() {
        let mut s = scene();
        s.store
            .mesh_mut(s.zero)
            .unwrap()
            .vertices
            .set_position(1, Point3::new(1.000_004, 0.0, 0.0))
            .unwrap();
        s.graph.refresh(&s.store);
        assert!(!s.graph.flags().shape_equal);

        let moved = s.graph.snap_zero_to_original(&mut s.store).unwrap();

        assert_eq!(moved, 1);
        assert!(s.graph.flags().shape_equal);
    }

    #[test]
    fn precision_change_refreshes_flags() {
        let mut s = scene();
        s.store
            .mesh_mut(s.zero)
            .unwrap()
            .vertices
            .set_position(1, Point3::new(1.000_04, 0.0, 0.0))
            .unwrap();
        let flags = s.graph.set_precision(&s.store, Precision::new(6).unwrap());
        assert!(!flags.shape_equal);
        let flags = s.graph.set_precision(&s.store, Precision::new(3).unwrap());
        assert!(flags.shape_equal);
        assert_eq!(s.graph.config().precision.digits(), 3);
    }
}
