//! A data field bound to the mesh it lives on.
//!
//! [`MeshField`] is the caller-facing surface: geometry export joined with
//! data, remapping to another mesh, and the topological operators.

use crate::algs::aggregate::{self, Aggregation};
use crate::algs::difference::{self, GradientOptions};
use crate::algs::integrate;
use crate::algs::remap::{self, RemapOptions};
use crate::data::field::DataField;
use crate::geometry::export::{
    CollectionOptions, GeometryFrame, Projection, ShadedCollection, TableOptions,
};
use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;
use crate::topology::subset::SubsetIndices;
use num_traits::Float;

#[derive(Clone, Debug)]
pub struct MeshField<'m, T> {
    mesh: &'m Mesh,
    field: DataField<T>,
}

/// The result of [`MeshField::isel`]: an owned sub-mesh and the data
/// restricted to it.
#[derive(Clone, Debug)]
pub struct SubsetField<T> {
    pub mesh: Mesh,
    pub indices: SubsetIndices,
    pub field: DataField<T>,
}

impl<T> SubsetField<T> {
    pub fn as_mesh_field(&self) -> MeshField<'_, T>
    where
        T: Clone,
    {
        MeshField::new(&self.mesh, self.field.clone())
    }
}

impl<'m, T> MeshField<'m, T> {
    pub fn new(mesh: &'m Mesh, field: DataField<T>) -> Self {
        Self { mesh, field }
    }

    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    pub fn field(&self) -> &DataField<T> {
        &self.field
    }

    pub fn into_field(self) -> DataField<T> {
        self.field
    }

    pub fn values(&self) -> &[T] {
        self.field.values()
    }

    pub fn centering(&self) -> Option<ElementKind> {
        self.field.centering(self.mesh)
    }

    /// Face values of a 1-D face-centered field, or the error describing why
    /// this field is not one.
    fn face_values(&self) -> Result<&[T], MeshError> {
        let n_face = self.mesh.n_face();
        if self.field.ndim() != 1 {
            return Err(MeshError::NotOneDimensional {
                shape: self.field.shape().to_vec(),
                expected: n_face,
            });
        }
        let size = self.field.trailing_len();
        if self.field.is_centered_on(self.mesh, ElementKind::Face) {
            Ok(self.field.values())
        } else if size == self.mesh.n_node() {
            Err(MeshError::SizeMatchesOtherKind {
                size,
                expected_kind: ElementKind::Face,
                expected: n_face,
                matched: ElementKind::Node,
            })
        } else {
            Err(MeshError::SizeMatchesNoKind {
                size,
                expected_kind: ElementKind::Face,
                expected: n_face,
            })
        }
    }
}

impl<'m, T: Clone> MeshField<'m, T> {
    /// The mesh geometry table joined with this field as its data column.
    pub fn to_geometry_table(&self, options: &TableOptions) -> Result<GeometryFrame<T>, MeshError> {
        let values = self.face_values()?;
        let table = self.mesh.to_geometry_table(options)?;
        let name = self.field.name().unwrap_or("var");
        Ok(GeometryFrame::join(table, name, values))
    }

    /// The mesh polygon collection shaded by this field, plus the per-ring
    /// source faces when `options.return_indices` is set.
    pub fn to_polygon_collection(
        &self,
        options: &CollectionOptions,
        projection: Option<&dyn Projection>,
    ) -> Result<(ShadedCollection<T>, Option<Vec<usize>>), MeshError> {
        let values = self.face_values()?;
        let collection = self.mesh.to_polygon_collection(options, projection)?;
        let indices = options
            .return_indices
            .then(|| collection.source_faces().to_vec());
        Ok((ShadedCollection::shade(collection, values), indices))
    }

    /// Remap onto `destination` by nearest neighbor.
    pub fn remap_nearest_neighbor<'d>(
        &self,
        destination: &'d Mesh,
        options: RemapOptions,
    ) -> Result<MeshField<'d, T>, MeshError> {
        let field = remap::nearest_neighbor(self.mesh, destination, &self.field, options)?;
        Ok(MeshField::new(destination, field))
    }

    /// Subset the mesh and this field together.
    pub fn isel(&self, kind: ElementKind, indices: &[usize]) -> Result<SubsetField<T>, MeshError> {
        let centering = self
            .centering()
            .ok_or_else(|| MeshError::UnanchoredData {
                shape: self.field.shape().to_vec(),
                n_node: self.mesh.n_node(),
                n_edge: self.mesh.n_edge(),
                n_face: self.mesh.n_face(),
            })?;
        let (mesh, subset) = self.mesh.isel(kind, indices)?;
        let field = self.field.gather(centering.dim_name(), subset.of(centering))?;
        Ok(SubsetField {
            mesh,
            indices: subset,
            field,
        })
    }
}

impl<'m, T: Float> MeshField<'m, T> {
    /// Reduce onto the `destination` elements with `aggregation`.
    pub fn topological_aggregate(
        &self,
        destination: ElementKind,
        aggregation: Aggregation,
    ) -> Result<MeshField<'m, T>, MeshError> {
        let field =
            aggregate::topological_aggregate(self.mesh, &self.field, destination, aggregation)?;
        Ok(MeshField::new(self.mesh, field))
    }

    /// [`Self::topological_aggregate`] with the aggregation given by name.
    pub fn topological_aggregate_by_name(
        &self,
        destination: &str,
        aggregation: &str,
    ) -> Result<MeshField<'m, T>, MeshError> {
        let destination = destination
            .parse::<ElementKind>()
            .map_err(|_| MeshError::InvalidArgument {
                argument: "destination",
                value: destination.to_string(),
                expected: "'node', 'edge', or 'face'",
            })?;
        self.topological_aggregate(destination, aggregation.parse()?)
    }

    /// Node values averaged over each face.
    pub fn nodal_average(&self) -> Result<MeshField<'m, T>, MeshError> {
        let field = aggregate::nodal_average(self.mesh, &self.field)?;
        Ok(MeshField::new(self.mesh, field))
    }

    /// Absolute difference across every edge.
    pub fn difference(&self, destination: ElementKind) -> Result<MeshField<'m, T>, MeshError> {
        let field = difference::difference(self.mesh, &self.field, destination)?;
        Ok(MeshField::new(self.mesh, field))
    }

    /// Edge gradient magnitude of face-centered data.
    pub fn gradient(&self, options: GradientOptions) -> Result<MeshField<'m, T>, MeshError> {
        let field = difference::gradient(self.mesh, &self.field, options)?;
        Ok(MeshField::new(self.mesh, field))
    }

    /// Area-weighted integral over the faces; drops the face axis.
    pub fn integrate(&self) -> Result<DataField<T>, MeshError> {
        integrate::integrate(self.mesh, &self.field)
    }
}
