//! Shaped data values whose trailing axis is a mesh element axis.
//!
//! Values are stored row-major; every operation in this crate treats the
//! leading dimensions as opaque and works one trailing row at a time.

use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;

#[derive(Clone, Debug, PartialEq)]
pub struct DataField<T> {
    name: Option<String>,
    dims: Vec<String>,
    shape: Vec<usize>,
    values: Vec<T>,
}

impl<T> DataField<T> {
    /// Wrap `values` with the given dimension names and shape.
    pub fn new(dims: Vec<String>, shape: Vec<usize>, values: Vec<T>) -> Result<Self, MeshError> {
        if dims.len() != shape.len() {
            return Err(MeshError::InvalidShape(format!(
                "{} dimension names for a {}-dimensional shape",
                dims.len(),
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(MeshError::InvalidShape(format!(
                "shape {shape:?} holds {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self {
            name: None,
            dims,
            shape,
            values,
        })
    }

    /// A 1-D field along `dim`.
    pub fn from_vec(dim: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: None,
            dims: vec![dim.into()],
            shape: vec![values.len()],
            values,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Length of the trailing (element) axis; 1 for a scalar.
    pub fn trailing_len(&self) -> usize {
        self.shape.last().copied().unwrap_or(1)
    }

    /// Name of the trailing dimension, if any.
    pub fn trailing_dim(&self) -> Option<&str> {
        self.dims.last().map(String::as_str)
    }

    /// Number of trailing rows, i.e. the product of the leading dimensions.
    pub fn n_rows(&self) -> usize {
        self.shape
            .split_last()
            .map_or(1, |(_, leading)| leading.iter().product())
    }

    /// Iterate the trailing rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let width = self.trailing_len();
        (0..self.n_rows()).map(move |r| &self.values[r * width..(r + 1) * width])
    }

    /// Element kind this field is anchored to: the trailing dimension name
    /// when it is a grid dimension of matching size, otherwise the first of
    /// node, edge, face whose count equals the trailing length.
    pub fn centering(&self, mesh: &Mesh) -> Option<ElementKind> {
        if self.ndim() == 0 {
            return None;
        }
        let size = self.trailing_len();
        if let Some(kind) = self.trailing_dim().and_then(ElementKind::from_dim_name) {
            if mesh.count(kind) == size {
                return Some(kind);
            }
        }
        ElementKind::ALL.into_iter().find(|&k| mesh.count(k) == size)
    }

    /// Whether this field has one value per `kind` element of `mesh`.
    ///
    /// Unlike [`Self::centering`], an unnamed trailing axis whose length
    /// matches several counts is accepted for each of them.
    pub fn is_centered_on(&self, mesh: &Mesh, kind: ElementKind) -> bool {
        if self.ndim() == 0 {
            return false;
        }
        let size = self.trailing_len();
        match self.trailing_dim().and_then(ElementKind::from_dim_name) {
            Some(named) if mesh.count(named) == size => named == kind,
            _ => mesh.count(kind) == size,
        }
    }

    /// A field with this field's leading dimensions and a new trailing axis
    /// `dim` of length `len` holding `values`.
    pub(crate) fn with_trailing<U>(
        &self,
        dim: &str,
        len: usize,
        values: Vec<U>,
    ) -> Result<DataField<U>, MeshError> {
        let (mut dims, mut shape) = self.leading();
        dims.push(dim.to_string());
        shape.push(len);
        let mut out = DataField::new(dims, shape, values)?;
        out.name = self.name.clone();
        Ok(out)
    }

    /// A field with this field's leading dimensions only.
    pub(crate) fn without_trailing<U>(&self, values: Vec<U>) -> Result<DataField<U>, MeshError> {
        let (dims, shape) = self.leading();
        let mut out = DataField::new(dims, shape, values)?;
        out.name = self.name.clone();
        Ok(out)
    }

    fn leading(&self) -> (Vec<String>, Vec<usize>) {
        let keep = self.ndim().saturating_sub(1);
        (self.dims[..keep].to_vec(), self.shape[..keep].to_vec())
    }

    pub(crate) fn renamed(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

impl<T: Clone> DataField<T> {
    /// Gather along the trailing axis: output column `j` of every row is
    /// input column `indices[j]`.
    pub(crate) fn gather(&self, dim: &str, indices: &[usize]) -> Result<DataField<T>, MeshError> {
        let mut values = Vec::with_capacity(self.n_rows() * indices.len());
        for row in self.rows() {
            values.extend(indices.iter().map(|&i| row[i].clone()));
        }
        self.with_trailing(dim, indices.len(), values)
    }
}
