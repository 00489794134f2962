//! Polygon geometry for mesh faces.
//!
//! Faces are turned into closed lon/lat shells, shells that cross the
//! antimeridian are split into GeoJSON-valid parts, and the result is exported
//! either as a geometry table or as a flat polygon collection.

pub mod antimeridian;
pub mod area;
pub mod coordinates;
pub mod corrected;
pub mod export;
pub mod shells;
