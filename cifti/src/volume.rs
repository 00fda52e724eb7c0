//! This module implements the geometry of the volume that voxel indices refer
//! to. Only plumb volumes are supported: every voxel axis runs along exactly
//! one spatial axis, with no rotation or shear.

use std::fmt::Display;

use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{malformed, Result};
use crate::tree::{format_list, Element};

/// The direction a voxel axis runs in, in RAS terms.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  Hash
)]
pub enum Orientation {
  /// Increasing x.
  LeftToRight,
  /// Decreasing x.
  RightToLeft,
  /// Increasing y.
  PosteriorToAnterior,
  /// Decreasing y.
  AnteriorToPosterior,
  /// Increasing z.
  InferiorToSuperior,
  /// Decreasing z.
  SuperiorToInferior
}

impl Orientation {
  /// The spatial axis (0 = x, 1 = y, 2 = z) this orientation runs along.
  pub const fn spatial_axis(&self) -> usize {
    return match self {
      Self::LeftToRight | Self::RightToLeft => 0,
      Self::PosteriorToAnterior | Self::AnteriorToPosterior => 1,
      Self::InferiorToSuperior | Self::SuperiorToInferior => 2,
    };
  }

  /// +1 if the coordinate grows with the voxel index, -1 otherwise.
  pub const fn sign(&self) -> f64 {
    return match self {
      Self::LeftToRight
        | Self::PosteriorToAnterior
        | Self::InferiorToSuperior => 1.0,
      _ => -1.0,
    };
  }

  /// Finds the orientation along a spatial axis with a given sign.
  fn from_axis_sign(axis: usize, positive: bool) -> Option<Self> {
    return Some(match (axis, positive) {
      (0, true) => Self::LeftToRight,
      (0, false) => Self::RightToLeft,
      (1, true) => Self::PosteriorToAnterior,
      (1, false) => Self::AnteriorToPosterior,
      (2, true) => Self::InferiorToSuperior,
      (2, false) => Self::SuperiorToInferior,
      _ => return None
    });
  }

  /// A short code, like "LR".
  pub const fn code(&self) -> &'static str {
    return match self {
      Self::LeftToRight => "LR",
      Self::RightToLeft => "RL",
      Self::PosteriorToAnterior => "PA",
      Self::AnteriorToPosterior => "AP",
      Self::InferiorToSuperior => "IS",
      Self::SuperiorToInferior => "SI",
    };
  }
}

impl Display for Orientation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.code());
  }
}

/// The geometry of a plumb volume.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeSpace {
  /// Number of voxels along i, j and k.
  dimensions: [usize; 3],
  /// Voxel size along i, j and k. Always positive.
  spacing: [f64; 3],
  /// Spatial coordinate (x, y, z) of voxel (0, 0, 0).
  origin: [f64; 3],
  /// Direction each voxel axis runs in.
  orientation: [Orientation; 3]
}

impl VolumeSpace {
  /// Creates a volume space, checking the spacing is positive and that the
  /// three voxel axes run along three different spatial axes.
  pub fn new(
    dimensions: [usize; 3],
    spacing: [f64; 3],
    origin: [f64; 3],
    orientation: [Orientation; 3]
  ) -> Result<Self> {
    if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
      return Err(malformed(format!("bad voxel spacing {:?}", spacing)));
    }
    if origin.iter().any(|o| !o.is_finite()) {
      return Err(malformed(format!("bad volume origin {:?}", origin)));
    }
    let mut seen = [false; 3];
    for o in orientation.iter() {
      if seen[o.spatial_axis()] {
        return Err(malformed(format!(
          "orientation {:?} reuses a spatial axis", orientation
        )));
      }
      seen[o.spatial_axis()] = true;
    }
    return Ok(Self { dimensions, spacing, origin, orientation });
  }

  /// Number of voxels along i, j and k.
  pub fn dimensions(&self) -> [usize; 3] {
    return self.dimensions;
  }

  /// Voxel size along i, j and k.
  pub fn spacing(&self) -> [f64; 3] {
    return self.spacing;
  }

  /// Coordinate of voxel (0, 0, 0).
  pub fn origin(&self) -> [f64; 3] {
    return self.origin;
  }

  /// Orientation of each voxel axis.
  pub fn orientation(&self) -> [Orientation; 3] {
    return self.orientation;
  }

  /// Is a voxel index inside the volume?
  pub fn contains(&self, ijk: [i64; 3]) -> bool {
    return ijk.iter()
      .zip(self.dimensions.iter())
      .all(|(&v, &d)| v >= 0 && (v as u64) < d as u64);
  }

  /// The 4x4 matrix taking (i, j, k, 1) to (x, y, z, 1).
  pub fn to_transform(&self) -> Matrix4<f64> {
    let mut m = Matrix4::<f64>::identity();
    for a in 0..3 {
      m[(a, a)] = 0.0;
    }
    for (a, o) in self.orientation.iter().enumerate() {
      m[(o.spatial_axis(), a)] = o.sign() * self.spacing[a];
    }
    for (r, o) in self.origin.iter().enumerate() {
      m[(r, 3)] = *o;
    }
    return m;
  }

  /// Reads a volume space back from an IJK-to-XYZ matrix. Fails if the
  /// matrix has rotation, shear, or a zero-sized axis.
  pub fn from_transform(
    dimensions: [usize; 3],
    m: &Matrix4<f64>
  ) -> Result<Self> {
    if m[(3, 0)] != 0.0 || m[(3, 1)] != 0.0 || m[(3, 2)] != 0.0
      || m[(3, 3)] != 1.0 {
      return Err(malformed("volume transform has a bad last row"));
    }
    let mut spacing = [0.0; 3];
    let mut orientation = [Orientation::LeftToRight; 3];
    for a in 0..3 {
      let nonzero: Vec<usize> = (0..3).filter(|&r| m[(r, a)] != 0.0).collect();
      if nonzero.len() != 1 {
        return Err(malformed("volume transform is not plumb"));
      }
      let r = nonzero[0];
      let v = m[(r, a)];
      spacing[a] = v.abs();
      orientation[a] = Orientation::from_axis_sign(r, v > 0.0)
        .ok_or_else(|| malformed("volume transform is not plumb"))?;
    }
    let origin = [m[(0, 3)], m[(1, 3)], m[(2, 3)]];
    return Self::new(dimensions, spacing, origin, orientation);
  }

  /// Spatial coordinate of the centre of a voxel.
  pub fn ijk_to_xyz(&self, ijk: [i64; 3]) -> [f64; 3] {
    let p = self.to_transform().transform_point(&Point3::new(
      ijk[0] as f64, ijk[1] as f64, ijk[2] as f64
    ));
    return [p.x, p.y, p.z];
  }

  /// The voxel whose centre is nearest to a spatial coordinate. Each axis is
  /// rounded independently, halves away from zero. The result may lie outside
  /// the volume; `None` if it isn't a finite index.
  pub fn nearest_voxel(&self, xyz: [f64; 3]) -> Option<[i64; 3]> {
    let mut ijk = [0_i64; 3];
    for (a, o) in self.orientation.iter().enumerate() {
      let r = o.spatial_axis();
      let step = o.sign() * self.spacing[a];
      let v = ((xyz[r] - self.origin[r]) / step).round();
      // i64::MAX as f64 is 2^63
      if !v.is_finite() || v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return None;
      }
      ijk[a] = v as i64;
    }
    return Some(ijk);
  }

  /// Reads a `<Volume>` element.
  pub(crate) fn from_element(elem: &Element) -> Result<Self> {
    let dims = crate::tree::parse_list::<usize>(
      elem.required_attr("VolumeDimensions")?,
      &elem.name
    )?;
    let dimensions: [usize; 3] = dims.try_into()
      .map_err(|_| malformed("VolumeDimensions must have three values"))?;
    let xform = elem.child("TransformationMatrixVoxelIndicesIJKtoXYZ")
      .ok_or_else(|| malformed("<Volume> has no transformation matrix"))?;
    let values: Vec<f64> = xform.text_list()?;
    if values.len() != 16 {
      return Err(malformed(format!(
        "transformation matrix has {} values, expected 16", values.len()
      )));
    }
    let m = Matrix4::from_row_slice(&values);
    return Self::from_transform(dimensions, &m);
  }

  /// Writes a `<Volume>` element.
  pub(crate) fn to_element(&self) -> Element {
    let m = self.to_transform();
    let values: Vec<f64> = (0..4)
      .flat_map(|r| (0..4).map(move |c| (r, c)))
      .map(|(r, c)| m[(r, c)])
      .collect();
    let dims = self.dimensions.iter()
      .map(|d| d.to_string())
      .collect::<Vec<_>>()
      .join(",");
    let xform = Element::new("TransformationMatrixVoxelIndicesIJKtoXYZ")
      .with_attr("DataSpace", "NIFTI_XFORM_UNKNOWN")
      .with_attr("TransformedSpace", "NIFTI_XFORM_UNKNOWN")
      .with_attr("UnitsXYZ", "NIFTI_UNITS_MM")
      .with_text(format_list(&values));
    return Element::new("Volume")
      .with_attr("VolumeDimensions", dims)
      .with_child(xform);
  }
}
