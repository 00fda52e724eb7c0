//! This module defines the anatomical structures a surface or a voxel can
//! belong to, along with their names as they appear in CIFTI headers.

use std::fmt::Display;
use core::str::FromStr;

use clap::ValueEnum;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Prefix shared by every structure name in the XML.
pub const STRUCTURE_PREFIX: &str = "CIFTI_STRUCTURE_";

/// Generates the Structure enum.
macro_rules! gen_structures {
  (
    $(($vn:ident, $nm:literal),)*
  ) => {
    /// Known brain structures.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord, Hash, ValueEnum
    )]
    #[clap(rename_all = "SCREAMING_SNAKE_CASE")]
    #[allow(missing_docs)]
    #[non_exhaustive]
    pub enum Structure {
      $($vn,)*
    }

    impl Structure {
      /// Returns the all-caps name of the structure, without the prefix.
      pub const fn name(&self) -> &'static str {
        return match self {
          $(Self::$vn => $nm,)*
        };
      }

      /// Returns a static slice with all known structures.
      pub const fn all() -> &'static [Self] {
        return &[
          $(Self::$vn,)*
        ];
      }
    }

    impl FromStr for Structure {
      type Err = ();

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix(STRUCTURE_PREFIX).unwrap_or(s);
        return match short {
          $(
            $nm => Ok(Self::$vn),
          )*
          _ => return Err(())
        };
      }
    }
  };
}

gen_structures!(
  (AccumbensLeft, "ACCUMBENS_LEFT"),
  (AccumbensRight, "ACCUMBENS_RIGHT"),
  (AllWhiteMatter, "ALL_WHITE_MATTER"),
  (AllGreyMatter, "ALL_GREY_MATTER"),
  (AmygdalaLeft, "AMYGDALA_LEFT"),
  (AmygdalaRight, "AMYGDALA_RIGHT"),
  (BrainStem, "BRAIN_STEM"),
  (CaudateLeft, "CAUDATE_LEFT"),
  (CaudateRight, "CAUDATE_RIGHT"),
  (CerebellarWhiteMatterLeft, "CEREBELLAR_WHITE_MATTER_LEFT"),
  (CerebellarWhiteMatterRight, "CEREBELLAR_WHITE_MATTER_RIGHT"),
  (Cerebellum, "CEREBELLUM"),
  (CerebellumLeft, "CEREBELLUM_LEFT"),
  (CerebellumRight, "CEREBELLUM_RIGHT"),
  (CerebralWhiteMatterLeft, "CEREBRAL_WHITE_MATTER_LEFT"),
  (CerebralWhiteMatterRight, "CEREBRAL_WHITE_MATTER_RIGHT"),
  (Cortex, "CORTEX"),
  (CortexLeft, "CORTEX_LEFT"),
  (CortexRight, "CORTEX_RIGHT"),
  (DiencephalonVentralLeft, "DIENCEPHALON_VENTRAL_LEFT"),
  (DiencephalonVentralRight, "DIENCEPHALON_VENTRAL_RIGHT"),
  (HippocampusLeft, "HIPPOCAMPUS_LEFT"),
  (HippocampusRight, "HIPPOCAMPUS_RIGHT"),
  (Other, "OTHER"),
  (OtherGreyMatter, "OTHER_GREY_MATTER"),
  (OtherWhiteMatter, "OTHER_WHITE_MATTER"),
  (PallidumLeft, "PALLIDUM_LEFT"),
  (PallidumRight, "PALLIDUM_RIGHT"),
  (PutamenLeft, "PUTAMEN_LEFT"),
  (PutamenRight, "PUTAMEN_RIGHT"),
  (ThalamusLeft, "THALAMUS_LEFT"),
  (ThalamusRight, "THALAMUS_RIGHT"),
);

impl Structure {
  /// Returns the full name used in the XML, like `CIFTI_STRUCTURE_CORTEX_LEFT`.
  pub fn xml_name(&self) -> String {
    return format!("{}{}", STRUCTURE_PREFIX, self.name());
  }

  /// Returns a human-friendly name, like "Cortex Left".
  pub fn pretty_name(&self) -> String {
    return self.name().to_case(Case::Title);
  }
}

impl Display for Structure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}
