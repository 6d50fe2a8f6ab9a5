//! Common in-memory representation of quantum-chemistry results.
//!
//! A [`ChemData`] record is filled in by a format reader and holds, among other things, the
//! atomic-orbital names, the molecular-orbital coefficients of each spin channel and the
//! atomic-orbital overlap matrix. Some quantities may be stored under alternate names
//! depending on the program that produced them (*e.g.* fragment-orbital names instead of
//! atomic-orbital names). Consumers choose which of these names to use via explicit resolution
//! orders of [`OrbitalNameField`]s and [`OverlapField`]s: the first field present in the record
//! wins.

use std::fmt;

use derive_builder::Builder;
use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::io::format::nice_bool;

#[cfg(test)]
#[path = "data_tests.rs"]
mod data_tests;

// =================
// Field definitions
// =================

/// Enumerated type for record fields that can hold orbital names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbitalNameField {
    /// Atomic-orbital names, [`ChemData::aonames`].
    AoNames,

    /// Fragment-orbital names, [`ChemData::fonames`].
    FoNames,
}

impl fmt::Display for OrbitalNameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AoNames => write!(f, "aonames"),
            Self::FoNames => write!(f, "fonames"),
        }
    }
}

/// Enumerated type for record fields that can hold overlap matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlapField {
    /// Atomic-orbital overlap matrix, [`ChemData::aooverlaps`].
    AoOverlaps,

    /// Fragment-orbital overlap matrix, [`ChemData::fooverlaps`].
    FoOverlaps,
}

impl fmt::Display for OverlapField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AoOverlaps => write!(f, "aooverlaps"),
            Self::FoOverlaps => write!(f, "fooverlaps"),
        }
    }
}

/// Returns the default resolution order for orbital names.
pub fn default_orbital_name_fields() -> Vec<OrbitalNameField> {
    vec![OrbitalNameField::AoNames, OrbitalNameField::FoNames]
}

/// Returns the default resolution order for overlap matrices.
pub fn default_overlap_fields() -> Vec<OverlapField> {
    vec![OverlapField::AoOverlaps, OverlapField::FoOverlaps]
}

// ==================
// Struct definitions
// ==================

/// Structure holding the normalised results of a quantum-chemical calculation that are relevant
/// to population analyses.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChemData {
    /// Names of the atomic-orbital basis functions, each of the form `<AtomLabel>_<suffix>`.
    #[builder(default = "None")]
    #[serde(default)]
    pub aonames: Option<Vec<String>>,

    /// Names of the fragment-orbital basis functions, each of the form
    /// `<FragmentLabel>_<suffix>`.
    #[builder(default = "None")]
    #[serde(default)]
    pub fonames: Option<Vec<String>>,

    /// Molecular-orbital coefficient matrices, one per spin channel. Each matrix has shape
    /// $`n_{\mathrm{basis}} \times n_{\mathrm{MO}}`$: rows are basis functions and columns are
    /// molecular orbitals.
    pub mocoeffs: Vec<Array2<f64>>,

    /// The symmetric atomic-orbital overlap matrix.
    #[builder(default = "None")]
    #[serde(default)]
    pub aooverlaps: Option<Array2<f64>>,

    /// The symmetric fragment-orbital overlap matrix.
    #[builder(default = "None")]
    #[serde(default)]
    pub fooverlaps: Option<Array2<f64>>,

    /// Indices of the highest occupied molecular orbitals, one per spin channel.
    #[builder(default = "None")]
    #[serde(default)]
    pub homos: Option<Vec<usize>>,
}

impl ChemData {
    /// Returns a builder to construct a [`ChemData`] structure.
    pub fn builder() -> ChemDataBuilder {
        ChemDataBuilder::default()
    }

    /// Returns the orbital names stored under a particular field, if any.
    pub fn orbital_names_field(&self, field: OrbitalNameField) -> Option<&[String]> {
        match field {
            OrbitalNameField::AoNames => self.aonames.as_deref(),
            OrbitalNameField::FoNames => self.fonames.as_deref(),
        }
    }

    /// Returns the overlap matrix stored under a particular field, if any.
    pub fn overlap_field(&self, field: OverlapField) -> Option<&Array2<f64>> {
        match field {
            OverlapField::AoOverlaps => self.aooverlaps.as_ref(),
            OverlapField::FoOverlaps => self.fooverlaps.as_ref(),
        }
    }

    /// Resolves the orbital names by trying a sequence of candidate fields in order.
    ///
    /// # Arguments
    ///
    /// * `fields` - The candidate fields in order of decreasing priority.
    ///
    /// # Returns
    ///
    /// The first candidate field present in the record together with its orbital names, or
    /// `None` if none of the candidates is present.
    pub fn resolve_orbital_names(
        &self,
        fields: &[OrbitalNameField],
    ) -> Option<(OrbitalNameField, &[String])> {
        fields
            .iter()
            .find_map(|field| {
                self.orbital_names_field(*field)
                    .map(|names| (*field, names))
            })
    }

    /// Resolves the overlap matrix by trying a sequence of candidate fields in order.
    ///
    /// # Arguments
    ///
    /// * `fields` - The candidate fields in order of decreasing priority.
    ///
    /// # Returns
    ///
    /// The first candidate field present in the record together with its overlap matrix, or
    /// `None` if none of the candidates is present.
    pub fn resolve_overlap(&self, fields: &[OverlapField]) -> Option<(OverlapField, &Array2<f64>)> {
        fields
            .iter()
            .find_map(|field| self.overlap_field(*field).map(|ovlp| (*field, ovlp)))
    }

    /// Returns the number of spin channels.
    pub fn n_spins(&self) -> usize {
        self.mocoeffs.len()
    }

    /// Returns `true` if the record describes an unrestricted calculation.
    pub fn is_unrestricted(&self) -> bool {
        self.mocoeffs.len() == 2
    }
}

impl fmt::Display for ChemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chemistry data record:")?;
        writeln!(
            f,
            "  Spin channels: {} ({})",
            self.n_spins(),
            if self.is_unrestricted() {
                "unrestricted"
            } else {
                "restricted"
            }
        )?;
        writeln!(
            f,
            "  MO coefficient shapes: {}",
            self.mocoeffs
                .iter()
                .map(|c| format!("{} × {}", c.nrows(), c.ncols()))
                .join(", ")
        )?;
        for field in default_orbital_name_fields() {
            writeln!(
                f,
                "  {field}: {}",
                self.orbital_names_field(field)
                    .map(|names| format!("{} names", names.len()))
                    .unwrap_or_else(|| nice_bool(false))
            )?;
        }
        for field in default_overlap_fields() {
            writeln!(
                f,
                "  {field}: {}",
                self.overlap_field(field)
                    .map(|ovlp| format!("{} × {}", ovlp.nrows(), ovlp.ncols()))
                    .unwrap_or_else(|| nice_bool(false))
            )?;
        }
        if let Some(homos) = self.homos.as_ref() {
            writeln!(f, "  homos: {}", homos.iter().join(", "))?;
        }
        Ok(())
    }
}
