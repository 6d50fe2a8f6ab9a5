//! Overlap population analysis.
//!
//! For every pair of distinct atom groups $`A`$ and $`B`$ and every molecular orbital $`i`$ of a
//! spin channel, the overlap population is
//!
//! ```math
//! \mathrm{OP}_{AB,i} = \sum_{a \in A} \sum_{b \in B} 2 c_{ai} c_{bi} S_{ab}.
//! ```
//!
//! The factor of two accounts for the $`ab`$ and $`ba`$ cross terms in the density-matrix
//! expansion. Only off-diagonal group pairs are accumulated; the $`A = B`$ entries stay zero.

use itertools::Itertools;
use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::data::{ChemData, OrbitalNameField, OverlapField};
use crate::population::groups::AtomGroups;
use crate::population::progress::Progress;
use crate::population::PopulationAnalysisError;

#[cfg(test)]
#[path = "opa_tests.rs"]
mod opa_tests;

/// Progress label announced once per pair of atom groups.
pub const OPA_STEP_MESSAGE: &str = "Overlap Population Analysis";

/// Progress label announced on completion.
pub const OPA_DONE_MESSAGE: &str = "Done";

/// Structure containing the outcome of an overlap population analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapPopulations {
    /// The atom groups between which the overlap populations have been computed.
    pub groups: AtomGroups,

    /// The record field from which the atom groups have been derived, or `None` if explicit
    /// groups have been used.
    pub orbital_name_field: Option<OrbitalNameField>,

    /// The record field from which the overlap matrix has been taken.
    pub overlap_field: OverlapField,

    /// Overlap populations, one array per spin channel. Each array has shape
    /// $`n_{\mathrm{MO}} \times n_{\mathrm{group}} \times n_{\mathrm{group}}`$ and is indexed as
    /// `[orbital, group_a, group_b]`.
    pub populations: Vec<Array3<f64>>,
}

/// Performs an overlap population analysis on the quantities stored in a chemistry data record.
///
/// # Arguments
///
/// * `data` - The chemistry data record.
/// * `indices` - An optional explicit partition of basis functions into atom groups. If `None`
/// or empty, the groups are derived from the orbital names in `data`.
/// * `orbital_name_fields` - The resolution order for the orbital names.
/// * `overlap_fields` - The resolution order for the overlap matrix.
/// * `progress` - An optional progress collaborator.
///
/// # Errors
///
/// Errors with [`PopulationAnalysisError::MissingRequiredInput`] if neither explicit groups nor
/// orbital names are available or if no overlap matrix is available, and with
/// [`PopulationAnalysisError::DimensionMismatch`] if the dimensions of the coefficient and
/// overlap matrices are inconsistent.
pub fn calculate_opa(
    data: &ChemData,
    indices: Option<&[Vec<usize>]>,
    orbital_name_fields: &[OrbitalNameField],
    overlap_fields: &[OverlapField],
    progress: Option<&mut dyn Progress>,
) -> Result<OverlapPopulations, PopulationAnalysisError> {
    let (groups, orbital_name_field) = match indices {
        Some(indices) if !indices.is_empty() => (AtomGroups::from_indices(indices), None),
        _ => {
            let (field, names) = data
                .resolve_orbital_names(orbital_name_fields)
                .ok_or_else(|| {
                    PopulationAnalysisError::MissingRequiredInput(format!(
                        "no explicit atom groups given and none of the orbital-name fields [{}] \
                        is present",
                        join_fields(orbital_name_fields)
                    ))
                })?;
            log::debug!("Atom groups derived from `{field}`.");
            (AtomGroups::from_orbital_names(names)?, Some(field))
        }
    };
    let (overlap_field, overlap) = data.resolve_overlap(overlap_fields).ok_or_else(|| {
        PopulationAnalysisError::MissingRequiredInput(format!(
            "none of the overlap fields [{}] is present",
            join_fields(overlap_fields)
        ))
    })?;
    log::debug!("Overlap matrix taken from `{overlap_field}`.");

    let populations = overlap_populations(&data.mocoeffs, overlap, &groups, progress)?;
    Ok(OverlapPopulations {
        groups,
        orbital_name_field,
        overlap_field,
        populations,
    })
}

/// Computes the overlap populations between all pairs of distinct atom groups.
///
/// # Arguments
///
/// * `mocoeffs` - Molecular-orbital coefficient matrices, one per spin channel, each of shape
/// $`n_{\mathrm{basis}} \times n_{\mathrm{MO}}`$.
/// * `overlap` - The $`n_{\mathrm{basis}} \times n_{\mathrm{basis}}`$ overlap matrix.
/// * `groups` - The atom groups.
/// * `progress` - An optional progress collaborator. It is initialised with
/// $`n_{\mathrm{spin}} \cdot n(n - 1)/2`$ steps for $`n`$ groups, updated once per pair of groups
/// and spin channel, and updated a final time on completion.
///
/// # Returns
///
/// One array of shape $`n_{\mathrm{MO}} \times n \times n`$ per spin channel.
///
/// # Errors
///
/// Errors if there are no coefficient matrices or if the dimensions of the inputs are
/// inconsistent.
pub fn overlap_populations(
    mocoeffs: &[Array2<f64>],
    overlap: &Array2<f64>,
    groups: &AtomGroups,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<Array3<f64>>, PopulationAnalysisError> {
    check_dimensions(mocoeffs, overlap, groups)?;

    let nfrag = groups.len();
    let nstep = groups.n_pairs() * mocoeffs.len();
    if let Some(prog) = progress.as_mut() {
        prog.initialize(nstep);
    }

    let mut step = 0;
    let mut results = Vec::with_capacity(mocoeffs.len());
    for (ispin, c) in mocoeffs.iter().enumerate() {
        log::debug!(
            "Creating overlap population array for spin channel {ispin}: {nfrag} × {nfrag} × {}",
            c.ncols()
        );
        let mut res = Array3::<f64>::zeros((nfrag, nfrag, c.ncols()));
        for ga in 0..nfrag {
            for gb in (ga + 1)..nfrag {
                if let Some(prog) = progress.as_mut() {
                    prog.update(step, OPA_STEP_MESSAGE);
                }
                let (idx_a, idx_b) = group_pair(groups, ga, gb)?;
                for &a in idx_a {
                    let ca = c.row(a);
                    for &b in idx_b {
                        let cb = c.row(b);
                        let temp = &ca * &cb * 2.0 * overlap[(a, b)];
                        let mut res_ab = res.slice_mut(s![ga, gb, ..]);
                        res_ab += &temp;
                        let mut res_ba = res.slice_mut(s![gb, ga, ..]);
                        res_ba += &temp;
                    }
                }
                step += 1;
            }
        }
        // [group_a, group_b, orbital] -> [orbital, group_a, group_b]
        results.push(
            res.permuted_axes([2, 0, 1])
                .as_standard_layout()
                .into_owned(),
        );
    }

    if let Some(prog) = progress.as_mut() {
        prog.update(nstep, OPA_DONE_MESSAGE);
    }
    Ok(results)
}

/// Checks that the coefficient matrices, the overlap matrix and the groups are consistent.
fn check_dimensions(
    mocoeffs: &[Array2<f64>],
    overlap: &Array2<f64>,
    groups: &AtomGroups,
) -> Result<(), PopulationAnalysisError> {
    let nbasis = overlap.nrows();
    if overlap.ncols() != nbasis {
        return Err(PopulationAnalysisError::DimensionMismatch(format!(
            "the overlap matrix has shape {} × {} but must be square",
            overlap.nrows(),
            overlap.ncols()
        )));
    }
    if mocoeffs.is_empty() {
        return Err(PopulationAnalysisError::MissingRequiredInput(
            "no molecular-orbital coefficient matrices".to_string(),
        ));
    }
    if mocoeffs.len() > 2 {
        return Err(PopulationAnalysisError::DimensionMismatch(format!(
            "{} spin channels of coefficients given, but at most two are supported",
            mocoeffs.len()
        )));
    }
    if let Some((ispin, c)) = mocoeffs
        .iter()
        .enumerate()
        .find(|(_, c)| c.nrows() != nbasis)
    {
        return Err(PopulationAnalysisError::DimensionMismatch(format!(
            "the coefficient matrix of spin channel {ispin} has {} basis-function rows, but the \
            overlap matrix has dimension {nbasis}",
            c.nrows()
        )));
    }
    if let Some(max_index) = groups.max_index() {
        if max_index >= nbasis {
            return Err(PopulationAnalysisError::DimensionMismatch(format!(
                "atom groups refer to basis function {max_index}, but there are only {nbasis}"
            )));
        }
    }
    Ok(())
}

fn group_pair(
    groups: &AtomGroups,
    ga: usize,
    gb: usize,
) -> Result<(&[usize], &[usize]), PopulationAnalysisError> {
    let missing = |g: usize| {
        PopulationAnalysisError::DimensionMismatch(format!("atom group {g} does not exist"))
    };
    let idx_a = groups.indices(ga).ok_or_else(|| missing(ga))?;
    let idx_b = groups.indices(gb).ok_or_else(|| missing(gb))?;
    Ok((idx_a, idx_b))
}

fn join_fields<T: std::fmt::Display>(fields: &[T]) -> String {
    fields
        .iter()
        .map(|field| format!("`{field}`"))
        .join(", ")
}
