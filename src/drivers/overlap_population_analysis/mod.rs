//! Driver for overlap population analysis in `ccpop`.
//!
//! The driver takes a [`ChemData`] record, partitions its basis functions into atom groups
//! (either explicitly or from the orbital names in the record), and computes the overlap
//! population between every pair of distinct atom groups for every molecular orbital. If the
//! record contains the indices of the highest occupied molecular orbitals, the overlap
//! populations are also summed over the occupied orbitals of each spin channel.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use ndarray::{s, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::data::{
    default_orbital_name_fields, default_overlap_fields, ChemData, OrbitalNameField, OverlapField,
};
use crate::drivers::CcPopDriver;
use crate::io::format::{
    ccpop_output, ccpop_warn, log_subtitle, log_title, nice_bool, write_subtitle, CcPopOutput,
};
use crate::io::{write_ccpop_binary, CcPopFileType};
use crate::population::opa::{calculate_opa, OverlapPopulations};
use crate::population::progress::LogProgress;

#[cfg(test)]
#[path = "overlap_population_analysis_tests.rs"]
mod overlap_population_analysis_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_report_threshold() -> f64 {
    1e-3
}

/// Structure containing control parameters for overlap population analysis.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct OverlapPopulationAnalysisParams {
    /// Optional explicit partition of the basis functions into atom groups. Each group is given
    /// as a list of basis-function indices. If `None` or empty, the atom groups are derived from
    /// the orbital names in the data record.
    #[builder(default = "None")]
    #[serde(default)]
    pub atom_groups: Option<Vec<Vec<usize>>>,

    /// The record fields to try, in order, when looking for orbital names.
    #[builder(default = "default_orbital_name_fields()")]
    #[serde(default = "default_orbital_name_fields")]
    pub orbital_name_fields: Vec<OrbitalNameField>,

    /// The record fields to try, in order, when looking for the overlap matrix.
    #[builder(default = "default_overlap_fields()")]
    #[serde(default = "default_overlap_fields")]
    pub overlap_fields: Vec<OverlapField>,

    /// Orbital overlap populations whose magnitudes are below this threshold are not printed.
    #[builder(default = "1e-3")]
    #[serde(default = "default_report_threshold")]
    pub report_threshold: f64,

    /// Boolean indicating if the overlap populations of individual molecular orbitals are to be
    /// printed. They are always printed if no occupied totals are available.
    #[builder(default = "false")]
    #[serde(default)]
    pub write_orbital_populations: bool,

    /// The output verbosity level.
    #[builder(default = "0")]
    #[serde(default)]
    pub verbose: u8,

    /// Optional name for saving the result as a binary file of type [`CcPopFileType::Opa`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl OverlapPopulationAnalysisParams {
    /// Returns a builder to construct a [`OverlapPopulationAnalysisParams`] structure.
    pub fn builder() -> OverlapPopulationAnalysisParamsBuilder {
        OverlapPopulationAnalysisParamsBuilder::default()
    }
}

impl Default for OverlapPopulationAnalysisParams {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("Unable to construct a default `OverlapPopulationAnalysisParams`.")
    }
}

impl fmt::Display for OverlapPopulationAnalysisParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.atom_groups.as_ref() {
            Some(groups) if !groups.is_empty() => {
                writeln!(f, "Atom groups: {} explicit group(s)", groups.len())?;
            }
            _ => {
                writeln!(
                    f,
                    "Atom groups: from orbital names ({})",
                    self.orbital_name_fields.iter().join(" → ")
                )?;
            }
        }
        writeln!(
            f,
            "Overlap matrix: {}",
            self.overlap_fields.iter().join(" → ")
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Report orbital overlap populations: {}",
            nice_bool(self.write_orbital_populations)
        )?;
        if self.write_orbital_populations {
            writeln!(f, "Report threshold: {:.3e}", self.report_threshold)?;
        }
        writeln!(f, "Output level: {}", self.verbose)?;
        writeln!(
            f,
            "Save overlap population analysis results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                let mut path = name.clone();
                path.set_extension(CcPopFileType::Opa.ext());
                path.display().to_string()
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f)?;

        Ok(())
    }
}

// ------
// Result
// ------

/// Structure to contain overlap population analysis results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct OverlapPopulationAnalysisResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: OverlapPopulationAnalysisParams,

    /// The atom groups and the overlap populations of every molecular orbital, one array per
    /// spin channel indexed as `[orbital, group_a, group_b]`.
    pub overlap_populations: OverlapPopulations,

    /// The overlap populations summed over the occupied molecular orbitals, one
    /// $`n_{\mathrm{group}} \times n_{\mathrm{group}}`$ array per spin channel. This is only
    /// present if the data record contains the indices of the highest occupied molecular
    /// orbitals.
    #[builder(default = "None")]
    pub occupied_totals: Option<Vec<Array2<f64>>>,
}

impl OverlapPopulationAnalysisResult {
    /// Returns a builder to construct a [`OverlapPopulationAnalysisResult`] structure.
    fn builder() -> OverlapPopulationAnalysisResultBuilder {
        OverlapPopulationAnalysisResultBuilder::default()
    }

    /// Returns the overlap populations, one array per spin channel.
    pub fn populations(&self) -> &[Array3<f64>] {
        &self.overlap_populations.populations
    }

    /// Returns the overlap populations summed over the occupied orbitals, one array per spin
    /// channel, if the HOMO indices were available.
    pub fn occupied_totals(&self) -> Option<&[Array2<f64>]> {
        self.occupied_totals.as_deref()
    }

    /// Writes the overlap populations summed over occupied orbitals in a nicely formatted table.
    fn write_occupied_totals(
        &self,
        f: &mut fmt::Formatter<'_>,
        ispin: usize,
        label_width: usize,
    ) -> fmt::Result {
        let Some(totals) = self
            .occupied_totals
            .as_ref()
            .and_then(|totals| totals.get(ispin))
        else {
            return Ok(());
        };
        let labels = self.overlap_populations.groups.labels();
        let pair_width = (2 * label_width + 3).max(4);
        writeln!(f, "Overlap populations summed over occupied orbitals:")?;
        writeln!(f, "{}", "┈".repeat(pair_width + 17))?;
        writeln!(f, " {:>pair_width$}  {:>14}", "Pair", "Population")?;
        writeln!(f, "{}", "┈".repeat(pair_width + 17))?;
        for (ga, gb) in (0..labels.len()).tuple_combinations::<(usize, usize)>() {
            writeln!(
                f,
                " {:>pair_width$}  {:>+14.7}",
                format!("{} – {}", labels[ga], labels[gb]),
                totals[(ga, gb)]
            )?;
        }
        writeln!(f, "{}", "┈".repeat(pair_width + 17))?;
        writeln!(f)?;
        Ok(())
    }

    /// Writes the overlap populations of individual molecular orbitals in a nicely formatted
    /// table, omitting entries below the report threshold.
    fn write_orbital_populations(
        &self,
        f: &mut fmt::Formatter<'_>,
        ispin: usize,
        label_width: usize,
    ) -> fmt::Result {
        let Some(pops) = self.populations().get(ispin) else {
            return Ok(());
        };
        let labels = self.overlap_populations.groups.labels();
        let thresh = self.parameters.report_threshold;
        let nmo = pops.shape()[0];
        let mo_width = nmo.to_string().len().max(2);
        let pair_width = (2 * label_width + 3).max(4);
        let table_width = mo_width + pair_width + 19;
        writeln!(f, "Orbital overlap populations (|OP| ≥ {thresh:.3e}):")?;
        writeln!(f, "{}", "┈".repeat(table_width))?;
        writeln!(
            f,
            " {:>mo_width$}  {:>pair_width$}  {:>14}",
            "MO", "Pair", "Population"
        )?;
        writeln!(f, "{}", "┈".repeat(table_width))?;
        for (i, pop_i) in pops.outer_iter().enumerate() {
            for (ga, gb) in (0..labels.len()).tuple_combinations::<(usize, usize)>() {
                let value = pop_i[(ga, gb)];
                if value.abs() >= thresh {
                    writeln!(
                        f,
                        " {i:>mo_width$}  {:>pair_width$}  {value:>+14.7}",
                        format!("{} – {}", labels[ga], labels[gb]),
                    )?;
                }
            }
        }
        writeln!(f, "{}", "┈".repeat(table_width))?;
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for OverlapPopulationAnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opa = &self.overlap_populations;
        write_subtitle(f, "Atom groups")?;
        writeln!(f)?;
        if let Some(field) = opa.orbital_name_field {
            writeln!(f, "Derived from: {field}")?;
        } else {
            writeln!(f, "Derived from: explicit specification")?;
        }
        writeln!(f, "Overlap matrix from: {}", opa.overlap_field)?;
        writeln!(f)?;
        write!(f, "{}", opa.groups)?;
        writeln!(f)?;

        let label_width = opa
            .groups
            .labels()
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(1);
        let nspins = opa.populations.len();
        for ispin in 0..nspins {
            write_subtitle(
                f,
                &format!("Overlap populations ({})", spin_label(ispin, nspins)),
            )?;
            writeln!(f)?;
            self.write_occupied_totals(f, ispin, label_width)?;
            // Without occupied totals, the orbital table is the only place populations appear.
            if self.parameters.write_orbital_populations || self.occupied_totals.is_none() {
                self.write_orbital_populations(f, ispin, label_width)?;
            }
        }

        Ok(())
    }
}

// ------
// Driver
// ------

/// Driver for overlap population analysis in `ccpop`.
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct OverlapPopulationAnalysisDriver<'a> {
    /// The control parameters for overlap population analysis.
    parameters: &'a OverlapPopulationAnalysisParams,

    /// The chemistry data record to be analysed.
    data: &'a ChemData,

    /// The result of the overlap population analysis.
    #[builder(setter(skip), default = "None")]
    result: Option<OverlapPopulationAnalysisResult>,
}

impl<'a> OverlapPopulationAnalysisDriverBuilder<'a> {
    fn validate(&self) -> Result<(), String> {
        let params = self
            .parameters
            .ok_or("No overlap population analysis parameters found.".to_string())?;
        let data = self
            .data
            .ok_or("No chemistry data record found.".to_string())?;
        if data.mocoeffs.is_empty() {
            return Err(
                "No molecular-orbital coefficient matrices found in the chemistry data record."
                    .to_string(),
            );
        }
        let explicit_groups = params
            .atom_groups
            .as_ref()
            .is_some_and(|groups| !groups.is_empty());
        if !explicit_groups && params.orbital_name_fields.is_empty() {
            return Err(
                "No explicit atom groups and no orbital-name fields have been specified."
                    .to_string(),
            );
        }
        if params.overlap_fields.is_empty() {
            return Err("No overlap-matrix fields have been specified.".to_string());
        }
        if params.report_threshold < 0.0 {
            return Err(format!(
                "The report threshold, `{:.3e}`, cannot be negative.",
                params.report_threshold
            ));
        }
        Ok(())
    }
}

impl<'a> OverlapPopulationAnalysisDriver<'a> {
    /// Returns a builder to construct a [`OverlapPopulationAnalysisDriver`] structure.
    pub fn builder() -> OverlapPopulationAnalysisDriverBuilder<'a> {
        OverlapPopulationAnalysisDriverBuilder::default()
    }

    /// Executes overlap population analysis.
    fn analyse_overlap_populations(&mut self) -> Result<(), anyhow::Error> {
        log_title("Overlap Population Analysis");
        ccpop_output!("");
        let params = self.parameters;
        params.log_output_display();

        if params.verbose >= 1 {
            self.data.log_output_display();
            ccpop_output!("");
        }

        let mut progress = LogProgress::new();
        let opa = calculate_opa(
            self.data,
            params.atom_groups.as_deref(),
            &params.orbital_name_fields,
            &params.overlap_fields,
            Some(&mut progress),
        )?;

        let occupied_totals = match self.data.homos.as_ref() {
            Some(homos) => match occupied_totals(&opa.populations, homos) {
                Ok(totals) => Some(totals),
                Err(err) => {
                    ccpop_warn!("Occupied-orbital sums skipped: {err}");
                    None
                }
            },
            None => {
                ccpop_warn!(
                    "No HOMO indices found in the data record. Overlap populations will not be summed over occupied orbitals."
                );
                None
            }
        };

        self.result = Some(
            OverlapPopulationAnalysisResult::builder()
                .parameters(params.clone())
                .overlap_populations(opa)
                .occupied_totals(occupied_totals)
                .build()?,
        );

        // Save overlap population analysis result, if requested
        if let Some(opa_res) = self.result.as_ref() {
            log_subtitle("Overlap population analysis results");
            ccpop_output!("");
            opa_res.log_output_display();
            if let Some(name) = params.result_save_name.as_ref() {
                write_ccpop_binary(name, CcPopFileType::Opa, opa_res)?;
                let mut path = name.clone();
                path.set_extension(CcPopFileType::Opa.ext());
                ccpop_output!(
                    "Overlap population analysis results saved as {}.",
                    path.display()
                );
                ccpop_output!("");
            }
        }

        Ok(())
    }
}

impl<'a> CcPopDriver for OverlapPopulationAnalysisDriver<'a> {
    type Params = OverlapPopulationAnalysisParams;

    type Outcome = OverlapPopulationAnalysisResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No overlap population analysis results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.analyse_overlap_populations()
    }
}

// =========
// Functions
// =========

/// Sums orbital overlap populations over the occupied orbitals `0..=homo` of each spin channel.
///
/// # Arguments
///
/// * `populations` - Orbital overlap populations, one array per spin channel indexed as
/// `[orbital, group_a, group_b]`.
/// * `homos` - Indices of the highest occupied orbitals, one per spin channel.
///
/// # Returns
///
/// One $`n_{\mathrm{group}} \times n_{\mathrm{group}}`$ array per spin channel.
pub fn occupied_totals(
    populations: &[Array3<f64>],
    homos: &[usize],
) -> Result<Vec<Array2<f64>>, anyhow::Error> {
    ensure!(
        homos.len() == populations.len(),
        "Mismatched numbers of spin channels: {} HOMO index/indices, but {} population array(s).",
        homos.len(),
        populations.len()
    );
    populations
        .iter()
        .zip(homos.iter())
        .map(|(pops, &homo)| {
            ensure!(
                homo < pops.shape()[0],
                "HOMO index {homo} is out of range for {} molecular orbitals.",
                pops.shape()[0]
            );
            Ok(pops.slice(s![0..=homo, .., ..]).sum_axis(Axis(0)))
        })
        .collect()
}

/// Returns a label for a spin channel.
fn spin_label(ispin: usize, nspins: usize) -> String {
    match (nspins, ispin) {
        (1, _) => "restricted".to_string(),
        (_, 0) => "alpha".to_string(),
        (_, 1) => "beta".to_string(),
        _ => format!("spin channel {ispin}"),
    }
}
