//! # ccpop: Overlap Population Analysis of Quantum-Chemical Calculations
//!
//! `ccpop` performs overlap population analysis (OPA) on molecular-orbital coefficients and
//! atomic-orbital overlap matrices that have been normalised into a common chemistry data record
//! by an external format reader. The overlap population between two atoms $`A`$ and $`B`$ in
//! molecular orbital $`i`$ is
//!
//! ```math
//! \mathrm{OP}_{AB,i} = \sum_{a \in A} \sum_{b \in B} 2 c_{ai} c_{bi} S_{ab},
//! ```
//!
//! where $`c_{ai}`$ is the coefficient of basis function $`a`$ in molecular orbital $`i`$ and
//! $`S_{ab}`$ is the overlap integral between basis functions $`a`$ and $`b`$.
//!
//! The crate provides:
//! - the [`population::opa`] engine together with atom grouping and progress reporting,
//! - the [`data::ChemData`] record with configurable resolution of alternately named fields,
//! - an analysis driver in [`drivers::overlap_population_analysis`], and
//! - YAML, binary-file and command-line interfaces in [`interfaces`].
//!
//! ## Examples and usage
//!
//! Usage of most items is illustrated in their test functions. For usage of the compiled `ccpop`
//! binary, run `ccpop --help`.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod data;
pub mod drivers;
pub mod interfaces;
pub mod io;
pub mod population;
