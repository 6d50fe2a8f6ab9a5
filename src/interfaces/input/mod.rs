//! `ccpop` YAML input specification.

use std::path::PathBuf;

use anyhow::{self, Context};
use serde::{Deserialize, Serialize};

use crate::data::ChemData;
use crate::drivers::overlap_population_analysis::{
    OverlapPopulationAnalysisDriver, OverlapPopulationAnalysisParams,
};
use crate::drivers::CcPopDriver;
use crate::interfaces::binaries::BinariesChemDataSource;
use crate::interfaces::InputHandle;
use crate::io::format::{ccpop_error, ccpop_output, ccpop_warn, log_macsec_begin, log_macsec_end};
use crate::io::{read_ccpop_binary, CcPopFileType};


/// An enumerated type representing possible sources of the chemistry data record from a YAML
/// input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ChemDataSource {
    /// Variant indicating that the chemistry data record will be assembled from raw binary files.
    Binaries(BinariesChemDataSource),

    /// Variant indicating that the chemistry data record will be read in from a `ccpop`
    /// [`CcPopFileType::Dat`] binary file. The associated path gives the name of the file without
    /// its `.ccpop.dat` extension.
    FromFile(PathBuf),
}

impl Default for ChemDataSource {
    fn default() -> Self {
        ChemDataSource::Binaries(BinariesChemDataSource::default())
    }
}

impl ChemDataSource {
    /// Acquires the chemistry data record from this source.
    pub fn to_chem_data(&self) -> Result<ChemData, anyhow::Error> {
        match self {
            ChemDataSource::Binaries(source) => source.to_chem_data(),
            ChemDataSource::FromFile(name) => read_ccpop_binary(name, CcPopFileType::Dat)
                .with_context(|| {
                    format!(
                        "Unable to read `{}.{}` when handling chemistry data source",
                        name.display(),
                        CcPopFileType::Dat.ext()
                    )
                }),
        }
    }
}

/// A structure containing `ccpop` input parameters which can be serialised into and deserialised
/// from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// Specification of where the chemistry data record is to be acquired from.
    pub data: ChemDataSource,

    /// Specification for overlap population analysis. If `None`, no overlap population analysis
    /// will be performed.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `None`.
    #[serde(default)]
    pub overlap_population_analysis: Option<OverlapPopulationAnalysisParams>,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            data: ChemDataSource::default(),
            overlap_population_analysis: Some(OverlapPopulationAnalysisParams::default()),
        }
    }
}

impl Input {
    fn run(&self) -> Result<(), anyhow::Error> {
        log_macsec_begin("Chemistry data");
        ccpop_output!("");
        let data = self.data.to_chem_data()?;
        ccpop_output!(
            "Chemistry data record acquired: {} spin space(s), {} basis function(s).",
            data.n_spins(),
            data.mocoeffs.first().map(|c| c.nrows()).unwrap_or(0)
        );
        ccpop_output!("");
        log_macsec_end("Chemistry data");
        ccpop_output!("");

        if let Some(opa_params) = self.overlap_population_analysis.as_ref() {
            log_macsec_begin("Overlap population analysis");
            ccpop_output!("");
            let mut opa_driver = OverlapPopulationAnalysisDriver::builder()
                .parameters(opa_params)
                .data(&data)
                .build()
                .with_context(|| "Unable to construct an overlap population analysis driver")?;
            opa_driver.run().with_context(|| {
                "Unable to run the overlap population analysis driver successfully"
            })?;
            log_macsec_end("Overlap population analysis");
            ccpop_output!("");
        } else {
            ccpop_warn!("No overlap population analysis has been requested.");
        }
        Ok(())
    }
}

impl InputHandle for Input {
    fn handle(&self) -> Result<(), anyhow::Error> {
        let res = self.run();
        if let Err(err) = res.as_ref() {
            ccpop_error!("{err:#}");
        }
        res
    }
}
