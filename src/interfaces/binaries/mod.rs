//! `ccpop` interface with raw binary data files.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use byteorder::{BigEndian, LittleEndian};
use derive_builder::Builder;
use ndarray::{Array2, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::data::ChemData;
use crate::io::numeric::NumericReader;


// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Input target: chemistry data; source: binaries
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Serialisable/deserialisable structure containing control parameters for acquiring a chemistry
/// data record from raw binary files.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct BinariesChemDataSource {
    /// Names of the atomic orbitals, in basis-function order. Each name has the form
    /// `<atom>_<orbital>`. If empty, no orbital names are stored in the record and atom groups
    /// must be given explicitly.
    #[builder(default = "vec![]")]
    #[serde(default)]
    pub orbital_names: Vec<String>,

    /// Path to a binary file containing the atomic-orbital overlap matrix.
    pub sao: PathBuf,

    /// Paths to binary files containing molecular-orbital coefficient matrices for different spin
    /// spaces. Each matrix has the basis functions along its rows.
    pub coefficients: Vec<PathBuf>,

    /// Optional indices of the highest occupied molecular orbitals, one per spin space.
    #[builder(default = "None")]
    #[serde(default)]
    pub homos: Option<Vec<usize>>,

    /// Specification of the order matrix elements are packed in binary files.
    #[builder(default)]
    #[serde(default)]
    pub matrix_order: MatrixOrder,

    /// Specification of the byte order numerical values are stored in binary files.
    #[builder(default)]
    #[serde(default)]
    pub byte_order: ByteOrder,
}

impl BinariesChemDataSource {
    /// Returns a builder to construct a structure for handling binaries chemistry data source.
    pub fn builder() -> BinariesChemDataSourceBuilder {
        BinariesChemDataSourceBuilder::default()
    }

    /// Reads in the binary files and assembles a chemistry data record.
    ///
    /// The number of basis functions is deduced from the overlap matrix, which must be square.
    /// The number of molecular orbitals of each spin space is then deduced from the size of the
    /// corresponding coefficient file.
    pub fn to_chem_data(&self) -> Result<ChemData, anyhow::Error> {
        let sao_v = read_f64s(&self.sao, &self.byte_order).with_context(|| {
            "Unable to read the specified SAO file when handling binaries chemistry data source"
        })?;
        let nbasis = square_dimension(sao_v.len())?;
        ensure!(
            self.orbital_names.is_empty() || self.orbital_names.len() == nbasis,
            "{} orbital name(s) given, but the overlap matrix has dimension {nbasis}.",
            self.orbital_names.len()
        );
        let sao = to_array2((nbasis, nbasis), sao_v, &self.matrix_order).with_context(|| {
            "Unable to construct an AO overlap matrix from the read-in binary file when handling binaries chemistry data source"
        })?;

        let cs = self
            .coefficients
            .iter()
            .map(|c_path| {
                let c_v = read_f64s(c_path, &self.byte_order)?;
                ensure!(
                    c_v.len() % nbasis == 0,
                    "`{}` contains {} value(s), which is not a multiple of {nbasis}.",
                    c_path.display(),
                    c_v.len()
                );
                let nmo = c_v.len().div_euclid(nbasis);
                to_array2((nbasis, nmo), c_v, &self.matrix_order)
            })
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| {
                "Unable to construct coefficient matrix (matrices) from the read-in binary file(s) when handling binaries chemistry data source"
            })?;

        let aonames = if self.orbital_names.is_empty() {
            None
        } else {
            Some(self.orbital_names.clone())
        };
        ChemData::builder()
            .aonames(aonames)
            .aooverlaps(Some(sao))
            .mocoeffs(cs)
            .homos(self.homos.clone())
            .build()
            .with_context(|| {
                "Unable to construct a chemistry data record when handling binaries chemistry data source"
            })
    }
}

impl Default for BinariesChemDataSource {
    fn default() -> Self {
        BinariesChemDataSource::builder()
            .orbital_names(vec![
                "O_1s".to_string(),
                "H1_1s".to_string(),
                "H2_1s".to_string(),
            ])
            .sao(PathBuf::from("path/to/ao/overlap/matrix"))
            .coefficients(vec![
                PathBuf::from("path/to/alpha/coeffs"),
                PathBuf::from("path/to/beta/coeffs"),
            ])
            .homos(None)
            .matrix_order(MatrixOrder::default())
            .byte_order(ByteOrder::default())
            .build()
            .expect("Unable to build a default `BinariesChemDataSource`.")
    }
}

/// Enumerated type indicating the order the matrix elements are traversed when stored into or
/// read in from a binary file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum MatrixOrder {
    #[default]
    RowMajor,
    ColMajor,
}

/// Enumerated type indicating the byte order of numerical values in binary files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

fn read_f64s(path: &Path, byte_order: &ByteOrder) -> Result<Vec<f64>, anyhow::Error> {
    let values = match byte_order {
        ByteOrder::LittleEndian => {
            NumericReader::<_, LittleEndian, f64>::from_file(path)?.collect::<Vec<_>>()
        }
        ByteOrder::BigEndian => {
            NumericReader::<_, BigEndian, f64>::from_file(path)?.collect::<Vec<_>>()
        }
    };
    Ok(values)
}

fn square_dimension(len: usize) -> Result<usize, anyhow::Error> {
    let n = (len as f64).sqrt().round() as usize;
    ensure!(
        n > 0 && n * n == len,
        "The overlap matrix file contains {len} value(s), which cannot form a non-empty square matrix."
    );
    Ok(n)
}

fn to_array2(
    shape: (usize, usize),
    values: Vec<f64>,
    matrix_order: &MatrixOrder,
) -> Result<Array2<f64>, anyhow::Error> {
    let arr = match matrix_order {
        MatrixOrder::RowMajor => Array2::from_shape_vec(shape, values)?,
        MatrixOrder::ColMajor => Array2::from_shape_vec(shape.f(), values)?,
    };
    Ok(arr)
}
