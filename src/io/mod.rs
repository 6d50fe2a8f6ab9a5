//! Reading and writing of `ccpop` files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{self, format_err};
use serde::{de::DeserializeOwned, Serialize};

pub(crate) mod format;
pub mod numeric;

#[cfg(test)]
#[path = "io_tests.rs"]
mod io_tests;

/// An enumerated type for `ccpop` file types.
pub enum CcPopFileType {
    /// Variant for binary files containing chemistry data records.
    Dat,

    /// Variant for binary files containing overlap population analysis results.
    Opa,
}

impl CcPopFileType {
    /// Returns the extension of the file type.
    pub fn ext(&self) -> String {
        match self {
            CcPopFileType::Dat => "ccpop.dat".to_string(),
            CcPopFileType::Opa => "ccpop.opa".to_string(),
        }
    }
}

/// Reads a `ccpop` binary file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (without `ccpop`-specific extensions).
/// * `file_type` - The type of the `ccpop` file to be read in.
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_ccpop_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: CcPopFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut reader = BufReader::new(File::open(path).map_err(|err| format_err!(err))?);
    bincode::deserialize_from(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into a `ccpop` binary file.
///
/// # Arguments
///
/// * `name` - The name of the file to be written (without `ccpop`-specific extensions).
/// * `file_type` - The type of the `ccpop` file to be written.
///
/// # Returns
///
/// A `Result` indicating if the serialisation and writing processes have been successful.
pub fn write_ccpop_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: CcPopFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|err| format_err!(err))
}

/// Reads a `ccpop` configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_ccpop_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}
