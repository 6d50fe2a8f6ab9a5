use approx::assert_relative_eq;
use ndarray::{array, Array3};

use crate::data::{ChemData, OrbitalNameField, OverlapField};
use crate::drivers::overlap_population_analysis::{
    occupied_totals, OverlapPopulationAnalysisDriver, OverlapPopulationAnalysisParams,
    OverlapPopulationAnalysisResult,
};
use crate::drivers::CcPopDriver;
use crate::io::{read_ccpop_binary, CcPopFileType};
use crate::population::PopulationAnalysisError;

fn h2_data(homos: Option<Vec<usize>>) -> ChemData {
    let s: f64 = 0.6593;
    let n_g = 1.0 / (2.0 * (1.0 + s)).sqrt();
    let n_u = 1.0 / (2.0 * (1.0 - s)).sqrt();
    ChemData::builder()
        .aonames(Some(vec!["H1_1s".to_string(), "H2_1s".to_string()]))
        .aooverlaps(Some(array![[1.0, s], [s, 1.0]]))
        .mocoeffs(vec![array![[n_g, n_u], [n_g, -n_u]]])
        .homos(homos)
        .build()
        .unwrap()
}

#[test]
fn test_drivers_overlap_population_analysis_h2() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = h2_data(Some(vec![0]));
    let params = OverlapPopulationAnalysisParams::builder()
        .write_orbital_populations(true)
        .verbose(1)
        .build()
        .unwrap();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());
    let res = driver.result().unwrap();

    let s: f64 = 0.6593;
    let pops = &res.populations()[0];
    assert_eq!(pops.shape(), &[2, 2, 2]);
    // Bonding orbital: 2 c^2 S with c^2 = 1 / (2 (1 + S)).
    assert_relative_eq!(pops[(0, 0, 1)], s / (1.0 + s), epsilon = 1e-12);
    assert_relative_eq!(pops[(0, 1, 0)], s / (1.0 + s), epsilon = 1e-12);
    // Antibonding orbital: -2 c^2 S with c^2 = 1 / (2 (1 - S)).
    assert_relative_eq!(pops[(1, 0, 1)], -s / (1.0 - s), epsilon = 1e-12);

    let totals = res.occupied_totals().unwrap();
    assert_eq!(totals.len(), 1);
    assert_relative_eq!(totals[0][(0, 1)], s / (1.0 + s), epsilon = 1e-12);
    assert_eq!(totals[0][(0, 0)], 0.0);

    let report = res.to_string();
    assert!(report.contains("H1 – H2"));
    assert!(report.contains("restricted"));
    assert!(report.contains("Derived from: aonames"));
}

#[test]
fn test_drivers_overlap_population_analysis_no_homos() {
    let data = h2_data(None);
    let params = OverlapPopulationAnalysisParams::default();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    assert!(driver.run().is_ok());
    let res = driver.result().unwrap();
    assert!(res.occupied_totals().is_none());
    assert_eq!(res.populations().len(), 1);

    // Without occupied totals, the report falls back to the orbital table.
    let pops = &res.populations()[0];
    let report = res.to_string();
    assert!(report.contains("Orbital overlap populations"));
    assert!(report.contains(&format!("{:+.7}", pops[(0, 0, 1)])));
    assert!(report.contains(&format!("{:+.7}", pops[(1, 0, 1)])));
}

#[test]
fn test_drivers_overlap_population_analysis_malformed_homos() {
    let data = h2_data(Some(vec![5]));
    let params = OverlapPopulationAnalysisParams::default();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());
    let res = driver.result().unwrap();
    assert!(res.occupied_totals().is_none());
    assert_eq!(res.populations()[0].shape(), &[2, 2, 2]);

    let data = h2_data(Some(vec![0, 0]));
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());
    assert!(driver.result().unwrap().occupied_totals().is_none());
}

#[test]
fn test_drivers_overlap_population_analysis_explicit_groups() {
    let data = h2_data(Some(vec![0]));
    let params = OverlapPopulationAnalysisParams::builder()
        .atom_groups(Some(vec![vec![1], vec![0]]))
        .orbital_name_fields(vec![])
        .build()
        .unwrap();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());
    let res = driver.result().unwrap();
    assert_eq!(res.overlap_populations.groups.labels(), vec!["1", "2"]);
    assert_eq!(res.overlap_populations.orbital_name_field, None);
    assert!(res.to_string().contains("explicit specification"));
}

#[test]
fn test_drivers_overlap_population_analysis_invalid_params() {
    let data = h2_data(None);

    let no_fields = OverlapPopulationAnalysisParams::builder()
        .orbital_name_fields(vec![])
        .build()
        .unwrap();
    assert!(OverlapPopulationAnalysisDriver::builder()
        .parameters(&no_fields)
        .data(&data)
        .build()
        .is_err());

    let no_overlap_fields = OverlapPopulationAnalysisParams::builder()
        .overlap_fields(vec![])
        .build()
        .unwrap();
    assert!(OverlapPopulationAnalysisDriver::builder()
        .parameters(&no_overlap_fields)
        .data(&data)
        .build()
        .is_err());

    let negative_threshold = OverlapPopulationAnalysisParams::builder()
        .report_threshold(-1.0)
        .build()
        .unwrap();
    assert!(OverlapPopulationAnalysisDriver::builder()
        .parameters(&negative_threshold)
        .data(&data)
        .build()
        .is_err());

    let params = OverlapPopulationAnalysisParams::default();
    assert!(OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .build()
        .is_err());

    let mut no_coeffs = h2_data(None);
    no_coeffs.mocoeffs.clear();
    assert!(OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&no_coeffs)
        .build()
        .is_err());
}

#[test]
fn test_drivers_overlap_population_analysis_errors_propagate() {
    let mut data = h2_data(None);
    data.aooverlaps = None;
    let params = OverlapPopulationAnalysisParams::default();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PopulationAnalysisError>(),
        Some(PopulationAnalysisError::MissingRequiredInput(_))
    ));
    assert!(driver.result().is_err());

    let mut data = h2_data(None);
    data.mocoeffs = vec![array![[1.0], [0.0], [0.0]]];
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PopulationAnalysisError>(),
        Some(PopulationAnalysisError::DimensionMismatch(_))
    ));
}

#[test]
fn test_drivers_overlap_population_analysis_fallback_fields() {
    let mut data = h2_data(Some(vec![0]));
    data.fonames = data.aonames.take();
    data.fooverlaps = data.aooverlaps.take();

    let params = OverlapPopulationAnalysisParams::builder()
        .orbital_name_fields(vec![OrbitalNameField::FoNames])
        .overlap_fields(vec![OverlapField::FoOverlaps])
        .build()
        .unwrap();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());
    let res = driver.result().unwrap();
    assert_eq!(
        res.overlap_populations.orbital_name_field,
        Some(OrbitalNameField::FoNames)
    );
    assert_eq!(
        res.overlap_populations.overlap_field,
        OverlapField::FoOverlaps
    );
}

#[test]
fn test_drivers_overlap_population_analysis_save_result() {
    let data = h2_data(Some(vec![0]));
    let name = std::env::temp_dir().join("ccpop_test_drivers_opa_save_result");
    let params = OverlapPopulationAnalysisParams::builder()
        .result_save_name(Some(name.clone()))
        .build()
        .unwrap();
    let mut driver = OverlapPopulationAnalysisDriver::builder()
        .parameters(&params)
        .data(&data)
        .build()
        .unwrap();
    assert!(driver.run().is_ok());

    let read: OverlapPopulationAnalysisResult =
        read_ccpop_binary(&name, CcPopFileType::Opa).unwrap();
    let res = driver.result().unwrap();
    assert_eq!(read.overlap_populations, res.overlap_populations);
    assert_eq!(read.occupied_totals, res.occupied_totals);

    let mut path = name.clone();
    path.set_extension(CcPopFileType::Opa.ext());
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_drivers_overlap_population_analysis_occupied_totals() {
    let mut pops = Array3::<f64>::zeros((3, 2, 2));
    pops[(0, 0, 1)] = 0.5;
    pops[(0, 1, 0)] = 0.5;
    pops[(1, 0, 1)] = 0.25;
    pops[(1, 1, 0)] = 0.25;
    pops[(2, 0, 1)] = -1.0;
    pops[(2, 1, 0)] = -1.0;

    let totals = occupied_totals(&[pops.clone()], &[1]).unwrap();
    assert_eq!(totals[0], array![[0.0, 0.75], [0.75, 0.0]]);

    let totals = occupied_totals(&[pops.clone(), pops.clone()], &[0, 2]).unwrap();
    assert_eq!(totals[0][(0, 1)], 0.5);
    assert_eq!(totals[1][(1, 0)], -0.25);

    assert!(occupied_totals(&[pops.clone()], &[3]).is_err());
    assert!(occupied_totals(&[pops.clone()], &[0, 0]).is_err());
}
