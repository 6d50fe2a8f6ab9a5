use ndarray::array;

use crate::data::{
    default_orbital_name_fields, default_overlap_fields, ChemData, OrbitalNameField, OverlapField,
};

fn names(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_data_resolve_orbital_names_primary_wins() {
    let data = ChemData::builder()
        .aonames(Some(names(&["C_1s", "O_1s"])))
        .fonames(Some(names(&["F1_1", "F2_1"])))
        .mocoeffs(vec![array![[1.0], [0.0]]])
        .build()
        .unwrap();
    let (field, resolved) = data
        .resolve_orbital_names(&default_orbital_name_fields())
        .unwrap();
    assert_eq!(field, OrbitalNameField::AoNames);
    assert_eq!(resolved, &["C_1s".to_string(), "O_1s".to_string()]);

    let (field, resolved) = data
        .resolve_orbital_names(&[OrbitalNameField::FoNames, OrbitalNameField::AoNames])
        .unwrap();
    assert_eq!(field, OrbitalNameField::FoNames);
    assert_eq!(resolved[0], "F1_1");
}

#[test]
fn test_data_resolve_fallback_fields() {
    let data = ChemData::builder()
        .fonames(Some(names(&["F1_1", "F2_1"])))
        .fooverlaps(Some(array![[1.0, 0.2], [0.2, 1.0]]))
        .mocoeffs(vec![array![[1.0], [0.0]]])
        .build()
        .unwrap();
    let (name_field, _) = data
        .resolve_orbital_names(&default_orbital_name_fields())
        .unwrap();
    assert_eq!(name_field, OrbitalNameField::FoNames);
    let (ovlp_field, ovlp) = data.resolve_overlap(&default_overlap_fields()).unwrap();
    assert_eq!(ovlp_field, OverlapField::FoOverlaps);
    assert_eq!(ovlp[(0, 1)], 0.2);

    assert!(data
        .resolve_orbital_names(&[OrbitalNameField::AoNames])
        .is_none());
    assert!(data.resolve_overlap(&[OverlapField::AoOverlaps]).is_none());
    assert!(data.resolve_overlap(&[]).is_none());
}

#[test]
fn test_data_spin_channels_and_display() {
    let data = ChemData::builder()
        .aonames(Some(names(&["H1_1s", "H2_1s"])))
        .aooverlaps(Some(array![[1.0, 0.5], [0.5, 1.0]]))
        .mocoeffs(vec![
            array![[0.5, 0.5], [0.5, -0.5]],
            array![[0.6, 0.4], [0.4, -0.6]],
        ])
        .homos(Some(vec![0, 0]))
        .build()
        .unwrap();
    assert_eq!(data.n_spins(), 2);
    assert!(data.is_unrestricted());

    let summary = data.to_string();
    assert!(summary.contains("unrestricted"));
    assert!(summary.contains("aonames: 2 names"));
    assert!(summary.contains("fonames: no"));
    assert!(summary.contains("aooverlaps: 2 × 2"));
}

#[test]
fn test_data_yaml_missing_optional_fields() {
    let yaml = "mocoeffs:\n  - v: 1\n    dim: [2, 1]\n    data: [1.0, 1.0]\n";
    let data: ChemData = serde_yaml::from_str(yaml).unwrap();
    assert!(data.aonames.is_none());
    assert!(data.aooverlaps.is_none());
    assert_eq!(data.mocoeffs[0], array![[1.0], [1.0]]);
}
