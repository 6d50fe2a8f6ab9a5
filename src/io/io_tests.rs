use ndarray::array;

use crate::data::ChemData;
use crate::io::{read_ccpop_binary, read_ccpop_yaml, write_ccpop_binary, CcPopFileType};

fn h2_data() -> ChemData {
    ChemData::builder()
        .aonames(Some(vec!["H1_1s".to_string(), "H2_1s".to_string()]))
        .aooverlaps(Some(array![[1.0, 0.66], [0.66, 1.0]]))
        .mocoeffs(vec![
            array![[0.55, 1.21], [0.55, -1.21]],
            array![[0.54, 1.22], [0.56, -1.20]],
        ])
        .homos(Some(vec![0, 0]))
        .build()
        .unwrap()
}

#[test]
fn test_io_binary_chem_data() {
    let name = std::env::temp_dir().join("ccpop_test_io_binary_chem_data");
    let data = h2_data();
    write_ccpop_binary(&name, CcPopFileType::Dat, &data).unwrap();
    let read: ChemData = read_ccpop_binary(&name, CcPopFileType::Dat).unwrap();
    assert_eq!(read, data);

    // The file type determines the extension.
    assert!(read_ccpop_binary::<ChemData, _>(&name, CcPopFileType::Opa).is_err());

    let mut path = name.clone();
    path.set_extension(CcPopFileType::Dat.ext());
    assert!(path.to_string_lossy().ends_with(".ccpop.dat"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_io_yaml_chem_data() {
    let path = std::env::temp_dir().join("ccpop_test_io_yaml_chem_data.yml");
    let data = h2_data();
    std::fs::write(&path, serde_yaml::to_string(&data).unwrap()).unwrap();

    let read: ChemData = read_ccpop_yaml(&path).unwrap();
    assert_eq!(read, data);
    let _ = std::fs::remove_file(path);
}
