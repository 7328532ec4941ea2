//! Normalizer fixtures read through the fragment reader.

use pcode_detector::normalize::{BailOut, COMPOSITE_SEPARATOR, HeaderLayout};
use pcode_detector::{FileFormat, FragmentReader, Normalizer, RawFragment};

fn read_csv(content: &str) -> RawFragment {
    FragmentReader::new()
        .read_delimited(content.as_bytes())
        .expect("Failed to read CSV")
}

#[test]
fn test_hxl_tag_row_under_header() {
    let content = "Province,Province P-Code,Affected\n\
                   #adm1+name,#adm1+code,#affected\n\
                   Kabul,AF01,1200\n\
                   Herat,AF02,800\n\
                   Balkh,AF03,450\n";
    let raw = read_csv(content);
    let input_rows = raw.row_count();

    let table = Normalizer::new().normalize(raw);

    assert_eq!(table.layout, HeaderLayout::TagRow { row: 0 });
    assert_eq!(table.row_count(), input_rows - 1);
    assert_eq!(
        table.columns,
        vec![
            "Province||#adm1+name",
            "Province P-Code||#adm1+code",
            "Affected||#affected"
        ]
    );
    assert_eq!(table.column_by_key("Province P-Code||#adm1+code").unwrap(), vec!["AF01", "AF02", "AF03"]);
}

#[test]
fn test_tag_row_after_title_rows() {
    let content = "Admin,Unnamed: 1\n\
                   Affected people by district,\n\
                   District code,People\n\
                   #adm2+code,#affected\n\
                   AF0101,10\n\
                   AF0102,20\n";
    let raw = read_csv(content);
    let input_rows = raw.row_count();

    let table = Normalizer::new().normalize(raw);

    assert_eq!(table.layout, HeaderLayout::TagRow { row: 2 });
    assert_eq!(table.row_count(), input_rows - 3);
    assert_eq!(table.columns[0], "Admin||Affected people by district||District code||#adm2+code");
    // The placeholder header is dropped from the composite.
    assert_eq!(table.columns[1], "People||#affected");
}

#[test]
fn test_headerless_csv_promotes_first_row() {
    let content = ",\nadm1_pcode,adm1_name\nAF01,Kabul\nAF02,Herat\n";
    let raw = read_csv(content);

    let table = Normalizer::new().normalize(raw);

    assert!(table.promoted_header);
    assert_eq!(table.columns, vec!["adm1_pcode", "adm1_name"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_clean_csv_is_idempotent() {
    let content = "pcode,name,population\nAF01,Kabul,4000000\nAF02,Herat,500000\n";
    let normalizer = Normalizer::new();

    let first = normalizer.normalize(read_csv(content));
    let second = normalizer.normalize(first.clone().into_fragment(FileFormat::Csv));

    assert_eq!(first.layout, HeaderLayout::AsRead);
    assert_eq!(first.columns, second.columns);
    assert_eq!(first.rows, second.rows);
}

#[test]
fn test_geojson_properties_are_not_renormalized() {
    let content = r##"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"ADM1_PCODE": "#adm1+code", "ADM1_EN": "Kabul"}, "geometry": null},
            {"type": "Feature", "properties": {"ADM1_PCODE": "AF01", "ADM1_EN": "Kabul"}, "geometry": null},
            {"type": "Feature", "properties": {"ADM1_PCODE": "AF02", "ADM1_EN": "Herat"}, "geometry": null}
        ]
    }"##;
    let raw = FragmentReader::new().read_json(content.as_bytes()).unwrap();

    let table = Normalizer::new().normalize(raw);

    assert_eq!(
        table.layout,
        HeaderLayout::BailedOut {
            reason: BailOut::SchemaInferred
        }
    );
    assert!(table.columns.iter().all(|c| !c.contains(COMPOSITE_SEPARATOR)));
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_sample_cap_applies_before_normalization() {
    let mut content = String::from("pcode\n#adm1+code\n");
    for i in 0..50 {
        content.push_str(&format!("AF{:02}\n", i));
    }
    let raw = FragmentReader::with_sample_rows(10)
        .read_delimited(content.as_bytes())
        .unwrap();
    assert_eq!(raw.row_count(), 10);

    let table = Normalizer::new().normalize(raw);
    assert_eq!(table.row_count(), 9);
}
