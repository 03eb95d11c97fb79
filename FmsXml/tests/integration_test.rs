use fmsxml::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

/// Build a .fms buffer with zero props for every string
fn build_fms(strings: &[&str]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"FMSB");
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&32u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(strings.len() as u32).to_le_bytes());
    data.extend_from_slice(&3u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    for _ in strings {
        data.extend_from_slice(&[0; 8]);
    }
    for s in strings {
        data.extend_from_slice(s.as_bytes());
        data.push(0);
    }
    while data.len() % 16 != 0 {
        data.push(0);
    }
    data.extend_from_slice(b"FEOC");
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    let data_size = (data.len() - 48) as u32;
    data[4..8].copy_from_slice(&data_size.to_le_bytes());
    data
}

#[test]
fn test_two_string_scenario() {
    let original = build_fms(&["Hi", ""]);
    assert_eq!(original.len(), 80);

    let xml = fms_bytes_to_xml(&original).unwrap();
    assert!(xml.warnings.is_empty());
    assert_eq!(xml.value.matches("<stringdata>").count(), 2);
    assert!(xml.value.contains("<text>Hi</text>"));
    assert!(xml.value.contains("<text></text>"));

    let rebuilt = xml_to_fms_bytes(&xml.value).unwrap();
    assert!(rebuilt.warnings.is_empty());
    assert_eq!(rebuilt.value, original);
}

#[test]
fn test_file_conversions() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("dialog.fms");
    let xml_path = dir.path().join("dialog.xml");
    let output = dir.path().join("dialog_out.fms");

    let original = build_fms(&["Bonjour", "", "", "", "Fish & <Chips>\nline two", "Ünïcødé"]);
    fs::write(&source, &original).unwrap();

    let to_xml = convert_fms_to_xml(&source, &xml_path).unwrap();
    assert!(!to_xml.has_warnings());
    let xml = fs::read_to_string(&xml_path).unwrap();
    assert!(xml.contains("<nullrepeatcount>3</nullrepeatcount>"));
    assert!(xml.contains("Fish &amp; &lt;Chips&gt;&#xA;line two"));
    assert!(xml.contains("Ünïcødé"));

    let to_fms = convert_xml_to_fms(&xml_path, &output).unwrap();
    assert!(!to_fms.has_warnings());
    assert_eq!(fs::read(&output).unwrap(), original);

    let document = read_fms(&output).unwrap().into_inner();
    assert_eq!(document.len(), 6);
    assert_eq!(document.strings[4].text, "Fish & <Chips>\nline two");
}

#[test]
fn test_repeat_expansion() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<fms>
    <metadata/>
    <stringlist>
        <stringdata>
            <props1>0</props1>
            <props2>0</props2>
            <text>Alain</text>
        </stringdata>
        <stringdata>
            <props1>0</props1>
            <props2>0</props2>
            <text></text>
            <nullrepeatcount>3</nullrepeatcount>
        </stringdata>
    </stringlist>
</fms>
"#;
    let document = fms_from_xml(xml).unwrap();
    assert!(document.warnings.is_empty());
    assert_eq!(
        document.value.strings,
        vec![
            StringRecord::new("Alain"),
            StringRecord::default(),
            StringRecord::default(),
            StringRecord::default(),
        ]
    );
    assert_eq!(document.value.header.string_count, 4);
}

#[test]
fn test_defaults_filled() {
    let xml = "<fms><metadata></metadata><stringlist>\
               <stringdata><text>Hi</text></stringdata>\
               <stringdata><props1>0</props1><props2>0</props2><text/></stringdata>\
               </stringlist></fms>";
    let result = xml_to_fms_bytes(xml).unwrap();
    assert_eq!(
        result.warnings,
        vec![
            Warning::MissingProperty {
                entry: 0,
                property: "props1"
            },
            Warning::MissingProperty {
                entry: 0,
                property: "props2"
            },
        ]
    );
    assert_eq!(result.value, build_fms(&["Hi", ""]));
}

#[test]
fn test_rejections() {
    let mut bad_magic = build_fms(&["a"]);
    bad_magic[..4].copy_from_slice(b"FMSX");
    assert!(matches!(parse_fms_bytes(&bad_magic), Err(Error::BadMagic { .. })));

    let mut bad_header = build_fms(&["a"]);
    bad_header[8..12].copy_from_slice(&31u32.to_le_bytes());
    assert!(matches!(parse_fms_bytes(&bad_header), Err(Error::BadHeaderSize(31))));

    let mut zero_count = build_fms(&["a"]);
    zero_count[20..24].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(parse_fms_bytes(&zero_count), Err(Error::ZeroStringCount)));

    let zero_repeat = "<fms><metadata/><stringlist>\
                       <stringdata><text>a</text></stringdata>\
                       <stringdata><text/><nullrepeatcount>0</nullrepeatcount></stringdata>\
                       </stringlist></fms>";
    assert!(matches!(
        fms_from_xml(zero_repeat),
        Err(Error::InvalidRepeatCount { entry: 1 })
    ));

    let repeat_on_text = "<fms><metadata/><stringlist>\
                          <stringdata><text>a</text><nullrepeatcount>2</nullrepeatcount></stringdata>\
                          </stringlist></fms>";
    assert!(matches!(
        fms_from_xml(repeat_on_text),
        Err(Error::NullRepeatOnNonEmptyText { entry: 0 })
    ));

    assert!(matches!(
        fms_from_xml("<strings/>"),
        Err(Error::UnexpectedRootElement { .. })
    ));
}

#[test]
fn test_verify_roundtrip_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("menu.fms");
    let xml_path = dir.path().join("menu.xml");
    let output = dir.path().join("menu.roundtrip.fms");
    fs::write(&source, build_fms(&["", "", "Start", "Options", "", "Quit"])).unwrap();

    let report = verify_roundtrip_file(&source, &xml_path, &output).unwrap();
    assert!(report.is_identical());
    assert_eq!(report.original_crc32, report.output_crc32);
    assert!(report.warnings.is_empty());
    assert!(xml_path.exists());
    assert_eq!(fs::read(&output).unwrap(), fs::read(&source).unwrap());
}

#[test]
fn test_unusual_unknowns_survive_roundtrip() {
    let mut data = build_fms(&["one", "two"]);
    data[12..16].copy_from_slice(&7u32.to_le_bytes());
    let len = data.len();
    data[len - 12..len - 8].copy_from_slice(&9u32.to_le_bytes());

    let report = verify_roundtrip(&data).unwrap();
    assert!(report.is_identical());
    assert_eq!(report.first_mismatch, None);
    assert!(report.warnings.contains(&Warning::UnexpectedValue {
        field: "unknown1",
        expected: 0,
        found: 7
    }));
    assert!(report.warnings.contains(&Warning::UnexpectedValue {
        field: "unknown5",
        expected: 0,
        found: 9
    }));
}
