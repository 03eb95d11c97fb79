//! CLI command for inspecting .fms files

use std::path::Path;

use console::style;

use crate::cli::commands::convert::report_warnings;
use crate::converter::fms_xml::collapse_runs;
use crate::formats::fms::{FmsDocument, read_fms};

/// Print a summary and every string, or the whole document as JSON
pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let document = read_fms(path)?;
    report_warnings(&document.warnings);
    let document = document.into_inner();

    if json {
        println!("{}", document.to_json()?);
    } else {
        print_summary(path, &document);
    }
    Ok(())
}

fn print_summary(path: &Path, document: &FmsDocument) {
    let header = &document.header;
    let footer = &document.footer;
    let empty = document.strings.iter().filter(|s| s.text.is_empty()).count();
    let entries = collapse_runs(&document.strings).len();
    let text_bytes: usize = document.strings.iter().map(|s| s.text.len()).sum();

    println!("{}", style(path.display()).bold());
    println!("  Data size:     {}", header.data_size);
    println!("  Strings:       {}", document.len());
    println!("  Empty strings: {empty}");
    println!("  XML entries:   {entries}");
    println!("  Text bytes:    {text_bytes}");
    println!(
        "  Header:        unknown1={} unknown2={} unknown3={} unknown4={}",
        header.unknown1, header.unknown2, header.unknown3, header.unknown4
    );
    println!(
        "  Footer:        unknown5={} unknown6={}",
        footer.unknown5, footer.unknown6
    );

    println!();
    for (index, record) in document.strings.iter().enumerate() {
        println!(
            "  {} props=({}, {}) {:?}",
            style(format!("[{index:>5}]")).dim(),
            record.props1,
            record.props2,
            record.text
        );
    }
}
