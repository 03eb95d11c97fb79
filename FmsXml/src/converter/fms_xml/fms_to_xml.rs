//! FMS to XML conversion

use super::FmsXmlOptions;
use super::escape::{ensure_no_carriage_return, escape_text};
use super::run_collapse::{CollapsedEntry, collapse_runs, uncollapsed};
use crate::error::Result;
use crate::formats::fms::{
    self, FMS_FOOTER_MAGIC, FMS_HEADER_MAGIC, FOOTER_SIZE, FmsDocument, HEADER_SIZE,
};
use crate::warning::Converted;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::path::Path;

/// Convert .fms file to XML format
///
/// # Errors
/// Returns an error if reading or conversion fails.
pub fn convert_fms_to_xml<P: AsRef<Path>>(source: P, dest: P) -> Result<Converted<()>> {
    convert_fms_to_xml_with_progress(source, dest, &FmsXmlOptions::default(), &|_| {})
}

/// Convert .fms file to XML format with options and a progress callback
///
/// # Errors
/// Returns an error if reading or conversion fails.
pub fn convert_fms_to_xml_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    options: &FmsXmlOptions,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<Converted<()>> {
    use crate::converter::{ConvertPhase, ConvertProgress};

    tracing::info!(
        "Converting FMS→XML: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading FMS file...",
    ));
    let document = fms::read_fms(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        2,
        3,
        format!("Converting {} strings to XML...", document.value.len()),
    ));
    let xml = to_xml_with_options(&document.value, options)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        "Writing XML file...",
    ));
    std::fs::write(dest, xml)?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 3, 3));
    tracing::info!("Conversion complete");
    Ok(document.map(|_| ()))
}

/// Parse .fms bytes and render them as XML
///
/// # Errors
/// Returns any FMS parse error, or an error if XML serialization fails.
pub fn fms_bytes_to_xml(data: &[u8]) -> Result<Converted<String>> {
    let document = fms::parse_fms_bytes(data)?;
    let xml = to_xml(&document.value)?;
    Ok(Converted::with_warnings(xml, document.warnings))
}

/// Convert `FmsDocument` to XML string
///
/// # Errors
/// Returns an error if XML serialization fails or a string contains `\r`.
pub fn to_xml(document: &FmsDocument) -> Result<String> {
    to_xml_with_options(document, &FmsXmlOptions::default())
}

/// Convert `FmsDocument` to XML string with explicit options
///
/// # Errors
/// Returns an error if XML serialization fails or a string contains `\r`.
pub fn to_xml_with_options(document: &FmsDocument, options: &FmsXmlOptions) -> Result<String> {
    for (index, record) in document.strings.iter().enumerate() {
        ensure_no_carriage_return(&record.text, index)?;
    }

    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', options.indent_size);

    // XML declaration
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.write_event(Event::Start(BytesStart::new("fms")))?;

    write_metadata(&mut writer, document)?;

    let entries = if options.collapse_empty_runs {
        collapse_runs(&document.strings)
    } else {
        uncollapsed(&document.strings)
    };

    writer.write_event(Event::Start(BytesStart::new("stringlist")))?;
    for entry in &entries {
        write_entry(&mut writer, entry)?;
    }
    writer.write_event(Event::End(BytesEnd::new("stringlist")))?;

    writer.write_event(Event::End(BytesEnd::new("fms")))?;

    let mut xml = String::from_utf8(output)?;
    // Add trailing newline
    xml.push('\n');
    Ok(xml)
}

fn write_metadata<W: std::io::Write>(writer: &mut Writer<W>, document: &FmsDocument) -> Result<()> {
    let header = &document.header;
    let footer = &document.footer;
    let header_magic = String::from_utf8_lossy(&FMS_HEADER_MAGIC);
    let footer_magic = String::from_utf8_lossy(&FMS_FOOTER_MAGIC);

    writer.write_event(Event::Start(BytesStart::new("metadata")))?;
    write_field(writer, "headermagicword", &header_magic)?;
    write_field(writer, "datasize", &header.data_size.to_string())?;
    write_field(writer, "headersize", &HEADER_SIZE.to_string())?;
    write_field(writer, "unknown1", &header.unknown1.to_string())?;
    write_field(writer, "unknown2", &header.unknown2.to_string())?;
    write_field(writer, "stringcount", &document.strings.len().to_string())?;
    write_field(writer, "unknown3", &header.unknown3.to_string())?;
    write_field(writer, "unknown4", &header.unknown4.to_string())?;
    write_field(writer, "footermagicword", &footer_magic)?;
    write_field(writer, "unknown5", &footer.unknown5.to_string())?;
    write_field(writer, "footersize", &FOOTER_SIZE.to_string())?;
    write_field(writer, "unknown6", &footer.unknown6.to_string())?;
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;
    Ok(())
}

fn write_entry<W: std::io::Write>(writer: &mut Writer<W>, entry: &CollapsedEntry) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("stringdata")))?;
    write_field(writer, "index", &entry.index.to_string())?;
    write_field(writer, "props1", &entry.record.props1.to_string())?;
    write_field(writer, "props2", &entry.record.props2.to_string())?;
    write_field(writer, "text", &entry.record.text)?;
    if let Some(count) = entry.null_repeat_count {
        write_field(writer, "nullrepeatcount", &count.to_string())?;
    }
    writer.write_event(Event::End(BytesEnd::new("stringdata")))?;
    Ok(())
}

/// Write `<name>value</name>` with the value escaped for XML
fn write_field<W: std::io::Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(value))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::formats::fms::StringRecord;

    #[test]
    fn test_metadata_and_entries() {
        let document = FmsDocument::new(vec![StringRecord::new("Hi"), StringRecord::default()]);
        let xml = to_xml(&document).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<headermagicword>FMSB</headermagicword>"));
        assert!(xml.contains("<headersize>32</headersize>"));
        assert!(xml.contains("<stringcount>2</stringcount>"));
        assert!(xml.contains("<unknown3>3</unknown3>"));
        assert!(xml.contains("<footermagicword>FEOC</footermagicword>"));
        assert!(xml.contains("<footersize>16</footersize>"));
        assert!(xml.contains("<text>Hi</text>"));
        assert!(xml.contains("<text></text>"));
        assert!(!xml.contains("nullrepeatcount"));
        assert_eq!(xml.matches("<stringdata>").count(), 2);
    }

    #[test]
    fn test_collapsed_run() {
        let mut strings = vec![StringRecord::new("Alain")];
        strings.extend(std::iter::repeat_n(StringRecord::default(), 3));
        let xml = to_xml(&FmsDocument::new(strings)).unwrap();

        assert_eq!(xml.matches("<stringdata>").count(), 2);
        assert!(xml.contains("<nullrepeatcount>3</nullrepeatcount>"));
        assert!(xml.contains("<index>1</index>"));
        assert!(xml.contains("<stringcount>4</stringcount>"));
    }

    #[test]
    fn test_collapse_disabled() {
        let strings = vec![StringRecord::default(); 3];
        let options = FmsXmlOptions::new().with_collapse_empty_runs(false);
        let xml = to_xml_with_options(&FmsDocument::new(strings), &options).unwrap();
        assert_eq!(xml.matches("<stringdata>").count(), 3);
        assert!(!xml.contains("nullrepeatcount"));
    }

    #[test]
    fn test_text_escaped() {
        let document = FmsDocument::new(vec![StringRecord::new("A & B\n<i>'x'</i>")]);
        let xml = to_xml(&document).unwrap();
        assert!(xml.contains("<text>A &amp; B&#xA;&lt;i&gt;&apos;x&apos;&lt;/i&gt;</text>"));
    }

    #[test]
    fn test_indent() {
        let document = FmsDocument::new(vec![StringRecord::new("a")]);
        let xml = to_xml(&document).unwrap();
        assert!(xml.contains("\n    <metadata>\n        <headermagicword>"));

        let options = FmsXmlOptions::new().with_indent_size(2);
        let xml = to_xml_with_options(&document, &options).unwrap();
        assert!(xml.contains("\n  <metadata>\n    <headermagicword>"));
    }

    #[test]
    fn test_carriage_return_rejected() {
        let document = FmsDocument::new(vec![StringRecord::new("ok"), StringRecord::new("a\r\nb")]);
        assert!(matches!(
            to_xml(&document),
            Err(Error::UnsupportedCarriageReturn { index: 1 })
        ));
    }
}
