//! XML to FMS conversion

use super::escape::{ensure_no_carriage_return, escape_text, unescape_text};
use super::metadata::{MetadataFields, parse_u32};
use super::run_collapse::{CollapsedEntry, expand_runs};
use crate::error::{Error, Result};
use crate::formats::fms::{self, FmsDocument, StringRecord};
use crate::warning::{Converted, Warning};

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

/// Convert XML file to .fms format
///
/// # Errors
/// Returns an error if reading or conversion fails.
pub fn convert_xml_to_fms<P: AsRef<Path>>(source: P, dest: P) -> Result<Converted<()>> {
    convert_xml_to_fms_with_progress(source, dest, &|_| {})
}

/// Convert XML file to .fms format with progress callback
///
/// # Errors
/// Returns an error if reading or conversion fails.
pub fn convert_xml_to_fms_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<Converted<()>> {
    use crate::converter::{ConvertPhase, ConvertProgress};

    tracing::info!(
        "Converting XML→FMS: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading XML file...",
    ));
    let content = fs::read_to_string(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Parsing,
        2,
        3,
        "Parsing XML content...",
    ));
    let document = from_xml(&content)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        format!("Writing {} strings to FMS...", document.value.len()),
    ));
    fms::write_fms(dest, &document.value)?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 3, 3));
    tracing::info!("Conversion complete");
    Ok(document.map(|_| ()))
}

/// Parse XML and serialize the result as .fms bytes
///
/// # Errors
/// Returns any XML validation error or FMS serialization error.
pub fn xml_to_fms_bytes(content: &str) -> Result<Converted<Vec<u8>>> {
    let document = from_xml(content)?;
    let bytes = fms::serialize_fms(&document.value)?;
    Ok(Converted::with_warnings(bytes, document.warnings))
}

/// Fields of one `<stringdata>` element before defaults are applied
#[derive(Debug, Default)]
struct RawEntry {
    props1: Option<String>,
    props2: Option<String>,
    text: Option<String>,
    null_repeat_count: Option<String>,
}

impl RawEntry {
    fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "props1" => &mut self.props1,
            "props2" => &mut self.props2,
            "text" => &mut self.text,
            "nullrepeatcount" => &mut self.null_repeat_count,
            "index" => return true,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    fn resolve(
        self,
        entry: usize,
        first_index: usize,
        warnings: &mut Vec<Warning>,
    ) -> Result<CollapsedEntry> {
        let mut property = |name: &'static str, raw: Option<String>| -> Result<u32> {
            match raw {
                Some(value) => parse_u32(name, &value),
                None => {
                    warnings.push(Warning::MissingProperty {
                        entry,
                        property: name,
                    });
                    Ok(0)
                }
            }
        };
        let props1 = property("props1", self.props1)?;
        let props2 = property("props2", self.props2)?;

        let text = match self.text {
            Some(raw) => {
                let text = unescape_text(&raw).into_owned();
                ensure_no_carriage_return(&text, entry)?;
                text
            }
            None => {
                warnings.push(Warning::MissingText { entry });
                String::new()
            }
        };

        let null_repeat_count = self
            .null_repeat_count
            .map(|count| parse_u32("nullrepeatcount", &count))
            .transpose()?;

        Ok(CollapsedEntry {
            index: first_index,
            record: StringRecord {
                props1,
                props2,
                text,
            },
            null_repeat_count,
        })
    }
}

/// Incremental state while walking the XML events
#[derive(Default)]
struct TreeBuilder {
    /// Names of the currently open elements
    path: Vec<String>,
    /// Raw (still escaped) text of the innermost element
    text: String,
    metadata: MetadataFields,
    saw_metadata: bool,
    saw_stringlist: bool,
    entries: Vec<RawEntry>,
}

impl TreeBuilder {
    fn open(&mut self, name: String) -> Result<()> {
        if let Some(parent) = self.open_field() {
            return Err(Error::UnexpectedElement {
                parent: parent.to_string(),
                found: name,
            });
        }

        match self.path.len() {
            0 if name != "fms" => return Err(Error::UnexpectedRootElement { found: name }),
            1 if name == "metadata" => self.saw_metadata = true,
            1 if name == "stringlist" => self.saw_stringlist = true,
            2 if name == "stringdata" && self.path[1] == "stringlist" => {
                self.entries.push(RawEntry::default());
            }
            _ => {}
        }
        self.path.push(name);
        self.text.clear();
        Ok(())
    }

    /// Innermost open element if it is a field holding text
    fn open_field(&self) -> Option<&str> {
        match self.path.as_slice() {
            [_, parent, field] if parent == "metadata" => Some(field.as_str()),
            [_, list, item, field] if list == "stringlist" && item == "stringdata" => {
                Some(field.as_str())
            }
            _ => None,
        }
    }

    fn close(&mut self) {
        let text = std::mem::take(&mut self.text);
        let known = match self.path.as_slice() {
            [_, parent, field] if parent == "metadata" => self.metadata.set(field, text),
            [_, list, item, field] if list == "stringlist" && item == "stringdata" => self
                .entries
                .last_mut()
                .is_some_and(|entry| entry.set(field, text)),
            [_, _] | [_] => true,
            [_, list, item] => list != "stringlist" || item == "stringdata",
            _ => false,
        };
        if !known {
            tracing::debug!("Ignoring unknown XML element <{}>", self.path.join("/"));
        }
        self.path.pop();
    }
}

/// Parse XML string to `FmsDocument`
///
/// # Errors
/// Returns an error if XML parsing fails, a required element is missing, or a
/// field fails validation.
pub fn from_xml(content: &str) -> Result<Converted<FmsDocument>> {
    let mut reader = Reader::from_str(content);
    // Don't trim text - leading/trailing whitespace is part of the strings
    reader.trim_text(false);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                builder.open(name)?;
            }
            Ok(Event::Empty(e)) => {
                // Self-closing element, e.g. <text/>
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                builder.open(name)?;
                builder.close();
            }
            Ok(Event::Text(e)) => {
                builder.text.push_str(std::str::from_utf8(&e)?);
            }
            Ok(Event::CData(e)) => {
                // CDATA is literal; store it in escaped form like regular text
                builder
                    .text
                    .push_str(&escape_text(std::str::from_utf8(&e)?));
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !builder.saw_metadata {
        return Err(Error::MissingElement("metadata"));
    }
    if !builder.saw_stringlist {
        return Err(Error::MissingElement("stringlist"));
    }

    let resolved = builder.metadata.resolve()?;
    let mut warnings = Vec::new();

    let mut collapsed = Vec::with_capacity(builder.entries.len());
    let mut next_index = 0usize;
    for (entry, raw) in builder.entries.into_iter().enumerate() {
        let resolved_entry = raw.resolve(entry, next_index, &mut warnings)?;
        next_index = next_index.saturating_add(resolved_entry.span());
        collapsed.push(resolved_entry);
    }

    let strings = expand_runs(collapsed)?;

    match resolved.declared_count {
        Some(declared) if declared as usize != strings.len() => {
            warnings.push(Warning::StringCountMismatch {
                declared,
                actual: strings.len(),
            });
        }
        Some(_) => {}
        None => tracing::info!(
            "No <stringcount> in metadata, using the {} strings found",
            strings.len()
        ),
    }
    if strings.is_empty() {
        return Err(Error::ZeroStringCount);
    }

    tracing::debug!("Parsed {} strings from XML", strings.len());

    let mut header = resolved.header;
    header.string_count = strings.len() as u32;

    Ok(Converted::with_warnings(
        FmsDocument {
            header,
            strings,
            footer: resolved.footer,
        },
        warnings,
    ))
}
