//! CLI commands for FMS ↔ XML conversion

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{print_convert_progress, print_done};
use crate::converter::{
    ConvertProgress, FmsXmlOptions, convert_fms_to_xml_with_progress,
    convert_xml_to_fms_with_progress,
};
use crate::warning::Warning;

/// Build conversion options from CLI flags
pub fn xml_options(no_collapse: bool, indent: usize) -> FmsXmlOptions {
    FmsXmlOptions::new()
        .with_collapse_empty_runs(!no_collapse)
        .with_indent_size(indent)
}

/// Convert with the direction taken from the file extensions
pub fn execute(source: &Path, destination: &Path, show_progress: bool) -> anyhow::Result<()> {
    let input = extension(source)
        .ok_or_else(|| anyhow::anyhow!("Cannot detect input format from source file extension"))?;
    let output = extension(destination).ok_or_else(|| {
        anyhow::anyhow!("Cannot detect output format from destination file extension")
    })?;

    match (input.as_str(), output.as_str()) {
        ("fms", "xml") => to_xml(source, destination, &FmsXmlOptions::default(), show_progress),
        ("xml", "fms") => to_fms(source, destination, show_progress),
        _ => anyhow::bail!(
            "Unsupported conversion: {input} -> {output}. Supported: fms -> xml, xml -> fms"
        ),
    }
}

/// Convert a .fms file to XML
pub fn to_xml(
    source: &Path,
    destination: &Path,
    options: &FmsXmlOptions,
    show_progress: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    if show_progress {
        println!("Converting {} -> {}", source.display(), destination.display());
    }

    let result = convert_fms_to_xml_with_progress(
        source,
        destination,
        options,
        &|progress: &ConvertProgress| {
            if show_progress {
                print_convert_progress(progress);
            }
        },
    )?;
    report_warnings(&result.warnings);

    if show_progress {
        print_done(start.elapsed());
    }
    Ok(())
}

/// Convert an XML file to .fms
pub fn to_fms(source: &Path, destination: &Path, show_progress: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    if show_progress {
        println!("Converting {} -> {}", source.display(), destination.display());
    }

    let result = convert_xml_to_fms_with_progress(
        source,
        destination,
        &|progress: &ConvertProgress| {
            if show_progress {
                print_convert_progress(progress);
            }
        },
    )?;
    report_warnings(&result.warnings);

    if show_progress {
        print_done(start.elapsed());
    }
    Ok(())
}

pub(crate) fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!("{warning}");
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
}
