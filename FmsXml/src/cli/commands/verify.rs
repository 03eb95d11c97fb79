//! CLI command for roundtrip verification

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use console::style;

use crate::cli::commands::convert::report_warnings;
use crate::cli::progress::{print_done, simple_bar};
use crate::converter::{RoundtripReport, verify_roundtrip, verify_roundtrip_file};

/// Verify every source, failing if any file does not roundtrip exactly
pub fn execute(sources: &[PathBuf], keep: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    if let Some(dir) = keep {
        fs::create_dir_all(dir)?;
    }

    let pb = simple_bar(sources.len() as u64, "Verifying");
    let mut failures = Vec::new();

    for source in sources {
        pb.set_message(file_name(source));
        match verify_one(source, keep) {
            Ok(report) if report.is_identical() => {
                report_warnings(&report.warnings);
            }
            Ok(report) => {
                report_warnings(&report.warnings);
                failures.push(format!("{}: {}", source.display(), describe_mismatch(&report)));
            }
            Err(e) => failures.push(format!("{}: {e}", source.display())),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let passed = sources.len() - failures.len();
    println!(
        "{} {passed}/{} files roundtrip byte-for-byte",
        style("Verified").bold(),
        sources.len()
    );
    for failure in &failures {
        println!("  {} {failure}", style("FAIL").red().bold());
    }
    print_done(start.elapsed());

    if failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} files failed verification", failures.len(), sources.len())
    }
}

fn verify_one(source: &Path, keep: Option<&Path>) -> anyhow::Result<RoundtripReport> {
    let Some(dir) = keep else {
        let data = fs::read(source)?;
        return Ok(verify_roundtrip(&data)?);
    };

    let stem = source
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    let xml_dest = dir.join(format!("{stem}.xml"));
    let fms_dest = dir.join(format!("{stem}.roundtrip.fms"));
    Ok(verify_roundtrip_file(source, xml_dest.as_path(), fms_dest.as_path())?)
}

fn describe_mismatch(report: &RoundtripReport) -> String {
    format!(
        "first difference at byte {} ({} bytes in, {} bytes out, CRC-32 {:08x} vs {:08x})",
        report.first_mismatch.unwrap_or_default(),
        report.original_len,
        report.output_len,
        report.original_crc32,
        report.output_crc32
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
