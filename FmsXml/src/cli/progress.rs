//! CLI progress display utilities
//!
//! Step indicators with emojis for single conversions, and a progress bar
//! for batch verification.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::converter::{ConvertPhase, ConvertProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for processing/conversion operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Link - for roundtrip checks
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: &Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Print a conversion progress update as a step line.
///
/// The final `Complete` update is skipped; callers print their own summary.
pub fn print_convert_progress(progress: &ConvertProgress) {
    let emoji = match progress.phase {
        ConvertPhase::ReadingSource => &LOOKING_GLASS,
        ConvertPhase::Parsing | ConvertPhase::Converting => &GEAR,
        ConvertPhase::WritingOutput => &DISK,
        ConvertPhase::Verifying => &LINK,
        ConvertPhase::Complete => return,
    };
    let msg = progress
        .message
        .as_deref()
        .unwrap_or_else(|| progress.phase.label());
    print_step(progress.current, progress.total, emoji, msg);
}

// =============================================================================
// Progress Bars
// =============================================================================

/// Progress bar style for determinate progress
///
/// Format: `Verifying [████████░░░░░░░░] 5/10`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
        .progress_chars("█░ ")
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}
