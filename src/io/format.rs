//! Nice `ccpop` output formatting.

use std::fmt;

const CCPOP_BANNER_LENGTH: usize = 103;

/// Logs an error to the `ccpop-output` logger.
macro_rules! ccpop_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "ccpop-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `ccpop-output` logger.
macro_rules! ccpop_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "ccpop-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `ccpop-output` logger.
macro_rules! ccpop_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "ccpop-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {ccpop_error, ccpop_output, ccpop_warn};

/// Logs a nicely formatted section title to the `ccpop-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(CCPOP_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    ccpop_output!("┌──{bar}──┐");
    ccpop_output!("│§ {title:^length$} §│");
    ccpop_output!("└──{bar}──┘");
}

/// Writes a nicely formatted subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    writeln!(f, "{subtitle}")?;
    writeln!(f, "{bar}")?;
    Ok(())
}

/// Logs a nicely formatted subtitle to the `ccpop-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    ccpop_output!("{}", subtitle);
    ccpop_output!("{}", bar);
}

/// Logs a nicely formatted macro-section beginning to the `ccpop-output` logger.
pub(crate) fn log_macsec_begin(sectitle: &str) {
    let width = CCPOP_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    ccpop_output!("❬❬❬❬❬ [Begin] {sectitle_space:❬<width$}");
}

/// Logs a nicely formatted macro-section ending to the `ccpop-output` logger.
pub(crate) fn log_macsec_end(sectitle: &str) {
    let width = CCPOP_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    ccpop_output!("❭❭❭❭❭ [ End ] {sectitle_space:❭<width$}");
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging `ccpop` outputs nicely.
pub(crate) trait CcPopOutput: fmt::Debug + fmt::Display {
    /// Logs display output nicely.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            ccpop_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> CcPopOutput for T where T: fmt::Debug + fmt::Display {}
