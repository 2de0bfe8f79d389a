//! Display formatting for byte counts.

/// Bytes per mebibyte.
pub const MEBIBYTE: u64 = 1024 * 1024;

/// Formats a byte count as mebibytes with two decimals.
///
/// Display only; never feed the result back into size arithmetic.
///
/// # Examples
///
/// ```
/// use packer_core::size::format_mebibytes;
///
/// assert_eq!(format_mebibytes(13_107_200), "12.50");
/// assert_eq!(format_mebibytes(0), "0.00");
/// ```
#[must_use]
pub fn format_mebibytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / MEBIBYTE as f64)
}
