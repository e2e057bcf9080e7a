/// Renders a byte count with binary units, e.g. `2.36 MiB`.
///
/// ```
/// use repomd_utils::bytes::format_bytes;
///
/// assert_eq!(format_bytes(2_471_824, 2), "2.36 MiB");
/// assert_eq!(format_bytes(0, 1), "0.0 B");
/// ```
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    let mut value = bytes as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    format!("{value:.precision$} {}", UNITS[idx])
}
