/// Derive a scan identifier from an mzTab spectra reference.
///
/// `ms_run[1]:controllerType=0 controllerNumber=1 scan=4012` yields `4012`.
/// References without a `scan=` key yield every numeric `key=value` value
/// joined by commas, so `ms_run[1]:index=7` yields `7`.
pub fn scan_number(spectra_ref: &str) -> String {
    let native_id = spectra_ref
        .split_once(':')
        .map_or(spectra_ref, |(_, id)| id);

    if let Some(pos) = native_id.find("scan=") {
        let digits = leading_digits(&native_id[pos + "scan=".len()..]);
        if !digits.is_empty() {
            return digits.to_string();
        }
    }

    let values: Vec<&str> = native_id
        .match_indices('=')
        .map(|(pos, _)| leading_digits(&native_id[pos + 1..]))
        .filter(|digits| !digits.is_empty())
        .collect();

    if values.is_empty() {
        native_id.trim().to_string()
    } else {
        values.join(",")
    }
}

fn leading_digits(text: &str) -> &str {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    &text[..end]
}

/// Reduce a file location to the name used to correlate runs.
///
/// Drops any URI scheme and directory, then everything from the first `.`:
/// `file:///data/run_a.mzML` and `run_a.raw` both yield `run_a`.
pub fn reference_file_name(location: &str) -> String {
    let name = location
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(location);
    name.split('.').next().unwrap_or(name).to_string()
}
