//! CSV export of decoded place records.

use std::path::{Path, PathBuf};

use placedump_core::PlaceRecord;

pub(crate) const HEADER: [&str; 8] = [
    "name",
    "phone_number",
    "ratings",
    "reviews",
    "website",
    "address",
    "map_link",
    "hours",
];

/// `<output_dir>/<query>.csv`, with path separators in the query replaced.
pub(crate) fn default_output_path(output_dir: &Path, query: &str) -> PathBuf {
    let stem: String = query
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    output_dir.join(format!("{stem}.csv"))
}

/// Writes `records` to `path` with a header row, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub(crate) fn write_csv(path: &Path, records: &[PlaceRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn row(record: &PlaceRecord) -> [String; 8] {
    [
        record.name.clone(),
        record.phone_number.clone().unwrap_or_default(),
        record.rating.map(|r| r.to_string()).unwrap_or_default(),
        record
            .review_count
            .map(|n| n.to_string())
            .unwrap_or_default(),
        record.website.clone().unwrap_or_default(),
        record.address.replace(['[', ']'], ""),
        record.map_link.clone().unwrap_or_default(),
        record
            .hours
            .as_ref()
            .map(|days| {
                days.iter()
                    .map(|d| format!("{}: {}", d.day, d.hours))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default(),
    ]
}
