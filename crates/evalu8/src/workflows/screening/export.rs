use std::io::Write;

use super::domain::AugmentedApplicantRow;

/// Write augmented rows as CSV with a header line. Absent fields become empty cells.
pub fn write_csv<W: Write>(rows: &[AugmentedApplicantRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render augmented rows into an in-memory CSV document.
pub fn to_csv_string(rows: &[AugmentedApplicantRow]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
