use crate::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Ok,
    ReadError,
    Failed,
    WriteError,
}

/// One line of a batch's `summary.csv`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub file: String,
    pub label: String,
    pub status: Status,
    pub message: String,
    /// Shortest adsorbate/framework distance in Angstroms, site atom excluded.
    pub closest_contact: Option<f64>,
    /// File name written into the output directory, empty when nothing was written.
    pub output: String,
}

pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn summary_has_header_and_one_line_per_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let rows = vec![
            SummaryRow {
                file: "a.cif".to_string(),
                label: "a_O_site0".to_string(),
                status: Status::Ok,
                message: String::new(),
                closest_contact: Some(1.5),
                output: "a_O_site0.cif".to_string(),
            },
            SummaryRow {
                file: "b.xyz".to_string(),
                label: String::new(),
                status: Status::ReadError,
                message: "Line 2: bad, value".to_string(),
                closest_contact: None,
                output: String::new(),
            },
        ];

        write_summary(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "file,label,status,message,closest_contact,output");
        assert_eq!(lines[1], "a.cif,a_O_site0,ok,,1.5,a_O_site0.cif");
        assert_eq!(lines[2], "b.xyz,,read-error,\"Line 2: bad, value\",,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_summary_is_an_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
