//! The topology file handed from the extractor to the report stage.
//!
//! Each line is `<key path>, <domain>`. The domain is written after a
//! single space and trimmed again on read.
use crate::types::TopologyRecord;
use shared::csv::{self, CsvError, ToRecord};
use std::io;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum TopologyFileError {
    #[error("topology file {0} not found")]
    NotFound(String),
    #[error("could not read topology file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] CsvError),
}

impl ToRecord for TopologyRecord {
    fn to_record(&self) -> Vec<String> {
        vec![self.key_path.clone(), format!(" {}", self.domain)]
    }
}

pub fn write(path: &Path, records: &[TopologyRecord]) -> Result<(), TopologyFileError> {
    csv::write_file(path, records)?;
    Ok(())
}

pub fn read(path: &Path) -> Result<Vec<TopologyRecord>, TopologyFileError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TopologyFileError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(parse(&contents))
}

fn parse(contents: &str) -> Vec<TopologyRecord> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.split(',').map(str::trim);
            match (fields.next(), fields.next()) {
                (Some(key_path), Some(domain)) if !key_path.is_empty() && !domain.is_empty() => {
                    Some(TopologyRecord::new(key_path, domain))
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hub_group_list.csv");
        let records = vec![
            TopologyRecord::new("/prod/ap/hub-ap-south-1-db10/tenanta", "d1.example"),
            TopologyRecord::new("/prod/ap/hub-ap-south-1-db11/tenantb", "d2.example"),
        ];

        write(&path, &records).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("/prod/ap/hub-ap-south-1-db10/tenanta, d1.example\n"));
        assert_eq!(read(&path).unwrap(), records);
    }

    #[test]
    fn test_parse_skips_short_lines() {
        let contents = concat!(
            "/prod/a/hub-x-y-z/t1, a.example\n",
            "\n",
            "just-a-key\n",
            "/prod/b/hub-x-y-z/t2 ,b.example, extra\n",
        );
        let records = parse(contents);
        assert_eq!(
            records,
            vec![
                TopologyRecord::new("/prod/a/hub-x-y-z/t1", "a.example"),
                TopologyRecord::new("/prod/b/hub-x-y-z/t2", "b.example"),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read(&dir.path().join("hub_group_list.csv"));
        assert!(matches!(result, Err(TopologyFileError::NotFound(_))));
    }
}
