use crate::rollups::Rollups;
use shared::csv::{self, CsvError, ToRecord};
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("could not create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] CsvError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFile {
    Count,
    SortedCount,
    Ranked,
    HubGroupProcessed,
    MergedSchema,
    GroupedSchema,
    DbRequests,
}

impl ReportFile {
    pub const ALL: [ReportFile; 7] = [
        ReportFile::Count,
        ReportFile::SortedCount,
        ReportFile::Ranked,
        ReportFile::HubGroupProcessed,
        ReportFile::MergedSchema,
        ReportFile::GroupedSchema,
        ReportFile::DbRequests,
    ];

    pub const fn file_name(&self) -> &'static str {
        match self {
            ReportFile::Count => "count.csv",
            ReportFile::SortedCount => "sorted_count.csv",
            ReportFile::Ranked => "ranked.csv",
            ReportFile::HubGroupProcessed => "hub_group_processed.csv",
            ReportFile::MergedSchema => "merged_schema.csv",
            ReportFile::GroupedSchema => "grouped_schema.csv",
            ReportFile::DbRequests => "db_requests.csv",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            ReportFile::Count => "aggregated daily counts",
            ReportFile::SortedCount => "counts sorted by requests",
            ReportFile::Ranked => "ranked hosts with count and weight",
            ReportFile::HubGroupProcessed => "tenant to shard group mapping",
            ReportFile::MergedSchema => "tenants with count and weight",
            ReportFile::GroupedSchema => "total weight per shard group",
            ReportFile::DbRequests => "total requests per shard group",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrittenReport {
    pub file: ReportFile,
    pub path: PathBuf,
}

/// Writes every report table into one output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        ReportWriter {
            output_dir: output_dir.into(),
        }
    }

    pub fn write_all(&self, rollups: &Rollups<'_>) -> Result<Vec<WrittenReport>, ReportError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ReportError::CreateDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let mut written = Vec::with_capacity(ReportFile::ALL.len());
        for file in ReportFile::ALL {
            let path = self.output_dir.join(file.file_name());
            match file {
                ReportFile::Count => write(&path, &rollups.counts())?,
                ReportFile::SortedCount => write(&path, &rollups.sorted_counts())?,
                ReportFile::Ranked => write(&path, &rollups.ranked())?,
                ReportFile::HubGroupProcessed => write(&path, rollups.tenants())?,
                ReportFile::MergedSchema => write(&path, &rollups.tenant_traffic())?,
                ReportFile::GroupedSchema => write(&path, &rollups.shard_weights())?,
                ReportFile::DbRequests => write(&path, &rollups.shard_requests())?,
            }
            written.push(WrittenReport { file, path });
        }

        tracing::info!(
            output_dir = %self.output_dir.display(),
            files = written.len(),
            "Wrote report files"
        );
        Ok(written)
    }
}

fn write<R: ToRecord>(path: &Path, rows: &[R]) -> Result<(), ReportError> {
    csv::write_file(path, rows)?;
    Ok(())
}
