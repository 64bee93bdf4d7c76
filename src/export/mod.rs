pub mod types;

pub use types::{ExportRow, HEADER};

use crate::github::ApiClient;
use crate::pr::{self, ListOptions, PullRequest, RepoRef};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write output file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Counts from one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Pull requests returned by the list endpoint
    pub listed: usize,
    /// Of those, how many had a merge timestamp
    pub merged: usize,
    /// Rows written to the CSV
    pub written: usize,
    /// Merged pull requests dropped because their detail fetch failed
    pub skipped: usize,
}

/// Exports the merged pull requests of one repository to CSV.
pub struct CsvExporter<'a> {
    client: &'a dyn ApiClient,
    repo: RepoRef,
    options: ListOptions,
}

impl<'a> CsvExporter<'a> {
    pub fn new(client: &'a dyn ApiClient, repo: RepoRef, options: ListOptions) -> Self {
        Self {
            client,
            repo,
            options,
        }
    }

    /// List, filter, enrich and write everything to `path`.
    ///
    /// Only failing to create or write the output file is an error; list
    /// and detail failures shrink the export instead.
    #[instrument(skip(self, path), fields(repo = %self.repo, path = %path.display()))]
    pub async fn export(&self, path: &Path) -> Result<ExportSummary, ExportError> {
        info!("listing pull requests");
        let pulls = pr::list_pull_requests(self.client, &self.repo, &self.options).await;
        let listed = pulls.len();
        let merged: Vec<(PullRequest, DateTime<Utc>)> = pulls
            .into_iter()
            .filter_map(|pull| pull.merged_at.map(|at| (pull, at)))
            .collect();
        info!(listed, merged = merged.len(), "filtered to merged pull requests");

        let file = File::create(path)?;
        let mut summary = self.write_merged(&merged, file).await?;
        summary.listed = listed;

        println!(
            "{} {}",
            "Export complete:".green().bold(),
            path.display()
        );
        info!(written = summary.written, skipped = summary.skipped, "export finished");
        Ok(summary)
    }

    /// Write the header, then one row per merged pull request whose detail
    /// could be fetched, in list order.
    async fn write_merged<W: io::Write>(
        &self,
        merged: &[(PullRequest, DateTime<Utc>)],
        out: W,
    ) -> Result<ExportSummary, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        writer.write_record(HEADER)?;

        let mut summary = ExportSummary {
            merged: merged.len(),
            ..ExportSummary::default()
        };

        for (pull, merged_at) in merged {
            let Some(detail) =
                pr::fetch_pull_request_detail(self.client, &self.repo, pull.number).await
            else {
                summary.skipped += 1;
                continue;
            };

            let row = ExportRow::new(pull, *merged_at, &detail);
            writer.serialize(&row)?;
            summary.written += 1;
            debug!(pr = row.number, hours = row.hours_to_merge, "wrote row");
            println!("Processed PR #{}: {}", row.number, row.title);
        }

        writer.flush()?;
        Ok(summary)
    }
}
