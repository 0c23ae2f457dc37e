//! Upload pipeline - drives rows through mapping and upsert
//!
//! Rows are processed strictly in file order and the records of a row in
//! mapper order. Each upsert is awaited before the next one starts.

use super::summary::{RowError, UploadSummary};
use crate::adapters::fhir::UpsertClient;
use crate::config::FailurePolicy;
use crate::core::mapping::RecordMapper;
use crate::domain::{InputError, LoaderError, Result, Row};
use std::time::Instant;

/// Options controlling one upload run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Map rows without sending anything
    pub dry_run: bool,

    /// What to do with a failing row
    pub failure_policy: FailurePolicy,
}

/// Sequential upload of mapped rows through an [`UpsertClient`]
pub struct UploadPipeline<'a, C: UpsertClient + ?Sized> {
    client: &'a C,
    mapper: RecordMapper<'a>,
    options: UploadOptions,
}

impl<'a, C: UpsertClient + ?Sized> UploadPipeline<'a, C> {
    /// Create a new pipeline over an existing client and mapper
    pub fn new(client: &'a C, mapper: RecordMapper<'a>, options: UploadOptions) -> Self {
        Self {
            client,
            mapper,
            options,
        }
    }

    /// Uploads every row
    ///
    /// Under [`FailurePolicy::Abort`] the first failing row ends the run and
    /// its error is returned; records acknowledged before it stay in the
    /// store. Under [`FailurePolicy::SkipRow`] failing rows are recorded in
    /// the summary and the run continues.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing row under the abort policy.
    pub async fn run<I>(&self, rows: I) -> Result<UploadSummary>
    where
        I: IntoIterator<Item = std::result::Result<Row, InputError>>,
    {
        let start_time = Instant::now();
        let mut summary = UploadSummary::new(self.options.dry_run);

        tracing::info!(
            dry_run = self.options.dry_run,
            failure_policy = %self.options.failure_policy,
            measurements = self.mapper.catalog().len(),
            "Starting upload"
        );

        for row in rows {
            summary.rows_read += 1;

            let (line, outcome) = match row {
                Ok(row) => (Some(row.line), self.upload_row(&row, &mut summary).await),
                Err(e) => (e.line(), Err(LoaderError::from(e))),
            };

            match outcome {
                Ok(()) => summary.rows_uploaded += 1,
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Abort => {
                        tracing::error!(
                            line = ?line,
                            error = %e,
                            rows_uploaded = summary.rows_uploaded,
                            records_upserted = summary.records_upserted(),
                            "Upload aborted"
                        );
                        return Err(e);
                    }
                    FailurePolicy::SkipRow => {
                        tracing::warn!(line = ?line, error = %e, "Skipping failed row");
                        summary.add_error(RowError::new(line, &e));
                    }
                },
            }
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn upload_row(&self, row: &Row, summary: &mut UploadSummary) -> Result<()> {
        let records = self.mapper.map(row)?;

        for record in &records {
            let resource_type = record.resource_type();
            let identity = record.identity();

            if self.options.dry_run {
                tracing::debug!(
                    line = row.line,
                    resource_type = %resource_type,
                    identity = %identity,
                    "Dry run: skipping upsert"
                );
            } else {
                self.client.upsert(resource_type, &identity, record).await?;
                tracing::debug!(
                    line = row.line,
                    resource_type = %resource_type,
                    identity = %identity,
                    "Upserted record"
                );
            }

            summary.record_upserted(resource_type);
        }

        Ok(())
    }
}
