//! Report assembly and question answering over retrieved entries.
//!
//! Both paths join retrieved texts with [`CONTEXT_SEPARATOR`] and hand the
//! result to the generation provider. The provider's output is returned
//! verbatim.

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::error::{JournalError, JournalResult};
use crate::journal::types::{Report, Retrieval};
use crate::journal::Journal;

pub const CONTEXT_SEPARATOR: &str = "\n---\n";

pub const REPORT_TEMPLATE: &str = "
## Overview
{summary}

## Timeline and Applications
{timeline}

## Screen Analysis
{screen_analysis}

## Focus and Productivity
{focus}

## Recommendations
{recommendations}
";

/// Join retrieved texts in ranking order.
pub fn build_context(retrieval: &Retrieval) -> String {
    retrieval.texts().collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// The synthetic query used to rank entries for a report.
pub fn report_query(start: &str, end: &str) -> String {
    format!("Summarize activities between {start} and {end}")
}

pub fn build_report_prompt(context: &str, start: &str, end: &str, language: &str) -> String {
    format!(
        "Using the data below, produce a focused, concise daily work report. \
         Respond in {language}, formatted as markdown. \
         Make particular use of the 'ACTIVE_WINDOWS:', 'KEYBOARD_TICKS:', 'MOUSE_TICKS:' and \
         'SCREEN ANALYSIS:' parts of the data.\n\n\
         Rules:\n\
         - Do not repeat yourself; be as brief and clear as possible.\n\
         - Only say that the data has no screen analysis if there is truly no SCREEN ANALYSIS at all.\n\
         - Group repeated uses of the same application (summarise frequently used applications under one heading).\n\n\
         Template:\n{REPORT_TEMPLATE}\n\n\
         Data:\n{context}\n\
         Start time: {start}\n\
         End time: {end}"
    )
}

pub fn build_question_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}")
}

/// File name a report for `start` is saved under: `report_<YYYY-MM-DD>.md`.
pub fn report_file_name(start: &str) -> String {
    let date: String = start.chars().take(10).collect();
    format!("report_{date}.md")
}

impl Journal {
    /// Generate a report for the inclusive range `[start, end]`.
    ///
    /// An empty range still produces a report from empty context. Generator
    /// failure surfaces as [`JournalError::ReportGeneration`].
    pub async fn generate_report(&self, start: &str, end: &str) -> JournalResult<Report> {
        let query = report_query(start, end);
        let retrieval = self
            .retrieve(
                Some(query.as_str()),
                Some(start),
                Some(end),
                self.settings.report_limit,
            )
            .await?;

        let context = build_context(&retrieval);
        let prompt = build_report_prompt(&context, start, end, &self.settings.report_language);

        tracing::info!(
            start,
            end,
            entries = retrieval.len(),
            mode = %retrieval.mode,
            "generating report"
        );

        let body = self.complete(&prompt).await?;

        Ok(Report {
            start: start.to_string(),
            end: end.to_string(),
            body,
            entry_count: retrieval.len(),
            mode: retrieval.mode,
        })
    }

    /// Answer a free-form question from the most relevant entries.
    pub async fn ask(&self, question: &str) -> JournalResult<String> {
        let retrieval = self
            .retrieve(Some(question), None, None, self.settings.default_limit)
            .await?;
        let context = build_context(&retrieval);

        tracing::info!(entries = retrieval.len(), mode = %retrieval.mode, "answering question");
        self.complete(&build_question_prompt(&context, question)).await
    }

    /// Write a report body to `report_dir/report_<date>.md`, replacing any
    /// earlier report for the same date.
    pub async fn save_report(&self, report: &Report) -> JournalResult<PathBuf> {
        let dir = self.settings.report_dir.clone();
        let path = dir.join(report_file_name(&report.start));

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| JournalError::io(&dir, e))?;

        let tmp_path = path.with_extension("md.tmp");
        tokio::fs::write(&tmp_path, report.body.as_bytes())
            .await
            .map_err(|e| JournalError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| JournalError::io(&path, e))?;

        tracing::info!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Read a previously saved report by date (`YYYY-MM-DD`).
    pub async fn load_saved_report(&self, date: &str) -> JournalResult<Option<String>> {
        if !is_report_date(date) {
            return Ok(None);
        }
        let path = self.settings.report_dir.join(report_file_name(date));
        read_optional(&path).await
    }

    async fn complete(&self, prompt: &str) -> JournalResult<String> {
        let provider = self.providers.generation.as_ref().ok_or_else(|| {
            JournalError::ReportGeneration(anyhow!("no generation provider configured"))
        })?;

        self.with_timeout("generation", provider.complete(prompt))
            .await
            .map_err(JournalError::ReportGeneration)
    }
}

/// `YYYY-MM-DD` made only of digits and dashes, so it cannot escape the report dir.
fn is_report_date(date: &str) -> bool {
    date.len() == 10
        && date
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() })
}

async fn read_optional(path: &Path) -> JournalResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(JournalError::io(path, e)),
    }
}
