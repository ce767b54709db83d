//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `inferred_paths.csv`: `path_id,source,links`, links space-separated;
//!   a failed decode has its failure kind as `source` and no links
//! - `summary.csv`: `metric,value`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use pf_core::PathId;
use pf_decode::DecodeResult;

use crate::writer::OutputWriter;
use crate::{EvalResult, EvaluationReport};

pub struct CsvWriter {
    paths: Writer<File>,
    summary: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files, and write the header rows.
    pub fn new(dir: &Path) -> EvalResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut paths = Writer::from_path(dir.join("inferred_paths.csv"))?;
        paths.write_record(["path_id", "source", "links"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["metric", "value"])?;

        Ok(Self { paths, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_path(&mut self, path: PathId, result: &DecodeResult) -> EvalResult<()> {
        let (source, links) = match result {
            Ok(p) => (
                p.source.to_string(),
                p.links.iter().map(|l| l.0.to_string()).collect::<Vec<_>>().join(" "),
            ),
            Err(e) => (e.kind().to_string(), String::new()),
        };
        self.paths.write_record([path.0.to_string(), source, links])?;
        Ok(())
    }

    fn write_report(&mut self, report: &EvaluationReport) -> EvalResult<()> {
        for (metric, value) in report.metrics() {
            self.summary.write_record([metric.to_string(), value.to_string()])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> EvalResult<()> {
        self.paths.flush()?;
        self.summary.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> EvalResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.flush()
    }
}
