//! Handing finished reports to a download sink.
//!
//! Rendering never touches the filesystem.  A [`DownloadSink`] receives the final bytes and the
//! suggested file name; failures there are reported as [`ReportError::Download`] so callers can
//! tell them apart from rendering failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::builder::RenderedReport;
use crate::error::ReportError;

/// Destination for rendered report bytes.
pub trait DownloadSink {
    /// Stores `bytes` under `file_name`.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes reports into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Collects reports in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Hands a rendered report to `sink`.
pub fn deliver(report: &RenderedReport, sink: &mut impl DownloadSink) -> Result<(), ReportError> {
    sink.deliver(&report.file_name, &report.bytes)
        .map_err(|source| ReportError::Download {
            file_name: report.file_name.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSink;

    impl DownloadSink for BrokenSink {
        fn deliver(&mut self, _: &str, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "no document context"))
        }
    }

    fn rendered() -> RenderedReport {
        RenderedReport {
            bytes: b"%PDF-1.3".to_vec(),
            file_name: "Slack_Security_Report_small.pdf".into(),
            page_count: 1,
            sections: Vec::new(),
        }
    }

    #[test]
    fn sink_failure_is_a_download_error() {
        let err = deliver(&rendered(), &mut BrokenSink).unwrap_err();
        assert!(err.is_delivery_failure());
        assert_eq!(
            err.to_string(),
            "download failed for Slack_Security_Report_small.pdf"
        );
    }

    #[test]
    fn memory_sink_keeps_name_and_bytes() {
        let mut sink = MemorySink::default();
        deliver(&rendered(), &mut sink).unwrap();
        assert_eq!(sink.files[0].0, "Slack_Security_Report_small.pdf");
        assert_eq!(sink.files[0].1, b"%PDF-1.3");
    }

    #[test]
    fn directory_sink_writes_file() {
        let dir = std::env::temp_dir().join(format!("assessment-report-{}", std::process::id()));
        let mut sink = DirectorySink::new(&dir);
        deliver(&rendered(), &mut sink).unwrap();
        let written = &sink.written()[0];
        assert_eq!(fs::read(written).unwrap(), b"%PDF-1.3");
        fs::remove_dir_all(&dir).unwrap();
    }
}
