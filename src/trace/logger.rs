use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{state::state_model::Screenshot, trace::trace::StepRecord};

/// Sink for the decision trail. Recording never influences control flow, so
/// implementations swallow their own failures.
pub trait StepRecorder {
    fn record(&self, record: StepRecord, screenshot: &Screenshot);
}

/// Writes one JSON line per step and stores each screenshot, with its
/// analysis block, in an artifacts directory beside the trace.
///
/// The trace file is truncated on open: one file holds exactly one run.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
    artifacts_dir: Option<PathBuf>,
}

impl TraceLogger {
    /// Without an explicit `artifacts_dir`, screenshots go to
    /// `<trace stem>_artifacts/` next to the trace file.
    pub fn new(path: &Path, artifacts_dir: Option<&Path>) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path);

        let file = match file {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                tracing::warn!("could not open trace file '{}': {}", path.display(), e);
                None
            }
        };

        let dir = artifacts_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_artifacts_dir(path));
        let artifacts_dir = match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                tracing::warn!("could not create artifacts dir '{}': {}", dir.display(), e);
                None
            }
        };

        Self {
            file,
            artifacts_dir,
        }
    }

    pub fn artifacts_dir(&self) -> Option<&Path> {
        self.artifacts_dir.as_deref()
    }

    fn save_artifacts(&self, record: &StepRecord, screenshot: &Screenshot) -> Option<PathBuf> {
        let dir = self.artifacts_dir.as_ref()?;

        let analysis = dir.join(format!("step_{}.txt", record.step));
        if let Err(e) = std::fs::write(&analysis, record.render_text()) {
            tracing::warn!("failed to write analysis '{}': {}", analysis.display(), e);
        }

        let path = dir.join(format!("step_{}.{}", record.step, screenshot.extension()));
        match std::fs::write(&path, &screenshot.bytes) {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!("failed to write screenshot '{}': {}", path.display(), e);
                None
            }
        }
    }
}

/// `traces/run.jsonl` → `traces/run_artifacts/`
pub fn default_artifacts_dir(trace_path: &Path) -> PathBuf {
    let stem = trace_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    trace_path.with_file_name(format!("{}_artifacts", stem))
}

impl StepRecorder for TraceLogger {
    fn record(&self, mut record: StepRecord, screenshot: &Screenshot) {
        if let Some(path) = self.save_artifacts(&record, screenshot) {
            record = record.with_screenshot_path(path.display());
        }

        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(&record) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("failed to serialize step record: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("trace logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            tracing::warn!("failed to write step record: {}", e);
        }
    }
}

/// Keeps the trail in memory; used by tests and by the CLI summary.
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<StepRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StepRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StepRecorder for MemoryRecorder {
    fn record(&self, record: StepRecord, _screenshot: &Screenshot) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Fan a record out to several sinks.
pub struct TeeRecorder<'a> {
    sinks: Vec<&'a dyn StepRecorder>,
}

impl<'a> TeeRecorder<'a> {
    pub fn new(sinks: Vec<&'a dyn StepRecorder>) -> Self {
        Self { sinks }
    }
}

impl StepRecorder for TeeRecorder<'_> {
    fn record(&self, record: StepRecord, screenshot: &Screenshot) {
        for sink in &self.sinks {
            sink.record(record.clone(), screenshot);
        }
    }
}
