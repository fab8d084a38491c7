//! Venue-grouped orchestration over the backend chain.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use specsheet_core::config_file;
use specsheet_core::{ContentSummary, ExtractedContent, FileRef};
use specsheet_parsing::{PipelineConfig, PipelineConfigBuilder, clean_cell, clean_text};

use crate::IngestError;
use crate::chain::{BackendChain, panic_message};

/// Why a file reference was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotDownloaded,
    MissingPath,
    UnsupportedFormat,
}

/// What happened to one input file reference.
#[derive(Debug)]
pub enum FileOutcome {
    Processed(ExtractedContent),
    Skipped { reason: SkipReason },
    Failed { path: PathBuf, error: IngestError },
}

impl FileOutcome {
    pub fn content(&self) -> Option<&ExtractedContent> {
        match self {
            FileOutcome::Processed(content) => Some(content),
            _ => None,
        }
    }

    pub fn into_content(self) -> Option<ExtractedContent> {
        match self {
            FileOutcome::Processed(content) => Some(content),
            _ => None,
        }
    }
}

/// Processes files through a [`BackendChain`] and normalizes the results.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    chain: BackendChain,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Default configuration and the standard backend chain.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let chain = BackendChain::standard(&config);
        Self { config, chain }
    }

    /// Use a custom chain, e.g. a reordered or reduced set of backends.
    pub fn with_chain(config: PipelineConfig, chain: BackendChain) -> Self {
        Self { config, chain }
    }

    /// Build from the cascaded on-disk config files.
    pub fn from_config_files() -> Result<Self, IngestError> {
        let file = config_file::load_config();
        let config = PipelineConfigBuilder::from_config_file(&file).build()?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn chain(&self) -> &BackendChain {
        &self.chain
    }

    /// Process every group, keeping only successfully extracted files.
    ///
    /// Every input group appears in the output, possibly with an empty list.
    pub fn process_many(
        &self,
        groups: &BTreeMap<String, Vec<FileRef>>,
    ) -> BTreeMap<String, Vec<ExtractedContent>> {
        self.process_many_detailed(groups)
            .into_iter()
            .map(|(venue, outcomes)| {
                let contents = outcomes
                    .into_iter()
                    .filter_map(FileOutcome::into_content)
                    .collect();
                (venue, contents)
            })
            .collect()
    }

    /// Like [`process_many`](Self::process_many), but with one outcome per
    /// input reference, in input order.
    pub fn process_many_detailed(
        &self,
        groups: &BTreeMap<String, Vec<FileRef>>,
    ) -> BTreeMap<String, Vec<FileOutcome>> {
        let mut results = BTreeMap::new();
        for (venue, refs) in groups {
            let outcomes: Vec<FileOutcome> =
                refs.iter().map(|file| self.process_ref(file, venue)).collect();
            let processed = outcomes.iter().filter(|o| o.content().is_some()).count();
            info!(venue = %venue, files = refs.len(), processed, "processed venue");
            results.insert(venue.clone(), outcomes);
        }
        results
    }

    fn process_ref(&self, file: &FileRef, venue: &str) -> FileOutcome {
        if !file.downloaded {
            debug!(venue, url = ?file.url, "skipping file that was not downloaded");
            return FileOutcome::Skipped {
                reason: SkipReason::NotDownloaded,
            };
        }
        let Some(path) = file
            .local_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        else {
            debug!(venue, url = ?file.url, "skipping file without a local path");
            return FileOutcome::Skipped {
                reason: SkipReason::MissingPath,
            };
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.process_file(path, venue))) {
            Ok(Ok(content)) => FileOutcome::Processed(content),
            Ok(Err(IngestError::UnsupportedFormat(_))) => {
                debug!(venue, path = %path.display(), "skipping unsupported file format");
                FileOutcome::Skipped {
                    reason: SkipReason::UnsupportedFormat,
                }
            }
            Ok(Err(e)) => {
                // NotFound and NoContent were already logged by process_file
                if !matches!(e, IngestError::NotFound(_) | IngestError::NoContent(_)) {
                    error!(venue, path = %path.display(), error = %e, "failed to process file");
                }
                FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error: e,
                }
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(venue, path = %path.display(), panic = %msg, "processing panicked");
                FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error: IngestError::Panicked(msg),
                }
            }
        }
    }

    /// Extract and normalize a single file, tagging it with `venue`.
    pub fn process_file(&self, path: &Path, venue: &str) -> Result<ExtractedContent, IngestError> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if !self.config.supports_extension(ext) {
                return Err(IngestError::UnsupportedFormat(path.to_path_buf()));
            }
        }

        if !path.exists() {
            error!(path = %path.display(), "PDF file not found");
            return Err(IngestError::NotFound(path.to_path_buf()));
        }

        let Some(mut content) = self.chain.extract(path) else {
            warn!(path = %path.display(), "no content extracted from PDF");
            return Err(IngestError::NoContent(path.to_path_buf()));
        };

        content.venue = venue.to_string();
        content.file_path = path.to_path_buf();
        post_process(&mut content);

        info!(
            path = %path.display(),
            venue,
            pages = content.pages.len(),
            tables = content.tables.len(),
            "extracted PDF"
        );
        Ok(content)
    }

    pub fn summarize(&self, content: &ExtractedContent) -> ContentSummary {
        crate::summary::summarize(content, &self.config)
    }
}

/// Clean text, pages and cells; drop blank rows and tables left empty.
pub fn post_process(content: &mut ExtractedContent) {
    content.text = clean_text(&content.text);
    for page in &mut content.pages {
        *page = clean_text(page);
    }

    for table in &mut content.tables {
        for row in table.iter_mut() {
            for cell in row.iter_mut() {
                *cell = clean_cell(cell);
            }
        }
        table.retain(|row| row.iter().any(|cell| !cell.is_empty()));
    }
    content.tables.retain(|table| !table.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use crate::chain::tests::{Behavior, FakeBackend};
    use specsheet_core::Metadata;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        path
    }

    fn pipeline_with(backends: Vec<Box<dyn specsheet_core::PdfBackend>>) -> Pipeline {
        let config = PipelineConfig::default();
        let chain = BackendChain::new(backends, config.min_text_chars());
        Pipeline::with_chain(config, chain)
    }

    fn long_text() -> String {
        "The venue provides a stage of twelve by eight metres with wing space. ".repeat(3)
    }

    // ── post_process ──

    #[test]
    fn test_post_process_drops_all_blank_table() {
        let mut content = ExtractedContent::from_pages(
            "a.pdf",
            vec!["x".into()],
            vec![
                vec![vec!["  ".into(), "•".into()], vec![" - ".into(), "".into()]],
                vec![
                    vec!["• Equipment".into(), "Qty ".into()],
                    vec![" ".into(), "".into()],
                    vec!["Mixer".into(), "1".into()],
                ],
            ],
            Metadata::new(),
        );
        post_process(&mut content);
        assert_eq!(
            content.tables,
            vec![vec![
                vec!["Equipment".to_string(), "Qty".to_string()],
                vec!["Mixer".to_string(), "1".to_string()],
            ]]
        );
    }

    #[test]
    fn test_post_process_cleans_text_and_pages() {
        let mut content = ExtractedContent::from_pages(
            "a.pdf",
            vec!["INTRO  text\n\n\n\nPage 1 of 2".into(), "42".into()],
            vec![],
            Metadata::new(),
        );
        post_process(&mut content);
        assert_eq!(content.pages, vec!["1NTR0 text".to_string(), String::new()]);
        assert!(!content.text.contains("  "));
        assert!(!content.text.contains("Page 1 of 2"));
    }

    // ── process_file ──

    #[test]
    fn test_process_file_attaches_venue_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "rider.PDF");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);

        let content = pipeline.process_file(&path, "Arena").unwrap();
        assert_eq!(content.venue, "Arena");
        assert_eq!(content.file_path, path);
        assert!(content.text.contains("wing space"));
        assert!(!pipeline.summarize(&content).has_equipment_keywords);
    }

    #[test]
    fn test_process_file_missing() {
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);
        let err = pipeline
            .process_file(Path::new("/nonexistent/rider.pdf"), "Arena")
            .unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_process_file_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "rider.docx");
        let backend = FakeBackend::text("a", &long_text());
        let calls = backend.calls.clone();
        let pipeline = pipeline_with(vec![Box::new(backend)]);

        let err = pipeline.process_file(&path, "Arena").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_process_file_without_extension_is_attempted() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "rider");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);
        assert!(pipeline.process_file(&path, "Arena").is_ok());
    }

    #[test]
    fn test_process_file_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "scan.pdf");
        let pipeline = pipeline_with(vec![
            Box::new(FakeBackend::text("a", "tiny")),
            Box::new(FakeBackend::new("b", Behavior::Fail)),
        ]);
        let err = pipeline.process_file(&path, "Arena").unwrap_err();
        assert!(matches!(err, IngestError::NoContent(_)));
    }

    // ── process_many ──

    #[test]
    fn test_process_many_three_refs() {
        let dir = tempfile::tempdir().unwrap();
        let good = touch(dir.path(), "good.pdf");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);

        let groups = BTreeMap::from([(
            "Town Hall".to_string(),
            vec![
                FileRef::local(&good),
                FileRef {
                    downloaded: false,
                    local_path: None,
                    url: Some("https://example.org/x.pdf".into()),
                },
                FileRef::local(dir.path().join("missing.pdf")),
            ],
        )]);

        let results = pipeline.process_many(&groups);
        assert_eq!(results.len(), 1);
        let hall = &results["Town Hall"];
        assert_eq!(hall.len(), 1);
        assert_eq!(hall[0].file_path, good);
        assert_eq!(hall[0].venue, "Town Hall");
    }

    #[test]
    fn test_process_many_keeps_empty_groups_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = touch(dir.path(), "first.pdf");
        let second = touch(dir.path(), "second.pdf");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);

        let groups = BTreeMap::from([
            ("Arena".to_string(), vec![]),
            (
                "Club".to_string(),
                vec![FileRef::local(&first), FileRef::local(&second)],
            ),
        ]);
        let results = pipeline.process_many(&groups);
        assert!(results["Arena"].is_empty());
        let paths: Vec<&Path> = results["Club"].iter().map(|c| c.file_path.as_path()).collect();
        assert_eq!(paths, vec![first.as_path(), second.as_path()]);
    }

    #[test]
    fn test_process_many_survives_panicking_backends() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "weird.pdf");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::new("a", Behavior::Panic))]);

        let groups = BTreeMap::from([("Arena".to_string(), vec![FileRef::local(&path)])]);
        let results = pipeline.process_many(&groups);
        assert!(results["Arena"].is_empty());
    }

    #[test]
    fn test_process_many_detailed_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let good = touch(dir.path(), "good.pdf");
        let sheet = touch(dir.path(), "budget.xlsx");
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);

        let groups = BTreeMap::from([(
            "Theatre".to_string(),
            vec![
                FileRef::local(&good),
                FileRef::default(),
                FileRef {
                    downloaded: true,
                    local_path: None,
                    url: None,
                },
                FileRef::local(&sheet),
                FileRef::local(dir.path().join("gone.pdf")),
            ],
        )]);

        let outcomes = pipeline.process_many_detailed(&groups).remove("Theatre").unwrap();
        assert_eq!(outcomes.len(), 5);
        assert!(matches!(outcomes[0], FileOutcome::Processed(_)));
        assert!(matches!(
            outcomes[1],
            FileOutcome::Skipped {
                reason: SkipReason::NotDownloaded
            }
        ));
        assert!(matches!(
            outcomes[2],
            FileOutcome::Skipped {
                reason: SkipReason::MissingPath
            }
        ));
        assert!(matches!(
            outcomes[3],
            FileOutcome::Skipped {
                reason: SkipReason::UnsupportedFormat
            }
        ));
        match &outcomes[4] {
            FileOutcome::Failed { path, error } => {
                assert!(path.ends_with("gone.pdf"));
                assert!(matches!(error, IngestError::NotFound(_)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_local_path_is_missing() {
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &long_text()))]);
        let groups = BTreeMap::from([(
            "Arena".to_string(),
            vec![FileRef {
                downloaded: true,
                local_path: Some(PathBuf::new()),
                url: None,
            }],
        )]);

        let outcomes = pipeline.process_many_detailed(&groups).remove("Arena").unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0],
            FileOutcome::Skipped {
                reason: SkipReason::MissingPath
            }
        ));
    }

    /// Panics outside the guarded `extract` call, when the chain reads its name.
    struct NamelessBackend;

    impl specsheet_core::PdfBackend for NamelessBackend {
        fn name(&self) -> &'static str {
            panic!("backend has no name")
        }

        fn extract(
            &self,
            _path: &Path,
        ) -> Result<ExtractedContent, specsheet_core::BackendError> {
            Err(specsheet_core::BackendError::Unavailable("nameless"))
        }
    }

    #[test]
    fn test_panic_outside_backend_is_reported_as_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "rider.pdf");
        let pipeline = pipeline_with(vec![Box::new(NamelessBackend)]);

        let groups = BTreeMap::from([("Arena".to_string(), vec![FileRef::local(&path)])]);
        let outcomes = pipeline.process_many_detailed(&groups).remove("Arena").unwrap();
        match &outcomes[0] {
            FileOutcome::Failed { path: failed, error } => {
                assert_eq!(failed, &path);
                match error {
                    IngestError::Panicked(msg) => assert_eq!(msg, "backend has no name"),
                    other => panic!("expected a panic error, got {:?}", other),
                }
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    // ── summarize ──

    #[test]
    fn test_summarize_flags_microphone() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "rider.pdf");
        let text = format!("{} Eight wireless microphone channels.", long_text());
        let pipeline = pipeline_with(vec![Box::new(FakeBackend::text("a", &text))]);

        let content = pipeline.process_file(&path, "Arena").unwrap();
        let summary = pipeline.summarize(&content);
        assert!(summary.has_equipment_keywords);
        assert_eq!(summary.total_pages, 1);
        assert_eq!(summary.venue, "Arena");
    }
}
