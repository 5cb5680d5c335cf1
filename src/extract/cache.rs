use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use lru::LruCache;

use crate::config::CacheConfig;
use crate::error::{CoreError, CoreResult};
use crate::fingerprint::Fingerprint;

use super::record::{ExtractionRecord, RECORD_FILE_NAME, load_record};

/// Fixed staging location (relative to the cache root) where upload bytes
/// are written for the extraction collaborator to consume.
pub const STAGING_FILE_NAME: &str = "input.pdf";

const STAGING_DIR_NAME: &str = "staging";
const DEFAULT_RECORD_ENTRIES: usize = 16;

/// Extraction collaborator: reads the staged document at `input_pdf` and
/// writes `structuredData.json` plus any asset renditions into `output_dir`.
pub trait StructureExtractor: Send {
    fn extract(&self, input_pdf: &Path, output_dir: &Path) -> CoreResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub extractions: u64,
}

/// A cached (or freshly extracted) structured layout for one document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub fingerprint: Fingerprint,
    pub record: Arc<ExtractionRecord>,
    /// Directory holding the record and the collaborator's asset files;
    /// `RawElement::file_paths` are relative to it.
    pub asset_dir: PathBuf,
    pub from_cache: bool,
}

/// Content-addressed memoization of the extraction collaborator.
///
/// Entries live at `root/<fingerprint>/` and are published atomically via a
/// same-filesystem rename, so a crash mid-extraction never leaves a readable
/// half-entry. Published entries are read-only and never invalidated. A small
/// parsed-record LRU fronts the disk so repeat hits skip JSON parsing.
pub struct ExtractionCache {
    root: PathBuf,
    records: LruCache<Fingerprint, Arc<ExtractionRecord>>,
    counters: CacheCounters,
}

impl ExtractionCache {
    pub fn new(root: impl Into<PathBuf>, record_entries: usize) -> Self {
        let record_entries = record_entries.max(1);
        Self {
            root: root.into(),
            records: LruCache::new(
                NonZeroUsize::new(record_entries).expect("record entries is non-zero"),
            ),
            counters: CacheCounters::default(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.root_dir.clone(), config.record_entries)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    pub fn entry_dir(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.as_str())
    }

    fn staging_path(&self) -> PathBuf {
        self.root.join(STAGING_DIR_NAME).join(STAGING_FILE_NAME)
    }

    /// Returns the structured layout for `bytes`, extracting at most once per
    /// distinct content fingerprint for the lifetime of the cache directory.
    ///
    /// A collaborator failure (or a malformed record) publishes nothing; the
    /// next call with the same bytes attempts extraction again.
    pub fn get_or_extract(
        &mut self,
        bytes: &[u8],
        extractor: &dyn StructureExtractor,
    ) -> CoreResult<ExtractedDocument> {
        let fingerprint = Fingerprint::of_bytes(bytes);
        let entry_dir = self.entry_dir(&fingerprint);
        let record_path = entry_dir.join(RECORD_FILE_NAME);

        if record_path.is_file() {
            self.counters.hits += 1;
            debug!("extraction cache hit for {fingerprint}");
            let record = self.load_published(&fingerprint, &record_path)?;
            return Ok(ExtractedDocument {
                fingerprint,
                record,
                asset_dir: entry_dir,
                from_cache: true,
            });
        }

        self.counters.misses += 1;
        info!("extraction cache miss for {fingerprint}, invoking extraction collaborator");
        self.extract_and_publish(bytes, &entry_dir, extractor)?;
        self.counters.extractions += 1;

        let record = self.load_published(&fingerprint, &record_path)?;
        Ok(ExtractedDocument {
            fingerprint,
            record,
            asset_dir: entry_dir,
            from_cache: false,
        })
    }

    fn load_published(
        &mut self,
        fingerprint: &Fingerprint,
        record_path: &Path,
    ) -> CoreResult<Arc<ExtractionRecord>> {
        if let Some(record) = self.records.get(fingerprint) {
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(load_record(record_path)?);
        self.records.put(fingerprint.clone(), Arc::clone(&record));
        Ok(record)
    }

    fn extract_and_publish(
        &self,
        bytes: &[u8],
        entry_dir: &Path,
        extractor: &dyn StructureExtractor,
    ) -> CoreResult<()> {
        let staging = self.staging_path();
        let staging_dir = staging
            .parent()
            .expect("staging path always has a parent directory");
        fs::create_dir_all(staging_dir).map_err(|source| {
            CoreError::io_with_context(
                source,
                format!("failed to create staging dir {}", staging_dir.display()),
            )
        })?;
        fs::write(&staging, bytes).map_err(|source| {
            CoreError::io_with_context(
                source,
                format!("failed to stage upload at {}", staging.display()),
            )
        })?;

        // Work dir lives under the cache root so the publish rename stays on
        // one filesystem. It is removed on drop if anything below fails.
        let workdir = tempfile::Builder::new()
            .prefix(".extract-")
            .tempdir_in(&self.root)
            .map_err(|source| {
                CoreError::io_with_context(source, "failed to create extraction work dir")
            })?;

        extractor.extract(&staging, workdir.path())?;

        let produced = workdir.path().join(RECORD_FILE_NAME);
        if !produced.is_file() {
            return Err(CoreError::extraction(format!(
                "collaborator left no {RECORD_FILE_NAME} in its output directory"
            )));
        }
        // Parse before publishing; a broken record must never become visible.
        load_record(&produced)?;

        let staged = workdir.into_path();
        match fs::rename(&staged, entry_dir) {
            Ok(()) => Ok(()),
            Err(source) => {
                let _ = fs::remove_dir_all(&staged);
                // Lost the publish race: the entry is content-addressed, so
                // whatever is already there is equivalent to what we built.
                if entry_dir.join(RECORD_FILE_NAME).is_file() {
                    return Ok(());
                }
                Err(CoreError::io_with_context(
                    source,
                    format!("failed to publish cache entry {}", entry_dir.display()),
                ))
            }
        }
    }
}
