mod cache;
mod record;

pub use cache::{
    CacheCounters, ExtractedDocument, ExtractionCache, STAGING_FILE_NAME, StructureExtractor,
};
pub use record::{ExtractionRecord, RECORD_FILE_NAME, RawElement, load_record};
