use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{PageRaster, PageRenderer, RenderedDocument};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::extract::{RECORD_FILE_NAME, StructureExtractor};
use crate::session::{Session, SessionPhase};

struct FixedRenderer {
    pages: usize,
}

impl PageRenderer for FixedRenderer {
    fn render(&self, _bytes: &[u8], display_width_px: u32) -> CoreResult<RenderedDocument> {
        let height = 792;
        let pages = (0..self.pages)
            .map(|_| PageRaster {
                width: display_width_px,
                height,
                pixels: vec![0u8; 16].into(),
            })
            .collect();
        RenderedDocument::new(pages, vec![(612.0, 792.0); self.pages])
    }
}

struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render(&self, _bytes: &[u8], _display_width_px: u32) -> CoreResult<RenderedDocument> {
        Err(CoreError::configuration("renderer blew up"))
    }
}

#[derive(Default)]
struct CountingExtractor {
    invocations: AtomicUsize,
}

impl StructureExtractor for CountingExtractor {
    fn extract(&self, _input_pdf: &Path, output_dir: &Path) -> CoreResult<()> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        // Five elements on page 0 (so id 3 is selectable), two on page 1.
        let elements: Vec<String> = (0..7)
            .map(|i| {
                let page = if i < 5 { 0 } else { 1 };
                format!(
                    r#"{{ "Page": {page}, "Bounds": [100.0, 200.0, 300.0, 400.0], "Text": "element {i}", "Path": "//Document/P[{i}]" }}"#
                )
            })
            .collect();
        let record = format!(r#"{{ "elements": [{}] }}"#, elements.join(","));
        fs::write(output_dir.join(RECORD_FILE_NAME), record)?;
        Ok(())
    }
}

struct FailingExtractor;

impl StructureExtractor for FailingExtractor {
    fn extract(&self, _input_pdf: &Path, _output_dir: &Path) -> CoreResult<()> {
        Err(CoreError::extraction("credentials rejected"))
    }
}

fn session_with_temp_cache() -> (Session, tempfile::TempDir) {
    let root = tempfile::tempdir().expect("temp dir should be created");
    let mut config = Config::default();
    config.cache.root_dir = root.path().join("extractions");
    (Session::new(config), root)
}

#[test]
fn upload_select_navigate_reupload_scenario() {
    let (mut session, _root) = session_with_temp_cache();
    let renderer = FixedRenderer { pages: 2 };
    let extractor = CountingExtractor::default();
    let document_a = b"%PDF-1.4 document A";

    // Upload: extraction runs once, the session becomes ready on page 0.
    session
        .open_document(document_a, &renderer, &extractor)
        .expect("upload should succeed");
    assert_eq!(extractor.invocations.load(Ordering::SeqCst), 1);
    assert_eq!(session.state().phase(), SessionPhase::DocumentReady);
    assert_eq!(session.state().current_page(), 0);
    assert_eq!(session.cache_counters().extractions, 1);

    // Select element 3 on page 0.
    session
        .state_mut()
        .select_element(3)
        .expect("element 3 should exist");
    assert_eq!(session.state().active_element(), Some(3));
    session.state_mut().set_notes(3, "key equation");

    // Selection does not survive navigation, in either direction.
    session
        .state_mut()
        .navigate(1)
        .expect("navigate should succeed");
    assert_eq!(session.state().current_page(), 1);
    assert_eq!(session.state().active_element(), None);
    session
        .state_mut()
        .navigate(-1)
        .expect("navigate should succeed");
    assert_eq!(session.state().active_element(), None);

    // Re-upload the same bytes: pure cache hit, fresh session state.
    session
        .open_document(document_a, &renderer, &extractor)
        .expect("re-upload should succeed");
    assert_eq!(extractor.invocations.load(Ordering::SeqCst), 1);
    assert_eq!(session.cache_counters().hits, 1);
    assert_eq!(session.state().current_page(), 0);
    assert!(session.state().annotation(3).is_none());
    assert!(session.state_mut().bucket(3).notes.is_empty());
}

#[test]
fn overlay_rects_for_current_page_map_into_raster_space() {
    let (mut session, _root) = session_with_temp_cache();
    session
        .open_document(
            b"overlay doc",
            &FixedRenderer { pages: 2 },
            &CountingExtractor::default(),
        )
        .expect("upload should succeed");

    let overlays = session
        .overlay_rects_for_current_page()
        .expect("page 0 should produce overlays");
    assert_eq!(overlays.len(), 5);
    assert_eq!(overlays[0].rect.x, 100.0);
    assert_eq!(overlays[0].rect.y, 392.0);

    session
        .state_mut()
        .navigate(1)
        .expect("navigate should succeed");
    let overlays = session
        .overlay_rects_for_current_page()
        .expect("page 1 should produce overlays");
    assert_eq!(overlays.len(), 2);
}

#[test]
fn failed_extraction_aborts_the_upload_flow() {
    let (mut session, _root) = session_with_temp_cache();

    let err = session
        .open_document(b"doomed doc", &FixedRenderer { pages: 1 }, &FailingExtractor)
        .expect_err("extraction failure should abort the upload");
    assert!(matches!(err, CoreError::Extraction { .. }));
    assert_eq!(session.state().phase(), SessionPhase::NoDocument);
    assert!(session.state().document().is_none());

    // The same bytes extract fine once the collaborator recovers.
    session
        .open_document(
            b"doomed doc",
            &FixedRenderer { pages: 1 },
            &CountingExtractor::default(),
        )
        .expect("recovered upload should succeed");
    assert_eq!(session.state().phase(), SessionPhase::DocumentReady);
}

#[test]
fn failed_render_aborts_even_after_successful_extraction() {
    let (mut session, _root) = session_with_temp_cache();
    let extractor = CountingExtractor::default();

    let err = session
        .open_document(b"render fail doc", &FailingRenderer, &extractor)
        .expect_err("render failure should abort the upload");
    assert!(matches!(err, CoreError::Configuration(_)));
    assert_eq!(session.state().phase(), SessionPhase::NoDocument);

    // The extraction was published before rendering failed, so the retry is
    // a cache hit.
    session
        .open_document(b"render fail doc", &FixedRenderer { pages: 1 }, &extractor)
        .expect("retry with working renderer should succeed");
    assert_eq!(extractor.invocations.load(Ordering::SeqCst), 1);
    assert_eq!(session.cache_counters().hits, 1);
}
