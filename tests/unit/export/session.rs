use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::*;

/// Replays scripted results and counts calls.
#[derive(Default)]
struct ScriptedExporter {
    results: RefCell<VecDeque<QrStyleResult<Option<u32>>>>,
    calls: Cell<usize>,
}

impl ScriptedExporter {
    fn new(results: Vec<QrStyleResult<Option<u32>>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            calls: Cell::new(0),
        }
    }
}

impl Exporter for ScriptedExporter {
    type Artifact = u32;

    fn export(&self, _matrix: &ModuleMatrix, _config: &SymbolConfig) -> QrStyleResult<Option<u32>> {
        self.calls.set(self.calls.get() + 1);
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

fn inputs() -> (ModuleMatrix, SymbolConfig) {
    (
        ModuleMatrix::from_rows(&["#"]).unwrap(),
        SymbolConfig::default(),
    )
}

#[test]
fn starts_idle() {
    let session = RenderSession::new(ScriptedExporter::default());
    assert!(session.state().is_idle());
    assert_eq!(session.artifact(), None);
}

#[test]
fn success_then_empty_returns_to_idle() {
    let (m, cfg) = inputs();
    let mut session = RenderSession::new(ScriptedExporter::new(vec![Ok(Some(7)), Ok(None)]));

    assert_eq!(session.update(&m, &cfg).unwrap(), &RenderState::Rendered(7));
    assert_eq!(session.artifact(), Some(&7));

    assert!(session.update(&m, &cfg).unwrap().is_idle());
    assert_eq!(session.exporter().calls.get(), 2);
}

#[test]
fn failure_keeps_previous_output() {
    let (m, cfg) = inputs();
    let mut session = RenderSession::new(ScriptedExporter::new(vec![
        Ok(Some(1)),
        Err(QrStyleError::validation("boom")),
    ]));
    session.update(&m, &cfg).unwrap();

    let err = session.update(&m, &cfg).unwrap_err();
    assert!(matches!(err, QrStyleError::Render(_)));
    assert!(err.to_string().starts_with("rendering failed"));
    assert!(err.to_string().contains("boom"));
    assert_eq!(session.artifact(), Some(&1));
}

#[test]
fn render_failure_is_not_wrapped_twice() {
    let (m, cfg) = inputs();
    let mut session = RenderSession::new(ScriptedExporter::new(vec![Err(
        QrStyleError::render("pixmap byte length mismatch"),
    )]));

    let err = session.update(&m, &cfg).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rendering failed: pixmap byte length mismatch"
    );
    assert!(session.state().is_idle());
}

#[test]
fn clear_drops_artifact() {
    let (m, cfg) = inputs();
    let mut session = RenderSession::new(ScriptedExporter::new(vec![Ok(Some(3))]));
    session.update(&m, &cfg).unwrap();
    session.clear();
    assert!(session.state().is_idle());
}

#[test]
fn vector_session_renders_document() {
    let m = ModuleMatrix::from_rows(&["#.#", ".#.", "#.#"]).unwrap();
    let mut session = RenderSession::new(VectorExporter);
    session.update(&m, &SymbolConfig::default()).unwrap();
    let doc = session.artifact().unwrap();
    assert!(doc.as_str().starts_with("<svg"));
    assert_eq!(doc.as_str().matches("<rect").count(), 1 + 5);

    session.update(&ModuleMatrix::empty(), &SymbolConfig::default()).unwrap();
    assert!(session.state().is_idle());
}

#[test]
fn raster_session_rejects_bad_config_without_losing_output() {
    let m = ModuleMatrix::from_rows(&["##", "##"]).unwrap();
    let mut session = RenderSession::new(RasterExporter::default());
    session.update(&m, &SymbolConfig::default()).unwrap();

    let bad = SymbolConfig {
        margin_modules: 50,
        ..SymbolConfig::default()
    };
    assert!(session.update(&m, &bad).is_err());
    let img = session.artifact().unwrap();
    assert_eq!((img.width, img.height), (300, 300));
}
