use crate::export::pipeline::{RasterOpts, export_raster, export_vector};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::render::raster::RasterImage;
use crate::render::vector::VectorDocument;
use crate::symbol::config::SymbolConfig;
use crate::symbol::matrix::ModuleMatrix;

/// One output backend as seen by a [`RenderSession`].
pub trait Exporter {
    type Artifact;

    /// Render a fresh artifact, or `Ok(None)` when there is nothing to render.
    fn export(
        &self,
        matrix: &ModuleMatrix,
        config: &SymbolConfig,
    ) -> QrStyleResult<Option<Self::Artifact>>;
}

/// Bitmap exporter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RasterExporter {
    pub opts: RasterOpts,
}

impl Exporter for RasterExporter {
    type Artifact = RasterImage;

    fn export(
        &self,
        matrix: &ModuleMatrix,
        config: &SymbolConfig,
    ) -> QrStyleResult<Option<RasterImage>> {
        export_raster(matrix, config, self.opts)
    }
}

/// SVG exporter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VectorExporter;

impl Exporter for VectorExporter {
    type Artifact = VectorDocument;

    fn export(
        &self,
        matrix: &ModuleMatrix,
        config: &SymbolConfig,
    ) -> QrStyleResult<Option<VectorDocument>> {
        export_vector(matrix, config)
    }
}

/// Whether a session currently holds output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderState<A> {
    /// No valid content has been rendered.
    #[default]
    Idle,
    /// The last successful output.
    Rendered(A),
}

impl<A> RenderState<A> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Keeps the latest artifact of one backend across updates.
///
/// Every update reruns the full pipeline. Empty content returns the session to idle; a failed
/// update leaves the previous state untouched.
pub struct RenderSession<E: Exporter> {
    exporter: E,
    state: RenderState<E::Artifact>,
}

impl<E: Exporter> RenderSession<E> {
    pub fn new(exporter: E) -> Self {
        Self {
            exporter,
            state: RenderState::Idle,
        }
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Re-render from scratch.
    pub fn update(
        &mut self,
        matrix: &ModuleMatrix,
        config: &SymbolConfig,
    ) -> QrStyleResult<&RenderState<E::Artifact>> {
        match self.exporter.export(matrix, config) {
            Ok(Some(artifact)) => self.state = RenderState::Rendered(artifact),
            Ok(None) => self.state = RenderState::Idle,
            Err(err) => {
                tracing::warn!(error = %err, "render update failed, keeping previous output");
                return Err(match err {
                    QrStyleError::Render(_) => err,
                    other => QrStyleError::render(other.to_string()),
                });
            }
        }
        Ok(&self.state)
    }

    pub fn state(&self) -> &RenderState<E::Artifact> {
        &self.state
    }

    pub fn artifact(&self) -> Option<&E::Artifact> {
        match &self.state {
            RenderState::Rendered(a) => Some(a),
            RenderState::Idle => None,
        }
    }

    pub fn clear(&mut self) {
        self.state = RenderState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
