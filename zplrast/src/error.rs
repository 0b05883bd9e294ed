use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The document contained no `^XA…^XZ` section and no trailing
    /// elements; there is nothing to render.
    #[error("document produced no labels")]
    EmptyDocument,

    #[error(transparent)]
    Draw(#[from] zplrast_render::DrawError),
}
