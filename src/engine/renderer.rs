//! Presentation boundary for the engine.

use super::CellState;

/// Capability set the engine requires from a presentation layer.
///
/// The engine never draws anything itself; it reports board geometry and
/// per-cell state changes through this trait and leaves pixels to the
/// implementor. Inbound user toggles travel the other way, through
/// [`super::Simulation::on_cell_activated`].
pub trait Renderer {
    /// The board was (re)created with the given dimensions.
    fn board_resized(&mut self, cols: usize, rows: usize);

    /// Draw one cell in the given state.
    fn render_cell(&mut self, x: usize, y: usize, state: CellState);
}

/// Renderer that ignores every call, for headless runs and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn board_resized(&mut self, _cols: usize, _rows: usize) {}

    fn render_cell(&mut self, _x: usize, _y: usize, _state: CellState) {}
}
