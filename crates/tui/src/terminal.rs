use vantage_core::MeasurementProvider;
use vantage_protocol::{Measurement, TouchSupport};

use crate::options::CellSize;

/// Measures the terminal window, scaling cells to pixels.
///
/// Terminals never report touch. The core count comes from the host once,
/// at construction.
pub struct TerminalProvider {
    cell: CellSize,
    logical_cores: Option<u32>,
}

impl TerminalProvider {
    pub fn new(cell: CellSize) -> Self {
        let logical_cores = std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok());
        Self {
            cell,
            logical_cores,
        }
    }
}

impl MeasurementProvider for TerminalProvider {
    fn measure(&self) -> Measurement {
        match crossterm::terminal::size() {
            Ok((cols, rows)) => {
                let (width, height) = to_pixels(cols, rows, self.cell);
                Measurement::new(width, height)
                    .with_touch(TouchSupport::NONE)
                    .with_logical_cores(self.logical_cores)
            }
            Err(e) => {
                tracing::debug!("terminal size unavailable: {e}");
                Measurement::FALLBACK
            }
        }
    }
}

pub fn to_pixels(cols: u16, rows: u16, cell: CellSize) -> (u32, u32) {
    (
        u32::from(cols).saturating_mul(cell.width),
        u32::from(rows).saturating_mul(cell.height),
    )
}
