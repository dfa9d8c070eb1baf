pub mod chart;
pub mod error;
pub mod sheet;

pub use chart::{render_bell_curve, ChartOptions};
pub use error::ExportError;
pub use sheet::{build_sheet, export_scorecard, SheetGrid, SheetLayout};
