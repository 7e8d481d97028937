/*!
# dotalign rendering

SVG export for alignment scoring matrices and dot plots.

- **Scoring heatmap**: every cell coloured on a cool-warm ramp with its score
  printed inside, sequence symbols along the axes, and each co-optimal path
  drawn through the cells it visits.
- **Dot plot**: matching cells filled, main-direction runs in black and
  reverse-direction runs in green.
*/

pub mod palette;
pub mod vector_export;

pub use vector_export::{ExportConfig, VectorExporter};
