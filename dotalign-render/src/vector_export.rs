/*!
# Vector Export

SVG export of scoring-matrix heatmaps with optimal-path overlays, and of dot
plots with their diagonal runs. Documents are assembled as text, element by
element, so identical inputs produce identical bytes whenever the timestamped
footer is turned off.
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dotalign_core::align::{Path as AlignmentPath, ScoringMatrix};
use dotalign_core::dot::{DiagonalRun, Diagonals, MatchMatrix};
use dotalign_core::MatrixCoord;

use crate::palette::{coolwarm, normalize, viridis_samples};

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Edge length of one matrix cell in pixels
    pub cell_size: f32,
    pub font_size: u32,
    pub font_family: String,
    pub show_legend: bool,
    pub show_footer: bool,
    /// Print each cell's score inside the heatmap
    pub show_values: bool,
    pub title: Option<String>,
    pub background_color: String,
    pub match_color: String,
    pub main_diagonal_color: String,
    pub reverse_diagonal_color: String,
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            font_size: 12,
            font_family: "Arial, sans-serif".to_string(),
            show_legend: true,
            show_footer: true,
            show_values: true,
            title: None,
            background_color: "#ffffff".to_string(),
            match_color: "#ff0000".to_string(),
            main_diagonal_color: "#000000".to_string(),
            reverse_diagonal_color: "#008000".to_string(),
            provenance_comment: None,
        }
    }
}

/// Pixel layout shared by both plot kinds.
struct Layout {
    rows: usize,
    cols: usize,
    cell: f32,
    left: f32,
    top: f32,
    side_x: f32,
    width: f32,
    height: f32,
}

impl Layout {
    const SIDE_PANEL: f32 = 200.0;
    const FOOTER_SPACE: f32 = 30.0;

    fn new(config: &ExportConfig, rows: usize, cols: usize, side_rows: usize) -> Self {
        let cell = config.cell_size.max(4.0);
        let title_space = if config.title.is_some() {
            config.font_size as f32 + 20.0
        } else {
            0.0
        };
        let left = cell + 30.0;
        let top = title_space + cell + 30.0;
        let grid_w = cols as f32 * cell;
        let grid_h = rows as f32 * cell;
        let side_x = left + grid_w + 30.0;

        let side_h = side_rows as f32 * 22.0 + 30.0;
        let height = top + grid_h.max(side_h) + Self::FOOTER_SPACE + 10.0;
        let width = side_x + Self::SIDE_PANEL;

        Self {
            rows,
            cols,
            cell,
            left,
            top,
            side_x,
            width,
            height,
        }
    }

    fn cell_x(&self, col: usize) -> f32 {
        self.left + col as f32 * self.cell
    }

    fn cell_y(&self, row: usize) -> f32 {
        self.top + row as f32 * self.cell
    }

    fn center(&self, (row, col): MatrixCoord) -> (f32, f32) {
        (
            self.cell_x(col) + self.cell / 2.0,
            self.cell_y(row) + self.cell / 2.0,
        )
    }
}

/// Vector export system
pub struct VectorExporter {
    config: ExportConfig,
}

impl VectorExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Heatmap of `matrix` with every path overlaid, as an SVG document.
    pub fn render_scoring_svg(
        &self,
        matrix: &ScoringMatrix,
        seq_a: &[u8],
        seq_b: &[u8],
        paths: &[AlignmentPath],
    ) -> String {
        let legend_rows = if self.config.show_legend { paths.len() } else { 0 };
        let layout = Layout::new(&self.config, matrix.rows(), matrix.cols(), legend_rows.max(8));
        let mut svg = SvgBuilder::new(&self.config, layout.width, layout.height);

        svg.add_background();
        if let Some(comment) = &self.config.provenance_comment {
            svg.add_comment(comment);
        }
        if let Some(title) = &self.config.title {
            svg.add_title(title);
        }

        let range = matrix.score_range();
        svg.render_heatmap(&layout, matrix, range);
        // Sequence symbols sit on rows/columns 1.., row and column 0 are the empty prefix
        svg.add_axis_labels(&layout, seq_a, seq_b, 1);

        let colors = viridis_samples(paths.len());
        for (path, color) in paths.iter().zip(&colors) {
            let points: Vec<(f32, f32)> = path.forward().map(|c| layout.center(c)).collect();
            svg.add_path_overlay(&points, color, layout.cell);
        }

        svg.add_color_bar(&layout, range);
        if self.config.show_legend && !paths.is_empty() {
            let entries: Vec<LegendEntry> = colors
                .iter()
                .enumerate()
                .map(|(k, color)| LegendEntry::line(format!("Path {}", k + 1), color))
                .collect();
            svg.add_legend(layout.side_x + 60.0, layout.top, &entries);
        }

        if self.config.show_footer {
            svg.add_footer(&format!(
                "scoring matrix {}x{}, {} optimal path(s)",
                matrix.rows(),
                matrix.cols(),
                paths.len()
            ));
        }

        svg.to_svg_string()
    }

    /// Write the scoring heatmap to `path`.
    pub fn export_scoring_svg<P: AsRef<Path>>(
        &self,
        path: P,
        matrix: &ScoringMatrix,
        seq_a: &[u8],
        seq_b: &[u8],
        paths: &[AlignmentPath],
    ) -> Result<()> {
        let document = self.render_scoring_svg(matrix, seq_a, seq_b, paths);
        write_document(path.as_ref(), &document)
    }

    /// Dot plot of `matrix` with main and reverse runs, as an SVG document.
    pub fn render_dot_svg(
        &self,
        matrix: &MatchMatrix,
        diagonals: &Diagonals,
        seq_a: &[u8],
        seq_b: &[u8],
    ) -> String {
        let layout = Layout::new(&self.config, matrix.rows(), matrix.cols(), 3);
        let mut svg = SvgBuilder::new(&self.config, layout.width, layout.height);

        svg.add_background();
        if let Some(comment) = &self.config.provenance_comment {
            svg.add_comment(comment);
        }
        if let Some(title) = &self.config.title {
            svg.add_title(title);
        }

        svg.render_match_grid(&layout, matrix);
        svg.add_axis_labels(&layout, seq_a, seq_b, 0);

        for run in &diagonals.main {
            svg.add_run(&layout, run, &self.config.main_diagonal_color);
        }
        for run in &diagonals.reverse {
            svg.add_run(&layout, run, &self.config.reverse_diagonal_color);
        }

        if self.config.show_legend {
            let entries = [
                LegendEntry::swatch("Match", &self.config.match_color),
                LegendEntry::line("Main Diagonal", &self.config.main_diagonal_color),
                LegendEntry::line("Reverse Diagonal", &self.config.reverse_diagonal_color),
            ];
            svg.add_legend(layout.side_x, layout.top, &entries);
        }

        if self.config.show_footer {
            svg.add_footer(&format!(
                "dot plot {}x{}, {} main / {} reverse run(s)",
                matrix.rows(),
                matrix.cols(),
                diagonals.main.len(),
                diagonals.reverse.len()
            ));
        }

        svg.to_svg_string()
    }

    /// Write the dot plot to `path`.
    pub fn export_dot_svg<P: AsRef<Path>>(
        &self,
        path: P,
        matrix: &MatchMatrix,
        diagonals: &Diagonals,
        seq_a: &[u8],
        seq_b: &[u8],
    ) -> Result<()> {
        let document = self.render_dot_svg(matrix, diagonals, seq_a, seq_b);
        write_document(path.as_ref(), &document)
    }
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create SVG file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(document.as_bytes())?;
    writer.flush()?;

    log::info!("Wrote SVG to {}", path.display());
    Ok(())
}

/// Minimal escaping for text nodes and attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn cell_label(score: f64) -> String {
    if score.fract() == 0.0 {
        // Adding zero folds -0 into 0
        format!("{}", score + 0.0)
    } else {
        format!("{:.2}", score)
    }
}

enum LegendMarker {
    Swatch,
    Line,
}

struct LegendEntry {
    label: String,
    color: String,
    marker: LegendMarker,
}

impl LegendEntry {
    fn swatch(label: impl Into<String>, color: &str) -> Self {
        Self {
            label: label.into(),
            color: color.to_string(),
            marker: LegendMarker::Swatch,
        }
    }

    fn line(label: impl Into<String>, color: &str) -> Self {
        Self {
            label: label.into(),
            color: color.to_string(),
            marker: LegendMarker::Line,
        }
    }
}

struct SvgBuilder {
    config: ExportConfig,
    elements: Vec<String>,
    width: f32,
    height: f32,
    top_comments: Vec<String>,
}

impl SvgBuilder {
    fn new(config: &ExportConfig, width: f32, height: f32) -> Self {
        Self {
            config: config.clone(),
            elements: Vec::new(),
            width,
            height,
            top_comments: Vec::new(),
        }
    }

    fn add_background(&mut self) {
        self.elements.push(format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.config.background_color
        ));
    }

    fn add_comment(&mut self, text: &str) {
        // "--" is not allowed inside XML comments
        self.top_comments.push(text.replace("--", "- -"));
    }

    fn add_title(&mut self, title: &str) {
        let title_y = self.config.font_size as f32 + 10.0;
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle" font-weight="bold">{}</text>"#,
            self.width / 2.0,
            title_y,
            self.config.font_family,
            self.config.font_size + 4,
            escape_xml(title)
        ));
    }

    fn render_heatmap(&mut self, layout: &Layout, matrix: &ScoringMatrix, range: (f64, f64)) {
        for (i, row) in matrix.iter_rows().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                let (x, y) = (layout.cell_x(j), layout.cell_y(i));
                self.elements.push(format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    x,
                    y,
                    layout.cell,
                    layout.cell,
                    coolwarm(normalize(score, range))
                ));
                if self.config.show_values {
                    self.elements.push(format!(
                        r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                        x + layout.cell / 2.0,
                        y + layout.cell / 2.0,
                        self.config.font_family,
                        self.config.font_size.saturating_sub(2).max(6),
                        cell_label(score)
                    ));
                }
            }
        }
    }

    fn render_match_grid(&mut self, layout: &Layout, matrix: &MatchMatrix) {
        for i in 0..layout.rows {
            for j in 0..layout.cols {
                let fill = if matrix.is_match(i, j) {
                    self.config.match_color.as_str()
                } else {
                    self.config.background_color.as_str()
                };
                self.elements.push(format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black" stroke-width="1"/>"#,
                    layout.cell_x(j),
                    layout.cell_y(i),
                    layout.cell,
                    layout.cell,
                    fill
                ));
            }
        }
    }

    /// Symbols of `seq_b` across the top and of `seq_a` down the left.
    ///
    /// `offset` is the index of the first row/column that holds a symbol.
    fn add_axis_labels(&mut self, layout: &Layout, seq_a: &[u8], seq_b: &[u8], offset: usize) {
        let font = &self.config.font_family;
        let size = self.config.font_size;
        let label_y = layout.top - 10.0;
        for (k, &symbol) in seq_b.iter().enumerate() {
            let x = layout.cell_x(k + offset) + layout.cell / 2.0;
            self.elements.push(format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle">{}</text>"#,
                x,
                label_y,
                font,
                size,
                escape_xml(&(symbol as char).to_string())
            ));
        }

        let label_x = layout.left - 10.0;
        for (k, &symbol) in seq_a.iter().enumerate() {
            let y = layout.cell_y(k + offset) + layout.cell / 2.0;
            self.elements.push(format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                label_x,
                y,
                font,
                size,
                escape_xml(&(symbol as char).to_string())
            ));
        }
    }

    fn polyline_points(points: &[(f32, f32)]) -> String {
        points
            .iter()
            .map(|(x, y)| format!("{},{}", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn add_path_overlay(&mut self, points: &[(f32, f32)], color: &str, cell: f32) {
        if points.len() > 1 {
            self.elements.push(format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2" stroke-opacity="0.5"/>"#,
                Self::polyline_points(points),
                color
            ));
        }
        for (x, y) in points {
            self.elements.push(format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.5"/>"#,
                x,
                y,
                cell * 0.3,
                color
            ));
        }
    }

    fn add_run(&mut self, layout: &Layout, run: &DiagonalRun, color: &str) {
        let points: Vec<(f32, f32)> = run.cells.iter().map(|&c| layout.center(c)).collect();
        self.elements.push(format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="3"/>"#,
            Self::polyline_points(&points),
            color
        ));
        for (x, y) in &points {
            self.elements.push(format!(
                r#"<circle cx="{}" cy="{}" r="4" fill="{}"/>"#,
                x, y, color
            ));
        }
    }

    fn add_color_bar(&mut self, layout: &Layout, (lo, hi): (f64, f64)) {
        const STEPS: usize = 16;
        let bar_h = (layout.rows as f32 * layout.cell).max(160.0);
        let step_h = bar_h / STEPS as f32;
        let x = layout.side_x;

        // Highest score at the top
        for k in 0..STEPS {
            let t = 1.0 - k as f64 / (STEPS - 1) as f64;
            self.elements.push(format!(
                r#"<rect x="{}" y="{}" width="20" height="{}" fill="{}"/>"#,
                x,
                layout.top + k as f32 * step_h,
                step_h,
                coolwarm(t)
            ));
        }
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="20" height="{}" fill="none" stroke="black" stroke-width="1"/>"#,
            x, layout.top, bar_h
        ));

        let font = &self.config.font_family;
        let size = self.config.font_size.saturating_sub(2).max(6);
        for (label, y) in [(hi, layout.top), (lo, layout.top + bar_h)] {
            self.elements.push(format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" dominant-baseline="middle">{}</text>"#,
                x + 25.0,
                y,
                font,
                size,
                cell_label(label)
            ));
        }
    }

    fn add_legend(&mut self, x: f32, y: f32, entries: &[LegendEntry]) {
        let height = entries.len() as f32 * 22.0 + 10.0;
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="130" height="{}" fill="white" stroke="black" stroke-width="1" fill-opacity="0.9"/>"#,
            x, y, height
        ));

        for (k, entry) in entries.iter().enumerate() {
            let row_y = y + 16.0 + k as f32 * 22.0;
            match entry.marker {
                LegendMarker::Swatch => self.elements.push(format!(
                    r#"<rect x="{}" y="{}" width="12" height="12" fill="{}"/>"#,
                    x + 9.0,
                    row_y - 6.0,
                    entry.color
                )),
                LegendMarker::Line => self.elements.push(format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="3"/>"#,
                    x + 6.0,
                    row_y,
                    x + 24.0,
                    row_y,
                    entry.color
                )),
            }
            self.elements.push(format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" dominant-baseline="middle">{}</text>"#,
                x + 30.0,
                row_y,
                self.config.font_family,
                self.config.font_size,
                escape_xml(&entry.label)
            ));
        }
    }

    fn add_footer(&mut self, summary: &str) {
        let footer_text = format!(
            "dotalign v{} | {} | Generated: {}",
            dotalign_core::VERSION,
            summary,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        self.elements.push(format!(
            r#"<text x="10" y="{}" font-family="{}" font-size="{}px" fill="gray">{}</text>"#,
            self.height - 10.0,
            self.config.font_family,
            self.config.font_size.saturating_sub(2),
            escape_xml(&footer_text)
        ));
    }

    fn to_svg_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<svg width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            self.width, self.height, self.width, self.height
        ));
        for c in &self.top_comments {
            for line in c.lines() {
                out.push_str(&format!("  <!-- {} -->\n", line));
            }
        }
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotalign_core::{build, enumerate_optimal_paths, DotPlot, ScoringScheme};

    fn quiet_config() -> ExportConfig {
        ExportConfig {
            show_footer: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(19.0), "19");
        assert_eq!(cell_label(-4.0), "-4");
        assert_eq!(cell_label(0.1234), "0.12");
        assert_eq!(cell_label(-0.0), "0");
    }

    #[test]
    fn test_scoring_svg_contents() {
        let scheme = ScoringScheme::new(5.0, -2.0, -4.0);
        let (a, b) = (b"CTATGAA".as_slice(), b"CTATTGACGTA".as_slice());
        let matrix = build(a, b, &scheme).unwrap();
        let paths = enumerate_optimal_paths(&matrix, a, b, &scheme).unwrap();

        let svg = VectorExporter::new(quiet_config()).render_scoring_svg(&matrix, a, b, &paths);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(">19</text>"));
        assert!(svg.contains("Path 1"));
        assert!(svg.contains("Path 2"));
        assert!(!svg.contains("Path 3"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(!svg.contains("Generated:"));
    }

    #[test]
    fn test_dot_svg_contents() {
        let plot = DotPlot::new(b"ABA", b"ABA");
        let config = ExportConfig {
            title: Some("A<B".into()),
            ..quiet_config()
        };
        let svg = VectorExporter::new(config).render_dot_svg(&plot.matrix, &plot.diagonals, b"ABA", b"ABA");

        assert!(svg.contains("Main Diagonal"));
        assert!(svg.contains("Reverse Diagonal"));
        assert!(svg.contains("A&lt;B"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        // Five matches in a 3x3 grid
        assert_eq!(svg.matches(r##"fill="#ff0000" stroke="black""##).count(), 5);
    }

    #[test]
    fn test_footer_and_comment() {
        let config = ExportConfig {
            provenance_comment: Some("dotalign dot --seq-a ABA".into()),
            ..Default::default()
        };
        let plot = DotPlot::new(b"AB", b"AB");
        let svg = VectorExporter::new(config).render_dot_svg(&plot.matrix, &plot.diagonals, b"AB", b"AB");

        assert!(svg.contains("<!-- dotalign dot - -seq-a ABA -->"));
        assert!(svg.contains("Generated:"));
    }

    #[test]
    fn test_empty_inputs_still_render() {
        let scheme = ScoringScheme::default();
        let matrix = build(b"", b"", &scheme).unwrap();
        let paths = enumerate_optimal_paths(&matrix, b"", b"", &scheme).unwrap();
        let svg = VectorExporter::new(quiet_config()).render_scoring_svg(&matrix, b"", b"", &paths);
        assert!(svg.contains("Path 1"));
        assert_eq!(svg.matches("<polyline").count(), 0);

        let plot = DotPlot::new(b"", b"ACGT");
        let svg = VectorExporter::new(quiet_config()).render_dot_svg(&plot.matrix, &plot.diagonals, b"", b"ACGT");
        assert!(svg.contains("</svg>"));
    }
}
