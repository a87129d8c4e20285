//! Bar and line charts.

use super::svg::{Anchor, SvgDocument};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 520.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 60.0;
const BOTTOM: f64 = 90.0;
const TICKS: usize = 5;

/// Plot palette, cycled by series index.
pub const PALETTE: [&str; 6] = [
    "#1e90ff", "#ff8c00", "#dc143c", "#4caf50", "#ffc107", "#9c27b0",
];

/// A named series of values.
#[derive(Debug, Clone)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// One value per category (bars) or per x position (lines).
    pub values: Vec<f64>,
    /// Fill or stroke colour.
    pub color: String,
}

impl Series {
    /// A series with an explicit colour.
    pub fn new(label: impl Into<String>, values: Vec<f64>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values,
            color: color.into(),
        }
    }
}

/// Plot-area geometry shared by the chart kinds.
struct Frame {
    x0: f64,
    y0: f64,
    w: f64,
    h: f64,
    y_max: f64,
}

impl Frame {
    fn new(doc: &SvgDocument, y_max: f64) -> Self {
        Self {
            x0: LEFT,
            y0: TOP,
            w: doc.width() - LEFT - RIGHT,
            h: doc.height() - TOP - BOTTOM,
            y_max: if y_max > 0.0 { y_max } else { 1.0 },
        }
    }

    fn y(&self, v: f64) -> f64 {
        self.y0 + self.h - (v / self.y_max).clamp(0.0, 1.0) * self.h
    }

    fn bottom(&self) -> f64 {
        self.y0 + self.h
    }

    fn draw_axes(&self, doc: &mut SvgDocument, title: &str, x_label: &str, y_label: &str) {
        doc.text(doc.width() / 2.0, 32.0, 18.0, Anchor::Middle, title);
        for i in 0..=TICKS {
            let v = self.y_max * i as f64 / TICKS as f64;
            let y = self.y(v);
            doc.dashed_line(self.x0, y, self.x0 + self.w, y, "#dddddd");
            doc.text(self.x0 - 8.0, y + 4.0, 11.0, Anchor::End, &format!("{v:.3}"));
        }
        doc.line(self.x0, self.y0, self.x0, self.bottom(), "#333333");
        doc.line(self.x0, self.bottom(), self.x0 + self.w, self.bottom(), "#333333");
        doc.text(
            self.x0 + self.w / 2.0,
            doc.height() - 20.0,
            13.0,
            Anchor::Middle,
            x_label,
        );
        doc.vertical_text(22.0, self.y0 + self.h / 2.0, 13.0, y_label);
    }

    fn draw_legend(&self, doc: &mut SvgDocument, series: &[Series]) {
        let x = self.x0 + self.w - 220.0;
        for (i, s) in series.iter().enumerate() {
            let y = self.y0 + 10.0 + 20.0 * i as f64;
            doc.rect(x, y - 10.0, 12.0, 12.0, &s.color);
            doc.text(x + 18.0, y, 12.0, Anchor::Start, &s.label);
        }
    }
}

/// Grouped vertical bars, one group per category.
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    title: String,
    x_label: String,
    y_label: String,
    categories: Vec<String>,
    series: Vec<Series>,
    value_labels: bool,
    overlay: Option<Series>,
    bar_colors: Vec<String>,
}

impl BarChart {
    /// A chart with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Axis labels.
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Category labels along the x axis.
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Add a bar series.
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Print each bar's value above it.
    pub fn with_value_labels(mut self) -> Self {
        self.value_labels = true;
        self
    }

    /// Colour each category's bar individually. Only applies to charts
    /// with a single series.
    pub fn bar_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bar_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// A dashed curve drawn over the bars. Values are sampled at evenly
    /// spaced positions from the first to the last category centre.
    pub fn overlay(mut self, series: Series) -> Self {
        self.overlay = Some(series);
        self
    }

    /// Render to an SVG document.
    pub fn render(&self) -> SvgDocument {
        let mut doc = SvgDocument::new(WIDTH, HEIGHT);
        let y_max = self
            .series
            .iter()
            .chain(self.overlay.iter())
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
            * 1.15;
        let frame = Frame::new(&doc, y_max);
        frame.draw_axes(&mut doc, &self.title, &self.x_label, &self.y_label);

        let groups = self.categories.len().max(1);
        let group_w = frame.w / groups as f64;
        let bar_w = group_w * 0.8 / self.series.len().max(1) as f64;

        for (g, label) in self.categories.iter().enumerate() {
            let gx = frame.x0 + group_w * g as f64 + group_w * 0.1;
            for (s, series) in self.series.iter().enumerate() {
                let v = series.values.get(g).copied().unwrap_or(0.0);
                let x = gx + bar_w * s as f64;
                let y = frame.y(v);
                let color = match self.bar_colors.get(g) {
                    Some(c) if self.series.len() == 1 => c,
                    _ => &series.color,
                };
                doc.rect(x, y, bar_w * 0.95, frame.bottom() - y, color);
                if self.value_labels {
                    doc.text(x + bar_w / 2.0, y - 4.0, 10.0, Anchor::Middle, &format!("{v:.4}"));
                }
            }
            doc.text(
                frame.x0 + group_w * (g as f64 + 0.5),
                frame.bottom() + 18.0,
                11.0,
                Anchor::Middle,
                label,
            );
        }

        if let Some(curve) = &self.overlay {
            let n = curve.values.len();
            let first = frame.x0 + group_w * 0.5;
            let span = group_w * (groups - 1) as f64;
            let points: Vec<(f64, f64)> = curve
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                    (first + span * t, frame.y(v))
                })
                .collect();
            doc.polyline(&points, &curve.color, true);
        }

        let legend: Vec<Series> = self.series.iter().chain(self.overlay.iter()).cloned().collect();
        if legend.len() > 1 || self.overlay.is_some() {
            frame.draw_legend(&mut doc, &legend);
        }
        doc
    }
}

/// Lines with point markers over shared integer x positions.
#[derive(Debug, Clone, Default)]
pub struct LineChart {
    title: String,
    x_label: String,
    y_label: String,
    x: Vec<f64>,
    series: Vec<Series>,
}

impl LineChart {
    /// A chart with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Axis labels.
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Shared x positions.
    pub fn x_values(mut self, x: Vec<f64>) -> Self {
        self.x = x;
        self
    }

    /// Add a line.
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Render to an SVG document.
    pub fn render(&self) -> SvgDocument {
        let mut doc = SvgDocument::new(WIDTH, HEIGHT);
        let y_max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
            * 1.15;
        let frame = Frame::new(&doc, y_max);
        frame.draw_axes(&mut doc, &self.title, &self.x_label, &self.y_label);

        let x_min = self.x.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = self.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let px = |x: f64| frame.x0 + 20.0 + (frame.w - 40.0) * (x - x_min) / x_span;

        for &x in &self.x {
            doc.text(px(x), frame.bottom() + 18.0, 11.0, Anchor::Middle, &format!("{x}"));
        }
        for series in &self.series {
            let points: Vec<(f64, f64)> = self
                .x
                .iter()
                .zip(&series.values)
                .map(|(&x, &v)| (px(x), frame.y(v)))
                .collect();
            doc.polyline(&points, &series.color, false);
            for &(x, y) in &points {
                doc.circle(x, y, 4.0, &series.color);
            }
        }
        frame.draw_legend(&mut doc, &self.series);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_draws_every_bar() {
        let chart = BarChart::new("t")
            .categories(["0", "1", "2"])
            .series(Series::new("a", vec![0.2, 0.5, 0.3], PALETTE[0]))
            .series(Series::new("b", vec![0.25, 0.5, 0.25], PALETTE[1]));
        let svg = chart.render().render();
        // Background + 6 bars + 2 legend swatches.
        assert_eq!(svg.matches("<rect").count(), 1 + 6 + 2);
    }

    #[test]
    fn test_bar_chart_overlay() {
        let chart = BarChart::new("t")
            .categories(["0", "1"])
            .series(Series::new("a", vec![0.5, 0.5], PALETTE[0]))
            .overlay(Series::new("fit", vec![0.1, 0.4, 0.1], PALETTE[2]));
        let svg = chart.render().render();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("fit"));
    }

    #[test]
    fn test_line_chart_markers() {
        let chart = LineChart::new("depth")
            .x_values(vec![1.0, 2.0, 3.0])
            .series(Series::new("js", vec![0.01, 0.02, 0.04], PALETTE[0]));
        let svg = chart.render().render();
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn test_bar_colors_apply_per_category() {
        let chart = BarChart::new("variance")
            .categories(["a", "b"])
            .series(Series::new("v", vec![1.0, 0.9], PALETTE[0]))
            .bar_colors(["#4caf50", "#f44336"]);
        let svg = chart.render().render();
        assert!(svg.contains("#4caf50"));
        assert!(svg.contains("#f44336"));
        assert!(!svg.contains(PALETTE[0]));
    }

    #[test]
    fn test_all_zero_values_render() {
        let chart = BarChart::new("zeros")
            .categories(["0"])
            .series(Series::new("a", vec![0.0], PALETTE[0]));
        assert!(chart.render().render().contains("zeros"));
    }
}
