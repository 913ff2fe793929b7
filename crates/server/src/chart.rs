//! Server-side SVG line chart
//!
//! Renders a single series of labelled points with markers, a title, axis
//! labels and x tick labels slanted 45 degrees.

use chrono::NaiveDate;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 110.0;
const Y_TICKS: usize = 5;
const LINE_COLOR: &str = "#1f77b4";

/// A line chart over categorical x labels
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    title: String,
    x_label: String,
    y_label: String,
    points: Vec<(String, f64)>,
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            points: Vec::new(),
        }
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn point(mut self, label: impl Into<String>, value: f64) -> Self {
        self.points.push((label.into(), value));
        self
    }

    /// Price per date, titled and labelled for the forecast page
    pub fn prices(dates: &[NaiveDate], prices: &[f64]) -> Self {
        dates.iter().zip(prices).fold(
            Self::new("Predicted Airbnb Prices").axis_labels("Date", "Price"),
            |chart, (date, &price)| chart.point(date.format("%Y-%m-%d").to_string(), price),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value range of the y axis, padded so the line never touches the frame
    fn y_bounds(&self) -> (f64, f64) {
        let finite = self.points.iter().map(|(_, v)| *v).filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if lo > hi {
            return (0.0, 1.0);
        }
        let span = hi - lo;
        if span < 1e-9 {
            let pad = (lo.abs() * 0.05).max(1.0);
            return (lo - pad, hi + pad);
        }
        (lo - span * 0.05, hi + span * 0.05)
    }

    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x_pos(&self, index: usize) -> f64 {
        match self.points.len() {
            0 | 1 => MARGIN_LEFT + Self::plot_width() / 2.0,
            n => MARGIN_LEFT + index as f64 * Self::plot_width() / (n - 1) as f64,
        }
    }

    fn y_pos(value: f64, (lo, hi): (f64, f64)) -> f64 {
        MARGIN_TOP + (hi - value) / (hi - lo) * Self::plot_height()
    }

    /// Pixel coordinates of each finite point
    fn plot_points(&self) -> Vec<(f64, f64)> {
        let bounds = self.y_bounds();
        self.points
            .iter()
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite())
            .map(|(i, (_, v))| (self.x_pos(i), Self::y_pos(*v, bounds)))
            .collect()
    }

    pub fn render(&self) -> String {
        let bounds = self.y_bounds();
        let bottom = MARGIN_TOP + Self::plot_height();
        let right = MARGIN_LEFT + Self::plot_width();
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="{title}">"#,
            w = WIDTH,
            h = HEIGHT,
            title = escape_xml(&self.title)
        ));
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            WIDTH, HEIGHT
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            escape_xml(&self.title)
        ));

        // Grid and y ticks
        for step in 0..=Y_TICKS {
            let value = bounds.0 + (bounds.1 - bounds.0) * step as f64 / Y_TICKS as f64;
            let y = Self::y_pos(value, bounds);
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\"/>",
                MARGIN_LEFT,
                right,
                y = y
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                value
            ));
        }

        // Axes
        svg.push_str(&format!(
            r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
            l = MARGIN_LEFT,
            t = MARGIN_TOP,
            b = bottom
        ));
        svg.push_str(&format!(
            r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
            l = MARGIN_LEFT,
            r = right,
            b = bottom
        ));

        // X ticks, slanted
        for (i, (label, _)) in self.points.iter().enumerate() {
            let x = self.x_pos(i);
            svg.push_str(&format!(
                r#"<line x1="{x:.1}" y1="{b:.1}" x2="{x:.1}" y2="{t:.1}" stroke="black"/>"#,
                x = x,
                b = bottom,
                t = bottom + 5.0
            ));
            svg.push_str(&format!(
                r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="12" transform="rotate(-45 {x:.1} {y:.1})">{label}</text>"#,
                x = x,
                y = bottom + 18.0,
                label = escape_xml(label)
            ));
        }

        let coords = self.plot_points();
        if !coords.is_empty() {
            let path: Vec<String> = coords
                .iter()
                .map(|(x, y)| format!("{:.1},{:.1}", x, y))
                .collect();
            svg.push_str(&format!(
                r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                LINE_COLOR,
                path.join(" ")
            ));
            for (x, y) in &coords {
                svg.push_str(&format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                    x, y, LINE_COLOR
                ));
            }
        }

        // Axis labels
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
            MARGIN_LEFT + Self::plot_width() / 2.0,
            HEIGHT - 12.0,
            escape_xml(&self.x_label)
        ));
        let mid_y = MARGIN_TOP + Self::plot_height() / 2.0;
        svg.push_str(&format!(
            r#"<text x="20" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y:.1})">{}</text>"#,
            escape_xml(&self.y_label),
            y = mid_y
        ));

        svg.push_str("</svg>");
        svg
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
