//! Inline SVG chart rendering for reports.

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

const PORTFOLIO_STROKE: &str = "#2563eb";
const BENCHMARK_STROKE: &str = "#9ca3af";
const DRAWDOWN_STROKE: &str = "#ef4444";
const DRAWDOWN_FILL: &str = "rgba(239,68,68,0.3)";

struct Scale {
    min: f64,
    span: f64,
    step_x: f64,
}

impl Scale {
    fn new(min: f64, max: f64, n_points: usize) -> Self {
        let span = if max > min { max - min } else { 1.0 };
        let step_x = if n_points > 1 {
            (WIDTH - 2.0 * PADDING) / (n_points - 1) as f64
        } else {
            0.0
        };
        Self { min, span, step_x }
    }

    fn x(&self, i: usize) -> f64 {
        PADDING + i as f64 * self.step_x
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - 2.0 * PADDING;
        HEIGHT - PADDING - (value - self.min) / self.span * plot_height
    }
}

fn polyline_points(values: &[f64], scale: &Scale) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", scale.x(i), scale.y(*v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn svg_open() -> String {
    format!(
        r#"<svg viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}" width="{WIDTH:.0}" height="{HEIGHT:.0}" xmlns="http://www.w3.org/2000/svg">"#
    )
}

fn axes() -> String {
    format!(
        r##"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="#d1d5db" stroke-width="1"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="#d1d5db" stroke-width="1"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    )
}

fn axis_labels(min: f64, max: f64) -> String {
    format!(
        r##"<text x="{x:.0}" y="{top:.0}" font-size="10" fill="#6b7280" text-anchor="end">{max_pct:.1}%</text><text x="{x:.0}" y="{bottom:.0}" font-size="10" fill="#6b7280" text-anchor="end">{min_pct:.1}%</text>"##,
        x = PADDING - 4.0,
        top = PADDING + 4.0,
        bottom = HEIGHT - PADDING,
        max_pct = max * 100.0,
        min_pct = min * 100.0
    )
}

/// Cumulative return line chart, portfolio in blue with an optional
/// benchmark overlay in grey. Values are fractions.
pub fn generate_cumulative_svg(portfolio: &[f64], benchmark: Option<&[f64]>) -> String {
    if portfolio.is_empty() {
        return String::new();
    }

    let all_values = portfolio
        .iter()
        .chain(benchmark.into_iter().flatten())
        .copied();
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for v in all_values {
        min = min.min(v);
        max = max.max(v);
    }
    let scale = Scale::new(min, max, portfolio.len());

    let mut svg = svg_open();
    svg.push_str(&axes());
    svg.push_str(&axis_labels(min, max));
    if min < 0.0 && max > 0.0 {
        svg.push_str(&format!(
            r##"<line x1="{p:.0}" y1="{y:.1}" x2="{r:.0}" y2="{y:.1}" stroke="#e5e7eb" stroke-width="1" stroke-dasharray="4,4"/>"##,
            p = PADDING,
            r = WIDTH - PADDING,
            y = scale.y(0.0)
        ));
    }
    if let Some(bench) = benchmark {
        if !bench.is_empty() {
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{BENCHMARK_STROKE}" stroke-width="1.5" stroke-dasharray="6,3"/>"#,
                polyline_points(bench, &scale)
            ));
        }
    }
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{PORTFOLIO_STROKE}" stroke-width="2"/>"#,
        polyline_points(portfolio, &scale)
    ));
    svg.push_str("</svg>");
    svg
}

/// Drawdown area chart derived from an equity curve. The filled region hangs
/// below the zero line.
pub fn generate_drawdown_svg(equity_curve: &[f64]) -> String {
    if equity_curve.is_empty() {
        return String::new();
    }

    let mut peak = f64::NEG_INFINITY;
    let drawdowns: Vec<f64> = equity_curve
        .iter()
        .map(|&equity| {
            if equity > peak {
                peak = equity;
            }
            if peak > 0.0 { (equity - peak) / peak } else { 0.0 }
        })
        .collect();

    let min = drawdowns.iter().copied().fold(0.0_f64, f64::min);
    let scale = Scale::new(min, 0.0, drawdowns.len());

    let mut area = format!("{:.1},{:.1} ", scale.x(0), scale.y(0.0));
    area.push_str(&polyline_points(&drawdowns, &scale));
    area.push_str(&format!(
        " {:.1},{:.1}",
        scale.x(drawdowns.len() - 1),
        scale.y(0.0)
    ));

    let mut svg = svg_open();
    svg.push_str(&axes());
    svg.push_str(&axis_labels(min, 0.0));
    svg.push_str(&format!(
        r#"<polygon points="{area}" fill="{DRAWDOWN_FILL}" stroke="none"/>"#
    ));
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{DRAWDOWN_STROKE}" stroke-width="1.5"/>"#,
        polyline_points(&drawdowns, &scale)
    ));
    svg.push_str("</svg>");
    svg
}
