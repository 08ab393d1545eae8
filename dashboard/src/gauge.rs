use esco_highlight::escape_html;
use serde::Serialize;
use serde_json::{Value, json};
use std::borrow::Cow;

/// ColorBrewer RdYlGn, evenly spaced from red (0) to green (1)
const RD_YL_GN: [(u8, u8, u8); 11] = [
    (165, 0, 38),
    (215, 48, 39),
    (244, 109, 67),
    (253, 174, 97),
    (254, 224, 139),
    (255, 255, 191),
    (217, 239, 139),
    (166, 217, 106),
    (102, 189, 99),
    (26, 152, 80),
    (0, 104, 55),
];

pub const GAUGE_BANDS: usize = 50;
pub const WRAP_COLUMNS: usize = 80;

const BASE_HEIGHT: u32 = 340;
const BASE_BOTTOM_MARGIN: u32 = 36;
const LINE_HEIGHT: u32 = 18;

/// Sample the red→yellow→green scale at `t` in `[0, 1]` as `rgb(r, g, b)`.
pub fn sample_rd_yl_gn(t: f64) -> String {
    let last = RD_YL_GN.len() - 1;
    let pos = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } * last as f64;
    let lower = (pos.floor() as usize).min(last - 1);
    let frac = pos - lower as f64;
    let (r0, g0, b0) = RD_YL_GN[lower];
    let (r1, g1, b1) = RD_YL_GN[lower + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    format!("rgb({}, {}, {})", lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeBand {
    pub range: [f64; 2],
    pub color: String,
}

/// 0-100 % match gauge, serializable as a Plotly indicator figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub value: f64,

    /// Value the gauge animates from
    pub start_value: f64,

    pub title: Option<String>,
    pub bar_color: String,
    pub bands: Vec<GaugeBand>,

    /// Explanation wrapped to [`WRAP_COLUMNS`]
    pub explanation_lines: Vec<String>,

    pub height: u32,
}

impl GaugeSpec {
    pub fn new(score_percent: f64, title: Option<&str>, explanation: Option<&str>) -> Self {
        let value = clamp_percent(score_percent);
        let bands = (0..GAUGE_BANDS)
            .map(|i| {
                let steps = GAUGE_BANDS as f64;
                GaugeBand {
                    range: [100.0 * i as f64 / steps, 100.0 * (i + 1) as f64 / steps],
                    color: sample_rd_yl_gn((i as f64 + 0.5) / steps),
                }
            })
            .collect();
        let explanation_lines: Vec<String> = explanation
            .filter(|e| !e.is_empty())
            .map(|e| {
                textwrap::wrap(e, WRAP_COLUMNS)
                    .into_iter()
                    .map(Cow::into_owned)
                    .collect()
            })
            .unwrap_or_default();

        let extra = Self::extra_margin(explanation_lines.len());
        Self {
            value,
            start_value: value,
            title: title.filter(|t| !t.is_empty()).map(str::to_string),
            bar_color: sample_rd_yl_gn(value / 100.0),
            bands,
            explanation_lines,
            height: BASE_HEIGHT + extra * 3 / 5,
        }
    }

    /// Animate from `previous` (clamped) instead of starting at the final value.
    pub fn with_start(mut self, previous: f64) -> Self {
        self.start_value = clamp_percent(previous);
        self
    }

    fn extra_margin(lines: usize) -> u32 {
        u32::try_from(lines).unwrap_or(u32::MAX / LINE_HEIGHT) * LINE_HEIGHT
    }

    /// Plotly figure JSON: one `gauge+number` indicator plus layout, and a
    /// single frame moving the needle from `start_value` to `value`.
    pub fn to_figure(&self) -> Value {
        let extra = Self::extra_margin(self.explanation_lines.len());
        let mut annotations = Vec::new();
        if !self.explanation_lines.is_empty() {
            let text = self
                .explanation_lines
                .iter()
                .map(String::as_str)
                .map(escape_html)
                .collect::<Vec<_>>()
                .join("<br>");
            annotations.push(json!({
                "x": 0.5, "xref": "paper", "xanchor": "center",
                "y": 0, "yref": "paper", "yanchor": "top", "yshift": -8,
                "text": text, "showarrow": false, "align": "center",
            }));
        }

        let indicator = |value: f64| {
            json!({
                "type": "indicator",
                "mode": "gauge+number",
                "value": value,
                "number": {"suffix": "%", "valueformat": ".1f"},
                "title": {"text": self.title.as_deref().unwrap_or_default()},
                "gauge": {
                    "axis": {"range": [0, 100], "tickvals": [0, 25, 50, 75, 100], "ticks": "outside"},
                    "bar": {"color": self.bar_color, "thickness": 0.25},
                    "borderwidth": 1,
                    "steps": self.bands,
                    "threshold": {
                        "line": {"color": self.bar_color, "width": 4},
                        "thickness": 0.85,
                        "value": self.value,
                    },
                },
                "domain": {"x": [0, 1], "y": [0, 1]},
            })
        };

        json!({
            "data": [indicator(self.start_value)],
            "frames": [{"data": [{"value": self.value}]}],
            "layout": {
                "height": self.height,
                "margin": {
                    "l": 20,
                    "r": 20,
                    "t": if self.title.is_some() { 50 } else { 20 },
                    "b": BASE_BOTTOM_MARGIN + extra,
                },
                "annotations": annotations,
            },
        })
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
