use crate::config::HighlightConfig;
use crate::coverage::build_coverage;
use crate::error::{HighlightError, Result};
use crate::escape::escape_html;
use crate::label::{CombinationKey, Label, LabelEntry};
use crate::segmenter::{Segment, segments_from_coverage};
use indexmap::IndexMap;
use log::debug;

/// Colors handed out during one render pass, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    colors: IndexMap<CombinationKey, String>,
}

impl ColorAssignment {
    /// Color for `key`, assigning the next palette entry on first sight.
    fn assign(&mut self, key: CombinationKey, palette: &[String]) -> &str {
        let next = palette[self.colors.len() % palette.len()].clone();
        self.colors.entry(key).or_insert(next).as_str()
    }

    pub fn get(&self, key: &CombinationKey) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Number of distinct combinations seen
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CombinationKey, &str)> {
        self.colors.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub colors: ColorAssignment,
}

/// Turns segments into highlight markup.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: HighlightConfig,
}

impl Renderer {
    pub fn new(config: HighlightConfig) -> Result<Self> {
        config.validate().map_err(HighlightError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Run the whole pipeline: locate, cover, segment, render.
    pub fn highlight(&self, text: &str, entries: &[LabelEntry]) -> Rendered {
        let coverage = build_coverage(text, entries, self.config.min_span_chars);
        let segments = segments_from_coverage(text, &coverage);
        self.render(text, &segments)
    }

    /// Render `segments` of `text` in order.
    pub fn render(&self, text: &str, segments: &[Segment]) -> Rendered {
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        let byte_at = |i: usize| bounds.get(i).copied().unwrap_or(text.len());

        let mut colors = ColorAssignment::default();
        let mut html = String::with_capacity(text.len() * 2);

        for segment in segments {
            let start = byte_at(segment.start);
            let raw = &text[start..byte_at(segment.end).max(start)];
            let escaped = escape_html(raw);

            if segment.labels.is_empty() || raw.trim().is_empty() {
                html.push_str(&escaped);
                continue;
            }

            let key = segment.labels.key();
            let items: String = key.labels().iter().map(render_item).collect();
            let color = colors.assign(key, &self.config.palette);

            html.push_str(r#"<div class="es-tooltip" tabindex="0">"#);
            html.push_str(&format!(r#"<mark style="background:{color}">{escaped}</mark>"#));
            html.push_str(&format!(
                r#"<div class="es-card"><div class="es-tip">{items}</div></div>"#
            ));
            html.push_str("</div>");
        }

        debug!(
            "Rendered {} segments with {} color groups",
            segments.len(),
            colors.len()
        );

        Rendered { html, colors }
    }
}

fn render_item(label: &Label) -> String {
    format!(
        concat!(
            r#"<div class="es-item">"#,
            r#"<div class="es-skill">{skill}</div>"#,
            r#"<div class="es-span">{span}</div>"#,
            r#"<details class="es-acc"><summary>Reason</summary>"#,
            r#"<div class="es-reason">{reason}</div></details>"#,
            "</div>",
        ),
        skill = escape_html(label.skill()),
        span = escape_html(label.span()),
        reason = escape_html(label.reason()),
    )
}

/// Highlight `text` with the default configuration.
pub fn insert_highlights(text: &str, entries: &[LabelEntry]) -> String {
    Renderer::default().highlight(text, entries).html
}
