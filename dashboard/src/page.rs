use crate::gauge::GaugeSpec;
use crate::skill_table::SkillTable;
use esco_highlight::escape_html;
use esco_scoring::MatchScore;
use pulldown_cmark::{Event, Options, Parser, html};
use std::fmt::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Styles for highlight tooltips, reason cards and the page layout
pub const STYLESHEET: &str = r#"
body{ font-family:system-ui,-apple-system,"Segoe UI",Roboto,sans-serif; margin:24px auto; max-width:1200px; color:#111827; }
hr{ border:0; border-top:1px solid #e2e8f0; margin:24px 0; }

/* Trigger */
.es-tooltip{ position:relative; display:inline-block; }
.es-tooltip mark{ background:#fef08a; padding:0 .14em; border-radius:4px; }
.es-tooltip:focus-visible{ outline:2px solid #2563eb; outline-offset:2px; }

/* Card */
.es-card{
  position:absolute; inset:auto auto auto 0;
  z-index:9999; min-width:260px; max-width:420px;
  padding:12px 14px; border:1px solid #e2e8f0; border-radius:10px; background:#fff;
  box-shadow:0 10px 32px rgba(0,0,0,.15);
  font-size:.92em; line-height:1.5;
  visibility:hidden; opacity:0; translate:0 8px;
  transition:opacity .12s ease, translate .12s ease;
  max-height:42vh; overflow:auto; word-wrap:break-word;
}
.es-tooltip[data-pos="right"] .es-card{ inset:auto 0 auto auto; }
.es-tooltip[data-pos="top"] .es-card{ inset:auto auto 100% 0; translate:0 -8px; }

@media (max-width:900px){ .es-card{ left:auto; right:0; } }

.es-tooltip:hover .es-card,
.es-tooltip:focus-within .es-card,
.es-card:hover{ visibility:visible; opacity:1; translate:0 0; }

/* Caret and hover bridge */
.es-card::before{
  content:""; position:absolute; top:-8px; left:16px; width:0; height:0;
  border:8px solid transparent; border-bottom-color:#fff;
  filter:drop-shadow(0 -1px 0 #e2e8f0);
}
.es-card::after{ content:""; position:absolute; top:-10px; left:0; right:0; height:12px; }
.es-tooltip[data-pos="top"] .es-card::before{
  top:auto; bottom:-8px; border:8px solid transparent; border-top-color:#fff;
  filter:drop-shadow(0 1px 0 #e2e8f0);
}

.es-tip{ max-width:520px; padding:4px 0; }

.es-item{
  display:grid; grid-template-rows:auto auto auto; gap:8px;
  padding:10px; border:1px solid #e5e7eb; border-radius:10px;
  margin:10px 0; background:#fff;
}
.es-item + .es-item{ margin-top:12px; }
.es-item:hover{ box-shadow:0 6px 18px rgba(0,0,0,.06); }

.es-skill{
  width:100%; height:80px; border-radius:8px;
  background:#10b981; color:#fff; display:grid; place-items:center;
  font-weight:700; font-size:14pt; line-height:1; text-align:center;
  border:1px solid #059669; padding:4px;
  word-break:break-word;
}

.es-span{
  display:flex; align-items:center; justify-content:flex-start;
  min-height:44px; min-width:44px; padding:6px 8px;
  border:1px solid #e2e8f0; border-radius:8px;
  background:#f3f4f6; color:#374151;
  font-family:ui-monospace,SFMono-Regular,Menlo,monospace;
  font-size:12px; line-height:1.35; word-break:break-word;
}

.es-acc{ border:0; padding:0; }
.es-acc>summary{
  display:inline-flex; align-items:center; gap:8px;
  padding:6px 10px; border:1px solid #e5e7eb; border-radius:8px;
  background:#f9fafb; color:#111827; font-weight:600; font-size:.9em;
  cursor:pointer; list-style:none; user-select:none;
  transition:background .12s ease, border-color .12s ease;
}
.es-acc>summary:hover{ background:#f3f4f6; }
.es-acc>summary::-webkit-details-marker{ display:none; }
.es-acc>summary::after{ content:"▸"; font-size:.9em; transform:translateY(1px); margin-left:4px; }
.es-acc[open]>summary::after{ content:"▾"; }

.es-reason{
  margin-top:8px; padding:8px 10px;
  border:1px dashed #d1d5db; border-radius:8px;
  background:#fff; color:#374151; font-size:.88em; line-height:1.4;
}

/* Page */
.es-text{ position:relative; overflow:visible; border:1px solid #e2e8f0; border-radius:10px; padding:12px; background:white; }
.es-columns{ display:grid; grid-template-columns:1fr 1fr; gap:24px; }
.es-settings{ display:flex; gap:24px; flex-wrap:wrap; }
.es-settings dt{ font-weight:600; }
.es-settings dd{ margin:0; }
"#;

/// State of the match score shown on a page
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreState {
    /// Scoring was switched off for this render
    Disabled,
    /// The job did not finish within the poll budget
    Pending,
    Done(MatchScore),
}

/// Everything one dashboard page shows
#[derive(Debug, Clone)]
pub struct PageView {
    pub activity_index: usize,
    pub activity_count: usize,
    pub person_index: usize,
    pub goal: String,
    pub interests: String,
    /// Highlight markup of the activity text
    pub highlighted: String,
    pub score: ScoreState,
    /// Absent when scoring is disabled
    pub gauge: Option<GaugeSpec>,
    pub skills: SkillTable,
}

/// Render `view` as a standalone HTML document.
pub fn render_page(view: &PageView) -> String {
    let mut page = String::with_capacity(16 * 1024);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>ESCO Dashboard</title>\n");
    let _ = writeln!(page, "<style>{STYLESHEET}</style>");
    if view.gauge.is_some() {
        let _ = writeln!(page, "<script src=\"{PLOTLY_CDN}\"></script>");
    }
    page.push_str("</head>\n<body>\n<h1>ESCO Dashboard</h1>\n");

    page.push_str("<h4>Person-Settings</h4>\n<dl class=\"es-settings\">");
    let _ = write!(
        page,
        "<div><dt>Person</dt><dd>Person {}</dd></div>",
        view.person_index + 1
    );
    let _ = write!(
        page,
        "<div><dt>Goal</dt><dd>{}</dd></div>",
        escape_html(&view.goal)
    );
    let _ = writeln!(
        page,
        "<div><dt>Interests</dt><dd>{}</dd></div></dl>",
        escape_html(&view.interests)
    );

    let _ = writeln!(
        page,
        "<h4>Activity Text <small>({} / {})</small></h4>",
        view.activity_index,
        view.activity_count.saturating_sub(1)
    );
    let _ = writeln!(page, "<div class=\"es-text\">{}</div>\n<hr>", view.highlighted);

    page.push_str("<div class=\"es-columns\">\n<div>\n<h3>Match Score</h3>\n");
    if view.gauge.is_some() {
        page.push_str("<div id=\"es-gauge\"></div>\n");
    } else {
        page.push_str("<p>Scoring disabled.</p>\n");
    }
    page.push_str("</div>\n<div>\n<h3>Reason</h3>\n");
    page.push_str(&reason_html(&view.score));
    page.push_str("</div>\n</div>\n<hr>\n");

    page.push_str("<h4>Skill Table</h4>\n");
    page.push_str(&view.skills.to_html());
    page.push('\n');

    if let Some(gauge) = &view.gauge {
        let _ = writeln!(page, "<script>{}</script>", gauge_script(gauge));
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn reason_html(score: &ScoreState) -> String {
    match score {
        ScoreState::Disabled => String::new(),
        ScoreState::Pending => "<p>Calculating...</p>\n".to_string(),
        ScoreState::Done(score) => {
            let short = if score.explanation_short.is_empty() {
                "No short explanation."
            } else {
                score.explanation_short.as_str()
            };
            format!(
                "<div class=\"es-short\">{}</div>\n<details class=\"es-acc\"><summary>More details</summary><div class=\"es-long\">{}</div></details>\n",
                markdown_to_html(short),
                markdown_to_html(&score.explanation)
            )
        }
    }
}

/// Render model-written markdown; raw HTML in it is shown as text.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Plot the gauge and animate it to its final value.
fn gauge_script(gauge: &GaugeSpec) -> String {
    // `</` would end the script element early.
    let figure = gauge.to_figure().to_string().replace("</", "<\\/");
    format!(
        "const fig = {figure};\nPlotly.newPlot('es-gauge', fig.data, fig.layout).then(gd => \
         Plotly.animate(gd, fig.frames, {{transition: {{duration: 800, easing: 'cubic-in-out'}}, frame: {{duration: 800}}}}));"
    )
}
