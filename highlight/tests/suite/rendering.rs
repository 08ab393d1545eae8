use esco_highlight::{
    DEFAULT_PALETTE, LabelEntry, Renderer, build_coverage, insert_highlights,
    segments_from_coverage,
};
use pretty_assertions::assert_eq;

/// Pulls `(color, text, skills)` for every highlighted run out of the markup.
fn highlighted_runs(html: &str) -> Vec<(String, String, Vec<String>)> {
    html.split(r#"<div class="es-tooltip" tabindex="0">"#)
        .skip(1)
        .filter_map(|chunk| {
            let rest = chunk.strip_prefix(r#"<mark style="background:"#)?;
            let (color, rest) = rest.split_once(r#"">"#)?;
            let (text, card) = rest.split_once("</mark>")?;
            let skills = card
                .split(r#"<div class="es-skill">"#)
                .skip(1)
                .filter_map(|s| s.split_once("</div>").map(|(skill, _)| skill.to_string()))
                .collect();
            Some((color.to_string(), text.to_string(), skills))
        })
        .collect()
}

#[test]
fn overlap_merge_lists_both_skills() {
    let text = "the quick fox";
    let entries = vec![
        LabelEntry::new("X", "covers the phrase", "quick fox"),
        LabelEntry::new("Y", "covers the animal", "fox"),
    ];

    let segments = segments_from_coverage(text, &build_coverage(text, &entries, 2));
    let pieces: Vec<(&str, usize)> = segments
        .iter()
        .map(|s| (s.text(text), s.labels.len()))
        .collect();
    assert_eq!(pieces, vec![("the ", 0), ("quick ", 1), ("fox", 2)]);

    let html = insert_highlights(text, &entries);
    assert!(html.starts_with("the <div"));
    let runs = highlighted_runs(&html);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].1, "quick ");
    assert_eq!(runs[0].2, vec!["X"]);
    assert_eq!(runs[1].1, "fox");
    assert_eq!(runs[1].2, vec!["X", "Y"]);
    assert_ne!(runs[0].0, runs[1].0);
}

#[test]
fn same_combination_keeps_color_across_positions() {
    let text = "red fox, blue jay, red fox";
    let entries = vec![
        LabelEntry::new("A", "", "red fox"),
        LabelEntry::new("B", "", "fox"),
        LabelEntry::new("C", "", "blue jay"),
    ];
    let runs = highlighted_runs(&insert_highlights(text, &entries));
    let summary: Vec<(&str, &str)> = runs
        .iter()
        .map(|(color, text, _)| (color.as_str(), text.as_str()))
        .collect();

    assert_eq!(
        summary,
        vec![
            (DEFAULT_PALETTE[0], "red "),
            (DEFAULT_PALETTE[1], "fox"),
            (DEFAULT_PALETTE[2], "blue jay"),
            (DEFAULT_PALETTE[0], "red "),
            (DEFAULT_PALETTE[1], "fox"),
        ]
    );
}

#[test]
fn colors_do_not_leak_between_calls() {
    let renderer = Renderer::default();
    let first = renderer.highlight("alpha", &[LabelEntry::new("A", "", "alpha")]);
    let second = renderer.highlight("beta", &[LabelEntry::new("B", "", "beta")]);
    assert_eq!(first.colors.len(), 1);
    assert_eq!(second.colors.len(), 1);
    assert_eq!(highlighted_runs(&second.html)[0].0, DEFAULT_PALETTE[0]);
}

#[test]
fn label_fields_are_escaped() {
    let entries = vec![LabelEntry::new("<script>", "a & b", "x<y")];
    let html = insert_highlights("if x<y then", &entries);
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a &amp; b"));
    assert!(html.contains(r#"<div class="es-span">x&lt;y</div>"#));
    assert!(!html.contains("<script>"));
}

#[test]
fn quoted_spans_match_unquoted_text() {
    let entries = vec![LabelEntry::new("manage time", "", "  “on schedule”  ")];
    let runs = highlighted_runs(&insert_highlights("Deliver on schedule.", &entries));
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].1, "on schedule");
}
