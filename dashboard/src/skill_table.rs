//! Per-activity skill overview: which skills the activity asks for, which of
//! them are ground truth, and whether the selected person has them.

use crate::config::PersonProfile;
use crate::dataset::Activity;
use esco_highlight::{LabelEntry, escape_html};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Row background per group, most relevant first
const GROUP_COLORS: [&str; 6] = [
    "#dcfce7", "#FFE7BA", "#fee2e2", "#ff6961", "#e0e7ff", "#ffffff",
];

const COLUMNS: [&str; 6] = ["Skill", "GT", "Needed", "Optional", "Trainable", "Person"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub skill: String,
    pub ground_truth: bool,
    pub needed: bool,
    pub optional: bool,
    pub trainable: bool,
    pub person_has: bool,
    /// Sort group, see [`SkillRow::group`]
    pub group: u8,
    pub reasons: Vec<String>,
}

impl SkillRow {
    /// Group of a skill; the first matching rule wins.
    ///
    /// | group | rule |
    /// |-------|------|
    /// | 0 | ground truth and needed |
    /// | 1 | ground truth and optional |
    /// | 3 | needed but not ground truth |
    /// | 2 | ground truth, not needed |
    /// | 4 | any flag |
    /// | 5 | otherwise |
    pub fn group(ground_truth: bool, needed: bool, optional: bool, trainable: bool) -> u8 {
        if ground_truth && needed {
            0
        } else if ground_truth && optional {
            1
        } else if needed {
            3
        } else if ground_truth {
            2
        } else if optional || trainable {
            4
        } else {
            5
        }
    }

    pub fn color(&self) -> &'static str {
        GROUP_COLORS
            .get(usize::from(self.group))
            .copied()
            .unwrap_or("#ffffff")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillTable {
    rows: Vec<SkillRow>,
}

impl SkillTable {
    pub fn build(activity: &Activity, person: &PersonProfile) -> Self {
        let mut by_skill: BTreeMap<&str, Vec<&LabelEntry>> = BTreeMap::new();
        for entry in &activity.detailed {
            if let Some(skill) = entry.skill_name() {
                by_skill.entry(skill).or_default().push(entry);
            }
        }

        let ground_truth: BTreeSet<&str> =
            activity.ground_truth.iter().map(String::as_str).collect();
        let all_skills: BTreeSet<&str> = ground_truth
            .iter()
            .copied()
            .chain(activity.predicted.iter().map(String::as_str))
            .chain(by_skill.keys().copied())
            .collect();

        let mut rows: Vec<SkillRow> = all_skills
            .into_iter()
            .map(|skill| {
                let entries = by_skill.get(skill).map(Vec::as_slice).unwrap_or_default();
                let needed = entries.iter().any(|e| e.needed);
                let optional = entries.iter().any(|e| e.optional);
                let trainable = entries.iter().any(|e| e.trainable);
                let gt = ground_truth.contains(skill);
                SkillRow {
                    skill: skill.to_string(),
                    ground_truth: gt,
                    needed,
                    optional,
                    trainable,
                    person_has: person.has_skill(skill),
                    group: SkillRow::group(gt, needed, optional, trainable),
                    reasons: unique_reasons(entries),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.skill.cmp(&b.skill)));

        Self { rows }
    }

    pub fn rows(&self) -> &[SkillRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(
            r#"<table class="es-skills" style="width:100%; border-collapse:separate; border-spacing:0; font-size:14px;"><thead><tr>"#,
        );
        for column in COLUMNS {
            let _ = write!(
                html,
                r#"<th style="text-align:left; padding:8px; border-bottom:1px solid #e2e8f0;">{column}</th>"#
            );
        }
        html.push_str("</tr></thead><tbody>");

        for row in &self.rows {
            let _ = write!(html, r#"<tr style="background:{};">"#, row.color());
            let cells = [
                skill_cell(row),
                mark(row.ground_truth),
                mark(row.needed),
                mark(row.optional),
                mark(row.trainable),
                mark(row.person_has),
            ];
            for cell in cells {
                let _ = write!(
                    html,
                    r#"<td style="padding:6px 8px; border-bottom:1px solid #f1f5f9;">{cell}</td>"#
                );
            }
            html.push_str("</tr>");
        }

        html.push_str("</tbody></table>");
        html
    }
}

/// `reason` (or `why`) of each entry, trimmed, non-empty, first-seen order
fn unique_reasons(entries: &[&LabelEntry]) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for reason in entries.iter().copied().filter_map(LabelEntry::reason_text) {
        if !reasons.iter().any(|r| r == reason) {
            reasons.push(reason.to_string());
        }
    }
    reasons
}

fn mark(flag: bool) -> String {
    if flag { "x" } else { "" }.to_string()
}

fn skill_cell(row: &SkillRow) -> String {
    let skill = escape_html(&row.skill);
    if row.reasons.is_empty() {
        return skill.into_owned();
    }
    let reasons: String = row
        .reasons
        .iter()
        .map(|r| format!(r#"<div class="es-reason">{}</div>"#, escape_html(r)))
        .collect();
    format!(
        r#"<span class="es-tooltip" tabindex="0"><mark>{skill}</mark><div class="es-card"><div class="es-tip"><details class="es-acc" open><summary>Reasons</summary>{reasons}</details></div></div></span>"#
    )
}
