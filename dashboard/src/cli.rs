use crate::config::{DEFAULT_CONFIG_FILE, DashboardConfig};
use crate::dataset::{Activity, activity_at, load_activities};
use crate::gauge::GaugeSpec;
use crate::page::{PageView, ScoreState, render_page};
use crate::skill_table::SkillTable;
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use esco_highlight::{LabelEntry, Renderer};
use esco_scoring::{
    ChatClient, JobBoard, JobKey, JobStatus, LmStudioClient, ScoreRequest, ScoringWorker,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Width of the activity preview printed by `list`
const PREVIEW_CHARS: usize = 72;

#[derive(Debug, Parser)]
#[command(
    name = "esco-dashboard",
    version,
    about = "Skill highlighting and match scoring for volunteer activities"
)]
pub struct Cli {
    /// Path to the dashboard config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print highlight markup for a text and its skill labels
    Highlight(HighlightArgs),

    /// Render the dashboard page for one activity and person
    Render(RenderArgs),

    /// List the activities of a dataset
    List(ListArgs),
}

#[derive(Debug, Parser)]
pub struct HighlightArgs {
    /// Text to highlight
    #[arg(long)]
    pub text: String,

    /// JSON array of label entries (skill, reason, span)
    #[arg(long, value_name = "PATH")]
    pub labels: PathBuf,
}

#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// JSON array of activities
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Zero-based activity index
    #[arg(long, default_value_t = 0)]
    pub activity: usize,

    /// Zero-based person index
    #[arg(long, default_value_t = 0)]
    pub person: usize,

    /// Override the person's goal
    #[arg(long)]
    pub goal: Option<String>,

    /// Override the person's interests
    #[arg(long)]
    pub interests: Option<String>,

    /// Skip the model call
    #[arg(long)]
    pub no_score: bool,

    /// Write the page here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// JSON array of activities
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = DashboardConfig::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        match self.command {
            Command::Highlight(args) => run_highlight(&config, args),
            Command::Render(args) => run_render(&config, args).await,
            Command::List(args) => run_list(args),
        }
    }
}

fn run_highlight(config: &DashboardConfig, args: HighlightArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.labels)
        .with_context(|| format!("Failed to read labels {}", args.labels.display()))?;
    let entries = LabelEntry::parse_lenient(&raw)
        .with_context(|| format!("Failed to parse labels {}", args.labels.display()))?;

    let renderer = Renderer::new(config.highlight.clone())?;
    let rendered = renderer.highlight(&args.text, &entries);
    info!(
        labels = entries.len(),
        colors = rendered.colors.len(),
        "rendered highlights"
    );
    println!("{}", rendered.html);
    Ok(())
}

async fn run_render(config: &DashboardConfig, args: RenderArgs) -> Result<()> {
    let activities = load_activities(&args.data)?;
    let mut session = if args.no_score {
        None
    } else {
        let client: Arc<dyn ChatClient> = Arc::new(LmStudioClient::new(&config.model)?);
        Some(ScoringSession::new(client))
    };

    let selection = Selection {
        activity: args.activity,
        person: args.person,
        goal: args.goal,
        interests: args.interests,
    };
    let view = build_view(config, &activities, &selection, session.as_mut()).await?;
    let page = render_page(&view);

    match args.out {
        Some(path) => write_page(&path, &page)?,
        None => print!("{page}"),
    }
    Ok(())
}

fn write_page(path: &Path, page: &str) -> Result<()> {
    std::fs::write(path, page)
        .with_context(|| format!("Failed to write page {}", path.display()))?;
    info!("wrote dashboard page to {}", path.display());
    Ok(())
}

fn run_list(args: ListArgs) -> Result<()> {
    let activities = load_activities(&args.data)?;
    for (index, activity) in activities.iter().enumerate() {
        println!(
            "{index}\t{}\t{}",
            activity.annotations().len(),
            preview(&activity.text)
        );
    }
    Ok(())
}

/// First line of `text`, cut to [`PREVIEW_CHARS`] characters
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= PREVIEW_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

/// Which activity and person a page shows, with optional overrides
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub activity: usize,
    pub person: usize,
    pub goal: Option<String>,
    pub interests: Option<String>,
}

/// Scoring state that outlives a single render: the job board with its last
/// shown scores, and the goal/interests each person was last scored with.
pub struct ScoringSession {
    board: JobBoard,
    settings: HashMap<usize, (String, String)>,
}

impl ScoringSession {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            board: JobBoard::new(ScoringWorker::new(client)),
            settings: HashMap::new(),
        }
    }

    pub fn board(&self) -> &JobBoard {
        &self.board
    }

    /// Drop every job once `person`'s goal or interests differ from the ones
    /// last scored. Last shown scores survive so gauges keep animating from
    /// the previous value.
    fn sync_settings(&mut self, person: usize, goal: &str, interests: &str) {
        let current = (goal.to_string(), interests.to_string());
        let changed = self
            .settings
            .insert(person, current)
            .is_some_and(|(old_goal, old_interests)| old_goal != goal || old_interests != interests);
        if changed {
            info!(person, "person settings changed, resetting scoring jobs");
            self.board.reset();
        }
    }
}

/// Highlight the selected activity, score it when a `session` is given and
/// collect everything the page shows.
pub async fn build_view(
    config: &DashboardConfig,
    activities: &[Activity],
    selection: &Selection,
    session: Option<&mut ScoringSession>,
) -> Result<PageView> {
    let activity = activity_at(activities, selection.activity)?;
    let person = config.person(selection.person).ok_or_else(|| {
        anyhow!(
            "Person {} out of range ({} configured)",
            selection.person,
            config.persons.len()
        )
    })?;
    let goal = selection
        .goal
        .clone()
        .unwrap_or_else(|| config.goal_for(selection.person).to_string());
    let interests = selection
        .interests
        .clone()
        .unwrap_or_else(|| config.interests_for(selection.person).to_string());

    let renderer = Renderer::new(config.highlight.clone())?;
    let highlighted = renderer.highlight(&activity.text, &activity.annotations()).html;

    let (score, gauge) = match session {
        None => (ScoreState::Disabled, None),
        Some(session) => {
            session.sync_settings(selection.person, &goal, &interests);
            let board = &mut session.board;
            let key = JobKey::new(selection.activity, selection.person);
            board.submit(
                key,
                ScoreRequest {
                    activity_text: activity.text.clone(),
                    labels: activity.detailed.clone(),
                    person_skills: person.skills.clone(),
                    goal: goal.clone(),
                    interests: interests.clone(),
                    person_index: selection.person,
                },
            );

            let title = format!("Person {}", selection.person + 1);
            let start = board.last_score(key);
            match board.wait(key, config.poll).await {
                JobStatus::Done(score) => {
                    let percent = score.percent();
                    board.record_final(key, percent);
                    info!(%key, percent, recommend = score.recommend, "scored activity");
                    let gauge = GaugeSpec::new(percent, Some(&title), None).with_start(start);
                    (ScoreState::Done(score), Some(gauge))
                }
                status => {
                    warn!(%key, ?status, "no score within the poll budget");
                    (ScoreState::Pending, Some(GaugeSpec::new(start, Some(&title), None)))
                }
            }
        }
    };

    Ok(PageView {
        activity_index: selection.activity,
        activity_count: activities.len(),
        person_index: selection.person,
        goal,
        interests,
        highlighted,
        score,
        gauge,
        skills: SkillTable::build(activity, person),
    })
}
