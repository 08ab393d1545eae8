//! ESCO dashboard: one HTML page per (activity, person) showing the
//! highlighted activity text, the model's match score as a gauge, and a
//! skill table comparing predictions, ground truth and the person's skills.
//!
//! The `esco-dashboard` binary wraps [`cli::Cli`]; everything it does is
//! reachable from the library so it can be tested without a terminal.

pub mod cli;
pub mod config;
pub mod dataset;
mod error;
pub mod gauge;
pub mod page;
pub mod skill_table;

pub use config::{DashboardConfig, PersonProfile};
pub use dataset::{Activity, load_activities};
pub use error::{ConfigError, DatasetError};
pub use gauge::GaugeSpec;
pub use page::{PageView, ScoreState, render_page};
pub use skill_table::{SkillRow, SkillTable};
