use crate::error::ConfigError;
use esco_highlight::HighlightConfig;
use esco_scoring::{ModelConfig, PollPolicy};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "esco-dashboard.toml";

pub const DEFAULT_GOAL: &str = "I want to go outside more often";
pub const DEFAULT_INTERESTS: &str = "Computer Games, Cinema, Pets";

/// Skill profile of one person, with optional per-person settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonProfile {
    pub skills: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl PersonProfile {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            goal: None,
            interests: None,
        }
    }

    /// True when the person lists `skill`, ignoring surrounding whitespace
    pub fn has_skill(&self, skill: &str) -> bool {
        let skill = skill.trim();
        self.skills.iter().any(|s| s.trim() == skill)
    }
}

/// Dashboard configuration, usually loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_goal")]
    pub default_goal: String,

    #[serde(default = "default_interests")]
    pub default_interests: String,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub poll: PollPolicy,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default = "default_persons")]
    pub persons: Vec<PersonProfile>,
}

fn default_goal() -> String {
    DEFAULT_GOAL.to_string()
}

fn default_interests() -> String {
    DEFAULT_INTERESTS.to_string()
}

fn default_persons() -> Vec<PersonProfile> {
    vec![
        PersonProfile::new([
            "assume responsibility",
            "meet commitments",
            "demonstrate trustworthiness",
            "manage time",
            "cope with stress",
            "manage frustration",
            "maintain psychological well-being",
            "exercise self-reflection",
            "think critically",
            "solve problems",
            "identify problems",
            "think analytically",
            "critically evaluate information and its sources",
            "work in teams",
            "show empathy",
            "accept criticism and guidance",
            "resolve conflicts",
            "negotiate compromises",
            "address an audience",
            "organise information, objects and resources",
            "express yourself creatively",
            "adapt to change",
            "cope with uncertainty",
            "demonstrate willingness to learn",
            "keep an open mind",
            "respect the diversity of cultural values and norms",
            "exercise rights and responsibilities",
            "promote the principles of democracy and rule of law",
            "evaluate environmental impact of personal behaviour",
            "think creatively",
            "think innovately",
            "show initiative",
        ]),
        PersonProfile::new([
            "show determination",
            "show commitment",
            "work efficiently",
            "attend to detail",
            "plan",
            "maintain concentration for long periods",
            "organise information, objects and resources",
            "delegate responsibilities",
            "manage quality",
            "comply with regulations",
            "report facts",
            "apply digital security measures",
            "use equipment, tools or technology with precision",
            "apply hygiene standards",
            "respect confidentiality obligations",
        ]),
        PersonProfile::new([
            "demonstrate curiosity",
            "demonstrate willingness to learn",
            "think creatively",
            "think innovately",
            "improvise",
            "build networks",
            "show entrepreneurial spirit",
            "motivate others",
            "express yourself creatively",
            "build team spirit",
            "promote ideas, products, services",
            "create digital content",
            "conduct web searches",
            "apply basic programming skills",
            "operate digital hardware",
            "use communication and collaboration software",
            "manage digital identity",
        ]),
        PersonProfile::new([
            "accept criticism and guidance",
            "show empathy",
            "demonstrate intercultural competence",
            "moderate a discussion",
            "address an audience",
            "negotiate compromises",
            "resolve conflicts",
            "demonstrate loyalty",
            "demonstrate trustworthiness",
            "participate actively in civic life",
            "promote the principles of democracy and rule of law",
            "respect the diversity of cultural values and norms",
            "appreciate diverse cultural and artistic expression",
            "engage others in environment friendly behaviours",
        ]),
        PersonProfile::new([
            "adjust to physical demands",
            "maintain physical fitness",
            "cope with uncertainty",
            "react to physical changes or hazards",
            "manage chronic health conditions",
            "make an informed use of the health-care system",
            "apply knowledge of science, technology and engineering",
            "apply knowledge of philosophy, ethics and religion",
            "apply knowledge of social sciences and humanities",
            "evaluate environmental impact of personal behaviour",
            "adopt ways to reduce pollution",
            "adopt ways to reduce negative impact of consumption",
            "adopt ways to foster biodiversity and animal welfare",
            "protect the health of others",
            "demonstrate awareness of health risks",
        ]),
    ]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_goal: default_goal(),
            default_interests: default_interests(),
            model: ModelConfig::default(),
            poll: PollPolicy::default(),
            highlight: HighlightConfig::default(),
            persons: default_persons(),
        }
    }
}

impl DashboardConfig {
    /// Load the config at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(ConfigError::Invalid)?;
        info!(
            "loaded config from {} ({} persons)",
            path.display(),
            config.persons.len()
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.highlight.validate()?;
        self.model.validate()?;
        self.poll.validate()?;

        if self.persons.is_empty() {
            return Err("at least one person must be configured".to_string());
        }

        Ok(())
    }

    pub fn person(&self, index: usize) -> Option<&PersonProfile> {
        self.persons.get(index)
    }

    /// Goal for `person`, falling back to `default_goal`
    pub fn goal_for(&self, person: usize) -> &str {
        self.person(person)
            .and_then(|p| p.goal.as_deref())
            .unwrap_or(&self.default_goal)
    }

    /// Interests for `person`, falling back to `default_interests`
    pub fn interests_for(&self, person: usize) -> &str {
        self.person(person)
            .and_then(|p| p.interests.as_deref())
            .unwrap_or(&self.default_interests)
    }
}
