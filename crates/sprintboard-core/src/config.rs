use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SprintError;
use crate::release::ReleaseState;
use crate::release::codec::LabelCodec;
use crate::release::ordering::ProductOrder;

/// Board-level settings consumed when a run context is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_product")]
    pub default_product: String,
    #[serde(default)]
    pub product_order: Vec<String>,
    #[serde(default)]
    pub include_backlog_default: bool,
    /// Release labels that mark work due in the release being frozen.
    #[serde(default)]
    pub current_release_labels: Vec<String>,
    #[serde(default)]
    pub states: StateSets,
    /// Tracker URL for a request; `{id}` is replaced by the request id.
    #[serde(default = "default_request_url_template")]
    pub request_url_template: String,
    /// Declaring any query replaces the whole built-in catalog.
    #[serde(default = "default_queries")]
    pub queries: BTreeMap<String, QueryDecl>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_product: default_product(),
            product_order: Vec::new(),
            include_backlog_default: false,
            current_release_labels: Vec::new(),
            states: StateSets::default(),
            request_url_template: default_request_url_template(),
            queries: default_queries(),
        }
    }
}

impl BoardConfig {
    /// Parse a TOML document and validate its patterns.
    pub fn from_toml_str(content: &str) -> Result<Self, SprintError> {
        let config: Self =
            toml::from_str(content).map_err(|e| SprintError::ConfigParse(e.to_string()))?;
        config.states.compile()?;
        Ok(config)
    }

    #[must_use]
    pub fn codec(&self) -> LabelCodec {
        LabelCodec::new(self.default_product.clone())
    }

    #[must_use]
    pub fn product_order(&self) -> ProductOrder {
        ProductOrder::new(self.product_order.iter().cloned())
    }
}

/// List-name sets and patterns describing the board's workflow stages.
///
/// These changed across deployments, so none of them are hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSets {
    /// Lists that make up the current sprint.
    #[serde(default = "default_sprint_lists")]
    pub sprint: Vec<String>,
    /// Lists whose items the team has accepted.
    #[serde(default = "default_accepted_lists")]
    pub accepted: Vec<String>,
    /// Lists whose items are complete but not yet accepted.
    #[serde(default = "default_complete_lists")]
    pub complete: Vec<String>,
    /// Lists holding work that is actively being done.
    #[serde(default = "default_in_progress_lists")]
    pub in_progress: Vec<String>,
    /// Lists archiving finished sprints (e.g. `Sprint 42`).
    #[serde(default = "default_completed_sprint_pattern")]
    pub completed_sprint_pattern: String,
    /// Name of the calendar card that describes the sprint itself.
    #[serde(default = "default_sprint_marker_pattern")]
    pub sprint_marker_pattern: String,
}

impl Default for StateSets {
    fn default() -> Self {
        Self {
            sprint: default_sprint_lists(),
            accepted: default_accepted_lists(),
            complete: default_complete_lists(),
            in_progress: default_in_progress_lists(),
            completed_sprint_pattern: default_completed_sprint_pattern(),
            sprint_marker_pattern: default_sprint_marker_pattern(),
        }
    }
}

/// [`StateSets`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledStates {
    pub sets: StateSets,
    pub completed_sprint: Regex,
    pub sprint_marker: Regex,
}

impl StateSets {
    pub fn compile(&self) -> Result<CompiledStates, SprintError> {
        Ok(CompiledStates {
            sets: self.clone(),
            completed_sprint: compile_pattern(
                "states.completed_sprint_pattern",
                &self.completed_sprint_pattern,
            )?,
            sprint_marker: compile_pattern(
                "states.sprint_marker_pattern",
                &self.sprint_marker_pattern,
            )?,
        })
    }

    /// True when `list` is one of the lists in the set named by `state`.
    #[must_use]
    pub fn contains(&self, state: ListState, list: &str) -> bool {
        let set = match state {
            ListState::Sprint => &self.sprint,
            ListState::Accepted => &self.accepted,
            ListState::Complete => &self.complete,
            ListState::InProgress => &self.in_progress,
        };
        set.iter().any(|name| name == list)
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, SprintError> {
    Regex::new(pattern).map_err(|e| SprintError::InvalidPattern {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Named list sets a rule can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    Sprint,
    Accepted,
    Complete,
    InProgress,
}

/// Item collections a root query can run over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Items in current-sprint lists, minus the sprint calendar card.
    Sprint,
    /// Sprint items not yet accepted plus every open backlog list.
    NotAccepted,
    /// Accepted sprint items plus archived sprint lists.
    AcceptedAndAfter,
    /// Every board item in one of the scopes above.
    All,
    /// Bug-tracker requests (RFEs), not board cards.
    Requests,
}

/// Declarative predicate over a single work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Carries at least one of the labels.
    HasLabel(Vec<String>),
    /// Sits in one of the named lists.
    InList(Vec<String>),
    /// Sits in a list from the named configured set.
    InState(ListState),
    /// Has a comment containing one of the strings.
    CommentContains(Vec<String>),
    /// Carries one of `current_release_labels`.
    CurrentRelease,
    /// Carries a release label in the given state.
    ReleaseState(ReleaseState),
    /// Some item in the scope links this item's tracker URL in its description.
    ReferencedBy(Scope),
    All(Vec<Rule>),
    Any(Vec<Rule>),
    Not(Box<Rule>),
}

/// One `[queries.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDecl {
    #[serde(default)]
    pub parent: Option<String>,
    /// Falls back to `include_backlog_default` when unset.
    #[serde(default)]
    pub include_backlog: Option<bool>,
    /// Root collection; overrides `include_backlog`. Ignored under a parent.
    #[serde(default)]
    pub scope: Option<Scope>,
    pub rule: Rule,
}

impl QueryDecl {
    #[must_use]
    pub const fn new(rule: Rule) -> Self {
        Self {
            parent: None,
            include_backlog: None,
            scope: None,
            rule,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub const fn with_backlog(mut self) -> Self {
        self.include_backlog = Some(true);
        self
    }

    #[must_use]
    pub const fn over(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

pub fn load_project_config(project_root: &Path) -> Result<BoardConfig> {
    let path = project_root.join(".sprintboard/config.toml");
    if !path.exists() {
        return Ok(BoardConfig::default());
    }
    load_config_file(&path)
}

pub fn load_user_config() -> Result<Option<BoardConfig>> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(None);
    };

    let path = config_dir.join("sprintboard/config.toml");
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

pub fn load_config_file(path: &Path) -> Result<BoardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = BoardConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), queries = config.queries.len(), "loaded board config");
    Ok(config)
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User,
    Defaults,
}

/// Resolve configuration by precedence: explicit path, project file, user
/// config dir, built-in defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
    project_root: &Path,
) -> Result<(BoardConfig, ConfigSource)> {
    if let Some(path) = explicit {
        return Ok((
            load_config_file(path)?,
            ConfigSource::Explicit(path.to_path_buf()),
        ));
    }

    let project_path = project_root.join(".sprintboard/config.toml");
    if project_path.exists() {
        return Ok((
            load_project_config(project_root)?,
            ConfigSource::Project(project_path),
        ));
    }

    if let Some(user) = load_user_config()? {
        return Ok((user, ConfigSource::User));
    }

    Ok((BoardConfig::default(), ConfigSource::Defaults))
}

fn default_product() -> String {
    "core".to_string()
}

fn default_sprint_lists() -> Vec<String> {
    ["Stalled", "In Progress", "Design", "Complete", "Accepted"]
        .map(String::from)
        .to_vec()
}

fn default_accepted_lists() -> Vec<String> {
    vec!["Accepted".to_string()]
}

fn default_complete_lists() -> Vec<String> {
    vec!["Complete".to_string()]
}

fn default_in_progress_lists() -> Vec<String> {
    ["In Progress", "Design"].map(String::from).to_vec()
}

fn default_completed_sprint_pattern() -> String {
    r"^Sprint \d+$".to_string()
}

fn default_sprint_marker_pattern() -> String {
    r"^Sprint (\d+)".to_string()
}

fn default_request_url_template() -> String {
    "https://bugzilla.redhat.com/show_bug.cgi?id={id}".to_string()
}

fn labels(names: &[&str]) -> Rule {
    Rule::HasLabel(names.iter().map(ToString::to_string).collect())
}

/// The release workflow: QE sign-off, acceptance, code freeze, requests.
fn default_queries() -> BTreeMap<String, QueryDecl> {
    let accepted = Rule::Any(vec![
        Rule::InState(ListState::Accepted),
        Rule::All(vec![Rule::InState(ListState::Complete), labels(&["no-qe"])]),
    ]);

    [
        (
            "needs_qe",
            QueryDecl::new(Rule::Not(Box::new(labels(&["no-qe"])))).with_parent("not_accepted"),
        ),
        (
            "qe_ready",
            QueryDecl::new(Rule::CommentContains(vec!["tcms".into(), "goo.gl".into()]))
                .with_parent("needs_qe"),
        ),
        (
            "approved",
            QueryDecl::new(labels(&["tc-approved", "no-qe"])).with_parent("qe_ready"),
        ),
        ("accepted", QueryDecl::new(accepted)),
        (
            "completed",
            QueryDecl::new(Rule::InState(ListState::Complete)).with_parent("not_accepted"),
        ),
        (
            "not_dcut_complete",
            QueryDecl::new(labels(&["devcut"])).with_parent("not_completed"),
        ),
        (
            "code_freeze_incomplete",
            QueryDecl::new(Rule::CurrentRelease).with_backlog(),
        ),
        (
            "stage1_incomplete",
            QueryDecl::new(labels(&["stage1-dep"]))
                .with_parent("code_freeze_incomplete")
                .with_backlog(),
        ),
        (
            "new_rfes",
            QueryDecl::new(Rule::Not(Box::new(Rule::ReferencedBy(Scope::All))))
                .over(Scope::Requests),
        ),
        (
            "complete_rfes",
            QueryDecl::new(Rule::ReferencedBy(Scope::AcceptedAndAfter)).over(Scope::Requests),
        ),
    ]
    .into_iter()
    .map(|(name, decl)| (name.to_string(), decl))
    .collect()
}
