//! Evaluation of configured [`Rule`] predicates.

use sprintboard_core::LabelCodec;
use sprintboard_core::config::{BoardConfig, Rule, StateSets};
use sprintboard_core::model::{ItemId, WorkItem};

use super::universe::Universe;

const REQUEST_ID_PLACEHOLDER: &str = "{id}";

/// Board settings a rule needs besides the item itself.
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub states: StateSets,
    pub current_release_labels: Vec<String>,
    pub codec: LabelCodec,
    pub request_url_template: String,
}

impl RuleContext {
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            states: config.states.clone(),
            current_release_labels: config.current_release_labels.clone(),
            codec: config.codec(),
            request_url_template: config.request_url_template.clone(),
        }
    }

    /// Tracker URL of the request `id`.
    #[must_use]
    pub fn request_url(&self, id: &ItemId) -> String {
        self.request_url_template.replace(REQUEST_ID_PLACEHOLDER, id.as_str())
    }

    /// Evaluate `rule` for `item`. `universe` backs the cross-item rules.
    #[must_use]
    pub fn matches(&self, rule: &Rule, item: &WorkItem, universe: &Universe) -> bool {
        match rule {
            Rule::HasLabel(labels) => item.has_any_label(labels),
            Rule::InList(lists) => lists.iter().any(|l| *l == item.list.name),
            Rule::InState(state) => self.states.contains(*state, &item.list.name),
            Rule::CommentContains(needles) => item.has_comment_containing(needles),
            // No configured labels means nothing is in the current release.
            Rule::CurrentRelease => item.has_any_label(&self.current_release_labels),
            Rule::ReleaseState(state) => item
                .labels
                .iter()
                .filter_map(|l| self.codec.decode(l))
                .any(|tag| tag.state == *state),
            Rule::ReferencedBy(scope) => {
                let url = self.request_url(&item.id);
                universe
                    .iter_scope(*scope)
                    .any(|other| links_to(&other.description, &url))
            }
            Rule::All(rules) => rules.iter().all(|r| self.matches(r, item, universe)),
            Rule::Any(rules) => rules.iter().any(|r| self.matches(r, item, universe)),
            Rule::Not(rule) => !self.matches(rule, item, universe),
        }
    }
}

/// True when `text` contains `url` not directly followed by more id digits.
fn links_to(text: &str, url: &str) -> bool {
    text.match_indices(url).any(|(start, _)| {
        !text[start + url.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintboard_core::ReleaseState;
    use sprintboard_core::config::{ListState, Scope};
    use sprintboard_core::model::ListRef;

    fn ctx() -> RuleContext {
        RuleContext {
            states: StateSets::default(),
            current_release_labels: vec!["committed-3.1".to_string()],
            codec: LabelCodec::new("core"),
            request_url_template: "https://bugs.example.com/show_bug.cgi?id={id}".to_string(),
        }
    }

    fn item(list: &str, labels: &[&str]) -> WorkItem {
        WorkItem::new("a", ListRef::open(list), 1.0).with_labels(labels.iter().copied())
    }

    fn empty() -> Universe {
        Universe::default()
    }

    #[test]
    fn leaf_rules() {
        let ctx = ctx();
        let u = empty();
        let it = item("Complete", &["no-qe", "targeted-web-2.0"]);

        assert!(ctx.matches(&Rule::HasLabel(vec!["no-qe".into()]), &it, &u));
        assert!(!ctx.matches(&Rule::HasLabel(vec!["tc-approved".into()]), &it, &u));
        assert!(ctx.matches(&Rule::InList(vec!["Complete".into()]), &it, &u));
        assert!(ctx.matches(&Rule::InState(ListState::Complete), &it, &u));
        assert!(ctx.matches(&Rule::InState(ListState::Sprint), &it, &u));
        assert!(!ctx.matches(&Rule::InState(ListState::Accepted), &it, &u));
        assert!(ctx.matches(&Rule::ReleaseState(ReleaseState::Targeted), &it, &u));
        assert!(!ctx.matches(&Rule::ReleaseState(ReleaseState::Committed), &it, &u));
        assert!(!ctx.matches(&Rule::CurrentRelease, &it, &u));
        assert!(ctx.matches(&Rule::CurrentRelease, &item("Next", &["committed-3.1"]), &u));
    }

    #[test]
    fn comment_rule_matches_substrings() {
        let ctx = ctx();
        let u = empty();
        let it = item("Complete", &[]).with_comments(["Stage 1 verified on int"]);
        assert!(ctx.matches(&Rule::CommentContains(vec!["verified".into()]), &it, &u));
        assert!(!ctx.matches(&Rule::CommentContains(vec!["blocked".into()]), &it, &u));
    }

    #[test]
    fn combinators_nest() {
        let ctx = ctx();
        let u = empty();
        let accepted = Rule::Any(vec![
            Rule::InState(ListState::Accepted),
            Rule::All(vec![
                Rule::InState(ListState::Complete),
                Rule::HasLabel(vec!["no-qe".into()]),
            ]),
        ]);

        assert!(ctx.matches(&accepted, &item("Accepted", &[]), &u));
        assert!(ctx.matches(&accepted, &item("Complete", &["no-qe"]), &u));
        assert!(!ctx.matches(&accepted, &item("Complete", &[]), &u));
        assert!(ctx.matches(&Rule::Not(Box::new(accepted)), &item("In Progress", &[]), &u));
    }

    #[test]
    fn empty_current_release_matches_nothing() {
        let mut ctx = ctx();
        let u = empty();
        ctx.current_release_labels.clear();
        assert!(!ctx.matches(&Rule::CurrentRelease, &item("Next", &["committed-3.1"]), &u));
    }

    #[test]
    fn referenced_by_looks_for_the_tracker_url_in_the_scope() {
        let ctx = ctx();
        let story = WorkItem::new("s1", ListRef::open("Accepted"), 1.0)
            .with_description("Implements https://bugs.example.com/show_bug.cgi?id=1201");
        let universe = Universe::uniform(vec![story]);
        let rule = Rule::ReferencedBy(Scope::AcceptedAndAfter);

        let linked = WorkItem::new("1201", ListRef::open("NEW"), 0.0);
        let unlinked = WorkItem::new("1202", ListRef::open("NEW"), 0.0);
        let prefix = WorkItem::new("120", ListRef::open("NEW"), 0.0);
        assert!(ctx.matches(&rule, &linked, &universe));
        assert!(!ctx.matches(&rule, &unlinked, &universe));
        assert!(!ctx.matches(&rule, &prefix, &universe));
        assert!(!ctx.matches(&rule, &linked, &empty()));
    }

    #[test]
    fn request_url_fills_the_id() {
        assert_eq!(
            ctx().request_url(&ItemId::new("42")),
            "https://bugs.example.com/show_bug.cgi?id=42"
        );
    }
}
