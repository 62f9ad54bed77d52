//! The browsable worker directory.
//!
//! Workers and reviews are loaded once, joined in memory into [`WorkerCard`]s
//! and cached as a whole. Filtering and selection are pure functions over that
//! snapshot driven by an immutable [`BrowseState`].

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{profiles, reviews};

/// A worker profile annotated with its derived average rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerCard {
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub job: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub profile_picture: Option<String>,
    /// Mean of all ratings, 0.0 without reviews. Never rounded.
    pub avg_rating: f64,
    pub review_count: usize,
}

impl WorkerCard {
    pub fn new(profile: profiles::Model, ratings: &[i32]) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            address: profile.address,
            job: profile.job,
            phone: profile.phone,
            description: profile.description,
            profile_picture: profile.profile_picture,
            avg_rating: average_rating(ratings),
            review_count: ratings.len(),
        }
    }

    /// Drop the phone number for anonymous viewers.
    pub fn redacted(mut self) -> Self {
        self.phone = None;
        self
    }

    pub fn display_rating(&self) -> String {
        display_rating(self.avg_rating)
    }
}

pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

/// Star display value, one decimal.
pub fn display_rating(avg: f64) -> String {
    format!("{avg:.1}")
}

/// Join workers with every review in memory.
///
/// Reviews for profiles that are not in `workers` are ignored.
pub fn build(workers: Vec<profiles::Model>, reviews: &[reviews::Model]) -> Vec<WorkerCard> {
    let mut ratings: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for review in reviews {
        ratings.entry(review.worker_id).or_default().push(review.rating);
    }

    workers
        .into_iter()
        .map(|w| {
            let r = ratings.get(&w.user_id).map(Vec::as_slice).unwrap_or_default();
            WorkerCard::new(w, r)
        })
        .collect()
}

/// Trade and location filter. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFilter {
    #[serde(default)]
    pub trade: String,
    #[serde(default)]
    pub location: String,
}

impl WorkerFilter {
    pub fn is_active(&self) -> bool {
        !self.trade.trim().is_empty() || !self.location.trim().is_empty()
    }

    pub fn matches(&self, card: &WorkerCard) -> bool {
        field_matches(&self.trade, card.job.as_deref())
            && field_matches(&self.location, Some(&card.address))
    }

    /// Matching cards, best rated first. Ties keep directory order.
    pub fn apply<'a>(&self, cards: &'a [WorkerCard]) -> Vec<&'a WorkerCard> {
        let mut out: Vec<&WorkerCard> = cards.iter().filter(|c| self.matches(c)).collect();
        out.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));
        out
    }
}

fn field_matches(wanted: &str, actual: Option<&str>) -> bool {
    let wanted = wanted.trim();
    if wanted.is_empty() {
        return true;
    }
    actual.is_some_and(|a| a.trim().to_lowercase() == wanted.to_lowercase())
}

/// Browse page state. Every change goes through [`BrowseState::apply`] and
/// yields a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    pub filter: WorkerFilter,
    pub selected: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    ApplyFilters(WorkerFilter),
    Select(Uuid),
    ClearSelection,
}

impl BrowseState {
    pub fn apply(&self, action: BrowseAction) -> Self {
        match action {
            BrowseAction::ApplyFilters(filter) => Self {
                filter,
                selected: self.selected,
            },
            BrowseAction::Select(id) => Self {
                filter: self.filter.clone(),
                selected: Some(id),
            },
            BrowseAction::ClearSelection => Self {
                filter: self.filter.clone(),
                selected: None,
            },
        }
    }

    /// Heading shown above the results list.
    pub fn heading(&self, count: usize) -> String {
        if self.filter.is_active() {
            format!("Found {count} worker(s) matching your filter")
        } else {
            format!("Showing all {count} workers")
        }
    }

    pub fn empty_message(&self) -> &'static str {
        if self.filter.is_active() {
            "No matching workers found."
        } else {
            "No workers available."
        }
    }
}

/// Query string of `GET /api/workers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub trade: String,
    #[serde(default)]
    pub location: String,
    pub selected: Option<Uuid>,
}

impl From<BrowseQuery> for BrowseState {
    fn from(q: BrowseQuery) -> Self {
        let state = BrowseState::default().apply(BrowseAction::ApplyFilters(WorkerFilter {
            trade: q.trade,
            location: q.location,
        }));
        match q.selected {
            Some(id) => state.apply(BrowseAction::Select(id)),
            None => state,
        }
    }
}

/// Response of `GET /api/workers`.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
    pub heading: String,
    pub empty_message: Option<&'static str>,
    pub filter: WorkerFilter,
    pub results: Vec<WorkerCard>,
    pub selected: Option<WorkerCard>,
}

impl BrowseResponse {
    /// Filter the directory snapshot for `state`. `anonymous` strips phone numbers.
    pub fn render(state: &BrowseState, directory: &[WorkerCard], anonymous: bool) -> Self {
        let present = |c: &WorkerCard| {
            if anonymous {
                c.clone().redacted()
            } else {
                c.clone()
            }
        };

        let results: Vec<WorkerCard> = state.filter.apply(directory).into_iter().map(present).collect();
        let selected = state
            .selected
            .and_then(|id| directory.iter().find(|c| c.user_id == id))
            .map(present);

        Self {
            heading: state.heading(results.len()),
            empty_message: results.is_empty().then(|| state.empty_message()),
            filter: state.filter.clone(),
            results,
            selected,
        }
    }
}

/// Response of `GET /api/workers/{user_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerDetail {
    #[serde(flatten)]
    pub card: WorkerCard,
    pub display_rating: String,
    pub reviews: Vec<reviews::ReviewResponse>,
    pub gallery: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn worker(name: &str, job: &str, address: &str) -> profiles::Model {
        profiles::Model {
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            address: address.to_string(),
            role: profiles::Role::Worker,
            job: Some(job.to_string()),
            phone: Some("+216 20 000 000".to_string()),
            description: None,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn review(worker_id: Uuid, rating: i32) -> reviews::Model {
        reviews::Model {
            id: Uuid::new_v4(),
            worker_id,
            reviewer_id: Uuid::new_v4(),
            rating,
            comment: "ok".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn worker_without_reviews_rates_zero() {
        let cards = build(vec![worker("Sami", "Plombier Sanitaire", "Tunis")], &[]);
        assert_eq!(cards[0].avg_rating, 0.0);
        assert_eq!(cards[0].review_count, 0);
    }

    #[test]
    fn average_is_exact_mean_and_display_rounds() {
        let w = worker("Sami", "Plombier Sanitaire", "Tunis");
        let id = w.user_id;
        let reviews = vec![review(id, 5), review(id, 4), review(id, 4)];
        let cards = build(vec![w], &reviews);

        assert!((cards[0].avg_rating - 13.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(cards[0].display_rating(), "4.3");
    }

    #[test]
    fn reviews_of_other_workers_do_not_leak() {
        let a = worker("A", "Plaquiste", "Sfax");
        let b = worker("B", "Plaquiste", "Sfax");
        let reviews = vec![review(b.user_id, 1)];
        let cards = build(vec![a, b], &reviews);
        assert_eq!(cards[0].avg_rating, 0.0);
        assert_eq!(cards[1].avg_rating, 1.0);
    }

    #[test]
    fn filter_is_case_insensitive_equality_on_both_fields() {
        let cards = build(
            vec![
                worker("A", "Plumber", "Tunis"),
                worker("B", "Plumber", "Sfax"),
                worker("C", "Electrician", "Tunis"),
            ],
            &[],
        );
        let filter = WorkerFilter {
            trade: "plumber".into(),
            location: "TUNIS".into(),
        };
        let out = filter.apply(&cards);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "A");

        let partial = WorkerFilter {
            trade: "Plumb".into(),
            location: String::new(),
        };
        assert!(partial.apply(&cards).is_empty());
    }

    #[test]
    fn cleared_filter_returns_everything_sorted_by_rating() {
        let a = worker("A", "Plumber", "Tunis");
        let b = worker("B", "Plumber", "Sfax");
        let c = worker("C", "Plumber", "Sousse");
        let reviews = vec![review(b.user_id, 5), review(c.user_id, 3)];
        let cards = build(vec![a, b, c], &reviews);

        let names: Vec<_> = WorkerFilter::default()
            .apply(&cards)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn equal_ratings_keep_directory_order() {
        let cards = build(
            vec![worker("A", "x", "y"), worker("B", "x", "y"), worker("C", "x", "y")],
            &[],
        );
        let names: Vec<_> = WorkerFilter::default()
            .apply(&cards)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn browse_state_updates_are_pure() {
        let id = Uuid::new_v4();
        let start = BrowseState::default();
        let selected = start.apply(BrowseAction::Select(id));
        let filtered = selected.apply(BrowseAction::ApplyFilters(WorkerFilter {
            trade: "Frigoriste".into(),
            location: String::new(),
        }));

        assert_eq!(start, BrowseState::default());
        assert_eq!(filtered.selected, Some(id));
        assert_eq!(filtered.apply(BrowseAction::ClearSelection).selected, None);
    }

    #[test]
    fn heading_depends_on_filter() {
        let state = BrowseState::default();
        assert_eq!(state.heading(7), "Showing all 7 workers");
        assert_eq!(state.empty_message(), "No workers available.");

        let state = state.apply(BrowseAction::ApplyFilters(WorkerFilter {
            trade: String::new(),
            location: "Gabès".into(),
        }));
        assert_eq!(state.heading(2), "Found 2 worker(s) matching your filter");
        assert_eq!(state.empty_message(), "No matching workers found.");
    }

    #[test]
    fn anonymous_render_hides_phone() {
        let w = worker("A", "Plumber", "Tunis");
        let id = w.user_id;
        let cards = build(vec![w], &[]);
        let state = BrowseState::from(BrowseQuery {
            selected: Some(id),
            ..Default::default()
        });

        let anon = BrowseResponse::render(&state, &cards, true);
        assert!(anon.results[0].phone.is_none());
        assert!(anon.selected.as_ref().is_some_and(|s| s.phone.is_none()));

        let signed_in = BrowseResponse::render(&state, &cards, false);
        assert!(signed_in.results[0].phone.is_some());
    }

    #[test]
    fn catalog_lists_are_complete() {
        let c = catalog::catalog();
        assert_eq!(c.trades.len(), 30);
        assert_eq!(c.locations.len(), 24);
        assert!(c.locations.contains(&"Tunis"));
    }
}
