//! dashboard::charts
//!
//! Chart data derived from a profile and its repositories.
//!
//! # Design
//!
//! Every function here is pure: no I/O, no mutation of its inputs, and the
//! same inputs always give the same output. Nothing is cached; callers
//! recompute whenever the profile or repository list changes.
//!
//! Series keep the order of the repository list they were built from, which
//! is GitHub's "most recently updated first".
//!
//! # Example
//!
//! ```
//! use githunts::dashboard::charts::{language_histogram, popularity_bubbles};
//! use githunts::github::mock::sample_repo;
//!
//! let repos = vec![
//!     sample_repo("a", 10, 2, Some("Rust"), 3),
//!     sample_repo("b", 4, 0, None, 2),
//! ];
//!
//! let languages = language_histogram(&repos);
//! assert_eq!(languages.get("Rust"), Some(&1));
//! assert_eq!(languages.len(), 1);
//!
//! assert_eq!(popularity_bubbles(&repos).len(), 2);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::{Profile, RepositorySummary};

/// Smallest bubble radius.
pub const MIN_BUBBLE_RADIUS: f64 = 5.0;

/// Largest bubble radius.
pub const MAX_BUBBLE_RADIUS: f64 = 20.0;

/// Days per year used for account age.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// The eight chart variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Activity,
    TopRepos,
    RepoSize,
    Radar,
    Languages,
    Issues,
    Popularity,
    Engagement,
}

/// Error for an unrecognised chart name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown chart '{0}' (expected one of: activity, top-repos, repo-size, radar, languages, issues, popularity, engagement)")]
pub struct UnknownChart(pub String);

impl ChartKind {
    /// All kinds in selector order.
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Activity,
        ChartKind::TopRepos,
        ChartKind::RepoSize,
        ChartKind::Radar,
        ChartKind::Languages,
        ChartKind::Issues,
        ChartKind::Popularity,
        ChartKind::Engagement,
    ];

    /// Name used on the command line and in config.
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Activity => "activity",
            ChartKind::TopRepos => "top-repos",
            ChartKind::RepoSize => "repo-size",
            ChartKind::Radar => "radar",
            ChartKind::Languages => "languages",
            ChartKind::Issues => "issues",
            ChartKind::Popularity => "popularity",
            ChartKind::Engagement => "engagement",
        }
    }

    /// Heading shown above the chart.
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Activity => "Activity Overview",
            ChartKind::TopRepos => "Top Repositories - Stars & Forks",
            ChartKind::RepoSize => "Repository Sizes (KB)",
            ChartKind::Radar => "Activity Radar",
            ChartKind::Languages => "Language Distribution",
            ChartKind::Issues => "Open Issues by Repository",
            ChartKind::Popularity => "Repository Popularity (Forks vs Stars)",
            ChartKind::Engagement => "Engagement Ratios",
        }
    }

    /// One-line description for `githunts charts`.
    pub fn description(self) -> &'static str {
        match self {
            ChartKind::Activity => "followers, following, public repos and gists",
            ChartKind::TopRepos => "stars and forks per repository",
            ChartKind::RepoSize => "size in KB per repository",
            ChartKind::Radar => "profile counts plus total stars",
            ChartKind::Languages => "repositories per primary language",
            ChartKind::Issues => "open issues per repository",
            ChartKind::Popularity => "forks vs stars, sized by watchers",
            ChartKind::Engagement => "followers, stars and watchers ratios",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ChartKind {
    type Err = UnknownChart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownChart(s.to_string()))
    }
}

/// Labelled series of one value per repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Stars and forks per repository, in parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopRepositories {
    pub labels: Vec<String>,
    pub stars: Vec<u64>,
    pub forks: Vec<u64>,
}

/// One repository on the popularity chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub label: String,
    /// Fork count
    pub x: u64,
    /// Star count
    pub y: u64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngagementRatios {
    pub followers_per_following: f64,
    pub stars_per_repo: f64,
    pub watchers_per_repo: f64,
}

impl EngagementRatios {
    pub fn as_array(&self) -> [f64; 3] {
        [
            self.followers_per_following,
            self.stars_per_repo,
            self.watchers_per_repo,
        ]
    }
}

/// Data for one chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartData {
    Activity { counts: [u64; 4] },
    TopRepos(TopRepositories),
    RepoSize(Series),
    Radar { values: [u64; 5] },
    Languages { histogram: BTreeMap<String, u64> },
    Issues(Series),
    Popularity { points: Vec<BubblePoint> },
    Engagement(EngagementRatios),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Activity { .. } => ChartKind::Activity,
            ChartData::TopRepos(_) => ChartKind::TopRepos,
            ChartData::RepoSize(_) => ChartKind::RepoSize,
            ChartData::Radar { .. } => ChartKind::Radar,
            ChartData::Languages { .. } => ChartKind::Languages,
            ChartData::Issues(_) => ChartKind::Issues,
            ChartData::Popularity { .. } => ChartKind::Popularity,
            ChartData::Engagement(_) => ChartKind::Engagement,
        }
    }
}

/// Labels for [`overview_counts`].
pub const OVERVIEW_LABELS: [&str; 4] = ["Followers", "Following", "Public Repos", "Public Gists"];

/// Labels for [`activity_radar`].
pub const RADAR_LABELS: [&str; 5] = ["Followers", "Following", "Repos", "Gists", "Stars"];

/// Labels for [`engagement_ratios`].
pub const ENGAGEMENT_LABELS: [&str; 3] = [
    "Followers to Following",
    "Stars to Repos",
    "Watchers to Repos",
];

/// Followers, following, public repos, public gists.
pub fn overview_counts(profile: &Profile) -> [u64; 4] {
    [
        profile.follower_count,
        profile.following_count,
        profile.public_repo_count,
        profile.public_gist_count,
    ]
}

pub fn top_repositories(repos: &[RepositorySummary]) -> TopRepositories {
    TopRepositories {
        labels: names(repos),
        stars: repos.iter().map(|r| r.star_count).collect(),
        forks: repos.iter().map(|r| r.fork_count).collect(),
    }
}

pub fn size_series(repos: &[RepositorySummary]) -> Series {
    series(repos, |r| r.size_kb)
}

pub fn issues_series(repos: &[RepositorySummary]) -> Series {
    series(repos, |r| r.open_issue_count)
}

/// The overview counts followed by the total stars across `repos`.
pub fn activity_radar(profile: &Profile, repos: &[RepositorySummary]) -> [u64; 5] {
    let [followers, following, public_repos, public_gists] = overview_counts(profile);
    [
        followers,
        following,
        public_repos,
        public_gists,
        total_stars(repos),
    ]
}

/// Repositories per language.
///
/// Repositories without a language, or with a blank one, are left out
/// entirely rather than counted under an "unknown" bucket. Names are
/// trimmed, so `" Go"` and `"Go"` share a bucket.
pub fn language_histogram(repos: &[RepositorySummary]) -> BTreeMap<String, u64> {
    let mut histogram = BTreeMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        let language = language.trim();
        if language.is_empty() {
            continue;
        }
        *histogram.entry(language.to_string()).or_insert(0) += 1;
    }
    histogram
}

/// One point per repository: forks on x, stars on y, radius from watchers.
pub fn popularity_bubbles(repos: &[RepositorySummary]) -> Vec<BubblePoint> {
    repos
        .iter()
        .map(|r| BubblePoint {
            label: r.name.clone(),
            x: r.fork_count,
            y: r.star_count,
            radius: bubble_radius(r.watcher_count),
        })
        .collect()
}

/// Half the watcher count, clamped to [5, 20]. Zero watchers gives the floor.
pub fn bubble_radius(watchers: u64) -> f64 {
    if watchers == 0 {
        return MIN_BUBBLE_RADIUS;
    }
    (watchers as f64 / 2.0).clamp(MIN_BUBBLE_RADIUS, MAX_BUBBLE_RADIUS)
}

/// Ratios with a zero denominator replaced by 1.
pub fn engagement_ratios(profile: &Profile, repos: &[RepositorySummary]) -> EngagementRatios {
    let repo_count = profile.public_repo_count.max(1) as f64;
    let watchers: u64 = repos.iter().map(|r| r.watcher_count).sum();
    EngagementRatios {
        followers_per_following: profile.follower_count as f64
            / profile.following_count.max(1) as f64,
        stars_per_repo: total_stars(repos) as f64 / repo_count,
        watchers_per_repo: watchers as f64 / repo_count,
    }
}

/// Years between `created_at` and `now`, rounded to one decimal place.
pub fn account_age_years(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - created_at).num_seconds() as f64 / 86_400.0;
    (days / DAYS_PER_YEAR * 10.0).round() / 10.0
}

/// Build the data set for one chart kind.
pub fn derive(kind: ChartKind, profile: &Profile, repos: &[RepositorySummary]) -> ChartData {
    match kind {
        ChartKind::Activity => ChartData::Activity {
            counts: overview_counts(profile),
        },
        ChartKind::TopRepos => ChartData::TopRepos(top_repositories(repos)),
        ChartKind::RepoSize => ChartData::RepoSize(size_series(repos)),
        ChartKind::Radar => ChartData::Radar {
            values: activity_radar(profile, repos),
        },
        ChartKind::Languages => ChartData::Languages {
            histogram: language_histogram(repos),
        },
        ChartKind::Issues => ChartData::Issues(issues_series(repos)),
        ChartKind::Popularity => ChartData::Popularity {
            points: popularity_bubbles(repos),
        },
        ChartKind::Engagement => ChartData::Engagement(engagement_ratios(profile, repos)),
    }
}

fn total_stars(repos: &[RepositorySummary]) -> u64 {
    repos.iter().map(|r| r.star_count).sum()
}

fn names(repos: &[RepositorySummary]) -> Vec<String> {
    repos.iter().map(|r| r.name.clone()).collect()
}

fn series(repos: &[RepositorySummary], value: impl Fn(&RepositorySummary) -> u64) -> Series {
    Series {
        labels: names(repos),
        values: repos.iter().map(value).collect(),
    }
}
