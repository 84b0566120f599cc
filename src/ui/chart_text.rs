//! ui::chart_text
//!
//! Plain-text rendering of chart data for the terminal.
//!
//! Values are drawn as horizontal bars scaled to the largest value in the
//! same series. Bubble points have no sensible bar form and are listed.

use super::output::format_count;
use crate::dashboard::charts::{
    ChartData, Series, ENGAGEMENT_LABELS, OVERVIEW_LABELS, RADAR_LABELS,
};

/// Width of the longest bar, in characters.
pub const BAR_WIDTH: usize = 30;

const BAR_CHAR: char = '#';

/// Render a chart as text, headed by its title.
pub fn render(data: &ChartData) -> String {
    let mut out = String::new();
    out.push_str(data.kind().title());
    out.push('\n');

    let body = match data {
        ChartData::Activity { counts } => count_bars(&OVERVIEW_LABELS, counts),
        ChartData::TopRepos(top) => {
            let mut body = String::from("Stars\n");
            body.push_str(&count_bars(&top.labels, &top.stars));
            body.push_str("Forks\n");
            body.push_str(&count_bars(&top.labels, &top.forks));
            body
        }
        ChartData::RepoSize(series) | ChartData::Issues(series) => series_bars(series),
        ChartData::Radar { values } => count_bars(&RADAR_LABELS, values),
        ChartData::Languages { histogram } => {
            let labels: Vec<&str> = histogram.keys().map(String::as_str).collect();
            let values: Vec<u64> = histogram.values().copied().collect();
            count_bars(&labels, &values)
        }
        ChartData::Popularity { points } => points
            .iter()
            .map(|p| format!("{} x={} y={} r={}\n", p.label, p.x, p.y, p.radius))
            .collect(),
        ChartData::Engagement(ratios) => ratio_bars(&ENGAGEMENT_LABELS, &ratios.as_array()),
    };

    if body.is_empty() {
        out.push_str("(no data)\n");
    } else {
        out.push_str(&body);
    }
    out
}

fn series_bars(series: &Series) -> String {
    count_bars(&series.labels, &series.values)
}

fn count_bars<L: AsRef<str>>(labels: &[L], values: &[u64]) -> String {
    let max = values.iter().copied().max().unwrap_or(0) as f64;
    let rows: Vec<(String, f64, String)> = labels
        .iter()
        .zip(values)
        .map(|(label, &value)| (label.as_ref().to_string(), value as f64, format_count(value)))
        .collect();
    bars(&rows, max)
}

fn ratio_bars(labels: &[&str], values: &[f64]) -> String {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let rows: Vec<(String, f64, String)> = labels
        .iter()
        .zip(values)
        .map(|(label, &value)| (label.to_string(), value, format!("{:.2}", value)))
        .collect();
    bars(&rows, max)
}

fn bars(rows: &[(String, f64, String)], max: f64) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value, shown) in rows {
        let len = bar_len(*value, max);
        out.push_str(&format!(
            "  {:<width$} {:<bar$} {}\n",
            label,
            BAR_CHAR.to_string().repeat(len),
            shown,
            width = label_width,
            bar = BAR_WIDTH,
        ));
    }
    out
}

/// Bar length for `value` on a scale where `max` fills [`BAR_WIDTH`].
/// Non-zero values always get at least one character.
fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let len = (value / max * BAR_WIDTH as f64).round() as usize;
    len.clamp(1, BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::charts::{derive, ChartKind};
    use crate::github::mock::{sample_profile, sample_repo};

    #[test]
    fn bar_lengths_scale_to_max() {
        assert_eq!(bar_len(10.0, 10.0), BAR_WIDTH);
        assert_eq!(bar_len(5.0, 10.0), BAR_WIDTH / 2);
        assert_eq!(bar_len(0.0, 10.0), 0);
        assert_eq!(bar_len(0.01, 10.0), 1);
        assert_eq!(bar_len(3.0, 0.0), 0);
    }

    #[test]
    fn activity_lists_four_counts() {
        let data = derive(ChartKind::Activity, &sample_profile("octocat"), &[]);
        let text = render(&data);

        assert!(text.starts_with("Activity Overview\n"));
        assert!(text.contains("Followers"));
        assert!(text.contains("Public Gists"));
        assert!(text.contains(" 120\n"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn empty_series_says_no_data() {
        let data = derive(ChartKind::Issues, &sample_profile("octocat"), &[]);
        assert!(render(&data).contains("(no data)"));
    }

    #[test]
    fn bubbles_are_listed() {
        let repos = vec![sample_repo("alpha", 12, 3, None, 1)];
        let data = derive(ChartKind::Popularity, &sample_profile("octocat"), &repos);

        assert!(render(&data).contains("alpha x=3 y=12 r=6"));
    }

    #[test]
    fn engagement_shows_two_decimals() {
        let data = derive(ChartKind::Engagement, &sample_profile("octocat"), &[]);
        // 120 followers / 8 following
        assert!(render(&data).contains("15.00"));
    }
}
