//! dashboard::chart_spec
//!
//! JSON chart configuration for an external charting library.
//!
//! The output follows the Chart.js configuration shape (`type`, `data`,
//! `options`) so it can be handed to a browser page unchanged. Colours come
//! from the [`Theme`]; animations only toggle the animation duration.

use serde_json::{json, Value};

use super::charts::{
    BubblePoint, ChartData, ChartKind, ENGAGEMENT_LABELS, OVERVIEW_LABELS, RADAR_LABELS,
};
use super::theme::Theme;

/// Animation duration in milliseconds when animations are enabled.
pub const ANIMATION_MS: u64 = 1000;

/// Chart.js chart type for a kind.
pub fn chart_type(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Activity => "doughnut",
        ChartKind::TopRepos | ChartKind::Issues => "bar",
        ChartKind::RepoSize => "line",
        ChartKind::Radar => "radar",
        ChartKind::Languages => "polarArea",
        ChartKind::Popularity => "bubble",
        ChartKind::Engagement => "pie",
    }
}

/// Build the full configuration for one chart.
pub fn build(data: &ChartData, theme: Theme, animations: bool) -> Value {
    let kind = data.kind();
    let (labels, datasets) = data_section(data, theme);

    let mut config = json!({
        "type": chart_type(kind),
        "data": {
            "datasets": datasets,
        },
        "options": options(kind, theme, animations),
    });
    if let Some(labels) = labels {
        config["data"]["labels"] = labels;
    }
    config
}

fn data_section(data: &ChartData, theme: Theme) -> (Option<Value>, Value) {
    match data {
        ChartData::Activity { counts } => (
            Some(json!(OVERVIEW_LABELS)),
            json!([multi_color_dataset("Count", json!(counts), counts.len(), theme)]),
        ),
        ChartData::TopRepos(top) => (
            Some(json!(top.labels)),
            json!([
                single_color_dataset("Stars", json!(top.stars), theme, 0),
                single_color_dataset("Forks", json!(top.forks), theme, 1),
            ]),
        ),
        ChartData::RepoSize(series) => {
            let mut dataset = single_color_dataset("Size (KB)", json!(series.values), theme, 2);
            dataset["fill"] = json!(true);
            dataset["tension"] = json!(0.4);
            (Some(json!(series.labels)), json!([dataset]))
        }
        ChartData::Radar { values } => {
            let mut dataset = single_color_dataset("GitHub Activity", json!(values), theme, 1);
            dataset["borderWidth"] = json!(2);
            (Some(json!(RADAR_LABELS)), json!([dataset]))
        }
        ChartData::Languages { histogram } => {
            let labels: Vec<&String> = histogram.keys().collect();
            let values: Vec<u64> = histogram.values().copied().collect();
            (
                Some(json!(labels)),
                json!([multi_color_dataset(
                    "Languages",
                    json!(values),
                    theme.palette().len(),
                    theme
                )]),
            )
        }
        ChartData::Issues(series) => (
            Some(json!(series.labels)),
            json!([single_color_dataset(
                "Open Issues",
                json!(series.values),
                theme,
                3
            )]),
        ),
        ChartData::Popularity { points } => (None, json!([bubble_dataset(points, theme)])),
        ChartData::Engagement(ratios) => (
            Some(json!(ENGAGEMENT_LABELS)),
            json!([multi_color_dataset(
                "Engagement Ratios",
                json!(ratios.as_array()),
                3,
                theme
            )]),
        ),
    }
}

fn single_color_dataset(label: &str, data: Value, theme: Theme, index: usize) -> Value {
    let color = theme.color(index);
    json!({
        "label": label,
        "data": data,
        "backgroundColor": color.fill,
        "borderColor": color.border,
        "borderWidth": 1,
    })
}

fn multi_color_dataset(label: &str, data: Value, colors: usize, theme: Theme) -> Value {
    let fills: Vec<&str> = (0..colors).map(|i| theme.color(i).fill).collect();
    let borders: Vec<&str> = (0..colors).map(|i| theme.color(i).border).collect();
    json!({
        "label": label,
        "data": data,
        "backgroundColor": fills,
        "borderColor": borders,
        "borderWidth": 1,
    })
}

fn bubble_dataset(points: &[BubblePoint], theme: Theme) -> Value {
    let data: Vec<Value> = points
        .iter()
        .map(|p| json!({ "x": p.x, "y": p.y, "r": p.radius }))
        .collect();
    let fills: Vec<&str> = (0..points.len()).map(|i| theme.color(i).fill).collect();
    json!({
        "label": "Repository Popularity",
        "data": data,
        "backgroundColor": fills,
    })
}

fn options(kind: ChartKind, theme: Theme, animations: bool) -> Value {
    let text = theme.text_color();
    let axis = || {
        json!({
            "ticks": { "color": text },
            "grid": { "color": theme.grid_color() },
        })
    };

    let mut scales = json!({
        "x": axis(),
        "y": axis(),
        "r": axis(),
    });
    scales["y"]["beginAtZero"] = json!(true);
    if kind == ChartKind::Popularity {
        scales["x"]["title"] = json!({ "display": true, "text": "Forks", "color": text });
        scales["y"]["title"] = json!({ "display": true, "text": "Stars", "color": text });
    }

    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "animation": {
            "duration": if animations { ANIMATION_MS } else { 0 },
        },
        "plugins": {
            "title": { "display": true, "text": kind.title(), "color": text },
            "legend": { "labels": { "color": text } },
            "tooltip": {
                "backgroundColor": theme.tooltip_background(),
                "titleColor": text,
                "bodyColor": text,
                "borderColor": theme.color(0).border,
                "borderWidth": 1,
            },
        },
        "scales": scales,
    })
}
