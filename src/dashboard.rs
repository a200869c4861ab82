// Dashboard - filtering, sorting, summary stats and rendering for one dataset
use crate::ascii_charts::{join_columns, BarChart, MetricCard, ScenarioCard};
use crate::cli_output::OutputWriter;
use crate::config::DashConfig;
use crate::dataset::{Dataset, Scenario};
use crate::error::DashError;
use crate::format::{money_fmt, with_thousands, wrap_label};
use crate::tags::{Approach, Cond557c, Fwo, SetOff};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, warn};

const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "Value (desc)")]
    ValueDesc,
    #[serde(rename = "Value (asc)")]
    ValueAsc,
    #[serde(rename = "Original order")]
    Original,
}

impl FromStr for SortOrder {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desc" | "value (desc)" => Ok(Self::ValueDesc),
            "asc" | "value (asc)" => Ok(Self::ValueAsc),
            "original" | "original order" => Ok(Self::Original),
            _ => Err(DashError::UnknownSort(s.to_string())),
        }
    }
}

/// Selected filter values. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub approach: Option<String>,
    pub fwo: Option<String>,
    pub setoff: Option<String>,
    #[serde(rename = "cond_557c")]
    pub cond557c: Option<String>,
}

fn selection(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

fn selected(filter: &Option<String>, value: &str) -> bool {
    filter.as_ref().is_none_or(|f| f.eq_ignore_ascii_case(value))
}

impl Filters {
    pub fn new(
        approach: Option<String>,
        fwo: Option<String>,
        setoff: Option<String>,
        cond557c: Option<String>,
    ) -> Self {
        Self {
            approach: selection(approach),
            fwo: selection(fwo),
            setoff: selection(setoff),
            cond557c: selection(cond557c),
        }
    }

    /// The 557C selection only applies when the dataset shows that filter
    pub fn matches(&self, scenario: &Scenario, show_557c_filter: bool) -> bool {
        let tags = &scenario.tags;
        selected(&self.approach, tags.approach.name())
            && selected(&self.fwo, tags.fwo.name())
            && selected(&self.setoff, tags.setoff.name())
            && (!show_557c_filter || selected(&self.cond557c, tags.cond557c.name()))
    }
}

/// Choices offered by each filter: "All" then the sorted distinct values
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub approach: Vec<String>,
    pub fwo: Vec<String>,
    pub setoff: Vec<String>,
    #[serde(rename = "cond_557c", skip_serializing_if = "Option::is_none")]
    pub cond557c: Option<Vec<String>>,
}

fn options_of<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.collect();
    std::iter::once(ALL)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    let s = &dataset.scenarios;
    FilterOptions {
        approach: options_of(s.iter().map(|x| x.tags.approach.name())),
        fwo: options_of(s.iter().map(|x| x.tags.fwo.name())),
        setoff: options_of(s.iter().map(|x| x.tags.setoff.name())),
        cond557c: dataset
            .show_557c_filter
            .then(|| options_of(s.iter().map(|x| x.tags.cond557c.name()))),
    }
}

/// Missing values go last in both directions
fn compare_values(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_scenarios(scenarios: &mut [&Scenario], order: SortOrder) {
    match order {
        SortOrder::ValueDesc => scenarios.sort_by(|a, b| compare_values(a.value, b.value, true)),
        SortOrder::ValueAsc => scenarios.sort_by(|a, b| compare_values(a.value, b.value, false)),
        SortOrder::Original => scenarios.sort_by_key(|s| s.index),
    }
}

/// KPIs over the displayed scenarios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub spread: Option<f64>,
    pub sum: f64,
}

impl Summary {
    pub fn of(scenarios: &[&Scenario]) -> Self {
        let values: Vec<f64> = scenarios.iter().filter_map(|s| s.value).collect();
        let max = values.iter().copied().reduce(f64::max);
        let min = values.iter().copied().reduce(f64::min);
        let spread = max.zip(min).map(|(hi, lo)| hi - lo);

        Self {
            count: scenarios.len(),
            max,
            min,
            spread,
            sum: values.iter().sum(),
        }
    }
}

/// Filtered, sorted view of one dataset
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub dataset: &'a str,
    pub title: &'a str,
    pub show_557c_filter: bool,
    pub filters: Filters,
    pub sort: SortOrder,
    pub options: FilterOptions,
    pub summary: Summary,
    pub scenarios: Vec<&'a Scenario>,
}

impl<'a> DashboardView<'a> {
    pub fn build(dataset: &'a Dataset, filters: &Filters, sort: SortOrder) -> Self {
        if !dataset.show_557c_filter && filters.cond557c.is_some() {
            warn!("{} has no 557C filter; ignoring the 557C selection", dataset.name);
        }

        let mut scenarios: Vec<&Scenario> = dataset
            .scenarios
            .iter()
            .filter(|s| filters.matches(s, dataset.show_557c_filter))
            .collect();
        sort_scenarios(&mut scenarios, sort);

        debug!(
            "{}: {} of {} scenarios after filters",
            dataset.key,
            scenarios.len(),
            dataset.len()
        );

        Self {
            dataset: &dataset.key,
            title: &dataset.title,
            show_557c_filter: dataset.show_557c_filter,
            filters: filters.clone(),
            sort,
            options: filter_options(dataset),
            summary: Summary::of(&scenarios),
            scenarios,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Badges for a scenario card; unknown tags are left out
pub fn badges(scenario: &Scenario, show_557c: bool) -> Vec<String> {
    let tags = &scenario.tags;
    let mut badges = Vec::new();

    if tags.approach != Approach::Unknown {
        badges.push(tags.approach.to_string());
    }
    if tags.fwo != Fwo::Unknown {
        badges.push(tags.fwo.to_string());
    }
    if tags.setoff != SetOff::Unknown {
        badges.push(format!("Set-off: {}", tags.setoff));
    }
    if show_557c && tags.cond557c != Cond557c::NotApplicable {
        badges.push(format!("557C: {}", tags.cond557c));
    }

    badges
}

fn money_or_dash(v: Option<f64>) -> String {
    v.map(money_fmt).unwrap_or_else(|| "—".to_string())
}

fn render_kpis(summary: &Summary) -> String {
    let max_label = if summary.count == 0 { "Max" } else { "Max scenario" };
    let min_label = if summary.count == 0 { "Min" } else { "Min scenario" };
    let spread_label = if summary.count == 0 { "Spread (Max - Min)" } else { "Spread" };
    let cards = [
        MetricCard::new("Scenarios", &summary.count.to_string()),
        MetricCard::new(max_label, &money_or_dash(summary.max)),
        MetricCard::new(min_label, &money_or_dash(summary.min)),
        MetricCard::new(spread_label, &money_or_dash(summary.spread)),
    ];
    let widths: Vec<usize> = cards.iter().map(|c| c.width + 4).collect();
    let blocks: Vec<Vec<String>> = cards.iter().map(|c| c.lines()).collect();
    join_columns(&blocks, &widths)
}

fn render_chart(view: &DashboardView<'_>, config: &DashConfig) -> String {
    let mut chart = BarChart::new("Total Amount (A$) by scenario").with_width(config.bar_width);
    for s in &view.scenarios {
        chart.add(
            wrap_label(&s.tags.label, config.label_width),
            s.value,
            &money_or_dash(s.value),
            &s.color,
        );
    }
    chart.render()
}

fn render_cards(view: &DashboardView<'_>, config: &DashConfig) -> String {
    let columns = config.card_columns.clamp(1, 5).min(view.scenarios.len().max(1));
    let cards: Vec<ScenarioCard> = view
        .scenarios
        .iter()
        .map(|s| {
            ScenarioCard::new(&money_or_dash(s.value), &s.color)
                .with_width(config.card_width)
                .with_badges(badges(s, view.show_557c_filter))
                .with_label(&s.tags.label)
                .with_features(&s.features)
        })
        .collect();

    let mut output = String::new();
    for row in cards.chunks(columns) {
        let widths: Vec<usize> = row.iter().map(|c| c.width + 4).collect();
        let blocks: Vec<Vec<String>> = row.iter().map(|c| c.lines()).collect();
        output.push_str(&join_columns(&blocks, &widths));
    }
    output
}

pub const TABLE_HEADER: [&str; 6] = ["scenario", "value", "approach", "fwo", "setoff", "cond_557c"];

pub fn table_rows(view: &DashboardView<'_>) -> Vec<Vec<String>> {
    view.scenarios
        .iter()
        .map(|s| {
            vec![
                s.tags.label.clone(),
                s.value.map(with_thousands).unwrap_or_default(),
                s.tags.approach.to_string(),
                s.tags.fwo.to_string(),
                s.tags.setoff.to_string(),
                s.tags.cond557c.to_string(),
            ]
        })
        .collect()
}

pub const PAGE_TITLE: &str = "Comparative Sensitivity Analysis";
pub const PAGE_CAPTION: &str =
    "Interactive dashboard for whole-class scenario comparisons (Woolworths + Coles).";
pub const SORT_TIP: &str = "Tip: pass --sort desc to match a 'ranked' view.";

/// Text rendering of one dataset's dashboard. Empty in JSON mode.
pub fn render(
    out: &OutputWriter,
    view: &DashboardView<'_>,
    config: &DashConfig,
    show_table: bool,
) -> String {
    if out.is_json() {
        return String::new();
    }

    let mut text = out.section_text(view.title);
    text.push_str(&render_kpis(&view.summary));

    if view.is_empty() {
        text.push_str(&out.warning_text("No scenarios match the current filters."));
        return text;
    }

    text.push('\n');
    text.push_str(&render_chart(view, config));

    text.push_str(&out.section_text("Scenario cards"));
    text.push_str(&render_cards(view, config));

    if show_table {
        text.push_str(&out.section_text("Data table"));
        text.push_str(&out.table_text(&TABLE_HEADER, table_rows(view)));
    }

    text.push('\n');
    text.push_str(&out.caption_text(&format!(
        "Filtered total (sum of displayed scenarios): {}",
        money_fmt(view.summary.sum)
    )));
    text
}

/// Page heading, every dataset section, then the sort tip
pub fn render_page(
    out: &OutputWriter,
    views: &[DashboardView<'_>],
    config: &DashConfig,
    show_table: bool,
) -> String {
    if out.is_json() {
        return String::new();
    }

    let mut text = out.section_text(PAGE_TITLE);
    text.push_str(&out.caption_text(PAGE_CAPTION));
    for view in views {
        text.push_str(&render(out, view, config, show_table));
    }
    text.push('\n');
    text.push_str(&out.caption_text(SORT_TIP));
    text
}
