//! ASCII chart rendering for the terminal dashboard
//!
//! - BarChart: one bar per scenario, value label after the bar
//! - MetricCard: boxed KPI (label + big value)
//! - ScenarioCard: value, tag badges, label and feature bullets
//!
//! Cards render to fixed-width lines so they can be laid side by side with
//! [`join_columns`].

use crate::format::parse_hex_color;
use colored::{ColoredString, Colorize};

/// Box drawing characters
const BOX_H: char = '─';
const BOX_V: char = '│';
const BOX_TL: char = '╭';
const BOX_TR: char = '╮';
const BOX_BL: char = '╰';
const BOX_BR: char = '╯';

const BAR_FULL: &str = "█";
const BAR_EMPTY: &str = "░";

/// Colour text with a `#rrggbb` hex colour; unparseable colours leave it plain
pub fn colorize_hex(text: &str, hex: &str) -> ColoredString {
    match parse_hex_color(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Pad (or truncate with an ellipsis) to an exact visible width
fn fit(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{}{}", s, " ".repeat(width - len))
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

/// Horizontal bar chart, bars scaled against the largest value
pub struct BarChart {
    pub title: String,
    pub items: Vec<BarItem>,
    pub width: usize,
}

#[derive(Clone, Debug)]
pub struct BarItem {
    /// Already-wrapped label lines
    pub label: Vec<String>,
    pub value: Option<f64>,
    /// Text printed after the bar (e.g. formatted money)
    pub value_label: String,
    pub color: String,
}

impl BarChart {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
            width: 40,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn add(&mut self, label: Vec<String>, value: Option<f64>, value_label: &str, color: &str) {
        self.items.push(BarItem {
            label,
            value,
            value_label: value_label.to_string(),
            color: color.to_string(),
        });
    }

    /// Number of filled cells for a value
    fn filled(&self, value: f64, max: f64) -> usize {
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        let cells = (value / max * self.width as f64).round() as usize;
        cells.clamp(1, self.width)
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        if !self.title.is_empty() {
            output.push_str(&format!("  {}\n\n", self.title.bold()));
        }

        if self.items.is_empty() {
            output.push_str("  No data available\n");
            return output;
        }

        let max = self
            .items
            .iter()
            .filter_map(|i| i.value)
            .fold(0.0, f64::max);

        for item in &self.items {
            let bullet = colorize_hex("●", &item.color);
            for (idx, line) in item.label.iter().enumerate() {
                if idx == 0 {
                    output.push_str(&format!("  {} {}\n", bullet, line));
                } else {
                    output.push_str(&format!("    {}\n", line));
                }
            }

            match item.value {
                Some(v) => {
                    let filled = self.filled(v, max);
                    let bar = colorize_hex(&BAR_FULL.repeat(filled), &item.color);
                    output.push_str(&format!(
                        "    {}{} {}\n",
                        bar,
                        BAR_EMPTY.repeat(self.width - filled).dimmed(),
                        item.value_label.bold()
                    ));
                }
                None => {
                    output.push_str(&format!("    {}\n", "no value".dimmed()));
                }
            }
            output.push('\n');
        }

        output
    }
}

/// Metric Card - single KPI in a box
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub width: usize,
}

impl MetricCard {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            width: 20,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let w = self.width;
        vec![
            format!("{}{}{}", BOX_TL, BOX_H.to_string().repeat(w + 2), BOX_TR),
            format!("{} {} {}", BOX_V, fit(&self.label, w).dimmed(), BOX_V),
            format!("{} {} {}", BOX_V, fit(&self.value, w).cyan().bold(), BOX_V),
            format!("{}{}{}", BOX_BL, BOX_H.to_string().repeat(w + 2), BOX_BR),
        ]
    }
}

/// Scenario Card - value, badges, label and feature list
pub struct ScenarioCard {
    pub value: String,
    pub color: String,
    pub badges: Vec<String>,
    pub label: String,
    pub features: Vec<String>,
    pub width: usize,
}

impl ScenarioCard {
    pub fn new(value: &str, color: &str) -> Self {
        Self {
            value: value.to_string(),
            color: color.to_string(),
            badges: Vec::new(),
            label: String::new(),
            features: Vec::new(),
            width: 34,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(8);
        self
    }

    pub fn with_badges(mut self, badges: Vec<String>) -> Self {
        self.badges = badges;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_features(mut self, features: &[String]) -> Self {
        self.features = features.to_vec();
        self
    }

    /// Lay badges out left to right, wrapping when a line is full
    fn badge_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for badge in &self.badges {
            let chip = format!("[{}]", badge);
            let cur_len = current.chars().count();
            if cur_len > 0 && cur_len + 1 + chip.chars().count() > self.width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&chip);
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    pub fn lines(&self) -> Vec<String> {
        let w = self.width;
        let row = |content: String| format!("{} {} {}", BOX_V, content, BOX_V);
        let mut lines = Vec::new();

        lines.push(format!("{}{}{}", BOX_TL, BOX_H.to_string().repeat(w + 2), BOX_TR));
        lines.push(row(colorize_hex(&fit(&self.value, w), &self.color).bold().to_string()));

        for badge_line in self.badge_lines() {
            lines.push(row(fit(&badge_line, w).yellow().to_string()));
        }

        for label_line in crate::format::wrap_label(&self.label, w) {
            lines.push(row(fit(&label_line, w).dimmed().to_string()));
        }

        if !self.features.is_empty() {
            lines.push(row(BOX_H.to_string().repeat(w)));
            for feature in &self.features {
                for (idx, part) in crate::format::wrap_label(feature, w - 2).iter().enumerate() {
                    let prefix = if idx == 0 { "• " } else { "  " };
                    lines.push(row(fit(&format!("{}{}", prefix, part), w)));
                }
            }
        }

        lines.push(format!("{}{}{}", BOX_BL, BOX_H.to_string().repeat(w + 2), BOX_BR));
        lines
    }
}

/// Place blocks of lines side by side. `widths` gives each block's visible
/// width so shorter blocks can be padded.
pub fn join_columns(blocks: &[Vec<String>], widths: &[usize]) -> String {
    let height = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let mut output = String::new();

    for row in 0..height {
        output.push_str("  ");
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                output.push(' ');
            }
            match block.get(row) {
                Some(line) => output.push_str(line),
                None => output.push_str(&" ".repeat(widths.get(idx).copied().unwrap_or(0))),
            }
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_bar_chart() {
        let mut chart = BarChart::new("Test Chart").with_width(10);
        chart.add(vec!["Item 1".to_string()], Some(100.0), "A$100.00", "#10b981");
        chart.add(vec!["Item 2".to_string()], Some(50.0), "A$50.00", "#06b6d4");
        chart.add(vec!["Item 3".to_string()], None, "", "#3b82f6");
        let rendered = chart.render();
        assert!(rendered.contains("Item 1"));
        assert!(rendered.contains("A$100.00"));
        assert!(rendered.contains("no value"));
        assert_eq!(chart.filled(100.0, 100.0), 10);
        assert_eq!(chart.filled(50.0, 100.0), 5);
        assert_eq!(chart.filled(0.1, 100.0), 1);
        assert_eq!(chart.filled(0.0, 100.0), 0);
    }

    #[test]
    fn test_empty_bar_chart() {
        let chart = BarChart::new("");
        assert!(chart.render().contains("No data available"));
    }

    #[test]
    fn test_scenario_card_badges_wrap() {
        let card = ScenarioCard::new("A$1.67B", "#10b981")
            .with_width(20)
            .with_badges(vec![
                "Judgement Based".to_string(),
                "Without FWO".to_string(),
            ]);
        assert_eq!(
            card.badge_lines(),
            vec!["[Judgement Based]".to_string(), "[Without FWO]".to_string()]
        );
    }

    #[test]
    fn test_scenario_card_lines() {
        let card = ScenarioCard::new("A$1.67B", "#10b981")
            .with_label("Judgement Based Clause 28.11 Approach")
            .with_features(&["Set-off: Pay Period".to_string()]);
        let lines = card.lines();
        assert!(lines.first().unwrap().starts_with(BOX_TL));
        assert!(lines.last().unwrap().starts_with(BOX_BL));
        assert!(lines.iter().any(|l| l.contains("• Set-off: Pay Period")));
    }

    #[test]
    fn test_join_columns_pads_short_blocks() {
        let a = vec!["aa".to_string(), "aa".to_string()];
        let b = vec!["bb".to_string()];
        let joined = join_columns(&[a, b], &[2, 2]);
        assert_eq!(joined, "  aa bb\n  aa   \n");
    }
}
