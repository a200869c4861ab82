// Scenario datasets - raw rows, tagging at load time, built-in tables and file loading
use crate::error::{DashError, DashResult};
use crate::tags::{self, Cond557c, ScenarioTags};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Palette used for rows that don't carry their own colour
pub const DEFAULT_PALETTE: [&str; 5] = ["#10b981", "#06b6d4", "#3b82f6", "#f59e0b", "#8b5cf6"];

/// One scenario as authored: free-text category plus value
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRow {
    pub category: String,
    /// Number or numeric string; anything else is treated as missing
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ScenarioRow {
    pub fn new(category: &str, value: f64, color: &str, features: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            value: serde_json::json!(value),
            color: Some(color.to_string()),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A tagged scenario, ready for filtering and display
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    /// Position in the source table (used for "original order")
    pub index: usize,
    pub category: String,
    pub value: Option<f64>,
    /// Value in millions
    pub value_m: Option<f64>,
    pub color: String,
    pub features: Vec<String>,
    #[serde(flatten)]
    pub tags: ScenarioTags,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub key: String,
    pub name: String,
    pub title: String,
    pub show_557c_filter: bool,
    pub scenarios: Vec<Scenario>,
}

impl Dataset {
    /// Tag every row and backfill missing colours from the default palette
    pub fn from_rows(
        key: &str,
        name: &str,
        title: &str,
        show_557c_filter: bool,
        rows: Vec<ScenarioRow>,
    ) -> Self {
        let mut palette = DEFAULT_PALETTE.iter().cycle();

        let scenarios = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let value = coerce_value(&row.value);
                if value.is_none() {
                    warn!("Scenario {} in {} has no numeric value: {}", index, key, row.value);
                }

                let color = match row.color {
                    Some(c) if !c.trim().is_empty() => c,
                    _ => palette.next().map(|c| c.to_string()).unwrap_or_default(),
                };

                let tags = tags::extract(&row.category);
                debug!(
                    "Tagged {:?}: approach={} fwo={} setoff={} 557c={}",
                    tags.label, tags.approach, tags.fwo, tags.setoff, tags.cond557c
                );

                Scenario {
                    index,
                    category: row.category,
                    value,
                    value_m: value.map(|v| v / 1_000_000.0),
                    color,
                    features: row.features,
                    tags,
                }
            })
            .collect();

        Self {
            key: key.to_string(),
            name: name.to_string(),
            title: title.to_string(),
            show_557c_filter,
            scenarios,
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Coerce a JSON value to a finite number; strings may carry comma separators
pub fn coerce_value(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// On-disk dataset: either a full description or a bare list of rows
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Full {
        key: Option<String>,
        name: String,
        title: Option<String>,
        show_557c_filter: Option<bool>,
        rows: Vec<ScenarioRow>,
    },
    Rows(Vec<ScenarioRow>),
}

/// Load one dataset from a JSON file
pub fn load_dataset_file(path: &Path) -> DashResult<Dataset> {
    let content = fs::read_to_string(path)?;
    let parsed: DatasetFile =
        serde_json::from_str(&content).map_err(|source| DashError::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();

    let dataset = match parsed {
        DatasetFile::Full {
            key,
            name,
            title,
            show_557c_filter,
            rows,
        } => {
            let key = key
                .map(|k| slug(&k))
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| slug(&name));
            let title =
                title.unwrap_or_else(|| format!("{}: whole-class sensitivity analysis", name));
            let show = show_557c_filter.unwrap_or_else(|| mentions_557c(&rows));
            Dataset::from_rows(&key, &name, &title, show, rows)
        }
        DatasetFile::Rows(rows) => {
            let show = mentions_557c(&rows);
            let title = format!("{}: whole-class sensitivity analysis", stem);
            Dataset::from_rows(&slug(&stem), &stem, &title, show, rows)
        }
    };

    if dataset.is_empty() {
        warn!("{} contains no scenarios", path.display());
    }
    debug!("Loaded {} scenarios from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn mentions_557c(rows: &[ScenarioRow]) -> bool {
    rows.iter()
        .any(|r| tags::extract(&r.category).cond557c != Cond557c::NotApplicable)
}

fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Available datasets, looked up by key or name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub datasets: Vec<Dataset>,
}

impl Catalog {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    /// Woolworths and Coles tables
    pub fn builtin() -> Self {
        Self::new(vec![woolworths(), coles()])
    }

    pub fn find(&self, key: &str) -> DashResult<&Dataset> {
        let wanted = key.trim().to_lowercase();
        self.datasets
            .iter()
            .find(|d| d.key == wanted || d.name.to_lowercase() == wanted)
            .ok_or_else(|| DashError::UnknownDataset(key.to_string(), self.keys().join(", ")))
    }

    /// `all` selects every dataset, anything else one dataset by key
    pub fn select(&self, key: &str) -> DashResult<Vec<&Dataset>> {
        if key.eq_ignore_ascii_case("all") {
            Ok(self.datasets.iter().collect())
        } else {
            Ok(vec![self.find(key)?])
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.key.clone()).collect()
    }
}

pub fn woolworths() -> Dataset {
    let rows = vec![
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach | Without FWO | Set-off: Pay Period",
            1_668_147_026.75,
            "#10b981",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: Without FWO",
                "Set-off: Pay Period",
            ],
        ),
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach | With FWO | Set-off: Bi Annual",
            1_371_946_816.29,
            "#06b6d4",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Bi Annual",
            ],
        ),
        ScenarioRow::new(
            "Coles Based Clause 28.11 Approach |Without FWO | Set-off: Bi Annual",
            409_657_215.48,
            "#3b82f6",
            &[
                "Clause 28.11: Coles Based Approach",
                "FWO Cut Status: Without FWO",
                "Set-off: Bi Annual",
            ],
        ),
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach | With FWO | Set-off: Pay Period",
            326_116_709.40,
            "#f59e0b",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Pay Period",
            ],
        ),
        ScenarioRow::new(
            "Coles Based Clause 28.11 Approach | With FWO | Set-off: Bi Annual",
            56_690_258.85,
            "#8b5cf6",
            &[
                "Clause 28.11: Coles Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Bi Annual",
            ],
        ),
    ];

    Dataset::from_rows(
        "woolworths",
        "Woolworths",
        "Woolworths: whole-class sensitivity analysis",
        false,
        rows,
    )
}

pub fn coles() -> Dataset {
    let rows = vec![
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach  | Set-off: Pay period | 557C condition on all shifts",
            780_652_186.32,
            "#10b981",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: Without FWO",
                "Set-off: Pay Period",
                "557C Condition: All Shifts",
            ],
        ),
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach | Set-off: Pay period | 557C condition on non-clocked shifts",
            690_773_333.38,
            "#06b6d4",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: Without FWO",
                "Set-off: Pay Period",
                "557C Condition: Non-clocked shifts",
                "Best on Judgement",
            ],
        ),
        ScenarioRow::new(
            "Judgement Based Clause 28.11 Apporach | Set-off: Pay period | 557C condition on non-clocked shifts | After FWO",
            282_887_638.08,
            "#3b82f6",
            &[
                "Clause 28.11: Judgement Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Pay Period",
                "557C Condition: Non-clocked shifts",
                "Likely Best",
            ],
        ),
        ScenarioRow::new(
            "Coles Based Clause 28.11 Apporach |Set-off: Annual | 557C condition on all shifts | After FWO",
            37_575_310.68,
            "#f59e0b",
            &[
                "Clause 28.11: Coles Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Annual",
                "557C Condition: All Shifts",
            ],
        ),
        ScenarioRow::new(
            "Coles Based Clause 28.11 Approach |Set-off: Annual | 557C condition on non-clocked shifts | After FWO",
            26_617_692.75,
            "#8b5cf6",
            &[
                "Clause 28.11: Coles Based Approach",
                "FWO Cut Status: With FWO Applied",
                "Set-off: Annual",
                "557C Condition: Non-clocked shifts",
                "Likely Worst",
            ],
        ),
    ];

    Dataset::from_rows(
        "coles",
        "Coles",
        "Coles: whole-class sensitivity analysis",
        true,
        rows,
    )
}
