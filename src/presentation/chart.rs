//! Renderer-neutral chart specifications.
//!
//! This is the JSON shape consumed by rendering front-ends. Each chart is
//! tagged with `kind` so a consumer can dispatch without guessing.

use serde::{Deserialize, Serialize};

/// One chart, tagged by shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartSpec {
    Line(LineChart),
    Bar(BarChart),
    Heatmap(Heatmap),
    ScalarCard(ScalarCard),
    Table(TableSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            Self::Line(c) => &c.title,
            Self::Bar(c) => &c.title,
            Self::Heatmap(c) => &c.title,
            Self::ScalarCard(c) => &c.title,
            Self::Table(c) => &c.title,
        }
    }

    /// Tag as it appears in JSON
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Bar(_) => "bar",
            Self::Heatmap(_) => "heatmap",
            Self::ScalarCard(_) => "scalar-card",
            Self::Table(_) => "table",
        }
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Line(c) => c.x.is_empty(),
            Self::Bar(c) => c.categories.is_empty(),
            Self::Heatmap(c) => c.y_labels.is_empty() || c.x_labels.is_empty(),
            Self::ScalarCard(_) => false,
            Self::Table(c) => c.rows.is_empty(),
        }
    }
}

/// Named series of y values aligned with the chart's x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub orientation: Orientation,
    /// Axis along which categories are laid out
    pub category_label: String,
    pub value_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,

    /// Optional second measure encoded as bar colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub value_label: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// `z[y][x]`
    pub z: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueFormat {
    Currency,
    Percent,
    Count,
}

impl ValueFormat {
    /// Render a value for display, e.g. `$1,234.50`, `12.5%`, `1,024`
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Currency => {
                let sign = if value < 0.0 { "-" } else { "" };
                format!("{}${}", sign, group_thousands(value.abs(), 2))
            }
            Self::Percent => format!("{:.1}%", value),
            Self::Count => group_thousands(value, 0),
        }
    }
}

/// Format with a fixed number of decimals and comma thousands separators
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarCard {
    pub title: String,
    pub value: f64,
    pub format: ValueFormat,

    /// Secondary caption shown under the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl ScalarCard {
    pub fn display_value(&self) -> String {
        self.format.format(self.value)
    }
}

/// Table cell, either free text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 => group_thousands(*n, 0),
            Self::Number(n) => group_thousands(*n, 2),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}
