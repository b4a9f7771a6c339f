use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricMode {
    Frequency,
    Spending,
}

impl MetricMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Frequency => "Most Frequent",
            Self::Spending => "Highest Spending",
        }
    }
}

/// One purchased item aggregated across all scanned receipts.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStat {
    pub name: String,
    pub frequency_count: f64,
    pub total_spent: f64,
}

impl ItemStat {
    pub fn metric(&self, mode: MetricMode) -> f32 {
        let value = match mode {
            MetricMode::Frequency => self.frequency_count,
            MetricMode::Spending => self.total_spent,
        };
        value.max(0.0) as f32
    }
}

pub fn load_items(path: &str) -> Result<Vec<ItemStat>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading item stats from {path}"))?;
    let mut items: Vec<ItemStat> =
        serde_json::from_str(&raw).with_context(|| format!("parsing item stats from {path}"))?;
    normalize_items(&mut items, path)?;
    Ok(items)
}

/// Validate a freshly parsed dataset: names must be present and unique,
/// metrics finite. Negative metrics (refund rows) are clamped to zero here so
/// everything downstream sees non-negative values.
fn normalize_items(items: &mut [ItemStat], source: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        if item.name.is_empty() {
            return Err(anyhow!("item with empty name in {source}"));
        }
        if !seen.insert(item.name.clone()) {
            return Err(anyhow!("duplicate item name {:?} in {source}", item.name));
        }
        if !item.frequency_count.is_finite() || !item.total_spent.is_finite() {
            return Err(anyhow!("non-finite metric for item {:?} in {source}", item.name));
        }
        item.frequency_count = item.frequency_count.max(0.0);
        item.total_spent = item.total_spent.max(0.0);
    }
    Ok(())
}

pub fn sample_items() -> Vec<ItemStat> {
    const SAMPLE: [(&str, f64, f64); 15] = [
        ("milk", 15.0, 65.50),
        ("eggs", 12.0, 48.00),
        ("bread", 10.0, 35.00),
        ("chicken", 8.0, 95.20),
        ("apples", 9.0, 42.30),
        ("carrots", 7.0, 28.70),
        ("tomatoes", 11.0, 55.80),
        ("lettuce", 6.0, 24.50),
        ("potatoes", 5.0, 18.90),
        ("onions", 4.0, 15.60),
        ("coffee", 13.0, 78.00),
        ("pasta", 6.0, 32.40),
        ("rice", 4.0, 22.80),
        ("bananas", 8.0, 35.20),
        ("beer", 3.0, 45.60),
    ];

    SAMPLE
        .iter()
        .map(|&(name, frequency_count, total_spent)| ItemStat {
            name: name.to_owned(),
            frequency_count,
            total_spent,
        })
        .collect()
}
