//! Chart catalog: maps chart identifiers to log labels.
//!
//! Identifiers come in two shapes:
//! - `group-value` (e.g. `E-0.5`, `special-dots`, `mask-horiz`)
//! - a bare special chart key (e.g. `dots`)
//!
//! Anything the catalog does not recognise is reported verbatim.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Cached default catalog
static DEFAULT_CATALOG: Lazy<ChartCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ChartCatalog {
    &DEFAULT_CATALOG
}

/// Look up a chart in the default catalog
pub fn lookup_chart(chart_id: &str) -> ChartInfo {
    get_default_catalog().lookup(chart_id)
}

/// Labels recorded in the log for a chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartInfo {
    /// `Chart_Number` column
    pub category_label: String,
    /// `Chart_Display` column
    pub display_label: String,
}

impl ChartInfo {
    fn raw(chart_id: &str) -> Self {
        Self {
            category_label: chart_id.to_string(),
            display_label: chart_id.to_string(),
        }
    }
}

/// A named test chart outside the acuity groups
#[derive(Clone, Debug)]
pub struct SpecialChart {
    pub key: String,
    pub name: String,
    /// Reported under its own name rather than the group label
    pub standalone: bool,
}

/// Catalog of chart groups and special charts
#[derive(Clone, Debug)]
pub struct ChartCatalog {
    pub groups: HashMap<String, String>,
    pub specials: HashMap<String, SpecialChart>,
}

pub const SPECIAL_GROUP: &str = "special";
pub const MASK_GROUP: &str = "mask";

/// Builds the default catalog
pub fn build_default_catalog() -> ChartCatalog {
    let groups = [
        ("E", "E Chart"),
        ("C", "C Chart"),
        ("letters", "Letters Chart"),
        ("numbers", "Number Chart"),
        ("children", "Picture Chart"),
        (SPECIAL_GROUP, "General Test Chart"),
        (MASK_GROUP, "Mask Chart"),
    ]
    .into_iter()
    .map(|(key, label)| (key.to_string(), label.to_string()))
    .collect();

    let specials = [
        ("dots", "JCC Chart", true),
        ("rg", "Duochrome Chart", true),
        ("cross", "Cross Cylinder Chart", true),
        ("clock", "Astigmatic Chart", true),
        ("stereo", "Stereo Circles", false),
        ("schober", "Schober Test", false),
        ("phoria", "Phoria Lines", false),
        ("horiz", "Horizontal Mask", false),
        ("vert", "Vertical Mask", false),
        ("single", "Single Optotype", false),
        ("rg_filter", "R/G Filter", false),
    ]
    .into_iter()
    .map(|(key, name, standalone)| {
        (
            key.to_string(),
            SpecialChart {
                key: key.to_string(),
                name: name.to_string(),
                standalone,
            },
        )
    })
    .collect();

    ChartCatalog { groups, specials }
}

impl ChartCatalog {
    /// Resolve a chart id; total over all strings
    pub fn lookup(&self, chart_id: &str) -> ChartInfo {
        if let Some((group_key, value)) = chart_id.split_once('-') {
            if let Some(group_label) = self.groups.get(group_key) {
                return self.lookup_in_group(group_key, group_label, value);
            }
        }

        if let Some(special) = self.specials.get(chart_id) {
            let category_label = self
                .groups
                .get(SPECIAL_GROUP)
                .cloned()
                .unwrap_or_else(|| SPECIAL_GROUP.to_string());
            return ChartInfo {
                category_label,
                display_label: special.name.clone(),
            };
        }

        ChartInfo::raw(chart_id)
    }

    fn lookup_in_group(&self, group_key: &str, group_label: &str, value: &str) -> ChartInfo {
        let special = self.specials.get(value);
        let display_label = match (group_key, special) {
            (SPECIAL_GROUP | MASK_GROUP, Some(special)) => special.name.clone(),
            _ => value.to_string(),
        };

        let category_label = match (group_key, special) {
            (SPECIAL_GROUP, Some(special)) if special.standalone => special.name.clone(),
            _ => group_label.to_string(),
        };

        ChartInfo {
            category_label,
            display_label,
        }
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (key, label) in &self.groups {
            if key.is_empty() {
                errors.push("Chart group has empty key".to_string());
            }
            if key.contains('-') {
                errors.push(format!("Chart group key '{}' contains '-'", key));
            }
            if label.is_empty() {
                errors.push(format!("Chart group '{}' has empty label", key));
            }
        }

        for (key, special) in &self.specials {
            if key != &special.key {
                errors.push(format!(
                    "Special chart key '{}' doesn't match chart.key '{}'",
                    key, special.key
                ));
            }
            if key.contains('-') {
                errors.push(format!("Special chart key '{}' contains '-'", key));
            }
            if special.name.is_empty() {
                errors.push(format!("Special chart '{}' has empty name", key));
            }
        }

        if !self.groups.contains_key(SPECIAL_GROUP) {
            errors.push("Catalog has no special chart group".to_string());
        }

        errors
    }
}
