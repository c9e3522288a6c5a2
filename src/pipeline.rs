// ⚙️ Pipeline - label owner rows, then reconcile households
//
//   rows ──map(label_row)──▶ labeled rows ──reconcile──▶ households
//
// Labeling is row-local; grouping needs the full batch first.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::household::{reconcile, HouseholdRecord, HouseholdType};
use crate::records::OwnerRow;
use crate::residency::{ResidencyClassifier, ResidencyLabel, DEFAULT_DISTRICT_PREFIX_LEN};
use crate::rules::{lien_status, ownership_type, seizure_status, CauseRule, RuleEngine};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Key prefix (in characters) compared by the lot and district tiers
    #[serde(default = "default_prefix_len")]
    pub district_prefix_len: usize,

    /// Registration-cause rules tried before the built-in ones
    #[serde(default)]
    pub cause_rules: Vec<CauseRule>,
}

fn default_prefix_len() -> usize {
    DEFAULT_DISTRICT_PREFIX_LEN
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            district_prefix_len: DEFAULT_DISTRICT_PREFIX_LEN,
            cause_rules: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            serde_json::from_str(content).context("Failed to parse pipeline config JSON")?;

        anyhow::ensure!(
            config.district_prefix_len > 0,
            "district_prefix_len must be positive"
        );
        Ok(config)
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub input_rows: usize,
    pub households: usize,
    pub shared_households: usize,
    pub single_households: usize,

    /// Household count per residency label (Korean label → count)
    pub by_residency: BTreeMap<String, usize>,

    /// Household count per registration category
    pub by_registration: BTreeMap<String, usize>,
}

impl PipelineSummary {
    pub fn from_households(input_rows: usize, households: &[HouseholdRecord]) -> Self {
        let mut summary = PipelineSummary {
            input_rows,
            households: households.len(),
            ..PipelineSummary::default()
        };

        for household in households {
            match household.household_type() {
                HouseholdType::Shared => summary.shared_households += 1,
                HouseholdType::Single => summary.single_households += 1,
            }

            *summary
                .by_residency
                .entry(household.residency.as_str().to_string())
                .or_insert(0) += 1;

            if let Some(category) = &household.representative.registration_category {
                *summary.by_registration.entry(category.clone()).or_insert(0) += 1;
            }
        }

        summary
    }

    pub fn residency_count(&self, label: ResidencyLabel) -> usize {
        self.by_residency.get(label.as_str()).copied().unwrap_or(0)
    }

    /// Share of households labeled 실거주 or 실거주(추정)
    pub fn resident_ratio(&self) -> f64 {
        if self.households == 0 {
            return 0.0;
        }
        let resident: usize = ResidencyLabel::ALL
            .iter()
            .filter(|label| label.is_resident())
            .map(|label| self.residency_count(*label))
            .sum();
        resident as f64 / self.households as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows → {} households ({} shared, {} single), resident {:.1}%",
            self.input_rows,
            self.households,
            self.shared_households,
            self.single_households,
            self.resident_ratio() * 100.0
        )
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub households: Vec<HouseholdRecord>,
    pub summary: PipelineSummary,
    pub processed_at: DateTime<Utc>,
}

pub struct Pipeline {
    classifier: ResidencyClassifier,
    cause_rules: RuleEngine,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::from_config(&PipelineConfig::default())
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Pipeline {
            classifier: ResidencyClassifier::with_prefix_len(config.district_prefix_len),
            cause_rules: RuleEngine::with_extra_rules(config.cause_rules.clone()),
        }
    }

    /// Fill in every derived field of one row.
    ///
    /// An ownership type already present on the row is kept.
    pub fn label_row(&self, mut row: OwnerRow) -> OwnerRow {
        let right_type = row.right_type.as_deref().unwrap_or_default();
        let right_content = row.right_content.as_deref().unwrap_or_default();

        let lien = lien_status(right_type, right_content);
        let seizure = seizure_status(right_type, right_content).to_string();
        let category = self.cause_rules.classify_registration(
            row.registration_purpose.as_deref().unwrap_or_default(),
            row.registration_cause.as_deref().unwrap_or_default(),
        );

        if row.ownership_type.is_none() {
            row.ownership_type = Some(ownership_type(
                row.ownership_division.as_deref().unwrap_or_default(),
                row.share_marker.as_deref().unwrap_or_default(),
            ));
        }

        let decision = self
            .classifier
            .decide(row.owner_address_str(), row.property_address_str());
        if decision.label == ResidencyLabel::NoInfo {
            warn!(unit = %row.unit_id, "{}", decision.reason);
        }

        row.lien = Some(lien);
        row.seizure = Some(seizure);
        row.registration_category = Some(category);
        row.residency = Some(decision.label);
        row
    }

    pub fn label_rows(&self, rows: Vec<OwnerRow>) -> Vec<OwnerRow> {
        rows.into_iter().map(|row| self.label_row(row)).collect()
    }

    pub fn run(&self, rows: Vec<OwnerRow>) -> PipelineOutput {
        let input_rows = rows.len();
        let labeled = self.label_rows(rows);
        let households = reconcile(&labeled);
        let summary = PipelineSummary::from_households(input_rows, &households);

        info!("{}", summary.summary());

        PipelineOutput {
            households,
            summary,
            processed_at: Utc::now(),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
