// 👪 Household Reconciler - one record per unit (세대)
//
// Owner rows are grouped by unit identifier; the first row of each group is
// the representative and carries the merged residency label:
//   any 실거주          → 실거주
//   else any 실거주(추정) → 실거주(추정)
//   else most frequent label (ties: first seen), 투자 when there is none

use crate::records::OwnerRow;
use crate::residency::ResidencyLabel;
use crate::rules::OwnershipType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// HOUSEHOLD TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseholdType {
    /// More than one co-owner
    #[serde(rename = "공유세대")]
    Shared,
    #[serde(rename = "단독세대")]
    Single,
}

impl HouseholdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HouseholdType::Shared => "공유세대",
            HouseholdType::Single => "단독세대",
        }
    }
}

// ============================================================================
// HOUSEHOLD RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    /// First row seen for the unit, with the merged label written back
    pub representative: OwnerRow,

    /// Merged verdict for the whole household
    pub residency: ResidencyLabel,

    /// Rows in the group
    pub total_members: usize,

    /// Rows marked 공유자
    pub co_owner_count: usize,

    /// Rows marked 단독소유자
    pub sole_owner_count: usize,
}

impl HouseholdRecord {
    pub fn unit_id(&self) -> &str {
        &self.representative.unit_id
    }

    pub fn household_type(&self) -> HouseholdType {
        if self.co_owner_count > 1 {
            HouseholdType::Shared
        } else {
            HouseholdType::Single
        }
    }
}

// ============================================================================
// MERGE
// ============================================================================

/// Merge the labels of one household into a single verdict.
pub fn merge_labels(labels: &[ResidencyLabel]) -> ResidencyLabel {
    if labels.contains(&ResidencyLabel::Resident) {
        return ResidencyLabel::Resident;
    }
    if labels.contains(&ResidencyLabel::ResidentEstimated) {
        return ResidencyLabel::ResidentEstimated;
    }

    // (label, count) in first-seen order
    let mut counts: Vec<(ResidencyLabel, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((*label, 1)),
        }
    }

    // Strict comparison keeps the earliest label on ties
    let mut best: Option<(ResidencyLabel, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label)
        .unwrap_or(ResidencyLabel::Investment)
}

// ============================================================================
// RECONCILE
// ============================================================================

/// Collapse owner rows into one record per unit identifier.
///
/// Output order follows the first appearance of each unit; rows of a unit do
/// not need to be adjacent. Rows without a label do not vote.
pub fn reconcile(rows: &[OwnerRow]) -> Vec<HouseholdRecord> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&OwnerRow>> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.unit_id.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }

    groups
        .into_iter()
        .filter_map(|group| {
            let first = *group.first()?;

            let labels: Vec<ResidencyLabel> = group.iter().filter_map(|r| r.residency).collect();
            let residency = merge_labels(&labels);

            let count_of = |kind: OwnershipType| {
                group
                    .iter()
                    .filter(|r| r.ownership_type == Some(kind))
                    .count()
            };

            let mut representative = first.clone();
            representative.residency = Some(residency);

            debug!(
                unit = %first.unit_id,
                members = group.len(),
                label = residency.code(),
                "reconciled household"
            );

            Some(HouseholdRecord {
                representative,
                residency,
                total_members: group.len(),
                co_owner_count: count_of(OwnershipType::CoOwner),
                sole_owner_count: count_of(OwnershipType::SoleOwner),
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
