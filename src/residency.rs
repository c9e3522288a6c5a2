// 🏘️ Residency Classifier - does the owner live in the unit they own?
//
// Tiered comparison of the owner's registered address with the property
// address. Tiers run from the most specific signal to the coarsest and the
// first conclusive tier decides:
//
//   0. missing data          → 정보없음
//   1. unit number (호)       → 실거주 / 투자
//   2. lot number (지번)      → 실거주
//   3. administrative key    → 실거주(추정) / 정보없음
//   4. district prefix       → 같은구
//   5. default               → 투자

use crate::address::{non_blank, AddressRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Key prefix compared at district granularity (province short form + 시/군/구 + 1)
pub const DEFAULT_DISTRICT_PREFIX_LEN: usize = 6;

// ============================================================================
// RESIDENCY LABEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidencyLabel {
    /// One of the addresses is missing or unusable
    #[serde(rename = "정보없음")]
    NoInfo,

    /// Same unit
    #[serde(rename = "실거주")]
    Resident,

    /// Same neighborhood, no unit numbers to confirm
    #[serde(rename = "실거주(추정)")]
    ResidentEstimated,

    /// Same district only
    #[serde(rename = "같은구")]
    SameDistrict,

    /// Lives elsewhere
    #[serde(rename = "투자")]
    Investment,
}

impl ResidencyLabel {
    pub const ALL: [ResidencyLabel; 5] = [
        ResidencyLabel::NoInfo,
        ResidencyLabel::Resident,
        ResidencyLabel::ResidentEstimated,
        ResidencyLabel::SameDistrict,
        ResidencyLabel::Investment,
    ];

    /// Registry label as written in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidencyLabel::NoInfo => "정보없음",
            ResidencyLabel::Resident => "실거주",
            ResidencyLabel::ResidentEstimated => "실거주(추정)",
            ResidencyLabel::SameDistrict => "같은구",
            ResidencyLabel::Investment => "투자",
        }
    }

    /// Variant name, for logs
    pub fn code(&self) -> &'static str {
        match self {
            ResidencyLabel::NoInfo => "NoInfo",
            ResidencyLabel::Resident => "Resident",
            ResidencyLabel::ResidentEstimated => "ResidentEstimated",
            ResidencyLabel::SameDistrict => "SameDistrict",
            ResidencyLabel::Investment => "Investment",
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, ResidencyLabel::Resident | ResidencyLabel::ResidentEstimated)
    }
}

impl fmt::Display for ResidencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResidencyLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ResidencyLabel::ALL
            .iter()
            .find(|label| label.as_str() == s || label.code().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown residency label: {}", s))
    }
}

// ============================================================================
// DECISION (label + provenance)
// ============================================================================

/// Which tier produced the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    MissingData,
    UnitNumber,
    LotNumber,
    AdministrativeKey,
    District,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidencyDecision {
    pub label: ResidencyLabel,
    pub tier: MatchTier,

    /// Human-readable reason, for manual review
    pub reason: String,
}

impl ResidencyDecision {
    fn new(label: ResidencyLabel, tier: MatchTier, reason: String) -> Self {
        ResidencyDecision { label, tier, reason }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidencyClassifier {
    /// Characters of the administrative key compared by the lot and district tiers
    pub district_prefix_len: usize,
}

impl ResidencyClassifier {
    pub fn new() -> Self {
        ResidencyClassifier {
            district_prefix_len: DEFAULT_DISTRICT_PREFIX_LEN,
        }
    }

    pub fn with_prefix_len(district_prefix_len: usize) -> Self {
        ResidencyClassifier { district_prefix_len }
    }

    /// Label only
    pub fn classify(&self, owner_address: &str, property_address: &str) -> ResidencyLabel {
        self.decide(owner_address, property_address).label
    }

    /// Label with the tier that decided it
    pub fn decide(&self, owner_address: &str, property_address: &str) -> ResidencyDecision {
        // Tier 0: missing data
        let (Some(owner_raw), Some(property_raw)) =
            (non_blank(Some(owner_address)), non_blank(Some(property_address)))
        else {
            return ResidencyDecision::new(
                ResidencyLabel::NoInfo,
                MatchTier::MissingData,
                "Owner or property address is missing".to_string(),
            );
        };

        let owner = AddressRecord::parse(owner_raw);
        let property = AddressRecord::parse(property_raw);

        let decision = self.decide_parsed(&owner, &property);
        debug!(
            label = decision.label.code(),
            tier = ?decision.tier,
            "{}",
            decision.reason
        );
        decision
    }

    fn decide_parsed(&self, owner: &AddressRecord, property: &AddressRecord) -> ResidencyDecision {
        // Tier 1: unit number
        let mut unconfirmed_unit = None;
        if let (Some(owner_ho), Some(property_ho)) = (&owner.unit_number, &property.unit_number) {
            if owner_ho != property_ho {
                return ResidencyDecision::new(
                    ResidencyLabel::Investment,
                    MatchTier::UnitNumber,
                    format!("Unit mismatch: {}호 ≠ {}호", owner_ho, property_ho),
                );
            }

            match (&owner.building_number, &property.building_number) {
                (Some(owner_dong), Some(property_dong)) if owner_dong != property_dong => {
                    // Same 호 in another 동: let the district check speak first
                    unconfirmed_unit = Some(format!(
                        "Unit match {}호 across buildings {}동 ≠ {}동",
                        owner_ho, owner_dong, property_dong
                    ));
                }
                _ => {
                    return ResidencyDecision::new(
                        ResidencyLabel::Resident,
                        MatchTier::UnitNumber,
                        format!("Unit match: {}호", owner_ho),
                    );
                }
            }
        }

        let either_has_unit = owner.unit_number.is_some() || property.unit_number.is_some();
        let both_have_unit = owner.unit_number.is_some() && property.unit_number.is_some();

        // Tier 2: lot number (only when unit numbers can't be compared)
        if !both_have_unit {
            if let (Some(owner_lot), Some(property_lot)) = (&owner.lot_number, &property.lot_number) {
                if owner_lot == property_lot && self.same_district(owner, property) {
                    return ResidencyDecision::new(
                        ResidencyLabel::Resident,
                        MatchTier::LotNumber,
                        format!("Lot match: {} in {}", owner_lot, owner.administrative_key),
                    );
                }
            }
        }

        // Tier 3: full administrative key (only when no unit numbers at all)
        if !either_has_unit {
            if owner.is_key_empty() || property.is_key_empty() {
                return ResidencyDecision::new(
                    ResidencyLabel::NoInfo,
                    MatchTier::AdministrativeKey,
                    "Address could not be normalized".to_string(),
                );
            }

            if owner.administrative_key == property.administrative_key {
                return ResidencyDecision::new(
                    ResidencyLabel::ResidentEstimated,
                    MatchTier::AdministrativeKey,
                    format!("Same neighborhood: {}", owner.administrative_key),
                );
            }
        }

        // Tier 4: district
        if self.same_district(owner, property) {
            return ResidencyDecision::new(
                ResidencyLabel::SameDistrict,
                MatchTier::District,
                format!(
                    "Same district: {} ≈ {}",
                    owner.administrative_key, property.administrative_key
                ),
            );
        }

        if let Some(reason) = unconfirmed_unit {
            return ResidencyDecision::new(ResidencyLabel::Resident, MatchTier::UnitNumber, reason);
        }

        // Tier 5: default
        ResidencyDecision::new(
            ResidencyLabel::Investment,
            MatchTier::Default,
            format!(
                "Different area: {} vs {}",
                owner.administrative_key, property.administrative_key
            ),
        )
    }

    /// Both keys at least `district_prefix_len` characters long and sharing that prefix
    fn same_district(&self, owner: &AddressRecord, property: &AddressRecord) -> bool {
        match (
            owner.key_prefix(self.district_prefix_len),
            property.key_prefix(self.district_prefix_len),
        ) {
            (Some(a), Some(b)) => !a.is_empty() && a == b,
            _ => false,
        }
    }
}

impl Default for ResidencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default classifier settings.
///
/// ```
/// use registry_residency::{classify, ResidencyLabel};
///
/// assert_eq!(classify("1동 101호", "1동 101호"), ResidencyLabel::Resident);
/// assert_eq!(classify("1동 101호", "1동 102호"), ResidencyLabel::Investment);
/// assert_eq!(classify("", "1동 101호"), ResidencyLabel::NoInfo);
/// ```
pub fn classify(owner_address: &str, property_address: &str) -> ResidencyLabel {
    ResidencyClassifier::new().classify(owner_address, property_address)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROPERTY: &str = "서울특별시 광진구 구의동 76-1 현대아파트 1동 101호";

    #[test]
    fn test_missing_data() {
        assert_eq!(classify("", PROPERTY), ResidencyLabel::NoInfo);
        assert_eq!(classify(PROPERTY, ""), ResidencyLabel::NoInfo);
        assert_eq!(classify("  ", "  "), ResidencyLabel::NoInfo);

        let decision = ResidencyClassifier::new().decide("", PROPERTY);
        assert_eq!(decision.tier, MatchTier::MissingData);
    }

    #[test]
    fn test_unit_match() {
        assert_eq!(classify("1동 101호", "1동 101호"), ResidencyLabel::Resident);
        assert_eq!(classify(PROPERTY, PROPERTY), ResidencyLabel::Resident);
        assert_eq!(classify("제1동 제101호", "1동 101호"), ResidencyLabel::Resident);
    }

    #[test]
    fn test_unit_match_without_building_number() {
        assert_eq!(
            classify("서울특별시 광진구 구의동 101호", PROPERTY),
            ResidencyLabel::Resident
        );
    }

    #[test]
    fn test_trailing_annex_unit_does_not_override_unit() {
        let owner = "서울특별시 광진구 구의동 현대아파트 101동 1203호 (관리동 제3호)";
        let property = "서울특별시 광진구 구의동 현대아파트 101동 1203호";
        let decision = ResidencyClassifier::new().decide(owner, property);

        assert_eq!(decision.label, ResidencyLabel::Resident);
        assert_eq!(decision.tier, MatchTier::UnitNumber);
    }

    #[test]
    fn test_building_mismatch_tolerated() {
        assert_eq!(classify("1동 101호", "2동 101호"), ResidencyLabel::Resident);
    }

    #[test]
    fn test_building_mismatch_defers_to_district() {
        let owner = "서울특별시 광진구 구의동 76-1 현대아파트 2동 101호";
        let decision = ResidencyClassifier::new().decide(owner, PROPERTY);

        assert_eq!(decision.label, ResidencyLabel::SameDistrict);
        assert_eq!(decision.tier, MatchTier::District);
    }

    #[test]
    fn test_unit_mismatch_is_decisive() {
        assert_eq!(classify("1동 101호", "1동 102호"), ResidencyLabel::Investment);

        // Same neighborhood and lot, but another unit
        let owner = "서울특별시 광진구 구의동 76-1 현대아파트 1동 102호";
        let decision = ResidencyClassifier::new().decide(owner, PROPERTY);
        assert_eq!(decision.label, ResidencyLabel::Investment);
        assert_eq!(decision.tier, MatchTier::UnitNumber);
    }

    #[test]
    fn test_sub_unit_is_part_of_the_unit_number() {
        assert_eq!(classify("1동 102-1호", "1동 102-2호"), ResidencyLabel::Investment);
        assert_eq!(classify("1동 102-1호", "1동 102-1호"), ResidencyLabel::Resident);
    }

    #[test]
    fn test_lot_fallback() {
        let address = "서울특별시 강남구 역삼동 76-1";
        let decision = ResidencyClassifier::new().decide(address, address);

        assert_eq!(decision.label, ResidencyLabel::Resident);
        assert_eq!(decision.tier, MatchTier::LotNumber);
    }

    #[test]
    fn test_lot_fallback_when_only_one_side_has_unit() {
        let owner = "서울특별시 강남구 역삼동 76-1";
        let property = "서울특별시 강남구 역삼동 76-1 5층 501호";
        assert_eq!(classify(owner, property), ResidencyLabel::Resident);
    }

    #[test]
    fn test_lot_match_requires_same_district() {
        // Same lot number in another district
        let owner = "서울특별시 서초구 서초동 76-1";
        let property = "서울특별시 강남구 역삼동 76-1";
        assert_eq!(classify(owner, property), ResidencyLabel::Investment);
    }

    #[test]
    fn test_same_neighborhood_estimated() {
        let owner = "서울특별시 강남구 역삼동 12";
        let property = "서울 강남구 테헤란로 152 (역삼동)";
        let decision = ResidencyClassifier::new().decide(owner, property);

        assert_eq!(decision.label, ResidencyLabel::ResidentEstimated);
        assert_eq!(decision.tier, MatchTier::AdministrativeKey);
    }

    #[test]
    fn test_unnormalizable_without_units_is_no_info() {
        assert_eq!(classify("123-45", "서울특별시 강남구 역삼동 12"), ResidencyLabel::NoInfo);
    }

    #[test]
    fn test_same_district() {
        // 상암동 vs 상수동 share "서울마포구상"
        let owner = "서울특별시 마포구 상암동 1600";
        let property = "서울특별시 마포구 상수동 72-1";
        let decision = ResidencyClassifier::new().decide(owner, property);

        assert_eq!(decision.label, ResidencyLabel::SameDistrict);
        assert_eq!(decision.tier, MatchTier::District);
    }

    #[test]
    fn test_six_character_prefix_reaches_into_neighborhood() {
        // "서울강남구" is 5 characters, so 역삼동 vs 삼성동 already differ at position 6
        let owner = "서울특별시 강남구 삼성동 5";
        let property = "서울특별시 강남구 역삼동 76-1";
        assert_eq!(classify(owner, property), ResidencyLabel::Investment);
    }

    #[test]
    fn test_configurable_prefix_len() {
        let classifier = ResidencyClassifier::with_prefix_len(5);
        let owner = "서울특별시 강남구 삼성동 5";
        let property = "서울특별시 강남구 역삼동 76-1";
        assert_eq!(classifier.classify(owner, property), ResidencyLabel::SameDistrict);
    }

    #[test]
    fn test_different_city_is_investment() {
        let owner = "부산광역시 해운대구 우동 1408";
        let decision = ResidencyClassifier::new().decide(owner, PROPERTY);

        assert_eq!(decision.label, ResidencyLabel::Investment);
        assert_eq!(decision.tier, MatchTier::Default);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let owner = "경기도 성남시 분당구 정자동 10";
        assert_eq!(classify(owner, PROPERTY), classify(owner, PROPERTY));
    }

    #[test]
    fn test_label_round_trip_through_str() {
        for label in ResidencyLabel::ALL {
            assert_eq!(label.as_str().parse::<ResidencyLabel>(), Ok(label));
            assert_eq!(label.code().parse::<ResidencyLabel>(), Ok(label));
        }
        assert!("거주".parse::<ResidencyLabel>().is_err());
    }

    #[test]
    fn test_label_serializes_in_korean() {
        let json = serde_json::to_string(&ResidencyLabel::ResidentEstimated).unwrap();
        assert_eq!(json, "\"실거주(추정)\"");
    }
}
