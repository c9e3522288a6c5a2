// 🏠 Address Normalizer - free-text Korean address → administrative key
//
// administrative key = region short form + 시/군/구 + 동/읍/면/가
// e.g. "서울특별시 강남구 역삼동 123-45" → "서울강남구역삼동"
//
// Nothing here fails: a step that finds nothing contributes an empty
// component, and an empty key means "not enough information".

pub mod extract;
pub mod region;

pub use extract::{extract_lot_number, extract_unit};
pub use region::{find_region, Region, RegionMatch, REGIONS};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("paren pattern"));

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-,.]").expect("separator pattern"));

/// 시/군/구
static DISTRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]+[시군구]").expect("district pattern"));

/// 동/읍/면/가
static NEIGHBORHOOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]+[동읍면가]").expect("neighborhood pattern"));

/// Treat None, "" and whitespace-only as missing.
pub fn non_blank(address: Option<&str>) -> Option<&str> {
    address.map(str::trim).filter(|a| !a.is_empty())
}

// ============================================================================
// NORMALIZE
// ============================================================================

/// Canonicalize an address into its administrative key.
///
/// ```
/// use registry_residency::normalize;
///
/// assert_eq!(normalize("서울특별시 강남구 역삼동 123-45"), "서울강남구역삼동");
/// assert_eq!(normalize("서울 강남구 역삼동(역삼동 123-45)"), "서울강남구역삼동");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let Some(raw) = non_blank(Some(raw)) else {
        return String::new();
    };

    // The parenthetical usually carries the legal neighborhood of a road-name address
    let paren_content = PAREN_GROUP
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let without_parens = PAREN_GROUP.replace_all(raw, "");
    let mut working = SEPARATORS.replace_all(&without_parens, " ").into_owned();

    let province = match find_region(&working) {
        Some(found) => {
            working.replace_range(found.span, " ");
            found.region.short
        }
        None => "",
    };

    let district = DISTRICT
        .find(&working)
        .map(|m| m.as_str())
        .unwrap_or_default();

    let neighborhood = NEIGHBORHOOD
        .find(&paren_content)
        .or_else(|| NEIGHBORHOOD.find(&working))
        .map(|m| m.as_str())
        .unwrap_or_default();

    format!("{province}{district}{neighborhood}")
}

/// First `n` characters of a key, or None when the key is shorter than `n`.
pub fn key_prefix(key: &str, n: usize) -> Option<&str> {
    match key.char_indices().nth(n) {
        Some((end, _)) => Some(&key[..end]),
        None if key.chars().count() == n => Some(key),
        None => None,
    }
}

// ============================================================================
// ADDRESS RECORD
// ============================================================================

/// Raw address plus everything derived from it.
///
/// Derived fields are computed once in `parse` and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub raw: String,
    pub administrative_key: String,
    pub building_number: Option<String>,
    pub unit_number: Option<String>,
    pub lot_number: Option<String>,
}

impl AddressRecord {
    pub fn parse(raw: &str) -> Self {
        let (building_number, unit_number) = extract_unit(raw);

        AddressRecord {
            raw: raw.to_string(),
            administrative_key: normalize(raw),
            building_number,
            unit_number,
            lot_number: extract_lot_number(raw),
        }
    }

    /// True when normalization found nothing usable
    pub fn is_key_empty(&self) -> bool {
        self.administrative_key.is_empty()
    }

    /// District-level prefix of the key (see `key_prefix`)
    pub fn key_prefix(&self, n: usize) -> Option<&str> {
        key_prefix(&self.administrative_key, n)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_province_name() {
        assert_eq!(normalize("서울특별시 강남구 역삼동 123-45"), "서울강남구역삼동");
        assert_eq!(normalize("경기도 성남시 분당구 정자동 10"), "경기성남시정자동");
    }

    #[test]
    fn test_differently_formatted_addresses_agree() {
        assert_eq!(
            normalize("서울특별시 강남구 역삼동 123-45"),
            normalize("서울 강남구 역삼동(역삼동 123-45)")
        );
    }

    #[test]
    fn test_parenthetical_neighborhood_wins() {
        // Road-name address: the legal 동 only appears in parentheses
        assert_eq!(
            normalize("서울특별시 광진구 아차산로 400 (구의동, 현대아파트)"),
            "서울광진구구의동"
        );
    }

    #[test]
    fn test_province_short_forms_in_keys() {
        assert_eq!(normalize("충청북도 청주시 상당구 용암동"), "충북청주시용암동");
        assert_eq!(normalize("제주특별자치도 제주시 노형동 1"), "제주제주시노형동");
        assert_eq!(normalize("세종특별자치시 한솔동"), "세종한솔동");
    }

    #[test]
    fn test_missing_province() {
        assert_eq!(normalize("강남구 역삼동 76-1"), "강남구역삼동");
    }

    #[test]
    fn test_insufficient_information() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("1동 101호"), "");
        assert_eq!(normalize("123-45"), "");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let address = "부산광역시 해운대구 우동 1408 (우동, 해운대아이파크)";
        assert_eq!(normalize(address), normalize(address));
        assert_eq!(normalize(address), "부산해운대구우동");
    }

    #[test]
    fn test_key_prefix_counts_characters() {
        assert_eq!(key_prefix("서울강남구역삼동", 6), Some("서울강남구역"));
        assert_eq!(key_prefix("서울강남구", 6), None);
        assert_eq!(key_prefix("서울강남구역", 6), Some("서울강남구역"));
        assert_eq!(key_prefix("", 6), None);
    }

    #[test]
    fn test_address_record_parse() {
        let record = AddressRecord::parse("서울특별시 광진구 구의동 76-1 101동 1203호");

        assert_eq!(record.administrative_key, "서울광진구구의동");
        assert_eq!(record.building_number.as_deref(), Some("101"));
        assert_eq!(record.unit_number.as_deref(), Some("1203"));
        assert_eq!(record.lot_number.as_deref(), Some("76-1"));
        assert!(!record.is_key_empty());
        assert_eq!(record.key_prefix(6), Some("서울광진구구"));
    }
}
