// 🔢 Component Extractors - building (동), unit (호) and lot (지번) tokens
//
// Each extractor reports the first capture of the first pattern that matches.
// No match is a normal outcome and yields None.

use regex::Regex;
use std::sync::LazyLock;

/// "101동" or "제101동"; the leftmost occurrence wins
static BUILDING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"제?(\d+)동").expect("building pattern"));

/// "101호" or "제101호", with an optional "-N" sub-unit ("102-1호")
static UNIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"제?(\d+(?:-\d+)?)호").expect("unit pattern"));

/// Lot number right after a 동/읍/면/가 character: "구의동 76-1" before "구의동76-1"
static LOT_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"[동읍면가]\s+(\d+(?:-\d+)?)").expect("lot pattern"),
        Regex::new(r"[동읍면가](\d+(?:-\d+)?)").expect("lot pattern"),
    ]
});

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Building and unit number of an address: `(동, 호)`.
///
/// ```
/// use registry_residency::extract_unit;
///
/// let (building, unit) = extract_unit("서울특별시 광진구 구의동 제1동 제102-1호");
/// assert_eq!(building.as_deref(), Some("1"));
/// assert_eq!(unit.as_deref(), Some("102-1"));
/// ```
pub fn extract_unit(address: &str) -> (Option<String>, Option<String>) {
    (
        first_capture(std::slice::from_ref(&*BUILDING_PATTERN), address),
        first_capture(std::slice::from_ref(&*UNIT_PATTERN), address),
    )
}

/// Land-parcel number (지번) of an address, e.g. "76-1".
pub fn extract_lot_number(address: &str) -> Option<String> {
    first_capture(LOT_PATTERNS.as_slice(), address)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_building_and_unit() {
        let (building, unit) = extract_unit("1동 101호");
        assert_eq!(building, Some("1".to_string()));
        assert_eq!(unit, Some("101".to_string()));
    }

    #[test]
    fn test_ordinal_marker_is_stripped() {
        let (building, unit) = extract_unit("래미안아파트 제103동 제1502호");
        assert_eq!(building, Some("103".to_string()));
        assert_eq!(unit, Some("1502".to_string()));
    }

    #[test]
    fn test_leftmost_number_wins_regardless_of_marker() {
        let (building, _) = extract_unit("2동 상가 제5동");
        assert_eq!(building, Some("2".to_string()));

        let (building, unit) = extract_unit("현대아파트 101동 1203호 (관리동 제3호)");
        assert_eq!(building, Some("101".to_string()));
        assert_eq!(unit, Some("1203".to_string()));
    }

    #[test]
    fn test_sub_unit_suffix_kept() {
        let (_, unit) = extract_unit("구의동 76-1 102-1호");
        assert_eq!(unit, Some("102-1".to_string()));
    }

    #[test]
    fn test_neighborhood_name_is_not_a_building() {
        let (building, unit) = extract_unit("서울특별시 강남구 역삼동 76-1");
        assert_eq!(building, None);
        assert_eq!(unit, None);
    }

    #[test]
    fn test_lot_number_with_and_without_space() {
        assert_eq!(extract_lot_number("강남구 역삼동 76-1"), Some("76-1".to_string()));
        assert_eq!(extract_lot_number("광진구 구의동76-1"), Some("76-1".to_string()));
        assert_eq!(extract_lot_number("능서면 41"), Some("41".to_string()));
    }

    #[test]
    fn test_lot_number_missing() {
        assert_eq!(extract_lot_number("테헤란로 152"), None);
        assert_eq!(extract_lot_number(""), None);
    }
}
