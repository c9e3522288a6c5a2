// 🗺️ Region Table - top-level administrative regions (시/도)
//
// Closed enumeration: the order of REGIONS decides which name wins when an
// address mentions more than one, so it lives in one auditable table.

use std::ops::Range;

// ============================================================================
// REGION ENTITY
// ============================================================================

/// One top-level region (특별시 / 광역시 / 특별자치시 / 도).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Canonical registry name, e.g. "서울특별시"
    pub name: &'static str,

    /// Two-character core used in administrative keys, e.g. "서울"
    pub short: &'static str,

    /// Other full names that refer to the same region (renamed provinces)
    pub long_aliases: &'static [&'static str],

    /// Bare tokens accepted when written as a whole word, e.g. "서울", "서울시"
    pub tokens: &'static [&'static str],
}

impl Region {
    /// All full names (canonical first, then long aliases)
    pub fn full_names(&self) -> impl Iterator<Item = &'static str> {
        let aliases: &'static [&'static str] = self.long_aliases;
        std::iter::once(self.name).chain(aliases.iter().copied())
    }

    /// Whole-word short token check
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| *t == token)
    }
}

/// Matching order: 7 special/metropolitan cities, 세종, then 9 provinces.
pub static REGIONS: [Region; 17] = [
    Region { name: "서울특별시", short: "서울", long_aliases: &[], tokens: &["서울", "서울시"] },
    Region { name: "부산광역시", short: "부산", long_aliases: &[], tokens: &["부산"] },
    Region { name: "대구광역시", short: "대구", long_aliases: &[], tokens: &["대구"] },
    Region { name: "인천광역시", short: "인천", long_aliases: &[], tokens: &["인천"] },
    Region { name: "광주광역시", short: "광주", long_aliases: &[], tokens: &["광주"] },
    Region { name: "대전광역시", short: "대전", long_aliases: &[], tokens: &["대전"] },
    Region { name: "울산광역시", short: "울산", long_aliases: &[], tokens: &["울산"] },
    Region { name: "세종특별자치시", short: "세종", long_aliases: &[], tokens: &["세종", "세종시"] },
    Region { name: "경기도", short: "경기", long_aliases: &[], tokens: &["경기"] },
    Region { name: "강원도", short: "강원", long_aliases: &["강원특별자치도"], tokens: &["강원"] },
    Region { name: "충청북도", short: "충북", long_aliases: &[], tokens: &["충북"] },
    Region { name: "충청남도", short: "충남", long_aliases: &[], tokens: &["충남"] },
    Region { name: "전라북도", short: "전북", long_aliases: &["전북특별자치도"], tokens: &["전북"] },
    Region { name: "전라남도", short: "전남", long_aliases: &[], tokens: &["전남"] },
    Region { name: "경상북도", short: "경북", long_aliases: &[], tokens: &["경북"] },
    Region { name: "경상남도", short: "경남", long_aliases: &[], tokens: &["경남"] },
    Region { name: "제주특별자치도", short: "제주", long_aliases: &[], tokens: &["제주"] },
];

// ============================================================================
// LOOKUP
// ============================================================================

/// A region found inside an address, with the byte range it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMatch {
    pub region: &'static Region,
    pub span: Range<usize>,
}

/// Find the region an address refers to.
///
/// Full names are tried first in table order (first entry that occurs
/// anywhere wins). Failing that, the earliest whitespace-delimited token that
/// equals a short token is used.
pub fn find_region(address: &str) -> Option<RegionMatch> {
    for region in REGIONS.iter() {
        for name in region.full_names() {
            if let Some(start) = address.find(name) {
                return Some(RegionMatch {
                    region,
                    span: start..start + name.len(),
                });
            }
        }
    }

    let mut offset = 0;
    for token in address.split_whitespace() {
        // split_whitespace hands out subslices, so locate each one from the cursor
        let start = offset + address[offset..].find(token)?;
        offset = start + token.len();

        if let Some(region) = REGIONS.iter().find(|r| r.has_token(token)) {
            return Some(RegionMatch {
                region,
                span: start..offset,
            });
        }
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================
