use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::household::HouseholdRecord;
use crate::residency::ResidencyLabel;
use crate::rules::{LienStatus, OwnershipType};

/// One co-owner of one unit, as delivered by the registry extraction.
///
/// Source fields are read once and not touched again; the derived fields at
/// the bottom are filled in by the pipeline.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OwnerRow {
    // ========================================================================
    // UNIT & ADDRESSES
    // ========================================================================
    /// Building + unit, e.g. "1동 101호"
    #[serde(rename = "동호수")]
    pub unit_id: String,

    #[serde(rename = "소유자_주소", default)]
    pub owner_address: Option<String>,

    #[serde(rename = "아파트_소재지", default)]
    pub property_address: Option<String>,

    #[serde(rename = "도로명주소", default)]
    pub road_address: Option<String>,

    // ========================================================================
    // OWNER
    // ========================================================================
    #[serde(rename = "소유자명", default)]
    pub owner_name: Option<String>,

    #[serde(rename = "생년월일", default)]
    pub birth_date: Option<String>,

    // ========================================================================
    // REGISTRY DETAILS (pass-through)
    // ========================================================================
    #[serde(rename = "건축물_연면적", default)]
    pub building_area: Option<String>,

    #[serde(rename = "등기목적", default)]
    pub registration_purpose: Option<String>,

    #[serde(rename = "등기원인", default)]
    pub registration_cause: Option<String>,

    #[serde(rename = "권리종류", default)]
    pub right_type: Option<String>,

    #[serde(rename = "권리내용", default)]
    pub right_content: Option<String>,

    #[serde(rename = "보유기간", default)]
    pub holding_period: Option<String>,

    #[serde(rename = "소유구분", default)]
    pub ownership_division: Option<String>,

    #[serde(rename = "공유여부", default)]
    pub share_marker: Option<String>,

    // ========================================================================
    // DERIVED
    // ========================================================================
    #[serde(rename = "소유형태", default)]
    pub ownership_type: Option<OwnershipType>,

    #[serde(rename = "등기목적_분류", default)]
    pub registration_category: Option<String>,

    #[serde(rename = "근저당설정여부", default)]
    pub lien: Option<LienStatus>,

    #[serde(rename = "압류가압류", default)]
    pub seizure: Option<String>,

    #[serde(rename = "거주형태", default)]
    pub residency: Option<ResidencyLabel>,
}

impl OwnerRow {
    pub fn new(unit_id: &str, owner_address: Option<&str>, property_address: Option<&str>) -> Self {
        OwnerRow {
            unit_id: unit_id.to_string(),
            owner_address: owner_address.map(str::to_string),
            property_address: property_address.map(str::to_string),
            ..OwnerRow::default()
        }
    }

    /// Builder pattern: set ownership type
    pub fn with_ownership(mut self, ownership_type: OwnershipType) -> Self {
        self.ownership_type = Some(ownership_type);
        self
    }

    /// Builder pattern: set residency label
    pub fn with_residency(mut self, label: ResidencyLabel) -> Self {
        self.residency = Some(label);
        self
    }

    /// Builder pattern: set owner name
    pub fn with_owner_name(mut self, name: &str) -> Self {
        self.owner_name = Some(name.to_string());
        self
    }

    /// Builder pattern: set right type and content (권리종류 / 권리내용)
    pub fn with_rights(mut self, right_type: &str, right_content: &str) -> Self {
        self.right_type = Some(right_type.to_string());
        self.right_content = Some(right_content.to_string());
        self
    }

    /// Builder pattern: set registration purpose and cause
    pub fn with_registration(mut self, purpose: &str, cause: &str) -> Self {
        self.registration_purpose = Some(purpose.to_string());
        self.registration_cause = Some(cause.to_string());
        self
    }

    pub fn owner_address_str(&self) -> &str {
        self.owner_address.as_deref().unwrap_or_default()
    }

    pub fn property_address_str(&self) -> &str {
        self.property_address.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// HOUSEHOLD EXPORT (flat row for CSV)
// ============================================================================

/// Final column set, one row per household.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HouseholdExport {
    #[serde(rename = "소유자명")]
    pub owner_name: Option<String>,
    #[serde(rename = "생년월일")]
    pub birth_date: Option<String>,
    #[serde(rename = "동호수")]
    pub unit_id: String,
    #[serde(rename = "소유자_주소")]
    pub owner_address: Option<String>,
    #[serde(rename = "아파트_소재지")]
    pub property_address: Option<String>,
    #[serde(rename = "도로명주소")]
    pub road_address: Option<String>,
    #[serde(rename = "건축물_연면적")]
    pub building_area: Option<String>,
    #[serde(rename = "거주형태")]
    pub residency: ResidencyLabel,
    #[serde(rename = "등기목적_분류")]
    pub registration_category: Option<String>,
    #[serde(rename = "등기원인")]
    pub registration_cause: Option<String>,
    #[serde(rename = "근저당설정여부")]
    pub lien: Option<LienStatus>,
    #[serde(rename = "보유기간")]
    pub holding_period: Option<String>,
    #[serde(rename = "압류가압류")]
    pub seizure: Option<String>,
    #[serde(rename = "소유형태")]
    pub ownership_type: Option<OwnershipType>,
    #[serde(rename = "세대유형")]
    pub household_type: String,
    #[serde(rename = "총인원수")]
    pub total_members: usize,
    #[serde(rename = "공유자수")]
    pub co_owner_count: usize,
    #[serde(rename = "단독소유자수")]
    pub sole_owner_count: usize,
}

impl From<&HouseholdRecord> for HouseholdExport {
    fn from(household: &HouseholdRecord) -> Self {
        let row = &household.representative;
        HouseholdExport {
            owner_name: row.owner_name.clone(),
            birth_date: row.birth_date.clone(),
            unit_id: row.unit_id.clone(),
            owner_address: row.owner_address.clone(),
            property_address: row.property_address.clone(),
            road_address: row.road_address.clone(),
            building_area: row.building_area.clone(),
            residency: household.residency,
            registration_category: row.registration_category.clone(),
            registration_cause: row.registration_cause.clone(),
            lien: row.lien,
            holding_period: row.holding_period.clone(),
            seizure: row.seizure.clone(),
            ownership_type: row.ownership_type,
            household_type: household.household_type().as_str().to_string(),
            total_members: household.total_members,
            co_owner_count: household.co_owner_count,
            sole_owner_count: household.sole_owner_count,
        }
    }
}

// ============================================================================
// CSV I/O
// ============================================================================

/// Read owner rows from any CSV source with Korean headers.
pub fn read_owner_rows<R: Read>(reader: R) -> Result<Vec<OwnerRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header line, 1-based numbering
        let row: OwnerRow = result
            .with_context(|| format!("Failed to deserialize owner row at line {}", index + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_owner_rows(csv_path: &Path) -> Result<Vec<OwnerRow>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;
    let rows = read_owner_rows(file)?;

    info!(path = %csv_path.display(), rows = rows.len(), "loaded owner rows");
    Ok(rows)
}

/// Write one export row per household.
pub fn write_households_to<W: Write>(writer: W, households: &[HouseholdRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for household in households {
        wtr.serialize(HouseholdExport::from(household))
            .with_context(|| format!("Failed to write household {}", household.unit_id()))?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

pub fn write_households(csv_path: &Path, households: &[HouseholdRecord]) -> Result<()> {
    let file = std::fs::File::create(csv_path)
        .with_context(|| format!("Failed to create CSV file: {:?}", csv_path))?;
    write_households_to(file, households)?;

    info!(path = %csv_path.display(), households = households.len(), "wrote households");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::reconcile;

    const INPUT: &str = "\
동호수,소유자명,소유자_주소,아파트_소재지,소유구분,공유여부
1동 101호,김철수,서울특별시 광진구 구의동 76-1 1동 101호,서울특별시 광진구 구의동 76-1 1동 101호,공유,-
1동 101호,이영희,부산광역시 해운대구 우동 1408,서울특별시 광진구 구의동 76-1 1동 101호,공유,-
1동 102호,박민수,,서울특별시 광진구 구의동 76-1 1동 102호,소유자,
";

    #[test]
    fn test_read_owner_rows() {
        let rows = read_owner_rows(INPUT.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].unit_id, "1동 101호");
        assert_eq!(rows[0].owner_name.as_deref(), Some("김철수"));
        assert_eq!(rows[1].share_marker.as_deref(), Some("-"));
        assert_eq!(rows[2].owner_address, None);
        assert_eq!(rows[2].residency, None);
        assert_eq!(rows[2].ownership_type, None);
    }

    #[test]
    fn test_read_prelabeled_rows() {
        let input = "동호수,소유형태,거주형태\n1동 101호,공유자,실거주(추정)\n";
        let rows = read_owner_rows(input.as_bytes()).unwrap();

        assert_eq!(rows[0].ownership_type, Some(OwnershipType::CoOwner));
        assert_eq!(rows[0].residency, Some(ResidencyLabel::ResidentEstimated));
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let input = "동호수,거주형태\n1동 101호,모름\n";
        assert!(read_owner_rows(input.as_bytes()).is_err());
    }

    #[test]
    fn test_write_households() {
        let rows = vec![
            OwnerRow::new("1동 101호", Some("a"), Some("b"))
                .with_owner_name("김철수")
                .with_ownership(OwnershipType::CoOwner)
                .with_residency(ResidencyLabel::Investment),
            OwnerRow::new("1동 101호", Some("c"), Some("b"))
                .with_ownership(OwnershipType::CoOwner)
                .with_residency(ResidencyLabel::Resident),
        ];
        let households = reconcile(&rows);

        let mut buffer = Vec::new();
        write_households_to(&mut buffer, &households).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let mut lines = output.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("소유자명,생년월일,동호수"));
        assert!(header.ends_with("세대유형,총인원수,공유자수,단독소유자수"));

        let record = lines.next().unwrap();
        assert!(record.starts_with("김철수,,1동 101호,a,b"));
        assert!(record.contains(",실거주,"));
        assert!(record.ends_with("공유세대,2,2,0"));
        assert_eq!(lines.next(), None);
    }
}
