// Registry Residency - Core Library
// Owner-occupancy classification for apartment registry (등기부등본) owner rolls

pub mod address;     // Address Normalizer
pub mod residency;   // Residency Classifier
pub mod household;   // Household Reconciler
pub mod rules;       // Registration cause / lien / seizure / ownership rules
pub mod records;     // OwnerRow + CSV edge
pub mod pipeline;    // label → reconcile → summary

// Re-export commonly used types
pub use address::{
    extract_lot_number, extract_unit, find_region, normalize,
    AddressRecord, Region, RegionMatch, REGIONS,
};
pub use residency::{
    classify, MatchTier, ResidencyClassifier, ResidencyDecision, ResidencyLabel,
    DEFAULT_DISTRICT_PREFIX_LEN,
};
pub use household::{merge_labels, reconcile, HouseholdRecord, HouseholdType};
pub use rules::{
    lien_status, ownership_type, seizure_status,
    CauseRule, LienStatus, OwnershipType, RuleEngine, Seizure,
};
pub use records::{
    load_owner_rows, read_owner_rows, write_households, write_households_to,
    HouseholdExport, OwnerRow,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
