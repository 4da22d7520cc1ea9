//! Fixed field sets the classifier and composer are driven by.
//!
//! The layer schema is remote and may change at any time; these sets are
//! not. They are bundled into a [`FieldSets`] value that is passed around
//! explicitly so alternate layers can supply their own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const NAME_FIELD: &str = "Name";
pub const PHONE_FIELD: &str = "Phone_number";
pub const ADDRESS_FIELD: &str = "Address";
pub const ADDRESS_SUITE_FIELD: &str = "Address_w_suit__";
pub const LATITUDE_FIELD: &str = "Latitude";
pub const LONGITUDE_FIELD: &str = "Longitude";
pub const AGENCY_NAME_FIELD: &str = "Agency_Name";
pub const SEARCH_TERMS_FIELD: &str = "Search_Terms";

/// Identity and audit fields maintained by the feature store.
pub const SYSTEM_FIELDS: &[&str] = &[
    "ObjectId",
    "OBJECTID",
    "GlobalID",
    "GlobalId",
    "Shape",
    "Shape_Area",
    "Shape_Length",
    "CreationDate",
    "Creator",
    "EditDate",
    "Editor",
];

/// Read-only identity fields carried through an edit unchanged.
pub const IDENTITY_FIELDS: &[&str] = &["ObjectId", "OBJECTID", "GlobalID", "GlobalId"];

/// Fields with dedicated handling (phone formatting, geocoded address).
pub const CUSTOM_FIELDS: &[&str] = &[
    NAME_FIELD,
    PHONE_FIELD,
    ADDRESS_FIELD,
    ADDRESS_SUITE_FIELD,
    LATITUDE_FIELD,
    LONGITUDE_FIELD,
];

/// Service availability flags in canonical order.
pub const SERVICE_FLAGS: &[&str] = &[
    "Home_Health_Services",
    "Adult_Day_Services",
    "Benefits_Counseling",
    "Elder_Housing_Resources",
    "Assisted_Living",
    "Elder_Abuse",
    "Home_Repair",
    "Immigration_Assistance",
    "Long_term_Care_Ombudsman",
    "Long_term_Care_Nursing_Homes",
    "Senior_Exercise_Programs",
    "Dementia_Support_Programs",
    "Transportation",
    "Senior_Centers",
    "Caregiver_Support_Services",
    "Case_Management",
    "Congregate_Meals",
    "Financial_Counseling",
    "Health_Education_Workshops",
    "Home_Delivered_Meals",
    "Hospice_Care",
    "Technology_Training",
    "Cultural_Programming",
    "Mental_Health",
    "Vaccinations_Screening",
    "Outreach_and_Advocacy",
    "Lending_Closet",
    "Independent_Living",
    "Homemakers_Personal_Support",
    "Independent_Housing",
];

/// Frozen membership sets used to classify and compose records.
///
/// Built once and never mutated; construct a new value to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSetsDef", into = "FieldSetsDef")]
pub struct FieldSets {
    system: HashSet<String>,
    identity: HashSet<String>,
    custom: Vec<String>,
    custom_set: HashSet<String>,
    service_flags: Vec<String>,
    service_flag_set: HashSet<String>,
}

impl FieldSets {
    /// Build field sets. Identity fields are always treated as system fields.
    /// Repeated service flags keep their first position.
    pub fn new<I, S>(system: I, identity: I, custom: I, service_flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identity: HashSet<String> = identity.into_iter().map(Into::into).collect();
        let mut system: HashSet<String> = system.into_iter().map(Into::into).collect();
        system.extend(identity.iter().cloned());

        let custom = dedup(custom.into_iter().map(Into::into));
        let custom_set = custom.iter().cloned().collect();

        let service_flags = dedup(service_flags.into_iter().map(Into::into));
        let service_flag_set = service_flags.iter().cloned().collect();

        Self {
            system,
            identity,
            custom,
            custom_set,
            service_flags,
            service_flag_set,
        }
    }

    pub fn is_system(&self, name: &str) -> bool {
        self.system.contains(name)
    }

    pub fn is_identity(&self, name: &str) -> bool {
        self.identity.contains(name)
    }

    pub fn is_custom(&self, name: &str) -> bool {
        self.custom_set.contains(name)
    }

    pub fn is_service_flag(&self, name: &str) -> bool {
        self.service_flag_set.contains(name)
    }

    /// Custom fields in declaration order.
    pub fn custom_fields(&self) -> &[String] {
        &self.custom
    }

    /// Service flags in canonical order.
    pub fn service_flags(&self) -> &[String] {
        &self.service_flags
    }
}

impl Default for FieldSets {
    fn default() -> Self {
        Self::new(
            SYSTEM_FIELDS.to_vec(),
            IDENTITY_FIELDS.to_vec(),
            CUSTOM_FIELDS.to_vec(),
            SERVICE_FLAGS.to_vec(),
        )
    }
}

fn dedup(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.filter(|n| seen.insert(n.clone())).collect()
}

#[derive(Serialize, Deserialize)]
struct FieldSetsDef {
    system: Vec<String>,
    identity: Vec<String>,
    custom: Vec<String>,
    service_flags: Vec<String>,
}

impl From<FieldSetsDef> for FieldSets {
    fn from(def: FieldSetsDef) -> Self {
        FieldSets::new(def.system, def.identity, def.custom, def.service_flags)
    }
}

impl From<FieldSets> for FieldSetsDef {
    fn from(sets: FieldSets) -> Self {
        let mut system: Vec<String> = sets.system.into_iter().collect();
        system.sort();
        let mut identity: Vec<String> = sets.identity.into_iter().collect();
        identity.sort();
        Self {
            system,
            identity,
            custom: sets.custom,
            service_flags: sets.service_flags,
        }
    }
}
