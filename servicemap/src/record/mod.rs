pub mod composer;
pub mod draft;
pub mod phone;
pub mod types;

pub use composer::{blank_record, compose_record, Composition};
pub use draft::RecordDraft;
pub use phone::normalize_phone;
pub use types::{
    display_text, flag_is_on, AttributeMap, Feature, Geometry, PendingGeocode, SpatialReference,
    WGS84_WKID,
};
