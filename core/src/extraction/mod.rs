pub mod classify;
pub mod region;
pub mod tags;

pub use classify::{classify, classify_sop_class, has_region_sequence, sop_class_description};
pub use region::{redaction_offset, region_min_y0};
pub use tags::*;
