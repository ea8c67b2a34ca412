pub mod cigar;
pub mod correct;
pub mod extract;

pub use correct::KnownBarcodePair;
pub use extract::{BarcodeWindow, ExtractStats};
