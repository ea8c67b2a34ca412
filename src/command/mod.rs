pub mod combine;
pub mod correct;
pub mod extract;

pub use combine::CombineCMD;
pub use correct::CorrectCMD;
pub use extract::ExtractCMD;
