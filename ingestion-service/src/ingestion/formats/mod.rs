//! One schema normalizer per known bank layout.

mod cnb;
mod demo_bank;
mod yes_bank;

pub use cnb::CnbFormat;
pub use demo_bank::DemoBankFormat;
pub use yes_bank::YesBankFormat;
