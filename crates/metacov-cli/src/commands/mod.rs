pub mod analyze;
pub mod convert;
pub mod coverage;
pub mod naming;
