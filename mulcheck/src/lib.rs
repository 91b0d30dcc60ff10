#[cfg(feature = "sim")]
pub use mulcheck_sim as sim;

pub use mulcheck_core as core;
