pub mod csv;
pub mod metrics_defs;

#[cfg(feature = "testutils")]
pub mod testutils;
