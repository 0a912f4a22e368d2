//! Certification path building

pub mod path_builder;

pub use crate::builder::path_builder::*;
