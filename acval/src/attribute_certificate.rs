//! Attribute certificate processing: holder and issuer binding plus validation

pub mod ac_binding;
pub mod ac_validator;
pub mod pdv_attribute_certificate;

pub use crate::attribute_certificate::{ac_validator::*, pdv_attribute_certificate::*};
