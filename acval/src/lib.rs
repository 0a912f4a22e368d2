#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod asn1;
pub mod attribute_certificate;
pub mod builder;
pub mod environment;
pub mod util;
pub mod validator;

extern crate alloc;

// order of pub use statements below is intended to assure the list emitted by cargo doc on the main
// index.html page is in alphabetical order.
pub use crate::asn1::*;
pub use crate::attribute_certificate::*;
pub use crate::builder::*;
pub use crate::environment::*;
pub use crate::{util::*, validator::*};
