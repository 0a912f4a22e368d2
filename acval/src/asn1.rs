//! Sources of ASN.1 encoders and decoders not included in a RustCrypto formats repo

pub mod attribute_certificate;

pub use crate::asn1::attribute_certificate::*;
