//! Wrappers around asn.1 encoder/decoder structures to support certification path processing

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use der::asn1::ObjectIdentifier;
use x509_cert::attr::Attribute;
use x509_cert::ext::pkix::*;

use crate::util::error::*;

/// The [`ExtensionProcessing`] trait provides a common means of extracting extensions from objects that
/// feature extensions and that retain copies of the decoded extension structures, like `PDVCertificate`.
///
/// All extensions are decoded once when the object is constructed. The decoded extensions are
/// accessed via the get_extension function.
pub trait ExtensionProcessing {
    /// `get_extension` takes an ObjectIdentifier that identifies an extension type and returns
    /// a previously parsed PDVExtension instance containing the decoded extension if the extension was present.
    fn get_extension(&self, oid: &ObjectIdentifier) -> Option<&'_ PDVExtension>;

    /// `parse_extensions` decodes each extension present in the object and saves the results for
    /// retrieval via get_extension.
    fn parse_extensions(&mut self) -> Result<()>;
}

/// [`ParsedExtensions`] is a typedef of a BTreeMap map that associates [`PDVExtension`] objects with object
/// identifier values. This is used to avoid parsing extensions repeatedly when performing certification
/// path processing.
pub type ParsedExtensions = BTreeMap<ObjectIdentifier, PDVExtension>;

/// [`PDVExtension`] provides a wrapper for supported extension types.
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum PDVExtension {
    /// Parsed BasicConstraints extension
    BasicConstraints(BasicConstraints),
    /// Parsed KeyUsage extension
    KeyUsage(KeyUsage),
    /// Parsed ExtendedKeyUsage extension
    ExtendedKeyUsage(ExtendedKeyUsage),
    /// Parsed SubjectAltName extension
    SubjectAltName(SubjectAltName),
    /// Parsed IssuerAltName extension
    IssuerAltName(IssuerAltName),
    /// Parsed NameConstraints extension
    NameConstraints(NameConstraints),
    /// Parsed SubjectKeyIdentifier extension
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    /// Parsed AuthorityKeyIdentifier extension
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// Parsed CRLDistributionPoints extension
    CrlDistributionPoints(CrlDistributionPoints),
    /// Parsed SubjectDirectoryAttributes extension, which always carries at least one attribute
    SubjectDirectoryAttributes(Vec<Attribute>),
    /// Unparsed, unrecognized extension
    Unrecognized {
        /// Criticality of the extension
        critical: bool,
        /// Encoded extension value
        raw: Vec<u8>,
    },
}

impl PDVExtension {
    /// `is_unrecognized_critical` returns true for unrecognized extensions that are marked critical
    pub fn is_unrecognized_critical(&self) -> bool {
        matches!(self, PDVExtension::Unrecognized { critical: true, .. })
    }
}
