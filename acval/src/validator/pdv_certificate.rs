//! Wrappers around asn.1 encoder/decoder structures to support certification path processing

use alloc::{format, vec::Vec};

use const_oid::db::rfc5912::{
    ID_CE_AUTHORITY_KEY_IDENTIFIER, ID_CE_BASIC_CONSTRAINTS, ID_CE_CRL_DISTRIBUTION_POINTS,
    ID_CE_EXT_KEY_USAGE,
    ID_CE_ISSUER_ALT_NAME, ID_CE_KEY_USAGE, ID_CE_NAME_CONSTRAINTS,
    ID_CE_SUBJECT_ALT_NAME, ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES, ID_CE_SUBJECT_KEY_IDENTIFIER,
};
use der::asn1::{BitString, ObjectIdentifier};
use der::{Decode, Encode};
use log::error;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::attr::Attribute;
use x509_cert::ext::pkix::*;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Validity;
use x509_cert::Certificate;

use crate::name_constraints_set::decode_name_constraints;
use crate::pdv_extension::*;
use crate::util::error::*;
use crate::util::pdv_utilities::is_self_issued;

/// [`PDVCertificate`] is used to aggregate a binary, DER-encoded Certificate, a parsed Certificate
/// and the parsed extensions in support of certification path development and validation operations.
///
/// Every extension is decoded when the [`PDVCertificate`] is constructed. Construction fails if an
/// extension appears more than once, if a recognized extension cannot be decoded or if a
/// NameConstraints extension uses minimum or maximum fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PDVCertificate {
    /// Binary, encoded Certificate object
    pub encoded_cert: Vec<u8>,
    /// Decoded Certificate object
    pub decoded_cert: Certificate,
    /// Parsed extensions from the Certificate
    parsed_extensions: ParsedExtensions,
}

impl TryFrom<&[u8]> for PDVCertificate {
    type Error = Error;

    fn try_from(enc_cert: &[u8]) -> Result<Self> {
        let cert = Certificate::from_der(enc_cert)?;
        let mut pdv_cert = PDVCertificate {
            encoded_cert: enc_cert.to_vec(),
            decoded_cert: cert,
            parsed_extensions: Default::default(),
        };
        pdv_cert.parse_extensions()?;
        Ok(pdv_cert)
    }
}

impl TryFrom<Certificate> for PDVCertificate {
    type Error = Error;

    fn try_from(cert: Certificate) -> Result<Self> {
        let enc_cert = cert.to_der()?;
        let mut pdv_cert = PDVCertificate {
            encoded_cert: enc_cert,
            decoded_cert: cert,
            parsed_extensions: Default::default(),
        };
        pdv_cert.parse_extensions()?;
        Ok(pdv_cert)
    }
}

impl ExtensionProcessing for PDVCertificate {
    /// `get_extension` takes an ObjectIdentifier that identifies an extension type and returns
    /// a previously parsed [`PDVExtension`] instance containing the decoded extension if the extension was present.
    fn get_extension(&self, oid: &ObjectIdentifier) -> Option<&'_ PDVExtension> {
        self.parsed_extensions.get(oid)
    }

    fn parse_extensions(&mut self) -> Result<()> {
        macro_rules! add_and_continue {
            ($pe:ident, $v:ident, $oid:expr, $t:ident) => {{
                let r = $t::from_der($v)?;
                $pe.insert($oid, PDVExtension::$t(r));
            }};
        }

        let pe = &mut self.parsed_extensions;
        if let Some(exts) = self.decoded_cert.tbs_certificate.extensions.as_ref() {
            for ext in exts {
                let oid = ext.extn_id;
                if pe.contains_key(&oid) {
                    error!(
                        "Certificate issued to {} features more than one instance of extension {}",
                        self.decoded_cert.tbs_certificate.subject, oid
                    );
                    return Err(Error::MalformedEncoding(der::Tag::Sequence.value_error()));
                }

                let v = ext.extn_value.as_bytes();
                match oid {
                    ID_CE_BASIC_CONSTRAINTS => add_and_continue!(pe, v, oid, BasicConstraints),
                    ID_CE_KEY_USAGE => add_and_continue!(pe, v, oid, KeyUsage),
                    ID_CE_EXT_KEY_USAGE => add_and_continue!(pe, v, oid, ExtendedKeyUsage),
                    ID_CE_SUBJECT_ALT_NAME => add_and_continue!(pe, v, oid, SubjectAltName),
                    ID_CE_ISSUER_ALT_NAME => add_and_continue!(pe, v, oid, IssuerAltName),
                    ID_CE_SUBJECT_KEY_IDENTIFIER => {
                        add_and_continue!(pe, v, oid, SubjectKeyIdentifier)
                    }
                    ID_CE_AUTHORITY_KEY_IDENTIFIER => {
                        add_and_continue!(pe, v, oid, AuthorityKeyIdentifier)
                    }
                    ID_CE_CRL_DISTRIBUTION_POINTS => {
                        add_and_continue!(pe, v, oid, CrlDistributionPoints)
                    }
                    ID_CE_NAME_CONSTRAINTS => {
                        pe.insert(oid, PDVExtension::NameConstraints(decode_name_constraints(v)?));
                    }
                    ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES => {
                        let attrs = Vec::<Attribute>::from_der(v)?;
                        if attrs.is_empty() {
                            error!(
                                "Certificate issued to {} features an empty SubjectDirectoryAttributes extension",
                                self.decoded_cert.tbs_certificate.subject
                            );
                            return Err(Error::MalformedEncoding(
                                der::Tag::Sequence.value_error(),
                            ));
                        }
                        pe.insert(oid, PDVExtension::SubjectDirectoryAttributes(attrs));
                    }
                    _ => {
                        pe.insert(
                            oid,
                            PDVExtension::Unrecognized {
                                critical: ext.critical,
                                raw: v.to_vec(),
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

impl PDVCertificate {
    /// `subject` returns the subject name of the certificate
    pub fn subject(&self) -> &Name {
        &self.decoded_cert.tbs_certificate.subject
    }

    /// `issuer` returns the issuer name of the certificate
    pub fn issuer(&self) -> &Name {
        &self.decoded_cert.tbs_certificate.issuer
    }

    /// `serial_number` returns the serial number of the certificate
    pub fn serial_number(&self) -> &SerialNumber {
        &self.decoded_cert.tbs_certificate.serial_number
    }

    /// `validity` returns the validity period of the certificate
    pub fn validity(&self) -> &Validity {
        &self.decoded_cert.tbs_certificate.validity
    }

    /// `subject_public_key_info` returns the public key of the certificate
    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.decoded_cert.tbs_certificate.subject_public_key_info
    }

    /// `signature_algorithm` returns the outer signature algorithm of the certificate
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.decoded_cert.signature_algorithm
    }

    /// `subject_unique_id` returns the subjectUniqueID field, if present
    pub fn subject_unique_id(&self) -> Option<&BitString> {
        self.decoded_cert.tbs_certificate.subject_unique_id.as_ref()
    }

    /// `issuer_unique_id` returns the issuerUniqueID field, if present
    pub fn issuer_unique_id(&self) -> Option<&BitString> {
        self.decoded_cert.tbs_certificate.issuer_unique_id.as_ref()
    }

    /// `is_self_issued` returns true if the subject and issuer names match
    pub fn is_self_issued(&self) -> bool {
        is_self_issued(&self.decoded_cert)
    }

    /// Returns the BasicConstraints extension, if present
    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        match self.get_extension(&ID_CE_BASIC_CONSTRAINTS) {
            Some(PDVExtension::BasicConstraints(bc)) => Some(bc),
            _ => None,
        }
    }

    /// Returns the KeyUsage extension, if present
    pub fn key_usage(&self) -> Option<&KeyUsage> {
        match self.get_extension(&ID_CE_KEY_USAGE) {
            Some(PDVExtension::KeyUsage(ku)) => Some(ku),
            _ => None,
        }
    }

    /// Returns the ExtendedKeyUsage extension, if present
    pub fn extended_key_usage(&self) -> Option<&ExtendedKeyUsage> {
        match self.get_extension(&ID_CE_EXT_KEY_USAGE) {
            Some(PDVExtension::ExtendedKeyUsage(eku)) => Some(eku),
            _ => None,
        }
    }

    /// Returns the SubjectAltName extension, if present
    pub fn subject_alt_name(&self) -> Option<&SubjectAltName> {
        match self.get_extension(&ID_CE_SUBJECT_ALT_NAME) {
            Some(PDVExtension::SubjectAltName(san)) => Some(san),
            _ => None,
        }
    }

    /// Returns the IssuerAltName extension, if present
    pub fn issuer_alt_name(&self) -> Option<&IssuerAltName> {
        match self.get_extension(&ID_CE_ISSUER_ALT_NAME) {
            Some(PDVExtension::IssuerAltName(ian)) => Some(ian),
            _ => None,
        }
    }

    /// Returns the NameConstraints extension, if present
    pub fn name_constraints(&self) -> Option<&NameConstraints> {
        match self.get_extension(&ID_CE_NAME_CONSTRAINTS) {
            Some(PDVExtension::NameConstraints(nc)) => Some(nc),
            _ => None,
        }
    }

    /// Returns the SubjectKeyIdentifier extension, if present
    pub fn subject_key_identifier(&self) -> Option<&SubjectKeyIdentifier> {
        match self.get_extension(&ID_CE_SUBJECT_KEY_IDENTIFIER) {
            Some(PDVExtension::SubjectKeyIdentifier(skid)) => Some(skid),
            _ => None,
        }
    }

    /// Returns the AuthorityKeyIdentifier extension, if present
    pub fn authority_key_identifier(&self) -> Option<&AuthorityKeyIdentifier> {
        match self.get_extension(&ID_CE_AUTHORITY_KEY_IDENTIFIER) {
            Some(PDVExtension::AuthorityKeyIdentifier(akid)) => Some(akid),
            _ => None,
        }
    }

    /// Returns the attributes from the SubjectDirectoryAttributes extension, if present
    pub fn subject_directory_attributes(&self) -> Option<&[Attribute]> {
        match self.get_extension(&ID_CE_SUBJECT_DIRECTORY_ATTRIBUTES) {
            Some(PDVExtension::SubjectDirectoryAttributes(attrs)) => Some(attrs.as_slice()),
            _ => None,
        }
    }

    /// Returns the CRLDistributionPoints extension, if present
    pub fn crl_distribution_points(&self) -> Option<&CrlDistributionPoints> {
        match self.get_extension(&ID_CE_CRL_DISTRIBUTION_POINTS) {
            Some(PDVExtension::CrlDistributionPoints(crldp)) => Some(crldp),
            _ => None,
        }
    }

    /// `unrecognized_critical_extensions` returns the OIDs of any critical extensions that were not
    /// recognized when the certificate was parsed.
    pub fn unrecognized_critical_extensions(&self) -> Vec<ObjectIdentifier> {
        self.parsed_extensions
            .iter()
            .filter(|(_, ext)| ext.is_unrecognized_critical())
            .map(|(oid, _)| *oid)
            .collect()
    }
}

/// [`DeferDecodeSigned`] used to parse only the top-level structure of a signed object, i.e., a
/// Certificate or AttributeCertificate, without parsing the details of the to-be-signed,
/// AlgorithmIdentifier or BIT STRING fields.
///
/// Deferred decoding is useful when verifying signatures to avoid re-encoding the to-be-signed field
/// (and potentially encountering problems with structures that were not DER-encoded prior to signing).
pub struct DeferDecodeSigned {
    /// to-be-signed field, i.e., tbsCertificate or acinfo
    pub tbs_field: Vec<u8>,
    /// signatureAlgorithm   AlgorithmIdentifier,
    pub signature_algorithm: AlgorithmIdentifierOwned,
    /// signature            BIT STRING
    pub signature: BitString,
}

impl ::der::FixedTag for DeferDecodeSigned {
    const TAG: ::der::Tag = ::der::Tag::Sequence;
}

impl<'a> ::der::DecodeValue<'a> for DeferDecodeSigned {
    fn decode_value<R: ::der::Reader<'a>>(
        reader: &mut R,
        header: ::der::Header,
    ) -> ::der::Result<Self> {
        use ::der::Reader as _;
        reader.read_nested(header.length, |reader| {
            let tbs_field = reader.tlv_bytes()?;
            let signature_algorithm = reader.decode()?;
            let signature = reader.decode()?;
            Ok(Self {
                tbs_field: tbs_field.to_vec(),
                signature_algorithm,
                signature,
            })
        })
    }
}

/// `parse_cert` takes a buffer containing a binary DER encoded certificate and returns
/// a [`PDVCertificate`] containing the parsed certificate if parsing was successful.
pub fn parse_cert(buffer: &[u8]) -> Result<PDVCertificate> {
    match PDVCertificate::try_from(buffer) {
        Ok(cert) => Ok(cert),
        Err(e) => {
            crate::log_message(
                &crate::PeLogLevels::PeError,
                format!("Failed to parse certificate: {}", e).as_str(),
            );
            Err(e)
        }
    }
}
