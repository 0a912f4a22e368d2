//! Attribute certificate structures as defined in [RFC 5755], plus the authenticationInfo attribute
//! value type from [RFC 5755 Section 4.4.1].
//!
//! [RFC 5755]: https://datatracker.ietf.org/doc/html/rfc5755
//! [RFC 5755 Section 4.4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.4.1

use alloc::vec::Vec;

use const_oid::ObjectIdentifier;
use der::asn1::{BitString, GeneralizedTime, OctetString, SetOfVec};
use der::{Any, Choice, Decode, Encode, Enumerated, Sequence};
use spki::AlgorithmIdentifierOwned;
use x509_cert::attr::Attribute;
use x509_cert::ext::pkix::name::{GeneralName, GeneralNames};
use x509_cert::ext::Extensions;
use x509_cert::serial_number::SerialNumber;

use crate::util::error::*;

/// OID for the authenticationInfo attribute: 1.3.6.1.5.5.7.10.1. See [`SvceAuthInfo`].
pub const ID_ACA_AUTHENTICATION_INFO: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.10.1");

/// IssuerSerial structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// IssuerSerial  ::=  SEQUENCE {
///     issuer         GeneralNames,
///     serial         CertificateSerialNumber,
///     issuerUID      UniqueIdentifier OPTIONAL
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct IssuerSerial {
    pub issuer: GeneralNames,
    pub serial: SerialNumber,
    pub issuer_uid: Option<BitString>,
}

/// DigestedObjectType as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// digestedObjectType  ENUMERATED {
///     publicKey            (0),
///     publicKeyCert        (1),
///     otherObjectTypes     (2) }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Copy, Debug, Eq, PartialEq, Enumerated)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum DigestedObjectType {
    PublicKey = 0,
    PublicKeyCert = 1,
    OtherObjectTypes = 2,
}

/// ObjectDigestInfo structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// ObjectDigestInfo    ::= SEQUENCE {
///     digestedObjectType  ENUMERATED {
///         publicKey            (0),
///         publicKeyCert        (1),
///         otherObjectTypes     (2) },
///     otherObjectTypeID   OBJECT IDENTIFIER  OPTIONAL,
///     digestAlgorithm     AlgorithmIdentifier,
///     objectDigest        BIT STRING
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct ObjectDigestInfo {
    pub digested_object_type: DigestedObjectType,
    pub other_object_type_id: Option<ObjectIdentifier>,
    pub digest_algorithm: AlgorithmIdentifierOwned,
    pub object_digest: BitString,
}

/// Holder structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// Holder ::= SEQUENCE {
///     baseCertificateID   [0] IssuerSerial OPTIONAL,
///     entityName          [1] GeneralNames OPTIONAL,
///     objectDigestInfo    [2] ObjectDigestInfo OPTIONAL
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Default, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct Holder {
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", optional = "true")]
    pub base_certificate_id: Option<IssuerSerial>,

    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub entity_name: Option<GeneralNames>,

    #[asn1(context_specific = "2", tag_mode = "IMPLICIT", optional = "true")]
    pub object_digest_info: Option<ObjectDigestInfo>,
}

/// V2Form structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// V2Form ::= SEQUENCE {
///     issuerName            GeneralNames  OPTIONAL,
///     baseCertificateID     [0] IssuerSerial  OPTIONAL,
///     objectDigestInfo      [1] ObjectDigestInfo  OPTIONAL
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Default, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct V2Form {
    pub issuer_name: Option<GeneralNames>,

    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", optional = "true")]
    pub base_certificate_id: Option<IssuerSerial>,

    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub object_digest_info: Option<ObjectDigestInfo>,
}

/// AttCertIssuer structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// AttCertIssuer ::= CHOICE {
///     v1Form   GeneralNames,  -- MUST NOT be used in this profile
///     v2Form   [0] V2Form     -- v2 only
/// }
/// ```
///
/// Only the v2Form alternative is supported. Encodings that use v1Form fail to decode.
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Eq, PartialEq, Choice)]
#[allow(missing_docs)]
pub enum AttCertIssuer {
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", constructed = "true")]
    V2Form(V2Form),
}

/// AttCertValidityPeriod structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// AttCertValidityPeriod  ::= SEQUENCE {
///     notBeforeTime  GeneralizedTime,
///     notAfterTime   GeneralizedTime
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Copy, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct AttCertValidityPeriod {
    pub not_before_time: GeneralizedTime,
    pub not_after_time: GeneralizedTime,
}

/// AttCertVersion as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// AttCertVersion ::= INTEGER { v2(1) }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Enumerated)]
#[asn1(type = "INTEGER")]
#[repr(u8)]
pub enum AttCertVersion {
    /// Version 2
    #[default]
    V2 = 1,
}

/// AttributeCertificateInfo structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// AttributeCertificateInfo ::= SEQUENCE {
///     version                 AttCertVersion, -- version is v2
///     holder                  Holder,
///     issuer                  AttCertIssuer,
///     signature               AlgorithmIdentifier,
///     serialNumber            CertificateSerialNumber,
///     attrCertValidityPeriod  AttCertValidityPeriod,
///     attributes              SEQUENCE OF Attribute,
///     issuerUniqueID          UniqueIdentifier OPTIONAL,
///     extensions              Extensions OPTIONAL
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct AttributeCertificateInfo {
    pub version: AttCertVersion,
    pub holder: Holder,
    pub issuer: AttCertIssuer,
    pub signature: AlgorithmIdentifierOwned,
    pub serial_number: SerialNumber,
    pub attr_cert_validity_period: AttCertValidityPeriod,
    pub attributes: Vec<Attribute>,
    pub issuer_unique_id: Option<BitString>,
    pub extensions: Option<Extensions>,
}

impl AttributeCertificateInfo {
    /// `authentication_info` returns the decoded values of any authenticationInfo attributes.
    pub fn authentication_info(&self) -> Result<Vec<SvceAuthInfo>> {
        let mut retval = Vec::new();
        for attr in self
            .attributes
            .iter()
            .filter(|a| a.oid == ID_ACA_AUTHENTICATION_INFO)
        {
            for value in attr.values.iter() {
                retval.push(value.decode_as::<SvceAuthInfo>()?);
            }
        }
        Ok(retval)
    }
}

/// AttributeCertificate structure as defined in [RFC 5755 Section 4.1].
///
/// ```text
/// AttributeCertificate ::= SEQUENCE {
///     acinfo               AttributeCertificateInfo,
///     signatureAlgorithm   AlgorithmIdentifier,
///     signatureValue       BIT STRING
/// }
/// ```
///
/// [RFC 5755 Section 4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct AttributeCertificate {
    pub acinfo: AttributeCertificateInfo,
    pub signature_algorithm: AlgorithmIdentifierOwned,
    pub signature_value: BitString,
}

/// SvceAuthInfo structure as defined in [RFC 5755 Section 4.4.1].
///
/// This is the value type of the authenticationInfo attribute, identified by the
/// [`ID_ACA_AUTHENTICATION_INFO`] OID.
///
/// ```text
/// SvceAuthInfo ::=    SEQUENCE {
///     service   GeneralName,
///     ident     GeneralName,
///     authInfo  OCTET STRING OPTIONAL
/// }
/// ```
///
/// [RFC 5755 Section 4.4.1]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.4.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
#[allow(missing_docs)]
pub struct SvceAuthInfo {
    pub service: GeneralName,
    pub ident: GeneralName,
    pub auth_info: Option<OctetString>,
}

impl SvceAuthInfo {
    /// `to_attribute` wraps this value in an authenticationInfo [`Attribute`].
    pub fn to_attribute(&self) -> Result<Attribute> {
        let value = Any::from_der(&self.to_der()?)?;
        Ok(Attribute {
            oid: ID_ACA_AUTHENTICATION_INFO,
            values: SetOfVec::try_from(alloc::vec![value])?,
        })
    }
}
