//! Functions that bind attribute certificate holder and issuer fields to public key certificates per
//! [RFC 5755 Section 4.2.2] and [RFC 5755 Section 4.2.3].
//!
//! [RFC 5755 Section 4.2.2]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.2.2
//! [RFC 5755 Section 4.2.3]: https://datatracker.ietf.org/doc/html/rfc5755#section-4.2.3

use alloc::vec;

use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;

use crate::{
    asn1::attribute_certificate::*, util::error::*, util::logging::*, util::pdv_utilities::*,
    PDVCertificate,
};

impl IssuerSerial {
    /// `identifies_pkc` returns true if the first directoryName in the issuer field matches the issuer of
    /// cert, the serial numbers match and, when issuer_uid is present, cert features a matching
    /// issuerUniqueID.
    pub fn identifies_pkc(&self, cert: &PDVCertificate) -> bool {
        let first_dn = self.issuer.iter().find_map(|gn| match gn {
            GeneralName::DirectoryName(dn) => Some(dn),
            _ => None,
        });
        match first_dn {
            Some(dn) if compare_names(dn, cert.issuer()) => {}
            _ => return false,
        }

        if self.serial != *cert.serial_number() {
            return false;
        }

        if let Some(uid) = &self.issuer_uid {
            return cert.issuer_unique_id() == Some(uid);
        }
        true
    }

    /// `from_pkc` returns an IssuerSerial that identifies cert
    pub fn from_pkc(cert: &PDVCertificate) -> Self {
        IssuerSerial {
            issuer: vec![GeneralName::DirectoryName(cert.issuer().clone())],
            serial: cert.serial_number().clone(),
            issuer_uid: cert.issuer_unique_id().cloned(),
        }
    }
}

impl Holder {
    /// `identifies_pkc` returns true if the holder identifies cert.
    ///
    /// When baseCertificateID is present it must identify cert. When entityName is present, one of
    /// the names must match either the subject of cert or a name in the cert's subjectAltName extension.
    /// A holder featuring neither field does not identify any certificate. Holders that use
    /// objectDigestInfo are not supported and yield [`Error::UnsupportedFeature`].
    pub fn identifies_pkc(&self, cert: &PDVCertificate) -> Result<bool> {
        if self.object_digest_info.is_some() {
            log_error_for_ca(cert, "objectDigestInfo holders are not supported");
            return Err(Error::UnsupportedFeature);
        }

        if self.base_certificate_id.is_none() && self.entity_name.is_none() {
            return Ok(false);
        }

        if let Some(bci) = &self.base_certificate_id {
            if !bci.identifies_pkc(cert) {
                return Ok(false);
            }
        }

        if let Some(entity_name) = &self.entity_name {
            let matched = entity_name.iter().any(|gn| match gn {
                GeneralName::DirectoryName(dn) if compare_names(dn, cert.subject()) => true,
                _ => match cert.subject_alt_name() {
                    Some(san) => san.0.iter().any(|n| compare_general_names(n, gn)),
                    None => false,
                },
            });
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `from_pkc` returns a Holder with a baseCertificateID that identifies cert
    pub fn from_pkc(cert: &PDVCertificate) -> Self {
        Holder {
            base_certificate_id: Some(IssuerSerial::from_pkc(cert)),
            entity_name: None,
            object_digest_info: None,
        }
    }
}

impl AttCertIssuer {
    /// `identifies_pkc` returns true if the issuerName field of the V2Form features exactly one
    /// GeneralName, that name is a directoryName and it matches the subject of cert.
    ///
    /// Issuers that use baseCertificateID or objectDigestInfo are not supported and yield
    /// [`Error::UnsupportedFeature`].
    pub fn identifies_pkc(&self, cert: &PDVCertificate) -> Result<bool> {
        let AttCertIssuer::V2Form(v2) = self;
        if v2.base_certificate_id.is_some() || v2.object_digest_info.is_some() {
            log_error_for_ca(
                cert,
                "baseCertificateID and objectDigestInfo attribute certificate issuers are not supported",
            );
            return Err(Error::UnsupportedFeature);
        }

        match v2.issuer_name.as_deref() {
            Some([GeneralName::DirectoryName(dn)]) => Ok(compare_names(dn, cert.subject())),
            _ => Ok(false),
        }
    }

    /// `from_name` returns a V2Form issuer featuring name as the sole directoryName
    pub fn from_name(name: &Name) -> Self {
        AttCertIssuer::V2Form(V2Form {
            issuer_name: Some(vec![GeneralName::DirectoryName(name.clone())]),
            base_certificate_id: None,
            object_digest_info: None,
        })
    }

    /// `from_pkc` returns a V2Form issuer that names the subject of cert
    pub fn from_pkc(cert: &PDVCertificate) -> Self {
        Self::from_name(cert.subject())
    }
}
