//! Wrapper around the attribute certificate structures that retains the encoded form alongside the
//! decoded form, plus signing support.

use alloc::{format, vec::Vec};
use core::time::Duration;

use der::asn1::{BitString, GeneralizedTime};
use der::{Decode, Encode};
use spki::AlgorithmIdentifierOwned;
use x509_cert::attr::Attribute;
use x509_cert::serial_number::SerialNumber;

use crate::{
    asn1::attribute_certificate::*, environment::pki_environment::PkiEnvironment,
    util::error::*, util::logging::*,
};

/// [`PDVAttributeCertificate`] aggregates a binary, DER-encoded AttributeCertificate and the decoded
/// AttributeCertificate. The encoded form is retained so signatures are verified over the
/// AttributeCertificateInfo bytes as they were signed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PDVAttributeCertificate {
    /// Binary, encoded AttributeCertificate object
    pub encoded_ac: Vec<u8>,
    /// Decoded AttributeCertificate object
    pub decoded_ac: AttributeCertificate,
}

impl TryFrom<&[u8]> for PDVAttributeCertificate {
    type Error = Error;

    fn try_from(enc_ac: &[u8]) -> Result<Self> {
        match AttributeCertificate::from_der(enc_ac) {
            Ok(ac) => Ok(PDVAttributeCertificate {
                encoded_ac: enc_ac.to_vec(),
                decoded_ac: ac,
            }),
            Err(e) => {
                // v1Form issuers and v1 attribute certificates land here
                log_message(
                    &PeLogLevels::PeError,
                    format!("Failed to parse attribute certificate: {}", e).as_str(),
                );
                Err(e.into())
            }
        }
    }
}

impl TryFrom<AttributeCertificate> for PDVAttributeCertificate {
    type Error = Error;

    fn try_from(ac: AttributeCertificate) -> Result<Self> {
        Ok(PDVAttributeCertificate {
            encoded_ac: ac.to_der()?,
            decoded_ac: ac,
        })
    }
}

impl PDVAttributeCertificate {
    /// `holder` returns the holder field of the attribute certificate
    pub fn holder(&self) -> &Holder {
        &self.decoded_ac.acinfo.holder
    }

    /// `issuer` returns the issuer field of the attribute certificate
    pub fn issuer(&self) -> &AttCertIssuer {
        &self.decoded_ac.acinfo.issuer
    }

    /// `serial_number` returns the serial number of the attribute certificate
    pub fn serial_number(&self) -> &SerialNumber {
        &self.decoded_ac.acinfo.serial_number
    }

    /// `validity_period` returns the validity period of the attribute certificate
    pub fn validity_period(&self) -> &AttCertValidityPeriod {
        &self.decoded_ac.acinfo.attr_cert_validity_period
    }

    /// `attributes` returns the attributes conveyed by the attribute certificate
    pub fn attributes(&self) -> &[Attribute] {
        &self.decoded_ac.acinfo.attributes
    }

    /// `authentication_info` returns the values of any authenticationInfo attributes
    pub fn authentication_info(&self) -> Result<Vec<SvceAuthInfo>> {
        self.decoded_ac.acinfo.authentication_info()
    }
}

impl AttCertValidityPeriod {
    /// `from_unix_secs` returns a validity period spanning not_before through not_after, each expressed
    /// as seconds since Unix epoch.
    pub fn from_unix_secs(not_before: u64, not_after: u64) -> Result<Self> {
        Ok(AttCertValidityPeriod {
            not_before_time: GeneralizedTime::from_unix_duration(Duration::from_secs(not_before))?,
            not_after_time: GeneralizedTime::from_unix_duration(Duration::from_secs(not_after))?,
        })
    }
}

impl AttributeCertificateInfo {
    /// `sign` signs the DER encoding of self using the private_key (PKCS #8) and signature_alg via
    /// the sign_message capability of pe.
    ///
    /// The signatureAlgorithm of the resulting AttributeCertificate is signature_alg. The signature
    /// field of self is used as is and should match signature_alg.
    pub fn sign(
        &self,
        pe: &PkiEnvironment,
        signature_alg: &AlgorithmIdentifierOwned,
        private_key: &[u8],
    ) -> Result<PDVAttributeCertificate> {
        if self.signature != *signature_alg {
            log_message(
                &PeLogLevels::PeWarn,
                "signature field of AttributeCertificateInfo does not match signature algorithm",
            );
        }
        let tbs = self.to_der()?;
        let signature = pe.sign_message(pe, &tbs, signature_alg, private_key)?;
        let ac = AttributeCertificate {
            acinfo: self.clone(),
            signature_algorithm: signature_alg.clone(),
            signature_value: BitString::from_bytes(&signature)?,
        };
        PDVAttributeCertificate::try_from(ac)
    }
}
