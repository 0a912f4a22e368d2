//! Attribute certificate validation per [RFC 5755 Section 5], layered on validation of the holder's
//! and issuer's certification paths.
//!
//! [RFC 5755 Section 5]: https://datatracker.ietf.org/doc/html/rfc5755#section-5

use alloc::boxed::Box;
use alloc::format;

use der::Decode;

use crate::{
    environment::pki_environment::PkiEnvironment, util::error::*, util::logging::*,
    CertificationPath, CertificationPathSettings, DeferDecodeSigned, PDVAttributeCertificate,
};

/// `AcValidationConfig` provides the certification paths for the holder and the issuer of an attribute
/// certificate. The target of each path is the holder's and issuer's public key certificate,
/// respectively.
#[derive(Clone, Debug)]
pub struct AcValidationConfig {
    /// Certification path terminating with the holder's certificate
    pub holder_path: CertificationPath,
    /// Certification path terminating with the attribute certificate issuer's certificate
    pub issuer_path: CertificationPath,
}

impl AcValidationConfig {
    /// Creates a new [`AcValidationConfig`]
    pub fn new(holder_path: CertificationPath, issuer_path: CertificationPath) -> Self {
        AcValidationConfig {
            holder_path,
            issuer_path,
        }
    }
}

/// `validate_attribute_certificate` validates ac using the holder and issuer paths from config.
///
/// The following checks are performed in order and the first failure is returned:
/// 1. the holder path validates, else [`Error::HolderPathInvalid`]
/// 2. the issuer path validates, else [`Error::IssuerPathInvalid`]
/// 3. the holder field identifies the holder path target, else [`Error::HolderMismatch`]
/// 4. the issuer field identifies the issuer path target, else [`Error::IssuerMismatch`]
/// 5. the time of interest falls within the validity period, else [`Error::AcExpired`]
/// 6. the signature verifies using the issuer path target's public key, else [`Error::AcSignatureInvalid`]
///
/// Paths are validated via [`PkiEnvironment::validate_path`] using cps. The time of interest is read
/// from cps and a disabled time of interest skips the validity period check.
pub fn validate_attribute_certificate(
    pe: &PkiEnvironment,
    cps: &CertificationPathSettings,
    ac: &PDVAttributeCertificate,
    config: &AcValidationConfig,
) -> Result<()> {
    if let Err(e) = pe.validate_path(pe, cps, &config.holder_path) {
        log_error_for_ca(
            config.holder_path.target(),
            format!("holder certification path failed to validate: {}", e).as_str(),
        );
        return Err(Error::HolderPathInvalid(Box::new(e)));
    }

    if let Err(e) = pe.validate_path(pe, cps, &config.issuer_path) {
        log_error_for_ca(
            config.issuer_path.target(),
            format!("issuer certification path failed to validate: {}", e).as_str(),
        );
        return Err(Error::IssuerPathInvalid(Box::new(e)));
    }

    let holder = config.holder_path.target();
    if !ac.holder().identifies_pkc(holder)? {
        log_error_for_ca(holder, "attribute certificate holder does not identify certificate");
        return Err(Error::HolderMismatch);
    }

    let issuer = config.issuer_path.target();
    if !ac.issuer().identifies_pkc(issuer)? {
        log_error_for_ca(issuer, "attribute certificate issuer does not identify certificate");
        return Err(Error::IssuerMismatch);
    }

    check_ac_validity(cps, ac)?;
    verify_ac_signature(pe, ac, config)?;

    log_message(
        &PeLogLevels::PeInfo,
        format!(
            "Successfully validated attribute certificate issued to {} by {}",
            holder.subject(),
            issuer.subject()
        )
        .as_str(),
    );
    Ok(())
}

/// `check_ac_validity` confirms the time of interest from cps falls within the validity period of ac,
/// inclusive of both bounds.
fn check_ac_validity(cps: &CertificationPathSettings, ac: &PDVAttributeCertificate) -> Result<()> {
    let toi = cps.get_time_of_interest()?;
    if toi.is_disabled() {
        return Ok(());
    }
    let vp = ac.validity_period();
    if toi < vp.not_before_time || toi > vp.not_after_time {
        log_message(
            &PeLogLevels::PeError,
            format!(
                "attribute certificate is not valid at {} (valid from {} to {})",
                toi,
                vp.not_before_time.to_date_time(),
                vp.not_after_time.to_date_time()
            )
            .as_str(),
        );
        return Err(Error::AcExpired);
    }
    Ok(())
}

/// `verify_ac_signature` verifies the signature of ac over the encoded AttributeCertificateInfo using the
/// public key of the issuer path target.
fn verify_ac_signature(
    pe: &PkiEnvironment,
    ac: &PDVAttributeCertificate,
    config: &AcValidationConfig,
) -> Result<()> {
    let issuer = config.issuer_path.target();
    let defer_ac = match DeferDecodeSigned::from_der(&ac.encoded_ac) {
        Ok(d) => d,
        Err(e) => {
            log_error_for_ca(
                issuer,
                format!("failed to prepare attribute certificate for verification: {}", e).as_str(),
            );
            return Err(Error::AcSignatureInvalid);
        }
    };

    if defer_ac.signature_algorithm != ac.decoded_ac.acinfo.signature {
        log_error_for_ca(issuer, "attribute certificate signature algorithm mismatch");
        return Err(Error::AcSignatureInvalid);
    }

    if let Err(e) = pe.verify_signature_message(
        pe,
        &defer_ac.tbs_field,
        defer_ac.signature.raw_bytes(),
        &defer_ac.signature_algorithm,
        issuer.subject_public_key_info(),
    ) {
        log_error_for_ca(
            issuer,
            format!("attribute certificate signature verification error: {:?}", e).as_str(),
        );
        return Err(Error::AcSignatureInvalid);
    }
    Ok(())
}
