//! Functions related to certification path validation operations

use alloc::format;

use der::{DateTime, Decode};
use x509_cert::time::Validity;

use crate::{
    environment::pki_environment::*, path_settings::*, pdv_certificate::*,
    util::error::*, util::logging::*, util::pdv_utilities::*,
    util::time_of_interest::TimeOfInterest, CertificationPath, NameConstraintsState,
    RevocationStatus,
};

/// `ValidityWindow` represents the intersection of the validity periods of the certificates processed
/// so far. A bound of None is unbounded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidityWindow {
    /// Latest notBefore value encountered
    pub not_before: Option<DateTime>,
    /// Earliest notAfter value encountered
    pub not_after: Option<DateTime>,
}

impl ValidityWindow {
    /// Returns a window with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns a window matching a certificate's validity period
    pub fn from_validity(validity: &Validity) -> Self {
        ValidityWindow {
            not_before: Some(validity.not_before.to_date_time()),
            not_after: Some(validity.not_after.to_date_time()),
        }
    }

    /// `intersect` returns the intersection of two windows or None if the intersection is empty
    pub fn intersect(&self, other: &ValidityWindow) -> Option<ValidityWindow> {
        let not_before = match (self.not_before, other.not_before) {
            (Some(l), Some(r)) => Some(l.max(r)),
            (l, r) => l.or(r),
        };
        let not_after = match (self.not_after, other.not_after) {
            (Some(l), Some(r)) => Some(l.min(r)),
            (l, r) => l.or(r),
        };
        if let (Some(nb), Some(na)) = (not_before, not_after) {
            if nb > na {
                return None;
            }
        }
        Some(ValidityWindow {
            not_before,
            not_after,
        })
    }

    /// `contains` returns true if toi falls within the window, inclusive of both bounds
    pub fn contains(&self, toi: &TimeOfInterest) -> bool {
        if let Some(nb) = self.not_before {
            if toi.0 < nb {
                return false;
            }
        }
        if let Some(na) = self.not_after {
            if toi.0 > na {
                return false;
            }
        }
        true
    }
}

fn path_validation_error(status: PathValidationStatus, index: usize) -> Error {
    Error::PathValidation { status, index }
}

//-----------------------------------------------------------------------------
// Top level function for use via PkiEnvironment's validate_path member. This
// walks the path once, from the trust anchor toward the target, and aggregates
// the lower level checks below.
//-----------------------------------------------------------------------------
/// `validate_path_rfc5280` performs certification path validation per [RFC 5280 Section 6.1]. It is
/// intended for use in the validate_path field of a [`PkiEnvironment`] structure.
///
/// - The [`PkiEnvironment`] parameter provides signature verification.
/// - The [`CertificationPathSettings`] parameter defines values that govern path validation, i.e.,
/// time of interest, initial path length constraint, etc.
/// - The [`CertificationPath`] parameter provides the trust anchor, intermediate CA certificates and
/// target certificate along with any caller-supplied revocation status.
///
/// The trust anchor's signature is never checked. For each pair of adjacent certificates, the
/// following checks are performed in order, and the first failure is returned as an
/// [`Error::PathValidation`] value identifying the offending certificate:
/// - name chaining and signature verification ([`verify_signature`])
/// - validity ([`check_validity`])
/// - CA constraints on the issuer ([`check_basic_constraints`])
/// - name constraints ([`check_names`])
/// - unique identifiers, if required ([`check_unique_identifiers`])
/// - revocation status ([`check_revocation_status`])
/// - unrecognized critical extensions ([`check_critical_extensions`])
///
/// [RFC 5280 Section 6.1]: <https://datatracker.ietf.org/doc/html/rfc5280.html#section-6.1>
pub fn validate_path_rfc5280(
    pe: &PkiEnvironment,
    cps: &CertificationPathSettings,
    cp: &CertificationPath,
) -> Result<()> {
    let toi = cps.get_time_of_interest()?;
    let reject_unrecognized = cps.get_reject_unrecognized_critical_extensions();
    let require_uid_match = cps.get_require_unique_identifier_match();
    let require_revocation_status = cps.get_require_revocation_status();

    let ta = cp.trust_anchor();
    if reject_unrecognized {
        check_critical_extensions(pe, ta, 0)?;
    }
    if cp.len() > 1 && !ta.basic_constraints().map(|bc| bc.ca).unwrap_or(false) {
        log_error_for_ca(ta, "trust anchor is not a CA and cannot issue certificates");
        return Err(path_validation_error(
            PathValidationStatus::CaConstraintViolation,
            0,
        ));
    }

    let mut window = if cps.get_enforce_trust_anchor_validity() {
        ValidityWindow::from_validity(ta.validity())
    } else {
        ValidityWindow::unbounded()
    };
    if toi.is_disabled() {
        log_message(
            &PeLogLevels::PeInfo,
            "validate_path_rfc5280 invoked with no time of interest; validity check disabled",
        );
    } else if !window.contains(&toi) {
        log_error_for_ca(ta, format!("trust anchor is not valid at {}", toi).as_str());
        return Err(path_validation_error(
            PathValidationStatus::ExpiredOrNotYetValid,
            0,
        ));
    }

    let mut nc_state = NameConstraintsState::new();
    let mut path_len_constraint = cps.get_initial_path_length_constraint();
    let last = cp.len() - 1;

    for i in 0..last {
        let issuer = &cp.certificates[i];
        let subject = &cp.certificates[i + 1];

        verify_signature(pe, issuer, subject, i + 1)?;
        window = check_validity(&window, subject, &toi, i + 1)?;
        path_len_constraint = check_basic_constraints(issuer, i, path_len_constraint)?;
        nc_state = check_names(&nc_state, issuer, subject, i + 1, i + 1 == last)?;
        if require_uid_match {
            check_unique_identifiers(issuer, subject, i + 1)?;
        }
        check_revocation_status(cp, i + 1, require_revocation_status)?;
        if reject_unrecognized {
            check_critical_extensions(pe, subject, i + 1)?;
        }

        log_message(
            &PeLogLevels::PeDebug,
            format!(
                "Certificate at position {} issued to {} passed basic checks",
                i + 1,
                subject.subject()
            )
            .as_str(),
        );
    }

    log_message(
        &PeLogLevels::PeInfo,
        format!(
            "Successfully completed basic path validation checks for certificate issued to {}",
            cp.target().subject()
        )
        .as_str(),
    );
    Ok(())
}

//-----------------------------------------------------------------------------
// Functions that perform some small aspect of path validation
//-----------------------------------------------------------------------------
/// `verify_signature` confirms the issuer name of subject matches the subject name of issuer, then
/// verifies the signature of subject using the public key from issuer. The signature is verified
/// over the to-be-signed bytes as they appear in the encoded certificate.
pub fn verify_signature(
    pe: &PkiEnvironment,
    issuer: &PDVCertificate,
    subject: &PDVCertificate,
    index: usize,
) -> Result<()> {
    if !compare_names(subject.issuer(), issuer.subject()) {
        log_error_for_ca(
            subject,
            format!("issuer name does not match subject of {}", issuer.subject()).as_str(),
        );
        return Err(path_validation_error(
            PathValidationStatus::NameChainingFailure,
            index,
        ));
    }

    let defer_cert = match DeferDecodeSigned::from_der(&subject.encoded_cert) {
        Ok(defer_cert) => defer_cert,
        Err(e) => {
            log_error_for_ca(
                subject,
                format!("failed to prepare certificate for signature verification: {}", e).as_str(),
            );
            return Err(path_validation_error(
                PathValidationStatus::SignatureMismatch,
                index,
            ));
        }
    };

    if defer_cert.signature_algorithm != subject.decoded_cert.tbs_certificate.signature {
        log_error_for_ca(subject, "signature algorithm mismatch");
        return Err(path_validation_error(
            PathValidationStatus::SignatureMismatch,
            index,
        ));
    }

    let r = pe.verify_signature_message(
        pe,
        &defer_cert.tbs_field,
        defer_cert.signature.raw_bytes(),
        &defer_cert.signature_algorithm,
        issuer.subject_public_key_info(),
    );
    if let Err(e) = r {
        log_error_for_ca(
            subject,
            format!("signature verification error: {:?}", e).as_str(),
        );
        return Err(path_validation_error(
            PathValidationStatus::SignatureMismatch,
            index,
        ));
    }
    Ok(())
}

/// `check_validity` intersects window with the validity period of cert and, unless checks are disabled,
/// confirms toi falls within the result. The narrowed window is returned.
pub fn check_validity(
    window: &ValidityWindow,
    cert: &PDVCertificate,
    toi: &TimeOfInterest,
    index: usize,
) -> Result<ValidityWindow> {
    let narrowed = match window.intersect(&ValidityWindow::from_validity(cert.validity())) {
        Some(w) => w,
        None => {
            log_error_for_ca(cert, "validity period does not overlap those of superior certificates");
            return Err(path_validation_error(
                PathValidationStatus::ExpiredOrNotYetValid,
                index,
            ));
        }
    };

    if !toi.is_disabled() && !narrowed.contains(toi) {
        log_error_for_ca(cert, format!("certificate is not valid at {}", toi).as_str());
        return Err(path_validation_error(
            PathValidationStatus::ExpiredOrNotYetValid,
            index,
        ));
    }
    Ok(narrowed)
}

/// `check_basic_constraints` ensures a certificate used to verify another certificate features a
/// basicConstraints extension with the cA field set to true and, if a keyUsage extension is present,
/// that keyCertSign is asserted. For intermediate CAs that are not self-issued, the path length budget
/// must be greater than zero and is decremented. The updated budget is returned.
pub fn check_basic_constraints(
    ca_cert: &PDVCertificate,
    index: usize,
    path_len_constraint: u8,
) -> Result<u8> {
    let bc = match ca_cert.basic_constraints() {
        Some(bc) if bc.ca => bc,
        Some(_) => {
            log_error_for_ca(ca_cert, "invalid basic constraints");
            return Err(path_validation_error(
                PathValidationStatus::CaConstraintViolation,
                index,
            ));
        }
        None => {
            log_error_for_ca(ca_cert, "missing basic constraints");
            return Err(path_validation_error(
                PathValidationStatus::CaConstraintViolation,
                index,
            ));
        }
    };

    if let Some(ku) = ca_cert.key_usage() {
        if !ku.key_cert_sign() {
            log_error_for_ca(ca_cert, "keyCertSign not asserted in key usage");
            return Err(path_validation_error(
                PathValidationStatus::CaConstraintViolation,
                index,
            ));
        }
    }

    let mut path_len_constraint = path_len_constraint;
    // (l)  If the certificate was not self-issued, verify that
    //       max_path_length is greater than zero and decrement
    //       max_path_length by 1.
    if index > 0 && !ca_cert.is_self_issued() {
        if path_len_constraint == 0 {
            log_error_for_ca(ca_cert, "path length constraint violation");
            return Err(path_validation_error(
                PathValidationStatus::CaConstraintViolation,
                index,
            ));
        }
        path_len_constraint -= 1;
    }

    // (m)  If pathLenConstraint is present in the certificate and is
    //       less than max_path_length, set max_path_length to the value
    //       of pathLenConstraint.
    if let Some(pl) = bc.path_len_constraint {
        path_len_constraint = path_len_constraint.min(pl);
    }
    Ok(path_len_constraint)
}

/// `check_names` folds the name constraints from issuer, if any, into state then checks the names
/// in subject against the result. The subject DN, emailAddress attributes in the subject DN and SAN
/// entries are checked. Self-issued certificates other than the target are not checked, per
/// RFC 5280 Section 6.1.3 (b). The new state is returned.
pub fn check_names(
    state: &NameConstraintsState,
    issuer: &PDVCertificate,
    subject: &PDVCertificate,
    index: usize,
    is_target: bool,
) -> Result<NameConstraintsState> {
    let state = match issuer.name_constraints() {
        Some(nc) => state.apply(nc),
        None => state.clone(),
    };

    if subject.is_self_issued() && !is_target {
        return Ok(state);
    }

    if !state.permits_subject(subject.subject(), subject.subject_alt_name()) {
        log_error_for_ca(subject, "name constraints violation");
        return Err(path_validation_error(
            PathValidationStatus::NameConstraintViolation,
            index,
        ));
    }
    Ok(state)
}

/// `check_unique_identifiers` confirms the issuerUniqueID of subject matches the subjectUniqueID of issuer
/// when both are present.
pub fn check_unique_identifiers(
    issuer: &PDVCertificate,
    subject: &PDVCertificate,
    index: usize,
) -> Result<()> {
    if let (Some(iuid), Some(suid)) = (subject.issuer_unique_id(), issuer.subject_unique_id()) {
        if iuid != suid {
            log_error_for_ca(subject, "issuerUniqueID does not match subjectUniqueID of issuer");
            return Err(path_validation_error(
                PathValidationStatus::UniqueIdentifierMismatch,
                index,
            ));
        }
    }
    Ok(())
}

/// `check_revocation_status` evaluates the revocation status supplied with the path for the certificate
/// at index. A revoked status always fails. A missing or undetermined status fails only when required.
pub fn check_revocation_status(cp: &CertificationPath, index: usize, required: bool) -> Result<()> {
    let status = cp.revocation_status.get(index).copied().flatten();
    match status {
        Some(RevocationStatus::Revoked) => {
            log_error_for_ca(&cp.certificates[index], "certificate is revoked");
            Err(path_validation_error(
                PathValidationStatus::CertificateRevoked,
                index,
            ))
        }
        Some(RevocationStatus::Good) => Ok(()),
        _ if required => {
            log_error_for_ca(
                &cp.certificates[index],
                "revocation status could not be determined",
            );
            Err(path_validation_error(
                PathValidationStatus::RevocationStatusNotDetermined,
                index,
            ))
        }
        _ => Ok(()),
    }
}

/// `check_critical_extensions` ensures cert features no critical extensions that were not recognized
/// when the certificate was parsed.
pub fn check_critical_extensions(
    pe: &PkiEnvironment,
    cert: &PDVCertificate,
    index: usize,
) -> Result<()> {
    if let Some(oid) = cert.unrecognized_critical_extensions().first() {
        log_error_for_ca(
            cert,
            format!("unprocessed critical extension: {}", pe.oid_lookup(oid)).as_str(),
        );
        return Err(path_validation_error(
            PathValidationStatus::UnprocessedCriticalExtension,
            index,
        ));
    }
    Ok(())
}
