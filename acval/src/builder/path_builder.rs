//! Greedy certification path construction from a pool of intermediate CA certificates

use alloc::format;
use alloc::sync::Arc;
use alloc::{vec, vec::Vec};

use crate::{
    util::error::*, util::logging::*, util::pdv_utilities::*, CertificationPath, PDVCertificate,
};

/// `is_plausible_issuer` returns true if candidate's subject name matches the issuer name of cert and
/// candidate's key usage, if present, asserts keyCertSign.
fn is_plausible_issuer(candidate: &PDVCertificate, cert: &PDVCertificate) -> bool {
    if !compare_names(candidate.subject(), cert.issuer()) {
        return false;
    }
    match candidate.key_usage() {
        Some(ku) => ku.key_cert_sign(),
        None => true,
    }
}

/// `skid_matches_akid` returns true if candidate features a subject key identifier that matches the
/// keyIdentifier field of the authority key identifier in cert.
fn skid_matches_akid(candidate: &PDVCertificate, cert: &PDVCertificate) -> bool {
    let akid = match cert
        .authority_key_identifier()
        .and_then(|akid| akid.key_identifier.as_ref())
    {
        Some(kid) => kid,
        None => return false,
    };
    match candidate.subject_key_identifier() {
        Some(skid) => skid.0 == *akid,
        None => false,
    }
}

/// `build_path` assembles a [`CertificationPath`] that links target to trust_anchor using certificates
/// from pool as intermediate CAs.
///
/// Starting from target, the pool is searched for a certificate whose subject matches the issuer name of the
/// current certificate and whose key usage, if present, permits certificate signing. Where more than one
/// candidate exists, one whose subject key identifier matches the current certificate's authority key
/// identifier is preferred. The search stops when the issuer of the current certificate matches the subject
/// of the trust anchor.
///
/// No signatures or constraints are checked. The resulting path should be validated, i.e., via
/// [`PkiEnvironment::validate_path`](crate::PkiEnvironment::validate_path).
///
/// Returns [`Error::IncompletePath`] if no issuer can be found for some certificate and [`Error::CyclicPath`]
/// if a certificate would appear in the path more than once.
pub fn build_path(
    trust_anchor: &Arc<PDVCertificate>,
    target: &Arc<PDVCertificate>,
    pool: &[Arc<PDVCertificate>],
) -> Result<CertificationPath> {
    if trust_anchor.encoded_cert == target.encoded_cert {
        return CertificationPath::new(vec![trust_anchor.clone()]);
    }

    // built from the target toward the trust anchor then reversed
    let mut chain: Vec<Arc<PDVCertificate>> = vec![target.clone()];
    let mut current = target.clone();

    while !compare_names(current.issuer(), trust_anchor.subject()) {
        let candidates: Vec<&Arc<PDVCertificate>> = pool
            .iter()
            .filter(|c| is_plausible_issuer(c, &current))
            .collect();

        let chosen = match candidates
            .iter()
            .find(|c| skid_matches_akid(c, &current))
            .or_else(|| candidates.first())
        {
            Some(c) => (*c).clone(),
            None => {
                log_error_for_ca(&current, "no issuer found while building certification path");
                return Err(Error::IncompletePath);
            }
        };

        if chain.iter().any(|c| c.encoded_cert == chosen.encoded_cert)
            || chosen.encoded_cert == trust_anchor.encoded_cert
        {
            log_error_for_ca(&chosen, "certificate would appear twice in certification path");
            return Err(Error::CyclicPath);
        }

        if let Some(skid) = chosen.subject_key_identifier() {
            log_message(
                &PeLogLevels::PeDebug,
                format!(
                    "Selected issuer {} with SKID {} for {}",
                    chosen.subject(),
                    buffer_to_hex(skid.0.as_bytes()),
                    current.subject()
                )
                .as_str(),
            );
        }

        chain.push(chosen.clone());
        current = chosen;
    }

    chain.push(trust_anchor.clone());
    chain.reverse();
    log_message(
        &PeLogLevels::PeInfo,
        format!(
            "Built certification path of length {} for {}",
            chain.len(),
            target.subject()
        )
        .as_str(),
    );
    CertificationPath::new(chain)
}
