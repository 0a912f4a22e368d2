//! Provides structure that represents a certification path including trust anchor, optional intermediate
//! CAs, target and optional revocation status.

use alloc::sync::Arc;
use alloc::{vec, vec::Vec};

use crate::{build_path, util::error::*, PDVCertificate};

/// `RevocationStatus` is supplied by the caller for each certificate in a path. This library does not
/// fetch or process CRLs or OCSP responses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RevocationStatus {
    /// The certificate is known not to be revoked
    Good,
    /// The certificate is known to be revoked
    Revoked,
    /// Status could not be determined
    Undetermined,
}

/// `CertificationPath` is used to represent the trust anchor, intermediate CA certificates and target certificate
/// that comprise a certification path.
///
/// `certificates[0]` is the trust anchor and the last element is the target. When the path has a
/// single element, the trust anchor is also the target. Certificates are shared via `Arc` so a
/// certificate may appear in many paths without copying.
#[derive(Clone, Debug)]
#[readonly::make]
pub struct CertificationPath {
    /// `certificates` contains the trust anchor followed by zero or more intermediate CA certificates and
    /// the target, i.e., `certificates\[0\]` can be used to verify `certificates\[1\]`, and so on.
    #[readonly]
    pub certificates: Vec<Arc<PDVCertificate>>,

    /// revocation_status is a vector of the same size as certificates. Where no status is available
    /// when path is constructed, None is present. The entry for the trust anchor is never consulted.
    pub revocation_status: Vec<Option<RevocationStatus>>,
}

impl CertificationPath {
    /// instantiates a new CertificationPath from a list of certificates beginning with the trust anchor
    /// and ending with the target. Returns [`Error::IncompletePath`] if certificates is empty.
    pub fn new(certificates: Vec<Arc<PDVCertificate>>) -> Result<CertificationPath> {
        if certificates.is_empty() {
            return Err(Error::IncompletePath);
        }
        let len = certificates.len();
        Ok(CertificationPath {
            certificates,
            revocation_status: vec![None; len],
        })
    }

    /// `from_trust_anchor_to_target` builds a path from target to trust_anchor using certificates from pool
    /// as intermediate CAs. See [`build_path`].
    pub fn from_trust_anchor_to_target(
        trust_anchor: &Arc<PDVCertificate>,
        target: &Arc<PDVCertificate>,
        pool: &[Arc<PDVCertificate>],
    ) -> Result<CertificationPath> {
        build_path(trust_anchor, target, pool)
    }

    /// Returns the trust anchor
    pub fn trust_anchor(&self) -> &Arc<PDVCertificate> {
        &self.certificates[0]
    }

    /// Returns the target
    pub fn target(&self) -> &Arc<PDVCertificate> {
        &self.certificates[self.certificates.len() - 1]
    }

    /// Returns the number of certificates in the path, including the trust anchor
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Always false, since a path holds at least a trust anchor
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// `set_revocation_status` attaches status for the certificate at index. Returns [`Error::NotFound`]
    /// if index is out of range.
    pub fn set_revocation_status(&mut self, index: usize, status: RevocationStatus) -> Result<()> {
        match self.revocation_status.get_mut(index) {
            Some(s) => {
                *s = Some(status);
                Ok(())
            }
            None => Err(Error::NotFound),
        }
    }
}
