//! PkiEnvironment aggregates a set of function pointers that supply functionality useful when
//! validating a certification path or an attribute certificate.
//!
//! The sample below illustrates preparation of a PkiEnvironment object for use in validating
//! certification paths and attribute certificates.
//! ```
//! use acval::*;
//!
//! // the default PkiEnvironment uses `oid_lookup` to look up friendly names for OIDs
//! let mut pe = PkiEnvironment::default();
//!
//! // add basic hashing, signing, signature verification and path validation capabilities
//! populate_5280_pki_environment(&mut pe);
//! ```
//!
//! The aggregation of function pointers allows for implementations of features to vary. For example,
//! one app may rely on a hardware module for signature verification and another may prefer a path
//! validation implementation that performs additional checks. Since only function pointers are
//! held, a [`PkiEnvironment`] can be shared freely across threads.

use alloc::string::{String, ToString};
use alloc::{vec, vec::Vec};

use der::asn1::ObjectIdentifier;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::{
    environment::pki_environment_traits::*, util::crypto::*, util::error::*,
    util::pdv_utilities::oid_lookup, validate_path_rfc5280, CertificationPath,
    CertificationPathSettings,
};

/// [`PkiEnvironment`] provides a switchboard of callback functions that allow support to vary on
/// different platforms or to allow support to be tailored for specific use cases.
///
/// Each dispatch method iterates over the registered callbacks until one succeeds. When all fail,
/// the error from the last callback is returned. When none are registered, [`Error::Unrecognized`]
/// is returned.
#[derive(Clone)]
pub struct PkiEnvironment {
    //--------------------------------------------------------------------------
    //Crypto interfaces
    //--------------------------------------------------------------------------
    /// List of functions that provide a message digest functionality
    calculate_hash_callbacks: Vec<CalculateHash>,

    /// List of functions that provide a signature verification functionality given a message
    verify_signature_message_callbacks: Vec<VerifySignatureMessage>,

    /// List of functions that provide a signature generation functionality given a message
    sign_message_callbacks: Vec<SignMessage>,

    //--------------------------------------------------------------------------
    //Certification path processing interfaces
    //--------------------------------------------------------------------------
    /// List of functions that provide certification path validation functionality
    validate_path_callbacks: Vec<ValidatePath>,

    //--------------------------------------------------------------------------
    //Miscellaneous interfaces
    //--------------------------------------------------------------------------
    /// List of functions that provide OID lookup capabilities
    oid_lookups: Vec<OidLookup>,
}

impl Default for PkiEnvironment {
    /// PkiEnvironment::default returns a new [`PkiEnvironment`] with empty callback vectors for each
    /// type of callback except `oid_lookups`, which features the [`oid_lookup`] function.
    fn default() -> Self {
        PkiEnvironment {
            calculate_hash_callbacks: vec![],
            verify_signature_message_callbacks: vec![],
            sign_message_callbacks: vec![],
            validate_path_callbacks: vec![],
            oid_lookups: vec![oid_lookup],
        }
    }
}

impl PkiEnvironment {
    /// PkiEnvironment::new returns a new [`PkiEnvironment`] with empty callback vectors for each type of callback
    pub fn new() -> PkiEnvironment {
        PkiEnvironment {
            calculate_hash_callbacks: vec![],
            verify_signature_message_callbacks: vec![],
            sign_message_callbacks: vec![],
            validate_path_callbacks: vec![],
            oid_lookups: vec![],
        }
    }

    /// clear_all_callbacks clears the contents of all function pointer vectors associated with an
    /// instance of [`PkiEnvironment`].
    pub fn clear_all_callbacks(&mut self) {
        self.clear_oid_lookups();
        self.clear_calculate_hash_callbacks();
        self.clear_validate_path_callbacks();
        self.clear_verify_signature_message_callbacks();
        self.clear_sign_message_callbacks();
    }

    /// add_validate_path_callback adds a [`ValidatePath`] callback to the list used by validate_path.
    pub fn add_validate_path_callback(&mut self, c: ValidatePath) {
        self.validate_path_callbacks.push(c);
    }

    /// clear_validate_path_callbacks clears the list of [`ValidatePath`] callbacks used by validate_path.
    pub fn clear_validate_path_callbacks(&mut self) {
        self.validate_path_callbacks.clear();
    }

    /// validate_path iterates over validate_path_callbacks until an authoritative answer is found
    /// or all options have been exhausted
    pub fn validate_path(
        &self,
        pe: &PkiEnvironment,
        cps: &CertificationPathSettings,
        cp: &CertificationPath,
    ) -> Result<()> {
        let mut err = None;
        for f in &self.validate_path_callbacks {
            match f(pe, cps, cp) {
                Ok(r) => {
                    return Ok(r);
                }
                Err(e) => {
                    err = Some(e);
                }
            }
        }
        if let Some(e) = err {
            return Err(e);
        }
        Err(Error::Unrecognized)
    }

    /// add_calculate_hash_callback adds a [`CalculateHash`] callback to the list used by calculate_hash.
    pub fn add_calculate_hash_callback(&mut self, c: CalculateHash) {
        self.calculate_hash_callbacks.push(c);
    }

    /// clear_calculate_hash_callbacks clears the list of [`CalculateHash`] callbacks used by calculate_hash.
    pub fn clear_calculate_hash_callbacks(&mut self) {
        self.calculate_hash_callbacks.clear();
    }

    /// calculate_hash iterates over calculate_hash_callbacks until an authoritative answer is found
    /// or all options have been exhausted
    pub fn calculate_hash(
        &self,
        pe: &PkiEnvironment,
        hash_alg: &AlgorithmIdentifierOwned,
        buffer_to_hash: &[u8],
    ) -> Result<Vec<u8>> {
        let mut err = None;
        for f in &self.calculate_hash_callbacks {
            match f(pe, hash_alg, buffer_to_hash) {
                Ok(r) => return Ok(r),
                Err(e) => err = Some(e),
            }
        }
        Err(err.unwrap_or(Error::Unrecognized))
    }

    /// add_verify_signature_message_callback adds a [`VerifySignatureMessage`] callback to the list used by verify_signature_message.
    pub fn add_verify_signature_message_callback(&mut self, c: VerifySignatureMessage) {
        self.verify_signature_message_callbacks.push(c);
    }

    /// clear_verify_signature_message_callbacks clears the list of [`VerifySignatureMessage`] callbacks used by verify_signature_message.
    pub fn clear_verify_signature_message_callbacks(&mut self) {
        self.verify_signature_message_callbacks.clear();
    }

    /// verify_signature_message iterates over verify_signature_message_callbacks until an authoritative answer is found
    /// or all options have been exhausted
    pub fn verify_signature_message(
        &self,
        pe: &PkiEnvironment,
        message_to_verify: &[u8],                 // buffer to verify
        signature: &[u8],                         // signature
        signature_alg: &AlgorithmIdentifierOwned, // signature algorithm
        spki: &SubjectPublicKeyInfoOwned,         // public key
    ) -> Result<()> {
        let mut err = None;
        for f in &self.verify_signature_message_callbacks {
            match f(pe, message_to_verify, signature, signature_alg, spki) {
                Ok(r) => return Ok(r),
                Err(e) => err = Some(e),
            }
        }
        Err(err.unwrap_or(Error::Unrecognized))
    }

    /// add_sign_message_callback adds a [`SignMessage`] callback to the list used by sign_message.
    pub fn add_sign_message_callback(&mut self, c: SignMessage) {
        self.sign_message_callbacks.push(c);
    }

    /// clear_sign_message_callbacks clears the list of [`SignMessage`] callbacks used by sign_message.
    pub fn clear_sign_message_callbacks(&mut self) {
        self.sign_message_callbacks.clear();
    }

    /// sign_message iterates over sign_message_callbacks until a signature is generated or all
    /// options have been exhausted
    pub fn sign_message(
        &self,
        pe: &PkiEnvironment,
        message_to_sign: &[u8],
        signature_alg: &AlgorithmIdentifierOwned,
        private_key: &[u8],
    ) -> Result<Vec<u8>> {
        let mut err = None;
        for f in &self.sign_message_callbacks {
            match f(pe, message_to_sign, signature_alg, private_key) {
                Ok(r) => return Ok(r),
                Err(e) => err = Some(e),
            }
        }
        Err(err.unwrap_or(Error::Unrecognized))
    }

    /// add_oid_lookup adds a oid_lookup callback to the list used by oid_lookup.
    pub fn add_oid_lookup(&mut self, c: OidLookup) {
        self.oid_lookups.push(c);
    }

    /// clear_oid_lookups clears the list of oid_lookup callbacks used by oid_lookup.
    pub fn clear_oid_lookups(&mut self) {
        self.oid_lookups.clear();
    }

    /// oid_lookup takes an [`ObjectIdentifier`] and returns either a friendly name for the OID or the
    /// OID represented in dot notation.
    pub fn oid_lookup(&self, oid: &ObjectIdentifier) -> String {
        for f in &self.oid_lookups {
            let r = f(oid);
            if let Ok(r) = r {
                return r;
            }
        }
        oid.to_string()
    }
}

/// `populate_5280_pki_environment` populates a default [`PkiEnvironment`] instance with a default set of callback
/// functions specified.
///
/// The following callbacks are added:
/// - [`validate_path_rfc5280`]
/// - [`calculate_hash_rust_crypto`]
/// - [`verify_signature_message_rust_crypto`]
/// - [`sign_message_rust_crypto`]
///
/// This function assumes that [`oid_lookup`] is either present due to [`PkiEnvironment::default`] creation
/// or that it has been deliberately removed or replaced by the caller but will add oid_lookup if
/// OID lookup support is absent.
pub fn populate_5280_pki_environment(pe: &mut PkiEnvironment) {
    pe.add_validate_path_callback(validate_path_rfc5280);
    pe.add_calculate_hash_callback(calculate_hash_rust_crypto);
    pe.add_verify_signature_message_callback(verify_signature_message_rust_crypto);
    pe.add_sign_message_callback(sign_message_rust_crypto);
    if pe.oid_lookups.is_empty() {
        pe.add_oid_lookup(oid_lookup);
    }
}

#[test]
fn pki_environment_test() {
    use const_oid::db::rfc5912::ID_SHA_256;

    let mut pe = PkiEnvironment::new();
    let alg = AlgorithmIdentifierOwned {
        oid: ID_SHA_256,
        parameters: None,
    };
    assert_eq!(Err(Error::Unrecognized), pe.calculate_hash(&pe, &alg, b"abc"));
    assert_eq!(ID_SHA_256.to_string(), pe.oid_lookup(&ID_SHA_256));

    populate_5280_pki_environment(&mut pe);
    assert_eq!(32, pe.calculate_hash(&pe, &alg, b"abc").unwrap().len());
    assert_ne!(ID_SHA_256.to_string(), pe.oid_lookup(&ID_SHA_256));

    fn is_send_sync<T: Send + Sync>(_t: &T) {}
    is_send_sync(&pe);

    pe.clear_all_callbacks();
    assert_eq!(Err(Error::Unrecognized), pe.calculate_hash(&pe, &alg, b"abc"));
}
