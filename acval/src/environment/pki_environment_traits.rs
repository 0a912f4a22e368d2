//! The pki_environment_traits module features type definitions that are used by [`PkiEnvironment`]
//! to provide functionality that supports validating X.509 certification paths and attribute
//! certificates.

use alloc::{string::String, vec::Vec};

use der::asn1::ObjectIdentifier;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::util::error::*;
use crate::{CertificationPath, CertificationPathSettings, PkiEnvironment};

/// `ValidatePath` provides a function signature for implementations that perform certification path
/// validation.
pub type ValidatePath = fn(
    &PkiEnvironment,
    &CertificationPathSettings, // path settings to govern validation
    &CertificationPath,         // path to verify
) -> Result<()>;

/// `CalculateHash` provides a function signature for implementations that perform hashing
pub type CalculateHash = fn(
    &PkiEnvironment,
    &AlgorithmIdentifierOwned, // hash alg
    &[u8],                     // buffer to hash
) -> Result<Vec<u8>>;

/// `VerifySignatureMessage` provides a function signature for implementations that perform signature
/// verification over a message.
pub type VerifySignatureMessage = fn(
    &PkiEnvironment,
    &[u8],                      // message to hash and verify
    &[u8],                      // signature
    &AlgorithmIdentifierOwned,  // signature algorithm
    &SubjectPublicKeyInfoOwned, // public key
) -> Result<()>;

/// `SignMessage` provides a function signature for implementations that generate a signature over
/// a message using a DER-encoded PKCS #8 private key.
pub type SignMessage = fn(
    &PkiEnvironment,
    &[u8],                     // message to hash and sign
    &AlgorithmIdentifierOwned, // signature algorithm
    &[u8],                     // private key
) -> Result<Vec<u8>>;

/// `OidLookup` implementations take an OID and returns either a friendly name for the OID or a
/// NotFound error. Where NotFound is returned by all OidLookup implementations, the
/// [`PkiEnvironment`] returns a dot notation version of the OID.
pub type OidLookup = fn(&ObjectIdentifier) -> Result<String>;
