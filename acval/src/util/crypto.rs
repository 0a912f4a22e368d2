//! Provides implementations of crypto-related [`PkiEnvironment`] interfaces using libraries from the
//! [Rust Crypto](https://github.com/RustCrypto) project for support.

use alloc::{format, vec::Vec};

use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ID_EC_PUBLIC_KEY, ID_SHA_224, ID_SHA_256, ID_SHA_384, ID_SHA_512,
    SECP_256_R_1, SHA_224_WITH_RSA_ENCRYPTION, SHA_256_WITH_RSA_ENCRYPTION,
    SHA_384_WITH_RSA_ENCRYPTION, SHA_512_WITH_RSA_ENCRYPTION,
};
use der::{asn1::ObjectIdentifier, Encode};
use p256::ecdsa::{
    signature::{Signer as Signer256, Verifier as Verifier256},
    Signature as Signature256, SigningKey as SigningKey256, VerifyingKey as VerifyingKey256,
};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::util::error::{Error, Result};
use crate::{environment::pki_environment::*, log_message, PeLogLevels};

/// is_rsa returns true is the presented OID is one of the RSA PKCS #1 v1.5 signature algorithms
/// supported by this module, i.e., sha224WithRSAEncryption, sha256WithRSAEncryption,
/// sha384WithRSAEncryption or sha512WithRSAEncryption.
pub(crate) fn is_rsa(oid: &ObjectIdentifier) -> bool {
    *oid == SHA_256_WITH_RSA_ENCRYPTION
        || *oid == SHA_384_WITH_RSA_ENCRYPTION
        || *oid == SHA_224_WITH_RSA_ENCRYPTION
        || *oid == SHA_512_WITH_RSA_ENCRYPTION
}

/// is_ecdsa returns true is the presented OID is ecdsa-with-SHA256, which is the only ECDSA
/// signature algorithm supported by this module.
pub(crate) fn is_ecdsa(oid: &ObjectIdentifier) -> bool {
    *oid == ECDSA_WITH_SHA_256
}

/// get_hash_alg_from_sig_alg takes an ObjectIdentifier that notionally contains a signature algorithm,
/// i.e., sha256WithRSAEncryption or ecdsa-with-SHA256, and returns the indicated hash algorithm.
pub fn get_hash_alg_from_sig_alg(sig_alg: &ObjectIdentifier) -> Result<AlgorithmIdentifierOwned> {
    let oid = match *sig_alg {
        SHA_224_WITH_RSA_ENCRYPTION => ID_SHA_224,
        SHA_256_WITH_RSA_ENCRYPTION | ECDSA_WITH_SHA_256 => ID_SHA_256,
        SHA_384_WITH_RSA_ENCRYPTION => ID_SHA_384,
        SHA_512_WITH_RSA_ENCRYPTION => ID_SHA_512,
        _ => return Err(Error::Unrecognized),
    };
    Ok(AlgorithmIdentifierOwned {
        oid,
        parameters: None,
    })
}

fn get_padding_scheme(signature_alg: &AlgorithmIdentifierOwned) -> Result<Pkcs1v15Sign> {
    match signature_alg.oid {
        SHA_256_WITH_RSA_ENCRYPTION => Ok(Pkcs1v15Sign::new::<Sha256>()),
        SHA_384_WITH_RSA_ENCRYPTION => Ok(Pkcs1v15Sign::new::<Sha384>()),
        SHA_224_WITH_RSA_ENCRYPTION => Ok(Pkcs1v15Sign::new::<Sha224>()),
        SHA_512_WITH_RSA_ENCRYPTION => Ok(Pkcs1v15Sign::new::<Sha512>()),
        _ => Err(Error::Unrecognized),
    }
}

/// calculate_hash_rust_crypto implements the [`CalculateHash`](../pki_environment_traits/type.CalculateHash.html)
/// interface for [`PkiEnvironment`] using implementations from the Rust Crypto project.
///
/// It supports SHA-224, SHA-256, SHA-384 and SHA-512.
pub fn calculate_hash_rust_crypto(
    _pe: &PkiEnvironment,
    hash_alg: &AlgorithmIdentifierOwned,
    buffer_to_hash: &[u8],
) -> Result<Vec<u8>> {
    match hash_alg.oid {
        ID_SHA_224 => Ok(Sha224::digest(buffer_to_hash).to_vec()),
        ID_SHA_256 => Ok(Sha256::digest(buffer_to_hash).to_vec()),
        ID_SHA_384 => Ok(Sha384::digest(buffer_to_hash).to_vec()),
        ID_SHA_512 => Ok(Sha512::digest(buffer_to_hash).to_vec()),
        _ => Err(Error::Unrecognized),
    }
}

fn get_named_curve_parameter(alg_id: &AlgorithmIdentifierOwned) -> Result<ObjectIdentifier> {
    if alg_id.oid != ID_EC_PUBLIC_KEY {
        return Err(Error::Unrecognized);
    }
    match &alg_id.parameters {
        Some(params) => Ok(params.decode_as::<ObjectIdentifier>()?),
        None => Err(Error::Unrecognized),
    }
}

/// verify_signature_message_rust_crypto implements the [`VerifySignatureMessage`](../pki_environment_traits/type.VerifySignatureMessage.html)
/// interface for [`PkiEnvironment`] using implementations from the [Rust Crypto](https://github.com/RustCrypto) project.
///
/// RSA PKCS #1 v1.5 signatures and P256 signatures are supported at present. Unsupported algorithms
/// and keys yield [`Error::Unrecognized`], signatures that do not verify yield
/// [`Error::SignatureVerificationFailure`].
pub fn verify_signature_message_rust_crypto(
    pe: &PkiEnvironment,
    message_to_verify: &[u8],
    signature: &[u8],
    signature_alg: &AlgorithmIdentifierOwned,
    spki: &SubjectPublicKeyInfoOwned,
) -> Result<()> {
    if is_rsa(&signature_alg.oid) {
        let enc_spki = spki.to_der()?;
        let rsa = RsaPublicKey::from_public_key_der(&enc_spki).map_err(|_| Error::Unrecognized)?;
        let hash_alg = get_hash_alg_from_sig_alg(&signature_alg.oid)?;
        let hash_to_verify = calculate_hash_rust_crypto(pe, &hash_alg, message_to_verify)?;
        let ps = get_padding_scheme(signature_alg)?;
        return rsa
            .verify(ps, hash_to_verify.as_slice(), signature)
            .map_err(|_| Error::SignatureVerificationFailure);
    } else if is_ecdsa(&signature_alg.oid) {
        let named_curve = get_named_curve_parameter(&spki.algorithm)?;
        if named_curve == SECP_256_R_1 {
            let ecdsa = VerifyingKey256::from_sec1_bytes(spki.subject_public_key.raw_bytes())
                .map_err(|_| Error::Unrecognized)?;
            let s = Signature256::from_der(signature)
                .map_err(|_| Error::SignatureVerificationFailure)?;
            return ecdsa
                .verify(message_to_verify, &s)
                .map_err(|_| Error::SignatureVerificationFailure);
        }
        log_message(
            &PeLogLevels::PeError,
            format!("Unrecognized or unsupported named curve: {}", named_curve).as_str(),
        );
        return Err(Error::Unrecognized);
    }
    log_message(
        &PeLogLevels::PeError,
        format!("Unrecognized signature algorithm: {}", signature_alg.oid).as_str(),
    );
    Err(Error::Unrecognized)
}

/// sign_message_rust_crypto implements the [`SignMessage`](../pki_environment_traits/type.SignMessage.html)
/// interface for [`PkiEnvironment`] using implementations from the [Rust Crypto](https://github.com/RustCrypto) project.
///
/// The private key is provided as a DER-encoded PKCS #8 PrivateKeyInfo. RSA PKCS #1 v1.5 and
/// ecdsa-with-SHA256 using P256 keys are supported. ECDSA signatures are returned DER-encoded.
pub fn sign_message_rust_crypto(
    pe: &PkiEnvironment,
    message_to_sign: &[u8],
    signature_alg: &AlgorithmIdentifierOwned,
    private_key: &[u8],
) -> Result<Vec<u8>> {
    if is_rsa(&signature_alg.oid) {
        let rsa = RsaPrivateKey::from_pkcs8_der(private_key).map_err(|_| Error::Unrecognized)?;
        let hash_alg = get_hash_alg_from_sig_alg(&signature_alg.oid)?;
        let hash_to_sign = calculate_hash_rust_crypto(pe, &hash_alg, message_to_sign)?;
        let ps = get_padding_scheme(signature_alg)?;
        return rsa
            .sign(ps, hash_to_sign.as_slice())
            .map_err(|_| Error::Unrecognized);
    } else if is_ecdsa(&signature_alg.oid) {
        let ecdsa =
            SigningKey256::from_pkcs8_der(private_key).map_err(|_| Error::Unrecognized)?;
        let s: Signature256 = ecdsa.sign(message_to_sign);
        return Ok(s.to_der().as_bytes().to_vec());
    }
    log_message(
        &PeLogLevels::PeError,
        format!("Unrecognized signature algorithm: {}", signature_alg.oid).as_str(),
    );
    Err(Error::Unrecognized)
}

#[test]
fn test_calculate_hash() {
    use hex_literal::hex;
    let mut pe = PkiEnvironment::default();
    pe.clear_all_callbacks();
    pe.add_calculate_hash_callback(calculate_hash_rust_crypto);

    let hash_algorithm = AlgorithmIdentifierOwned {
        oid: ID_SHA_256,
        parameters: None,
    };
    let result = pe
        .calculate_hash(&pe, &hash_algorithm, "abc".as_bytes())
        .unwrap();
    assert_eq!(
        result,
        hex!("BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD")
    );
}

#[test]
fn test_sign_and_verify_p256() {
    use der::Decode;
    use p256::pkcs8::{EncodePrivateKey, EncodePublicKey};

    let mut pe = PkiEnvironment::default();
    populate_5280_pki_environment(&mut pe);

    let sk = SigningKey256::from_slice(&[7u8; 32]).unwrap();
    let pkcs8 = sk.to_pkcs8_der().unwrap();
    let spki_doc = sk.verifying_key().to_public_key_der().unwrap();
    let spki = SubjectPublicKeyInfoOwned::from_der(spki_doc.as_bytes()).unwrap();

    let alg = AlgorithmIdentifierOwned {
        oid: ECDSA_WITH_SHA_256,
        parameters: None,
    };
    let sig = pe
        .sign_message(&pe, b"message", &alg, pkcs8.as_bytes())
        .unwrap();
    assert!(pe
        .verify_signature_message(&pe, b"message", &sig, &alg, &spki)
        .is_ok());
    assert_eq!(
        Err(Error::SignatureVerificationFailure),
        pe.verify_signature_message(&pe, b"massage", &sig, &alg, &spki)
    );

    let unknown = AlgorithmIdentifierOwned {
        oid: ID_SHA_256,
        parameters: None,
    };
    assert_eq!(
        Err(Error::Unrecognized),
        pe.sign_message(&pe, b"message", &unknown, pkcs8.as_bytes())
    );
}

#[test]
fn get_hash_alg_from_sig_alg_test() {
    assert_eq!(
        ID_SHA_256,
        get_hash_alg_from_sig_alg(&ECDSA_WITH_SHA_256).unwrap().oid
    );
    assert_eq!(
        ID_SHA_512,
        get_hash_alg_from_sig_alg(&SHA_512_WITH_RSA_ENCRYPTION)
            .unwrap()
            .oid
    );
    assert!(get_hash_alg_from_sig_alg(&ID_SHA_256).is_err());
}
