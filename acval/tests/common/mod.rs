//! In-memory certificate generation shared by the integration tests
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ID_CE_AUTHORITY_KEY_IDENTIFIER, ID_CE_BASIC_CONSTRAINTS, ID_CE_KEY_USAGE,
    ID_CE_NAME_CONSTRAINTS, ID_CE_SUBJECT_ALT_NAME, ID_CE_SUBJECT_KEY_IDENTIFIER,
};
use der::asn1::{BitString, Ia5String, ObjectIdentifier, OctetString};
use der::{Decode, Encode};
use p256::ecdsa::SigningKey;
use p256::pkcs8::{EncodePrivateKey, EncodePublicKey};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::certificate::{Certificate, TbsCertificate, Version};
use x509_cert::ext::pkix::constraints::name::GeneralSubtree;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier, BasicConstraints, KeyUsage, KeyUsages, NameConstraints,
    SubjectAltName, SubjectKeyIdentifier,
};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::{Time, Validity};

use acval::*;

/// 2020-09-13T12:26:40Z
pub const NOT_BEFORE: u64 = 1_600_000_000;
/// 2033-05-18T03:33:20Z
pub const NOT_AFTER: u64 = 2_000_000_000;
/// 2023-11-14T22:13:20Z
pub const TIME_OF_INTEREST: u64 = 1_700_000_000;

pub fn pki_environment() -> PkiEnvironment {
    let mut pe = PkiEnvironment::default();
    populate_5280_pki_environment(&mut pe);
    pe
}

pub fn settings() -> CertificationPathSettings {
    let mut cps = CertificationPathSettings::new();
    cps.set_time_of_interest(TimeOfInterest::from_unix_secs(TIME_OF_INTEREST).unwrap());
    cps
}

pub fn ecdsa_with_sha256() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: ECDSA_WITH_SHA_256,
        parameters: None,
    }
}

pub fn utc(secs: u64) -> Time {
    Time::UtcTime(der::asn1::UtcTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

pub fn dns(s: &str) -> GeneralName {
    GeneralName::DnsName(Ia5String::new(s).unwrap())
}

pub fn rfc822(s: &str) -> GeneralName {
    GeneralName::Rfc822Name(Ia5String::new(s).unwrap())
}

pub fn subtree(base: GeneralName) -> GeneralSubtree {
    GeneralSubtree {
        base,
        minimum: 0,
        maximum: None,
    }
}

/// P-256 key pair derived from a fixed seed
pub struct TestKey {
    pub seed: u8,
    pub pkcs8: Vec<u8>,
    pub spki: SubjectPublicKeyInfoOwned,
}

impl TestKey {
    pub fn new(seed: u8) -> Self {
        let sk = SigningKey::from_slice(&[seed; 32]).unwrap();
        let pkcs8 = sk.to_pkcs8_der().unwrap().as_bytes().to_vec();
        let spki_doc = sk.verifying_key().to_public_key_der().unwrap();
        let spki = SubjectPublicKeyInfoOwned::from_der(spki_doc.as_bytes()).unwrap();
        TestKey { seed, pkcs8, spki }
    }

    pub fn key_id(&self) -> OctetString {
        OctetString::new(vec![self.seed; 20]).unwrap()
    }
}

/// Accumulates the fields of a certificate prior to signing
pub struct CertBuilder {
    pub subject: Name,
    pub issuer: Name,
    pub serial: Vec<u8>,
    pub not_before: u64,
    pub not_after: u64,
    pub issuer_unique_id: Option<BitString>,
    pub subject_unique_id: Option<BitString>,
    pub extensions: Vec<Extension>,
}

impl CertBuilder {
    pub fn new(subject: &str, issuer: &str, serial: u8) -> Self {
        CertBuilder {
            subject: Name::from_str(subject).unwrap(),
            issuer: Name::from_str(issuer).unwrap(),
            serial: vec![serial],
            not_before: NOT_BEFORE,
            not_after: NOT_AFTER,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: vec![],
        }
    }

    pub fn extension<T: Encode>(mut self, oid: ObjectIdentifier, critical: bool, value: &T) -> Self {
        self.extensions.push(Extension {
            extn_id: oid,
            critical,
            extn_value: OctetString::new(value.to_der().unwrap()).unwrap(),
        });
        self
    }

    pub fn basic_constraints(self, ca: bool, path_len_constraint: Option<u8>) -> Self {
        self.extension(
            ID_CE_BASIC_CONSTRAINTS,
            true,
            &BasicConstraints {
                ca,
                path_len_constraint,
            },
        )
    }

    pub fn key_usage(self, ku: KeyUsage) -> Self {
        self.extension(ID_CE_KEY_USAGE, true, &ku)
    }

    /// basicConstraints with cA set plus keyCertSign and cRLSign
    pub fn ca(self, path_len_constraint: Option<u8>) -> Self {
        self.basic_constraints(true, path_len_constraint)
            .key_usage(KeyUsage(KeyUsages::KeyCertSign | KeyUsages::CRLSign))
    }

    pub fn san(self, names: Vec<GeneralName>) -> Self {
        self.extension(ID_CE_SUBJECT_ALT_NAME, false, &SubjectAltName(names))
    }

    pub fn name_constraints(
        self,
        permitted: Option<Vec<GeneralSubtree>>,
        excluded: Option<Vec<GeneralSubtree>>,
    ) -> Self {
        self.extension(
            ID_CE_NAME_CONSTRAINTS,
            true,
            &NameConstraints {
                permitted_subtrees: permitted,
                excluded_subtrees: excluded,
            },
        )
    }

    pub fn validity(mut self, not_before: u64, not_after: u64) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    pub fn unique_ids(mut self, issuer_uid: Option<&[u8]>, subject_uid: Option<&[u8]>) -> Self {
        self.issuer_unique_id = issuer_uid.map(|u| BitString::from_bytes(u).unwrap());
        self.subject_unique_id = subject_uid.map(|u| BitString::from_bytes(u).unwrap());
        self
    }

    /// Adds subject and authority key identifiers derived from the key seeds then signs the
    /// certificate with issuer_key
    pub fn sign(self, subject_key: &TestKey, issuer_key: &TestKey) -> Arc<PDVCertificate> {
        let this = self
            .extension(
                ID_CE_SUBJECT_KEY_IDENTIFIER,
                false,
                &SubjectKeyIdentifier(subject_key.key_id()),
            )
            .extension(
                ID_CE_AUTHORITY_KEY_IDENTIFIER,
                false,
                &AuthorityKeyIdentifier {
                    key_identifier: Some(issuer_key.key_id()),
                    authority_cert_issuer: None,
                    authority_cert_serial_number: None,
                },
            );
        this.sign_without_key_ids(subject_key, issuer_key)
    }

    pub fn sign_without_key_ids(self, subject_key: &TestKey, issuer_key: &TestKey) -> Arc<PDVCertificate> {
        let pe = pki_environment();
        let tbs = TbsCertificate {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial).unwrap(),
            signature: ecdsa_with_sha256(),
            issuer: self.issuer,
            validity: Validity {
                not_before: utc(self.not_before),
                not_after: utc(self.not_after),
            },
            subject: self.subject,
            subject_public_key_info: subject_key.spki.clone(),
            issuer_unique_id: self.issuer_unique_id,
            subject_unique_id: self.subject_unique_id,
            extensions: if self.extensions.is_empty() {
                None
            } else {
                Some(self.extensions)
            },
        };
        let tbs_der = tbs.to_der().unwrap();
        let signature = pe
            .sign_message(&pe, &tbs_der, &ecdsa_with_sha256(), &issuer_key.pkcs8)
            .unwrap();
        let cert = Certificate {
            tbs_certificate: tbs,
            signature_algorithm: ecdsa_with_sha256(),
            signature: BitString::from_bytes(&signature).unwrap(),
        };
        let enc = cert.to_der().unwrap();
        Arc::new(PDVCertificate::try_from(enc.as_slice()).unwrap())
    }
}

pub const ROOT: &str = "CN=Root CA,O=Example,C=US";
pub const INTERMEDIATE: &str = "CN=Intermediate CA,O=Example,C=US";
pub const LEAF: &str = "CN=Leaf,O=Example,C=US";

/// Self-signed trust anchor, intermediate CA and leaf, each with its own key
pub struct TestPki {
    pub root_key: TestKey,
    pub intermediate_key: TestKey,
    pub leaf_key: TestKey,
    pub root: Arc<PDVCertificate>,
    pub intermediate: Arc<PDVCertificate>,
    pub leaf: Arc<PDVCertificate>,
}

impl TestPki {
    pub fn new() -> Self {
        let root_key = TestKey::new(1);
        let intermediate_key = TestKey::new(2);
        let leaf_key = TestKey::new(3);
        let root = CertBuilder::new(ROOT, ROOT, 1)
            .ca(None)
            .sign(&root_key, &root_key);
        let intermediate = CertBuilder::new(INTERMEDIATE, ROOT, 2)
            .ca(None)
            .sign(&intermediate_key, &root_key);
        let leaf = CertBuilder::new(LEAF, INTERMEDIATE, 3)
            .key_usage(KeyUsage(KeyUsages::DigitalSignature.into()))
            .san(vec![dns("leaf.example.com")])
            .sign(&leaf_key, &intermediate_key);
        TestPki {
            root_key,
            intermediate_key,
            leaf_key,
            root,
            intermediate,
            leaf,
        }
    }

    pub fn path(&self) -> CertificationPath {
        CertificationPath::new(vec![
            self.root.clone(),
            self.intermediate.clone(),
            self.leaf.clone(),
        ])
        .unwrap()
    }
}
