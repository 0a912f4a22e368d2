mod common;

use std::str::FromStr;

use der::asn1::{Ia5String, OctetString};
use der::{Decode, Encode};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;

use acval::*;
use common::*;

/// Scenario fixture: A is a self-signed CA acting as attribute certificate issuer and B is a leaf
/// issued by A that serves as holder.
struct AcFixture {
    key_a: TestKey,
    key_b: TestKey,
    a: std::sync::Arc<PDVCertificate>,
    b: std::sync::Arc<PDVCertificate>,
}

impl AcFixture {
    fn new() -> Self {
        let key_a = TestKey::new(80);
        let key_b = TestKey::new(81);
        let a = CertBuilder::new("CN=A,O=Example,C=US", "CN=A,O=Example,C=US", 1)
            .ca(None)
            .sign(&key_a, &key_a);
        let b = CertBuilder::new("CN=B,O=Example,C=US", "CN=A,O=Example,C=US", 2)
            .san(vec![dns("b.example.com")])
            .sign(&key_b, &key_a);
        AcFixture { key_a, key_b, a, b }
    }

    fn config(&self) -> AcValidationConfig {
        AcValidationConfig::new(
            CertificationPath::new(vec![self.a.clone(), self.b.clone()]).unwrap(),
            CertificationPath::new(vec![self.a.clone()]).unwrap(),
        )
    }

    fn acinfo(&self) -> AttributeCertificateInfo {
        let sai = SvceAuthInfo {
            service: GeneralName::UniformResourceIdentifier(
                Ia5String::new("https://service.example.com").unwrap(),
            ),
            ident: GeneralName::Rfc822Name(Ia5String::new("b@example.com").unwrap()),
            auth_info: Some(OctetString::new(b"secret".to_vec()).unwrap()),
        };
        AttributeCertificateInfo {
            version: AttCertVersion::V2,
            holder: Holder::from_pkc(&self.b),
            issuer: AttCertIssuer::from_pkc(&self.a),
            signature: ecdsa_with_sha256(),
            serial_number: serial_number_from_decimal("123456789012345678901234567890").unwrap(),
            attr_cert_validity_period: AttCertValidityPeriod::from_unix_secs(
                TIME_OF_INTEREST - 3600,
                TIME_OF_INTEREST + 3600,
            )
            .unwrap(),
            attributes: vec![sai.to_attribute().unwrap()],
            issuer_unique_id: None,
            extensions: None,
        }
    }

    fn sign(&self, acinfo: &AttributeCertificateInfo) -> PDVAttributeCertificate {
        let pe = pki_environment();
        acinfo
            .sign(&pe, &ecdsa_with_sha256(), &self.key_a.pkcs8)
            .unwrap()
    }
}

#[test]
fn full_ac_validation_succeeds() {
    let f = AcFixture::new();
    let ac = f.sign(&f.acinfo());
    let pe = pki_environment();
    assert!(validate_attribute_certificate(&pe, &settings(), &ac, &f.config()).is_ok());

    // the encoded form decodes to the same value and still validates
    let decoded = PDVAttributeCertificate::try_from(ac.encoded_ac.as_slice()).unwrap();
    assert_eq!(ac, decoded);
    assert!(validate_attribute_certificate(&pe, &settings(), &decoded, &f.config()).is_ok());

    let sai = decoded.authentication_info().unwrap();
    assert_eq!(1, sai.len());
    assert_eq!(b"secret", sai[0].auth_info.as_ref().unwrap().as_bytes());
    assert_eq!(
        "123456789012345678901234567890",
        serial_number_to_decimal(decoded.serial_number())
    );
}

#[test]
fn fail_fast_ordering() {
    let f = AcFixture::new();
    let pe = pki_environment();

    // holder names some other certificate
    let mut acinfo = f.acinfo();
    acinfo.holder = Holder::from_pkc(&f.a);
    let ac = f.sign(&acinfo);
    assert_eq!(
        Err(Error::HolderMismatch),
        validate_attribute_certificate(&pe, &settings(), &ac, &f.config())
    );

    // when the holder path is also invalid, the path failure is reported
    let expired = CertBuilder::new("CN=B,O=Example,C=US", "CN=A,O=Example,C=US", 2)
        .validity(NOT_BEFORE, TIME_OF_INTEREST - 1)
        .sign(&f.key_b, &f.key_a);
    let config = AcValidationConfig::new(
        CertificationPath::new(vec![f.a.clone(), expired]).unwrap(),
        CertificationPath::new(vec![f.a.clone()]).unwrap(),
    );
    match validate_attribute_certificate(&pe, &settings(), &ac, &config) {
        Err(Error::HolderPathInvalid(inner)) => assert_eq!(
            Error::PathValidation {
                status: PathValidationStatus::ExpiredOrNotYetValid,
                index: 1
            },
            *inner
        ),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn issuer_path_invalid() {
    let f = AcFixture::new();
    let pe = pki_environment();
    let ac = f.sign(&f.acinfo());

    let mut cps = settings();
    cps.set_require_revocation_status(true);
    let mut config = f.config();
    config
        .holder_path
        .set_revocation_status(1, RevocationStatus::Good)
        .unwrap();
    assert!(validate_attribute_certificate(&pe, &cps, &ac, &config).is_ok());

    // the issuer path runs through an intermediate with no revocation status
    let key_i = TestKey::new(82);
    let intermediate = CertBuilder::new("CN=I", "CN=A,O=Example,C=US", 3)
        .ca(None)
        .sign(&key_i, &f.key_a);
    config.issuer_path = CertificationPath::new(vec![f.a.clone(), intermediate]).unwrap();
    assert!(matches!(
        validate_attribute_certificate(&pe, &cps, &ac, &config),
        Err(Error::IssuerPathInvalid(_))
    ));
}

#[test]
fn issuer_mismatch_and_exact_matching() {
    let f = AcFixture::new();
    let pe = pki_environment();

    // O=Example,C=US is a superior name of A's subject, which is not sufficient
    let mut acinfo = f.acinfo();
    acinfo.issuer = AttCertIssuer::from_name(&Name::from_str("O=Example,C=US").unwrap());
    assert!(!acinfo.issuer.identifies_pkc(&f.a).unwrap());
    let ac = f.sign(&acinfo);
    assert_eq!(
        Err(Error::IssuerMismatch),
        validate_attribute_certificate(&pe, &settings(), &ac, &f.config())
    );

    // names are compared case-insensitively
    let issuer = AttCertIssuer::from_name(&Name::from_str("CN=a,O=EXAMPLE,C=us").unwrap());
    assert!(issuer.identifies_pkc(&f.a).unwrap());

    // more than one name is not accepted
    let AttCertIssuer::V2Form(mut v2) = AttCertIssuer::from_pkc(&f.a);
    v2.issuer_name
        .as_mut()
        .unwrap()
        .push(GeneralName::DirectoryName(f.a.subject().clone()));
    assert!(!AttCertIssuer::V2Form(v2).identifies_pkc(&f.a).unwrap());

    // baseCertificateID issuers are not supported
    let AttCertIssuer::V2Form(mut v2) = AttCertIssuer::from_pkc(&f.a);
    v2.base_certificate_id = Some(IssuerSerial::from_pkc(&f.a));
    assert_eq!(
        Err(Error::UnsupportedFeature),
        AttCertIssuer::V2Form(v2).identifies_pkc(&f.a)
    );
}

#[test]
fn holder_binding() {
    let f = AcFixture::new();

    let holder = Holder::from_pkc(&f.b);
    assert!(holder.identifies_pkc(&f.b).unwrap());
    assert!(!holder.identifies_pkc(&f.a).unwrap());

    // entityName matching the subject or a SAN entry
    let by_subject = Holder {
        entity_name: Some(vec![GeneralName::DirectoryName(f.b.subject().clone())]),
        ..Default::default()
    };
    assert!(by_subject.identifies_pkc(&f.b).unwrap());
    let by_san = Holder {
        entity_name: Some(vec![dns("b.example.com")]),
        ..Default::default()
    };
    assert!(by_san.identifies_pkc(&f.b).unwrap());
    let by_other = Holder {
        entity_name: Some(vec![dns("c.example.com")]),
        ..Default::default()
    };
    assert!(!by_other.identifies_pkc(&f.b).unwrap());

    // every present field must match
    let both = Holder {
        base_certificate_id: Some(IssuerSerial::from_pkc(&f.b)),
        entity_name: Some(vec![dns("c.example.com")]),
        object_digest_info: None,
    };
    assert!(!both.identifies_pkc(&f.b).unwrap());

    // empty holders identify nothing
    assert!(!Holder::default().identifies_pkc(&f.b).unwrap());

    // objectDigestInfo holders are not supported
    let odi = Holder::from_der(&hex_literal::hex!(
        "3016 a214 0a0100 300b 0609 608648016503040201 0302 00ff"
    ))
    .unwrap();
    assert_eq!(Err(Error::UnsupportedFeature), odi.identifies_pkc(&f.b));

    // serial numbers must match exactly
    let mut is = IssuerSerial::from_pkc(&f.b);
    assert!(is.identifies_pkc(&f.b));
    is.serial = serial_number_from_decimal("3").unwrap();
    assert!(!is.identifies_pkc(&f.b));

    // the holder binding round trips through DER
    let enc = holder.to_der().unwrap();
    assert_eq!(holder, Holder::from_der(&enc).unwrap());
}

#[test]
fn ac_expired() {
    let f = AcFixture::new();
    let pe = pki_environment();
    let mut acinfo = f.acinfo();
    acinfo.attr_cert_validity_period =
        AttCertValidityPeriod::from_unix_secs(TIME_OF_INTEREST + 1, TIME_OF_INTEREST + 3600).unwrap();
    let ac = f.sign(&acinfo);
    assert_eq!(
        Err(Error::AcExpired),
        validate_attribute_certificate(&pe, &settings(), &ac, &f.config())
    );

    // bounds are inclusive
    let mut acinfo = f.acinfo();
    acinfo.attr_cert_validity_period =
        AttCertValidityPeriod::from_unix_secs(TIME_OF_INTEREST, TIME_OF_INTEREST).unwrap();
    let ac = f.sign(&acinfo);
    assert!(validate_attribute_certificate(&pe, &settings(), &ac, &f.config()).is_ok());
}

#[test]
fn ac_signature_invalid() {
    let f = AcFixture::new();
    let pe = pki_environment();

    // signed by the holder rather than the issuer
    let ac = f
        .acinfo()
        .sign(&pe, &ecdsa_with_sha256(), &f.key_b.pkcs8)
        .unwrap();
    assert_eq!(
        Err(Error::AcSignatureInvalid),
        validate_attribute_certificate(&pe, &settings(), &ac, &f.config())
    );

    // inner and outer signature algorithms differ
    let mut acinfo = f.acinfo();
    acinfo.signature = spki::AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_384,
        parameters: None,
    };
    let ac = f.sign(&acinfo);
    assert_eq!(
        Err(Error::AcSignatureInvalid),
        validate_attribute_certificate(&pe, &settings(), &ac, &f.config())
    );
}
