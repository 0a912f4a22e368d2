mod common;

use acval::*;
use common::*;

#[test]
fn builds_path_from_pool() {
    let pki = TestPki::new();
    let pool = vec![pki.intermediate.clone()];
    let cp = CertificationPath::from_trust_anchor_to_target(&pki.root, &pki.leaf, &pool).unwrap();
    assert_eq!(3, cp.len());
    assert_eq!(pki.root.encoded_cert, cp.trust_anchor().encoded_cert);
    assert_eq!(pki.intermediate.encoded_cert, cp.certificates[1].encoded_cert);
    assert_eq!(pki.leaf.encoded_cert, cp.target().encoded_cert);

    let pe = pki_environment();
    assert!(pe.validate_path(&pe, &settings(), &cp).is_ok());
}

#[test]
fn target_issued_by_trust_anchor() {
    let pki = TestPki::new();
    let cp = build_path(&pki.root, &pki.intermediate, &[]).unwrap();
    assert_eq!(2, cp.len());

    let cp = build_path(&pki.root, &pki.root, &[]).unwrap();
    assert_eq!(1, cp.len());
}

#[test]
fn incomplete_path() {
    let pki = TestPki::new();
    assert_eq!(
        Err(Error::IncompletePath),
        build_path(&pki.root, &pki.leaf, &[]).map(|_| ())
    );

    // an issuer whose key usage does not permit certificate signing is not a candidate
    let not_a_signer = CertBuilder::new(INTERMEDIATE, ROOT, 8)
        .basic_constraints(true, None)
        .key_usage(x509_cert::ext::pkix::KeyUsage(
            x509_cert::ext::pkix::KeyUsages::DigitalSignature.into(),
        ))
        .sign(&pki.intermediate_key, &pki.root_key);
    assert_eq!(
        Err(Error::IncompletePath),
        build_path(&pki.root, &pki.leaf, &[not_a_signer]).map(|_| ())
    );
}

#[test]
fn cyclic_path() {
    let key_x = TestKey::new(60);
    let key_y = TestKey::new(61);
    let key_t = TestKey::new(62);
    let root_key = TestKey::new(63);
    let root = CertBuilder::new("CN=Root", "CN=Root", 1)
        .ca(None)
        .sign(&root_key, &root_key);

    // X and Y cross-certify each other and neither chains to the root
    let x = CertBuilder::new("CN=X", "CN=Y", 2).ca(None).sign(&key_x, &key_y);
    let y = CertBuilder::new("CN=Y", "CN=X", 3).ca(None).sign(&key_y, &key_x);
    let target = CertBuilder::new("CN=Target", "CN=X", 4).sign(&key_t, &key_x);

    assert_eq!(
        Err(Error::CyclicPath),
        build_path(&root, &target, &[x, y]).map(|_| ())
    );

    // the target itself may not appear as its own issuer
    let self_issued = CertBuilder::new("CN=Loop", "CN=Loop", 5)
        .ca(None)
        .sign(&key_t, &key_t);
    assert_eq!(
        Err(Error::CyclicPath),
        build_path(&root, &self_issued, &[self_issued.clone()]).map(|_| ())
    );
}

#[test]
fn prefers_matching_key_identifier() {
    let pki = TestPki::new();
    // same subject name as the real intermediate but a different key
    let decoy_key = TestKey::new(70);
    let decoy = CertBuilder::new(INTERMEDIATE, ROOT, 9)
        .ca(None)
        .sign(&decoy_key, &pki.root_key);

    let pool = vec![decoy, pki.intermediate.clone()];
    let cp = build_path(&pki.root, &pki.leaf, &pool).unwrap();
    assert_eq!(pki.intermediate.encoded_cert, cp.certificates[1].encoded_cert);

    let pe = pki_environment();
    assert!(pe.validate_path(&pe, &settings(), &cp).is_ok());
}
