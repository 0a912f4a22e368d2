use acval::path_settings::*;
use acval::{CertificationPathSettings, TimeOfInterest};

#[test]
fn path_settings_serialize_deserialize() {
    let ps = CertificationPathSettings::default();
    let json_ps = serde_json::to_string(&ps).unwrap();
    let ps_de = serde_json::from_slice(json_ps.as_bytes()).unwrap();
    assert_eq!(ps, ps_de);
}

#[test]
fn settings_serialization_test() {
    let mut cps = CertificationPathSettings::new();
    cps.set_time_of_interest(TimeOfInterest::from_unix_secs(1_700_000_000).unwrap());
    cps.set_enforce_trust_anchor_validity(false);
    cps.set_initial_path_length_constraint(2);
    cps.set_require_unique_identifier_match(true);
    cps.set_require_revocation_status(true);
    cps.set_reject_unrecognized_critical_extensions(false);

    let json = serde_json::to_string(&cps).unwrap();
    let de: CertificationPathSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(cps, de);
    assert_eq!(
        1_700_000_000,
        de.get_time_of_interest().unwrap().as_unix_secs()
    );
    assert!(!de.get_enforce_trust_anchor_validity());
    assert_eq!(2, de.get_initial_path_length_constraint());
    assert!(de.get_require_unique_identifier_match());
    assert!(de.get_require_revocation_status());
    assert!(!de.get_reject_unrecognized_critical_extensions());
}

#[test]
fn settings_from_json_text() {
    let json = r#"{
        "psTimeOfInterest": {"U64": 0},
        "psInitialPathLengthConstraint": {"U8": 1}
    }"#;
    let cps: CertificationPathSettings = serde_json::from_str(json).unwrap();
    assert!(cps.get_time_of_interest().unwrap().is_disabled());
    assert_eq!(1, cps.get_initial_path_length_constraint());
    // absent values fall back to defaults
    assert!(cps.get_enforce_trust_anchor_validity());
    assert!(!cps.get_require_revocation_status());

    // values of the wrong type are ignored in favor of the default
    let json = r#"{"psInitialPathLengthConstraint": {"Bool": true}}"#;
    let cps: CertificationPathSettings = serde_json::from_str(json).unwrap();
    assert_eq!(
        PS_MAX_PATH_LENGTH_CONSTRAINT,
        cps.get_initial_path_length_constraint()
    );
}
