//! Structures and functions related to configuring certification path processing operations

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use log::error;
use serde::{Deserialize, Serialize};

use pkiprocmacros::*;

use crate::util::error::*;
use crate::util::time_of_interest::TimeOfInterest;

/// `CertificationPathSettings` is a typedef for a `BTreeMap` that maps arbitrary string values to a
/// variant map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationPathSettings(pub BTreeMap<String, CertificationPathProcessingTypes>);

/// `CertificationPathProcessingTypes` is used to define a variant map with types associated with
/// performing certification path and attribute certificate validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificationPathProcessingTypes {
    /// Represents bool values
    Bool(bool),
    /// Represents u8 values
    U8(u8),
    /// Represents u64 values
    U64(u64),
    /// Represents String values
    String(String),
}

//-----------------------------------------------------------------------------------------------
// Types of path settings
//-----------------------------------------------------------------------------------------------
/// `PS_TIME_OF_INTEREST` is used to retrieve a Time value from a [`CertificationPathSettings`]
/// object. This corresponds to the current date/time value described in
/// [RFC 5280 Section 6.1.1]: <https://datatracker.ietf.org/doc/html/rfc5280#section-6.1.1>. The value
/// need not be current data/time and can be a time in the past to support retrospective validation.
/// The value is expressed as a u64 containing seconds since Unix epoch (i.e., 1970-01-01T00:00:00Z).
/// By default, the value is set to current time. A value of 0 disables validity period checks.
pub static PS_TIME_OF_INTEREST: &str = "psTimeOfInterest";

/// `PS_ENFORCE_TRUST_ANCHOR_VALIDITY` is used to retrieve a boolean value from a [`CertificationPathSettings`]
/// object. By default, this setting is set to true (per industry convention, RFC5280 does not
/// require checking trust anchor (TA) validity). Turn this value off to refrain from checking TA validity.
pub static PS_ENFORCE_TRUST_ANCHOR_VALIDITY: &str = "psEnforceTrustAnchorValidity";

/// `PS_INITIAL_PATH_LENGTH_CONSTRAINT` is used to retrieve a u8 value from a [`CertificationPathSettings`]
/// object. This value is used in concert with BasicConstraints extensions during certification
/// path validation by establishing the maximum path length that will be accepted. By default, the
/// value is set to 15, as defined by `PS_MAX_PATH_LENGTH_CONSTRAINT`.
pub static PS_INITIAL_PATH_LENGTH_CONSTRAINT: &str = "psInitialPathLengthConstraint";

/// `PS_MAX_PATH_LENGTH_CONSTRAINT` sets the maximum length path accepted by validation implementation
pub static PS_MAX_PATH_LENGTH_CONSTRAINT: u8 = 15;

/// `PS_REQUIRE_UNIQUE_IDENTIFIER_MATCH` is used to retrieve a boolean value from a [`CertificationPathSettings`]
/// object. The default value is false. When true, the issuerUniqueID of a certificate must match the
/// subjectUniqueID of its issuer when both are present.
pub static PS_REQUIRE_UNIQUE_IDENTIFIER_MATCH: &str = "psRequireUniqueIdentifierMatch";

/// `PS_REQUIRE_REVOCATION_STATUS` is used to retrieve a boolean value from a [`CertificationPathSettings`]
/// object. The default value is false. When true, each certificate after the trust anchor must have
/// a revocation status of Good attached to the [`CertificationPath`](crate::CertificationPath).
pub static PS_REQUIRE_REVOCATION_STATUS: &str = "psRequireRevocationStatus";

/// `PS_REJECT_UNRECOGNIZED_CRITICAL_EXTENSIONS` is used to retrieve a boolean value from a
/// [`CertificationPathSettings`] object. The default value is true. Turning this off allows paths
/// containing critical extensions this library does not process, which RFC 5280 does not permit.
pub static PS_REJECT_UNRECOGNIZED_CRITICAL_EXTENSIONS: &str = "psRejectUnrecognizedCriticalExtensions";

impl CertificationPathSettings {
    /// Creates a new empty [`CertificationPathSettings`]
    pub fn new() -> Self {
        Self::default()
    }

    /// `get_time_of_interest` returns the `PS_TIME_OF_INTEREST` value or the current time if no value
    /// has been set.
    pub fn get_time_of_interest(&self) -> Result<TimeOfInterest> {
        match self.0.get(PS_TIME_OF_INTEREST) {
            Some(CertificationPathProcessingTypes::U64(v)) => {
                Ok(TimeOfInterest::from_unix_secs(*v)?)
            }
            _ => Ok(TimeOfInterest::now()?),
        }
    }

    /// `set_time_of_interest` sets the `PS_TIME_OF_INTEREST` value
    pub fn set_time_of_interest(&mut self, toi: TimeOfInterest) {
        self.0.insert(
            PS_TIME_OF_INTEREST.to_string(),
            CertificationPathProcessingTypes::U64(toi.as_unix_secs()),
        );
    }

    cps_gets_and_sets_with_default!(PS_ENFORCE_TRUST_ANCHOR_VALIDITY, bool, true);
    cps_gets_and_sets_with_default!(
        PS_INITIAL_PATH_LENGTH_CONSTRAINT,
        u8,
        PS_MAX_PATH_LENGTH_CONSTRAINT
    );
    cps_gets_and_sets_with_default!(PS_REQUIRE_UNIQUE_IDENTIFIER_MATCH, bool, false);
    cps_gets_and_sets_with_default!(PS_REQUIRE_REVOCATION_STATUS, bool, false);
    cps_gets_and_sets_with_default!(PS_REJECT_UNRECOGNIZED_CRITICAL_EXTENSIONS, bool, true);
}

/// `read_settings` deserializes a JSON-formatted [`CertificationPathSettings`] from the named file.
/// Default settings are returned when no file name is given or the file does not exist.
pub fn read_settings(fname: &Option<String>) -> Result<CertificationPathSettings> {
    if let Some(fname) = fname {
        let p = std::path::Path::new(fname.as_str());
        if p.exists() {
            let json = std::fs::read(p)?;
            return match serde_json::from_slice::<CertificationPathSettings>(&json) {
                Ok(cps) => Ok(cps),
                Err(e) => {
                    error!("Failed to parse settings from {}: {}", fname, e);
                    Err(Error::ParseError)
                }
            };
        }
    }
    Ok(CertificationPathSettings::new())
}

#[test]
fn test_default_gets_cps() {
    let cps = CertificationPathSettings::default();
    let before = TimeOfInterest::now().unwrap();
    assert!(cps.get_time_of_interest().unwrap() >= before);
    assert!(cps.get_enforce_trust_anchor_validity());
    assert_eq!(15, cps.get_initial_path_length_constraint());
    assert!(!cps.get_require_unique_identifier_match());
    assert!(!cps.get_require_revocation_status());
    assert!(cps.get_reject_unrecognized_critical_extensions());
}

#[test]
fn test_sets_cps() {
    let mut cps = CertificationPathSettings::new();
    cps.set_time_of_interest(TimeOfInterest::disabled());
    assert!(cps.get_time_of_interest().unwrap().is_disabled());
    cps.set_time_of_interest(TimeOfInterest::from_unix_secs(1_700_000_000).unwrap());
    assert_eq!(1_700_000_000, cps.get_time_of_interest().unwrap().as_unix_secs());

    cps.set_enforce_trust_anchor_validity(false);
    assert!(!cps.get_enforce_trust_anchor_validity());
    cps.set_initial_path_length_constraint(2);
    assert_eq!(2, cps.get_initial_path_length_constraint());
    cps.set_require_unique_identifier_match(true);
    assert!(cps.get_require_unique_identifier_match());
    cps.set_require_revocation_status(true);
    assert!(cps.get_require_revocation_status());
    cps.set_reject_unrecognized_critical_extensions(false);
    assert!(!cps.get_reject_unrecognized_critical_extensions());

    // values of the wrong type fall back to the default
    cps.0.insert(
        PS_INITIAL_PATH_LENGTH_CONSTRAINT.to_string(),
        CertificationPathProcessingTypes::Bool(true),
    );
    assert_eq!(15, cps.get_initial_path_length_constraint());
}

#[test]
fn test_read_settings() {
    use std::io::Write;

    assert_eq!(CertificationPathSettings::new(), read_settings(&None).unwrap());
    assert_eq!(
        CertificationPathSettings::new(),
        read_settings(&Some("/does/not/exist.json".to_string())).unwrap()
    );

    let mut cps = CertificationPathSettings::new();
    cps.set_initial_path_length_constraint(3);
    cps.set_time_of_interest(TimeOfInterest::disabled());
    cps.set_require_revocation_status(true);

    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(serde_json::to_string(&cps).unwrap().as_bytes())
        .unwrap();
    let fname = Some(f.path().to_str().unwrap().to_string());
    let read = read_settings(&fname).unwrap();
    assert_eq!(cps, read);
    assert_eq!(3, read.get_initial_path_length_constraint());
    assert!(read.get_require_revocation_status());

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    bad.write_all(b"{ not json").unwrap();
    let fname = Some(bad.path().to_str().unwrap().to_string());
    assert_eq!(Err(Error::ParseError), read_settings(&fname));
}
