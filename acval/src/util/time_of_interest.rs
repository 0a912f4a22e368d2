//! Utils to define the time of interest when validating certificates and attribute certificates

use core::{cmp::Ordering, fmt, time::Duration};

use serde::{
    de::{self, Deserializer, Visitor},
    ser::Serializer,
    Deserialize, Serialize,
};

/// Time of interest for the validation of a certification path or attribute certificate.
///
/// The Unix epoch is reserved to mean "do not check validity periods".
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct TimeOfInterest(pub der::DateTime);

impl fmt::Display for TimeOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TimeOfInterest {
    /// Make [`TimeOfInterest`] where checks are disabled
    pub fn disabled() -> Self {
        TimeOfInterest(
            der::DateTime::from_unix_duration(Duration::ZERO)
                // NOTE(safety): only values before 1970 or after 9999 are rejected
                .expect("Could not create a DateTime from Unix Epoch"),
        )
    }

    /// Should time checks be disabled?
    pub fn is_disabled(&self) -> bool {
        self.0.unix_duration() == Duration::ZERO
    }

    /// Create a [`TimeOfInterest`] from Unix epoch
    pub fn from_unix_secs(v: u64) -> der::Result<Self> {
        Ok(Self(der::DateTime::from_unix_duration(
            Duration::from_secs(v),
        )?))
    }

    /// Return Unix epoch (in seconds) for this value
    pub fn as_unix_secs(&self) -> u64 {
        self.0.unix_duration().as_secs()
    }

    /// Creates a [`TimeOfInterest`] for the current system time
    pub fn now() -> der::Result<Self> {
        Ok(Self(der::DateTime::from_system_time(
            std::time::SystemTime::now(),
        )?))
    }
}

impl PartialEq<x509_cert::time::Time> for TimeOfInterest {
    fn eq(&self, other: &x509_cert::time::Time) -> bool {
        self.0.eq(&other.to_date_time())
    }
}

impl PartialOrd<x509_cert::time::Time> for TimeOfInterest {
    fn partial_cmp(&self, other: &x509_cert::time::Time) -> Option<Ordering> {
        self.0.partial_cmp(&other.to_date_time())
    }
}

impl PartialEq<der::asn1::GeneralizedTime> for TimeOfInterest {
    fn eq(&self, other: &der::asn1::GeneralizedTime) -> bool {
        self.0.eq(&other.to_date_time())
    }
}

impl PartialOrd<der::asn1::GeneralizedTime> for TimeOfInterest {
    fn partial_cmp(&self, other: &der::asn1::GeneralizedTime) -> Option<Ordering> {
        self.0.partial_cmp(&other.to_date_time())
    }
}

impl Serialize for TimeOfInterest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.as_unix_secs())
    }
}

impl<'de> Deserialize<'de> for TimeOfInterest {
    fn deserialize<D>(deserializer: D) -> Result<TimeOfInterest, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ToiVisitor;

        impl<'de> Visitor<'de> for ToiVisitor {
            type Value = TimeOfInterest;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an integer between 0 and 2^64")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                TimeOfInterest::from_unix_secs(value)
                    .map_err(|_| E::custom(format_args!("time of interest out of range: {value}")))
            }
        }

        deserializer.deserialize_u64(ToiVisitor)
    }
}

#[test]
fn time_of_interest_test() {
    use der::asn1::GeneralizedTime;

    let toi = TimeOfInterest::from_unix_secs(1_700_000_000).unwrap();
    assert!(!toi.is_disabled());
    assert!(TimeOfInterest::disabled().is_disabled());
    assert_eq!(1_700_000_000, toi.as_unix_secs());

    let earlier = GeneralizedTime::from_unix_duration(Duration::from_secs(1_600_000_000)).unwrap();
    let later = GeneralizedTime::from_unix_duration(Duration::from_secs(1_800_000_000)).unwrap();
    assert!(toi > earlier);
    assert!(toi < later);

    let json = serde_json::to_string(&toi).unwrap();
    assert_eq!("1700000000", json);
    let back: TimeOfInterest = serde_json::from_str(&json).unwrap();
    assert_eq!(toi, back);
}
