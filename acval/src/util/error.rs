//! Error types

use alloc::boxed::Box;
use core::fmt;

/// Result type
pub type Result<T> = core::result::Result<T, Error>;

/// `PathValidationStatus` identifies which step of certification path validation failed. It is
/// paired with the index of the offending certificate in [`Error::PathValidation`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum PathValidationStatus {
    /// No errors were encountered while validating certification path
    Valid,
    /// NameChainingFailure occurs when a CertificationPath features certificates for which the subject
    /// name of a superior certificate does not match the issuer name of the immediately subordinate certificate.
    NameChainingFailure,
    /// SignatureMismatch occurs when the subject public key of a superior certificate does not verify
    /// the signature of the immediately subordinate certificate.
    SignatureMismatch,
    /// ExpiredOrNotYetValid occurs when the intersection of validity periods accumulated along the path
    /// is empty or does not include the time of interest.
    ExpiredOrNotYetValid,
    /// CaConstraintViolation occurs when a certificate used to verify another certificate lacks the cA
    /// flag or keyCertSign, or when the path length budget is exhausted.
    CaConstraintViolation,
    /// NameConstraintViolation occurs when a name in a certificate falls outside the permitted subtrees
    /// or within the excluded subtrees accumulated along the path.
    NameConstraintViolation,
    /// UniqueIdentifierMismatch occurs when unique identifier matching is required and the
    /// issuerUniqueID of a certificate does not match the subjectUniqueID of its issuer.
    UniqueIdentifierMismatch,
    /// UnprocessedCriticalExtension occurs when a certificate features a critical extension that is
    /// not recognized.
    UnprocessedCriticalExtension,
    /// CertificateRevoked occurs when revocation status supplied with the path marks a certificate as revoked.
    CertificateRevoked,
    /// RevocationStatusNotDetermined occurs when revocation status is required and none was supplied
    /// for a certificate.
    RevocationStatusNotDetermined,
}

/// Error type
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Certification path validation failed at the certificate found at `index`, where index 0 is the
    /// trust anchor.
    PathValidation {
        /// Reason for the failure
        status: PathValidationStatus,
        /// Position of the offending certificate in the path
        index: usize,
    },
    /// Structurally invalid or disallowed encoding
    MalformedEncoding(der::Error),
    /// No certification path could be assembled that connects the trust anchor to the target
    IncompletePath,
    /// Path construction encountered a certificate at two positions
    CyclicPath,
    /// A signature did not verify using the presented public key
    SignatureVerificationFailure,
    /// A well-formed structure uses a feature this library does not support, i.e., maximum or
    /// minimum in a GeneralSubtree or an objectDigestInfo holder
    UnsupportedFeature,
    /// The holder's certification path did not validate
    HolderPathInvalid(Box<Error>),
    /// The attribute certificate issuer's certification path did not validate
    IssuerPathInvalid(Box<Error>),
    /// The attribute certificate holder does not identify the holder path target
    HolderMismatch,
    /// The attribute certificate issuer does not identify the issuer path target
    IssuerMismatch,
    /// The time of interest falls outside the attribute certificate validity period
    AcExpired,
    /// The attribute certificate signature could not be verified
    AcSignatureInvalid,
    /// Item was not found
    NotFound,
    /// Item was not recognized, i.e., an unsupported algorithm
    Unrecognized,
    /// Failed to parse a non-ASN.1 object, i.e., JSON settings
    ParseError,
    /// Error from std::io
    StdIoError(std::io::ErrorKind),
}

impl Error {
    /// Returns the [`PathValidationStatus`] carried by a [`Error::PathValidation`] value, looking
    /// through [`Error::HolderPathInvalid`] and [`Error::IssuerPathInvalid`] wrappers.
    pub fn path_validation_status(&self) -> Option<PathValidationStatus> {
        match self {
            Error::PathValidation { status, .. } => Some(*status),
            Error::HolderPathInvalid(e) | Error::IssuerPathInvalid(e) => e.path_validation_status(),
            _ => None,
        }
    }
}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::MalformedEncoding(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::StdIoError(err.kind())
    }
}

impl fmt::Display for PathValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValidationStatus::Valid => write!(f, "Valid"),
            PathValidationStatus::NameChainingFailure => write!(f, "NameChainingFailure"),
            PathValidationStatus::SignatureMismatch => write!(f, "SignatureMismatch"),
            PathValidationStatus::ExpiredOrNotYetValid => write!(f, "ExpiredOrNotYetValid"),
            PathValidationStatus::CaConstraintViolation => write!(f, "CaConstraintViolation"),
            PathValidationStatus::NameConstraintViolation => write!(f, "NameConstraintViolation"),
            PathValidationStatus::UniqueIdentifierMismatch => {
                write!(f, "UniqueIdentifierMismatch")
            }
            PathValidationStatus::UnprocessedCriticalExtension => {
                write!(f, "UnprocessedCriticalExtension")
            }
            PathValidationStatus::CertificateRevoked => write!(f, "CertificateRevoked"),
            PathValidationStatus::RevocationStatusNotDetermined => {
                write!(f, "RevocationStatusNotDetermined")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PathValidation { status, index } => {
                write!(f, "PathValidationError: {} at index {}", status, index)
            }
            Error::MalformedEncoding(err) => write!(f, "MalformedEncoding: {}", err),
            Error::IncompletePath => write!(f, "IncompletePath"),
            Error::CyclicPath => write!(f, "CyclicPath"),
            Error::SignatureVerificationFailure => write!(f, "SignatureVerificationFailure"),
            Error::UnsupportedFeature => write!(f, "UnsupportedFeature"),
            Error::HolderPathInvalid(err) => write!(f, "HolderPathInvalid: {}", err),
            Error::IssuerPathInvalid(err) => write!(f, "IssuerPathInvalid: {}", err),
            Error::HolderMismatch => write!(f, "HolderMismatch"),
            Error::IssuerMismatch => write!(f, "IssuerMismatch"),
            Error::AcExpired => write!(f, "AcExpired"),
            Error::AcSignatureInvalid => write!(f, "AcSignatureInvalid"),
            Error::NotFound => write!(f, "NotFound"),
            Error::Unrecognized => write!(f, "Unrecognized"),
            Error::ParseError => write!(f, "ParseError"),
            Error::StdIoError(err) => write!(f, "StdError: {:?}", err),
        }
    }
}

impl std::error::Error for Error {}

#[test]
fn error_test() {
    use alloc::format;
    let _s = format!("{}", PathValidationStatus::Valid);
    let _s = format!("{}", PathValidationStatus::NameChainingFailure);
    let _s = format!("{}", PathValidationStatus::SignatureMismatch);
    let _s = format!("{}", PathValidationStatus::ExpiredOrNotYetValid);
    let _s = format!("{}", PathValidationStatus::CaConstraintViolation);
    let _s = format!("{}", PathValidationStatus::NameConstraintViolation);
    let _s = format!("{}", PathValidationStatus::UniqueIdentifierMismatch);
    let _s = format!("{}", PathValidationStatus::UnprocessedCriticalExtension);
    let _s = format!("{}", PathValidationStatus::CertificateRevoked);
    let _s = format!("{}", PathValidationStatus::RevocationStatusNotDetermined);

    let s = format!(
        "{}",
        Error::PathValidation {
            status: PathValidationStatus::SignatureMismatch,
            index: 2
        }
    );
    assert_eq!("PathValidationError: SignatureMismatch at index 2", s);
    let _s = format!("{}", Error::MalformedEncoding(der::Tag::Sequence.value_error()));
    let _s = format!("{}", Error::IncompletePath);
    let _s = format!("{}", Error::CyclicPath);
    let _s = format!("{}", Error::SignatureVerificationFailure);
    let _s = format!("{}", Error::UnsupportedFeature);
    let _s = format!("{}", Error::HolderMismatch);
    let _s = format!("{}", Error::IssuerMismatch);
    let _s = format!("{}", Error::AcExpired);
    let _s = format!("{}", Error::AcSignatureInvalid);
    let _s = format!("{}", Error::NotFound);
    let _s = format!("{}", Error::Unrecognized);
    let _s = format!("{}", Error::ParseError);
    let _s = format!("{}", Error::StdIoError(std::io::ErrorKind::NotFound));

    let wrapped = Error::HolderPathInvalid(Box::new(Error::PathValidation {
        status: PathValidationStatus::CaConstraintViolation,
        index: 1,
    }));
    assert_eq!(
        Some(PathValidationStatus::CaConstraintViolation),
        wrapped.path_validation_status()
    );
    assert_eq!(
        "HolderPathInvalid: PathValidationError: CaConstraintViolation at index 1",
        format!("{}", wrapped)
    );
    assert_eq!(None, Error::HolderMismatch.path_validation_status());

    let e: Error = der::Tag::Integer.value_error().into();
    assert!(matches!(e, Error::MalformedEncoding(_)));
}
