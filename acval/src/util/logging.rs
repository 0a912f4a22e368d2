//! Logging support
//!
//! The library only emits records via the [`log`] facade. Applications install whatever logger suits
//! them (log4rs, env_logger, etc.).

use log::{debug, error, info, warn};
use x509_cert::name::Name;

use crate::PDVCertificate;

/// Enum that describes level associated with a log message
#[derive(Debug, Eq, PartialEq)]
pub enum PeLogLevels {
    /// Common error logging level
    PeError,
    /// Common info logging level
    PeInfo,
    /// Common warn logging level
    PeWarn,
    /// Common debug logging level
    PeDebug,
}

/// `log_message` forwards a message to the `log` macro that corresponds to `level`.
pub fn log_message(level: &PeLogLevels, message: &str) {
    match level {
        PeLogLevels::PeError => error!("{}", message),
        PeLogLevels::PeWarn => warn!("{}", message),
        PeLogLevels::PeInfo => info!("{}", message),
        PeLogLevels::PeDebug => debug!("{}", message),
    }
}

/// `log_error_for_name` logs an error message with the given name appended as context.
pub fn log_error_for_name(name: &Name, msg: &str) {
    error!(
        "Encountered error while processing certificate with subject {}: {}",
        name, msg
    );
}

/// `log_error_for_ca` logs an error message with the subject name of the given certificate appended.
pub fn log_error_for_ca(ca: &PDVCertificate, msg: &str) {
    log_error_for_name(ca.subject(), msg);
}
