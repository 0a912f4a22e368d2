//! Utility functions that support name comparison, name constraint containment checks and serial
//! number handling during certification path and attribute certificate processing

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use lazy_static::lazy_static;
use log::debug;
use num_bigint::BigUint;
use regex::Regex;
use subtle_encoding::hex;

use const_oid::db::rfc3280::EMAIL_ADDRESS;
use der::asn1::{Ia5String, PrintableString, Utf8StringRef};
use der::{asn1::ObjectIdentifier, Encode, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::{Name, RelativeDistinguishedName};
use x509_cert::serial_number::SerialNumber;
use x509_cert::Certificate;

use crate::asn1::attribute_certificate::ID_ACA_AUTHENTICATION_INFO;
use crate::util::error::*;

lazy_static! {
    static ref WHITESPACE_RE: Option<Regex> = Regex::new(r"\s+").ok();
}

/// `is_self_issued` returns true if the subject field in the certificate is the same as the issuer
/// field.
pub fn is_self_issued(cert: &Certificate) -> bool {
    compare_names(&cert.tbs_certificate.issuer, &cert.tbs_certificate.subject)
}

/// get_value_from_rdn returns the value from AttributeTypeAndValue as a string for use in comparing
/// values where leading whitespace may be a factor
pub fn get_value_from_rdn(atav: &AttributeTypeAndValue) -> Result<String> {
    let val = match atav.value.tag() {
        der::Tag::PrintableString => atav
            .value
            .decode_as()
            .ok()
            .map(|s: PrintableString| s.to_string()),
        der::Tag::Utf8String => atav
            .value
            .decode_as()
            .ok()
            .map(|s: Utf8StringRef<'_>| s.to_string()),
        der::Tag::Ia5String => atav
            .value
            .decode_as()
            .ok()
            .map(|s: Ia5String| s.to_string()),
        _ => None,
    };

    let mut s = "".to_string();
    if let Some(val) = val {
        let mut iter = val.char_indices().peekable();
        while let Some((i, c)) = iter.next() {
            match c {
                '#' if i == 0 => s.push_str("\\#"),
                ' ' if i == 0 || iter.peek().is_none() => s.push_str("\\ "),
                '"' | '+' | ',' | ';' | '<' | '>' | '\\' => s.push_str(format!("\\{}", c).as_str()),
                '\x00'..='\x1f' | '\x7f' => s.push_str(format!("\\{:02x}", c as u8).as_str()),
                _ => s.push(c),
            }
        }
    } else {
        let val = atav.value.to_der()?;
        s.push_str(format!("{}=#", atav.oid).as_str());
        for c in val {
            s.push_str(format!("{:02x}", c).as_str());
        }
    }
    Ok(s)
}

/// Lowercases, trims and collapses runs of whitespace in an attribute value.
fn normalize_rdn_value(atav: &AttributeTypeAndValue) -> Option<String> {
    let val = get_value_from_rdn(atav).ok()?.replace("\\ ", " ");
    let val = val.trim().to_lowercase();
    match WHITESPACE_RE.as_ref() {
        Some(re) => Some(re.replace_all(val.as_str(), " ").to_string()),
        None => Some(val),
    }
}

/// `compare_rdns` returns true if the two RDNs contain the same number of attributes and each pair of
/// attributes features the same type and an equivalent value after whitespace and case normalization.
pub(crate) fn compare_rdns(lrdn: &RelativeDistinguishedName, rrdn: &RelativeDistinguishedName) -> bool {
    if lrdn.0.len() != rrdn.0.len() {
        return false;
    }

    if lrdn == rrdn {
        return true;
    }

    for (l, r) in lrdn.0.iter().zip(rrdn.0.iter()) {
        if l.oid != r.oid {
            return false;
        }
        if l.value == r.value {
            continue;
        }

        let l_val = match normalize_rdn_value(l) {
            Some(v) => v,
            None => return false,
        };
        let r_val = match normalize_rdn_value(r) {
            Some(v) => v,
            None => return false,
        };
        if l_val != r_val {
            return false;
        }
        if l.value.tag() != r.value.tag() {
            debug!("Matching attribute values despite different character sets");
        }
    }
    true
}

/// [`compare_names`] compares two Name values returning true if they match and false otherwise.
///
/// Names match when they feature the same number of RDNs and each RDN pair matches per attribute,
/// ignoring case, leading and trailing whitespace and repeated internal whitespace.
pub fn compare_names(left: &Name, right: &Name) -> bool {
    // no match if not the same number of RDNs
    if left.0.len() != right.0.len() {
        return false;
    }

    left.0
        .iter()
        .zip(right.0.iter())
        .all(|(l, r)| compare_rdns(l, r))
}

/// `compare_general_names` returns true if the two GeneralName values are of the same form and
/// identify the same entity. Directory names are compared using [`compare_names`], DNS names and
/// RFC822 names are compared without regard to case and all other forms are compared as encoded.
pub fn compare_general_names(left: &GeneralName, right: &GeneralName) -> bool {
    match (left, right) {
        (GeneralName::DirectoryName(l), GeneralName::DirectoryName(r)) => compare_names(l, r),
        (GeneralName::DnsName(l), GeneralName::DnsName(r)) => {
            l.to_string().to_lowercase() == r.to_string().to_lowercase()
        }
        (GeneralName::Rfc822Name(l), GeneralName::Rfc822Name(r)) => {
            l.to_string().to_lowercase() == r.to_string().to_lowercase()
        }
        _ => left == right,
    }
}

/// `descended_from_dn` returns true if name is equal to or subordinate to subtree, i.e., if the RDNs
/// of subtree are a prefix of the RDNs of name.
pub(crate) fn descended_from_dn(subtree: &Name, name: &Name) -> bool {
    //if descendant fewer rdns then it is not a descendant
    if subtree.0.len() > name.0.len() {
        return false;
    }

    subtree
        .0
        .iter()
        .zip(name.0.iter())
        .all(|(l, r)| compare_rdns(l, r))
}

/// `descended_from_host` returns true if cand is equal to base or is a subdomain of base, without
/// regard to case. A base with a leading period matches proper subdomains only.
pub(crate) fn descended_from_host(base: &str, cand: &str) -> bool {
    let base = base.to_lowercase();
    let cand = cand.to_lowercase();
    if base.is_empty() {
        // an empty dNSName constraint matches every host
        return true;
    }

    if base.starts_with('.') {
        return cand.len() > base.len() && cand.ends_with(base.as_str());
    }

    if cand == base {
        return true;
    }
    cand.ends_with(format!(".{}", base).as_str())
}

/// `descended_from_rfc822` returns true if cand is within the subtree identified by base.
///
/// - a base that contains an `@` identifies a single mailbox
/// - otherwise the domain of cand is matched against the base using [`descended_from_host`], so a
///   base with a leading period identifies mailboxes at proper subdomains and any other base
///   identifies mailboxes at the host and its subdomains
pub(crate) fn descended_from_rfc822(base: &str, cand: &str) -> bool {
    let base = base.to_lowercase();
    let cand = cand.to_lowercase();

    if base.contains('@') {
        return base == cand;
    }

    let domain = match cand.rsplit_once('@') {
        Some((_, domain)) => domain,
        None => return false,
    };

    descended_from_host(base.as_str(), domain)
}

/// `descended_from_ip` returns true if cand, an IPv4 or IPv6 address, falls within the range
/// identified by base, an address followed by a mask of the same family.
pub(crate) fn descended_from_ip(base: &[u8], cand: &[u8]) -> bool {
    if base.len() != cand.len() * 2 || !(cand.len() == 4 || cand.len() == 16) {
        return false;
    }
    let (addr, mask) = base.split_at(cand.len());
    cand.iter()
        .zip(addr.iter())
        .zip(mask.iter())
        .all(|((c, a), m)| c & m == a & m)
}

/// `host_from_uri` returns the host component of a URI, if any.
pub(crate) fn host_from_uri(uri: &str) -> Option<String> {
    match url::Url::parse(uri) {
        Ok(url) => url.host_str().map(|h| h.to_string()),
        Err(e) => {
            debug!("Failed to parse URI {}: {}", uri, e);
            None
        }
    }
}

/// `email_addresses_from_name` collects the values of any emailAddress attributes found in the
/// presented Name.
pub fn email_addresses_from_name(name: &Name) -> Vec<Ia5String> {
    let mut retval = Vec::new();
    for rdn in name.0.iter() {
        for atav in rdn.0.iter() {
            if atav.oid == EMAIL_ADDRESS {
                if let Ok(email) = atav.value.decode_as::<Ia5String>() {
                    retval.push(email);
                }
            }
        }
    }
    retval
}

/// `oid_lookup` takes an ObjectIdentifier and returns a friendly name drawn from the `const-oid`
/// database, or NotFound if no friendly name is known.
pub fn oid_lookup(oid: &ObjectIdentifier) -> Result<String> {
    if *oid == ID_ACA_AUTHENTICATION_INFO {
        return Ok("authenticationInfo".to_string());
    }
    match const_oid::db::DB.by_oid(oid) {
        Some(name) => Ok(name.to_string()),
        None => Err(Error::NotFound),
    }
}

/// `general_name_to_string` returns a string representation of the GeneralName for logging.
pub(crate) fn general_name_to_string(gn: &GeneralName) -> String {
    match gn {
        GeneralName::DirectoryName(dn) => {
            format!("DirectoryName: {}", dn)
        }
        GeneralName::UniformResourceIdentifier(uri) => {
            format!("UniformResourceIdentifier: {}", uri)
        }
        GeneralName::DnsName(dns) => format!("DnsName: {}", dns),
        GeneralName::Rfc822Name(rfc822) => {
            format!("Rfc822Name: {}", rfc822)
        }
        GeneralName::OtherName(_on) => format!("OtherName: {:?}", gn),
        GeneralName::RegisteredId(_rid) => format!("RegisteredId: {:?}", gn),
        GeneralName::IpAddress(ip) => format!("IpAddress: {}", buffer_to_hex(ip.as_bytes())),
        GeneralName::EdiPartyName(_ip) => format!("EdiPartyName: {:?}", gn),
    }
}

/// `buffer_to_hex` takes a byte array and returns a string featuring upper case ASCII hex characters (without
/// commas, spaces, or brackets).
/// ```
/// use acval::buffer_to_hex;
/// let buf :[u8; 3] = [1,2,3];
/// let bufhex = buffer_to_hex(&buf);
/// assert_eq!(bufhex, "010203");
/// ```
pub fn buffer_to_hex(buffer: &[u8]) -> String {
    let hex = hex::encode_upper(buffer);
    String::from_utf8(hex).unwrap_or_default()
}

/// `serial_number_to_decimal` returns the decimal representation of a non-negative serial number.
pub fn serial_number_to_decimal(serial: &SerialNumber) -> String {
    BigUint::from_bytes_be(serial.as_bytes()).to_str_radix(10)
}

/// `serial_number_from_decimal` parses a string of decimal digits into a [`SerialNumber`]. Strings that
/// are empty, contain non-digit characters or are too large for a serial number yield
/// [`Error::ParseError`].
pub fn serial_number_from_decimal(decimal: &str) -> Result<SerialNumber> {
    if decimal.is_empty() || !decimal.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::ParseError);
    }
    let value = match BigUint::parse_bytes(decimal.as_bytes(), 10) {
        Some(v) => v,
        None => return Err(Error::ParseError),
    };
    SerialNumber::new(value.to_bytes_be().as_slice()).map_err(|_| Error::ParseError)
}
