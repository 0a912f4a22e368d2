//! Structures and functions related to processing name constraints
//!
//! [`NameConstraintsState`] tracks the permitted and excluded subtrees accumulated while walking a
//! certification path from the trust anchor toward the target. Each state is a value: applying a
//! NameConstraints extension yields a new state and leaves the prior state untouched.

use alloc::{string::ToString, vec::Vec};

use der::Decode;
use log::{debug, error};
use x509_cert::ext::pkix::{
    constraints::name::{GeneralSubtree, GeneralSubtrees},
    name::GeneralName,
    NameConstraints, SubjectAltName,
};
use x509_cert::name::Name;

use crate::{util::pdv_utilities::*, Error, Result};

/// Name forms that participate in name constraints processing. otherName, ediPartyName and
/// registeredID names are not constrained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NameForm {
    DirectoryName,
    Rfc822Name,
    DnsName,
    UniformResourceIdentifier,
    IpAddress,
}

const NAME_FORMS: [NameForm; 5] = [
    NameForm::DirectoryName,
    NameForm::Rfc822Name,
    NameForm::DnsName,
    NameForm::UniformResourceIdentifier,
    NameForm::IpAddress,
];

fn form_of(gn: &GeneralName) -> Option<NameForm> {
    match gn {
        GeneralName::DirectoryName(_) => Some(NameForm::DirectoryName),
        GeneralName::Rfc822Name(_) => Some(NameForm::Rfc822Name),
        GeneralName::DnsName(_) => Some(NameForm::DnsName),
        GeneralName::UniformResourceIdentifier(_) => Some(NameForm::UniformResourceIdentifier),
        GeneralName::IpAddress(_) => Some(NameForm::IpAddress),
        _ => None,
    }
}

/// `name_within_subtree` returns true if name falls within the subtree identified by base. Names of
/// different forms never match. For URIs, the host is extracted from the name and compared to the
/// base. A URI with no host matches nothing.
pub fn name_within_subtree(base: &GeneralName, name: &GeneralName) -> bool {
    match (base, name) {
        (GeneralName::DirectoryName(b), GeneralName::DirectoryName(n)) => descended_from_dn(b, n),
        (GeneralName::Rfc822Name(b), GeneralName::Rfc822Name(n)) => {
            descended_from_rfc822(b.to_string().as_str(), n.to_string().as_str())
        }
        (GeneralName::DnsName(b), GeneralName::DnsName(n)) => {
            descended_from_host(b.to_string().as_str(), n.to_string().as_str())
        }
        (GeneralName::UniformResourceIdentifier(b), GeneralName::UniformResourceIdentifier(n)) => {
            match host_from_uri(n.to_string().as_str()) {
                Some(host) => descended_from_host(b.to_string().as_str(), host.as_str()),
                None => false,
            }
        }
        (GeneralName::IpAddress(b), GeneralName::IpAddress(n)) => {
            descended_from_ip(b.as_bytes(), n.as_bytes())
        }
        _ => false,
    }
}

/// `subtree_within_subtree` returns true if every name within the subtree identified by inner also
/// falls within the subtree identified by outer.
fn subtree_within_subtree(outer: &GeneralName, inner: &GeneralName) -> bool {
    match (outer, inner) {
        (GeneralName::DirectoryName(o), GeneralName::DirectoryName(i)) => descended_from_dn(o, i),
        (GeneralName::DnsName(o), GeneralName::DnsName(i))
        | (GeneralName::UniformResourceIdentifier(o), GeneralName::UniformResourceIdentifier(i)) => {
            descended_from_host(o.to_string().as_str(), i.to_string().as_str())
        }
        (GeneralName::Rfc822Name(o), GeneralName::Rfc822Name(i)) => {
            let o = o.to_string().to_lowercase();
            let i = i.to_string().to_lowercase();
            if i.contains('@') {
                descended_from_rfc822(o.as_str(), i.as_str())
            } else if o.contains('@') {
                false
            } else {
                // both identify domains, e.g., .b.example.com or b.example.com within example.com
                descended_from_host(o.as_str(), i.as_str())
            }
        }
        (GeneralName::IpAddress(o), GeneralName::IpAddress(i)) => {
            let o = o.as_bytes();
            let i = i.as_bytes();
            if o.len() != i.len() || !(o.len() == 8 || o.len() == 32) {
                return false;
            }
            let half = o.len() / 2;
            let (o_addr, o_mask) = o.split_at(half);
            let (i_addr, i_mask) = i.split_at(half);
            // inner mask must be at least as specific as outer mask and agree on outer network bits
            o_mask.iter().zip(i_mask.iter()).all(|(om, im)| om & !im == 0)
                && o_addr
                    .iter()
                    .zip(i_addr.iter())
                    .zip(o_mask.iter())
                    .all(|((oa, ia), om)| oa & om == ia & om)
        }
        _ => false,
    }
}

/// The `NameConstraintsSet` structure is used to track permitted or excluded subtrees during path
/// validation, per [RFC 5280 Section 6.1].
///
/// For each name form, an empty vector with the corresponding `_null` flag unset indicates nothing
/// has been set (i.e., no excluded names and infinite permitted names). A set `_null` flag indicates
/// an intersection operation resulted in the empty set, i.e., no names of that form are permitted.
///
/// [RFC 5280 Section 6.1]: <https://datatracker.ietf.org/doc/html/rfc5280#section-6.1>
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct NameConstraintsSet {
    /// rfc822_name governs use of email addresses in SANs and subject names
    pub rfc822_name: Vec<GeneralSubtree>,
    /// rfc822_name_null is initialized to false and set to true if an intersection operation yields empty set
    pub rfc822_name_null: bool,
    /// dns_name governs use of DNS names in SANs
    pub dns_name: Vec<GeneralSubtree>,
    /// dns_name_null is initialized to false and set to true if an intersection operation yields empty set
    pub dns_name_null: bool,
    /// directory_name governs use of DNs in SANs and subject fields
    pub directory_name: Vec<GeneralSubtree>,
    /// directory_name_null is initialized to false and set to true if an intersection operation yields empty set
    pub directory_name_null: bool,
    /// uniform_resource_identifier governs use of URIs in SANs
    pub uniform_resource_identifier: Vec<GeneralSubtree>,
    /// uniform_resource_identifier_null is initialized to false and set to true if an intersection operation yields empty set
    pub uniform_resource_identifier_null: bool,
    /// ip_address governs use of IP addresses in SANs
    pub ip_address: Vec<GeneralSubtree>,
    /// ip_address_null is initialized to false and set to true if an intersection operation yields empty set
    pub ip_address_null: bool,
}

impl NameConstraintsSet {
    fn bucket(&self, form: NameForm) -> (&Vec<GeneralSubtree>, bool) {
        match form {
            NameForm::DirectoryName => (&self.directory_name, self.directory_name_null),
            NameForm::Rfc822Name => (&self.rfc822_name, self.rfc822_name_null),
            NameForm::DnsName => (&self.dns_name, self.dns_name_null),
            NameForm::UniformResourceIdentifier => (
                &self.uniform_resource_identifier,
                self.uniform_resource_identifier_null,
            ),
            NameForm::IpAddress => (&self.ip_address, self.ip_address_null),
        }
    }

    fn bucket_mut(&mut self, form: NameForm) -> (&mut Vec<GeneralSubtree>, &mut bool) {
        match form {
            NameForm::DirectoryName => (&mut self.directory_name, &mut self.directory_name_null),
            NameForm::Rfc822Name => (&mut self.rfc822_name, &mut self.rfc822_name_null),
            NameForm::DnsName => (&mut self.dns_name, &mut self.dns_name_null),
            NameForm::UniformResourceIdentifier => (
                &mut self.uniform_resource_identifier,
                &mut self.uniform_resource_identifier_null,
            ),
            NameForm::IpAddress => (&mut self.ip_address, &mut self.ip_address_null),
        }
    }

    /// `is_restricted` returns true if a form's bucket either holds subtrees or has been reduced to
    /// the empty set.
    fn is_restricted(&self, form: NameForm) -> bool {
        let (subtrees, null) = self.bucket(form);
        null || !subtrees.is_empty()
    }

    /// `are_any_empty` returns true if any of the name constraints buckets have been reduced to the
    /// empty set.
    pub fn are_any_empty(&self) -> bool {
        NAME_FORMS.iter().any(|f| self.bucket(*f).1)
    }

    /// `subtrees` returns all subtrees held by the set, regardless of form.
    pub fn subtrees(&self) -> Vec<&GeneralSubtree> {
        NAME_FORMS
            .iter()
            .flat_map(|f| self.bucket(*f).0.iter())
            .collect()
    }

    /// `contains` returns true if name falls within at least one subtree of its form held by the set.
    pub fn contains(&self, name: &GeneralName) -> bool {
        let form = match form_of(name) {
            Some(f) => f,
            None => return false,
        };
        let (subtrees, _) = self.bucket(form);
        if form == NameForm::UniformResourceIdentifier && !subtrees.is_empty() {
            if let GeneralName::UniformResourceIdentifier(uri) = name {
                if host_from_uri(uri.to_string().as_str()).is_none() {
                    // no host to compare, so treat the URI as matching
                    return true;
                }
            }
        }
        subtrees.iter().any(|s| name_within_subtree(&s.base, name))
    }

    /// `permits` returns true if the set, treated as permitted subtrees, allows name. Names of forms
    /// that are not constrained are always permitted.
    pub fn permits(&self, name: &GeneralName) -> bool {
        let form = match form_of(name) {
            Some(f) => f,
            None => return true,
        };
        let (subtrees, null) = self.bucket(form);
        if null {
            return false;
        }
        if subtrees.is_empty() {
            return true;
        }
        subtrees.iter().any(|s| name_within_subtree(&s.base, name))
    }

    /// `intersect` calculates the intersection of self and new_subtrees and returns the result.
    ///
    /// Only forms present in new_subtrees are affected. For each such form, an unrestricted bucket adopts
    /// the new subtrees. Otherwise the result holds each existing subtree that falls within some new
    /// subtree plus each new subtree that falls within some existing subtree. An empty result marks
    /// the form as null.
    pub fn intersect(&self, new_subtrees: &GeneralSubtrees) -> NameConstraintsSet {
        let mut retval = self.clone();
        for form in NAME_FORMS {
            let new_names: Vec<&GeneralSubtree> = new_subtrees
                .iter()
                .filter(|s| form_of(&s.base) == Some(form))
                .collect();
            if new_names.is_empty() {
                continue;
            }

            let (prev_names, prev_null) = self.bucket(form);
            if prev_null {
                // nothing to intersect (state has become NULL)
                continue;
            }

            let mut new_set: Vec<GeneralSubtree> = Vec::new();
            if prev_names.is_empty() {
                for n in new_names {
                    if !new_set.contains(n) {
                        new_set.push(n.clone());
                    }
                }
            } else {
                for prev_name in prev_names {
                    if new_names
                        .iter()
                        .any(|n| subtree_within_subtree(&n.base, &prev_name.base))
                        && !new_set.contains(prev_name)
                    {
                        new_set.push(prev_name.clone());
                    }
                }
                for new_name in &new_names {
                    if prev_names
                        .iter()
                        .any(|p| subtree_within_subtree(&p.base, &new_name.base))
                        && !new_set.contains(*new_name)
                    {
                        new_set.push((*new_name).clone());
                    }
                }
            }

            let (bucket, null) = retval.bucket_mut(form);
            if new_set.is_empty() {
                debug!("Intersection of permitted subtrees yielded the empty set for {:?}", form);
                bucket.clear();
                *null = true;
            } else {
                *bucket = new_set;
            }
        }
        retval
    }

    /// `union` calculates the union of self and new_subtrees and returns the result.
    pub fn union(&self, new_subtrees: &GeneralSubtrees) -> NameConstraintsSet {
        let mut retval = self.clone();
        for subtree in new_subtrees {
            if let Some(form) = form_of(&subtree.base) {
                let (bucket, _) = retval.bucket_mut(form);
                if !bucket.contains(subtree) {
                    bucket.push(subtree.clone());
                }
            }
        }
        retval
    }
}

/// [`NameConstraintsState`] pairs the permitted and excluded subtrees accumulated along a
/// certification path. The default value permits all names and excludes none.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct NameConstraintsState {
    /// Permitted subtrees, accumulated via intersection
    pub permitted: NameConstraintsSet,
    /// Excluded subtrees, accumulated via union
    pub excluded: NameConstraintsSet,
}

impl NameConstraintsState {
    /// `new` returns a state that permits all names and excludes none
    pub fn new() -> Self {
        Self::default()
    }

    /// `permits` returns true if name does not fall within any excluded subtree and, where the
    /// permitted subtrees for the name's form are restricted, falls within at least one permitted
    /// subtree.
    pub fn permits(&self, name: &GeneralName) -> bool {
        if form_of(name).is_none() {
            return true;
        }
        if self.excluded.contains(name) {
            debug!("{} is within excluded subtrees", general_name_to_string(name));
            return false;
        }
        if !self.permitted.permits(name) {
            debug!("{} is not within permitted subtrees", general_name_to_string(name));
            return false;
        }
        true
    }

    /// `apply` intersects the permitted subtrees and unions the excluded subtrees from nc with the
    /// current state and returns the new state.
    pub fn apply(&self, nc: &NameConstraints) -> NameConstraintsState {
        let permitted = match &nc.permitted_subtrees {
            Some(p) => self.permitted.intersect(p),
            None => self.permitted.clone(),
        };
        let excluded = match &nc.excluded_subtrees {
            Some(e) => self.excluded.union(e),
            None => self.excluded.clone(),
        };
        NameConstraintsState {
            permitted,
            excluded,
        }
    }

    /// `is_restricted` returns true if any permitted or excluded subtrees have been accumulated.
    pub fn is_restricted(&self) -> bool {
        NAME_FORMS
            .iter()
            .any(|f| self.permitted.is_restricted(*f) || self.excluded.is_restricted(*f))
    }

    /// `permits_subject` checks the subject name (when not empty), any emailAddress attributes in the
    /// subject name and each name in the SAN against the state.
    pub fn permits_subject(&self, subject: &Name, san: Option<&SubjectAltName>) -> bool {
        if !subject.0.is_empty() && !self.permits(&GeneralName::DirectoryName(subject.clone())) {
            return false;
        }

        for email in email_addresses_from_name(subject) {
            if !self.permits(&GeneralName::Rfc822Name(email)) {
                return false;
            }
        }

        if let Some(san) = san {
            for gn in san.0.iter() {
                if !self.permits(gn) {
                    return false;
                }
            }
        }
        true
    }
}

/// `decode_name_constraints` decodes a NameConstraints extension value. Subtrees that use the
/// minimum or maximum fields, which RFC 5280 forbids, yield [`Error::UnsupportedFeature`].
pub fn decode_name_constraints(enc: &[u8]) -> Result<NameConstraints> {
    let nc = NameConstraints::from_der(enc)?;
    let subtrees = nc
        .permitted_subtrees
        .iter()
        .chain(nc.excluded_subtrees.iter())
        .flatten();
    for subtree in subtrees {
        if subtree.minimum != 0 || subtree.maximum.is_some() {
            error!(
                "Unsupported name constraint with minimum {} and maximum {:?} for {}",
                subtree.minimum,
                subtree.maximum,
                general_name_to_string(&subtree.base)
            );
            return Err(Error::UnsupportedFeature);
        }
    }
    Ok(nc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use der::asn1::{Ia5String, OctetString};
    use der::Encode;

    fn subtree(base: GeneralName) -> GeneralSubtree {
        GeneralSubtree {
            base,
            minimum: 0,
            maximum: None,
        }
    }

    fn dns(s: &str) -> GeneralName {
        GeneralName::DnsName(Ia5String::new(s).unwrap())
    }

    fn rfc822(s: &str) -> GeneralName {
        GeneralName::Rfc822Name(Ia5String::new(s).unwrap())
    }

    fn uri(s: &str) -> GeneralName {
        GeneralName::UniformResourceIdentifier(Ia5String::new(s).unwrap())
    }

    fn dn(s: &str) -> GeneralName {
        GeneralName::DirectoryName(Name::from_str(s).unwrap())
    }

    fn ip(b: &[u8]) -> GeneralName {
        GeneralName::IpAddress(OctetString::new(b).unwrap())
    }

    #[test]
    fn unrestricted_state_permits_everything() {
        let state = NameConstraintsState::new();
        assert!(!state.is_restricted());
        assert!(state.permits(&dns("anything.example")));
        assert!(state.permits(&dn("CN=Anyone,C=US")));
        assert!(state.permits(&ip(&[10, 0, 0, 1])));
    }

    #[test]
    fn excluded_dns() {
        let nc = NameConstraints {
            permitted_subtrees: None,
            excluded_subtrees: Some(alloc::vec![subtree(dns("bad.example.com"))]),
        };
        let state = NameConstraintsState::new().apply(&nc);
        assert!(!state.permits(&dns("bad.example.com")));
        assert!(!state.permits(&dns("host.BAD.example.com")));
        assert!(state.permits(&dns("good.example.com")));
        // other forms are unaffected
        assert!(state.permits(&rfc822("joe@bad.example.com")));
    }

    #[test]
    fn permitted_forms() {
        let nc = NameConstraints {
            permitted_subtrees: Some(alloc::vec![
                subtree(dn("O=Example,C=US")),
                subtree(rfc822(".example.com")),
                subtree(uri(".example.com")),
                subtree(ip(&[192, 168, 0, 0, 255, 255, 0, 0])),
            ]),
            excluded_subtrees: None,
        };
        let state = NameConstraintsState::new().apply(&nc);
        assert!(state.permits(&dn("CN=Joe,O=Example,C=US")));
        assert!(!state.permits(&dn("CN=Joe,O=Other,C=US")));
        assert!(state.permits(&rfc822("joe@mail.example.com")));
        assert!(!state.permits(&rfc822("joe@example.com")));
        assert!(state.permits(&uri("https://www.example.com/index.html")));
        assert!(!state.permits(&uri("https://example.com/index.html")));
        assert!(!state.permits(&uri("urn:isbn:0451450523")));
        assert!(state.permits(&ip(&[192, 168, 1, 1])));
        assert!(!state.permits(&ip(&[10, 0, 0, 1])));
        // dNSName was not constrained
        assert!(state.permits(&dns("other.org")));
    }

    #[test]
    fn permits_subject_checks_all_names() {
        let nc = NameConstraints {
            permitted_subtrees: Some(alloc::vec![subtree(dn("O=Example,C=US"))]),
            excluded_subtrees: Some(alloc::vec![subtree(dns("bad.example.com"))]),
        };
        let state = NameConstraintsState::new().apply(&nc);
        let subject = Name::from_str("CN=Joe,O=Example,C=US").unwrap();
        assert!(state.permits_subject(&subject, None));

        let san = SubjectAltName(alloc::vec![dns("www.example.com")]);
        assert!(state.permits_subject(&subject, Some(&san)));
        let san = SubjectAltName(alloc::vec![dns("www.example.com"), dns("bad.example.com")]);
        assert!(!state.permits_subject(&subject, Some(&san)));

        let subject = Name::from_str("CN=Joe,O=Other,C=US").unwrap();
        assert!(!state.permits_subject(&subject, None));

        // empty subject names are not checked
        assert!(state.permits_subject(&Name::default(), None));
    }

    #[test]
    fn intersection_is_two_way() {
        let set = NameConstraintsSet::default()
            .intersect(&alloc::vec![subtree(dns("example.com")), subtree(dns("example.org"))]);
        assert_eq!(2, set.dns_name.len());

        // narrower new subtree is kept, broader previous subtree that is not within a new one is dropped
        let narrowed = set.intersect(&alloc::vec![subtree(dns("www.example.com"))]);
        assert_eq!(alloc::vec![subtree(dns("www.example.com"))], narrowed.dns_name);
        assert!(!narrowed.dns_name_null);

        // broader new subtree keeps the narrower previous subtree
        let kept = narrowed.intersect(&alloc::vec![subtree(dns("example.com"))]);
        assert_eq!(alloc::vec![subtree(dns("www.example.com"))], kept.dns_name);

        // disjoint yields null
        let empty = kept.intersect(&alloc::vec![subtree(dns("example.net"))]);
        assert!(empty.dns_name_null);
        assert!(empty.dns_name.is_empty());
        assert!(empty.are_any_empty());
        assert!(!empty.permits(&dns("www.example.com")));

        // null is sticky
        let still_empty = empty.intersect(&alloc::vec![subtree(dns("www.example.com"))]);
        assert!(still_empty.dns_name_null);

        // the original value is unchanged
        assert_eq!(2, set.dns_name.len());
    }

    #[test]
    fn intersection_narrows_monotonically() {
        let steps: [GeneralSubtrees; 4] = [
            alloc::vec![subtree(dn("C=US")), subtree(dns("example.com"))],
            alloc::vec![subtree(dn("O=Example,C=US")), subtree(dn("O=Other,C=CA"))],
            alloc::vec![subtree(dn("C=US")), subtree(dns(".example.com"))],
            alloc::vec![subtree(dn("OU=Sales,O=Example,C=US")), subtree(dns("a.example.com"))],
        ];

        let mut set = NameConstraintsSet::default();
        for step in steps.iter() {
            let next = set.intersect(step);
            let prior = set.subtrees();
            if !prior.is_empty() {
                for s in next.subtrees() {
                    let form = form_of(&s.base);
                    let prior_of_form: Vec<_> =
                        prior.iter().filter(|p| form_of(&p.base) == form).collect();
                    assert!(
                        prior_of_form.is_empty()
                            || prior_of_form
                                .iter()
                                .any(|p| subtree_within_subtree(&p.base, &s.base)),
                        "{} escaped prior subtrees",
                        general_name_to_string(&s.base)
                    );
                }
            }
            set = next;
        }
        assert_eq!(
            alloc::vec![subtree(dn("OU=Sales,O=Example,C=US"))],
            set.directory_name
        );
        assert_eq!(alloc::vec![subtree(dns("a.example.com"))], set.dns_name);
    }

    #[test]
    fn union_appends() {
        let set = NameConstraintsSet::default()
            .union(&alloc::vec![subtree(dns("a.example.com"))])
            .union(&alloc::vec![subtree(dns("b.example.com")), subtree(dns("a.example.com"))]);
        assert_eq!(2, set.dns_name.len());
        assert!(set.contains(&dns("x.b.example.com")));
        assert!(!set.contains(&dns("c.example.com")));
    }

    #[test]
    fn ip_subtree_containment() {
        let outer = ip(&[10, 0, 0, 0, 255, 0, 0, 0]);
        let inner = ip(&[10, 1, 0, 0, 255, 255, 0, 0]);
        assert!(subtree_within_subtree(&outer, &inner));
        assert!(!subtree_within_subtree(&inner, &outer));
    }

    #[test]
    fn excluded_rfc822_domain() {
        let nc = NameConstraints {
            permitted_subtrees: None,
            excluded_subtrees: Some(alloc::vec![subtree(rfc822("example.com"))]),
        };
        let state = NameConstraintsState::new().apply(&nc);
        assert!(!state.permits(&rfc822("joe@example.com")));
        assert!(!state.permits(&rfc822("joe@mail.example.com")));
        assert!(state.permits(&rfc822("joe@example.org")));

        let nc = NameConstraints {
            permitted_subtrees: Some(alloc::vec![subtree(rfc822("example.com"))]),
            excluded_subtrees: None,
        };
        let state = NameConstraintsState::new().apply(&nc);
        assert!(state.permits(&rfc822("joe@mail.example.com")));
        assert!(!state.permits(&rfc822("joe@badexample.com")));
    }

    #[test]
    fn rfc822_subtree_containment() {
        assert!(subtree_within_subtree(&rfc822("example.com"), &rfc822("joe@example.com")));
        assert!(subtree_within_subtree(&rfc822("example.com"), &rfc822("EXAMPLE.com")));
        assert!(subtree_within_subtree(&rfc822("example.com"), &rfc822(".example.com")));
        assert!(subtree_within_subtree(&rfc822("example.com"), &rfc822("mail.example.com")));
        assert!(!subtree_within_subtree(&rfc822(".example.com"), &rfc822("example.com")));
        assert!(subtree_within_subtree(&rfc822(".example.com"), &rfc822("mail.example.com")));
        assert!(!subtree_within_subtree(&rfc822("joe@example.com"), &rfc822("example.com")));
    }

    #[test]
    fn decode_rejects_minimum_and_maximum() {
        let nc = NameConstraints {
            permitted_subtrees: Some(alloc::vec![subtree(dns("example.com"))]),
            excluded_subtrees: None,
        };
        let enc = nc.to_der().unwrap();
        assert_eq!(nc, decode_name_constraints(&enc).unwrap());

        let nc = NameConstraints {
            permitted_subtrees: Some(alloc::vec![GeneralSubtree {
                base: dns("example.com"),
                minimum: 0,
                maximum: Some(2),
            }]),
            excluded_subtrees: None,
        };
        let enc = nc.to_der().unwrap();
        assert_eq!(Err(Error::UnsupportedFeature), decode_name_constraints(&enc));

        let nc = NameConstraints {
            permitted_subtrees: None,
            excluded_subtrees: Some(alloc::vec![GeneralSubtree {
                base: dns("example.com"),
                minimum: 1,
                maximum: None,
            }]),
        };
        let enc = nc.to_der().unwrap();
        assert_eq!(Err(Error::UnsupportedFeature), decode_name_constraints(&enc));

        assert!(matches!(
            decode_name_constraints(&[0x30, 0x03, 0x02]),
            Err(Error::MalformedEncoding(_))
        ));
    }
}
