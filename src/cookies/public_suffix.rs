//! Public suffix lookups.
//!
//! The jar never decides by itself where a registrable domain starts. It asks a
//! [`PublicSuffixList`] implementation, which is part of the jar configuration
//! and shared (behind an `Arc`) by every store the jar creates.
use std::fmt::Debug;
use std::sync::Arc;

/// A handle to a public suffix list shared by all stores of a jar.
pub type PublicSuffixListHandle = Arc<dyn PublicSuffixList>;

/// Classifies domains by their public suffix (e.g. `com`, `co.uk`).
pub trait PublicSuffixList: Debug + Send + Sync {
    /// Returns the public suffix of `domain`.
    ///
    /// `domain` is a canonical host: lower-case, ASCII, no trailing dot.
    fn public_suffix(&self, domain: &str) -> String;

    /// Describes the list (source, version). Used in log output only.
    fn describe(&self) -> String;

    /// Returns the registrable domain of `domain`: its public suffix plus one
    /// more label. Returns `domain` itself when it has no label left of the
    /// suffix, or when it is an IP literal.
    fn registrable_domain(&self, domain: &str) -> String {
        if domain.parse::<std::net::IpAddr>().is_ok() {
            return domain.to_string();
        }

        let suffix = self.public_suffix(domain);
        if suffix.len() >= domain.len() {
            return domain.to_string();
        }

        // Strip "<suffix>" plus the dot before it, keep the last remaining label.
        let head = &domain[..domain.len() - suffix.len()];
        let head = head.strip_suffix('.').unwrap_or(head);
        match head.rsplit_once('.') {
            Some((_, label)) => format!("{label}.{suffix}"),
            None => domain.to_string(),
        }
    }
}

/// Treats the last label of a domain as its public suffix.
///
/// Good enough for tests and for jars that never compare registrable domains of
/// multi-label suffixes like `co.uk`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastLabelSuffixList;

impl PublicSuffixList for LastLabelSuffixList {
    fn public_suffix(&self, domain: &str) -> String {
        domain.rsplit('.').next().unwrap_or(domain).to_string()
    }

    fn describe(&self) -> String {
        "last-label".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct CoUkList;

    impl PublicSuffixList for CoUkList {
        fn public_suffix(&self, domain: &str) -> String {
            if domain.ends_with(".co.uk") {
                "co.uk".to_string()
            } else {
                LastLabelSuffixList.public_suffix(domain)
            }
        }

        fn describe(&self) -> String {
            "co.uk".to_string()
        }
    }

    #[test]
    fn last_label_suffix() {
        let psl = LastLabelSuffixList;
        assert_eq!(psl.public_suffix("www.example.com"), "com");
        assert_eq!(psl.public_suffix("localhost"), "localhost");
    }

    #[test]
    fn registrable_domain_keeps_one_label_left_of_suffix() {
        assert_eq!(LastLabelSuffixList.registrable_domain("a.b.example.com"), "example.com");
        assert_eq!(CoUkList.registrable_domain("www.bbc.co.uk"), "bbc.co.uk");
    }

    #[test]
    fn registrable_domain_of_suffix_or_ip_is_itself() {
        assert_eq!(CoUkList.registrable_domain("co.uk"), "co.uk");
        assert_eq!(LastLabelSuffixList.registrable_domain("com"), "com");
        assert_eq!(LastLabelSuffixList.registrable_domain("127.0.0.1"), "127.0.0.1");
    }
}
