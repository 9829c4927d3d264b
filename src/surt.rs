//! Sort-friendly URI Reordering Transform used for CDX url keys.
//!
//! `https://www.example.com/a/b?x=1` becomes `com,example,www)/a/b?x=1`:
//! host labels reversed and comma-joined so same-site URLs group together
//! under lexicographic sort, which is the CDX file's required order.

use url::Url;

/// Canonicalize a URL into its SURT key.
///
/// Unparseable input (or input without a host) degrades to the raw string:
/// a bad URL never aborts the archive, its index row just sorts under its
/// literal text.
#[must_use]
pub fn to_surt(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };

    let mut labels: Vec<&str> = host.split('.').collect();
    labels.reverse();

    let mut key = labels.join(",");
    key.push(')');
    key.push_str(parsed.path());
    if let Some(query) = parsed.query() {
        key.push('?');
        key.push_str(query);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_host_labels() {
        assert_eq!(
            to_surt("https://www.example.com/a/b?x=1"),
            "com,example,www)/a/b?x=1"
        );
    }

    #[test]
    fn bare_domain_keeps_root_path() {
        assert_eq!(to_surt("http://a.com/"), "com,a)/");
    }

    #[test]
    fn host_is_lowercased() {
        assert_eq!(to_surt("http://Example.COM/Path"), "com,example)/Path");
    }

    #[test]
    fn unparseable_url_falls_back_to_raw() {
        assert_eq!(to_surt("not a url"), "not a url");
    }

    #[test]
    fn hostless_scheme_falls_back_to_raw() {
        let raw = "data:text/plain,hello";
        assert_eq!(to_surt(raw), raw);
    }
}
