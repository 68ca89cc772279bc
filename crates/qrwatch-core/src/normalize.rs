//! URL canonicalisation for tamper comparison.
//!
//! Two URL strings that differ only cosmetically (scheme, case, a leading
//! `www.`, a trailing slash, query-parameter order, a fragment) should not be
//! flagged as tampering. [`normalize`] collapses those differences into a
//! single comparison key.

use url::Url;

/// Canonicalise `input` into a comparison key.
///
/// Total function: on any parse failure it degrades to a lexical strip of the
/// same cosmetic prefixes/suffixes rather than propagating an error.
/// Idempotent — `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
  let trimmed = input.trim();

  let with_scheme = if has_http_scheme(trimmed) {
    trimmed.to_owned()
  } else {
    format!("https://{trimmed}")
  };

  structured_key(&with_scheme).unwrap_or_else(|| lexical_key(trimmed))
}

fn has_http_scheme(s: &str) -> bool {
  let lower = s.to_ascii_lowercase();
  lower.starts_with("http://") || lower.starts_with("https://")
}

/// The happy path: parse, then rebuild `host + path + sorted query` with no
/// scheme and no fragment.
fn structured_key(s: &str) -> Option<String> {
  let parsed = Url::parse(s).ok()?;
  let host = parsed.host_str()?.to_ascii_lowercase();
  let host = host.strip_prefix("www.").unwrap_or(&host);

  let mut path = parsed.path().to_ascii_lowercase();
  // One trailing slash is cosmetic; the bare root path is not.
  if path.len() > 1 && path.ends_with('/') {
    path.pop();
  }

  let mut key = format!("{host}{path}");

  let mut pairs: Vec<(String, String)> = parsed
    .query_pairs()
    .map(|(k, v)| (k.into_owned(), v.into_owned()))
    .collect();
  if !pairs.is_empty() {
    // Sort on (key, value) so duplicate keys still order deterministically.
    pairs.sort();
    let query = url::form_urlencoded::Serializer::new(String::new())
      .extend_pairs(pairs)
      .finish();
    key.push('?');
    key.push_str(&query);
  }

  Some(key)
}

/// Fallback for inputs the parser rejects (bad hosts, embedded whitespace,
/// empty strings): strip the same cosmetic affixes lexically.
fn lexical_key(s: &str) -> String {
  let mut key = s.to_ascii_lowercase();
  for prefix in ["https://", "http://"] {
    if let Some(rest) = key.strip_prefix(prefix) {
      key = rest.to_owned();
      break;
    }
  }
  if let Some(rest) = key.strip_prefix("www.") {
    key = rest.to_owned();
  }
  if key.len() > 1 && key.ends_with('/') {
    key.pop();
  }
  key
}

#[cfg(test)]
mod tests {
  use super::normalize;

  #[test]
  fn scheme_case_www_and_trailing_slash_collapse() {
    assert_eq!(normalize("HTTPS://WWW.Example.com/Path/"), "example.com/path");
    assert_eq!(normalize("example.com/path"), "example.com/path");
    assert_eq!(
      normalize("http://example.com/path"),
      normalize("https://www.example.com/path/"),
    );
  }

  #[test]
  fn query_order_is_irrelevant() {
    assert_eq!(
      normalize("example.com?b=2&a=1"),
      normalize("example.com?a=1&b=2"),
    );
  }

  #[test]
  fn fragment_is_discarded() {
    assert_eq!(
      normalize("https://example.com/page#section-3"),
      normalize("https://example.com/page"),
    );
  }

  #[test]
  fn root_path_is_preserved() {
    assert_eq!(normalize("https://example.com/"), "example.com/");
    assert_eq!(normalize("example.com"), "example.com/");
  }

  #[test]
  fn duplicate_query_keys_sort_deterministically() {
    assert_eq!(
      normalize("example.com/x?k=b&k=a"),
      normalize("example.com/x?k=a&k=b"),
    );
  }

  #[test]
  fn unparseable_input_uses_lexical_fallback() {
    assert_eq!(normalize("https://exa mple.com/Foo/"), "exa mple.com/foo");
    assert_eq!(normalize(""), "");
  }

  #[test]
  fn idempotent() {
    for input in [
      "HTTPS://WWW.Example.com/Path/",
      "example.com?b=2&a=1",
      "https://example.com/page#frag",
      "example.com",
      "https://exa mple.com/Foo/",
      "http://bank.example.com:8443/pay?x=1",
      "",
    ] {
      let once = normalize(input);
      assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
    }
  }
}
