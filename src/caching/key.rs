//! Cache key construction.

use crate::forward::ForwardRequest;

/// Build the cache key for a request.
///
/// Method, target and path (without query) always take part. With no key
/// fields the raw query is appended too. Otherwise each field contributes
/// `name=value`, the value taken from the query parameter of that name, else
/// from the header of that name, else empty.
pub fn cache_key(request: &ForwardRequest, key_fields: &[String]) -> String {
    let (path, query) = match request.path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (request.path.as_str(), None),
    };

    let mut key = format!("{} {}{}", request.method, request.target, path);

    if key_fields.is_empty() {
        if let Some(query) = query {
            key.push('?');
            key.push_str(query);
        }
        return key;
    }

    for field in key_fields {
        let value = query
            .and_then(|q| query_param(q, field))
            .or_else(|| {
                request
                    .headers
                    .get(field.as_str())
                    .and_then(|v| v.to_str().ok())
            })
            .unwrap_or_default();
        key.push('|');
        key.push_str(field);
        key.push('=');
        key.push_str(value);
    }
    key
}

/// First value of `name` in a raw query string, compared undecoded.
fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (k == name).then_some(v)
    })
}
