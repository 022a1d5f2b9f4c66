//! Page-number plumbing for paginated regions: reading the current page out of
//! `location.search`, pulling the target page out of a pagination link, and
//! building the query string for a page.
//!
//! Pages are 1-based. Anything unreadable falls back to page 1.

/// Parse URL-encoded `key=value&key2=value2` pairs.
pub fn parse_pairs(input: &str) -> Vec<(String, String)> {
    if input.is_empty() {
        return Vec::new();
    }
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. Escapes are decoded to bytes first so
/// multi-byte UTF-8 (`%C3%A9`) comes out whole; malformed escapes are kept
/// as written.
pub fn percent_decode(input: &str) -> String {
    let raw = input.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => match raw.get(i + 1..i + 3).and_then(hex_byte) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    if !pair.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(digits, 16).ok()
}

/// Parse a query string (with or without the leading `?`) into pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_pairs(q)
}

/// First value for `key`, if any.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Read a page number the way browsers read `parseInt`: leading digits only.
/// Empty, non-numeric, zero or overflowing values give page 1.
pub fn parse_page(raw: &str) -> u32 {
    let digits: &str = {
        let trimmed = raw.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => 1,
        Ok(page) => page,
    }
}

/// Current page from a `location.search` string.
pub fn resolve_current_page(search: &str, param: &str) -> u32 {
    let params = parse_query(search);
    get_param(&params, param).map(parse_page).unwrap_or(1)
}

/// Target page encoded in a pagination link's `href`.
///
/// Accepts absolute URLs, relative paths and bare `?page=N` links; the page
/// parameter is matched by exact key so `per_page=3` is never mistaken for it.
pub fn page_from_href(href: &str, param: &str) -> u32 {
    let without_fragment = href.split('#').next().unwrap_or("");
    match without_fragment.split_once('?') {
        Some((_, query)) => resolve_current_page(query, param),
        None => 1,
    }
}

/// Query string (leading `?` included) selecting `page`.
pub fn page_query(param: &str, page: u32) -> String {
    format!("?{}={}", param, page)
}
