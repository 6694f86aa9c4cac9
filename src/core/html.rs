// src/core/html.rs
// Tolerant HTML slicing. Case-insensitive; lowercasing is ASCII-only so byte
// offsets in the lowered copy are valid in the original.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Text between the end of the first `open_pat` tag and the following `close_pat`.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);
    let o = lc.find(&open)?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&close)?;
    Some(&s[after..after + cr])
}

/// The first element starting with `open_pat`, through its matching close
/// tag. Nested elements of the same `tag` are counted, so
/// `<div a><div></div></div>` comes back whole.
pub fn element_block_ci<'a>(s: &'a str, open_pat: &str, tag: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let start = lc.find(&to_lower(open_pat))?;
    let open_tag = format!("<{}", to_lower(tag));
    let close_tag = format!("</{}", to_lower(tag));

    let mut depth = 0usize;
    let mut i = start;
    loop {
        let next_open = lc[i..].find(&open_tag).map(|p| p + i);
        let next_close = lc[i..].find(&close_tag).map(|p| p + i)?;
        match next_open {
            Some(o) if o < next_close && is_tag_boundary(&lc, o + open_tag.len()) => {
                depth += 1;
                i = o + open_tag.len();
            }
            Some(o) if o < next_close => i = o + open_tag.len(),
            _ => {
                depth = depth.saturating_sub(1);
                let end = lc[next_close..].find('>')? + next_close + 1;
                if depth == 0 {
                    return Some(&s[start..end]);
                }
                i = end;
            }
        }
    }
}

// `<div` must not match `<divider`.
fn is_tag_boundary(lc: &str, at: usize) -> bool {
    lc[at..]
        .chars()
        .next()
        .is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
}

/// Values of `attr` on every `<tag ...>` in `s`, in document order.
/// Quoted (single or double) and bare values are accepted.
pub fn attr_values(s: &str, tag: &str, attr: &str) -> Vec<String> {
    let lc = to_lower(s);
    let open_tag = format!("<{}", to_lower(tag));
    let attr = to_lower(attr);
    let mut out = Vec::new();
    let mut from = 0;

    while let Some(rel) = lc[from..].find(&open_tag) {
        let start = from + rel + open_tag.len();
        let Some(end_rel) = lc[start..].find('>') else { break };
        let end = start + end_rel;
        if is_tag_boundary(&lc, start) {
            if let Some(v) = attr_in_tag(&s[start..end], &lc[start..end], &attr) {
                out.push(v);
            }
        }
        from = end + 1;
    }
    out
}

fn attr_in_tag(raw: &str, lc: &str, attr: &str) -> Option<String> {
    let mut search = 0;
    while let Some(rel) = lc[search..].find(attr) {
        let at = search + rel;
        search = at + attr.len();
        let preceded_ok = lc[..at].chars().last().is_none_or(|c| c.is_ascii_whitespace());
        let rest = lc[search..].trim_start();
        if !preceded_ok || !rest.starts_with('=') {
            continue;
        }
        let value_start = lc.len() - rest.len() + 1;
        let value = raw[value_start..].trim_start();
        return Some(match value.chars().next()? {
            q @ ('"' | '\'') => {
                let body = &value[1..];
                body[..body.find(q).unwrap_or(body.len())].to_string()
            }
            _ => value.split_ascii_whitespace().next().unwrap_or("").to_string(),
        });
    }
    None
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}
