use std::borrow::Cow;

// Longest entity we recognise, "&#x10FFFF;", is 10 bytes
const MAX_ENTITY_LEN: usize = 10;

/// Decode the HTML entities a narrative service is known to emit:
/// `&quot; &amp; &lt; &gt; &apos; &nbsp;` and numeric `&#NN;` / `&#xHH;`.
/// Unknown or unterminated entities are left as-is.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .char_indices()
            .take_while(|(i, _)| *i <= MAX_ENTITY_LEN)
            .find(|(_, c)| *c == ';')
            .and_then(|(end, _)| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
