use std::borrow::Cow;

/// Rewrite a peptidoform from dotted parenthesis notation into bracket notation.
///
/// Search engine exports often write `.(Acetyl)PEM(Oxidation)K.(Amidated)`;
/// this yields `[Acetyl]-PEM[Oxidation]K-[Amidated]`. Nested parentheses in a
/// modification name (`K(Label:13C(6))`) are kept inside one marker. Input that
/// is already in bracket notation is returned borrowed and unchanged.
pub fn to_bracket_notation(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['(', '.']) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 2);
    let mut rest = raw.strip_prefix('.').unwrap_or(raw);
    let mut seen_residue = false;
    let mut n_term_marker = false;

    while let Some(c) = rest.chars().next() {
        match c {
            '(' => match closing_paren(rest) {
                Some(close) => {
                    out.push('[');
                    out.push_str(&rest[1..close]);
                    out.push(']');
                    n_term_marker |= !seen_residue;
                    rest = &rest[close + 1..];
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            },
            // Only the flanking dot after the last residue is dropped
            '.' if seen_residue && (rest.len() == 1 || rest[1..].starts_with('(')) => {
                rest = &rest[1..];
                if rest.starts_with('(') {
                    out.push('-');
                }
            }
            _ => {
                if !seen_residue && n_term_marker {
                    out.push('-');
                }
                seen_residue = true;
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    Cow::Owned(out)
}

/// Byte offset of the parenthesis closing the one that opens `text`
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
