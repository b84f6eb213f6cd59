//! RFC 3986 percent-encoding with passthrough of pre-encoded triples.

/// Signature shared by the two encoders so the operator table can hold
/// one as a plain field.
pub type PushAllow = fn(&mut String, &str);

pub fn push_unreserved(dst: &mut String, src: &str) {
    pct_encode(is_unreserved, dst, src);
}

pub fn push_unreserved_reserved(dst: &mut String, src: &str) {
    pct_encode(is_unreserved_reserved, dst, src);
}

pub fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

pub fn is_unreserved_reserved(c: char) -> bool {
    is_unreserved(c) || is_gen_delims(c) || is_sub_delims(c)
}

fn is_gen_delims(c: char) -> bool {
    matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

fn is_sub_delims(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

type IsAllowed = fn(char) -> bool;

/// Lookahead over a candidate `%HH` triple. A `%` is withheld until the
/// next two characters are known: both hex digits means the source was
/// already percent-encoded and the triple is copied through untouched,
/// anything else turns the withheld `%` into `%25` and releases the rest
/// to the ordinary per-character rule.
enum Window {
    Empty,
    Percent,
    PercentHex(char),
}

impl Window {
    fn step(self, is_allowed: IsAllowed, dst: &mut String, c: char) -> Self {
        match self {
            Window::Percent if c.is_ascii_hexdigit() => Window::PercentHex(c),
            Window::PercentHex(h) if c.is_ascii_hexdigit() => {
                dst.push('%');
                dst.push(h);
                dst.push(c);
                Window::Empty
            }
            _ => {
                self.flush(is_allowed, dst);
                if c == '%' {
                    Window::Percent
                } else {
                    push_char(is_allowed, dst, c);
                    Window::Empty
                }
            }
        }
    }

    /// Drains a partial window, e.g. at end of input or when the third
    /// character breaks the triple.
    fn flush(&self, is_allowed: IsAllowed, dst: &mut String) {
        match self {
            Window::Empty => {}
            Window::Percent => dst.push_str("%25"),
            Window::PercentHex(h) => {
                dst.push_str("%25");
                push_char(is_allowed, dst, *h);
            }
        }
    }
}

fn pct_encode(is_allowed: IsAllowed, dst: &mut String, src: &str) {
    let mut window = Window::Empty;
    for c in src.chars() {
        window = window.step(is_allowed, dst, c);
    }
    window.flush(is_allowed, dst);
}

fn push_char(is_allowed: IsAllowed, dst: &mut String, c: char) {
    if is_allowed(c) {
        dst.push(c);
    } else {
        let mut buf = [0; 4];
        for b in c.encode_utf8(&mut buf).bytes() {
            push_pct_octet(dst, b);
        }
    }
}

const HEX_DIGITS: &[u8] = b"0123456789ABCDEF";

fn push_pct_octet(dst: &mut String, b: u8) {
    dst.push('%');
    dst.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
    dst.push(char::from(HEX_DIGITS[usize::from(b & 0xF)]));
}
