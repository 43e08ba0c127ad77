use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker appended to titles cut short by [`fit_to_width`].
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Cleans a title taken from a remote document so it is safe to print.
///
/// Feed titles come from arbitrary servers and may embed terminal escape
/// sequences or line breaks. This removes ANSI CSI/OSC sequences and every
/// other control character, folds whitespace runs (including newlines and
/// tabs) into single spaces, and trims both ends.
///
/// # Examples
///
/// ```
/// use feedscout::util::sanitize_title;
///
/// assert_eq!(sanitize_title("  My\n\tBlog  "), "My Blog");
/// assert_eq!(sanitize_title("\x1b[31mRed\x1b[0m Feed"), "Red Feed");
/// ```
pub fn sanitize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                // CSI: parameters until a final byte in 0x40..=0x7e
                Some('[') => {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
                // OSC: until BEL or ST
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if c.is_control() {
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// Returns the terminal column width of `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pads or truncates `s` so it occupies exactly `width` terminal columns.
///
/// Wide characters (CJK, emoji) count as two columns. Truncated text ends
/// with `...` when there is room for it.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current <= width {
        let mut out = String::with_capacity(s.len() + (width - current));
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - current));
        return out;
    }

    let budget = if width > ELLIPSIS_WIDTH {
        width - ELLIPSIS_WIDTH
    } else {
        width
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
        used += ELLIPSIS_WIDTH;
    }
    // A wide char that did not fit leaves a one-column gap
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}
