use std::borrow::Cow;

/// Makes an untrusted string safe to print as a single output line.
///
/// Removes ANSI escape sequences (CSI `ESC [ ... final` and OSC `ESC ] ... BEL|ST`)
/// and every other control character, including tabs and line breaks, so one
/// discovered URL can never spill over several lines or repaint the terminal.
///
/// Returns `Cow::Borrowed` when nothing needs removing.
///
/// # Examples
///
/// ```
/// use feedscout::util::printable_line;
///
/// assert_eq!(printable_line("https://example.com/feed"), "https://example.com/feed");
/// assert_eq!(printable_line("https://e.com/\x1b[31mfeed\n"), "https://e.com/feed");
/// ```
pub fn printable_line(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !c.is_control() {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameter and intermediate bytes run until a final byte in 0x40..=0x7e
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}
