use chrono::{DateTime, NaiveDateTime, Utc};

/// Content lines longer than this many octets are folded (RFC 5545 3.1)
const MAX_LINE_OCTETS: usize = 75;

pub(super) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

pub(super) fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub(super) fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Append one content line, folded and CRLF-terminated.
pub(super) fn push_line(buffer: &mut String, line: &str) {
    let mut octets = 0usize;
    for c in line.chars() {
        let width = c.len_utf8();
        if octets + width > MAX_LINE_OCTETS {
            buffer.push_str("\r\n ");
            // continuation lines start with the folding space
            octets = 1;
        }
        buffer.push(c);
        octets += width;
    }
    buffer.push_str("\r\n");
}
