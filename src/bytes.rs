use memchr::memmem;

/// Separator between the fields of a rule-table line
pub const FIELD_DELIMITER: &[u8] = b"|||";

// Divide a rule-table line into its `|||`-separated fields
#[inline]
pub fn split_fields(line: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::new();
    let mut start = 0;
    for pos in memmem::find_iter(line, FIELD_DELIMITER) {
        fields.push(&line[start..pos]);
        start = pos + FIELD_DELIMITER.len();
    }
    fields.push(&line[start..]);
    fields
}

// Drop a trailing "\n" or "\r\n"
#[inline]
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== split_fields Tests =====

    #[test]
    fn test_split_fields() {
        // Typical rule line
        let fields = split_fields(b"x0:NP \"dog\" @ NP ||| x0 \"chien\" ||| 0.5 ||| 1 2 3");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], b"x0:NP \"dog\" @ NP " as &[u8]);
        assert_eq!(fields[3], b" 1 2 3" as &[u8]);

        // No delimiter found
        assert_eq!(split_fields(b"nodelimiter"), vec![b"nodelimiter" as &[u8]]);
        assert_eq!(split_fields(b""), vec![b"" as &[u8]]);

        // Delimiter at boundaries
        assert_eq!(
            split_fields(b"|||value|||"),
            vec![b"" as &[u8], b"value" as &[u8], b"" as &[u8]]
        );
    }

    #[test]
    fn test_split_fields_pipes_in_terminal() {
        // A single or double pipe is not a delimiter
        let fields = split_fields(b"\"|\" ||| \"||\"");
        assert_eq!(fields, vec![b"\"|\" " as &[u8], b" \"||\"" as &[u8]]);
    }

    // ===== trim_line_end Tests =====

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"abc\n"), b"abc");
        assert_eq!(trim_line_end(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
        assert_eq!(trim_line_end(b"\n"), b"");
        assert_eq!(trim_line_end(b"abc\n\n"), b"abc\n");
    }
}
