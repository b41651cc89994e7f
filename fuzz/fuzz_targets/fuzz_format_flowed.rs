use bolero::check;
use format_flowed::{flow, quote_prefix, unformat_flowed, SIGNATURE_DELIMITER};

fn main() {
    check!().for_each(|data: &[u8]| {
        let Some((&width, rest)) = data.split_first() else {
            return;
        };
        let Ok(line) = std::str::from_utf8(rest) else {
            return;
        };
        if line.contains(['\n', '\r']) {
            return;
        }
        let width = usize::from(width).max(1);

        let (_, prefix_len) = quote_prefix(line);
        let expected = if line.get(prefix_len..) == Some(SIGNATURE_DELIMITER) {
            line
        } else {
            line.trim_end_matches(' ')
        };

        let flowed = flow(line, width, true).join("\n");
        assert_eq!(unformat_flowed(&flowed, true), expected);
    });
}
