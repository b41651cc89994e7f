use bolero::check;
use mailflow::reflow::reflow_paragraph;

fn main() {
    check!().for_each(|data: &[u8]| {
        let Some((&width, rest)) = data.split_first() else {
            return;
        };
        let Ok(text) = std::str::from_utf8(rest) else {
            return;
        };
        let width = usize::from(width).max(1);

        let once = reflow_paragraph(text, 1, width, true);
        let words: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(once.split_whitespace().collect::<Vec<_>>(), words);
        assert_eq!(reflow_paragraph(&once, 1, width, true), once);
    });
}
