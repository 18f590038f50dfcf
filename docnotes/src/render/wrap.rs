/// Greedily wraps `text` into lines of at most `width` characters.
///
/// Line breaks in `text` are kept. Words longer than `width` are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            for chunk in chunks(word, width) {
                let chunk_len = chunk.chars().count();
                if line_len > 0 && line_len + 1 + chunk_len > width {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                if line_len > 0 {
                    line.push(' ');
                    line_len += 1;
                }
                line.push_str(chunk);
                line_len += chunk_len;
            }
        }

        lines.push(line);
    }

    lines
}

/// Splits `word` into pieces of at most `width` characters.
fn chunks(word: &str, width: usize) -> impl Iterator<Item = &str> {
    let mut rest = word;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(width)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
