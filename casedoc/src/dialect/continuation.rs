//! Backslash line continuation shared by the line-oriented dialects

/// Join lines ending in `\` with the following line, one space between the
/// trimmed halves. `clean` normalizes each physical line first.
pub(crate) fn join_continuations<'a, I, F>(lines: I, clean: F) -> String
where
    I: Iterator<Item = &'a str>,
    F: Fn(&'a str) -> &'a str,
{
    let mut lines = lines;
    let mut joined = Vec::new();

    while let Some(raw) = lines.next() {
        let mut line = clean(raw).to_string();
        while line.ends_with('\\') {
            let head = line.trim_end_matches('\\').trim_end().to_string();
            let tail = lines.next().map(&clean).unwrap_or_default();
            line = format!("{} {}", head, tail);
        }
        joined.push(line);
    }

    joined.join("\n")
}
