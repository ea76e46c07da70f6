//! Source text rewrites done before parsing.

/// Expand tabs to spaces using tab stops every `width` columns.
pub(crate) fn expand_tabs(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let spaces = width - column % width;
                out.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Split a leading `%` title block from the document.
///
/// Returns the title text (one line per `%` line, marker and a single
/// following space removed) and the remaining markdown. Indented lines
/// after a `%` line continue it.
pub(crate) fn split_title_block(text: &str) -> (Option<String>, &str) {
    if !text.starts_with('%') {
        return (None, text);
    }

    let mut lines: Vec<String> = Vec::new();
    let mut consumed = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if let Some(content) = trimmed.strip_prefix('%') {
            lines.push(content.strip_prefix(' ').unwrap_or(content).to_owned());
        } else if trimmed.starts_with([' ', '\t'])
            && !trimmed.trim().is_empty()
            && let Some(last) = lines.last_mut()
        {
            last.push(' ');
            last.push_str(trimmed.trim());
        } else {
            break;
        }
        consumed += line.len();
    }

    (Some(lines.join("\n")), &text[consumed..])
}
