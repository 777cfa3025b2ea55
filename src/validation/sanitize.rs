/// Elements whose content is dropped together with the tags.
const NON_TEXT_TAGS: [&str; 5] = ["script", "style", "textarea", "option", "noscript"];

/// Strip all markup, leaving plain text.
///
/// Tags, attributes, comments and declarations are removed; a `<` that does not
/// open markup (`a < b`) is kept. Text is not entity-escaped since it only ever
/// ends up in plain-text mail.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match scan_markup(tail) {
            Some(markup) => {
                rest = &tail[markup.len..];
                if let Some(name) = markup.opening_tag
                    && NON_TEXT_TAGS.contains(&name.as_str())
                {
                    rest = skip_past_closing(rest, &name);
                }
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

struct Markup {
    len: usize,
    opening_tag: Option<String>,
}

/// `tail` starts with `<`. Returns `None` when it does not open markup.
fn scan_markup(tail: &str) -> Option<Markup> {
    if tail.starts_with("<!--") {
        let len = tail.find("-->").map(|i| i + 3).unwrap_or(tail.len());
        return Some(Markup {
            len,
            opening_tag: None,
        });
    }

    let first = tail[1..].chars().next()?;
    match first {
        '!' | '?' => Some(Markup {
            len: tag_end(tail),
            opening_tag: None,
        }),
        '/' if tail[2..].starts_with(|c: char| c.is_ascii_alphabetic()) => Some(Markup {
            len: tag_end(tail),
            opening_tag: None,
        }),
        c if c.is_ascii_alphabetic() => {
            let name: String = tail[1..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            Some(Markup {
                len: tag_end(tail),
                opening_tag: Some(name),
            })
        }
        _ => None,
    }
}

/// Byte length of the tag at the start of `tail`, honouring quoted attribute values.
/// An unterminated tag swallows the remainder.
fn tag_end(tail: &str) -> usize {
    let mut quote: Option<char> = None;
    for (i, c) in tail.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return i + 1,
            (None, _) => {}
        }
    }
    tail.len()
}

fn skip_past_closing<'a>(rest: &'a str, name: &str) -> &'a str {
    let lowered = rest.to_ascii_lowercase();
    match lowered.find(&format!("</{name}")) {
        Some(start) => &rest[start + tag_end(&rest[start..])..],
        None => "",
    }
}
