//! LaTeX markup to plain Unicode text.
//!
//! Covers the subset that shows up in bibliographic fields: accent commands,
//! named letters, escaped specials, dashes, ties and grouping braces.
//! Unknown control words are dropped and their arguments kept.
//! Command arguments nested deeper than `MAX_NESTING` are emitted verbatim.

/// Markup-to-plain-text conversion seam used by the derived-value cache.
pub trait MarkupConverter: Send + Sync {
    fn convert(&self, text: &str) -> String;
}

/// Default converter for LaTeX-encoded field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexToUnicode;

impl MarkupConverter for LatexToUnicode {
    fn convert(&self, text: &str) -> String {
        latex_to_unicode(text)
    }
}

const MAX_NESTING: usize = 32;

const ACCENT_SYMBOLS: &[char] = &['"', '\'', '`', '^', '~', '=', '.'];
const ACCENT_WORDS: &[&str] = &["c", "v", "u", "H", "k", "r", "d", "b"];

const COMPOSED: &[(char, char, char)] = &[
    ('\'', 'a', 'á'),
    ('\'', 'e', 'é'),
    ('\'', 'i', 'í'),
    ('\'', 'o', 'ó'),
    ('\'', 'u', 'ú'),
    ('\'', 'y', 'ý'),
    ('\'', 'A', 'Á'),
    ('\'', 'E', 'É'),
    ('\'', 'I', 'Í'),
    ('\'', 'O', 'Ó'),
    ('\'', 'U', 'Ú'),
    ('\'', 'Y', 'Ý'),
    ('\'', 'c', 'ć'),
    ('\'', 'n', 'ń'),
    ('\'', 's', 'ś'),
    ('\'', 'z', 'ź'),
    ('\'', 'C', 'Ć'),
    ('\'', 'N', 'Ń'),
    ('\'', 'S', 'Ś'),
    ('\'', 'Z', 'Ź'),
    ('`', 'a', 'à'),
    ('`', 'e', 'è'),
    ('`', 'i', 'ì'),
    ('`', 'o', 'ò'),
    ('`', 'u', 'ù'),
    ('`', 'A', 'À'),
    ('`', 'E', 'È'),
    ('`', 'I', 'Ì'),
    ('`', 'O', 'Ò'),
    ('`', 'U', 'Ù'),
    ('^', 'a', 'â'),
    ('^', 'e', 'ê'),
    ('^', 'i', 'î'),
    ('^', 'o', 'ô'),
    ('^', 'u', 'û'),
    ('^', 'A', 'Â'),
    ('^', 'E', 'Ê'),
    ('^', 'I', 'Î'),
    ('^', 'O', 'Ô'),
    ('^', 'U', 'Û'),
    ('"', 'a', 'ä'),
    ('"', 'e', 'ë'),
    ('"', 'i', 'ï'),
    ('"', 'o', 'ö'),
    ('"', 'u', 'ü'),
    ('"', 'y', 'ÿ'),
    ('"', 'A', 'Ä'),
    ('"', 'E', 'Ë'),
    ('"', 'I', 'Ï'),
    ('"', 'O', 'Ö'),
    ('"', 'U', 'Ü'),
    ('~', 'a', 'ã'),
    ('~', 'n', 'ñ'),
    ('~', 'o', 'õ'),
    ('~', 'A', 'Ã'),
    ('~', 'N', 'Ñ'),
    ('~', 'O', 'Õ'),
    ('=', 'a', 'ā'),
    ('=', 'e', 'ē'),
    ('=', 'i', 'ī'),
    ('=', 'o', 'ō'),
    ('=', 'u', 'ū'),
    ('.', 'z', 'ż'),
    ('.', 'Z', 'Ż'),
    ('c', 'c', 'ç'),
    ('c', 'C', 'Ç'),
    ('c', 's', 'ş'),
    ('v', 'c', 'č'),
    ('v', 'e', 'ě'),
    ('v', 'r', 'ř'),
    ('v', 's', 'š'),
    ('v', 'z', 'ž'),
    ('v', 'C', 'Č'),
    ('v', 'E', 'Ě'),
    ('v', 'R', 'Ř'),
    ('v', 'S', 'Š'),
    ('v', 'Z', 'Ž'),
    ('u', 'a', 'ă'),
    ('u', 'g', 'ğ'),
    ('H', 'o', 'ő'),
    ('H', 'u', 'ű'),
    ('H', 'O', 'Ő'),
    ('H', 'U', 'Ű'),
    ('k', 'a', 'ą'),
    ('k', 'e', 'ę'),
    ('r', 'a', 'å'),
    ('r', 'A', 'Å'),
];

/// Converts LaTeX-encoded text to Unicode.
pub fn latex_to_unicode(text: &str) -> String {
    convert_text(text, 0)
}

fn convert_text(text: &str, depth: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut index = 0;

    while index < chars.len() {
        match chars[index] {
            '\\' => index = convert_command(&chars, index + 1, &mut out, depth),
            '{' | '}' | '$' => index += 1,
            '~' => {
                out.push('\u{a0}');
                index += 1;
            }
            '-' => {
                let run = chars[index..].iter().take_while(|c| **c == '-').count();
                match run {
                    1 => out.push('-'),
                    2 => out.push('\u{2013}'),
                    _ => out.push('\u{2014}'),
                }
                index += run.min(3);
            }
            other => {
                out.push(other);
                index += 1;
            }
        }
    }

    out
}

fn convert_command(chars: &[char], start: usize, out: &mut String, depth: usize) -> usize {
    let Some(&first) = chars.get(start) else {
        out.push('\\');
        return start;
    };

    if ACCENT_SYMBOLS.contains(&first) {
        let (argument, next) = read_argument(chars, start + 1, depth);
        push_accented(first, &argument, out);
        return next;
    }

    if !first.is_ascii_alphabetic() {
        match first {
            '\\' => out.push(' '),
            other => out.push(other),
        }
        return start + 1;
    }

    let end = chars[start..]
        .iter()
        .position(|c| !c.is_ascii_alphabetic())
        .map_or(chars.len(), |offset| start + offset);
    let name: String = chars[start..end].iter().collect();

    if ACCENT_WORDS.contains(&name.as_str()) {
        let accent = name.chars().next().unwrap_or_default();
        let (argument, next) = read_argument(chars, end, depth);
        push_accented(accent, &argument, out);
        return next;
    }

    if let Some(replacement) = named_command(&name) {
        out.push_str(replacement);
    }

    // A control word swallows one following space.
    if chars.get(end) == Some(&' ') {
        end + 1
    } else {
        end
    }
}

fn read_argument(chars: &[char], start: usize, depth: usize) -> (String, usize) {
    let mut index = start;
    while chars.get(index) == Some(&' ') {
        index += 1;
    }

    if depth >= MAX_NESTING {
        return (chars[index.min(chars.len())..].iter().collect(), chars.len());
    }

    match chars.get(index) {
        Some('{') => {
            let mut depth = 0usize;
            let mut end = index;
            while end < chars.len() {
                match chars[end] {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                end += 1;
            }
            let inner: String = chars[index + 1..end.min(chars.len())].iter().collect();
            (convert_text(&inner, depth + 1), (end + 1).min(chars.len()))
        }
        Some('\\') => {
            let mut converted = String::new();
            let next = convert_command(chars, index + 1, &mut converted, depth + 1);
            (converted, next)
        }
        Some(c) => (c.to_string(), index + 1),
        None => (String::new(), index),
    }
}

fn push_accented(accent: char, argument: &str, out: &mut String) {
    let mut letters = argument.chars();
    let Some(base) = letters.next() else {
        return;
    };
    let base = if base == 'ı' { 'i' } else { base };

    match COMPOSED
        .iter()
        .find(|(symbol, letter, _)| *symbol == accent && *letter == base)
    {
        Some((_, _, composed)) => out.push(*composed),
        None => {
            out.push(base);
            if let Some(mark) = combining_mark(accent) {
                out.push(mark);
            }
        }
    }
    out.extend(letters);
}

fn combining_mark(accent: char) -> Option<char> {
    match accent {
        '`' => Some('\u{300}'),
        '\'' => Some('\u{301}'),
        '^' => Some('\u{302}'),
        '~' => Some('\u{303}'),
        '=' => Some('\u{304}'),
        'u' => Some('\u{306}'),
        '.' => Some('\u{307}'),
        '"' => Some('\u{308}'),
        'r' => Some('\u{30a}'),
        'H' => Some('\u{30b}'),
        'v' => Some('\u{30c}'),
        'd' => Some('\u{323}'),
        'c' => Some('\u{327}'),
        'k' => Some('\u{328}'),
        'b' => Some('\u{331}'),
        _ => None,
    }
}

fn named_command(name: &str) -> Option<&'static str> {
    let replacement = match name {
        "ss" => "ß",
        "o" => "ø",
        "O" => "Ø",
        "ae" => "æ",
        "AE" => "Æ",
        "oe" => "œ",
        "OE" => "Œ",
        "aa" => "å",
        "AA" => "Å",
        "l" => "ł",
        "L" => "Ł",
        "i" => "ı",
        "j" => "ȷ",
        "LaTeX" => "LaTeX",
        "TeX" => "TeX",
        "textendash" => "\u{2013}",
        "textemdash" => "\u{2014}",
        "dots" | "ldots" | "textellipsis" => "\u{2026}",
        "textbackslash" => "\\",
        "textasciitilde" => "~",
        "S" => "§",
        "P" => "¶",
        "copyright" => "©",
        "pounds" => "£",
        _ => return None,
    };
    Some(replacement)
}
