//! Linked-file descriptors and the `file` field wire format.
//!
//! Format: entries joined by `;`, each entry `description:link:type`.
//! `\`, `:` and `;` inside a component are escaped with a backslash.
//! An entry with a single component is a bare link.

use serde::{Deserialize, Serialize};

/// One file attached to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedFile {
    pub description: String,
    /// Path or URL.
    pub link: String,
    /// File type name, e.g. `PDF`.
    pub file_type: String,
}

impl LinkedFile {
    pub fn new(
        description: impl Into<String>,
        link: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            link: link.into(),
            file_type: file_type.into(),
        }
    }

    /// Whether the link points to a remote resource.
    pub fn is_online_link(&self) -> bool {
        let lower = self.link.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("ftp://")
    }

    fn is_empty(&self) -> bool {
        self.description.is_empty() && self.link.is_empty() && self.file_type.is_empty()
    }
}

/// Parses a `file` field value. Malformed escapes are kept literally.
pub fn parse_file_field(value: &str) -> Vec<LinkedFile> {
    let mut files = Vec::new();
    let mut components: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ':' => components.push(std::mem::take(&mut current)),
            ';' => {
                components.push(std::mem::take(&mut current));
                push_linked_file(&mut files, std::mem::take(&mut components));
            }
            other => current.push(other),
        }
    }
    components.push(current);
    push_linked_file(&mut files, components);

    files
}

/// Serializes linked files into the `file` field format.
pub fn write_file_field(files: &[LinkedFile]) -> String {
    files
        .iter()
        .map(|file| {
            format!(
                "{}:{}:{}",
                escape_component(&file.description),
                escape_component(&file.link),
                escape_component(&file.file_type)
            )
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn push_linked_file(files: &mut Vec<LinkedFile>, mut components: Vec<String>) {
    let file = match components.len() {
        0 => return,
        1 => LinkedFile::new("", components.remove(0).trim(), ""),
        _ => {
            let mut iter = components.into_iter();
            let description = iter.next().unwrap_or_default();
            let link = iter.next().unwrap_or_default();
            let file_type = iter.collect::<Vec<_>>().join(":");
            LinkedFile::new(description, link, file_type)
        }
    };
    if !file.is_empty() {
        files.push(file);
    }
}

fn escape_component(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ':' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{parse_file_field, write_file_field, LinkedFile};

    #[test]
    fn parses_multiple_entries() {
        let files = parse_file_field("Paper:paper.pdf:PDF;Slides:talk.pptx:PowerPoint");
        assert_eq!(
            files,
            vec![
                LinkedFile::new("Paper", "paper.pdf", "PDF"),
                LinkedFile::new("Slides", "talk.pptx", "PowerPoint"),
            ]
        );
    }

    #[test]
    fn single_component_is_a_bare_link() {
        let files = parse_file_field("/tmp/paper.pdf");
        assert_eq!(files, vec![LinkedFile::new("", "/tmp/paper.pdf", "")]);
    }

    #[test]
    fn escapes_survive_a_write_and_parse() {
        let file = LinkedFile::new("a;b", r"C:\docs\x.pdf", "PDF");
        let written = write_file_field(std::slice::from_ref(&file));
        assert_eq!(written, r"a\;b:C\:\\docs\\x.pdf:PDF");
        assert_eq!(parse_file_field(&written), vec![file]);
    }

    #[test]
    fn empty_value_yields_no_files() {
        assert!(parse_file_field("").is_empty());
        assert!(parse_file_field(";").is_empty());
    }

    #[test]
    fn detects_online_links() {
        assert!(LinkedFile::new("", "https://example.org/a.pdf", "PDF").is_online_link());
        assert!(!LinkedFile::new("", "a.pdf", "PDF").is_online_link());
    }
}
