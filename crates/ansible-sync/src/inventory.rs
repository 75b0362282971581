//! Section-aware edits of the INI-style host inventory.
//!
//! The file is parsed into a preamble plus bracket-headed sections, edited
//! structurally, and re-rendered line for line. Entries for groups other
//! than [ar_io_nodes] pass through untouched.

use std::fs;
use std::path::Path;

use crate::{NODE_GROUP, Result};

const VARS_GROUP: &str = "all:vars";
const INTERPRETER_LINE: &str = "ansible_python_interpreter=/usr/bin/python3";
const SSH_USER: &str = "ubuntu";

/// Append `name` to the managed group, creating the group (and a default
/// [all:vars] section) if the inventory lacks one. A name that is already
/// present is appended again; uniqueness is the caller's responsibility.
pub fn add_host(path: &Path, name: &str, address: &str) -> Result<()> {
    let mut doc = Document::load(path)?;
    let entry = format!("{name} ansible_host={address} ansible_user={SSH_USER}");

    match doc.section_mut(NODE_GROUP) {
        Some(section) => section.lines.push(entry),
        None => {
            doc.sections.push(Section {
                header: format!("[{NODE_GROUP}]"),
                name: NODE_GROUP.to_string(),
                lines: vec![entry, String::new()],
            });
            doc.sections.push(Section {
                header: format!("[{VARS_GROUP}]"),
                name: VARS_GROUP.to_string(),
                lines: vec![INTERPRETER_LINE.to_string()],
            });
        }
    }

    doc.save(path)
}

/// Drop every entry line whose first whitespace-delimited token equals
/// `name`. A missing inventory file is a no-op.
pub fn remove_host(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let mut doc = Document::load(path)?;
    let keep = |line: &String| line.split_whitespace().next() != Some(name);
    doc.preamble.retain(keep);
    for section in &mut doc.sections {
        section.lines.retain(keep);
    }

    doc.save(path)
}

/// Parsed inventory: lines before the first header, then one record per
/// section carrying its header line and everything up to the next header.
struct Document {
    preamble: Vec<String>,
    sections: Vec<Section>,
}

struct Section {
    header: String,
    name: String,
    lines: Vec<String>,
}

impl Document {
    fn load(path: &Path) -> Result<Self> {
        let text = if path.exists() {
            fs::read_to_string(path)?
        } else {
            String::new()
        };
        Ok(Self::parse(&text))
    }

    fn parse(text: &str) -> Self {
        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for line in text.lines() {
            if let Some(name) = header_name(line) {
                sections.push(Section {
                    header: line.to_string(),
                    name,
                    lines: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.lines.push(line.to_string());
            } else {
                preamble.push(line.to_string());
            }
        }

        Self { preamble, sections }
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        for section in &self.sections {
            out.push_str(&section.header);
            out.push('\n');
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        Ok(())
    }
}

fn header_name(line: &str) -> Option<String> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::to_string)
}
