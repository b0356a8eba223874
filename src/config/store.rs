//! Environment record store.
//!
//! The record is a hand-editable KDL file. Loads classify failures into
//! `ConfigNotFound` / `ConfigCorrupt`; saves rebuild only the sections that
//! were mutated in memory and splice them into the parsed document, so
//! comments, unknown nodes and hand formatting elsewhere in the file survive
//! every rewrite. An untouched store saves back byte-for-byte.

use crate::config::record::EnvironmentRecord;
use crate::core::identity::normalize_name;
use crate::core::types::Tool;
use crate::error::{LabenvError, Result};
use kdl::KdlDocument;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ENVIRONMENT_SECTION: &str = "environment";
const PACKAGES_SECTION: &str = "packages";
const NOTES_SECTION: &str = "notes";

pub struct ConfigStore {
    path: PathBuf,
    doc: KdlDocument,
    record: EnvironmentRecord,
    dirty_packages: bool,
    dirty_notes: bool,
}

impl ConfigStore {
    /// Load an existing record.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(LabenvError::ConfigNotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|e| LabenvError::IoError {
            path: path.clone(),
            source: e,
        })?;

        let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
            LabenvError::ConfigCorrupt {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        let record = parse_record(&doc, &path)?;

        Ok(Self {
            path,
            doc,
            record,
            dirty_packages: false,
            dirty_notes: false,
        })
    }

    /// Create a fresh record. Refuses to clobber an existing one unless the
    /// caller passes explicit overwrite intent.
    pub fn create(
        path: impl Into<PathBuf>,
        tool: Tool,
        python: &str,
        name: &str,
        overwrite: bool,
    ) -> Result<Self> {
        let path = path.into();
        if path.exists() && !overwrite {
            return Err(LabenvError::ConfigAlreadyExists { path });
        }

        let content = format!(
            "// Environment record for {name_raw}, maintained by labenv.\n\
             // `labenv sync` rewrites the packages section; notes and any\n\
             // extra sections are yours.\n\
             \n\
             environment {{\n\
            \x20   tool {tool}\n\
            \x20   python {python}\n\
            \x20   name {name}\n\
             }}\n\
             \n\
             packages {{\n\
             }}\n\
             \n\
             notes {{\n\
             }}\n",
            name_raw = name,
            tool = quote_string(&tool.to_string()),
            python = quote_string(python),
            name = quote_string(name),
        );

        write_atomically(&path, &content)?;
        Self::load(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &EnvironmentRecord {
        &self.record
    }

    /// Replace the package map wholesale; the section is rebuilt on save.
    pub fn set_packages(&mut self, packages: BTreeMap<String, String>) {
        if self.record.packages != packages {
            self.record.packages = packages;
            self.dirty_packages = true;
        }
    }

    /// Write or overwrite one usage note. Only the notes section is rebuilt
    /// on save; `packages` stays byte-identical on disk.
    pub fn set_note(&mut self, package: &str, note: &str) {
        let key = normalize_name(package);
        if self.record.notes.get(&key).map(String::as_str) != Some(note) {
            self.record.notes.insert(key, note.to_string());
            self.dirty_notes = true;
        }
    }

    /// Persist the record atomically. With no pending mutation this writes
    /// the originally-loaded bytes back unchanged.
    pub fn save(&mut self) -> Result<()> {
        if self.dirty_packages {
            rebuild_section(&mut self.doc, PACKAGES_SECTION, &self.record.packages)?;
        }
        if self.dirty_notes {
            rebuild_section(&mut self.doc, NOTES_SECTION, &self.record.notes)?;
        }

        let rendered = self.doc.to_string();
        // Self-check: never persist bytes the next load would reject.
        rendered
            .parse::<KdlDocument>()
            .map_err(|e| LabenvError::Other(format!("Invalid KDL generated: {}", e)))?;

        write_atomically(&self.path, &rendered)?;
        self.dirty_packages = false;
        self.dirty_notes = false;
        Ok(())
    }
}

fn parse_record(doc: &KdlDocument, path: &Path) -> Result<EnvironmentRecord> {
    let corrupt = |message: String| LabenvError::ConfigCorrupt {
        path: path.to_path_buf(),
        message,
    };

    let env_node = doc
        .nodes()
        .iter()
        .find(|n| n.name().value() == ENVIRONMENT_SECTION)
        .ok_or_else(|| corrupt("missing `environment` section".into()))?;

    let field = |name: &str| -> Result<String> {
        env_node
            .children()
            .and_then(|children| {
                children
                    .nodes()
                    .iter()
                    .find(|n| n.name().value() == name)
            })
            .and_then(|n| n.entries().first())
            .and_then(|e| e.value().as_string())
            .map(str::to_string)
            .ok_or_else(|| corrupt(format!("missing `{}` in the environment section", name)))
    };

    let tool = Tool::from_str(&field("tool")?).map_err(|message| corrupt(message))?;
    let mut record = EnvironmentRecord::new(tool, field("python")?, field("name")?);

    record.packages = parse_map_section(doc, PACKAGES_SECTION, path)?;
    record.notes = parse_map_section(doc, NOTES_SECTION, path)?;

    Ok(record)
}

/// Parse a `name "value"` map section. Keys are normalized; two raw keys
/// collapsing to the same normalized name is a corruption, not a merge.
fn parse_map_section(
    doc: &KdlDocument,
    section: &str,
    path: &Path,
) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();

    let Some(node) = doc.nodes().iter().find(|n| n.name().value() == section) else {
        return Ok(map);
    };
    let Some(children) = node.children() else {
        return Ok(map);
    };

    for child in children.nodes() {
        let raw_name = child.name().value();
        let value = child
            .entries()
            .first()
            .and_then(|e| e.value().as_string())
            .ok_or_else(|| LabenvError::ConfigCorrupt {
                path: path.to_path_buf(),
                message: format!("`{}` entry '{}' has no string value", section, raw_name),
            })?;

        let key = normalize_name(raw_name);
        if map.insert(key.clone(), value.to_string()).is_some() {
            return Err(LabenvError::ConfigCorrupt {
                path: path.to_path_buf(),
                message: format!(
                    "`{}` entries '{}' and another key both normalize to '{}'",
                    section, raw_name, key
                ),
            });
        }
    }

    Ok(map)
}

/// Rebuild one section's children from a map, leaving the rest of the
/// document untouched. The replacement is parsed from rendered KDL so it
/// carries real formatting into the spliced document.
fn rebuild_section(
    doc: &mut KdlDocument,
    section: &str,
    entries: &BTreeMap<String, String>,
) -> Result<()> {
    let children_src = render_section_children(entries);
    let internal = |e: kdl::KdlError| LabenvError::Other(format!("Invalid KDL generated: {}", e));

    let position = doc
        .nodes()
        .iter()
        .position(|n| n.name().value() == section);

    match position {
        Some(idx) if doc.nodes()[idx].children().is_some() => {
            let children: KdlDocument = children_src.parse().map_err(internal)?;
            doc.nodes_mut()[idx].set_children(children);
        }
        other => {
            // Section absent, or present without braces: append a freshly
            // parsed section node instead of fighting the formatter.
            if let Some(idx) = other {
                doc.nodes_mut().remove(idx);
            }
            let full = format!("\n{} {{{}}}\n", section, children_src);
            let parsed: KdlDocument = full.parse().map_err(internal)?;
            for node in parsed.nodes() {
                doc.nodes_mut().push(node.clone());
            }
        }
    }

    Ok(())
}

fn render_section_children(entries: &BTreeMap<String, String>) -> String {
    let mut out = String::from("\n");
    for (name, value) in entries {
        out.push_str("    ");
        out.push_str(&render_node_name(name));
        out.push(' ');
        out.push_str(&quote_string(value));
        out.push('\n');
    }
    out
}

/// Package names are normalized (lower-case, `-` separators) and almost
/// always valid bare KDL identifiers; quote the rest (e.g. `2to3`).
fn render_node_name(name: &str) -> String {
    let bare = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if bare {
        name.to_string()
    } else {
        quote_string(name)
    }
}

fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Write via a sibling temp file and rename, so a crash mid-write can never
/// leave a half-written record behind.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => {
            return Err(LabenvError::Other(format!(
                "Invalid record path (no parent directory): {}",
                path.display()
            )));
        }
    };

    let tmp_path = dir.join(format!(
        ".{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "labenv.kdl".to_string())
    ));

    let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| LabenvError::IoError {
        path: tmp_path.clone(),
        source: e,
    })?;
    tmp_file.write_all(content.as_bytes())?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| LabenvError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
