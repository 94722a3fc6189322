//! Serialization of extracted constants into generated source artifacts.

use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;

use crate::types::{OutputFormat, PolicyConstant, PolicyTypesError, PolicyTypesResult};

/// Opening line of the list literal.
pub const LIST_HEAD: &str = "[\n";

/// Closing line of the list literal. No trailing newline.
pub const LIST_FOOT: &str = "];";

/// Name of the generated Rust enum.
pub const ENUM_NAME: &str = "nsContentPolicyType";

/// Render `constants` in `format` to any writer.
pub fn render<W: Write>(
    format: OutputFormat,
    constants: &[PolicyConstant],
    writer: &mut W,
) -> PolicyTypesResult<()> {
    match format {
        OutputFormat::List => render_list(constants.iter().map(|c| c.name.as_str()), writer),
        OutputFormat::RustEnum => render_rust_enum(constants, writer),
        OutputFormat::Json => render_json(constants, writer),
    }
}

/// Render into an in-memory string.
pub fn render_to_string(
    format: OutputFormat,
    constants: &[PolicyConstant],
) -> PolicyTypesResult<String> {
    let mut buf = Vec::new();
    render(format, constants, &mut buf)?;
    // Every renderer writes valid UTF-8 built from `&str` inputs.
    String::from_utf8(buf).map_err(|e| {
        PolicyTypesError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Write the bracketed list: `[`, one `    "NAME",` per name, then `];`.
pub fn render_list<'a, W, I>(names: I, writer: &mut W) -> PolicyTypesResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    writer.write_all(LIST_HEAD.as_bytes())?;
    for name in names {
        writeln!(writer, "    \"{name}\",")?;
    }
    writer.write_all(LIST_FOOT.as_bytes())?;
    Ok(())
}

fn render_rust_enum<W: Write>(constants: &[PolicyConstant], writer: &mut W) -> PolicyTypesResult<()> {
    // Discriminants must be unique and fit the `u64` repr.
    let mut seen_names = HashSet::new();
    let mut seen_values = HashSet::new();
    for constant in constants {
        let value = constant.ordinal()?;
        if !seen_names.insert(constant.name.as_str()) {
            return Err(PolicyTypesError::DuplicateName(constant.name.clone()));
        }
        if !seen_values.insert(value) {
            return Err(PolicyTypesError::DuplicateValue {
                name: constant.name.clone(),
                value,
            });
        }
    }

    writeln!(writer, "// @generated by policytypes-gen. Do not edit by hand.")?;
    writeln!(writer)?;
    writeln!(writer, "#[allow(non_camel_case_types)]")?;
    writeln!(
        writer,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]"
    )?;
    writeln!(writer, "#[repr(u64)]")?;
    writeln!(writer, "pub enum {ENUM_NAME} {{")?;
    for c in constants {
        writeln!(writer, "    {} = {},", c.name, c.value)?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "impl {ENUM_NAME} {{")?;
    writeln!(writer, "    pub fn name(&self) -> &'static str {{")?;
    writeln!(writer, "        match *self {{")?;
    for c in constants {
        writeln!(writer, "            {ENUM_NAME}::{0} => \"{0}\",", c.name)?;
    }
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer)?;
    writeln!(writer, "    pub fn from_name(name: &str) -> Option<Self> {{")?;
    writeln!(writer, "        match name {{")?;
    for c in constants {
        writeln!(writer, "            \"{0}\" => Some({ENUM_NAME}::{0}),", c.name)?;
    }
    writeln!(writer, "            _ => None,")?;
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    name: &'a str,
    value: u64,
}

fn render_json<W: Write>(constants: &[PolicyConstant], writer: &mut W) -> PolicyTypesResult<()> {
    let mut entries = Vec::with_capacity(constants.len());
    for c in constants {
        entries.push(JsonEntry {
            name: &c.name,
            value: c.ordinal()?,
        });
    }

    serde_json::to_writer_pretty(&mut *writer, &entries)?;
    writeln!(writer)?;
    Ok(())
}
