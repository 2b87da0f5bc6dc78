//! YAML rendering with block-style multi-line strings.

use anyhow::{Context, Result};
use serde::Serialize;
use yaml_rust_davvid::{Yaml, YamlEmitter};

/// Serializes a value to YAML, emitting multi-line strings as block scalars.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    // serde_yaml cannot emit block scalars, so route through yaml-rust's emitter
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let yaml = convert_serde_to_yaml_rust(&serde_value);

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter.dump(&yaml).context("Failed to emit YAML")?;

    let mut block_strings = Vec::new();
    collect_block_strings(&yaml, &mut block_strings);
    let mut output = strip_block_chomping(&output, &block_strings);

    output.push('\n');
    Ok(output)
}

/// Collects multi-line strings in the order the emitter writes them.
fn collect_block_strings<'a>(node: &'a Yaml, out: &mut Vec<&'a str>) {
    match node {
        Yaml::String(s) if s.contains('\n') => out.push(s),
        Yaml::Array(items) => items.iter().for_each(|item| collect_block_strings(item, out)),
        Yaml::Hash(hash) => {
            for (key, value) in hash {
                collect_block_strings(key, out);
                collect_block_strings(value, out);
            }
        }
        _ => {}
    }
}

/// Rewrites `|` block indicators to `|-` for strings without a final newline.
///
/// The emitter always writes clip chomping, which reads back with a trailing
/// newline appended. A block indicator is a line ending in `|` whose next
/// non-blank line is indented deeper.
fn strip_block_chomping(emitted: &str, block_strings: &[&str]) -> String {
    let lines: Vec<&str> = emitted.lines().collect();
    let indent = |line: &str| line.len() - line.trim_start().len();
    let mut strings = block_strings.iter();
    let mut result = String::with_capacity(emitted.len() + block_strings.len());

    for (i, line) in lines.iter().enumerate() {
        result.push_str(line);
        let opens_block = line.ends_with('|')
            && lines[i + 1..]
                .iter()
                .find(|next| !next.trim().is_empty())
                .is_some_and(|next| indent(next) > indent(line));
        if opens_block && strings.next().is_some_and(|s| !s.ends_with('\n')) {
            result.push('-');
        }
        if i + 1 < lines.len() {
            result.push('\n');
        }
    }
    result
}

fn convert_serde_to_yaml_rust(value: &serde_yaml::Value) -> Yaml {
    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            Yaml::Array(seq.iter().map(convert_serde_to_yaml_rust).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut hash = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                hash.insert(convert_serde_to_yaml_rust(k), convert_serde_to_yaml_rust(v));
            }
            Yaml::Hash(hash)
        }
        serde_yaml::Value::Tagged(tagged) => convert_serde_to_yaml_rust(&tagged.value),
    }
}
