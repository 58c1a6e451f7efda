//! Vendor extension directives controlling the CLI shape.
//!
//! Servers annotate operations with `x-cli-*` extensions to steer how
//! the generated command tree looks: grouping, naming, aliases and
//! visibility all come from the spec itself.

use serde_json::Value;

use crate::error::BuildError;
use crate::spec::Extensions;

/// Directives decoded from an operation's `x-cli-*` extensions.
///
/// A key that is absent leaves its field at the zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliDirectives {
    /// Hide the command from help output (`x-cli-hidden`).
    pub hidden: bool,
    /// Additional names for the command, order preserved (`x-cli-aliases`).
    ///
    /// Aliases are never promoted to the primary name; only
    /// `name_override` changes that.
    pub aliases: Vec<String>,
    /// Group the command under a shared parent (`x-cli-group`).
    pub group: Option<String>,
    /// Produce no command at all for this operation (`x-cli-ignored`).
    pub ignored: bool,
    /// Replace the operationId as the command name (`x-cli-name`).
    pub name_override: Option<String>,
}

/// Decode the recognized `x-cli-*` keys from a raw extension map.
///
/// Unrecognized keys are skipped with a warning. A recognized key whose
/// value has the wrong shape fails the whole build.
pub fn parse_directives(
    exts: &Extensions,
    operation_id: &str,
) -> Result<CliDirectives, BuildError> {
    let mut directives = CliDirectives::default();

    for (key, value) in exts {
        match key.as_str() {
            "x-cli-hidden" => directives.hidden = expect_bool(key, value, operation_id)?,
            "x-cli-aliases" => directives.aliases = expect_string_array(key, value, operation_id)?,
            "x-cli-group" => directives.group = Some(expect_string(key, value, operation_id)?),
            "x-cli-ignored" => directives.ignored = expect_bool(key, value, operation_id)?,
            "x-cli-name" => {
                directives.name_override = Some(expect_string(key, value, operation_id)?)
            }
            _ => {
                tracing::warn!(ext = %key, id = %operation_id, "unhandled extension, skipping");
            }
        }
    }

    Ok(directives)
}

fn decode_error(key: &str, operation_id: &str, expected: &'static str) -> BuildError {
    BuildError::DirectiveDecode {
        key: key.to_string(),
        operation: operation_id.to_string(),
        expected,
    }
}

fn expect_bool(key: &str, value: &Value, operation_id: &str) -> Result<bool, BuildError> {
    value
        .as_bool()
        .ok_or_else(|| decode_error(key, operation_id, "boolean"))
}

fn expect_string(key: &str, value: &Value, operation_id: &str) -> Result<String, BuildError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| decode_error(key, operation_id, "string"))
}

fn expect_string_array(
    key: &str,
    value: &Value,
    operation_id: &str,
) -> Result<Vec<String>, BuildError> {
    let items = value
        .as_array()
        .ok_or_else(|| decode_error(key, operation_id, "array of strings"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| decode_error(key, operation_id, "array of strings"))
        })
        .collect()
}
