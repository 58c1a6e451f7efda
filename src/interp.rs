//! Invocation-time path template interpolation.

use regex::{NoExpand, Regex};

use crate::error::InvokeError;
use crate::handler::{FlagValues, HandlerData, OpenApiType, ParamMeta};

/// Substitute `{name}` placeholders in the path template with the values
/// captured for this invocation.
///
/// A run of consecutive identical placeholders collapses into a single
/// replacement. Parameters with no captured value fall back to the
/// type's zero value. A template without path params is left unchanged.
pub fn interpolate_path(
    data: &mut HandlerData,
    values: &dyn FlagValues,
) -> Result<(), InvokeError> {
    let mut path = data.path.clone();

    for param in &data.path_params {
        let pattern = Regex::new(&format!(r"(\{{{}}})+", regex::escape(&param.name))).map_err(
            |source| InvokeError::PathPattern {
                name: param.name.clone(),
                source,
            },
        )?;

        let value = format_value(param, values);
        path = pattern.replace_all(&path, NoExpand(&value)).into_owned();
    }

    data.path = path;
    Ok(())
}

fn format_value(param: &ParamMeta, values: &dyn FlagValues) -> String {
    match param.ty {
        OpenApiType::String => values.string(&param.name).unwrap_or_default(),
        OpenApiType::Integer => values.integer(&param.name).unwrap_or_default().to_string(),
        // f64's Display is the shortest decimal that round-trips
        OpenApiType::Number => values.number(&param.name).unwrap_or_default().to_string(),
        OpenApiType::Boolean => values.boolean(&param.name).unwrap_or_default().to_string(),
    }
}
