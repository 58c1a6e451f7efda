//! IR → framework-neutral command tree
//!
//! Synthesizes one command node per operation, shaped by the `x-cli-*`
//! directives, and assembles the nodes into a (possibly grouped) tree.
//! The tree carries no host-framework types; adapters such as
//! `clap_host` realize it and feed captured values back through
//! [`FlagValues`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BuildError, InvokeError};
use crate::ext::parse_directives;
use crate::handler::{FlagValues, HandlerData, HandlerMap, OpenApiType, ParamMeta};
use crate::interp::interpolate_path;
use crate::spec::{ApiOperation, ParamLocation};

/// Flag name used for a request body that carries no naming directive.
pub const DEFAULT_BODY_FLAG: &str = "specli-data";

/// One typed command-line flag. The default is the type's zero value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: String,
    pub ty: OpenApiType,
    pub description: String,
    pub required: bool,
}

/// An action bound to a leaf command, run after flag capture.
pub type Action = Box<dyn Fn(&dyn FlagValues, &[String]) -> Result<(), InvokeError> + Send + Sync>;

/// One node of the synthesized command tree.
pub struct CommandNode {
    pub name: String,
    pub short_desc: String,
    pub hidden: bool,
    pub aliases: Vec<String>,
    pub flags: Vec<FlagSpec>,
    pub children: Vec<CommandNode>,
    pub action: Option<Action>,
}

impl CommandNode {
    pub fn new(name: impl Into<String>, short_desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_desc: short_desc.into(),
            hidden: false,
            aliases: Vec::new(),
            flags: Vec::new(),
            children: Vec::new(),
            action: None,
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("short_desc", &self.short_desc)
            .field("hidden", &self.hidden)
            .field("aliases", &self.aliases)
            .field("flags", &self.flags)
            .field("children", &self.children)
            .field("action", &self.action.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Populate `root` with one command per operation, grouped per the
/// `x-cli-group` directives.
///
/// Operations marked `x-cli-ignored` and operations without a registered
/// handler contribute nothing; a directive that fails to decode aborts
/// the whole build. Each non-empty group materializes as exactly one
/// parent node with its children sorted by name, so repeated builds of
/// the same spec produce identical trees.
pub fn bootstrap(
    root: &mut CommandNode,
    ops: &[ApiOperation],
    handlers: &HandlerMap,
) -> Result<(), BuildError> {
    // built into local state first; on error the root stays untouched
    let mut top: Vec<CommandNode> = Vec::new();
    let mut groups: BTreeMap<String, Vec<CommandNode>> = BTreeMap::new();

    for op in ops {
        let directives = parse_directives(&op.extensions, &op.operation_id)?;
        if directives.ignored {
            continue;
        }

        // each iteration owns a fresh HandlerData; nodes never share
        // interpolation state
        let mut data = HandlerData::new(op.method.clone(), op.path.clone());
        let mut flags = Vec::new();
        map_parameters(op, &mut data, &mut flags);
        map_request_body(op, &mut data, &mut flags)?;

        let Some(handler) = handlers.get(&op.operation_id) else {
            tracing::warn!(id = %op.operation_id, "no handler defined, skipping");
            continue;
        };
        let handler = Arc::clone(handler);

        let mut node = CommandNode::new(
            directives
                .name_override
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| op.operation_id.clone()),
            if op.summary.is_empty() {
                op.description.clone()
            } else {
                op.summary.clone()
            },
        );
        node.hidden = directives.hidden;
        node.aliases = directives.aliases;
        node.flags = flags;

        let action: Action = Box::new(move |values: &dyn FlagValues, args: &[String]| {
            // interpolation starts from the raw template on every invocation
            let mut data = data.clone();
            interpolate_path(&mut data, values)?;
            handler(values, args, data).map_err(InvokeError::Handler)
        });
        node.action = Some(action);

        match directives.group.filter(|group| !group.is_empty()) {
            Some(group) => groups.entry(group).or_default().push(node),
            None => top.push(node),
        }
    }

    for (group, mut nodes) in groups {
        nodes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut parent = CommandNode::new(group.clone(), format!("Operations on {group}"));
        parent.children = nodes;
        top.push(parent);
    }

    root.children.extend(top);
    Ok(())
}

/// Map the operation's parameters onto flags, categorized by location.
fn map_parameters(op: &ApiOperation, data: &mut HandlerData, flags: &mut Vec<FlagSpec>) {
    for param in &op.parameters {
        let ty = match &param.schema_type {
            Some(declared) => match OpenApiType::from_schema(declared) {
                Some(ty) => ty,
                None => {
                    // arrays and objects have no flag mapping
                    tracing::warn!(
                        name = %param.name,
                        ty = %declared,
                        id = %op.operation_id,
                        "unhandled param type, skipping"
                    );
                    continue;
                }
            },
            None => {
                tracing::warn!(
                    param = %param.name,
                    id = %op.operation_id,
                    "no type set for param, defaulting to string"
                );
                OpenApiType::String
            }
        };

        flags.push(FlagSpec {
            name: param.name.clone(),
            ty,
            description: param.description.clone(),
            required: param.required,
        });

        let meta = ParamMeta {
            name: param.name.clone(),
            ty,
        };
        match param.location {
            ParamLocation::Path => data.path_params.push(meta),
            ParamLocation::Query => data.query_params.push(meta),
            ParamLocation::Header => data.header_params.push(meta),
            ParamLocation::Cookie => data.cookie_params.push(meta),
        }
    }
}

/// Map the request body, if any, onto a single opaque string flag.
///
/// Name precedence: the body's own `x-cli-name`, else its first
/// `x-cli-aliases` entry, else [`DEFAULT_BODY_FLAG`].
fn map_request_body(
    op: &ApiOperation,
    data: &mut HandlerData,
    flags: &mut Vec<FlagSpec>,
) -> Result<(), BuildError> {
    let Some(body) = &op.request_body else {
        return Ok(());
    };

    let directives = parse_directives(&body.extensions, &op.operation_id)?;
    let name = directives
        .name_override
        .filter(|name| !name.is_empty())
        .or_else(|| directives.aliases.into_iter().next())
        .unwrap_or_else(|| {
            tracing::warn!(
                id = %op.operation_id,
                "no name set for requestBody, defaulting to {DEFAULT_BODY_FLAG}"
            );
            DEFAULT_BODY_FLAG.to_string()
        });

    flags.push(FlagSpec {
        name: name.clone(),
        ty: OpenApiType::String,
        description: body.description.clone(),
        required: body.required,
    });
    data.request_body_param = Some(ParamMeta {
        name,
        ty: OpenApiType::String,
    });

    Ok(())
}
