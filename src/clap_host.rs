//! clap host-framework adapter
//!
//! Realizes the neutral command tree as `clap::Command`s and routes a
//! parsed invocation back to the bound action. The core modules never
//! touch clap; a second host framework only needs its own version of
//! this file.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::builder::{CommandNode, FlagSpec};
use crate::error::InvokeError;
use crate::handler::{FlagValues, OpenApiType};

/// Realize a command node (and its subtree) as a `clap::Command`.
pub fn to_command(node: &CommandNode) -> Command {
    let mut cmd = Command::new(node.name.clone()).about(node.short_desc.clone());

    if node.hidden {
        cmd = cmd.hide(true);
    }
    if !node.aliases.is_empty() {
        cmd = cmd.visible_aliases(node.aliases.clone());
    }

    for flag in &node.flags {
        cmd = cmd.arg(to_arg(flag));
    }

    if !node.children.is_empty() {
        cmd = cmd.subcommand_required(true).arg_required_else_help(true);
        for child in &node.children {
            cmd = cmd.subcommand(to_command(child));
        }
    }

    cmd
}

fn to_arg(flag: &FlagSpec) -> Arg {
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .help(flag.description.clone());

    arg = match flag.ty {
        OpenApiType::String => arg.action(ArgAction::Set),
        OpenApiType::Integer => arg
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(i64)),
        OpenApiType::Number => arg
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(f64)),
        OpenApiType::Boolean => arg.action(ArgAction::SetTrue),
    };

    if flag.required {
        // clap rejects required args that carry a default
        arg = arg.required(true);
    } else if flag.ty != OpenApiType::Boolean {
        arg = arg.default_value(flag.ty.zero_literal());
    }

    arg
}

/// [`FlagValues`] over parsed clap matches.
pub struct ClapValues<'a> {
    matches: &'a ArgMatches,
}

impl<'a> ClapValues<'a> {
    pub fn new(matches: &'a ArgMatches) -> Self {
        Self { matches }
    }
}

impl FlagValues for ClapValues<'_> {
    fn string(&self, name: &str) -> Option<String> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.matches
            .try_get_one::<i64>(name)
            .ok()
            .flatten()
            .copied()
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.matches
            .try_get_one::<f64>(name)
            .ok()
            .flatten()
            .copied()
    }

    fn boolean(&self, name: &str) -> Option<bool> {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
    }
}

/// Route a parsed invocation to the bound action of the resolved leaf.
///
/// clap reports canonical command names for aliased invocations, so the
/// walk matches on node names only. All inputs are flags; the positional
/// argument slice passed to handlers is empty under this adapter.
pub fn dispatch(root: &CommandNode, matches: &ArgMatches) -> Result<(), InvokeError> {
    let mut node = root;
    let mut current = matches;

    while let Some((name, sub)) = current.subcommand() {
        node = node
            .children
            .iter()
            .find(|child| child.name == name)
            .ok_or_else(|| InvokeError::UnknownCommand {
                name: name.to_string(),
            })?;
        current = sub;
    }

    match &node.action {
        Some(action) => action(&ClapValues::new(current), &[]),
        None => Err(InvokeError::UnknownCommand {
            name: node.name.clone(),
        }),
    }
}
