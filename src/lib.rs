//! Spec-first CLIs from OpenAPI vendor extensions.
//!
//! Decodes `x-cli-*` vendor extensions from a dereferenced OpenAPI v3
//! document, maps operation parameters and request bodies onto typed
//! flags, and assembles one command per operation into a (possibly
//! grouped) tree bound to user handlers. Path templates are resolved
//! against the captured flag values when a command is invoked, so the
//! server controls CLI ergonomics from the spec itself.
//!
//! # Usage
//!
//! ```no_run
//! use specli::{bootstrap, dispatch, handler, to_command, CommandNode, HandlerMap};
//!
//! let ops = specli::load_file("api.json").unwrap();
//!
//! let mut handlers = HandlerMap::new();
//! handlers.insert(
//!     "GetPod".to_string(),
//!     handler(|_values, _args, data| {
//!         println!("{} {}", data.method, data.path);
//!         Ok(())
//!     }),
//! );
//!
//! let mut root = CommandNode::new("podctl", "Pod CLI");
//! bootstrap(&mut root, &ops, &handlers).unwrap();
//!
//! let matches = to_command(&root).get_matches();
//! dispatch(&root, &matches).unwrap();
//! ```

pub mod builder;
pub mod clap_host;
pub mod error;
pub mod ext;
pub mod handler;
pub mod interp;
pub mod spec;

pub use builder::{bootstrap, Action, CommandNode, FlagSpec, DEFAULT_BODY_FLAG};
pub use clap_host::{dispatch, to_command, ClapValues};
pub use error::{BuildError, HandlerError, InvokeError};
pub use ext::{parse_directives, CliDirectives};
pub use handler::{
    handler, FlagValues, Handler, HandlerData, HandlerMap, OpenApiType, ParamMeta,
};
pub use interp::interpolate_path;
pub use spec::{
    extract_operations, load, load_file, ApiOperation, Extensions, Param, ParamLocation,
    RequestBody,
};

// Re-export dependencies for downstream crates
pub use clap;
