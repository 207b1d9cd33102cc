//! Command-line argument parsing against a declared tree of commands.
//!
//! A [`Schema`] holds flags, positional arguments and nested subcommands.
//! [`Schema::parse`] walks the raw words once, left to right:
//! - long flags (`--name`, `--name=value`) and their aliases, shortcuts and
//!   negative forms (`--no-name`)
//! - bundled short flags (`-abc`, `-Dvalue`)
//! - positional arguments, including one trailing remainder argument
//! - subcommand words, with default subcommands
//!
//! Unrecognized input either fails the parse or, with
//! [`ParseOptions::allow_unmanaged`], is collected for passthrough.
//!
//! ```
//! use argtree::{ArgDecl, CommandDecl, FlagDecl, Schema, StringValue};
//!
//! let mut schema = Schema::new("app");
//! let root = schema.root();
//! schema.flag(root, FlagDecl::switch("verbose").short('v'));
//! let run = schema.command(root, CommandDecl::new("run"));
//! let target = schema.arg(run, ArgDecl::string("target").required());
//!
//! let matches = schema.parse(["run", "-v", "build"]).unwrap();
//! assert_eq!(matches.command(), "run");
//! assert_eq!(schema.arg_as::<StringValue>(target).unwrap().get(), "build");
//! ```

pub mod alias;
pub mod arg;
pub mod command;
pub mod error;
pub mod expand;
pub mod flag;
pub mod manifest;
pub mod model;
pub mod parser;
pub mod schema;
pub mod token;
pub mod value;

pub use arg::{ArgDecl, ArgGroup};
pub use command::{ArgId, CommandDecl, CommandId, CommandNode, FlagId};
pub use error::{Error, ErrorKind, Result};
pub use flag::{Envar, FlagDecl, FlagGroup};
pub use manifest::{ArgManifest, CommandManifest, FlagManifest, Manifest, ValueKind};
pub use model::ApplicationModel;
pub use parser::{ElementKind, Matches, ParseElement, ParseOptions};
pub use schema::Schema;
pub use token::{Token, TokenKind, TokenStream};
pub use value::{BoolValue, FloatValue, IntValue, StringValue, StringsValue, Value};
