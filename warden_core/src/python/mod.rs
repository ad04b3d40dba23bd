//! Python language glue: parsing and AST traversal helpers.

pub mod ast_ext;
pub mod rules;

use rustpython_ast::{Mod, Suite};
use rustpython_parser::{Mode, ParseError};

/// Parse `source` into a module's statement list.
///
/// A syntax error is not a scan failure: an unparsable file simply
/// contributes no findings rather than aborting the whole scan.
pub fn parse_module(source: &str, filename: &str) -> Result<Suite, ParseError> {
    let parsed = rustpython_parser::parse(source, Mode::Module, filename)?;
    match parsed {
        Mod::Module(module) => Ok(module.body),
        _ => Ok(Vec::new()),
    }
}
