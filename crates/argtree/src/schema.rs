//! The declared schema: an arena of command nodes with their flags and
//! positional arguments, plus the entry points for parsing.

use crate::alias::{AliasTable, FlagEntry};
use crate::arg::ArgDecl;
use crate::command::{ArgId, CommandDecl, CommandId, CommandNode, FlagId};
use crate::error::Result;
use crate::expand::expand_args;
use crate::flag::{Envar, FlagDecl};
use crate::parser::{Matches, ParseContext, ParseOptions};
use crate::value::Value;

#[derive(Debug)]
pub struct Schema {
    pub(crate) nodes: Vec<CommandNode>,
    pub(crate) default_envars: bool,
}

impl Schema {
    /// Create a schema whose root is the application `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![CommandNode::root(name.into())],
            default_envars: false,
        }
    }

    pub fn root(&self) -> CommandId {
        CommandId::ROOT
    }

    pub fn name(&self) -> &str {
        &self.nodes[0].name
    }

    /// Application help text.
    pub fn help(&mut self, help: impl Into<String>) {
        self.nodes[0].help = help.into();
    }

    /// Declare a subcommand of `parent`. The child starts with the parent's
    /// auto-shortcut setting.
    pub fn command(&mut self, parent: CommandId, decl: CommandDecl) -> CommandId {
        let id = CommandId(self.nodes.len());
        let auto_shortcut = self.node(parent).flags.auto_shortcut;
        self.nodes
            .push(CommandNode::from_decl(decl, parent, auto_shortcut));
        self.node_mut(parent).children.push(id);
        id
    }

    pub fn flag(&mut self, command: CommandId, decl: FlagDecl) -> FlagId {
        let index = self.node_mut(command).flags.push(decl);
        FlagId { command, index }
    }

    pub fn arg(&mut self, command: CommandId, decl: ArgDecl) -> ArgId {
        let index = self.node_mut(command).args.push(decl);
        ArgId { command, index }
    }

    /// Group-level auto-shortcut default for the flags of `command`.
    pub fn auto_shortcut(&mut self, command: CommandId, enabled: bool) {
        self.node_mut(command).flags.auto_shortcut = enabled;
    }

    /// Derive `APP_FLAG_NAME` environment variables for every flag that does
    /// not name or disable its own.
    pub fn default_envars(&mut self, enabled: bool) {
        self.default_envars = enabled;
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this schema.
    pub fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: CommandId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Every command, root first, in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = CommandId> {
        (0..self.nodes.len()).map(CommandId)
    }

    pub fn flag_decl(&self, id: FlagId) -> &FlagDecl {
        &self.node(id.command).flags.flags[id.index]
    }

    pub(crate) fn flag_decl_mut(&mut self, id: FlagId) -> &mut FlagDecl {
        &mut self.node_mut(id.command).flags.flags[id.index]
    }

    pub fn arg_decl(&self, id: ArgId) -> &ArgDecl {
        &self.node(id.command).args.args[id.index]
    }

    pub(crate) fn arg_decl_mut(&mut self, id: ArgId) -> &mut ArgDecl {
        &mut self.node_mut(id.command).args.args[id.index]
    }

    pub fn flag_ids(&self, command: CommandId) -> impl Iterator<Item = FlagId> {
        (0..self.node(command).flags.flags.len()).map(move |index| FlagId { command, index })
    }

    pub fn arg_ids(&self, command: CommandId) -> impl Iterator<Item = ArgId> {
        (0..self.node(command).args.args.len()).map(move |index| ArgId { command, index })
    }

    /// Look up a flag declared directly on `command` by long name.
    pub fn find_flag(&self, command: CommandId, name: &str) -> Option<FlagId> {
        self.flag_ids(command)
            .find(|&id| self.flag_decl(id).name == name)
    }

    pub fn find_arg(&self, command: CommandId, name: &str) -> Option<ArgId> {
        self.arg_ids(command)
            .find(|&id| self.arg_decl(id).name == name)
    }

    pub fn flag_value(&self, id: FlagId) -> &dyn Value {
        self.flag_decl(id).value()
    }

    pub fn arg_value(&self, id: ArgId) -> &dyn Value {
        self.arg_decl(id).value()
    }

    /// Typed view of a flag's value; `None` if it is not a `T`.
    pub fn flag_as<T: Value + 'static>(&self, id: FlagId) -> Option<&T> {
        self.flag_value(id).as_any().downcast_ref()
    }

    pub fn arg_as<T: Value + 'static>(&self, id: ArgId) -> Option<&T> {
        self.arg_value(id).as_any().downcast_ref()
    }

    /// The environment variable a flag falls back to, if any.
    pub fn envar_for(&self, id: FlagId) -> Option<String> {
        let flag = self.flag_decl(id);
        match &flag.envar {
            Envar::Named(name) => Some(name.clone()),
            Envar::Disabled => None,
            Envar::Inherit if self.default_envars => Some(envar_name(self.name(), &flag.name)),
            Envar::Inherit => None,
        }
    }

    /// Alias table over a set of flags, each with its group's shortcut
    /// setting.
    pub(crate) fn alias_table(&self, scope: &[FlagId]) -> Result<AliasTable> {
        let entries: Vec<FlagEntry<'_>> = scope
            .iter()
            .map(|&id| {
                let group = &self.node(id.command).flags;
                let flag = &group.flags[id.index];
                FlagEntry {
                    id,
                    name: &flag.name,
                    aliases: &flag.aliases,
                    switch: flag.is_switch(),
                    auto_shortcut: flag.shortcut_enabled(group.auto_shortcut),
                }
            })
            .collect();
        AliasTable::build(&entries)
    }

    fn reset_values(&mut self) {
        for node in &mut self.nodes {
            for flag in &mut node.flags.flags {
                flag.value.reset();
            }
            for arg in &mut node.args.args {
                arg.value.reset();
            }
        }
    }

    /// Parse `args` (program name excluded) with default options.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Matches>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with(args, &ParseOptions::default())
    }

    /// Parse `args` (program name excluded).
    ///
    /// Every value is reset first. On failure, values bound before the
    /// failing token keep their state and unbound ones still receive their
    /// env value or default.
    pub fn parse_with<I, S>(&mut self, args: I, options: &ParseOptions) -> Result<Matches>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = args.into_iter().map(Into::into).collect();
        if options.expand_files {
            words = expand_args(words)?;
        }
        self.reset_values();
        ParseContext::new(self, options, words).run()
    }
}

/// `some-app` + `some-flag` -> `SOME_APP_SOME_FLAG`.
pub fn envar_name(app: &str, flag: &str) -> String {
    format!("{app}_{flag}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{IntValue, StringValue};

    #[test]
    fn derived_envar_names() {
        assert_eq!(envar_name("some-app", "some-flag"), "SOME_APP_SOME_FLAG");
        assert_eq!(envar_name("some-app", "a-1-flag"), "SOME_APP_A_1_FLAG");
    }

    #[test]
    fn envar_resolution_follows_flag_setting() {
        let mut schema = Schema::new("some-app");
        let root = schema.root();
        let inherit = schema.flag(root, FlagDecl::string("some-flag"));
        let named = schema.flag(root, FlagDecl::string("other").envar("OTHER_VAR"));
        let disabled = schema.flag(root, FlagDecl::string("secret").no_envar());

        assert_eq!(schema.envar_for(inherit), None);
        assert_eq!(schema.envar_for(named).as_deref(), Some("OTHER_VAR"));

        schema.default_envars(true);
        assert_eq!(schema.envar_for(inherit).as_deref(), Some("SOME_APP_SOME_FLAG"));
        assert_eq!(schema.envar_for(disabled), None);
    }

    #[test]
    fn typed_access_downcasts() {
        let mut schema = Schema::new("app");
        let root = schema.root();
        let count = schema.flag(root, FlagDecl::int("count"));
        let name = schema.arg(root, ArgDecl::string("name"));
        schema.parse(["--count", "3", "bob"]).unwrap();

        assert_eq!(schema.flag_as::<IntValue>(count).map(IntValue::get), Some(3));
        assert_eq!(schema.arg_as::<StringValue>(name).map(StringValue::get), Some("bob"));
        assert!(schema.flag_as::<StringValue>(count).is_none());
        assert_eq!(schema.find_flag(root, "count"), Some(count));
        assert_eq!(schema.find_arg(root, "name"), Some(name));
    }

    #[test]
    fn children_inherit_auto_shortcut_setting() {
        let mut schema = Schema::new("app");
        let root = schema.root();
        schema.auto_shortcut(root, true);
        let sub = schema.command(root, CommandDecl::new("sub"));
        assert!(schema.node(sub).flags().auto_shortcut());
        assert_eq!(schema.node(sub).parent(), Some(root));
        assert_eq!(schema.commands().count(), 2);
    }
}
