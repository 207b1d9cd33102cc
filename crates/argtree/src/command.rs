//! Command tree: nodes, handles and subcommand matching.
//!
//! Nodes live in the [`Schema`] arena and refer to each other by
//! [`CommandId`]; the parent link is a plain index, the root has none.

use crate::arg::ArgGroup;
use crate::error::{Error, Result};
use crate::flag::FlagGroup;
use crate::schema::Schema;

/// Handle to a command node. [`CommandId::ROOT`] is the application itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// Handle to a flag: the declaring command and the position in its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagId {
    pub(crate) command: CommandId,
    pub(crate) index: usize,
}

impl FlagId {
    pub fn command(self) -> CommandId {
        self.command
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgId {
    pub(crate) command: CommandId,
    pub(crate) index: usize,
}

impl ArgId {
    pub fn command(self) -> CommandId {
        self.command
    }
}

/// Declaration of a subcommand.
#[derive(Debug, Clone, Default)]
pub struct CommandDecl {
    name: String,
    aliases: Vec<String>,
    help: String,
    hidden: bool,
    default: bool,
}

impl CommandDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Select this command when its parent is reached without a command word.
    pub fn default(mut self) -> Self {
        self.default = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) help: String,
    pub(crate) hidden: bool,
    pub(crate) is_default: bool,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) flags: FlagGroup,
    pub(crate) args: ArgGroup,
}

impl CommandNode {
    pub(crate) fn root(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub(crate) fn from_decl(decl: CommandDecl, parent: CommandId, auto_shortcut: bool) -> Self {
        Self {
            name: decl.name,
            aliases: decl.aliases,
            help: decl.help,
            hidden: decl.hidden,
            is_default: decl.default,
            parent: Some(parent),
            children: Vec::new(),
            flags: FlagGroup {
                flags: Vec::new(),
                auto_shortcut,
            },
            args: ArgGroup::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub fn flags(&self) -> &FlagGroup {
        &self.flags
    }

    pub fn args(&self) -> &ArgGroup {
        &self.args
    }

    /// A node with children only dispatches; it takes no positional words.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|alias| alias == word)
    }
}

impl Schema {
    /// The child of `id` named `word` (by name or alias).
    pub fn match_child(&self, id: CommandId, word: &str) -> Option<CommandId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).answers_to(word))
    }

    /// The child of `id` marked default, if any.
    pub fn default_child(&self, id: CommandId) -> Option<CommandId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).is_default)
    }

    /// Names from the first subcommand down to `id`, space-separated. Empty
    /// for the root.
    pub fn full_command(&self, id: CommandId) -> String {
        self.lineage(id)
            .iter()
            .map(|&cmd| self.node(cmd).name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of command words needed to reach `id`; 0 for the root.
    pub fn depth(&self, id: CommandId) -> usize {
        self.lineage(id).len()
    }

    /// `id` and its ancestors below the root, outermost first.
    pub(crate) fn lineage(&self, id: CommandId) -> Vec<CommandId> {
        let mut out = Vec::new();
        let mut cursor = Some(id);
        while let Some(cmd) = cursor {
            if cmd.is_root() {
                break;
            }
            out.push(cmd);
            cursor = self.node(cmd).parent;
        }
        out.reverse();
        out
    }

    /// Structural checks run when a node becomes active during a parse.
    pub(crate) fn validate_node(&self, id: CommandId) -> Result<()> {
        let node = self.node(id);
        if !node.children.is_empty() && !node.args.is_empty() {
            return Err(Error::ArgsWithCommands {
                command: self.display_name(id),
            });
        }
        let mut defaults = node
            .children
            .iter()
            .filter(|&&child| self.node(child).is_default);
        if let (Some(&first), Some(&second)) = (defaults.next(), defaults.next()) {
            return Err(Error::MultipleDefaults {
                command: self.display_name(id),
                first: self.node(first).name.clone(),
                second: self.node(second).name.clone(),
            });
        }
        node.args.validate()
    }

    /// Full command, or the application name for the root.
    pub(crate) fn display_name(&self, id: CommandId) -> String {
        if id.is_root() {
            self.node(id).name.clone()
        } else {
            self.full_command(id)
        }
    }
}
