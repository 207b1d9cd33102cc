//! Read-only model of a schema, for documentation and tooling.

use serde::Serialize;

use crate::alias::AliasKind;
use crate::command::{CommandId, FlagId};
use crate::error::Result;
use crate::schema::Schema;
use crate::value::StringValue;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationModel {
    pub name: String,
    pub help: String,
    pub flags: FlagGroupModel,
    pub args: ArgGroupModel,
    pub commands: CmdGroupModel,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FlagGroupModel {
    pub flags: Vec<FlagModel>,
}

impl FlagGroupModel {
    /// `--[no-]switch --name=PLACEHOLDER [<flags>]`: required flags, plus a
    /// marker when optional ones exist.
    pub fn flag_summary(&self) -> String {
        let mut out: Vec<String> = self
            .flags
            .iter()
            .filter(|flag| flag.required)
            .map(|flag| {
                if flag.switch {
                    format!("--[no-]{}", flag.name)
                } else {
                    format!("--{}={}", flag.name, flag.format_placeholder())
                }
            })
            .collect();
        if out.len() != self.flags.len() {
            out.push("[<flags>]".to_string());
        }
        out.join(" ")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagModel {
    pub name: String,
    pub help: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envar: Option<String>,
    /// Positive aliases and shortcuts, sorted.
    pub aliases: Vec<String>,
    pub negative_aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    pub hidden: bool,
    pub switch: bool,
    pub value: String,
    #[serde(skip)]
    quote_defaults: bool,
}

impl FlagModel {
    /// Placeholder for the flag's value in usage lines: the declared
    /// placeholder, else the first default (`...` when there are several),
    /// else the upper-cased name.
    pub fn format_placeholder(&self) -> String {
        if let Some(placeholder) = &self.placeholder {
            return placeholder.clone();
        }
        if let Some(first) = self.defaults.first() {
            let ellipsis = if self.defaults.len() > 1 { "..." } else { "" };
            if self.quote_defaults {
                return format!("{first:?}{ellipsis}");
            }
            return format!("{first}{ellipsis}");
        }
        self.name.to_uppercase()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ArgGroupModel {
    pub args: Vec<ArgModel>,
}

impl ArgGroupModel {
    /// `<a> [<b> [<c>]]`. Empty when there are no arguments.
    pub fn arg_summary(&self) -> String {
        let mut depth = 0;
        let mut out: Vec<String> = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            if arg.required {
                out.push(format!("<{}>", arg.name));
            } else {
                depth += 1;
                out.push(format!("[<{}>", arg.name));
            }
        }
        if let Some(last) = out.last_mut() {
            last.push_str(&"]".repeat(depth));
        }
        out.join(" ")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgModel {
    pub name: String,
    pub help: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envar: Option<String>,
    pub required: bool,
    pub hidden: bool,
    pub remainder: bool,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CmdGroupModel {
    pub commands: Vec<CommandModel>,
}

impl CmdGroupModel {
    /// Leaf commands, depth first.
    pub fn flattened_commands(&self) -> Vec<&CommandModel> {
        let mut out = Vec::new();
        for cmd in &self.commands {
            if cmd.commands.commands.is_empty() {
                out.push(cmd);
            }
            out.extend(cmd.commands.flattened_commands());
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub help: String,
    pub full_command: String,
    pub depth: usize,
    pub hidden: bool,
    pub default: bool,
    pub flags: FlagGroupModel,
    pub args: ArgGroupModel,
    pub commands: CmdGroupModel,
}

impl Schema {
    /// Snapshot the schema. Fails if a flag group has conflicting aliases.
    pub fn model(&self) -> Result<ApplicationModel> {
        let root = self.node(CommandId::ROOT);
        Ok(ApplicationModel {
            name: root.name.clone(),
            help: root.help.clone(),
            flags: self.flag_group_model(CommandId::ROOT)?,
            args: self.arg_group_model(CommandId::ROOT),
            commands: self.cmd_group_model(CommandId::ROOT)?,
        })
    }

    fn cmd_group_model(&self, id: CommandId) -> Result<CmdGroupModel> {
        let commands: Vec<CommandModel> = self
            .node(id)
            .children
            .iter()
            .map(|&child| self.command_model(child))
            .collect::<Result<_>>()?;
        Ok(CmdGroupModel { commands })
    }

    fn command_model(&self, id: CommandId) -> Result<CommandModel> {
        let node = self.node(id);
        Ok(CommandModel {
            name: node.name.clone(),
            aliases: node.aliases.clone(),
            help: node.help.clone(),
            full_command: self.full_command(id),
            depth: self.depth(id),
            hidden: node.hidden,
            default: node.is_default,
            flags: self.flag_group_model(id)?,
            args: self.arg_group_model(id),
            commands: self.cmd_group_model(id)?,
        })
    }

    fn flag_group_model(&self, id: CommandId) -> Result<FlagGroupModel> {
        let ids: Vec<FlagId> = self.flag_ids(id).collect();
        let table = self.alias_table(&ids)?;
        let flags = ids
            .iter()
            .map(|&fid| {
                let flag = self.flag_decl(fid);
                let mut aliases: Vec<String> = table
                    .spellings(fid, AliasKind::Positive)
                    .chain(table.spellings(fid, AliasKind::Shortcut))
                    .map(str::to_string)
                    .collect();
                aliases.sort();
                let mut negative_aliases: Vec<String> = table
                    .spellings(fid, AliasKind::Negative)
                    .map(str::to_string)
                    .collect();
                negative_aliases.sort();
                FlagModel {
                    name: flag.name.clone(),
                    help: flag.help.clone(),
                    short: flag.short,
                    defaults: flag.defaults.clone(),
                    envar: self.envar_for(fid),
                    aliases,
                    negative_aliases,
                    placeholder: flag.placeholder.clone(),
                    required: flag.required,
                    hidden: flag.hidden,
                    switch: flag.is_switch(),
                    value: flag.value.render(),
                    quote_defaults: flag.value.as_any().is::<StringValue>(),
                }
            })
            .collect();
        Ok(FlagGroupModel { flags })
    }

    fn arg_group_model(&self, id: CommandId) -> ArgGroupModel {
        let args = self
            .arg_ids(id)
            .map(|aid| {
                let arg = self.arg_decl(aid);
                ArgModel {
                    name: arg.name.clone(),
                    help: arg.help.clone(),
                    defaults: arg.defaults.clone(),
                    envar: arg.envar.clone(),
                    required: arg.required,
                    hidden: arg.hidden,
                    remainder: arg.consumes_remainder(),
                    value: arg.value.render(),
                }
            })
            .collect();
        ArgGroupModel { args }
    }
}
