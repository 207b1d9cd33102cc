//! Serializable description of a schema.
//!
//! A [`Manifest`] is plain data (typically JSON) that [`Manifest::build`]
//! turns into a [`Schema`].

use serde::{Deserialize, Serialize};

use crate::arg::ArgDecl;
use crate::command::{CommandDecl, CommandId};
use crate::error::{Error, Result};
use crate::flag::FlagDecl;
use crate::parser::ParseOptions;
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    #[default]
    String,
    Strings,
    Int,
    Float,
}

impl ValueKind {
    fn flag(self, name: &str) -> FlagDecl {
        match self {
            Self::Bool => FlagDecl::switch(name),
            Self::String => FlagDecl::string(name),
            Self::Strings => FlagDecl::strings(name),
            Self::Int => FlagDecl::int(name),
            Self::Float => FlagDecl::float(name),
        }
    }

    fn arg(self, name: &str) -> ArgDecl {
        match self {
            Self::Bool => ArgDecl::switch(name),
            Self::String => ArgDecl::string(name),
            Self::Strings => ArgDecl::strings(name),
            Self::Int => ArgDecl::int(name),
            Self::Float => ArgDecl::float(name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub default_envars: bool,
    #[serde(default)]
    pub auto_shortcut: bool,
    /// Parse options to use with this schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ParseOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envar: Option<String>,
    #[serde(default)]
    pub no_envar: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_shortcut: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgManifest {
    pub name: String,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub default: bool,
    /// Overrides the inherited auto-shortcut setting for this command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_shortcut: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandManifest>,
}

impl Manifest {
    pub fn build(&self) -> Result<Schema> {
        if self.name.is_empty() {
            return Err(Error::invalid_schema("application name is empty"));
        }
        let mut schema = Schema::new(&self.name);
        let root = schema.root();
        schema.help(&self.help);
        schema.default_envars(self.default_envars);
        schema.auto_shortcut(root, self.auto_shortcut);
        add_members(&mut schema, root, &self.flags, &self.args, &self.commands)?;
        Ok(schema)
    }

    /// Options from the manifest, or the defaults.
    pub fn parse_options(&self) -> ParseOptions {
        self.options.clone().unwrap_or_default()
    }
}

fn add_members(
    schema: &mut Schema,
    command: CommandId,
    flags: &[FlagManifest],
    args: &[ArgManifest],
    commands: &[CommandManifest],
) -> Result<()> {
    for flag in flags {
        schema.flag(command, flag.to_decl()?);
    }
    for arg in args {
        schema.arg(command, arg.to_decl()?);
    }
    for sub in commands {
        if sub.name.is_empty() {
            return Err(Error::invalid_schema(format!(
                "command under '{}' has an empty name",
                schema.display_name(command)
            )));
        }
        let mut decl = CommandDecl::new(&sub.name).help(&sub.help);
        for alias in &sub.aliases {
            decl = decl.alias(alias);
        }
        if sub.hidden {
            decl = decl.hidden();
        }
        if sub.default {
            decl = decl.default();
        }
        let id = schema.command(command, decl);
        if let Some(enabled) = sub.auto_shortcut {
            schema.auto_shortcut(id, enabled);
        }
        add_members(schema, id, &sub.flags, &sub.args, &sub.commands)?;
    }
    Ok(())
}

impl FlagManifest {
    fn to_decl(&self) -> Result<FlagDecl> {
        if self.name.is_empty() {
            return Err(Error::invalid_schema("flag with an empty name"));
        }
        if self.short.is_some_and(|c| c == '-' || c.is_whitespace()) {
            return Err(Error::invalid_schema(format!(
                "flag '{}' has an invalid short letter",
                self.name
            )));
        }
        let mut decl = self.kind.flag(&self.name).help(&self.help);
        if let Some(letter) = self.short {
            decl = decl.short(letter);
        }
        if self.required {
            decl = decl.required();
        }
        if self.hidden {
            decl = decl.hidden();
        }
        for value in &self.default {
            decl = decl.default(value);
        }
        if let Some(envar) = &self.envar {
            decl = decl.envar(envar);
        }
        if self.no_envar {
            decl = decl.no_envar();
        }
        for alias in &self.aliases {
            decl = decl.alias(alias);
        }
        if let Some(enabled) = self.auto_shortcut {
            decl = decl.auto_shortcut(enabled);
        }
        if let Some(placeholder) = &self.placeholder {
            decl = decl.placeholder(placeholder);
        }
        Ok(decl)
    }
}

impl ArgManifest {
    fn to_decl(&self) -> Result<ArgDecl> {
        if self.name.is_empty() {
            return Err(Error::invalid_schema("argument with an empty name"));
        }
        let mut decl = self.kind.arg(&self.name).help(&self.help);
        if self.required {
            decl = decl.required();
        }
        if self.hidden {
            decl = decl.hidden();
        }
        for value in &self.default {
            decl = decl.default(value);
        }
        if let Some(envar) = &self.envar {
            decl = decl.envar(envar);
        }
        Ok(decl)
    }
}
