//! Flag declarations and the per-command flag group.

use crate::value::{BoolValue, FloatValue, IntValue, StringValue, StringsValue, Value};

/// Where a flag reads its environment fallback from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Envar {
    /// Use the derived `APP_FLAG` name when default envars are enabled.
    #[default]
    Inherit,
    Named(String),
    Disabled,
}

/// A declared flag. Owned by exactly one [`FlagGroup`].
#[derive(Debug)]
pub struct FlagDecl {
    pub(crate) name: String,
    pub(crate) short: Option<char>,
    pub(crate) help: String,
    pub(crate) required: bool,
    pub(crate) hidden: bool,
    pub(crate) defaults: Vec<String>,
    pub(crate) envar: Envar,
    pub(crate) aliases: Vec<String>,
    pub(crate) auto_shortcut: Option<bool>,
    pub(crate) placeholder: Option<String>,
    pub(crate) value: Box<dyn Value>,
}

impl FlagDecl {
    pub fn new(name: impl Into<String>, value: impl Value + 'static) -> Self {
        Self {
            name: name.into(),
            short: None,
            help: String::new(),
            required: false,
            hidden: false,
            defaults: Vec::new(),
            envar: Envar::Inherit,
            aliases: Vec::new(),
            auto_shortcut: None,
            placeholder: None,
            value: Box::new(value),
        }
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(name, BoolValue::default())
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, StringValue::default())
    }

    pub fn strings(name: impl Into<String>) -> Self {
        Self::new(name, StringsValue::default())
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, IntValue::default())
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FloatValue::default())
    }

    pub fn short(mut self, letter: char) -> Self {
        self.short = Some(letter);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Add a default value. Cumulative flags may carry several.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.defaults.push(value.into());
        self
    }

    pub fn envar(mut self, name: impl Into<String>) -> Self {
        self.envar = Envar::Named(name.into());
        self
    }

    /// Opt out of the application-wide derived environment variable.
    pub fn no_envar(mut self) -> Self {
        self.envar = Envar::Disabled;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Override the group-level auto-shortcut setting for this flag.
    pub fn auto_shortcut(mut self, enabled: bool) -> Self {
        self.auto_shortcut = Some(enabled);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_letter(&self) -> Option<char> {
        self.short
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn envar_setting(&self) -> &Envar {
        &self.envar
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_switch(&self) -> bool {
        self.value.is_switch()
    }

    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    /// Whether a shortcut is generated for this flag, given the group default.
    pub(crate) fn shortcut_enabled(&self, group_default: bool) -> bool {
        self.auto_shortcut.unwrap_or(group_default)
    }
}

/// Flags declared on one command level.
#[derive(Debug, Default)]
pub struct FlagGroup {
    pub(crate) flags: Vec<FlagDecl>,
    pub(crate) auto_shortcut: bool,
}

impl FlagGroup {
    pub fn flags(&self) -> &[FlagDecl] {
        &self.flags
    }

    pub fn auto_shortcut(&self) -> bool {
        self.auto_shortcut
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub(crate) fn push(&mut self, flag: FlagDecl) -> usize {
        self.flags.push(flag);
        self.flags.len() - 1
    }
}
