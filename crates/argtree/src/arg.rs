//! Positional argument declarations and their ordering policy.

use crate::error::{Error, Result};
use crate::value::{BoolValue, FloatValue, IntValue, StringValue, StringsValue, Value};

#[derive(Debug)]
pub struct ArgDecl {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) required: bool,
    pub(crate) hidden: bool,
    pub(crate) defaults: Vec<String>,
    pub(crate) envar: Option<String>,
    pub(crate) value: Box<dyn Value>,
}

impl ArgDecl {
    pub fn new(name: impl Into<String>, value: impl Value + 'static) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            required: false,
            hidden: false,
            defaults: Vec::new(),
            envar: None,
            value: Box::new(value),
        }
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(name, BoolValue::default())
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, StringValue::default())
    }

    /// Consumes every remaining positional word.
    pub fn strings(name: impl Into<String>) -> Self {
        Self::new(name, StringsValue::default())
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, IntValue::default())
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FloatValue::default())
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

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.defaults.push(value.into());
        self
    }

    pub fn envar(mut self, name: impl Into<String>) -> Self {
        self.envar = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn envar_name(&self) -> Option<&str> {
        self.envar.as_deref()
    }

    /// Whether this argument absorbs all further positional words.
    pub fn consumes_remainder(&self) -> bool {
        self.value.is_cumulative()
    }

    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct ArgGroup {
    pub(crate) args: Vec<ArgDecl>,
}

impl ArgGroup {
    pub fn args(&self) -> &[ArgDecl] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub(crate) fn push(&mut self, arg: ArgDecl) -> usize {
        self.args.push(arg);
        self.args.len() - 1
    }

    /// Check declaration order: no required argument after an optional one,
    /// at most one remainder argument, and only in last position.
    pub fn validate(&self) -> Result<()> {
        let mut optional_seen = false;
        let mut remainder: Option<&ArgDecl> = None;
        for arg in &self.args {
            if let Some(first) = remainder {
                if arg.consumes_remainder() {
                    return Err(Error::MultipleRemainders {
                        first: first.name.clone(),
                        second: arg.name.clone(),
                    });
                }
                return Err(Error::RemainderNotLast {
                    arg: first.name.clone(),
                });
            }
            if arg.required && optional_seen {
                return Err(Error::RequiredAfterOptional {
                    arg: arg.name.clone(),
                });
            }
            optional_seen |= !arg.required;
            if arg.consumes_remainder() {
                remainder = Some(arg);
            }
        }
        Ok(())
    }
}
