//! Value sinks bound by flags and positional arguments.
//!
//! The parser only talks to the [`Value`] trait; concrete kinds decide how a
//! raw string is converted and whether they behave as a switch or accept
//! multiple assignments.

use std::any::Any;
use std::fmt;

/// Capability interface for anything a flag or argument can bind into.
pub trait Value: fmt::Debug {
    /// Convert `raw` and store it. The error is a human-readable reason.
    fn set(&mut self, raw: &str) -> Result<(), String>;

    /// Render the current value.
    fn render(&self) -> String;

    /// Restore the zero value. Called at the start of every parse.
    fn reset(&mut self);

    /// A switch takes no value token; its presence alone sets it.
    fn is_switch(&self) -> bool {
        false
    }

    /// Cumulative values accept repeated assignments.
    fn is_cumulative(&self) -> bool {
        false
    }

    /// Numeric values accept `-123`-looking tokens as a value.
    fn accepts_negative_numbers(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}

/// Boolean switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolValue(bool);

impl BoolValue {
    pub fn get(&self) -> bool {
        self.0
    }
}

impl Value for BoolValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = match raw {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
            "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
            other => return Err(format!("'{other}' is not a boolean")),
        };
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }

    fn reset(&mut self) {
        self.0 = false;
    }

    fn is_switch(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringValue(String);

impl StringValue {
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Value for StringValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = raw.to_string();
        Ok(())
    }

    fn render(&self) -> String {
        self.0.clone()
    }

    fn reset(&mut self) {
        self.0.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accumulates every assignment. As an argument it consumes the remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringsValue(Vec<String>);

impl StringsValue {
    pub fn get(&self) -> &[String] {
        &self.0
    }
}

impl Value for StringsValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0.push(raw.to_string());
        Ok(())
    }

    fn render(&self) -> String {
        self.0.join(",")
    }

    fn reset(&mut self) {
        self.0.clear();
    }

    fn is_cumulative(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntValue(i64);

impl IntValue {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Value for IntValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = raw.parse().map_err(|e| format!("{e}"))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }

    fn reset(&mut self) {
        self.0 = 0;
    }

    fn accepts_negative_numbers(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatValue(f64);

impl FloatValue {
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Value for FloatValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = raw.parse().map_err(|e| format!("{e}"))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }

    fn reset(&mut self) {
        self.0 = 0.0;
    }

    fn accepts_negative_numbers(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `-123`, `-1.5`; not `-x` or `-`.
pub(crate) fn is_negative_number(text: &str) -> bool {
    text.strip_prefix('-')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()) && rest.parse::<f64>().is_ok())
}
