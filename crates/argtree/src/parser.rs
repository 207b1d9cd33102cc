//! The parse driver: walks a token stream against the command tree, binding
//! flags and positional arguments as it goes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::alias::AliasTable;
use crate::command::{ArgId, CommandId, FlagId};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::token::{Token, TokenKind, TokenStream};
use crate::value::is_negative_number;

/// Per-parse configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParseOptions {
    /// Flags may appear between positional arguments. When off, the first
    /// positional argument of a command ends flag recognition for it.
    pub interspersed: bool,
    /// Collect unrecognized tokens instead of failing.
    pub allow_unmanaged: bool,
    /// Replace `@file` words with the lines of the file.
    pub expand_files: bool,
    /// Environment used for flag and argument fallbacks.
    pub env: Vec<(String, String)>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            interspersed: true,
            allow_unmanaged: false,
            expand_files: true,
            env: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn interspersed(mut self, enabled: bool) -> Self {
        self.interspersed = enabled;
        self
    }

    pub fn allow_unmanaged(mut self, enabled: bool) -> Self {
        self.allow_unmanaged = enabled;
        self
    }

    pub fn expand_files(mut self, enabled: bool) -> Self {
        self.expand_files = enabled;
        self
    }

    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Snapshot the process environment.
    pub fn with_process_env(self) -> Self {
        self.env(std::env::vars())
    }

    pub fn env_lookup(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Command(CommandId),
    Flag(FlagId),
    Arg(ArgId),
}

/// One consumed element, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseElement {
    pub kind: ElementKind,
    /// Raw value bound to a flag or argument; `None` for commands.
    pub value: Option<String>,
}

/// Outcome of a successful parse. Values live in the [`Schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    path: Vec<String>,
    selected: Option<CommandId>,
    unmanaged: Vec<String>,
    flags: Vec<FlagId>,
    args: Vec<ArgId>,
    elements: Vec<ParseElement>,
}

impl Matches {
    /// Matched command names joined by spaces; empty without subcommands.
    pub fn command(&self) -> String {
        self.path.join(" ")
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The innermost matched command, `None` if parsing stayed at the root.
    pub fn selected(&self) -> Option<CommandId> {
        self.selected
    }

    /// Tokens that matched nothing, in input order.
    pub fn unmanaged(&self) -> &[String] {
        &self.unmanaged
    }

    /// Every flag in scope at the selected command.
    pub fn flags(&self) -> &[FlagId] {
        &self.flags
    }

    /// Positional arguments of every visited command.
    pub fn args(&self) -> &[ArgId] {
        &self.args
    }

    pub fn elements(&self) -> &[ParseElement] {
        &self.elements
    }

    /// Whether `flag` was given on the command line (not from env/default).
    pub fn is_explicit(&self, flag: FlagId) -> bool {
        self.elements
            .iter()
            .any(|e| e.kind == ElementKind::Flag(flag))
    }
}

/// Mutable state of one parse.
pub(crate) struct ParseContext<'a> {
    schema: &'a mut Schema,
    options: &'a ParseOptions,
    stream: TokenStream,
    current: CommandId,
    path: Vec<CommandId>,
    /// Flags in scope, outermost level first.
    scope: Vec<FlagId>,
    long: HashMap<String, FlagId>,
    short: HashMap<char, FlagId>,
    aliases: Option<AliasTable>,
    next_arg: usize,
    seen: HashSet<FlagId>,
    filled: HashSet<ArgId>,
    defaulted_flags: HashSet<FlagId>,
    defaulted_args: HashSet<ArgId>,
    elements: Vec<ParseElement>,
    unmanaged: Vec<String>,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(schema: &'a mut Schema, options: &'a ParseOptions, words: Vec<String>) -> Self {
        Self {
            schema,
            options,
            stream: TokenStream::new(words),
            current: CommandId::ROOT,
            path: Vec::new(),
            scope: Vec::new(),
            long: HashMap::new(),
            short: HashMap::new(),
            aliases: None,
            next_arg: 0,
            seen: HashSet::new(),
            filled: HashSet::new(),
            defaulted_flags: HashSet::new(),
            defaulted_args: HashSet::new(),
            elements: Vec::new(),
            unmanaged: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Matches> {
        debug!(
            app = self.schema.name(),
            unmanaged = self.options.allow_unmanaged,
            interspersed = self.options.interspersed,
            "parse started"
        );
        if let Err(err) = self.walk() {
            self.settle_after_failure();
            return Err(err);
        }
        self.finish()
    }

    fn walk(&mut self) -> Result<()> {
        self.enter(CommandId::ROOT)?;
        loop {
            let token = self.stream.peek();
            trace!(kind = ?token.kind(), token = %token, "dispatch");
            match token.kind() {
                TokenKind::Eol => return Ok(()),
                TokenKind::EndOfOptions => {
                    self.stream.next();
                }
                TokenKind::Long => self.parse_long()?,
                TokenKind::Short => self.parse_short()?,
                TokenKind::Arg | TokenKind::Value => self.parse_positional()?,
            }
        }
    }

    /// After a failed walk, still reach the default commands and fill
    /// unbound values. The walk's error is the one reported.
    fn settle_after_failure(&mut self) {
        while let Some(child) = self.schema.default_child(self.current) {
            if self.enter(child).is_err() {
                break;
            }
        }
        let args = self.visited_args();
        if let Err(err) = self.apply_defaults(&args) {
            debug!(%err, "defaults after failed parse");
        }
    }

    /// Make `id` the active command: merge its flags into scope and rebuild
    /// the alias table.
    fn enter(&mut self, id: CommandId) -> Result<()> {
        self.schema.validate_node(id)?;
        let node = self.schema.node(id);
        for (index, flag) in node.flags.flags.iter().enumerate() {
            let fid = FlagId { command: id, index };
            if let Some(shadowed) = self.long.insert(flag.name.clone(), fid) {
                self.scope.retain(|&f| f != shadowed);
                self.short.retain(|_, f| *f != shadowed);
            }
            if let Some(letter) = flag.short {
                self.short.insert(letter, fid);
            }
            self.scope.push(fid);
        }
        if !id.is_root() {
            debug!(command = %self.schema.full_command(id), "entered command");
            self.path.push(id);
            self.elements.push(ParseElement {
                kind: ElementKind::Command(id),
                value: None,
            });
        }
        self.current = id;
        self.next_arg = 0;
        self.stream.release_positional();
        self.reset_aliases();
        self.ensure_aliases()
    }

    fn reset_aliases(&mut self) {
        self.aliases = None;
    }

    fn ensure_aliases(&mut self) -> Result<()> {
        if self.aliases.is_none() {
            let table = self.schema.alias_table(&self.scope)?;
            self.aliases = Some(table);
        }
        Ok(())
    }

    /// Long names first, then the alias table. The flag is returned with
    /// its invert signal.
    fn resolve(&mut self, name: &str) -> Result<Option<(FlagId, bool)>> {
        if let Some(&id) = self.long.get(name) {
            return Ok(Some((id, false)));
        }
        self.resolve_alias(name)
    }

    fn resolve_alias(&mut self, name: &str) -> Result<Option<(FlagId, bool)>> {
        self.ensure_aliases()?;
        Ok(self
            .aliases
            .as_ref()
            .and_then(|table| table.get(name))
            .map(|alias| (alias.flag, alias.inverts())))
    }

    fn parse_long(&mut self) -> Result<()> {
        let token = self.stream.next();
        let body = &token.text()[2..];
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (body.to_string(), None),
        };

        let Some((id, invert)) = self.resolve(&name)? else {
            return self.unknown_long(token, name, inline.is_some());
        };
        self.bind_resolved(id, invert, inline)
    }

    fn unknown_long(&mut self, token: Token, name: String, has_inline: bool) -> Result<()> {
        if let Some(child) = self.schema.default_child(self.current) {
            self.stream.push(token);
            return self.enter(child);
        }
        if self.options.allow_unmanaged {
            trace!(token = %token, "unmanaged");
            self.unmanaged.push(token.into_text());
            if !has_inline && self.stream.peek().kind() == TokenKind::Arg {
                self.unmanaged.push(self.stream.next().into_text());
            }
            return Ok(());
        }
        Err(Error::UnknownLongFlag { flag: name })
    }

    /// Bind a flag reached through a long name or alias.
    fn bind_resolved(&mut self, id: FlagId, invert: bool, inline: Option<String>) -> Result<()> {
        let flag = self.schema.flag_decl(id);
        if flag.is_switch() {
            if inline.is_some() {
                return Err(Error::FlagTakesNoValue {
                    flag: flag.name.clone(),
                });
            }
            return self.bind_flag(id, if invert { "false" } else { "true" });
        }
        if let Some(value) = inline {
            self.stream.push(Token::value(value));
        }
        let value = self.take_value(id)?;
        self.bind_flag(id, &value)
    }

    /// Expand `-abc` letter by letter. Nothing is bound unless every letter
    /// resolves.
    fn parse_short(&mut self) -> Result<()> {
        let token = self.stream.next();
        let body = token.text()[1..].to_string();

        let mut pending: Vec<(FlagId, String)> = Vec::new();
        let mut unknown = None;
        for (pos, letter) in body.char_indices() {
            let Some(&id) = self.short.get(&letter) else {
                unknown = Some(letter);
                break;
            };
            if self.schema.flag_decl(id).is_switch() {
                pending.push((id, "true".to_string()));
                continue;
            }
            let rest = &body[pos + letter.len_utf8()..];
            if !rest.is_empty() {
                self.stream.push(Token::value(rest));
            }
            let value = self.take_value(id)?;
            pending.push((id, value));
            break;
        }

        let Some(letter) = unknown else {
            for (id, value) in pending {
                self.bind_flag(id, &value)?;
            }
            return Ok(());
        };

        if body.chars().count() > 1 {
            if let Some((id, invert)) = self.resolve_alias(&body)? {
                return self.bind_resolved(id, invert, None);
            }
        }
        if let Some(child) = self.schema.default_child(self.current) {
            self.stream.push(token);
            return self.enter(child);
        }
        if self.options.allow_unmanaged {
            trace!(token = %token, "unmanaged");
            self.unmanaged.push(token.into_text());
            return Ok(());
        }
        Err(Error::UnknownShortFlag { flag: letter })
    }

    /// Consume the value of a non-switch flag from the stream.
    fn take_value(&mut self, id: FlagId) -> Result<String> {
        let next = self.stream.peek();
        let flag = self.schema.flag_decl(id);
        let accepted = next.is_positional()
            || (next.kind() == TokenKind::Short
                && flag.value().accepts_negative_numbers()
                && is_negative_number(next.text()));
        if !accepted {
            return Err(Error::MissingFlagValue {
                flag: flag.name.clone(),
            });
        }
        Ok(self.stream.next().into_text())
    }

    fn bind_flag(&mut self, id: FlagId, raw: &str) -> Result<()> {
        let flag = self.schema.flag_decl_mut(id);
        if self.seen.contains(&id) && !flag.value.is_cumulative() {
            return Err(Error::RepeatedFlag {
                flag: flag.name.clone(),
            });
        }
        flag.value.set(raw).map_err(|reason| Error::InvalidFlagValue {
            flag: flag.name.clone(),
            value: raw.to_string(),
            reason,
        })?;
        trace!(flag = %flag.name, value = raw, "bound flag");
        self.seen.insert(id);
        self.elements.push(ParseElement {
            kind: ElementKind::Flag(id),
            value: Some(raw.to_string()),
        });
        Ok(())
    }

    fn parse_positional(&mut self) -> Result<()> {
        if !self.schema.node(self.current).is_leaf() {
            let word = self.stream.peek();
            if let Some(child) = self.schema.match_child(self.current, word.text()) {
                self.stream.next();
                return self.enter(child);
            }
            if let Some(child) = self.schema.default_child(self.current) {
                return self.enter(child);
            }
            return Err(Error::UnknownCommand {
                token: word.into_text(),
            });
        }

        let token = self.stream.next();
        if self.next_arg < self.schema.node(self.current).args.args.len() {
            let id = ArgId {
                command: self.current,
                index: self.next_arg,
            };
            self.bind_arg(id, token.text())?;
            if !self.schema.arg_decl(id).consumes_remainder() {
                self.next_arg += 1;
            }
            if !self.options.interspersed {
                self.stream.force_positional();
            }
            return Ok(());
        }

        if self.options.allow_unmanaged {
            trace!(token = %token, "unmanaged");
            self.unmanaged.push(token.into_text());
            return Ok(());
        }
        Err(Error::UnexpectedArgument {
            token: token.into_text(),
        })
    }

    fn bind_arg(&mut self, id: ArgId, raw: &str) -> Result<()> {
        let arg = self.schema.arg_decl_mut(id);
        arg.value.set(raw).map_err(|reason| Error::InvalidArgValue {
            arg: arg.name.clone(),
            value: raw.to_string(),
            reason,
        })?;
        trace!(arg = %arg.name, value = raw, "bound argument");
        self.filled.insert(id);
        self.elements.push(ParseElement {
            kind: ElementKind::Arg(id),
            value: Some(raw.to_string()),
        });
        Ok(())
    }

    fn finish(mut self) -> Result<Matches> {
        while let Some(child) = self.schema.default_child(self.current) {
            self.enter(child)?;
        }
        if !self.schema.node(self.current).is_leaf() {
            return Err(if self.current.is_root() {
                Error::CommandNotSpecified
            } else {
                Error::SubcommandRequired {
                    command: self.schema.full_command(self.current),
                }
            });
        }

        let args = self.visited_args();
        self.apply_defaults(&args)?;
        self.check_required(&args)?;

        debug!(
            command = %self.schema.full_command(self.current),
            unmanaged = self.unmanaged.len(),
            "parse finished"
        );
        Ok(Matches {
            path: self
                .path
                .iter()
                .map(|&id| self.schema.node(id).name.clone())
                .collect(),
            selected: self.path.last().copied(),
            unmanaged: self.unmanaged,
            flags: self.scope,
            args,
            elements: self.elements,
        })
    }

    fn visited_args(&self) -> Vec<ArgId> {
        let schema: &Schema = self.schema;
        std::iter::once(CommandId::ROOT)
            .chain(self.path.iter().copied())
            .flat_map(|cmd| schema.arg_ids(cmd))
            .collect()
    }

    /// Environment first, then declared defaults, for everything not bound.
    fn apply_defaults(&mut self, args: &[ArgId]) -> Result<()> {
        let options = self.options;
        for id in self.scope.clone() {
            if self.seen.contains(&id) {
                continue;
            }
            let env = self
                .schema
                .envar_for(id)
                .and_then(|key| options.env_lookup(&key));
            let flag = self.schema.flag_decl_mut(id);
            let values = fallback_values(env, &flag.defaults, flag.value.is_cumulative());
            for value in &values {
                flag.value.set(value).map_err(|reason| Error::InvalidDefault {
                    target: format!("flag '--{}'", flag.name),
                    value: value.clone(),
                    reason,
                })?;
            }
            if !values.is_empty() {
                self.defaulted_flags.insert(id);
            }
        }

        for &id in args {
            if self.filled.contains(&id) {
                continue;
            }
            let arg = self.schema.arg_decl_mut(id);
            let env = arg.envar.as_deref().and_then(|key| options.env_lookup(key));
            let values = fallback_values(env, &arg.defaults, arg.value.is_cumulative());
            for value in &values {
                arg.value.set(value).map_err(|reason| Error::InvalidDefault {
                    target: format!("argument '{}'", arg.name),
                    value: value.clone(),
                    reason,
                })?;
            }
            if !values.is_empty() {
                self.defaulted_args.insert(id);
            }
        }
        Ok(())
    }

    fn check_required(&self, args: &[ArgId]) -> Result<()> {
        for &id in &self.scope {
            let flag = self.schema.flag_decl(id);
            if flag.required && !self.seen.contains(&id) && !self.defaulted_flags.contains(&id) {
                return Err(Error::RequiredFlag {
                    flag: flag.name.clone(),
                });
            }
        }
        for &id in args {
            let arg = self.schema.arg_decl(id);
            if arg.required && !self.filled.contains(&id) && !self.defaulted_args.contains(&id) {
                return Err(Error::RequiredArg {
                    arg: arg.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Values to feed an unbound flag or argument. A cumulative target splits
/// its environment value on newlines.
fn fallback_values(env: Option<&str>, defaults: &[String], cumulative: bool) -> Vec<String> {
    match env {
        Some(value) if cumulative => value
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Some(value) => vec![value.to_string()],
        None => defaults.to_vec(),
    }
}
