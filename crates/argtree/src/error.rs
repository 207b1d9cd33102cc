//! Error types for schema validation and argument parsing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fieldless classification of an [`Error`], for callers that only care about
/// what went wrong and not about the offending names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Two alias, shortcut or negative spellings collide.
    DeclarationConflict,
    /// The declared schema is malformed (argument ordering, defaults, ...).
    Configuration,
    /// A flag-shaped or positional token matches nothing.
    UnrecognizedToken,
    /// A value failed conversion, or a flag is missing its value.
    MalformedValue,
    /// A required flag or argument is absent.
    MissingRequired,
    /// A non-repeatable flag was bound more than once.
    RepeatedFlag,
    /// A command level with children was left without a selection.
    AmbiguousSubcommand,
    /// `@file` expansion failed.
    Expansion,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("alias '{alias}' on flag '{flag}' is already associated to flag '{existing}'")]
    AliasConflict {
        alias: String,
        flag: String,
        existing: String,
    },

    #[error("required argument '{arg}' cannot follow optional arguments")]
    RequiredAfterOptional { arg: String },

    #[error("argument '{arg}' consumes the remaining arguments and must be declared last")]
    RemainderNotLast { arg: String },

    #[error("only one argument may consume the remaining arguments ('{first}' and '{second}')")]
    MultipleRemainders { first: String, second: String },

    #[error("command '{command}' cannot declare both arguments and subcommands")]
    ArgsWithCommands { command: String },

    #[error("command '{command}' has more than one default subcommand ('{first}' and '{second}')")]
    MultipleDefaults {
        command: String,
        first: String,
        second: String,
    },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("invalid default value '{value}' for {target}: {reason}")]
    InvalidDefault {
        target: String,
        value: String,
        reason: String,
    },

    #[error("unknown long flag '--{flag}'")]
    UnknownLongFlag { flag: String },

    #[error("unknown short flag '-{flag}'")]
    UnknownShortFlag { flag: char },

    #[error("expected command but got '{token}'")]
    UnknownCommand { token: String },

    #[error("unexpected {token}")]
    UnexpectedArgument { token: String },

    #[error("flag '--{flag}' does not take a value")]
    FlagTakesNoValue { flag: String },

    #[error("expected argument for flag '--{flag}'")]
    MissingFlagValue { flag: String },

    #[error("invalid value '{value}' for flag '--{flag}': {reason}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("invalid value '{value}' for argument '{arg}': {reason}")]
    InvalidArgValue {
        arg: String,
        value: String,
        reason: String,
    },

    #[error("required flag --{flag} not provided")]
    RequiredFlag { flag: String },

    #[error("required argument '{arg}' not provided")]
    RequiredArg { arg: String },

    #[error("flag '{flag}' cannot be repeated")]
    RepeatedFlag { flag: String },

    #[error("command not specified")]
    CommandNotSpecified,

    #[error("must select a subcommand of '{command}'")]
    SubcommandRequired { command: String },

    #[error("expected @ file to expand arguments from")]
    EmptyExpansion,

    #[error("failed to expand arguments from '{}'", path.display())]
    Expand {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AliasConflict { .. } => ErrorKind::DeclarationConflict,
            Self::RequiredAfterOptional { .. }
            | Self::RemainderNotLast { .. }
            | Self::MultipleRemainders { .. }
            | Self::ArgsWithCommands { .. }
            | Self::MultipleDefaults { .. }
            | Self::InvalidSchema { .. }
            | Self::InvalidDefault { .. } => ErrorKind::Configuration,
            Self::UnknownLongFlag { .. }
            | Self::UnknownShortFlag { .. }
            | Self::UnknownCommand { .. }
            | Self::UnexpectedArgument { .. }
            | Self::FlagTakesNoValue { .. } => ErrorKind::UnrecognizedToken,
            Self::MissingFlagValue { .. }
            | Self::InvalidFlagValue { .. }
            | Self::InvalidArgValue { .. } => ErrorKind::MalformedValue,
            Self::RequiredFlag { .. } | Self::RequiredArg { .. } => ErrorKind::MissingRequired,
            Self::RepeatedFlag { .. } => ErrorKind::RepeatedFlag,
            Self::CommandNotSpecified | Self::SubcommandRequired { .. } => {
                ErrorKind::AmbiguousSubcommand
            }
            Self::EmptyExpansion | Self::Expand { .. } => ErrorKind::Expansion,
        }
    }

    pub(crate) fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::RepeatedFlag {
            flag: "option-three".to_string(),
        };
        assert_eq!(err.to_string(), "flag 'option-three' cannot be repeated");
        assert_eq!(err.kind(), ErrorKind::RepeatedFlag);

        let err = Error::UnexpectedArgument {
            token: "xxx".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected xxx");

        let err = Error::UnknownShortFlag { flag: 'f' };
        assert_eq!(err.to_string(), "unknown short flag '-f'");
        assert_eq!(err.kind(), ErrorKind::UnrecognizedToken);
    }

    #[test]
    fn alias_conflict_mentions_both_flags() {
        let err = Error::AliasConflict {
            alias: "v".to_string(),
            flag: "version".to_string(),
            existing: "verbose".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'v'"));
        assert!(msg.contains("version"));
        assert!(msg.contains("verbose"));
        assert_eq!(err.kind(), ErrorKind::DeclarationConflict);
    }
}
