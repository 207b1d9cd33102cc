//! Alias resolution: every accepted spelling of a flag, mapped to the flag.
//!
//! The table covers explicit aliases, auto-generated shortcuts (initials of
//! the `-`-separated words of a name) and the negative forms of boolean
//! switches (`no-name`, and `nname` for short hyphen-free names). Canonical
//! long names are not stored here; callers look those up first.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::trace;

use crate::command::FlagId;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasKind {
    /// A user-declared alias.
    Positive,
    /// Initials of a long name or alias.
    Shortcut,
    /// Binds the negation of a switch.
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub flag: FlagId,
    pub kind: AliasKind,
}

impl Alias {
    pub fn inverts(&self) -> bool {
        self.kind == AliasKind::Negative
    }
}

/// The view of one flag the table is built from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlagEntry<'a> {
    pub id: FlagId,
    pub name: &'a str,
    pub aliases: &'a [String],
    pub switch: bool,
    pub auto_shortcut: bool,
}

/// Initials of the `-`-separated words of `name`: `dry-run` -> `dr`.
pub fn shortcut(name: &str) -> String {
    name.split('-')
        .filter_map(|word| word.chars().next())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: IndexMap<String, Alias>,
}

impl AliasTable {
    /// Build the table for a group of flags, in declaration order.
    ///
    /// Fails on the first spelling that is already taken by another flag,
    /// or by the same flag under a different kind.
    pub(crate) fn build(flags: &[FlagEntry<'_>]) -> Result<Self> {
        let long: HashMap<&str, FlagId> = flags.iter().map(|f| (f.name, f.id)).collect();
        let names: HashMap<FlagId, &str> = flags.iter().map(|f| (f.id, f.name)).collect();
        let mut table = Builder {
            table: Self::default(),
            long,
            names,
        };

        for flag in flags {
            let mut spellings = vec![flag.name.to_string()];
            if flag.auto_shortcut {
                table.add_shortcut(flag, flag.name, &mut spellings)?;
            }
            for alias in flag.aliases {
                table.register(flag, alias, AliasKind::Positive)?;
                spellings.push(alias.clone());
                if flag.auto_shortcut {
                    table.add_shortcut(flag, alias, &mut spellings)?;
                }
            }
            if flag.switch {
                for spelling in &spellings {
                    table.register(flag, &format!("no-{spelling}"), AliasKind::Negative)?;
                    if spelling.chars().count() <= 3 && !spelling.contains('-') {
                        table.register(flag, &format!("n{spelling}"), AliasKind::Negative)?;
                    }
                }
            }
        }
        Ok(table.table)
    }

    pub fn get(&self, spelling: &str) -> Option<Alias> {
        self.entries.get(spelling).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spellings registered for `flag` under `kind`, in registration order.
    pub fn spellings(&self, flag: FlagId, kind: AliasKind) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, alias)| alias.flag == flag && alias.kind == kind)
            .map(|(spelling, _)| spelling.as_str())
    }
}

struct Builder<'a> {
    table: AliasTable,
    long: HashMap<&'a str, FlagId>,
    names: HashMap<FlagId, &'a str>,
}

impl Builder<'_> {
    fn add_shortcut(
        &mut self,
        flag: &FlagEntry<'_>,
        source: &str,
        spellings: &mut Vec<String>,
    ) -> Result<()> {
        let short = shortcut(source);
        if short.is_empty() || short == source {
            return Ok(());
        }
        self.register(flag, &short, AliasKind::Shortcut)?;
        spellings.push(short);
        Ok(())
    }

    fn register(&mut self, flag: &FlagEntry<'_>, spelling: &str, kind: AliasKind) -> Result<()> {
        if let Some(&owner) = self.long.get(spelling) {
            if owner == flag.id {
                return Ok(());
            }
            return Err(self.conflict(flag, spelling, owner));
        }
        if let Some(existing) = self.table.entries.get(spelling) {
            if existing.flag == flag.id && existing.kind == kind {
                return Ok(());
            }
            return Err(self.conflict(flag, spelling, existing.flag));
        }
        trace!(alias = spelling, flag = flag.name, ?kind, "register alias");
        self.table.entries.insert(
            spelling.to_string(),
            Alias {
                flag: flag.id,
                kind,
            },
        );
        Ok(())
    }

    fn conflict(&self, flag: &FlagEntry<'_>, spelling: &str, owner: FlagId) -> Error {
        Error::AliasConflict {
            alias: spelling.to_string(),
            flag: flag.name.to_string(),
            existing: self.names.get(&owner).copied().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandId;
    use crate::error::ErrorKind;

    fn id(index: usize) -> FlagId {
        FlagId {
            command: CommandId::ROOT,
            index,
        }
    }

    fn entry<'a>(index: usize, name: &'a str, aliases: &'a [String], switch: bool) -> FlagEntry<'a> {
        FlagEntry {
            id: id(index),
            name,
            aliases,
            switch,
            auto_shortcut: false,
        }
    }

    #[test]
    fn shortcut_takes_initials() {
        assert_eq!(shortcut("dry-run"), "dr");
        assert_eq!(shortcut("verbose"), "v");
        assert_eq!(shortcut("a-1-flag"), "a1f");
        assert_eq!(shortcut("trailing-"), "t");
    }

    #[test]
    fn positive_and_negative_aliases() {
        let aliases = vec!["option-3".to_string(), "third".to_string()];
        let table = AliasTable::build(&[entry(0, "option-three", &aliases, true)]).unwrap();

        assert_eq!(table.get("third").map(|a| a.kind), Some(AliasKind::Positive));
        let negative = table.get("no-third").unwrap();
        assert!(negative.inverts());
        assert_eq!(negative.flag, id(0));
        assert!(table.get("no-option-three").unwrap().inverts());
        assert!(table.get("no-option-3").unwrap().inverts());
        // hyphenated or long spellings get no `n` form
        assert!(table.get("noption-3").is_none());
        assert!(table.get("nthird").is_none());
        assert!(table.get("option-three").is_none());
    }

    #[test]
    fn short_names_get_n_prefixed_negative() {
        let mut verbose = entry(0, "verbose", &[], true);
        verbose.auto_shortcut = true;
        let table = AliasTable::build(&[verbose]).unwrap();
        assert_eq!(table.get("v").map(|a| a.kind), Some(AliasKind::Shortcut));
        assert!(table.get("no-v").unwrap().inverts());
        assert!(table.get("nv").unwrap().inverts());
        assert!(table.get("nverbose").is_none());
    }

    #[test]
    fn short_length_counts_characters() {
        let table = AliasTable::build(&[entry(0, "éé", &[], true)]).unwrap();
        assert!(table.get("néé").unwrap().inverts());
        assert!(table.get("no-éé").unwrap().inverts());

        let table = AliasTable::build(&[entry(0, "éééé", &[], true)]).unwrap();
        assert!(table.get("néééé").is_none());
    }

    #[test]
    fn value_flags_get_no_negatives() {
        let table = AliasTable::build(&[entry(0, "out", &[], false)]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn alias_equal_to_other_long_name_conflicts() {
        let aliases = vec!["verbose".to_string()];
        let err = AliasTable::build(&[
            entry(0, "verbose", &[], true),
            entry(1, "version", &aliases, true),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeclarationConflict);
        match err {
            Error::AliasConflict {
                alias,
                flag,
                existing,
            } => {
                assert_eq!(alias, "verbose");
                assert_eq!(flag, "version");
                assert_eq!(existing, "verbose");
            }
            other => panic!("expected alias conflict, got: {other:?}"),
        }
    }

    #[test]
    fn colliding_shortcuts_conflict() {
        let mut verbose = entry(0, "verbose", &[], true);
        verbose.auto_shortcut = true;
        let mut version = entry(1, "version", &[], true);
        version.auto_shortcut = true;
        let err = AliasTable::build(&[verbose, version]).unwrap_err();
        assert!(err.to_string().contains("'v'"), "{err}");
    }

    #[test]
    fn same_flag_different_kind_conflicts() {
        let aliases = vec!["v".to_string()];
        let mut verbose = entry(0, "verbose", &aliases, true);
        verbose.auto_shortcut = true;
        let err = AliasTable::build(&[verbose]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeclarationConflict);
    }

    #[test]
    fn spellings_are_listed_per_kind() {
        let aliases = vec!["first".to_string(), "first-option".to_string()];
        let table = AliasTable::build(&[entry(0, "option-one", &aliases, true)]).unwrap();
        let positives: Vec<_> = table.spellings(id(0), AliasKind::Positive).collect();
        assert_eq!(positives, ["first", "first-option"]);
        let negatives: Vec<_> = table.spellings(id(0), AliasKind::Negative).collect();
        assert_eq!(negatives, ["no-option-one", "no-first", "no-first-option"]);
    }
}
