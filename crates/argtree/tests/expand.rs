use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use argtree::{ErrorKind, FlagDecl, FlagId, ParseOptions, Schema, StringValue};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("argtree-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn flags_file(prefix: &str, content: &str) -> (PathBuf, String) {
    let dir = make_temp_dir(prefix);
    let path = dir.join("args");
    fs::write(&path, content).expect("failed to write args file");
    let word = format!("@{}", path.display());
    (dir, word)
}

fn schema() -> (Schema, Vec<FlagId>) {
    let mut schema = Schema::new("test");
    let root = schema.root();
    let flags = (0..4)
        .map(|i| schema.flag(root, FlagDecl::string(format!("flag{i}"))))
        .collect();
    (schema, flags)
}

fn value(schema: &Schema, id: FlagId) -> String {
    schema
        .flag_as::<StringValue>(id)
        .map(|v| v.get().to_string())
        .unwrap_or_default()
}

#[test]
fn expand_from_file() {
    let (dir, word) = flags_file("expand", "--flag1=f1\n");
    let (mut schema, flags) = schema();
    schema.parse([word.as_str()]).unwrap();
    assert_eq!(value(&schema, flags[1]), "f1");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn expand_with_leading_and_trailing_args() {
    let (dir, word) = flags_file("expand-surround", "--flag1=f1\n--flag2=f2\n");
    let (mut schema, flags) = schema();
    schema
        .parse(["--flag0=f0", word.as_str(), "--flag3=f3"])
        .unwrap();
    let values: Vec<_> = flags.iter().map(|&id| value(&schema, id)).collect();
    assert_eq!(values, ["f0", "f1", "f2", "f3"]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let (dir, word) = flags_file(
        "expand-comments",
        "# leading comment\n\n--flag1\nspaced value\n   \n#--flag2=nope\n",
    );
    let (mut schema, flags) = schema();
    schema.parse([word.as_str()]).unwrap();
    assert_eq!(value(&schema, flags[1]), "spaced value");
    assert_eq!(value(&schema, flags[2]), "");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn expansion_can_be_disabled() {
    let mut schema = Schema::new("test");
    let options = ParseOptions::default().expand_files(false).allow_unmanaged(true);
    let matches = schema.parse_with(["@missing"], &options).unwrap();
    assert_eq!(matches.unmanaged(), ["@missing"]);
}

#[test]
fn missing_file_fails_before_parsing() {
    let (mut schema, _) = schema();
    let err = schema.parse(["@/no/such/argtree/file"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expansion);
    let err = schema.parse(["@"]).unwrap_err();
    assert_eq!(err.to_string(), "expected @ file to expand arguments from");
}
