use argtree::{
    BoolValue, CommandDecl, FlagDecl, FlagId, ParseOptions, Schema, StringValue,
};

const ELEMENTS: usize = 5;

struct App {
    schema: Schema,
    bools: Vec<FlagId>,
    strings: Vec<FlagId>,
}

impl App {
    /// `bool-1..5` on `-a..-e`, `string-1..5` on `-A..-E`.
    fn new() -> Self {
        let mut schema = Schema::new("test-app");
        let root = schema.root();
        let mut bools = Vec::new();
        let mut strings = Vec::new();
        for (i, (lower, upper)) in ('a'..='e').zip('A'..='E').enumerate().take(ELEMENTS) {
            bools.push(schema.flag(root, FlagDecl::switch(format!("bool-{}", i + 1)).short(lower)));
            strings.push(schema.flag(
                root,
                FlagDecl::string(format!("string-{}", i + 1)).short(upper),
            ));
        }
        Self {
            schema,
            bools,
            strings,
        }
    }

    fn bools(&self) -> Vec<bool> {
        self.bools
            .iter()
            .map(|&id| {
                self.schema
                    .flag_as::<BoolValue>(id)
                    .map(BoolValue::get)
                    .unwrap_or_default()
            })
            .collect()
    }

    fn strings(&self) -> Vec<String> {
        self.strings
            .iter()
            .map(|&id| {
                self.schema
                    .flag_as::<StringValue>(id)
                    .map(|v| v.get().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

struct Case {
    name: &'static str,
    unmanaged: bool,
    args: &'static str,
    bools: [bool; ELEMENTS],
    strings: [&'static str; ELEMENTS],
    expect_unmanaged: &'static [&'static str],
    expect_err: Option<&'static str>,
}

const NONE: [bool; ELEMENTS] = [false; ELEMENTS];
const EMPTY: [&str; ELEMENTS] = [""; ELEMENTS];

#[test]
fn unmanaged_cases() {
    let cases = [
        Case {
            name: "all shorts",
            unmanaged: false,
            args: "-abcde -ABCDE",
            bools: [true; ELEMENTS],
            strings: ["BCDE", "", "", "", ""],
            expect_unmanaged: &[],
            expect_err: None,
        },
        Case {
            name: "normal",
            unmanaged: false,
            args: "--bool-1 --bool-3 -e --string-2=x -Dy",
            bools: [true, false, true, false, true],
            strings: ["", "x", "", "y", ""],
            expect_unmanaged: &[],
            expect_err: None,
        },
        Case {
            name: "mixed",
            unmanaged: true,
            args: "xxx --bA --test abc -Abc --string-3=test -s x zzz",
            bools: NONE,
            strings: ["bc", "", "test", "", ""],
            expect_unmanaged: &["xxx", "--bA", "--test", "abc", "-s", "x", "zzz"],
            expect_err: None,
        },
        Case {
            name: "error",
            unmanaged: false,
            args: "xxx -b",
            bools: NONE,
            strings: EMPTY,
            expect_unmanaged: &[],
            expect_err: Some("unexpected xxx"),
        },
        Case {
            name: "remaining args",
            unmanaged: true,
            args: "-b -- -sx --test",
            bools: [false, true, false, false, false],
            strings: EMPTY,
            expect_unmanaged: &["-sx", "--test"],
            expect_err: None,
        },
        Case {
            name: "bad switch",
            unmanaged: true,
            args: "-abcdef -ABCDEF",
            bools: NONE,
            strings: ["BCDEF", "", "", "", ""],
            expect_unmanaged: &["-abcdef"],
            expect_err: None,
        },
        Case {
            name: "bad switch end",
            unmanaged: true,
            args: "-abcdeX",
            bools: NONE,
            strings: EMPTY,
            expect_unmanaged: &["-abcdeX"],
            expect_err: None,
        },
        Case {
            name: "bad switch mixed",
            unmanaged: true,
            args: "-ab -cX -de",
            bools: [true, true, false, true, true],
            strings: EMPTY,
            expect_unmanaged: &["-cX"],
            expect_err: None,
        },
        Case {
            name: "many bad switches with args",
            unmanaged: true,
            args: "-ab -var x=1 -var y=2 -de -var z=3 test",
            bools: [true, true, false, true, true],
            strings: EMPTY,
            expect_unmanaged: &["-var", "x=1", "-var", "y=2", "-var", "z=3", "test"],
            expect_err: None,
        },
        Case {
            name: "lone dash is positional",
            unmanaged: true,
            args: "-",
            bools: NONE,
            strings: EMPTY,
            expect_unmanaged: &["-"],
            expect_err: None,
        },
        Case {
            name: "lone dash without slot",
            unmanaged: false,
            args: "-",
            bools: NONE,
            strings: EMPTY,
            expect_unmanaged: &[],
            expect_err: Some("unexpected -"),
        },
        Case {
            name: "unknown short flag",
            unmanaged: false,
            args: "-ab -cX",
            bools: [true, true, false, false, false],
            strings: EMPTY,
            expect_unmanaged: &[],
            expect_err: Some("unknown short flag '-X'"),
        },
    ];

    for case in &cases {
        let mut app = App::new();
        let options = ParseOptions::default().allow_unmanaged(case.unmanaged);
        let result = app
            .schema
            .parse_with(case.args.split_whitespace(), &options);
        match (case.expect_err, &result) {
            (None, Ok(matches)) => {
                assert_eq!(matches.unmanaged(), case.expect_unmanaged, "case {}", case.name)
            }
            (Some(msg), Err(err)) => assert_eq!(err.to_string(), msg, "case {}", case.name),
            (_, other) => panic!("case {}: unexpected outcome: {other:?}", case.name),
        }
        assert_eq!(app.bools(), case.bools, "case {}: bools", case.name);
        assert_eq!(app.strings(), case.strings, "case {}: strings", case.name);
    }
}

fn app_with_command() -> (Schema, ParseOptions) {
    let mut schema = Schema::new("test");
    let root = schema.root();
    schema.command(root, CommandDecl::new("foo"));
    (schema, ParseOptions::default().allow_unmanaged(true))
}

#[test]
fn single_then_double_dash_flags() {
    let (mut schema, options) = app_with_command();
    let matches = schema
        .parse_with(["foo", "-single-dash", "--double-dash"], &options)
        .unwrap();
    assert_eq!(matches.unmanaged(), ["-single-dash", "--double-dash"]);
}

#[test]
fn two_single_dash_flags() {
    let (mut schema, options) = app_with_command();
    let matches = schema
        .parse_with(["foo", "-short-flag", "-verylongshort-flag"], &options)
        .unwrap();
    assert_eq!(matches.unmanaged(), ["-short-flag", "-verylongshort-flag"]);
}

#[test]
fn double_then_single_dash_flags() {
    let (mut schema, options) = app_with_command();
    let matches = schema
        .parse_with(["foo", "--double-dash", "-single-dash"], &options)
        .unwrap();
    assert_eq!(matches.unmanaged(), ["--double-dash", "-single-dash"]);
}

#[test]
fn verbose_then_unknown_bundle() {
    let (mut schema, options) = app_with_command();
    let root = schema.root();
    let verbose = schema.flag(root, FlagDecl::switch("verbose").short('v'));
    let matches = schema.parse_with(["foo", "-v", "-var"], &options).unwrap();
    assert_eq!(matches.unmanaged(), ["-var"]);
    assert_eq!(schema.flag_as::<BoolValue>(verbose).map(BoolValue::get), Some(true));
}

#[test]
fn unknown_bundle_of_known_letters_binds_nothing() {
    let (mut schema, options) = app_with_command();
    let root = schema.root();
    let verbose = schema.flag(root, FlagDecl::switch("verbose").short('v'));
    let aflag = schema.flag(root, FlagDecl::switch("aflag").short('a'));
    let matches = schema.parse_with(["foo", "-var"], &options).unwrap();
    assert_eq!(matches.unmanaged(), ["-var"]);
    assert_eq!(schema.flag_as::<BoolValue>(verbose).map(BoolValue::get), Some(false));
    assert_eq!(schema.flag_as::<BoolValue>(aflag).map(BoolValue::get), Some(false));
}

#[test]
fn unknown_bundle_with_auto_shortcut_stays_whole() {
    let (mut schema, options) = app_with_command();
    let root = schema.root();
    schema.auto_shortcut(root, true);
    let verbose = schema.flag(root, FlagDecl::switch("verbose-level").short('v'));
    let aflag = schema.flag(root, FlagDecl::switch("aflag").short('a'));

    let matches = schema.parse_with(["foo", "-var"], &options).unwrap();
    assert_eq!(matches.unmanaged(), ["-var"]);
    assert_eq!(schema.flag_as::<BoolValue>(verbose).map(BoolValue::get), Some(false));
    assert_eq!(schema.flag_as::<BoolValue>(aflag).map(BoolValue::get), Some(false));

    // the generated shortcut is still reachable as a whole spelling
    let matches = schema.parse_with(["foo", "-vl"], &options).unwrap();
    assert!(matches.unmanaged().is_empty());
    assert_eq!(schema.flag_as::<BoolValue>(verbose).map(BoolValue::get), Some(true));
}

#[test]
fn unknown_long_flag_captures_its_value() {
    let mut schema = Schema::new("app");
    let root = schema.root();
    let name = schema.arg(root, argtree::ArgDecl::string("name"));
    let options = ParseOptions::default().allow_unmanaged(true);
    let matches = schema
        .parse_with(["--color", "always", "--size=3", "bob"], &options)
        .unwrap();
    assert_eq!(matches.unmanaged(), ["--color", "always", "--size=3"]);
    assert_eq!(schema.arg_as::<StringValue>(name).map(StringValue::get), Some("bob"));
}

#[test]
fn unknown_command_is_an_error_even_when_unmanaged() {
    let (mut schema, options) = app_with_command();
    let err = schema.parse_with(["bar"], &options).unwrap_err();
    assert_eq!(err.to_string(), "expected command but got 'bar'");
}
