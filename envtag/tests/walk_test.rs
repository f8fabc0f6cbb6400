//! Walker behaviour against in-memory sources

use envtag::{Duration, Env, EnvError, FromEnvText, Json, Kind, Parser, Scalar, Target, TextSlot};
use std::collections::{BTreeMap, HashMap, HashSet};

fn parser(pairs: &[(&str, &str)]) -> Parser<HashMap<String, String>> {
    Parser::with_source(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[derive(Debug, Default, Clone, PartialEq, Env)]
pub struct AllKinds {
    #[env("BOOL")]
    pub v_bool: bool,
    #[env("I8")]
    pub v_i8: i8,
    #[env("I16")]
    pub v_i16: i16,
    #[env("I32")]
    pub v_i32: i32,
    #[env("I64")]
    pub v_i64: i64,
    #[env("ISIZE")]
    pub v_isize: isize,
    #[env("U8")]
    pub v_u8: u8,
    #[env("U16")]
    pub v_u16: u16,
    #[env("U32")]
    pub v_u32: u32,
    #[env("U64")]
    pub v_u64: u64,
    #[env("USIZE")]
    pub v_usize: usize,
    #[env("F32")]
    pub v_f32: f32,
    #[env("F64")]
    pub v_f64: f64,
    #[env("STRING")]
    pub v_string: String,
    #[env("DURATION")]
    pub v_duration: Duration,
    #[env("STD_DURATION")]
    pub v_std_duration: std::time::Duration,
}

const VALID: &[(&str, &str)] = &[
    ("BOOL", "true"),
    ("I8", "-123"),
    ("I16", "-32760"),
    ("I32", "-8388600"),
    ("I64", "-2147483640"),
    ("ISIZE", "-0x10"),
    ("U8", "250"),
    ("U16", "65530"),
    ("U32", "16777210"),
    ("U64", "4294967290"),
    ("USIZE", "0o17"),
    ("F32", "1.5"),
    ("F64", "-2.5e-3"),
    ("STRING", "foo bar"),
    ("DURATION", "1h2m3s4ms5us6ns"),
    ("STD_DURATION", "1.5s"),
];

#[test]
fn test_parses_every_supported_kind() {
    let mut v = AllKinds::default();
    parser(VALID).parse(&mut v).unwrap();

    assert!(v.v_bool);
    assert_eq!(v.v_i8, -123);
    assert_eq!(v.v_i16, -32760);
    assert_eq!(v.v_i32, -8388600);
    assert_eq!(v.v_i64, -2147483640);
    assert_eq!(v.v_isize, -16);
    assert_eq!(v.v_u8, 250);
    assert_eq!(v.v_u16, 65530);
    assert_eq!(v.v_u32, 16777210);
    assert_eq!(v.v_u64, 4294967290);
    assert_eq!(v.v_usize, 15);
    assert_eq!(v.v_f32, 1.5);
    assert_eq!(v.v_f64, -2.5e-3);
    assert_eq!(v.v_string, "foo bar");
    assert_eq!(
        v.v_duration,
        Duration::from_nanos(3_600_000_000_000 + 120_000_000_000 + 3_004_005_006)
    );
    assert_eq!(v.v_std_duration, std::time::Duration::from_millis(1500));
}

#[test]
fn test_invalid_literal_names_field_and_keeps_value() {
    let invalid = [
        ("BOOL", "v_bool", "yes"),
        ("I8", "v_i8", "128"),
        ("I16", "v_i16", "1.0"),
        ("I32", "v_i32", "0x"),
        ("I64", "v_i64", "9223372036854775808"),
        ("ISIZE", "v_isize", "ten"),
        ("U8", "v_u8", "-1"),
        ("U16", "v_u16", "65536"),
        ("U32", "v_u32", "1e3"),
        ("U64", "v_u64", ""),
        ("USIZE", "v_usize", "08"),
        ("F32", "v_f32", "1e39"),
        ("F64", "v_f64", "one"),
        ("DURATION", "v_duration", "5"),
        ("STD_DURATION", "v_std_duration", "-1s"),
    ];

    let mut baseline = AllKinds::default();
    parser(VALID).parse(&mut baseline).unwrap();

    for (key, field_name, bad) in invalid {
        let mut pairs: Vec<(&str, &str)> = VALID.iter().copied().filter(|(k, _)| *k != key).collect();
        pairs.push((key, bad));

        let mut v = baseline.clone();
        let err = parser(&pairs).parse(&mut v).unwrap_err();
        match err {
            EnvError::Parse { field, var, .. } => {
                assert_eq!(field, field_name, "{key}={bad}");
                assert_eq!(var, key, "{key}={bad}");
            }
            other => panic!("{key}={bad}: expected Parse error, got {other:?}"),
        }
        assert_eq!(v, baseline, "{key}={bad} must not change the value");
    }
}

#[test]
fn test_round_trip_through_text() {
    let original = AllKinds {
        v_bool: true,
        v_i8: i8::MIN,
        v_i16: i16::MAX,
        v_i32: -7,
        v_i64: i64::MIN,
        v_isize: isize::MAX,
        v_u8: u8::MAX,
        v_u16: 0,
        v_u32: u32::MAX,
        v_u64: u64::MAX,
        v_usize: 42,
        v_f32: 0.1,
        v_f64: -1234.5678,
        v_string: "round trip".to_string(),
        v_duration: Duration::from_nanos(-3_723_004_005_006),
        v_std_duration: std::time::Duration::from_nanos(1_500),
    };

    let std_duration = Duration::from_nanos(original.v_std_duration.as_nanos() as i64).to_string();
    let texts = [
        ("BOOL", original.v_bool.to_string()),
        ("I8", original.v_i8.to_string()),
        ("I16", original.v_i16.to_string()),
        ("I32", original.v_i32.to_string()),
        ("I64", original.v_i64.to_string()),
        ("ISIZE", original.v_isize.to_string()),
        ("U8", original.v_u8.to_string()),
        ("U16", original.v_u16.to_string()),
        ("U32", original.v_u32.to_string()),
        ("U64", original.v_u64.to_string()),
        ("USIZE", original.v_usize.to_string()),
        ("F32", original.v_f32.to_string()),
        ("F64", original.v_f64.to_string()),
        ("STRING", original.v_string.clone()),
        ("DURATION", original.v_duration.to_string()),
        ("STD_DURATION", std_duration),
    ];
    let pairs: Vec<(&str, &str)> = texts.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let mut parsed = AllKinds::default();
    parser(&pairs).parse(&mut parsed).unwrap();
    assert_eq!(parsed, original);
}

#[derive(Debug, Default, Env)]
pub struct Flags {
    #[env("D")]
    pub debug: bool,
    #[env("C")]
    pub count: i64,
}

#[test]
fn test_debug_count_scenario() {
    let mut flags = Flags::default();
    parser(&[("D", "true"), ("C", "42")]).parse(&mut flags).unwrap();
    assert!(flags.debug);
    assert_eq!(flags.count, 42);
}

#[derive(Debug, Default, Env)]
pub struct Untagged {
    pub value: u32,
    pub name: String,
}

#[test]
fn test_unannotated_scalars_are_never_touched() {
    let mut v = Untagged {
        value: 7,
        name: "keep".to_string(),
    };
    parser(&[("VALUE", "1"), ("NAME", "other"), ("value", "2")])
        .parse(&mut v)
        .unwrap();
    assert_eq!(v.value, 7);
    assert_eq!(v.name, "keep");
}

#[derive(Debug, Default, Env)]
pub struct Inner {
    #[env("X")]
    pub v: i64,
}

#[derive(Debug, Default, Env)]
pub struct Outer {
    pub a: Inner,
}

#[test]
fn test_recursion_into_unannotated_struct() {
    let mut root = Outer::default();
    parser(&[("X", "5")]).parse(&mut root).unwrap();
    assert_eq!(root.a.v, 5);
}

#[derive(Debug, Default, Env)]
pub struct Indirect {
    #[env("Y")]
    pub deep: Option<Box<Option<Box<Option<i64>>>>>,
    #[env("Z")]
    pub absent: Option<Box<i64>>,
    pub absent_struct: Option<Inner>,
    pub boxed_struct: Box<Inner>,
}

#[test]
fn test_triple_indirection() {
    let mut v = Indirect {
        deep: Some(Box::new(Some(Box::new(Some(0))))),
        ..Indirect::default()
    };
    parser(&[("Y", "-10"), ("X", "3")]).parse(&mut v).unwrap();

    assert_eq!(v.deep, Some(Box::new(Some(Box::new(Some(-10))))));
    assert_eq!(v.boxed_struct.v, 3);
}

#[test]
fn test_absent_indirection_is_skipped() {
    let mut v = Indirect::default();
    // Y and Z would fail to parse if they were reached.
    parser(&[("Y", "nope"), ("Z", "not a number"), ("X", "4")])
        .parse(&mut v)
        .unwrap();
    assert!(v.deep.is_none());
    assert!(v.absent.is_none());
    assert!(v.absent_struct.is_none());
    assert_eq!(v.boxed_struct.v, 4);
}

#[derive(Debug, Default, Env)]
pub struct EmptyKey {
    #[env("A")]
    pub a: u8,
    #[env("")]
    pub b: u8,
    #[env("C")]
    pub c: u8,
}

#[test]
fn test_empty_key_aborts_walk() {
    let mut v = EmptyKey::default();
    let err = parser(&[("A", "1"), ("C", "3")]).parse(&mut v).unwrap_err();

    assert!(matches!(err, EnvError::EmptyVarName { ref field } if field == "b"));
    assert_eq!(v.a, 1);
    assert_eq!(v.c, 0);
}

#[derive(Debug, Default, Env)]
pub struct NestedEmptyKey {
    pub inner: EmptyKey,
}

#[test]
fn test_nested_errors_are_wrapped() {
    let mut v = NestedEmptyKey::default();
    let err = parser(&[("A", "1")]).parse(&mut v).unwrap_err();

    assert!(matches!(
        err,
        EnvError::Parse { ref field, ref var, .. } if field == "inner" && var.is_empty()
    ));
    assert!(matches!(err.root_cause(), EnvError::EmptyVarName { field } if field == "b"));
    assert_eq!(err.field_path(), vec!["inner", "b"]);
    assert_eq!(v.inner.a, 1);
}

#[derive(Debug, Default, PartialEq, Env)]
#[env(text)]
pub struct Endpoint {
    #[env("ENDPOINT_HOST")]
    pub host: String,
    #[env("ENDPOINT_PORT")]
    pub port: u16,
}

impl FromEnvText for Endpoint {
    type Err = String;

    fn from_env_text(text: &str) -> Result<Self, Self::Err> {
        let (host, port) = text
            .split_once(':')
            .ok_or_else(|| format!("expected host:port, got '{text}'"))?;
        let port = port.parse().map_err(|e| format!("bad port: {e}"))?;
        Ok(Endpoint {
            host: host.to_string(),
            port,
        })
    }
}

#[derive(Debug, Default, Env)]
pub struct Services {
    #[env("PRIMARY")]
    pub primary: Endpoint,
    pub fallback: Endpoint,
    #[env("REPLICA")]
    pub replica: Option<Box<Endpoint>>,
}

#[test]
fn test_text_parser_wins_over_recursion() {
    let mut v = Services {
        replica: Some(Box::default()),
        ..Services::default()
    };
    parser(&[
        ("PRIMARY", "db:5432"),
        ("REPLICA", "db2:5433"),
        ("ENDPOINT_HOST", "cache"),
        ("ENDPOINT_PORT", "6379"),
    ])
    .parse(&mut v)
    .unwrap();

    assert_eq!(
        v.primary,
        Endpoint {
            host: "db".to_string(),
            port: 5432
        }
    );
    assert_eq!(
        v.fallback,
        Endpoint {
            host: "cache".to_string(),
            port: 6379
        }
    );
    assert_eq!(v.replica.unwrap().port, 5433);
}

#[test]
fn test_text_parser_error_is_wrapped() {
    let mut v = Services::default();
    let err = parser(&[("PRIMARY", "no-port")]).parse(&mut v).unwrap_err();

    match err {
        EnvError::Parse { field, var, reason, .. } => {
            assert_eq!(field, "primary");
            assert_eq!(var, "PRIMARY");
            assert_eq!(reason, "expected host:port, got 'no-port'");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
    assert_eq!(v.primary, Endpoint::default());
}

#[derive(Debug, Default, Env)]
pub struct Quoted {
    #[env("RAW")]
    pub raw: String,
    #[env("RAW")]
    pub decoded: Json<String>,
}

#[test]
fn test_text_parser_wins_over_builtin() {
    let mut v = Quoted::default();
    parser(&[("RAW", r#""quoted""#)]).parse(&mut v).unwrap();
    assert_eq!(v.raw, r#""quoted""#);
    assert_eq!(*v.decoded, "quoted");
}

// An i32 as far as the built-in table is concerned, but with its own parser.
#[derive(Debug, Default, PartialEq)]
pub struct Level(pub i32);

impl FromEnvText for Level {
    type Err = String;

    fn from_env_text(text: &str) -> Result<Self, Self::Err> {
        match text {
            "low" => Ok(Level(1)),
            "high" => Ok(Level(99)),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

impl Target for Level {
    fn text_slot(&mut self) -> Option<&mut dyn TextSlot> {
        Some(self)
    }

    fn kind(&mut self) -> Kind<'_> {
        Kind::Scalar(Scalar::I32(&mut self.0))
    }
}

#[derive(Debug, Default, Env)]
pub struct Levels {
    #[env("LEVEL")]
    pub level: Level,
    #[env("LEVEL_OPT")]
    pub optional: Option<Level>,
}

#[test]
fn test_text_parser_wins_over_scalar_kind() {
    let mut v = Levels {
        optional: Some(Level(0)),
        ..Levels::default()
    };
    parser(&[("LEVEL", "high"), ("LEVEL_OPT", "low")])
        .parse(&mut v)
        .unwrap();
    assert_eq!(v.level, Level(99));
    assert_eq!(v.optional, Some(Level(1)));

    // A literal the built-in table would accept still goes to the text parser
    let err = parser(&[("LEVEL", "7")]).parse(&mut v).unwrap_err();
    assert!(matches!(
        err,
        EnvError::Parse { ref field, ref reason, .. }
            if field == "level" && reason == "unknown level '7'"
    ));
    assert_eq!(v.level, Level(99));
}

#[derive(Debug, Default, Env)]
pub struct AnnotatedIndirectStruct {
    #[env("B")]
    pub boxed: Box<Inner>,
}

#[derive(Debug, Default, Env)]
pub struct AnnotatedOptionalStruct {
    #[env("O")]
    pub optional: Option<Inner>,
}

#[test]
fn test_annotated_struct_behind_indirection_is_unparsable() {
    let mut boxed = AnnotatedIndirectStruct::default();
    let err = parser(&[("B", "1"), ("X", "2")]).parse(&mut boxed).unwrap_err();
    assert!(matches!(err, EnvError::UnparsableType { ref field } if field == "boxed"));
    assert_eq!(boxed.boxed.v, 0);

    let mut optional = AnnotatedOptionalStruct {
        optional: Some(Inner::default()),
    };
    let err = parser(&[("O", "1"), ("X", "2")])
        .parse(&mut optional)
        .unwrap_err();
    assert!(matches!(err, EnvError::UnparsableType { ref field } if field == "optional"));

    // Absent layer: skipped before the type is ever looked at
    let mut absent = AnnotatedOptionalStruct::default();
    parser(&[("O", "1")]).parse(&mut absent).unwrap();
    assert!(absent.optional.is_none());
}

#[derive(Debug, Default, Env)]
pub struct AnnotatedStruct {
    #[env("INNER")]
    pub inner: Inner,
}

#[test]
fn test_annotated_struct_without_text_parser() {
    let mut v = AnnotatedStruct::default();
    let err = parser(&[("INNER", "x"), ("X", "1")]).parse(&mut v).unwrap_err();
    assert!(matches!(err, EnvError::UnparsableType { ref field } if field == "inner"));
    assert_eq!(v.inner.v, 0);
}

#[derive(Env)]
pub struct RawPointer {
    #[env("C")]
    pub count: *const u8,
}

#[test]
fn test_unsupported_kind() {
    let mut v = RawPointer {
        count: std::ptr::null(),
    };
    let err = parser(&[("C", "2")]).parse(&mut v).unwrap_err();
    assert!(matches!(err, EnvError::UnparsableType { ref field } if field == "count"));
    assert!(v.count.is_null());
}

#[derive(Debug, Default, Env)]
pub struct WithList {
    pub untouched: Vec<String>,
    #[env("LIST")]
    pub list: Vec<String>,
}

#[test]
fn test_unannotated_unsupported_kind_is_skipped() {
    let mut v = WithList::default();
    let err = parser(&[("LIST", "a,b")]).parse(&mut v).unwrap_err();
    assert!(matches!(err, EnvError::UnparsableType { ref field } if field == "list"));
    assert!(v.list.is_empty());
}

#[derive(Debug, Default, Env)]
pub struct WithCollections {
    pub labels: HashMap<String, String>,
    pub ordered: BTreeMap<String, u8>,
    pub seen: HashSet<u32>,
    #[env("PORT")]
    pub port: u16,
}

#[test]
fn test_unannotated_collections_are_skipped() {
    let mut v = WithCollections::default();
    v.labels.insert("team".to_string(), "core".to_string());
    parser(&[("PORT", "8080"), ("LABELS", "x=y")])
        .parse(&mut v)
        .unwrap();
    assert_eq!(v.port, 8080);
    assert_eq!(v.labels.len(), 1);
    assert!(v.ordered.is_empty());
    assert!(v.seen.is_empty());
}

#[derive(Debug, Default, Env)]
pub struct Visibility {
    #[env("PUBLIC")]
    pub public: u8,
    #[env("PRIVATE")]
    private: u8,
    #[env(skip)]
    pub skipped: u8,
    #[env]
    pub by_name: u8,
    #[env(name = "RENAMED")]
    pub renamed: u8,
}

#[test]
fn test_settability_and_naming() {
    let mut v = Visibility::default();
    parser(&[
        ("PUBLIC", "1"),
        ("PRIVATE", "2"),
        ("SKIPPED", "3"),
        ("BY_NAME", "4"),
        ("RENAMED", "5"),
    ])
    .parse(&mut v)
    .unwrap();

    assert_eq!(v.public, 1);
    assert_eq!(v.private, 0);
    assert_eq!(v.skipped, 0);
    assert_eq!(v.by_name, 4);
    assert_eq!(v.renamed, 5);
}

#[test]
fn test_no_rollback_on_failure() {
    let mut flags = Flags::default();
    let err = parser(&[("D", "1"), ("C", "forty-two")])
        .parse(&mut flags)
        .unwrap_err();
    assert!(matches!(err, EnvError::Parse { .. }));
    assert!(flags.debug);
    assert_eq!(flags.count, 0);
}

#[test]
fn test_missing_string_var_assigns_empty() {
    #[derive(Default, Env)]
    pub struct Name {
        #[env("NAME")]
        pub name: String,
    }

    let mut v = Name {
        name: "before".to_string(),
    };
    parser(&[]).parse(&mut v).unwrap();
    assert_eq!(v.name, "");
}

#[test]
fn test_parser_is_reusable() {
    let p = parser(&[("D", "true"), ("C", "1")]);
    let mut first = Flags::default();
    let mut second = Flags::default();
    p.parse(&mut first).unwrap();
    p.parse(&mut second).unwrap();
    assert_eq!(first.count, second.count);
}
