//! End-to-end resolution behavior: merging layers, then resolving
//! substitutions across them.

use hocon_config::{
    Config, ConfigError, ConfigValue, ConfigValueKind, Path, ResolveOptions, merge, resolve,
    resolve_at,
};
use hocon_origin::Origin;
use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn origin() -> Origin {
    Origin::new_file("test.conf")
}

fn path(s: &str) -> Path {
    Path::parse(s).unwrap()
}

fn int(i: i64) -> ConfigValue {
    ConfigValue::int(i, origin())
}

fn string(s: &str) -> ConfigValue {
    ConfigValue::string(s, origin())
}

fn unquoted(s: &str) -> ConfigValue {
    ConfigValue::unquoted_string(s, origin())
}

fn list(items: Vec<ConfigValue>) -> ConfigValue {
    ConfigValue::list(items, origin())
}

fn obj(entries: Vec<(&str, ConfigValue)>) -> ConfigValue {
    let map: IndexMap<String, ConfigValue> =
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ConfigValue::object(map, origin())
}

fn subst(p: &str) -> ConfigValue {
    ConfigValue::reference(path(p), false, origin())
}

fn optional(p: &str) -> ConfigValue {
    ConfigValue::reference(path(p), true, origin())
}

fn concat(pieces: Vec<ConfigValue>) -> ConfigValue {
    ConfigValue::concatenation(pieces, origin()).unwrap()
}

fn resolved(root: ConfigValue) -> Config {
    Config::new(root).unwrap().resolve().unwrap()
}

fn resolve_err(root: ConfigValue) -> ConfigError {
    resolve(&root, &ResolveOptions::default()).unwrap_err()
}

fn hash_of(value: &ConfigValue) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_int_and_float_equality() {
    for n in [-3, 0, 1, 42, 1 << 40] {
        let i = int(n);
        let f = ConfigValue::float(n as f64, origin());
        assert_eq!(i, f, "{n}");
        assert_eq!(hash_of(&i), hash_of(&f), "{n}");
        assert_ne!(i, ConfigValue::float(n as f64 + 0.5, origin()), "{n}");
    }
}

#[test]
fn test_first_layer_wins_for_non_objects() {
    let candidates = [
        int(1),
        string("s"),
        ConfigValue::boolean(false, origin()),
        list(vec![int(1)]),
    ];
    for x in candidates {
        for y in [int(2), obj(vec![("a", int(1))]), list(vec![]), subst("z")] {
            assert_eq!(merge(Some(&path("p")), vec![x.clone(), y]), Some(x.clone()));
        }
    }
}

#[test]
fn test_objects_merge_key_by_key() {
    let layers = vec![obj(vec![("a", int(1))]), obj(vec![("a", int(2)), ("b", int(3))])];
    let merged = merge(None, layers).unwrap();
    assert_eq!(merged, obj(vec![("a", int(1)), ("b", int(3))]));
}

#[test]
fn test_merge_is_associative() {
    let a = obj(vec![("x", obj(vec![("p", int(1))]))]);
    let b = obj(vec![("x", obj(vec![("q", int(2))])), ("y", int(3))]);
    let c = obj(vec![("x", int(9)), ("z", int(4))]);

    let left = a.clone().with_fallback(b.clone()).with_fallback(c.clone());
    let right = a.with_fallback(b.with_fallback(c));
    assert_eq!(left, right);
}

#[test]
fn test_resolving_resolved_tree_is_identity() {
    let root = obj(vec![("a", obj(vec![("b", list(vec![int(1), string("x")]))]))]);
    assert_eq!(resolve(&root, &ResolveOptions::default()).unwrap(), root);
}

#[test]
fn test_forward_reference() {
    let config = resolved(obj(vec![("a", int(5)), ("b", subst("a"))]));
    assert_eq!(config.get_i64("b").unwrap(), 5);

    let config = resolved(obj(vec![("b", subst("a")), ("a", int(5))]));
    assert_eq!(config.get_i64("b").unwrap(), 5);
}

#[test]
fn test_mutual_cycle() {
    match resolve_err(obj(vec![("a", subst("b")), ("b", subst("a"))])) {
        ConfigError::CycleDetected { chain, .. } => {
            assert_eq!(chain, vec![path("a"), path("b"), path("a")]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_self_cycle_without_fallback() {
    let err = resolve_err(obj(vec![("a", subst("a"))]));
    assert!(matches!(err, ConfigError::CycleDetected { .. }));
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("H-1-2"));
}

#[test]
fn test_cycle_through_object() {
    let err = resolve_err(obj(vec![("a", obj(vec![("b", subst("a"))]))]));
    assert!(matches!(err, ConfigError::CycleDetected { .. }));
}

#[test]
fn test_self_reference_sees_lower_layer() {
    // x = [1, 2, 3]
    // x = ${x} [4, 5]
    let lower = obj(vec![("x", list(vec![int(1), int(2), int(3)]))]);
    let upper = obj(vec![(
        "x",
        concat(vec![subst("x"), unquoted(" "), list(vec![int(4), int(5)])]),
    )]);

    let config = resolved(upper.with_fallback(lower));
    let items: Vec<i64> = config
        .get_list("x")
        .unwrap()
        .iter()
        .filter_map(|v| v.as_number().and_then(|n| n.as_i64()))
        .collect();
    assert_eq!(items, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_self_reference_across_three_layers() {
    let bottom = obj(vec![("x", list(vec![int(1)]))]);
    let middle = obj(vec![("x", concat(vec![subst("x"), list(vec![int(2)])]))]);
    let top = obj(vec![("x", concat(vec![subst("x"), list(vec![int(3)])]))]);

    let config = resolved(top.with_fallback(middle).with_fallback(bottom));
    assert_eq!(config.get_list("x").unwrap().len(), 3);
    assert_eq!(
        config.get_value("x").unwrap(),
        &list(vec![int(1), int(2), int(3)])
    );
}

#[test]
fn test_self_reference_in_string() {
    // path = "/usr/bin"
    // path = ${path}":/opt/bin"
    let lower = obj(vec![("path", string("/usr/bin"))]);
    let upper = obj(vec![("path", concat(vec![subst("path"), string(":/opt/bin")]))]);

    let config = resolved(upper.with_fallback(lower));
    assert_eq!(config.get_string("path").unwrap(), "/usr/bin:/opt/bin");
}

#[test]
fn test_optional_self_reference_without_lower_layer() {
    let config = resolved(obj(vec![("path", concat(vec![optional("path"), string(":/bin")]))]));
    assert_eq!(config.get_string("path").unwrap(), ":/bin");
}

#[test]
fn test_optional_missing_is_omitted() {
    let config = resolved(obj(vec![("a", optional("missing")), ("b", int(1))]));
    assert!(!config.has_path("a").unwrap());
    assert!(matches!(config.get_value("a"), Err(ConfigError::Missing { .. })));

    // a = ${?missing} foo
    let config = resolved(obj(vec![(
        "a",
        concat(vec![optional("missing"), unquoted(" "), unquoted("foo")]),
    )]));
    assert_eq!(config.get_string("a").unwrap(), "foo");
}

#[test]
fn test_whitespace_around_unset_optional() {
    // a = foo ${?missing}
    // b = x ${?missing} y
    // c = ${?missing} " q"
    let root = obj(vec![
        ("a", concat(vec![unquoted("foo"), unquoted(" "), optional("missing")])),
        (
            "b",
            concat(vec![
                unquoted("x"),
                unquoted(" "),
                optional("missing"),
                unquoted(" "),
                unquoted("y"),
            ]),
        ),
        ("c", concat(vec![optional("missing"), unquoted(" "), string(" q")])),
    ]);
    let config = resolved(root);
    assert_eq!(config.get_string("a").unwrap(), "foo");
    assert_eq!(config.get_string("b").unwrap(), "x y");
    assert_eq!(config.get_string("c").unwrap(), " q");
}

#[test]
fn test_optional_missing_removed_from_list() {
    let config = resolved(obj(vec![("l", list(vec![int(1), optional("missing"), int(2)]))]));
    assert_eq!(config.get_list("l").unwrap().len(), 2);
}

#[test]
fn test_optional_reference_falls_back_to_lower_layer() {
    // a = 1
    // a = ${?missing}
    let lower = obj(vec![("a", int(1))]);
    let upper = obj(vec![("a", optional("missing"))]);
    let config = resolved(upper.with_fallback(lower));
    assert_eq!(config.get_i64("a").unwrap(), 1);
}

#[test]
fn test_undefined_required_substitution() {
    match resolve_err(obj(vec![("a", obj(vec![("b", subst("nope"))]))])) {
        ConfigError::UndefinedSubstitution { expr, trace, .. } => {
            assert_eq!(expr.path, path("nope"));
            assert!(!expr.optional);
            assert_eq!(trace, vec![path("a"), path("a.b")]);
        }
        other => panic!("expected undefined substitution, got {:?}", other),
    }
}

#[test]
fn test_object_with_list_is_wrong_type() {
    let root = obj(vec![("a", concat(vec![obj(vec![("a", int(1))]), list(vec![int(1), int(2)])]))]);
    match resolve_err(root) {
        ConfigError::WrongType { path: at, .. } => assert_eq!(at, Some(path("a"))),
        other => panic!("expected wrong type, got {:?}", other),
    }
}

#[test]
fn test_object_concatenation_through_substitutions() {
    // base = { a: 1, b: 1 }
    // derived = ${base} { b: 2 }
    let root = obj(vec![
        ("base", obj(vec![("a", int(1)), ("b", int(1))])),
        ("derived", concat(vec![subst("base"), unquoted(" "), obj(vec![("b", int(2))])])),
    ]);
    let config = resolved(root);
    assert_eq!(config.get_i64("derived.a").unwrap(), 1);
    assert_eq!(config.get_i64("derived.b").unwrap(), 2);
}

#[test]
fn test_object_over_reference_merges_after_resolution() {
    // base = { x: 1 }
    // foo = ${base}
    // foo { y: 2 }
    // y_copy = ${foo.y}
    // x_copy = ${foo.x}
    let lower = obj(vec![("base", obj(vec![("x", int(1))])), ("foo", subst("base"))]);
    let upper = obj(vec![
        ("foo", obj(vec![("y", int(2))])),
        ("y_copy", subst("foo.y")),
        ("x_copy", subst("foo.x")),
    ]);
    let root = upper.with_fallback(lower);
    let foo = root.as_object().unwrap().get("foo").unwrap();
    assert!(matches!(foo.value, ConfigValueKind::DelayedMergeObject(_)));

    let config = resolved(root);
    assert_eq!(config.get_i64("foo.x").unwrap(), 1);
    assert_eq!(config.get_i64("foo.y").unwrap(), 2);
    assert_eq!(config.get_i64("y_copy").unwrap(), 2);
    assert_eq!(config.get_i64("x_copy").unwrap(), 1);
}

#[test]
fn test_reference_into_object_being_merged() {
    // base { host = "h" }
    // svc = ${base}
    // svc { port = 80, url = ${svc.host}, alias = ${svc.name}, name = ${base.host} }
    let lower = obj(vec![("base", obj(vec![("host", string("h"))])), ("svc", subst("base"))]);
    let upper = obj(vec![(
        "svc",
        obj(vec![
            ("port", int(80)),
            ("url", subst("svc.host")),
            ("alias", subst("svc.name")),
            ("name", subst("base.host")),
        ]),
    )]);

    let config = resolved(upper.with_fallback(lower));
    assert_eq!(config.get_string("svc.url").unwrap(), "h");
    assert_eq!(config.get_string("svc.alias").unwrap(), "h");
    assert_eq!(config.get_string("svc.host").unwrap(), "h");
    assert_eq!(config.get_i64("svc.port").unwrap(), 80);
}

#[test]
fn test_lookup_into_merge_leaves_siblings_alone() {
    // base { host = "h" }
    // svc = ${base}
    // svc { broken = ${nope} }
    // url = ${svc.host}
    let lower = obj(vec![("base", obj(vec![("host", string("h"))])), ("svc", subst("base"))]);
    let upper = obj(vec![
        ("svc", obj(vec![("broken", subst("nope"))])),
        ("url", subst("svc.host")),
    ]);
    let root = upper.with_fallback(lower);
    let options = ResolveOptions::default();

    assert_eq!(resolve_at(&root, &path("url"), &options).unwrap(), Some(string("h")));
    assert!(matches!(
        resolve(&root, &options),
        Err(ConfigError::UndefinedSubstitution { .. })
    ));
}

#[test]
fn test_relativized_reference_falls_back_to_root() {
    // an included document { y: ${x}, z: ${w} } mounted under "sub"
    let included = obj(vec![("y", subst("x")), ("z", subst("w"))]).relativized(&path("sub"));
    let mut sub = included.as_object().unwrap().clone().into_entries();
    sub.insert("w".to_string(), int(7));

    let root = obj(vec![("x", int(1)), ("sub", ConfigValue::object(sub, origin()))]);
    let config = resolved(root);
    assert_eq!(config.get_i64("sub.y").unwrap(), 1);
    assert_eq!(config.get_i64("sub.z").unwrap(), 7);
}

#[test]
fn test_allow_unresolved_keeps_references() {
    let root = obj(vec![
        ("a", subst("missing")),
        ("b", concat(vec![string("x"), subst("missing")])),
        ("c", subst("d")),
        ("d", int(4)),
    ]);
    let options = ResolveOptions::new().with_allow_unresolved(true);
    let partial = resolve(&root, &options).unwrap();

    assert!(!partial.is_resolved());
    let object = partial.as_object().unwrap();
    assert!(matches!(object.get("a").unwrap().value, ConfigValueKind::Reference(_)));
    assert!(matches!(object.get("b").unwrap().value, ConfigValueKind::Concatenation(_)));
    assert_eq!(object.get("c"), Some(&int(4)));

    let config = Config::new(partial).unwrap();
    assert!(matches!(config.get_value("a"), Err(ConfigError::NotResolved { .. })));
}

#[test]
fn test_resolve_at_ignores_unrelated_errors() {
    let root = obj(vec![
        ("a", subst("b.c")),
        ("b", obj(vec![("c", int(3))])),
        ("broken", subst("nope")),
    ]);
    let options = ResolveOptions::default();

    assert_eq!(resolve_at(&root, &path("a"), &options).unwrap(), Some(int(3)));
    assert_eq!(resolve_at(&root, &path("b.missing"), &options).unwrap(), None);
    assert!(resolve_at(&root, &path("broken"), &options).is_err());
    assert!(resolve(&root, &options).is_err());
}

#[test]
fn test_shared_target_resolved_once_per_path() {
    let root = obj(vec![
        ("shared", obj(vec![("v", subst("leaf"))])),
        ("leaf", int(10)),
        ("one", subst("shared")),
        ("two", subst("shared.v")),
    ]);
    let config = resolved(root);
    assert_eq!(config.get_i64("one.v").unwrap(), 10);
    assert_eq!(config.get_i64("two").unwrap(), 10);
    assert_eq!(config.get_i64("shared.v").unwrap(), 10);
}

#[test]
fn test_null_is_a_defined_value() {
    let root = obj(vec![("n", ConfigValue::null(origin())), ("copy", subst("n"))]);
    let config = resolved(root);
    assert!(config.get_value("copy").unwrap().is_null());
    assert!(!config.has_path("copy").unwrap());
}

#[test]
fn test_scalar_concatenation_keeps_number_text() {
    let root = obj(vec![
        ("port", ConfigValue::number(8080.0, Some("8080".to_string()), origin())),
        ("addr", concat(vec![string("localhost:"), subst("port")])),
    ]);
    assert_eq!(resolved(root).get_string("addr").unwrap(), "localhost:8080");
}

#[test]
fn test_path_render_round_trip() {
    let cases = [
        vec!["a"],
        vec!["a.b", "c"],
        vec!["with space", "x-y", "_z"],
        vec!["$", "10"],
    ];
    for elements in cases {
        let p = Path::from_elements(elements.clone()).unwrap();
        assert_eq!(Path::parse(&p.render()).unwrap(), p, "{:?}", elements);
    }
}

#[test]
fn test_error_origin_points_at_reference() {
    let at = Origin::new_file("app.conf").with_line_number(12);
    let reference = ConfigValue::reference(path("nope"), false, at);
    let err = resolve_err(obj(vec![("a", reference)]));
    assert_eq!(err.origin().map(|o| o.description()), Some("app.conf: 12".to_string()));
}
