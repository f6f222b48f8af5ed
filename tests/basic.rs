use pretty_assertions::assert_eq;
use std::sync::Arc;
use weft_di::{args, params, Container, ContainerError, Entry, Param, Value};

// --- Test Fixtures ---

struct Logger {
  prefix: String,
}

struct Engine {
  cylinders: i64,
}

fn demo_container() -> Container {
  let container = Container::new();
  container
    .catalog()
    .define::<Logger>("Logger")
    .constructor(
      params![Param::with_default("prefix", "app".to_string())],
      |mut args| {
        Value::new(Logger {
          prefix: args.take::<String>(),
        })
      },
    )
    .register();
  container
    .catalog()
    .define::<Engine>("Engine")
    .constructor(
      params![Param::with_default("cylinders", 4_i64)],
      |mut args| {
        Value::new(Engine {
          cylinders: args.take::<i64>(),
        })
      },
    )
    .register();
  container
}

// --- Basic Tests ---

#[test]
fn test_engine_defaults_and_explicit_overrides() {
  let container = demo_container();

  // The declared default applies when no argument is given.
  let stock = container.get_as::<Engine>("Engine").unwrap();
  assert_eq!(stock.cylinders, 4);

  // An explicit argument always wins over the default.
  let tuned = container
    .get_with("Engine", &args! { "cylinders" => 6_i64 })
    .unwrap();
  assert_eq!(tuned.downcast::<Engine>().unwrap().cylinders, 6);
}

#[test]
fn test_normalization_collapses_case_and_leading_separator() {
  let container = demo_container();
  container
    .share("Engine", Entry::name("Engine"), &[])
    .unwrap();

  let a = container.get("::Engine").unwrap();
  let b = container.get("engine").unwrap();
  let c = container.get("ENGINE").unwrap();

  // All three spellings hit the same shared registration.
  assert!(a.ptr_eq(&b));
  assert!(b.ptr_eq(&c));
}

#[test]
fn test_shared_identifiers_return_the_identical_instance() {
  let container = demo_container();
  container
    .share("Logger", Entry::name("Logger"), &[])
    .unwrap();

  let first = container.get_as::<Logger>("Logger").unwrap();
  let second = container.get_as::<Logger>("Logger").unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.prefix, "app");
}

#[test]
fn test_non_shared_identifiers_return_distinct_instances() {
  let container = demo_container();
  container.set("Engine", Entry::name("Engine"), &[]).unwrap();

  let first = container.get("Engine").unwrap();
  let second = container.get("Engine").unwrap();
  assert!(!first.ptr_eq(&second));
}

#[test]
fn test_instance_entries_are_implicitly_shared_and_aliasable() {
  let container = demo_container();
  // `set`, not `share`: an already constructed object is shared regardless.
  container
    .set(
      "Logger",
      Entry::instance(Logger {
        prefix: "boot".to_string(),
      }),
      &["log"],
    )
    .unwrap();

  let by_name = container.get_as::<Logger>("Logger").unwrap();
  let by_alias = container.get_as::<Logger>("log").unwrap();
  assert!(Arc::ptr_eq(&by_name, &by_alias));
  assert_eq!(by_alias.prefix, "boot");
}

#[test]
fn test_pre_shared_objects_keep_their_allocation() {
  let container = demo_container();
  let logger = Arc::new(Logger {
    prefix: "boot".to_string(),
  });

  // Wrapping an existing Arc does not re-allocate: the container hands back
  // the very same object.
  container
    .set("Logger", Entry::object(Value::from_arc(logger.clone())), &[])
    .unwrap();

  let resolved = container.get_as::<Logger>("Logger").unwrap();
  assert!(Arc::ptr_eq(&logger, &resolved));
}

#[test]
fn test_concrete_catalog_types_auto_wire_without_registration() {
  let container = demo_container();

  assert!(container.has("Engine"));
  assert!(!container.has("ghost"));

  // Never registered, still resolvable; auto-wired services are transient.
  let first = container.get("Engine").unwrap();
  let second = container.get("Engine").unwrap();
  assert!(!first.ptr_eq(&second));
}

#[test]
fn test_unknown_identifier_is_not_found() {
  let container = demo_container();
  let err = container.get("ghost").unwrap_err();
  assert!(matches!(err, ContainerError::NotFound { .. }));
}

#[test]
fn test_set_rejects_identifiers_outside_the_catalog() {
  let container = demo_container();
  let err = container
    .set("ghost", Entry::name("Engine"), &[])
    .unwrap_err();
  assert!(matches!(err, ContainerError::InvalidIdentifier(_)));
}

#[test]
fn test_set_rejects_definitions_naming_unknown_classes() {
  let container = demo_container();
  let err = container
    .set("Engine", Entry::name("ghost"), &[])
    .unwrap_err();
  assert!(matches!(err, ContainerError::UnknownClass(_)));
}

#[test]
fn test_alias_collisions_are_rejected() {
  let container = demo_container();
  container.alias("Engine", "motor").unwrap();

  let err = container.alias("Logger", "motor").unwrap_err();
  assert!(matches!(err, ContainerError::AliasInUse(_)));
}

#[test]
fn test_alias_resolution_is_single_hop() {
  let container = demo_container();
  container
    .share("Engine", Entry::name("Engine"), &[])
    .unwrap();
  container.alias("Engine", "motor").unwrap();

  // The alias behaves exactly like the canonical identifier.
  let direct = container.get("Engine").unwrap();
  let via_alias = container.get("motor").unwrap();
  assert!(direct.ptr_eq(&via_alias));

  // An alias targeting another alias does not chain: one hop lands on a key
  // with no definition of its own.
  container.alias("motor", "motor2").unwrap();
  let err = container.get("motor2").unwrap_err();
  assert!(matches!(err, ContainerError::NotFound { .. }));
}

#[test]
fn test_typed_access_rejects_mismatched_types() {
  let container = demo_container();
  let err = container.get_as::<Logger>("Engine").err();
  assert!(matches!(err, Some(ContainerError::WrongType { .. })));
}
