//! Public macros for ergonomic registration and resolution.

/// Resolves a service from the global container, panicking on failure.
///
/// This is the "dependencies must be present" entry point; for a fallible
/// version use `global().get(...)` / `global().get_as(...)` directly.
///
/// ```
/// use weft_di::{init_global, resolve, Container, Entry, Value};
///
/// struct Motd(String);
///
/// let container = Container::new();
/// container.catalog().define::<Motd>("Motd").register();
/// container
///   .share("Motd", Entry::instance(Motd("hello".to_string())), &[])
///   .unwrap();
/// init_global(container).ok();
///
/// let motd = resolve!(Motd, "Motd");
/// assert_eq!(motd.0, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  // Untyped: resolve!("engine") -> Value
  ($id:expr) => {
    $crate::global()
      .get($id)
      .unwrap_or_else(|e| panic!("failed to resolve required service '{}': {}", $id, e))
  };

  // Typed: resolve!(Engine, "engine") -> Arc<Engine>
  ($ty:ty, $id:expr) => {
    $crate::global()
      .get_as::<$ty>($id)
      .unwrap_or_else(|e| panic!("failed to resolve required service '{}': {}", $id, e))
  };
}

/// Builds an [`ArgMap`](crate::ArgMap) from `name => value` pairs.
///
/// Each value is wrapped with [`Value::new`](crate::Value::new).
///
/// ```
/// use weft_di::args;
///
/// let overrides = args! { "cylinders" => 6_i64, "name" => "v6".to_string() };
/// assert_eq!(overrides.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
  () => { $crate::ArgMap::new() };
  ($($name:expr => $value:expr),+ $(,)?) => {{
    let mut map = $crate::ArgMap::new();
    $( map.insert(($name).to_string(), $crate::Value::new($value)); )+
    map
  }};
}

/// Builds a `Vec<Param>` from parameter expressions.
#[macro_export]
macro_rules! params {
  () => { ::std::vec::Vec::<$crate::Param>::new() };
  ($($param:expr),+ $(,)?) => { vec![$($param),+] };
}
