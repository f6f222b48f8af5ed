//! # Weft DI
//!
//! A string-keyed, signature-driven dependency injection container.
//!
//! Services are registered under normalized string identifiers and built
//! lazily: the container consults each type's declared constructor signature
//! (the [`Catalog`]) and recursively resolves typed parameters, detecting
//! circular dependencies along the way. Identifiers can be aliased, marked
//! shared (singleton caching), and decorated with *inflections*: method calls
//! applied to every resolved object of a given type.
//!
//! ## Core concepts
//!
//! - **Catalog**: declared signatures standing in for runtime reflection.
//!   Any concrete catalog type resolves on demand, registered or not.
//! - **Container**: the registry plus the resolution engine.
//! - **Entry**: what a registration stores — an object, a type name (or a
//!   `"Type::method"` callable path), or a factory closure.
//! - **Shared**: a service cached after first resolution and reused.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use weft_di::{args, params, Container, Entry, Param, Value};
//!
//! struct Logger {
//!   prefix: String,
//! }
//!
//! struct Engine {
//!   cylinders: i64,
//!   logger: Arc<Logger>,
//! }
//!
//! let container = Container::new();
//!
//! // Declare signatures: parameter names, service types, defaults.
//! container
//!   .catalog()
//!   .define::<Logger>("Logger")
//!   .constructor(
//!     params![Param::with_default("prefix", "app".to_string())],
//!     |mut args| Value::new(Logger { prefix: args.take::<String>() }),
//!   )
//!   .register();
//!
//! container
//!   .catalog()
//!   .define::<Engine>("Engine")
//!   .constructor(
//!     params![
//!       Param::with_default("cylinders", 4_i64),
//!       Param::service("logger", "Logger"),
//!     ],
//!     |mut args| {
//!       Value::new(Engine {
//!         cylinders: args.take::<i64>(),
//!         logger: args.take_arc::<Logger>(),
//!       })
//!     },
//!   )
//!   .register();
//!
//! // Share the logger as a singleton, aliased "log".
//! container
//!   .share("Logger", Entry::name("Logger"), &["log"])
//!   .unwrap();
//!
//! // The engine is auto-wired straight from the catalog.
//! let engine = container.get_as::<Engine>("Engine").unwrap();
//! assert_eq!(engine.cylinders, 4);
//! assert_eq!(engine.logger.prefix, "app");
//!
//! // Explicit arguments override declared defaults.
//! let six = container
//!   .get_with("engine", &args! { "cylinders" => 6_i64 })
//!   .unwrap();
//! assert_eq!(six.downcast::<Engine>().unwrap().cylinders, 6);
//!
//! // Aliases resolve to the same shared instance.
//! let a = container.get_as::<Logger>("log").unwrap();
//! let b = container.get_as::<Logger>("Logger").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

mod catalog;
mod container;
mod core;
mod error;
mod factory;
mod global;
mod inflector;
mod macros;
mod resolver;
mod value;

pub use catalog::{Catalog, ConstructFn, MethodFn, Param, TypeBuilder};
pub use container::{Callable, Container, Entry};
pub use error::ContainerError;
pub use global::{global, init_global, try_global};
pub use value::{ArgMap, Args, Value};
