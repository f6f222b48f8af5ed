//! The type universe consumed by the container.
//!
//! Rust has no runtime reflection, so the "given a class, return its
//! parameter list" capability is an explicit registration layer: each
//! participating type declares its constructor signature, named methods,
//! implemented interface identifiers and (optionally) an invocation method.
//! The container only ever asks the catalog three questions: introspect a
//! signature, construct, invoke.

use crate::core::normalize;
use crate::value::{Args, Value};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an instance from an ordered argument list.
pub type ConstructFn = Arc<dyn Fn(Args) -> Value + Send + Sync>;

/// Invokes a named method on a receiver with an ordered argument list.
pub type MethodFn = Arc<dyn Fn(&Value, Args) -> Value + Send + Sync>;

/// One declared parameter of a constructor or method.
///
/// A parameter is satisfied, in order of precedence, by an explicit argument
/// keyed by its name, by resolving its declared service type against the
/// container, or by its declared default.
#[derive(Clone)]
pub struct Param {
  pub(crate) name: String,
  pub(crate) service: Option<String>,
  pub(crate) default: Option<Value>,
}

impl Param {
  /// A parameter whose value is resolved from the container by service id.
  pub fn service(name: &str, id: &str) -> Self {
    Self {
      name: name.to_string(),
      service: Some(id.to_string()),
      default: None,
    }
  }

  /// A parameter with a declared default value.
  pub fn with_default<T: Any + Send + Sync>(name: &str, value: T) -> Self {
    Self {
      name: name.to_string(),
      service: None,
      default: Some(Value::new(value)),
    }
  }

  /// A parameter that must be supplied as an explicit argument.
  pub fn required(name: &str) -> Self {
    Self {
      name: name.to_string(),
      service: None,
      default: None,
    }
  }
}

#[derive(Clone)]
pub(crate) struct Constructor {
  pub(crate) params: Vec<Param>,
  pub(crate) build: ConstructFn,
}

#[derive(Clone)]
pub(crate) struct Method {
  pub(crate) params: Vec<Param>,
  // Interface entries may declare a signature without a body; concrete
  // implementors must supply one.
  pub(crate) invoke: Option<MethodFn>,
}

struct TypeEntry {
  // None for interface (abstract) entries.
  type_id: Option<TypeId>,
  interfaces: Vec<String>,
  constructor: Option<Constructor>,
  methods: HashMap<String, Method>,
  invoke_method: Option<String>,
}

/// Registry of declared types, keyed by normalized identifier.
#[derive(Default)]
pub struct Catalog {
  types: DashMap<String, TypeEntry>,
  // Reverse map from a concrete Rust type to its catalog identifier, used for
  // instance-of checks on resolved values.
  names: DashMap<TypeId, String>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts declaring a concrete type under `name`.
  ///
  /// Nothing is recorded until [`TypeBuilder::register`] is called.
  /// Re-declaring a name overwrites the previous entry.
  pub fn define<T: Any + Send + Sync>(&self, name: &str) -> TypeBuilder<'_> {
    TypeBuilder {
      catalog: self,
      name: normalize(name),
      type_id: Some(TypeId::of::<T>()),
      interfaces: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
      invoke_method: None,
    }
  }

  /// Starts declaring an abstract (interface) entry under `name`.
  ///
  /// Interface entries carry no constructor; their methods may be declared
  /// signature-only via [`TypeBuilder::method_spec`].
  pub fn define_interface(&self, name: &str) -> TypeBuilder<'_> {
    TypeBuilder {
      catalog: self,
      name: normalize(name),
      type_id: None,
      interfaces: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
      invoke_method: None,
    }
  }

  /// True if `id` names any declared entry, abstract or concrete.
  pub fn contains(&self, id: &str) -> bool {
    self.types.contains_key(&normalize(id))
  }

  /// True if `id` names a concrete (constructible-in-principle) type.
  pub(crate) fn is_concrete(&self, id: &str) -> bool {
    self
      .types
      .get(&normalize(id))
      .map_or(false, |entry| entry.type_id.is_some())
  }

  pub(crate) fn constructor(&self, id: &str) -> Option<Constructor> {
    self
      .types
      .get(&normalize(id))
      .and_then(|entry| entry.constructor.clone())
  }

  pub(crate) fn method(&self, ty: &str, name: &str) -> Option<Method> {
    self
      .types
      .get(&normalize(ty))
      .and_then(|entry| entry.methods.get(name).cloned())
  }

  pub(crate) fn invoke_method(&self, ty: &str) -> Option<String> {
    self
      .types
      .get(&normalize(ty))
      .and_then(|entry| entry.invoke_method.clone())
  }

  /// The catalog identifier of a value's concrete type, if declared.
  pub(crate) fn type_name_of(&self, value: &Value) -> Option<String> {
    self.names.get(&value.type_id()).map(|name| name.clone())
  }

  /// Looks a method up on a value's concrete type.
  pub(crate) fn method_on_value(&self, value: &Value, name: &str) -> Option<Method> {
    let concrete = self.type_name_of(value)?;
    self.method(&concrete, name)
  }

  pub(crate) fn invoke_method_of(&self, value: &Value) -> Option<String> {
    let concrete = self.type_name_of(value)?;
    self.invoke_method(&concrete)
  }

  /// True if `value` is an instance of `ty`: either its concrete type, or an
  /// interface its concrete type declares.
  pub(crate) fn is_instance(&self, value: &Value, ty: &str) -> bool {
    let ty = normalize(ty);
    let Some(concrete) = self.type_name_of(value) else {
      return false;
    };
    if concrete == ty {
      return true;
    }
    self
      .types
      .get(&concrete)
      .map_or(false, |entry| entry.interfaces.iter().any(|i| *i == ty))
  }
}

/// Accumulates one type declaration; writes to the catalog on `register`.
pub struct TypeBuilder<'c> {
  catalog: &'c Catalog,
  name: String,
  type_id: Option<TypeId>,
  interfaces: Vec<String>,
  constructor: Option<Constructor>,
  methods: HashMap<String, Method>,
  invoke_method: Option<String>,
}

impl<'c> TypeBuilder<'c> {
  /// Declares that the type implements the interface entry `name`.
  pub fn implements(mut self, name: &str) -> Self {
    self.interfaces.push(normalize(name));
    self
  }

  /// Declares the constructor signature and its build closure.
  pub fn constructor(
    mut self,
    params: Vec<Param>,
    build: impl Fn(Args) -> Value + Send + Sync + 'static,
  ) -> Self {
    self.constructor = Some(Constructor {
      params,
      build: Arc::new(build),
    });
    self
  }

  /// Declares an instance method with its invoke closure.
  pub fn method(
    mut self,
    name: &str,
    params: Vec<Param>,
    invoke: impl Fn(&Value, Args) -> Value + Send + Sync + 'static,
  ) -> Self {
    self.methods.insert(
      name.to_string(),
      Method {
        params,
        invoke: Some(Arc::new(invoke)),
      },
    );
    self
  }

  /// Declares a method signature without a body (interface entries).
  pub fn method_spec(mut self, name: &str, params: Vec<Param>) -> Self {
    self.methods.insert(
      name.to_string(),
      Method {
        params,
        invoke: None,
      },
    );
    self
  }

  /// Marks a declared method as the type's invocation method, making bare
  /// objects of this type (and the bare type name) callable.
  pub fn invoke_via(mut self, method: &str) -> Self {
    self.invoke_method = Some(method.to_string());
    self
  }

  /// Records the declaration in the catalog.
  pub fn register(self) {
    if let Some(type_id) = self.type_id {
      self.catalog.names.insert(type_id, self.name.clone());
    }
    self.catalog.types.insert(
      self.name,
      TypeEntry {
        type_id: self.type_id,
        interfaces: self.interfaces,
        constructor: self.constructor,
        methods: self.methods,
        invoke_method: self.invoke_method,
      },
    );
  }
}
