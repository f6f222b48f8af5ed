//! The main `Container` struct: registration, aliasing and resolution.

use crate::catalog::{Catalog, ConstructFn, Param};
use crate::core::{normalize, Definition, Registration, ResolutionGuard, ResolvedCallable};
use crate::error::ContainerError;
use crate::factory::{build_factory, Factory};
use crate::inflector::Inflector;
use crate::value::{ArgMap, Args, Value};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;

/// A registration input, classified by [`Container::set`].
pub enum Entry {
  /// An already constructed object. Stored as an implicitly shared instance,
  /// unless its catalog type declares an invocation method, in which case it
  /// is stored as a bound-method callable.
  Object(Value),
  /// A type name (stored as a class definition) or a `"Type::method"`
  /// callable path.
  Name(String),
  /// A factory closure with its declared parameter list.
  Factory {
    params: Vec<Param>,
    call: ConstructFn,
  },
}

impl Entry {
  pub fn object(value: Value) -> Self {
    Self::Object(value)
  }

  /// Convenience for `Entry::object(Value::new(value))`.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Self::Object(Value::new(value))
  }

  pub fn name(name: &str) -> Self {
    Self::Name(name.to_string())
  }

  pub fn factory(
    params: Vec<Param>,
    call: impl Fn(Args) -> Value + Send + Sync + 'static,
  ) -> Self {
    Self::Factory {
      params,
      call: Arc::new(call),
    }
  }
}

/// A callable accepted by [`Container::call`].
pub enum Callable {
  /// A free function with a declared parameter list.
  Function {
    params: Vec<Param>,
    call: ConstructFn,
  },
  /// A `"Type::method"` path, or the bare name of a type with a declared
  /// invocation method. The receiver is resolved through the container.
  Name(String),
  /// A method on an already constructed receiver.
  Bound { receiver: Value, method: String },
}

impl Callable {
  pub fn function(
    params: Vec<Param>,
    call: impl Fn(Args) -> Value + Send + Sync + 'static,
  ) -> Self {
    Self::Function {
      params,
      call: Arc::new(call),
    }
  }

  pub fn name(name: &str) -> Self {
    Self::Name(name.to_string())
  }

  pub fn bound(receiver: Value, method: &str) -> Self {
    Self::Bound {
      receiver,
      method: method.to_string(),
    }
  }
}

/// The dependency-injection container.
///
/// Maps string identifiers to definitions and resolves them lazily, wiring
/// constructor and method parameters against the [`Catalog`]'s declared
/// signatures. Thread-safe; registration and resolution may happen from any
/// thread at any point in the application's lifetime.
pub struct Container {
  catalog: Arc<Catalog>,
  registry: DashMap<String, Registration>,
  aliases: DashMap<String, String>,
  // One cell per shared identifier: first construction is once-only even
  // under concurrent resolution.
  instances: DashMap<String, Arc<OnceCell<Value>>>,
  // Factories are memoized forever; see the note on `set`.
  factories: DashMap<String, Factory>,
  inflector: Inflector,
}

impl Container {
  /// Creates a container with its own empty catalog.
  pub fn new() -> Self {
    Self::with_catalog(Arc::new(Catalog::new()))
  }

  /// Creates a container over an existing (possibly shared) catalog.
  pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
    Self {
      catalog,
      registry: DashMap::new(),
      aliases: DashMap::new(),
      instances: DashMap::new(),
      factories: DashMap::new(),
      inflector: Inflector::new(),
    }
  }

  /// The catalog this container wires against.
  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  // --- REGISTRATION ---

  /// Registers a definition for `id`, plus any aliases.
  ///
  /// `id` must name a declared catalog entry (abstract or concrete);
  /// re-registration overwrites the definition. Note the documented
  /// limitation: once an identifier has been resolved, its factory is
  /// memoized and a redefinition is no longer observed.
  pub fn set(&self, id: &str, entry: Entry, aliases: &[&str]) -> Result<(), ContainerError> {
    self.register(id, entry, aliases, false)
  }

  /// Same as [`set`](Self::set), additionally marking `id` as shared so the
  /// first resolved instance is cached and reused.
  pub fn share(&self, id: &str, entry: Entry, aliases: &[&str]) -> Result<(), ContainerError> {
    self.register(id, entry, aliases, true)
  }

  /// Records `alias` as an alternate name for `id`.
  ///
  /// Aliases resolve a single hop and must target canonical identifiers; an
  /// alias key may not itself already be an alias.
  pub fn alias(&self, id: &str, alias: &str) -> Result<(), ContainerError> {
    let key = normalize(alias);
    if self.aliases.contains_key(&key) {
      return Err(ContainerError::AliasInUse(alias.to_string()));
    }
    self.aliases.insert(key, normalize(id));
    Ok(())
  }

  /// True if `id` (after one alias hop) has a definition, or names a concrete
  /// catalog type that can be auto-wired on demand.
  pub fn has(&self, id: &str) -> bool {
    let key = self.resolve_alias(normalize(id));
    self.has_key(&key)
  }

  /// Registers a post-construction method call for every resolved object
  /// that is an instance of `ty`.
  pub fn inflect(&self, ty: &str, method: &str, arguments: ArgMap) -> Result<(), ContainerError> {
    self.inflector.add(&self.catalog, ty, method, arguments)
  }

  // --- RESOLUTION ---

  /// Resolves `id` with no explicit arguments.
  pub fn get(&self, id: &str) -> Result<Value, ContainerError> {
    self.get_with(id, &ArgMap::new())
  }

  /// Resolves `id`, letting `arguments` override declared parameters by name.
  pub fn get_with(&self, id: &str, arguments: &ArgMap) -> Result<Value, ContainerError> {
    let key = self.resolve_alias(normalize(id));
    if !self.has_key(&key) {
      return Err(ContainerError::NotFound {
        id: id.to_string(),
        chain: ResolutionGuard::chain(),
      });
    }

    // Terminal fast path: a cached shared instance needs no guard, factory
    // or inflection pass.
    if let Some(cell) = self.instances.get(&key) {
      if let Some(value) = cell.value().get() {
        tracing::trace!(id = %key, "shared cache hit");
        return Ok(value.clone());
      }
    }

    let _guard = match ResolutionGuard::enter(&key) {
      Ok(guard) => guard,
      Err(chain) => {
        return Err(ContainerError::CircularReference {
          id: id.to_string(),
          chain,
        })
      }
    };

    if self.is_shared(&key) {
      // The cell makes first construction once-only across threads; the
      // guard above already rejected same-thread re-entry.
      let cell = self.instances.entry(key.clone()).or_default().clone();
      let value = cell.get_or_try_init(|| self.construct(&key, arguments))?;
      Ok(value.clone())
    } else {
      self.construct(&key, arguments)
    }
  }

  /// Resolves `id` and downcasts to `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>, ContainerError> {
    let value = self.get(id)?;
    value
      .downcast::<T>()
      .ok_or_else(|| ContainerError::WrongType {
        id: id.to_string(),
        expected: std::any::type_name::<T>(),
      })
  }

  /// Resolves and invokes a callable without registering it, using the same
  /// argument-resolution machinery as `get`.
  pub fn call(&self, target: Callable, arguments: &ArgMap) -> Result<Value, ContainerError> {
    let callable = self.classify_callable(target)?;
    let factory = build_factory(self, "call", &Definition::Callable(callable))?;
    factory(self, arguments)
  }

  // --- PRIVATE HELPERS ---

  fn register(
    &self,
    id: &str,
    entry: Entry,
    aliases: &[&str],
    shared: bool,
  ) -> Result<(), ContainerError> {
    let key = normalize(id);
    if !self.catalog.contains(&key) {
      return Err(ContainerError::InvalidIdentifier(id.to_string()));
    }
    let (definition, implicitly_shared) = self.classify(entry)?;
    // Validate every alias before recording anything.
    for alias in aliases {
      if self.aliases.contains_key(&normalize(alias)) {
        return Err(ContainerError::AliasInUse(alias.to_string()));
      }
    }
    self.registry.insert(
      key.clone(),
      Registration {
        definition,
        shared: shared || implicitly_shared,
      },
    );
    for alias in aliases {
      self.aliases.insert(normalize(alias), key.clone());
    }
    tracing::debug!(id = %key, shared, "registered service definition");
    Ok(())
  }

  fn classify(&self, entry: Entry) -> Result<(Definition, bool), ContainerError> {
    match entry {
      Entry::Factory { params, call } => Ok((
        Definition::Callable(ResolvedCallable::Function { params, call }),
        false,
      )),
      Entry::Name(name) => {
        let key = normalize(&name);
        if self.catalog.contains(&key) {
          return Ok((Definition::ClassName(key), false));
        }
        // Method names are case-sensitive: only the type segment of a
        // `Type::method` path goes through normalization.
        let path = name.strip_prefix("::").unwrap_or(&name);
        if let Some((ty, method)) = path.rsplit_once("::") {
          let ty = normalize(ty);
          if self.catalog.contains(&ty) {
            if self.catalog.method(&ty, method).is_none() {
              return Err(ContainerError::NoSuchMethod {
                ty,
                method: method.to_string(),
              });
            }
            return Ok((
              Definition::Callable(ResolvedCallable::StaticMethod {
                ty,
                method: method.to_string(),
              }),
              false,
            ));
          }
        }
        Err(ContainerError::UnknownClass(name))
      }
      Entry::Object(value) => {
        if let Some(method) = self.catalog.invoke_method_of(&value) {
          Ok((
            Definition::Callable(ResolvedCallable::BoundMethod {
              receiver: value,
              method,
            }),
            false,
          ))
        } else {
          // An already constructed instance has no reproducible create step,
          // so it is always shared.
          Ok((Definition::Instance(value), true))
        }
      }
    }
  }

  fn classify_callable(&self, target: Callable) -> Result<ResolvedCallable, ContainerError> {
    match target {
      Callable::Function { params, call } => Ok(ResolvedCallable::Function { params, call }),
      Callable::Bound { receiver, method } => Ok(ResolvedCallable::BoundMethod { receiver, method }),
      Callable::Name(name) => {
        let key = normalize(&name);
        if let Some(method) = self.catalog.invoke_method(&key) {
          return Ok(ResolvedCallable::StaticMethod { ty: key, method });
        }
        let path = name.strip_prefix("::").unwrap_or(&name);
        if let Some((ty, method)) = path.rsplit_once("::") {
          let ty = normalize(ty);
          if self.catalog.contains(&ty) && self.catalog.method(&ty, method).is_some() {
            return Ok(ResolvedCallable::StaticMethod {
              ty,
              method: method.to_string(),
            });
          }
        }
        Err(ContainerError::UnknownClass(name))
      }
    }
  }

  fn resolve_alias(&self, key: String) -> String {
    // A single redirection level: aliases target canonical identifiers.
    match self.aliases.get(&key) {
      Some(target) => target.clone(),
      None => key,
    }
  }

  fn has_key(&self, key: &str) -> bool {
    self.registry.contains_key(key) || self.catalog.is_concrete(key)
  }

  fn is_shared(&self, key: &str) -> bool {
    self
      .registry
      .get(key)
      .map_or(false, |registration| registration.shared)
  }

  fn construct(&self, key: &str, arguments: &ArgMap) -> Result<Value, ContainerError> {
    let factory = self.factory_for(key).map_err(|e| self.wrap(key, e))?;
    let value = factory(self, arguments).map_err(|e| self.wrap(key, e))?;
    self
      .inflector
      .apply(self, &value)
      .map_err(|e| self.wrap(key, e))?;
    Ok(value)
  }

  fn factory_for(&self, key: &str) -> Result<Factory, ContainerError> {
    if let Some(factory) = self.factories.get(key) {
      return Ok(factory.value().clone());
    }
    let definition = match self.registry.get(key) {
      Some(registration) => registration.value().definition.clone(),
      // Auto-wiring: any concrete catalog type resolves on demand, even
      // without a registered definition.
      None => Definition::ClassName(key.to_string()),
    };
    let factory = build_factory(self, key, &definition)?;
    tracing::debug!(id = %key, "built factory");
    let factory = self
      .factories
      .entry(key.to_string())
      .or_insert(factory)
      .clone();
    Ok(factory)
  }

  /// Wraps a mid-build failure with its identifier and chain; failures that
  /// already carry chain context propagate unchanged.
  fn wrap(&self, key: &str, cause: ContainerError) -> ContainerError {
    match cause {
      e @ (ContainerError::NotFound { .. }
      | ContainerError::CircularReference { .. }
      | ContainerError::ResolutionFailed { .. }) => e,
      cause => ContainerError::ResolutionFailed {
        id: key.to_string(),
        chain: ResolutionGuard::chain(),
        cause: Box::new(cause),
      },
    }
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}
