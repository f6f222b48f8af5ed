//! Type-erased values and the argument containers passed to closures.

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Named argument overrides, keyed by parameter name.
///
/// Explicit entries in an `ArgMap` always win over type-based resolution and
/// declared defaults.
pub type ArgMap = HashMap<String, Value>;

/// A cheaply clonable, type-erased handle to a resolved service.
///
/// Clones share the same underlying allocation, so a shared service resolved
/// twice yields two `Value`s pointing at the identical object.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
  /// Wraps an owned object.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self(Arc::new(value))
  }

  /// Wraps an already shared object without re-allocating.
  pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
    Self(value)
  }

  /// Attempts a typed view of the underlying object.
  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.0.clone().downcast::<T>().ok()
  }

  /// True if the underlying object is a `T`.
  pub fn is<T: Any>(&self) -> bool {
    (*self.0).type_id() == TypeId::of::<T>()
  }

  /// True if both handles point at the same object.
  pub fn ptr_eq(&self, other: &Value) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }

  pub(crate) fn type_id(&self) -> TypeId {
    (*self.0).type_id()
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Value({:?})", self.type_id())
  }
}

/// The ordered argument list handed to construct and invoke closures.
///
/// Arguments arrive in declaration order. The `take_*` methods consume from
/// the front and panic on a count or type mismatch; the closure author also
/// declared the parameter list, so a mismatch is a registration bug, not a
/// runtime condition.
pub struct Args(VecDeque<Value>);

impl Args {
  pub(crate) fn new(values: Vec<Value>) -> Self {
    Self(values.into())
  }

  /// Consumes the next argument as an owned `T`, cloning out of the handle.
  pub fn take<T: Any + Send + Sync + Clone>(&mut self) -> T {
    (*self.take_arc::<T>()).clone()
  }

  /// Consumes the next argument as a shared `T`.
  pub fn take_arc<T: Any + Send + Sync>(&mut self) -> Arc<T> {
    let value = self.take_value();
    value.downcast::<T>().unwrap_or_else(|| {
      panic!(
        "argument is not of the declared type {}",
        std::any::type_name::<T>()
      )
    })
  }

  /// Consumes the next argument without downcasting.
  pub fn take_value(&mut self) -> Value {
    self
      .0
      .pop_front()
      .expect("argument list exhausted; fewer arguments than declared parameters")
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
