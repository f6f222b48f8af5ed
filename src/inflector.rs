//! Post-construction method calls applied by declared type.
//!
//! An inflection is `(type, method, argument overrides)`. Every freshly built
//! object that is an instance of `type` (its concrete type, or an interface
//! it declares) has `method` invoked on it, exactly once per resolution.

use crate::catalog::Catalog;
use crate::container::Container;
use crate::error::ContainerError;
use crate::resolver::resolve_arguments;
use crate::value::{ArgMap, Args, Value};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

struct Inflection {
  // Normalized declared type the method belongs to.
  ty: String,
  method: String,
  overrides: ArgMap,
  // The same inflection applies to many future objects with the same static
  // overrides, so the resolved argument list is computed once and reused.
  resolved: OnceCell<Vec<Value>>,
}

#[derive(Default)]
pub(crate) struct Inflector {
  entries: RwLock<Vec<Arc<Inflection>>>,
}

impl Inflector {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Records an inflection after validating it against the catalog.
  pub(crate) fn add(
    &self,
    catalog: &Catalog,
    ty: &str,
    method: &str,
    overrides: ArgMap,
  ) -> Result<(), ContainerError> {
    let key = crate::core::normalize(ty);
    if !catalog.contains(&key) {
      return Err(ContainerError::InvalidIdentifier(ty.to_string()));
    }
    if catalog.method(&key, method).is_none() {
      return Err(ContainerError::NoSuchMethod {
        ty: key,
        method: method.to_string(),
      });
    }
    tracing::debug!(ty = %key, method, "registered inflection");
    self.entries.write().push(Arc::new(Inflection {
      ty: key,
      method: method.to_string(),
      overrides,
      resolved: OnceCell::new(),
    }));
    Ok(())
  }

  /// Applies every matching inflection to a freshly built object.
  pub(crate) fn apply(&self, container: &Container, value: &Value) -> Result<(), ContainerError> {
    let catalog = container.catalog();
    // Snapshot matching entries before resolving: argument resolution can
    // recurse into `get`, which must not run under the entries lock.
    let matching: Vec<Arc<Inflection>> = self
      .entries
      .read()
      .iter()
      .filter(|entry| catalog.is_instance(value, &entry.ty))
      .cloned()
      .collect();

    for entry in matching {
      let declared = catalog
        .method(&entry.ty, &entry.method)
        .ok_or_else(|| ContainerError::NoSuchMethod {
          ty: entry.ty.clone(),
          method: entry.method.clone(),
        })?;
      let target = format!("{}::{}", entry.ty, entry.method);
      // Resolution happens outside the cell: resolving an argument can build
      // another matching object and re-enter `apply` on this thread, where a
      // blocking cell initialization would never return. Re-entry recomputes
      // and surfaces as a circular reference through the resolving stack.
      let arguments = match entry.resolved.get() {
        Some(arguments) => arguments.clone(),
        None => {
          let arguments =
            resolve_arguments(container, &target, &declared.params, &entry.overrides)?;
          // A racing thread may have filled the cell first; both lists come
          // from the same declared signature.
          entry.resolved.set(arguments.clone()).ok();
          arguments
        }
      };

      // The declared type carries the signature; the invoke body lives on the
      // value's concrete type.
      let concrete = catalog
        .method_on_value(value, &entry.method)
        .and_then(|method| method.invoke)
        .ok_or_else(|| ContainerError::NoSuchMethod {
          ty: catalog
            .type_name_of(value)
            .unwrap_or_else(|| entry.ty.clone()),
          method: entry.method.clone(),
        })?;
      tracing::trace!(ty = %entry.ty, method = %entry.method, "applying inflection");
      concrete(value, Args::new(arguments));
    }
    Ok(())
  }
}
