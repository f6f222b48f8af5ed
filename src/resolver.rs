//! Ordered argument resolution against a declared parameter list.

use crate::catalog::Param;
use crate::container::Container;
use crate::error::ContainerError;
use crate::value::{ArgMap, Value};

/// Produces the ordered argument list for one signature.
///
/// For each declared parameter, in declaration order:
/// 1. an explicit override keyed by the parameter's name wins;
/// 2. else a declared service type is resolved recursively through the
///    container (the recursion point where circular dependencies surface);
/// 3. else the declared default is used;
/// 4. else the parameter is unresolvable.
///
/// The parameter list itself is captured once per signature when its factory
/// is built; only the recursive lookups in step 2 run on every invocation, so
/// the dependency graph may evolve between calls.
pub(crate) fn resolve_arguments(
  container: &Container,
  target: &str,
  params: &[Param],
  overrides: &ArgMap,
) -> Result<Vec<Value>, ContainerError> {
  let mut arguments = Vec::with_capacity(params.len());
  for param in params {
    if let Some(value) = overrides.get(&param.name) {
      arguments.push(value.clone());
      continue;
    }
    if let Some(service) = &param.service {
      arguments.push(container.get(service)?);
      continue;
    }
    if let Some(default) = &param.default {
      arguments.push(default.clone());
      continue;
    }
    return Err(ContainerError::UnresolvableParameter {
      name: param.name.clone(),
      target: target.to_string(),
    });
  }
  Ok(arguments)
}
