//! Translates definitions into reusable factory closures.
//!
//! A factory is built at most once per identifier: signature introspection
//! happens here, and the resulting closure only resolves arguments and
//! constructs or invokes. The container memoizes the closure forever, so a
//! redefinition after the first resolution of an identifier is not observed.

use crate::container::Container;
use crate::core::{Definition, ResolvedCallable};
use crate::error::ContainerError;
use crate::resolver::resolve_arguments;
use crate::value::{ArgMap, Args, Value};
use std::sync::Arc;

/// An argument-map-to-instance closure bound to one identifier.
pub(crate) type Factory =
  Arc<dyn Fn(&Container, &ArgMap) -> Result<Value, ContainerError> + Send + Sync>;

pub(crate) fn build_factory(
  container: &Container,
  id: &str,
  definition: &Definition,
) -> Result<Factory, ContainerError> {
  match definition {
    Definition::Instance(value) => {
      let value = value.clone();
      Ok(Arc::new(move |_, _| Ok(value.clone())))
    }

    Definition::ClassName(ty) => {
      let ctor = container
        .catalog()
        .constructor(ty)
        .ok_or_else(|| ContainerError::MissingConstructor { ty: ty.clone() })?;
      let target = format!("{ty}::constructor");
      Ok(Arc::new(move |container, overrides| {
        let arguments = resolve_arguments(container, &target, &ctor.params, overrides)?;
        Ok((ctor.build)(Args::new(arguments)))
      }))
    }

    Definition::Callable(ResolvedCallable::Function { params, call }) => {
      let params = params.clone();
      let call = call.clone();
      let target = format!("{id}::factory");
      Ok(Arc::new(move |container, overrides| {
        let arguments = resolve_arguments(container, &target, &params, overrides)?;
        Ok(call(Args::new(arguments)))
      }))
    }

    Definition::Callable(ResolvedCallable::StaticMethod { ty, method }) => {
      let declared =
        container
          .catalog()
          .method(ty, method)
          .ok_or_else(|| ContainerError::NoSuchMethod {
            ty: ty.clone(),
            method: method.clone(),
          })?;
      let invoke = declared
        .invoke
        .ok_or_else(|| ContainerError::NoSuchMethod {
          ty: ty.clone(),
          method: method.clone(),
        })?;
      let params = declared.params;
      let target = format!("{ty}::{method}");
      let ty = ty.clone();
      Ok(Arc::new(move |container, overrides| {
        // The receiver is resolved lazily, per call: its own constructor may
        // depend on state not known when this factory was built.
        let receiver = container.get(&ty)?;
        let arguments = resolve_arguments(container, &target, &params, overrides)?;
        Ok(invoke(&receiver, Args::new(arguments)))
      }))
    }

    Definition::Callable(ResolvedCallable::BoundMethod { receiver, method }) => {
      let ty = container
        .catalog()
        .type_name_of(receiver)
        .unwrap_or_else(|| id.to_string());
      let declared = container
        .catalog()
        .method_on_value(receiver, method)
        .ok_or_else(|| ContainerError::NoSuchMethod {
          ty: ty.clone(),
          method: method.clone(),
        })?;
      let invoke = declared
        .invoke
        .ok_or_else(|| ContainerError::NoSuchMethod {
          ty: ty.clone(),
          method: method.clone(),
        })?;
      let params = declared.params;
      let target = format!("{ty}::{method}");
      let receiver = receiver.clone();
      Ok(Arc::new(move |container, overrides| {
        let arguments = resolve_arguments(container, &target, &params, overrides)?;
        Ok(invoke(&receiver, Args::new(arguments)))
      }))
    }
  }
}
