//! Core, non-public data structures for the container.

use crate::catalog::{ConstructFn, Param};
use crate::value::Value;
use std::cell::RefCell;

/// Canonicalizes a service identifier.
///
/// Strips a single leading `::` path separator (if any) and lower-cases the
/// remainder. Every registry, alias and cache key passes through here before
/// storage or lookup.
pub(crate) fn normalize(id: &str) -> String {
  id.strip_prefix("::").unwrap_or(id).to_lowercase()
}

thread_local! {
  // The ordered set of identifiers currently mid-resolution on this thread.
  // Re-entry of an identifier here is exactly a circular dependency.
  static RESOLVING_STACK: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// An RAII guard over the resolving stack.
///
/// `enter` pushes the identifier onto the thread-local stack, or reports the
/// ordered chain (including the re-entered identifier) when it is already
/// present. Dropping the guard pops the entry, on success and failure alike,
/// so a failed resolution never leaves the identifier locked.
#[derive(Debug)]
pub(crate) struct ResolutionGuard {
  key: String,
}

impl ResolutionGuard {
  pub(crate) fn enter(key: &str) -> Result<Self, Vec<String>> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if stack.iter().any(|entry| entry == key) {
        let mut chain = stack.clone();
        chain.push(key.to_string());
        return Err(chain);
      }
      stack.push(key.to_string());
      Ok(Self {
        key: key.to_string(),
      })
    })
  }

  /// Snapshot of the active chain, for error diagnostics.
  pub(crate) fn chain() -> Vec<String> {
    RESOLVING_STACK.with(|stack| stack.borrow().clone())
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|entry| entry == &self.key) {
        stack.remove(pos);
      }
    });
  }
}

/// The stored recipe for producing a service.
#[derive(Clone)]
pub(crate) enum Definition {
  /// An already constructed object; always implicitly shared.
  Instance(Value),
  /// A catalog type to construct via its declared constructor.
  ClassName(String),
  /// A callable, classified once at registration time.
  Callable(ResolvedCallable),
}

/// A callable with its shape resolved up front, replacing runtime
/// shape-sniffing on every invocation.
#[derive(Clone)]
pub(crate) enum ResolvedCallable {
  /// A free function with a declared parameter list.
  Function {
    params: Vec<Param>,
    call: ConstructFn,
  },
  /// A `Type::method` reference; the receiver is resolved through the
  /// container lazily, at call time.
  StaticMethod { ty: String, method: String },
  /// A method bound to an already constructed receiver.
  BoundMethod { receiver: Value, method: String },
}

/// One registry entry: a definition plus its singleton marking.
#[derive(Clone)]
pub(crate) struct Registration {
  pub(crate) definition: Definition,
  pub(crate) shared: bool,
}

#[cfg(test)]
mod tests {
  use super::normalize;

  #[test]
  fn normalize_strips_one_leading_separator_and_lowercases() {
    assert_eq!(normalize("::Engine"), "engine");
    assert_eq!(normalize("ENGINE"), "engine");
    assert_eq!(normalize("engine"), "engine");
    // Only a single leading separator is stripped.
    assert_eq!(normalize("::::Engine"), "::engine");
    // Interior separators are preserved.
    assert_eq!(normalize("Db::Conn"), "db::conn");
  }

  #[test]
  fn guard_reports_ordered_chain_on_reentry() {
    let _a = super::ResolutionGuard::enter("a").unwrap();
    let _b = super::ResolutionGuard::enter("b").unwrap();
    let chain = super::ResolutionGuard::enter("a").unwrap_err();
    assert_eq!(chain, vec!["a", "b", "a"]);
  }

  #[test]
  fn guard_cleans_up_on_drop() {
    {
      let _a = super::ResolutionGuard::enter("x").unwrap();
    }
    // Re-entry succeeds after the guard is dropped.
    let _again = super::ResolutionGuard::enter("x").unwrap();
  }
}
