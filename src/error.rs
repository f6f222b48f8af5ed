//! Error types surfaced by registration and resolution.

use thiserror::Error;

/// Renders a resolution chain for diagnostics.
fn chain_display(chain: &[String]) -> String {
  if chain.is_empty() {
    "<root>".to_string()
  } else {
    chain.join(" -> ")
  }
}

/// Every failure mode of the container.
///
/// All failures are returned synchronously from `set`/`get`/`call`/`inflect`;
/// none are swallowed. A failed resolution never poisons the identifier: the
/// resolving-set entry is cleared before the error propagates.
#[derive(Debug, Error)]
pub enum ContainerError {
  /// The identifier does not name a type known to the catalog.
  #[error("identifier '{0}' does not name a known abstract or concrete type")]
  InvalidIdentifier(String),

  /// A string definition named a type the catalog has never seen.
  #[error("definition names unknown class '{0}'")]
  UnknownClass(String),

  /// The alias is already registered as an alias.
  #[error("alias '{0}' is already in use")]
  AliasInUse(String),

  /// No definition exists and no same-named concrete type can be auto-wired.
  #[error("service '{id}' not found (resolving: {})", chain_display(.chain))]
  NotFound { id: String, chain: Vec<String> },

  /// The identifier was re-entered while still resolving on this thread.
  #[error("circular reference to '{id}' (chain: {})", chain_display(.chain))]
  CircularReference { id: String, chain: Vec<String> },

  /// A parameter had no explicit argument, no resolvable type and no default.
  #[error("unresolvable parameter '{name}' of {target}")]
  UnresolvableParameter { name: String, target: String },

  /// A type exists but does not declare the requested method.
  #[error("type '{ty}' declares no method '{method}'")]
  NoSuchMethod { ty: String, method: String },

  /// A concrete type was asked to construct itself without a declared
  /// constructor signature.
  #[error("type '{ty}' declares no constructor")]
  MissingConstructor { ty: String },

  /// A mid-build failure, wrapped with the identifier and chain it occurred in.
  #[error("resolution of '{id}' failed (chain: {}): {cause}", chain_display(.chain))]
  ResolutionFailed {
    id: String,
    chain: Vec<String>,
    #[source]
    cause: Box<ContainerError>,
  },

  /// A typed accessor asked for a different type than the service holds.
  #[error("service '{id}' is not of the requested type {expected}")]
  WrongType { id: String, expected: &'static str },
}
