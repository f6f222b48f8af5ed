//! The process-wide container instance and access functions.

use crate::container::Container;
use once_cell::sync::OnceCell;

// Explicitly initialized, never created on first use: the application decides
// when (and with which catalog) the global container comes into existence.
static GLOBAL_CONTAINER: OnceCell<Container> = OnceCell::new();

/// Installs `container` as the process-wide instance.
///
/// Returns the container back if a global instance was already installed.
pub fn init_global(container: Container) -> Result<(), Container> {
  GLOBAL_CONTAINER.set(container)
}

/// The process-wide container.
///
/// # Panics
///
/// Panics if [`init_global`] has not been called. Use [`try_global`] for a
/// non-panicking accessor.
pub fn global() -> &'static Container {
  GLOBAL_CONTAINER
    .get()
    .expect("global container is not initialized; call init_global first")
}

/// The process-wide container, if one has been installed.
pub fn try_global() -> Option<&'static Container> {
  GLOBAL_CONTAINER.get()
}
