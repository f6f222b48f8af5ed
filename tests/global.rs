use pretty_assertions::assert_eq;
use weft_di::{init_global, resolve, try_global, Container, Entry};

struct Motd(String);

// Global initialization is once per process, so this file holds a single
// test exercising the whole lifecycle in order.
#[test]
fn test_global_container_lifecycle() {
  assert!(try_global().is_none());

  let container = Container::new();
  container.catalog().define::<Motd>("Motd").register();
  container
    .share("Motd", Entry::instance(Motd("hello".to_string())), &["banner"])
    .unwrap();
  init_global(container).ok().expect("first init succeeds");

  let value = resolve!("Motd");
  assert!(value.is::<Motd>());

  let typed = resolve!(Motd, "banner");
  assert_eq!(typed.0, "hello");

  // A second initialization is rejected and hands the container back.
  assert!(init_global(Container::new()).is_err());
}
