//! End-to-end delivery through the public API.

mod test_utils;

use std::sync::Arc;

use loghive::test_utils::{CollectingHandler, CollectingSink, Journal};
use loghive::{DefaultFormatter, Level, NullHandler, Registry, StreamHandler};
use rstest::{fixture, rstest};
use test_utils::SharedBuf;

#[fixture]
fn sink() -> Arc<CollectingSink> {
    Arc::new(CollectingSink::new())
}

fn registry_with(sink: &Arc<CollectingSink>) -> Registry {
    Registry::builder()
        .with_separator('/')
        .with_diagnostic_sink(sink.clone())
        .build()
}

#[rstest]
fn effective_level_is_inherited_from_root(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let ab = registry.get_logger("a/b");
    assert!(ab.is_enabled_for(Level::WARNING).expect("valid level"));
    assert!(!ab.is_enabled_for(Level::INFO).expect("valid level"));
    assert!(!ab.is_enabled_for("info").expect("valid name"));
}

#[rstest]
fn propagation_boundary_keeps_records_from_root(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let h1 = Arc::new(CollectingHandler::new());
    let root_h = Arc::new(CollectingHandler::new());
    let a = registry.get_logger("a");
    a.add_handler(h1.clone());
    a.set_propagate(false);
    registry.root().add_handler(root_h.clone());

    registry.get_logger("a/b").error("kept local").expect("dispatch");
    assert_eq!(h1.messages(), vec!["kept local".to_owned()]);
    assert!(root_h.is_empty());
    assert!(sink.messages().is_empty());
}

#[rstest]
fn delivery_runs_from_leaf_to_root(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let journal = Journal::default();
    registry
        .get_logger("x/y")
        .add_handler(Arc::new(CollectingHandler::tagged("x/y", &journal)));
    registry
        .get_logger("x")
        .add_handler(Arc::new(CollectingHandler::tagged("x", &journal)));
    registry
        .root()
        .add_handler(Arc::new(CollectingHandler::tagged("root", &journal)));

    registry.get_logger("x/y").warning("ordered").expect("dispatch");
    let entries = journal.lock().clone();
    assert_eq!(
        entries,
        vec![
            ("x/y".to_owned(), "ordered".to_owned()),
            ("x".to_owned(), "ordered".to_owned()),
            ("root".to_owned(), "ordered".to_owned()),
        ]
    );
}

#[rstest]
fn missing_handlers_warn_exactly_once(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let lonely = registry.get_logger("lonely/child");
    for _ in 0..5 {
        lonely.error("nobody listens").expect("dispatch");
    }
    assert_eq!(
        sink.messages(),
        vec!["No handlers could be found for logger \"lonely/child\"".to_owned()]
    );
}

#[rstest]
fn null_handler_marks_subtree_handled(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    registry.get_logger("lib").add_handler(Arc::new(NullHandler));
    registry.get_logger("lib/inner").error("quiet").expect("dispatch");
    assert!(sink.messages().is_empty());
}

#[rstest]
fn stream_handler_formats_records(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let buffer = SharedBuf::default();
    registry
        .root()
        .add_handler(Arc::new(StreamHandler::new(buffer.clone(), DefaultFormatter)));
    registry
        .get_logger("net/http")
        .log(Level::ERROR, "status {}", &[&503], None)
        .expect("dispatch");
    assert_eq!(buffer.text(), "net/http [ERROR] status 503\n");
}

#[rstest]
fn flush_all_reaches_every_logger(sink: Arc<CollectingSink>) {
    let registry = registry_with(&sink);
    let buffer = SharedBuf::default();
    registry
        .get_logger("deep/leaf")
        .add_handler(Arc::new(StreamHandler::new(buffer, DefaultFormatter)));
    registry.flush_all().expect("flush succeeds");
}
