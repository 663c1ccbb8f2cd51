//! Tree shape after creating loggers in arbitrary orders.

use itertools::Itertools;
use loghive::{Logger, Registry};
use proptest::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> Registry {
    Registry::builder().with_separator('/').build()
}

fn parent_name(logger: &Logger) -> String {
    logger
        .parent()
        .map(|p| p.name().to_owned())
        .expect("non-root loggers have a parent")
}

#[rstest]
fn get_logger_returns_the_same_node(registry: Registry) {
    for name in ["a", "a/b", "x/y/z", ""] {
        let first = registry.get_logger(name);
        let second = registry.get_logger(name);
        assert!(first.same_as(&second), "{name:?} was created twice");
        assert_eq!(first.id(), second.id());
    }
}

#[test]
fn every_creation_order_converges() {
    for order in ["a", "a/b", "a/b/c"].into_iter().permutations(3) {
        let registry = Registry::builder().with_separator('/').build();
        for name in &order {
            registry.get_logger(name);
        }
        let a = registry.get_logger("a");
        let ab = registry.get_logger("a/b");
        let abc = registry.get_logger("a/b/c");
        assert!(abc.parent().expect("parent").same_as(&ab), "order {order:?}");
        assert!(ab.parent().expect("parent").same_as(&a), "order {order:?}");
        assert!(a.parent().expect("parent").is_root(), "order {order:?}");
    }
}

#[rstest]
fn late_ancestor_is_spliced_in(registry: Registry) {
    registry.get_logger("a");
    let abc = registry.get_logger("a/b/c");
    assert_eq!(parent_name(&abc), "a");
    assert!(registry.is_placeholder("a/b"));

    let ab = registry.get_logger("a/b");
    assert!(!registry.is_placeholder("a/b"));
    assert_eq!(parent_name(&abc), "a/b");
    assert_eq!(parent_name(&ab), "a");
}

#[rstest]
fn placeholders_are_not_listed(registry: Registry) {
    registry.get_logger("p/q/r");
    assert_eq!(registry.logger_names(), vec!["p/q/r".to_owned()]);
    assert!(!registry.has_logger("p/q"));
    assert!(registry.is_placeholder("p"));
}

#[rstest]
fn logger_for_falls_back_along_segments(registry: Registry) {
    let svc = registry.get_logger("app/Service");
    assert!(registry.logger_for("app", "Service", "handle").same_as(&svc));
    assert!(registry.logger_for("app", "Other", "run").is_root());
    assert!(!registry.has_logger("app/Service/handle"));
}

fn creation_orders() -> impl Strategy<Value = Vec<String>> {
    let name = prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 1..4)
        .prop_map(|segments| segments.join("/"));
    prop::collection::btree_set(name, 1..8)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    /// Every logger's parent is its nearest existing ancestor, whatever the
    /// creation order.
    #[test]
    fn parents_are_nearest_existing_ancestors(created in creation_orders()) {
        let registry = Registry::builder().with_separator('/').build();
        for name in &created {
            registry.get_logger(name);
        }
        for name in &created {
            let logger = registry.get_logger(name);
            let mut expected = String::new();
            let mut cursor = name.as_str();
            while let Some((prefix, _)) = cursor.rsplit_once('/') {
                if created.iter().any(|n| n == prefix) {
                    expected = prefix.to_owned();
                    break;
                }
                cursor = prefix;
            }
            prop_assert_eq!(parent_name(&logger), expected);
        }
    }
}
