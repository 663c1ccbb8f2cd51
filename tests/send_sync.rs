//! Send/Sync guarantees for core types.

use loghive::{
    ConfigBuilder, LoggerConfigBuilder, Logger, NullHandler, Registry, StreamHandler,
    StreamHandlerBuilder,
};
use rstest::rstest;
use static_assertions::{assert_impl_all, assert_not_impl_any};

#[rstest]
fn builders_are_send_sync() {
    assert_impl_all!(ConfigBuilder: Send, Sync);
    assert_impl_all!(LoggerConfigBuilder: Send, Sync);
    assert_impl_all!(StreamHandlerBuilder: Send, Sync);
}

#[rstest]
fn components_are_send_sync() {
    assert_impl_all!(Registry: Send, Sync);
    assert_impl_all!(Logger: Send, Sync, Clone);
    assert_impl_all!(StreamHandler: Send, Sync);
    assert_impl_all!(NullHandler: Send, Sync);
}

#[rstest]
fn registry_is_not_clone() {
    assert_not_impl_any!(Registry: Clone);
}
