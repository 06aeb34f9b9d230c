//! Data bean scenarios through a synthesized proxy
//!
//! Run with: cargo test --package interpose-proxy --test data_bean

use interpose_proxy::prelude::*;
use interpose_proxy::{FailureKind, InterceptorChain, Proxy};
use interpose_test_utils::{
    init_tracing, known_good_data, Bean, DataBean, DataBeanContract, DiskFull, ReadOnlyBean,
    INVALID_DATA, OTHER_VALID_DATA, SOME_VALID_DATA,
};
use std::sync::Arc;

type BeanHandler<T> = InterceptingHandler<DataBeanContract, T, InterceptorChain>;

struct Fixture<T> {
    target: Arc<T>,
    recorder: Arc<CallRecorder>,
    proxy: Proxy<DataBeanContract, BeanHandler<T>>,
}

/// Recorder outermost, then timing on `get_data`, then validation
fn fixture<T: DataBean + 'static>(target: T) -> Fixture<T> {
    init_tracing();

    let target = Arc::new(target);
    let recorder = Arc::new(CallRecorder::new());
    let handler = HandlerBuilder::<DataBeanContract, T>::new()
        .target(Arc::clone(&target))
        .intercept(Arc::clone(&recorder))
        .intercept(TimingInterceptor::new().only(["get_data"]))
        .intercept(known_good_data())
        .build()
        .unwrap();

    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::new(handler))
        .unwrap();

    Fixture {
        target,
        recorder,
        proxy,
    }
}

#[test]
fn data_retrieval_succeeds() {
    let f = fixture(Bean::default());

    assert_eq!(f.proxy.get_data().unwrap(), f.target.data());
    assert_eq!(f.recorder.last_operation().as_deref(), Some("get_data"));
    assert!(f.recorder.last_succeeded());
}

#[test]
fn data_update_succeeds() {
    let f = fixture(Bean::default());

    f.proxy.set_data(OTHER_VALID_DATA.to_string()).unwrap();

    assert_eq!(f.recorder.last_operation().as_deref(), Some("set_data"));
    assert!(f.recorder.last_succeeded());
    assert_eq!(f.target.get_data().unwrap(), OTHER_VALID_DATA);
}

#[test]
fn data_update_fails_on_invalid_data() {
    let f = fixture(Bean::default());

    let err = f.proxy.set_data(INVALID_DATA.to_string()).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(f.recorder.last_operation().as_deref(), Some("set_data"));
    assert!(!f.recorder.last_succeeded());
    assert_eq!(f.target.data(), SOME_VALID_DATA);
    assert_eq!(f.target.calls(), 0);
}

#[test]
fn invalid_data_swallowed_by_outer_fallback() {
    init_tracing();

    let bean = Arc::new(Bean::default());
    let recorder = Arc::new(CallRecorder::new());
    let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
        .target(Arc::clone(&bean))
        .intercept(FallbackInterceptor::for_kind(FailureKind::Validation, |_| Value::Unit))
        .intercept(Arc::clone(&recorder))
        .intercept(known_good_data())
        .build()
        .unwrap();
    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::new(handler))
        .unwrap();

    proxy.set_data(INVALID_DATA.to_string()).unwrap();

    assert_eq!(recorder.last_operation().as_deref(), Some("set_data"));
    assert!(!recorder.last_succeeded());
    assert_eq!(bean.data(), SOME_VALID_DATA);
}

#[test]
fn fallback_value_for_unit_operation_is_discarded() {
    let bean = Arc::new(Bean::default());
    let current = Arc::clone(&bean);
    let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
        .target(Arc::clone(&bean))
        .intercept(FallbackInterceptor::for_kind(FailureKind::Validation, move |_| {
            Value::from(current.data())
        }))
        .intercept(known_good_data())
        .build()
        .unwrap();
    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::new(handler))
        .unwrap();

    proxy.set_data(INVALID_DATA.to_string()).unwrap();
    assert_eq!(bean.data(), SOME_VALID_DATA);
    assert_eq!(bean.calls(), 0);
}

#[test]
fn fallback_with_wrong_shape_is_return_mismatch() {
    let bean = Arc::new(Bean::default());
    let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
        .target(Arc::clone(&bean))
        .intercept(FallbackInterceptor::for_kind(FailureKind::Validation, |_| Value::Int(0)))
        .intercept(Hooks::new().with_before(|inv| {
            Err(InvocationError::validation(inv.operation(), "closed"))
        }))
        .build()
        .unwrap();
    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::new(handler))
        .unwrap();

    let err = proxy.get_data().unwrap_err();
    assert!(matches!(
        err,
        InvocationError::ReturnMismatch { ref operation, .. } if operation == "get_data"
    ));
    assert_eq!(bean.calls(), 0);
}

#[test]
fn delegation_failure_keeps_original_condition() {
    let f = fixture(ReadOnlyBean::default());

    let err = f.proxy.set_data(OTHER_VALID_DATA.to_string()).unwrap_err();

    let InvocationError::Delegation(failure) = err else {
        panic!("expected delegation failure, got {err:?}");
    };
    assert_eq!(failure.downcast_ref::<DiskFull>(), Some(&DiskFull));
    assert_eq!(f.target.calls(), 1);
    assert_eq!(f.target.data(), SOME_VALID_DATA);
    assert!(!f.recorder.last_succeeded());
}

#[test]
fn custom_handler_wraps_default_delegation() {
    struct Auditing {
        inner: TargetHandler<DataBeanContract, Bean>,
        last: parking_lot::Mutex<Option<(String, bool)>>,
    }

    impl InvocationHandler for Auditing {
        fn dispatch(&self, invocation: &Invocation) -> InvocationResult<Value> {
            if invocation.is("set_data")
                && invocation.argument(0).and_then(Value::as_str) == Some(INVALID_DATA)
            {
                *self.last.lock() = Some((invocation.operation().to_string(), false));
                return self.inner.proceed(&Invocation::new("get_data", vec![]));
            }

            let result = self.inner.proceed(invocation);
            *self.last.lock() = Some((invocation.operation().to_string(), result.is_ok()));
            result
        }
    }

    let bean = Arc::new(Bean::default());
    let handler = Arc::new(Auditing {
        inner: TargetHandler::new(Arc::clone(&bean)),
        last: parking_lot::Mutex::new(None),
    });
    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::clone(&handler))
        .unwrap();

    proxy.set_data(INVALID_DATA.to_string()).unwrap();
    assert_eq!(*handler.last.lock(), Some(("set_data".to_string(), false)));
    assert_eq!(bean.data(), SOME_VALID_DATA);

    proxy.set_data(OTHER_VALID_DATA.to_string()).unwrap();
    assert_eq!(*handler.last.lock(), Some(("set_data".to_string(), true)));
    assert_eq!(proxy.get_data().unwrap(), OTHER_VALID_DATA);
}

#[test]
fn timing_observes_only_selected_operation() {
    init_tracing();

    let timing = Arc::new(TimingInterceptor::new().only(["get_data"]));
    let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
        .target(Arc::new(Bean::default()))
        .intercept(Arc::clone(&timing))
        .build()
        .unwrap();
    let proxy = ProxyFactory::new()
        .create::<DataBeanContract, _>(Arc::new(handler))
        .unwrap();

    proxy.set_data(OTHER_VALID_DATA.to_string()).unwrap();
    assert!(timing.last_elapsed().is_none());

    proxy.get_data().unwrap();
    assert!(timing.last_elapsed().is_some());
}
