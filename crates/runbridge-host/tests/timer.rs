//! Repeating timer retaining its target, direct and through a weak proxy.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use runbridge_core::proxy::{ArgKind, MethodTable, Responder, Signature, WeakProxy};
use runbridge_core::Result;
use runbridge_host::timer::RepeatingTimer;
use serde_json::Value;

#[derive(Default)]
struct Ticks {
    seen: AtomicU64,
    last: AtomicU64,
}

fn table() -> &'static MethodTable<Ticks> {
    static TABLE: OnceLock<MethodTable<Ticks>> = OnceLock::new();
    TABLE.get_or_init(|| {
        MethodTable::new().with(
            "tick",
            Signature::new([ArgKind::Int], ArgKind::Null),
            |t: &Ticks, args| {
                t.seen.fetch_add(1, Ordering::SeqCst);
                t.last.store(args[0].as_u64().unwrap_or_default(), Ordering::SeqCst);
                Ok(Value::Null)
            },
        )
    })
}

impl Responder for Ticks {
    fn method_signature(&self, op: &str) -> Option<Signature> {
        table().signature(op)
    }

    fn perform(&self, op: &str, args: &[Value]) -> Option<Result<Value>> {
        table().perform(self, op, args)
    }
}

const INTERVAL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn timer_retains_direct_target() {
    let target = Arc::new(Ticks::default());
    let timer = RepeatingTimer::schedule(INTERVAL, target.clone(), "tick");
    assert_eq!(Arc::strong_count(&target), 2);

    tokio::time::sleep(INTERVAL * 6).await;
    assert!(timer.fire_count() >= 1);
    assert_eq!(target.seen.load(Ordering::SeqCst), timer.fire_count());
    assert_eq!(target.last.load(Ordering::SeqCst), timer.fire_count());

    timer.invalidate();
    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(Arc::strong_count(&target), 1);
    assert!(!timer.is_valid());
}

#[tokio::test]
async fn proxy_lets_target_go_while_timer_fires() {
    let target = Arc::new(Ticks::default());
    let weak = Arc::downgrade(&target);
    let timer = RepeatingTimer::schedule(INTERVAL, WeakProxy::shared(&target), "tick");
    assert_eq!(Arc::strong_count(&target), 1);

    tokio::time::sleep(INTERVAL * 4).await;
    drop(target);
    assert!(weak.upgrade().is_none());

    let fired = timer.fire_count();
    tokio::time::sleep(INTERVAL * 6).await;
    assert!(timer.fire_count() > fired);
    assert!(timer.is_valid());
    timer.invalidate();
}

#[tokio::test]
async fn unknown_operation_keeps_timer_alive() {
    let target = Arc::new(Ticks::default());
    let timer = RepeatingTimer::schedule(INTERVAL, WeakProxy::shared(&target), "tock");
    assert_eq!(timer.operation(), "tock");

    tokio::time::sleep(INTERVAL * 6).await;
    assert!(timer.fire_count() >= 1);
    assert!(timer.is_valid());
    assert_eq!(target.seen.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalidate_takes_effect_immediately() {
    let target = Arc::new(Ticks::default());
    let timer = RepeatingTimer::schedule(INTERVAL, target.clone(), "tick");
    assert!(timer.is_valid());

    timer.invalidate();
    assert!(!timer.is_valid());
    timer.invalidate();
    assert!(!timer.is_valid());

    tokio::time::sleep(INTERVAL * 3).await;
    assert_eq!(timer.fire_count(), 0);
    assert_eq!(Arc::strong_count(&target), 1);
}
