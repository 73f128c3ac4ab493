//! runbridge host demo
//!
//! - Lays out a line with delegate-sized attachments, resizes one through its
//!   delegate and re-measures.
//! - Drives a weak-proxied target from a repeating timer, drops the target
//!   mid-run and lets the timer keep firing into the proxy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use runbridge_core::delegate::TextRunDelegate;
use runbridge_core::proxy::{ArgKind, MethodTable, Responder, Signature, WeakProxy};
use runbridge_core::Result;
use runbridge_host::config::{self, HostConfig};
use runbridge_host::timer::RepeatingTimer;
use runbridge_host::typeset::{FontMetrics, Line};

/// Timer target that counts the ticks it actually received.
#[derive(Debug, Default)]
struct TickCounter {
    received: AtomicU64,
}

fn tick_table() -> &'static MethodTable<TickCounter> {
    static TABLE: OnceLock<MethodTable<TickCounter>> = OnceLock::new();
    TABLE.get_or_init(|| {
        MethodTable::new().with(
            "tick",
            Signature::new([ArgKind::Int], ArgKind::Null),
            |t: &TickCounter, args| {
                t.received.fetch_add(1, Ordering::Relaxed);
                tracing::info!(fire = %args[0], "tick");
                Ok(Value::Null)
            },
        )
    })
}

impl Responder for TickCounter {
    fn method_signature(&self, op: &str) -> Option<Signature> {
        tick_table().signature(op)
    }

    fn perform(&self, op: &str, args: &[Value]) -> Option<Result<Value>> {
        tick_table().perform(self, op, args)
    }
}

fn demo_layout(cfg: &HostConfig) {
    let font = FontMetrics::new(cfg.line.font_size);
    let mut line = Line::new();
    line.push_text("runbridge ", font);

    let delegates: Vec<Arc<TextRunDelegate>> = cfg
        .attachments
        .iter()
        .map(|a| Arc::new(a.to_delegate()))
        .collect();
    for d in &delegates {
        line.attach(d);
    }
    line.push_text(" end", font);

    let m = line.metrics();
    tracing::info!(text = %line.text(), ascent = m.ascent, descent = m.descent, width = m.width, "line laid out");

    if let Some(first) = line.delegates().first() {
        first.set_width(first.width() + 10.0);
        let m = line.metrics();
        tracing::info!(width = m.width, "first attachment widened; line re-measured");
    }

    let released = line.remove_attachments();
    let strong: Vec<usize> = delegates.iter().map(Arc::strong_count).collect();
    tracing::info!(released, ?strong, "attachments released");
}

async fn demo_timer(cfg: &HostConfig) {
    let op = cfg.timer.operation.as_str();
    let target = Arc::new(TickCounter::default());
    if !target.responds_to(op) {
        tracing::warn!(op, "demo target does not service this operation; fires will be no-ops");
    }
    let timer = RepeatingTimer::schedule(cfg.timer.interval(), WeakProxy::shared(&target), op);

    let half = cfg.timer.fire_limit.div_ceil(2);
    tokio::time::sleep(cfg.timer.interval() * half as u32).await;
    let received = target.received.load(Ordering::Relaxed);
    drop(target);
    tracing::info!(received, "target dropped while timer still scheduled");

    tokio::time::sleep(cfg.timer.interval() * (cfg.timer.fire_limit - half) as u32).await;
    tracing::info!(fired = timer.fire_count(), op = timer.operation(), "timer kept firing into the proxy");
    timer.invalidate();
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "runbridge.yaml".into());
    let cfg = config::load_from_file(&path)?;
    tracing::info!(%path, attachments = cfg.attachments.len(), "runbridge-host starting");

    demo_layout(&cfg);
    demo_timer(&cfg).await;
    Ok(())
}
