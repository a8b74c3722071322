use serde::Serialize;

use crate::ring::{RingBuffer, SlotAllocator};
use crate::script::{OpResult, Outcome};

/// Point-in-time view of a buffer, read through its public accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub capacity: usize,
    pub len:      usize,
    pub start:    usize,
    pub wrapped:  bool,
    /// Live elements, oldest first
    pub contents: Vec<f64>,
}

impl Snapshot {
    pub fn capture<A: SlotAllocator>(buf: &RingBuffer<A>) -> Self {
        let contents = (0..buf.len())
            .filter_map(|i| buf.element_at(i).copied())
            .collect();
        Self {
            capacity: buf.capacity(),
            len:      buf.len(),
            start:    buf.start(),
            wrapped:  buf.is_wrapped(),
            contents,
        }
    }
}

fn describe(result: &OpResult) -> String {
    match result {
        OpResult::Appended                  => "ok".to_string(),
        OpResult::Popped { value: Some(v) } => format!("{}", v),
        OpResult::Popped { value: None }    => "empty (0)".to_string(),
        OpResult::Resized { capacity }      => format!("capacity {}", capacity),
        OpResult::Element { value: Some(v) } => format!("{}", v),
        OpResult::Element { value: None }   => "no such element".to_string(),
        OpResult::Length { len }            => format!("{}", len),
        OpResult::Destroyed                 => "released".to_string(),
        OpResult::Failed { error }          => format!("FAILED: {}", error),
    }
}

/// Human-readable replay log followed by the final buffer state.
pub fn generate(outcomes: &[Outcome], snap: &Snapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("── Operations ({}) ─────────────────────────\n", outcomes.len()));
    for (i, o) in outcomes.iter().enumerate() {
        out.push_str(&format!("  {:>3}  {:<16} {}\n", i + 1, o.op.to_string(), describe(&o.result)));
    }
    out.push('\n');

    out.push_str("── Buffer ──────────────────────────────────\n");
    out.push_str(&format!(
        "  capacity {}  len {}  start {}{}\n",
        snap.capacity, snap.len, snap.start,
        if snap.wrapped { "  (wrapped)" } else { "" },
    ));
    let items: Vec<String> = snap.contents.iter().map(|v| v.to_string()).collect();
    out.push_str(&format!("  [{}]\n", items.join(", ")));
    out
}

/// JSON document with the outcomes, the final snapshot and a timestamp.
pub fn to_json(outcomes: &[Outcome], snap: &Snapshot) -> serde_json::Value {
    serde_json::json!({
        "ringq_version": env!("CARGO_PKG_VERSION"),
        "timestamp":     chrono::Local::now().to_rfc3339(),
        "operations":    outcomes,
        "buffer":        snap,
    })
}
