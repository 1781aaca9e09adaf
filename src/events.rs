//! Interrupt vector queue.
//!
//! Each hardware vector is modeled as a bounded, non-blocking message:
//! the interrupt source pushes a [`InterruptVector`] from handler context,
//! and the single foreground dispatch loop drains the queue into
//! [`Supervisor::dispatch`](crate::supervisor::Supervisor::dispatch).
//! There is no true concurrency anywhere in the system — only the
//! interleaving of these four sources — and the queue preserves exactly
//! that model on a hosted target.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Edge ISR     │────▶│              │     │              │
//! │ Debounce tick│────▶│ Vector Queue │────▶│  Dispatch    │
//! │ Blink tick   │────▶│ (lock-free)  │     │  loop        │
//! │ WDT timeout  │────▶│              │     │              │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending vectors.
/// Power of 2 for efficient ring buffer modulo.
const VECTOR_QUEUE_CAP: usize = 32;

/// The four interrupt sources of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InterruptVector {
    /// Logical edge (either polarity) on the liveness input's port group.
    PinChange = 0,
    /// One debounce-timer tick (fires every tick period while armed).
    DebounceTick = 1,
    /// One fault-blink-timer tick (armed only after lockdown).
    BlinkTick = 2,
    /// Watchdog countdown expired without a liveness reset.
    WatchdogTimeout = 3,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Handler context writes (produce), dispatch loop reads (consume).
// Atomic head/tail indices; the buffer lives in a static so handler
// callbacks can reach it without a context argument.

static VECTOR_HEAD: AtomicU8 = AtomicU8::new(0);
static VECTOR_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: VECTOR_BUFFER is accessed only through push_vector (one producer:
// handler context) and pop_vector (one consumer: dispatch loop). The
// acquire/release pairs on head/tail enforce the SPSC discipline, so no
// slot is ever read and written concurrently.
static mut VECTOR_BUFFER: [u8; VECTOR_QUEUE_CAP] = [0; VECTOR_QUEUE_CAP];

/// Push a vector into the queue.
/// Safe to call from handler context (lock-free).
/// Returns `false` if the queue is full (vector dropped).
pub fn push_vector(vector: InterruptVector) -> bool {
    let head = VECTOR_HEAD.load(Ordering::Relaxed);
    let tail = VECTOR_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % VECTOR_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop.
    }

    // SAFETY: single producer; the slot at `head` is not visible to the
    // consumer until the Release store below.
    unsafe {
        VECTOR_BUFFER[head as usize] = vector as u8;
    }

    VECTOR_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next vector. Called from the dispatch loop (single consumer).
pub fn pop_vector() -> Option<InterruptVector> {
    let tail = VECTOR_TAIL.load(Ordering::Relaxed);
    let head = VECTOR_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the producer never rewrites a slot between
    // head publication and tail advance.
    let raw = unsafe { VECTOR_BUFFER[tail as usize] };
    VECTOR_TAIL.store((tail + 1) % VECTOR_QUEUE_CAP as u8, Ordering::Release);

    vector_from_u8(raw)
}

/// Drain all pending vectors into a callback, in FIFO order.
pub fn drain_vectors(mut handler: impl FnMut(InterruptVector)) {
    while let Some(vector) = pop_vector() {
        handler(vector);
    }
}

/// Number of pending vectors.
pub fn queue_len() -> usize {
    let head = VECTOR_HEAD.load(Ordering::Relaxed) as usize;
    let tail = VECTOR_TAIL.load(Ordering::Relaxed) as usize;
    (head + VECTOR_QUEUE_CAP - tail) % VECTOR_QUEUE_CAP
}

/// Check whether the queue is empty.
pub fn queue_is_empty() -> bool {
    queue_len() == 0
}

// ── Internal ──────────────────────────────────────────────────

fn vector_from_u8(raw: u8) -> Option<InterruptVector> {
    match raw {
        0 => Some(InterruptVector::PinChange),
        1 => Some(InterruptVector::DebounceTick),
        2 => Some(InterruptVector::BlinkTick),
        3 => Some(InterruptVector::WatchdogTimeout),
        _ => None,
    }
}
