//! Persisted watchdog timeout counter.
//!
//! One byte at a fixed address in the nonvolatile byte store holds the
//! number of watchdog timeouts seen since the last cold boot. The counter
//! survives an MCU reset but not a power cycle; the init path wipes it to
//! zero on every cold boot.
//!
//! Persistence is best-effort: a failed write (out-of-range address) is a
//! no-op and the in-memory count still advances, so the lockdown guarantee
//! — reach the configured maximum within a boot session — holds even when
//! durability is compromised. Lockdown must never be blocked by a storage
//! fault.

use log::warn;

use crate::hal::ByteStore;

/// Default byte-store address for the counter.
pub const TIMEOUT_ADDRESS: u16 = 100;

/// The boot-session timeout counter with its persisted shadow.
pub struct TimeoutCounter<S: ByteStore> {
    store: S,
    address: u16,
    /// Authoritative in-session count. Mutated only by the watchdog
    /// timeout handler.
    count: u8,
}

impl<S: ByteStore> TimeoutCounter<S> {
    /// Adopt whatever count the store holds (0 when uncommitted or the
    /// address is out of range), e.g. after an MCU reset mid-session.
    pub fn new(store: S, address: u16) -> Self {
        let count = store.read(address);
        Self { store, address, count }
    }

    /// Cold-boot initialisation: wipe the persisted count to zero.
    pub fn new_cold_boot(mut store: S, address: u16) -> Self {
        if !store.write(address, 0) {
            warn!("timeout counter address {address} not writable, running volatile");
        }
        Self { store, address, count: 0 }
    }

    /// Current in-session count.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Increment the in-memory count. Whether the new count also gets
    /// persisted is the caller's decision; the lockdown boundary
    /// deliberately leaves the terminal count unpersisted.
    pub fn increment(&mut self) -> u8 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Persist the current count, best-effort. The write is wrapped in a
    /// critical section: the underlying cell commit must not be preempted.
    pub fn persist(&mut self) {
        let committed = critical_section::with(|_| self.store.write(self.address, self.count));
        if !committed {
            warn!("timeout count {} not persisted (address out of range)", self.count);
        }
    }

    /// What the store currently holds at the counter address.
    pub fn persisted(&self) -> u8 {
        self.store.read(self.address)
    }
}
