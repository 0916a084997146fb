use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// # Keypad
/// The input latch: 16 slots, one per key of the hexadecimal keypad, holding
/// 0x1 while the key is down and 0x0 otherwise.
///
/// Clones share the same slots. The input collaborator keeps a clone and writes
/// to it whenever it likes; the interpreter only ever takes a `snapshot`, once
/// per instruction. Each slot is a single atomic byte so the two sides never
/// need to lock.
#[derive(Clone, Default)]
pub struct Keypad {
    keys: Arc<[AtomicU8; 16]>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of `key`; keys above 0xF are ignored.
    pub fn set(&self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get(key as usize) {
            slot.store(u8::from(pressed), Ordering::Relaxed);
        }
    }

    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys
            .get(key as usize)
            .map_or(false, |slot| slot.load(Ordering::Relaxed) == 0x1)
    }

    /// The current value of every slot.
    pub fn snapshot(&self) -> [u8; 16] {
        let mut keys = [0; 16];
        for (key, slot) in keys.iter_mut().zip(self.keys.iter()) {
            *key = slot.load(Ordering::Relaxed);
        }
        keys
    }
}
