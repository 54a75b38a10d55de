//! crates/caseforge_core/src/push_id.rs
//!
//! Generates record keys in the hosted database's "push id" format: 8 characters
//! of millisecond timestamp followed by 12 random characters, all drawn from an
//! alphabet whose byte order matches its value order. Keys therefore sort
//! chronologically, and keys minted within the same millisecond still sort in
//! creation order.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const TIMESTAMP_LEN: usize = 8;
const RANDOM_LEN: usize = 12;

/// Length of every generated identifier.
pub const PUSH_ID_LEN: usize = TIMESTAMP_LEN + RANDOM_LEN;

#[derive(Default)]
struct PushState {
    last_millis: i64,
    last_random: [u8; RANDOM_LEN],
}

/// Mints strictly increasing push identifiers.
#[derive(Default)]
pub struct PushIdGenerator {
    state: Mutex<PushState>,
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now())
    }

    /// Mints an identifier for the given instant. A clock that steps backwards
    /// is clamped to the last instant seen so ordering is preserved.
    pub fn generate_at(&self, now: DateTime<Utc>) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let mut millis = now.timestamp_millis().max(state.last_millis);
        let carried = millis == state.last_millis && increment(&mut state.last_random);
        if !carried {
            if millis == state.last_millis {
                // Random suffix exhausted for this millisecond.
                millis += 1;
            }
            state.last_random = random_digits();
        }
        state.last_millis = millis;

        let mut id = String::with_capacity(PUSH_ID_LEN);
        id.extend(encode_timestamp(millis).iter().map(|&b| b as char));
        id.extend(state.last_random.iter().map(|&d| PUSH_CHARS[d as usize] as char));
        id
    }
}

fn encode_timestamp(mut millis: i64) -> [u8; TIMESTAMP_LEN] {
    let mut out = [PUSH_CHARS[0]; TIMESTAMP_LEN];
    for slot in out.iter_mut().rev() {
        *slot = PUSH_CHARS[(millis % 64) as usize];
        millis /= 64;
    }
    out
}

fn random_digits() -> [u8; RANDOM_LEN] {
    let bytes = Uuid::new_v4().into_bytes();
    let mut digits = [0u8; RANDOM_LEN];
    for (digit, byte) in digits.iter_mut().zip(bytes.iter()) {
        *digit = byte % 64;
    }
    digits
}

/// Adds one to the base-64 digit string. Returns false on overflow.
fn increment(digits: &mut [u8; RANDOM_LEN]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit < 63 {
            *digit += 1;
            return true;
        }
        *digit = 0;
    }
    false
}
