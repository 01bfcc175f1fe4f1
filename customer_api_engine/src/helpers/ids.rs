use rand::{thread_rng, Rng};

/// Generates a realistic-looking 9-digit customer id. Uniqueness is enforced by the store, not
/// here.
pub fn new_customer_id() -> String {
    let mut rng = thread_rng();
    rng.gen_range(100_000_000u64..=999_999_999).to_string()
}

/// Generates a 32-character hex identifier for vulnerabilities, lifecycle events and token ids.
pub fn new_object_id() -> String {
    let mut rng = thread_rng();
    (0..16).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}
