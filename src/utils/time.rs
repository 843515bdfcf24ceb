use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in seconds
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// True once at least `ttl` seconds have passed since `last_seen`
pub fn is_idle(last_seen: i64, ttl: i64, now: i64) -> bool {
    now - last_seen >= ttl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now() {
        let ts = unix_now();
        // After 2020-01-01, before 2100-01-01
        assert!(ts > 1577836800);
        assert!(ts < 4102444800);
    }

    #[test]
    fn test_is_idle() {
        assert!(!is_idle(950, 100, 1000));
        assert!(is_idle(900, 100, 1000));
        assert!(is_idle(800, 100, 1000));
        // Clock going backwards never expires a session
        assert!(!is_idle(1200, 100, 1000));
    }
}
