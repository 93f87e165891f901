/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a resource ID (UUID v4, hyphenated).
///
/// Order/review/effect IDs are opaque strings; UUIDs keep them unique across
/// restarts without a central counter.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
