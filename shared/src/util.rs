/// 获取当前 UTC 时间戳（秒）
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a 32-char hex request id (UUID v4, no hyphens).
pub fn request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
