pub async fn liveness() -> &'static str {
    "pinproxy is running"
}
