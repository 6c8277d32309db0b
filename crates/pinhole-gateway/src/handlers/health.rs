pub async fn ping_handler() -> &'static str {
    "OK\n"
}
