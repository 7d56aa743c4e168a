/// Cuts `log` down to at most `max_len` characters and strips the trailing whitespace and NUL
/// padding drivers like to leave behind.
pub fn truncate_log(mut log: String, max_len: usize) -> String {
    if let Some((byte_idx, _)) = log.char_indices().nth(max_len) {
        log.truncate(byte_idx);
    }

    let trimmed_len = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()).len();
    log.truncate(trimmed_len);
    log
}
