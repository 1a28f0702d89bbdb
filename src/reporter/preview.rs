pub(super) fn create_preview(bytes: &[u8], limit: Option<usize>) -> String {
    let truncated = matches!(limit, Some(limit) if bytes.len() > limit);
    let slice = match limit {
        Some(limit) if truncated => &bytes[..limit],
        _ => bytes,
    };
    match std::str::from_utf8(slice) {
        Ok(text) => text.to_string(),
        // The cut split a multi-byte character; keep the complete prefix.
        Err(err) if truncated && err.error_len().is_none() => {
            String::from_utf8_lossy(&slice[..err.valid_up_to()]).into_owned()
        }
        Err(_) => hex::encode(slice),
    }
}
