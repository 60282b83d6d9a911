// WHY: display helper for link text; independent of scanning and offsets

use url::Url;

use crate::error::{Error, Result};

const ELLIPSIS: &str = "...";

/// Human readable form of a URL: scheme, leading `www.`, query and fragment
/// are dropped, and the result is cut to `max_len` bytes with a trailing
/// ellipsis. Input that cannot be parsed is returned as given (with
/// `http://` added when it had no scheme).
pub fn short_url(raw: &str, max_len: usize) -> Result<String> {
    if max_len < 4 {
        return Err(Error::InvalidMaxLength(max_len));
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let Ok(url) = Url::parse(&with_scheme) else {
        return Ok(with_scheme);
    };

    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host = format!("{host}:{port}");
    }
    if host.len() >= 4 && host[..4].eq_ignore_ascii_case("www.") {
        host.replace_range(..4, "");
    }

    let path = url.path().trim_start_matches('/');
    let mut short = if path.is_empty() {
        host
    } else {
        format!("{host}/{path}")
    };

    if short.len() > max_len {
        let mut cut = max_len - ELLIPSIS.len();
        while !short.is_char_boundary(cut) {
            cut -= 1;
        }
        short.truncate(cut);
        short.push_str(ELLIPSIS);
    }
    Ok(short)
}
