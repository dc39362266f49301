use reqwest::StatusCode;
use url::Url;

/// Describes an HTTP exchange for error contexts, e.g.
/// `POST https://api.anthropic.com/v1/messages [status: 529]`.
pub(crate) fn format_http_context(status: Option<StatusCode>, method: &str, url: &Url) -> String {
    match status {
        Some(status) => format!("{method} {url} [status: {}]", status.as_u16()),
        None => format!("{method} {url}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_with_status() {
        let url = Url::parse("https://api.anthropic.com/v1/messages").unwrap();
        let actual = format_http_context(Some(StatusCode::BAD_REQUEST), "POST", &url);
        let expected = "POST https://api.anthropic.com/v1/messages [status: 400]";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_format_without_status() {
        let url = Url::parse("https://api.anthropic.com/v1/messages").unwrap();
        let actual = format_http_context(None, "POST", &url);
        assert_eq!(actual, "POST https://api.anthropic.com/v1/messages");
    }
}
