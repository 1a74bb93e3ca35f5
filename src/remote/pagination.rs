//! `Link` header parsing for paginated GitHub responses.

/// Page numbers advertised by a `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPagination {
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
}

/// Parse a header of the form `<url?page=2>; rel="next", <url?page=5>; rel="last"`.
///
/// Entries without a `page` query parameter are ignored.
#[must_use]
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';').map(str::trim) {
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel)
            && let Some(page) = page_from_url(url)
        {
            match rel {
                "next" => info.next_page = Some(page),
                "last" => info.last_page = Some(page),
                _ => {}
            }
        }
    }

    info
}

fn page_from_url(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_last() {
        let header = r#"<https://api.github.com/repositories/1/issues?state=all&per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/issues?state=all&per_page=100&page=3>; rel="last""#;
        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.last_page, Some(3));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=2>; rel="prev""#;
        assert_eq!(parse_link_header(header), LinkPagination::default());
    }

    #[test]
    fn test_per_page_is_not_mistaken_for_page() {
        let header = r#"<https://api.github.com/x?per_page=100&page=4>; rel="next""#;
        assert_eq!(parse_link_header(header).next_page, Some(4));
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(parse_link_header(""), LinkPagination::default());
        assert_eq!(parse_link_header("not a link"), LinkPagination::default());
        assert_eq!(
            parse_link_header(r#"<https://api.github.com/x?page=abc>; rel="next""#),
            LinkPagination::default()
        );
    }
}
