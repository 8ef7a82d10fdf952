//! Protocol layer tests — routes, query validation, content types, error mapping.

#[cfg(test)]
mod tests {
    use yamldocs_protocol::routes::{is_api_route, required_path};
    use yamldocs_protocol::*;

    // ─────────────────────────────────────────────────────────────────────
    // Routes
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn api_routes_share_prefix() {
        assert!(is_api_route(Routes::EXISTS));
        assert!(is_api_route(Routes::FILE));
        assert!(is_api_route(Routes::SAVE));
        assert!(!is_api_route(Routes::ROOT));
        assert!(!is_api_route("/js/app.js"));
        assert!(!is_api_route("/api"));
    }

    #[test]
    fn required_path_rejects_missing_or_empty() {
        assert_eq!(required_path(Some("a/b.txt")).unwrap(), "a/b.txt");

        let missing = required_path(None).unwrap_err();
        assert!(matches!(missing, ApiError::MissingParameter("path")));
        assert_eq!(missing.status(), 400);

        let empty = required_path(Some("")).unwrap_err();
        assert!(matches!(empty, ApiError::MissingParameter(_)));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Content types
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("css/style.css"), "text/css; charset=utf-8");
        assert_eq!(content_type_for("js/app.js"), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for("data.json"), "application/json; charset=utf-8");
        assert_eq!(content_type_for("logo.png"), "image/png");
        assert_eq!(content_type_for("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for("photo.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("favicon.svg"), "image/svg+xml");
    }

    #[test]
    fn content_type_fallback() {
        assert_eq!(content_type_for("README"), "text/plain");
        assert_eq!(content_type_for("notes.yaml"), "text/plain");
        assert_eq!(content_type_for("dir.d/file"), "text/plain");
    }

    // ─────────────────────────────────────────────────────────────────────
    // ApiError
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn error_status_mapping() {
        assert_eq!(ApiError::InvalidQuery("bad".into()).status(), 400);
        assert_eq!(ApiError::Escape("../etc/passwd".into()).status(), 400);
        assert_eq!(ApiError::NotFound("x".into()).status(), 404);
        assert_eq!(
            ApiError::MethodNotAllowed { method: "PUT".into(), allow: Routes::ALLOW_GET }.status(),
            405,
        );
        assert_eq!(ApiError::RootUnavailable.status(), 500);

        let io = ApiError::io("out.md", std::io::Error::other("disk full"));
        assert_eq!(io.status(), 500);
        assert!(io.is_server_error());
        assert!(!ApiError::NotFound("x".into()).is_server_error());
    }

    #[test]
    fn error_messages_name_the_path() {
        let err = ApiError::Escape("../secret".into());
        assert_eq!(err.to_string(), "path `../secret` escapes the workspace root");

        let err = ApiError::io("docs/out.md", std::io::Error::other("disk full"));
        assert!(err.to_string().contains("docs/out.md"));
        assert!(err.to_string().contains("disk full"));
    }
}
