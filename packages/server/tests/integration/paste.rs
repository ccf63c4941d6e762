use std::sync::Arc;

use ::common::storage::Fingerprint;
use nopaste_server::MAX_PASTE_BYTES;
use nopaste_server::assets::MemoryAssets;

use crate::common::{RecordingStore, TestApp};

mod create_paste {
    use super::*;

    #[tokio::test]
    async fn post_redirects_to_fingerprint() {
        let app = TestApp::spawn().await;

        let res = app.post_paste("hello").await;

        assert_eq!(res.status, 302);
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));
    }

    #[tokio::test]
    async fn redirect_target_is_twenty_hex_characters() {
        let app = TestApp::spawn().await;

        let res = app.post_paste("some longer text\nwith lines").await;
        let location = res.location.unwrap();
        let key = location.strip_prefix('/').unwrap();

        assert_eq!(key.len(), 20);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn posting_same_text_twice_yields_same_location() {
        let app = TestApp::spawn().await;

        let first = app.post_paste("twice").await;
        let second = app.post_paste("twice").await;

        assert_eq!(first.status, 302);
        assert_eq!(second.status, 302);
        assert_eq!(first.location, second.location);
    }

    #[tokio::test]
    async fn different_text_yields_different_location() {
        let app = TestApp::spawn().await;

        let a = app.post_paste("alpha").await;
        let b = app.post_paste("beta").await;

        assert_ne!(a.location, b.location);
    }

    #[tokio::test]
    async fn missing_text_field_stores_empty_paste() {
        let app = TestApp::spawn().await;

        let res = app.post_form(&[("other", "ignored")]).await;
        assert_eq!(res.status, 302);
        assert_eq!(res.location.as_deref(), Some("/e3b0c44298fc1c149afb"));

        let fetched = app.get("/e3b0c44298fc1c149afb").await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.text, "");
    }

    #[tokio::test]
    async fn multipart_upload_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app.post_multipart("hello").await;
        assert_eq!(res.status, 302, "body: {}", res.text);
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));

        let fetched = app.get("/2cf24dba5fb0a30e26e8").await;
        assert_eq!(fetched.text, "hello");
    }

    #[tokio::test]
    async fn malformed_multipart_is_bad_request() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw("/", Some("multipart/form-data"), "no boundary here")
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.text, "bad request");
    }

    #[tokio::test]
    async fn query_string_is_used_without_form_body() {
        let app = TestApp::spawn().await;

        let res = app.post_raw("/?text=hello", None, "").await;

        assert_eq!(res.status, 302);
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));
    }

    #[tokio::test]
    async fn form_body_wins_over_query_string() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(
                "/?text=from+query",
                Some("application/x-www-form-urlencoded"),
                "text=hello",
            )
            .await;
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));

        // A form body without the field still falls back to the query.
        let res = app
            .post_raw(
                "/?text=hello",
                Some("application/x-www-form-urlencoded"),
                "other=1",
            )
            .await;
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));
    }

    #[tokio::test]
    async fn non_form_body_is_ignored() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw("/?text=hello", Some("application/json"), r#"{"text":"json"}"#)
            .await;

        assert_eq!(res.status, 302);
        assert_eq!(res.location.as_deref(), Some("/2cf24dba5fb0a30e26e8"));
    }

    #[tokio::test]
    async fn non_utf8_bytes_are_stored_verbatim() {
        let app = TestApp::spawn().await;
        let raw = [0xff, 0xfe, b'a', b'b'];
        let fingerprint = Fingerprint::derive(&raw);

        let res = app
            .post_raw("/", Some("application/x-www-form-urlencoded"), "text=%FF%FEab")
            .await;
        assert_eq!(res.status, 302);
        assert_eq!(res.location, Some(format!("/{fingerprint}")));

        let on_disk = std::fs::read(app.data_dir.join(fingerprint.as_str())).unwrap();
        assert_eq!(on_disk, raw);

        let fetched = app.get(&format!("/{fingerprint}")).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, raw);
    }

    #[tokio::test]
    async fn body_at_limit_is_accepted() {
        let app = TestApp::spawn().await;
        let text = "a".repeat(MAX_PASTE_BYTES - "text=".len());
        let fingerprint = Fingerprint::derive(text.as_bytes());

        let res = app
            .post_raw(
                "/",
                Some("application/x-www-form-urlencoded"),
                format!("text={text}"),
            )
            .await;

        assert_eq!(res.status, 302);
        assert_eq!(res.location, Some(format!("/{fingerprint}")));
    }

    #[tokio::test]
    async fn body_over_limit_is_payload_too_large() {
        let app = TestApp::spawn().await;
        let text = "a".repeat(MAX_PASTE_BYTES);

        let res = app
            .post_raw(
                "/",
                Some("application/x-www-form-urlencoded"),
                format!("text={text}"),
            )
            .await;

        assert_eq!(res.status, 413);
        assert_eq!(res.text, "paste too large");
    }

    #[tokio::test]
    async fn paste_lands_in_data_directory() {
        let app = TestApp::spawn().await;

        let res = app.post_paste("on disk").await;
        let location = res.location.unwrap();

        let path = app.data_dir.join(location.trim_start_matches('/'));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "on disk");
    }
}

mod get_paste {
    use super::*;

    #[tokio::test]
    async fn end_to_end_hello() {
        let app = TestApp::spawn().await;

        let (_, res) = app.paste_and_fetch("hello").await;

        assert_eq!(res.status, 200);
        assert_eq!(res.text, "hello");
        assert_eq!(
            res.content_type.as_deref(),
            Some("text/plain; charset=UTF-8")
        );
    }

    #[tokio::test]
    async fn content_round_trips_exactly() {
        let app = TestApp::spawn().await;
        let text = "fn main() {\n    println!(\"héllo, 世界 & <tags>\");\n}\r\n\ttrailing  ";

        let (_, res) = app.paste_and_fetch(text).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.text, text);
    }

    #[tokio::test]
    async fn unknown_key_is_server_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/0123456789abcdef0123").await;

        assert_eq!(res.status, 500);
        assert!(res.text.contains("not found"), "body: {}", res.text);
    }

    #[tokio::test]
    async fn unknown_key_never_returns_asset_content() {
        let assets = MemoryAssets::new()
            .with("index.html", &b"LANDING PAGE"[..])
            .with("static/style", &b"STYLE ASSET"[..]);
        let app = TestApp::spawn_with(Arc::new(RecordingStore::default()), Arc::new(assets)).await;

        for path in ["/index", "/style", "/static"] {
            let res = app.get(path).await;
            assert_eq!(res.status, 500, "{path}");
            assert!(!res.text.contains("LANDING PAGE"));
            assert!(!res.text.contains("STYLE ASSET"));
        }
    }

    #[tokio::test]
    async fn malformed_keys_are_bad_requests() {
        let app = TestApp::spawn().await;

        for path in [
            "/ABCDEF",
            "/abc.txt",
            "/index.html",
            "/.tmp",
            "/a%20b",
            "/%C3%A9",
            "/..%2Fetc%2Fpasswd",
            "/abc%2Fdef",
            "/abc%5Cdef",
            "/%FF",
            "/abc%FE",
        ] {
            let res = app.get(path).await;
            assert_eq!(res.status, 400, "{path}");
            assert_eq!(res.text, "bad request", "{path}");
        }
    }

    #[tokio::test]
    async fn malformed_keys_never_reach_storage() {
        let store = Arc::new(RecordingStore::default());
        let app = TestApp::spawn_with(store.clone(), Arc::new(MemoryAssets::new())).await;

        for path in ["/..%2Fetc%2Fpasswd", "/UPPER", "/dot.dot", "/%2E%2E%2Fsecret"] {
            assert_eq!(app.get(path).await.status, 400, "{path}");
        }
        assert_eq!(store.gets(), 0);

        app.get("/abc123").await;
        assert_eq!(store.gets(), 1);
    }

    #[tokio::test]
    async fn traversal_does_not_read_outside_data_directory() {
        let app = TestApp::spawn().await;
        let secret = app.data_dir.parent().unwrap().join("secret");
        std::fs::write(&secret, "top secret").unwrap();

        let res = app.get("/..%2Fsecret").await;

        assert_eq!(res.status, 400);
        assert!(!res.text.contains("top secret"));
    }
}
