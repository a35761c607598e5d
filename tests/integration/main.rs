//! Integration tests for foundset

mod caching_tests {
    use foundset::RecordCache;
    use serde_json::{json, Value};

    fn record_pages() -> Vec<Result<Value, String>> {
        vec![
            Ok(json!({"id": "1", "name": "Ada", "joined": "03/20/2018"})),
            Ok(json!({"id": "2", "name": "Grace", "joined": "07/01/2019"})),
            Ok(json!({"id": "3", "name": "Edsger", "joined": "11/11/2020"})),
        ]
    }

    #[test]
    fn full_drive_matches_source_and_completes() {
        let cache = RecordCache::new();
        let yielded: Vec<Value> = cache
            .begin(record_pages().into_iter())
            .collect::<Result<_, _>>()
            .unwrap();

        let snap = cache.snapshot();
        assert_eq!(snap.items, yielded);
        assert_eq!(snap.items.len(), 3);
        assert!(snap.complete);
    }

    #[test]
    fn every_prefix_is_observable() {
        for k in 0..=3 {
            let cache = RecordCache::new();
            let mut source = record_pages().into_iter();
            let mut iter = cache.begin(source.by_ref());

            for _ in 0..k {
                iter.next();
            }
            drop(iter);

            let snap = cache.snapshot();
            assert_eq!(snap.items.len(), k);
            assert!(!snap.complete);
        }
    }

    #[test]
    fn interrupted_fetch_resumes_without_loss() {
        let cache = RecordCache::new();
        let mut source = record_pages().into_iter();

        let mut iter = cache.begin(source.by_ref());
        iter.next();
        drop(iter);

        // A second pass over the same source continues the live fetch
        let rest: Vec<Value> = cache
            .begin(source.by_ref())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rest.len(), 2);

        let snap = cache.snapshot();
        assert_eq!(snap.items.len(), 3);
        assert_eq!(snap.items[0]["name"], json!("Ada"));
        assert!(snap.complete);
    }

    #[test]
    fn failure_mid_fetch_keeps_partial_cache_usable() {
        let cache = RecordCache::new();
        let source = vec![
            Ok(json!({"id": "1"})),
            Ok(json!({"id": "2"})),
            Err("server went away".to_string()),
        ];
        let mut iter = cache.begin(source.into_iter());

        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(iter.next(), Some(Err("server went away".to_string())));

        let snap = cache.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert!(!snap.complete);
    }
}

mod portal_tests {
    use foundset::{build_portal_params, query_pairs, Portal};
    use serde_json::json;

    #[test]
    fn encoded_params_flow_into_query_pairs() {
        let portals = vec![Portal::new("addresses"), Portal::with_window("notes", 5, 10)];
        let params = build_portal_params(&portals, false);
        let pairs = query_pairs(&params);

        assert_eq!(
            pairs.iter().filter(|(key, _)| key == "portal").count(),
            2,
            "array selector repeats the key"
        );
        assert!(pairs.contains(&("offset.addresses".to_string(), "1".to_string())));
        assert!(pairs.contains(&("range.notes".to_string(), "10".to_string())));
    }

    #[test]
    fn stringified_selector_stays_single_pair() {
        let params = build_portal_params(&[Portal::new("A"), Portal::new("B")], true);
        assert_eq!(params["portal"], json!(r#"["A", "B"]"#));

        let pairs = query_pairs(&params);
        assert!(pairs.contains(&("portal".to_string(), r#"["A", "B"]"#.to_string())));
    }
}

mod coercion_tests {
    use chrono::TimeDelta;
    use foundset::{coerce, FieldValue};
    use serde_json::json;

    #[test]
    fn typed_record_fields_recover_their_types() {
        let record = json!({
            "age": "42",
            "rate": "3.14",
            "shift": "25:30:00",
            "notes": "call back tomorrow"
        });

        let field = |name: &str| coerce(record[name].as_str().unwrap());

        assert_eq!(field("age"), FieldValue::Int(42));
        assert_eq!(field("rate"), FieldValue::Float(3.14));
        assert_eq!(
            field("shift"),
            FieldValue::Duration(TimeDelta::hours(25) + TimeDelta::minutes(30))
        );
        assert_eq!(
            field("notes"),
            FieldValue::Text("call back tomorrow".to_string())
        );
    }
}

mod transport_tests {
    use foundset::{FoundsetError, Method, RequestOptions, Transport};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serve one canned HTTP response on a local port
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn get_reads_status_and_json_body() {
        let url = serve_once("200 OK", r#"{"response": {"data": []}}"#);
        let transport = Transport::new();

        let response = transport
            .request(Method::Get, &url, &RequestOptions::default())
            .unwrap();

        assert!(response.ok());
        assert_eq!(response.status(), 200);
        assert!(response.json().unwrap()["response"]["data"].is_array());
    }

    #[test]
    fn error_status_is_surfaced_not_raised() {
        let url = serve_once("500 Internal Server Error", r#"{"messages": []}"#);
        let transport = Transport::new();

        let response = transport
            .request(Method::Get, &url, &RequestOptions::default())
            .unwrap();

        assert!(!response.ok());
        assert_eq!(response.status(), 500);
        assert_eq!(response.text(), r#"{"messages": []}"#);
    }

    #[test]
    fn stalled_server_times_out_into_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(2));
            drop(stream);
        });

        let transport = Transport::with_timeout(Duration::from_millis(200));
        let err = transport
            .request(Method::Get, &format!("http://{}", addr), &RequestOptions::default())
            .unwrap_err();

        assert!(matches!(err, FoundsetError::Transport { .. }));
        assert!(err.to_string().contains("GET http://"));
    }
}
