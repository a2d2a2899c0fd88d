// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use swudb_companion_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad value".into());
        assert_eq!(err.to_string(), "Serialization error: bad value");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("disk full".into());
        assert_eq!(err.to_string(), "File I/O error: disk full");
    }

    #[test]
    fn storage() {
        let err = CoreError::Storage("quota exceeded".into());
        assert_eq!(err.to_string(), "Storage unavailable: quota exceeded");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "SWUDB".into(),
            message: "HTTP 503 for /cards".into(),
        };
        assert_eq!(err.to_string(), "API error (SWUDB): HTTP 503 for /cards");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        assert_eq!(CoreError::NoProvider.to_string(), "No catalog provider registered");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err: CoreError = io.into();
        match err {
            CoreError::FileIO(msg) => assert!(msg.contains("read-only volume")),
            other => panic!("Expected FileIO, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

// ── Error is std::error::Error ──────────────────────────────────────

mod std_error {
    use super::*;

    #[test]
    fn core_error_implements_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::Storage("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn core_error_implements_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}

// ── Edge cases ──────────────────────────────────────────────────────

mod edge_cases {
    use super::*;

    #[test]
    fn unicode_in_error_message() {
        let err = CoreError::Storage("Æ-Wing™".into());
        assert_eq!(err.to_string(), "Storage unavailable: Æ-Wing™");
    }

    #[test]
    fn empty_provider_name() {
        let err = CoreError::Api {
            provider: String::new(),
            message: "x".into(),
        };
        assert_eq!(err.to_string(), "API error (): x");
    }
}
