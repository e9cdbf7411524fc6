// JSON response fixtures for API mocking

/// Twitch OAuth: client-credentials token response
pub const TWITCH_APP_TOKEN: &str = r#"{
    "access_token": "jostpf5q0uzmxmkba9iyug38kjtgh",
    "expires_in": 5011271,
    "token_type": "bearer"
}"#;

/// Twitch OAuth: success status but no token in the body
pub const TWITCH_TOKEN_MISSING_FIELD: &str = r#"{
    "expires_in": 5011271,
    "token_type": "bearer"
}"#;

/// Twitch OAuth: rejected client credentials
pub const TWITCH_TOKEN_INVALID_CLIENT: &str = r#"{
    "status": 400,
    "message": "invalid client secret"
}"#;

/// Helix: channel is live
pub const HELIX_STREAMS_LIVE: &str = r#"{
    "data": [
        {
            "id": "40952121085",
            "user_id": "101051819",
            "user_login": "afro",
            "user_name": "Afro",
            "game_id": "32982",
            "game_name": "Grand Theft Auto V",
            "type": "live",
            "title": "Jacob: Digital Den Laptops & Tablets",
            "tags": ["English"],
            "viewer_count": 1490,
            "started_at": "2021-03-10T03:18:11Z",
            "language": "en",
            "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-{width}x{height}.jpg",
            "is_mature": false
        }
    ],
    "pagination": {}
}"#;

/// Helix: the same login listed twice (API anomaly)
pub const HELIX_STREAMS_DUPLICATE: &str = r#"{
    "data": [
        { "user_login": "afro", "title": "first", "type": "live", "viewer_count": 10 },
        { "user_login": "afro", "title": "second", "type": "live", "viewer_count": 12 }
    ],
    "pagination": {}
}"#;

/// Helix: channel is offline
pub const HELIX_STREAMS_OFFLINE: &str = r#"{
    "data": [],
    "pagination": {}
}"#;

/// Helix: expired app token
pub const HELIX_UNAUTHORIZED: &str = r#"{
    "error": "Unauthorized",
    "status": 401,
    "message": "Invalid OAuth token"
}"#;
