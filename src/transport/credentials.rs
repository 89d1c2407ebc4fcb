//! Hub access token discovery.

/// Environment variables consulted for a token, in priority order.
pub const TOKEN_ENV_VARS: &[&str] = &[
    "HF_TOKEN",
    "HUGGINGFACEHUB_API_TOKEN",
    "HUGGING_FACE_HUB_TOKEN",
];

/// First non-empty token from the process environment.
pub fn discover_token() -> Option<String> {
    discover_token_with(|name| std::env::var(name).ok())
}

/// First non-empty token according to `lookup`.
pub fn discover_token_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
