// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! URL generators for guard tests.

/// Strings that are not absolute URIs with a host.
pub fn generate_malformed_urls() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "not-a-url",
        "://missing-scheme.com/",
        "https://",
        "javascript:alert(1)",
        "data:text/html,<script>",
        "file:///etc/passwd",
        "/relative/only",
    ]
}

/// Sources the loopback guard must refuse.
pub fn generate_loopback_sources() -> Vec<String> {
    let mut sources = vec![
        "http://localhost/".to_string(),
        "https://localhost:3000/post".to_string(),
        "http://LocalHost/upper".to_string(),
    ];
    for prefix in ["127", "192", "10"] {
        for i in 0..4 {
            sources.push(format!("http://{prefix}.{i}.0.1/post/{i}"));
            sources.push(format!("https://{prefix}.0.{i}.2:8443/"));
        }
    }
    sources
}

/// Public-looking sources that pass the guard.
pub fn generate_sources(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://source-{}.example.com/post/{}", i / 10, i % 10))
        .collect()
}
