// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Source documents used across the integration tests.

pub const SOURCE_URL: &str = "https://example-source.com/notes/source";
pub const TARGET_URL: &str = "https://example-target.com/notes/target";

/// A reply note with an `h-cite` reply context.
pub fn valid_source() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Source note</title>
  <link rel="webmention" href="/webmention">
</head>
<body>
  <article class="h-entry">
    <a class="p-author h-card" href="https://example-source.com/">Source Author</a>
    <div class="u-in-reply-to h-cite">
      <a class="u-url p-name" href="{TARGET_URL}">Target note</a>
    </div>
    <div class="e-content">Replying to the <a href="{TARGET_URL}">target</a>.</div>
    <a class="u-url" href="/notes/source">
      <time class="dt-published" datetime="2015-06-01T12:00:00Z">1 June 2015</time>
    </a>
  </article>
</body>
</html>"#
    )
}

/// Reply, like, and repost of the same target in one feed.
pub fn multi_response_source() -> String {
    format!(
        r#"<div class="h-feed">
  <div class="h-entry"><a class="u-like-of" href="{TARGET_URL}">liked</a></div>
  <div class="h-entry">
    <a class="u-repost-of" href="{TARGET_URL}">reposted</a>
    <a class="u-like-of" href="{TARGET_URL}">liked again</a>
  </div>
  <div class="h-entry"><a class="u-in-reply-to" href="{TARGET_URL}">reply</a></div>
</div>"#
    )
}

/// A marked-up note that references something else entirely.
pub fn unrelated_source() -> String {
    r#"<article class="h-entry">
  <p class="p-name">Unrelated</p>
  <a class="u-in-reply-to" href="https://elsewhere.example/post">elsewhere</a>
</article>"#
        .to_string()
}

/// A link to the target, but no microformats at all.
pub fn plain_link_source() -> String {
    format!(r#"<p>See <a href="{TARGET_URL}">this</a>.</p>"#)
}
