// src/scrape/badges.rs
//
// Badge showcase page:
//   <title>Showcase :: <game name></title>
//   <div class="showcase-element-container badge"> ... <img src="..."> per level ... </div>

use serde::Serialize;
use thiserror::Error;

use crate::config::consts::{BADGE_CONTAINER, SITE_URL, TITLE_PREFIX};
use crate::core::html::{attr_values, element_block_ci, slice_between_ci};
use crate::core::sanitize::visible_text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("page has no usable <title>")]
    MissingTitle,
    #[error("badge container not found")]
    MissingBadges,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Showcase {
    pub title: String,
    /// Absolute image URLs, one per badge level.
    pub images: Vec<String>,
}

/// Written next to the images as `data.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BadgeRecord {
    pub title: String,
    pub appid: u32,
    pub img_num: usize,
}

pub fn parse_showcase(html: &str) -> Result<Showcase, ParseError> {
    let raw_title = slice_between_ci(html, "<title", "</title>").ok_or(ParseError::MissingTitle)?;
    let text = visible_text(raw_title);
    let title = text.strip_prefix(TITLE_PREFIX.trim_end()).unwrap_or(&text).trim().to_string();
    if title.is_empty() {
        return Err(ParseError::MissingTitle);
    }

    let block = element_block_ci(html, BADGE_CONTAINER, "div").ok_or(ParseError::MissingBadges)?;
    let images = attr_values(block, "img", "src")
        .iter()
        .map(|src| absolute_url(src))
        .collect();

    Ok(Showcase { title, images })
}

pub fn absolute_url(src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        s!(src)
    } else if let Some(rest) = src.strip_prefix("//") {
        join!("https://", rest)
    } else if src.starts_with('/') {
        join!(SITE_URL, src)
    } else {
        join!(SITE_URL, "/", src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
          <meta charset="utf-8">
          <title>Showcase :: Portal&nbsp;2 &amp; Friends</title>
        </head><body>
          <div class="showcase-element-container card"><img src="https://cdn.test/card1.png"></div>
          <div class="showcase-element-container badge">
            <div class="showcase-element"><img src="https://cdn.test/level1.png" alt="L1"></div>
            <div class="showcase-element"><IMG SRC="//cdn.test/level2.png"></div>
            <div class="showcase-element"><img src="/images/level3.png"></div>
          </div>
          <div class="footer"><img src="https://cdn.test/logo.png"></div>
        </body></html>
    "#;

    #[test]
    fn parses_title_and_level_images_only() {
        let sc = parse_showcase(PAGE).unwrap();
        assert_eq!(sc.title, "Portal 2 & Friends");
        assert_eq!(
            sc.images,
            [
                "https://cdn.test/level1.png",
                "https://cdn.test/level2.png",
                "https://www.steamcardexchange.net/images/level3.png",
            ]
        );
    }

    #[test]
    fn missing_pieces_are_errors() {
        assert_eq!(parse_showcase("<html></html>"), Err(ParseError::MissingTitle));
        assert_eq!(
            parse_showcase("<title>Showcase :: </title>"),
            Err(ParseError::MissingTitle)
        );
        assert_eq!(
            parse_showcase("<title>Showcase :: X</title><div class=\"other\"></div>"),
            Err(ParseError::MissingBadges)
        );
    }

    #[test]
    fn record_serializes_in_field_order() {
        let rec = BadgeRecord { title: s!("ゲーム"), appid: 10, img_num: 5 };
        let text = crate::store::to_pretty_string(&rec).unwrap();
        assert_eq!(text, "{\n    \"title\": \"ゲーム\",\n    \"appid\": 10,\n    \"img_num\": 5\n}");
    }
}
