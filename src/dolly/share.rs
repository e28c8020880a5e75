//! Share text and the downloadable score card.

use serde::Serialize;
use thiserror::Error;

use super::config::{round_to, SESSION_SECONDS};
use super::logic::{calculate_score, classify_title};
use super::state::{DollyState, Phase};

pub const CARD_FILENAME: &str = "dolly-dash-score.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("there is no finished game to export")]
    NoResult,
    #[error("could not encode score card: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("browser refused the download: {0}")]
    Dom(String),
}

/// Format a whole score with thousands separators (1234567 → "1,234,567").
pub fn format_score(score: f64) -> String {
    if score < 0.0 {
        return format!("-{}", format_score(-score));
    }
    let digits = (score.round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn share_text(score: f64) -> String {
    format!(
        "I YOLO'd ${} into $DOLLY and made it rain in {}s 🐑💸 – Can you beat me?",
        format_score(score),
        SESSION_SECONDS
    )
}

/// Summary of a finished game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub outcome: Phase,
    pub score: f64,
    pub title: &'static str,
    pub coins: f64,
    pub final_price: f64,
    pub high_score: f64,
    pub share_text: String,
}

impl ScoreCard {
    /// Build a card for a Rugged or Complete game.
    pub fn from_state(state: &DollyState) -> Option<Self> {
        if !state.phase.is_over() {
            return None;
        }
        let score = calculate_score(&state.session);
        Some(Self {
            outcome: state.phase,
            score,
            title: classify_title(score),
            coins: round_to(state.session.coins_earned, 2),
            final_price: state.session.current_price,
            high_score: state.high_score,
            share_text: share_text(score),
        })
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Destination for an exported card.
pub trait CardExporter {
    fn export(&mut self, filename: &str, contents: &str) -> Result<(), ExportError>;
}

/// Encode the card for the finished game and hand it to `exporter`.
/// Game state is never modified.
pub fn export_card(state: &DollyState, exporter: &mut dyn CardExporter) -> Result<(), ExportError> {
    let card = ScoreCard::from_state(state).ok_or(ExportError::NoResult)?;
    exporter.export(CARD_FILENAME, &card.to_json()?)
}

/// Exporter for builds without a browser; every export fails.
pub struct NoDownload;

impl CardExporter for NoDownload {
    fn export(&mut self, _filename: &str, _contents: &str) -> Result<(), ExportError> {
        Err(ExportError::Dom("downloads need a browser".into()))
    }
}

/// Triggers a file download through a temporary Blob URL.
#[cfg(target_arch = "wasm32")]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl CardExporter for BrowserDownload {
    fn export(&mut self, filename: &str, contents: &str) -> Result<(), ExportError> {
        use wasm_bindgen::{JsCast, JsValue};
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let dom = |e: JsValue| ExportError::Dom(format!("{e:?}"));

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ExportError::Dom("no document".into()))?;

        let parts = js_sys::Array::new();
        parts.push(&JsValue::from_str(contents));
        let opts = BlobPropertyBag::new();
        opts.set_type("application/json");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &opts).map_err(dom)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(dom)?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(dom)?
            .dyn_into()
            .map_err(|_| ExportError::Dom("<a> is not an anchor".into()))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        Url::revoke_object_url(&url).map_err(dom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dolly::state::DollyState;

    struct Capture(Vec<(String, String)>);

    impl CardExporter for Capture {
        fn export(&mut self, filename: &str, contents: &str) -> Result<(), ExportError> {
            self.0.push((filename.to_string(), contents.to_string()));
            Ok(())
        }
    }

    fn finished(coins: f64) -> DollyState {
        let mut state = DollyState::new(0.0);
        state.phase = Phase::Complete;
        state.session.coins_earned = coins;
        state
    }

    #[test]
    fn format_score_groups_thousands() {
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(999.0), "999");
        assert_eq!(format_score(1000.0), "1,000");
        assert_eq!(format_score(1234567.0), "1,234,567");
        assert_eq!(format_score(-1500.0), "-1,500");
    }

    #[test]
    fn share_text_mentions_score() {
        assert_eq!(
            share_text(1500.0),
            "I YOLO'd $1,500 into $DOLLY and made it rain in 20s 🐑💸 – Can you beat me?"
        );
    }

    #[test]
    fn card_only_for_finished_games() {
        let mut state = finished(10.0);
        state.phase = Phase::Playing;
        assert!(ScoreCard::from_state(&state).is_none());
    }

    #[test]
    fn card_carries_score_and_title() {
        let card = ScoreCard::from_state(&finished(300.0)).unwrap();
        assert_eq!(card.score, 300.0);
        assert_eq!(card.title, "Farmer of the FOMO Fields");
        let json = card.to_json().unwrap();
        assert!(json.contains("\"outcome\": \"complete\""));
        assert!(json.contains("Farmer of the FOMO Fields"));
    }

    #[test]
    fn export_hands_json_to_exporter() {
        let state = finished(50.0);
        let mut capture = Capture(Vec::new());
        export_card(&state, &mut capture).unwrap();
        assert_eq!(capture.0.len(), 1);
        assert_eq!(capture.0[0].0, CARD_FILENAME);
        let value: serde_json::Value = serde_json::from_str(&capture.0[0].1).unwrap();
        assert_eq!(value["score"], 50.0);
    }

    #[test]
    fn no_download_reports_dom_error() {
        let state = finished(50.0);
        assert!(matches!(
            export_card(&state, &mut NoDownload),
            Err(ExportError::Dom(_))
        ));
    }

    #[test]
    fn export_without_result_fails() {
        let state = DollyState::new(0.0);
        let mut capture = Capture(Vec::new());
        assert!(matches!(
            export_card(&state, &mut capture),
            Err(ExportError::NoResult)
        ));
        assert!(capture.0.is_empty());
    }
}
