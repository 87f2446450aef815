//! WASM API for the MusicXML translator
//!
//! JavaScript passes a MusicXML string and an optional settings object and
//! gets back `{ score, diagnostics }`. Fatal errors are thrown as strings.

use wasm_bindgen::prelude::*;
use crate::converters::musicxml::{translate_musicxml, TranslationSettings};

/// Read settings from a JavaScript value; `undefined` and `null` give the defaults
fn settings_from_js(settings_js: JsValue) -> Result<TranslationSettings, JsValue> {
    if settings_js.is_undefined() || settings_js.is_null() {
        return Ok(TranslationSettings::default());
    }
    serde_wasm_bindgen::from_value(settings_js).map_err(|e| {
        log::error!("settings deserialization error: {}", e);
        JsValue::from_str(&format!("Invalid settings: {}", e))
    })
}

/// Translate a MusicXML document into MSR
///
/// # Parameters
/// - `xml`: partwise MusicXML text
/// - `settings_js`: settings object, fields as in `TranslationSettings`
///
/// # Returns
/// JavaScript object with `score` and `diagnostics`
#[wasm_bindgen(js_name = translateMusicXml)]
pub fn translate_musicxml_js(xml: &str, settings_js: JsValue) -> Result<JsValue, JsValue> {
    log::info!("translateMusicXml called: {} bytes", xml.len());

    let settings = settings_from_js(settings_js)?;
    let translation = translate_musicxml(xml, &settings).map_err(|e| {
        log::error!("translation failed: {}", e);
        JsValue::from_str(&format!("Translation error: {}", e))
    })?;

    log::info!(
        "translateMusicXml completed: {} part(s), {} error(s), {} warning(s)",
        translation.score.parts.len(),
        translation.diagnostics.errors().count(),
        translation.diagnostics.warnings().count()
    );

    serde_wasm_bindgen::to_value(&translation)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Translate and return the result as a JSON string
#[wasm_bindgen(js_name = translateMusicXmlToJson)]
pub fn translate_musicxml_to_json(xml: &str, settings_json: &str) -> Result<String, JsValue> {
    let settings = if settings_json.trim().is_empty() {
        TranslationSettings::default()
    } else {
        TranslationSettings::from_json(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?
    };
    let translation = translate_musicxml(xml, &settings)
        .map_err(|e| JsValue::from_str(&format!("Translation error: {}", e)))?;
    serde_json::to_string(&translation).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
