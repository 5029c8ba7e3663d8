//! Best-effort translation with fallback to the original text
//!
//! The one recoverable fault in the pipeline: when translation fails for
//! any reason the original text is used as its own translation and the
//! failure is only logged.

use crate::services::translate_client::{GoogleTranslateClient, TranslateError};

/// Translation capability, seam for exercising the fallback path.
#[allow(async_fn_in_trait)]
pub trait TranslationApi {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

impl TranslationApi for GoogleTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        self.translate_text(text, source_lang, target_lang).await
    }
}

/// Degrading translator over a fixed language pair
pub struct Translator<T: TranslationApi> {
    api: T,
    source_lang: String,
    target_lang: String,
}

impl<T: TranslationApi> Translator<T> {
    pub fn new(api: T, source_lang: String, target_lang: String) -> Self {
        Self {
            api,
            source_lang,
            target_lang,
        }
    }

    /// Translate, degrading to the input on any fault.
    ///
    /// Empty and whitespace-only input comes back untouched without
    /// invoking the capability at all.
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self
            .api
            .translate(text, &self.source_lang, &self.target_lang)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("Translation failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }
}
