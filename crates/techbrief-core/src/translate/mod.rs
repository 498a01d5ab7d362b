mod google;
mod names;
mod translator;

pub use google::GoogleTranslateProvider;
pub use names::localized_source_name;
pub use translator::Translator;

use crate::Result;

/// Backend capable of translating free text
#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short identifier used in log lines
    fn name(&self) -> &str;

    /// Translate `text` from `source_lang` ("auto" to detect) into `target_lang`
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}
