use crate::{
    constants::LANGUAGE_KEY,
    entities::language::Language,
    errors::AppError,
    storage::KeyValueStore,
};

/// Visitor's display language, kept in the language slot.
pub struct LanguagePreference<S>
where
    S: KeyValueStore,
{
    store: S,
    default: Language,
}

impl<S> LanguagePreference<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S, default: Language) -> Self {
        LanguagePreference { store, default }
    }

    pub fn get(&self) -> Language {
        match self.store.get(LANGUAGE_KEY) {
            Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored language preference: {}", e);
                self.default
            }),
            Ok(None) => self.default,
            Err(e) => {
                tracing::warn!("Failed to read language preference: {}", e);
                self.default
            }
        }
    }

    pub fn set(&self, language: Language) -> Result<(), AppError> {
        self.store.set(LANGUAGE_KEY, language.code())?;
        Ok(())
    }
}
