//! Bilingual text lookup (English/Amharic)
//!
//! Pure lookup with `{{name}}` placeholder substitution. A missing key falls
//! back to the raw key so untranslated strings surface visibly instead of
//! crashing. The translator is an explicit value handed to whoever renders
//! text; there is no process-wide language state.

use serde::{Deserialize, Serialize};

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Am,
}

/// Text lookup for one locale
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a key, falling back to the key itself when missing
    pub fn t(&self, key: &str) -> String {
        match lookup(self.locale, key) {
            Some(text) => text.to_string(),
            None => key.to_string(),
        }
    }

    /// Look up a key and substitute `{{name}}` placeholders
    pub fn t_with(&self, key: &str, params: &[(&str, String)]) -> String {
        let mut text = self.t(key);
        for (name, value) in params {
            text = text.replace(&format!("{{{{{}}}}}", name), value);
        }
        text
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    TABLE.iter().find(|(k, _, _)| *k == key).map(|(_, en, am)| {
        match locale {
            Locale::En => *en,
            Locale::Am => *am,
        }
    })
}

/// (key, English, Amharic)
static TABLE: &[(&str, &str, &str)] = &[
    // Study list
    ("bibleStudyTitle", "Bible Study", "የመጽሐፍ ቅዱስ ጥናት"),
    ("bibleStudySubtitle", "Grow deeper in your faith journey", "በእምነት ጉዞዎ ውስጥ ይበልጥ ያድጉ"),
    ("yourProgress", "Your Progress", "የእርስዎ እድገት"),
    ("completed", "Completed", "የተጠናቀቀ"),
    ("inProgress", "In Progress", "በሂደት ላይ"),
    ("chaptersDone", "Chapters Done", "የተጠናቀቁ ምዕራፎች"),
    ("availableStudies", "Available Studies", "ያሉ ጥናቶች"),
    ("familyStudy", "Family Study", "የቤተሰብ ጥናት"),
    ("startStudy", "Start Study", "ጥናት ይጀምሩ"),
    ("chapters", "chapters", "ምዕራፎች"),
    ("pages", "pages", "ገጾች"),
    ("beginner", "Beginner", "ጀማሪ"),
    ("intermediate", "Intermediate", "መካከለኛ"),
    ("advanced", "Advanced", "ከፍተኛ"),
    // Study detail / reader
    ("studyProgress", "Study Progress", "የጥናት እድገት"),
    ("chaptersCompleted", "Chapters Completed", "የተጠናቀቁ ምዕራፎች"),
    ("completeChapterToUnlock", "Complete Chapter {{chapter}} to unlock", "ለመክፈት ምዕራፍ {{chapter}} ያጠናቅቁ"),
    ("chapterComplete", "Chapter Complete!", "ምዕራፍ ተጠናቋል!"),
    ("chapterCompleteMessage", "Great work! You've completed this chapter.", "በጣም ጥሩ! ይህን ምዕራፍ አጠናቅቀዋል።"),
    ("studyComplete", "Study Complete!", "ጥናት ተጠናቋል!"),
    ("studyCompleteMessage", "Congratulations! You've completed every chapter of this study.", "እንኳን ደስ አለዎት! የዚህን ጥናት ሁሉንም ምዕራፎች አጠናቅቀዋል።"),
    ("exploreMoreStudies", "Explore More Studies", "ተጨማሪ ጥናቶችን ያስሱ"),
    // Common
    ("loading", "Loading...", "በመጫን ላይ..."),
    ("error", "Error", "ስህተት"),
    ("retry", "Retry", "እንደገና ሞክር"),
    ("ok", "OK", "እሺ"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_locales() {
        let en = Translator::new(Locale::En);
        let am = Translator::new(Locale::Am);

        assert_eq!(en.t("yourProgress"), "Your Progress");
        assert_eq!(am.t("yourProgress"), "የእርስዎ እድገት");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let t = Translator::new(Locale::En);
        assert_eq!(t.t("noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_placeholder_substitution() {
        let t = Translator::new(Locale::En);
        let text = t.t_with("completeChapterToUnlock", &[("chapter", "4".to_string())]);
        assert_eq!(text, "Complete Chapter 4 to unlock");
    }

    #[test]
    fn test_substitution_ignores_unknown_params() {
        let t = Translator::new(Locale::En);
        let text = t.t_with("chapterComplete", &[("chapter", "4".to_string())]);
        assert_eq!(text, "Chapter Complete!");
    }
}
