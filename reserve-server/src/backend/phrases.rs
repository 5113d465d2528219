//! Sold-out phrase tables.
//!
//! Some carriers report sold-out as a generic error carrying a specific
//! message rather than as a distinct error kind. Carrier wording changes
//! over time, so the phrases are data, not logic.

use super::BackendError;

/// Substrings that mark a carrier message as a sold-out report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldOutPhrases {
    phrases: Vec<String>,
}

impl SoldOutPhrases {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty())
                .collect(),
        }
    }

    /// SRT reports sold-out as a response error with one of these texts.
    pub fn srt_default() -> Self {
        Self::new(["잔여석없음", "매진", "Sold out"])
    }

    /// Korail has an explicit sold-out error, but some paths still only
    /// carry the message.
    pub fn korail_default() -> Self {
        Self::new(["매진", "Sold out", "잔여석없음"])
    }

    /// Parse a comma-separated override, e.g. from the environment.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn matches(&self, message: &str) -> bool {
        self.phrases.iter().any(|p| message.contains(p.as_str()))
    }

    /// Promote an error to `SoldOut` when its message carries a phrase.
    ///
    /// A sold-out phrase outranks the nominal kind, including `Auth`.
    pub fn apply(&self, nominal: BackendError) -> BackendError {
        match nominal {
            BackendError::SoldOut(_) => nominal,
            other if self.matches(other.message()) => BackendError::SoldOut(other.message().to_string()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_known_wording() {
        let srt = SoldOutPhrases::srt_default();
        assert!(srt.matches("잔여석없음"));
        assert!(srt.matches("[ERR211161] 매진되었습니다"));
        assert!(srt.matches("Sold out"));
        assert!(!srt.matches("로그인 실패"));
    }

    #[test]
    fn parse_list_drops_blanks() {
        let phrases = SoldOutPhrases::parse_list("매진, ,Sold out,");
        assert_eq!(phrases, SoldOutPhrases::new(["매진", "Sold out"]));
    }

    #[test]
    fn apply_promotes_phrase_over_kind() {
        let phrases = SoldOutPhrases::srt_default();
        assert_eq!(
            phrases.apply(BackendError::Backend("잔여석없음".into())),
            BackendError::SoldOut("잔여석없음".into())
        );
        assert_eq!(
            phrases.apply(BackendError::Auth("매진 상태입니다".into())),
            BackendError::SoldOut("매진 상태입니다".into())
        );
        assert_eq!(
            phrases.apply(BackendError::Auth("비밀번호 오류".into())),
            BackendError::Auth("비밀번호 오류".into())
        );
    }

    #[test]
    fn empty_table_never_matches() {
        let phrases = SoldOutPhrases::new(Vec::<String>::new());
        assert!(!phrases.matches("매진"));
    }
}
