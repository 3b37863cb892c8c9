use crate::config::Language;
use crate::types::CaptionTrack;

/// Pick the caption track that best serves `language`.
///
/// First match wins:
/// 1. manual track in `language`
/// 2. auto-generated track in `language`
/// 3. any manual track
/// 4. any auto-generated track
/// 5. the first track
///
/// Returns `None` only for an empty list.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], language: &Language) -> Option<&'a CaptionTrack> {
    let in_language = |auto: bool| {
        tracks
            .iter()
            .find(|t| t.is_auto_generated == auto && language.matches(&t.language_code))
    };
    let of_kind = |auto: bool| tracks.iter().find(|t| t.is_auto_generated == auto);

    in_language(false)
        .or_else(|| in_language(true))
        .or_else(|| of_kind(false))
        .or_else(|| of_kind(true))
        .or_else(|| tracks.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(lang: &str, auto: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: lang.into(),
            display_name: format!("{lang}{}", if auto { " (auto-generated)" } else { "" }),
            is_auto_generated: auto,
            fetch_locator: format!("https://www.youtube.com/api/timedtext?v=abc&lang={lang}"),
        }
    }

    fn lang(code: &str) -> Language {
        Language::new(code).unwrap()
    }

    #[test]
    fn test_prefers_manual_in_language() {
        let tracks = vec![track("en", true), track("en", false)];
        let chosen = select_track(&tracks, &lang("en")).unwrap();
        assert!(!chosen.is_auto_generated);
        assert_eq!(chosen.language_code, "en");
    }

    #[test]
    fn test_manual_listed_first_is_chosen() {
        let tracks = vec![track("en", false), track("en", true)];
        let chosen = select_track(&tracks, &lang("en")).unwrap();
        assert!(!chosen.is_auto_generated);
    }

    #[test]
    fn test_falls_back_to_auto_in_language() {
        let tracks = vec![track("en", true)];
        let chosen = select_track(&tracks, &lang("en")).unwrap();
        assert!(chosen.is_auto_generated);
    }

    #[test]
    fn test_auto_in_language_beats_manual_elsewhere() {
        let tracks = vec![track("fr", false), track("de", true)];
        let chosen = select_track(&tracks, &lang("de")).unwrap();
        assert_eq!(chosen.language_code, "de");
        assert!(chosen.is_auto_generated);
    }

    #[test]
    fn test_any_manual_when_language_missing() {
        let tracks = vec![track("en", false), track("fr", false)];
        let chosen = select_track(&tracks, &lang("de")).unwrap();
        assert_eq!(chosen.language_code, "en");
        assert!(!chosen.is_auto_generated);
    }

    #[test]
    fn test_manual_elsewhere_beats_auto_elsewhere() {
        let tracks = vec![track("ja", true), track("ko", false)];
        let chosen = select_track(&tracks, &lang("de")).unwrap();
        assert_eq!(chosen.language_code, "ko");
    }

    #[test]
    fn test_any_auto_when_no_manual() {
        let tracks = vec![track("ja", true), track("ko", true)];
        let chosen = select_track(&tracks, &lang("de")).unwrap();
        assert_eq!(chosen.language_code, "ja");
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        assert!(select_track(&[], &lang("en")).is_none());
    }

    #[test]
    fn test_language_match_ignores_case_but_not_region() {
        let tracks = vec![track("en-GB", true), track("zh-TW", true)];
        let chosen = select_track(&tracks, &lang("zh-tw")).unwrap();
        assert_eq!(chosen.language_code, "zh-TW");

        let chosen = select_track(&tracks, &lang("en")).unwrap();
        assert_eq!(chosen.language_code, "en-GB");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tracks = vec![track("fr", true), track("en", true), track("es", false)];
        let first = select_track(&tracks, &lang("en")).cloned();
        for _ in 0..5 {
            assert_eq!(select_track(&tracks, &lang("en")).cloned(), first);
        }
    }
}
