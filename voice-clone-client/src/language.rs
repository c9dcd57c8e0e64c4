/// Language used when the caller gives none.
pub const DEFAULT_LANGUAGE: &str = "zh-cn";

/// Map a user-supplied language tag to the form the synthesis service expects.
///
/// Known aliases collapse to `zh-cn`, `en` or `ja`. Anything else is
/// lowercased and passed through.
pub fn normalize_language(tag: &str) -> String {
    let lower = tag.trim().to_lowercase();
    match lower.as_str() {
        "" => DEFAULT_LANGUAGE.to_string(),
        "zh" | "zh_cn" | "zh-cn" => "zh-cn".to_string(),
        "en" | "en-us" => "en".to_string(),
        "ja" | "jp" => "ja".to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(normalize_language("zh"), "zh-cn");
        assert_eq!(normalize_language("ZH_CN"), "zh-cn");
        assert_eq!(normalize_language("zh-CN"), "zh-cn");
        assert_eq!(normalize_language("en-US"), "en");
        assert_eq!(normalize_language("en"), "en");
        assert_eq!(normalize_language("jp"), "ja");
        assert_eq!(normalize_language("ja"), "ja");
    }

    #[test]
    fn empty_is_default() {
        assert_eq!(normalize_language(""), "zh-cn");
        assert_eq!(normalize_language("   "), "zh-cn");
    }

    #[test]
    fn unknown_tags_pass_through_lowercased() {
        assert_eq!(normalize_language("FR"), "fr");
        assert_eq!(normalize_language("pt-BR"), "pt-br");
    }
}
