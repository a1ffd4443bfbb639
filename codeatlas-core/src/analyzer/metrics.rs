use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTROL_FLOW: Regex = Regex::new(r"\b(?:if|for|while|switch|try|catch)\b").unwrap();
}

/// Rough complexity score: non-blank lines plus two per control-flow keyword.
///
/// Keywords inside strings and comments count too; this is a size-weighted
/// branching estimate, not cyclomatic complexity.
pub fn complexity(content: &str) -> u32 {
    let non_blank = content.lines().filter(|line| !line.trim().is_empty()).count();
    let keywords = CONTROL_FLOW.find_iter(content).count();
    u32::try_from(non_blank + 2 * keywords).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_lines_and_keywords() {
        let source = "fn a() {\n\n    if x { for y in z {} }\n    while true {}\n}\n";
        // 4 non-blank lines, 3 keywords
        assert_eq!(complexity(source), 4 + 6);
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        assert_eq!(complexity("verify(format, tryhard, iffy)"), 1);
        assert_eq!(complexity("try { x } catch (e) { }"), 1 + 4);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(complexity(""), 0);
        assert_eq!(complexity("\n   \n"), 0);
    }
}
