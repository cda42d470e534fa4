use crate::data::types::Rule;

/// Point value of the rule whose activity-type key equals `activity_type`,
/// or 0 when no rule carries that key. A missing key is not an error; the
/// caller falls back to pattern matching.
pub fn points_for_activity_type(rules: &[Rule], activity_type: &str) -> i64 {
    rules
        .iter()
        .find(|rule| rule.activity_type.as_deref() == Some(activity_type))
        .map(|rule| rule.points)
        .unwrap_or(0)
}

/// Point value of the first rule whose description contains `pattern`,
/// case-insensitive, or 0 when none matches. First match in list order
/// wins; rule-set authors may rely on ordering.
pub fn points_for_pattern(rules: &[Rule], pattern: &str) -> i64 {
    let needle = pattern.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.description.to_lowercase().contains(&needle))
        .map(|rule| rule.points)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: u32, description: &str, points: i64, activity_type: Option<&str>) -> Rule {
        Rule {
            id,
            description: description.to_string(),
            points,
            icon: None,
            explanation: None,
            activity_type: activity_type.map(str::to_string),
        }
    }

    #[test]
    fn test_activity_type_exact_match() {
        let rules = vec![
            rule(1, "Presença na embaixada", 10, Some("embaixada")),
            rule(2, "Presença na igreja", 5, Some("igreja")),
        ];
        assert_eq!(points_for_activity_type(&rules, "igreja"), 5);
        assert_eq!(points_for_activity_type(&rules, "embaixada"), 10);
    }

    #[test]
    fn test_activity_type_missing_yields_zero() {
        let rules = vec![rule(1, "Presença na embaixada", 10, Some("embaixada"))];
        assert_eq!(points_for_activity_type(&rules, "pg"), 0);
        assert_eq!(points_for_activity_type(&[], "embaixada"), 0);
    }

    #[test]
    fn test_activity_type_ignores_untyped_rules() {
        let rules = vec![rule(1, "Presença na embaixada", 10, None)];
        assert_eq!(points_for_activity_type(&rules, "embaixada"), 0);
    }

    #[test]
    fn test_activity_type_duplicate_keys_first_wins() {
        let rules = vec![
            rule(1, "Regra antiga", 10, Some("embaixada")),
            rule(2, "Regra nova", 15, Some("embaixada")),
        ];
        assert_eq!(points_for_activity_type(&rules, "embaixada"), 10);
    }

    #[test]
    fn test_pattern_case_insensitive_substring() {
        let rules = vec![rule(1, "Cada Visitante convidado", 25, None)];
        assert_eq!(points_for_pattern(&rules, "visitante"), 25);
        assert_eq!(points_for_pattern(&rules, "VISITANTE"), 25);
        assert_eq!(points_for_pattern(&rules, "Convidado"), 25);
    }

    #[test]
    fn test_pattern_no_match_yields_zero() {
        let rules = vec![rule(1, "Cada visitante convidado", 25, None)];
        assert_eq!(points_for_pattern(&rules, "versículo"), 0);
        assert_eq!(points_for_pattern(&[], "visitante"), 0);
    }

    #[test]
    fn test_pattern_first_match_in_list_order_wins() {
        let rules = vec![
            rule(1, "Versículo pequeno (<20 palavras)", 25, None),
            rule(2, "Versículo grande (>=20 palavras)", 35, None),
        ];
        // Both descriptions contain "versículo"; list order decides.
        assert_eq!(points_for_pattern(&rules, "versículo"), 25);
        assert_eq!(points_for_pattern(&rules, ">=20"), 35);
    }

    #[test]
    fn test_pattern_negative_points_pass_through() {
        let rules = vec![rule(1, "Indisciplina registrada", -10, None)];
        assert_eq!(points_for_pattern(&rules, "indisciplina"), -10);
    }
}
