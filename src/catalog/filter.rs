//! Free-text search over skills
//!
//! A skill matches when the case-folded query is a substring of its
//! case-folded name, description or technology. Level and identifier are
//! never searched. A blank query matches everything.

use super::types::Skill;

/// Skills from `source` that match `query`, in source order
pub fn apply<'a, I>(query: &str, source: I) -> Vec<&'a Skill>
where
    I: IntoIterator<Item = &'a Skill>,
{
    source
        .into_iter()
        .filter(|skill| matches(skill, query))
        .collect()
}

/// Whether a single skill matches `query`
pub fn matches(skill: &Skill, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [&skill.name, &skill.description, &skill.technology]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::skill;

    fn sample() -> Vec<Skill> {
        let mut frontend = skill(2, "React");
        frontend.name = "Desenvolvedor FrontEnd".into();
        frontend.description = " Designer UI/UX".into();
        frontend.level = "Avançado".into();
        vec![skill(1, "Java"), frontend, skill(3, "Node.js")]
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let skills = sample();
        assert_eq!(apply("", &skills).len(), 3);
        assert_eq!(apply("   ", &skills).len(), 3);
    }

    #[test]
    fn test_technology_match() {
        let skills = vec![skill(1, "Java"), skill(2, "React")];
        let found = apply("Java", &skills);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn test_case_insensitive() {
        let skills = sample();
        let upper: Vec<_> = apply("REACT", &skills).iter().map(|s| s.id).collect();
        let lower: Vec<_> = apply("react", &skills).iter().map(|s| s.id).collect();
        assert_eq!(upper, lower);
        assert_eq!(upper, vec![2]);
    }

    #[test]
    fn test_matches_name_and_description() {
        let skills = sample();
        assert_eq!(apply("frontend", &skills).len(), 1);
        assert_eq!(apply("ui/ux", &skills).len(), 1);
        // "Desenvolvedor" appears in every name
        assert_eq!(apply("desenvolvedor", &skills).len(), 3);
    }

    #[test]
    fn test_level_and_id_are_not_searched() {
        let skills = sample();
        assert!(apply("Avançado", &skills).is_empty());
        assert!(apply("2", &skills).is_empty());
    }

    #[test]
    fn test_result_is_subset_and_repeatable() {
        let skills = sample();
        let first = apply("de", &skills);
        let second = apply("de", &skills);
        assert_eq!(first, second);
        assert!(first.iter().all(|s| skills.contains(*s)));
        assert_eq!(skills.len(), 3);
    }

    #[test]
    fn test_single_skill_match() {
        let s = skill(1, "Node.js");
        assert!(matches(&s, "node"));
        assert!(matches(&s, ""));
        assert!(!matches(&s, "python"));
    }
}
