//! Read-only view over the series sharing one group name.

use crate::data::series::Series;

/// Members of one group, in creation order. Rebuilt on every request.
#[derive(Debug, Clone)]
pub struct SeriesGroup<'a> {
    pub name: &'a str,
    pub members: Vec<&'a Series>,
}

impl<'a> SeriesGroup<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A group is visible while any member is.
    pub fn is_any_visible(&self) -> bool {
        self.members.iter().any(|s| s.is_visible())
    }

    /// Chart height: the tallest member's preferred height.
    pub fn height(&self) -> f32 {
        self.members
            .iter()
            .map(|s| s.preferred_height())
            .fold(0.0, f32::max)
    }

    /// `"(n1, n2, ...)"` sample counts.
    pub fn count_label(&self) -> String {
        let counts: Vec<String> = self.members.iter().map(|s| s.len().to_string()).collect();
        format!("({})", counts.join(", "))
    }

    /// `"(v1, v2, ...)"` latest values with two decimals.
    pub fn last_values_label(&self) -> String {
        let values: Vec<String> = self
            .members
            .iter()
            .map(|s| format!("{:.2}", s.last().unwrap_or(0.0)))
            .collect();
        format!("({})", values.join(", "))
    }

    /// Member name with the group prefix removed, for in-chart labels.
    pub fn member_label(&self, member: &'a Series) -> &'a str {
        strip_group_prefix(member.name(), self.name)
    }
}

/// `"vecX"` in group `"vec"` becomes `"X"`; a name equal to the group stays whole.
pub fn strip_group_prefix<'n>(name: &'n str, group: &str) -> &'n str {
    match name.strip_prefix(group) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;

    fn member(name: &str, values: &[f32], height: f32) -> Series {
        let mut s = Series::new(name, &GraphConfig::default());
        s.set_group("g").set_graph_height(height);
        for v in values {
            s.push(*v);
        }
        s
    }

    #[test]
    fn summaries_follow_member_order() {
        let a = member("gA", &[1.0, 2.0, 3.0], 50.0);
        let b = member("gB", &[4.5], 65.0);
        let group = SeriesGroup {
            name: "g",
            members: vec![&a, &b],
        };
        assert_eq!(group.count_label(), "(3, 1)");
        assert_eq!(group.last_values_label(), "(3.00, 4.50)");
        assert_eq!(group.height(), 65.0);
        assert_eq!(group.member_label(&b), "B");
    }

    #[test]
    fn visibility_is_any() {
        let mut a = member("a", &[], 50.0);
        let mut b = member("b", &[], 50.0);
        a.set_visible(false);
        b.set_visible(false);
        assert!(!SeriesGroup { name: "g", members: vec![&a, &b] }.is_any_visible());
        b.set_visible(true);
        assert!(SeriesGroup { name: "g", members: vec![&a, &b] }.is_any_visible());
    }

    #[test]
    fn prefix_strip_rules() {
        assert_eq!(strip_group_prefix("vecX", "vec"), "X");
        assert_eq!(strip_group_prefix("vec", "vec"), "vec");
        assert_eq!(strip_group_prefix("other", "vec"), "other");
    }
}
