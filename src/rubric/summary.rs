use crate::rubric::types::Rubric;

/// Render a human-readable overview of a rubric.
///
/// One line per category, in declaration order, with its weight as a
/// percentage and its required/optional criterion split.
pub fn summary(rubric: &Rubric) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} (v{})\n", rubric.name, rubric.version));
    if !rubric.description.is_empty() {
        output.push_str(&format!("{}\n", rubric.description));
    }
    output.push_str("Categories:\n");

    for category in &rubric.categories {
        output.push_str(&format!(
            "  - {} [{}]: {:.0}% weight, {} required, {} optional\n",
            category.name,
            category.id,
            category.weight * 100.0,
            category.required_count(),
            category.optional_count()
        ));
    }

    output
}
