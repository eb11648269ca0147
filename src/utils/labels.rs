/// Capitalise the first letter and every letter following an underscore,
/// replacing underscores by spaces: `filter_and_focus` -> `Filter And Focus`
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut capitalise = true;
    for ch in raw.chars() {
        if ch == '_' {
            out.push(' ');
            capitalise = true;
        } else if capitalise {
            out.extend(ch.to_uppercase());
            capitalise = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Capitalise only the first letter, replacing underscores by spaces:
/// `bar_charts` -> `Bar charts`
pub fn sentence_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.map(|c| if c == '_' { ' ' } else { c }))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("identify"), "Identify");
        assert_eq!(title_case("filter_and_focus"), "Filter And Focus");
        assert_eq!(title_case("mapped_or_abstract"), "Mapped Or Abstract");
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("bar_charts"), "Bar charts");
        assert_eq!(sentence_case("colour_value_or_intensity"), "Colour value or intensity");
        assert_eq!(sentence_case("3D"), "3D");
        assert_eq!(sentence_case(""), "");
    }
}
