/// Build a lowerCamel identifier from free text. Runs of non-alphanumeric
/// characters are word breaks; the first word is lowercased, later words are
/// title-cased. Returns an empty string when no alphanumeric content exists.
pub fn to_lower_camel(text: &str) -> String {
    let mut out = String::new();
    let words = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty());
    for (index, word) in words.enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}
