//! Case folding for formula text

/// Upper-case a formula everywhere except inside quoted runs.
///
/// A `"` or `'` outside quotes opens a run that only the same character
/// closes; there are no escapes. Quote characters are kept as they are.
///
/// ```
/// use sheetwise_formula::normalize;
///
/// assert_eq!(normalize("sum(a1,\"Hello World\")"), "SUM(A1,\"Hello World\")");
/// ```
pub fn normalize(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut quote: Option<char> = None;

    for c in formula.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                out.push(c);
            }
            None => out.extend(c.to_uppercase()),
        }
    }

    out
}
