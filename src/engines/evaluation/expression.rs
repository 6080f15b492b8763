use crate::data::LegalFields;
use crate::engines::generation::trigger::Clause;

/// Render a clause as `coefficient*field`, e.g. `1.02340*close`.
///
/// Unknown fields are rendered by id so a corrupt gene still prints.
pub fn get_expression(clause: &Clause, fields: &LegalFields) -> String {
    match fields.name(clause.field) {
        Some(name) => format!("{:.5}*{}", clause.coefficient, name),
        None => format!("{:.5}*{}", clause.coefficient, clause.field),
    }
}

/// Join four rendered clauses as `a > b & c > d`.
///
/// Extra expressions past the fourth are ignored; missing ones render empty.
pub fn format_trigger<S: AsRef<str>>(expressions: &[S]) -> String {
    let at = |i: usize| expressions.get(i).map(|s| s.as_ref()).unwrap_or("");
    format!("{} > {} & {} > {}", at(0), at(1), at(2), at(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldId;

    #[test]
    fn test_get_expression() {
        let fields = LegalFields::new(["open", "close"]).unwrap();
        let clause = Clause::new(FieldId(1), 1.0234);
        assert_eq!(get_expression(&clause, &fields), "1.02340*close");

        let unknown = Clause::new(FieldId(9), 0.5);
        assert_eq!(get_expression(&unknown, &fields), "0.50000*#9");
    }

    #[test]
    fn test_format_trigger() {
        assert_eq!(format_trigger(&["a", "b", "c", "d"]), "a > b & c > d");
    }
}
