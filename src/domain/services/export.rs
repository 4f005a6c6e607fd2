use chrono_tz::Tz;
use crate::domain::models::booking::Booking;
use crate::domain::services::formatting::format_timestamp_br;

pub const DELIMITER: char = ';';

const HEADER: [&str; 6] = ["Nome", "Primeira visita", "Telefone", "E-mail", "Observações", "Agendado em"];

fn needs_quotes(value: &str) -> bool {
    value.contains(['"', ',', ';', '\n', '\r'])
}

fn escape_cell(value: &str) -> String {
    if needs_quotes(value) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Cells a spreadsheet would evaluate as a formula. A sign followed by a
/// digit is left alone so phone numbers like "+55 32 ..." stay readable.
fn looks_like_formula(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some('=' | '@') => true,
        Some('+' | '-') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Prefixes visitor text with `'` when it would run as a formula.
fn guard_formula(value: String) -> String {
    if looks_like_formula(&value) {
        format!("'{}", value)
    } else {
        value
    }
}

pub fn append_csv_row(buffer: &mut String, fields: &[String]) {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            buffer.push(DELIMITER);
        }
        buffer.push_str(&escape_cell(field));
    }
    buffer.push('\n');
}

/// Attendee list of one gira, semicolon separated.
pub fn attendees_csv(bookings: &[Booking], tz: Tz) -> String {
    let mut buffer = String::new();
    append_csv_row(&mut buffer, &HEADER.map(String::from));

    for booking in bookings {
        append_csv_row(&mut buffer, &[
            guard_formula(booking.name.clone()),
            if booking.first_visit { "Sim" } else { "Não" }.to_string(),
            guard_formula(booking.phone.clone().unwrap_or_default()),
            guard_formula(booking.email.clone().unwrap_or_default()),
            guard_formula(booking.notes.clone().unwrap_or_default()),
            format_timestamp_br(booking.created_at, tz),
        ]);
    }
    buffer
}

/// "Gira de  Domingo" -> "agendados_Gira_de_Domingo.csv"
pub fn export_filename(gira_title: &str) -> String {
    let slug = gira_title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("agendados_{}.csv", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> String {
        let mut buffer = String::new();
        append_csv_row(&mut buffer, &fields.iter().map(|f| f.to_string()).collect::<Vec<_>>());
        buffer
    }

    #[test]
    fn plain_fields_stay_unquoted() {
        assert_eq!(row(&["Maria", "Sim"]), "Maria;Sim\n");
    }

    #[test]
    fn semicolon_forces_quotes() {
        assert_eq!(row(&["a;b"]), "\"a;b\"\n");
    }

    #[test]
    fn inner_quotes_are_doubled() {
        assert_eq!(row(&["say \"oi\""]), "\"say \"\"oi\"\"\"\n");
    }

    #[test]
    fn newline_and_comma_force_quotes() {
        assert_eq!(row(&["linha1\nlinha2", "x, y"]), "\"linha1\nlinha2\";\"x, y\"\n");
    }

    #[test]
    fn empty_field_is_empty() {
        assert_eq!(row(&["", "b"]), ";b\n");
    }

    #[test]
    fn formula_like_text_is_neutralised() {
        assert_eq!(guard_formula("=HYPERLINK(\"x\")".into()), "'=HYPERLINK(\"x\")");
        assert_eq!(guard_formula("@SUM(A1)".into()), "'@SUM(A1)");
        assert_eq!(guard_formula("-cmd".into()), "'-cmd");
        assert_eq!(guard_formula("+55 32 99999-0000".into()), "+55 32 99999-0000");
        assert_eq!(guard_formula("Maria".into()), "Maria");
        assert_eq!(guard_formula(String::new()), "");
    }

    #[test]
    fn filename_collapses_whitespace() {
        assert_eq!(export_filename("Gira de  Caboclo"), "agendados_Gira_de_Caboclo.csv");
        assert_eq!(export_filename(" Gira\tde Domingo "), "agendados_Gira_de_Domingo.csv");
    }
}
