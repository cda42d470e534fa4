//! Portuguese date formatting for calendar headers and event lists.

use chrono::{Datelike, NaiveDate};

const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const MONTHS_SHORT_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const WEEKDAYS_PT: [&str; 7] = [
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
    "Domingo",
];

/// Short format for event lists, e.g. "25 jan. 2026"
pub fn format_date_short(date: NaiveDate) -> String {
    format!(
        "{:02} {}. {}",
        date.day(),
        MONTHS_SHORT_PT[date.month0() as usize],
        date.year()
    )
}

/// Long format with weekday, e.g. "25 de Janeiro (Sábado)"
pub fn format_date_pt(date: NaiveDate) -> String {
    format!(
        "{} de {} ({})",
        date.day(),
        MONTHS_PT[date.month0() as usize],
        weekday_pt(date)
    )
}

/// Calendar header, e.g. "Janeiro 2026"
pub fn format_month_year_pt(year: i32, month: u32) -> String {
    format!("{} {}", MONTHS_PT[(month - 1) as usize], year)
}

pub fn weekday_pt(date: NaiveDate) -> &'static str {
    WEEKDAYS_PT[date.weekday().num_days_from_monday() as usize]
}
