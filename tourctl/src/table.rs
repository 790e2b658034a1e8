use tabled::{Table, settings::Style};

/// Applies the house table style so every command prints the same way.
pub(crate) trait TourctlTable {
    fn styled(&mut self) -> &mut Self;
}

impl TourctlTable for Table {
    fn styled(&mut self) -> &mut Table {
        self.with(Style::psql())
    }
}
