use serde::Serialize;
use std::fmt;

/// One non-empty worksheet value. Anything that is not a number is carried as
/// the text the sheet would display.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self { Cell::Text(s.to_string()) }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct OrderLine {
    pub nights: String,
    pub rate: String,
    pub is_discount: String,
    pub total_rate: String,
    pub description: String,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct InvoiceData {
    pub guest_name: String,
    pub invoice_number: String,
    pub order_date: String,
    pub check_in: String,
    pub check_out: String,
    pub room: String,
    pub orders: Vec<OrderLine>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub deposit: String,
}

impl InvoiceData {
    /// `Invoice_{name}_{number}.pdf`, with `Guest` / `INV` standing in for blanks.
    pub fn output_filename(&self) -> String {
        let name = if self.guest_name.is_empty() { "Guest" } else { &self.guest_name };
        let number = if self.invoice_number.is_empty() { "INV" } else { &self.invoice_number };
        format!("Invoice_{}_{}.pdf", name, number)
    }
}
