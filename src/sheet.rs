use crate::format::format_amount;
use crate::models::{Cell, InvoiceData, OrderLine};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Timelike;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info};

pub const GUEST_MARKER: &str = "GUEST";
pub const ORDERS_MARKER: &str = "ORDERS";
pub const TOTALS_MARKER: &str = "TOTALS";

/// Unfilled template cells carry these; an order row containing one is skipped.
pub const NIGHTS_PLACEHOLDER: &str = "REQUIRED!!";
pub const AMOUNT_PLACEHOLDER: &str = "ISI DISINI";

const GUEST_NAME: usize = 6;
const GUEST_INVOICE_NUMBER: usize = 7;
const GUEST_ORDER_DATE: usize = 8;
const GUEST_CHECK_IN: usize = 9;
const GUEST_CHECK_OUT: usize = 10;
const GUEST_ROOM: usize = 11;

/// Header cells at the top of the ORDERS section.
const ORDERS_HEADER_LEN: usize = 5;
const ORDER_CHUNK_LEN: usize = 5;

const TOTALS_SUBTOTAL: usize = 4;
const TOTALS_TAX: usize = 5;
const TOTALS_TOTAL: usize = 6;
const TOTALS_DEPOSIT: usize = 7;

const NIGHTS_SUFFIX: &str = " Malam";
const DEPOSIT_PREFIX: &str = "= ";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("workbook error: {0}")] Workbook(#[from] calamine::Error),
    #[error("workbook has no worksheet")] NoWorksheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section { Guest, Orders, Totals }

/// Cells of each section, in sheet order, markers removed.
#[derive(Debug, Default, PartialEq)]
pub struct Sections {
    pub guest: Vec<Cell>,
    pub orders: Vec<Cell>,
    pub totals: Vec<Cell>,
}

/// Reads the first worksheet of an xlsx/xls/xlsb/ods workbook into a flat,
/// row-major list of its non-empty cells.
pub fn read_cells(bytes: &[u8]) -> Result<Vec<Cell>, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoWorksheet)??;
    let cells: Vec<Cell> = range.rows().flatten().filter_map(to_cell).collect();
    debug!("Flattened first worksheet into {} cells", cells.len());
    Ok(cells)
}

fn to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Bool(b) => Some(Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string())),
        Data::DateTime(dt) => Some(Cell::Text(match dt.as_datetime() {
            Some(ndt) if ndt.num_seconds_from_midnight() == 0 => ndt.format("%Y-%m-%d").to_string(),
            Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        })),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        Data::Error(e) => Some(Cell::Text(e.to_string())),
    }
}

/// Splits the flat cell list on the GUEST / ORDERS / TOTALS markers. Cells
/// before the first marker belong to no section and are dropped.
pub fn split_sections(cells: impl IntoIterator<Item = Cell>) -> Sections {
    let mut sections = Sections::default();
    let mut active: Option<Section> = None;
    for cell in cells {
        match cell.as_text() {
            Some(GUEST_MARKER) => { active = Some(Section::Guest); continue; }
            Some(ORDERS_MARKER) => { active = Some(Section::Orders); continue; }
            Some(TOTALS_MARKER) => { active = Some(Section::Totals); continue; }
            _ => {}
        }
        match active {
            Some(Section::Guest) => sections.guest.push(cell),
            Some(Section::Orders) => sections.orders.push(cell),
            Some(Section::Totals) => sections.totals.push(cell),
            None => {}
        }
    }
    sections
}

fn text_at(cells: &[Cell], index: usize) -> String {
    cells.get(index).map(Cell::to_string).unwrap_or_default()
}

/// Decodes the order rows that follow the ORDERS header. Short trailing
/// chunks and rows still holding placeholders are skipped.
pub fn parse_orders(cells: &[Cell]) -> Vec<OrderLine> {
    let rows = cells.get(ORDERS_HEADER_LEN..).unwrap_or_default();
    let mut orders = Vec::new();
    for chunk in rows.chunks(ORDER_CHUNK_LEN) {
        if chunk.len() < ORDER_CHUNK_LEN {
            debug!("Dropping incomplete order chunk of {} cells", chunk.len());
            continue;
        }
        let line = OrderLine {
            nights: format!("{}{}", format_amount(chunk.first()), NIGHTS_SUFFIX),
            rate: format_amount(chunk.get(1)),
            is_discount: text_at(chunk, 2),
            total_rate: format_amount(chunk.get(3)),
            description: text_at(chunk, 4),
        };
        if line.nights.contains(NIGHTS_PLACEHOLDER)
            || line.rate.contains(AMOUNT_PLACEHOLDER)
            || line.total_rate.contains(AMOUNT_PLACEHOLDER)
        {
            debug!("Skipping placeholder order row: {:?}", line);
            continue;
        }
        orders.push(line);
    }
    orders
}

/// Builds the invoice from already-split sections. Missing offsets leave the
/// corresponding fields empty.
pub fn invoice_from_sections(sections: &Sections) -> InvoiceData {
    let guest = &sections.guest;
    let totals = &sections.totals;
    InvoiceData {
        guest_name: text_at(guest, GUEST_NAME),
        invoice_number: text_at(guest, GUEST_INVOICE_NUMBER),
        order_date: text_at(guest, GUEST_ORDER_DATE),
        check_in: text_at(guest, GUEST_CHECK_IN),
        check_out: text_at(guest, GUEST_CHECK_OUT),
        room: text_at(guest, GUEST_ROOM),
        orders: parse_orders(&sections.orders),
        subtotal: format_amount(totals.get(TOTALS_SUBTOTAL)),
        tax: format_amount(totals.get(TOTALS_TAX)),
        total: format_amount(totals.get(TOTALS_TOTAL)),
        deposit: format!("{}{}", DEPOSIT_PREFIX, format_amount(totals.get(TOTALS_DEPOSIT))),
    }
}

/// Parses spreadsheet bytes into invoice data.
pub fn parse_invoice(bytes: &[u8]) -> Result<InvoiceData, SheetError> {
    let sections = split_sections(read_cells(bytes)?);
    info!(
        "📄 Sections: guest={} orders={} totals={} cells",
        sections.guest.len(), sections.orders.len(), sections.totals.len()
    );
    let invoice = invoice_from_sections(&sections);
    info!("✅ Parsed invoice {:?} for {:?} with {} order rows", invoice.invoice_number, invoice.guest_name, invoice.orders.len());
    Ok(invoice)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn t(s: &str) -> Cell { Cell::from(s) }
    fn n(v: f64) -> Cell { Cell::Number(v) }

    fn guest_section() -> Vec<Cell> {
        let mut cells = vec![
            t("Name"), t("Invoice"), t("Date"), t("Check In"), t("Check Out"), t("Room"),
        ];
        cells.extend(["Jane Doe", "INV-001", "2024-01-01", "2024-01-02", "2024-01-05"].map(t));
        cells.push(n(101.0));
        cells
    }

    fn order_header() -> Vec<Cell> {
        ["Nights", "Rate", "Discount", "Total", "Description"].map(t).to_vec()
    }

    fn totals_section() -> Vec<Cell> {
        vec![
            t("Subtotal"), t("Tax"), t("Total"), t("DP"),
            n(2_000_000.0), n(220_000.0), n(2_220_000.0), n(1_110_000.0),
        ]
    }

    fn sample_cells() -> Vec<Cell> {
        let mut cells = vec![t("HOTEL MELATI"), t("GUEST")];
        cells.extend(guest_section());
        cells.push(t("ORDERS"));
        cells.extend(order_header());
        cells.extend([n(2.0), n(500_000.0), t("No"), n(1_000_000.0), t("Deluxe Room")]);
        cells.extend([n(1.0), n(1_000_000.0), t("Yes"), n(1_000_000.0), t("Suite")]);
        cells.push(t("TOTALS"));
        cells.extend(totals_section());
        cells
    }

    /// Writes the sample layout the way staff fill it in: one label row and one
    /// value row per block.
    pub(crate) fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "HOTEL MELATI").unwrap();
        sheet.write_string(1, 0, "GUEST").unwrap();
        for (col, label) in ["Name", "Invoice", "Date", "Check In", "Check Out", "Room"].iter().enumerate() {
            sheet.write_string(2, col as u16, *label).unwrap();
        }
        for (col, value) in ["Jane Doe", "INV-001", "2024-01-01", "2024-01-02", "2024-01-05"].iter().enumerate() {
            sheet.write_string(3, col as u16, *value).unwrap();
        }
        sheet.write_number(3, 5, 101.0).unwrap();
        sheet.write_string(5, 0, "ORDERS").unwrap();
        for (col, label) in ["Nights", "Rate", "Discount", "Total", "Description"].iter().enumerate() {
            sheet.write_string(6, col as u16, *label).unwrap();
        }
        sheet.write_number(7, 0, 2.0).unwrap();
        sheet.write_number(7, 1, 500_000.0).unwrap();
        sheet.write_string(7, 2, "No").unwrap();
        sheet.write_number(7, 3, 1_000_000.0).unwrap();
        sheet.write_string(7, 4, "Deluxe Room").unwrap();
        sheet.write_string(8, 0, "REQUIRED!!").unwrap();
        sheet.write_string(8, 1, "ISI DISINI").unwrap();
        sheet.write_string(8, 2, "No").unwrap();
        sheet.write_string(8, 3, "ISI DISINI").unwrap();
        sheet.write_string(8, 4, "-").unwrap();
        sheet.write_string(10, 0, "TOTALS").unwrap();
        for (col, label) in ["Subtotal", "Tax", "Total", "DP"].iter().enumerate() {
            sheet.write_string(11, col as u16, *label).unwrap();
        }
        for (col, value) in [1_000_000.0, 110_000.0, 1_110_000.0, 555_000.4].iter().enumerate() {
            sheet.write_number(12, col as u16, *value).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn splits_on_markers_and_drops_preamble() {
        let sections = split_sections(sample_cells());
        assert_eq!(sections.guest, guest_section());
        assert_eq!(sections.orders.len(), 15);
        assert_eq!(sections.totals, totals_section());
    }

    #[test]
    fn markers_must_match_whole_cell_text() {
        let sections = split_sections(vec![t("GUEST"), t("guest"), t("ORDERS "), n(1.0)]);
        assert_eq!(sections.guest, vec![t("guest"), t("ORDERS "), n(1.0)]);
        assert!(sections.orders.is_empty());
    }

    #[test]
    fn guest_fields_come_from_fixed_offsets() {
        let invoice = invoice_from_sections(&split_sections(sample_cells()));
        assert_eq!(invoice.guest_name, "Jane Doe");
        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.order_date, "2024-01-01");
        assert_eq!(invoice.check_in, "2024-01-02");
        assert_eq!(invoice.check_out, "2024-01-05");
        assert_eq!(invoice.room, "101");
    }

    #[test]
    fn totals_come_from_fixed_offsets() {
        let invoice = invoice_from_sections(&split_sections(sample_cells()));
        assert_eq!(invoice.subtotal, "2.000.000");
        assert_eq!(invoice.tax, "220.000");
        assert_eq!(invoice.total, "2.220.000");
        assert_eq!(invoice.deposit, "= 1.110.000");
    }

    #[test]
    fn orders_decode_in_sheet_order() {
        let invoice = invoice_from_sections(&split_sections(sample_cells()));
        assert_eq!(invoice.orders, vec![
            OrderLine {
                nights: "2 Malam".into(),
                rate: "500.000".into(),
                is_discount: "No".into(),
                total_rate: "1.000.000".into(),
                description: "Deluxe Room".into(),
            },
            OrderLine {
                nights: "1 Malam".into(),
                rate: "1.000.000".into(),
                is_discount: "Yes".into(),
                total_rate: "1.000.000".into(),
                description: "Suite".into(),
            },
        ]);
    }

    #[test]
    fn placeholder_rows_are_skipped() {
        let mut cells = order_header();
        cells.extend([t("REQUIRED!!"), n(1.0), t("No"), n(1.0), t("a")]);
        cells.extend([n(1.0), t("ISI DISINI"), t("No"), n(1.0), t("b")]);
        cells.extend([n(1.0), n(1.0), t("No"), t("ISI DISINI"), t("c")]);
        cells.extend([n(3.0), n(10.0), t("No"), n(30.0), t("kept")]);
        let orders = parse_orders(&cells);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].description, "kept");
        assert_eq!(orders[0].nights, "3 Malam");
    }

    #[test]
    fn placeholder_in_description_is_kept() {
        let mut cells = order_header();
        cells.extend([n(1.0), n(1.0), t("No"), n(1.0), t("ISI DISINI")]);
        assert_eq!(parse_orders(&cells).len(), 1);
    }

    #[test]
    fn incomplete_trailing_chunk_is_dropped() {
        let mut cells = order_header();
        cells.extend([n(1.0), n(100.0), t("No"), n(100.0), t("first")]);
        cells.extend([n(2.0), n(200.0), t("No")]);
        let orders = parse_orders(&cells);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].description, "first");
    }

    #[test]
    fn missing_sections_leave_fields_empty() {
        let invoice = invoice_from_sections(&split_sections(vec![t("GUEST"), t("only")]));
        assert_eq!(invoice.guest_name, "");
        assert_eq!(invoice.room, "");
        assert!(invoice.orders.is_empty());
        assert_eq!(invoice.subtotal, "");
        assert_eq!(invoice.deposit, "= ");
    }

    #[test]
    fn parses_a_real_workbook() {
        let invoice = parse_invoice(&sample_workbook()).unwrap();
        assert_eq!(invoice.guest_name, "Jane Doe");
        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.room, "101");
        assert_eq!(invoice.orders.len(), 1);
        assert_eq!(invoice.orders[0].nights, "2 Malam");
        assert_eq!(invoice.orders[0].description, "Deluxe Room");
        assert_eq!(invoice.subtotal, "1.000.000");
        assert_eq!(invoice.deposit, "= 555.000");
    }

    #[test]
    fn date_cells_render_as_iso_dates_whatever_their_format() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let display = Format::new().set_num_format("dd/mm/yyyy");
        sheet.write_string(0, 0, "GUEST").unwrap();
        for (col, label) in ["Name", "Invoice", "Date", "Check In", "Check Out", "Room"].iter().enumerate() {
            sheet.write_string(1, col as u16, *label).unwrap();
        }
        sheet.write_string(2, 0, "Jane Doe").unwrap();
        sheet.write_string(2, 1, "INV-002").unwrap();
        for (col, day) in [(2u16, 1u8), (3, 2), (4, 5)] {
            let date = ExcelDateTime::from_ymd(2024, 1, day).unwrap();
            sheet.write_datetime_with_format(2, col, &date, &display).unwrap();
        }
        sheet.write_number(2, 5, 101.0).unwrap();

        let invoice = parse_invoice(&workbook.save_to_buffer().unwrap()).unwrap();
        assert_eq!(invoice.order_date, "2024-01-01");
        assert_eq!(invoice.check_in, "2024-01-02");
        assert_eq!(invoice.check_out, "2024-01-05");
        assert_eq!(invoice.room, "101");
    }

    #[test]
    fn rejects_bytes_that_are_not_a_workbook() {
        assert!(parse_invoice(b"definitely not a spreadsheet").is_err());
    }
}
