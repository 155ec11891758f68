//! Where each invoice field lands on the first page of the template, in PDF
//! points from the bottom-left corner. Calibrated against one template; a new
//! template needs a new `TemplateLayout`.

use crate::fonts::StandardFont;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is where the text starts.
    Left,
    /// `x` is where the middle of the text lands.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSlot {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: StandardFont,
    pub align: Align,
}

impl TextSlot {
    const fn left(x: f32, y: f32, size: f32, font: StandardFont) -> Self {
        Self { x, y, size, font, align: Align::Left }
    }

    const fn centered(x: f32, y: f32, size: f32, font: StandardFont) -> Self {
        Self { x, y, size, font, align: Align::Center }
    }
}

/// Order rows: four centered columns, one row per order, stepping down the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTable {
    pub base_x: f32,
    pub first_row_y: f32,
    pub row_pitch: f32,
    pub size: f32,
    pub font: StandardFont,
    pub nights_dx: f32,
    pub description_dx: f32,
    pub rate_dx: f32,
    pub total_dx: f32,
}

impl OrderTable {
    pub fn row_y(&self, index: usize) -> f32 {
        self.first_row_y - index as f32 * self.row_pitch
    }
}

/// Leading between the lines of a multi-line left-aligned field.
pub const LINE_HEIGHT: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateLayout {
    pub guest_name: TextSlot,
    pub invoice_number: TextSlot,
    pub order_date: TextSlot,
    pub check_in: TextSlot,
    pub check_out: TextSlot,
    pub room: TextSlot,
    pub orders: OrderTable,
    pub deposit_note: TextSlot,
    pub deposit_note_text: &'static str,
    pub deposit: TextSlot,
    pub subtotal: TextSlot,
    pub tax: TextSlot,
    pub total: TextSlot,
}

impl TemplateLayout {
    pub const INVOICE: TemplateLayout = TemplateLayout {
        guest_name: TextSlot::left(130.0, 653.0, 18.0, StandardFont::HelveticaBold),
        invoice_number: TextSlot::centered(490.0, 630.0, 12.0, StandardFont::Helvetica),
        order_date: TextSlot::left(203.0, 620.0, 12.0, StandardFont::Helvetica),
        check_in: TextSlot::left(203.0, 600.0, 12.0, StandardFont::Helvetica),
        check_out: TextSlot::left(203.0, 582.0, 12.0, StandardFont::Helvetica),
        room: TextSlot::left(203.0, 566.0, 12.0, StandardFont::Helvetica),
        orders: OrderTable {
            base_x: 85.0,
            first_row_y: 500.0,
            row_pitch: 20.0,
            size: 12.0,
            font: StandardFont::Helvetica,
            nights_dx: 0.0,
            description_dx: 130.0,
            rate_dx: 280.0,
            total_dx: 390.0,
        },
        deposit_note: TextSlot::left(123.0, 285.0, 12.0, StandardFont::Helvetica),
        deposit_note_text: "Minimal DP 50%",
        deposit: TextSlot::left(130.0, 267.0, 12.0, StandardFont::HelveticaBold),
        subtotal: TextSlot::centered(475.0, 233.0, 12.0, StandardFont::Helvetica),
        tax: TextSlot::centered(475.0, 205.0, 12.0, StandardFont::Helvetica),
        total: TextSlot::centered(475.0, 177.0, 12.0, StandardFont::HelveticaBold),
    };
}
