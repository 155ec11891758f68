use crate::fonts::StandardFont;
use crate::layout::{Align, TemplateLayout, TextSlot, LINE_HEIGHT};
use crate::models::InvoiceData;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;
use tracing::{debug, info, warn};

const REGULAR_FONT_NAME: &str = "StampF1";
const BOLD_FONT_NAME: &str = "StampF2";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("template is not a readable PDF: {0}")] Load(#[source] lopdf::Error),
    #[error("template is encrypted")] Encrypted,
    #[error("template has no pages")] NoPages,
    #[error("malformed template: {0}")] Malformed(&'static str),
    #[error("{font} cannot encode {ch:?} in {text:?}")] Unencodable { ch: char, font: &'static str, text: String },
    #[error("PDF error: {0}")] Lopdf(#[from] lopdf::Error),
    #[error("could not write PDF: {0}")] Io(#[from] std::io::Error),
}

/// Stamps `data` onto the first page of `template` and returns the new PDF.
/// Any failure aborts the whole fill; nothing partial is returned.
pub fn fill_invoice(template: &[u8], data: &InvoiceData, layout: &TemplateLayout) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::load_mem(template).map_err(PdfError::Load)?;
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }
    let page_id = *doc.get_pages().values().next().ok_or(PdfError::NoPages)?;
    debug!("Stamping page {:?} of a {}-page template", page_id, doc.get_pages().len());

    let mut stamp = Stamper::new(fresh_font_names(&doc, page_id)?);
    stamp.slot(&data.guest_name, &layout.guest_name)?;
    stamp.slot(&data.invoice_number, &layout.invoice_number)?;
    stamp.slot(&data.order_date, &layout.order_date)?;
    stamp.slot(&data.check_in, &layout.check_in)?;
    stamp.slot(&data.check_out, &layout.check_out)?;
    stamp.slot(&data.room, &layout.room)?;

    let table = &layout.orders;
    for (i, order) in data.orders.iter().enumerate() {
        let y = table.row_y(i);
        if y < 0.0 {
            warn!("⚠️ Order row {} drawn below the page at y={}", i + 1, y);
        }
        let columns = [
            (&order.nights, table.nights_dx),
            (&order.description, table.description_dx),
            (&order.rate, table.rate_dx),
            (&order.total_rate, table.total_dx),
        ];
        for (text, dx) in columns {
            stamp.text(text, table.base_x + dx, y, table.size, table.font, Align::Center)?;
        }
    }

    stamp.slot(layout.deposit_note_text, &layout.deposit_note)?;
    stamp.slot(&data.deposit, &layout.deposit)?;
    stamp.slot(&data.subtotal, &layout.subtotal)?;
    stamp.slot(&data.tax, &layout.tax)?;
    stamp.slot(&data.total, &layout.total)?;

    let (regular_name, bold_name) = stamp.names.clone();
    let draws = stamp.draws;
    let regular_id = doc.add_object(StandardFont::Helvetica.dictionary());
    let bold_id = doc.add_object(StandardFont::HelveticaBold.dictionary());
    register_fonts(&mut doc, page_id, &[(regular_name, regular_id), (bold_name, bold_id)])?;
    append_content(&mut doc, page_id, stamp.operations)?;

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    info!("🖨️ Stamped {} text runs ({} order rows), {} bytes", draws, data.orders.len(), out.len());
    Ok(out)
}

struct Stamper {
    names: (Vec<u8>, Vec<u8>),
    operations: Vec<Operation>,
    draws: usize,
}

impl Stamper {
    fn new(names: (Vec<u8>, Vec<u8>)) -> Self {
        Self { names, operations: Vec::new(), draws: 0 }
    }

    fn slot(&mut self, text: &str, slot: &TextSlot) -> Result<(), PdfError> {
        self.text(text, slot.x, slot.y, slot.size, slot.font, slot.align)
    }

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, font: StandardFont, align: Align) -> Result<(), PdfError> {
        if text.is_empty() {
            return Ok(());
        }
        let encode = |line: &str| {
            StandardFont::encode(line)
                .map_err(|ch| PdfError::Unencodable { ch, font: font.base_font(), text: text.to_string() })
        };
        // Centered text is measured as a whole, so it has to fit on one line.
        let (x, lines) = match align {
            Align::Left => (x, split_lines(text).iter().map(|line| encode(line.as_str())).collect::<Result<Vec<_>, _>>()?),
            Align::Center => {
                let encoded = encode(text)?;
                (x - font.width_of_encoded(&encoded, size) / 2.0, vec![encoded])
            }
        };
        let name = match font {
            StandardFont::Helvetica => self.names.0.clone(),
            StandardFont::HelveticaBold => self.names.1.clone(),
        };
        let black = || Object::Real(0.0);
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![black(), black(), black()]),
            Operation::new("Tf", vec![Object::Name(name), size.into()]),
        ]);
        if lines.len() > 1 {
            self.operations.push(Operation::new("TL", vec![LINE_HEIGHT.into()]));
        }
        self.operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.operations.push(Operation::new("T*", vec![]));
            }
            self.operations.push(Operation::new("Tj", vec![Object::String(line, StringFormat::Literal)]));
        }
        self.operations.extend([Operation::new("ET", vec![]), Operation::new("Q", vec![])]);
        self.draws += 1;
        Ok(())
    }
}

/// Tabs widen to four spaces, backspace and vertical tab are dropped, and each
/// `\n`, `\r` or `\f` starts a new line.
fn split_lines(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' | '\u{85}' | '\u{2028}' | '\u{2029}' => cleaned.push_str("    "),
            '\u{8}' | '\u{b}' => {}
            _ => cleaned.push(ch),
        }
    }
    cleaned.split(&['\n', '\r', '\u{c}'][..]).map(str::to_string).collect()
}

enum ResourcesAt {
    Object(ObjectId),
    Inline,
}

/// Ensures the page carries its own resources entry, copying inherited
/// resources down from the page tree when needed.
fn own_resources(doc: &mut Document, page_id: ObjectId) -> Result<ResourcesAt, PdfError> {
    let page = doc.get_dictionary(page_id)?;
    match page.get(b"Resources") {
        Ok(Object::Reference(id)) => return Ok(ResourcesAt::Object(*id)),
        Ok(Object::Dictionary(_)) => return Ok(ResourcesAt::Inline),
        Ok(_) => return Err(PdfError::Malformed("page resources are not a dictionary")),
        Err(_) => {}
    }
    let inherited = inherited_resources(doc, page)?;
    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(inherited.unwrap_or_default()));
    Ok(ResourcesAt::Inline)
}

fn inherited_resources(doc: &Document, page: &Dictionary) -> Result<Option<Dictionary>, PdfError> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Page trees are shallow; the bound only guards against Parent cycles.
    for _ in 0..64 {
        let Some(id) = parent else { return Ok(None) };
        let node = doc.get_dictionary(id)?;
        match node.get(b"Resources") {
            Ok(Object::Reference(res)) => return Ok(Some(doc.get_dictionary(*res)?.clone())),
            Ok(Object::Dictionary(res)) => return Ok(Some(res.clone())),
            Ok(_) => return Err(PdfError::Malformed("inherited resources are not a dictionary")),
            Err(_) => parent = node.get(b"Parent").and_then(Object::as_reference).ok(),
        }
    }
    Err(PdfError::Malformed("page tree is too deep"))
}

fn resources(doc: &Document, page_id: ObjectId) -> Result<Option<&Dictionary>, PdfError> {
    match doc.get_dictionary(page_id)?.get(b"Resources") {
        Ok(Object::Reference(id)) => Ok(Some(doc.get_dictionary(*id)?)),
        Ok(Object::Dictionary(dict)) => Ok(Some(dict)),
        _ => Ok(None),
    }
}

fn resources_mut(doc: &mut Document, page_id: ObjectId, at: ResourcesAt) -> Result<&mut Dictionary, PdfError> {
    match at {
        ResourcesAt::Object(id) => Ok(doc.get_dictionary_mut(id)?),
        ResourcesAt::Inline => Ok(doc.get_dictionary_mut(page_id)?.get_mut(b"Resources")?.as_dict_mut()?),
    }
}

/// The font dictionary visible to the page, resolved and copied.
fn page_fonts(doc: &Document, page_id: ObjectId) -> Result<Dictionary, PdfError> {
    let page = doc.get_dictionary(page_id)?;
    let res = match resources(doc, page_id)? {
        Some(res) => Some(res.clone()),
        None => inherited_resources(doc, page)?,
    };
    let Some(res) = res else { return Ok(Dictionary::new()) };
    match res.get(b"Font") {
        Ok(Object::Reference(id)) => Ok(doc.get_dictionary(*id)?.clone()),
        Ok(Object::Dictionary(fonts)) => Ok(fonts.clone()),
        Ok(_) => Err(PdfError::Malformed("font resources are not a dictionary")),
        Err(_) => Ok(Dictionary::new()),
    }
}

/// Resource names for the regular and bold fonts that the template does not
/// already use.
fn fresh_font_names(doc: &Document, page_id: ObjectId) -> Result<(Vec<u8>, Vec<u8>), PdfError> {
    let fonts = page_fonts(doc, page_id)?;
    let fresh = |base: &str| {
        let mut name = base.to_string();
        while fonts.has(name.as_bytes()) {
            name.push('x');
        }
        name.into_bytes()
    };
    Ok((fresh(REGULAR_FONT_NAME), fresh(BOLD_FONT_NAME)))
}

fn register_fonts(doc: &mut Document, page_id: ObjectId, entries: &[(Vec<u8>, ObjectId)]) -> Result<(), PdfError> {
    let mut fonts = page_fonts(doc, page_id)?;
    for (name, id) in entries {
        fonts.set(name.clone(), Object::Reference(*id));
    }
    let at = own_resources(doc, page_id)?;
    resources_mut(doc, page_id, at)?.set("Font", Object::Dictionary(fonts));
    Ok(())
}

/// Wraps the existing page content in `q`/`Q` and appends the stamp stream.
fn append_content(doc: &mut Document, page_id: ObjectId, stamp: Vec<Operation>) -> Result<(), PdfError> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(streams) => streams.clone(),
            Object::Stream(_) => vec![Object::Reference(*id)],
            _ => return Err(PdfError::Malformed("page contents are not a stream")),
        },
        Ok(Object::Array(streams)) => streams.clone(),
        Ok(_) => return Err(PdfError::Malformed("page contents are not a stream")),
        Err(_) => Vec::new(),
    };

    let mut contents = Vec::with_capacity(existing.len() + 2);
    let mut operations = Vec::with_capacity(stamp.len() + 1);
    if !existing.is_empty() {
        let open = Content { operations: vec![Operation::new("q", vec![])] };
        contents.push(Object::Reference(doc.add_object(content_stream(open)?)));
        contents.extend(existing);
        operations.push(Operation::new("Q", vec![]));
    }
    operations.extend(stamp);
    let stamp = Content { operations };
    contents.push(Object::Reference(doc.add_object(content_stream(stamp)?)));

    doc.get_dictionary_mut(page_id)?.set("Contents", Object::Array(contents));
    Ok(())
}

/// Streams are joined end to end by readers, so each one starts on a fresh line.
fn content_stream(content: Content) -> Result<Stream, PdfError> {
    let mut bytes = b"\n".to_vec();
    bytes.extend(content.encode()?);
    Ok(Stream::new(Dictionary::new(), bytes))
}
