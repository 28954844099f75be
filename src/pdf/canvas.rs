//! Stateful cursor over a growing A4 page sequence.
//!
//! The canvas owns the per-page content streams and a cursor (x, y) measured
//! from the top-left of the page in points, matching the top-down coordinate
//! system the document designs are expressed in; conversion to PDF's
//! bottom-up space happens at draw time. Geometry constants in the composers
//! are written in millimetres through [`mm`].

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::{Error, Result};
use crate::fonts::{self, FontStyle};

use super::layout::wrap_lines;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// Millimetres to points.
pub fn mm(v: f32) -> f32 {
    v * 72.0 / 25.4
}

/// Horizontal padding between a cell border and its text (1 mm).
pub const CELL_PAD: f32 = 2.835;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
    None,
    Frame,
    /// Bottom edge only (underline rule).
    Bottom,
    /// Left, right and bottom edges; used for boxes whose top edge is the
    /// bottom border of a header cell drawn just above.
    SidesBottom,
}

pub struct Canvas {
    pages: Vec<Content>,
    x: f32,
    y: f32,
    margin_left: f32,
    margin_right: f32,
    margin_top: f32,
    margin_bottom: f32,
    style: FontStyle,
    size: f32,
    fill_rgb: [f32; 3],
    text_rgb: [f32; 3],
    stroke_rgb: [f32; 3],
    line_width: f32,
    /// Re-run after every automatic page break so continued tables repeat
    /// their column-header banner.
    continuation: Option<fn(&mut Canvas)>,
    err: Option<String>,
}

impl Canvas {
    /// Fresh canvas with one page and 10 mm side/top margins. The bottom
    /// margin (the auto-break threshold) varies per document type.
    pub fn a4(margin_bottom: f32) -> Self {
        Self {
            pages: vec![Content::new()],
            x: mm(10.0),
            y: mm(10.0),
            margin_left: mm(10.0),
            margin_right: mm(10.0),
            margin_top: mm(10.0),
            margin_bottom,
            style: FontStyle::Regular,
            size: 12.0,
            fill_rgb: [1.0, 1.0, 1.0],
            text_rgb: [0.0, 0.0, 0.0],
            stroke_rgb: [0.0, 0.0, 0.0],
            line_width: mm(0.2),
            continuation: None,
            err: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.x = self.margin_left;
        self.y = y;
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn margin_left(&self) -> f32 {
        self.margin_left
    }

    /// Vertical space left on the current page before the bottom margin.
    pub fn remaining_space(&self) -> f32 {
        PAGE_HEIGHT - self.margin_bottom - self.y
    }

    pub fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    pub fn set_fill_color(&mut self, r: u8, g: u8, b: u8) {
        self.fill_rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
    }

    pub fn set_text_color(&mut self, r: u8, g: u8, b: u8) {
        self.text_rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
    }

    pub fn set_draw_color(&mut self, r: u8, g: u8, b: u8) {
        self.stroke_rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
    }

    pub fn set_line_width(&mut self, w: f32) {
        self.line_width = w;
    }

    pub fn set_continuation(&mut self, header: Option<fn(&mut Canvas)>) {
        self.continuation = header;
    }

    /// Append a page and reset the cursor to the top-left corner.
    pub fn add_page(&mut self) {
        self.pages.push(Content::new());
        self.x = self.margin_left;
        self.y = self.margin_top;
    }

    /// Break to a new page if `height` does not fit above the bottom margin,
    /// re-emitting the continuation header if one is registered. Returns
    /// whether a break happened. Never fails: pages are created on demand.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.remaining_space() < height {
            self.add_page();
            if let Some(header) = self.continuation {
                header(self);
            }
            true
        } else {
            false
        }
    }

    /// Move the cursor down without drawing.
    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    /// `w = 0` means "up to the right margin" (fill the line).
    fn resolve_w(&self, w: f32) -> f32 {
        if w <= 0.0 {
            PAGE_WIDTH - self.margin_right - self.x
        } else {
            w
        }
    }

    fn flag_bounds(&mut self, x: f32, w: f32) {
        if self.err.is_none() && (w <= 0.0 || x < -0.5 || x + w > PAGE_WIDTH + 0.5) {
            self.err = Some(format!(
                "cell escapes page bounds: x={x:.1} w={w:.1} (page width {PAGE_WIDTH:.1})"
            ));
        }
    }

    fn content(&mut self) -> &mut Content {
        self.pages.last_mut().expect("canvas always has a page")
    }

    /// Show `text` with its baseline at `y` from the page top.
    pub fn text_at(&mut self, x: f32, y: f32, text: &str) {
        let (style, size) = (self.style, self.size);
        let [r, g, b] = self.text_rgb;
        let bytes = fonts::to_winansi_bytes(text);
        let c = self.content();
        c.begin_text();
        c.set_font(Name(style.pdf_name().as_bytes()), size);
        c.set_fill_rgb(r, g, b);
        c.next_line(x, PAGE_HEIGHT - y);
        c.show(Str(&bytes));
        c.end_text();
    }

    /// Stroke a rectangle at an explicit position; the cursor stays put.
    /// `(x, y)` is the top-left corner in top-down coordinates.
    pub fn place_box(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let lw = self.line_width;
        let [r, g, b] = self.stroke_rgb;
        let c = self.content();
        c.save_state();
        c.set_line_width(lw);
        c.set_stroke_rgb(r, g, b);
        c.rect(x, PAGE_HEIGHT - y - h, w, h);
        c.stroke();
        c.restore_state();
    }

    /// Fill a rectangle with the current fill color; the cursor stays put.
    pub fn filled_box(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let [r, g, b] = self.fill_rgb;
        let c = self.content();
        c.save_state();
        c.set_fill_rgb(r, g, b);
        c.rect(x, PAGE_HEIGHT - y - h, w, h);
        c.fill_nonzero();
        c.restore_state();
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let lw = self.line_width;
        let [r, g, b] = self.stroke_rgb;
        let c = self.content();
        c.save_state();
        c.set_line_width(lw);
        c.set_stroke_rgb(r, g, b);
        c.move_to(x1, PAGE_HEIGHT - y1);
        c.line_to(x2, PAGE_HEIGHT - y2);
        c.stroke();
        c.restore_state();
    }

    fn draw_border(&mut self, border: Border, x: f32, y: f32, w: f32, h: f32) {
        match border {
            Border::None => {}
            Border::Frame => self.place_box(x, y, w, h),
            Border::Bottom => self.stroke_line(x, y + h, x + w, y + h),
            Border::SidesBottom => {
                self.stroke_line(x, y, x, y + h);
                self.stroke_line(x + w, y, x + w, y + h);
                self.stroke_line(x, y + h, x + w, y + h);
            }
        }
    }

    fn text_x(&self, x: f32, w: f32, text: &str, align: Align) -> f32 {
        match align {
            Align::Left => x + CELL_PAD,
            Align::Center => x + (w - fonts::text_width(text, self.style, self.size)) / 2.0,
            Align::Right => x + w - CELL_PAD - fonts::text_width(text, self.style, self.size),
        }
    }

    /// Single-line cell at the cursor; advances x by the cell width so cells
    /// chain left to right on one row.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, border: Border, align: Align, fill: bool) {
        let w = self.resolve_w(w);
        self.flag_bounds(self.x, w);
        let (x0, y0) = (self.x, self.y);
        if fill {
            self.filled_box(x0, y0, w, h);
        }
        self.draw_border(border, x0, y0, w, h);
        if !text.is_empty() {
            let tx = self.text_x(x0, w, text, align);
            let baseline = y0 + h / 2.0 + self.size * 0.30;
            self.text_at(tx, baseline, text);
        }
        self.x = x0 + w;
    }

    /// `cell` followed by a line feed: cursor moves to the left margin of the
    /// next row.
    pub fn cell_ln(&mut self, w: f32, h: f32, text: &str, border: Border, align: Align, fill: bool) {
        let h_used = h;
        self.cell(w, h, text, border, align, fill);
        self.x = self.margin_left;
        self.y += h_used;
    }

    /// Draw pre-wrapped lines as a text block. The caller measured with the
    /// same wrap, so the block height is exactly `lines.len() * line_h`.
    /// Cursor ends at the left margin just below the block. Returns the
    /// height drawn.
    pub fn draw_wrapped(
        &mut self,
        w: f32,
        line_h: f32,
        lines: &[String],
        border: Border,
        align: Align,
        fill: bool,
    ) -> f32 {
        let w = self.resolve_w(w);
        self.flag_bounds(self.x, w);
        let (x0, y0) = (self.x, self.y);
        let h = lines.len() as f32 * line_h;
        if fill {
            self.filled_box(x0, y0, w, h);
        }
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let tx = self.text_x(x0, w, line, align);
            let baseline = y0 + i as f32 * line_h + line_h / 2.0 + self.size * 0.30;
            self.text_at(tx, baseline, line);
        }
        self.draw_border(border, x0, y0, w, h);
        self.x = self.margin_left;
        self.y = y0 + h;
        h
    }

    /// Wrap and draw a text block in one go (fpdf's `multi_cell`). Use
    /// [`wrap_lines`]/[`draw_wrapped`] separately when the height is needed
    /// before drawing.
    pub fn multi_cell(
        &mut self,
        w: f32,
        line_h: f32,
        text: &str,
        border: Border,
        align: Align,
        fill: bool,
    ) -> f32 {
        let w = self.resolve_w(w);
        let lines = wrap_lines(text, (w - 2.0 * CELL_PAD).max(1.0), self.style, self.size);
        self.draw_wrapped(w, line_h, &lines, border, align, fill)
    }

    /// Wrap width available for text inside a cell of width `w`.
    pub fn inner_width(&self, w: f32) -> f32 {
        (self.resolve_w(w) - 2.0 * CELL_PAD).max(1.0)
    }

    /// Serialize the page sequence to PDF bytes: one FlateDecode content
    /// stream per page, the four WinAnsi base fonts in every page's
    /// resources, A4 media box throughout.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some(msg) = self.err {
            return Err(Error::Layout(msg));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let font_pairs = fonts::register_base_fonts(&mut pdf, &mut alloc);

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts_dict = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }

        Ok(pdf.finish())
    }
}
