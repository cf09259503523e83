use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::events::{EventListenable, EventPayload};
use crate::grid::Cell;

/// Entity that draws itself onto a frame buffer.
pub trait Renderable {
    fn render(&self, buffer: &mut FrameBuffer);
}

/// Destination for composited frames.
pub trait FrameSink {
    fn present(&mut self, frame: &TextFrame) -> io::Result<()>;
}

/// Width × height glyph buffer for one frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<char>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16, background: char) -> Self {
        Self {
            width,
            height,
            glyphs: vec![background; usize::from(width) * usize::from(height)],
        }
    }

    /// Writes `glyph` at `cell`; cells outside the buffer are ignored.
    pub fn set(&mut self, cell: Cell, glyph: char) {
        if let Some(index) = self.index_of(cell) {
            self.glyphs[index] = glyph;
        }
    }

    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<char> {
        self.index_of(cell).map(|index| self.glyphs[index])
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        let width = usize::from(self.width);
        if x >= width || y >= usize::from(self.height) {
            return None;
        }
        Some(y * width + x)
    }

    #[must_use]
    pub fn into_frame(self) -> TextFrame {
        let width = usize::from(self.width).max(1);
        TextFrame {
            rows: self
                .glyphs
                .chunks(width)
                .map(|row| row.iter().collect())
                .collect(),
        }
    }
}

/// One fully composited snapshot of the grid, top row first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextFrame {
    rows: Vec<String>,
}

impl TextFrame {
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Joins rows with newlines.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

/// Holds the renderable and listening entities of a session.
pub struct Display {
    width: u16,
    height: u16,
    background: char,
    renderables: Vec<Rc<RefCell<dyn Renderable>>>,
    listenables: Vec<Rc<RefCell<dyn EventListenable>>>,
}

impl Display {
    #[must_use]
    pub fn new(width: u16, height: u16, background: char) -> Self {
        Self {
            width,
            height,
            background,
            renderables: Vec::new(),
            listenables: Vec::new(),
        }
    }

    /// Adds a renderable entity; returns false if it is already registered.
    pub fn register_renderable(&mut self, entity: Rc<RefCell<dyn Renderable>>) -> bool {
        if self
            .renderables
            .iter()
            .any(|known| std::ptr::addr_eq(Rc::as_ptr(known), Rc::as_ptr(&entity)))
        {
            return false;
        }
        self.renderables.push(entity);
        true
    }

    /// Adds a listening entity; returns false if it is already registered.
    pub fn register_listenable(&mut self, entity: Rc<RefCell<dyn EventListenable>>) -> bool {
        if self
            .listenables
            .iter()
            .any(|known| std::ptr::addr_eq(Rc::as_ptr(known), Rc::as_ptr(&entity)))
        {
            return false;
        }
        self.listenables.push(entity);
        true
    }

    /// Broadcasts `name` to every listening entity. Returns how many listeners ran.
    pub fn trigger(&self, name: &str, payload: EventPayload) -> usize {
        self.listenables
            .iter()
            .map(|entity| entity.borrow_mut().handle_event(name, &payload))
            .sum()
    }

    /// Composites every renderable onto a blank buffer, in registration order.
    #[must_use]
    pub fn render_frame(&self) -> TextFrame {
        let mut buffer = FrameBuffer::new(self.width, self.height, self.background);
        for entity in &self.renderables {
            entity.borrow().render(&mut buffer);
        }
        buffer.into_frame()
    }

    /// Renders a frame and hands it to `sink`.
    pub fn present<S: FrameSink + ?Sized>(&self, sink: &mut S) -> io::Result<()> {
        sink.present(&self.render_frame())
    }
}
