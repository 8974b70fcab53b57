use std::cell::{RefCell, RefMut};
use std::io::Write;

pub struct Session {
    writer: RefCell<Box<dyn Write>>,
}

impl Session {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Session {
            writer: RefCell::new(writer),
        }
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }
}
