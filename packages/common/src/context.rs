use std::cell::RefCell;
use std::rc::Rc;

/// Output buffer with indentation tracking, shared by the schema compilers
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
    indent_unit: &'static str,
}

impl CompilerContext {
    pub fn new() -> Self {
        Self::with_indent("  ")
    }

    pub fn with_indent(indent_unit: &'static str) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
            indent_unit,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = self.indent_unit.repeat(*self.indent_level.borrow());
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(&indent);
        buffer.push_str(text);
    }

    /// Blank line between top-level statements, never at the very start
    pub fn separate(&self) {
        let mut buffer = self.buffer.borrow_mut();
        if !buffer.is_empty() && !buffer.ends_with("\n\n") {
            buffer.push('\n');
        }
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}
